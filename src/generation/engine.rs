//! Edition generation loop
//!
//! Editions are produced strictly one after another: draw a unique DNA, decode
//! the selected assets as one parallel batch, draw them in order onto the
//! edition's render context, then save the image and its metadata.

use crate::catalog::element::AssetElement;
use crate::catalog::layer::{Layer, layers_setup};
use crate::dna::generator::DnaGenerator;
use crate::dna::parser::bind_dna;
use crate::dna::selection::RandomSelector;
use crate::dna::token::Dna;
use crate::dna::uniqueness::{Admission, UniquenessTracker};
use crate::generation::scramble::scrambled_order;
use crate::io::configuration::{CollectionConfig, IMAGES_DIR, JSON_DIR, ScrambleSettings};
use crate::io::error::{Result, file_system_error};
use crate::io::image::{load_images, save_png};
use crate::io::metadata::{Attribute, EditionMetadata, MetadataWriter};
use crate::render::canvas::Canvas;
use crate::render::color::{parse_hex_color, random_hue_color};
use crate::render::compositor::{DrawOutcome, LayerDraw, draw_layer};
use crate::render::context::RenderContext;
use image::{Rgba, RgbaImage};
use std::path::{Path, PathBuf};
use tracing::{debug, info, info_span};

/// Receives progress notifications from [`EditionEngine::run`]
pub trait GenerationObserver {
    /// A layer configuration starts producing `editions` editions
    fn configuration_started(&mut self, _index: usize, _editions: usize) {}

    /// Edition number `edition` of configuration `index` was written
    fn edition_completed(&mut self, _index: usize, _edition: usize) {}

    /// Configuration `index` reached its target
    fn configuration_completed(&mut self, _index: usize) {}
}

/// Observer that ignores every notification
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentObserver;

impl GenerationObserver for SilentObserver {}

/// Pixels and traits of one drawn edition
#[derive(Debug, Clone)]
pub struct RenderedEdition {
    /// Final canvas
    pub image: RgbaImage,
    /// Traits of the layers actually drawn, in draw order
    pub attributes: Vec<Attribute>,
}

/// Drives selection, rendering and output for a whole collection
pub struct EditionEngine<'a> {
    config: &'a CollectionConfig,
    rng: RandomSelector,
    generator: DnaGenerator,
    tracker: UniquenessTracker,
    context: RenderContext,
    static_background: Option<Rgba<u8>>,
}

impl<'a> EditionEngine<'a> {
    /// Create an engine for `config` seeded with `seed`
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the static background colour cannot be parsed
    pub fn new(config: &'a CollectionConfig, seed: u64) -> Result<Self> {
        let background = &config.background;
        let static_background = if background.generate && background.is_static {
            Some(parse_hex_color(&background.default)?)
        } else {
            None
        };

        Ok(Self {
            config,
            rng: RandomSelector::new(seed),
            generator: DnaGenerator::new(),
            tracker: UniquenessTracker::new(config.unique_dna_tolerance),
            context: RenderContext::new(config.format),
            static_background,
        })
    }

    /// Edition numbers in the order they are handed out
    pub fn edition_numbers(&mut self) -> Vec<usize> {
        let start = self.config.start_index;
        let mut numbers: Vec<usize> = (start..start + self.config.total_editions()).collect();
        if self.config.shuffle_layer_configurations {
            self.rng.shuffle(&mut numbers);
        }
        numbers
    }

    /// Draw DNA until one is new to the collection
    ///
    /// # Errors
    ///
    /// Returns `EmptyCatalog` from selection, or `CollectionExhausted` once the
    /// duplicate tolerance is reached
    pub fn draw_unique_dna(&mut self, layers: &[Layer], edition: usize, target: usize) -> Result<Dna> {
        loop {
            let dna = self.generator.generate(layers, &mut self.rng)?;
            match self.tracker.admit(&dna, edition, target)? {
                Admission::Accepted => {
                    self.generator.commit(&dna, layers);
                    return Ok(dna);
                }
                Admission::Duplicate => {
                    debug!(
                        dna = %dna,
                        collisions = self.tracker.consecutive_duplicates(),
                        "duplicate DNA, drawing again"
                    );
                }
            }
        }
    }

    /// Draw the layers selected by `dna` onto a fresh canvas
    ///
    /// # Errors
    ///
    /// Returns `ImageLoad` if a selected asset cannot be decoded
    pub fn render_edition(
        &mut self,
        layers: &[Layer],
        dna: &Dna,
        scramble: &ScrambleSettings,
    ) -> Result<RenderedEdition> {
        self.context.reset();
        self.draw_background();

        let selected: Vec<(&Layer, &AssetElement)> = bind_dna(dna, layers)
            .into_iter()
            .filter_map(|selection| selection.element.map(|element| (selection.layer, element)))
            .collect();

        let paths: Vec<PathBuf> = selected.iter().map(|(_, e)| e.path.clone()).collect();
        let images = load_images(&paths)?;

        let selected_layers: Vec<&Layer> = selected.iter().map(|(layer, _)| *layer).collect();
        let order = scrambled_order(&selected_layers, scramble, &mut self.rng);

        let mut attributes = Vec::with_capacity(order.len());
        for index in order {
            let (Some((layer, element)), Some(image)) = (selected.get(index), images.get(index)) else {
                continue;
            };
            let draw = LayerDraw {
                layer,
                element,
                image,
            };
            if let DrawOutcome::Drawn { .. } = draw_layer(&mut self.context, &draw, &mut self.rng) {
                attributes.push(Attribute {
                    trait_type: layer.name.clone(),
                    value: element.name.clone(),
                });
            }
        }

        Ok(RenderedEdition {
            image: self.context.canvas.pixels().clone(),
            attributes,
        })
    }

    fn draw_background(&mut self) {
        let background = &self.config.background;
        if !background.generate {
            return;
        }
        let color = match self.static_background {
            Some(color) => color,
            None => random_hue_color(&mut self.rng, background.brightness),
        };
        self.context.fill_background(color);
    }

    /// Generate the whole collection into the configured build directory
    ///
    /// Writes `images/<n>.png` and `json/<n>.json` per edition and the
    /// combined `json/_metadata.json` at the end.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A layer directory cannot be read
    /// - A mandatory layer has no elements
    /// - The uniqueness tolerance is exhausted
    /// - An asset cannot be decoded or an output file cannot be written
    pub fn run(&mut self, observer: &mut dyn GenerationObserver) -> Result<Vec<EditionMetadata>> {
        let config = self.config;
        let images_dir = config.build_dir.join(IMAGES_DIR);
        let writer = MetadataWriter::new(config.build_dir.join(JSON_DIR));

        let numbers = self.edition_numbers();
        let mut records = Vec::with_capacity(numbers.len());
        let mut produced = 0;

        for (index, configuration) in config.layer_configurations.iter().enumerate() {
            let layers = layers_setup(&configuration.layers_order, &config.layers_dir, &config.rarity_delimiter)?;
            let scramble = config.scramble_settings(configuration);
            let target = configuration.grow_edition_size_to;
            observer.configuration_started(index, target.saturating_sub(produced));

            while produced < target {
                let Some(&number) = numbers.get(produced) else {
                    break;
                };
                let span = info_span!("edition", index = number);
                let _entered = span.enter();

                let dna = self.draw_unique_dna(&layers, number, target)?;
                let rendered = self.render_edition(&layers, &dna, &scramble)?;

                save_png(&rendered.image, &images_dir.join(format!("{number}.png")))?;
                let record = EditionMetadata::new(config, number, &dna, rendered.attributes);
                writer.write_edition(&record)?;

                info!(dna = %record.dna, traits = record.attributes.len(), "edition created");
                records.push(record);
                produced += 1;
                observer.edition_completed(index, number);
            }

            observer.configuration_completed(index);
        }

        writer.write_combined(&records)?;
        Ok(records)
    }
}

/// Create the build directory layout, wiping previous output when `clean`
///
/// # Errors
///
/// Returns `FileSystem` if the directories cannot be removed or created
pub fn prepare_build_dir(build_dir: &Path, clean: bool) -> Result<()> {
    if clean && build_dir.exists() {
        std::fs::remove_dir_all(build_dir)
            .map_err(|e| file_system_error(build_dir, "remove build directory", e))?;
    }
    for sub in [IMAGES_DIR, JSON_DIR] {
        let dir = build_dir.join(sub);
        std::fs::create_dir_all(&dir).map_err(|e| file_system_error(dir, "create directory", e))?;
    }
    Ok(())
}
