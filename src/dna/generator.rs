//! Weighted per-layer selection producing one DNA per edition attempt

use crate::catalog::layer::Layer;
use crate::dna::selection::RandomSelector;
use crate::dna::token::{Dna, DnaToken};
use crate::io::error::{GenerationError, Result};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Selection state that outlives single editions
///
/// Only the fairness usage counters persist across editions. They are updated
/// through [`DnaGenerator::commit`] once a DNA has been accepted, so draws
/// rejected as duplicates leave the counters untouched.
#[derive(Debug, Clone, Default)]
pub struct DnaGenerator {
    usage: HashMap<String, HashMap<usize, usize>>,
}

/// Trackers scoped to one generation pass
#[derive(Default)]
struct PassState<'a> {
    selected_flags: HashSet<&'a str>,
    chosen_ids: HashMap<&'a str, HashSet<usize>>,
}

impl DnaGenerator {
    /// Create a generator with empty usage counters
    pub fn new() -> Self {
        Self::default()
    }

    /// How often an element of `kind` has been part of an accepted edition
    pub fn usage(&self, kind: &str, element_id: usize) -> usize {
        self.usage
            .get(kind)
            .and_then(|counts| counts.get(&element_id))
            .copied()
            .unwrap_or(0)
    }

    /// Draw one selection per layer
    ///
    /// # Errors
    ///
    /// Returns `EmptyCatalog` if a mandatory layer has no elements
    pub fn generate(&self, layers: &[Layer], rng: &mut RandomSelector) -> Result<Dna> {
        let mut state = PassState::default();
        let mut dna = Dna::new();

        for layer in layers {
            if let Some(probability) = layer.options.probability {
                // Always drawn so the random stream does not depend on the gate
                let sample = rng.unit();
                if probability <= 0.0 || sample > probability {
                    debug!(layer = %layer.name, probability, sample, "layer skipped by probability");
                    continue;
                }
            }

            if let Some(other) = layer.options.mutually_exclusive_with.as_deref()
                && state.selected_flags.contains(other)
            {
                debug!(layer = %layer.name, excluded_by = other, "layer skipped by mutual exclusion");
                continue;
            }

            if layer.elements.is_empty() {
                if layer.capabilities.mandatory {
                    return Err(GenerationError::EmptyCatalog {
                        layer: layer.kind.clone(),
                    });
                }
                warn!(layer = %layer.kind, "layer has no elements, skipping");
                continue;
            }

            let pool = candidate_pool(layer, &mut state);
            let weights = self.candidate_weights(layer, &pool);

            let choice = match rng.weighted_choice(&weights) {
                Some(choice) => choice,
                None if layer.capabilities.mandatory => {
                    warn!(layer = %layer.kind, "total weight is zero, selecting uniformly");
                    let uniform = vec![1.0; pool.len()];
                    rng.weighted_choice(&uniform).unwrap_or(0)
                }
                None => {
                    warn!(layer = %layer.kind, "total weight is zero, skipping layer");
                    continue;
                }
            };

            let Some(element) = pool.get(choice).and_then(|&id| layer.element(id)) else {
                continue;
            };

            if layer.capabilities.no_repeat_within_image {
                state
                    .chosen_ids
                    .entry(layer.kind.as_str())
                    .or_default()
                    .insert(element.id);
            }
            state.selected_flags.insert(layer.kind.as_str());
            state.selected_flags.insert(layer.name.as_str());

            dna.tokens.push(DnaToken {
                slot: layer.index,
                kind: layer.kind.clone(),
                element_id: element.id,
                filename: element.filename.clone(),
                bypass: layer.options.bypass_dna,
            });
        }

        Ok(dna)
    }

    /// Count the selections of an accepted DNA for fairness rotation
    pub fn commit(&mut self, dna: &Dna, layers: &[Layer]) {
        for token in &dna.tokens {
            let rotates = layers
                .get(token.slot)
                .is_some_and(|layer| layer.capabilities.fairness_rotation);
            if rotates {
                *self
                    .usage
                    .entry(token.kind.clone())
                    .or_default()
                    .entry(token.element_id)
                    .or_insert(0) += 1;
            }
        }
    }

    fn candidate_weights(&self, layer: &Layer, pool: &[usize]) -> Vec<f64> {
        pool.iter()
            .map(|&id| {
                let weight = layer.element(id).map_or(0.0, |e| e.weight);
                if layer.capabilities.fairness_rotation {
                    let base = if weight.is_finite() && weight > 0.0 {
                        weight
                    } else {
                        1.0
                    };
                    base / (1.0 + self.usage(&layer.kind, id) as f64)
                } else {
                    weight
                }
            })
            .collect()
    }
}

/// Element ids a layer may pick from in this pass
///
/// No-repeat layers exclude ids already chosen for their kind. When that
/// leaves nothing, the tracker for the kind is reset and the full catalog is
/// offered again.
fn candidate_pool<'a>(layer: &'a Layer, state: &mut PassState<'a>) -> Vec<usize> {
    let all = || layer.elements.iter().map(|e| e.id).collect::<Vec<_>>();

    if !layer.capabilities.no_repeat_within_image {
        return all();
    }

    let chosen = state.chosen_ids.entry(layer.kind.as_str()).or_default();
    let pool: Vec<usize> = layer
        .elements
        .iter()
        .map(|e| e.id)
        .filter(|id| !chosen.contains(id))
        .collect();

    if pool.is_empty() {
        warn!(layer = %layer.kind, "no-repeat pool exhausted, resetting");
        chosen.clear();
        return all();
    }
    pool
}
