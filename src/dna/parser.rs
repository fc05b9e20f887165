//! Binding DNA back to the layers that produced it

use crate::catalog::element::AssetElement;
use crate::catalog::layer::Layer;
use crate::dna::token::{Dna, RawToken, parse_token, split_tokens};
use tracing::warn;

/// A layer paired with the element its DNA token names
#[derive(Debug, Clone, Copy)]
pub struct LayerSelection<'a> {
    /// Layer that consumed the token
    pub layer: &'a Layer,
    /// Selected element, `None` when the token could not be resolved
    pub element: Option<&'a AssetElement>,
}

impl LayerSelection<'_> {
    /// Whether the selection can be rendered
    pub const fn is_resolved(&self) -> bool {
        self.element.is_some()
    }
}

/// Bind tagged tokens to their layers by slot
///
/// Layers without a token are absent from the result. A token whose id or
/// file name does not match the slot's catalog is resolved by file name when
/// possible and left unresolved otherwise.
pub fn bind_dna<'a>(dna: &Dna, layers: &'a [Layer]) -> Vec<LayerSelection<'a>> {
    dna.tokens
        .iter()
        .filter_map(|token| {
            let Some(layer) = layers.get(token.slot) else {
                warn!(slot = token.slot, kind = %token.kind, "DNA token refers to a missing layer slot");
                return None;
            };
            let element = resolve_element(layer, token.element_id, &token.filename);
            Some(LayerSelection { layer, element })
        })
        .collect()
}

/// Bind a persisted DNA string to `layers` by positional replay
///
/// Layers that always select consume the next token. Conditional layers
/// consume it only when its file name belongs to their own catalog and the
/// tokens after it can still be matched by the layers that follow, so a
/// skipped sub-layer never takes the token of a sibling sharing its catalog.
/// Stale tokens of probability-0 layers are consumed the same way to keep
/// later bindings aligned. Layers with empty catalogs never consume.
pub fn parse_dna<'a>(dna: &str, layers: &'a [Layer]) -> Vec<LayerSelection<'a>> {
    let tokens: Vec<Option<RawToken>> = split_tokens(dna)
        .into_iter()
        .map(|text| {
            let parsed = parse_token(text);
            if parsed.is_none() {
                warn!(token = text, "malformed DNA token");
            }
            parsed
        })
        .collect();

    let mut replay = Replay::new(layers, &tokens);
    let mut selections = Vec::new();
    let mut cursor = 0;
    let mut missing = 0;

    for (position, layer) in layers.iter().enumerate() {
        if layer.elements.is_empty() {
            continue;
        }

        let optional = is_optional(layer);
        let Some(next) = tokens.get(cursor) else {
            if !optional {
                missing += 1;
            }
            continue;
        };

        if optional {
            let belongs = replay.belongs(layer, cursor);
            // Prefer taking the token unless only skipping lets the rest match
            let take = belongs
                && (replay.completes(position + 1, cursor + 1)
                    || !replay.completes(position + 1, cursor));
            if !take {
                continue;
            }
        }
        cursor += 1;

        let element = next
            .as_ref()
            .and_then(|t| resolve_element(layer, t.element_id, &t.filename));
        selections.push(LayerSelection { layer, element });
    }

    if cursor < tokens.len() {
        warn!(
            expected = cursor,
            found = tokens.len(),
            "DNA has more tokens than resolvable layers"
        );
    }
    if missing > 0 {
        warn!(missing, "DNA has fewer tokens than required layers");
    }

    selections
}

fn is_optional(layer: &Layer) -> bool {
    layer.is_conditional() || layer.options.probability.is_some_and(|p| p <= 0.0)
}

/// Memoised check of whether a suffix of layers can consume a suffix of tokens
struct Replay<'a> {
    layers: &'a [Layer],
    tokens: &'a [Option<RawToken>],
    memo: Vec<Option<bool>>,
}

impl<'a> Replay<'a> {
    fn new(layers: &'a [Layer], tokens: &'a [Option<RawToken>]) -> Self {
        Self {
            layers,
            tokens,
            memo: vec![None; (layers.len() + 1) * (tokens.len() + 1)],
        }
    }

    fn belongs(&self, layer: &Layer, token: usize) -> bool {
        self.tokens
            .get(token)
            .and_then(Option::as_ref)
            .is_some_and(|t| layer.element_by_filename(&t.filename).is_some())
    }

    /// Whether layers from `layer` on can consume exactly the tokens from
    /// `token` on, every required layer taking one of its own elements
    fn completes(&mut self, layer: usize, token: usize) -> bool {
        let key = layer * (self.tokens.len() + 1) + token;
        if let Some(Some(known)) = self.memo.get(key) {
            return *known;
        }

        let layers = self.layers;
        let result = match layers.get(layer) {
            None => token >= self.tokens.len(),
            Some(current) if current.elements.is_empty() => self.completes(layer + 1, token),
            Some(current) => {
                let takes = self.belongs(current, token) && self.completes(layer + 1, token + 1);
                takes || (is_optional(current) && self.completes(layer + 1, token))
            }
        };

        if let Some(slot) = self.memo.get_mut(key) {
            *slot = Some(result);
        }
        result
    }
}

fn resolve_element<'a>(layer: &'a Layer, element_id: usize, filename: &str) -> Option<&'a AssetElement> {
    if let Some(element) = layer.element(element_id)
        && element.filename == filename
    {
        return Some(element);
    }

    match layer.element_by_filename(filename) {
        Some(element) => {
            warn!(
                layer = %layer.name,
                encoded_id = element_id,
                catalog_id = element.id,
                filename,
                "DNA element id does not match catalog"
            );
            Some(element)
        }
        None => {
            warn!(layer = %layer.name, filename, "DNA token names an unknown element, layer unresolved");
            None
        }
    }
}
