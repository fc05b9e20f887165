//! Random draw order for selected layers
//!
//! Scrambling only changes the order layers are drawn in. Selection, DNA and
//! metadata identity stay tied to the configured layer order.

use crate::catalog::layer::Layer;
use crate::dna::selection::RandomSelector;
use crate::io::configuration::ScrambleSettings;
use tracing::warn;

/// Draw order over `layers` as indices into the slice
///
/// Eligible layers are those named in the settings (by kind or display name),
/// or every layer but the first when no names are given. Eligible layers swap
/// positions among themselves; the rest keep their slots.
pub fn scrambled_order(layers: &[&Layer], settings: &ScrambleSettings, rng: &mut RandomSelector) -> Vec<usize> {
    let mut order: Vec<usize> = (0..layers.len()).collect();
    if !settings.enabled {
        return order;
    }

    let eligible_slots: Vec<usize> = layers
        .iter()
        .enumerate()
        .filter(|(i, layer)| {
            if settings.names.is_empty() {
                *i > 0
            } else {
                settings
                    .names
                    .iter()
                    .any(|n| *n == layer.kind || *n == layer.name)
            }
        })
        .map(|(i, _)| i)
        .collect();

    let mut shuffled = eligible_slots.clone();
    rng.shuffle(&mut shuffled);
    for (slot, layer_index) in eligible_slots.iter().zip(shuffled) {
        if let Some(entry) = order.get_mut(*slot) {
            *entry = layer_index;
        }
    }

    if settings.respect_anchor_dependencies {
        order = respect_dependencies(layers, order);
    }
    order
}

/// Move every layer after the layers it anchors or constrains to
fn respect_dependencies(layers: &[&Layer], mut order: Vec<usize>) -> Vec<usize> {
    let depends_on = |dependent: usize, dependency: usize| {
        let (Some(a), Some(b)) = (layers.get(dependent), layers.get(dependency)) else {
            return false;
        };
        [a.options.anchor_to.as_deref(), a.options.constrain_to_bounds.as_deref()]
            .into_iter()
            .flatten()
            .any(|target| target == b.name)
    };

    // Bounded so a dependency cycle cannot loop forever
    let limit = order.len() * order.len() + 1;
    for _ in 0..limit {
        let violation = order.iter().enumerate().find_map(|(position, &dependent)| {
            order
                .iter()
                .enumerate()
                .skip(position + 1)
                .filter(|&(_, &dependency)| depends_on(dependent, dependency))
                .map(|(later, _)| later)
                .last()
                .map(|later| (position, later))
        });

        let Some((position, later)) = violation else {
            return order;
        };
        let moved = order.remove(position);
        order.insert(later, moved);
    }

    warn!("layer anchor dependencies form a cycle, keeping scrambled order");
    order
}
