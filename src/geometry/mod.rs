/// Anchor positions, anchor specs and the per-edition anchor map
pub mod anchor;
/// Alpha bounding-box analysis of decoded assets
pub mod bounds;
/// Filename pattern matching for size multipliers and constraint overrides
pub mod patterns;
/// Axis-aligned rectangles in canvas space
pub mod rect;
/// Per-layer geometry resolution pipeline
pub mod resolver;
