/// Composite operations and per-pixel blending
pub mod blend;
/// Drawing surface trait and layer rasterisation
pub mod canvas;
/// Colour parsing and HSL conversion
pub mod color;
/// Per-layer drawing: resolve, occlusion retry, effects, publish
pub mod compositor;
/// Mutable per-edition render state
pub mod context;
/// Glow, shadow and tint post-effects
pub mod effects;
/// Occlusion mask and overlap-free placement search
pub mod occlusion;
