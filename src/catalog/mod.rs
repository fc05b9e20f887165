/// Selectable asset records parsed from layer directory filenames
pub mod element;
/// Layer definitions, per-layer options and capability tags
pub mod layer;
/// Layer directory scanning
pub mod scanner;
