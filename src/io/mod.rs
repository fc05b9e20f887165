/// Command-line interface and collection processing
pub mod cli;
/// Generation constants and JSON collection configuration
pub mod configuration;
/// Error types and result alias
pub mod error;
/// Asset decoding and edition PNG export
pub mod image;
/// Edition metadata records and their JSON files
pub mod metadata;
/// Progress bars for layer configurations
pub mod progress;
