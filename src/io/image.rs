//! Asset decoding and edition PNG export

use crate::io::error::{GenerationError, Result, file_system_error};
use image::RgbaImage;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// Decode one asset into RGBA
///
/// # Errors
///
/// Returns `ImageLoad` if the file cannot be opened or decoded
pub fn load_image(path: &Path) -> Result<RgbaImage> {
    image::open(path)
        .map(|decoded| decoded.to_rgba8())
        .map_err(|e| GenerationError::ImageLoad {
            path: path.to_path_buf(),
            source: e,
        })
}

/// Decode a batch of assets in parallel, preserving input order
///
/// # Errors
///
/// Returns the first `ImageLoad` error encountered
pub fn load_images(paths: &[PathBuf]) -> Result<Vec<RgbaImage>> {
    paths.par_iter().map(|path| load_image(path)).collect()
}

/// Write an edition image as PNG, creating parent directories
///
/// # Errors
///
/// Returns an error if:
/// - The parent directory cannot be created
/// - The image cannot be encoded or written
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| file_system_error(parent, "create directory", e))?;
    }

    image
        .save_with_format(path, image::ImageFormat::Png)
        .map_err(|e| GenerationError::ImageExport {
            path: path.to_path_buf(),
            source: e,
        })
}
