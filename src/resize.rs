use std::path::Path;

use image::imageops::{self, FilterType};
use image::RgbaImage;
use log::info;

use crate::error::{IconError, Result};

/// Opens any supported image and converts it to RGBA8.
pub fn load_source(path: &Path) -> Result<RgbaImage> {
    if !path.exists() {
        return Err(IconError::InvalidInput(format!("source image not found: {}", path.display())));
    }
    let img = image::open(path)
        .map_err(|e| IconError::InvalidInput(format!("cannot decode {}: {}", path.display(), e)))?;
    info!("opened source image {} ({}x{}, {:?})", path.display(), img.width(), img.height(), img.color());
    Ok(img.to_rgba8())
}

/// Square `size` x `size` Lanczos3 resample. The aspect ratio is not kept.
pub fn resize_to(img: &RgbaImage, size: u32) -> Result<RgbaImage> {
    if size == 0 {
        return Err(IconError::InvalidInput("target size must be positive".into()));
    }
    if img.dimensions() == (size, size) {
        return Ok(img.clone());
    }
    Ok(imageops::resize(img, size, size, FilterType::Lanczos3))
}
