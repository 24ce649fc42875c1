use cell_dither::ImageSample;
use std::path::Path;

use crate::error::AppError;

/// Decode an image file (PNG, JPEG, ...) into an [`ImageSample`]
pub fn load_image(path: &Path) -> Result<ImageSample, AppError> {
    let decoded = image::open(path).map_err(|e| AppError::image_load(path, e))?;
    let rgb = decoded.to_rgb8();
    let (width, height) = rgb.dimensions();

    let sample = ImageSample::from_rgb8(rgb.as_raw(), width as usize, height as usize)
        .map_err(|e| AppError::image_load(path, e))?;
    tracing::info!(path = %path.display(), width, height, "Loaded image");
    Ok(sample)
}
