//! Image dimension probing.
//!
//! Only the header is read; pixels are never decoded.

use std::path::Path;

use crate::error::LeafcocoError;

/// Dimensions used when an image cannot be probed.
pub const DEFAULT_IMAGE_SIZE: (u32, u32) = (256, 256);

/// Reads `(width, height)` from an image header.
pub fn read_image_dimensions(path: &Path) -> Result<(u32, u32), LeafcocoError> {
    let size = imagesize::size(path).map_err(|source| LeafcocoError::ImageDimensionRead {
        path: path.to_path_buf(),
        source,
    })?;
    dimensions_to_u32(path, size.width, size.height)
}

fn dimensions_to_u32(
    path: &Path,
    width: usize,
    height: usize,
) -> Result<(u32, u32), LeafcocoError> {
    match (u32::try_from(width), u32::try_from(height)) {
        (Ok(w), Ok(h)) => Ok((w, h)),
        _ => Err(LeafcocoError::ImageDimensionOverflow {
            path: path.to_path_buf(),
            width,
            height,
        }),
    }
}
