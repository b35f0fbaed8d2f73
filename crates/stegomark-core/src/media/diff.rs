use crate::media::CoverImage;
use crate::{Result, StegoError};

/// Per channel absolute difference of two images of the same shape.
///
/// The result is stretched so the largest difference becomes 255, which makes single flipped
/// low bits visible. Identical images give an all zero image.
pub fn diff_images(left: &CoverImage, right: &CoverImage) -> Result<CoverImage> {
    if !left.same_shape(right) {
        return Err(StegoError::ImageDimensionsMismatch);
    }

    let mut diff: Vec<u8> = left
        .as_bytes()
        .iter()
        .zip(right.as_bytes())
        .map(|(a, b)| a.abs_diff(*b))
        .collect();

    let max = diff.iter().copied().max().unwrap_or(0);
    if max > 0 {
        for d in diff.iter_mut() {
            *d = ((*d as u32 * 255 + max as u32 / 2) / max as u32) as u8;
        }
    }

    CoverImage::new(left.width(), left.height(), left.channels(), diff)
}
