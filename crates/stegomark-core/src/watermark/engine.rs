use log::debug;

use super::dwt::{detail_positions, Plane};
use super::signature::Signature;
use crate::media::CoverImage;
use crate::{Result, StegoError};

const LUMA_R: f64 = 0.299;
const LUMA_G: f64 = 0.587;
const LUMA_B: f64 = 0.114;

/// Tuning of the wavelet watermark.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WatermarkOptions {
    /// decomposition levels, the mark lives in the detail subbands of the deepest one
    pub levels: u8,
    /// coefficient change every mark bit gets at least
    pub base_strength: f64,
    /// additional change relative to the coefficient magnitude
    pub relative_strength: f64,
    /// upper bound of a single coefficient change
    pub max_delta: f64,
}

impl Default for WatermarkOptions {
    fn default() -> Self {
        Self {
            levels: 2,
            base_strength: 6.0,
            relative_strength: 0.2,
            max_delta: 32.0,
        }
    }
}

impl WatermarkOptions {
    fn validate(&self) -> Result<()> {
        if !(1..=8).contains(&self.levels) {
            return Err(StegoError::InvalidWatermarkLevels(self.levels));
        }
        Ok(())
    }

    fn delta(&self, coefficient: f64) -> f64 {
        (self.base_strength + self.relative_strength * coefficient.abs()).min(self.max_delta)
    }
}

/// The luminance of the largest top left region that divides into `2^levels` blocks.
struct LumaRegion {
    plane: Plane,
    positions: Vec<usize>,
}

impl LumaRegion {
    fn decompose(image: &CoverImage, options: &WatermarkOptions) -> Result<Self> {
        options.validate()?;
        let block = 1usize << options.levels;
        let width = image.width() as usize / block * block;
        let height = image.height() as usize / block * block;
        if width == 0 || height == 0 {
            return Err(StegoError::ImageTooSmallForWatermark);
        }

        let mut plane = Plane::new(width, height, luminance(image, width, height));
        plane.forward(options.levels);
        let positions = detail_positions(width, height, options.levels);
        if positions.is_empty() {
            return Err(StegoError::ImageTooSmallForWatermark);
        }

        Ok(Self { plane, positions })
    }
}

/// Embeds `signature` into the luminance of `cover`.
///
/// Coefficient `k` of the deepest detail subbands carries signature bit `k mod len`. A set bit
/// grows the coefficient magnitude, a cleared bit shrinks it towards, but never past, zero.
/// The luminance change is added to every colour channel, alpha stays untouched.
pub fn embed_mark(
    cover: &CoverImage,
    signature: &Signature,
    options: &WatermarkOptions,
) -> Result<CoverImage> {
    let mut region = LumaRegion::decompose(cover, options)?;
    let original = luminance(cover, region.plane.width, region.plane.height);
    let bits = signature.bits();

    debug!(
        "Embedding {} signature bits into {} coefficients",
        bits.len(),
        region.positions.len()
    );
    for (k, position) in region.positions.iter().enumerate() {
        let c = region.plane.data[*position];
        let delta = options.delta(c);
        let sign = if c < 0.0 { -1.0 } else { 1.0 };

        region.plane.data[*position] = if bits[k % bits.len()] {
            c + sign * delta
        } else if c.abs() <= delta {
            0.0
        } else {
            c - sign * delta
        };
    }
    region.plane.inverse(options.levels);

    let mut marked = cover.clone();
    let channels = cover.channels() as usize;
    let colour_channels = if cover.has_alpha() { channels - 1 } else { channels };
    let image_width = cover.width() as usize;
    let samples = marked.as_bytes_mut();

    for y in 0..region.plane.height {
        for x in 0..region.plane.width {
            let i = y * region.plane.width + x;
            let shift = region.plane.data[i] - original[i];
            let pixel = (y * image_width + x) * channels;
            for sample in &mut samples[pixel..pixel + colour_channels] {
                *sample = (*sample as f64 + shift).round().clamp(0.0, 255.0) as u8;
            }
        }
    }

    Ok(marked)
}

/// Correlates the coefficient magnitudes of `image` with `signature`.
///
/// Returns the Pearson correlation in `[-1, 1]` between the mean magnitude per signature bit and
/// the signature as `±1`. Marked images score close to 1 for their own signature, anything else
/// scores around 0. Interpretation of the score is up to the caller.
pub fn check_mark(image: &CoverImage, signature: &Signature, options: &WatermarkOptions) -> Result<f64> {
    let region = LumaRegion::decompose(image, options)?;
    let len = signature.len();

    let mut sums = vec![0.0; len];
    let mut counts = vec![0usize; len];
    for (k, position) in region.positions.iter().enumerate() {
        sums[k % len] += region.plane.data[*position].abs();
        counts[k % len] += 1;
    }

    let (means, polarity): (Vec<f64>, Vec<f64>) = sums
        .iter()
        .zip(&counts)
        .zip(signature.polarity())
        .filter(|((_, count), _)| **count > 0)
        .map(|((sum, count), p)| (sum / *count as f64, p))
        .unzip();

    Ok(pearson(&means, &polarity))
}

/// 0.0 when either side has no variance
fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len() as f64;
    if xs.len() < 2 {
        return 0.0;
    }
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        let (dx, dy) = (x - mean_x, y - mean_y);
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x <= f64::EPSILON || var_y <= f64::EPSILON {
        return 0.0;
    }

    (cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0)
}

/// BT.601 luma of the top left `width` x `height` pixels, gray images are their own luma
fn luminance(image: &CoverImage, width: usize, height: usize) -> Vec<f64> {
    let channels = image.channels() as usize;
    let image_width = image.width() as usize;
    let samples = image.as_bytes();

    let mut luma = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let p = &samples[(y * image_width + x) * channels..][..channels];
            luma.push(if image.has_color() {
                LUMA_R * p[0] as f64 + LUMA_G * p[1] as f64 + LUMA_B * p[2] as f64
            } else {
                p[0] as f64
            });
        }
    }
    luma
}
