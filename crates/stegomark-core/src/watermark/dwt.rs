//! Multi level, orthonormal 2d Haar wavelet transform.
//!
//! Coefficients are kept in place using the Mallat layout: after level `l` the low pass
//! approximation occupies the top left `width >> l` x `height >> l` corner, the three detail
//! subbands of that level sit right, below and diagonal of it.

use std::f64::consts::FRAC_1_SQRT_2;

/// A plane of samples that is transformed in place, `width` and `height` must be divisible by `2^levels`.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    pub width: usize,
    pub height: usize,
    pub data: Vec<f64>,
}

impl Plane {
    pub fn new(width: usize, height: usize, data: Vec<f64>) -> Self {
        debug_assert_eq!(data.len(), width * height);
        Self {
            width,
            height,
            data,
        }
    }

    pub fn forward(&mut self, levels: u8) {
        for level in 0..levels {
            let (w, h) = (self.width >> level, self.height >> level);
            self.rows(w, h, haar_step);
            self.columns(w, h, haar_step);
        }
    }

    pub fn inverse(&mut self, levels: u8) {
        for level in (0..levels).rev() {
            let (w, h) = (self.width >> level, self.height >> level);
            self.columns(w, h, inverse_haar_step);
            self.rows(w, h, inverse_haar_step);
        }
    }

    fn rows(&mut self, w: usize, h: usize, step: fn(&[f64], &mut [f64])) {
        let mut out = vec![0.0; w];
        for y in 0..h {
            let row = &mut self.data[y * self.width..y * self.width + w];
            step(row, &mut out);
            row.copy_from_slice(&out);
        }
    }

    fn columns(&mut self, w: usize, h: usize, step: fn(&[f64], &mut [f64])) {
        let mut column = vec![0.0; h];
        let mut out = vec![0.0; h];
        for x in 0..w {
            for (y, c) in column.iter_mut().enumerate() {
                *c = self.data[y * self.width + x];
            }
            step(&column, &mut out);
            for (y, c) in out.iter().enumerate() {
                self.data[y * self.width + x] = *c;
            }
        }
    }
}

/// approximations to the first half, details to the second half
fn haar_step(input: &[f64], out: &mut [f64]) {
    let half = input.len() / 2;
    for i in 0..half {
        let (a, b) = (input[2 * i], input[2 * i + 1]);
        out[i] = (a + b) * FRAC_1_SQRT_2;
        out[half + i] = (a - b) * FRAC_1_SQRT_2;
    }
}

fn inverse_haar_step(input: &[f64], out: &mut [f64]) {
    let half = input.len() / 2;
    for i in 0..half {
        let (s, d) = (input[i], input[half + i]);
        out[2 * i] = (s + d) * FRAC_1_SQRT_2;
        out[2 * i + 1] = (s - d) * FRAC_1_SQRT_2;
    }
}

/// Indices of the deepest level detail coefficients: LH, then HL, then HH, each in raster order.
pub fn detail_positions(width: usize, height: usize, levels: u8) -> Vec<usize> {
    let (w, h) = (width >> levels, height >> levels);
    let subband = move |x0: usize, y0: usize| {
        (0..h).flat_map(move |y| (0..w).map(move |x| (y0 + y) * width + x0 + x))
    };

    subband(w, 0)
        .chain(subband(0, h))
        .chain(subband(w, h))
        .collect()
}
