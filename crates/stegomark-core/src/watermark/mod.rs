//! Robust ownership watermarks in the wavelet domain.

pub mod dwt;
pub mod engine;
pub mod signature;

pub use engine::{check_mark, embed_mark, WatermarkOptions};
pub use signature::{Signature, SIGNATURE_BITS};
