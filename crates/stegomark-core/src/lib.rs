//! # Stegomark Core API
//!
//! Two families of algorithms live here, both exposed as plugins of a [`Registry`]:
//! - data hiding ([`plugin::LsbPlugin`]): a file is compressed, optionally encrypted and spread
//!   over the least significant bits of an image, behind a self describing header
//! - watermarking ([`plugin::DwtPlugin`]): a password derived signature is embedded into the
//!   wavelet coefficients of the image luminance and later correlated
//!
//! # Usage Examples
//!
//! ## Hide data inside an image
//!
//! ```rust
//! use stegomark_core::{CoverImage, Registry, StegoConfig};
//!
//! let registry = Registry::with_defaults();
//! let cover = CoverImage::new(64, 64, 3, vec![127; 64 * 64 * 3]).unwrap();
//! let config = StegoConfig::builder()
//!     .use_encryption(true)
//!     .with_password("SuperSecret42")
//!     .build()
//!     .unwrap();
//!
//! let stego = stegomark_core::api::prepare(&registry)
//!     .with_config(config.clone())
//!     .embed(Some(&cover), "hello.txt", b"Hello, World!")
//!     .expect("Failed to hide data in image");
//!
//! let extracted = stegomark_core::api::prepare(&registry)
//!     .with_config(config)
//!     .extract(&stego)
//!     .expect("Failed to extract data from image");
//! assert_eq!(extracted.data, b"Hello, World!");
//! ```
//!
//! ## Watermark an image
//!
//! ```rust
//! use stegomark_core::watermark::{check_mark, embed_mark, Signature, WatermarkOptions};
//! use stegomark_core::CoverImage;
//!
//! let cover = CoverImage::new(64, 64, 1, (0..64 * 64).map(|i| (i % 64) as u8 + 60).collect()).unwrap();
//! let signature = Signature::generate("owner@example.com");
//! let options = WatermarkOptions::default();
//!
//! let marked = embed_mark(&cover, &signature, &options).unwrap();
//! let score = check_mark(&marked, &signature, &options).unwrap();
//! assert!(score > 0.5);
//! ```

#![warn(clippy::redundant_else)]

pub mod api;
pub mod batch;
pub mod config;
pub mod error;
pub mod media;
pub mod plugin;
pub mod result;
pub mod watermark;

pub use crate::api::StegoEngine;
pub use crate::config::{EncryptionAlgorithm, Password, StegoConfig};
pub use crate::error::StegoError;
pub use crate::media::payload::ExtractedPayload;
pub use crate::media::CoverImage;
pub use crate::plugin::{Plugin, PluginCategory, PluginDescriptor, Registry, StegoPlugin};
pub use crate::result::Result;
pub use crate::watermark::{Signature, WatermarkOptions};
