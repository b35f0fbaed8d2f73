//! Running one operation over many images in parallel.
//!
//! Every item carries its own result, a failing image never stops the others.

use std::path::{Path, PathBuf};

use log::{error, info};
use rayon::prelude::*;

use crate::api::StegoEngine;
use crate::media::payload::ExtractedPayload;
use crate::media::CoverImage;
use crate::watermark::Signature;
use crate::Result;

#[derive(Debug)]
pub struct BatchItem<T> {
    pub path: PathBuf,
    pub result: Result<T>,
}

impl<T> BatchItem<T> {
    /// the file name, used when reporting per image
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Splits a `;` separated list of files, empty entries are dropped.
pub fn parse_file_list(list: &str) -> Vec<PathBuf> {
    list.split(';')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Hides the same payload in every cover, each stego image overwrites its cover file.
///
/// Covers in a lossy format are left untouched and fail with [`crate::StegoError::UnsupportedMedia`].
pub fn embed_all(
    engine: &StegoEngine<'_>,
    covers: &[PathBuf],
    file_name: &str,
    payload: &[u8],
) -> Vec<BatchItem<()>> {
    run(covers, |path| {
        engine.check_stego_file(path)?;
        let cover = CoverImage::open(path)?;
        engine
            .embed(Some(&cover), file_name, payload)?
            .save_as(path)
    })
}

/// The hidden file of every stego image, nothing is written.
pub fn extract_all(
    engine: &StegoEngine<'_>,
    stegos: &[PathBuf],
) -> Vec<BatchItem<ExtractedPayload>> {
    run(stegos, |path| engine.extract(&CoverImage::open(path)?))
}

/// Marks every cover with `signature`, each marked image overwrites its cover file.
pub fn embed_mark_all(
    engine: &StegoEngine<'_>,
    covers: &[PathBuf],
    signature: &Signature,
) -> Vec<BatchItem<()>> {
    run(covers, |path| {
        let cover = CoverImage::open(path)?;
        engine
            .embed_mark(Some(&cover), Some(signature))?
            .save_as(path)
    })
}

/// The watermark correlation of every image.
pub fn check_mark_all(
    engine: &StegoEngine<'_>,
    images: &[PathBuf],
    signature: &Signature,
) -> Vec<BatchItem<f64>> {
    run(images, |path| {
        let image = CoverImage::open(path)?;
        engine.check_mark(&image, signature)
    })
}

fn run<T, F>(paths: &[PathBuf], op: F) -> Vec<BatchItem<T>>
where
    T: Send,
    F: Fn(&Path) -> Result<T> + Sync,
{
    paths
        .par_iter()
        .map(|path| {
            let result = op(path);
            match &result {
                Ok(_) => info!("Processed {}", path.display()),
                Err(e) => error!("Failed to process {}: {e}", path.display()),
            }
            BatchItem {
                path: path.clone(),
                result,
            }
        })
        .collect()
}
