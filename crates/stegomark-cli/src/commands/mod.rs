use std::path::Path;

use log::{error, info};
use stegomark_core::batch::BatchItem;
use stegomark_core::StegoError;

use crate::CliResult;

pub mod check_mark;
pub mod diff;
pub mod embed;
pub mod embed_mark;
pub mod extract;
pub mod gensig;
pub mod info;

fn read_file(file: &Path) -> CliResult<Vec<u8>> {
    std::fs::read(file).map_err(|e| {
        error!("Error reading file {}: {e}", file.display());
        StegoError::ReadError { source: e }
    })
}

fn write_file(file: &Path, data: &[u8]) -> CliResult<()> {
    std::fs::write(file, data).map_err(|e| {
        error!("Error writing file {}: {e}", file.display());
        StegoError::WriteError { source: e }
    })
}

/// logs the outcome of a batch, the first failure becomes the result
fn finish_batch<T>(items: Vec<BatchItem<T>>) -> CliResult<()> {
    let total = items.len();
    let failure = items.into_iter().find_map(|item| item.result.err());
    match failure {
        None => {
            info!("All {total} images processed");
            Ok(())
        }
        Some(e) => Err(e),
    }
}

#[cfg(test)]
pub(crate) mod test_utils {
    use std::path::{Path, PathBuf};

    use stegomark_core::CoverImage;

    /// writes a textured RGB image as PNG and returns its path
    pub fn write_cover(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
        let buffer = (0..width * height)
            .flat_map(|i| {
                let (x, y) = (i % width, i / width);
                let base = 60 + (x * 90 / width + y * 50 / height) + (i * 7 % 5);
                [base + 15, base + 5, base].map(|v| v as u8)
            })
            .collect();
        let path = dir.join(name);
        CoverImage::new(width, height, 3, buffer)
            .and_then(|cover| cover.save_as(&path))
            .expect("Cannot write cover image");
        path
    }
}
