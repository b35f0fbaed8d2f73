use std::path::PathBuf;

use clap::Args;
use log::info;
use stegomark_core::media::diff_images;
use stegomark_core::CoverImage;

use crate::CliResult;

/// Writes an image that shows where two images of the same size differ
#[derive(Args, Debug)]
pub struct DiffArgs {
    /// The modified image
    #[arg(long = "sf", visible_alias = "stegofile", value_name = "stego file")]
    pub stego_file: PathBuf,

    /// The original image
    #[arg(long = "cf", visible_alias = "coverfile", value_name = "cover file")]
    pub cover_file: PathBuf,

    /// Difference image to write
    #[arg(long = "df", visible_alias = "difffile", value_name = "diff file")]
    pub diff_file: PathBuf,
}

impl DiffArgs {
    pub fn run(self) -> CliResult<()> {
        let stego = CoverImage::open(&self.stego_file)?;
        let cover = CoverImage::open(&self.cover_file)?;

        diff_images(&stego, &cover)?.save_as(&self.diff_file)?;
        info!("Difference written to {}", self.diff_file.display());

        Ok(())
    }
}
