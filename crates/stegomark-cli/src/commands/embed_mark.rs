use std::path::PathBuf;

use clap::Args;
use log::{info, warn};
use stegomark_core::batch::{embed_mark_all, parse_file_list};
use stegomark_core::{api, CoverImage, Registry, Signature, StegoError};

use super::{finish_batch, read_file};
use crate::CliResult;

/// Watermarks one or more images with a signature
#[derive(Args, Debug)]
pub struct EmbedMarkArgs {
    /// Signature file created by gensig
    #[arg(long = "gf", visible_alias = "sigfile", value_name = "signature file")]
    pub signature_file: PathBuf,

    /// Image to mark, several images separated by ';' are overwritten in place
    #[arg(long = "cf", visible_alias = "coverfile", value_name = "cover file(s)")]
    pub cover_files: Option<String>,

    /// Output image, ignored for several covers
    #[arg(long = "sf", visible_alias = "stegofile", value_name = "stego file")]
    pub stego_file: Option<PathBuf>,
}

impl EmbedMarkArgs {
    pub fn run(self, registry: &Registry, algorithm: Option<&str>) -> CliResult<()> {
        let signature = Signature::from_bytes(&read_file(&self.signature_file)?)?;
        let engine = api::prepare(registry).use_algorithm(algorithm);
        let covers = self
            .cover_files
            .as_deref()
            .map(parse_file_list)
            .unwrap_or_default();

        match covers.as_slice() {
            [] => Err(StegoError::NoCoverFile),
            [cover] => {
                let stego_file = self.stego_file.ok_or(StegoError::NoStegoFile)?;
                let cover = CoverImage::open(cover)?;
                engine
                    .embed_mark(Some(&cover), Some(&signature))?
                    .save_as(&stego_file)?;
                info!("Watermarked image written to {}", stego_file.display());
                Ok(())
            }
            covers => {
                if let Some(stego_file) = &self.stego_file {
                    warn!(
                        "Ignoring {}, every cover file gets overwritten",
                        stego_file.display()
                    );
                }
                finish_batch(embed_mark_all(&engine, covers, &signature))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_utils::write_cover;

    #[test]
    fn test_embed_mark_refuses_a_broken_signature_file() {
        let dir = tempfile::tempdir().unwrap();
        let signature_file = dir.path().join("broken.sig");
        std::fs::write(&signature_file, b"not a signature").unwrap();
        let cover = write_cover(dir.path(), "cover.png", 64, 64);

        let result = EmbedMarkArgs {
            signature_file,
            cover_files: Some(cover.display().to_string()),
            stego_file: Some(dir.path().join("marked.png")),
        }
        .run(&Registry::with_defaults(), None);

        assert!(matches!(result, Err(StegoError::SignatureNotValid)));
    }

    #[test]
    fn test_embed_mark_needs_a_cover() {
        let dir = tempfile::tempdir().unwrap();
        let signature_file = dir.path().join("owner.sig");
        std::fs::write(
            &signature_file,
            Signature::generate("owner").to_bytes().unwrap(),
        )
        .unwrap();

        let result = EmbedMarkArgs {
            signature_file,
            cover_files: None,
            stego_file: None,
        }
        .run(&Registry::with_defaults(), None);

        assert!(matches!(result, Err(StegoError::NoCoverFile)));
    }
}
