use std::path::PathBuf;

use clap::Args;
use log::{info, warn};
use stegomark_core::batch::{embed_all, parse_file_list};
use stegomark_core::{api, CoverImage, Registry, StegoError};

use super::{finish_batch, read_file};
use crate::cli::{ask_for_password, HidingOptions};
use crate::CliResult;

/// Hides a file in one or more cover images
#[derive(Args, Debug)]
pub struct EmbedArgs {
    /// File to hide
    #[arg(long = "mf", visible_alias = "messagefile", value_name = "message file")]
    pub message_file: PathBuf,

    /// Cover image, several images separated by ';' are overwritten in place
    #[arg(long = "cf", visible_alias = "coverfile", value_name = "cover file(s)")]
    pub cover_files: Option<String>,

    /// Output image, ignored for several covers
    #[arg(long = "sf", visible_alias = "stegofile", value_name = "stego file")]
    pub stego_file: Option<PathBuf>,

    #[command(flatten)]
    pub options: HidingOptions,
}

impl EmbedArgs {
    pub fn run(self, registry: &Registry, algorithm: Option<&str>) -> CliResult<()> {
        let password = if self.options.wants_encryption() && self.options.password.is_none() {
            ask_for_password(true)
        } else {
            None
        };
        let config = self.options.to_config(password.as_deref())?;
        let engine = api::prepare(registry)
            .use_algorithm(algorithm)
            .with_config(config);

        let payload = read_file(&self.message_file)?;
        let file_name = self
            .message_file
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or(StegoError::InvalidFileName)?;
        let covers = self
            .cover_files
            .as_deref()
            .map(parse_file_list)
            .unwrap_or_default();

        match covers.as_slice() {
            [] => Err(StegoError::NoCoverFile),
            [cover] => {
                let stego_file = self.stego_file.ok_or(StegoError::NoStegoFile)?;
                engine.check_stego_file(&stego_file)?;
                let cover = CoverImage::open(cover)?;
                engine
                    .embed(Some(&cover), file_name, &payload)?
                    .save_as(&stego_file)?;
                info!("Hid {file_name} in {}", stego_file.display());
                Ok(())
            }
            covers => {
                if let Some(stego_file) = &self.stego_file {
                    warn!(
                        "Ignoring {}, every cover file gets overwritten",
                        stego_file.display()
                    );
                }
                finish_batch(embed_all(&engine, covers, file_name, &payload))
            }
        }
    }
}
