use std::path::PathBuf;

use clap::Args;
use stegomark_core::batch::{check_mark_all, parse_file_list, BatchItem};
use stegomark_core::{api, CoverImage, Registry, Signature, StegoError};

use super::read_file;
use crate::CliResult;

/// Prints how strongly images correlate with a signature, 1.0 is a perfect match
#[derive(Args, Debug)]
pub struct CheckMarkArgs {
    /// Signature file created by gensig
    #[arg(long = "gf", visible_alias = "sigfile", value_name = "signature file")]
    pub signature_file: PathBuf,

    /// Image to check, several images are separated by ';'
    #[arg(long = "sf", visible_alias = "stegofile", value_name = "stego file(s)")]
    pub stego_files: String,
}

impl CheckMarkArgs {
    pub fn run(self, registry: &Registry, algorithm: Option<&str>) -> CliResult<()> {
        for line in self.scores(registry, algorithm)? {
            println!("{line}");
        }
        Ok(())
    }

    /// a bare score for one image, a `name<TAB>score` line per image otherwise
    fn scores(&self, registry: &Registry, algorithm: Option<&str>) -> CliResult<Vec<String>> {
        let signature = Signature::from_bytes(&read_file(&self.signature_file)?)?;
        let engine = api::prepare(registry).use_algorithm(algorithm);
        let images = parse_file_list(&self.stego_files);

        match images.as_slice() {
            [] => Err(StegoError::NoStegoFile),
            [image] => {
                let score = engine.check_mark(&CoverImage::open(image)?, &signature)?;
                Ok(vec![format_score(score)])
            }
            images => Ok(check_mark_all(&engine, images, &signature)
                .iter()
                .map(report_line)
                .collect()),
        }
    }
}

fn format_score(score: f64) -> String {
    format!("{score:.4}")
}

fn report_line(item: &BatchItem<f64>) -> String {
    match &item.result {
        Ok(score) => format!("{}\t{}", item.name(), format_score(*score)),
        Err(e) => format!("{}\t{e}", item.name()),
    }
}
