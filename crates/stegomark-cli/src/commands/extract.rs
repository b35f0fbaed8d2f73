use std::path::{Path, PathBuf};

use clap::Args;
use log::{error, warn};
use stegomark_core::batch::{extract_all, parse_file_list};
use stegomark_core::{api, CoverImage, ExtractedPayload, Registry, StegoConfig, StegoError};

use super::write_file;
use crate::cli::ask_for_password;
use crate::CliResult;

const UNTITLED: &str = "untitled";

/// Extracts the hidden file from one or more stego images
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Image that contains the hidden file, several images are separated by ';'
    #[arg(long = "sf", visible_alias = "stegofile", value_name = "stego file(s)")]
    pub stego_files: String,

    /// Folder the files are written to, the working directory by default
    #[arg(long = "xd", visible_alias = "extractdir", value_name = "output folder")]
    pub output_dir: Option<PathBuf>,

    /// Name for the extracted file, the hidden name by default, ignored for several images
    #[arg(long = "xf", visible_alias = "extractfile", value_name = "output file")]
    pub output_file: Option<String>,

    /// Password the data was encrypted with, asked for when needed
    #[arg(short, long, value_name = "password")]
    pub password: Option<String>,
}

impl ExtractArgs {
    pub fn run(self, registry: &Registry, algorithm: Option<&str>) -> CliResult<()> {
        let config = StegoConfig::builder()
            .use_password(self.password.as_deref())
            .build()?;
        let engine = api::prepare(registry)
            .use_algorithm(algorithm)
            .with_config(config);
        let dir = self.output_dir.unwrap_or_else(|| PathBuf::from("."));
        std::fs::create_dir_all(&dir).map_err(|e| StegoError::WriteError { source: e })?;

        match parse_file_list(&self.stego_files).as_slice() {
            [] => Err(StegoError::NoStegoFile),
            [stego_file] => {
                let stego = CoverImage::open(stego_file)?;
                let extracted =
                    engine.extract_with_password_retry(&stego, || ask_for_password(false))?;
                let name = match &self.output_file {
                    Some(name) => name.as_str(),
                    None => extracted.file_name_or(UNTITLED),
                };
                save(&dir, name, &extracted)
            }
            stego_files => {
                if let Some(name) = &self.output_file {
                    warn!("Ignoring {name}, every file keeps its hidden name");
                }
                let mut failure = None;
                for item in extract_all(&engine, stego_files) {
                    let fallback = item
                        .path
                        .file_stem()
                        .and_then(|s| s.to_str())
                        .unwrap_or(UNTITLED)
                        .to_string();
                    let saved = item.result.and_then(|extracted| {
                        save(&dir, extracted.file_name_or(&fallback), &extracted)
                    });
                    if let Err(e) = saved {
                        error!("Nothing extracted from {}: {e}", item.path.display());
                        failure.get_or_insert(e);
                    }
                }
                failure.map_or(Ok(()), Err)
            }
        }
    }
}

/// writes the data below `dir`, hidden names are untrusted so only their last component is kept
fn save(dir: &Path, name: &str, extracted: &ExtractedPayload) -> CliResult<()> {
    let name = Path::new(name)
        .file_name()
        .ok_or(StegoError::InvalidFileName)?;
    let target = dir.join(name);
    write_file(&target, &extracted.data)?;
    println!("{}", target.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_utils::write_cover;
    use std::fs;

    #[test]
    fn test_extract_falls_back_to_untitled() {
        let dir = tempfile::tempdir().unwrap();
        let registry = Registry::with_defaults();
        let cover = CoverImage::open(&write_cover(dir.path(), "cover.png", 30, 30)).unwrap();
        let stego_file = dir.path().join("stego.png");
        api::prepare(&registry)
            .embed(Some(&cover), "", b"nameless")
            .unwrap()
            .save_as(&stego_file)
            .unwrap();

        ExtractArgs {
            stego_files: stego_file.display().to_string(),
            output_dir: Some(dir.path().to_path_buf()),
            output_file: None,
            password: None,
        }
        .run(&registry, None)
        .unwrap();

        assert_eq!(fs::read(dir.path().join(UNTITLED)).unwrap(), b"nameless");
    }

    #[test]
    fn test_extract_strips_directories_from_hidden_names() {
        let dir = tempfile::tempdir().unwrap();
        let registry = Registry::with_defaults();
        let cover = CoverImage::open(&write_cover(dir.path(), "cover.png", 40, 40)).unwrap();
        let stego_file = dir.path().join("stego.png");
        api::prepare(&registry)
            .embed(Some(&cover), "../../escape.txt", b"contained")
            .unwrap()
            .save_as(&stego_file)
            .unwrap();
        let out = dir.path().join("out");

        ExtractArgs {
            stego_files: stego_file.display().to_string(),
            output_dir: Some(out.clone()),
            output_file: None,
            password: None,
        }
        .run(&registry, None)
        .unwrap();

        assert_eq!(fs::read(out.join("escape.txt")).unwrap(), b"contained");
    }

    #[test]
    fn test_extract_with_password_and_output_name() {
        let dir = tempfile::tempdir().unwrap();
        let registry = Registry::with_defaults();
        let cover = CoverImage::open(&write_cover(dir.path(), "cover.png", 40, 40)).unwrap();
        let config = StegoConfig::builder()
            .use_encryption(true)
            .with_password("hunter42")
            .build()
            .unwrap();
        let stego_file = dir.path().join("stego.png");
        api::prepare(&registry)
            .with_config(config)
            .embed(Some(&cover), "plan.txt", b"meet at noon")
            .unwrap()
            .save_as(&stego_file)
            .unwrap();

        let wrong = ExtractArgs {
            stego_files: stego_file.display().to_string(),
            output_dir: Some(dir.path().to_path_buf()),
            output_file: None,
            password: Some("hunter43".to_string()),
        };
        assert!(matches!(
            wrong.run(&registry, None),
            Err(StegoError::InvalidPassword)
        ));

        ExtractArgs {
            stego_files: stego_file.display().to_string(),
            output_dir: Some(dir.path().to_path_buf()),
            output_file: Some("renamed.txt".to_string()),
            password: Some("hunter42".to_string()),
        }
        .run(&registry, None)
        .unwrap();

        assert_eq!(
            fs::read(dir.path().join("renamed.txt")).unwrap(),
            b"meet at noon"
        );
    }

    #[test]
    fn test_extract_several_images() {
        let dir = tempfile::tempdir().unwrap();
        let registry = Registry::with_defaults();
        let mut stego_files = Vec::new();
        for (image, hidden) in [("first.png", "one.txt"), ("second.png", "")] {
            let cover = CoverImage::open(&write_cover(dir.path(), image, 40, 40)).unwrap();
            let stego_file = dir.path().join(format!("stego-{image}"));
            api::prepare(&registry)
                .embed(Some(&cover), hidden, image.as_bytes())
                .unwrap()
                .save_as(&stego_file)
                .unwrap();
            stego_files.push(stego_file.display().to_string());
        }
        let out = dir.path().join("out");

        ExtractArgs {
            stego_files: stego_files.join(";"),
            output_dir: Some(out.clone()),
            output_file: None,
            password: None,
        }
        .run(&registry, None)
        .unwrap();

        assert_eq!(fs::read(out.join("one.txt")).unwrap(), b"first.png");
        assert_eq!(fs::read(out.join("stego-second")).unwrap(), b"second.png");
    }
}
