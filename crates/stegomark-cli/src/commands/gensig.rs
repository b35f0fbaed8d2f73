use std::path::PathBuf;

use clap::Args;
use log::info;
use stegomark_core::{api, Registry, StegoConfig};

use super::write_file;
use crate::cli::ask_for_password;
use crate::CliResult;

/// Generates a watermark signature from a password
#[derive(Args, Debug)]
pub struct GensigArgs {
    /// Signature file to write
    #[arg(long = "gf", visible_alias = "sigfile", value_name = "signature file")]
    pub signature_file: PathBuf,

    /// Password the signature is derived from, asked for when missing
    #[arg(short, long, value_name = "password")]
    pub password: Option<String>,
}

impl GensigArgs {
    pub fn run(self, registry: &Registry, algorithm: Option<&str>) -> CliResult<()> {
        let password = self.password.or_else(|| ask_for_password(true));
        let config = StegoConfig::builder()
            .use_password(password.as_deref())
            .build()?;

        let signature = api::prepare(registry)
            .use_algorithm(algorithm)
            .with_config(config)
            .generate_signature()?;
        write_file(&self.signature_file, &signature.to_bytes()?)?;
        info!(
            "Signature of {} bits written to {}",
            signature.len(),
            self.signature_file.display()
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stegomark_core::{Signature, StegoError};

    #[test]
    fn test_gensig_writes_a_readable_signature() {
        let dir = tempfile::tempdir().unwrap();
        let signature_file = dir.path().join("owner.sig");

        GensigArgs {
            signature_file: signature_file.clone(),
            password: Some("owner".to_string()),
        }
        .run(&Registry::with_defaults(), None)
        .unwrap();

        let restored = Signature::from_bytes(&std::fs::read(signature_file).unwrap()).unwrap();
        assert_eq!(restored, Signature::generate("owner"));
    }

    #[test]
    fn test_gensig_rejects_a_data_hiding_algorithm() {
        let dir = tempfile::tempdir().unwrap();

        let result = GensigArgs {
            signature_file: dir.path().join("owner.sig"),
            password: Some("owner".to_string()),
        }
        .run(&Registry::with_defaults(), Some("lsb"));

        assert!(matches!(
            result,
            Err(StegoError::UnsupportedOperation { plugin: "LSB", .. })
        ));
        assert!(!dir.path().join("owner.sig").exists());
    }
}
