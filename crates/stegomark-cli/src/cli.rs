use clap::{Args, Parser, Subcommand};
use stegomark_core::config::parse_max_bits;
use stegomark_core::StegoConfig;

use crate::commands::*;
use crate::CliResult;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct CliArgs {
    /// Algorithm to use, selected automatically when omitted
    #[arg(short, long, global = true, value_name = "name")]
    pub algorithm: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Embed(embed::EmbedArgs),
    Extract(extract::ExtractArgs),
    Gensig(gensig::GensigArgs),
    Embedmark(embed_mark::EmbedMarkArgs),
    Checkmark(check_mark::CheckMarkArgs),
    Diff(diff::DiffArgs),
    /// Lists the available algorithms
    Algorithms,
    /// Lists the image formats that can be read
    Readformats,
    /// Lists the image formats that can be written
    Writeformats,
}

/// Options that shape how data is hidden
#[derive(Args, Debug, Default)]
pub struct HidingOptions {
    /// Compress the data before hiding it (default)
    #[arg(short = 'c', long = "compress", conflicts_with = "no_compress")]
    pub compress: bool,

    /// Do not compress the data
    #[arg(short = 'C', long = "nocompress")]
    pub no_compress: bool,

    /// Encrypt the data with the password
    #[arg(short = 'e', long = "encrypt", conflicts_with = "no_encrypt")]
    pub encrypt: bool,

    /// Do not encrypt the data (default)
    #[arg(short = 'E', long = "noencrypt")]
    pub no_encrypt: bool,

    /// Password used to encrypt the data
    #[arg(short, long, value_name = "password")]
    pub password: Option<String>,

    /// Encryption algorithm: AES128, AES256 or XChaCha20Poly1305
    #[arg(short = 'A', long = "cryptalgo", value_name = "algorithm")]
    pub crypt_algorithm: Option<String>,

    /// Bits used per color channel, 1 to 8
    #[arg(long = "maxBitsUsedPerChannel", visible_alias = "max-bits", value_name = "bits")]
    pub max_bits: Option<String>,
}

impl HidingOptions {
    pub fn wants_encryption(&self) -> bool {
        self.encrypt
    }

    /// the config these options describe, `password` overrides the one given on the command line
    pub fn to_config(&self, password: Option<&str>) -> CliResult<StegoConfig> {
        let mut builder = StegoConfig::builder().use_password(password.or(self.password.as_deref()));

        if self.compress || self.no_compress {
            builder = builder.use_compression(self.compress);
        }
        if self.encrypt || self.no_encrypt {
            builder = builder.use_encryption(self.encrypt);
        }
        if let Some(algorithm) = &self.crypt_algorithm {
            builder = builder.with_encryption_algorithm(algorithm.parse()?);
        }
        if let Some(bits) = &self.max_bits {
            builder = builder.with_max_bits_per_channel(parse_max_bits(bits)?);
        }

        builder.build()
    }
}

/// asks interactively for a password, `None` when nothing was entered
pub fn ask_for_password(confirm: bool) -> Option<String> {
    let mut prompt = dialoguer::Password::new().with_prompt("Enter password");
    if confirm {
        prompt = prompt.with_confirmation("Repeat password", "Error: the passwords don't match.");
    }

    prompt
        .allow_empty_password(true)
        .interact()
        .ok()
        .filter(|p| !p.is_empty())
}
