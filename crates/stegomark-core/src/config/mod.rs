//! Configuration of a hide or extract operation.
//!
//! A [`StegoConfig`] is immutable, it is either built from [`StegoConfig::builder`] or parsed
//! from a key/value property map with [`StegoConfig::from_properties`].

mod password;

use log::debug;

pub use password::Password;
pub use stegomark_crypto::EncryptionAlgorithm;

use crate::{Result, StegoError};

pub const DEFAULT_MAX_BITS_PER_CHANNEL: u8 = 3;

pub const KEY_USE_COMPRESSION: &str = "useCompression";
pub const KEY_USE_ENCRYPTION: &str = "useEncryption";
pub const KEY_PASSWORD: &str = "password";
pub const KEY_ENCRYPTION_ALGORITHM: &str = "encryptionAlgorithm";
pub const KEY_MAX_BITS_PER_CHANNEL: &str = "maxBitsUsedPerChannel";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StegoConfig {
    use_compression: bool,
    use_encryption: bool,
    password: Password,
    encryption_algorithm: EncryptionAlgorithm,
    max_bits_per_channel: u8,
}

impl Default for StegoConfig {
    fn default() -> Self {
        Self {
            use_compression: true,
            use_encryption: false,
            password: Password::default(),
            encryption_algorithm: EncryptionAlgorithm::default(),
            max_bits_per_channel: DEFAULT_MAX_BITS_PER_CHANNEL,
        }
    }
}

impl StegoConfig {
    pub fn builder() -> StegoConfigBuilder {
        StegoConfigBuilder::default()
    }

    /// Parses a property map, for example a `.properties` file or command line options.
    ///
    /// Unknown keys are ignored. Booleans accept `true/false`, `y/n` and `1/0` in any case.
    pub fn from_properties<I, K, V>(properties: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut builder = Self::builder();
        for (key, value) in properties {
            let (key, value) = (key.as_ref(), value.as_ref().trim());
            builder = match key {
                KEY_USE_COMPRESSION => builder.use_compression(parse_bool(key, value)?),
                KEY_USE_ENCRYPTION => builder.use_encryption(parse_bool(key, value)?),
                KEY_PASSWORD => builder.use_password(Some(value)),
                KEY_ENCRYPTION_ALGORITHM => builder.with_encryption_algorithm(value.parse()?),
                KEY_MAX_BITS_PER_CHANNEL => builder.with_max_bits_per_channel(parse_max_bits(value)?),
                _ => {
                    debug!("Ignoring unknown config key {key}");
                    builder
                }
            };
        }

        builder.build()
    }

    pub fn use_compression(&self) -> bool {
        self.use_compression
    }

    pub fn use_encryption(&self) -> bool {
        self.use_encryption
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_str()
    }

    pub fn encryption_algorithm(&self) -> EncryptionAlgorithm {
        self.encryption_algorithm
    }

    pub fn max_bits_per_channel(&self) -> u8 {
        self.max_bits_per_channel
    }

    /// a copy of this config that carries the given password
    pub fn with_password(&self, password: &str) -> Self {
        Self {
            password: password.into(),
            ..self.clone()
        }
    }
}

#[derive(Debug, Default)]
pub struct StegoConfigBuilder {
    use_compression: Option<bool>,
    use_encryption: Option<bool>,
    password: Password,
    encryption_algorithm: Option<EncryptionAlgorithm>,
    max_bits_per_channel: Option<i64>,
}

impl StegoConfigBuilder {
    pub fn use_compression(mut self, enabled: bool) -> Self {
        self.use_compression = Some(enabled);
        self
    }

    pub fn use_encryption(mut self, enabled: bool) -> Self {
        self.use_encryption = Some(enabled);
        self
    }

    /// Set the password
    pub fn with_password(mut self, password: &str) -> Self {
        self.password = password.into();
        self
    }

    /// Set the password
    /// If `None` is passed, no password will be used
    pub fn use_password<S: AsRef<str>>(mut self, password: Option<S>) -> Self {
        self.password = password.map(|s| s.as_ref().to_string()).into();
        self
    }

    pub fn with_encryption_algorithm(mut self, algorithm: EncryptionAlgorithm) -> Self {
        self.encryption_algorithm = Some(algorithm);
        self
    }

    pub fn with_max_bits_per_channel(mut self, bits: impl Into<i64>) -> Self {
        self.max_bits_per_channel = Some(bits.into());
        self
    }

    /// validates all settings at once
    pub fn build(self) -> Result<StegoConfig> {
        let defaults = StegoConfig::default();

        let max_bits_per_channel = match self.max_bits_per_channel {
            Some(bits @ 1..=8) => bits as u8,
            Some(bits) => return Err(StegoError::MaxBitsNotInRange(bits)),
            None => defaults.max_bits_per_channel,
        };

        let use_encryption = self.use_encryption.unwrap_or(defaults.use_encryption);
        if use_encryption && !self.password.is_set() {
            return Err(StegoError::MissingPassword);
        }

        Ok(StegoConfig {
            use_compression: self.use_compression.unwrap_or(defaults.use_compression),
            use_encryption,
            password: self.password,
            encryption_algorithm: self
                .encryption_algorithm
                .unwrap_or(defaults.encryption_algorithm),
            max_bits_per_channel,
        })
    }
}

pub fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "y" | "1" => Ok(true),
        "false" | "n" | "0" => Ok(false),
        _ => Err(StegoError::InvalidBooleanValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

pub fn parse_max_bits(value: &str) -> Result<i64> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| StegoError::MaxBitsNotNumber(value.to_string()))
}
