use log::debug;
use stegomark_crypto::{decrypt, derive_key, encrypt};

use super::compression::{compress, decompress};
use super::header::StegoHeader;
use super::ExtractedPayload;
use crate::config::StegoConfig;
use crate::{Result, StegoError};

/// seeds the bit distribution whenever no password is involved
pub const DEFAULT_SEED: &[u8] = b"stegomark.default-distribution-seed";

/// A payload after compression and encryption, ready to be hidden behind its header.
#[derive(Debug, Clone)]
pub struct PreparedPayload {
    pub header: StegoHeader,
    pub data: Vec<u8>,
}

impl PreparedPayload {
    /// header and payload bits together
    pub fn total_bits(&self) -> u64 {
        self.header.encoded_bits() + self.data.len() as u64 * 8
    }
}

/// compress, then encrypt, then describe the result in a header
pub fn prepare(file_name: &str, payload: &[u8], config: &StegoConfig) -> Result<PreparedPayload> {
    if file_name.len() > u16::MAX as usize {
        return Err(StegoError::InvalidFileName);
    }

    let mut data = if config.use_compression() {
        compress(payload)?
    } else {
        payload.to_vec()
    };

    let encryption = if config.use_encryption() {
        let password = config.password().ok_or(StegoError::MissingPassword)?;
        let key = derive_key(password, config.encryption_algorithm())?;
        data = encrypt(&data, &key)?;
        Some(config.encryption_algorithm())
    } else {
        None
    };

    let payload_length = u32::try_from(data.len()).map_err(|_| StegoError::ImageSizeInsufficient {
        required: data.len() as u64 * 8,
        available: u32::MAX as u64 * 8,
    })?;
    debug!(
        "Prepared {} payload bytes into {payload_length} bytes (compression: {}, encryption: {encryption:?})",
        payload.len(),
        config.use_compression()
    );

    Ok(PreparedPayload {
        header: StegoHeader {
            channel_bits_used: config.max_bits_per_channel(),
            compression: config.use_compression(),
            encryption,
            file_name: file_name.to_string(),
            payload_length,
        },
        data,
    })
}

/// Undoes [`prepare`] for the data found behind `header`.
///
/// Without a password, or with the wrong one, an encrypted payload yields [`StegoError::InvalidPassword`].
pub fn restore(header: &StegoHeader, data: Vec<u8>, config: &StegoConfig) -> Result<ExtractedPayload> {
    let data = match header.encryption {
        Some(algorithm) => {
            let password = config.password().ok_or(StegoError::InvalidPassword)?;
            let key = derive_key(password, algorithm)?;
            decrypt(&data, &key).map_err(|e| {
                debug!("Decryption failed: {e}");
                StegoError::InvalidPassword
            })?
        }
        None => data,
    };

    let data = if header.compression {
        decompress(&data)?
    } else {
        data
    };

    Ok(ExtractedPayload {
        file_name: header.file_name.clone(),
        data,
    })
}

/// The seed the payload bits are distributed with.
///
/// Encrypted payloads are spread with the password, everything else with [`DEFAULT_SEED`].
pub fn distribution_seed(encrypted: bool, config: &StegoConfig) -> Result<&[u8]> {
    if encrypted {
        config
            .password()
            .map(str::as_bytes)
            .ok_or(StegoError::InvalidPassword)
    } else {
        Ok(DEFAULT_SEED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EncryptionAlgorithm;

    const TEXT: &[u8] = b"HELLOWRLD HELLOWRLD HELLOWRLD HELLOWRLD HELLOWRLD";

    fn encrypted_config(password: &str) -> StegoConfig {
        StegoConfig::builder()
            .use_encryption(true)
            .with_password(password)
            .with_encryption_algorithm(EncryptionAlgorithm::XChaCha20Poly1305)
            .build()
            .unwrap()
    }

    #[test]
    fn test_plain_payload_is_untouched() {
        let config = StegoConfig::builder()
            .use_compression(false)
            .build()
            .unwrap();
        let prepared = prepare("note.txt", TEXT, &config).unwrap();

        assert_eq!(prepared.data, TEXT);
        assert_eq!(prepared.header.payload_length as usize, TEXT.len());
        assert_eq!(prepared.header.encryption, None);
        assert_eq!(prepared.header.channel_bits_used, 3);
        assert_eq!(
            prepared.total_bits(),
            (prepared.header.encoded_len() + TEXT.len()) as u64 * 8
        );
    }

    #[test]
    fn test_payload_length_is_post_transform() {
        let config = encrypted_config("hunter42");
        let prepared = prepare("note.txt", TEXT, &config).unwrap();

        assert_eq!(prepared.header.payload_length as usize, prepared.data.len());
        assert!(prepared.header.compression);
        assert_eq!(
            prepared.header.encryption,
            Some(EncryptionAlgorithm::XChaCha20Poly1305)
        );

        let restored = restore(&prepared.header, prepared.data, &config).unwrap();
        assert_eq!(restored.data, TEXT);
        assert_eq!(restored.file_name, "note.txt");
    }

    #[test]
    fn test_wrong_or_missing_password() {
        let prepared = prepare("", TEXT, &encrypted_config("hunter42")).unwrap();

        assert!(matches!(
            restore(&prepared.header, prepared.data.clone(), &encrypted_config("hunter43")),
            Err(StegoError::InvalidPassword)
        ));
        assert!(matches!(
            restore(&prepared.header, prepared.data, &StegoConfig::default()),
            Err(StegoError::InvalidPassword)
        ));
    }

    #[test]
    fn test_distribution_seed() {
        let config = encrypted_config("hunter42");

        assert_eq!(distribution_seed(true, &config).unwrap(), b"hunter42");
        assert_eq!(distribution_seed(false, &config).unwrap(), DEFAULT_SEED);
        assert!(matches!(
            distribution_seed(true, &StegoConfig::default()),
            Err(StegoError::InvalidPassword)
        ));
    }
}
