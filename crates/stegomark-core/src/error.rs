use thiserror::Error;
use zip::result::ZipError;

pub use stegomark_crypto::CryptoError;

#[derive(Error, Debug)]
pub enum StegoError {
    /// The magic stamp or a header field did not match, most likely the image carries no hidden data
    #[error("Invalid stego header, the image does not contain hidden data")]
    InvalidStegoHeader,

    #[error("Unsupported stego header version: {0}")]
    InvalidHeaderVersion(u8),

    /// Represents a wrong or missing password for an encrypted payload
    #[error("Invalid password or corrupted data")]
    InvalidPassword,

    #[error("No plugin was able to extract data from the image")]
    NoValidPlugin,

    #[error(
        "Capacity Error: the image offers {available} bits but {required} bits are required to hide the data"
    )]
    ImageSizeInsufficient { required: u64, available: u64 },

    #[error("Max bits used per channel must be in range 1..=8, got {0}")]
    MaxBitsNotInRange(i64),

    #[error("Max bits used per channel is not a number: {0}")]
    MaxBitsNotNumber(String),

    #[error("No cover image provided")]
    NullImageArgument,

    #[error("No plugin found with the name: {0}")]
    PluginNotFound(String),

    #[error("No plugin specified and none could be selected automatically")]
    NoPluginSpecified,

    #[error("Signature data is not valid")]
    SignatureNotValid,

    #[error("No cover file provided")]
    NoCoverFile,

    #[error("No stego file provided")]
    NoStegoFile,

    #[error("Invalid boolean value '{value}' for '{key}'")]
    InvalidBooleanValue { key: String, value: String },

    #[error("Unknown encryption algorithm: {0}")]
    UnknownEncryptionAlgorithm(String),

    #[error("Plugin {plugin} does not support the operation: {operation}")]
    UnsupportedOperation {
        plugin: &'static str,
        operation: &'static str,
    },

    #[error("Password required for encryption, but none was provided")]
    MissingPassword,

    /// Represents an invalid carrier image media. For example, a broken PNG file
    #[error("Image media is invalid")]
    InvalidImageMedia,

    /// Represents an unsupported carrier media. For example, a TIFF file
    #[error("Media format is not supported")]
    UnsupportedMedia,

    /// Represents a failure when encoding an image file.
    #[error("Image encoding error")]
    ImageEncodingError,

    #[error("Image buffer does not match its dimensions")]
    InvalidImageDimensions,

    #[error("Images differ in dimensions or channel count")]
    ImageDimensionsMismatch,

    #[error("Image is too small for the watermark")]
    ImageTooSmallForWatermark,

    #[error("Watermark decomposition levels must be in range 1..=8, got {0}")]
    InvalidWatermarkLevels(u8),

    /// Represents an error caused by an invalid filename, for example an empty or too long one
    #[error("A file with an invalid file name was provided")]
    InvalidFileName,

    /// Represents an error when compressing or decompressing the payload
    #[error("Error during the payload processing")]
    PayloadProcessingError(#[from] ZipError),

    #[error("Encryption error")]
    EncryptionError(CryptoError),

    /// Represents a failure to read from input.
    #[error("Read error")]
    ReadError { source: std::io::Error },

    /// Represents a failure to write target file.
    #[error("Write error")]
    WriteError { source: std::io::Error },

    /// Represents all other cases of `std::io::Error`.
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

impl StegoError {
    /// errors a caller may recover from by asking for a password and trying again
    pub fn is_password_retryable(&self) -> bool {
        matches!(self, StegoError::InvalidPassword | StegoError::NoValidPlugin)
    }
}

impl From<CryptoError> for StegoError {
    fn from(e: CryptoError) -> Self {
        match e {
            CryptoError::UnknownAlgorithm(name) => StegoError::UnknownEncryptionAlgorithm(name),
            CryptoError::EmptyPassword => StegoError::MissingPassword,
            other => StegoError::EncryptionError(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_retryable() {
        assert!(StegoError::InvalidPassword.is_password_retryable());
        assert!(StegoError::NoValidPlugin.is_password_retryable());
        assert!(!StegoError::InvalidStegoHeader.is_password_retryable());
        assert!(!StegoError::NullImageArgument.is_password_retryable());
    }

    #[test]
    fn test_capacity_message() {
        let e = StegoError::ImageSizeInsufficient {
            required: 100,
            available: 99,
        };
        assert_eq!(
            e.to_string(),
            "Capacity Error: the image offers 99 bits but 100 bits are required to hide the data"
        );
    }

    #[test]
    fn test_crypto_error_conversion() {
        let e: StegoError = CryptoError::UnknownAlgorithm("DES".to_string()).into();
        assert!(matches!(e, StegoError::UnknownEncryptionAlgorithm(name) if name == "DES"));

        let e: StegoError = CryptoError::EmptyPassword.into();
        assert!(matches!(e, StegoError::MissingPassword));
    }
}
