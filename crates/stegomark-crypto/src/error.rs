pub use argon2::Error as Argon2Error;
pub use chacha20poly1305::Error as Chacha20Poly1305Error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Password must not be empty")]
    EmptyPassword,

    #[error("Unknown encryption algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("Key derivation error")]
    KeyDerivationError(Argon2Error),

    #[error("Key derivation parameter error")]
    KeyDerivationParamError(Argon2Error),

    #[error("Invalid key or iv length")]
    InvalidKeyLength,

    #[error("Encryption error")]
    EncryptionError(Chacha20Poly1305Error),

    #[error("Decryption error")]
    DecryptionError,

    /// The cipher data is shorter than the algorithm overhead or not block aligned
    #[error("Cipher data is malformed")]
    MalformedCipherData,
}
