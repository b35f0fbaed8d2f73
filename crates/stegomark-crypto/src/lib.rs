//! # Payload encryption
//!
//! Password based symmetric encryption used by `stegomark-core` for hidden payloads.
//!
//! Key material is derived with argon2id from the password and a fixed, format defined salt.
//! Hiding and unveiling only need to share the password, there is no salt stored next to the
//! cipher data.
//!
//! The iv or nonce is synthetic: a keyed HMAC over the plain data, stored in front of the cipher
//! data. Equal inputs encrypt to equal output, different plain data never shares an iv or nonce.
//!
//! Supported algorithms:
//! - AES-128-CBC and AES-256-CBC with PKCS#7 padding, authenticated by a truncated HMAC-SHA256 tag
//! - XChaCha20-Poly1305

use std::fmt::{self, Debug, Display, Formatter};
use std::str::FromStr;

use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use argon2::{Argon2, ParamsBuilder};
use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{Key, XChaCha20Poly1305, XNonce};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use zeroize::Zeroize;

pub mod error;

pub use crate::error::CryptoError;

pub type Result<T> = std::result::Result<T, CryptoError>;

type Aes128CbcEnc = cbc::Encryptor<aes::Aes128>;
type Aes128CbcDec = cbc::Decryptor<aes::Aes128>;
type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;
type HmacSha256 = Hmac<Sha256>;

const CIPHER_KEY_LEN: usize = 32;
const MAC_KEY_LEN: usize = 32;
const IV_KEY_LEN: usize = 32;
const KEY_MATERIAL_LEN: usize = CIPHER_KEY_LEN + MAC_KEY_LEN + IV_KEY_LEN;

const NONCE_LEN: usize = 24;

const AES_BLOCK_LEN: usize = 16;
const AES_TAG_LEN: usize = 16;
const POLY1305_TAG_LEN: usize = 16;

/// argon2 needs at least 8 bytes of salt, the algorithm name is appended to it
const KDF_SALT: &[u8] = b"stegomark.payload-key.v1";
const KDF_MEMORY_KIB: u32 = 4096;
const KDF_ITERATIONS: u32 = 3;

/// Symmetric algorithms a payload can be encrypted with.
///
/// The numeric ids are part of the stego header format and must never change.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncryptionAlgorithm {
    #[default]
    Aes128,
    Aes256,
    XChaCha20Poly1305,
}

impl EncryptionAlgorithm {
    pub const ALL: [EncryptionAlgorithm; 3] = [
        EncryptionAlgorithm::Aes128,
        EncryptionAlgorithm::Aes256,
        EncryptionAlgorithm::XChaCha20Poly1305,
    ];

    pub fn id(self) -> u8 {
        match self {
            EncryptionAlgorithm::Aes128 => 1,
            EncryptionAlgorithm::Aes256 => 2,
            EncryptionAlgorithm::XChaCha20Poly1305 => 3,
        }
    }

    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.id() == id)
    }

    pub fn name(self) -> &'static str {
        match self {
            EncryptionAlgorithm::Aes128 => "AES128",
            EncryptionAlgorithm::Aes256 => "AES256",
            EncryptionAlgorithm::XChaCha20Poly1305 => "XChaCha20Poly1305",
        }
    }

    fn cipher_key_len(self) -> usize {
        match self {
            EncryptionAlgorithm::Aes128 => 16,
            EncryptionAlgorithm::Aes256 | EncryptionAlgorithm::XChaCha20Poly1305 => 32,
        }
    }
}

impl Display for EncryptionAlgorithm {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EncryptionAlgorithm {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CryptoError::UnknownAlgorithm(s.to_string()))
    }
}

/// Cipher key, mac key and iv key for one algorithm, wiped from memory on drop.
pub struct KeyMaterial {
    algorithm: EncryptionAlgorithm,
    bytes: [u8; KEY_MATERIAL_LEN],
}

impl KeyMaterial {
    pub fn algorithm(&self) -> EncryptionAlgorithm {
        self.algorithm
    }

    fn cipher_key(&self) -> &[u8] {
        &self.bytes[..self.algorithm.cipher_key_len()]
    }

    fn mac_key(&self) -> &[u8] {
        &self.bytes[CIPHER_KEY_LEN..CIPHER_KEY_LEN + MAC_KEY_LEN]
    }

    fn iv_key(&self) -> &[u8] {
        &self.bytes[CIPHER_KEY_LEN + MAC_KEY_LEN..]
    }
}

impl Debug for KeyMaterial {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "KeyMaterial({}, ***)", self.algorithm)
    }
}

impl Drop for KeyMaterial {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

/// derive all key material for `algorithm` from `password`, always the same output for the same input
pub fn derive_key(password: &str, algorithm: EncryptionAlgorithm) -> Result<KeyMaterial> {
    if password.is_empty() {
        return Err(CryptoError::EmptyPassword);
    }

    let mut salt = Vec::with_capacity(KDF_SALT.len() + 24);
    salt.extend_from_slice(KDF_SALT);
    salt.extend_from_slice(algorithm.name().as_bytes());

    let mut bytes = [0u8; KEY_MATERIAL_LEN];
    deterministic_argon()?
        .hash_password_into(password.as_bytes(), &salt, &mut bytes)
        .map_err(CryptoError::KeyDerivationError)?;

    Ok(KeyMaterial { algorithm, bytes })
}

/// encrypt `data` with the algorithm the key material was derived for
///
/// Output is `iv | cipher data | tag` for AES and `nonce | cipher data` for XChaCha20Poly1305.
pub fn encrypt(data: &[u8], key: &KeyMaterial) -> Result<Vec<u8>> {
    match key.algorithm {
        EncryptionAlgorithm::Aes128 => {
            let iv = synthetic_iv(data, key, AES_BLOCK_LEN)?;
            let cipher_data = Aes128CbcEnc::new_from_slices(key.cipher_key(), &iv)
                .map_err(|_| CryptoError::InvalidKeyLength)?
                .encrypt_padded_vec_mut::<Pkcs7>(data);
            append_tag(prepend(iv, cipher_data), key)
        }
        EncryptionAlgorithm::Aes256 => {
            let iv = synthetic_iv(data, key, AES_BLOCK_LEN)?;
            let cipher_data = Aes256CbcEnc::new_from_slices(key.cipher_key(), &iv)
                .map_err(|_| CryptoError::InvalidKeyLength)?
                .encrypt_padded_vec_mut::<Pkcs7>(data);
            append_tag(prepend(iv, cipher_data), key)
        }
        EncryptionAlgorithm::XChaCha20Poly1305 => {
            let nonce = synthetic_iv(data, key, NONCE_LEN)?;
            let encryptor = XChaCha20Poly1305::new(Key::from_slice(key.cipher_key()));
            let cipher_data = encryptor
                .encrypt(XNonce::from_slice(&nonce), data)
                .map_err(CryptoError::EncryptionError)?;
            Ok(prepend(nonce, cipher_data))
        }
    }
}

/// decrypt `data`, any authentication or padding failure ends up as [`CryptoError::DecryptionError`]
pub fn decrypt(data: &[u8], key: &KeyMaterial) -> Result<Vec<u8>> {
    match key.algorithm {
        EncryptionAlgorithm::Aes128 => {
            let (iv, cipher_data) = verify_tag(data, key)?.split_at(AES_BLOCK_LEN);
            Aes128CbcDec::new_from_slices(key.cipher_key(), iv)
                .map_err(|_| CryptoError::InvalidKeyLength)?
                .decrypt_padded_vec_mut::<Pkcs7>(cipher_data)
                .map_err(|_| CryptoError::DecryptionError)
        }
        EncryptionAlgorithm::Aes256 => {
            let (iv, cipher_data) = verify_tag(data, key)?.split_at(AES_BLOCK_LEN);
            Aes256CbcDec::new_from_slices(key.cipher_key(), iv)
                .map_err(|_| CryptoError::InvalidKeyLength)?
                .decrypt_padded_vec_mut::<Pkcs7>(cipher_data)
                .map_err(|_| CryptoError::DecryptionError)
        }
        EncryptionAlgorithm::XChaCha20Poly1305 => {
            if data.len() < NONCE_LEN + POLY1305_TAG_LEN {
                return Err(CryptoError::MalformedCipherData);
            }
            let (nonce, cipher_data) = data.split_at(NONCE_LEN);
            let decryptor = XChaCha20Poly1305::new(Key::from_slice(key.cipher_key()));
            decryptor
                .decrypt(XNonce::from_slice(nonce), cipher_data)
                .map_err(|_| CryptoError::DecryptionError)
        }
    }
}

/// number of bytes `encrypt` produces for `plain_len` bytes of input
pub fn encrypted_len(plain_len: usize, algorithm: EncryptionAlgorithm) -> usize {
    match algorithm {
        EncryptionAlgorithm::Aes128 | EncryptionAlgorithm::Aes256 => {
            AES_BLOCK_LEN + (plain_len / AES_BLOCK_LEN + 1) * AES_BLOCK_LEN + AES_TAG_LEN
        }
        EncryptionAlgorithm::XChaCha20Poly1305 => NONCE_LEN + plain_len + POLY1305_TAG_LEN,
    }
}

fn deterministic_argon<'key>() -> Result<Argon2<'key>> {
    let params = ParamsBuilder::new()
        .m_cost(KDF_MEMORY_KIB)
        .t_cost(KDF_ITERATIONS)
        .p_cost(1)
        .output_len(KEY_MATERIAL_LEN)
        .build()
        .map_err(CryptoError::KeyDerivationParamError)?;

    Ok(Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        params,
    ))
}

/// the first `len` bytes of HMAC-SHA256 over the algorithm id and the plain data
fn synthetic_iv(data: &[u8], key: &KeyMaterial, len: usize) -> Result<Vec<u8>> {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(key.iv_key())
        .map_err(|_| CryptoError::InvalidKeyLength)?;
    mac.update(&[key.algorithm.id()]);
    mac.update(data);

    Ok(mac.finalize().into_bytes()[..len].to_vec())
}

fn prepend(mut head: Vec<u8>, tail: Vec<u8>) -> Vec<u8> {
    head.extend_from_slice(&tail);
    head
}

fn mac_for(cipher_data: &[u8], key: &KeyMaterial) -> Result<HmacSha256> {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(key.mac_key())
        .map_err(|_| CryptoError::InvalidKeyLength)?;
    mac.update(&[key.algorithm.id()]);
    mac.update(cipher_data);

    Ok(mac)
}

fn append_tag(mut cipher_data: Vec<u8>, key: &KeyMaterial) -> Result<Vec<u8>> {
    let tag = mac_for(&cipher_data, key)?.finalize().into_bytes();
    cipher_data.extend_from_slice(&tag[..AES_TAG_LEN]);

    Ok(cipher_data)
}

fn verify_tag<'d>(data: &'d [u8], key: &KeyMaterial) -> Result<&'d [u8]> {
    // iv, at least one block, tag
    if data.len() < 2 * AES_BLOCK_LEN + AES_TAG_LEN
        || (data.len() - AES_TAG_LEN) % AES_BLOCK_LEN != 0
    {
        return Err(CryptoError::MalformedCipherData);
    }
    let (cipher_data, tag) = data.split_at(data.len() - AES_TAG_LEN);
    mac_for(cipher_data, key)?
        .verify_truncated_left(tag)
        .map_err(|_| CryptoError::DecryptionError)?;

    Ok(cipher_data)
}
