use std::io::{Cursor, Read};

use bitstream_io::{BigEndian, BitRead, BitReader, BitWrite, BitWriter};
use byteorder::{ReadBytesExt, WriteBytesExt};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use sha2::{Digest, Sha256};

use crate::{Result, StegoError};

pub const SIGNATURE_MAGIC: &[u8; 4] = b"SMSG";
pub const SIGNATURE_VERSION: u8 = 1;
pub const SIGNATURE_BITS: usize = 256;

/// The watermark pattern, one bit per group of wavelet coefficients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    bits: Vec<bool>,
}

impl Signature {
    /// Derives a [`SIGNATURE_BITS`] long pattern from `password`, the same password gives the same signature.
    pub fn generate(password: &str) -> Self {
        let seed: [u8; 32] = Sha256::digest(password.as_bytes()).into();
        let mut rng = ChaCha20Rng::from_seed(seed);

        Self {
            bits: (0..SIGNATURE_BITS).map(|_| rng.gen::<bool>()).collect(),
        }
    }

    pub fn from_bits(bits: Vec<bool>) -> Result<Self> {
        if bits.is_empty() || bits.len() > u16::MAX as usize {
            return Err(StegoError::SignatureNotValid);
        }

        Ok(Self { bits })
    }

    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// the signature as +1 / -1 values
    pub fn polarity(&self) -> impl Iterator<Item = f64> + '_ {
        self.bits.iter().map(|b| if *b { 1.0 } else { -1.0 })
    }

    /// serializes into the signature file format: magic, version, bit count, packed bits
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(SIGNATURE_MAGIC.len() + 3 + self.bits.len().div_ceil(8));
        buf.extend_from_slice(SIGNATURE_MAGIC);
        buf.write_u8(SIGNATURE_VERSION)?;
        buf.write_u16::<byteorder::BigEndian>(self.bits.len() as u16)?;

        {
            let mut writer = BitWriter::endian(&mut buf, BigEndian);
            for bit in &self.bits {
                writer.write_bit(*bit)?;
            }
            writer.byte_align()?;
        }

        Ok(buf)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(bytes);
        let invalid = |_| StegoError::SignatureNotValid;

        let mut magic = [0u8; SIGNATURE_MAGIC.len()];
        cursor.read_exact(&mut magic).map_err(invalid)?;
        let version = cursor.read_u8().map_err(invalid)?;
        if &magic != SIGNATURE_MAGIC || version != SIGNATURE_VERSION {
            return Err(StegoError::SignatureNotValid);
        }

        let count = cursor.read_u16::<byteorder::BigEndian>().map_err(invalid)? as usize;
        let packed = &bytes[cursor.position() as usize..];
        if count == 0 || packed.len() != count.div_ceil(8) {
            return Err(StegoError::SignatureNotValid);
        }

        let mut reader = BitReader::endian(Cursor::new(packed), BigEndian);
        let bits = (0..count)
            .map(|_| reader.read_bit())
            .collect::<std::io::Result<Vec<bool>>>()
            .map_err(invalid)?;

        Self::from_bits(bits)
    }
}
