use std::io::{ErrorKind, Read};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use log::debug;

use crate::config::EncryptionAlgorithm;
use crate::{Result, StegoError};

pub const MAGIC_STAMP: &[u8; 5] = b"SMARK";
pub const HEADER_VERSION: u8 = 1;

const FLAG_COMPRESSION: u8 = 1 << 0;
const FLAG_ENCRYPTION: u8 = 1 << 1;
const KNOWN_FLAGS: u8 = FLAG_COMPRESSION | FLAG_ENCRYPTION;

/// size of all fixed fields, excluding the optional algorithm id and the file name
const FIXED_LEN: usize = MAGIC_STAMP.len() + 1 + 1 + 1 + 2 + 4;

/// The self describing header that precedes every hidden payload.
///
/// Layout, big endian:
///
/// | field             | bytes | note                                  |
/// |-------------------|-------|---------------------------------------|
/// | magic stamp       | 5     | `SMARK`                               |
/// | version           | 1     |                                       |
/// | channel bits used | 1     | 1..=8                                 |
/// | flags             | 1     | bit0 compression, bit1 encryption     |
/// | algorithm id      | 0/1   | only present with encryption          |
/// | file name length  | 2     |                                       |
/// | file name         | n     | utf-8                                 |
/// | payload length    | 4     | bytes actually hidden after the header|
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StegoHeader {
    pub channel_bits_used: u8,
    pub compression: bool,
    pub encryption: Option<EncryptionAlgorithm>,
    pub file_name: String,
    pub payload_length: u32,
}

impl StegoHeader {
    pub fn version(&self) -> u8 {
        HEADER_VERSION
    }

    /// number of bytes `encode` produces
    pub fn encoded_len(&self) -> usize {
        FIXED_LEN + usize::from(self.encryption.is_some()) + self.file_name.len()
    }

    pub fn encoded_bits(&self) -> u64 {
        self.encoded_len() as u64 * 8
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        let name_len = u16::try_from(self.file_name.len()).map_err(|_| StegoError::InvalidFileName)?;
        let mut buf = Vec::with_capacity(self.encoded_len());

        buf.extend_from_slice(MAGIC_STAMP);
        buf.write_u8(HEADER_VERSION)?;
        buf.write_u8(self.channel_bits_used)?;
        buf.write_u8(self.flags())?;
        if let Some(algorithm) = self.encryption {
            buf.write_u8(algorithm.id())?;
        }
        buf.write_u16::<BigEndian>(name_len)?;
        buf.extend_from_slice(self.file_name.as_bytes());
        buf.write_u32::<BigEndian>(self.payload_length)?;

        Ok(buf)
    }

    /// Reads exactly one header from `reader`, consuming no byte past it.
    pub fn decode<R: Read + ?Sized>(reader: &mut R) -> Result<Self> {
        let mut magic = [0u8; MAGIC_STAMP.len()];
        reader.read_exact(&mut magic).map_err(header_read_error)?;
        if &magic != MAGIC_STAMP {
            debug!("Magic stamp mismatch: {magic:02x?}");
            return Err(StegoError::InvalidStegoHeader);
        }

        let version = reader.read_u8().map_err(header_read_error)?;
        if version != HEADER_VERSION {
            return Err(StegoError::InvalidHeaderVersion(version));
        }

        let channel_bits_used = reader.read_u8().map_err(header_read_error)?;
        if !(1..=8).contains(&channel_bits_used) {
            return Err(StegoError::InvalidStegoHeader);
        }

        let flags = reader.read_u8().map_err(header_read_error)?;
        if flags & !KNOWN_FLAGS != 0 {
            return Err(StegoError::InvalidStegoHeader);
        }

        let encryption = if flags & FLAG_ENCRYPTION != 0 {
            let id = reader.read_u8().map_err(header_read_error)?;
            Some(EncryptionAlgorithm::from_id(id).ok_or(StegoError::InvalidStegoHeader)?)
        } else {
            None
        };

        let name_len = reader.read_u16::<BigEndian>().map_err(header_read_error)?;
        let mut name = vec![0u8; name_len as usize];
        reader.read_exact(&mut name).map_err(header_read_error)?;
        let file_name = String::from_utf8(name).map_err(|_| StegoError::InvalidStegoHeader)?;

        let payload_length = reader.read_u32::<BigEndian>().map_err(header_read_error)?;

        Ok(Self {
            channel_bits_used,
            compression: flags & FLAG_COMPRESSION != 0,
            encryption,
            file_name,
            payload_length,
        })
    }

    fn flags(&self) -> u8 {
        let mut flags = 0;
        if self.compression {
            flags |= FLAG_COMPRESSION;
        }
        if self.encryption.is_some() {
            flags |= FLAG_ENCRYPTION;
        }
        flags
    }
}

/// running out of carrier while reading the header means there is no header
fn header_read_error(e: std::io::Error) -> StegoError {
    match e.kind() {
        ErrorKind::UnexpectedEof => StegoError::InvalidStegoHeader,
        _ => StegoError::ReadError { source: e },
    }
}
