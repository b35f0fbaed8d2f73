use std::io::{self, Cursor, Read, Write};

use bitstream_io::{BigEndian, BitRead, BitReader, BitWrite, BitWriter};
use log::{debug, error};

use super::distributor::BitDistributor;
use crate::config::StegoConfig;
use crate::media::payload::{pipeline, ExtractedPayload, PreparedPayload, StegoHeader};
use crate::media::CoverImage;
use crate::{Result, StegoError};

/// Maps linear bit addresses onto (sample, bit plane) of a cover.
///
/// Address `a` is bit plane `a / samples` of sample `a % samples`, so the lowest plane of
/// every sample is filled before the next plane is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressSpace {
    samples: u64,
    planes: u8,
}

impl AddressSpace {
    pub fn new(cover: &CoverImage, planes: u8) -> Self {
        Self {
            samples: cover.as_bytes().len() as u64,
            planes,
        }
    }

    /// number of addressable bits
    pub fn len(&self) -> u64 {
        self.samples * self.planes as u64
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    fn locate(&self, address: u64) -> (usize, u8) {
        ((address % self.samples) as usize, (address / self.samples) as u8)
    }
}

/// The order bits are visited in, either one after another or spread by a [`BitDistributor`].
#[derive(Debug)]
pub struct BitAddresses {
    offset: u64,
    distributor: Option<BitDistributor>,
    position: u64,
    len: u64,
}

impl BitAddresses {
    pub fn sequential(offset: u64, len: u64) -> Self {
        Self {
            offset,
            distributor: None,
            position: 0,
            len,
        }
    }

    pub fn distributed(offset: u64, len: u64, seed: &[u8]) -> Self {
        Self {
            offset,
            distributor: Some(BitDistributor::new(seed, len)),
            position: 0,
            len,
        }
    }

    pub fn remaining(&self) -> u64 {
        self.len - self.position
    }
}

impl Iterator for BitAddresses {
    type Item = u64;

    fn next(&mut self) -> Option<Self::Item> {
        if self.position >= self.len {
            return None;
        }
        let index = self.position;
        self.position += 1;

        Some(
            self.offset
                + match &self.distributor {
                    Some(distributor) => distributor.get(index),
                    None => index,
                },
        )
    }
}

/// Writes whole bytes, most significant bit first, into the addressed bits of a cover
pub struct LsbWriter<'i> {
    samples: &'i mut [u8],
    space: AddressSpace,
    addresses: BitAddresses,
}

impl<'i> LsbWriter<'i> {
    pub fn new(cover: &'i mut CoverImage, space: AddressSpace, addresses: BitAddresses) -> Self {
        Self {
            samples: cover.as_bytes_mut(),
            space,
            addresses,
        }
    }
}

impl Write for LsbWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let whole_bytes = (self.addresses.remaining() / 8).min(buf.len() as u64) as usize;
        let mut bits = BitReader::endian(Cursor::new(&buf[..whole_bytes]), BigEndian);

        for _ in 0..whole_bytes * 8 {
            let bit = bits.read_bit()?;
            let Some(address) = self.addresses.next() else {
                return Err(io::ErrorKind::WriteZero.into());
            };
            let (sample, plane) = self.space.locate(address);
            let mask = 1u8 << plane;
            let value = &mut self.samples[sample];
            *value = (*value & !mask) | if bit { mask } else { 0 };
        }

        Ok(whole_bytes)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Reads whole bytes back from the addressed bits of a cover
pub struct LsbReader<'i> {
    samples: &'i [u8],
    space: AddressSpace,
    addresses: BitAddresses,
}

impl<'i> LsbReader<'i> {
    pub fn new(cover: &'i CoverImage, space: AddressSpace, addresses: BitAddresses) -> Self {
        Self {
            samples: cover.as_bytes(),
            space,
            addresses,
        }
    }
}

impl Read for LsbReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let whole_bytes = (self.addresses.remaining() / 8).min(buf.len() as u64) as usize;
        let mut bits = BitWriter::endian(&mut buf[..whole_bytes], BigEndian);

        for _ in 0..whole_bytes * 8 {
            let Some(address) = self.addresses.next() else {
                break;
            };
            let (sample, plane) = self.space.locate(address);
            bits.write_bit((self.samples[sample] >> plane) & 1 == 1)?;
        }

        Ok(whole_bytes)
    }
}

/// Hides and reads prepared payloads with randomized least significant bit encoding.
///
/// The header sits in the lowest bit plane, in order, starting at the first sample. The payload
/// is spread over all remaining addresses of the configured bit planes.
pub struct LsbCodec;

impl LsbCodec {
    /// bits available for header and payload together
    pub fn capacity_bits(cover: &CoverImage, max_bits_per_channel: u8) -> u64 {
        AddressSpace::new(cover, max_bits_per_channel).len()
    }

    pub fn embed(cover: &mut CoverImage, payload: &PreparedPayload, seed: &[u8]) -> Result<()> {
        let space = AddressSpace::new(cover, payload.header.channel_bits_used);
        let header = payload.header.encode()?;
        let header_bits = header.len() as u64 * 8;
        let required = payload.total_bits();

        debug!(
            "Hiding {required} bits in {}x{}x{} image with {} bits per channel",
            cover.width(),
            cover.height(),
            cover.channels(),
            payload.header.channel_bits_used
        );
        if required > space.len() {
            error!(
                "Image too small: {required} bits required but only {} bits available",
                space.len()
            );
            return Err(StegoError::ImageSizeInsufficient {
                required,
                available: space.len(),
            });
        }

        LsbWriter::new(cover, space, BitAddresses::sequential(0, header_bits))
            .write_all(&header)
            .map_err(hide_error)?;

        let payload_addresses =
            BitAddresses::distributed(header_bits, space.len() - header_bits, seed);
        LsbWriter::new(cover, space, payload_addresses)
            .write_all(&payload.data)
            .map_err(hide_error)?;

        Ok(())
    }

    /// reads the header only, no password required
    pub fn read_header(stego: &CoverImage) -> Result<StegoHeader> {
        let space = AddressSpace::new(stego, 8);
        if space.is_empty() {
            return Err(StegoError::InvalidStegoHeader);
        }

        let mut reader = LsbReader::new(stego, space, BitAddresses::sequential(0, space.len()));
        StegoHeader::decode(&mut reader)
    }

    pub fn extract(stego: &CoverImage, config: &StegoConfig) -> Result<ExtractedPayload> {
        let header = Self::read_header(stego)?;
        let space = AddressSpace::new(stego, header.channel_bits_used);
        let header_bits = header.encoded_bits();
        let payload_bits = header.payload_length as u64 * 8;

        if header_bits + payload_bits > space.len() {
            debug!(
                "Header announces {payload_bits} payload bits, the image only holds {}",
                space.len().saturating_sub(header_bits)
            );
            return Err(StegoError::InvalidStegoHeader);
        }

        let seed = pipeline::distribution_seed(header.encryption.is_some(), config)?;
        let addresses = BitAddresses::distributed(header_bits, space.len() - header_bits, seed);
        let mut data = vec![0u8; header.payload_length as usize];
        LsbReader::new(stego, space, addresses)
            .read_exact(&mut data)
            .map_err(|source| StegoError::ReadError { source })?;

        pipeline::restore(&header, data, config)
    }
}

fn hide_error(e: io::Error) -> StegoError {
    error!("Error encoding image: {e}, kind {}", e.kind());
    StegoError::ImageEncodingError
}
