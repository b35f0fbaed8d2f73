use std::fs::File;
use std::io::{BufWriter, Cursor, Write};
use std::path::Path;
use std::sync::OnceLock;

use image::{DynamicImage, ImageFormat};
use log::{debug, error};

use crate::result::Result;
use crate::StegoError;

const SUPPORTED_FORMATS: [ImageFormat; 3] = [ImageFormat::Png, ImageFormat::Bmp, ImageFormat::Jpeg];

/// An owned, interleaved 8 bit pixel buffer.
///
/// Channels per pixel: 1 gray, 2 gray + alpha, 3 rgb, 4 rgba.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverImage {
    width: u32,
    height: u32,
    channels: u8,
    buffer: Vec<u8>,
}

impl CoverImage {
    pub fn new(width: u32, height: u32, channels: u8, buffer: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * channels as usize;
        if !(1..=4).contains(&channels) || buffer.len() != expected {
            return Err(StegoError::InvalidImageDimensions);
        }

        Ok(Self {
            width,
            height,
            channels,
            buffer,
        })
    }

    /// converts any decoded image to 8 bits per channel, keeping the channel layout
    pub fn from_dynamic(image: DynamicImage) -> Result<Self> {
        let (width, height) = (image.width(), image.height());
        let (channels, buffer) = match image {
            DynamicImage::ImageLuma8(i) => (1, i.into_raw()),
            DynamicImage::ImageLumaA8(i) => (2, i.into_raw()),
            DynamicImage::ImageRgb8(i) => (3, i.into_raw()),
            DynamicImage::ImageRgba8(i) => (4, i.into_raw()),
            other if other.color().has_alpha() => (4, other.to_rgba8().into_raw()),
            other if other.color().has_color() => (3, other.to_rgb8().into_raw()),
            other => (1, other.to_luma8().into_raw()),
        };

        Self::new(width, height, channels, buffer)
    }

    pub fn to_dynamic(&self) -> Result<DynamicImage> {
        let (w, h, raw) = (self.width, self.height, self.buffer.clone());
        let image = match self.channels {
            1 => image::GrayImage::from_raw(w, h, raw).map(DynamicImage::ImageLuma8),
            2 => image::GrayAlphaImage::from_raw(w, h, raw).map(DynamicImage::ImageLumaA8),
            3 => image::RgbImage::from_raw(w, h, raw).map(DynamicImage::ImageRgb8),
            4 => image::RgbaImage::from_raw(w, h, raw).map(DynamicImage::ImageRgba8),
            _ => None,
        };

        image.ok_or(StegoError::InvalidImageDimensions)
    }

    /// Decodes image bytes, the extension hint wins over content sniffing when given.
    pub fn decode(bytes: &[u8], extension_hint: Option<&str>) -> Result<Self> {
        let format = match extension_hint {
            Some(ext) => Some(readable_format(ext)?),
            None => None,
        };
        let image = match format {
            Some(format) => image::load_from_memory_with_format(bytes, format),
            None => image::load_from_memory(bytes),
        }
        .map_err(|e| {
            debug!("Cannot decode image: {e}");
            StegoError::InvalidImageMedia
        })?;

        Self::from_dynamic(image)
    }

    /// Encodes the image in the format that belongs to `extension`.
    ///
    /// JPEG has no alpha channel, alpha is dropped for it.
    pub fn encode(&self, extension: &str) -> Result<Vec<u8>> {
        let format = writable_format(extension)?;
        let mut image = self.to_dynamic()?;
        if format == ImageFormat::Jpeg && image.color().has_alpha() {
            image = if image.color().has_color() {
                DynamicImage::ImageRgb8(image.to_rgb8())
            } else {
                DynamicImage::ImageLuma8(image.to_luma8())
            };
        }

        let mut out = Cursor::new(Vec::new());
        image.write_to(&mut out, format).map_err(|e| {
            error!("Error encoding image: {e}");
            StegoError::ImageEncodingError
        })?;

        Ok(out.into_inner())
    }

    pub fn open(file: &Path) -> Result<Self> {
        let bytes = std::fs::read(file).map_err(|e| {
            error!("Error reading file {file:?}: {e}");
            StegoError::ReadError { source: e }
        })?;
        let ext = file.extension().and_then(|e| e.to_str());

        Self::decode(&bytes, ext)
    }

    pub fn save_as(&self, file: &Path) -> Result<()> {
        let ext = file
            .extension()
            .and_then(|e| e.to_str())
            .ok_or(StegoError::UnsupportedMedia)?;
        let bytes = self.encode(ext)?;

        let f = File::create(file).map_err(|e| {
            error!("Error creating file {file:?}: {e}");
            StegoError::WriteError { source: e }
        })?;
        let mut writer = BufWriter::new(f);
        writer
            .write_all(&bytes)
            .and_then(|_| writer.flush())
            .map_err(|e| StegoError::WriteError { source: e })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn has_alpha(&self) -> bool {
        self.channels % 2 == 0
    }

    pub fn has_color(&self) -> bool {
        self.channels >= 3
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.buffer
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    pub fn same_shape(&self, other: &CoverImage) -> bool {
        self.width == other.width && self.height == other.height && self.channels == other.channels
    }
}

/// lower case file extensions that can be decoded
pub fn readable_extensions() -> &'static [String] {
    static READABLE: OnceLock<Vec<String>> = OnceLock::new();
    READABLE.get_or_init(|| {
        SUPPORTED_FORMATS
            .iter()
            .filter(|f| f.reading_enabled())
            .flat_map(|f| f.extensions_str().iter().map(|e| e.to_string()))
            .collect()
    })
}

/// lower case file extensions that can be encoded
pub fn writable_extensions() -> &'static [String] {
    static WRITABLE: OnceLock<Vec<String>> = OnceLock::new();
    WRITABLE.get_or_init(|| {
        SUPPORTED_FORMATS
            .iter()
            .filter(|f| f.writing_enabled())
            .flat_map(|f| f.extensions_str().iter().map(|e| e.to_string()))
            .collect()
    })
}

/// lower case file extensions that can be encoded without losing pixel data
pub fn lossless_writable_extensions() -> &'static [String] {
    static LOSSLESS: OnceLock<Vec<String>> = OnceLock::new();
    LOSSLESS.get_or_init(|| {
        writable_extensions()
            .iter()
            .filter(|e| is_lossless_extension(e))
            .cloned()
            .collect()
    })
}

/// formats that never lose pixel data, hidden bits only survive those
pub fn is_lossless_extension(extension: &str) -> bool {
    matches!(
        ImageFormat::from_extension(extension),
        Some(ImageFormat::Png | ImageFormat::Bmp)
    )
}

fn readable_format(extension: &str) -> Result<ImageFormat> {
    let ext = extension.to_ascii_lowercase();
    if !readable_extensions().contains(&ext) {
        return Err(StegoError::UnsupportedMedia);
    }
    ImageFormat::from_extension(&ext).ok_or(StegoError::UnsupportedMedia)
}

fn writable_format(extension: &str) -> Result<ImageFormat> {
    let ext = extension.to_ascii_lowercase();
    if !writable_extensions().contains(&ext) {
        return Err(StegoError::UnsupportedMedia);
    }
    ImageFormat::from_extension(&ext).ok_or(StegoError::UnsupportedMedia)
}
