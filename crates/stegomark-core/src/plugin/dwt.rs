use super::{Capability, PluginCategory, PluginDescriptor, StegoPlugin};
use crate::media::CoverImage;
use crate::watermark::{self, Signature, WatermarkOptions};
use crate::{Result, StegoError};

pub const DWT_DESCRIPTOR: PluginDescriptor = PluginDescriptor {
    name: "DWT",
    category: PluginCategory::Watermarking,
    capabilities: &[
        Capability::GenerateSignature,
        Capability::EmbedMark,
        Capability::CheckMark,
    ],
    description: "Robust watermarking in the Haar wavelet domain of the image luminance",
};

/// Wavelet domain watermarking
#[derive(Debug, Default, Clone, Copy)]
pub struct DwtPlugin {
    options: WatermarkOptions,
}

impl DwtPlugin {
    pub fn with_options(options: WatermarkOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &WatermarkOptions {
        &self.options
    }
}

impl StegoPlugin for DwtPlugin {
    fn descriptor(&self) -> PluginDescriptor {
        DWT_DESCRIPTOR
    }

    fn generate_signature(&self, password: &str) -> Result<Signature> {
        Ok(Signature::generate(password))
    }

    fn embed_mark(&self, cover: Option<&CoverImage>, signature: &Signature) -> Result<CoverImage> {
        let cover = cover.ok_or(StegoError::NoCoverFile)?;
        watermark::embed_mark(cover, signature, &self.options)
    }

    fn check_mark(&self, stego: &CoverImage, signature: &Signature) -> Result<f64> {
        watermark::check_mark(stego, signature, &self.options)
    }
}
