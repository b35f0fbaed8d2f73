use log::debug;

use super::{Capability, PluginCategory, PluginDescriptor, StegoPlugin};
use crate::config::StegoConfig;
use crate::media::image::LsbCodec;
use crate::media::payload::{pipeline, ExtractedPayload};
use crate::media::{lossless_writable_extensions, CoverImage};
use crate::{Result, StegoError};

pub const LSB_DESCRIPTOR: PluginDescriptor = PluginDescriptor {
    name: "LSB",
    category: PluginCategory::DataHiding,
    capabilities: &[Capability::EmbedData, Capability::ExtractData],
    description: "Hides data in the least significant bits of randomly chosen image channels",
};

/// Randomized least significant bit data hiding
#[derive(Debug, Default, Clone, Copy)]
pub struct LsbPlugin;

impl StegoPlugin for LsbPlugin {
    fn descriptor(&self) -> PluginDescriptor {
        LSB_DESCRIPTOR
    }

    /// png and bmp only
    fn writable_extensions(&self) -> &'static [String] {
        lossless_writable_extensions()
    }

    fn embed_data(
        &self,
        cover: Option<&CoverImage>,
        file_name: &str,
        payload: &[u8],
        config: &StegoConfig,
    ) -> Result<CoverImage> {
        let cover = cover.ok_or(StegoError::NullImageArgument)?;
        let prepared = pipeline::prepare(file_name, payload, config)?;
        let seed = pipeline::distribution_seed(config.use_encryption(), config)?;

        let mut stego = cover.clone();
        LsbCodec::embed(&mut stego, &prepared, seed)?;

        Ok(stego)
    }

    fn extract_data(&self, stego: &CoverImage, config: &StegoConfig) -> Result<ExtractedPayload> {
        LsbCodec::extract(stego, config)
    }

    fn can_extract(&self, stego: &CoverImage) -> bool {
        match LsbCodec::read_header(stego) {
            Ok(_) => true,
            Err(e) => {
                debug!("LSB cannot extract: {e}");
                false
            }
        }
    }
}
