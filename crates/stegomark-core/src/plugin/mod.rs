//! Algorithms are plugins: a descriptor plus the operations the algorithm supports.
//!
//! Every plugin is a variant of [`Plugin`], calls are dispatched with `enum_dispatch`.
//! Operations a plugin does not support answer with [`StegoError::UnsupportedOperation`].

pub mod dwt;
pub mod lsb;
pub mod registry;

use std::fmt::{self, Display, Formatter};

use enum_dispatch::enum_dispatch;

pub use dwt::DwtPlugin;
pub use lsb::LsbPlugin;
pub use registry::Registry;

use crate::config::StegoConfig;
use crate::media::payload::ExtractedPayload;
use crate::media::CoverImage;
use crate::watermark::Signature;
use crate::{Result, StegoError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluginCategory {
    DataHiding,
    Watermarking,
}

impl Display for PluginCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            PluginCategory::DataHiding => f.write_str("Data Hiding"),
            PluginCategory::Watermarking => f.write_str("Watermarking"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    EmbedData,
    ExtractData,
    GenerateSignature,
    EmbedMark,
    CheckMark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PluginDescriptor {
    pub name: &'static str,
    pub category: PluginCategory,
    pub capabilities: &'static [Capability],
    pub description: &'static str,
}

impl PluginDescriptor {
    pub fn supports(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }
}

/// One line per plugin, `NAME [Category] - description`
impl Display for PluginDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] - {}", self.name, self.category, self.description)
    }
}

#[enum_dispatch]
pub trait StegoPlugin {
    fn descriptor(&self) -> PluginDescriptor;

    /// extensions the images this plugin produces may be saved as
    fn writable_extensions(&self) -> &'static [String] {
        crate::media::writable_extensions()
    }

    /// hides `payload` under `file_name` in a copy of `cover`
    fn embed_data(
        &self,
        _cover: Option<&CoverImage>,
        _file_name: &str,
        _payload: &[u8],
        _config: &StegoConfig,
    ) -> Result<CoverImage> {
        Err(self.unsupported("embed data"))
    }

    fn extract_data(&self, _stego: &CoverImage, _config: &StegoConfig) -> Result<ExtractedPayload> {
        Err(self.unsupported("extract data"))
    }

    /// cheap check whether `stego` carries data of this plugin, no password needed
    fn can_extract(&self, _stego: &CoverImage) -> bool {
        false
    }

    fn generate_signature(&self, _password: &str) -> Result<Signature> {
        Err(self.unsupported("generate signature"))
    }

    fn embed_mark(&self, _cover: Option<&CoverImage>, _signature: &Signature) -> Result<CoverImage> {
        Err(self.unsupported("embed mark"))
    }

    fn check_mark(&self, _stego: &CoverImage, _signature: &Signature) -> Result<f64> {
        Err(self.unsupported("check mark"))
    }

    fn unsupported(&self, operation: &'static str) -> StegoError {
        StegoError::UnsupportedOperation {
            plugin: self.descriptor().name,
            operation,
        }
    }
}

#[enum_dispatch(StegoPlugin)]
#[derive(Debug, Clone)]
pub enum Plugin {
    Lsb(LsbPlugin),
    Dwt(DwtPlugin),
}

impl Plugin {
    pub fn name(&self) -> &'static str {
        self.descriptor().name
    }

    pub fn category(&self) -> PluginCategory {
        self.descriptor().category
    }
}
