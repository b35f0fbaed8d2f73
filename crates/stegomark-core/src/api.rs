//! The front door: pick an algorithm from a [`Registry`] and run one operation with it.

use std::path::Path;

use log::{debug, info, warn};

use crate::config::StegoConfig;
use crate::media::payload::ExtractedPayload;
use crate::media::{diff_images, CoverImage};
use crate::plugin::{Plugin, PluginCategory, Registry, StegoPlugin};
use crate::watermark::Signature;
use crate::{Result, StegoError};

pub fn prepare(registry: &Registry) -> StegoEngine<'_> {
    StegoEngine::new(registry)
}

/// Runs hide, extract and watermark operations.
///
/// Without an explicit algorithm name the plugin is auto selected per operation category, for
/// extraction the registry is probed for a plugin that recognizes the image.
#[derive(Debug, Clone)]
pub struct StegoEngine<'r> {
    registry: &'r Registry,
    algorithm: Option<String>,
    config: StegoConfig,
}

impl<'r> StegoEngine<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            algorithm: None,
            config: StegoConfig::default(),
        }
    }

    pub fn with_algorithm(mut self, name: &str) -> Self {
        self.algorithm = Some(name.to_string());
        self
    }

    /// If `None` is passed, the algorithm is selected automatically
    pub fn use_algorithm<S: AsRef<str>>(mut self, name: Option<S>) -> Self {
        self.algorithm = name.map(|s| s.as_ref().to_string());
        self
    }

    pub fn with_config(mut self, config: StegoConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &StegoConfig {
        &self.config
    }

    fn plugin(&self, category: PluginCategory) -> Result<&'r Plugin> {
        let plugin = self.registry.select(self.algorithm.as_deref(), category)?;
        debug!("Using plugin {}", plugin.name());
        Ok(plugin)
    }

    /// Fails with [`StegoError::UnsupportedMedia`] unless the data hiding output can be saved
    /// as `stego_file` without losing the hidden data.
    pub fn check_stego_file(&self, stego_file: &Path) -> Result<()> {
        let plugin = self.plugin(PluginCategory::DataHiding)?;
        let extension = stego_file
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match extension {
            Some(ext) if plugin.writable_extensions().contains(&ext) => Ok(()),
            _ => {
                warn!(
                    "{} cannot keep its data in {}, use one of: {}",
                    plugin.name(),
                    stego_file.display(),
                    plugin.writable_extensions().join(", ")
                );
                Err(StegoError::UnsupportedMedia)
            }
        }
    }

    /// hides `payload` as `file_name` in a copy of `cover`
    pub fn embed(
        &self,
        cover: Option<&CoverImage>,
        file_name: &str,
        payload: &[u8],
    ) -> Result<CoverImage> {
        self.plugin(PluginCategory::DataHiding)?
            .embed_data(cover, file_name, payload, &self.config)
    }

    pub fn extract(&self, stego: &CoverImage) -> Result<ExtractedPayload> {
        self.extract_with(stego, &self.config)
    }

    /// Extracts, and when that fails for lack of a password, asks `prompt` once and tries again.
    ///
    /// The prompt is only consulted if no password was configured. A prompt answering `None`
    /// gives up with the original error.
    pub fn extract_with_password_retry<F>(&self, stego: &CoverImage, prompt: F) -> Result<ExtractedPayload>
    where
        F: FnOnce() -> Option<String>,
    {
        match self.extract(stego) {
            Err(e) if e.is_password_retryable() && self.config.password().is_none() => {
                info!("{e}, retrying with a password");
                let Some(password) = prompt().filter(|p| !p.is_empty()) else {
                    return Err(e);
                };
                self.extract_with(stego, &self.config.with_password(&password))
            }
            other => other,
        }
    }

    fn extract_with(&self, stego: &CoverImage, config: &StegoConfig) -> Result<ExtractedPayload> {
        let plugin = match self.algorithm.as_deref() {
            Some(name) => self.registry.resolve(name)?,
            None => self.registry.probe_data_hiding(stego)?,
        };
        plugin.extract_data(stego, config)
    }

    pub fn generate_signature(&self) -> Result<Signature> {
        let password = self.config.password().ok_or(StegoError::MissingPassword)?;
        self.plugin(PluginCategory::Watermarking)?
            .generate_signature(password)
    }

    pub fn embed_mark(
        &self,
        cover: Option<&CoverImage>,
        signature: Option<&Signature>,
    ) -> Result<CoverImage> {
        let signature = signature.ok_or(StegoError::SignatureNotValid)?;
        self.plugin(PluginCategory::Watermarking)?
            .embed_mark(cover, signature)
    }

    pub fn check_mark(&self, stego: &CoverImage, signature: &Signature) -> Result<f64> {
        self.plugin(PluginCategory::Watermarking)?
            .check_mark(stego, signature)
    }

    pub fn diff(&self, stego: &CoverImage, cover: &CoverImage) -> Result<CoverImage> {
        diff_images(stego, cover)
    }
}
