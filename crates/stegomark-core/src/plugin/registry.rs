use log::{debug, warn};

use super::{DwtPlugin, LsbPlugin, Plugin, PluginCategory, StegoPlugin};
use crate::media::CoverImage;
use crate::{Result, StegoError};

/// The set of known algorithms, built once and then only read.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    plugins: Vec<Plugin>,
}

impl Registry {
    /// an empty registry, see [`Registry::with_defaults`] for the built-in algorithms
    pub fn new() -> Self {
        Self::default()
    }

    /// `LSB` for data hiding and `DWT` for watermarking
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry
            .register(LsbPlugin)
            .register(DwtPlugin::default());
        registry
    }

    /// Adds a plugin, a plugin with the same name is replaced.
    pub fn register(&mut self, plugin: impl Into<Plugin>) -> &mut Self {
        let plugin = plugin.into();
        match self
            .plugins
            .iter_mut()
            .find(|p| p.name().eq_ignore_ascii_case(plugin.name()))
        {
            Some(existing) => *existing = plugin,
            None => self.plugins.push(plugin),
        }
        self
    }

    pub fn plugins(&self) -> &[Plugin] {
        &self.plugins
    }

    pub fn plugins_of(&self, category: PluginCategory) -> impl Iterator<Item = &Plugin> + '_ {
        self.plugins.iter().filter(move |p| p.category() == category)
    }

    /// finds a plugin by name, ignoring case
    pub fn resolve(&self, name: &str) -> Result<&Plugin> {
        let name = name.trim();
        self.plugins
            .iter()
            .find(|p| p.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| StegoError::PluginNotFound(name.to_string()))
    }

    /// The only plugin there is, or else the only plugin of `category`.
    pub fn auto_select(&self, category: PluginCategory) -> Option<&Plugin> {
        if let [only] = self.plugins.as_slice() {
            return Some(only);
        }

        let mut candidates = self.plugins_of(category);
        match (candidates.next(), candidates.next()) {
            (Some(only), None) => Some(only),
            _ => None,
        }
    }

    /// resolves `name` when given, auto selects for `category` otherwise
    pub fn select(&self, name: Option<&str>, category: PluginCategory) -> Result<&Plugin> {
        match name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(name) => self.resolve(name),
            None => self
                .auto_select(category)
                .ok_or(StegoError::NoPluginSpecified),
        }
    }

    /// The first data hiding plugin that recognizes its data in `stego`.
    pub fn probe_data_hiding(&self, stego: &CoverImage) -> Result<&Plugin> {
        let found = self
            .plugins_of(PluginCategory::DataHiding)
            .find(|p| p.can_extract(stego));

        match found {
            Some(plugin) => {
                debug!("Plugin {} recognizes the image", plugin.name());
                Ok(plugin)
            }
            None => {
                warn!("No data hiding plugin recognizes the image");
                Err(StegoError::NoValidPlugin)
            }
        }
    }
}
