pub mod compression;
pub mod header;
pub mod pipeline;

pub use header::StegoHeader;
pub use pipeline::{prepare, restore, PreparedPayload};

/// What was hidden: the original file name, maybe empty, and the data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedPayload {
    pub file_name: String,
    pub data: Vec<u8>,
}

impl ExtractedPayload {
    /// the embedded file name or `fallback` when none was hidden
    pub fn file_name_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        if self.file_name.is_empty() {
            fallback
        } else {
            &self.file_name
        }
    }
}
