pub mod cover;
pub mod diff;
pub mod image;
pub mod payload;

pub use cover::{
    is_lossless_extension, lossless_writable_extensions, readable_extensions, writable_extensions,
    CoverImage,
};
pub use diff::diff_images;
