use std::io::{Cursor, Read, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::result::Result;

const ENTRY_NAME: &str = "payload";

/// deflates `data` into a single entry zip archive
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    zip.start_file(ENTRY_NAME, options)?;
    zip.write_all(data)?;

    Ok(zip.finish()?.into_inner())
}

/// inflates the first entry of a zip archive made by [`compress`]
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    let mut zip = ZipArchive::new(Cursor::new(data))?;
    let mut entry = zip.by_index(0)?;

    let mut buf = Vec::new();
    entry.read_to_end(&mut buf)?;

    Ok(buf)
}
