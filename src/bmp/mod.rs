//! Uncompressed 8-bit and 24-bit BMP decoder and encoder (internal).
//!
//! Use top-level [`crate::decode_bmp`], [`crate::encode_bmp`], [`crate::load`], etc.

mod decode;
mod encode;
mod header;

use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::BitmapError;
use crate::image::{Bitmap, ImageInfo};
use crate::limits::Limits;

pub use header::{BmpHeader, Palette};

pub(crate) fn probe(data: &[u8]) -> Result<ImageInfo, BitmapError> {
    decode::probe(data)
}

pub(crate) fn decode(data: &[u8], limits: Option<&Limits>) -> Result<Bitmap, BitmapError> {
    decode::decode_bitmap(data, limits)
}

pub(crate) fn encode(bitmap: &Bitmap) -> Result<Vec<u8>, BitmapError> {
    encode::encode_bitmap(bitmap)
}

pub(crate) fn load(path: &Path, limits: Option<&Limits>) -> Result<Bitmap, BitmapError> {
    let data = fs::read(path)?;
    debug!("read {} bytes from {}", data.len(), path.display());
    decode(&data, limits)
}

/// Encode fully in memory, write a sibling temporary file, then rename it
/// over `path`. A failed save never leaves a partial file at `path`.
pub(crate) fn save(bitmap: &Bitmap, path: &Path) -> Result<(), BitmapError> {
    let bytes = encode(bitmap)?;
    let tmp = temporary_sibling(path);
    if let Err(e) = fs::write(&tmp, &bytes).and_then(|()| fs::rename(&tmp, path)) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    debug!("wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

fn temporary_sibling(path: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(path.file_name().unwrap_or(OsStr::new("bitmap")));
    name.push(".tmp");
    path.with_file_name(name)
}
