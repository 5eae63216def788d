//! # zenraster
//!
//! Uncompressed BMP codec (8-bit palette/grayscale, 24-bit truecolor) with
//! convolution filters, point operations, and luma histogram equalization.
//!
//! ## Pixel model
//!
//! Decoded pixels live in a contiguous [`PixelBuffer`] built on
//! [`imgref::ImgVec`]: `u8` intensities for 8-bit files, [`rgb::RGB8`] for
//! 24-bit files. Row 0 is always the visual top of the image; the codec
//! resolves BMP's bottom-up (or, with a negative height, top-down) storage
//! on load and restores it on save. Row padding is stripped on decode and
//! regenerated on encode.
//!
//! 8-bit color tables are carried through unmodified. Filters operate on
//! the raw index byte, treating it as an intensity.
//!
//! ## Operations
//!
//! - Point operations: negative, brightness, threshold (8-bit), grayscale (24-bit)
//! - Convolution with any odd-sized [`Kernel`], edge pixels replicated, plus
//!   five named [`Filter`]s: box blur, gaussian blur, sharpen, outline, emboss
//! - Histogram equalization: directly on 8-bit intensities, on the Y channel
//!   of a YUV round trip for 24-bit images
//!
//! ## Non-Goals
//!
//! - Compressed BMP (RLE, bitfields), bit depths other than 8 and 24
//! - Color management
//! - Any container other than BMP
//!
//! ## Usage
//!
//! ```no_run
//! use zenraster::{Filter, load, save};
//!
//! let mut image = load("input.bmp")?;
//! println!("{:?}", image.info());
//!
//! image.filter(Filter::GaussianBlur)?;
//! image.brightness(20);
//! image.equalize();
//!
//! save(&image, "output.bmp")?;
//! # Ok::<(), zenraster::BitmapError>(())
//! ```

#![forbid(unsafe_code)]

mod bmp;
mod error;
mod image;
mod limits;
mod pixel;

pub mod convolve;
pub mod equalize;
pub mod ops;

use std::path::Path;

// Re-exports
pub use bmp::{BmpHeader, Palette};
pub use convolve::{Filter, Kernel};
pub use equalize::{Cdf, Channel, Histogram, Lut};
pub use error::{BitmapError, ErrorKind};
pub use image::{Bitmap, ImageInfo, PixelBuffer};
pub use imgref;
pub use limits::Limits;
pub use pixel::BitDepth;
pub use rgb;

/// Decode an uncompressed 8-bit or 24-bit BMP from memory.
pub fn decode_bmp(data: &[u8]) -> Result<Bitmap, BitmapError> {
    bmp::decode(data, None)
}

/// Decode with resource limits checked before any pixel allocation.
pub fn decode_bmp_with_limits(data: &[u8], limits: &Limits) -> Result<Bitmap, BitmapError> {
    bmp::decode(data, Some(limits))
}

/// Encode to BMP bytes. Size fields and the pixel data offset are recomputed
/// from the current pixel buffer.
pub fn encode_bmp(bitmap: &Bitmap) -> Result<Vec<u8>, BitmapError> {
    bmp::encode(bitmap)
}

/// Read and decode a BMP file.
pub fn load(path: impl AsRef<Path>) -> Result<Bitmap, BitmapError> {
    bmp::load(path.as_ref(), None)
}

/// Read and decode a BMP file, enforcing `limits`.
pub fn load_with_limits(path: impl AsRef<Path>, limits: &Limits) -> Result<Bitmap, BitmapError> {
    bmp::load(path.as_ref(), Some(limits))
}

/// Encode and write a BMP file.
///
/// The file at `path` is replaced only after the whole image has been written.
pub fn save(bitmap: &Bitmap, path: impl AsRef<Path>) -> Result<(), BitmapError> {
    bmp::save(bitmap, path.as_ref())
}
