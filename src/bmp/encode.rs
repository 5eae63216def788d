//! BMP encoder: uncompressed 8-bit palette and 24-bit BGR.

use log::debug;

use super::header::{BmpHeader, HEADER_SIZE, INFO_HEADER_SIZE, MAX_PALETTE_ENTRIES, Palette};
use crate::error::BitmapError;
use crate::image::{Bitmap, Samples};

/// Serialize a bitmap, recomputing every size-dependent header field.
pub(crate) fn encode_bitmap(bitmap: &Bitmap) -> Result<Vec<u8>, BitmapError> {
    let pixels = &bitmap.pixels;
    let depth = pixels.depth();
    let w = pixels.width();
    let h = pixels.height();
    let width = w as u32;
    let height = h as u32;

    let fallback_palette;
    let palette = match (&bitmap.palette, depth.has_palette()) {
        (Some(palette), true) => Some(palette),
        (None, true) => {
            fallback_palette = Palette::grayscale();
            Some(&fallback_palette)
        }
        (_, false) => None,
    };
    let palette_bytes = palette.map_or(&[][..], Palette::as_bytes);

    let row_stride = depth
        .row_stride(w)
        .ok_or(BitmapError::DimensionsTooLarge { width, height })?;
    let pixel_data_size = row_stride
        .checked_mul(h)
        .ok_or(BitmapError::DimensionsTooLarge { width, height })?;
    let data_offset = HEADER_SIZE + bitmap.info_extra.len() + palette_bytes.len() + bitmap.gap.len();
    let file_size = pixel_data_size
        .checked_add(data_offset)
        .filter(|&n| u32::try_from(n).is_ok())
        .ok_or(BitmapError::DimensionsTooLarge { width, height })?;

    let mut header: BmpHeader = bitmap.header.clone();
    header.file_size = file_size as u32;
    header.data_offset = data_offset as u32;
    header.info_header_size = INFO_HEADER_SIZE + bitmap.info_extra.len() as u32;
    header.width = width as i32;
    header.height = if header.is_top_down() {
        -(height as i32)
    } else {
        height as i32
    };
    header.planes = 1;
    header.bit_count = depth.bits();
    header.compression = 0;
    header.image_size = pixel_data_size as u32;
    header.colors_used = match palette {
        Some(p) if p.len() == MAX_PALETTE_ENTRIES && header.colors_used == 0 => 0,
        Some(p) => p.len() as u32,
        None => header.colors_used,
    };

    let mut out = Vec::new();
    out.try_reserve_exact(file_size)
        .map_err(|_| BitmapError::AllocationFailed { bytes: file_size })?;
    out.extend_from_slice(&header.to_bytes());
    out.extend_from_slice(&bitmap.info_extra);
    out.extend_from_slice(palette_bytes);
    out.extend_from_slice(&bitmap.gap);

    let pad_bytes = depth.row_padding(w);
    let top_down = header.is_top_down();
    for i in 0..h {
        let row = if top_down { i } else { h - 1 - i };
        match &pixels.samples {
            Samples::Gray8(img) => {
                out.extend_from_slice(&img.buf()[row * w..(row + 1) * w]);
            }
            Samples::Rgb24(img) => {
                for px in &img.buf()[row * w..(row + 1) * w] {
                    out.push(px.b);
                    out.push(px.g);
                    out.push(px.r);
                }
            }
        }
        out.extend(core::iter::repeat_n(0u8, pad_bytes));
    }

    debug!(
        "encoded {w}x{h} {depth:?} BMP: {file_size} bytes, pixel data at {data_offset}"
    );
    Ok(out)
}
