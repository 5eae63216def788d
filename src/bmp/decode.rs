//! Uncompressed 8-bit and 24-bit BMP decoder.

use imgref::ImgVec;
use log::{debug, warn};
use rgb::RGB8;

use super::header::{BmpHeader, HEADER_SIZE, Layout, PALETTE_ENTRY_SIZE, Palette};
use crate::error::BitmapError;
use crate::image::{Bitmap, ImageInfo, PixelBuffer};
use crate::limits::{Limits, try_filled};
use crate::pixel::BitDepth;

// ── Cursor for reading from &[u8] ───────────────────────────────────

struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn position(&self) -> usize {
        self.pos
    }

    fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    fn read_fixed_bytes<const N: usize>(&mut self) -> Result<[u8; N], BitmapError> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.read_slice(N)?);
        Ok(buf)
    }

    fn read_slice(&mut self, n: usize) -> Result<&'a [u8], BitmapError> {
        let end = self.pos.checked_add(n).ok_or(BitmapError::UnexpectedEof)?;
        let slice = self
            .data
            .get(self.pos..end)
            .ok_or(BitmapError::UnexpectedEof)?;
        self.pos = end;
        Ok(slice)
    }
}

// ── Header ──────────────────────────────────────────────────────────

fn read_header(cursor: &mut Cursor<'_>) -> Result<(BmpHeader, Layout), BitmapError> {
    // A short file that does not even start with "BM" is a signature error,
    // not a truncation.
    if cursor.data.len() < 2 || &cursor.data[..2] != b"BM" {
        return Err(BitmapError::UnrecognizedFormat);
    }
    let block: [u8; HEADER_SIZE] = cursor.read_fixed_bytes()?;
    let header = BmpHeader::parse(&block)?;
    let layout = header.validate()?;
    Ok((header, layout))
}

/// Parse header fields only.
pub(crate) fn probe(data: &[u8]) -> Result<ImageInfo, BitmapError> {
    let (header, layout) = read_header(&mut Cursor::new(data))?;
    Ok(ImageInfo {
        width: layout.width as u32,
        height: layout.height as u32,
        bit_depth: layout.depth,
        image_size: resolve_image_size(header.image_size, &layout),
        top_down: layout.top_down,
    })
}

/// Padded pixel data size: the declared field, or computed from geometry
/// when the field is zero.
fn resolve_image_size(declared: u32, layout: &Layout) -> u32 {
    // validate() has already checked that this product fits in u32
    let computed = (layout.stride * layout.height) as u32;
    if declared == 0 {
        return computed;
    }
    if declared != computed {
        warn!("BMP image size field {declared} disagrees with computed {computed}; using computed");
    }
    computed
}

// ── Full decode ─────────────────────────────────────────────────────

pub(crate) fn decode_bitmap(data: &[u8], limits: Option<&Limits>) -> Result<Bitmap, BitmapError> {
    let mut cursor = Cursor::new(data);
    let (mut header, layout) = read_header(&mut cursor)?;

    if let Some(limits) = limits {
        limits.check(layout.width as u32, layout.height as u32, layout.depth)?;
    }

    let info_extra = cursor
        .read_slice(header.palette_offset() - HEADER_SIZE)?
        .to_vec();

    let palette = if layout.depth.has_palette() {
        let table = cursor.read_slice(layout.palette_entries * PALETTE_ENTRY_SIZE)?;
        Some(Palette::from_bytes(table)?)
    } else {
        None
    };

    let gap = cursor
        .read_slice(header.data_offset as usize - cursor.position())?
        .to_vec();

    if header.image_size == 0 {
        debug!(
            "BMP image size field is zero; recomputed from {}x{} with stride {}",
            layout.width, layout.height, layout.stride
        );
    }
    header.image_size = resolve_image_size(header.image_size, &layout);

    // Reject truncated pixel data before allocating the grid.
    if cursor.remaining() < layout.stride * layout.height {
        return Err(BitmapError::UnexpectedEof);
    }

    let pixels = match layout.depth {
        BitDepth::Gray8 => PixelBuffer::gray(decode_gray(&mut cursor, &layout)?),
        BitDepth::Rgb24 => PixelBuffer::rgb(decode_rgb(&mut cursor, &layout)?),
    };

    debug!(
        "decoded {}x{} {:?} BMP ({}, {} palette entries)",
        layout.width,
        layout.height,
        layout.depth,
        if layout.top_down { "top-down" } else { "bottom-up" },
        layout.palette_entries
    );

    Ok(Bitmap {
        header,
        info_extra,
        palette,
        gap,
        pixels,
    })
}

/// Grid row that file scanline `file_row` lands in.
fn target_row(layout: &Layout, file_row: usize) -> usize {
    if layout.top_down {
        file_row
    } else {
        layout.height - 1 - file_row
    }
}

fn decode_gray(cursor: &mut Cursor<'_>, layout: &Layout) -> Result<ImgVec<u8>, BitmapError> {
    let w = layout.width;
    let mut buf = try_filled(w * layout.height, 0u8)?;
    for file_row in 0..layout.height {
        let scanline = cursor.read_slice(layout.stride)?;
        let y = target_row(layout, file_row);
        buf[y * w..(y + 1) * w].copy_from_slice(&scanline[..w]);
    }
    Ok(ImgVec::new(buf, w, layout.height))
}

fn decode_rgb(cursor: &mut Cursor<'_>, layout: &Layout) -> Result<ImgVec<RGB8>, BitmapError> {
    let w = layout.width;
    let mut buf = try_filled(w * layout.height, RGB8::new(0, 0, 0))?;
    for file_row in 0..layout.height {
        let scanline = cursor.read_slice(layout.stride)?;
        let y = target_row(layout, file_row);
        // BGR on disk; trailing pad bytes are ignored
        for (dst, bgr) in buf[y * w..(y + 1) * w]
            .iter_mut()
            .zip(scanline.chunks_exact(3))
        {
            *dst = RGB8::new(bgr[2], bgr[1], bgr[0]);
        }
    }
    Ok(ImgVec::new(buf, w, layout.height))
}
