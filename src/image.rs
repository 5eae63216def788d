//! In-memory pixel grid and the decoded BMP container around it.

use imgref::{ImgRef, ImgVec};
use rgb::RGB8;

use crate::bmp::{BmpHeader, Palette};
use crate::convolve::{self, Filter, Kernel};
use crate::equalize;
use crate::error::BitmapError;
use crate::limits::try_filled;
use crate::ops;
use crate::pixel::BitDepth;

/// Contiguous row-major pixel grid, row 0 at the visual top.
///
/// Buffers are always tightly packed: stride equals width, so the backing
/// vector holds exactly `width * height` pixels.
#[derive(Clone, Debug)]
pub struct PixelBuffer {
    pub(crate) samples: Samples,
}

/// Storage for one [`PixelBuffer`], one variant per depth.
#[derive(Clone, Debug)]
pub(crate) enum Samples {
    Gray8(ImgVec<u8>),
    Rgb24(ImgVec<RGB8>),
}

impl PixelBuffer {
    /// Allocate a black buffer of the given depth.
    pub fn new(width: usize, height: usize, depth: BitDepth) -> Result<Self, BitmapError> {
        let len = checked_area(width, height)?;
        Ok(match depth {
            BitDepth::Gray8 => Self::gray(ImgVec::new(try_filled(len, 0u8)?, width, height)),
            BitDepth::Rgb24 => Self::rgb(ImgVec::new(
                try_filled(len, RGB8::new(0, 0, 0))?,
                width,
                height,
            )),
        })
    }

    /// Wrap `width * height` intensity samples.
    pub fn from_gray(width: usize, height: usize, pixels: Vec<u8>) -> Result<Self, BitmapError> {
        check_len(width, height, pixels.len())?;
        Ok(Self::gray(ImgVec::new(pixels, width, height)))
    }

    /// Wrap `width * height` RGB pixels.
    pub fn from_rgb(width: usize, height: usize, pixels: Vec<RGB8>) -> Result<Self, BitmapError> {
        check_len(width, height, pixels.len())?;
        Ok(Self::rgb(ImgVec::new(pixels, width, height)))
    }

    /// Copy an intensity image, dropping any stride padding.
    pub fn from_gray_img(img: ImgRef<'_, u8>) -> Result<Self, BitmapError> {
        Self::from_gray(img.width(), img.height(), packed(img)?)
    }

    /// Copy an RGB image, dropping any stride padding.
    pub fn from_rgb_img(img: ImgRef<'_, RGB8>) -> Result<Self, BitmapError> {
        Self::from_rgb(img.width(), img.height(), packed(img)?)
    }

    pub(crate) fn gray(img: ImgVec<u8>) -> Self {
        debug_assert_eq!(img.stride(), img.width());
        Self {
            samples: Samples::Gray8(img),
        }
    }

    pub(crate) fn rgb(img: ImgVec<RGB8>) -> Self {
        debug_assert_eq!(img.stride(), img.width());
        Self {
            samples: Samples::Rgb24(img),
        }
    }

    pub fn width(&self) -> usize {
        match &self.samples {
            Samples::Gray8(img) => img.width(),
            Samples::Rgb24(img) => img.width(),
        }
    }

    pub fn height(&self) -> usize {
        match &self.samples {
            Samples::Gray8(img) => img.height(),
            Samples::Rgb24(img) => img.height(),
        }
    }

    pub fn depth(&self) -> BitDepth {
        match &self.samples {
            Samples::Gray8(_) => BitDepth::Gray8,
            Samples::Rgb24(_) => BitDepth::Rgb24,
        }
    }

    /// Borrow the samples of an 8-bit buffer.
    pub fn as_gray(&self) -> Option<ImgRef<'_, u8>> {
        match &self.samples {
            Samples::Gray8(img) => Some(img.as_ref()),
            Samples::Rgb24(_) => None,
        }
    }

    /// Borrow the pixels of a 24-bit buffer.
    pub fn as_rgb(&self) -> Option<ImgRef<'_, RGB8>> {
        match &self.samples {
            Samples::Gray8(_) => None,
            Samples::Rgb24(img) => Some(img.as_ref()),
        }
    }

    /// Intensity at (x, y) of an 8-bit buffer.
    pub fn gray_at(&self, x: usize, y: usize) -> Option<u8> {
        match &self.samples {
            Samples::Gray8(img) if x < img.width() && y < img.height() => {
                Some(img.buf()[y * img.width() + x])
            }
            _ => None,
        }
    }

    /// Pixel at (x, y) of a 24-bit buffer.
    pub fn rgb_at(&self, x: usize, y: usize) -> Option<RGB8> {
        match &self.samples {
            Samples::Rgb24(img) if x < img.width() && y < img.height() => {
                Some(img.buf()[y * img.width() + x])
            }
            _ => None,
        }
    }
}

impl PartialEq for PixelBuffer {
    fn eq(&self, other: &Self) -> bool {
        match (&self.samples, &other.samples) {
            (Samples::Gray8(a), Samples::Gray8(b)) => same_grid(a, b),
            (Samples::Rgb24(a), Samples::Rgb24(b)) => same_grid(a, b),
            _ => false,
        }
    }
}

fn same_grid<T: PartialEq>(a: &ImgVec<T>, b: &ImgVec<T>) -> bool {
    a.width() == b.width() && a.height() == b.height() && a.buf() == b.buf()
}

fn packed<T: Copy>(img: ImgRef<'_, T>) -> Result<Vec<T>, BitmapError> {
    let mut out = Vec::new();
    let len = checked_area(img.width(), img.height())?;
    out.try_reserve_exact(len)
        .map_err(|_| BitmapError::AllocationFailed {
            bytes: len.saturating_mul(core::mem::size_of::<T>()),
        })?;
    for row in img.rows() {
        out.extend_from_slice(row);
    }
    Ok(out)
}

fn checked_area(width: usize, height: usize) -> Result<usize, BitmapError> {
    if width == 0 || height == 0 {
        return Err(BitmapError::InvalidParameter(format!(
            "image dimensions must be positive, got {width}x{height}"
        )));
    }
    if i32::try_from(width).is_err() || i32::try_from(height).is_err() {
        return Err(BitmapError::DimensionsTooLarge {
            width: width.min(u32::MAX as usize) as u32,
            height: height.min(u32::MAX as usize) as u32,
        });
    }
    width
        .checked_mul(height)
        .ok_or(BitmapError::DimensionsTooLarge {
            width: width as u32,
            height: height as u32,
        })
}

fn check_len(width: usize, height: usize, len: usize) -> Result<(), BitmapError> {
    let needed = checked_area(width, height)?;
    if len != needed {
        return Err(BitmapError::InvalidParameter(format!(
            "expected {needed} pixels for {width}x{height}, got {len}"
        )));
    }
    Ok(())
}

/// Width, height, and depth of an image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub bit_depth: BitDepth,
    /// Padded pixel data size in bytes.
    pub image_size: u32,
    pub top_down: bool,
}

impl ImageInfo {
    /// Probe a BMP header without decoding pixel data.
    pub fn from_bytes(data: &[u8]) -> Result<Self, BitmapError> {
        crate::bmp::probe(data)
    }
}

/// A decoded BMP: its header fields, color table, and pixel grid.
///
/// Header bytes that the codec does not interpret (extended info header
/// fields, bytes between the color table and the pixel data) are kept
/// verbatim and written back by [`crate::encode_bmp`].
#[derive(Clone, Debug, PartialEq)]
pub struct Bitmap {
    pub(crate) header: BmpHeader,
    pub(crate) info_extra: Vec<u8>,
    pub(crate) palette: Option<Palette>,
    pub(crate) gap: Vec<u8>,
    pub(crate) pixels: PixelBuffer,
}

impl Bitmap {
    /// Allocate a black image. 8-bit images get a gray-ramp palette.
    pub fn new(width: usize, height: usize, depth: BitDepth) -> Result<Self, BitmapError> {
        Ok(Self::from_pixels(PixelBuffer::new(width, height, depth)?))
    }

    /// Wrap an existing pixel buffer with a default header.
    pub fn from_pixels(pixels: PixelBuffer) -> Self {
        let depth = pixels.depth();
        let header = BmpHeader::synthesize(pixels.width() as u32, pixels.height() as u32, depth);
        Self {
            header,
            info_extra: Vec::new(),
            palette: depth.has_palette().then(Palette::grayscale),
            gap: Vec::new(),
            pixels,
        }
    }

    /// Header fields as last decoded; size fields are recomputed on encode.
    pub fn header(&self) -> &BmpHeader {
        &self.header
    }

    pub fn palette(&self) -> Option<&Palette> {
        self.palette.as_ref()
    }

    /// Replace the color table of an 8-bit image.
    pub fn set_palette(&mut self, palette: Palette) -> Result<(), BitmapError> {
        if !self.depth().has_palette() {
            return Err(BitmapError::DepthMismatch {
                operation: "palette",
                depth: self.depth(),
            });
        }
        self.palette = Some(palette);
        Ok(())
    }

    pub fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }

    pub fn into_pixels(self) -> PixelBuffer {
        self.pixels
    }

    pub fn width(&self) -> usize {
        self.pixels.width()
    }

    pub fn height(&self) -> usize {
        self.pixels.height()
    }

    pub fn depth(&self) -> BitDepth {
        self.pixels.depth()
    }

    pub fn info(&self) -> ImageInfo {
        let depth = self.depth();
        let stride = depth.row_stride(self.width()).unwrap_or(0);
        ImageInfo {
            width: self.width() as u32,
            height: self.height() as u32,
            bit_depth: depth,
            image_size: (stride * self.height()) as u32,
            top_down: self.header.is_top_down(),
        }
    }

    /// Invert every sample.
    pub fn negative(&mut self) {
        ops::negative(&mut self.pixels);
    }

    /// Collapse RGB to the mean of the three channels (24-bit only).
    pub fn grayscale(&mut self) -> Result<(), BitmapError> {
        ops::grayscale(&mut self.pixels)
    }

    /// Add `delta` to every sample, saturating at 0 and 255.
    pub fn brightness(&mut self, delta: i32) {
        ops::brightness(&mut self.pixels, delta);
    }

    /// Binarize intensities at `level` (8-bit only).
    pub fn threshold(&mut self, level: u8) -> Result<(), BitmapError> {
        ops::threshold(&mut self.pixels, level)
    }

    /// Convolve with an arbitrary odd-sized kernel.
    pub fn apply_filter(&mut self, kernel: &Kernel) -> Result<(), BitmapError> {
        convolve::apply(&mut self.pixels, kernel)
    }

    /// Convolve with one of the named kernels.
    pub fn filter(&mut self, filter: Filter) -> Result<(), BitmapError> {
        self.apply_filter(&filter.kernel())
    }

    pub fn box_blur(&mut self) -> Result<(), BitmapError> {
        self.filter(Filter::BoxBlur)
    }

    pub fn gaussian_blur(&mut self) -> Result<(), BitmapError> {
        self.filter(Filter::GaussianBlur)
    }

    pub fn sharpen(&mut self) -> Result<(), BitmapError> {
        self.filter(Filter::Sharpen)
    }

    pub fn outline(&mut self) -> Result<(), BitmapError> {
        self.filter(Filter::Outline)
    }

    pub fn emboss(&mut self) -> Result<(), BitmapError> {
        self.filter(Filter::Emboss)
    }

    /// Histogram-equalize intensity (8-bit) or luma (24-bit).
    pub fn equalize(&mut self) {
        equalize::equalize(&mut self.pixels);
    }
}
