//! Histogram equalization.
//!
//! Algorithm:
//!   1. Compute a 256-bin histogram of the intensity channel.
//!   2. Build the cumulative distribution (CDF).
//!   3. Remap: `lut[i] = round((cdf[i] - cdf_min) / (total - cdf_min) * 255)`,
//!      where `cdf_min` is the first non-zero CDF value.
//!
//! 8-bit images are remapped sample by sample. 24-bit images are converted
//! to YUV, only Y is remapped, and the result is converted back; hue and
//! saturation survive, unlike per-channel equalization.

use log::debug;
use rgb::RGB8;

use crate::image::{PixelBuffer, Samples};

/// Which channel a histogram is taken over.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Intensity for 8-bit images; rounded `Y` for 24-bit images.
    Luma,
    Red,
    Green,
    Blue,
}

/// Pixel counts per intensity level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Histogram {
    counts: [u64; 256],
}

/// Cumulative pixel counts per intensity level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cdf {
    values: [u64; 256],
}

/// A 256-entry intensity remapping table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lut {
    table: [u8; 256],
}

impl Histogram {
    /// Tally `channel` over every pixel. For 8-bit images every channel
    /// reads the single intensity sample.
    pub fn compute(pixels: &PixelBuffer, channel: Channel) -> Self {
        let mut counts = [0u64; 256];
        match &pixels.samples {
            Samples::Gray8(img) => {
                for &v in img.buf().iter() {
                    counts[usize::from(v)] += 1;
                }
            }
            Samples::Rgb24(img) => {
                for &px in img.buf().iter() {
                    let level = match channel {
                        Channel::Luma => luma_level(Yuv::from_rgb(px).y),
                        Channel::Red => px.r,
                        Channel::Green => px.g,
                        Channel::Blue => px.b,
                    };
                    counts[usize::from(level)] += 1;
                }
            }
        }
        Self { counts }
    }

    pub fn from_counts(counts: [u64; 256]) -> Self {
        Self { counts }
    }

    pub fn counts(&self) -> &[u64; 256] {
        &self.counts
    }

    pub fn get(&self, level: u8) -> u64 {
        self.counts[usize::from(level)]
    }

    /// Number of pixels tallied.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// `cdf[0] = hist[0]`, `cdf[i] = cdf[i - 1] + hist[i]`.
    pub fn cdf(&self) -> Cdf {
        let mut values = [0u64; 256];
        let mut running = 0u64;
        for (cdf, &count) in values.iter_mut().zip(self.counts.iter()) {
            running += count;
            *cdf = running;
        }
        Cdf { values }
    }
}

impl Cdf {
    pub fn values(&self) -> &[u64; 256] {
        &self.values
    }

    pub fn get(&self, level: u8) -> u64 {
        self.values[usize::from(level)]
    }

    /// The first non-zero cumulative count, if any pixel was tallied.
    pub fn min_nonzero(&self) -> Option<u64> {
        self.values.iter().copied().find(|&c| c > 0)
    }

    /// Derive the equalization table for an image of `total_pixels` pixels.
    ///
    /// When every pixel shares one level (`total_pixels == cdf_min`) there
    /// is nothing to spread and the table is all zeros.
    pub fn lut(&self, total_pixels: u64) -> Lut {
        let mut table = [0u8; 256];
        let Some(cdf_min) = self.min_nonzero() else {
            return Lut { table };
        };
        if total_pixels <= cdf_min {
            debug!("equalize: degenerate histogram (cdf_min {cdf_min} of {total_pixels} pixels)");
            return Lut { table };
        }

        let denom = (total_pixels - cdf_min) as f32;
        for (out, &c) in table.iter_mut().zip(self.values.iter()) {
            let val = (c as f32 - cdf_min as f32) / denom * 255.0;
            *out = val.round().clamp(0.0, 255.0) as u8;
        }
        debug!("equalize: cdf_min {cdf_min}, {total_pixels} pixels");
        Lut { table }
    }
}

impl Lut {
    pub fn table(&self) -> &[u8; 256] {
        &self.table
    }

    #[inline]
    pub fn apply(&self, level: u8) -> u8 {
        self.table[usize::from(level)]
    }
}

#[derive(Clone, Copy, Debug)]
struct Yuv {
    y: f32,
    u: f32,
    v: f32,
}

impl Yuv {
    fn from_rgb(px: RGB8) -> Self {
        let (r, g, b) = (f32::from(px.r), f32::from(px.g), f32::from(px.b));
        Self {
            y: 0.299 * r + 0.587 * g + 0.114 * b,
            u: -0.14713 * r - 0.28886 * g + 0.436 * b,
            v: 0.615 * r - 0.51499 * g - 0.10001 * b,
        }
    }

    fn to_rgb(self) -> RGB8 {
        let Self { y, u, v } = self;
        RGB8::new(
            to_sample(y + 1.13983 * v),
            to_sample(y - 0.39465 * u - 0.58060 * v),
            to_sample(y + 2.03211 * u),
        )
    }
}

fn to_sample(v: f32) -> u8 {
    v.clamp(0.0, 255.0).round() as u8
}

fn luma_level(y: f32) -> u8 {
    y.round().clamp(0.0, 255.0) as u8
}

/// Equalize intensity (8-bit) or luma with chroma preserved (24-bit), in place.
pub fn equalize(pixels: &mut PixelBuffer) {
    let total = (pixels.width() * pixels.height()) as u64;
    let lut = Histogram::compute(pixels, Channel::Luma).cdf().lut(total);
    match &mut pixels.samples {
        Samples::Gray8(img) => {
            for v in img.buf_mut().iter_mut() {
                *v = lut.apply(*v);
            }
        }
        Samples::Rgb24(img) => {
            for px in img.buf_mut().iter_mut() {
                let mut yuv = Yuv::from_rgb(*px);
                yuv.y = f32::from(lut.apply(luma_level(yuv.y)));
                *px = yuv.to_rgb();
            }
        }
    }
}
