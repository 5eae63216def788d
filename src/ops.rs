//! Per-pixel operations: negative, grayscale, brightness, threshold.

use rgb::ComponentMap;

use crate::error::BitmapError;
use crate::image::{PixelBuffer, Samples};
use crate::pixel::BitDepth;

/// Replace every sample `v` with `255 - v`.
pub fn negative(pixels: &mut PixelBuffer) {
    match &mut pixels.samples {
        Samples::Gray8(img) => img.buf_mut().iter_mut().for_each(|v| *v = 255 - *v),
        Samples::Rgb24(img) => img
            .buf_mut()
            .iter_mut()
            .for_each(|px| *px = px.map(|c| 255 - c)),
    }
}

/// Set R, G, and B to the truncated mean `(r + g + b) / 3`.
///
/// 8-bit images are already single-channel and are rejected with
/// [`BitmapError::DepthMismatch`].
pub fn grayscale(pixels: &mut PixelBuffer) -> Result<(), BitmapError> {
    let Samples::Rgb24(img) = &mut pixels.samples else {
        return Err(BitmapError::DepthMismatch {
            operation: "grayscale",
            depth: BitDepth::Gray8,
        });
    };
    for px in img.buf_mut().iter_mut() {
        let mean = ((u16::from(px.r) + u16::from(px.g) + u16::from(px.b)) / 3) as u8;
        px.r = mean;
        px.g = mean;
        px.b = mean;
    }
    Ok(())
}

/// Add `delta` to every channel sample, clamped to `0..=255`.
pub fn brightness(pixels: &mut PixelBuffer, delta: i32) {
    let adjust = |v: u8| (i32::from(v).saturating_add(delta)).clamp(0, 255) as u8;
    match &mut pixels.samples {
        Samples::Gray8(img) => img.buf_mut().iter_mut().for_each(|v| *v = adjust(*v)),
        Samples::Rgb24(img) => img
            .buf_mut()
            .iter_mut()
            .for_each(|px| *px = px.map(adjust)),
    }
}

/// Map each intensity to 255 if it is at least `level`, else 0 (8-bit only).
pub fn threshold(pixels: &mut PixelBuffer, level: u8) -> Result<(), BitmapError> {
    let Samples::Gray8(img) = &mut pixels.samples else {
        return Err(BitmapError::DepthMismatch {
            operation: "threshold",
            depth: BitDepth::Rgb24,
        });
    };
    img.buf_mut()
        .iter_mut()
        .for_each(|v| *v = if *v >= level { 255 } else { 0 });
    Ok(())
}
