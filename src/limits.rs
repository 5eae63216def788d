use crate::error::BitmapError;
use crate::pixel::BitDepth;

/// Bounds a decoder enforces on untrusted BMP headers.
///
/// Checked right after the header is validated, before the color table or
/// pixel grid is allocated. A refused image yields
/// [`BitmapError::LimitExceeded`]. `Default` imposes no bounds, which is
/// what [`crate::decode_bmp`] and [`crate::load`] use.
#[derive(Clone, Debug, Default)]
pub struct Limits {
    pub max_width: Option<u64>,
    pub max_height: Option<u64>,
    /// Maximum `width * height`.
    pub max_pixels: Option<u64>,
    /// Maximum size of the decoded grid: 1 byte per pixel for 8-bit, 3 for 24-bit.
    pub max_memory_bytes: Option<u64>,
}

impl Limits {
    /// Refuse a `width` x `height` image of `depth` if any bound is exceeded.
    pub(crate) fn check(&self, width: u32, height: u32, depth: BitDepth) -> Result<(), BitmapError> {
        let pixels = u64::from(width) * u64::from(height);
        let grid_bytes = pixels.saturating_mul(depth.bytes_per_pixel() as u64);
        let bounds = [
            ("width", u64::from(width), self.max_width),
            ("height", u64::from(height), self.max_height),
            ("pixel count", pixels, self.max_pixels),
            ("pixel grid bytes", grid_bytes, self.max_memory_bytes),
        ];
        for (what, value, max) in bounds {
            if let Some(max) = max.filter(|&max| value > max) {
                return Err(BitmapError::LimitExceeded(format!(
                    "{what} {value} exceeds limit {max}"
                )));
            }
        }
        Ok(())
    }
}

/// Allocate a vector of `len` copies of `fill`, reporting failure instead of aborting.
pub(crate) fn try_filled<T: Clone>(len: usize, fill: T) -> Result<Vec<T>, BitmapError> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)
        .map_err(|_| BitmapError::AllocationFailed {
            bytes: len.saturating_mul(core::mem::size_of::<T>()),
        })?;
    v.resize(len, fill);
    Ok(v)
}
