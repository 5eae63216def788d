//! Square-kernel convolution over 8-bit and 24-bit pixel buffers.
//!
//! BORDER HANDLING: clamp (replicate edge pixels). Samples that fall outside
//! the image are read from the nearest valid row and column, so borders keep
//! their brightness under normalized kernels.
//!
//! Every pass writes into a freshly allocated buffer; the source is only
//! replaced once the whole destination has been computed.

use imgref::ImgVec;
use log::debug;
use rgb::RGB8;

use crate::error::BitmapError;
use crate::image::{PixelBuffer, Samples};
use crate::limits::try_filled;

/// An owned, immutable square kernel with an odd side length.
#[derive(Clone, Debug, PartialEq)]
pub struct Kernel {
    side: usize,
    weights: Box<[f32]>,
}

impl Kernel {
    /// Construct a kernel from row-major weights.
    ///
    /// Fails with [`BitmapError::InvalidKernel`] if `side` is even or zero,
    /// if `weights.len() != side * side`, or if any weight is not finite.
    pub fn new(side: usize, weights: impl Into<Vec<f32>>) -> Result<Self, BitmapError> {
        let weights = weights.into();
        if side == 0 || side % 2 == 0 {
            return Err(BitmapError::InvalidKernel(format!(
                "side length must be odd (got {side})"
            )));
        }
        if Some(weights.len()) != side.checked_mul(side) {
            return Err(BitmapError::InvalidKernel(format!(
                "{side}x{side} kernel needs {} weights, got {}",
                side.saturating_mul(side),
                weights.len()
            )));
        }
        if let Some(w) = weights.iter().find(|w| !w.is_finite()) {
            return Err(BitmapError::InvalidKernel(format!("non-finite weight {w}")));
        }
        Ok(Self {
            side,
            weights: weights.into_boxed_slice(),
        })
    }

    /// Construct a kernel from an N×N array of rows.
    pub fn from_rows<const N: usize>(rows: [[f32; N]; N]) -> Result<Self, BitmapError> {
        Self::new(N, rows.as_flattened())
    }

    fn fixed(rows: [[f32; 3]; 3]) -> Self {
        Self {
            side: 3,
            weights: rows.as_flattened().into(),
        }
    }

    pub fn side(&self) -> usize {
        self.side
    }

    /// Half the side length: offsets run over `-radius..=radius`.
    pub fn radius(&self) -> usize {
        self.side / 2
    }

    /// Weight applied to the sample at (`dx`, `dy`) from the center.
    pub fn weight(&self, dx: isize, dy: isize) -> Option<f32> {
        let r = self.radius() as isize;
        if dx.abs() > r || dy.abs() > r {
            return None;
        }
        Some(self.weights[((dy + r) as usize) * self.side + (dx + r) as usize])
    }

    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// All weights 1/9.
    pub fn box_blur() -> Self {
        Self::fixed([[1.0 / 9.0; 3]; 3])
    }

    pub fn gaussian_blur() -> Self {
        Self::fixed([
            [1.0 / 16.0, 2.0 / 16.0, 1.0 / 16.0],
            [2.0 / 16.0, 4.0 / 16.0, 2.0 / 16.0],
            [1.0 / 16.0, 2.0 / 16.0, 1.0 / 16.0],
        ])
    }

    pub fn sharpen() -> Self {
        Self::fixed([[0.0, -1.0, 0.0], [-1.0, 5.0, -1.0], [0.0, -1.0, 0.0]])
    }

    pub fn outline() -> Self {
        Self::fixed([[-1.0, -1.0, -1.0], [-1.0, 8.0, -1.0], [-1.0, -1.0, -1.0]])
    }

    pub fn emboss() -> Self {
        Self::fixed([[-2.0, -1.0, 0.0], [-1.0, 1.0, 1.0], [0.0, 1.0, 2.0]])
    }
}

/// The named 3×3 filters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Filter {
    BoxBlur,
    GaussianBlur,
    Sharpen,
    Outline,
    Emboss,
}

impl Filter {
    pub const ALL: [Filter; 5] = [
        Filter::BoxBlur,
        Filter::GaussianBlur,
        Filter::Sharpen,
        Filter::Outline,
        Filter::Emboss,
    ];

    pub fn kernel(self) -> Kernel {
        match self {
            Self::BoxBlur => Kernel::box_blur(),
            Self::GaussianBlur => Kernel::gaussian_blur(),
            Self::Sharpen => Kernel::sharpen(),
            Self::Outline => Kernel::outline(),
            Self::Emboss => Kernel::emboss(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::BoxBlur => "box blur",
            Self::GaussianBlur => "gaussian blur",
            Self::Sharpen => "sharpen",
            Self::Outline => "outline",
            Self::Emboss => "emboss",
        }
    }
}

/// A pixel type whose channels can be accumulated independently.
trait Convolve: Copy + Default {
    type Sum: Copy;
    const ZERO: Self::Sum;

    fn accumulate(sum: Self::Sum, px: Self, weight: f32) -> Self::Sum;
    fn finish(sum: Self::Sum) -> Self;
}

fn to_sample(v: f32) -> u8 {
    v.clamp(0.0, 255.0).round() as u8
}

impl Convolve for u8 {
    type Sum = f32;
    const ZERO: f32 = 0.0;

    #[inline]
    fn accumulate(sum: f32, px: u8, weight: f32) -> f32 {
        sum + f32::from(px) * weight
    }

    #[inline]
    fn finish(sum: f32) -> u8 {
        to_sample(sum)
    }
}

impl Convolve for RGB8 {
    type Sum = [f32; 3];
    const ZERO: [f32; 3] = [0.0; 3];

    #[inline]
    fn accumulate([r, g, b]: [f32; 3], px: RGB8, weight: f32) -> [f32; 3] {
        [
            r + f32::from(px.r) * weight,
            g + f32::from(px.g) * weight,
            b + f32::from(px.b) * weight,
        ]
    }

    #[inline]
    fn finish([r, g, b]: [f32; 3]) -> RGB8 {
        RGB8::new(to_sample(r), to_sample(g), to_sample(b))
    }
}

fn convolve_plane<P: Convolve>(src: &ImgVec<P>, kernel: &Kernel) -> Result<ImgVec<P>, BitmapError> {
    let w = src.width();
    let h = src.height();
    let side = kernel.side();
    let r = kernel.radius() as isize;
    let pixels = src.buf();
    let mut out = try_filled(w * h, P::default())?;

    // Clamped source column for each (x, kernel column) pair.
    let mut columns = Vec::with_capacity(w * side);
    for x in 0..w as isize {
        for k in 0..side as isize {
            columns.push((x + k - r).clamp(0, w as isize - 1) as usize);
        }
    }

    for y in 0..h {
        let dst_row = &mut out[y * w..(y + 1) * w];
        for (x, dst) in dst_row.iter_mut().enumerate() {
            let mut sum = P::ZERO;
            for k_row in 0..side {
                let sy = (y as isize + k_row as isize - r).clamp(0, h as isize - 1) as usize;
                let src_row = &pixels[sy * w..(sy + 1) * w];
                let k_weights = &kernel.weights()[k_row * side..(k_row + 1) * side];
                let cols = &columns[x * side..(x + 1) * side];
                for (&sx, &weight) in cols.iter().zip(k_weights) {
                    sum = P::accumulate(sum, src_row[sx], weight);
                }
            }
            *dst = P::finish(sum);
        }
    }

    Ok(ImgVec::new(out, w, h))
}

/// Convolve into a new buffer of the same size and depth.
pub fn convolve(pixels: &PixelBuffer, kernel: &Kernel) -> Result<PixelBuffer, BitmapError> {
    Ok(match &pixels.samples {
        Samples::Gray8(img) => PixelBuffer::gray(convolve_plane(img, kernel)?),
        Samples::Rgb24(img) => PixelBuffer::rgb(convolve_plane(img, kernel)?),
    })
}

/// Convolve and replace `pixels` with the result. On error `pixels` is untouched.
pub fn apply(pixels: &mut PixelBuffer, kernel: &Kernel) -> Result<(), BitmapError> {
    let filtered = convolve(pixels, kernel)?;
    debug!(
        "applied {}x{} kernel to {}x{} {:?} image",
        kernel.side(),
        kernel.side(),
        pixels.width(),
        pixels.height(),
        pixels.depth()
    );
    *pixels = filtered;
    Ok(())
}
