/// Bits per pixel of a supported BMP variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BitDepth {
    /// One 8-bit intensity (palette index) per pixel.
    Gray8,
    /// Blue, green, red bytes per pixel on disk; RGB in memory.
    Rgb24,
}

impl BitDepth {
    /// Map the header's bit-count field to a supported depth.
    pub fn from_bits(bits: u16) -> Option<Self> {
        match bits {
            8 => Some(Self::Gray8),
            24 => Some(Self::Rgb24),
            _ => None,
        }
    }

    /// Value written to the header's bit-count field.
    pub fn bits(self) -> u16 {
        match self {
            Self::Gray8 => 8,
            Self::Rgb24 => 24,
        }
    }

    /// Bytes per pixel for this depth.
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Gray8 => 1,
            Self::Rgb24 => 3,
        }
    }

    /// Byte length of one on-disk scanline, padded to a multiple of 4.
    pub fn row_stride(self, width: usize) -> Option<usize> {
        width
            .checked_mul(self.bytes_per_pixel())
            .and_then(|r| r.checked_add(3))
            .map(|r| r & !3)
    }

    /// Pad bytes appended after `width` pixels of one scanline.
    pub fn row_padding(self, width: usize) -> usize {
        (4 - (width * self.bytes_per_pixel()) % 4) % 4
    }

    /// Whether the on-disk layout carries a color table.
    pub fn has_palette(self) -> bool {
        matches!(self, Self::Gray8)
    }
}
