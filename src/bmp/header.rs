//! BITMAPFILEHEADER + BITMAPINFOHEADER record and the color table.
//!
//! Every field is described once as an (offset, width) pair; parsing and
//! serialization both go through the same table.

use crate::error::BitmapError;
use crate::pixel::BitDepth;

/// File header (14 bytes) plus BITMAPINFOHEADER (40 bytes).
pub(crate) const HEADER_SIZE: usize = 54;
pub(crate) const FILE_HEADER_SIZE: u32 = 14;
pub(crate) const INFO_HEADER_SIZE: u32 = 40;
pub(crate) const PALETTE_ENTRY_SIZE: usize = 4;
pub(crate) const MAX_PALETTE_ENTRIES: usize = 256;

/// 72 DPI expressed in pixels per meter.
const DEFAULT_RESOLUTION: i32 = 2835;

#[derive(Clone, Copy)]
struct Field<const N: usize> {
    offset: usize,
}

impl<const N: usize> Field<N> {
    const fn at(offset: usize) -> Self {
        Self { offset }
    }

    fn read(self, block: &[u8; HEADER_SIZE]) -> [u8; N] {
        let mut out = [0u8; N];
        out.copy_from_slice(&block[self.offset..self.offset + N]);
        out
    }

    fn write(self, block: &mut [u8; HEADER_SIZE], bytes: [u8; N]) {
        block[self.offset..self.offset + N].copy_from_slice(&bytes);
    }
}

const SIGNATURE: Field<2> = Field::at(0);
const FILE_SIZE: Field<4> = Field::at(2);
const RESERVED: Field<4> = Field::at(6);
const DATA_OFFSET: Field<4> = Field::at(10);
const INFO_SIZE: Field<4> = Field::at(14);
const WIDTH: Field<4> = Field::at(18);
const HEIGHT: Field<4> = Field::at(22);
const PLANES: Field<2> = Field::at(26);
const BIT_COUNT: Field<2> = Field::at(28);
const COMPRESSION: Field<4> = Field::at(30);
const IMAGE_SIZE: Field<4> = Field::at(34);
const X_RESOLUTION: Field<4> = Field::at(38);
const Y_RESOLUTION: Field<4> = Field::at(42);
const COLORS_USED: Field<4> = Field::at(46);
const COLORS_IMPORTANT: Field<4> = Field::at(50);

/// Typed view of the first 54 bytes of a BMP file.
///
/// Fields are stored as read; [`BmpHeader::validate`] checks them against
/// what the codec supports.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BmpHeader {
    pub file_size: u32,
    pub reserved: u32,
    pub data_offset: u32,
    pub info_header_size: u32,
    pub width: i32,
    /// Negative for top-down row order.
    pub height: i32,
    pub planes: u16,
    pub bit_count: u16,
    pub compression: u32,
    pub image_size: u32,
    pub x_pixels_per_meter: i32,
    pub y_pixels_per_meter: i32,
    pub colors_used: u32,
    pub colors_important: u32,
}

/// Geometry derived from a validated header.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Layout {
    pub depth: BitDepth,
    pub width: usize,
    pub height: usize,
    pub top_down: bool,
    pub stride: usize,
    pub palette_entries: usize,
}

impl BmpHeader {
    /// Header for a freshly allocated bottom-up image with a default palette.
    pub(crate) fn synthesize(width: u32, height: u32, depth: BitDepth) -> Self {
        let palette_bytes = if depth.has_palette() {
            (MAX_PALETTE_ENTRIES * PALETTE_ENTRY_SIZE) as u32
        } else {
            0
        };
        Self {
            file_size: 0,
            reserved: 0,
            data_offset: HEADER_SIZE as u32 + palette_bytes,
            info_header_size: INFO_HEADER_SIZE,
            width: width as i32,
            height: height as i32,
            planes: 1,
            bit_count: depth.bits(),
            compression: 0,
            image_size: 0,
            x_pixels_per_meter: DEFAULT_RESOLUTION,
            y_pixels_per_meter: DEFAULT_RESOLUTION,
            colors_used: 0,
            colors_important: 0,
        }
    }

    /// Parse the fixed 54-byte block. Only the signature is checked here.
    pub fn parse(block: &[u8; HEADER_SIZE]) -> Result<Self, BitmapError> {
        if &SIGNATURE.read(block) != b"BM" {
            return Err(BitmapError::UnrecognizedFormat);
        }
        Ok(Self {
            file_size: u32::from_le_bytes(FILE_SIZE.read(block)),
            reserved: u32::from_le_bytes(RESERVED.read(block)),
            data_offset: u32::from_le_bytes(DATA_OFFSET.read(block)),
            info_header_size: u32::from_le_bytes(INFO_SIZE.read(block)),
            width: i32::from_le_bytes(WIDTH.read(block)),
            height: i32::from_le_bytes(HEIGHT.read(block)),
            planes: u16::from_le_bytes(PLANES.read(block)),
            bit_count: u16::from_le_bytes(BIT_COUNT.read(block)),
            compression: u32::from_le_bytes(COMPRESSION.read(block)),
            image_size: u32::from_le_bytes(IMAGE_SIZE.read(block)),
            x_pixels_per_meter: i32::from_le_bytes(X_RESOLUTION.read(block)),
            y_pixels_per_meter: i32::from_le_bytes(Y_RESOLUTION.read(block)),
            colors_used: u32::from_le_bytes(COLORS_USED.read(block)),
            colors_important: u32::from_le_bytes(COLORS_IMPORTANT.read(block)),
        })
    }

    /// Serialize back into the fixed 54-byte block.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut block = [0u8; HEADER_SIZE];
        SIGNATURE.write(&mut block, *b"BM");
        FILE_SIZE.write(&mut block, self.file_size.to_le_bytes());
        RESERVED.write(&mut block, self.reserved.to_le_bytes());
        DATA_OFFSET.write(&mut block, self.data_offset.to_le_bytes());
        INFO_SIZE.write(&mut block, self.info_header_size.to_le_bytes());
        WIDTH.write(&mut block, self.width.to_le_bytes());
        HEIGHT.write(&mut block, self.height.to_le_bytes());
        PLANES.write(&mut block, self.planes.to_le_bytes());
        BIT_COUNT.write(&mut block, self.bit_count.to_le_bytes());
        COMPRESSION.write(&mut block, self.compression.to_le_bytes());
        IMAGE_SIZE.write(&mut block, self.image_size.to_le_bytes());
        X_RESOLUTION.write(&mut block, self.x_pixels_per_meter.to_le_bytes());
        Y_RESOLUTION.write(&mut block, self.y_pixels_per_meter.to_le_bytes());
        COLORS_USED.write(&mut block, self.colors_used.to_le_bytes());
        COLORS_IMPORTANT.write(&mut block, self.colors_important.to_le_bytes());
        block
    }

    /// Whether rows are stored top scanline first.
    pub fn is_top_down(&self) -> bool {
        self.height < 0
    }

    /// Offset of the first color table byte.
    pub(crate) fn palette_offset(&self) -> usize {
        FILE_HEADER_SIZE as usize + self.info_header_size as usize
    }

    /// Check the fields against what the codec supports and derive the geometry.
    pub(crate) fn validate(&self) -> Result<Layout, BitmapError> {
        if self.info_header_size < INFO_HEADER_SIZE {
            return Err(BitmapError::UnsupportedVariant(format!(
                "BMP info header size {} (BITMAPINFOHEADER or later required)",
                self.info_header_size
            )));
        }
        if self.compression != 0 {
            return Err(BitmapError::UnsupportedVariant(format!(
                "BMP compression {} (only uncompressed is supported)",
                self.compression
            )));
        }
        let depth = BitDepth::from_bits(self.bit_count).ok_or_else(|| {
            BitmapError::UnsupportedVariant(format!(
                "BMP bit depth {} unsupported (8 or 24 required)",
                self.bit_count
            ))
        })?;
        if self.planes != 1 {
            return Err(BitmapError::InvalidHeader(format!(
                "BMP planes field is {}, expected 1",
                self.planes
            )));
        }
        if self.width <= 0 {
            return Err(BitmapError::InvalidHeader(format!(
                "BMP width {} is not positive",
                self.width
            )));
        }
        if self.height == 0 {
            return Err(BitmapError::InvalidHeader("BMP height is zero".into()));
        }

        let width = self.width as u32;
        let height = self.height.unsigned_abs();
        let stride = depth
            .row_stride(width as usize)
            .ok_or(BitmapError::DimensionsTooLarge { width, height })?;
        stride
            .checked_mul(height as usize)
            .filter(|&n| u32::try_from(n).is_ok())
            .ok_or(BitmapError::DimensionsTooLarge { width, height })?;

        let palette_entries = if depth.has_palette() {
            match self.colors_used as usize {
                0 => MAX_PALETTE_ENTRIES,
                n if n <= MAX_PALETTE_ENTRIES => n,
                n => {
                    return Err(BitmapError::InvalidHeader(format!(
                        "BMP palette count ({n}) exceeds max for 8-bit depth ({MAX_PALETTE_ENTRIES})"
                    )));
                }
            }
        } else {
            0
        };

        let palette_end = self.palette_offset() + palette_entries * PALETTE_ENTRY_SIZE;
        if (self.data_offset as usize) < palette_end {
            return Err(BitmapError::InvalidHeader(format!(
                "BMP pixel data offset {} points inside the header (data must start at or after {palette_end})",
                self.data_offset
            )));
        }

        Ok(Layout {
            depth,
            width: width as usize,
            height: height as usize,
            top_down: self.is_top_down(),
            stride,
            palette_entries,
        })
    }
}

/// Color table of an 8-bit BMP: blue, green, red, reserved per entry.
///
/// Carried through decode and encode unmodified. Filters operate on the
/// raw index bytes, so the table never participates in intensity math.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    entries: Vec<[u8; PALETTE_ENTRY_SIZE]>,
}

impl Palette {
    /// Linear gray ramp: entry `i` is `(i, i, i, 0)`.
    pub fn grayscale() -> Self {
        Self {
            entries: (0..=255u8).map(|i| [i, i, i, 0]).collect(),
        }
    }

    /// Build from raw table bytes: 1 to 256 four-byte entries.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, BitmapError> {
        if bytes.is_empty()
            || bytes.len() % PALETTE_ENTRY_SIZE != 0
            || bytes.len() > MAX_PALETTE_ENTRIES * PALETTE_ENTRY_SIZE
        {
            return Err(BitmapError::InvalidParameter(format!(
                "palette of {} bytes is not 1..=256 four-byte entries",
                bytes.len()
            )));
        }
        let entries = bytes
            .chunks_exact(PALETTE_ENTRY_SIZE)
            .map(|c| [c[0], c[1], c[2], c[3]])
            .collect();
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[[u8; PALETTE_ENTRY_SIZE]] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The table exactly as it is laid out on disk.
    pub fn as_bytes(&self) -> &[u8] {
        self.entries.as_flattened()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_block() -> [u8; HEADER_SIZE] {
        let mut header = BmpHeader::synthesize(3, 2, BitDepth::Rgb24);
        header.file_size = 78;
        header.image_size = 24;
        header.to_bytes()
    }

    #[test]
    fn fields_land_at_documented_offsets() {
        let block = sample_block();
        assert_eq!(&block[0..2], b"BM");
        assert_eq!(u32::from_le_bytes(block[2..6].try_into().unwrap()), 78);
        assert_eq!(u32::from_le_bytes(block[10..14].try_into().unwrap()), 54);
        assert_eq!(i32::from_le_bytes(block[18..22].try_into().unwrap()), 3);
        assert_eq!(i32::from_le_bytes(block[22..26].try_into().unwrap()), 2);
        assert_eq!(u16::from_le_bytes(block[28..30].try_into().unwrap()), 24);
        assert_eq!(u32::from_le_bytes(block[30..34].try_into().unwrap()), 0);
        assert_eq!(u32::from_le_bytes(block[34..38].try_into().unwrap()), 24);
    }

    #[test]
    fn parse_inverts_to_bytes() {
        let block = sample_block();
        let header = BmpHeader::parse(&block).unwrap();
        assert_eq!(header.to_bytes(), block);
        assert_eq!(header.width, 3);
        assert_eq!(header.bit_count, 24);
    }

    #[test]
    fn bad_signature_is_unrecognized() {
        let mut block = sample_block();
        block[0] = b'X';
        assert!(matches!(
            BmpHeader::parse(&block),
            Err(BitmapError::UnrecognizedFormat)
        ));
    }

    #[test]
    fn validate_rejects_compression_and_depth() {
        let mut header = BmpHeader::synthesize(4, 4, BitDepth::Rgb24);
        header.compression = 1;
        assert!(matches!(
            header.validate(),
            Err(BitmapError::UnsupportedVariant(_))
        ));

        let mut header = BmpHeader::synthesize(4, 4, BitDepth::Rgb24);
        header.bit_count = 32;
        assert!(matches!(
            header.validate(),
            Err(BitmapError::UnsupportedVariant(_))
        ));
    }

    #[test]
    fn validate_rejects_degenerate_dimensions() {
        let mut header = BmpHeader::synthesize(4, 4, BitDepth::Gray8);
        header.width = 0;
        assert!(matches!(header.validate(), Err(BitmapError::InvalidHeader(_))));

        let mut header = BmpHeader::synthesize(4, 4, BitDepth::Gray8);
        header.height = 0;
        assert!(matches!(header.validate(), Err(BitmapError::InvalidHeader(_))));
    }

    #[test]
    fn negative_height_is_top_down() {
        let mut header = BmpHeader::synthesize(5, 3, BitDepth::Gray8);
        header.height = -3;
        let layout = header.validate().unwrap();
        assert!(layout.top_down);
        assert_eq!(layout.height, 3);
        assert_eq!(layout.stride, 8);
        assert_eq!(layout.palette_entries, 256);
    }

    #[test]
    fn data_offset_inside_palette_is_rejected() {
        let mut header = BmpHeader::synthesize(2, 2, BitDepth::Gray8);
        header.data_offset = 54 + 512;
        assert!(matches!(header.validate(), Err(BitmapError::InvalidHeader(_))));
        header.colors_used = 128;
        assert!(header.validate().is_ok());
    }

    #[test]
    fn palette_bytes_must_hold_whole_entries() {
        assert!(matches!(
            Palette::from_bytes(&[]),
            Err(BitmapError::InvalidParameter(_))
        ));
        assert!(Palette::from_bytes(&[1, 2, 3]).is_err());
        assert!(Palette::from_bytes(&[0; 1028]).is_err());
        assert_eq!(Palette::from_bytes(&[9, 8, 7, 0]).unwrap().len(), 1);
    }

    #[test]
    fn grayscale_palette_is_a_ramp() {
        let palette = Palette::grayscale();
        assert_eq!(palette.len(), 256);
        assert_eq!(palette.entries()[200], [200, 200, 200, 0]);
        assert_eq!(palette.as_bytes().len(), 1024);
    }
}
