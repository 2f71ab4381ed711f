//! In-memory BMP assembly.
//!
//! [`BmpImage`] owns one contiguous buffer holding the 14-byte file
//! header, the 40-byte info header, the palette (when the depth carries
//! one), and the zero-filled pixel region. A second, 4-byte-aligned
//! block repeats the info header + palette so native bitmap readers can
//! treat its address as a `BITMAPINFO`. Neither buffer is reallocated
//! for the lifetime of a capture.

use crate::bmp::palette::{self, PaletteType};
use crate::bmp::{BitDepth, row_stride};
use crate::error::{CaptureError, CaptureResult};

pub(crate) const FILE_HEADER_LEN: usize = 14;
pub(crate) const INFO_HEADER_LEN: usize = 40;

pub struct BmpImage {
    bytes: Vec<u8>,
    /// Info header + palette backed by u32 words so the block address
    /// satisfies `BITMAPINFO` alignment.
    info: Vec<u32>,
    width: i32,
    height: i32,
    bit_depth: BitDepth,
    stride: usize,
    pixel_offset: usize,
}

impl BmpImage {
    /// Lay out an empty bottom-up BMP of the given geometry. The pixel
    /// region is zero-filled and sized `stride * height`.
    pub fn new(
        width: i32,
        height: i32,
        bit_depth: BitDepth,
        palette_type: PaletteType,
    ) -> CaptureResult<Self> {
        if width <= 0 || height <= 0 {
            return Err(CaptureError::InvalidRegion(format!(
                "bitmap extent {width}x{height}"
            )));
        }

        let num_colors = bit_depth.palette_len();
        let palette_bytes = num_colors * 4;
        let stride = row_stride(bit_depth.bits(), width as usize);
        let pixel_offset = FILE_HEADER_LEN + INFO_HEADER_LEN + palette_bytes;
        let pixel_size = stride
            .checked_mul(height as usize)
            .ok_or(CaptureError::BufferOverflow)?;
        let file_len = pixel_offset
            .checked_add(pixel_size)
            .ok_or(CaptureError::BufferOverflow)?;
        let file_len_u32 = u32::try_from(file_len).map_err(|_| CaptureError::BufferOverflow)?;

        let mut bytes = vec![0u8; file_len];

        bytes[0] = b'B';
        bytes[1] = b'M';
        put_u32(&mut bytes, 2, file_len_u32);
        // Reserved words at 6..10 stay zero.
        put_u32(&mut bytes, 10, pixel_offset as u32);

        put_u32(&mut bytes, 14, INFO_HEADER_LEN as u32);
        put_i32(&mut bytes, 18, width);
        // Positive height: rows are stored bottom-up.
        put_i32(&mut bytes, 22, height);
        put_u16(&mut bytes, 26, 1);
        put_u16(&mut bytes, 28, bit_depth.bits());
        put_u32(&mut bytes, 30, 0);
        put_u32(&mut bytes, 34, pixel_size as u32);
        put_i32(&mut bytes, 38, 0);
        put_i32(&mut bytes, 42, 0);
        put_u32(&mut bytes, 46, num_colors as u32);
        put_u32(&mut bytes, 50, num_colors as u32);

        let table = palette::table_for(num_colors, palette_type);
        for (i, quad) in table.iter().enumerate() {
            let at = FILE_HEADER_LEN + INFO_HEADER_LEN + i * 4;
            bytes[at..at + 4].copy_from_slice(quad);
        }

        let info_len = INFO_HEADER_LEN + palette_bytes;
        let mut info = vec![0u32; info_len / 4];
        for (word, chunk) in info
            .iter_mut()
            .zip(bytes[FILE_HEADER_LEN..FILE_HEADER_LEN + info_len].chunks_exact(4))
        {
            *word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }

        Ok(Self {
            bytes,
            info,
            width,
            height,
            bit_depth,
            stride,
            pixel_offset,
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn bit_depth(&self) -> BitDepth {
        self.bit_depth
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn pixel_offset(&self) -> usize {
        self.pixel_offset
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn pixel_region(&self) -> &[u8] {
        &self.bytes[self.pixel_offset..]
    }

    pub fn pixel_region_mut(&mut self) -> &mut [u8] {
        &mut self.bytes[self.pixel_offset..]
    }

    /// The info-header + palette block laid out as a native bitmap
    /// description. The returned view is 4-byte aligned.
    pub fn info_block(&self) -> &[u8] {
        // The words were written little-endian, so their in-memory bytes
        // are exactly the on-disk header bytes on the targets this crate
        // captures on.
        unsafe { std::slice::from_raw_parts(self.info.as_ptr().cast::<u8>(), self.info.len() * 4) }
    }

    #[cfg(target_os = "windows")]
    pub(crate) fn info_block_ptr(&mut self) -> *mut u8 {
        self.info.as_mut_ptr().cast()
    }

    #[cfg(target_os = "windows")]
    pub(crate) fn pixel_region_ptr(&mut self) -> *mut u8 {
        let offset = self.pixel_offset;
        // Vec indexing keeps this in bounds; the region length is
        // stride * height by construction.
        unsafe { self.bytes.as_mut_ptr().add(offset) }
    }
}

fn put_u16(buf: &mut [u8], at: usize, value: u16) {
    buf[at..at + 2].copy_from_slice(&value.to_le_bytes());
}

fn put_u32(buf: &mut [u8], at: usize, value: u32) {
    buf[at..at + 4].copy_from_slice(&value.to_le_bytes());
}

fn put_i32(buf: &mut [u8], at: usize, value: i32) {
    buf[at..at + 4].copy_from_slice(&value.to_le_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_u32(buf: &[u8], at: usize) -> u32 {
        u32::from_le_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]])
    }

    fn read_u16(buf: &[u8], at: usize) -> u16 {
        u16::from_le_bytes([buf[at], buf[at + 1]])
    }

    #[test]
    fn header_fields_are_consistent_across_depths() {
        for depth in [
            BitDepth::Bpp1,
            BitDepth::Bpp4,
            BitDepth::Bpp8,
            BitDepth::Bpp16,
            BitDepth::Bpp24,
            BitDepth::Bpp32,
        ] {
            let image = BmpImage::new(33, 7, depth, PaletteType::Halftone).unwrap();
            let bytes = image.bytes();
            let num_colors = depth.palette_len();
            let expected_offset = 14 + 40 + num_colors * 4;
            let expected_stride = (depth.bits() as usize * 33).div_ceil(32) * 4;

            assert_eq!(&bytes[0..2], b"BM");
            assert_eq!(read_u32(bytes, 10) as usize, expected_offset);
            assert_eq!(read_u32(bytes, 14), 40);
            assert_eq!(read_u32(bytes, 18), 33);
            assert_eq!(read_u32(bytes, 22), 7);
            assert_eq!(read_u16(bytes, 26), 1);
            assert_eq!(read_u16(bytes, 28), depth.bits());
            assert_eq!(read_u32(bytes, 30), 0);
            assert_eq!(read_u32(bytes, 34) as usize, expected_stride * 7);
            assert_eq!(read_u32(bytes, 46) as usize, num_colors);
            assert_eq!(read_u32(bytes, 50) as usize, num_colors);
            assert_eq!(
                read_u32(bytes, 2) as usize,
                expected_offset + expected_stride * 7
            );
            assert_eq!(bytes.len(), expected_offset + expected_stride * 7);
            assert_eq!(image.stride(), expected_stride);
            assert_eq!(image.pixel_region().len(), expected_stride * 7);
        }
    }

    #[test]
    fn high_depths_carry_no_palette() {
        for depth in [BitDepth::Bpp16, BitDepth::Bpp24, BitDepth::Bpp32] {
            let image = BmpImage::new(4, 4, depth, PaletteType::Halftone).unwrap();
            assert_eq!(image.pixel_offset(), 54);
            assert_eq!(image.info_block().len(), 40);
        }
    }

    #[test]
    fn palette_type_selects_the_eight_bit_table() {
        let gray = BmpImage::new(2, 2, BitDepth::Bpp8, PaletteType::Grayscale).unwrap();
        // Entry 1 of the grayscale ramp is (1, 1, 1).
        assert_eq!(&gray.bytes()[54 + 4..54 + 8], &[1, 1, 1, 0]);

        let halftone = BmpImage::new(2, 2, BitDepth::Bpp8, PaletteType::Halftone).unwrap();
        // Entry 1 of the halftone head is dark red: blue 0, green 0, red 128.
        assert_eq!(&halftone.bytes()[54 + 4..54 + 8], &[0, 0, 128, 0]);
    }

    #[test]
    fn info_block_mirrors_the_file_header_bytes() {
        let image = BmpImage::new(5, 3, BitDepth::Bpp4, PaletteType::Halftone).unwrap();
        let info = image.info_block();
        assert_eq!(info.len(), 40 + 16 * 4);
        assert_eq!(info, &image.bytes()[14..14 + info.len()]);
        assert_eq!(info.as_ptr() as usize % 4, 0);
    }

    #[test]
    fn pixel_region_starts_zeroed() {
        let image = BmpImage::new(3, 3, BitDepth::Bpp24, PaletteType::Halftone).unwrap();
        assert!(image.pixel_region().iter().all(|&b| b == 0));
    }

    #[test]
    fn rejects_empty_geometry() {
        assert!(matches!(
            BmpImage::new(0, 5, BitDepth::Bpp24, PaletteType::Halftone),
            Err(CaptureError::InvalidRegion(_))
        ));
        assert!(matches!(
            BmpImage::new(5, -1, BitDepth::Bpp24, PaletteType::Halftone),
            Err(CaptureError::InvalidRegion(_))
        ));
    }
}
