//! Static color tables for the palettized bit depths.
//!
//! Every table stores ready-to-emit 4-byte palette quads (blue, green,
//! red, reserved 0). The two 256-entry tables are built once on first
//! use and shared.

use std::sync::OnceLock;

/// Palette flavor for 8-bit captures. Ignored at every other depth.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PaletteType {
    Grayscale,
    #[default]
    Halftone,
}

pub(crate) type PaletteQuad = [u8; 4];

/// 1-bit: black and white.
pub(crate) const MONO: [PaletteQuad; 2] = [[0, 0, 0, 0], [255, 255, 255, 0]];

/// 4-bit: the 16 VGA colors. Component triples are written in their
/// listed order — the first component of each triple lands in the first
/// palette byte, carried through unchanged.
pub(crate) const VGA16: [PaletteQuad; 16] = [
    [0, 0, 0, 0],       // black
    [128, 0, 0, 0],     // dark red
    [0, 128, 0, 0],     // dark green
    [128, 128, 0, 0],   // dark yellow
    [0, 0, 128, 0],     // dark blue
    [128, 0, 128, 0],   // dark magenta
    [0, 128, 128, 0],   // dark cyan
    [192, 192, 192, 0], // light gray
    [128, 128, 128, 0], // dark gray
    [255, 0, 0, 0],     // red
    [0, 255, 0, 0],     // green
    [255, 255, 0, 0],   // yellow
    [0, 0, 255, 0],     // blue
    [255, 0, 255, 0],   // magenta
    [0, 255, 255, 0],   // cyan
    [255, 255, 255, 0], // white
];

/// The 20 static system colors heading the halftone palette, as (r, g, b).
const HALFTONE_SYSTEM_RGB: [(u8, u8, u8); 20] = [
    (0, 0, 0),       // black
    (128, 0, 0),     // dark red
    (0, 128, 0),     // dark green
    (128, 128, 0),   // dark yellow
    (0, 0, 128),     // dark blue
    (128, 0, 128),   // dark magenta
    (0, 128, 128),   // dark cyan
    (192, 192, 192), // light gray
    (192, 220, 192), // money green
    (166, 202, 240), // sky blue
    (255, 251, 240), // cream
    (160, 160, 164), // medium gray
    (128, 128, 128), // dark gray
    (255, 0, 0),     // red
    (0, 255, 0),     // green
    (255, 255, 0),   // yellow
    (0, 0, 255),     // blue
    (255, 0, 255),   // magenta
    (0, 255, 255),   // cyan
    (255, 255, 255), // white
];

/// 8-bit linear grayscale ramp.
pub(crate) fn grayscale() -> &'static [PaletteQuad; 256] {
    static TABLE: OnceLock<[PaletteQuad; 256]> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = [[0u8; 4]; 256];
        for (i, quad) in table.iter_mut().enumerate() {
            let v = i as u8;
            *quad = [v, v, v, 0];
        }
        table
    })
}

/// 8-bit halftone palette: the 20 system colors, a 6x6x6 color cube at
/// indices 20..=235 (red varying slowest), and a 20-step gray ramp at
/// indices 236..=255.
pub(crate) fn halftone() -> &'static [PaletteQuad; 256] {
    static TABLE: OnceLock<[PaletteQuad; 256]> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = [[0u8; 4]; 256];
        for (i, &(r, g, b)) in HALFTONE_SYSTEM_RGB.iter().enumerate() {
            table[i] = [b, g, r, 0];
        }
        let mut index = 20;
        for r in 0..6u16 {
            for g in 0..6u16 {
                for b in 0..6u16 {
                    table[index] = [(b * 51) as u8, (g * 51) as u8, (r * 51) as u8, 0];
                    index += 1;
                }
            }
        }
        for i in 0..20u32 {
            let v = ((i * 255 * 2 + 19) / 38) as u8;
            table[236 + i as usize] = [v, v, v, 0];
        }
        table
    })
}

/// The palette quads emitted for `num_colors` entries at a given depth;
/// empty above 8 bits per pixel.
pub(crate) fn table_for(palette_len: usize, palette_type: PaletteType) -> &'static [PaletteQuad] {
    match palette_len {
        2 => &MONO,
        16 => &VGA16,
        256 => match palette_type {
            PaletteType::Grayscale => grayscale(),
            PaletteType::Halftone => halftone(),
        },
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn halftone_cube_entries_step_by_51() {
        let table = halftone();
        for r in 0..6usize {
            for g in 0..6usize {
                for b in 0..6usize {
                    let quad = table[20 + 36 * r + 6 * g + b];
                    assert_eq!(
                        quad,
                        [(b * 51) as u8, (g * 51) as u8, (r * 51) as u8, 0],
                        "cube entry r={r} g={g} b={b}"
                    );
                }
            }
        }
    }

    #[test]
    fn halftone_head_is_the_system_color_block() {
        let table = halftone();
        assert_eq!(table[0], [0, 0, 0, 0]);
        assert_eq!(table[8], [192, 220, 192, 0]);
        assert_eq!(table[9], [240, 202, 166, 0]);
        assert_eq!(table[19], [255, 255, 255, 0]);
    }

    #[test]
    fn halftone_tail_is_a_rounded_gray_ramp() {
        let table = halftone();
        for i in 0..20u32 {
            let expected = ((i as f64 * 255.0 / 19.0).round()) as u8;
            assert_eq!(
                table[236 + i as usize],
                [expected, expected, expected, 0],
                "gray ramp entry {i}"
            );
        }
        assert_eq!(table[255], [255, 255, 255, 0]);
    }

    #[test]
    fn grayscale_is_the_identity_ramp() {
        let table = grayscale();
        assert_eq!(table[0], [0, 0, 0, 0]);
        assert_eq!(table[127], [127, 127, 127, 0]);
        assert_eq!(table[255], [255, 255, 255, 0]);
    }

    #[test]
    fn vga_table_carries_component_order_through() {
        // Dark red is listed as (128, 0, 0); the first listed component
        // occupies the first palette byte.
        assert_eq!(VGA16[1], [128, 0, 0, 0]);
        assert_eq!(VGA16[12], [0, 0, 255, 0]);
        assert_eq!(VGA16[15], [255, 255, 255, 0]);
    }

    #[test]
    fn reserved_byte_is_zero_everywhere() {
        for quad in halftone().iter().chain(grayscale().iter()) {
            assert_eq!(quad[3], 0);
        }
    }
}
