//! Quantization for lossy compression

use crate::dct::Block;
use halftone_core::consts::BLOCK_SIZE;
use halftone_core::Direction;

/// 8×8 table of positive divisors, stored row-major by vertical frequency
/// (row `v`, column `u`) like the JPEG Annex K tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantTable([[u16; BLOCK_SIZE]; BLOCK_SIZE]);

impl QuantTable {
    pub const fn new(rows: [[u16; BLOCK_SIZE]; BLOCK_SIZE]) -> Self {
        Self(rows)
    }

    /// Divisor for horizontal frequency `u`, vertical frequency `v`
    #[inline]
    pub fn at(&self, u: usize, v: usize) -> f64 {
        self.0[v][u] as f64
    }

    pub fn rows(&self) -> &[[u16; BLOCK_SIZE]; BLOCK_SIZE] {
        &self.0
    }
}

/// Standard perceptual luminance table (JPEG Annex K)
pub const STANDARD_TABLE: QuantTable = QuantTable::new([
    [16, 11, 10, 16, 24, 40, 51, 61],
    [12, 12, 14, 19, 26, 58, 60, 55],
    [14, 13, 16, 24, 40, 57, 69, 56],
    [14, 17, 22, 29, 51, 87, 80, 62],
    [18, 22, 37, 56, 68, 109, 103, 77],
    [24, 35, 55, 64, 81, 104, 113, 92],
    [49, 64, 78, 87, 103, 121, 120, 101],
    [72, 92, 95, 98, 112, 100, 103, 99],
]);

/// Alternate table: linear ramp `1 + (1 + u + v) * 2`
pub const CUSTOM_TABLE: QuantTable = QuantTable::new(ramp_table(2));

const fn ramp_table(step: u16) -> [[u16; BLOCK_SIZE]; BLOCK_SIZE] {
    let mut rows = [[0u16; BLOCK_SIZE]; BLOCK_SIZE];
    let mut v = 0;
    while v < BLOCK_SIZE {
        let mut u = 0;
        while u < BLOCK_SIZE {
            rows[v][u] = 1 + (1 + u as u16 + v as u16) * step;
            u += 1;
        }
        v += 1;
    }
    rows
}

/// Which predefined table the pipeline uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuantPreset {
    #[default]
    Standard,
    Custom,
}

impl QuantPreset {
    pub fn table(&self) -> &'static QuantTable {
        match self {
            QuantPreset::Standard => &STANDARD_TABLE,
            QuantPreset::Custom => &CUSTOM_TABLE,
        }
    }
}

/// Quantize (forward) or dequantize (inverse) one block of coefficients
///
/// Forward divides by the co-located divisor and rounds half away from zero;
/// inverse multiplies back.
pub fn quantize(block: &Block, table: &QuantTable, direction: Direction) -> Block {
    let mut output = [[0.0; BLOCK_SIZE]; BLOCK_SIZE];
    for (u, column) in block.iter().enumerate() {
        for (v, &coeff) in column.iter().enumerate() {
            let q = table.at(u, v);
            output[u][v] = match direction {
                Direction::Forward => (coeff / q).round(),
                Direction::Inverse => coeff * q,
            };
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_orientation() {
        // Row 0 is the first horizontal run of the Annex K table
        assert_eq!(STANDARD_TABLE.at(1, 0), 11.0);
        assert_eq!(STANDARD_TABLE.at(0, 1), 12.0);
        assert_eq!(STANDARD_TABLE.at(7, 7), 99.0);
    }

    #[test]
    fn test_custom_ramp() {
        assert_eq!(CUSTOM_TABLE.at(0, 0), 3.0);
        assert_eq!(CUSTOM_TABLE.at(7, 0), 17.0);
        assert_eq!(CUSTOM_TABLE.at(7, 7), 31.0);
        assert_eq!(QuantPreset::Custom.table(), &CUSTOM_TABLE);
        assert_eq!(QuantPreset::default().table(), &STANDARD_TABLE);
    }

    #[test]
    fn test_round_half_away_from_zero() {
        let mut block = [[0.0; 8]; 8];
        block[0][0] = 24.0; // 24 / 16 = 1.5
        block[0][1] = -18.0; // -18 / 12 = -1.5
        block[1][0] = 5.4; // 5.4 / 11 < 0.5
        let q = quantize(&block, &STANDARD_TABLE, Direction::Forward);
        assert_eq!(q[0][0], 2.0);
        assert_eq!(q[0][1], -2.0);
        assert_eq!(q[1][0], 0.0);
    }

    #[test]
    fn test_dequantize_within_half_step() {
        for preset in [QuantPreset::Standard, QuantPreset::Custom] {
            let table = preset.table();
            let mut block = [[0.0; 8]; 8];
            for (u, column) in block.iter_mut().enumerate() {
                for (v, c) in column.iter_mut().enumerate() {
                    *c = ((u * 97 + v * 61) % 401) as f64 - 200.0 + 0.37 * v as f64;
                }
            }
            let restored = quantize(
                &quantize(&block, table, Direction::Forward),
                table,
                Direction::Inverse,
            );
            for u in 0..8 {
                for v in 0..8 {
                    let half_step = table.at(u, v) / 2.0;
                    assert!((restored[u][v] - block[u][v]).abs() <= half_step + 1e-9);
                }
            }
        }
    }
}
