//! Core types for the halftone codec

use crate::consts::BLOCK_SIZE;
use num_integer::Integer;

/// Transform direction shared by the spectral transforms, the quantizer and the
/// block processor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Spatial domain to frequency domain (quantize on the way)
    Forward,
    /// Frequency domain back to spatial domain (dequantize on the way)
    Inverse,
}

impl Direction {
    pub fn is_forward(&self) -> bool {
        matches!(self, Direction::Forward)
    }
}

/// Image dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Dimensions rounded down to whole tiles. Remainder rows/columns are dropped.
    pub fn truncated_to_blocks(&self) -> Self {
        let block = BLOCK_SIZE as u32;
        Self {
            width: self.width.prev_multiple_of(&block),
            height: self.height.prev_multiple_of(&block),
        }
    }

    /// Number of whole tiles along each axis
    pub fn blocks(&self) -> (usize, usize) {
        (
            self.width as usize / BLOCK_SIZE,
            self.height as usize / BLOCK_SIZE,
        )
    }
}

/// One RGB pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn gray(value: u8) -> Self {
        Self::new(value, value, value)
    }
}
