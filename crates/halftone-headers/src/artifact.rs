//! Compressed artifact header
//!
//! An artifact is laid out as
//!
//! ```text
//! [width:i32][height:i32][Huffman tree section][payload words]
//! ```
//!
//! with big-endian integers. The header is optional: a headerless artifact starts
//! directly with the tree section and is decoded with externally supplied
//! dimensions.

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use halftone_core::consts::{BLOCK_SIZE, MAX_IMAGE_DIMENSION};
use halftone_core::*;
use std::io::{Read, Write};

/// Encoded header length in bytes
pub const HEADER_SIZE: usize = 8;

/// Dimensions of the coefficient matrix carried by the artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArtifactHeader {
    pub dimensions: Dimensions,
}

impl ArtifactHeader {
    /// Both dimensions must be whole tiles, at most [`MAX_IMAGE_DIMENSION`]
    pub fn new(dimensions: Dimensions) -> CodecResult<Self> {
        Self::validate(i64::from(dimensions.width), i64::from(dimensions.height))?;
        Ok(Self { dimensions })
    }

    fn validate(width: i64, height: i64) -> CodecResult<()> {
        let block = BLOCK_SIZE as i64;
        let valid = |v: i64| v >= 0 && v <= i64::from(MAX_IMAGE_DIMENSION) && v % block == 0;
        if valid(width) && valid(height) {
            Ok(())
        } else {
            Err(CodecError::InvalidDimensions { width, height })
        }
    }

    /// Number of coefficients the payload must carry
    pub fn coefficient_count(&self) -> usize {
        self.dimensions.pixel_count()
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> CodecResult<()> {
        // Validated against MAX_IMAGE_DIMENSION on construction
        writer.write_i32::<BigEndian>(self.dimensions.width as i32)?;
        writer.write_i32::<BigEndian>(self.dimensions.height as i32)?;
        Ok(())
    }

    pub fn read_from<R: Read>(reader: &mut R) -> CodecResult<Self> {
        let width = reader.read_i32::<BigEndian>()?;
        let height = reader.read_i32::<BigEndian>()?;
        Self::validate(i64::from(width), i64::from(height))?;

        Ok(Self {
            dimensions: Dimensions::new(width as u32, height as u32),
        })
    }
}
