//! Pixel grid supplied by (and handed back to) the image-loading collaborator

use crate::{CodecError, CodecResult, Dimensions, Rgb};

/// An in-memory RGB image, stored row by row (`y * width + x`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    pub dimensions: Dimensions,
    pixels: Vec<Rgb>,
}

impl PixelGrid {
    /// Create a black grid
    pub fn new(dimensions: Dimensions) -> CodecResult<Self> {
        Self::filled(dimensions, Rgb::default())
    }

    /// Create a grid where every pixel has the same color
    pub fn filled(dimensions: Dimensions, color: Rgb) -> CodecResult<Self> {
        if dimensions.width == 0 || dimensions.height == 0 {
            return Err(CodecError::InvalidDimensions {
                width: dimensions.width as i64,
                height: dimensions.height as i64,
            });
        }

        Ok(Self {
            dimensions,
            pixels: vec![color; dimensions.pixel_count()],
        })
    }

    /// Wrap existing pixels
    pub fn from_pixels(dimensions: Dimensions, pixels: Vec<Rgb>) -> CodecResult<Self> {
        let mut grid = Self::new(dimensions)?;
        if pixels.len() != grid.pixels.len() {
            return Err(CodecError::InvalidInput(format!(
                "expected {} pixels for {}x{}, got {}",
                grid.pixels.len(),
                dimensions.width,
                dimensions.height,
                pixels.len()
            )));
        }
        grid.pixels = pixels;
        Ok(grid)
    }

    /// Wrap interleaved RGB bytes
    pub fn from_rgb_bytes(dimensions: Dimensions, bytes: &[u8]) -> CodecResult<Self> {
        if bytes.len() % 3 != 0 {
            return Err(CodecError::InvalidInput(format!(
                "RGB buffer length {} is not a multiple of 3",
                bytes.len()
            )));
        }
        let pixels = bytes
            .chunks_exact(3)
            .map(|px| Rgb::new(px[0], px[1], px[2]))
            .collect();
        Self::from_pixels(dimensions, pixels)
    }

    pub fn width(&self) -> u32 {
        self.dimensions.width
    }

    pub fn height(&self) -> u32 {
        self.dimensions.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgb {
        self.pixels[self.index(x, y)]
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgb) {
        let idx = self.index(x, y);
        self.pixels[idx] = color;
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// Interleaved RGB bytes, row by row
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| [p.r, p.g, p.b]).collect()
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.dimensions.width as usize + x as usize
    }
}
