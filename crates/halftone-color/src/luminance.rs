//! RGB <-> luminance conversion

use halftone_core::consts::{LUMA_BLUE, LUMA_GREEN, LUMA_RED, MAX_SAMPLE};
use halftone_core::{CodecResult, ComplexMatrix, Dimensions, PixelGrid, Rgb};
use num_traits::{clamp, NumCast};

/// Perceptual luminance of one pixel, truncated to an integer
pub fn rgb_to_luminance(pixel: Rgb) -> u8 {
    let value = LUMA_RED * pixel.r as f64 + LUMA_GREEN * pixel.g as f64 + LUMA_BLUE * pixel.b as f64;
    // Weights sum to 1.0, so the truncated value always fits
    value as u8
}

/// Convert a reconstructed sample to a displayable 8-bit value
pub fn sample_to_u8(sample: f64) -> u8 {
    let rounded = clamp(sample.round(), 0.0, MAX_SAMPLE);
    <u8 as NumCast>::from(rounded).unwrap_or(0)
}

/// Halftone conversion of a whole grid
///
/// The result is truncated to whole 8×8 tiles; remainder rows/columns are
/// dropped rather than padded.
pub fn grid_to_luminance(grid: &PixelGrid) -> ComplexMatrix {
    let dims = grid.dimensions.truncated_to_blocks();
    ComplexMatrix::from_real_fn(dims.width as usize, dims.height as usize, |x, y| {
        rgb_to_luminance(grid.pixel(x as u32, y as u32)) as f64
    })
}

/// Render a luminance matrix as a gray pixel grid (R = G = B)
pub fn luminance_to_grid(luminance: &ComplexMatrix) -> CodecResult<PixelGrid> {
    let dims = Dimensions::new(luminance.width() as u32, luminance.height() as u32);
    let mut grid = PixelGrid::new(dims)?;
    for x in 0..luminance.width() {
        for y in 0..luminance.height() {
            let value = sample_to_u8(luminance.re(x, y));
            grid.set_pixel(x as u32, y as u32, Rgb::gray(value));
        }
    }
    Ok(grid)
}
