//! Block processing
//!
//! The luminance matrix is cut into non-overlapping 8×8 tiles. Tiles are
//! independent: each one is transformed and quantized on its own, so the
//! processor may run them on the rayon pool.

use crate::dct::{dct8x8, idct8x8, Block};
use crate::quantization::{quantize, QuantPreset, QuantTable};
use halftone_core::consts::BLOCK_SIZE;
use halftone_core::{CodecError, CodecResult, Complex64, ComplexMatrix, Dimensions, Direction};
use rayon::prelude::*;

/// A copy of one 8×8 region, located at sample offset
/// `(block_x * 8, block_y * 8)` of its source matrix
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    pub block_x: usize,
    pub block_y: usize,
    pub samples: Block,
}

/// Cut a matrix into whole tiles (real components only)
///
/// A `W×H` matrix yields `⌊W/8⌋ × ⌊H/8⌋` tiles; remainder rows and columns are
/// dropped. Tiles are ordered with `block_x` outer.
pub fn split(matrix: &ComplexMatrix) -> Vec<Tile> {
    let (blocks_x, blocks_y) = matrix.dimensions().blocks();
    let mut tiles = Vec::with_capacity(blocks_x * blocks_y);

    for block_x in 0..blocks_x {
        for block_y in 0..blocks_y {
            let mut samples = [[0.0; BLOCK_SIZE]; BLOCK_SIZE];
            for (x, column) in samples.iter_mut().enumerate() {
                for (y, sample) in column.iter_mut().enumerate() {
                    *sample = matrix.re(block_x * BLOCK_SIZE + x, block_y * BLOCK_SIZE + y);
                }
            }
            tiles.push(Tile {
                block_x,
                block_y,
                samples,
            });
        }
    }

    tiles
}

/// Write tiles back at their offsets
///
/// The result covers the bounding box of the tiles; positions no tile covers are
/// zero.
pub fn reassemble(tiles: &[Tile]) -> ComplexMatrix {
    let blocks_x = tiles.iter().map(|t| t.block_x + 1).max().unwrap_or(0);
    let blocks_y = tiles.iter().map(|t| t.block_y + 1).max().unwrap_or(0);

    let mut matrix = ComplexMatrix::zeros(blocks_x * BLOCK_SIZE, blocks_y * BLOCK_SIZE);
    for tile in tiles {
        for (x, column) in tile.samples.iter().enumerate() {
            for (y, &sample) in column.iter().enumerate() {
                matrix.set(
                    tile.block_x * BLOCK_SIZE + x,
                    tile.block_y * BLOCK_SIZE + y,
                    Complex64::new(sample, 0.0),
                );
            }
        }
    }

    matrix
}

/// Drives the DCT and the quantizer over every tile of a matrix
#[derive(Debug, Clone, Copy)]
pub struct BlockProcessor {
    table: QuantTable,
    parallel: bool,
}

impl BlockProcessor {
    pub fn new(preset: QuantPreset) -> Self {
        Self::with_table(*preset.table())
    }

    pub fn with_table(table: QuantTable) -> Self {
        Self {
            table,
            parallel: true,
        }
    }

    /// Process tiles on the rayon pool (default) or sequentially
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn table(&self) -> &QuantTable {
        &self.table
    }

    /// Forward: DCT then quantize. Inverse: dequantize then IDCT.
    pub fn process_tile(&self, tile: &Tile, direction: Direction) -> Tile {
        let samples = match direction {
            Direction::Forward => quantize(&dct8x8(&tile.samples), &self.table, direction),
            Direction::Inverse => idct8x8(&quantize(&tile.samples, &self.table, direction)),
        };
        Tile {
            block_x: tile.block_x,
            block_y: tile.block_y,
            samples,
        }
    }

    /// Split, process every tile, reassemble
    pub fn process(&self, matrix: &ComplexMatrix, direction: Direction) -> ComplexMatrix {
        let tiles = split(matrix);
        log::debug!(
            "{:?} block pass over {} tiles ({}x{} matrix, parallel={})",
            direction,
            tiles.len(),
            matrix.width(),
            matrix.height(),
            self.parallel
        );

        let processed: Vec<Tile> = if self.parallel {
            tiles
                .par_iter()
                .map(|tile| self.process_tile(tile, direction))
                .collect()
        } else {
            tiles
                .iter()
                .map(|tile| self.process_tile(tile, direction))
                .collect()
        };

        reassemble(&processed)
    }
}

impl Default for BlockProcessor {
    fn default() -> Self {
        Self::new(QuantPreset::default())
    }
}

/// Flatten quantized coefficients into the symbol stream, first coordinate outer
pub fn flatten_coefficients(matrix: &ComplexMatrix) -> Vec<i32> {
    matrix.iter().map(|c| c.re.round() as i32).collect()
}

/// Inverse of [`flatten_coefficients`]
pub fn reshape_coefficients(symbols: &[i32], dimensions: Dimensions) -> CodecResult<ComplexMatrix> {
    let width = dimensions.width as usize;
    let height = dimensions.height as usize;
    if symbols.len() != width * height {
        return Err(CodecError::InvalidInput(format!(
            "{} coefficients cannot fill a {}x{} matrix",
            symbols.len(),
            width,
            height
        )));
    }
    Ok(ComplexMatrix::from_real_fn(width, height, |x, y| {
        symbols[x * height + y] as f64
    }))
}
