//! DCT (Discrete Cosine Transform) implementation
//!
//! Classic 8-point 2D DCT-II / DCT-III over a real 8×8 block. Blocks are indexed
//! `[x][y]` in the spatial domain and `[u][v]` in the frequency domain, with `u`
//! the horizontal frequency.

use halftone_core::consts::BLOCK_SIZE;
use std::f64::consts::{FRAC_1_SQRT_2, PI};

/// An 8×8 block of real samples or coefficients
pub type Block = [[f64; BLOCK_SIZE]; BLOCK_SIZE];

lazy_static::lazy_static! {
    /// `COS_TABLE[k][n] = cos((2n + 1) k π / 16)`
    static ref COS_TABLE: [[f64; BLOCK_SIZE]; BLOCK_SIZE] = {
        let mut table = [[0.0f64; BLOCK_SIZE]; BLOCK_SIZE];
        for (k, row) in table.iter_mut().enumerate() {
            for (n, entry) in row.iter_mut().enumerate() {
                *entry = (((2 * n + 1) * k) as f64 * PI / 16.0).cos();
            }
        }
        table
    };
}

#[inline]
fn scale(k: usize) -> f64 {
    if k == 0 {
        FRAC_1_SQRT_2
    } else {
        1.0
    }
}

/// 8x8 DCT-II (forward transform)
pub fn dct8x8(tile: &Block) -> Block {
    let mut output = [[0.0; BLOCK_SIZE]; BLOCK_SIZE];

    for (u, out_column) in output.iter_mut().enumerate() {
        for (v, out) in out_column.iter_mut().enumerate() {
            let mut sum = 0.0;
            for (x, column) in tile.iter().enumerate() {
                for (y, &sample) in column.iter().enumerate() {
                    sum += sample * COS_TABLE[u][x] * COS_TABLE[v][y];
                }
            }
            *out = 0.25 * scale(u) * scale(v) * sum;
        }
    }

    output
}

/// 8x8 DCT-III (inverse transform)
pub fn idct8x8(coefficients: &Block) -> Block {
    let mut output = [[0.0; BLOCK_SIZE]; BLOCK_SIZE];

    for (x, out_column) in output.iter_mut().enumerate() {
        for (y, out) in out_column.iter_mut().enumerate() {
            let mut sum = 0.0;
            for (u, column) in coefficients.iter().enumerate() {
                for (v, &coeff) in column.iter().enumerate() {
                    sum += scale(u) * scale(v) * coeff * COS_TABLE[u][x] * COS_TABLE[v][y];
                }
            }
            *out = 0.25 * sum;
        }
    }

    output
}
