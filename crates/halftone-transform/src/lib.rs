//! Transform operations for the halftone codec
//!
//! This crate implements the spectral transform engine (radix-2 FFT in one and two
//! dimensions, spectrum centering, 8×8 DCT/IDCT), the quantizer and the block
//! processor that drives both over 8×8 tiles.

pub mod blocks;
pub mod dct;
pub mod fft;
pub mod quantization;

pub use blocks::*;
pub use dct::*;
pub use fft::*;
pub use quantization::*;
