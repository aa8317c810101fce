//! # Halftone - educational grayscale image codec
//!
//! This crate provides a high-level API for compressing images with a JPEG-style
//! pipeline: halftone conversion, 8×8 DCT, table quantization and Huffman coding.
//!
//! ## Quick Start
//!
//! ```no_run
//! use halftone::{Dimensions, PixelGrid, Pipeline, QuantPreset, Rgb};
//!
//! let image = PixelGrid::filled(Dimensions::new(64, 64), Rgb::gray(200)).unwrap();
//! let pipeline = Pipeline::new(QuantPreset::Standard);
//!
//! let artifact = pipeline.compress(&image).unwrap();
//! let decoded = pipeline.decompress(&artifact).unwrap();
//! let error = halftone::quality(&pipeline.luminance(&image), &decoded.luminance);
//! println!("{} bytes, quality {:.5}", artifact.len(), error);
//! ```
//!
//! ## Architecture
//!
//! - `halftone-core`: matrices, pixel grids, errors
//! - `halftone-transform`: FFT, DCT, quantization, block processing
//! - `halftone-bitstream`: word packing and the Huffman codec
//! - `halftone-encoder` / `halftone-decoder`: the two pipelines

mod pipeline;
mod quality;

// Re-export core types
pub use halftone_core::{
    CodecError, CodecResult, Complex64, ComplexMatrix, Dimensions, Direction, PixelGrid, Rgb,
};

// Re-export the building blocks
pub use halftone_bitstream as bitstream;
pub use halftone_color as color;
pub use halftone_transform as transform;

pub use halftone_bitstream::StreamStatus;
pub use halftone_transform::{
    angular_transform, centered_spectrum, dct8x8, fft1d, fft2d, idct8x8, quantize, BlockProcessor,
    QuantPreset, QuantTable,
};

// Re-export the pipelines
pub use halftone_decoder::{DecodedImage, DecoderOptions, HalftoneDecoder};
pub use halftone_encoder::{CompressionStats, EncoderOptions, HalftoneEncoder};

pub use pipeline::{Pipeline, RoundTrip};
pub use quality::quality;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
