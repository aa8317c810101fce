//! Color conversions for the halftone codec
//!
//! This crate implements the halftone conversion (RGB to single-channel luminance)
//! applied before tiling, and the reverse mapping used to hand a reconstructed
//! luminance matrix back to the display collaborator.

pub mod luminance;

pub use luminance::*;
