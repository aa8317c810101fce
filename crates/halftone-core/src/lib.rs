//! Core types and utilities for the halftone codec
//!
//! This crate provides the fundamental data structures shared by every stage of the
//! pipeline: the complex coefficient matrix, the input pixel grid, dimensions and
//! the common error type.

pub mod consts;
pub mod error;
pub mod image;
pub mod matrix;
pub mod types;

pub use error::{CodecError, CodecResult};
pub use image::*;
pub use matrix::*;
pub use num_complex::Complex64;
pub use types::*;
