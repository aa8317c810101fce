//! Constants used throughout the halftone codec

/// Maximum supported image dimension
pub const MAX_IMAGE_DIMENSION: u32 = 16384; // 2^14

/// Tile edge length in samples
pub const BLOCK_SIZE: usize = 8;

/// Number of coefficients in one tile
pub const BLOCK_AREA: usize = BLOCK_SIZE * BLOCK_SIZE;

/// Width of one payload word in bits (matches the i32 coefficient width)
pub const WORD_BITS: usize = 32;

/// Default encoder flush threshold in bits
pub const DEFAULT_FLUSH_THRESHOLD: usize = WORD_BITS;

/// Upper bound on the flush threshold (1 MiB of pending bits)
pub const MAX_FLUSH_THRESHOLD: usize = 8 * 1024 * 1024;

/// Halftone conversion weights (ITU-R BT.601)
pub const LUMA_RED: f64 = 0.299;
pub const LUMA_GREEN: f64 = 0.587;
pub const LUMA_BLUE: f64 = 0.114;

/// Largest representable sample value
pub const MAX_SAMPLE: f64 = 255.0;
