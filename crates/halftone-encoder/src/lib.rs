//! Halftone encoder
//!
//! Compression pipeline: halftone conversion, forward block pass (DCT and
//! quantization per tile), flattening, Huffman coding and artifact assembly.

use halftone_bitstream::encode_symbols;
use halftone_color::grid_to_luminance;
use halftone_core::consts::DEFAULT_FLUSH_THRESHOLD;
use halftone_core::*;
use halftone_headers::ArtifactHeader;
use halftone_transform::{flatten_coefficients, BlockProcessor, QuantPreset};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Encoder options
#[derive(Debug, Clone)]
pub struct EncoderOptions {
    /// Quantization table preset
    pub quant_preset: QuantPreset,
    /// Pending bits that trigger a word flush, a positive multiple of 32
    pub flush_threshold: usize,
    /// Write the `[width][height]` header in front of the tree section
    pub write_header: bool,
    /// Process tiles on the rayon pool
    pub parallel: bool,
}

impl Default for EncoderOptions {
    fn default() -> Self {
        Self {
            quant_preset: QuantPreset::Standard,
            flush_threshold: DEFAULT_FLUSH_THRESHOLD,
            write_header: true,
            parallel: true,
        }
    }
}

impl EncoderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quant_preset(mut self, preset: QuantPreset) -> Self {
        self.quant_preset = preset;
        self
    }

    /// Checked when encoding starts
    pub fn flush_threshold(mut self, bits: usize) -> Self {
        self.flush_threshold = bits;
        self
    }

    pub fn write_header(mut self, write_header: bool) -> Self {
        self.write_header = write_header;
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// Figures reported for one compressed image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressionStats {
    /// Coefficient matrix dimensions (whole tiles only)
    pub dimensions: Dimensions,
    pub tiles: usize,
    pub symbol_count: u64,
    pub distinct_symbols: usize,
    /// Huffman code bits, padding excluded
    pub payload_bits: u64,
    pub artifact_bytes: usize,
    pub average_code_length: f64,
}

impl CompressionStats {
    /// Artifact size in bits per coded sample
    pub fn bits_per_sample(&self) -> f64 {
        if self.symbol_count == 0 {
            return 0.0;
        }
        (self.artifact_bytes * 8) as f64 / self.symbol_count as f64
    }

    /// One byte per sample of raw luminance against the artifact size
    pub fn compression_ratio(&self) -> f64 {
        if self.artifact_bytes == 0 {
            return 0.0;
        }
        self.symbol_count as f64 / self.artifact_bytes as f64
    }
}

/// Halftone encoder
#[derive(Debug, Clone, Default)]
pub struct HalftoneEncoder {
    options: EncoderOptions,
}

impl HalftoneEncoder {
    pub fn new(options: EncoderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &EncoderOptions {
        &self.options
    }

    fn block_processor(&self) -> BlockProcessor {
        BlockProcessor::new(self.options.quant_preset).parallel(self.options.parallel)
    }

    /// Quantized DCT coefficients of the image's luminance
    ///
    /// Dimensions are truncated to whole tiles first.
    pub fn coefficients(&self, image: &PixelGrid) -> ComplexMatrix {
        let luminance = grid_to_luminance(image);
        self.block_processor().process(&luminance, Direction::Forward)
    }

    /// Compress an image into an in-memory artifact
    pub fn compress(&self, image: &PixelGrid) -> CodecResult<Vec<u8>> {
        self.compress_with_stats(image).map(|(artifact, _)| artifact)
    }

    /// Compress an image and report what the artifact contains
    pub fn compress_with_stats(
        &self,
        image: &PixelGrid,
    ) -> CodecResult<(Vec<u8>, CompressionStats)> {
        let coefficients = self.coefficients(image);
        let dimensions = coefficients.dimensions();
        if dimensions != image.dimensions.truncated_to_blocks() {
            log::debug!(
                "{}x{} image truncated to {}x{}",
                image.width(),
                image.height(),
                dimensions.width,
                dimensions.height
            );
        }

        let symbols = flatten_coefficients(&coefficients);
        let mut artifact = Vec::new();
        if self.options.write_header {
            ArtifactHeader::new(dimensions)?.write_to(&mut artifact)?;
        }
        let summary = encode_symbols(&symbols, &mut artifact, self.options.flush_threshold)?;

        let (blocks_x, blocks_y) = dimensions.blocks();
        let stats = CompressionStats {
            dimensions,
            tiles: blocks_x * blocks_y,
            symbol_count: summary.symbol_count,
            distinct_symbols: summary.distinct_symbols,
            payload_bits: summary.payload_bits,
            artifact_bytes: artifact.len(),
            average_code_length: summary.average_code_length,
        };
        log::debug!(
            "compressed {}x{} ({} tiles) into {} bytes, {} distinct symbols, {:.3} bits/symbol",
            dimensions.width,
            dimensions.height,
            stats.tiles,
            stats.artifact_bytes,
            stats.distinct_symbols,
            stats.average_code_length
        );

        Ok((artifact, stats))
    }

    /// Compress to a writer
    ///
    /// The artifact is assembled in memory first, so a failed compression writes
    /// nothing.
    pub fn encode<W: Write>(
        &self,
        image: &PixelGrid,
        mut writer: W,
    ) -> CodecResult<CompressionStats> {
        let (artifact, stats) = self.compress_with_stats(image)?;
        writer.write_all(&artifact)?;
        writer.flush()?;
        Ok(stats)
    }

    /// Compress to a file
    pub fn encode_file<P: AsRef<Path>>(
        &self,
        image: &PixelGrid,
        path: P,
    ) -> CodecResult<CompressionStats> {
        let (artifact, stats) = self.compress_with_stats(image)?;
        let mut writer = BufWriter::new(File::create(path)?);
        writer.write_all(&artifact)?;
        writer.flush()?;
        Ok(stats)
    }
}
