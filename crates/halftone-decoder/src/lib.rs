//! Halftone decoder
//!
//! Decompression pipeline: artifact header, Huffman tree and payload, reshape
//! into the coefficient matrix, inverse block pass (dequantization and IDCT per
//! tile).

use halftone_bitstream::{HuffmanDecoder, StreamStatus, WordReader};
use halftone_color::luminance_to_grid;
use halftone_core::*;
use halftone_headers::ArtifactHeader;
use halftone_transform::{reshape_coefficients, BlockProcessor, QuantPreset};
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

/// Decoder options
///
/// The quantization preset is not stored in the artifact and must match the one
/// used for compression.
#[derive(Debug, Clone)]
pub struct DecoderOptions {
    pub quant_preset: QuantPreset,
    pub parallel: bool,
    /// Dimensions of a headerless artifact. When set, the artifact is expected to
    /// start directly with the tree section.
    pub dimensions: Option<Dimensions>,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            quant_preset: QuantPreset::Standard,
            parallel: true,
            dimensions: None,
        }
    }
}

impl DecoderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quant_preset(mut self, preset: QuantPreset) -> Self {
        self.quant_preset = preset;
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Decode headerless artifacts with these dimensions
    pub fn dimensions(mut self, dimensions: Dimensions) -> Self {
        self.dimensions = Some(dimensions);
        self
    }
}

/// A decompressed image
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// Reconstructed luminance, real parts only
    pub luminance: ComplexMatrix,
    /// [`StreamStatus::Truncated`] when missing coefficients were zero-filled
    pub status: StreamStatus,
    /// Payload words found after the last coefficient
    pub surplus_words: usize,
}

impl DecodedImage {
    pub fn dimensions(&self) -> Dimensions {
        self.luminance.dimensions()
    }

    pub fn is_truncated(&self) -> bool {
        !self.status.is_complete()
    }

    /// True when the artifact carried data past its last coefficient
    pub fn has_trailing_data(&self) -> bool {
        self.surplus_words > 0
    }

    /// Rounded, clamped gray pixels
    pub fn to_pixel_grid(&self) -> CodecResult<PixelGrid> {
        luminance_to_grid(&self.luminance)
    }
}

/// Halftone decoder
#[derive(Debug, Clone, Default)]
pub struct HalftoneDecoder {
    options: DecoderOptions,
}

impl HalftoneDecoder {
    pub fn new(options: DecoderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DecoderOptions {
        &self.options
    }

    /// Decode from a file
    ///
    /// A missing file is reported as [`CodecError::NotFound`].
    pub fn decode_file<P: AsRef<Path>>(&self, path: P) -> CodecResult<DecodedImage> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => CodecError::NotFound(path.display().to_string()),
            _ => CodecError::Io(e),
        })?;
        self.decode(BufReader::new(file))
    }

    /// Decode an in-memory artifact
    pub fn decode_bytes(&self, artifact: &[u8]) -> CodecResult<DecodedImage> {
        self.decode(artifact)
    }

    /// Decode from a reader
    ///
    /// A truncated payload is zero-filled only while at least as many coefficients
    /// were decoded as are missing; a shorter payload is
    /// [`CodecError::InvalidBitstream`].
    pub fn decode<R: Read>(&self, mut reader: R) -> CodecResult<DecodedImage> {
        let header = match self.options.dimensions {
            Some(dimensions) => ArtifactHeader::new(dimensions)?,
            None => ArtifactHeader::read_from(&mut reader)?,
        };
        let dimensions = header.dimensions;
        let expected = header.coefficient_count();

        let mut huffman = HuffmanDecoder::new();
        huffman.load_tree(&mut reader)?;
        let announced = huffman.expected_symbols().unwrap_or(0);
        if announced != expected as u64 {
            return Err(CodecError::InvalidBitstream(format!(
                "{} coefficients announced for a {}x{} matrix",
                announced, dimensions.width, dimensions.height
            )));
        }

        for word in WordReader::new(reader) {
            huffman.feed_word(word?)?;
        }
        let stream = huffman.finish()?;

        let mut symbols = stream.symbols;
        if let StreamStatus::Truncated {
            missing_symbols, ..
        } = stream.status
        {
            if missing_symbols > symbols.len() as u64 {
                return Err(CodecError::InvalidBitstream(format!(
                    "only {} of {} coefficients present",
                    symbols.len(),
                    expected
                )));
            }
            log::warn!(
                "zero-filling {} missing coefficients of a {}x{} matrix",
                missing_symbols,
                dimensions.width,
                dimensions.height
            );
            symbols.resize(expected, 0);
        }

        let coefficients = reshape_coefficients(&symbols, dimensions)?;
        let processor =
            BlockProcessor::new(self.options.quant_preset).parallel(self.options.parallel);
        let luminance = processor.process(&coefficients, Direction::Inverse);
        log::debug!(
            "decoded {}x{} luminance ({:?})",
            dimensions.width,
            dimensions.height,
            stream.status
        );

        Ok(DecodedImage {
            luminance,
            status: stream.status,
            surplus_words: stream.surplus_words,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use halftone_encoder::{EncoderOptions, HalftoneEncoder};

    fn gray_grid(width: u32, height: u32, value: u8) -> PixelGrid {
        PixelGrid::filled(Dimensions::new(width, height), Rgb::gray(value)).unwrap()
    }

    #[test]
    fn test_constant_round_trip() {
        let artifact = HalftoneEncoder::default()
            .compress(&gray_grid(16, 8, 100))
            .unwrap();
        let decoded = HalftoneDecoder::default().decode_bytes(&artifact).unwrap();

        assert_eq!(decoded.dimensions(), Dimensions::new(16, 8));
        assert!(!decoded.is_truncated());
        let grid = decoded.to_pixel_grid().unwrap();
        assert!(grid.pixels().iter().all(|&p| p == Rgb::gray(100)));
    }

    #[test]
    fn test_headerless_needs_dimensions() {
        let encoder = HalftoneEncoder::new(EncoderOptions::default().write_header(false));
        let artifact = encoder.compress(&gray_grid(8, 16, 200)).unwrap();

        let options = DecoderOptions::default().dimensions(Dimensions::new(8, 16));
        let decoder = HalftoneDecoder::new(options);
        let decoded = decoder.decode_bytes(&artifact).unwrap();
        assert_eq!(decoded.dimensions(), Dimensions::new(8, 16));
        assert!((decoded.luminance.re(3, 12) - 200.0).abs() < 1e-6);

        // Wrong dimensions disagree with the announced symbol count
        let options = DecoderOptions::default().dimensions(Dimensions::new(8, 8));
        let decoder = HalftoneDecoder::new(options);
        assert!(matches!(
            decoder.decode_bytes(&artifact),
            Err(CodecError::InvalidBitstream(_))
        ));
    }

    #[test]
    fn test_supplied_dimensions_must_be_whole_tiles() {
        let options = DecoderOptions::default().dimensions(Dimensions::new(10, 8));
        let decoder = HalftoneDecoder::new(options);
        assert!(matches!(
            decoder.decode_bytes(&[0; 16]),
            Err(CodecError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_truncated_payload_is_zero_filled() {
        let mut image = gray_grid(16, 16, 0);
        for y in 0..16 {
            for x in 0..16 {
                image.set_pixel(x, y, Rgb::gray(((x * 16) ^ (y * 9)) as u8));
            }
        }
        let mut artifact = HalftoneEncoder::default().compress(&image).unwrap();
        artifact.truncate(artifact.len() - 4);

        let decoded = HalftoneDecoder::default().decode_bytes(&artifact).unwrap();
        assert!(decoded.is_truncated());
        assert_eq!(decoded.dimensions(), Dimensions::new(16, 16));
    }

    #[test]
    fn test_mostly_missing_payload_rejected() {
        // 2048x2048 header, 4194304 symbols announced, single-leaf tree, no payload
        let mut artifact = vec![0, 0, 8, 0, 0, 0, 8, 0];
        artifact.extend_from_slice(&4_194_304u32.to_be_bytes());
        artifact.extend_from_slice(&[0, 0, 0, 1, 1, 0, 0, 0, 0]);
        assert_eq!(artifact.len(), 21);

        assert!(matches!(
            HalftoneDecoder::default().decode_bytes(&artifact),
            Err(CodecError::InvalidBitstream(_))
        ));
    }

    #[test]
    fn test_oversized_header_rejected() {
        let mut artifact = vec![0, 0, 0xFF, 0xF8, 0, 0, 0xFF, 0xF8];
        artifact.extend_from_slice(&[0; 16]);
        assert!(matches!(
            HalftoneDecoder::default().decode_bytes(&artifact),
            Err(CodecError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_trailing_words_reported() {
        let encoder = HalftoneEncoder::default();
        let mut artifact = encoder.compress(&gray_grid(8, 8, 100)).unwrap();
        let clean = HalftoneDecoder::default().decode_bytes(&artifact).unwrap();
        assert!(!clean.has_trailing_data());

        artifact.extend_from_slice(&[0xAB; 4]);
        let decoded = HalftoneDecoder::default().decode_bytes(&artifact).unwrap();
        assert!(decoded.has_trailing_data());
        assert_eq!(decoded.surplus_words, 1);
        assert_eq!(decoded.luminance, clean.luminance);
    }

    #[test]
    fn test_ragged_payload_rejected() {
        let mut artifact = HalftoneEncoder::default()
            .compress(&gray_grid(8, 8, 10))
            .unwrap();
        artifact.push(0);
        assert!(matches!(
            HalftoneDecoder::default().decode_bytes(&artifact),
            Err(CodecError::InvalidBitstream(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let path = std::env::temp_dir().join("halftone-decoder-missing-artifact.bin");
        assert!(matches!(
            HalftoneDecoder::default().decode_file(&path),
            Err(CodecError::NotFound(_))
        ));
    }
}
