//! Compress/decompress orchestration behind a single handle

use crate::quality::quality;
use halftone_color::grid_to_luminance;
use halftone_core::*;
use halftone_decoder::{DecodedImage, DecoderOptions, HalftoneDecoder};
use halftone_encoder::{CompressionStats, EncoderOptions, HalftoneEncoder};
use halftone_transform::QuantPreset;

/// Outcome of compressing and immediately decompressing an image
#[derive(Debug, Clone)]
pub struct RoundTrip {
    pub artifact: Vec<u8>,
    pub stats: CompressionStats,
    pub decoded: DecodedImage,
    /// [`quality`] of the reconstruction against the source luminance
    pub quality: f64,
}

/// An encoder and a decoder configured with the same quantization preset
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    encoder: HalftoneEncoder,
    decoder: HalftoneDecoder,
}

impl Pipeline {
    pub fn new(preset: QuantPreset) -> Self {
        Self {
            encoder: HalftoneEncoder::new(EncoderOptions::default().quant_preset(preset)),
            decoder: HalftoneDecoder::new(DecoderOptions::default().quant_preset(preset)),
        }
    }

    /// Separate options for both halves. Presets must agree for the output to
    /// make sense; headerless encoding needs decoder dimensions.
    pub fn with_options(encoder: EncoderOptions, decoder: DecoderOptions) -> Self {
        Self {
            encoder: HalftoneEncoder::new(encoder),
            decoder: HalftoneDecoder::new(decoder),
        }
    }

    pub fn encoder(&self) -> &HalftoneEncoder {
        &self.encoder
    }

    pub fn decoder(&self) -> &HalftoneDecoder {
        &self.decoder
    }

    /// Source luminance as the encoder sees it (truncated to whole tiles)
    pub fn luminance(&self, image: &PixelGrid) -> ComplexMatrix {
        grid_to_luminance(image)
    }

    pub fn compress(&self, image: &PixelGrid) -> CodecResult<Vec<u8>> {
        self.encoder.compress(image)
    }

    pub fn decompress(&self, artifact: &[u8]) -> CodecResult<DecodedImage> {
        self.decoder.decode_bytes(artifact)
    }

    pub fn round_trip(&self, image: &PixelGrid) -> CodecResult<RoundTrip> {
        let (artifact, stats) = self.encoder.compress_with_stats(image)?;
        let decoded = self.decoder.decode_bytes(&artifact)?;
        let quality = quality(&self.luminance(image), &decoded.luminance);
        Ok(RoundTrip {
            artifact,
            stats,
            decoded,
            quality,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_reports_quality() {
        let mut image = PixelGrid::filled(Dimensions::new(24, 16), Rgb::gray(0)).unwrap();
        for y in 0..16 {
            for x in 0..24 {
                image.set_pixel(x, y, Rgb::gray((x * 8 + y * 3) as u8));
            }
        }

        let result = Pipeline::new(QuantPreset::Standard).round_trip(&image).unwrap();
        assert_eq!(result.stats.artifact_bytes, result.artifact.len());
        assert!(result.decoded.status.is_complete());
        assert!(result.quality >= 0.0);
        assert!(result.quality < 0.05);
    }

    #[test]
    fn test_presets_must_match() {
        let image = PixelGrid::filled(Dimensions::new(8, 8), Rgb::gray(200)).unwrap();
        let mismatched = Pipeline::with_options(
            EncoderOptions::default().quant_preset(QuantPreset::Standard),
            DecoderOptions::default().quant_preset(QuantPreset::Custom),
        );
        let decoded = mismatched.decompress(&mismatched.compress(&image).unwrap()).unwrap();
        // DC divisor 16 on the way in, 3 on the way out
        assert!((decoded.luminance.re(0, 0) - 200.0 * 3.0 / 16.0).abs() < 1e-6);
    }
}
