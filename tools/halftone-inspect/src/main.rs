// Inspect how an image fares through the halftone codec
//
// Usage: halftone-inspect <input.png> [reconstruction.png] [--custom] [--spectrum <spectrum.png>]

use anyhow::{bail, Context, Result};
use halftone::{
    centered_spectrum, ComplexMatrix, Dimensions, PixelGrid, Pipeline, QuantPreset, StreamStatus,
};
use std::path::{Path, PathBuf};

struct Args {
    input: PathBuf,
    output: Option<PathBuf>,
    spectrum: Option<PathBuf>,
    preset: QuantPreset,
}

fn parse_args() -> Result<Args> {
    let mut input = None;
    let mut output = None;
    let mut spectrum = None;
    let mut preset = QuantPreset::Standard;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--custom" => preset = QuantPreset::Custom,
            "--spectrum" => {
                spectrum = Some(PathBuf::from(
                    args.next().context("--spectrum needs an output path")?,
                ))
            }
            _ if input.is_none() => input = Some(PathBuf::from(arg)),
            _ if output.is_none() => output = Some(PathBuf::from(arg)),
            _ => bail!("unexpected argument {}", arg),
        }
    }

    Ok(Args {
        input: input.context(
            "usage: halftone-inspect <input.png> [reconstruction.png] [--custom] [--spectrum <spectrum.png>]",
        )?,
        output,
        spectrum,
        preset,
    })
}

fn load(path: &Path) -> Result<PixelGrid> {
    let rgb = image::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?
        .to_rgb8();
    let (width, height) = rgb.dimensions();
    Ok(PixelGrid::from_rgb_bytes(
        Dimensions::new(width, height),
        rgb.as_raw(),
    )?)
}

/// Log-magnitude spectrum of the largest power-of-two square in the top-left corner
fn write_spectrum(luminance: &ComplexMatrix, path: &Path) -> Result<()> {
    let side = luminance.width().min(luminance.height());
    if side == 0 {
        bail!("image too small for a spectrum");
    }
    let side = 1usize << side.ilog2();
    let square = ComplexMatrix::from_fn(side, side, |x, y| luminance.get(x, y));
    let spectrum = centered_spectrum(&square)?;

    let peak = spectrum.iter().map(|c| c.norm().ln_1p()).fold(0.0, f64::max);
    let mut pixels = vec![0u8; side * side];
    for y in 0..side {
        for x in 0..side {
            let level = spectrum.get(x, y).norm().ln_1p() / peak.max(f64::MIN_POSITIVE);
            pixels[y * side + x] = (level * 255.0).round() as u8;
        }
    }

    image::GrayImage::from_raw(side as u32, side as u32, pixels)
        .context("spectrum buffer size mismatch")?
        .save(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("Spectrum ({}x{}) written to {}", side, side, path.display());
    Ok(())
}

fn main() -> Result<()> {
    let args = parse_args()?;
    let image = load(&args.input)?;
    let pipeline = Pipeline::new(args.preset);

    println!("=== {} ({:?} table) ===\n", args.input.display(), args.preset);
    println!("Input:             {}x{}", image.width(), image.height());

    let result = pipeline.round_trip(&image)?;
    let stats = result.stats;
    println!(
        "Coded area:        {}x{} ({} tiles)",
        stats.dimensions.width, stats.dimensions.height, stats.tiles
    );
    println!("Symbols:           {}", stats.symbol_count);
    println!("Distinct symbols:  {}", stats.distinct_symbols);
    println!("Avg code length:   {:.3} bits", stats.average_code_length);
    println!("Payload:           {} bits", stats.payload_bits);
    println!(
        "Artifact:          {} bytes ({:.3} bits/sample, ratio {:.2}:1)",
        stats.artifact_bytes,
        stats.bits_per_sample(),
        stats.compression_ratio()
    );
    println!("Quality (error):   {:.6}", result.quality);
    if let StreamStatus::Truncated {
        missing_symbols, ..
    } = result.decoded.status
    {
        println!("WARNING: {} coefficients missing", missing_symbols);
    }

    if let Some(output) = &args.output {
        let grid = result.decoded.to_pixel_grid()?;
        image::RgbImage::from_raw(grid.width(), grid.height(), grid.to_rgb_bytes())
            .context("reconstruction buffer size mismatch")?
            .save(output)
            .with_context(|| format!("failed to write {}", output.display()))?;
        println!("\nReconstruction written to {}", output.display());
    }

    if let Some(spectrum) = &args.spectrum {
        write_spectrum(&pipeline.luminance(&image), spectrum)?;
    }

    Ok(())
}
