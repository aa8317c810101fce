//! Fast Fourier transform (radix-2, decimation in frequency)

use halftone_core::{CodecError, CodecResult, Complex64, ComplexMatrix, Direction};
use std::f64::consts::PI;

fn ensure_power_of_two(len: usize, what: &str) -> CodecResult<()> {
    if len == 0 || !len.is_power_of_two() {
        return Err(CodecError::InvalidInput(format!(
            "{} length {} is not a power of two",
            what, len
        )));
    }
    Ok(())
}

/// One-dimensional FFT of a power-of-two length sequence
///
/// The inverse direction is normalized by `1/N`, so
/// `fft1d(&fft1d(x, Forward)?, Inverse)?` reproduces `x`.
pub fn fft1d(sequence: &[Complex64], direction: Direction) -> CodecResult<Vec<Complex64>> {
    ensure_power_of_two(sequence.len(), "sequence")?;

    let mut output = decimate_in_frequency(sequence, direction);
    if !direction.is_forward() {
        let n = output.len() as f64;
        for value in &mut output {
            *value /= n;
        }
    }
    Ok(output)
}

/// Unnormalized recursive Cooley-Tukey step. `frame.len()` must be a power of two.
fn decimate_in_frequency(frame: &[Complex64], direction: Direction) -> Vec<Complex64> {
    let n = frame.len();
    if n == 1 {
        return frame.to_vec();
    }

    let half = n >> 1;
    let arg = if direction.is_forward() {
        -2.0 * PI / n as f64
    } else {
        2.0 * PI / n as f64
    };

    let mut top = Vec::with_capacity(half);
    let mut bottom = Vec::with_capacity(half);
    for j in 0..half {
        let (a, b) = (frame[j], frame[j + half]);
        let omega = Complex64::from_polar(1.0, arg * j as f64);
        top.push(a + b);
        bottom.push(omega * (a - b));
    }

    let top = decimate_in_frequency(&top, direction);
    let bottom = decimate_in_frequency(&bottom, direction);

    let mut result = Vec::with_capacity(n);
    for (t, b) in top.into_iter().zip(bottom) {
        result.push(t);
        result.push(b);
    }
    result
}

/// Two-dimensional FFT: transform every column, transpose, transform again,
/// transpose back.
///
/// With `centered`, the forward transform finishes with [`angular_transform`] and
/// the inverse transform starts with it, so a centered spectrum round-trips.
/// The inverse result is divided by `width * height` once.
pub fn fft2d(
    matrix: &ComplexMatrix,
    direction: Direction,
    centered: bool,
) -> CodecResult<ComplexMatrix> {
    ensure_power_of_two(matrix.width(), "matrix width")?;
    ensure_power_of_two(matrix.height(), "matrix height")?;

    let shifted;
    let input = if centered && !direction.is_forward() {
        shifted = angular_transform(matrix);
        &shifted
    } else {
        matrix
    };

    let pass = |m: &ComplexMatrix| -> CodecResult<ComplexMatrix> {
        let columns = m
            .columns()
            .iter()
            .map(|c| decimate_in_frequency(c, direction))
            .collect();
        ComplexMatrix::from_columns(columns)
    };

    let mut result = pass(input)?.transpose();
    result = pass(&result)?.transpose();

    if centered && direction.is_forward() {
        result = angular_transform(&result);
    }

    if !direction.is_forward() {
        let scale = (matrix.width() * matrix.height()) as f64;
        result = result.map(|v| v / scale);
    }

    Ok(result)
}

/// Quadrant swap that moves the zero frequency to the center of the spectrum
///
/// Quadrant `(i, j)` trades places with `(i + width/2, j + height/2)` and the two
/// off-diagonal quadrants trade likewise. On odd dimensions the trailing
/// row/column stays where it is. Applying it twice is the identity.
pub fn angular_transform(matrix: &ComplexMatrix) -> ComplexMatrix {
    let half_width = matrix.width() >> 1;
    let half_height = matrix.height() >> 1;

    let shift = |i: usize, half: usize| -> Option<usize> {
        if i < half {
            Some(i + half)
        } else if i < 2 * half {
            Some(i - half)
        } else {
            None
        }
    };

    ComplexMatrix::from_fn(matrix.width(), matrix.height(), |x, y| {
        match (shift(x, half_width), shift(y, half_height)) {
            (Some(sx), Some(sy)) => matrix.get(sx, sy),
            _ => matrix.get(x, y),
        }
    })
}

/// Forward 2D FFT with the zero frequency moved to the center
pub fn centered_spectrum(matrix: &ComplexMatrix) -> CodecResult<ComplexMatrix> {
    fft2d(matrix, Direction::Forward, true)
}
