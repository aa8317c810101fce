//! Reconstruction quality metric

use halftone_core::ComplexMatrix;

/// Normalized reconstruction error `Σ(|a| - |b|)² / Σ(|a|·|b|)`
///
/// Compares coefficient magnitudes position by position; lower is better and
/// identical matrices score 0. Matrices of different dimensions score 0 as well
/// (not an error). When every product `|a|·|b|` is zero the score is 0 if the
/// magnitudes also agree and `+∞` otherwise.
pub fn quality(original: &ComplexMatrix, restored: &ComplexMatrix) -> f64 {
    if original.dimensions() != restored.dimensions() {
        return 0.0;
    }

    let (error, energy) = original
        .iter()
        .zip(restored.iter())
        .fold((0.0, 0.0), |(error, energy), (a, b)| {
            let (a, b) = (a.norm(), b.norm());
            (error + (a - b) * (a - b), energy + a * b)
        });

    if energy == 0.0 {
        if error == 0.0 {
            0.0
        } else {
            f64::INFINITY
        }
    } else {
        error / energy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use halftone_core::Complex64;

    #[test]
    fn test_identical_matrices() {
        let m = ComplexMatrix::from_real_fn(8, 4, |x, y| (x * 3 + y) as f64 - 10.0);
        assert_eq!(quality(&m, &m), 0.0);
    }

    #[test]
    fn test_dimension_mismatch_is_zero() {
        let a = ComplexMatrix::from_real_fn(8, 8, |_, _| 1.0);
        let b = ComplexMatrix::from_real_fn(8, 16, |_, _| 5.0);
        assert_eq!(quality(&a, &b), 0.0);
    }

    #[test]
    fn test_known_value() {
        let a = ComplexMatrix::from_real_fn(2, 1, |x, _| if x == 0 { 2.0 } else { 4.0 });
        let b = ComplexMatrix::from_real_fn(2, 1, |x, _| if x == 0 { 1.0 } else { 4.0 });
        // (1 + 0) / (2 + 16)
        assert!((quality(&a, &b) - 1.0 / 18.0).abs() < 1e-12);
    }

    #[test]
    fn test_uses_magnitudes() {
        let a = ComplexMatrix::from_fn(1, 1, |_, _| Complex64::new(3.0, 4.0));
        let b = ComplexMatrix::from_real_fn(1, 1, |_, _| -5.0);
        assert_eq!(quality(&a, &b), 0.0);
    }

    #[test]
    fn test_zero_energy() {
        let zeros = ComplexMatrix::zeros(2, 2);
        let ones = ComplexMatrix::from_real_fn(2, 2, |_, _| 1.0);
        assert_eq!(quality(&zeros, &zeros), 0.0);
        assert_eq!(quality(&zeros, &ones), f64::INFINITY);
    }
}
