//! Complex matrix container
//!
//! The matrix is stored as `width` columns of `height` elements each. The first
//! index selects the column (the horizontal coordinate), matching the way the
//! transform and block stages address samples as `(x, y)`.

use crate::{CodecError, CodecResult, Complex64, Dimensions};

/// A `width × height` grid of complex numbers
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ComplexMatrix {
    columns: Vec<Vec<Complex64>>,
    height: usize,
}

impl ComplexMatrix {
    /// All-zero matrix
    pub fn zeros(width: usize, height: usize) -> Self {
        Self {
            columns: vec![vec![Complex64::new(0.0, 0.0); height]; width],
            height: if width == 0 { 0 } else { height },
        }
    }

    /// Build a matrix element by element from `f(x, y)`
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> Complex64,
    {
        let columns = (0..width)
            .map(|x| (0..height).map(|y| f(x, y)).collect())
            .collect();
        Self {
            columns,
            height: if width == 0 { 0 } else { height },
        }
    }

    /// Real-valued matrix from `f(x, y)`
    pub fn from_real_fn<F>(width: usize, height: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> f64,
    {
        Self::from_fn(width, height, |x, y| Complex64::new(f(x, y), 0.0))
    }

    /// Take ownership of a set of columns. Every column must have the same length.
    pub fn from_columns(columns: Vec<Vec<Complex64>>) -> CodecResult<Self> {
        let height = columns.first().map_or(0, Vec::len);
        if let Some(bad) = columns.iter().find(|c| c.len() != height) {
            return Err(CodecError::InvalidInput(format!(
                "ragged matrix: column of length {} where {} was expected",
                bad.len(),
                height
            )));
        }
        Ok(Self { columns, height })
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width() as u32, self.height as u32)
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() || self.height == 0
    }

    pub fn get(&self, x: usize, y: usize) -> Complex64 {
        self.columns[x][y]
    }

    pub fn set(&mut self, x: usize, y: usize, value: Complex64) {
        self.columns[x][y] = value;
    }

    /// Real component at `(x, y)`
    pub fn re(&self, x: usize, y: usize) -> f64 {
        self.columns[x][y].re
    }

    pub fn column(&self, x: usize) -> &[Complex64] {
        &self.columns[x]
    }

    pub fn columns(&self) -> &[Vec<Complex64>] {
        &self.columns
    }

    pub fn into_columns(self) -> Vec<Vec<Complex64>> {
        self.columns
    }

    /// Element-wise map into a new matrix
    pub fn map<F>(&self, mut f: F) -> Self
    where
        F: FnMut(Complex64) -> Complex64,
    {
        Self {
            columns: self
                .columns
                .iter()
                .map(|c| c.iter().map(|&v| f(v)).collect())
                .collect(),
            height: self.height,
        }
    }

    /// Swap the two coordinates
    pub fn transpose(&self) -> Self {
        Self::from_fn(self.height, self.width(), |x, y| self.columns[y][x])
    }

    /// Iterate elements with the first coordinate outer
    pub fn iter(&self) -> impl Iterator<Item = &Complex64> + '_ {
        self.columns.iter().flatten()
    }

    /// Largest element-wise distance to another matrix of the same shape
    pub fn max_abs_diff(&self, other: &Self) -> Option<f64> {
        if self.dimensions() != other.dimensions() {
            return None;
        }
        Some(
            self.iter()
                .zip(other.iter())
                .map(|(a, b)| (a - b).norm())
                .fold(0.0, f64::max),
        )
    }
}
