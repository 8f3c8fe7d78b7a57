//! Runtime values: IEEE doubles and rectangular matrices of them.

use std::fmt;

use crate::RuntimeError;

/// Result of evaluating an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(f64),
    Matrix(Matrix),
}

/// Rectangular grid of doubles stored in row-major order.
///
/// The empty matrix is always `0 x 0`; every row holds exactly
/// `cols` cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

/// Largest number of cells a matrix may hold.
pub const MAX_CELLS: usize = 1 << 24;

impl Matrix {
    /// Whether a `rows x cols` matrix stays within [`MAX_CELLS`].
    #[must_use]
    pub const fn fits(rows: usize, cols: usize) -> bool {
        match rows.checked_mul(cols) {
            Some(cells) => cells <= MAX_CELLS,
            None => false,
        }
    }

    /// The `0 x 0` matrix written `[]`.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            rows: 0,
            cols: 0,
            data: Vec::new(),
        }
    }

    /// Build a matrix from nested rows.
    ///
    /// Fails with [`RuntimeError::UnequalColumns`] if any row differs
    /// in length from the first one.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, RuntimeError> {
        let Some(first) = rows.first() else {
            return Ok(Self::empty());
        };
        let cols = first.len();
        if rows.iter().any(|row| row.len() != cols) {
            return Err(RuntimeError::UnequalColumns);
        }
        if cols == 0 {
            return Ok(Self::empty());
        }
        let height = rows.len();
        Ok(Self {
            rows: height,
            cols,
            data: rows.into_iter().flatten().collect(),
        })
    }

    /// Build a `rows x cols` matrix by calling `cell(row, col)` for every
    /// position.
    ///
    /// Callers check the shape with [`Matrix::fits`] first.
    #[must_use]
    pub fn from_fn(rows: usize, cols: usize, mut cell: impl FnMut(usize, usize) -> f64) -> Self {
        if rows == 0 || cols == 0 {
            return Self::empty();
        }
        let mut data = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                data.push(cell(r, c));
            }
        }
        Self { rows, cols, data }
    }

    /// Matrix of the given shape with every cell set to `value`.
    #[must_use]
    pub fn filled(rows: usize, cols: usize, value: f64) -> Self {
        Self::from_fn(rows, cols, |_, _| value)
    }

    /// Identity-like matrix: ones on the main diagonal.
    #[must_use]
    pub fn identity(rows: usize, cols: usize) -> Self {
        Self::from_fn(rows, cols, |r, c| if r == c { 1.0 } else { 0.0 })
    }

    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    #[must_use]
    pub const fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub const fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Cell at `(row, col)`, or `None` when out of bounds.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            self.data.get(row * self.cols + col).copied()
        } else {
            None
        }
    }

    /// Iterate over rows as slices.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        // chunks_exact panics on a zero chunk size
        self.data.chunks_exact(self.cols.max(1))
    }

    /// All cells in row-major order.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Apply `f` to every cell.
    #[must_use]
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|&x| f(x)).collect(),
        }
    }

    /// Combine two equally shaped matrices cell by cell.
    ///
    /// Returns `None` when the shapes differ.
    #[must_use]
    pub fn zip_with(&self, other: &Self, f: impl Fn(f64, f64) -> f64) -> Option<Self> {
        if self.shape() != other.shape() {
            return None;
        }
        Some(Self {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .zip(&other.data)
                .map(|(&a, &b)| f(a, b))
                .collect(),
        })
    }

    /// Swap rows and columns.
    #[must_use]
    pub fn transpose(&self) -> Self {
        Self::from_fn(self.cols, self.rows, |r, c| self.data[c * self.cols + r])
    }
}

impl Value {
    #[must_use]
    pub const fn as_scalar(&self) -> Option<f64> {
        match self {
            Self::Scalar(x) => Some(*x),
            Self::Matrix(_) => None,
        }
    }

    #[must_use]
    pub const fn as_matrix(&self) -> Option<&Matrix> {
        match self {
            Self::Scalar(_) => None,
            Self::Matrix(m) => Some(m),
        }
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Scalar(x)
    }
}

impl From<Matrix> for Value {
    fn from(m: Matrix) -> Self {
        Self::Matrix(m)
    }
}

/// Number formatting shared by display output and the workspace text.
///
/// Very large and very small magnitudes use exponent notation
/// (`1e300`, `-2.5e-20`); both forms read back exactly.
pub struct Number(pub f64);

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let x = self.0;
        if x.is_nan() {
            f.write_str("NaN")
        } else if x.is_infinite() {
            f.write_str(if x > 0.0 { "Inf" } else { "-Inf" })
        } else if x != 0.0 && !(1e-5..1e15).contains(&x.abs()) {
            write!(f, "{x:e}")
        } else {
            write!(f, "{x}")
        }
    }
}

/// Workspace text form: `[1 2; 3 4]`.
impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, row) in self.iter_rows().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            for (j, &cell) in row.iter().enumerate() {
                if j > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{}", Number(cell))?;
            }
        }
        f.write_str("]")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(x) => write!(f, "{}", Number(*x)),
            Self::Matrix(m) => write!(f, "{m}"),
        }
    }
}
