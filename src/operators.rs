//! Pure arithmetic over [`Value`]s.
//!
//! Scalars broadcast over every cell of a matrix operand. Between two
//! matrices, `*` is the linear-algebra product and every other
//! operator works element by element on equal shapes.

use crate::ast::{BinaryOp, UnaryOp};
use crate::value::{Matrix, Value};
use crate::RuntimeError;

/// Apply a binary operator to two evaluated operands.
pub fn binary(op: BinaryOp, lhs: &Value, rhs: &Value) -> Result<Value, RuntimeError> {
    match op {
        BinaryOp::Add | BinaryOp::ElemAdd => elementwise(op, lhs, rhs, |a, b| a + b),
        BinaryOp::Subtract | BinaryOp::ElemSubtract => elementwise(op, lhs, rhs, |a, b| a - b),
        BinaryOp::Divide | BinaryOp::ElemDivide => elementwise(op, lhs, rhs, |a, b| a / b),
        BinaryOp::ElemMultiply => elementwise(op, lhs, rhs, |a, b| a * b),
        BinaryOp::Multiply => multiply(lhs, rhs),
    }
}

/// Apply a unary operator.
#[must_use]
pub fn unary(op: UnaryOp, operand: &Value) -> Value {
    match op {
        UnaryOp::Negate => negate(operand),
        UnaryOp::Transpose => transpose(operand),
    }
}

pub fn add(lhs: &Value, rhs: &Value) -> Result<Value, RuntimeError> {
    binary(BinaryOp::Add, lhs, rhs)
}

pub fn subtract(lhs: &Value, rhs: &Value) -> Result<Value, RuntimeError> {
    binary(BinaryOp::Subtract, lhs, rhs)
}

pub fn divide(lhs: &Value, rhs: &Value) -> Result<Value, RuntimeError> {
    binary(BinaryOp::Divide, lhs, rhs)
}

pub fn elem_multiply(lhs: &Value, rhs: &Value) -> Result<Value, RuntimeError> {
    binary(BinaryOp::ElemMultiply, lhs, rhs)
}

pub fn elem_divide(lhs: &Value, rhs: &Value) -> Result<Value, RuntimeError> {
    binary(BinaryOp::ElemDivide, lhs, rhs)
}

/// Scalar product, scalar broadcast, or matrix product.
pub fn multiply(lhs: &Value, rhs: &Value) -> Result<Value, RuntimeError> {
    match (lhs, rhs) {
        (Value::Matrix(a), Value::Matrix(b)) => {
            if a.cols() != b.rows() {
                return Err(invalid(BinaryOp::Multiply));
            }
            if !Matrix::fits(a.rows(), b.cols()) {
                return Err(RuntimeError::TooLarge {
                    rows: a.rows(),
                    cols: b.cols(),
                });
            }
            let product = Matrix::from_fn(a.rows(), b.cols(), |r, c| {
                (0..a.cols())
                    .filter_map(|k| Some(a.get(r, k)? * b.get(k, c)?))
                    .sum()
            });
            Ok(product.into())
        }
        _ => elementwise(BinaryOp::Multiply, lhs, rhs, |a, b| a * b),
    }
}

/// Negate a scalar or every cell of a matrix.
#[must_use]
pub fn negate(value: &Value) -> Value {
    match value {
        Value::Scalar(x) => Value::Scalar(-x),
        Value::Matrix(m) => m.map(|x| -x).into(),
    }
}

/// Swap rows and columns; identity on scalars.
#[must_use]
pub fn transpose(value: &Value) -> Value {
    match value {
        Value::Scalar(x) => Value::Scalar(*x),
        Value::Matrix(m) => m.transpose().into(),
    }
}

/// Inverse of a square matrix by Gauss-Jordan elimination with
/// partial pivoting.
pub fn invert(value: &Value) -> Result<Value, RuntimeError> {
    let Value::Matrix(m) = value else {
        return Err(RuntimeError::InvalidCall {
            function: "inv",
            reason: "argument must be a matrix".to_string(),
        });
    };
    if !m.is_square() {
        return Err(RuntimeError::InvalidCall {
            function: "inv",
            reason: format!("matrix must be square, got {}x{}", m.rows(), m.cols()),
        });
    }

    let n = m.rows();
    let mut a: Vec<Vec<f64>> = m.iter_rows().map(<[f64]>::to_vec).collect();
    let mut inv: Vec<Vec<f64>> = Matrix::identity(n, n)
        .iter_rows()
        .map(<[f64]>::to_vec)
        .collect();

    // pivots this small relative to the largest entry count as zero
    let largest = m.as_slice().iter().fold(0.0_f64, |acc, x| acc.max(x.abs()));
    #[allow(clippy::cast_precision_loss)]
    let tolerance = n as f64 * f64::EPSILON * largest;

    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))
            .unwrap_or(col);
        if a[pivot][col].abs() <= tolerance {
            return Err(RuntimeError::SingularMatrix);
        }
        a.swap(col, pivot);
        inv.swap(col, pivot);

        let p = a[col][col];
        for k in 0..n {
            a[col][k] /= p;
            inv[col][k] /= p;
        }

        for row in 0..n {
            if row == col {
                continue;
            }
            let factor = a[row][col];
            if factor == 0.0 {
                continue;
            }
            for k in 0..n {
                let (da, di) = (factor * a[col][k], factor * inv[col][k]);
                a[row][k] -= da;
                inv[row][k] -= di;
            }
        }
    }

    Ok(Matrix::from_rows(inv)?.into())
}

/// Shared scalar/broadcast/element-wise path.
fn elementwise(
    op: BinaryOp,
    lhs: &Value,
    rhs: &Value,
    f: impl Fn(f64, f64) -> f64,
) -> Result<Value, RuntimeError> {
    match (lhs, rhs) {
        (Value::Scalar(a), Value::Scalar(b)) => Ok(Value::Scalar(f(*a, *b))),
        (Value::Scalar(a), Value::Matrix(m)) => Ok(m.map(|x| f(*a, x)).into()),
        (Value::Matrix(m), Value::Scalar(b)) => Ok(m.map(|x| f(x, *b)).into()),
        (Value::Matrix(a), Value::Matrix(b)) => a
            .zip_with(b, f)
            .map(Value::Matrix)
            .ok_or_else(|| invalid(op)),
    }
}

const fn invalid(op: BinaryOp) -> RuntimeError {
    RuntimeError::InvalidArguments {
        operator: op.symbol(),
    }
}
