//! Builtin functions and constants.
//!
//! The set is closed: the lexer tags these names as
//! [`TokenKind::Builtin`](crate::TokenKind::Builtin) and they can never be
//! assigned to.

use crate::operators;
use crate::value::{Matrix, Value};
use crate::RuntimeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    /// `inv(M)`: inverse of a square matrix.
    Inv,
    /// `transpose(X)`: same as `X'`.
    Transpose,
    /// `zeros(n)` / `zeros(r, c)`.
    Zeros,
    /// `ones(n)` / `ones(r, c)`.
    Ones,
    /// `eye(n)` / `eye(r, c)`.
    Eye,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constant {
    Pi,
    Inf,
    NaN,
}

const FUNCTIONS: [Function; 5] = [
    Function::Inv,
    Function::Transpose,
    Function::Zeros,
    Function::Ones,
    Function::Eye,
];

const CONSTANTS: [Constant; 3] = [Constant::Pi, Constant::Inf, Constant::NaN];

/// Whether `name` is a builtin function or constant.
#[must_use]
pub fn is_builtin(name: &str) -> bool {
    Function::from_name(name).is_some() || Constant::from_name(name).is_some()
}

impl Function {
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        FUNCTIONS.into_iter().find(|f| f.name() == name)
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Inv => "inv",
            Self::Transpose => "transpose",
            Self::Zeros => "zeros",
            Self::Ones => "ones",
            Self::Eye => "eye",
        }
    }

    /// Apply the function to already evaluated arguments.
    pub fn call(self, args: &[Value]) -> Result<Value, RuntimeError> {
        match self {
            Self::Inv => match args {
                [arg] => operators::invert(arg),
                _ => Err(self.invalid(format!("expected 1 argument, got {}", args.len()))),
            },
            Self::Transpose => match args {
                [arg] => Ok(operators::transpose(arg)),
                _ => Err(self.invalid(format!("expected 1 argument, got {}", args.len()))),
            },
            Self::Zeros => {
                let (rows, cols) = self.dimensions(args)?;
                Ok(Matrix::filled(rows, cols, 0.0).into())
            }
            Self::Ones => {
                let (rows, cols) = self.dimensions(args)?;
                Ok(Matrix::filled(rows, cols, 1.0).into())
            }
            Self::Eye => {
                let (rows, cols) = self.dimensions(args)?;
                Ok(Matrix::identity(rows, cols).into())
            }
        }
    }

    /// `(n)` means `n x n`, `(r, c)` means `r x c`.
    fn dimensions(self, args: &[Value]) -> Result<(usize, usize), RuntimeError> {
        let (rows, cols) = match args {
            [n] => {
                let n = self.dimension(n)?;
                (n, n)
            }
            [r, c] => (self.dimension(r)?, self.dimension(c)?),
            _ => return Err(self.invalid(format!("expected 1 or 2 arguments, got {}", args.len()))),
        };
        if !Matrix::fits(rows, cols) {
            return Err(self.invalid("matrix too large".to_string()));
        }
        Ok((rows, cols))
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn dimension(self, value: &Value) -> Result<usize, RuntimeError> {
        match value {
            Value::Scalar(x) if x.is_finite() && *x >= 0.0 && x.fract() == 0.0 => Ok(*x as usize),
            Value::Scalar(x) => Err(self.invalid(format!(
                "dimension must be a non-negative integer, got {}",
                crate::value::Number(*x)
            ))),
            Value::Matrix(_) => Err(self.invalid("dimension must be a scalar".to_string())),
        }
    }

    const fn invalid(self, reason: String) -> RuntimeError {
        RuntimeError::InvalidCall {
            function: self.name(),
            reason,
        }
    }
}

impl Constant {
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        CONSTANTS.into_iter().find(|c| c.name() == name)
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Pi => "pi",
            Self::Inf => "Inf",
            Self::NaN => "NaN",
        }
    }

    #[must_use]
    pub const fn value(self) -> f64 {
        match self {
            Self::Pi => std::f64::consts::PI,
            Self::Inf => f64::INFINITY,
            Self::NaN => f64::NAN,
        }
    }
}
