use std::fmt;

use crate::builtin::{Constant, Function};
use crate::value::Number;

/// One parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `target = value`; expressions without a target assign to `ans`.
    Assign { target: String, value: Expr },
    /// Bare name: display a variable or run a command.
    Show(String),
    /// Blank or comment-only line.
    Empty,
}

/// Expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Numeric literal.
    Number(f64),
    /// Variable reference.
    Identifier(String),
    /// Builtin constant such as `pi`.
    Constant(Constant),
    /// Matrix literal: rows of cell expressions.
    Matrix(Vec<Vec<Self>>),
    /// Prefix negation or postfix transpose.
    Unary { op: UnaryOp, operand: Box<Self> },
    /// Infix arithmetic.
    Binary {
        op: BinaryOp,
        lhs: Box<Self>,
        rhs: Box<Self>,
    },
    /// Builtin function call.
    Call { function: Function, args: Vec<Self> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Negate,
    Transpose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    ElemAdd,
    ElemSubtract,
    ElemMultiply,
    ElemDivide,
}

impl BinaryOp {
    /// Source symbol of the operator.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::ElemAdd => ".+",
            Self::ElemSubtract => ".-",
            Self::ElemMultiply => ".*",
            Self::ElemDivide => "./",
        }
    }

    /// Multiplicative operators bind tighter than additive ones.
    #[must_use]
    pub const fn is_multiplicative(self) -> bool {
        matches!(
            self,
            Self::Multiply | Self::Divide | Self::ElemMultiply | Self::ElemDivide
        )
    }
}

impl Expr {
    /// Shorthand for a boxed binary node.
    #[must_use]
    pub fn binary(op: BinaryOp, lhs: Self, rhs: Self) -> Self {
        Self::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// Shorthand for a boxed unary node.
    #[must_use]
    pub fn unary(op: UnaryOp, operand: Self) -> Self {
        Self::Unary {
            op,
            operand: Box::new(operand),
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Canonical source text. Nested binary operands that would
/// re-associate differently are not parenthesized, since the
/// language has no grouping syntax.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(x) => write!(f, "{}", Number(*x)),
            Self::Identifier(name) => f.write_str(name),
            Self::Constant(c) => f.write_str(c.name()),
            Self::Matrix(rows) => {
                f.write_str("[")?;
                for (i, row) in rows.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    for (j, cell) in row.iter().enumerate() {
                        if j > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{cell}")?;
                    }
                }
                f.write_str("]")
            }
            Self::Unary {
                op: UnaryOp::Negate,
                operand,
            } => write!(f, "-{operand}"),
            Self::Unary {
                op: UnaryOp::Transpose,
                operand,
            } => write!(f, "{operand}'"),
            Self::Binary { op, lhs, rhs } => write!(f, "{lhs} {op} {rhs}"),
            Self::Call { function, args } => {
                write!(f, "{}(", function.name())?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Assign { target, value } => write!(f, "{target} = {value}"),
            Self::Show(name) => f.write_str(name),
            Self::Empty => Ok(()),
        }
    }
}
