//! Tokenizer, parser, and evaluator for a small MATLAB-like
//! matrix expression language.
//!
//! Statements are processed one line at a time: the line is
//! tokenized, parsed into a [`Statement`], and evaluated against a
//! [`Session`] that owns the variable [`Workspace`].
//!
//! # Quick start
//!
//! ```
//! use matlabette::Session;
//!
//! let mut session = Session::new();
//! session.evaluate("a = [1, 2; 3, 4]").unwrap();
//! let shown = session.evaluate("a'").unwrap().unwrap();
//! assert_eq!(shown, "\nans =\n    1    3\n    2    4\n\n");
//! ```
//!
//! ## Injecting commands
//!
//! ```
//! use matlabette::{Commands, RuntimeError, Session, Workspace};
//!
//! struct Who;
//!
//! impl Commands for Who {
//!     fn is_reserved(&self, name: &str) -> bool {
//!         name == "who"
//!     }
//!
//!     fn invoke(&mut self, _name: &str, ws: &mut Workspace) -> Result<String, RuntimeError> {
//!         Ok(ws.names().collect::<Vec<_>>().join(" "))
//!     }
//! }
//!
//! let mut session = Session::with_commands(Who);
//! session.evaluate("x = 1").unwrap();
//! assert_eq!(session.evaluate("who").unwrap().unwrap(), "x");
//! assert!(session.evaluate("who = 2").is_err());
//! ```

// Allow noisy pedantic lints that don't add value for
// a library crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod ast;
pub mod builtin;
pub mod formatter;
pub mod lexer;
pub mod operators;
pub mod parser;
pub mod session;
pub mod token;
pub mod value;
pub mod workspace;

pub use ast::{BinaryOp, Expr, Statement, UnaryOp};
pub use builtin::{Constant, Function};
pub use formatter::{format_binding, format_workspace};
pub use lexer::tokenize;
pub use parser::{Expected, SyntaxError, parse};
pub use session::{Commands, NoCommands, Session};
pub use token::{Span, Token, TokenKind};
pub use value::{Matrix, Value};
pub use workspace::Workspace;

/// Error raised while evaluating a well-formed statement.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    /// Name is neither a variable nor a command.
    #[error("{0} is not defined")]
    UndefinedVariable(String),
    /// Assignment to a command or builtin name.
    #[error("{0} is reserved")]
    Reserved(String),
    /// A matrix literal cell evaluated to a matrix.
    #[error("nested arrays not allowed")]
    NestedArray,
    /// Matrix literal rows of different lengths.
    #[error("unequal column sizes")]
    UnequalColumns,
    /// Operand types or shapes do not fit the operator.
    #[error("invalid arguments for operator '{operator}'")]
    InvalidArguments { operator: &'static str },
    /// Wrong arity or argument kind for a builtin function.
    #[error("{function}: {reason}")]
    InvalidCall {
        function: &'static str,
        reason: String,
    },
    /// `inv` on a matrix without an inverse.
    #[error("matrix is singular")]
    SingularMatrix,
    /// A result would exceed the matrix cell limit.
    #[error("matrix too large: {rows}x{cols}")]
    TooLarge { rows: usize, cols: usize },
    /// An injected command failed.
    #[error("{name}: {message}")]
    Command { name: String, message: String },
}

/// Unified error type covering parsing and evaluation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A parser error.
    #[error("{0}")]
    Syntax(#[from] SyntaxError),
    /// An evaluation error.
    #[error("{0}")]
    Runtime(#[from] RuntimeError),
    /// A workspace text line failed to load.
    #[error("line {line}: {source}")]
    Workspace {
        line: usize,
        #[source]
        source: Box<Self>,
    },
}

/// Tokenize and parse one statement line in one step.
pub fn parse_str(line: &str) -> Result<Statement, SyntaxError> {
    parse(&tokenize(line))
}
