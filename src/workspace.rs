//! Variable table shared by every statement of a session.

use std::collections::HashMap;

use crate::ast::Statement;
use crate::builtin;
use crate::formatter;
use crate::lexer::tokenize;
use crate::parser::{Expected, SyntaxError, parse};
use crate::session;
use crate::token::TokenKind;
use crate::value::Value;
use crate::{Error, RuntimeError};

/// Name to value bindings; the last write wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workspace {
    variables: HashMap<String, Value>,
}

impl Workspace {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// Bind `value` to `name`, returning the previous value.
    pub fn set(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.variables.insert(name.into(), value)
    }

    pub fn clear(&mut self) {
        self.variables.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Bindings sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        let mut entries: Vec<_> = self
            .variables
            .iter()
            .map(|(name, value)| (name.as_str(), value))
            .collect();
        entries.sort_unstable_by_key(|&(name, _)| name);
        entries.into_iter()
    }

    /// Variable names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.iter().map(|(name, _)| name)
    }

    /// Copy every binding of `other` into this workspace.
    pub fn extend(&mut self, other: Self) {
        self.variables.extend(other.variables);
    }

    /// Serialize as `name = value` lines.
    #[must_use]
    pub fn to_text(&self) -> String {
        formatter::format_workspace(self)
    }

    /// Load bindings written by [`Workspace::to_text`].
    ///
    /// Every non-blank line must be an assignment to a name that is
    /// not a builtin; its right-hand side is evaluated against the
    /// bindings loaded so far.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Workspace`] with the 1-based line number of the
    /// first line that fails to parse or evaluate.
    pub fn from_text(text: &str) -> Result<Self, Error> {
        let mut workspace = Self::new();
        for (index, line) in text.lines().enumerate() {
            let at_line = |source: Error| Error::Workspace {
                line: index + 1,
                source: Box::new(source),
            };
            match parse(&tokenize(line)).map_err(|e| at_line(e.into()))? {
                Statement::Empty => {}
                Statement::Assign { target, .. } if builtin::is_builtin(&target) => {
                    return Err(at_line(RuntimeError::Reserved(target).into()));
                }
                Statement::Assign { target, value } => {
                    let value = session::eval(&value, &workspace).map_err(|e| at_line(e.into()))?;
                    workspace.set(target, value);
                }
                Statement::Show(_) => {
                    let missing = SyntaxError {
                        found: TokenKind::EndOfLine.to_string(),
                        expected: Expected::Token(TokenKind::Assign),
                        column: line.trim_end().len() + 1,
                    };
                    return Err(at_line(missing.into()));
                }
            }
        }
        log::debug!("loaded {} bindings from workspace text", workspace.len());
        Ok(workspace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Matrix;

    #[test]
    fn last_write_wins() {
        let mut ws = Workspace::new();
        assert_eq!(ws.set("x", Value::Scalar(1.0)), None);
        assert_eq!(ws.set("x", Value::Scalar(2.0)), Some(Value::Scalar(1.0)));
        assert_eq!(ws.get("x"), Some(&Value::Scalar(2.0)));
        assert_eq!(ws.len(), 1);
    }

    #[test]
    fn names_sorted() {
        let mut ws = Workspace::new();
        ws.set("zeta", Value::Scalar(1.0));
        ws.set("alpha", Value::Scalar(2.0));
        ws.set("ans", Value::Scalar(3.0));
        assert_eq!(ws.names().collect::<Vec<_>>(), ["alpha", "ans", "zeta"]);
    }

    #[test]
    fn text_roundtrip() {
        let mut ws = Workspace::new();
        ws.set("a", Value::Scalar(-0.125));
        ws.set(
            "m",
            Matrix::from_rows(vec![vec![1.0, -2.0], vec![3.5, 4.0]])
                .unwrap()
                .into(),
        );
        ws.set("e", Matrix::empty().into());
        let loaded = Workspace::from_text(&ws.to_text()).unwrap();
        assert_eq!(loaded, ws);
    }

    #[test]
    fn from_text_special_values() {
        let ws = Workspace::from_text("a = Inf\nb = -Inf\n").unwrap();
        assert_eq!(ws.get("a"), Some(&Value::Scalar(f64::INFINITY)));
        assert_eq!(ws.get("b"), Some(&Value::Scalar(f64::NEG_INFINITY)));
    }

    #[test]
    fn from_text_skips_blank_lines() {
        let ws = Workspace::from_text("\n% saved\nx = 1\n\n").unwrap();
        assert_eq!(ws.len(), 1);
    }

    #[test]
    fn from_text_reports_line() {
        let err = Workspace::from_text("a = 1\nb = [1 2; 3]\n").unwrap_err();
        assert_eq!(
            err,
            Error::Workspace {
                line: 2,
                source: Box::new(Error::Runtime(RuntimeError::UnequalColumns)),
            }
        );
        assert_eq!(err.to_string(), "line 2: unequal column sizes");
    }

    #[test]
    fn from_text_rejects_bare_name() {
        let err = Workspace::from_text("x = 1\nx\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "line 2: syntax error near 'end of line' at column 2: '=' expected"
        );
    }

    #[test]
    fn from_text_rejects_builtin_names() {
        let err = Workspace::from_text("x = 1\npi = 3\n").unwrap_err();
        assert_eq!(
            err,
            Error::Workspace {
                line: 2,
                source: Box::new(Error::Runtime(RuntimeError::Reserved("pi".to_string()))),
            }
        );
        assert_eq!(err.to_string(), "line 2: pi is reserved");
        assert!(Workspace::from_text("Inf = 2").is_err());
    }

    #[test]
    fn from_text_extreme_magnitudes() {
        let mut ws = Workspace::new();
        ws.set("big", Value::Scalar(1e300));
        ws.set(
            "m",
            Matrix::from_rows(vec![vec![1.0, -2.5e-20]]).unwrap().into(),
        );
        let text = ws.to_text();
        assert_eq!(text, "big = 1e300\nm = [1 -2.5e-20]\n");
        assert_eq!(Workspace::from_text(&text).unwrap(), ws);
    }

    #[test]
    fn from_text_syntax_error() {
        let err = Workspace::from_text("a = [1 2\n").unwrap_err();
        assert!(matches!(
            err,
            Error::Workspace { line: 1, ref source } if matches!(**source, Error::Syntax(_))
        ));
    }
}
