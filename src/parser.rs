use std::fmt;

use crate::ast::{BinaryOp, Expr, Statement, UnaryOp};
use crate::builtin::{Constant, Function};
use crate::token::{Token, TokenKind};

/// Variable that receives the value of a statement with no explicit
/// assignment target.
pub const ANS: &str = "ans";

/// What the parser wanted to see when it failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expected {
    /// A specific token.
    Token(TokenKind),
    /// A number, name, builtin, `-` or `[`.
    Operand,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token(kind) => write!(f, "{kind}"),
            Self::Operand => write!(f, "number, name or '['"),
        }
    }
}

/// Error produced during parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("syntax error near '{found}' at column {column}: {expected} expected")]
pub struct SyntaxError {
    /// Offending lexeme; the end of the line reads `end of line`.
    pub found: String,
    pub expected: Expected,
    pub column: usize,
}

/// Parse the tokens of one line into a [`Statement`].
///
/// # Errors
///
/// Returns `SyntaxError` at the first token that fits no grammar
/// position.
pub fn parse(tokens: &[Token]) -> Result<Statement, SyntaxError> {
    Parser::new(tokens).parse()
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    /// Inside `[...]` and not inside a call's parentheses.
    in_row: bool,
}

impl<'a> Parser<'a> {
    const fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            in_row: false,
        }
    }

    fn parse(mut self) -> Result<Statement, SyntaxError> {
        let statement = match (self.kind(), self.kind_at(1)) {
            (TokenKind::EndOfLine, _) => Statement::Empty,
            (TokenKind::Identifier | TokenKind::Builtin, TokenKind::Assign) => {
                let target = self.tokens[self.pos].text.clone();
                self.pos += 2;
                let value = self.expression()?;
                Statement::Assign { target, value }
            }
            (TokenKind::Identifier, TokenKind::EndOfLine) => {
                let name = self.tokens[self.pos].text.clone();
                self.pos += 1;
                Statement::Show(name)
            }
            _ => Statement::Assign {
                target: ANS.to_string(),
                value: self.expression()?,
            },
        };
        self.expect(TokenKind::EndOfLine)?;
        Ok(statement)
    }

    /// `term ((+ | - | .+ | .-) term)*`
    fn expression(&mut self) -> Result<Expr, SyntaxError> {
        let mut lhs = self.term()?;
        while let Some(op) = binary_op(self.kind()).filter(|op| !op.is_multiplicative()) {
            if self.in_row && self.separates_elements() {
                break;
            }
            self.pos += 1;
            let rhs = self.term()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    /// `terminal ((* | / | .* | ./) terminal)*`
    fn term(&mut self) -> Result<Expr, SyntaxError> {
        let mut lhs = self.terminal()?;
        while let Some(op) = binary_op(self.kind()).filter(|op| op.is_multiplicative()) {
            self.pos += 1;
            let rhs = self.terminal()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    /// `(NUMBER | '-' terminal | IDENT | BUILTIN | call | array) [']`
    fn terminal(&mut self) -> Result<Expr, SyntaxError> {
        let expr = match self.kind() {
            TokenKind::Integer | TokenKind::Float => {
                let value = self.tokens[self.pos]
                    .text
                    .parse::<f64>()
                    .map_err(|_| self.error(Expected::Operand))?;
                self.pos += 1;
                Expr::Number(value)
            }
            TokenKind::Subtract => {
                self.pos += 1;
                Expr::unary(UnaryOp::Negate, self.terminal()?)
            }
            TokenKind::Identifier => {
                let name = self.tokens[self.pos].text.clone();
                self.pos += 1;
                Expr::Identifier(name)
            }
            TokenKind::Builtin => self.builtin()?,
            TokenKind::LeftBracket => self.array()?,
            _ => return Err(self.error(Expected::Operand)),
        };

        if self.kind() == TokenKind::Transpose {
            self.pos += 1;
            return Ok(Expr::unary(UnaryOp::Transpose, expr));
        }
        Ok(expr)
    }

    fn builtin(&mut self) -> Result<Expr, SyntaxError> {
        let name = &self.tokens[self.pos].text;
        if let Some(constant) = Constant::from_name(name) {
            self.pos += 1;
            return Ok(Expr::Constant(constant));
        }
        let Some(function) = Function::from_name(name) else {
            return Err(self.error(Expected::Operand));
        };
        self.pos += 1;
        self.expect(TokenKind::LeftParen)?;

        let in_row = std::mem::replace(&mut self.in_row, false);
        let mut args = Vec::new();
        if self.kind() != TokenKind::RightParen {
            args.push(self.expression()?);
            while self.kind() == TokenKind::Comma {
                self.pos += 1;
                args.push(self.expression()?);
            }
        }
        self.expect(TokenKind::RightParen)?;
        self.in_row = in_row;

        Ok(Expr::Call { function, args })
    }

    /// `'[' [row (';' row)* [';']] ']'`
    fn array(&mut self) -> Result<Expr, SyntaxError> {
        self.expect(TokenKind::LeftBracket)?;
        let in_row = std::mem::replace(&mut self.in_row, true);

        let mut rows = Vec::new();
        if self.kind() != TokenKind::RightBracket {
            loop {
                rows.push(self.row()?);
                if self.kind() != TokenKind::Semicolon {
                    break;
                }
                self.pos += 1;
                // trailing `;` before `]`
                if self.kind() == TokenKind::RightBracket {
                    break;
                }
            }
        }
        self.expect(TokenKind::RightBracket)?;
        self.in_row = in_row;

        Ok(Expr::Matrix(rows))
    }

    /// `expression (','? expression)*`
    fn row(&mut self) -> Result<Vec<Expr>, SyntaxError> {
        let mut cells = vec![self.expression()?];
        loop {
            if self.kind() == TokenKind::Comma {
                self.pos += 1;
                cells.push(self.expression()?);
            } else if self.starts_operand() {
                cells.push(self.expression()?);
            } else {
                break;
            }
        }
        Ok(cells)
    }

    const fn starts_operand(&self) -> bool {
        matches!(
            self.kind(),
            TokenKind::Integer
                | TokenKind::Float
                | TokenKind::Identifier
                | TokenKind::Builtin
                | TokenKind::LeftBracket
                | TokenKind::Subtract
        )
    }

    /// Inside a row, `[1 -2]` holds two cells while `[1 - 2]` and
    /// `[1-2]` hold one: a `-` spaced before but not after starts a
    /// new element.
    fn separates_elements(&self) -> bool {
        if self.kind() != TokenKind::Subtract || self.pos == 0 {
            return false;
        }
        let (Some(prev), Some(op), Some(next)) = (
            self.tokens.get(self.pos - 1),
            self.tokens.get(self.pos),
            self.tokens.get(self.pos + 1),
        ) else {
            return false;
        };
        prev.span.end < op.span.start && op.span.end == next.span.start
    }

    const fn kind(&self) -> TokenKind {
        self.kind_at(0)
    }

    /// Kind of the token `offset` ahead; past the end reads as
    /// end of line.
    const fn kind_at(&self, offset: usize) -> TokenKind {
        let i = self.pos + offset;
        if i < self.tokens.len() {
            self.tokens[i].kind
        } else {
            TokenKind::EndOfLine
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<(), SyntaxError> {
        if self.kind() != kind {
            return Err(self.error(Expected::Token(kind)));
        }
        self.pos += 1;
        Ok(())
    }

    fn error(&self, expected: Expected) -> SyntaxError {
        match self.tokens.get(self.pos) {
            Some(token) if token.kind != TokenKind::EndOfLine => SyntaxError {
                found: token.text.clone(),
                expected,
                column: token.span.column(),
            },
            other => SyntaxError {
                found: TokenKind::EndOfLine.to_string(),
                expected,
                column: other
                    .or_else(|| self.tokens.last())
                    .map_or(1, |t| t.span.end + 1),
            },
        }
    }
}

const fn binary_op(kind: TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::Add => Some(BinaryOp::Add),
        TokenKind::Subtract => Some(BinaryOp::Subtract),
        TokenKind::Multiply => Some(BinaryOp::Multiply),
        TokenKind::Divide => Some(BinaryOp::Divide),
        TokenKind::ElemAdd => Some(BinaryOp::ElemAdd),
        TokenKind::ElemSubtract => Some(BinaryOp::ElemSubtract),
        TokenKind::ElemMultiply => Some(BinaryOp::ElemMultiply),
        TokenKind::ElemDivide => Some(BinaryOp::ElemDivide),
        _ => None,
    }
}
