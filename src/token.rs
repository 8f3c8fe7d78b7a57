use std::fmt;
use std::ops::Range;

/// Byte range of a token within its source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    /// 1-based column of the first byte.
    #[must_use]
    pub const fn column(&self) -> usize {
        self.start + 1
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Self {
            start: range.start,
            end: range.end,
        }
    }
}

/// Token kinds produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// End of the statement line.
    EndOfLine,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `(`, only meaningful as a call delimiter.
    LeftParen,
    /// `)`
    RightParen,
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// `=`
    Assign,
    /// `+`
    Add,
    /// `-`
    Subtract,
    /// `*`
    Multiply,
    /// `/`
    Divide,
    /// `.+`
    ElemAdd,
    /// `.-`
    ElemSubtract,
    /// `.*`
    ElemMultiply,
    /// `./`
    ElemDivide,
    /// Postfix `'`.
    Transpose,
    /// Integer literal such as `42`.
    Integer,
    /// Float literal such as `1.5`, `.5` or `2e-3`.
    Float,
    /// Variable or command name.
    Identifier,
    /// Name of a builtin function or constant.
    Builtin,
    /// Character that starts no known token.
    Unknown,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::EndOfLine => "end of line",
            Self::LeftBracket => "'['",
            Self::RightBracket => "']'",
            Self::LeftParen => "'('",
            Self::RightParen => "')'",
            Self::Comma => "','",
            Self::Semicolon => "';'",
            Self::Assign => "'='",
            Self::Add => "'+'",
            Self::Subtract => "'-'",
            Self::Multiply => "'*'",
            Self::Divide => "'/'",
            Self::ElemAdd => "'.+'",
            Self::ElemSubtract => "'.-'",
            Self::ElemMultiply => "'.*'",
            Self::ElemDivide => "'./'",
            Self::Transpose => "'''",
            Self::Integer => "integer",
            Self::Float => "number",
            Self::Identifier => "name",
            Self::Builtin => "builtin",
            Self::Unknown => "character",
        };
        f.write_str(text)
    }
}

/// A single token with its kind, text, and position in the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}
