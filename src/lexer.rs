use crate::builtin;
use crate::token::{Span, Token, TokenKind};

/// Tokenize one statement line.
///
/// Never fails: characters that start no token come out as
/// [`TokenKind::Unknown`] and are reported by the parser. The result
/// always ends with exactly one [`TokenKind::EndOfLine`]; anything
/// after the first `\n` is ignored.
#[must_use]
pub fn tokenize(line: &str) -> Vec<Token> {
    let tokens = Lexer::new(line).tokenize();
    log::trace!("tokenized {line:?} into {} tokens", tokens.len());
    tokens
}

struct Lexer<'a> {
    source: &'a str,
    input: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    const fn new(source: &'a str) -> Self {
        Self {
            source,
            input: source.as_bytes(),
            pos: 0,
        }
    }

    fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        while let Some(ch) = self.peek() {
            match ch {
                b'\n' => break,
                b' ' | b'\t' | b'\r' => self.pos += 1,
                // comment runs to end of line
                b'%' => break,
                b'[' => tokens.push(self.single(TokenKind::LeftBracket)),
                b']' => tokens.push(self.single(TokenKind::RightBracket)),
                b'(' => tokens.push(self.single(TokenKind::LeftParen)),
                b')' => tokens.push(self.single(TokenKind::RightParen)),
                b',' => tokens.push(self.single(TokenKind::Comma)),
                b';' => tokens.push(self.single(TokenKind::Semicolon)),
                b'=' => tokens.push(self.single(TokenKind::Assign)),
                b'+' => tokens.push(self.single(TokenKind::Add)),
                b'-' => tokens.push(self.single(TokenKind::Subtract)),
                b'*' => tokens.push(self.single(TokenKind::Multiply)),
                b'/' => tokens.push(self.single(TokenKind::Divide)),
                b'\'' => tokens.push(self.single(TokenKind::Transpose)),
                b'.' => tokens.push(self.read_dot()),
                b'0'..=b'9' => tokens.push(self.read_number()),
                b'a'..=b'z' | b'A'..=b'Z' | b'_' => tokens.push(self.read_identifier()),
                _ => tokens.push(self.read_unknown()),
            }
        }

        tokens.push(Token {
            kind: TokenKind::EndOfLine,
            text: "\n".to_string(),
            span: Span::from(self.pos..self.pos),
        });
        tokens
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    fn make_token(&self, kind: TokenKind, start: usize) -> Token {
        Token {
            kind,
            text: self.source[start..self.pos].to_string(),
            span: Span::from(start..self.pos),
        }
    }

    fn single(&mut self, kind: TokenKind) -> Token {
        let start = self.pos;
        self.pos += 1;
        self.make_token(kind, start)
    }

    /// `.+ .- .* ./`, or a float starting with a dot such as `.5`.
    fn read_dot(&mut self) -> Token {
        let kind = match self.peek_at(1) {
            Some(b'+') => TokenKind::ElemAdd,
            Some(b'-') => TokenKind::ElemSubtract,
            Some(b'*') => TokenKind::ElemMultiply,
            Some(b'/') => TokenKind::ElemDivide,
            Some(b'0'..=b'9') => return self.read_number(),
            _ => return self.read_unknown(),
        };
        let start = self.pos;
        self.pos += 2;
        self.make_token(kind, start)
    }

    fn read_number(&mut self) -> Token {
        let start = self.pos;
        let mut kind = TokenKind::Integer;

        self.skip_digits();

        // `1.*2` is `1 .* 2`, not `1. * 2`
        if self.peek() == Some(b'.')
            && !matches!(self.peek_at(1), Some(b'+' | b'-' | b'*' | b'/'))
        {
            kind = TokenKind::Float;
            self.pos += 1;
            self.skip_digits();
        }

        if matches!(self.peek(), Some(b'e' | b'E')) {
            let digits_at = match self.peek_at(1) {
                Some(b'+' | b'-') => 2,
                _ => 1,
            };
            if matches!(self.peek_at(digits_at), Some(b'0'..=b'9')) {
                kind = TokenKind::Float;
                self.pos += digits_at;
                self.skip_digits();
            }
        }

        self.make_token(kind, start)
    }

    fn skip_digits(&mut self) {
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.pos += 1;
        }
    }

    fn read_identifier(&mut self) -> Token {
        let start = self.pos;
        while matches!(
            self.peek(),
            Some(b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'_')
        ) {
            self.pos += 1;
        }
        let kind = if builtin::is_builtin(&self.source[start..self.pos]) {
            TokenKind::Builtin
        } else {
            TokenKind::Identifier
        };
        self.make_token(kind, start)
    }

    /// One whole (possibly multi-byte) character.
    fn read_unknown(&mut self) -> Token {
        let start = self.pos;
        let width = self.source[start..]
            .chars()
            .next()
            .map_or(1, char::len_utf8);
        self.pos += width;
        self.make_token(TokenKind::Unknown, start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(line: &str) -> Vec<TokenKind> {
        tokenize(line).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn assignment() {
        assert_eq!(
            kinds("a = 1\n"),
            vec![
                TokenKind::Identifier,
                TokenKind::Assign,
                TokenKind::Integer,
                TokenKind::EndOfLine,
            ]
        );
    }

    #[test]
    fn end_of_line_always_present() {
        assert_eq!(kinds(""), vec![TokenKind::EndOfLine]);
        assert_eq!(kinds("x"), vec![TokenKind::Identifier, TokenKind::EndOfLine]);
    }

    #[test]
    fn elementwise_operators() {
        assert_eq!(
            kinds("a.+b.-c.*d./e"),
            vec![
                TokenKind::Identifier,
                TokenKind::ElemAdd,
                TokenKind::Identifier,
                TokenKind::ElemSubtract,
                TokenKind::Identifier,
                TokenKind::ElemMultiply,
                TokenKind::Identifier,
                TokenKind::ElemDivide,
                TokenKind::Identifier,
                TokenKind::EndOfLine,
            ]
        );
    }

    #[test]
    fn number_then_elementwise_operator() {
        let tokens = tokenize("1.*2");
        assert_eq!(tokens[0].kind, TokenKind::Integer);
        assert_eq!(tokens[0].text, "1");
        assert_eq!(tokens[1].kind, TokenKind::ElemMultiply);
        assert_eq!(tokens[2].text, "2");
    }

    #[test]
    fn floats() {
        for text in ["1.5", ".5", "2.", "1e3", "2.5e-3", "3E+2"] {
            let tokens = tokenize(text);
            assert_eq!(tokens[0].kind, TokenKind::Float, "{text}");
            assert_eq!(tokens[0].text, text);
        }
    }

    #[test]
    fn exponent_without_digits_is_not_consumed() {
        let tokens = tokenize("2e");
        assert_eq!(tokens[0].kind, TokenKind::Integer);
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
        assert_eq!(tokens[1].text, "e");
    }

    #[test]
    fn transpose_after_bracket() {
        assert_eq!(
            kinds("[1 2]'"),
            vec![
                TokenKind::LeftBracket,
                TokenKind::Integer,
                TokenKind::Integer,
                TokenKind::RightBracket,
                TokenKind::Transpose,
                TokenKind::EndOfLine,
            ]
        );
    }

    #[test]
    fn builtin_names() {
        let tokens = tokenize("inv(x) + pi");
        assert_eq!(tokens[0].kind, TokenKind::Builtin);
        assert_eq!(tokens[2].kind, TokenKind::Identifier);
        assert_eq!(tokens[5].kind, TokenKind::Builtin);
    }

    #[test]
    fn unknown_characters_pass_through() {
        let tokens = tokenize("a # b");
        assert_eq!(tokens[1].kind, TokenKind::Unknown);
        assert_eq!(tokens[1].text, "#");
        let tokens = tokenize("é");
        assert_eq!(tokens[0].text, "é");
    }

    #[test]
    fn comment_is_elided() {
        assert_eq!(
            kinds("x % the answer"),
            vec![TokenKind::Identifier, TokenKind::EndOfLine]
        );
    }

    #[test]
    fn stops_at_first_newline() {
        assert_eq!(
            kinds("a\nb"),
            vec![TokenKind::Identifier, TokenKind::EndOfLine]
        );
    }

    #[test]
    fn spans() {
        let tokens = tokenize("ab  = 12");
        assert_eq!(tokens[0].span, Span { start: 0, end: 2 });
        assert_eq!(tokens[1].span.column(), 5);
        assert_eq!(tokens[2].span, Span { start: 6, end: 8 });
        assert_eq!(tokens[3].span, Span { start: 8, end: 8 });
    }
}
