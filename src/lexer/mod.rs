//! Lexer for template strings.
//!
//! Operates in two modes. In text mode every byte is literal except `$`:
//! `$$` collapses to a single `$`, `${` switches into expression mode, and
//! a bare `$` followed by anything else stays literal. Expression mode
//! skips unquoted whitespace and emits identifiers, numeric literals,
//! quoted strings, and punctuation until the `}` that closes the current
//! interpolation; nested `${` re-enters expression mode with a deeper
//! nesting level, so interpolations may appear inside argument lists.

use crate::core::span::Span;
use crate::core::token::{Token, TokenKind};
use crate::error::ParseError;

/// Lexer over a template string.
pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
    /// Current `${ ... }` nesting depth; zero means text mode.
    depth: usize,
    /// Byte offsets of the currently open `${`, innermost last.
    open_positions: Vec<usize>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer from a template string.
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            position: 0,
            depth: 0,
            open_positions: Vec::new(),
        }
    }

    /// Tokenize the entire template.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn next_token(&mut self) -> Result<Token, ParseError> {
        if self.depth == 0 {
            self.next_text_token()
        } else {
            self.next_expression_token()
        }
    }

    // -- Text mode -------------------------------------------------------

    fn next_text_token(&mut self) -> Result<Token, ParseError> {
        let start = self.position;
        let mut text = String::new();

        loop {
            let Some(ch) = self.current_char() else {
                return if text.is_empty() {
                    Ok(Token::new(TokenKind::Eof, Span::new(start, start)))
                } else {
                    Ok(Token::new(
                        TokenKind::Text(text),
                        Span::new(start, self.position),
                    ))
                };
            };

            if ch == '$' {
                match self.peek() {
                    Some('$') => {
                        self.advance();
                        self.advance();
                        text.push('$');
                        continue;
                    }
                    Some('{') => {
                        if !text.is_empty() {
                            return Ok(Token::new(
                                TokenKind::Text(text),
                                Span::new(start, self.position),
                            ));
                        }
                        let open = self.position;
                        self.advance();
                        self.advance();
                        self.depth = 1;
                        self.open_positions.push(open);
                        return Ok(Token::new(
                            TokenKind::ExprStart,
                            Span::new(open, self.position),
                        ));
                    }
                    _ => {}
                }
            }

            text.push(ch);
            self.advance();
        }
    }

    // -- Expression mode -------------------------------------------------

    fn next_expression_token(&mut self) -> Result<Token, ParseError> {
        self.skip_whitespace();

        let start = self.position;
        let Some(ch) = self.current_char() else {
            let position = self.open_positions.last().copied().unwrap_or(0);
            return Err(ParseError::UnmatchedExpression { position });
        };

        let token = match ch {
            '}' => {
                self.advance();
                self.depth -= 1;
                self.open_positions.pop();
                Token::new(TokenKind::CloseBrace, Span::new(start, self.position))
            }
            ':' => {
                self.advance();
                Token::new(TokenKind::Colon, Span::new(start, self.position))
            }
            ',' => {
                self.advance();
                Token::new(TokenKind::Comma, Span::new(start, self.position))
            }
            '(' => {
                self.advance();
                Token::new(TokenKind::LeftParen, Span::new(start, self.position))
            }
            ')' => {
                self.advance();
                Token::new(TokenKind::RightParen, Span::new(start, self.position))
            }
            '$' if self.peek() == Some('{') => {
                self.advance();
                self.advance();
                self.depth += 1;
                self.open_positions.push(start);
                Token::new(TokenKind::ExprStart, Span::new(start, self.position))
            }
            '\'' | '"' => self.read_string(ch)?,
            '-' if matches!(self.peek(), Some(c) if c.is_ascii_digit() || c == '.') => {
                self.read_number()?
            }
            '.' if matches!(self.peek(), Some(c) if c.is_ascii_digit()) => self.read_number()?,
            c if c.is_ascii_digit() => self.read_number()?,
            c if c.is_ascii_alphabetic() || c == '_' => self.read_identifier(),
            c => {
                return Err(ParseError::UnexpectedCharacter {
                    character: c,
                    position: start,
                });
            }
        };

        Ok(token)
    }

    /// Read a quoted string, processing escape sequences. Quoted strings
    /// may span newlines.
    fn read_string(&mut self, quote: char) -> Result<Token, ParseError> {
        let start = self.position;
        self.advance();

        let mut value = String::new();
        while let Some(ch) = self.current_char() {
            if ch == quote {
                self.advance();
                return Ok(Token::new(
                    TokenKind::QuotedString(value),
                    Span::new(start, self.position),
                ));
            }
            if ch == '\\' {
                self.advance();
                let Some(escaped) = self.current_char() else {
                    break;
                };
                value.push(match escaped {
                    'n' => '\n',
                    'r' => '\r',
                    't' => '\t',
                    '\\' => '\\',
                    '\'' => '\'',
                    '"' => '"',
                    other => other,
                });
                self.advance();
                continue;
            }
            value.push(ch);
            self.advance();
        }

        Err(ParseError::UnterminatedString { position: start })
    }

    /// Read a numeric literal: optional `-`, digits with an optional
    /// fractional part, optional exponent. Validity beyond this shape is
    /// checked when the parser classifies the literal.
    fn read_number(&mut self) -> Result<Token, ParseError> {
        let start = self.position;

        if self.current_char() == Some('-') {
            self.advance();
        }
        while matches!(self.current_char(), Some(c) if c.is_ascii_digit()) {
            self.advance();
        }
        if self.current_char() == Some('.')
            && matches!(self.peek(), Some(c) if c.is_ascii_digit())
        {
            self.advance();
            while matches!(self.current_char(), Some(c) if c.is_ascii_digit()) {
                self.advance();
            }
        }
        if matches!(self.current_char(), Some('e') | Some('E')) {
            self.advance();
            if matches!(self.current_char(), Some('+') | Some('-')) {
                self.advance();
            }
            if !matches!(self.current_char(), Some(c) if c.is_ascii_digit()) {
                return Err(ParseError::InvalidNumber {
                    literal: self.input[start..self.position].to_string(),
                });
            }
            while matches!(self.current_char(), Some(c) if c.is_ascii_digit()) {
                self.advance();
            }
        }

        Ok(Token::new(
            TokenKind::Number(self.input[start..self.position].to_string()),
            Span::new(start, self.position),
        ))
    }

    fn read_identifier(&mut self) -> Token {
        let start = self.position;
        while matches!(self.current_char(), Some(c) if c.is_ascii_alphanumeric() || c == '_') {
            self.advance();
        }
        Token::new(
            TokenKind::Identifier(self.input[start..self.position].to_string()),
            Span::new(start, self.position),
        )
    }

    // -- Cursor helpers --------------------------------------------------

    fn current_char(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn peek(&self) -> Option<char> {
        let current = self.current_char()?;
        self.input[self.position + current.len_utf8()..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(ch) = self.current_char() {
            self.position += ch.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.current_char(), Some(c) if c.is_ascii_whitespace()) {
            self.advance();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Lexer::new(input)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(
            kinds("just text"),
            vec![TokenKind::Text("just text".into()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_escaped_dollar() {
        assert_eq!(
            kinds("te$$xt"),
            vec![TokenKind::Text("te$xt".into()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_bare_dollar_is_literal() {
        assert_eq!(
            kinds("a$b$"),
            vec![TokenKind::Text("a$b$".into()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_simple_expression() {
        assert_eq!(
            kinds("a${attr}b"),
            vec![
                TokenKind::Text("a".into()),
                TokenKind::ExprStart,
                TokenKind::Identifier("attr".into()),
                TokenKind::CloseBrace,
                TokenKind::Text("b".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_whitespace_in_expression() {
        assert_eq!(
            kinds("${\n\tattr_a \r}"),
            vec![
                TokenKind::ExprStart,
                TokenKind::Identifier("attr_a".into()),
                TokenKind::CloseBrace,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_chained_call_tokens() {
        assert_eq!(
            kinds("${attr:substring(6, 8)}"),
            vec![
                TokenKind::ExprStart,
                TokenKind::Identifier("attr".into()),
                TokenKind::Colon,
                TokenKind::Identifier("substring".into()),
                TokenKind::LeftParen,
                TokenKind::Number("6".into()),
                TokenKind::Comma,
                TokenKind::Number("8".into()),
                TokenKind::RightParen,
                TokenKind::CloseBrace,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_number_forms() {
        assert_eq!(
            kinds("${x:plus(-13.34567)}")[5],
            TokenKind::Number("-13.34567".into())
        );
        assert_eq!(
            kinds("${x:plus(10e+6)}")[5],
            TokenKind::Number("10e+6".into())
        );
    }

    #[test]
    fn test_quoted_strings() {
        assert_eq!(
            kinds("${'a b'}")[1],
            TokenKind::QuotedString("a b".into())
        );
        assert_eq!(
            kinds(r#"${"it\'s"}"#)[1],
            TokenKind::QuotedString("it's".into())
        );
        assert_eq!(
            kinds(r#"${x:prepend('a\nb')}"#)[5],
            TokenKind::QuotedString("a\nb".into())
        );
    }

    #[test]
    fn test_nested_expression() {
        assert_eq!(
            kinds("${x:equals(${y})}"),
            vec![
                TokenKind::ExprStart,
                TokenKind::Identifier("x".into()),
                TokenKind::Colon,
                TokenKind::Identifier("equals".into()),
                TokenKind::LeftParen,
                TokenKind::ExprStart,
                TokenKind::Identifier("y".into()),
                TokenKind::CloseBrace,
                TokenKind::RightParen,
                TokenKind::CloseBrace,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_close_brace_in_text_is_literal() {
        assert_eq!(
            kinds("${a}}()"),
            vec![
                TokenKind::ExprStart,
                TokenKind::Identifier("a".into()),
                TokenKind::CloseBrace,
                TokenKind::Text("}()".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_utf8_text() {
        assert_eq!(
            kinds("¥£€${a}₹"),
            vec![
                TokenKind::Text("¥£€".into()),
                TokenKind::ExprStart,
                TokenKind::Identifier("a".into()),
                TokenKind::CloseBrace,
                TokenKind::Text("₹".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_unmatched_expression() {
        assert!(matches!(
            Lexer::new("text${attr").tokenize(),
            Err(ParseError::UnmatchedExpression { position: 4 })
        ));
    }

    #[test]
    fn test_unterminated_string() {
        assert!(matches!(
            Lexer::new("${'abc}").tokenize(),
            Err(ParseError::UnterminatedString { .. })
        ));
    }

    #[test]
    fn test_bad_exponent() {
        assert!(matches!(
            Lexer::new("${x:plus(1e)}").tokenize(),
            Err(ParseError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn test_unexpected_character() {
        assert!(matches!(
            Lexer::new("${a;b}").tokenize(),
            Err(ParseError::UnexpectedCharacter { character: ';', .. })
        ));
    }
}
