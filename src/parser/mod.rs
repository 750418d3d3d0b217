//! Parser for converting tokens into an AST.
//!
//! Recursive descent over the token stream. A template is a sequence of
//! text runs and `${ ... }` expressions; an expression is a subject
//! (attribute reference or zero-argument call) followed by a chain of
//! `:function(args)` applications, where the subject becomes the first
//! argument of each chained call. Function names and arities resolve
//! against the builtin registry here, so bad calls fail at compile time.

use crate::builtins;
use crate::core::ast::ExprNode;
use crate::core::token::{Token, TokenKind};
use crate::error::ParseError;
use crate::value::{Decimal, Value};

/// Maximum nesting depth for `${ ... }` interpolations.
const MAX_PARSER_DEPTH: usize = 256;

/// Parse a token stream into a single template node.
pub fn parse(tokens: Vec<Token>) -> Result<ExprNode, ParseError> {
    if tokens.is_empty() {
        return Ok(ExprNode::Text(String::new()));
    }
    Parser::new(tokens).parse_template()
}

struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    fn parse_template(&mut self) -> Result<ExprNode, ParseError> {
        let mut nodes = Vec::new();
        loop {
            match &self.current().kind {
                TokenKind::Text(text) => {
                    let text = text.clone();
                    self.advance();
                    nodes.push(ExprNode::Text(text));
                }
                TokenKind::ExprStart => {
                    self.advance();
                    nodes.push(self.parse_expression(0)?);
                }
                TokenKind::Eof => break,
                _ => return Err(self.unexpected()),
            }
        }

        Ok(match nodes.len() {
            0 => ExprNode::Text(String::new()),
            1 => nodes.pop().expect("one node"),
            _ => ExprNode::Concat(nodes),
        })
    }

    /// Parse `subject (':' call)* '}'`; the opening `${` is already
    /// consumed.
    fn parse_expression(&mut self, depth: usize) -> Result<ExprNode, ParseError> {
        if depth > MAX_PARSER_DEPTH {
            return Err(ParseError::TooDeep {
                limit: MAX_PARSER_DEPTH,
            });
        }

        let mut node = self.parse_subject(depth)?;

        while self.match_token(&TokenKind::Colon) {
            let name = self.expect_identifier()?;
            let mut args = vec![node];
            self.parse_argument_list(depth, &mut args)?;
            let function = builtins::resolve(&name, args.len())?;
            node = ExprNode::Call { function, args };
        }

        self.expect(TokenKind::CloseBrace)?;
        Ok(node)
    }

    fn parse_subject(&mut self, depth: usize) -> Result<ExprNode, ParseError> {
        match &self.current().kind {
            TokenKind::Identifier(name) => {
                let name = name.clone();
                self.advance();
                if self.current().kind == TokenKind::LeftParen {
                    // Zero-subject calls: hostname(), random(), literal(x).
                    let mut args = Vec::new();
                    self.parse_argument_list(depth, &mut args)?;
                    let function = builtins::resolve(&name, args.len())?;
                    Ok(ExprNode::Call { function, args })
                } else {
                    Ok(ExprNode::AttrRef(name))
                }
            }
            TokenKind::QuotedString(name) => {
                let name = name.clone();
                self.advance();
                Ok(ExprNode::AttrRef(name))
            }
            _ => Err(self.unexpected()),
        }
    }

    fn parse_argument_list(
        &mut self,
        depth: usize,
        args: &mut Vec<ExprNode>,
    ) -> Result<(), ParseError> {
        self.expect(TokenKind::LeftParen)?;
        if self.current().kind != TokenKind::RightParen {
            loop {
                args.push(self.parse_argument(depth)?);
                if !self.match_token(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RightParen)?;
        Ok(())
    }

    fn parse_argument(&mut self, depth: usize) -> Result<ExprNode, ParseError> {
        match &self.current().kind {
            TokenKind::ExprStart => {
                self.advance();
                self.parse_expression(depth + 1)
            }
            TokenKind::QuotedString(s) => {
                let value = Value::String(s.clone());
                self.advance();
                Ok(ExprNode::Literal(value))
            }
            TokenKind::Number(text) => {
                let value = classify_number(text)?;
                self.advance();
                Ok(ExprNode::Literal(value))
            }
            _ => Err(self.unexpected()),
        }
    }

    // -- Token helpers ---------------------------------------------------

    fn current(&self) -> &Token {
        self.tokens
            .get(self.position)
            .unwrap_or_else(|| self.tokens.last().expect("token stream ends with Eof"))
    }

    fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }

    fn match_token(&mut self, expected: &TokenKind) -> bool {
        if &self.current().kind == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: TokenKind) -> Result<(), ParseError> {
        if self.current().kind == expected {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn expect_identifier(&mut self) -> Result<String, ParseError> {
        if let TokenKind::Identifier(name) = &self.current().kind {
            let name = name.clone();
            self.advance();
            Ok(name)
        } else {
            Err(self.unexpected())
        }
    }

    fn unexpected(&self) -> ParseError {
        let token = self.current();
        ParseError::UnexpectedToken {
            found: token.kind.to_string(),
            position: token.span.start as usize,
        }
    }
}

/// Classify a numeric literal: plain integers that fit become signed
/// integers; anything with a point or exponent (or too wide for i64)
/// becomes extended-precision.
fn classify_number(text: &str) -> Result<Value, ParseError> {
    let plain_integer = !text.contains(['.', 'e', 'E']);
    if plain_integer {
        if let Ok(v) = text.parse::<i64>() {
            return Ok(Value::SignedInt(v));
        }
    }
    Decimal::parse(text)
        .map(Value::Decimal)
        .ok_or_else(|| ParseError::InvalidNumber {
            literal: text.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::Function;
    use crate::lexer::Lexer;

    fn parse_str(input: &str) -> Result<ExprNode, ParseError> {
        parse(Lexer::new(input).tokenize()?)
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(
            parse_str("just text").unwrap(),
            ExprNode::Text("just text".into())
        );
        assert_eq!(parse_str("").unwrap(), ExprNode::Text(String::new()));
    }

    #[test]
    fn test_attribute_reference() {
        assert_eq!(
            parse_str("${attr_a}").unwrap(),
            ExprNode::AttrRef("attr_a".into())
        );
        assert_eq!(
            parse_str("${'weird name $'}").unwrap(),
            ExprNode::AttrRef("weird name $".into())
        );
    }

    #[test]
    fn test_mixed_template_concatenates() {
        let node = parse_str("a${x}b").unwrap();
        let ExprNode::Concat(parts) = node else {
            panic!("expected concat");
        };
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], ExprNode::Text("a".into()));
        assert_eq!(parts[1], ExprNode::AttrRef("x".into()));
        assert_eq!(parts[2], ExprNode::Text("b".into()));
    }

    #[test]
    fn test_chained_call_takes_subject_first() {
        let node = parse_str("${attr:toUpper()}").unwrap();
        assert_eq!(
            node,
            ExprNode::Call {
                function: Function::ToUpper,
                args: vec![ExprNode::AttrRef("attr".into())],
            }
        );
    }

    #[test]
    fn test_call_arguments() {
        let node = parse_str("${attr:substring(6, 8)}").unwrap();
        assert_eq!(
            node,
            ExprNode::Call {
                function: Function::Substring,
                args: vec![
                    ExprNode::AttrRef("attr".into()),
                    ExprNode::Literal(Value::SignedInt(6)),
                    ExprNode::Literal(Value::SignedInt(8)),
                ],
            }
        );
    }

    #[test]
    fn test_zero_subject_call() {
        let node = parse_str("${literal(10)}").unwrap();
        let ExprNode::Call {
            function: Function::Literal,
            args,
        } = node
        else {
            panic!("expected a literal call");
        };
        assert_eq!(args.len(), 1);
        assert_eq!(args[0].as_literal(), Some(&Value::SignedInt(10)));
    }

    #[test]
    fn test_number_classification() {
        assert_eq!(
            parse_str("${x:plus(13)}").unwrap(),
            ExprNode::Call {
                function: Function::Plus,
                args: vec![
                    ExprNode::AttrRef("x".into()),
                    ExprNode::Literal(Value::SignedInt(13)),
                ],
            }
        );
        let ExprNode::Call { args, .. } = parse_str("${x:plus(10e+6)}").unwrap() else {
            panic!("expected call");
        };
        assert!(matches!(args[1], ExprNode::Literal(Value::Decimal(_))));
        let ExprNode::Call { args, .. } = parse_str("${x:plus(-13.34567)}").unwrap() else {
            panic!("expected call");
        };
        assert!(matches!(args[1], ExprNode::Literal(Value::Decimal(_))));
    }

    #[test]
    fn test_nested_interpolation_argument() {
        let node = parse_str("${x:equals( ${y} )}").unwrap();
        assert_eq!(
            node,
            ExprNode::Call {
                function: Function::Equals,
                args: vec![ExprNode::AttrRef("x".into()), ExprNode::AttrRef("y".into())],
            }
        );
    }

    #[test]
    fn test_long_chain() {
        let node = parse_str("${literal(10):multiply(2):plus(1):multiply(2)}").unwrap();
        let ExprNode::Call {
            function: Function::Multiply,
            args,
        } = node
        else {
            panic!("expected outermost multiply");
        };
        assert_eq!(args.len(), 2);
        assert!(matches!(
            args[0],
            ExprNode::Call {
                function: Function::Plus,
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_function() {
        assert!(matches!(
            parse_str("${attr:frobnicate()}"),
            Err(ParseError::UnknownFunction { .. })
        ));
    }

    #[test]
    fn test_wrong_arity_includes_subject() {
        let err = parse_str("${attr:substringBefore()}").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Expression language function substringBefore called with 1 argument(s), but 2 are required"
        );
    }

    #[test]
    fn test_bare_identifier_argument_rejected() {
        assert!(matches!(
            parse_str("${x:equals(abc)}"),
            Err(ParseError::UnexpectedToken { .. })
        ));
    }

    #[test]
    fn test_missing_close_paren() {
        assert!(parse_str("${x:substring(1,}").is_err());
    }

    #[test]
    fn test_empty_expression_rejected() {
        assert!(parse_str("${}").is_err());
    }
}
