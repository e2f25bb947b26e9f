//! Strict parser for nested numeric literals such as `[[1, 2], [3, 4]]`.
//!
//! Only literals are accepted: numbers, `[...]` lists, `(...)` tuples,
//! quoted strings and bare identifiers. Nothing is ever evaluated.
//! Strings and identifiers parse successfully but are rejected later as
//! non-numeric elements.

use crate::utils::error::{PredictError, Result};

const MAX_DEPTH: usize = 32;

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    /// Quoted string or bare identifier (`True`, `None`, ...)
    Text(String),
    Seq(Vec<Literal>),
}

pub fn parse_literal(input: &str) -> Result<Literal> {
    Parser::new(input).parse()
}

struct Parser<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            depth: 0,
        }
    }

    fn parse(mut self) -> Result<Literal> {
        self.skip_ws();
        if self.at_end() {
            return Err(self.error("empty input"));
        }

        let value = self.parse_value()?;

        self.skip_ws();
        if !self.at_end() {
            let rest: String = self.src[self.pos..].chars().take(16).collect();
            return Err(self.error(format!("unexpected trailing input '{}'", rest)));
        }

        Ok(value)
    }

    fn parse_value(&mut self) -> Result<Literal> {
        self.skip_ws();
        match self.peek() {
            None => Err(self.error("unexpected end of input")),
            Some(b'[') => self.parse_sequence(b'[', b']'),
            Some(b'(') => self.parse_sequence(b'(', b')'),
            Some(b'\'') | Some(b'"') => self.parse_string(),
            Some(c) if c.is_ascii_digit() || matches!(c, b'+' | b'-' | b'.') => {
                self.parse_number()
            }
            Some(c) if c.is_ascii_alphabetic() || c == b'_' => Ok(self.parse_identifier()),
            Some(_) => {
                let c = self.current_char();
                Err(self.error(format!("unexpected character '{}'", c)))
            }
        }
    }

    fn parse_sequence(&mut self, open: u8, close: u8) -> Result<Literal> {
        let start = self.pos;
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(self.error(format!("nesting deeper than {} levels", MAX_DEPTH)));
        }
        self.pos += 1;

        let mut items = Vec::new();
        let mut saw_comma = false;

        loop {
            self.skip_ws();
            match self.peek() {
                None => return Err(unclosed(start, open)),
                Some(c) if c == close => {
                    self.pos += 1;
                    break;
                }
                Some(_) => {}
            }

            items.push(self.parse_value()?);

            self.skip_ws();
            match self.peek() {
                None => return Err(unclosed(start, open)),
                Some(b',') => {
                    self.pos += 1;
                    saw_comma = true;
                }
                Some(c) if c == close => {
                    self.pos += 1;
                    break;
                }
                Some(_) => {
                    let c = self.current_char();
                    return Err(self.error(format!(
                        "expected ',' or '{}', found '{}'",
                        close as char, c
                    )));
                }
            }
        }

        self.depth -= 1;

        // `(x)` 只是括號分組，`(x,)` 才是 tuple
        if open == b'(' && !saw_comma && items.len() == 1 {
            if let Some(inner) = items.pop() {
                return Ok(inner);
            }
        }

        Ok(Literal::Seq(items))
    }

    fn parse_number(&mut self) -> Result<Literal> {
        let start = self.pos;

        let mut negative = false;
        while let Some(sign @ (b'+' | b'-')) = self.peek() {
            if sign == b'-' {
                negative = !negative;
            }
            self.pos += 1;
            self.skip_ws();
        }

        let digits_start = self.pos;
        let mut is_float = false;
        let mut saw_digit = self.eat_digits();

        if self.peek() == Some(b'.') {
            is_float = true;
            self.pos += 1;
            saw_digit |= self.eat_digits();
        }

        if !saw_digit {
            return Err(PredictError::InputParseError {
                position: start,
                message: "expected a number".to_string(),
            });
        }

        if matches!(self.peek(), Some(b'e') | Some(b'E')) {
            let mark = self.pos;
            self.pos += 1;
            if matches!(self.peek(), Some(b'+') | Some(b'-')) {
                self.pos += 1;
            }
            if self.eat_digits() {
                is_float = true;
            } else {
                self.pos = mark;
            }
        }

        if let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == b'_' || c == b'.' {
                let c = self.current_char();
                return Err(self.error(format!("invalid character '{}' in number", c)));
            }
        }

        let text: String = self.src[digits_start..self.pos]
            .chars()
            .filter(|c| *c != '_')
            .collect();

        if is_float {
            let value: f64 = text.parse().map_err(|_| PredictError::InputParseError {
                position: start,
                message: format!("invalid float literal '{}'", text),
            })?;
            Ok(Literal::Float(if negative { -value } else { value }))
        } else {
            // `00` 合法，`01` 不合法
            if text.starts_with('0') && text.bytes().any(|b| b != b'0') {
                return Err(PredictError::InputParseError {
                    position: digits_start,
                    message: format!("leading zeros are not allowed in '{}'", text),
                });
            }
            let magnitude: i128 = text.parse().map_err(|_| PredictError::OverflowError {
                message: format!("integer literal '{}' does not fit in 64 bits", text),
            })?;
            let signed = if negative { -magnitude } else { magnitude };
            let value = i64::try_from(signed).map_err(|_| PredictError::OverflowError {
                message: format!("integer literal '{}' does not fit in 64 bits", signed),
            })?;
            Ok(Literal::Int(value))
        }
    }

    fn parse_string(&mut self) -> Result<Literal> {
        let start = self.pos;
        let quote = self.bytes[self.pos];
        self.pos += 1;
        let content_start = self.pos;

        while let Some(c) = self.peek() {
            match c {
                b'\\' => self.pos += 2,
                c if c == quote => {
                    let content = self.src[content_start..self.pos].to_string();
                    self.pos += 1;
                    return Ok(Literal::Text(content));
                }
                _ => self.pos += 1,
            }
        }

        Err(PredictError::InputParseError {
            position: start,
            message: "unterminated string literal".to_string(),
        })
    }

    fn parse_identifier(&mut self) -> Literal {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == b'_' {
                self.pos += 1;
            } else {
                break;
            }
        }
        Literal::Text(self.src[start..self.pos].to_string())
    }

    /// Consumes a digit run. `_` is only taken between two digits.
    fn eat_digits(&mut self) -> bool {
        let start = self.pos;
        while let Some(c) = self.peek() {
            let separator = c == b'_'
                && self.pos > start
                && self.bytes.get(self.pos + 1).is_some_and(u8::is_ascii_digit);
            if c.is_ascii_digit() || separator {
                self.pos += 1;
            } else {
                break;
            }
        }
        self.pos > start
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_ascii_whitespace() {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn current_char(&self) -> char {
        self.src
            .get(self.pos..)
            .and_then(|rest| rest.chars().next())
            .unwrap_or('?')
    }

    fn error(&self, message: impl Into<String>) -> PredictError {
        PredictError::InputParseError {
            position: self.pos,
            message: message.into(),
        }
    }
}

fn unclosed(position: usize, open: u8) -> PredictError {
    PredictError::InputParseError {
        position,
        message: format!("unclosed '{}'", open as char),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(values: &[i64]) -> Literal {
        Literal::Seq(values.iter().map(|v| Literal::Int(*v)).collect())
    }

    #[test]
    fn test_parse_default_matrix() {
        let literal = parse_literal("[[1, 2], [3, 4]]").unwrap();
        assert_eq!(literal, Literal::Seq(vec![ints(&[1, 2]), ints(&[3, 4])]));
    }

    #[test]
    fn test_parse_numbers() {
        assert_eq!(parse_literal("42").unwrap(), Literal::Int(42));
        assert_eq!(parse_literal("-7").unwrap(), Literal::Int(-7));
        assert_eq!(parse_literal("- -3").unwrap(), Literal::Int(3));
        assert_eq!(parse_literal("1_000").unwrap(), Literal::Int(1000));
        assert_eq!(parse_literal("2.5").unwrap(), Literal::Float(2.5));
        assert_eq!(parse_literal(".5").unwrap(), Literal::Float(0.5));
        assert_eq!(parse_literal("3.").unwrap(), Literal::Float(3.0));
        assert_eq!(parse_literal("1e3").unwrap(), Literal::Float(1000.0));
        assert_eq!(parse_literal("-2.5E-1").unwrap(), Literal::Float(-0.25));
    }

    #[test]
    fn test_digit_separators_and_leading_zeros() {
        assert_eq!(parse_literal("1_000_000").unwrap(), Literal::Int(1_000_000));
        assert_eq!(parse_literal("1_0.2_5").unwrap(), Literal::Float(10.25));
        assert_eq!(parse_literal("00").unwrap(), Literal::Int(0));
        assert_eq!(parse_literal("0").unwrap(), Literal::Int(0));
        assert_eq!(parse_literal("01.5").unwrap(), Literal::Float(1.5));

        for bad in ["1_", "1__0", "1_.5", "1._5", "01", "[1, 007]", "-01"] {
            assert!(
                matches!(parse_literal(bad), Err(PredictError::InputParseError { .. })),
                "accepted {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_parse_tuples_and_grouping() {
        assert_eq!(
            parse_literal("((1, 2), (3, 4))").unwrap(),
            Literal::Seq(vec![ints(&[1, 2]), ints(&[3, 4])])
        );
        assert_eq!(parse_literal("(5)").unwrap(), Literal::Int(5));
        assert_eq!(parse_literal("(5,)").unwrap(), ints(&[5]));
        assert_eq!(parse_literal("[1, 2,]").unwrap(), ints(&[1, 2]));
        assert_eq!(parse_literal("[]").unwrap(), Literal::Seq(vec![]));
    }

    #[test]
    fn test_parse_text_leaves() {
        assert_eq!(
            parse_literal("['a', None]").unwrap(),
            Literal::Seq(vec![
                Literal::Text("a".to_string()),
                Literal::Text("None".to_string())
            ])
        );
    }

    #[test]
    fn test_rejects_expressions() {
        assert!(matches!(
            parse_literal("not a matrix"),
            Err(PredictError::InputParseError { .. })
        ));
        assert!(parse_literal("__import__('os').system('ls')").is_err());
        assert!(parse_literal("[1 + 2]").is_err());
        assert!(parse_literal("[[1, 2], [3, 4]").is_err());
        assert!(parse_literal("[1, 2]]").is_err());
        assert!(parse_literal("12abc").is_err());
        assert!(parse_literal("").is_err());
        assert!(parse_literal("   ").is_err());
        assert!(parse_literal("'open").is_err());
    }

    #[test]
    fn test_error_position_points_at_offender() {
        match parse_literal("[1, 2; 3]") {
            Err(PredictError::InputParseError { position, .. }) => assert_eq!(position, 5),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_integer_overflow_is_reported() {
        assert!(matches!(
            parse_literal("99999999999999999999"),
            Err(PredictError::OverflowError { .. })
        ));
        assert_eq!(
            parse_literal("-9223372036854775808").unwrap(),
            Literal::Int(i64::MIN)
        );
    }

    #[test]
    fn test_nesting_limit() {
        let deep = format!("{}1{}", "[".repeat(40), "]".repeat(40));
        assert!(matches!(
            parse_literal(&deep),
            Err(PredictError::InputParseError { .. })
        ));
    }
}
