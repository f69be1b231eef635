//! Tokenizer for XPath location paths.

use core::fmt;

use crate::XPathError;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Slash,
    DoubleSlash,
    LBracket,
    RBracket,
    LParen,
    RParen,
    At,
    Comma,
    Dot,
    DotDot,
    Star,
    Equals,
    NotEquals,
    ColonColon,
    Literal(String),
    Number(f64),
    Name(String),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Slash => f.write_str("/"),
            Self::DoubleSlash => f.write_str("//"),
            Self::LBracket => f.write_str("["),
            Self::RBracket => f.write_str("]"),
            Self::LParen => f.write_str("("),
            Self::RParen => f.write_str(")"),
            Self::At => f.write_str("@"),
            Self::Comma => f.write_str(","),
            Self::Dot => f.write_str("."),
            Self::DotDot => f.write_str(".."),
            Self::Star => f.write_str("*"),
            Self::Equals => f.write_str("="),
            Self::NotEquals => f.write_str("!="),
            Self::ColonColon => f.write_str("::"),
            Self::Literal(text) => write!(f, "'{text}'"),
            Self::Number(number) => write!(f, "{number}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

/// A token with the byte offset it started at.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub offset: usize,
}

fn is_name_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_'
}

fn is_name_char(ch: char) -> bool {
    ch.is_alphanumeric() || matches!(ch, '_' | '-' | '.')
}

/// Split `input` into tokens.
///
/// # Errors
/// Returns an error on unterminated literals and characters outside the grammar.
pub fn tokenize(input: &str) -> Result<Vec<Spanned>, XPathError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some((offset, ch)) = chars.next() {
        let token = match ch {
            ' ' | '\t' | '\n' | '\r' => continue,
            '/' => {
                if chars.next_if(|(_, next)| *next == '/').is_some() {
                    Token::DoubleSlash
                } else {
                    Token::Slash
                }
            }
            '[' => Token::LBracket,
            ']' => Token::RBracket,
            '(' => Token::LParen,
            ')' => Token::RParen,
            '@' => Token::At,
            ',' => Token::Comma,
            '*' => Token::Star,
            '=' => Token::Equals,
            '!' => {
                if chars.next_if(|(_, next)| *next == '=').is_none() {
                    return Err(XPathError::new("expected '=' after '!'", offset));
                }
                Token::NotEquals
            }
            ':' => {
                if chars.next_if(|(_, next)| *next == ':').is_none() {
                    return Err(XPathError::new("namespace prefixes are not supported", offset));
                }
                Token::ColonColon
            }
            '\'' | '"' => {
                let mut text = String::new();
                let mut closed = false;
                for (_, next) in chars.by_ref() {
                    if next == ch {
                        closed = true;
                        break;
                    }
                    text.push(next);
                }
                if !closed {
                    return Err(XPathError::new("unterminated string literal", offset));
                }
                Token::Literal(text)
            }
            '.' => {
                if chars.next_if(|(_, next)| *next == '.').is_some() {
                    Token::DotDot
                } else if chars.peek().is_some_and(|(_, next)| next.is_ascii_digit()) {
                    let mut digits = String::from("0.");
                    while let Some((_, digit)) = chars.next_if(|(_, next)| next.is_ascii_digit()) {
                        digits.push(digit);
                    }
                    Token::Number(parse_number(&digits, offset)?)
                } else {
                    Token::Dot
                }
            }
            digit if digit.is_ascii_digit() => {
                let mut digits = String::from(digit);
                while let Some((_, next)) = chars.next_if(|(_, next)| next.is_ascii_digit() || *next == '.') {
                    digits.push(next);
                }
                Token::Number(parse_number(&digits, offset)?)
            }
            start if is_name_start(start) => {
                let mut name = String::from(start);
                while let Some((_, next)) = chars.next_if(|(_, next)| is_name_char(*next)) {
                    name.push(next);
                }
                Token::Name(name)
            }
            other => {
                return Err(XPathError::new(&format!("unexpected character '{other}'"), offset));
            }
        };
        tokens.push(Spanned { token, offset });
    }

    Ok(tokens)
}

fn parse_number(digits: &str, offset: usize) -> Result<f64, XPathError> {
    digits
        .parse::<f64>()
        .map_err(|_| XPathError::new(&format!("invalid number '{digits}'"), offset))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<Token> {
        tokenize(input).unwrap().into_iter().map(|spanned| spanned.token).collect()
    }

    #[test]
    fn tokenizes_rendered_query() {
        assert_eq!(
            kinds("//DIV/LI[2][contains(@class, 'a b')]"),
            vec![
                Token::DoubleSlash,
                Token::Name("DIV".to_owned()),
                Token::Slash,
                Token::Name("LI".to_owned()),
                Token::LBracket,
                Token::Number(2.0),
                Token::RBracket,
                Token::LBracket,
                Token::Name("contains".to_owned()),
                Token::LParen,
                Token::At,
                Token::Name("class".to_owned()),
                Token::Comma,
                Token::Literal("a b".to_owned()),
                Token::RParen,
                Token::RBracket,
            ]
        );
    }

    #[test]
    fn hyphenated_names_and_relative_prefix() {
        assert_eq!(
            kinds(".//x-item[@data-id != \"it's\"]"),
            vec![
                Token::Dot,
                Token::DoubleSlash,
                Token::Name("x-item".to_owned()),
                Token::LBracket,
                Token::At,
                Token::Name("data-id".to_owned()),
                Token::NotEquals,
                Token::Literal("it's".to_owned()),
                Token::RBracket,
            ]
        );
    }

    #[test]
    fn unterminated_literal_reports_offset() {
        let err = tokenize("//A[@x='oops]").unwrap_err();
        assert_eq!(err.position, 7);
    }
}
