//! Recursive descent parser producing a [`LocationPath`].
//!
//! ```text
//! Path      ::= '/' RelPath? | '//' RelPath | RelPath
//! RelPath   ::= Step (('/' | '//') Step)*
//! Step      ::= '.' | '..' | (AxisName '::')? NodeTest Predicate*
//! NodeTest  ::= Name | '*' | 'node' '(' ')'
//! Predicate ::= '[' OrExpr ']'
//! OrExpr    ::= AndExpr ('or' AndExpr)*
//! AndExpr   ::= CmpExpr ('and' CmpExpr)*
//! CmpExpr   ::= Primary (('=' | '!=') Primary)?
//! Primary   ::= Number | Literal | '@' Name | '(' OrExpr ')' | Name '(' Args? ')'
//! ```

use crate::XPathError;
use crate::ast::{Axis, Expr, Function, LocationPath, NodeTest, Step};
use crate::lexer::{Spanned, Token, tokenize};

/// Parse an XPath location path.
///
/// # Errors
/// Returns [`XPathError`] if the input is empty or outside the supported grammar.
pub fn parse(input: &str) -> Result<LocationPath, XPathError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(XPathError::new("empty XPath expression", 0));
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        end: input.len(),
    };
    let path = parser.parse_path()?;
    if let Some(spanned) = parser.tokens.get(parser.pos) {
        return Err(XPathError::new(
            &format!("unexpected token '{}' after expression", spanned.token),
            spanned.offset,
        ));
    }
    Ok(path)
}

struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
    /// Offset reported for errors at end of input.
    end: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|spanned| &spanned.token)
    }

    fn peek_at(&self, ahead: usize) -> Option<&Token> {
        self.tokens.get(self.pos + ahead).map(|spanned| &spanned.token)
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        if matches!(self.peek(), Some(Token::Name(name)) if name == keyword) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &Token) -> Result<(), XPathError> {
        if self.eat(token) {
            Ok(())
        } else {
            Err(self.error(&format!("expected '{token}', found {}", self.describe_current())))
        }
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.peek().cloned()?;
        self.pos += 1;
        Some(token)
    }

    fn describe_current(&self) -> String {
        self.peek()
            .map_or_else(|| "end of expression".to_owned(), |token| format!("'{token}'"))
    }

    fn error(&self, message: &str) -> XPathError {
        let offset = self
            .tokens
            .get(self.pos)
            .map_or(self.end, |spanned| spanned.offset);
        XPathError::new(message, offset)
    }

    fn parse_path(&mut self) -> Result<LocationPath, XPathError> {
        if self.eat(&Token::DoubleSlash) {
            let mut steps = vec![Step::descendant_or_self()];
            self.parse_relative(&mut steps)?;
            return Ok(LocationPath { absolute: true, steps });
        }
        if self.eat(&Token::Slash) {
            let mut steps = Vec::new();
            if self.peek().is_some() {
                self.parse_relative(&mut steps)?;
            }
            return Ok(LocationPath { absolute: true, steps });
        }
        let mut steps = Vec::new();
        self.parse_relative(&mut steps)?;
        Ok(LocationPath {
            absolute: false,
            steps,
        })
    }

    fn parse_relative(&mut self, steps: &mut Vec<Step>) -> Result<(), XPathError> {
        steps.push(self.parse_step()?);
        loop {
            if self.eat(&Token::DoubleSlash) {
                steps.push(Step::descendant_or_self());
            } else if !self.eat(&Token::Slash) {
                return Ok(());
            }
            steps.push(self.parse_step()?);
        }
    }

    fn parse_step(&mut self) -> Result<Step, XPathError> {
        if self.eat(&Token::Dot) {
            return Ok(Step::new(Axis::SelfNode, NodeTest::AnyNode));
        }
        if self.eat(&Token::DotDot) {
            return Ok(Step::new(Axis::Parent, NodeTest::AnyNode));
        }

        let axis = self.parse_axis()?;
        let test = match self.advance() {
            Some(Token::Star) => NodeTest::Wildcard,
            Some(Token::Name(name)) if name == "node" && self.peek() == Some(&Token::LParen) => {
                self.expect(&Token::LParen)?;
                self.expect(&Token::RParen)?;
                NodeTest::AnyNode
            }
            Some(Token::Name(name)) => {
                if self.peek() == Some(&Token::LParen) {
                    return Err(self.error(&format!("node test '{name}()' is not supported")));
                }
                NodeTest::Name(name)
            }
            Some(Token::At) => return Err(self.error("attribute steps are not supported")),
            other => {
                if other.is_some() {
                    self.pos -= 1;
                }
                return Err(self.error(&format!("expected a step, found {}", self.describe_current())));
            }
        };

        let mut step = Step::new(axis, test);
        while self.eat(&Token::LBracket) {
            step.predicates.push(self.parse_or()?);
            self.expect(&Token::RBracket)?;
        }
        Ok(step)
    }

    fn parse_axis(&mut self) -> Result<Axis, XPathError> {
        let Some(Token::Name(name)) = self.peek() else {
            return Ok(Axis::Child);
        };
        if self.peek_at(1) != Some(&Token::ColonColon) {
            return Ok(Axis::Child);
        }
        let axis = match name.as_str() {
            "child" => Axis::Child,
            "descendant" => Axis::Descendant,
            "descendant-or-self" => Axis::DescendantOrSelf,
            "self" => Axis::SelfNode,
            "parent" => Axis::Parent,
            other => return Err(self.error(&format!("axis '{other}' is not supported"))),
        };
        self.pos += 2;
        Ok(axis)
    }

    fn parse_or(&mut self) -> Result<Expr, XPathError> {
        let mut left = self.parse_and()?;
        while self.eat_keyword("or") {
            let right = self.parse_and()?;
            left = Expr::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, XPathError> {
        let mut left = self.parse_compare()?;
        while self.eat_keyword("and") {
            let right = self.parse_compare()?;
            left = Expr::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_compare(&mut self) -> Result<Expr, XPathError> {
        let left = self.parse_primary()?;
        let negated = if self.eat(&Token::Equals) {
            false
        } else if self.eat(&Token::NotEquals) {
            true
        } else {
            return Ok(left);
        };
        let right = self.parse_primary()?;
        Ok(Expr::Compare {
            negated,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    fn parse_primary(&mut self) -> Result<Expr, XPathError> {
        match self.advance() {
            Some(Token::Number(number)) => Ok(Expr::Number(number)),
            Some(Token::Literal(text)) => Ok(Expr::Literal(text)),
            Some(Token::At) => match self.advance() {
                Some(Token::Name(name)) => Ok(Expr::Attribute(name.to_ascii_lowercase())),
                _ => {
                    self.pos -= 1;
                    Err(self.error("expected attribute name after '@'"))
                }
            },
            Some(Token::LParen) => {
                let inner = self.parse_or()?;
                self.expect(&Token::RParen)?;
                Ok(inner)
            }
            Some(Token::Name(name)) if self.peek() == Some(&Token::LParen) => self.parse_call(&name),
            other => {
                if other.is_some() {
                    self.pos -= 1;
                }
                Err(self.error(&format!("expected an expression, found {}", self.describe_current())))
            }
        }
    }

    fn parse_call(&mut self, name: &str) -> Result<Expr, XPathError> {
        let call_pos = self.pos.saturating_sub(1);
        let function = Function::lookup(name).ok_or_else(|| {
            let offset = self.tokens.get(call_pos).map_or(self.end, |spanned| spanned.offset);
            XPathError::new(&format!("unknown function '{name}'"), offset)
        })?;
        self.expect(&Token::LParen)?;

        let mut args = Vec::new();
        if !self.eat(&Token::RParen) {
            loop {
                args.push(self.parse_or()?);
                if self.eat(&Token::RParen) {
                    break;
                }
                self.expect(&Token::Comma)?;
            }
        }

        let (min, max) = function.arity();
        if args.len() < min || args.len() > max {
            let offset = self.tokens.get(call_pos).map_or(self.end, |spanned| spanned.offset);
            return Err(XPathError::new(
                &format!("{name}() takes {min}..={max} arguments, got {}", args.len()),
                offset,
            ));
        }
        Ok(Expr::Call { function, args })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_slash_expands_to_descendant_or_self() {
        let path = parse("//DIV/UL/LI[2]").unwrap();
        assert!(path.absolute);
        assert_eq!(path.steps.len(), 4);
        assert_eq!(path.steps[0], Step::descendant_or_self());
        assert_eq!(path.steps[3].test, NodeTest::Name("LI".to_owned()));
        assert_eq!(path.steps[3].predicates[0], Expr::Number(2.0));
    }

    #[test]
    fn and_chains_are_left_associative() {
        let path = parse("//A[contains(@class, 'x') and contains(@class, 'y') and @id = 'z']").unwrap();
        let Expr::And(left, right) = &path.steps[1].predicates[0] else {
            panic!("expected and");
        };
        assert!(matches!(**left, Expr::And(..)));
        assert!(matches!(**right, Expr::Compare { negated: false, .. }));
    }

    #[test]
    fn relative_paths_start_at_context() {
        let path = parse(".//LI").unwrap();
        assert!(!path.absolute);
        assert_eq!(path.steps[0].axis, Axis::SelfNode);
        assert_eq!(path.steps[1], Step::descendant_or_self());
    }

    #[test]
    fn rejects_unknown_functions_and_bad_arity() {
        assert!(parse("//A[lower-case(@id)]").is_err());
        assert!(parse("//A[contains(@id)]").is_err());
        assert!(parse("//A[").is_err());
        assert!(parse("").is_err());
        assert!(parse("//A]").is_err());
    }

    #[test]
    fn explicit_axes() {
        let path = parse("/descendant::LI/parent::node()").unwrap();
        assert_eq!(path.steps[0].axis, Axis::Descendant);
        assert_eq!(path.steps[1].axis, Axis::Parent);
        assert_eq!(path.steps[1].test, NodeTest::AnyNode);
    }
}
