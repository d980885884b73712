//! Lexer and recursive-descent parser for the selector grammar.

use std::collections::BTreeSet;

use crate::errors::ParseError;
use crate::requirement::{Operator, Requirement};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    Identifier(String),
    In,
    NotIn,
    Equals,
    DoubleEquals,
    NotEquals,
    DoesNotExist,
    GreaterThan,
    LessThan,
    OpenParen,
    CloseParen,
    Comma,
    EndOfInput,
}

impl Token {
    fn literal(&self) -> &str {
        match self {
            Token::Identifier(text) => text,
            Token::In => "in",
            Token::NotIn => "notin",
            Token::Equals => "=",
            Token::DoubleEquals => "==",
            Token::NotEquals => "!=",
            Token::DoesNotExist => "!",
            Token::GreaterThan => ">",
            Token::LessThan => "<",
            Token::OpenParen => "(",
            Token::CloseParen => ")",
            Token::Comma => ",",
            Token::EndOfInput => "end of input",
        }
    }
}

/// A token together with the byte offset it starts at.
#[derive(Debug, Clone)]
struct ScannedItem {
    token: Token,
    position: usize,
}

fn is_special(ch: char) -> bool {
    matches!(ch, '=' | '!' | '(' | ')' | ',' | '>' | '<')
}

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn scan(mut self) -> Vec<ScannedItem> {
        let mut items = Vec::new();
        loop {
            let item = self.next_item();
            let done = item.token == Token::EndOfInput;
            items.push(item);
            if done {
                return items;
            }
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self, ch: char) {
        self.pos += ch.len_utf8();
    }

    fn next_item(&mut self) -> ScannedItem {
        while let Some(ch) = self.peek_char() {
            if !ch.is_whitespace() {
                break;
            }
            self.bump(ch);
        }
        let start = self.pos;
        let Some(ch) = self.peek_char() else {
            return ScannedItem {
                token: Token::EndOfInput,
                position: start,
            };
        };
        let token = match ch {
            '(' => {
                self.bump(ch);
                Token::OpenParen
            }
            ')' => {
                self.bump(ch);
                Token::CloseParen
            }
            ',' => {
                self.bump(ch);
                Token::Comma
            }
            '>' => {
                self.bump(ch);
                Token::GreaterThan
            }
            '<' => {
                self.bump(ch);
                Token::LessThan
            }
            '=' => {
                self.bump(ch);
                if self.peek_char() == Some('=') {
                    self.bump('=');
                    Token::DoubleEquals
                } else {
                    Token::Equals
                }
            }
            '!' => {
                self.bump(ch);
                if self.peek_char() == Some('=') {
                    self.bump('=');
                    Token::NotEquals
                } else {
                    Token::DoesNotExist
                }
            }
            _ => {
                while let Some(ch) = self.peek_char() {
                    if ch.is_whitespace() || is_special(ch) {
                        break;
                    }
                    self.bump(ch);
                }
                match &self.input[start..self.pos] {
                    "in" => Token::In,
                    "notin" => Token::NotIn,
                    word => Token::Identifier(word.to_string()),
                }
            }
        };
        ScannedItem {
            token,
            position: start,
        }
    }
}

/// Where the parser currently is in the grammar. In value position the
/// `in` and `notin` keywords are plain identifiers, so labels named
/// after the keywords keep working.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParserContext {
    KeyAndOperator,
    Values,
}

fn unexpected_token(token: &Token, position: usize, expected: &str) -> ParseError {
    ParseError::UnexpectedToken {
        found: token.literal().to_string(),
        position,
        expected: expected.to_string(),
    }
}

struct Parser {
    items: Vec<ScannedItem>,
    position: usize,
}

impl Parser {
    fn lookahead(&self, context: ParserContext) -> ScannedItem {
        let mut item = self.items[self.position].clone();
        if context == ParserContext::Values {
            item.token = match item.token {
                Token::In => Token::Identifier("in".to_string()),
                Token::NotIn => Token::Identifier("notin".to_string()),
                token => token,
            };
        }
        item
    }

    fn consume(&mut self, context: ParserContext) -> ScannedItem {
        let item = self.lookahead(context);
        // The final item is EndOfInput; never advance past it.
        self.position = (self.position + 1).min(self.items.len() - 1);
        item
    }

    fn parse(&mut self) -> Result<Vec<Requirement>, ParseError> {
        let mut requirements = Vec::new();
        loop {
            let item = self.lookahead(ParserContext::Values);
            match item.token {
                Token::Identifier(_) | Token::DoesNotExist => {
                    requirements.push(self.parse_requirement()?);
                    let ScannedItem { token, position } = self.consume(ParserContext::Values);
                    match token {
                        Token::EndOfInput => return Ok(requirements),
                        Token::Comma => {
                            let next = self.lookahead(ParserContext::Values);
                            if !matches!(next.token, Token::Identifier(_) | Token::DoesNotExist) {
                                return Err(unexpected_token(
                                    &next.token,
                                    next.position,
                                    "an identifier after ','",
                                ));
                            }
                        }
                        other => {
                            return Err(unexpected_token(
                                &other,
                                position,
                                "',' or end of input",
                            ));
                        }
                    }
                }
                Token::EndOfInput => return Ok(requirements),
                other => {
                    return Err(unexpected_token(
                        &other,
                        item.position,
                        "'!' or an identifier",
                    ));
                }
            }
        }
    }

    fn parse_requirement(&mut self) -> Result<Requirement, ParseError> {
        let (key, inferred) = self.parse_key_and_infer_operator()?;
        if let Some(operator) = inferred {
            return Requirement::new(key, operator, Vec::new());
        }
        let operator = self.parse_operator()?;
        let values = match operator {
            Operator::In | Operator::NotIn => self.parse_values()?,
            _ => self.parse_exact_value()?,
        };
        Requirement::new(key, operator, values)
    }

    /// Consumes the key, recognising the `!key` and bare `key` forms
    /// where the operator is implied rather than written out.
    fn parse_key_and_infer_operator(
        &mut self,
    ) -> Result<(String, Option<Operator>), ParseError> {
        let mut prefix = None;
        let mut item = self.consume(ParserContext::Values);
        if item.token == Token::DoesNotExist {
            prefix = Some(Operator::DoesNotExist);
            item = self.consume(ParserContext::Values);
        }
        let ScannedItem { token, position } = item;
        let key = match token {
            Token::Identifier(key) => key,
            other => return Err(unexpected_token(&other, position, "an identifier")),
        };
        let next = self.lookahead(ParserContext::Values);
        let operator = if matches!(next.token, Token::EndOfInput | Token::Comma) {
            Some(prefix.unwrap_or(Operator::Exists))
        } else {
            // With a '!' prefix the requirement is complete here; a
            // trailing binary operator is rejected by the caller.
            prefix
        };
        Ok((key, operator))
    }

    fn parse_operator(&mut self) -> Result<Operator, ParseError> {
        let ScannedItem { token, position } = self.consume(ParserContext::KeyAndOperator);
        let operator = match token {
            Token::In => Operator::In,
            Token::NotIn => Operator::NotIn,
            Token::Equals => Operator::Equals,
            Token::DoubleEquals => Operator::DoubleEquals,
            Token::NotEquals => Operator::NotEquals,
            Token::GreaterThan => Operator::GreaterThan,
            Token::LessThan => Operator::LessThan,
            other => {
                return Err(unexpected_token(
                    &other,
                    position,
                    "a binary operator ('=', '==', '!=', 'in', 'notin', '>' or '<')",
                ));
            }
        };
        Ok(operator)
    }

    /// Parses the parenthesised value set of `in` and `notin`. An empty
    /// set `()` stands for the single empty value.
    fn parse_values(&mut self) -> Result<Vec<String>, ParseError> {
        let ScannedItem { token, position } = self.consume(ParserContext::Values);
        if token != Token::OpenParen {
            return Err(unexpected_token(&token, position, "'('"));
        }
        let next = self.lookahead(ParserContext::Values);
        match next.token {
            Token::Identifier(_) | Token::Comma => {
                let values = self.parse_identifier_list()?;
                let ScannedItem { token, position } = self.consume(ParserContext::Values);
                if token != Token::CloseParen {
                    return Err(unexpected_token(&token, position, "')'"));
                }
                Ok(values)
            }
            Token::CloseParen => {
                self.consume(ParserContext::Values);
                Ok(vec![String::new()])
            }
            other => Err(unexpected_token(
                &other,
                next.position,
                "',', ')' or an identifier",
            )),
        }
    }

    /// Parses a comma-separated value list. Leading, trailing and
    /// doubled commas each contribute an empty value. The closing
    /// parenthesis is left for the caller.
    fn parse_identifier_list(&mut self) -> Result<Vec<String>, ParseError> {
        let mut values: BTreeSet<String> = BTreeSet::new();
        loop {
            let ScannedItem { token, position } = self.consume(ParserContext::Values);
            match token {
                Token::Identifier(value) => {
                    values.insert(value);
                    let next = self.lookahead(ParserContext::Values);
                    match next.token {
                        // The ',' is consumed at the top of the loop.
                        Token::Comma => continue,
                        Token::CloseParen => return Ok(values.into_iter().collect()),
                        other => {
                            return Err(unexpected_token(
                                &other,
                                next.position,
                                "',' or ')'",
                            ));
                        }
                    }
                }
                Token::Comma => {
                    if values.is_empty() {
                        values.insert(String::new());
                    }
                    let next = self.lookahead(ParserContext::Values);
                    if next.token == Token::CloseParen {
                        values.insert(String::new());
                        return Ok(values.into_iter().collect());
                    }
                    if next.token == Token::Comma {
                        self.consume(ParserContext::Values);
                        values.insert(String::new());
                    }
                }
                other => {
                    return Err(unexpected_token(&other, position, "',' or an identifier"));
                }
            }
        }
    }

    /// Parses the single value of the `=`, `==`, `!=`, `>` and `<`
    /// forms. A missing value, as in `key=`, reads as the empty value.
    fn parse_exact_value(&mut self) -> Result<Vec<String>, ParseError> {
        let next = self.lookahead(ParserContext::Values);
        if matches!(next.token, Token::EndOfInput | Token::Comma) {
            return Ok(vec![String::new()]);
        }
        let ScannedItem { token, position } = self.consume(ParserContext::Values);
        match token {
            Token::Identifier(value) => Ok(vec![value]),
            other => Err(unexpected_token(&other, position, "an identifier")),
        }
    }
}

/// Parses a selector string into its requirements, in input order.
pub(crate) fn parse(input: &str) -> Result<Vec<Requirement>, ParseError> {
    let items = Lexer::new(input).scan();
    let mut parser = Parser { items, position: 0 };
    parser.parse()
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
