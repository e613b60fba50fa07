//! Small arithmetic evaluator for the calculator command.
//!
//! Grammar:
//!
//! ```text
//! expr   := term (('+' | '-') term)*
//! term   := factor (('*' | '/') factor)*
//! factor := ('+' | '-') factor | number | '(' expr ')'
//! ```
//!
//! Numbers accept `.` or `,` as decimal separator. Anything else is rejected.
//! Nesting of parentheses and signs is capped at [`MAX_DEPTH`] levels, and a
//! result that is not a finite number is an error.

use thiserror::Error;

pub const MAX_DEPTH: usize = 256;

#[derive(Debug, Error, PartialEq)]
pub enum ExprError {
    #[error("empty expression")]
    Empty,
    #[error("unexpected character '{0}' at position {1}")]
    UnexpectedChar(char, usize),
    #[error("invalid number '{0}'")]
    InvalidNumber(String),
    #[error("unexpected '{0}'")]
    UnexpectedToken(String),
    #[error("unexpected end of expression")]
    UnexpectedEnd,
    #[error("missing closing parenthesis")]
    UnclosedParen,
    #[error("division by zero")]
    DivisionByZero,
    #[error("expression nested deeper than {MAX_DEPTH} levels")]
    TooDeep,
    #[error("result is out of range")]
    OutOfRange,
}

#[derive(Clone, Debug, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    Open,
    Close,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Number(n) => n.to_string(),
            Token::Plus => "+".to_string(),
            Token::Minus => "-".to_string(),
            Token::Star => "*".to_string(),
            Token::Slash => "/".to_string(),
            Token::Open => "(".to_string(),
            Token::Close => ")".to_string(),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>, ExprError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < chars.len() {
        let ch = chars[pos];
        let token = match ch {
            c if c.is_whitespace() => {
                pos += 1;
                continue;
            }
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '(' => Token::Open,
            ')' => Token::Close,
            c if c.is_ascii_digit() || c == '.' || c == ',' => {
                let start = pos;
                while pos < chars.len()
                    && (chars[pos].is_ascii_digit() || chars[pos] == '.' || chars[pos] == ',')
                {
                    pos += 1;
                }
                let raw: String = chars[start..pos].iter().collect();
                let value = raw
                    .replace(',', ".")
                    .parse::<f64>()
                    .ok()
                    .filter(|value| value.is_finite())
                    .ok_or_else(|| ExprError::InvalidNumber(raw.clone()))?;
                tokens.push(Token::Number(value));
                continue;
            }
            other => return Err(ExprError::UnexpectedChar(other, pos)),
        };
        tokens.push(token);
        pos += 1;
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expr(&mut self) -> Result<f64, ExprError> {
        let mut value = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.pos += 1;
                    value += self.term()?;
                }
                Some(Token::Minus) => {
                    self.pos += 1;
                    value -= self.term()?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn term(&mut self) -> Result<f64, ExprError> {
        let mut value = self.factor()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.pos += 1;
                    value *= self.factor()?;
                }
                Some(Token::Slash) => {
                    self.pos += 1;
                    let divisor = self.factor()?;
                    if divisor == 0.0 {
                        return Err(ExprError::DivisionByZero);
                    }
                    value /= divisor;
                }
                _ => return Ok(value),
            }
        }
    }

    fn factor(&mut self) -> Result<f64, ExprError> {
        if self.depth == MAX_DEPTH {
            return Err(ExprError::TooDeep);
        }
        self.depth += 1;
        let value = self.nested_factor();
        self.depth -= 1;
        value
    }

    fn nested_factor(&mut self) -> Result<f64, ExprError> {
        match self.next() {
            Some(Token::Number(value)) => Ok(value),
            Some(Token::Minus) => Ok(-self.factor()?),
            Some(Token::Plus) => self.factor(),
            Some(Token::Open) => {
                let value = self.expr()?;
                match self.next() {
                    Some(Token::Close) => Ok(value),
                    Some(other) => Err(ExprError::UnexpectedToken(other.describe())),
                    None => Err(ExprError::UnclosedParen),
                }
            }
            Some(other) => Err(ExprError::UnexpectedToken(other.describe())),
            None => Err(ExprError::UnexpectedEnd),
        }
    }
}

/// Evaluates an arithmetic expression over `+ - * /` and parentheses.
pub fn evaluate(input: &str) -> Result<f64, ExprError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(ExprError::Empty);
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let value = parser.expr()?;
    if let Some(extra) = parser.peek() {
        return Err(ExprError::UnexpectedToken(extra.describe()));
    }
    if !value.is_finite() {
        return Err(ExprError::OutOfRange);
    }
    Ok(value)
}
