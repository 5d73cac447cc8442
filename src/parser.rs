//! Parser for the prefix term notation.
//!
//! ```text
//! term    := literal | "(" operator term* ")"
//! literal := '"' chars '"'
//! ```
//!
//! Operators are `AND`, `OR`, `NOT`, `TRUE`, `FALSE` and the comparators
//! `=`, `>`, `>=`, `<`, `<=`. A comparator term lists the right-hand side
//! first, followed by coefficient/term pairs, all numbers being quoted:
//! `(>= "2" "1" "a" "1" "b" "1" "c")`.
//!
//! Operator names are case-sensitive. Whitespace between tokens is
//! insignificant. Printing a parsed term with [`Display`](std::fmt::Display)
//! gives back the canonical text.
//!
//! Operations may be nested at most [`MAX_DEPTH`] levels deep.

use log::debug;

use crate::error::{Error, Result};
use crate::term::{Term, MAX_DEPTH};
use crate::types::Comparator;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Open,
    Close,
    Quoted(String),
    Word(String),
}

/// Token with its byte offset in the input.
type Spanned = (usize, Token);

fn tokenize(text: &str) -> Result<Vec<Spanned>> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some(&(pos, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push((pos, Token::Open));
            }
            ')' => {
                chars.next();
                tokens.push((pos, Token::Close));
            }
            '"' => {
                chars.next();
                let mut value = String::new();
                loop {
                    match chars.next() {
                        Some((_, '"')) => break,
                        Some((_, c)) => value.push(c),
                        None => return Err(Error::syntax(pos, "unterminated literal")),
                    }
                }
                tokens.push((pos, Token::Quoted(value)));
            }
            _ => {
                let mut word = String::new();
                while let Some(&(_, c)) = chars.peek() {
                    if c.is_whitespace() || c == '(' || c == ')' || c == '"' {
                        break;
                    }
                    word.push(c);
                    chars.next();
                }
                tokens.push((pos, Token::Word(word)));
            }
        }
    }

    Ok(tokens)
}

enum Operator {
    And,
    Or,
    Not,
    True,
    False,
    Linear(Comparator),
}

impl Operator {
    fn from_word(word: &str) -> Option<Self> {
        match word {
            "AND" => Some(Operator::And),
            "OR" => Some(Operator::Or),
            "NOT" => Some(Operator::Not),
            "TRUE" => Some(Operator::True),
            "FALSE" => Some(Operator::False),
            other => other.parse().ok().map(Operator::Linear),
        }
    }
}

/// An operation whose closing parenthesis has not been reached yet.
struct Frame {
    /// Offset of the opening parenthesis.
    open: usize,
    /// Offset of the operator.
    pos: usize,
    word: String,
    operator: Operator,
    operands: Vec<Term<String>>,
}

impl Frame {
    fn close(mut self) -> Result<Term<String>> {
        let pos = self.pos;
        match self.operator {
            Operator::And => Ok(Term::And(self.operands)),
            Operator::Or => Ok(Term::Or(self.operands)),
            Operator::Not => {
                if self.operands.len() != 1 {
                    return Err(Error::syntax(
                        pos,
                        format!("NOT expects exactly one operand, got {}", self.operands.len()),
                    ));
                }
                Ok(Term::not(self.operands.remove(0)))
            }
            Operator::True => constant(pos, &self.word, &self.operands, Term::True),
            Operator::False => constant(pos, &self.word, &self.operands, Term::False),
            Operator::Linear(comparator) => linear(pos, comparator, self.operands),
        }
    }
}

struct Parser {
    tokens: Vec<Spanned>,
    index: usize,
    len: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Spanned> {
        self.tokens.get(self.index)
    }

    fn next(&mut self) -> Option<Spanned> {
        let token = self.tokens.get(self.index).cloned();
        self.index += 1;
        token
    }

    /// Parse one term, keeping the open operations on an explicit stack.
    fn parse_term(&mut self) -> Result<Term<String>> {
        let mut stack: Vec<Frame> = Vec::new();

        loop {
            let term = match self.next() {
                None => {
                    return Err(match stack.last() {
                        Some(frame) => Error::syntax(frame.open, "unclosed '('"),
                        None => Error::syntax(self.len, "unexpected end of input"),
                    });
                }
                Some((_, Token::Quoted(id))) => Term::Literal(id),
                Some((open, Token::Open)) => {
                    if stack.len() == MAX_DEPTH {
                        return Err(Error::syntax(
                            open,
                            format!("operations nested deeper than {} levels", MAX_DEPTH),
                        ));
                    }
                    let frame = self.open_operation(open)?;
                    stack.push(frame);
                    continue;
                }
                Some((pos, Token::Close)) => match stack.pop() {
                    Some(frame) => frame.close()?,
                    None => return Err(Error::syntax(pos, "unexpected ')'")),
                },
                Some((pos, Token::Word(word))) => {
                    return Err(Error::syntax(pos, format!("unexpected token '{}'", word)));
                }
            };

            match stack.last_mut() {
                Some(frame) => frame.operands.push(term),
                None => return Ok(term),
            }
        }
    }

    /// Read the operator following the opening parenthesis at `open`.
    fn open_operation(&mut self, open: usize) -> Result<Frame> {
        let (pos, word) = match self.next() {
            Some((pos, Token::Word(word))) => (pos, word),
            Some((pos, _)) => return Err(Error::syntax(pos, "expected an operator")),
            None => return Err(Error::syntax(open, "unclosed '('")),
        };
        let operator =
            Operator::from_word(&word).ok_or_else(|| Error::syntax(pos, format!("unknown operator '{}'", word)))?;
        Ok(Frame {
            open,
            pos,
            word,
            operator,
            operands: Vec::new(),
        })
    }
}

fn constant(pos: usize, word: &str, operands: &[Term<String>], value: Term<String>) -> Result<Term<String>> {
    if !operands.is_empty() {
        return Err(Error::syntax(pos, format!("{} takes no operands", word)));
    }
    Ok(value)
}

fn number(pos: usize, term: &Term<String>) -> Result<i64> {
    match term {
        Term::Literal(s) => s
            .parse()
            .map_err(|_| Error::syntax(pos, format!("expected an integer, got \"{}\"", s))),
        other => Err(Error::syntax(pos, format!("expected a quoted integer, got {}", other))),
    }
}

fn linear(pos: usize, comparator: Comparator, operands: Vec<Term<String>>) -> Result<Term<String>> {
    if operands.len() % 2 != 1 {
        return Err(Error::syntax(
            pos,
            format!("'{}' expects a bound followed by coefficient/term pairs", comparator),
        ));
    }

    let mut operands = operands.into_iter();
    let rhs = match operands.next() {
        Some(bound) => number(pos, &bound)?,
        None => return Err(Error::syntax(pos, "missing bound")),
    };
    let mut coefficients = Vec::new();
    let mut terms = Vec::new();
    while let (Some(c), Some(t)) = (operands.next(), operands.next()) {
        coefficients.push(number(pos, &c)?);
        terms.push(t);
    }
    Term::linear(coefficients, terms, comparator, rhs)
}

/// Parse a term in prefix notation.
///
/// # Examples
///
/// ```
/// use bdd_reliability::parser::parse;
///
/// let term = parse(r#"(AND "Sensor1" (OR "Pump1" "Pump2"))"#).unwrap();
/// assert_eq!(term.to_string(), r#"(AND "Sensor1" (OR "Pump1" "Pump2"))"#);
/// ```
pub fn parse(text: &str) -> Result<Term<String>> {
    let tokens = tokenize(text)?;
    debug!("parse: {} tokens", tokens.len());

    let mut parser = Parser {
        tokens,
        index: 0,
        len: text.len(),
    };
    let term = parser.parse_term()?;
    if let Some((pos, _)) = parser.peek() {
        return Err(Error::syntax(*pos, "trailing input after term"));
    }
    Ok(term)
}
