//! Error types shared by the tokenizer, the expression engine and the algebraic domains.
//!
//! Three classes of failure are kept apart:
//! - [SyntaxError]: the input does not match the configured grammar. Callers may
//!   recover, for example by trying another reader on the same symbols.
//! - [DomainError]: the input is well-formed but the requested operation is invalid
//!   in the chosen algebraic structure, such as dividing by zero.
//! - [ConfigError]: a reader was configured inconsistently. These are reported by
//!   the builder, never at parse time.

use std::fmt::{self, Display, Formatter};

use thiserror::Error;
use tracing::debug;

use crate::tokenizer::{Position, Tag};

/// An algebraically invalid operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("a fraction cannot have a zero denominator")]
    ZeroDenominator,
    #[error("the division does not have an exact result in this ring")]
    NotDivisible,
    #[error("{value} cannot be represented as a machine integer")]
    NotRepresentable { value: String },
    #[error("negative exponent on an element that is not invertible")]
    NegativeExponent,
    #[error("exponent {0} is too large")]
    ExponentTooLarge(i64),
    #[error("zero is not invertible")]
    NotInvertible,
    #[error("cannot divide by a non-constant polynomial")]
    PolynomialDivisor,
    #[error("the exponent must be a constant, not a polynomial")]
    PolynomialExponent,
    #[error("the degree of the result does not fit in 64 bits")]
    DegreeOverflow,
}

/// The kind of a [SyntaxError].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    UnexpectedSymbol { expected: &'static str, found: String },
    UnexpectedEnd,
    MissingOperand { found: String },
    UnmatchedClose { found: String },
    MissingClose { open: Tag },
    MismatchedClose { open: Tag, found: String },
    InvalidLeaf { text: String },
    UnknownVariable { name: String },
    NestingTooDeep { limit: usize },
    Empty,
}

impl Display for SyntaxErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SyntaxErrorKind::UnexpectedSymbol { expected, found } => {
                write!(f, "expected {} but found '{}'", expected, found)
            }
            SyntaxErrorKind::UnexpectedEnd => f.write_str("unexpected end of expression"),
            SyntaxErrorKind::MissingOperand { found } => {
                write!(f, "missing operand before '{}'", found)
            }
            SyntaxErrorKind::UnmatchedClose { found } => {
                write!(f, "closing delimiter '{}' without an opening one", found)
            }
            SyntaxErrorKind::MissingClose { open } => {
                write!(f, "delimiter {} opened but not closed", open)
            }
            SyntaxErrorKind::MismatchedClose { open, found } => {
                write!(f, "delimiter {} closed by '{}'", open, found)
            }
            SyntaxErrorKind::InvalidLeaf { text } => write!(f, "cannot read a value from '{}'", text),
            SyntaxErrorKind::UnknownVariable { name } => write!(f, "unknown variable '{}'", name),
            SyntaxErrorKind::NestingTooDeep { limit } => {
                write!(f, "expression nested deeper than {} levels", limit)
            }
            SyntaxErrorKind::Empty => f.write_str("empty expression"),
        }
    }
}

/// Input that does not match the grammar of a reader.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at {position}")]
pub struct SyntaxError {
    pub position: Position,
    pub kind: SyntaxErrorKind,
}

impl SyntaxError {
    pub fn new(position: Position, kind: SyntaxErrorKind) -> SyntaxError {
        SyntaxError { position, kind }
    }
}

/// The error of a parse: either the syntax is wrong or the arithmetic is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl ParseError {
    pub fn is_syntax(&self) -> bool {
        matches!(self, ParseError::Syntax(_))
    }

    pub fn is_domain(&self) -> bool {
        matches!(self, ParseError::Domain(_))
    }
}

/// An operator arity, used in configuration diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    Unary,
    Binary,
}

impl Display for Arity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Unary => f.write_str("unary"),
            Arity::Binary => f.write_str("binary"),
        }
    }
}

/// An inconsistent reader configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("tags cannot be empty")]
    EmptyTag,
    #[error("{arity} operator {tag} is already registered")]
    DuplicateOperator { tag: Tag, arity: Arity },
    #[error("tag {tag} is already registered as {existing}")]
    TagConflict { tag: Tag, existing: &'static str },
    #[error("precedence {0} is reserved")]
    InvalidPrecedence(u32),
    #[error("'{name}' is not a valid variable name")]
    InvalidVariable { name: String },
    #[error("variable '{name}' is used by both the polynomial and its coefficients")]
    VariableClash { name: String },
    #[error("{0} is not a prime modulus")]
    InvalidModulus(u64),
    #[error("the maximal nesting depth must be positive")]
    ZeroDepth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Info,
    Warning,
    Error,
}

impl Display for Level {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Level::Info => f.write_str("info"),
            Level::Warning => f.write_str("warning"),
            Level::Error => f.write_str("error"),
        }
    }
}

/// A single entry of a [ParseLog].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: Level,
    pub message: String,
    pub position: Option<Position>,
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.position {
            Some(p) => write!(f, "{}: {} at {}", self.level, self.message, p),
            None => write!(f, "{}: {}", self.level, self.message),
        }
    }
}

/// Collects the diagnostics of the non-failing `parse` variants.
///
/// A log can be shared between several attempts, for example when a caller tries
/// a sequence of grammars and only reports the failures if all of them fail.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseLog {
    entries: Vec<Diagnostic>,
}

impl ParseLog {
    pub fn new() -> ParseLog {
        ParseLog::default()
    }

    pub fn push(&mut self, level: Level, message: impl Into<String>, position: Option<Position>) {
        self.entries.push(Diagnostic {
            level,
            message: message.into(),
            position,
        });
    }

    /// Record a syntax error as an [Level::Error] diagnostic.
    pub fn syntax_error(&mut self, error: &SyntaxError) {
        debug!("syntax error: {}", error);
        self.push(Level::Error, error.kind.to_string(), Some(error.position));
    }

    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(|d| d.level == Level::Error)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
