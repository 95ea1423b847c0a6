//! Leaf parsers turn a run of symbols into a single value.
//!
//! The expression reader never looks inside a leaf: whatever symbols are not
//! operators, delimiters or ignorable are collected and handed to a
//! [LeafParser]. Any `Fn(&[Symbol]) -> Result<T, ParseError>` closure is a leaf
//! parser, and so is an [ExpressionReader](crate::parser::ExpressionReader),
//! which is how readers are stacked.

use crate::{
    domains::{float::F64, integer::Integer, Ring},
    error::{ParseError, SyntaxError, SyntaxErrorKind},
    tokenizer::{join_text, Symbol},
};

/// Converts a run of symbols into a value of type `T`.
pub trait LeafParser<T> {
    /// Parse the complete run. A run that does not form a value is a syntax error,
    /// so that callers can try another parser on the same symbols.
    fn parse_leaf(&self, symbols: &[Symbol]) -> Result<T, ParseError>;
}

impl<T, F: Fn(&[Symbol]) -> Result<T, ParseError>> LeafParser<T> for F {
    fn parse_leaf(&self, symbols: &[Symbol]) -> Result<T, ParseError> {
        self(symbols)
    }
}

/// The syntax error for a run that is not a valid leaf.
pub fn invalid_leaf(symbols: &[Symbol]) -> ParseError {
    let position = symbols.first().map(|s| s.position).unwrap_or_default();
    SyntaxError::new(
        position,
        SyntaxErrorKind::InvalidLeaf {
            text: join_text(symbols),
        },
    )
    .into()
}

/// Reads a non-negative decimal integer and maps it into a ring with [Ring::nth].
#[derive(Clone, Debug)]
pub struct IntegerLiteral<R: Ring> {
    ring: R,
}

impl<R: Ring> IntegerLiteral<R> {
    pub fn new(ring: R) -> IntegerLiteral<R> {
        IntegerLiteral { ring }
    }
}

impl<R: Ring> LeafParser<R::Element> for IntegerLiteral<R> {
    fn parse_leaf(&self, symbols: &[Symbol]) -> Result<R::Element, ParseError> {
        let text = join_text(symbols);
        if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid_leaf(symbols));
        }

        let n: Integer = text.parse().map_err(|_| invalid_leaf(symbols))?;
        Ok(self.ring.nth(&n))
    }
}

/// Reads `digits` or `digits.digits` into a floating point number.
#[derive(Clone, Copy, Debug, Default)]
pub struct DecimalLiteral;

impl LeafParser<F64> for DecimalLiteral {
    fn parse_leaf(&self, symbols: &[Symbol]) -> Result<F64, ParseError> {
        let text = join_text(symbols);

        let mut parts = text.splitn(2, '.');
        let valid = parts.all(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()));
        if !valid {
            return Err(invalid_leaf(symbols));
        }

        let v: f64 = text.parse().map_err(|_| invalid_leaf(symbols))?;
        Ok(v.into())
    }
}
