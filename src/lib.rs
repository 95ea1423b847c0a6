//! Ringparse reads mathematical expressions into elements of exact algebraic structures.
//!
//! An [ExpressionReader] is configured with operators, delimiters and a leaf parser,
//! and does no arithmetic itself: every operator maps to a function on the values of
//! the target [Ring]. The same grammar therefore reads integers, fractions, elements of
//! finite fields, floats or univariate polynomials, and readers can be stacked to read
//! polynomials whose coefficients are polynomials in another variable.
//!
//! For example:
//!
//! ```
//! use ringparse::{domains::integer::Z, leaf::IntegerLiteral, poly::reader::UnivariatePolynomialReader};
//!
//! let reader = UnivariatePolynomialReader::new(Z, "x", IntegerLiteral::new(Z))
//!     .unwrap()
//!     .nested("y")
//!     .unwrap();
//!
//! let p = reader.try_parse_str("(x+1)*y^2 + x*y - y*x").unwrap();
//! assert_eq!(p.to_string(), "(x+1)*y^2");
//! ```

pub mod conversion;
pub mod domains;
pub mod error;
pub mod leaf;
pub mod parser;
pub mod poly;
pub mod printer;
pub mod standard;
pub mod tokenizer;

pub use conversion::Conversion;
pub use domains::Ring;
pub use error::{ConfigError, DomainError, ParseError, ParseLog, SyntaxError};
pub use leaf::LeafParser;
pub use parser::{ExpressionReader, ExpressionReaderBuilder};
pub use poly::reader::{PolynomialReaderBuilder, UnivariatePolynomialReader};
