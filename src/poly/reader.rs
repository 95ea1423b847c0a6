//! Read univariate polynomials, and polynomials of polynomials, from text.
//!
//! A polynomial is read as an ordinary expression over the standard operator
//! vocabulary, where the leaves are integers, coefficients or the variable.
//! Terms are merged as they are combined, so the result is always in normal form:
//! `x^2+3*x^2` has a single term and `x-x` has none.
//!
//! Readers are configured with a [PolynomialReaderBuilder]. By default parentheses
//! and brackets group sub-expressions and there are no external delimiters.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::{
    conversion::Conversion,
    domains::{integer::Integer, Ring},
    error::{ConfigError, DomainError, ParseError, ParseLog, SyntaxError, SyntaxErrorKind},
    leaf::{invalid_leaf, LeafParser},
    parser::ExpressionReader,
    standard::{arithmetic_operators, checked_div, checked_pow, Arithmetic, DEFAULT_MAX_EXPONENT},
    tokenizer::{join_text, tags, tokenize, ArraySymbolReader, Symbol, SymbolReader, Tag},
};

use super::{
    univariate::{UnivariatePolynomial, UnivariatePolynomialRing},
    Variable,
};

/// An intermediate value. Integer literals stay machine integers as long as
/// the arithmetic on them is exact.
#[derive(Clone, Debug)]
enum Item<R: Ring> {
    Integer(i64),
    Coefficient(R::Element),
    Polynomial(UnivariatePolynomial<R>),
}

#[derive(Clone)]
struct TermArithmetic<R: Ring, C> {
    ring: UnivariatePolynomialRing<R>,
    conversion: C,
    max_exponent: u64,
}

impl<R: Ring, C: Conversion<R::Element>> TermArithmetic<R, C> {
    fn coefficient(&self, item: Item<R>) -> R::Element {
        match item {
            Item::Integer(n) => self.conversion.from_int(n),
            Item::Coefficient(c) => c,
            Item::Polynomial(p) => p.get_constant(),
        }
    }

    fn polynomial(&self, item: Item<R>) -> UnivariatePolynomial<R> {
        match item {
            Item::Polynomial(p) => p,
            other => self.ring.constant(self.coefficient(other)),
        }
    }

    fn is_zero(item: &Item<R>) -> bool {
        match item {
            Item::Integer(n) => *n == 0,
            Item::Coefficient(c) => R::is_zero(c),
            Item::Polynomial(p) => p.is_zero(),
        }
    }

    /// The largest exponent of any variable in `item`.
    fn degree(&self, item: &Item<R>) -> u64 {
        match item {
            Item::Integer(_) => 0,
            Item::Coefficient(c) => self.ring.coefficient_ring().max_degree(c),
            Item::Polynomial(p) => self.ring.max_degree(p),
        }
    }

    fn check_degrees(&self, a: &Item<R>, b: &Item<R>) -> Result<(), DomainError> {
        match self.degree(a).checked_add(self.degree(b)) {
            Some(_) => Ok(()),
            None => Err(DomainError::DegreeOverflow),
        }
    }

    fn combine(
        &self,
        a: Item<R>,
        b: Item<R>,
        int_op: fn(i64, i64) -> Option<i64>,
        coeff_op: fn(&R, &R::Element, &R::Element) -> R::Element,
        poly_op: fn(&UnivariatePolynomialRing<R>, &UnivariatePolynomial<R>, &UnivariatePolynomial<R>) -> UnivariatePolynomial<R>,
    ) -> Result<Item<R>, DomainError> {
        self.check_degrees(&a, &b)?;

        let field = self.ring.coefficient_ring();
        Ok(match (a, b) {
            (Item::Integer(x), Item::Integer(y)) => match int_op(x, y) {
                Some(z) => Item::Integer(z),
                None => Item::Coefficient(coeff_op(
                    field,
                    &self.conversion.from_int(x),
                    &self.conversion.from_int(y),
                )),
            },
            (a @ Item::Polynomial(_), b) | (a, b @ Item::Polynomial(_)) => {
                Item::Polynomial(poly_op(&self.ring, &self.polynomial(a), &self.polynomial(b)))
            }
            (a, b) => Item::Coefficient(coeff_op(field, &self.coefficient(a), &self.coefficient(b))),
        })
    }

    fn exponent(&self, item: Item<R>) -> Result<i64, DomainError> {
        match item {
            Item::Integer(n) => Ok(n),
            Item::Coefficient(c) => self.conversion.to_int(&c),
            Item::Polynomial(p) if p.is_constant() => self.conversion.to_int(&p.get_constant()),
            Item::Polynomial(_) => Err(DomainError::PolynomialExponent),
        }
    }
}

impl<R, C> Arithmetic for TermArithmetic<R, C>
where
    R: Ring + Send + Sync + 'static,
    C: Conversion<R::Element> + Clone + Send + Sync + 'static,
{
    type Value = Item<R>;

    fn add(&self, a: Item<R>, b: Item<R>) -> Result<Item<R>, DomainError> {
        self.combine(a, b, i64::checked_add, R::add, UnivariatePolynomialRing::add)
    }

    fn sub(&self, a: Item<R>, b: Item<R>) -> Result<Item<R>, DomainError> {
        self.combine(a, b, i64::checked_sub, R::sub, UnivariatePolynomialRing::sub)
    }

    fn mul(&self, a: Item<R>, b: Item<R>) -> Result<Item<R>, DomainError> {
        self.combine(a, b, i64::checked_mul, R::mul, UnivariatePolynomialRing::mul)
    }

    fn div(&self, a: Item<R>, b: Item<R>) -> Result<Item<R>, DomainError> {
        if Self::is_zero(&b) {
            return Err(DomainError::DivisionByZero);
        }
        self.check_degrees(&a, &b)?;

        let field = self.ring.coefficient_ring();
        let b = match b {
            Item::Polynomial(p) if !p.is_constant() => return Err(DomainError::PolynomialDivisor),
            Item::Polynomial(p) => Item::Coefficient(p.get_constant()),
            b => b,
        };

        match (a, b) {
            (Item::Integer(x), Item::Integer(y)) => match (x.checked_rem(y), x.checked_div(y)) {
                (Some(0), Some(q)) => Ok(Item::Integer(q)),
                _ => checked_div(
                    field,
                    &self.conversion.from_int(x),
                    &self.conversion.from_int(y),
                )
                .map(Item::Coefficient),
            },
            (Item::Polynomial(p), b) => p
                .try_div_coeff(&self.coefficient(b))
                .map(Item::Polynomial)
                .ok_or(DomainError::NotDivisible),
            (a, b) => checked_div(field, &self.coefficient(a), &self.coefficient(b)).map(Item::Coefficient),
        }
    }

    fn neg(&self, a: Item<R>) -> Result<Item<R>, DomainError> {
        let field = self.ring.coefficient_ring();
        Ok(match a {
            Item::Integer(x) => match x.checked_neg() {
                Some(n) => Item::Integer(n),
                None => Item::Coefficient(field.neg(&self.conversion.from_int(x))),
            },
            Item::Coefficient(c) => Item::Coefficient(field.neg(&c)),
            Item::Polynomial(p) => Item::Polynomial(-p),
        })
    }

    fn pow(&self, base: Item<R>, exponent: Item<R>) -> Result<Item<R>, DomainError> {
        let e = self.exponent(exponent)?;
        if e.unsigned_abs() > self.max_exponent {
            return Err(DomainError::ExponentTooLarge(e));
        }
        if self.degree(&base).checked_mul(e.unsigned_abs()).is_none() {
            return Err(DomainError::DegreeOverflow);
        }

        let field = self.ring.coefficient_ring();
        match base {
            Item::Integer(x) if e >= 0 => Ok(match u32::try_from(e).ok().and_then(|e| x.checked_pow(e)) {
                Some(v) => Item::Integer(v),
                None => Item::Coefficient(field.pow(&self.conversion.from_int(x), e as u64)),
            }),
            Item::Polynomial(p) if !p.is_constant() => {
                if e < 0 {
                    Err(DomainError::NegativeExponent)
                } else {
                    Ok(Item::Polynomial(p.pow(e as u64)))
                }
            }
            other => checked_pow(field, &self.coefficient(other), e, self.max_exponent).map(Item::Coefficient),
        }
    }
}

/// Reads the leaves of a polynomial: integer literals, then whatever the
/// coefficient parser accepts, then the variable.
struct TermLeaf<R: Ring, L> {
    ring: UnivariatePolynomialRing<R>,
    coefficients: L,
}

impl<R: Ring, L: LeafParser<R::Element>> LeafParser<Item<R>> for TermLeaf<R, L> {
    fn parse_leaf(&self, symbols: &[Symbol]) -> Result<Item<R>, ParseError> {
        let text = join_text(symbols);

        if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) {
            return Ok(match text.parse::<i64>() {
                Ok(n) => Item::Integer(n),
                Err(_) => {
                    let n: Integer = text.parse().map_err(|_| invalid_leaf(symbols))?;
                    Item::Coefficient(self.ring.coefficient_ring().nth(&n))
                }
            });
        }

        match self.coefficients.parse_leaf(symbols) {
            Ok(c) => return Ok(Item::Coefficient(c)),
            Err(ParseError::Domain(e)) => return Err(e.into()),
            Err(ParseError::Syntax(_)) => {}
        }

        if text == self.ring.variable().name() {
            let one = self.ring.coefficient_ring().one();
            return Ok(Item::Polynomial(self.ring.monomial(one, 1)));
        }

        if Variable::new(&text).is_ok() {
            let position = symbols.first().map(|s| s.position).unwrap_or_default();
            return Err(SyntaxError::new(position, SyntaxErrorKind::UnknownVariable { name: text }).into());
        }

        Err(invalid_leaf(symbols))
    }
}

/// Collects the configuration of a [UnivariatePolynomialReader].
///
/// The registrations are validated by [build](PolynomialReaderBuilder::build), which
/// reports conflicting tags the same way an
/// [ExpressionReaderBuilder](crate::parser::ExpressionReaderBuilder) does.
pub struct PolynomialReaderBuilder<R: Ring, L, C> {
    ring: UnivariatePolynomialRing<R>,
    coefficients: L,
    conversion: C,
    inner_variables: Vec<Arc<Variable>>,
    expression_delimiters: Vec<(Tag, Tag)>,
    external_delimiters: Vec<(Tag, Tag)>,
    max_exponent: u64,
    max_depth: Option<usize>,
}

impl<R, L, C> PolynomialReaderBuilder<R, L, C>
where
    R: Ring + Send + Sync + 'static,
    L: LeafParser<R::Element>,
    C: Conversion<R::Element> + Clone + Send + Sync + 'static,
{
    /// A builder for polynomials in `variable` over `ring`, where coefficient leaves
    /// are read by `coefficients` and integers are converted with `conversion`.
    pub fn new(ring: R, variable: &str, coefficients: L, conversion: C) -> Result<Self, ConfigError> {
        let variable = Arc::new(Variable::new(variable)?);
        Ok(Self::with_ring(
            UnivariatePolynomialRing::new(ring, variable),
            coefficients,
            conversion,
            vec![],
        ))
    }

    fn with_ring(
        ring: UnivariatePolynomialRing<R>,
        coefficients: L,
        conversion: C,
        inner_variables: Vec<Arc<Variable>>,
    ) -> Self {
        PolynomialReaderBuilder {
            ring,
            coefficients,
            conversion,
            inner_variables,
            expression_delimiters: vec![
                (tags::LEFT_PARENTHESIS.into(), tags::RIGHT_PARENTHESIS.into()),
                (tags::LEFT_BRACKET.into(), tags::RIGHT_BRACKET.into()),
            ],
            external_delimiters: vec![],
            max_exponent: DEFAULT_MAX_EXPONENT,
            max_depth: None,
        }
    }

    /// Add a pair of delimiters that group a sub-expression.
    pub fn register_expression_delimiters(mut self, open: &str, close: &str) -> Self {
        self.expression_delimiters.push((open.into(), close.into()));
        self
    }

    /// Add a pair of delimiters whose content, delimiters included, is handed to
    /// the coefficient parser as one leaf.
    pub fn register_external_delimiters(mut self, open: &str, close: &str) -> Self {
        self.external_delimiters.push((open.into(), close.into()));
        self
    }

    /// Remove all expression delimiters, including the default ones.
    pub fn clear_expression_delimiters(mut self) -> Self {
        self.expression_delimiters.clear();
        self
    }

    pub fn clear_external_delimiters(mut self) -> Self {
        self.external_delimiters.clear();
        self
    }

    /// Reject exponents larger than `max_exponent` in absolute value. Bounds above
    /// [u32::MAX] are clamped.
    pub fn max_exponent(mut self, max_exponent: u64) -> Self {
        self.max_exponent = max_exponent.min(u32::MAX as u64);
        self
    }

    /// Set the maximal nesting depth of the underlying expression reader.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn build(self) -> Result<UnivariatePolynomialReader<R, L, C>, ConfigError> {
        debug!(
            "polynomial reader over {} with {} expression and {} external delimiters",
            self.ring,
            self.expression_delimiters.len(),
            self.external_delimiters.len()
        );

        let arithmetic = TermArithmetic {
            ring: self.ring.clone(),
            conversion: self.conversion,
            max_exponent: self.max_exponent,
        };
        let leaf = TermLeaf {
            ring: self.ring,
            coefficients: self.coefficients,
        };

        let mut expression = arithmetic_operators(arithmetic.clone(), leaf)?;
        for (open, close) in &self.expression_delimiters {
            expression = expression.register_expression_delimiters(open, close)?;
        }
        for (open, close) in &self.external_delimiters {
            expression = expression.register_external_delimiters(open, close)?;
        }
        if let Some(depth) = self.max_depth {
            expression = expression.max_depth(depth)?;
        }

        Ok(UnivariatePolynomialReader {
            expression: expression.build(),
            arithmetic,
            inner_variables: self.inner_variables,
        })
    }
}

/// Reads polynomials in one variable with coefficients in `R`.
///
/// Coefficient leaves are read by `L`, and the [Conversion] `C` maps integer
/// literals and exponents to and from coefficients. A reader is itself a
/// [LeafParser] of polynomials, which is what [nested](UnivariatePolynomialReader::nested)
/// uses to read polynomials whose coefficients are polynomials in another variable.
pub struct UnivariatePolynomialReader<R: Ring, L, C> {
    expression: ExpressionReader<Item<R>, TermLeaf<R, L>>,
    arithmetic: TermArithmetic<R, C>,
    inner_variables: Vec<Arc<Variable>>,
}

impl<R, L> UnivariatePolynomialReader<R, L, R>
where
    R: Ring + Conversion<R::Element> + Send + Sync + 'static,
    L: LeafParser<R::Element>,
{
    /// A reader with the default configuration that converts integers with the
    /// coefficient ring itself.
    pub fn new(ring: R, variable: &str, coefficients: L) -> Result<Self, ConfigError> {
        Self::builder(ring, variable, coefficients)?.build()
    }

    pub fn builder(
        ring: R,
        variable: &str,
        coefficients: L,
    ) -> Result<PolynomialReaderBuilder<R, L, R>, ConfigError> {
        let conversion = ring.clone();
        PolynomialReaderBuilder::new(ring, variable, coefficients, conversion)
    }
}

impl<R, L, C> UnivariatePolynomialReader<R, L, C>
where
    R: Ring + Send + Sync + 'static,
    L: LeafParser<R::Element>,
    C: Conversion<R::Element> + Clone + Send + Sync + 'static,
{
    pub fn with_conversion(
        ring: R,
        variable: &str,
        coefficients: L,
        conversion: C,
    ) -> Result<Self, ConfigError> {
        PolynomialReaderBuilder::new(ring, variable, coefficients, conversion)?.build()
    }

    /// The ring of the polynomials this reader produces.
    pub fn ring(&self) -> &UnivariatePolynomialRing<R> {
        &self.arithmetic.ring
    }

    pub fn variable(&self) -> &Variable {
        self.arithmetic.ring.variable()
    }

    /// Parse a complete polynomial from `reader`.
    #[instrument(level = "trace", skip_all, fields(variable = %self.variable()))]
    pub fn try_parse_polynomial<S: SymbolReader + ?Sized>(
        &self,
        reader: &mut S,
    ) -> Result<UnivariatePolynomial<R>, ParseError> {
        let item = self.expression.try_parse(reader)?;
        Ok(self.arithmetic.polynomial(item))
    }

    /// Parse a complete polynomial, recording syntax errors in `log`.
    pub fn parse_polynomial<S: SymbolReader + ?Sized>(
        &self,
        reader: &mut S,
        log: &mut ParseLog,
    ) -> Result<Option<UnivariatePolynomial<R>>, DomainError> {
        Ok(self
            .expression
            .parse(reader, log)?
            .map(|item| self.arithmetic.polynomial(item)))
    }

    pub fn try_parse_str(&self, text: &str) -> Result<UnivariatePolynomial<R>, ParseError> {
        self.try_parse_polynomial(&mut ArraySymbolReader::new(tokenize(text)))
    }

    pub fn parse_str(
        &self,
        text: &str,
        log: &mut ParseLog,
    ) -> Result<Option<UnivariatePolynomial<R>>, DomainError> {
        self.parse_polynomial(&mut ArraySymbolReader::new(tokenize(text)), log)
    }

    /// A reader with the default configuration for polynomials in `variable` whose
    /// coefficients are read by `self`.
    ///
    /// The variable must differ from the variables of all inner readers.
    pub fn nested(
        self,
        variable: &str,
    ) -> Result<
        UnivariatePolynomialReader<UnivariatePolynomialRing<R>, Self, UnivariatePolynomialRing<R>>,
        ConfigError,
    >
    where
        R: Conversion<R::Element>,
    {
        self.nested_builder(variable)?.build()
    }

    /// Like [nested](UnivariatePolynomialReader::nested), but returns the builder of
    /// the outer reader for further configuration.
    pub fn nested_builder(
        self,
        variable: &str,
    ) -> Result<
        PolynomialReaderBuilder<UnivariatePolynomialRing<R>, Self, UnivariatePolynomialRing<R>>,
        ConfigError,
    >
    where
        R: Conversion<R::Element>,
    {
        let variable = Variable::new(variable)?;

        let mut inner_variables = self.inner_variables.clone();
        inner_variables.push(self.ring().variable().clone());
        if inner_variables.iter().any(|v| **v == variable) {
            return Err(ConfigError::VariableClash {
                name: variable.name().to_owned(),
            });
        }

        let coefficient_ring = self.ring().clone();
        Ok(PolynomialReaderBuilder::with_ring(
            UnivariatePolynomialRing::new(coefficient_ring.clone(), Arc::new(variable)),
            self,
            coefficient_ring,
            inner_variables,
        ))
    }
}

impl<R, L, C> LeafParser<UnivariatePolynomial<R>> for UnivariatePolynomialReader<R, L, C>
where
    R: Ring + Send + Sync + 'static,
    L: LeafParser<R::Element>,
    C: Conversion<R::Element> + Clone + Send + Sync + 'static,
{
    fn parse_leaf(&self, symbols: &[Symbol]) -> Result<UnivariatePolynomial<R>, ParseError> {
        self.try_parse_polynomial(&mut ArraySymbolReader::from_slice(symbols))
    }
}
