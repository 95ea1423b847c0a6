//! Ready-made expression readers with the usual operator vocabulary.
//!
//! | tag | operation | precedence |
//! |---|---|---|
//! | `plus`, `minus` | addition, subtraction | 0 |
//! | unary `minus` | negation | 0 |
//! | `times`, `over` | multiplication, exact division | 1 |
//! | `mod` | Euclidean remainder ([euclidean_reader] only) | 1 |
//! | `hat` | power, right-associative | 2 |
//!
//! Negation binds as loose as addition, so `-2^2` is `-4` and `2*-3` is `-6`.
//! Parentheses and brackets group sub-expressions, parentheses after a leaf
//! enclose an argument list, and whitespace is skipped.
//!
//! Exponents are bounded by [DEFAULT_MAX_EXPONENT] unless configured otherwise
//! with [RingArithmetic::with_max_exponent], so that `3^4294967295` fails fast
//! instead of allocating a number with billions of digits.

use crate::{
    conversion::Conversion,
    domains::{
        finite_field::{FiniteFieldElement, Zp},
        float::{FloatField, F64},
        integer::{Integer, Z},
        rational::{Fraction, FractionField, Rational, Q},
        EuclideanDomain, Ring,
    },
    error::{ConfigError, DomainError},
    leaf::{DecimalLiteral, IntegerLiteral, LeafParser},
    parser::{Associativity, ExpressionReader, ExpressionReaderBuilder},
    tokenizer::tags,
};

/// The operations behind the standard operator vocabulary.
///
/// Values are taken by value so that implementations can reuse their storage.
pub trait Arithmetic: Clone + Send + Sync + 'static {
    type Value;

    fn add(&self, a: Self::Value, b: Self::Value) -> Result<Self::Value, DomainError>;
    fn sub(&self, a: Self::Value, b: Self::Value) -> Result<Self::Value, DomainError>;
    fn mul(&self, a: Self::Value, b: Self::Value) -> Result<Self::Value, DomainError>;
    /// Exact division. Fails with [DomainError::DivisionByZero] for a zero divisor.
    fn div(&self, a: Self::Value, b: Self::Value) -> Result<Self::Value, DomainError>;
    fn neg(&self, a: Self::Value) -> Result<Self::Value, DomainError>;
    /// Raise `base` to `exponent`, which must have an integer value.
    fn pow(&self, base: Self::Value, exponent: Self::Value) -> Result<Self::Value, DomainError>;
}

/// The largest absolute value of an exponent accepted by default.
pub const DEFAULT_MAX_EXPONENT: u64 = 1 << 20;

/// The [Arithmetic] of a ring. Exponents are read through the ring's [Conversion].
#[derive(Clone, Debug)]
pub struct RingArithmetic<R> {
    ring: R,
    max_exponent: u64,
}

impl<R: Ring> RingArithmetic<R> {
    pub fn new(ring: R) -> RingArithmetic<R> {
        RingArithmetic {
            ring,
            max_exponent: DEFAULT_MAX_EXPONENT,
        }
    }

    /// Reject powers whose exponent exceeds `max_exponent` in absolute value
    /// with [DomainError::ExponentTooLarge]. Bounds above [u32::MAX] are clamped.
    pub fn with_max_exponent(mut self, max_exponent: u64) -> RingArithmetic<R> {
        self.max_exponent = max_exponent.min(u32::MAX as u64);
        self
    }

    pub fn max_exponent(&self) -> u64 {
        self.max_exponent
    }
}

impl<R: Ring + Conversion<R::Element> + Send + Sync + 'static> Arithmetic for RingArithmetic<R> {
    type Value = R::Element;

    fn add(&self, a: R::Element, b: R::Element) -> Result<R::Element, DomainError> {
        check_degrees(&self.ring, &a, &b)?;
        Ok(self.ring.add(&a, &b))
    }

    fn sub(&self, a: R::Element, b: R::Element) -> Result<R::Element, DomainError> {
        check_degrees(&self.ring, &a, &b)?;
        Ok(self.ring.sub(&a, &b))
    }

    fn mul(&self, a: R::Element, b: R::Element) -> Result<R::Element, DomainError> {
        check_degrees(&self.ring, &a, &b)?;
        Ok(self.ring.mul(&a, &b))
    }

    fn div(&self, a: R::Element, b: R::Element) -> Result<R::Element, DomainError> {
        check_degrees(&self.ring, &a, &b)?;
        checked_div(&self.ring, &a, &b)
    }

    fn neg(&self, a: R::Element) -> Result<R::Element, DomainError> {
        Ok(self.ring.neg(&a))
    }

    fn pow(&self, base: R::Element, exponent: R::Element) -> Result<R::Element, DomainError> {
        let e = self.ring.to_int(&exponent)?;
        checked_pow(&self.ring, &base, e, self.max_exponent)
    }
}

/// Fail with [DomainError::DegreeOverflow] if combining `a` and `b` could produce
/// an exponent that does not fit in a `u64`.
pub fn check_degrees<R: Ring>(ring: &R, a: &R::Element, b: &R::Element) -> Result<(), DomainError> {
    match ring.max_degree(a).checked_add(ring.max_degree(b)) {
        Some(_) => Ok(()),
        None => Err(DomainError::DegreeOverflow),
    }
}

/// Divide `a` by `b` if the quotient exists in the ring.
pub fn checked_div<R: Ring>(ring: &R, a: &R::Element, b: &R::Element) -> Result<R::Element, DomainError> {
    if R::is_zero(b) {
        return Err(DomainError::DivisionByZero);
    }
    ring.try_div(a, b).ok_or(DomainError::NotDivisible)
}

/// Raise `base` to a machine integer exponent of at most `max_exponent`, and never
/// more than [u32::MAX], in absolute value. A negative exponent inverts the power,
/// which requires the power to be a unit of the ring.
pub fn checked_pow<R: Ring>(
    ring: &R,
    base: &R::Element,
    exponent: i64,
    max_exponent: u64,
) -> Result<R::Element, DomainError> {
    if exponent.unsigned_abs() > max_exponent.min(u32::MAX as u64) {
        return Err(DomainError::ExponentTooLarge(exponent));
    }
    if ring.max_degree(base).checked_mul(exponent.unsigned_abs()).is_none() {
        return Err(DomainError::DegreeOverflow);
    }

    if exponent >= 0 {
        return Ok(ring.pow(base, exponent as u64));
    }

    if R::is_zero(base) {
        return Err(DomainError::DivisionByZero);
    }

    let p = ring.pow(base, exponent.unsigned_abs());
    ring.try_div(&ring.one(), &p)
        .ok_or(DomainError::NegativeExponent)
}

/// A builder with the standard operators bound to `arithmetic` and whitespace
/// marked as ignorable, but without any delimiters.
pub fn arithmetic_operators<A, L>(
    arithmetic: A,
    leaf: L,
) -> Result<ExpressionReaderBuilder<A::Value, L>, ConfigError>
where
    A: Arithmetic,
    L: LeafParser<A::Value>,
{
    let (add, sub, neg, mul, div, pow) = (
        arithmetic.clone(),
        arithmetic.clone(),
        arithmetic.clone(),
        arithmetic.clone(),
        arithmetic.clone(),
        arithmetic,
    );

    let mut b = ExpressionReaderBuilder::new(leaf)
        .register_binary_operator(tags::PLUS, move |a, b| add.add(a, b), 0, Associativity::Left)?
        .register_binary_operator(tags::MINUS, move |a, b| sub.sub(a, b), 0, Associativity::Left)?
        .register_unary_operator(tags::MINUS, move |a| neg.neg(a), 0)?
        .register_binary_operator(tags::TIMES, move |a, b| mul.mul(a, b), 1, Associativity::Left)?
        .register_binary_operator(tags::OVER, move |a, b| div.div(a, b), 1, Associativity::Left)?
        .register_binary_operator(tags::HAT, move |a, b| pow.pow(a, b), 2, Associativity::Right)?;

    for t in tags::WHITESPACE {
        b = b.mark_ignorable(t)?;
    }

    Ok(b)
}

/// A builder with the standard operators bound to `arithmetic`, ready for further
/// registrations.
pub fn arithmetic_reader<A, L>(
    arithmetic: A,
    leaf: L,
) -> Result<ExpressionReaderBuilder<A::Value, L>, ConfigError>
where
    A: Arithmetic,
    L: LeafParser<A::Value>,
{
    arithmetic_operators(arithmetic, leaf)?
        .register_expression_delimiters(tags::LEFT_PARENTHESIS, tags::RIGHT_PARENTHESIS)?
        .register_expression_delimiters(tags::LEFT_BRACKET, tags::RIGHT_BRACKET)?
        .register_sequence_delimiters(tags::LEFT_PARENTHESIS, tags::RIGHT_PARENTHESIS)
}

/// A builder for expressions over `ring`, with leaves read by `leaf`.
pub fn ring_reader<R, L>(
    ring: R,
    leaf: L,
) -> Result<ExpressionReaderBuilder<R::Element, L>, ConfigError>
where
    R: Ring + Conversion<R::Element> + Send + Sync + 'static,
    L: LeafParser<R::Element>,
{
    arithmetic_reader(RingArithmetic::new(ring), leaf)
}

/// [ring_reader] with an additional `mod` operator for the Euclidean remainder.
pub fn euclidean_reader<R, L>(
    ring: R,
    leaf: L,
) -> Result<ExpressionReaderBuilder<R::Element, L>, ConfigError>
where
    R: EuclideanDomain + Conversion<R::Element> + Send + Sync + 'static,
    L: LeafParser<R::Element>,
{
    let r = ring.clone();
    ring_reader(ring, leaf)?.register_binary_operator(
        tags::MOD,
        move |a, b| {
            if R::is_zero(&b) {
                Err(DomainError::DivisionByZero)
            } else {
                Ok(r.quot_rem(&a, &b).1)
            }
        },
        1,
        Associativity::Left,
    )
}

/// Integer expressions, for example `(7 % 3)^10 - 2`.
pub fn integer_reader() -> Result<ExpressionReader<Integer, IntegerLiteral<Z>>, ConfigError> {
    Ok(euclidean_reader(Z, IntegerLiteral::new(Z))?.build())
}

/// Exact rational expressions, for example `1/3 + 2^-2`.
pub fn rational_reader() -> Result<ExpressionReader<Rational, IntegerLiteral<Q>>, ConfigError> {
    Ok(ring_reader(Q, IntegerLiteral::new(Q))?.build())
}

/// Floating point expressions with decimal literals, for example `1.5 * 2`.
pub fn float_reader() -> Result<ExpressionReader<F64, DecimalLiteral>, ConfigError> {
    Ok(ring_reader(FloatField::<F64>::new(), DecimalLiteral)?.build())
}

/// Expressions modulo the prime `p`.
pub fn modular_reader(
    p: u64,
) -> Result<ExpressionReader<FiniteFieldElement, IntegerLiteral<Zp>>, ConfigError> {
    let field = Zp::new(p)?;
    Ok(ring_reader(field, IntegerLiteral::new(field))?.build())
}

/// Expressions in a fraction field, with leaves read by `leaf`.
pub fn fraction_reader<R, L>(
    field: FractionField<R>,
    leaf: L,
) -> Result<ExpressionReader<Fraction<R>, L>, ConfigError>
where
    FractionField<R>: Ring<Element = Fraction<R>> + Conversion<Fraction<R>> + Send + Sync + 'static,
    R: Ring,
    L: LeafParser<Fraction<R>>,
{
    Ok(ring_reader(field, leaf)?.build())
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::{
        domains::{
            finite_field::Zp,
            float::F64,
            integer::{Integer, Z},
            rational::Q,
            Ring,
        },
        error::{DomainError, ParseError},
        leaf::IntegerLiteral,
    };

    use super::{
        arithmetic_reader, checked_pow, float_reader, integer_reader, modular_reader, rational_reader,
        RingArithmetic, DEFAULT_MAX_EXPONENT,
    };

    #[test]
    fn integers() {
        let r = integer_reader().unwrap();
        assert_eq!(r.try_parse_str("2+3*4"), Ok(14.into()));
        assert_eq!(r.try_parse_str("(7 % 3)^10 - 2"), Ok((-1).into()));
        assert_eq!(r.try_parse_str("-7 % 3"), Ok((-1).into()));
        assert_eq!(r.try_parse_str("(-7) % 3"), Ok(2.into()));
        assert_eq!(r.try_parse_str("12/4/3"), Ok(1.into()));
        assert_eq!(r.try_parse_str("2^64"), Ok(Integer::from(2).pow(64)));
        assert_eq!(
            r.try_parse_str("7/2"),
            Err(ParseError::Domain(DomainError::NotDivisible))
        );
        assert_eq!(
            r.try_parse_str("2^-1"),
            Err(ParseError::Domain(DomainError::NegativeExponent))
        );
        assert_eq!(r.try_parse_str("(-1)^-3"), Ok((-1).into()));
        assert_eq!(
            r.try_parse_str("5 % 0"),
            Err(ParseError::Domain(DomainError::DivisionByZero))
        );
    }

    #[test]
    fn rationals() {
        let r = rational_reader().unwrap();
        assert_eq!(r.try_parse_str("1/3 + 2^-2"), Ok(Q.rational(7, 12).unwrap()));
        assert_eq!(r.try_parse_str("2^-1"), Ok(Q.rational(1, 2).unwrap()));
        assert_eq!(r.try_parse_str("[1/2]^3"), Ok(Q.rational(1, 8).unwrap()));
        assert_eq!(
            r.try_parse_str("1/0"),
            Err(ParseError::Domain(DomainError::DivisionByZero))
        );
        assert_eq!(
            r.try_parse_str("0^-1"),
            Err(ParseError::Domain(DomainError::DivisionByZero))
        );
        assert_eq!(
            r.try_parse_str("2^(1/2)"),
            Err(ParseError::Domain(DomainError::NotRepresentable {
                value: "1/2".to_owned()
            }))
        );
    }

    #[test]
    fn floats_and_modular() {
        let f = float_reader().unwrap();
        assert_eq!(f.try_parse_str("1.5 * 2 - 0.5"), Ok(F64::from(2.5)));
        assert_eq!(f.try_parse_str("2^-2"), Ok(F64::from(0.25)));

        let m = modular_reader(7).unwrap();
        let z = Zp::new(7).unwrap();
        assert_eq!(m.try_parse_str("3/5"), Ok(z.to_element(2)));
        assert_eq!(m.try_parse_str("-1"), Ok(z.to_element(6)));
        assert_eq!(m.try_parse_str("3^2*4"), Ok(z.one()));
        assert!(modular_reader(8).is_err());
    }

    #[test]
    fn exponent_limits() {
        assert_eq!(
            checked_pow(&Z, &2.into(), 1 << 40, DEFAULT_MAX_EXPONENT),
            Err(DomainError::ExponentTooLarge(1 << 40))
        );
        assert_eq!(checked_pow(&Z, &Integer::from(3), 0, 0), Ok(1.into()));
        assert_eq!(
            checked_pow(&Q, &Q.rational(1, 2).unwrap(), -4, 4),
            Ok(Q.rational(16, 1).unwrap())
        );

        let r = integer_reader().unwrap();
        assert_eq!(
            r.try_parse_str("3^4294967295"),
            Err(ParseError::Domain(DomainError::ExponentTooLarge(4294967295)))
        );
        assert_eq!(
            r.try_parse_str("1^-4294967296"),
            Err(ParseError::Domain(DomainError::ExponentTooLarge(-4294967296)))
        );
        assert_eq!(
            r.try_parse_str("2^1048576 % 7"),
            Ok(2.into())
        );

        let small = RingArithmetic::new(Z).with_max_exponent(64);
        assert_eq!(small.max_exponent(), 64);
        assert_eq!(
            RingArithmetic::new(Z).with_max_exponent(u64::MAX).max_exponent(),
            u32::MAX as u64
        );
        let r = arithmetic_reader(small, IntegerLiteral::new(Z)).unwrap().build();
        assert_eq!(r.try_parse_str("2^64"), Ok(Integer::from(2).pow(64)));
        assert_eq!(
            r.try_parse_str("2^65"),
            Err(ParseError::Domain(DomainError::ExponentTooLarge(65)))
        );
        assert_eq!(
            r.try_parse_str("(2^8)^-65"),
            Err(ParseError::Domain(DomainError::ExponentTooLarge(-65)))
        );
    }
}
