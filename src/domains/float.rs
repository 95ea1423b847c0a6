use std::{
    fmt::{self, Display, Error, Formatter, Write},
    hash::Hash,
};

use crate::printer::PrintOptions;

use super::{integer::Integer, EuclideanDomain, Field, Ring};

/// A field of floating point type `T`. For `f64` fields, use [`FloatField<F64>`].
///
/// Arithmetic is inexact; this field exists for callers that explicitly ask for
/// floating point values, for example with a decimal leaf parser.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FloatField<T> {
    rep: T,
}

impl<T> FloatField<T> {
    pub fn from_rep(rep: T) -> Self {
        FloatField { rep }
    }
}

impl FloatField<F64> {
    pub fn new() -> Self {
        FloatField { rep: (0.).into() }
    }
}

impl Default for FloatField<F64> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Display for FloatField<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("RR")
    }
}

/// A wrapper around `f64` that implements `Eq` and `Hash`.
/// All `NaN` values are considered equal, and `-0` is considered equal to `0`.
#[derive(Debug, Copy, Clone)]
pub struct F64(f64);

impl F64 {
    pub fn into_inner(self) -> f64 {
        self.0
    }
}

impl From<f64> for F64 {
    #[inline(always)]
    fn from(value: f64) -> Self {
        F64(value)
    }
}

impl PartialEq for F64 {
    fn eq(&self, other: &Self) -> bool {
        if self.0.is_nan() && other.0.is_nan() {
            true
        } else {
            self.0 == other.0
        }
    }
}

impl PartialOrd for F64 {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.0.partial_cmp(&other.0)
    }
}

impl Display for F64 {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if f.sign_plus() && self.0.is_sign_positive() {
            f.write_char('+')?;
        }
        write!(f, "{}", self.0)
    }
}

impl Eq for F64 {}

impl Hash for F64 {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        if self.0.is_nan() {
            state.write_u64(0x7ff8000000000000);
        } else if self.0 == 0. {
            state.write_u64(0);
        } else {
            state.write_u64(self.0.to_bits());
        }
    }
}

impl Ring for FloatField<F64> {
    type Element = F64;

    #[inline(always)]
    fn add(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        (a.0 + b.0).into()
    }

    #[inline(always)]
    fn sub(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        (a.0 - b.0).into()
    }

    #[inline(always)]
    fn mul(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        (a.0 * b.0).into()
    }

    #[inline(always)]
    fn add_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        a.0 += b.0;
    }

    #[inline(always)]
    fn sub_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        a.0 -= b.0;
    }

    #[inline(always)]
    fn mul_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        a.0 *= b.0;
    }

    #[inline(always)]
    fn neg(&self, a: &Self::Element) -> Self::Element {
        (-a.0).into()
    }

    #[inline]
    fn zero(&self) -> Self::Element {
        (0.).into()
    }

    #[inline]
    fn one(&self) -> Self::Element {
        (1.).into()
    }

    #[inline]
    fn nth(&self, n: &Integer) -> Self::Element {
        n.to_f64().into()
    }

    #[inline]
    fn pow(&self, b: &Self::Element, e: u64) -> Self::Element {
        if e <= i32::MAX as u64 {
            b.0.powi(e as i32).into()
        } else {
            b.0.powf(e as f64).into()
        }
    }

    #[inline]
    fn is_zero(a: &Self::Element) -> bool {
        a.0 == 0.
    }

    #[inline]
    fn is_one(&self, a: &Self::Element) -> bool {
        a.0 == 1.
    }

    fn one_is_gcd_unit() -> bool {
        true
    }

    fn try_div(&self, a: &Self::Element, b: &Self::Element) -> Option<Self::Element> {
        if b.0 == 0. {
            None
        } else {
            Some((a.0 / b.0).into())
        }
    }

    fn fmt_display(
        &self,
        element: &Self::Element,
        _opts: &PrintOptions,
        _in_product: bool,
        f: &mut Formatter<'_>,
    ) -> Result<(), Error> {
        Display::fmt(element, f)
    }
}

impl EuclideanDomain for FloatField<F64> {
    #[inline(always)]
    fn rem(&self, _a: &Self::Element, _b: &Self::Element) -> Self::Element {
        self.zero()
    }

    #[inline(always)]
    fn quot_rem(&self, a: &Self::Element, b: &Self::Element) -> (Self::Element, Self::Element) {
        ((a.0 / b.0).into(), self.zero())
    }

    #[inline(always)]
    fn gcd(&self, _a: &Self::Element, _b: &Self::Element) -> Self::Element {
        self.one()
    }
}

impl Field for FloatField<F64> {
    #[inline(always)]
    fn div(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        (a.0 / b.0).into()
    }

    #[inline(always)]
    fn div_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        a.0 /= b.0;
    }

    #[inline(always)]
    fn inv(&self, a: &Self::Element) -> Self::Element {
        (1. / a.0).into()
    }
}

#[cfg(test)]
mod test {
    use crate::domains::{Field, Ring};

    use super::{FloatField, F64};

    #[test]
    fn eq_and_display() {
        let f = FloatField::<F64>::new();
        assert_eq!(F64::from(f64::NAN), F64::from(f64::NAN));
        assert_eq!(F64::from(-0.), f.zero());
        assert_eq!(f.div(&F64::from(1.), &F64::from(4.)).to_string(), "0.25");
        assert_eq!(format!("{:+}", F64::from(2.5)), "+2.5");
        assert_eq!(f.try_div(&f.one(), &f.zero()), None);
        assert_eq!(f.pow(&F64::from(2.), 10), F64::from(1024.));
        assert_eq!(f.to_string(), "RR");
    }
}
