use std::{
    cmp::Ordering,
    fmt::{Display, Error, Formatter, Write},
    ops::{Add, Mul, Neg, Sub},
    str::FromStr,
};

use rug::{ops::Pow, Complete, Integer as MultiPrecisionInteger};

use crate::printer::PrintOptions;

use super::{EuclideanDomain, Ring};

/// The integer ring.
pub type Z = IntegerRing;
/// The integer ring.
pub const Z: IntegerRing = IntegerRing::new();

/// The integer ring.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct IntegerRing;

impl Default for IntegerRing {
    fn default() -> Self {
        Self::new()
    }
}

impl IntegerRing {
    pub const fn new() -> IntegerRing {
        IntegerRing
    }
}

/// An arbitrary-precision integer. Values that fit in an `i64` are always
/// stored as [Integer::Natural], so that equality and hashing are structural.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Integer {
    Natural(i64),
    Large(MultiPrecisionInteger),
}

impl From<i64> for Integer {
    #[inline]
    fn from(value: i64) -> Self {
        Integer::Natural(value)
    }
}

impl From<i32> for Integer {
    #[inline]
    fn from(value: i32) -> Self {
        Integer::Natural(value as i64)
    }
}

impl From<u32> for Integer {
    #[inline]
    fn from(value: u32) -> Self {
        Integer::Natural(value as i64)
    }
}

impl From<u64> for Integer {
    #[inline]
    fn from(value: u64) -> Self {
        if value <= i64::MAX as u64 {
            Integer::Natural(value as i64)
        } else {
            Integer::Large(value.into())
        }
    }
}

impl From<i128> for Integer {
    #[inline]
    fn from(value: i128) -> Self {
        Integer::from_double(value)
    }
}

impl From<MultiPrecisionInteger> for Integer {
    /// Convert from a multi-precision integer to an Integer, potentially
    /// downcasting the number.
    #[inline]
    fn from(n: MultiPrecisionInteger) -> Self {
        if let Some(n) = n.to_i64() {
            Integer::Natural(n)
        } else {
            Integer::Large(n)
        }
    }
}

impl PartialEq<i64> for Integer {
    fn eq(&self, other: &i64) -> bool {
        matches!(self, Integer::Natural(n) if n == other)
    }
}

impl FromStr for Integer {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() <= 20 {
            if let Ok(n) = s.parse::<i64>() {
                return Ok(Integer::Natural(n));
            }
        }

        if let Ok(n) = s.parse::<MultiPrecisionInteger>() {
            Ok(Integer::from(n))
        } else {
            Err("Could not parse integer")
        }
    }
}

impl std::fmt::Debug for Integer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Natural(n) => std::fmt::Display::fmt(n, f),
            Self::Large(n) => std::fmt::Display::fmt(n, f),
        }
    }
}

impl Integer {
    pub fn new(num: i64) -> Integer {
        Integer::Natural(num)
    }

    #[inline]
    pub fn from_double(n: i128) -> Integer {
        if n >= i64::MIN as i128 && n <= i64::MAX as i128 {
            Integer::Natural(n as i64)
        } else {
            Integer::Large(MultiPrecisionInteger::from(n))
        }
    }

    pub fn to_multi_prec(&self) -> MultiPrecisionInteger {
        match self {
            Integer::Natural(n) => MultiPrecisionInteger::from(*n),
            Integer::Large(l) => l.clone(),
        }
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        matches!(self, Integer::Natural(0))
    }

    #[inline]
    pub fn is_one(&self) -> bool {
        matches!(self, Integer::Natural(1))
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        match self {
            Integer::Natural(n) => *n < 0,
            Integer::Large(r) => r.cmp0() == Ordering::Less,
        }
    }

    #[inline]
    pub fn zero() -> Integer {
        Integer::Natural(0)
    }

    #[inline]
    pub fn one() -> Integer {
        Integer::Natural(1)
    }

    #[inline]
    pub fn to_i64(&self) -> Option<i64> {
        match self {
            Integer::Natural(n) => Some(*n),
            Integer::Large(_) => None,
        }
    }

    pub fn to_f64(&self) -> f64 {
        match self {
            Integer::Natural(n) => *n as f64,
            Integer::Large(r) => r.to_f64(),
        }
    }

    pub fn abs(&self) -> Integer {
        if self.is_negative() {
            -self
        } else {
            self.clone()
        }
    }

    /// Raise to the power `e`.
    ///
    /// # Panics
    ///
    /// Panics when `e` does not fit in a `u32` and the base is not `0`, `1` or `-1`.
    pub fn pow(&self, e: u64) -> Integer {
        if e == 0 {
            return Integer::one();
        }

        match self {
            Integer::Natural(0) | Integer::Natural(1) => return self.clone(),
            Integer::Natural(-1) => {
                return if e % 2 == 0 {
                    Integer::one()
                } else {
                    self.clone()
                }
            }
            _ => {}
        }

        if e > u32::MAX as u64 {
            panic!("Power of exponentation is larger than 2^32: {}", e);
        }
        let e = e as u32;

        match self {
            Integer::Natural(n1) => {
                if let Some(pn) = n1.checked_pow(e) {
                    Integer::Natural(pn)
                } else if let Some(pn) = (*n1 as i128).checked_pow(e) {
                    Integer::from_double(pn)
                } else {
                    Integer::Large(MultiPrecisionInteger::from(*n1).pow(e))
                }
            }
            Integer::Large(r) => Integer::Large(r.clone().pow(e)),
        }
    }

    /// Euclidean division: the remainder is never negative.
    ///
    /// # Panics
    ///
    /// Panics when `b` is zero.
    pub fn quot_rem(&self, b: &Integer) -> (Integer, Integer) {
        if b.is_zero() {
            panic!("Cannot divide by zero");
        }

        match (self, b) {
            (Integer::Natural(aa), Integer::Natural(bb)) => {
                if let Some(q) = aa.checked_div_euclid(*bb) {
                    (Integer::Natural(q), Integer::Natural(aa.rem_euclid(*bb)))
                } else {
                    // i64::MIN / -1
                    (Integer::from_double(-(i64::MIN as i128)), Integer::zero())
                }
            }
            _ => {
                let (q, r) = self.to_multi_prec().div_rem_euc(b.to_multi_prec());
                (Integer::from(q), Integer::from(r))
            }
        }
    }

    /// The non-negative greatest common divisor.
    pub fn gcd(&self, b: &Integer) -> Integer {
        match (self, b) {
            (Integer::Natural(n1), Integer::Natural(n2)) => {
                let mut a = n1.unsigned_abs();
                let mut b = n2.unsigned_abs();
                while b != 0 {
                    (a, b) = (b, a % b);
                }
                Integer::from(a)
            }
            (Integer::Natural(n1), Integer::Large(r2)) | (Integer::Large(r2), Integer::Natural(n1)) => {
                Integer::from(MultiPrecisionInteger::from(*n1).gcd(r2))
            }
            (Integer::Large(r1), Integer::Large(r2)) => Integer::from(r1.clone().gcd(r2)),
        }
    }

    /// Compute the least common multiple of two integers.
    pub fn lcm(&self, b: &Integer) -> Integer {
        let g = self.gcd(b);
        if g.is_zero() {
            Integer::zero()
        } else {
            (&self.quot_rem(&g).0 * b).abs()
        }
    }
}

impl Display for Integer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if f.sign_plus() && !self.is_negative() {
            f.write_char('+')?;
        }

        match self {
            Integer::Natural(n) => write!(f, "{}", n),
            Integer::Large(r) => write!(f, "{}", r),
        }
    }
}

impl Display for IntegerRing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_char('Z')
    }
}

impl PartialOrd for Integer {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Integer {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match (self, other) {
            (Integer::Natural(n1), Integer::Natural(n2)) => n1.cmp(n2),
            (Integer::Natural(n1), Integer::Large(n2)) => n2
                .partial_cmp(n1)
                .map(|x| x.reverse())
                .unwrap_or(Ordering::Equal),
            (Integer::Large(n1), Integer::Natural(n2)) => {
                n1.partial_cmp(n2).unwrap_or(Ordering::Equal)
            }
            (Integer::Large(n1), Integer::Large(n2)) => n1.cmp(n2),
        }
    }
}

impl Ring for IntegerRing {
    type Element = Integer;

    #[inline]
    fn add(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a + b
    }

    #[inline]
    fn sub(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a - b
    }

    #[inline]
    fn mul(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a * b
    }

    #[inline]
    fn add_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = &*a + b;
    }

    #[inline]
    fn sub_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = &*a - b;
    }

    #[inline]
    fn mul_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = &*a * b;
    }

    #[inline]
    fn neg(&self, a: &Self::Element) -> Self::Element {
        -a
    }

    #[inline]
    fn zero(&self) -> Self::Element {
        Integer::zero()
    }

    #[inline]
    fn one(&self) -> Self::Element {
        Integer::one()
    }

    #[inline]
    fn nth(&self, n: &Integer) -> Self::Element {
        n.clone()
    }

    #[inline]
    fn pow(&self, b: &Self::Element, e: u64) -> Self::Element {
        b.pow(e)
    }

    #[inline]
    fn is_zero(a: &Self::Element) -> bool {
        a.is_zero()
    }

    #[inline]
    fn is_one(&self, a: &Self::Element) -> bool {
        a.is_one()
    }

    fn one_is_gcd_unit() -> bool {
        true
    }

    fn try_div(&self, a: &Self::Element, b: &Self::Element) -> Option<Self::Element> {
        if b.is_zero() {
            return None;
        }

        let (q, r) = a.quot_rem(b);
        if r.is_zero() {
            Some(q)
        } else {
            None
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

impl EuclideanDomain for IntegerRing {
    fn rem(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a.quot_rem(b).1
    }

    fn quot_rem(&self, a: &Self::Element, b: &Self::Element) -> (Self::Element, Self::Element) {
        a.quot_rem(b)
    }

    fn gcd(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a.gcd(b)
    }
}

impl<'a, 'b> Add<&'b Integer> for &'a Integer {
    type Output = Integer;

    #[inline(always)]
    fn add(self, rhs: &'b Integer) -> Integer {
        match (self, rhs) {
            (Integer::Natural(n1), Integer::Natural(n2)) => match n1.checked_add(*n2) {
                Some(num) => Integer::Natural(num),
                None => Integer::from_double(*n1 as i128 + *n2 as i128),
            },
            (Integer::Natural(n1), Integer::Large(r2)) | (Integer::Large(r2), Integer::Natural(n1)) => {
                Integer::from(MultiPrecisionInteger::from(*n1) + r2)
            }
            (Integer::Large(r1), Integer::Large(r2)) => Integer::from((r1 + r2).complete()),
        }
    }
}

impl<'a, 'b> Sub<&'b Integer> for &'a Integer {
    type Output = Integer;

    #[inline(always)]
    fn sub(self, rhs: &'b Integer) -> Integer {
        match (self, rhs) {
            (Integer::Natural(n1), Integer::Natural(n2)) => match n1.checked_sub(*n2) {
                Some(num) => Integer::Natural(num),
                None => Integer::from_double(*n1 as i128 - *n2 as i128),
            },
            (Integer::Natural(n1), Integer::Large(r2)) => {
                Integer::from(MultiPrecisionInteger::from(*n1) - r2)
            }
            (Integer::Large(r1), Integer::Natural(n2)) => {
                Integer::from(r1.clone() - MultiPrecisionInteger::from(*n2))
            }
            (Integer::Large(r1), Integer::Large(r2)) => Integer::from((r1 - r2).complete()),
        }
    }
}

impl<'a, 'b> Mul<&'b Integer> for &'a Integer {
    type Output = Integer;

    #[inline(always)]
    fn mul(self, rhs: &'b Integer) -> Integer {
        match (self, rhs) {
            (Integer::Natural(n1), Integer::Natural(n2)) => match n1.checked_mul(*n2) {
                Some(num) => Integer::Natural(num),
                None => Integer::from_double(*n1 as i128 * *n2 as i128),
            },
            (Integer::Natural(n1), Integer::Large(r2)) | (Integer::Large(r2), Integer::Natural(n1)) => {
                Integer::from(MultiPrecisionInteger::from(*n1) * r2)
            }
            (Integer::Large(r1), Integer::Large(r2)) => Integer::from((r1 * r2).complete()),
        }
    }
}

macro_rules! owned_bin_op {
    ($op: ident, $f: ident) => {
        impl $op<Integer> for Integer {
            type Output = Integer;

            #[inline(always)]
            fn $f(self, rhs: Integer) -> Integer {
                (&self).$f(&rhs)
            }
        }

        impl<'a> $op<&'a Integer> for Integer {
            type Output = Integer;

            #[inline(always)]
            fn $f(self, rhs: &'a Integer) -> Integer {
                (&self).$f(rhs)
            }
        }

        impl<'a> $op<Integer> for &'a Integer {
            type Output = Integer;

            #[inline(always)]
            fn $f(self, rhs: Integer) -> Integer {
                self.$f(&rhs)
            }
        }
    };
}

owned_bin_op!(Add, add);
owned_bin_op!(Sub, sub);
owned_bin_op!(Mul, mul);

impl<'a> Neg for &'a Integer {
    type Output = Integer;

    #[inline]
    fn neg(self) -> Self::Output {
        match self {
            Integer::Natural(n) => match n.checked_neg() {
                Some(neg) => Integer::Natural(neg),
                None => Integer::from_double(-(*n as i128)),
            },
            Integer::Large(r) => Integer::from(r.clone().neg()),
        }
    }
}

impl Neg for Integer {
    type Output = Integer;

    #[inline]
    fn neg(self) -> Self::Output {
        -&self
    }
}

#[cfg(test)]
mod test {
    use std::ops::{Add, Mul, Sub};

    use crate::domains::{EuclideanDomain, Ring};

    use super::{Integer, Z};

    #[test]
    fn binary_ops() {
        let a = Integer::from(5);
        let b: Integer = 7.into();

        macro_rules! try_variants {
            ($a: expr, $b: expr, $res: expr, $op: tt) => {
                assert_eq!($a.clone().$op(&$b), $res);
                assert_eq!($a.clone().$op($b.clone()), $res);
                assert_eq!((&$a).$op($b.clone()), $res);
                assert_eq!((&$a).$op(&$b), $res);
            };
        }

        try_variants!(a, b, Integer::from(12), add);
        try_variants!(a, b, Integer::from(-2), sub);
        try_variants!(a, b, Integer::from(35), mul);

        let a = Integer::from(5123123132i64).pow(5);
        let b: Integer = Integer::from(-312223132i64).pow(5);

        try_variants!(
            a,
            b,
            "3529178341193418202448766865967598093745792000000"
                .parse::<Integer>()
                .unwrap(),
            add
        );
        try_variants!(
            a,
            b,
            "3529184275300451286008027827753913822719081764864"
                .parse::<Integer>()
                .unwrap(),
            sub
        );
    }

    #[test]
    fn promotion() {
        let max = Integer::from(i64::MAX);
        let r = &max + &Integer::one();
        assert!(matches!(r, Integer::Large(_)));
        assert_eq!(r.to_string(), "9223372036854775808");

        // the result fits again, so it is stored as a natural number
        let back = &r - &Integer::one();
        assert_eq!(back, Integer::Natural(i64::MAX));

        let min = Integer::from(i64::MIN);
        assert_eq!((-&min).to_string(), "9223372036854775808");
        assert_eq!(min.quot_rem(&Integer::from(-1)).0.to_string(), "9223372036854775808");
    }

    #[test]
    fn euclidean() {
        let (q, r) = Z.quot_rem(&Integer::from(-7), &Integer::from(2));
        assert_eq!(q, Integer::from(-4));
        assert_eq!(r, Integer::from(1));

        assert_eq!(Z.gcd(&Integer::from(-12), &Integer::from(18)), Integer::from(6));
        assert_eq!(Z.gcd(&Integer::zero(), &Integer::zero()), Integer::zero());
        assert_eq!(Integer::from(4).lcm(&Integer::from(-6)), Integer::from(12));

        assert_eq!(Z.try_div(&Integer::from(12), &Integer::from(4)), Some(Integer::from(3)));
        assert_eq!(Z.try_div(&Integer::from(3), &Integer::from(2)), None);
        assert_eq!(Z.try_div(&Integer::from(3), &Integer::zero()), None);
    }

    #[test]
    fn display() {
        assert_eq!(format!("{:+}", Integer::from(3)), "+3");
        assert_eq!(format!("{:+}", Integer::from(-3)), "-3");
        assert_eq!(format!("{}", Z.printer(&Integer::from(12))), "12");
        assert_eq!(Integer::from(-2).pow(3), Integer::from(-8));
        assert_eq!(Integer::from(-1).pow(u64::MAX), Integer::from(-1));
    }
}
