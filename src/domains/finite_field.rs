use std::fmt::{Display, Error, Formatter, Write};

use crate::{error::ConfigError, printer::PrintOptions};

use super::{integer::Integer, EuclideanDomain, Field, Ring};

/// An element of a prime field, stored as its representative in `[0, p)`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct FiniteFieldElement(pub(crate) u64);

/// The field of integers modulo a prime `p < 2^63`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Zp {
    p: u64,
}

impl Zp {
    /// Create the field of integers modulo `p`. Fails when `p` is not a prime
    /// below `2^63`.
    pub fn new(p: u64) -> Result<Zp, ConfigError> {
        if p > i64::MAX as u64 || !is_prime_u64(p) {
            return Err(ConfigError::InvalidModulus(p));
        }
        Ok(Zp { p })
    }

    pub fn get_prime(&self) -> u64 {
        self.p
    }

    pub fn to_element(&self, a: u64) -> FiniteFieldElement {
        FiniteFieldElement(a % self.p)
    }

    pub fn from_element(&self, a: &FiniteFieldElement) -> u64 {
        a.0
    }

    /// The representative of `a` in `(-p/2, p/2]`.
    pub fn to_symmetric_integer(&self, a: &FiniteFieldElement) -> i64 {
        if a.0 > self.p / 2 {
            a.0 as i64 - self.p as i64
        } else {
            a.0 as i64
        }
    }
}

impl Display for Zp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Z_{}", self.p)
    }
}

#[inline]
fn mul_mod(a: u64, b: u64, p: u64) -> u64 {
    ((a as u128 * b as u128) % p as u128) as u64
}

#[inline]
fn pow_mod(mut b: u64, mut e: u64, p: u64) -> u64 {
    let mut r = 1 % p;
    while e > 0 {
        if e & 1 == 1 {
            r = mul_mod(r, b, p);
        }
        b = mul_mod(b, b, p);
        e >>= 1;
    }
    r
}

/// Deterministic Miller-Rabin test for 64-bit integers.
pub fn is_prime_u64(n: u64) -> bool {
    let w = if n < 341531 {
        [9345883071009581737].as_slice()
    } else if n < 1050535501 {
        [336781006125, 9639812373923155].as_slice()
    } else if n < 350269456337 {
        [
            4230279247111683200,
            14694767155120705706,
            16641139526367750375,
        ]
        .as_slice()
    } else {
        // shortest SPRP basis from Jim Sinclair for testing primality of u64
        [2, 325, 9375, 28178, 450775, 9780504, 1795265022].as_slice()
    };

    if n < 2 {
        return false;
    }

    if n % 2 == 0 {
        return n == 2;
    }

    let mut s = 0;
    let mut d = n - 1;
    while d % 2 == 0 {
        d /= 2;
        s += 1;
    }

    let neg_one = n - 1;

    'test: for a in w {
        let a = a % n;

        if a == 0 {
            continue;
        }

        let mut x = pow_mod(a, d, n);

        if x == 1 || x == neg_one {
            continue;
        }

        for _ in 0..s {
            x = mul_mod(x, x, n);

            if x == 1 {
                return false;
            }
            if x == neg_one {
                continue 'test;
            }
        }

        return false;
    }

    true
}

impl Ring for Zp {
    type Element = FiniteFieldElement;

    #[inline]
    fn add(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        // p < 2^63, so the sum cannot overflow
        let s = a.0 + b.0;
        FiniteFieldElement(if s >= self.p { s - self.p } else { s })
    }

    #[inline]
    fn sub(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        FiniteFieldElement(if a.0 >= b.0 {
            a.0 - b.0
        } else {
            a.0 + self.p - b.0
        })
    }

    #[inline]
    fn mul(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        FiniteFieldElement(mul_mod(a.0, b.0, self.p))
    }

    fn add_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = self.add(a, b);
    }

    fn sub_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = self.sub(a, b);
    }

    fn mul_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = self.mul(a, b);
    }

    #[inline]
    fn neg(&self, a: &Self::Element) -> Self::Element {
        if a.0 == 0 {
            *a
        } else {
            FiniteFieldElement(self.p - a.0)
        }
    }

    fn zero(&self) -> Self::Element {
        FiniteFieldElement(0)
    }

    fn one(&self) -> Self::Element {
        FiniteFieldElement(1)
    }

    fn nth(&self, n: &Integer) -> Self::Element {
        match n.quot_rem(&Integer::from(self.p)).1 {
            Integer::Natural(r) => FiniteFieldElement(r as u64),
            // the remainder is below p < 2^63
            Integer::Large(_) => unreachable!(),
        }
    }

    fn pow(&self, b: &Self::Element, e: u64) -> Self::Element {
        FiniteFieldElement(pow_mod(b.0, e, self.p))
    }

    fn is_zero(a: &Self::Element) -> bool {
        a.0 == 0
    }

    fn is_one(&self, a: &Self::Element) -> bool {
        a.0 == 1
    }

    fn one_is_gcd_unit() -> bool {
        true
    }

    fn try_div(&self, a: &Self::Element, b: &Self::Element) -> Option<Self::Element> {
        if b.0 == 0 {
            None
        } else {
            Some(self.div(a, b))
        }
    }

    fn fmt_display(
        &self,
        element: &Self::Element,
        _opts: &PrintOptions,
        _in_product: bool,
        f: &mut Formatter<'_>,
    ) -> Result<(), Error> {
        if f.sign_plus() {
            f.write_char('+')?;
        }
        write!(f, "{}", element.0)
    }
}

impl EuclideanDomain for Zp {
    fn rem(&self, _: &Self::Element, _: &Self::Element) -> Self::Element {
        self.zero()
    }

    fn quot_rem(&self, a: &Self::Element, b: &Self::Element) -> (Self::Element, Self::Element) {
        (self.div(a, b), self.zero())
    }

    fn gcd(&self, _: &Self::Element, _: &Self::Element) -> Self::Element {
        self.one()
    }
}

impl Field for Zp {
    fn div(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        self.mul(a, &self.inv(b))
    }

    fn div_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = self.div(a, b);
    }

    /// # Panics
    ///
    /// Panics when `a` is zero.
    fn inv(&self, a: &Self::Element) -> Self::Element {
        if a.0 == 0 {
            panic!("Cannot invert 0");
        }
        FiniteFieldElement(pow_mod(a.0, self.p - 2, self.p))
    }
}
