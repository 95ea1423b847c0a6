use std::{
    borrow::Cow,
    fmt::{Display, Error, Formatter, Write},
};

use crate::{error::DomainError, printer::PrintOptions};

use super::{
    integer::{Integer, IntegerRing, Z},
    EuclideanDomain, Field, Ring,
};

/// The field of rational numbers.
pub type Q = FractionField<IntegerRing>;
/// The field of rational numbers.
pub const Q: FractionField<IntegerRing> = FractionField::new(Z);
/// A rational number.
pub type Rational = Fraction<IntegerRing>;

/// The fraction field of `R`.
///
/// Every element is kept reduced: the numerator and denominator share no
/// non-unit factor and the denominator is normalized by
/// [FractionNormalization], so equal fractions are structurally equal.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct FractionField<R: Ring> {
    ring: R,
}

impl<R: Ring> FractionField<R> {
    pub const fn new(ring: R) -> FractionField<R> {
        FractionField { ring }
    }

    /// The ring of numerators and denominators.
    pub fn ring(&self) -> &R {
        &self.ring
    }
}

impl<R: EuclideanDomain + FractionNormalization> FractionField<R> {
    pub fn to_element_numerator(&self, numerator: R::Element) -> <Self as Ring>::Element {
        Fraction {
            numerator,
            denominator: self.ring.one(),
        }
    }

    /// Create the reduced fraction `numerator/denominator`.
    pub fn to_element(
        &self,
        numerator: R::Element,
        denominator: R::Element,
    ) -> Result<Fraction<R>, DomainError> {
        if R::is_zero(&denominator) {
            return Err(DomainError::ZeroDenominator);
        }

        Ok(self.reduce(numerator, denominator, true))
    }

    /// Normalize `numerator/denominator`, dividing out their gcd when `do_gcd` is set.
    /// The denominator must be non-zero.
    fn reduce(
        &self,
        mut numerator: R::Element,
        mut denominator: R::Element,
        do_gcd: bool,
    ) -> Fraction<R> {
        if R::is_zero(&numerator) {
            return self.zero();
        }

        if do_gcd {
            let g = self.ring.gcd(&numerator, &denominator);
            if !self.ring.is_one(&g) {
                numerator = self.ring.quot_rem(&numerator, &g).0;
                denominator = self.ring.quot_rem(&denominator, &g).0;
            }
        }

        let f = self.ring.get_normalization_factor(&denominator);

        if self.ring.is_one(&f) {
            Fraction {
                numerator,
                denominator,
            }
        } else {
            Fraction {
                numerator: self.ring.mul(&numerator, &f),
                denominator: self.ring.mul(&denominator, &f),
            }
        }
    }

    /// Divide `a` by `b`, failing when `b` is zero.
    pub fn checked_div(&self, a: &Fraction<R>, b: &Fraction<R>) -> Result<Fraction<R>, DomainError> {
        if Self::is_zero(b) {
            return Err(DomainError::DivisionByZero);
        }
        Ok(self.div(a, b))
    }

    /// Invert `a`, failing when `a` is zero.
    pub fn checked_inv(&self, a: &Fraction<R>) -> Result<Fraction<R>, DomainError> {
        if Self::is_zero(a) {
            return Err(DomainError::NotInvertible);
        }
        Ok(self.inv(a))
    }

    /// The quotient of the Euclidean division of the numerator by the denominator.
    /// For integers this rounds towards negative infinity: the integral part of `-7/2` is `-4`.
    pub fn integral_part(&self, a: &Fraction<R>) -> R::Element {
        self.ring.quot_rem(&a.numerator, &a.denominator).0
    }

    /// `a` minus its [integral part](FractionField::integral_part).
    pub fn fractional_part(&self, a: &Fraction<R>) -> Fraction<R> {
        self.decomposition(a).1
    }

    /// Split `a` into `q + r/d` where `q` is the integral part.
    pub fn decomposition(&self, a: &Fraction<R>) -> (R::Element, Fraction<R>) {
        let (q, r) = self.ring.quot_rem(&a.numerator, &a.denominator);
        // gcd(r, d) = gcd(n, d), so the remainder fraction is reduced already
        let rem = self.reduce(r, a.denominator.clone(), false);
        (q, rem)
    }

    /// Whether `a` has a unit denominator.
    pub fn is_integral(&self, a: &Fraction<R>) -> bool {
        self.ring.is_one(&a.denominator)
    }
}

impl<R: Ring> Display for FractionField<R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let inner = self.ring.to_string();
        if inner == "Z" {
            f.write_char('Q')
        } else {
            write!(f, "Frac({})", inner)
        }
    }
}

pub trait FractionNormalization: Ring {
    /// Get the factor that normalizes the element `a`.
    /// - For a field, this is the inverse of `a`.
    /// - For the integers, this is the sign of `a`.
    /// - For a polynomial ring, this is the normalization factor of the leading coefficient.
    fn get_normalization_factor(&self, a: &Self::Element) -> Self::Element;
}

impl FractionNormalization for Z {
    fn get_normalization_factor(&self, a: &Integer) -> Integer {
        if a.is_negative() {
            (-1).into()
        } else {
            1.into()
        }
    }
}

impl<T: Field> FractionNormalization for T {
    fn get_normalization_factor(&self, a: &Self::Element) -> Self::Element {
        self.inv(a)
    }
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Fraction<R: Ring> {
    numerator: R::Element,
    denominator: R::Element,
}

impl<R: Ring> Fraction<R> {
    pub fn numerator(&self) -> R::Element {
        self.numerator.clone()
    }

    pub fn denominator(&self) -> R::Element {
        self.denominator.clone()
    }

    pub fn numerator_ref(&self) -> &R::Element {
        &self.numerator
    }

    pub fn denominator_ref(&self) -> &R::Element {
        &self.denominator
    }
}

impl<R: EuclideanDomain + FractionNormalization> Ring for FractionField<R> {
    type Element = Fraction<R>;

    fn add(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        let r = &self.ring;

        if a.denominator == b.denominator {
            let num = r.add(&a.numerator, &b.numerator);
            return self.reduce(num, a.denominator.clone(), true);
        }

        let denom_gcd = r.gcd(&a.denominator, &b.denominator);

        let mut a_den_red = Cow::Borrowed(&a.denominator);
        let mut b_den_red = Cow::Borrowed(&b.denominator);

        if !r.is_one(&denom_gcd) {
            a_den_red = Cow::Owned(r.quot_rem(&a.denominator, &denom_gcd).0);
            b_den_red = Cow::Owned(r.quot_rem(&b.denominator, &denom_gcd).0);
        }

        let num1 = r.mul(&a.numerator, &b_den_red);
        let num2 = r.mul(&b.numerator, &a_den_red);
        let mut num = r.add(&num1, &num2);

        if R::is_zero(&num) {
            return self.zero();
        }

        let mut den = r.mul(b_den_red.as_ref(), &a.denominator);

        // a factor of the new numerator can only be shared with the common part of the denominators
        let g = r.gcd(&num, &denom_gcd);

        if !r.is_one(&g) {
            num = r.quot_rem(&num, &g).0;
            den = r.quot_rem(&den, &g).0;
        }

        self.reduce(num, den, false)
    }

    fn sub(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        self.add(a, &self.neg(b))
    }

    fn mul(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        let r = &self.ring;
        if R::is_zero(&a.numerator) || R::is_zero(&b.numerator) {
            return self.zero();
        }

        let gcd1 = r.gcd(&a.numerator, &b.denominator);
        let gcd2 = r.gcd(&a.denominator, &b.numerator);

        let (an, bd) = if r.is_one(&gcd1) {
            (Cow::Borrowed(&a.numerator), Cow::Borrowed(&b.denominator))
        } else {
            (
                Cow::Owned(r.quot_rem(&a.numerator, &gcd1).0),
                Cow::Owned(r.quot_rem(&b.denominator, &gcd1).0),
            )
        };

        let (ad, bn) = if r.is_one(&gcd2) {
            (Cow::Borrowed(&a.denominator), Cow::Borrowed(&b.numerator))
        } else {
            (
                Cow::Owned(r.quot_rem(&a.denominator, &gcd2).0),
                Cow::Owned(r.quot_rem(&b.numerator, &gcd2).0),
            )
        };

        self.reduce(r.mul(&an, &bn), r.mul(&ad, &bd), false)
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

    fn neg(&self, a: &Self::Element) -> Self::Element {
        Fraction {
            numerator: self.ring.neg(&a.numerator),
            denominator: a.denominator.clone(),
        }
    }

    fn zero(&self) -> Self::Element {
        Fraction {
            numerator: self.ring.zero(),
            denominator: self.ring.one(),
        }
    }

    fn one(&self) -> Self::Element {
        Fraction {
            numerator: self.ring.one(),
            denominator: self.ring.one(),
        }
    }

    #[inline]
    fn nth(&self, n: &Integer) -> Self::Element {
        Fraction {
            numerator: self.ring.nth(n),
            denominator: self.ring.one(),
        }
    }

    fn pow(&self, b: &Self::Element, e: u64) -> Self::Element {
        if e == 0 {
            return self.one();
        }

        self.reduce(
            self.ring.pow(&b.numerator, e),
            self.ring.pow(&b.denominator, e),
            false,
        )
    }

    fn is_zero(a: &Self::Element) -> bool {
        R::is_zero(&a.numerator)
    }

    fn is_one(&self, a: &Self::Element) -> bool {
        self.ring.is_one(&a.numerator) && self.ring.is_one(&a.denominator)
    }

    fn one_is_gcd_unit() -> bool {
        false
    }

    fn max_degree(&self, a: &Self::Element) -> u64 {
        self.ring
            .max_degree(&a.numerator)
            .max(self.ring.max_degree(&a.denominator))
    }

    fn try_div(&self, a: &Self::Element, b: &Self::Element) -> Option<Self::Element> {
        self.checked_div(a, b).ok()
    }

    fn fmt_display(
        &self,
        element: &Self::Element,
        opts: &PrintOptions,
        in_product: bool,
        f: &mut Formatter<'_>,
    ) -> Result<(), Error> {
        let has_denom = !self.ring.is_one(&element.denominator);

        self.ring.fmt_display(
            &element.numerator,
            opts,
            in_product || has_denom,
            f,
        )?;

        if has_denom {
            let den = format!(
                "{}",
                RingPrinterInProduct {
                    ring: &self.ring,
                    element: &element.denominator,
                    opts,
                }
            );

            f.write_char('/')?;
            if den.chars().all(|c| c.is_alphanumeric() || c == '_') {
                f.write_str(&den)?;
            } else {
                write!(f, "({})", den)?;
            }
        }

        Ok(())
    }
}

struct RingPrinterInProduct<'a, R: Ring> {
    ring: &'a R,
    element: &'a R::Element,
    opts: &'a PrintOptions,
}

impl<'a, R: Ring> Display for RingPrinterInProduct<'a, R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.ring.fmt_display(self.element, self.opts, true, f)
    }
}

impl Display for Fraction<IntegerRing> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Q.fmt_display(self, &PrintOptions::default(), false, f)
    }
}

impl<R: EuclideanDomain + FractionNormalization> EuclideanDomain for FractionField<R> {
    fn rem(&self, _: &Self::Element, _: &Self::Element) -> Self::Element {
        self.zero()
    }

    fn quot_rem(&self, a: &Self::Element, b: &Self::Element) -> (Self::Element, Self::Element) {
        (self.div(a, b), self.zero())
    }

    fn gcd(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        let gcd_num = self.ring.gcd(&a.numerator, &b.numerator);
        let gcd_den = self.ring.gcd(&a.denominator, &b.denominator);

        let d1 = self.ring.quot_rem(&a.denominator, &gcd_den).0;
        let lcm = self.ring.mul(&d1, &b.denominator);

        if R::is_zero(&gcd_num) {
            return self.zero();
        }
        self.reduce(gcd_num, lcm, false)
    }
}

impl<R: EuclideanDomain + FractionNormalization> Field for FractionField<R> {
    /// # Panics
    ///
    /// Panics when `b` is zero; see [FractionField::checked_div].
    fn div(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        self.mul(a, &self.inv(b))
    }

    fn div_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = self.div(a, b);
    }

    /// # Panics
    ///
    /// Panics when `a` is zero; see [FractionField::checked_inv].
    fn inv(&self, a: &Self::Element) -> Self::Element {
        if Self::is_zero(a) {
            panic!("Cannot invert zero");
        }

        let f = self.ring.get_normalization_factor(&a.numerator);

        Fraction {
            numerator: self.ring.mul(&a.denominator, &f),
            denominator: self.ring.mul(&a.numerator, &f),
        }
    }
}

impl Q {
    /// The rational number `numerator/denominator`.
    pub fn rational(&self, numerator: i64, denominator: i64) -> Result<Rational, DomainError> {
        self.to_element(numerator.into(), denominator.into())
    }
}
