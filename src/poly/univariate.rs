use std::{
    collections::BTreeMap,
    fmt::Write,
    ops::{Add, Mul, Neg, Sub},
    sync::Arc,
};

use crate::{
    conversion::{not_representable, Conversion},
    domains::{
        rational::FractionNormalization, EuclideanDomain, Field, Ring, RingPrinter,
    },
    error::DomainError,
    printer::PrintOptions,
};

use super::Variable;

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct UnivariatePolynomialRing<R: Ring> {
    ring: R,
    variable: Arc<Variable>,
}

impl<R: Ring> UnivariatePolynomialRing<R> {
    pub fn new(coeff_ring: R, variable: Arc<Variable>) -> UnivariatePolynomialRing<R> {
        UnivariatePolynomialRing {
            ring: coeff_ring,
            variable,
        }
    }

    pub fn new_from_poly(poly: &UnivariatePolynomial<R>) -> UnivariatePolynomialRing<R> {
        UnivariatePolynomialRing {
            ring: poly.ring.clone(),
            variable: poly.variable.clone(),
        }
    }

    pub fn coefficient_ring(&self) -> &R {
        &self.ring
    }

    pub fn variable(&self) -> &Arc<Variable> {
        &self.variable
    }

    pub fn constant(&self, coeff: R::Element) -> UnivariatePolynomial<R> {
        self.zero().constant(coeff)
    }

    /// The polynomial `coeff * x^exponent`.
    pub fn monomial(&self, coeff: R::Element, exponent: u64) -> UnivariatePolynomial<R> {
        self.zero().monomial(coeff, exponent)
    }
}

impl<R: Ring> std::fmt::Display for UnivariatePolynomialRing<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]", self.ring, self.variable)
    }
}

impl<R: Ring> Ring for UnivariatePolynomialRing<R> {
    type Element = UnivariatePolynomial<R>;

    fn add(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a + b
    }

    fn sub(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a - b
    }

    fn mul(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a * b
    }

    fn add_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        for (e, c) in &b.terms {
            a.add_term(*e, c);
        }
    }

    fn sub_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        for (e, c) in &b.terms {
            let n = a.ring.neg(c);
            a.add_term(*e, &n);
        }
    }

    fn mul_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = &*a * b;
    }

    fn neg(&self, a: &Self::Element) -> Self::Element {
        -a
    }

    fn zero(&self) -> Self::Element {
        UnivariatePolynomial::new(&self.ring, self.variable.clone())
    }

    fn one(&self) -> Self::Element {
        self.zero().one()
    }

    fn nth(&self, n: &crate::domains::integer::Integer) -> Self::Element {
        self.zero().constant(self.ring.nth(n))
    }

    fn pow(&self, b: &Self::Element, e: u64) -> Self::Element {
        b.pow(e)
    }

    fn is_zero(a: &Self::Element) -> bool {
        a.is_zero()
    }

    fn is_one(&self, a: &Self::Element) -> bool {
        a.is_one()
    }

    fn one_is_gcd_unit() -> bool {
        false
    }

    fn max_degree(&self, a: &Self::Element) -> u64 {
        a.terms
            .values()
            .map(|c| self.ring.max_degree(c))
            .fold(a.degree().unwrap_or(0), u64::max)
    }

    fn try_div(&self, a: &Self::Element, b: &Self::Element) -> Option<Self::Element> {
        a.divides(b)
    }

    fn fmt_display(
        &self,
        element: &Self::Element,
        opts: &PrintOptions,
        in_product: bool,
        f: &mut std::fmt::Formatter<'_>,
    ) -> Result<(), std::fmt::Error> {
        let mut body = String::new();
        element.write_terms(opts, &mut body)?;

        if in_product && element.nterms() > 1 {
            if f.sign_plus() {
                f.write_char('+')?;
            }
            write!(f, "({})", body)
        } else {
            if f.sign_plus() && !body.starts_with('-') {
                f.write_char('+')?;
            }
            f.write_str(&body)
        }
    }
}

impl<F: Field> EuclideanDomain for UnivariatePolynomialRing<F> {
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

impl<F: Field> FractionNormalization for UnivariatePolynomialRing<F> {
    /// The inverse of the leading coefficient, so that normalized denominators are monic.
    fn get_normalization_factor(&self, a: &Self::Element) -> Self::Element {
        if a.is_zero() {
            return self.one();
        }
        self.constant(self.ring.inv(&a.lcoeff()))
    }
}

/// Only constant polynomials have an integer value. The coefficient ring decides
/// whether the constant itself converts.
impl<R: Ring + Conversion<R::Element>> Conversion<UnivariatePolynomial<R>>
    for UnivariatePolynomialRing<R>
{
    fn to_int(&self, element: &UnivariatePolynomial<R>) -> Result<i64, DomainError> {
        if element.is_constant() {
            self.ring.to_int(&element.get_constant())
        } else {
            Err(not_representable(element))
        }
    }

    fn from_int(&self, n: i64) -> UnivariatePolynomial<R> {
        self.constant(self.ring.from_int(n))
    }
}

/// A sparse univariate polynomial in normal form.
///
/// The terms map exponents to coefficients. Zero coefficients are never stored, so
/// the zero polynomial has no terms and two equal polynomials have equal maps.
#[derive(Clone)]
pub struct UnivariatePolynomial<R: Ring> {
    terms: BTreeMap<u64, R::Element>,
    pub variable: Arc<Variable>,
    pub ring: R,
}

impl<R: Ring> std::fmt::Debug for UnivariatePolynomial<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if self.is_zero() {
            return write!(f, "[]");
        }
        let mut first = true;
        write!(f, "[ ")?;
        for (e, c) in &self.terms {
            if first {
                first = false;
            } else {
                write!(f, ", ")?;
            }
            write!(f, "{{ {:?}: {:?} }}", e, c)?;
        }
        write!(f, " ]")
    }
}

impl<R: Ring> std::fmt::Display for UnivariatePolynomial<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        UnivariatePolynomialRing::new_from_poly(self).fmt_display(
            self,
            &PrintOptions::default(),
            false,
            f,
        )
    }
}

impl<R: Ring> UnivariatePolynomial<R> {
    /// Constructs a zero polynomial. Instead of using this constructor,
    /// prefer to create new polynomials from existing ones, so that the
    /// variable and ring are inherited.
    #[inline]
    pub fn new(ring: &R, variable: Arc<Variable>) -> Self {
        Self {
            terms: BTreeMap::new(),
            ring: ring.clone(),
            variable,
        }
    }

    /// Constructs a zero polynomial, inheriting the ring and variable from `self`.
    #[inline]
    pub fn zero(&self) -> Self {
        Self::new(&self.ring, self.variable.clone())
    }

    #[inline]
    pub fn constant(&self, coeff: R::Element) -> Self {
        self.monomial(coeff, 0)
    }

    #[inline]
    pub fn one(&self) -> Self {
        self.constant(self.ring.one())
    }

    /// Constructs `coeff * x^exponent`, inheriting the ring and variable from `self`.
    pub fn monomial(&self, coeff: R::Element, exponent: u64) -> Self {
        let mut r = self.zero();
        if !R::is_zero(&coeff) {
            r.terms.insert(exponent, coeff);
        }
        r
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    #[inline]
    pub fn is_one(&self) -> bool {
        self.is_constant() && self.terms.get(&0).map_or(false, |c| self.ring.is_one(c))
    }

    /// Returns true if the polynomial has no terms of positive degree.
    #[inline]
    pub fn is_constant(&self) -> bool {
        self.degree().map_or(true, |d| d == 0)
    }

    /// The coefficient of `x^0`.
    pub fn get_constant(&self) -> R::Element {
        self.terms.get(&0).cloned().unwrap_or_else(|| self.ring.zero())
    }

    /// The highest exponent, or `None` for the zero polynomial.
    #[inline]
    pub fn degree(&self) -> Option<u64> {
        self.terms.keys().next_back().copied()
    }

    /// Get the leading coefficient, which is zero for the zero polynomial.
    pub fn lcoeff(&self) -> R::Element {
        self.terms
            .values()
            .next_back()
            .cloned()
            .unwrap_or_else(|| self.ring.zero())
    }

    pub fn coefficient(&self, exponent: u64) -> Option<&R::Element> {
        self.terms.get(&exponent)
    }

    /// The number of non-zero terms.
    #[inline]
    pub fn nterms(&self) -> usize {
        self.terms.len()
    }

    /// The terms in increasing order of the exponent.
    pub fn terms(&self) -> impl DoubleEndedIterator<Item = (u64, &R::Element)> {
        self.terms.iter().map(|(e, c)| (*e, c))
    }

    /// Add `coeff * x^exponent`, merging with an existing term and removing it
    /// when the sum vanishes.
    pub fn add_term(&mut self, exponent: u64, coeff: &R::Element) {
        if R::is_zero(coeff) {
            return;
        }

        match self.terms.get_mut(&exponent) {
            Some(c) => {
                self.ring.add_assign(c, coeff);
                if R::is_zero(c) {
                    self.terms.remove(&exponent);
                }
            }
            None => {
                self.terms.insert(exponent, coeff.clone());
            }
        }
    }

    /// Compute `self^pow` by repeated squaring.
    ///
    /// # Panics
    ///
    /// In debug builds, if the degree of the result overflows a `u64`. Readers check
    /// [Ring::max_degree] before calling this.
    pub fn pow(&self, mut pow: u64) -> Self {
        let mut x = self.clone();
        let mut y = self.one();
        while pow != 1 {
            if pow == 0 {
                return self.one();
            }
            if pow % 2 == 1 {
                y = &y * &x;
                pow -= 1;
            }

            x = &x * &x;
            pow /= 2;
        }

        x * &y
    }

    /// Multiply by `x^exp`.
    pub fn mul_exp(&self, exp: u64) -> Self {
        let mut r = self.zero();
        r.terms = self.terms.iter().map(|(e, c)| (e + exp, c.clone())).collect();
        r
    }

    /// Multiply every coefficient by `coeff`.
    pub fn mul_coeff(&self, coeff: &R::Element) -> Self {
        let mut r = self.zero();
        for (e, c) in &self.terms {
            r.add_term(*e, &self.ring.mul(c, coeff));
        }
        r
    }

    /// Divide every coefficient by `coeff`, if all of the divisions are exact.
    pub fn try_div_coeff(&self, coeff: &R::Element) -> Option<Self> {
        let mut r = self.zero();
        for (e, c) in &self.terms {
            r.terms.insert(*e, self.ring.try_div(c, coeff)?);
        }
        Some(r)
    }

    /// Return the quotient of `self / div` if the division is exact.
    /// Only requires exact division of coefficients, so it works over any integral domain.
    pub fn divides(&self, div: &Self) -> Option<Self> {
        let m = div.degree()?;
        let lc = div.lcoeff();

        let mut q = self.zero();
        let mut r = self.clone();
        while let Some(n) = r.degree() {
            if n < m {
                return None;
            }

            let qq = self.ring.try_div(&r.lcoeff(), &lc)?;
            r = &r - &div.mul_exp(n - m).mul_coeff(&qq);
            q.add_term(n - m, &qq);
        }

        Some(q)
    }

    /// Evaluate the polynomial at `x` with Horner's scheme.
    pub fn evaluate(&self, x: &R::Element) -> R::Element {
        let mut res = self.ring.zero();
        let mut last = match self.degree() {
            Some(d) => d,
            None => return res,
        };

        for (e, c) in self.terms.iter().rev() {
            if last > *e {
                let p = self.ring.pow(x, last - e);
                self.ring.mul_assign(&mut res, &p);
            }
            self.ring.add_assign(&mut res, c);
            last = *e;
        }

        if last > 0 {
            let p = self.ring.pow(x, last);
            self.ring.mul_assign(&mut res, &p);
        }

        res
    }

    /// Write the terms in decreasing order of the exponent, for example `3*x^2-x+5`.
    pub(crate) fn write_terms<W: Write>(&self, opts: &PrintOptions, out: &mut W) -> std::fmt::Result {
        if self.is_zero() {
            return out.write_char('0');
        }

        let mut first = true;
        for (e, c) in self.terms.iter().rev() {
            let mut term = String::new();
            let printer = RingPrinter {
                ring: &self.ring,
                element: c,
                opts: *opts,
                in_product: *e > 0,
            };

            if *e == 0 {
                if first {
                    write!(term, "{}", printer)?;
                } else {
                    write!(term, "{:+}", printer)?;
                }
            } else {
                if self.ring.is_one(c) {
                    if !first {
                        term.push('+');
                    }
                } else if self.ring.is_one(&self.ring.neg(c)) {
                    term.push('-');
                } else {
                    if first {
                        write!(term, "{}", printer)?;
                    } else {
                        write!(term, "{:+}", printer)?;
                    }
                    term.push(opts.multiplication_operator);
                }

                write!(term, "{}", self.variable)?;
                if *e > 1 {
                    write!(term, "^{}", e)?;
                }
            }

            if !first && opts.spaced_sums {
                // the term starts with its sign
                let (sign, rest) = term.split_at(1);
                write!(out, " {} {}", sign, rest)?;
            } else {
                out.write_str(&term)?;
            }

            first = false;
        }

        Ok(())
    }
}

impl<F: Field> UnivariatePolynomial<F> {
    /// Long division by a non-zero polynomial over a field.
    ///
    /// # Panics
    ///
    /// Panics when `div` is zero.
    pub fn quot_rem(&self, div: &Self) -> (Self, Self) {
        let Some(m) = div.degree() else {
            panic!("Cannot divide by the zero polynomial");
        };

        let u = self.ring.inv(&div.lcoeff());

        let mut q = self.zero();
        let mut r = self.clone();

        while let Some(n) = r.degree() {
            if n < m {
                break;
            }

            let qq = self.ring.mul(&r.lcoeff(), &u);
            r = &r - &div.mul_exp(n - m).mul_coeff(&qq);
            q.add_term(n - m, &qq);
        }

        (q, r)
    }

    /// Compute the univariate GCD using Euclid's algorithm. The result is normalized to 1.
    pub fn gcd(&self, b: &Self) -> Self {
        if self.is_zero() {
            return b.make_monic();
        }
        if b.is_zero() {
            return self.make_monic();
        }

        let mut c = self.clone();
        let mut d = b.clone();
        if c.degree() < d.degree() {
            std::mem::swap(&mut c, &mut d);
        }

        let mut r = c.quot_rem(&d).1;
        while !r.is_zero() {
            c = d;
            d = r;
            r = c.quot_rem(&d).1;
        }

        d.make_monic()
    }

    /// Divide by the leading coefficient.
    pub fn make_monic(&self) -> Self {
        if self.is_zero() {
            return self.clone();
        }
        let u = self.ring.inv(&self.lcoeff());
        self.mul_coeff(&u)
    }
}

impl<R: Ring> PartialEq for UnivariatePolynomial<R> {
    /// Constants are equal regardless of their variable.
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.terms == other.terms && (self.variable == other.variable || self.is_constant())
    }
}

impl<R: Ring> std::hash::Hash for UnivariatePolynomial<R> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.terms.hash(state);
        if !self.is_constant() {
            self.variable.hash(state);
        }
    }
}

impl<R: Ring> Eq for UnivariatePolynomial<R> {}

impl<'a, 'b, R: Ring> Add<&'a UnivariatePolynomial<R>> for &'b UnivariatePolynomial<R> {
    type Output = UnivariatePolynomial<R>;

    fn add(self, other: &'a UnivariatePolynomial<R>) -> Self::Output {
        debug_assert!(
            self.variable == other.variable || self.is_constant() || other.is_constant()
        );

        let (mut r, b) = if self.is_constant() && !other.is_constant() {
            (other.clone(), self)
        } else {
            (self.clone(), other)
        };

        for (e, c) in &b.terms {
            r.add_term(*e, c);
        }
        r
    }
}

impl<R: Ring> Add for UnivariatePolynomial<R> {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        &self + &other
    }
}

impl<'a, 'b, R: Ring> Sub<&'a UnivariatePolynomial<R>> for &'b UnivariatePolynomial<R> {
    type Output = UnivariatePolynomial<R>;

    fn sub(self, other: &'a UnivariatePolynomial<R>) -> Self::Output {
        self + &-other
    }
}

impl<R: Ring> Sub for UnivariatePolynomial<R> {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        &self - &other
    }
}

impl<'a, R: Ring> Neg for &'a UnivariatePolynomial<R> {
    type Output = UnivariatePolynomial<R>;

    fn neg(self) -> Self::Output {
        let mut r = self.clone();
        for c in r.terms.values_mut() {
            *c = self.ring.neg(c);
        }
        r
    }
}

impl<R: Ring> Neg for UnivariatePolynomial<R> {
    type Output = Self;

    fn neg(self) -> Self::Output {
        -&self
    }
}

impl<'a, 'b, R: Ring> Mul<&'a UnivariatePolynomial<R>> for &'b UnivariatePolynomial<R> {
    type Output = UnivariatePolynomial<R>;

    fn mul(self, rhs: &'a UnivariatePolynomial<R>) -> Self::Output {
        debug_assert!(self.variable == rhs.variable || self.is_constant() || rhs.is_constant());

        let mut res = if self.is_constant() && !rhs.is_constant() {
            rhs.zero()
        } else {
            self.zero()
        };

        for (e1, c1) in &self.terms {
            for (e2, c2) in &rhs.terms {
                res.add_term(e1 + e2, &self.ring.mul(c1, c2));
            }
        }

        res
    }
}

impl<'a, R: Ring> Mul<&'a UnivariatePolynomial<R>> for UnivariatePolynomial<R> {
    type Output = UnivariatePolynomial<R>;

    #[inline]
    fn mul(self, rhs: &'a UnivariatePolynomial<R>) -> Self::Output {
        &self * rhs
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;

    use crate::{
        conversion::Conversion,
        domains::{
            integer::{Integer, Z},
            rational::{FractionField, Q},
            EuclideanDomain, Ring,
        },
        poly::Variable,
        printer::PrintOptions,
    };

    use super::UnivariatePolynomialRing;

    fn x() -> Arc<Variable> {
        Arc::new(Variable::new("x").unwrap())
    }

    #[test]
    fn normal_form() {
        let r = UnivariatePolynomialRing::new(Z, x());
        let a = r.monomial(3.into(), 2);
        let b = r.monomial((-3).into(), 2);
        let s = r.add(&a, &b);
        assert!(s.is_zero());
        assert_eq!(s.degree(), None);
        assert_eq!(s.nterms(), 0);

        let p = r.add(&r.monomial(2.into(), 3), &r.constant(1.into()));
        assert_eq!(p.degree(), Some(3));
        assert_eq!(p.coefficient(3), Some(&Integer::from(2)));
        assert_eq!(p.coefficient(1), None);
        assert_eq!(p.evaluate(&2.into()), Integer::from(17));
    }

    #[test]
    fn multiplication_and_power() {
        let r = UnivariatePolynomialRing::new(Z, x());
        let p = r.add(&r.monomial(1.into(), 1), &r.one());
        let sq = r.pow(&p, 2);
        assert_eq!(sq.to_string(), "x^2+2*x+1");
        assert_eq!(r.pow(&p, 0), r.one());

        let d = r.sub(&r.monomial(1.into(), 2), &r.one());
        let m = r.sub(&r.monomial(1.into(), 1), &r.one());
        assert_eq!(r.try_div(&d, &m), Some(p.clone()));
        assert_eq!(r.try_div(&d, &r.monomial(2.into(), 1)), None);
        assert_eq!(r.try_div(&d, &r.zero()), None);
    }

    #[test]
    fn display() {
        let r = UnivariatePolynomialRing::new(Z, x());
        let p = r.add(
            &r.add(&r.monomial(3.into(), 2), &r.monomial((-1).into(), 1)),
            &r.constant(5.into()),
        );
        assert_eq!(p.to_string(), "3*x^2-x+5");
        assert_eq!(r.zero().to_string(), "0");

        let neg = r.neg(&p);
        assert_eq!(neg.to_string(), "-3*x^2+x-5");
        assert_eq!(
            format!("{}", r.printer(&neg).with_options(PrintOptions::spaced())),
            "-3*x^2 + x - 5"
        );
        assert_eq!(format!("{:+}", r.printer(&p)), "+3*x^2-x+5");

        let y = Arc::new(Variable::new("y").unwrap());
        let outer = UnivariatePolynomialRing::new(r.clone(), y);
        let nested = outer.add(&outer.monomial(p.clone(), 1), &outer.monomial(neg, 0));
        assert_eq!(nested.to_string(), "(3*x^2-x+5)*y-3*x^2+x-5");
    }

    #[test]
    fn euclidean_over_q() {
        let r = UnivariatePolynomialRing::new(Q, x());
        let c = |n: i64| Q.nth(&n.into());
        // (x-1)(x+2) and (x-1)(x-3)
        let a = r.add(&r.add(&r.monomial(c(1), 2), &r.monomial(c(1), 1)), &r.constant(c(-2)));
        let b = r.add(&r.add(&r.monomial(c(1), 2), &r.monomial(c(-4), 1)), &r.constant(c(3)));
        let g = r.gcd(&a, &b);
        assert_eq!(g, r.add(&r.monomial(c(1), 1), &r.constant(c(-1))));

        let (q, rem) = r.quot_rem(&a, &r.monomial(c(2), 1));
        let half = Q.rational(1, 2).unwrap();
        assert_eq!(q, r.add(&r.monomial(half.clone(), 1), &r.constant(half.clone())));
        assert_eq!(rem, r.constant(c(-2)));

        // rational functions have monic denominators
        let f = FractionField::new(r.clone());
        let e = f.to_element(a.clone(), b.mul_coeff(&c(2))).unwrap();
        assert_eq!(e.numerator(), r.add(&r.monomial(half, 1), &r.constant(c(1))));
        assert_eq!(e.denominator(), r.add(&r.monomial(c(1), 1), &r.constant(c(-3))));
    }

    #[test]
    fn ring_names_and_degree_bound() {
        let r = UnivariatePolynomialRing::new(Z, x());
        assert_eq!(r.to_string(), "Z[x]");
        assert_eq!(FractionField::new(r.clone()).to_string(), "Frac(Z[x])");
        assert_eq!(UnivariatePolynomialRing::new(Q, x()).to_string(), "Q[x]");

        let y = Arc::new(Variable::new("y").unwrap());
        let outer = UnivariatePolynomialRing::new(r.clone(), y);
        assert_eq!(outer.to_string(), "Z[x][y]");

        assert_eq!(r.max_degree(&r.zero()), 0);
        assert_eq!(r.max_degree(&r.monomial(1.into(), 7)), 7);
        // x^9*y + y^2
        let p = outer.add(
            &outer.monomial(r.monomial(1.into(), 9), 1),
            &outer.monomial(r.one(), 2),
        );
        assert_eq!(outer.max_degree(&p), 9);
    }

    #[test]
    fn conversion() {
        let r = UnivariatePolynomialRing::new(Z, x());
        assert_eq!(r.to_int(&r.constant(4.into())), Ok(4));
        assert_eq!(r.to_int(&r.zero()), Ok(0));
        assert!(r.to_int(&r.monomial(1.into(), 1)).is_err());
        assert_eq!(r.from_int(-3), r.constant((-3).into()));
    }
}
