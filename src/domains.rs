//! Defines core algebraic traits and data structures.
//!
//! The core trait is [Ring], which has two binary operations, addition and multiplication.
//! Each ring has an associated element type, that should not be confused with the ring type itself.
//! For example:
//! - The ring of integers [Z](type@integer::Z) has elements of type [Integer].
//! - The field of rational numbers [Q](type@rational::Q) has elements of type [Fraction](rational::Fraction).
//! - The prime field [Zp](finite_field::Zp) has elements of type [FiniteFieldElement](finite_field::FiniteFieldElement).
//! - The ring of polynomials [UnivariatePolynomialRing](crate::poly::univariate::UnivariatePolynomialRing)
//!   has elements of type [UnivariatePolynomial](crate::poly::univariate::UnivariatePolynomial).
//!
//! The elements do not implement arithmetic themselves; the ring does. The expression
//! readers of this crate only ever call the ring, which is what makes them generic.
//!
//! An extension of the ring trait is the [`EuclideanDomain`] trait, which adds the ability to compute remainders, quotients, and gcds.
//! Another extension is the [`Field`] trait, which adds the ability to divide and invert elements.
pub mod finite_field;
pub mod float;
pub mod integer;
pub mod rational;

use std::fmt::{Debug, Display, Error, Formatter};
use std::hash::Hash;

use integer::Integer;

use crate::printer::PrintOptions;

/// A ring is a set with two binary operations, addition and multiplication.
/// Examples of rings include the integers, rational numbers, and polynomials.
pub trait Ring: Clone + PartialEq + Eq + Hash + Debug + Display {
    /// The element of a ring. For example, the elements of the ring of integers [Z](type@integer::Z), `Z::Element`, are [Integer].
    type Element: Clone + PartialEq + Eq + Hash + Debug;

    fn add(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;
    fn sub(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;
    fn mul(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;
    fn add_assign(&self, a: &mut Self::Element, b: &Self::Element);
    fn sub_assign(&self, a: &mut Self::Element, b: &Self::Element);
    fn mul_assign(&self, a: &mut Self::Element, b: &Self::Element);
    fn neg(&self, a: &Self::Element) -> Self::Element;
    fn zero(&self) -> Self::Element;
    fn one(&self) -> Self::Element;
    /// Return the nth element by computing `n * 1`.
    fn nth(&self, n: &Integer) -> Self::Element;
    fn pow(&self, b: &Self::Element, e: u64) -> Self::Element;
    fn is_zero(a: &Self::Element) -> bool;
    fn is_one(&self, a: &Self::Element) -> bool;
    /// Should return `true` iff `gcd(1,x)` returns `1` for any `x`.
    fn one_is_gcd_unit() -> bool;

    /// An upper bound on the exponents of all variables in `a`. The exponents of a sum
    /// or product never exceed the sum of the bounds of its operands.
    fn max_degree(&self, _a: &Self::Element) -> u64 {
        0
    }

    /// Return the result of dividing `a` by `b`, if possible and if the result is unique.
    /// For example, in [Z](type@integer::Z), `4/2` is possible but `3/2` is not.
    /// Division by zero always yields `None`.
    fn try_div(&self, a: &Self::Element, b: &Self::Element) -> Option<Self::Element>;

    /// Write `element` to `f`. Implementations honour the `+` flag of the formatter,
    /// and wrap compound elements in parentheses when `in_product` is set.
    fn fmt_display(
        &self,
        element: &Self::Element,
        opts: &PrintOptions,
        in_product: bool,
        f: &mut Formatter<'_>,
    ) -> Result<(), Error>;

    /// Create a new printer for the given ring element that
    /// can be used in a [format!] macro.
    fn printer<'a>(&'a self, element: &'a Self::Element) -> RingPrinter<'a, Self> {
        RingPrinter::new(self, element)
    }
}

/// A Euclidean domain is a ring that supports division with remainder, quotients, and gcds.
///
/// The divisor of [rem](EuclideanDomain::rem) and [quot_rem](EuclideanDomain::quot_rem)
/// must be non-zero.
pub trait EuclideanDomain: Ring {
    fn rem(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;
    fn quot_rem(&self, a: &Self::Element, b: &Self::Element) -> (Self::Element, Self::Element);
    fn gcd(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;
}

/// A field is a ring that supports division and inversion.
///
/// The divisor of [div](Field::div) and the argument of [inv](Field::inv) must be non-zero;
/// exact fields panic otherwise.
pub trait Field: EuclideanDomain {
    fn div(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;
    fn div_assign(&self, a: &mut Self::Element, b: &Self::Element);
    fn inv(&self, a: &Self::Element) -> Self::Element;
}

/// Provides an interface for printing elements of a ring with optional customization,
/// suitable as an argument to [format!]. Internally, it will call [Ring::fmt_display].
pub struct RingPrinter<'a, R: Ring> {
    pub ring: &'a R,
    pub element: &'a R::Element,
    pub opts: PrintOptions,
    pub in_product: bool,
}

impl<'a, R: Ring> RingPrinter<'a, R> {
    pub fn new(ring: &'a R, element: &'a R::Element) -> RingPrinter<'a, R> {
        RingPrinter {
            ring,
            element,
            opts: PrintOptions::default(),
            in_product: false,
        }
    }

    pub fn with_options(mut self, opts: PrintOptions) -> RingPrinter<'a, R> {
        self.opts = opts;
        self
    }
}

impl<'a, R: Ring> Display for RingPrinter<'a, R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.ring
            .fmt_display(self.element, &self.opts, self.in_product, f)
    }
}
