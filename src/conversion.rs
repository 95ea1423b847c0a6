//! Convert between machine integers and ring elements.
//!
//! The polynomial reader reads exponents as plain integers and folds small integer
//! literals into ring elements. Both directions go through a [Conversion], which is
//! chosen per coefficient ring. The rings of this crate implement it for their own
//! elements. Polynomial rings convert only their constants and delegate to the
//! coefficient ring, which is what lets nested polynomial readers read exponents.

use crate::{
    domains::{
        finite_field::{FiniteFieldElement, Zp},
        float::{FloatField, F64},
        integer::{Integer, IntegerRing},
        rational::{Fraction, FractionField, FractionNormalization},
        EuclideanDomain, Ring,
    },
    error::DomainError,
};

/// A two-way mapping between `i64` and elements of type `E`.
pub trait Conversion<E> {
    /// Convert to an `i64`, failing when the element has no integer value or
    /// does not fit.
    fn to_int(&self, element: &E) -> Result<i64, DomainError>;
    fn from_int(&self, n: i64) -> E;

    fn can_convert_to_int(&self, element: &E) -> bool {
        self.to_int(element).is_ok()
    }
}

pub(crate) fn not_representable(value: impl ToString) -> DomainError {
    DomainError::NotRepresentable {
        value: value.to_string(),
    }
}

impl Conversion<Integer> for IntegerRing {
    fn to_int(&self, element: &Integer) -> Result<i64, DomainError> {
        element.to_i64().ok_or_else(|| not_representable(element))
    }

    fn from_int(&self, n: i64) -> Integer {
        Integer::Natural(n)
    }
}

impl<R> Conversion<Fraction<R>> for FractionField<R>
where
    R: EuclideanDomain + FractionNormalization + Conversion<R::Element>,
{
    fn to_int(&self, element: &Fraction<R>) -> Result<i64, DomainError> {
        if !self.is_integral(element) {
            return Err(not_representable(self.printer(element)));
        }
        self.ring().to_int(element.numerator_ref())
    }

    fn from_int(&self, n: i64) -> Fraction<R> {
        self.to_element_numerator(self.ring().from_int(n))
    }
}

impl Conversion<F64> for FloatField<F64> {
    fn to_int(&self, element: &F64) -> Result<i64, DomainError> {
        let v = element.into_inner();
        // i64::MAX is not representable as f64, so compare against 2^63
        if v.fract() == 0. && v >= -9223372036854775808. && v < 9223372036854775808. {
            Ok(v as i64)
        } else {
            Err(not_representable(element))
        }
    }

    fn from_int(&self, n: i64) -> F64 {
        (n as f64).into()
    }
}

impl Conversion<FiniteFieldElement> for Zp {
    /// The symmetric representative, so that `p - 1` converts to `-1`.
    fn to_int(&self, element: &FiniteFieldElement) -> Result<i64, DomainError> {
        Ok(self.to_symmetric_integer(element))
    }

    fn from_int(&self, n: i64) -> FiniteFieldElement {
        self.nth(&n.into())
    }
}

#[cfg(test)]
mod test {
    use crate::{
        domains::{
            finite_field::Zp,
            float::{FloatField, F64},
            integer::{Integer, Z},
            rational::Q,
            Ring,
        },
        error::DomainError,
    };

    use super::Conversion;

    #[test]
    fn integers() {
        assert_eq!(Z.to_int(&Integer::from(-5)), Ok(-5));
        let big = Integer::from(i64::MAX).pow(2);
        assert!(!Z.can_convert_to_int(&big));
        assert_eq!(Z.from_int(7), Integer::from(7));
    }

    #[test]
    fn fractions() {
        assert_eq!(Q.to_int(&Q.rational(6, 3).unwrap()), Ok(2));
        assert_eq!(
            Q.to_int(&Q.rational(1, 3).unwrap()),
            Err(DomainError::NotRepresentable {
                value: "1/3".to_owned()
            })
        );
        assert_eq!(Q.from_int(-4), Q.nth(&Integer::from(-4)));
    }

    #[test]
    fn floats_and_modular() {
        let f = FloatField::<F64>::new();
        assert_eq!(f.to_int(&F64::from(3.)), Ok(3));
        assert!(f.to_int(&F64::from(3.5)).is_err());
        assert!(f.to_int(&F64::from(1e300)).is_err());

        let z = Zp::new(7).unwrap();
        assert_eq!(z.to_int(&z.from_int(-2)), Ok(-2));
        assert_eq!(z.to_int(&z.from_int(10)), Ok(3));
    }
}
