use pretty_assertions::assert_eq;
use ringparse::{
    domains::{
        integer::{Integer, Z},
        rational::{FractionField, Q},
        Field, Ring,
    },
    error::{DomainError, ParseError},
    leaf::{IntegerLiteral, LeafParser},
    poly::reader::UnivariatePolynomialReader,
    standard::{fraction_reader, rational_reader},
    tokenizer::Symbol,
};

#[test]
fn rational_round_trip() {
    let r = rational_reader().unwrap();
    for text in ["-7/12", "5", "0", "1/3", "-22/7"] {
        let v = r.try_parse_str(text).unwrap();
        assert_eq!(Q.printer(&v).to_string(), text);
        assert_eq!(r.try_parse_str(&Q.printer(&v).to_string()).unwrap(), v);
    }
    assert_eq!(
        Q.printer(&r.try_parse_str("-3/4 + 1/6").unwrap()).to_string(),
        "-7/12"
    );
}

#[test]
fn reduced_and_normalized() {
    let a = Q.to_element(6.into(), (-4).into()).unwrap();
    assert_eq!(a.numerator(), Integer::from(-3));
    assert_eq!(a.denominator(), Integer::from(2));
    assert_eq!(a, Q.rational(-3, 2).unwrap());

    let z = Q.to_element(0.into(), (-5).into()).unwrap();
    assert_eq!(z, Q.zero());
    assert_eq!(z.denominator(), Integer::from(1));

    assert_eq!(
        Q.to_element(1.into(), 0.into()),
        Err(DomainError::ZeroDenominator)
    );
    assert_eq!(Q.checked_inv(&Q.zero()), Err(DomainError::NotInvertible));
    assert_eq!(Q.inv(&a), Q.rational(-2, 3).unwrap());
    assert_eq!(Q.integral_part(&a), Integer::from(-2));
    assert_eq!(Q.fractional_part(&a), Q.rational(1, 2).unwrap());
}

#[test]
fn rational_functions() {
    let polynomials = UnivariatePolynomialReader::new(Q, "x", IntegerLiteral::new(Q)).unwrap();
    let field = FractionField::new(polynomials.ring().clone());

    let f = field.clone();
    let leaf = move |s: &[Symbol]| polynomials.parse_leaf(s).map(|p| f.to_element_numerator(p));
    let r = fraction_reader(field.clone(), leaf).unwrap();

    let v = r.try_parse_str("(x^2-1)/(x-1)").unwrap();
    assert_eq!(field.printer(&v).to_string(), "x+1");
    assert!(field.is_integral(&v));

    let w = r.try_parse_str("1/(x-1) + 1/(x+1)").unwrap();
    let expected = field
        .to_element(
            field.ring().monomial(Q.nth(&2.into()), 1),
            field.ring().monomial(Q.one(), 2) - field.ring().one(),
        )
        .unwrap();
    assert_eq!(w, expected);

    // denominators are monic
    let u = r.try_parse_str("x/(2*x+2)").unwrap();
    assert_eq!(u.denominator().lcoeff(), Q.one());
    assert_eq!(u.numerator().lcoeff(), Q.rational(1, 2).unwrap());

    assert_eq!(
        r.try_parse_str("1/(x-x)"),
        Err(ParseError::Domain(DomainError::DivisionByZero))
    );
    let x_plus_one = field.ring().monomial(Q.one(), 1) + field.ring().one();
    assert_eq!(
        r.try_parse_str("(x+1)^-1").unwrap(),
        field.inv(&field.to_element_numerator(x_plus_one))
    );
}

#[test]
fn integer_fractions() {
    let field = FractionField::new(Z);
    let r = fraction_reader(field.clone(), IntegerLiteral::new(field.clone())).unwrap();
    assert_eq!(r.try_parse_str("4/6").unwrap(), Q.rational(2, 3).unwrap());
}
