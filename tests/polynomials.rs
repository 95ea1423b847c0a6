use pretty_assertions::assert_eq;
use ringparse::{
    domains::{
        integer::{Integer, Z},
        rational::Q,
        Ring,
    },
    error::{ConfigError, DomainError, ParseError},
    leaf::IntegerLiteral,
    poly::reader::UnivariatePolynomialReader,
    printer::PrintOptions,
    standard::{integer_reader, rational_reader},
};

#[test]
fn normal_form() {
    let r = UnivariatePolynomialReader::new(Z, "x", IntegerLiteral::new(Z)).unwrap();

    let p = r.try_parse_str("x^2+3*x^2").unwrap();
    assert_eq!(p.terms().collect::<Vec<_>>(), vec![(2, &Integer::from(4))]);

    let z = r.try_parse_str("x-x").unwrap();
    assert!(z.is_zero());
    assert_eq!(z.nterms(), 0);
    assert_eq!(z.to_string(), "0");

    let p = r.try_parse_str("(x-1)*(x+1) + 1").unwrap();
    assert_eq!(p, r.try_parse_str("x^2").unwrap());
    assert_eq!(p.evaluate(&Integer::from(-3)), Integer::from(9));
}

#[test]
fn print_and_read_back() {
    let r = UnivariatePolynomialReader::new(Q, "x", rational_reader().unwrap()).unwrap();
    let p = r.try_parse_str("-3/4*x^3 + x/2 - 7").unwrap();

    for opts in [PrintOptions::default(), PrintOptions::spaced()] {
        let text = r.ring().printer(&p).with_options(opts).to_string();
        assert_eq!(r.try_parse_str(&text).unwrap(), p);
    }
    assert_eq!(
        r.ring().printer(&p).with_options(PrintOptions::spaced()).to_string(),
        "-3/4*x^3 + 1/2*x - 7"
    );
}

#[test]
fn two_variables() {
    let r = UnivariatePolynomialReader::new(Z, "x", IntegerLiteral::new(Z))
        .unwrap()
        .nested("y")
        .unwrap();

    let p = r.try_parse_str("(x+y)^2 - y^2").unwrap();
    // 2*x*y + x^2, with coefficients in x
    assert_eq!(p.degree(), Some(1));
    assert_eq!(p.coefficient(1).unwrap().to_string(), "2*x");
    assert_eq!(p.coefficient(0).unwrap().to_string(), "x^2");

    let text = p.to_string();
    assert_eq!(text, "2*x*y+x^2");
    assert_eq!(r.try_parse_str(&text).unwrap(), p);

    let q = r.try_parse_str("(x^2-1)*y^3 + (x+1)*y").unwrap();
    assert_eq!(r.try_parse_str(&q.to_string()).unwrap(), q);

    assert_eq!(
        r.try_parse_str("y/x"),
        Err(ParseError::Domain(DomainError::NotDivisible))
    );
    assert_eq!(
        r.try_parse_str("y^x"),
        Err(ParseError::Domain(DomainError::NotRepresentable { value: "x".into() }))
    );
}

#[test]
fn three_variables() {
    let r = UnivariatePolynomialReader::new(Z, "x", IntegerLiteral::new(Z))
        .unwrap()
        .nested("y")
        .unwrap()
        .nested("z")
        .unwrap();

    let p = r.try_parse_str("x*y*z + z - x*y*z").unwrap();
    assert_eq!(p.to_string(), "z");
    assert_eq!(r.try_parse_str("(x*y+1)^2*z").unwrap().nterms(), 1);

    let clash = UnivariatePolynomialReader::new(Z, "x", IntegerLiteral::new(Z))
        .unwrap()
        .nested("y")
        .unwrap()
        .nested("x");
    assert_eq!(
        clash.err(),
        Some(ConfigError::VariableClash { name: "x".into() })
    );
}

#[test]
fn exponents_through_coefficients() {
    let r = UnivariatePolynomialReader::new(Q, "x", rational_reader().unwrap()).unwrap();
    assert_eq!(r.try_parse_str("x^(4/2)").unwrap(), r.try_parse_str("x*x").unwrap());
    assert_eq!(
        r.try_parse_str("x^(1/2)"),
        Err(ParseError::Domain(DomainError::NotRepresentable { value: "1/2".into() }))
    );
    assert_eq!(r.try_parse_str("(2*x)^0").unwrap(), r.ring().one());
}

fn assert_send_sync<T: Send + Sync>(_: &T) {}

#[test]
fn shared_between_threads() {
    let integers = integer_reader().unwrap();
    let polynomials = UnivariatePolynomialReader::new(Z, "x", IntegerLiteral::new(Z))
        .unwrap()
        .nested("y")
        .unwrap();
    assert_send_sync(&integers);
    assert_send_sync(&polynomials);

    let results: Vec<_> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|n| {
                let (integers, polynomials) = (&integers, &polynomials);
                s.spawn(move || {
                    let v = integers.try_parse_str(&format!("{}^2 + 1", n)).unwrap();
                    let p = polynomials.try_parse_str(&format!("(x+y)^{} - x", n)).unwrap();
                    (v, p.degree())
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(
        results,
        vec![
            (Integer::from(1), Some(0)),
            (Integer::from(2), Some(1)),
            (Integer::from(5), Some(2)),
            (Integer::from(10), Some(3)),
        ]
    );
}
