// SPDX: CC0-1.0

//! Sampling functions of `x` over a domain.

use graph_calc::{sample::try_sample_at, sample_at, sample_sequence, Domain, Function, Point};
use proptest::prelude::*;

#[test]
fn identity_has_201_points() {
    let points = sample_sequence("x", -10.0, 10.0, 0.1);
    assert_eq!(points.len(), 201);
    for p in &points {
        assert_eq!(p.y, p.x);
    }
    assert_eq!(points.len(), Domain::default().len());
}

#[test]
fn square_at_integer_points() {
    let points: Vec<(f64, f64)> = sample_sequence("x*x", -2.0, 2.0, 1.0)
        .into_iter()
        .map(|Point { x, y }| (x, y))
        .collect();
    assert_eq!(
        points,
        [(-2.0, 4.0), (-1.0, 1.0), (0.0, 0.0), (1.0, 1.0), (2.0, 4.0)]
    );
}

#[test]
fn nonsense_is_zero() {
    assert_eq!(sample_at("nonsense(((", 5.0), 0.0);
    assert!(try_sample_at("nonsense(((", 5.0).is_err());
}

#[test]
fn scientific_functions() {
    let y = sample_at("sqrt(x) + ln(e) + log(100) + abs(-x)", 4.0);
    assert!((y - 9.0).abs() < 1e-12);
    let y = sample_at("cos(pi * x)", 1.0);
    assert!((y + 1.0).abs() < 1e-12);
}

#[test]
fn empty_domains_give_empty_sequences() {
    assert!(sample_sequence("x", 1.0, 0.0, 0.1).is_empty());
    assert!(sample_sequence("x", 0.0, 1.0, 0.0).is_empty());
    assert!(sample_sequence("x", 0.0, 1.0, -1.0).is_empty());
}

#[test]
fn exponent_literals_are_numbers() {
    assert_eq!(sample_at("1e3*x", 2.0), 2000.0);
    assert_eq!(sample_at("2.5e-1", 0.0), 0.25);
}

#[test]
fn huge_domains_are_refused() {
    assert!(sample_sequence("x", 0.0, 1e17, 1.0).is_empty());
    let dense = Domain {
        start: 0.0,
        end: Domain::MAX_POINTS as f64,
        step: 1.0,
    };
    assert!(dense.is_empty());
}

proptest! {
    #[test]
    fn polynomial_matches_direct_evaluation(x in -1e6..1e6f64) {
        let expected = x * x - 3.0 * x + 2.0;
        prop_assert_eq!(sample_at("x * x - 3 * x + 2", x), expected);
    }

    #[test]
    fn compiled_and_one_shot_agree(x in -100.0..100.0f64) {
        let mut fun = Function::compile("x ^ 3 / (1 + x ^ 2)").unwrap();
        prop_assert_eq!(fun.at(x), sample_at("x ^ 3 / (1 + x ^ 2)", x));
    }

    #[test]
    fn sampling_is_deterministic(
        start in -50.0..50.0f64,
        len in 0.0..20.0f64,
        step in 0.05..2.0f64,
    ) {
        let a = sample_sequence("sin(x) * x - 1 / x", start, start + len, step);
        let b = sample_sequence("sin(x) * x - 1 / x", start, start + len, step);
        prop_assert_eq!(a.len(), b.len());
        for (p, q) in a.iter().zip(&b) {
            prop_assert_eq!(p.x.to_bits(), q.x.to_bits());
            prop_assert_eq!(p.y.to_bits(), q.y.to_bits());
        }
        if let Some(last) = a.last() {
            prop_assert!(last.x <= start + len + step * 1e-6);
        }
    }

    #[test]
    fn arbitrary_text_never_panics(src in "\\PC{0,24}", x in -10.0..10.0f64) {
        let _ = sample_at(&src, x);
    }
}
