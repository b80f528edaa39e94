// SPDX: CC0-1.0

//! Evaluating a single-variable function over a range of `x`.
//!
//! The free variable is bound in the identifier table rather than pasted
//! into the source text, so an `x` inside another name (`exp`, `max`) is
//! never touched.

use crate::{
    eval::{self, EvalErr, Ident, Idents, Program},
    lex::Lexer,
    parse::{self, ParseErr},
    stdlib::{self, X},
    Domain, Number, Point,
};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum SampleErr {
    #[error("parse error: {0}")]
    Parse(#[from] ParseErr),
    #[error("evaluation error: {0}")]
    Eval(#[from] EvalErr),
}

/// An expression in `x`, compiled once and evaluated at any number of
/// points.
#[derive(Debug)]
pub struct Function {
    src: Arc<String>,
    prog: Program,
    idents: Idents,
    stack: Vec<Number>,
}

impl Function {
    pub fn compile(src: impl Into<String>) -> Result<Self, ParseErr> {
        Self::with_idents(Arc::new(src.into()), stdlib::standard_idents())
    }

    /// Compiles `src` against a caller-supplied identifier table. Any
    /// existing binding of `x` is replaced by the free variable.
    pub fn with_idents(src: Arc<String>, mut idents: Idents) -> Result<Self, ParseErr> {
        idents.insert(X.into(), Ident::Var(None));
        let prog = parse::parse(Lexer::new(&src), &idents)?;
        Ok(Self {
            src,
            prog,
            idents,
            stack: Vec::new(),
        })
    }

    pub fn src(&self) -> Arc<String> {
        Arc::clone(&self.src)
    }

    pub fn program(&self) -> &Program {
        &self.prog
    }

    pub fn idents(&self) -> &Idents {
        &self.idents
    }

    pub fn try_at(&mut self, x: Number) -> Result<Number, EvalErr> {
        self.idents.insert(X.into(), Ident::Var(Some(x)));
        eval::eval(&self.prog, &self.idents, &mut self.stack)
    }

    /// Like [`Function::try_at`], but a failed evaluation yields 0.
    pub fn at(&mut self, x: Number) -> Number {
        self.try_at(x).unwrap_or_else(|err| {
            log::debug!("f({x}) = {} failed: {err}", self.src);
            0.0
        })
    }

    pub fn sample(&mut self, domain: &Domain) -> Vec<Point<Number>> {
        domain.values().map(|x| Point { x, y: self.at(x) }).collect()
    }
}

/// Evaluates `expression` with the free variable bound to `x`.
pub fn try_sample_at(expression: &str, x: Number) -> Result<Number, SampleErr> {
    Ok(Function::compile(expression)?.try_at(x)?)
}

/// Evaluates `expression` with the free variable bound to `x`. Anything
/// that goes wrong yields 0.
pub fn sample_at(expression: &str, x: Number) -> Number {
    try_sample_at(expression, x).unwrap_or_else(|err| {
        log::debug!("f({x}) = {expression} failed: {err}");
        0.0
    })
}

/// Samples `expression` at `start, start + step, ..., end` (inclusive). Each
/// point fails soft to `y = 0`, as with [`sample_at`].
pub fn sample_sequence(
    expression: &str,
    start: Number,
    end: Number,
    step: Number,
) -> Vec<Point<Number>> {
    let domain = Domain { start, end, step };
    match Function::compile(expression) {
        Ok(mut fun) => fun.sample(&domain),
        Err(err) => {
            log::debug!("{expression} does not compile, sampling as 0: {err}");
            domain.values().map(|x| Point { x, y: 0.0 }).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::EvalErrTyp;

    #[test]
    fn identity_over_default_domain() {
        let points = sample_sequence("x", -10.0, 10.0, 0.1);
        assert_eq!(points.len(), 201);
        assert!(points.iter().all(|p| p.y == p.x));
    }

    #[test]
    fn square_at_integers() {
        let points = sample_sequence("x*x", -2.0, 2.0, 1.0);
        let expected: Vec<Point<Number>> = [(-2.0, 4.0), (-1.0, 1.0), (0.0, 0.0), (1.0, 1.0), (2.0, 4.0)]
            .into_iter()
            .map(|(x, y)| Point { x, y })
            .collect();
        assert_eq!(points, expected);
    }

    #[test]
    fn malformed_expressions_yield_zero() {
        assert_eq!(sample_at("nonsense(((", 5.0), 0.0);
        assert_eq!(sample_at("2x", 5.0), 0.0);
        assert_eq!(sample_at("y + 1", 5.0), 0.0);
        assert_eq!(sample_at("", 5.0), 0.0);
        assert_eq!(sample_at("x = 1", 5.0), 0.0);

        let points = sample_sequence("x +", 0.0, 1.0, 0.5);
        assert_eq!(points.len(), 3);
        assert!(points.iter().all(|p| p.y == 0.0));
    }

    #[test]
    fn no_substitution_collisions() {
        assert_eq!(sample_at("exp(0) + x", 1.0), 2.0);
        assert_eq!(sample_at("x - 1", 3.0), 2.0);
        assert_eq!(sample_at("-x^2", 3.0), -9.0);
        assert_eq!(sample_at("x^2", -3.0), 9.0);
    }

    #[test]
    fn exponent_literals() {
        assert_eq!(sample_at("1e3*x", 2.0), 2000.0);
        assert_eq!(sample_at("2.5e-1", 0.0), 0.25);
        assert_eq!(sample_at("x * 1E+2", 3.0), 300.0);
        assert_eq!(sample_at("2*e", 0.0), 2.0 * core::f64::consts::E);
    }

    #[test]
    fn oversized_domains_give_no_points() {
        assert!(sample_sequence("x", 0.0, 1e17, 1.0).is_empty());
        assert!(sample_sequence("x +", 0.0, 1e17, 1.0).is_empty());
        let mut fun = Function::compile("x").unwrap();
        let domain = Domain {
            start: -1.0,
            end: 1.0,
            step: 1e-300,
        };
        assert!(fun.sample(&domain).is_empty());
    }

    #[test]
    fn repeated_sampling_is_deterministic() {
        let a = sample_sequence("sin(x) / x + x ^ 3", -5.0, 5.0, 0.25);
        let b = sample_sequence("sin(x) / x + x ^ 3", -5.0, 5.0, 0.25);
        assert_eq!(a.len(), b.len());
        // NaN at x = 0 compares unequal, so compare bit patterns
        assert!(a
            .iter()
            .zip(&b)
            .all(|(p, q)| p.x.to_bits() == q.x.to_bits() && p.y.to_bits() == q.y.to_bits()));
    }

    #[test]
    fn compiled_function_reports_errors() {
        let mut fun = Function::compile("x + y").unwrap();
        let err = fun.try_at(1.0).unwrap_err();
        assert!(matches!(err.typ, EvalErrTyp::UndefinedIdent { .. }));
        assert_eq!(fun.at(1.0), 0.0);

        assert!(matches!(
            try_sample_at("(x", 1.0),
            Err(SampleErr::Parse(_))
        ));
    }

    #[test]
    fn caller_binding_of_x_is_replaced() {
        let mut idents = stdlib::standard_idents();
        idents.insert(X.into(), Ident::Const(100.0));
        let mut fun = Function::with_idents(Arc::new("x + 1".into()), idents).unwrap();
        assert_eq!(fun.at(1.0), 2.0);
    }
}
