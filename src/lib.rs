// SPDX: CC0-1.0

pub mod calc;
pub mod eval;
pub mod lex;
pub mod parse;
pub mod plot;
pub mod sample;
pub mod shell;
pub mod stdlib;

pub use calc::{evaluate, evaluate_symbol, Operator};
pub use sample::{sample_at, sample_sequence, Function};

use core::{fmt, ops::Range};

pub type Number = f64;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point<T> {
    pub x: T,
    pub y: T,
}

/// Visible region of the plane.
#[derive(Clone, Debug, PartialEq)]
pub struct Window {
    pub x: Range<Number>,
    pub y: Range<Number>,
}

impl Default for Window {
    fn default() -> Self {
        Self {
            x: -10.0..10.0,
            y: -10.0..10.0,
        }
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Window")
            .field("x range", &self.x)
            .field("y range", &self.y)
            .finish()
    }
}

/// Values of `x` at which a function is sampled: `start`, `start + step`,
/// ... up to and including `end`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Domain {
    pub start: Number,
    pub end: Number,
    pub step: Number,
}

impl Default for Domain {
    fn default() -> Self {
        Self {
            start: -10.0,
            end: 10.0,
            step: 0.1,
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Domain")
            .field("start", &self.start)
            .field("end", &self.end)
            .field("step", &self.step)
            .finish()
    }
}

impl Domain {
    // absorbs rounding in (end - start) / step, e.g. 20 / 0.1
    const TOLERANCE: Number = 1e-9;

    /// Largest number of points a domain may hold. Anything denser is
    /// treated as malformed rather than allocated.
    pub const MAX_POINTS: usize = 1_000_000;

    /// Number of sample points, or 0 if the domain is empty or malformed.
    pub fn len(&self) -> usize {
        let Self { start, end, step } = *self;
        if !(start.is_finite() && end.is_finite() && step.is_finite()) || step <= 0.0 || end < start
        {
            return 0;
        }
        let intervals = (end - start) / step;
        let n = (intervals + intervals.max(1.0) * Self::TOLERANCE).floor();
        if n >= Self::MAX_POINTS as Number {
            return 0;
        }
        n as usize + 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `start + i * step` for each point. Computing each value from the
    /// index keeps rounding error from accumulating across the domain.
    pub fn values(&self) -> impl Iterator<Item = Number> {
        let Self { start, step, .. } = *self;
        (0..self.len()).map(move |i| start + i as Number * step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_domain_has_201_points() {
        let domain = Domain::default();
        assert_eq!(domain.len(), 201);
        let xs: Vec<Number> = domain.values().collect();
        assert_eq!(xs.first().copied(), Some(-10.0));
        assert!((xs[200] - 10.0).abs() < 1e-9);
    }

    #[test]
    fn integer_steps_are_inclusive() {
        let domain = Domain {
            start: -2.0,
            end: 2.0,
            step: 1.0,
        };
        assert_eq!(domain.values().collect::<Vec<_>>(), [-2.0, -1.0, 0.0, 1.0, 2.0]);

        let single = Domain {
            start: 3.0,
            end: 3.0,
            step: 0.5,
        };
        assert_eq!(single.values().collect::<Vec<_>>(), [3.0]);
    }

    #[test]
    fn malformed_domains_are_empty() {
        for (start, end, step) in [
            (0.0, 1.0, 0.0),
            (0.0, 1.0, -0.1),
            (1.0, 0.0, 0.1),
            (0.0, Number::INFINITY, 1.0),
            (Number::NAN, 1.0, 0.1),
            (0.0, 1.0, Number::NAN),
            (0.0, 1e17, 1.0),
            (-1.0, 1.0, Number::MIN_POSITIVE),
        ] {
            assert!(Domain { start, end, step }.is_empty());
        }
    }

    #[test]
    fn point_count_is_capped() {
        let full = Domain {
            start: 0.0,
            end: (Domain::MAX_POINTS - 1) as Number,
            step: 1.0,
        };
        assert_eq!(full.len(), Domain::MAX_POINTS);

        let over = Domain {
            end: Domain::MAX_POINTS as Number,
            ..full
        };
        assert!(over.is_empty());
        assert_eq!(over.values().count(), 0);
    }
}
