// SPDX: CC0-1.0

//! Keypad calculator: binary operators, unary scientific functions and the
//! display/pending-operator state machine that drives them.

use crate::Number;
use core::{fmt, str::FromStr};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Square,
    Percent,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown operator '{0}'")]
pub struct UnknownOperator(pub String);

impl Operator {
    pub const fn exhaustive() -> &'static [Operator] {
        &[
            Self::Add,
            Self::Sub,
            Self::Mul,
            Self::Div,
            Self::Pow,
            Self::Square,
            Self::Percent,
        ]
    }

    /// Symbol printed on the key.
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "×",
            Self::Div => "÷",
            Self::Pow => "xʸ",
            Self::Square => "x²",
            Self::Percent => "%",
        }
    }

    /// Symbol that can be typed on a plain keyboard.
    pub const fn ascii(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Pow => "^",
            Self::Square => "sq",
            Self::Percent => "%",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Operator {
    type Err = UnknownOperator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::exhaustive()
            .iter()
            .find(|op| s == op.symbol() || s == op.ascii())
            .copied()
            .ok_or_else(|| UnknownOperator(s.to_string()))
    }
}

/// Applies `op` to `a` and `b`. Dividing by zero gives NaN; everything else
/// follows IEEE 754.
pub fn evaluate(a: Number, b: Number, op: Operator) -> Number {
    match op {
        Operator::Add => a + b,
        Operator::Sub => a - b,
        Operator::Mul => a * b,
        Operator::Div => {
            if b != 0.0 {
                a / b
            } else {
                Number::NAN
            }
        }
        Operator::Pow => a.powf(b),
        Operator::Square => a.powf(2.0),
        Operator::Percent => (a * b) / 100.0,
    }
}

/// Like [`evaluate`], but a missing operator passes `b` through unchanged.
pub fn apply(a: Number, b: Number, op: Option<Operator>) -> Number {
    match op {
        Some(op) => evaluate(a, b, op),
        None => b,
    }
}

/// Evaluates a keypad symbol; unknown symbols pass `b` through.
pub fn evaluate_symbol(a: Number, b: Number, symbol: &str) -> Number {
    apply(a, b, symbol.parse().ok())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpecialFn {
    Sqrt,
    Sin,
    Cos,
    Tan,
    Log,
    Ln,
}

impl SpecialFn {
    pub const fn exhaustive() -> &'static [SpecialFn] {
        &[
            Self::Sin,
            Self::Cos,
            Self::Tan,
            Self::Sqrt,
            Self::Log,
            Self::Ln,
        ]
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Sqrt => "sqrt",
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Log => "log",
            Self::Ln => "ln",
        }
    }

    /// Trigonometric functions take degrees.
    pub fn apply(&self, x: Number) -> Number {
        match self {
            Self::Sqrt => x.sqrt(),
            Self::Sin => x.to_radians().sin(),
            Self::Cos => x.to_radians().cos(),
            Self::Tan => x.to_radians().tan(),
            Self::Log => x.log10(),
            Self::Ln => x.ln(),
        }
    }
}

impl FromStr for SpecialFn {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "√" {
            return Ok(Self::Sqrt);
        }
        Self::exhaustive()
            .iter()
            .find(|f| s == f.name())
            .copied()
            .ok_or(())
    }
}

/// Operation waiting for its second operand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Pending {
    Op(Operator),
    /// a key with no arithmetic meaning, such as a parenthesis; applying it
    /// yields the second operand
    PassThrough(String),
}

impl Pending {
    pub fn apply(&self, a: Number, b: Number) -> Number {
        match self {
            Self::Op(op) => evaluate(a, b, *op),
            Self::PassThrough(_) => apply(a, b, None),
        }
    }
}

impl From<Operator> for Pending {
    fn from(op: Operator) -> Self {
        Self::Op(op)
    }
}

impl From<&str> for Pending {
    fn from(symbol: &str) -> Self {
        match symbol.parse() {
            Ok(op) => Self::Op(op),
            Err(UnknownOperator(symbol)) => Self::PassThrough(symbol),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Key {
    Digit(char),
    Decimal,
    Operator(Pending),
    Special(SpecialFn),
    Equals,
    Clear,
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        match s {
            "." => Self::Decimal,
            "=" => Self::Equals,
            "c" | "C" | "ac" | "clear" => Self::Clear,
            _ => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(d), None) if d.is_ascii_digit() => Self::Digit(d),
                    _ => match s.parse() {
                        Ok(f) => Self::Special(f),
                        Err(()) => Self::Operator(s.into()),
                    },
                }
            }
        }
    }
}

/// Splits a line of typed input into key presses. Digits and decimal points
/// are one key each; any other run of non-whitespace characters is one key,
/// so `12+3 =` is `1 2 + 3 =`.
pub fn keys(line: &str) -> Vec<Key> {
    let mut ret = Vec::new();
    for word in line.split_whitespace() {
        let mut rest = word;
        while let Some(chr) = rest.chars().next() {
            let len = if chr.is_ascii_digit() || chr == '.' {
                1
            } else {
                rest.find(|c: char| c.is_ascii_digit() || c == '.')
                    .unwrap_or(rest.len())
            };
            let (key, tail) = rest.split_at(len);
            ret.push(Key::from(key));
            rest = tail;
        }
    }
    ret
}

/// Formats a result for the display: `NaN`, `Infinity`, `-Infinity`, or the
/// shortest decimal that reads back as the same number. Magnitudes outside
/// `[1e-7, 1e21)` switch to exponent form with a signed exponent, e.g.
/// `1e+21` and `1e-8`.
pub fn format_number(n: Number) -> String {
    if n.is_nan() {
        String::from("NaN")
    } else if n.is_infinite() {
        String::from(if n > 0.0 { "Infinity" } else { "-Infinity" })
    } else if n == 0.0 {
        // no negative zero on the display
        String::from("0")
    } else if (1e-7..1e21).contains(&n.abs()) {
        n.to_string()
    } else {
        let sci = format!("{n:e}");
        match sci.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => sci,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Calculator {
    display: String,
    previous: Option<Number>,
    operation: Option<Pending>,
    new_number: bool,
}

impl Default for Calculator {
    fn default() -> Self {
        Self {
            display: String::from("0"),
            previous: None,
            operation: None,
            new_number: true,
        }
    }
}

impl Calculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn previous(&self) -> Option<Number> {
        self.previous
    }

    pub fn pending(&self) -> Option<&Pending> {
        self.operation.as_ref()
    }

    /// Value on the display; anything unreadable counts as NaN.
    pub fn value(&self) -> Number {
        self.display.parse().unwrap_or(Number::NAN)
    }

    pub fn press(&mut self, key: Key) {
        match key {
            Key::Digit(d) => self.digit(d),
            Key::Decimal => self.decimal(),
            Key::Operator(pending) => self.operator(pending),
            Key::Special(f) => self.special(f),
            Key::Equals => self.equals(),
            Key::Clear => self.clear(),
        }
    }

    pub fn digit(&mut self, d: char) {
        if self.new_number {
            self.display = d.to_string();
            self.new_number = false;
        } else if self.display == "0" {
            self.display = d.to_string();
        } else {
            self.display.push(d);
        }
    }

    pub fn decimal(&mut self) {
        if self.new_number {
            self.display = String::from("0.");
            self.new_number = false;
        } else if !self.display.contains('.') {
            self.display.push('.');
        }
    }

    /// Makes `pending` the operation waiting for the next operand, first
    /// applying the one already waiting, if any.
    pub fn operator(&mut self, pending: impl Into<Pending>) {
        let current = self.value();
        match (self.previous, &self.operation) {
            (None, _) => self.previous = Some(current),
            (Some(prev), Some(op)) => {
                let result = op.apply(prev, current);
                self.previous = Some(result);
                self.display = format_number(result);
            }
            (Some(_), None) => {}
        }
        self.operation = Some(pending.into());
        self.new_number = true;
    }

    pub fn equals(&mut self) {
        if let (Some(prev), Some(op)) = (self.previous, &self.operation) {
            let result = op.apply(prev, self.value());
            self.display = format_number(result);
            self.previous = None;
            self.operation = None;
            self.new_number = true;
        }
    }

    pub fn special(&mut self, f: SpecialFn) {
        self.display = format_number(f.apply(self.value()));
        self.new_number = true;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
