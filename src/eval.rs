// SPDX: CC0-1.0

use crate::{lex::SubStr, stdlib, Number};
use core::fmt;
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperatorTyp {
    Neg,
    Add,
    Sub,
    Mul,
    Div,
    Exp,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Associativity {
    Left,
    Right,
}

impl OperatorTyp {
    pub const fn precedence(&self) -> i8 {
        match self {
            Self::Add => 2,
            Self::Sub => 2,
            Self::Mul => 3,
            Self::Div => 3,
            Self::Neg => 4,
            Self::Exp => 5,
        }
    }

    pub const fn associativity(&self) -> Associativity {
        use Associativity::{Left, Right};
        match self {
            Self::Neg => Right,
            Self::Add => Left,
            Self::Sub => Left,
            Self::Mul => Left,
            Self::Div => Left,
            Self::Exp => Right,
        }
    }

    /// Prefix operators have no left operand, so they never pop anything
    /// off the operator stack when they are pushed.
    pub const fn is_prefix(&self) -> bool {
        matches!(self, Self::Neg)
    }

    pub const fn fun(&self) -> (&'static str, Fun) {
        match self {
            Self::Neg => ("neg", Fun::new(1, stdlib::neg)),
            Self::Add => ("add", Fun::new(2, stdlib::add)),
            Self::Sub => ("sub", Fun::new(2, stdlib::sub)),
            Self::Mul => ("mul", Fun::new(2, stdlib::mul)),
            Self::Div => ("div", Fun::new(2, stdlib::div)),
            Self::Exp => ("pow", Fun::new(2, stdlib::pow)),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub enum OperationTyp {
    Operator(OperatorTyp),
    Val(Number),
    Ident,
}

#[derive(Clone, Debug)]
pub struct Operation {
    pub typ: OperationTyp,
    pub loc: SubStr,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.typ {
            OperationTyp::Val(val) => write!(f, "push {val}"),
            OperationTyp::Operator(typ) => write!(f, "call '{}'", typ.fun().0),
            OperationTyp::Ident => write!(f, "call '{}'", self.loc.get()),
        }
    }
}

fn plural(n: &usize) -> &'static str {
    if *n == 1 {
        ""
    } else {
        "s"
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EvalErrTyp {
    #[error("cannot evaluate empty program")]
    Empty,

    #[error("function '{name}' requires {arity} argument{}, but found {found}", plural(.arity))]
    MissingArgs {
        name: IdentKey,
        arity: usize,
        found: usize,
    },

    #[error("expected {expected} value{} on the stack but found {found}", plural(.expected))]
    StackMismatch { expected: usize, found: usize },

    #[error("undefined identifier '{text}'")]
    UndefinedIdent { text: SubStr },

    #[error("variable '{text}' is declared but its value is not defined")]
    NullVar { text: SubStr },
}

#[derive(Debug, thiserror::Error)]
#[error("{typ}")]
pub struct EvalErr {
    pub typ: EvalErrTyp,
    pub op: Option<Operation>, // if none, associated with end-of-program checking
}

#[derive(Clone, Copy, Debug)]
pub struct Fun {
    pub arity: usize,
    pub fun: fn(Vec<Number>) -> Number,
}

impl Fun {
    pub const fn new(arity: usize, fun: fn(Vec<Number>) -> Number) -> Self {
        Self { arity, fun }
    }
}

#[derive(Clone, Debug)]
pub enum Ident {
    Var(Option<Number>),
    Const(Number),
    Fun(Fun),
}

impl Ident {
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Var(_) => "variable",
            Self::Const(_) => "constant",
            Self::Fun(_) => "function",
        }
    }
}

#[derive(Clone, Debug, Eq)]
pub enum IdentKey {
    Arc(SubStr),
    Static(&'static str),
}

impl PartialEq for IdentKey {
    fn eq(&self, other: &Self) -> bool {
        self.get() == other.get()
    }
}

impl core::hash::Hash for IdentKey {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.get().hash(state)
    }
}

impl IdentKey {
    pub fn get(&self) -> &str {
        match self {
            Self::Arc(s) => s.get(),
            Self::Static(s) => s,
        }
    }
}

impl fmt::Display for IdentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.get())
    }
}

impl From<SubStr> for IdentKey {
    fn from(s: SubStr) -> Self {
        Self::Arc(s)
    }
}

impl From<&'static str> for IdentKey {
    fn from(s: &'static str) -> Self {
        Self::Static(s)
    }
}

pub type Idents = HashMap<IdentKey, Ident>;

/// Postfix sequence of operations, as produced by [`crate::parse::parse`].
#[derive(Debug)]
pub struct Program {
    pub(crate) ops: Vec<Operation>,
}

impl Program {
    #[inline]
    pub const fn new(ops: Vec<Operation>) -> Self {
        Self { ops }
    }

    #[inline]
    pub fn ops(&self) -> core::slice::Iter<'_, Operation> {
        self.ops.iter()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Runs `prog` against `idents`. `stack` is scratch space, cleared on entry,
/// so repeated evaluations can share one allocation.
pub fn eval(prog: &Program, idents: &Idents, stack: &mut Vec<Number>) -> Result<Number, EvalErr> {
    fn eval_fun(
        stack: &mut Vec<Number>,
        op: &Operation,
        name: impl Into<IdentKey>,
        fun: &Fun,
    ) -> Result<Number, EvalErr> {
        let len = stack.len();
        if len < fun.arity {
            return Err(EvalErr {
                typ: EvalErrTyp::MissingArgs {
                    name: name.into(),
                    arity: fun.arity,
                    found: len,
                },
                op: Some(op.clone()),
            });
        }
        // stack: ...a, b, c, d
        //              ^^^^ args if arity is 2
        let args = stack.split_off(len - fun.arity);
        Ok((fun.fun)(args))
    }

    if prog.is_empty() {
        return Err(EvalErr {
            typ: EvalErrTyp::Empty,
            op: None,
        });
    }

    stack.clear();

    for op in prog.ops() {
        let val = match op.typ {
            OperationTyp::Operator(typ) => {
                let (name, fun) = typ.fun();
                eval_fun(stack, op, name, &fun)?
            }

            OperationTyp::Val(num) => num,

            OperationTyp::Ident => {
                let sym = op.loc.clone();
                match idents.get(&sym.clone().into()) {
                    Some(Ident::Var(None)) => {
                        return Err(EvalErr {
                            typ: EvalErrTyp::NullVar { text: sym },
                            op: Some(op.clone()),
                        });
                    }
                    Some(Ident::Var(Some(val)) | Ident::Const(val)) => *val,
                    Some(Ident::Fun(fun)) => eval_fun(stack, op, sym, fun)?,
                    None => {
                        return Err(EvalErr {
                            typ: EvalErrTyp::UndefinedIdent { text: sym },
                            op: Some(op.clone()),
                        });
                    }
                }
            }
        };
        stack.push(val);
    }

    let found = stack.len();
    match stack.pop() {
        Some(val) if found == 1 => Ok(val),
        _ => Err(EvalErr {
            typ: EvalErrTyp::StackMismatch { expected: 1, found },
            op: None,
        }),
    }
}
