// SPDX: CC0-1.0

// implementation of shunting yard algorithm by dijkstra (see https://en.wikipedia.org/wiki/Shunting_yard_algorithm)

use crate::{
    eval::{Associativity, Ident, Idents, Operation, OperationTyp, OperatorTyp, Program},
    lex::{LexErr, LexErrTyp, Lexer, SubStr, TokTyp},
    Number,
};
use core::num::ParseFloatError;

#[derive(Debug, thiserror::Error)]
pub enum ParseErrTyp {
    #[error(transparent)]
    LexErr(LexErrTyp),
    #[error("invalid number: {0}")]
    ParseNum(ParseFloatError),
    #[error("mismatched parentheses")]
    ParenMismatch,
}

#[derive(Debug, thiserror::Error)]
#[error("{typ}")]
pub struct ParseErr {
    pub typ: ParseErrTyp,
    pub loc: SubStr,
}

impl From<LexErr> for ParseErr {
    fn from(err: LexErr) -> Self {
        Self {
            typ: ParseErrTyp::LexErr(err.typ),
            loc: err.loc,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ShuntOpTyp {
    Operator(OperatorTyp),
    Ident,
    OpenParen,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct ShuntOp {
    typ: ShuntOpTyp,
    loc: SubStr,
}

impl ShuntOp {
    /// `None` for parentheses, which are never popped by an operator.
    fn precedence(&self) -> Option<i8> {
        match self.typ {
            ShuntOpTyp::Operator(op) => Some(op.precedence()),
            // function application binds tighter than any operator, so
            // `sin x + 1` reads as `sin(x) + 1`
            ShuntOpTyp::Ident => Some(i8::MAX),
            ShuntOpTyp::OpenParen => None,
        }
    }

    fn into_output(self) -> Result<Operation, ParseErr> {
        let typ = match self.typ {
            ShuntOpTyp::Operator(typ) => OperationTyp::Operator(typ),
            ShuntOpTyp::Ident => OperationTyp::Ident,
            ShuntOpTyp::OpenParen => {
                return Err(ParseErr {
                    typ: ParseErrTyp::ParenMismatch,
                    loc: self.loc,
                })
            }
        };
        Ok(Operation { typ, loc: self.loc })
    }
}

/// Pops operators into `out` until an open parenthesis (left in place) or
/// the bottom of the stack.
fn pop_until_paren(ops: &mut Vec<ShuntOp>, out: &mut Vec<Operation>) -> Result<(), ParseErr> {
    while let Some(op) = ops.pop() {
        if op.typ == ShuntOpTyp::OpenParen {
            ops.push(op);
            break;
        }
        out.push(op.into_output()?);
    }
    Ok(())
}

pub fn parse(lex: Lexer<'_>, idents: &Idents) -> Result<Program, ParseErr> {
    let mut out: Vec<Operation> = Vec::new(); // output
    let mut ops: Vec<ShuntOp> = Vec::new(); // operator stack

    for tok in lex {
        let tok = tok?;
        match tok.typ {
            TokTyp::Number => {
                let num: Number = tok.loc.get().parse().map_err(|err| ParseErr {
                    typ: ParseErrTyp::ParseNum(err),
                    loc: tok.loc.clone(),
                })?;
                out.push(Operation {
                    typ: OperationTyp::Val(num),
                    loc: tok.loc,
                });
            }

            TokTyp::Ident => {
                if let Some(Ident::Fun(_)) = idents.get(&tok.loc.clone().into()) {
                    ops.push(ShuntOp {
                        typ: ShuntOpTyp::Ident,
                        loc: tok.loc,
                    });
                } else {
                    // unknown identifiers are assumed to be variables and
                    // reported when evaluated
                    out.push(Operation {
                        typ: OperationTyp::Ident,
                        loc: tok.loc,
                    });
                }
            }

            TokTyp::Op(o1) => {
                if !o1.is_prefix() {
                    while let Some(o2) = ops.last() {
                        let Some(p2) = o2.precedence() else { break };
                        let p1 = o1.precedence();
                        if p2 > p1 || (p1 == p2 && o1.associativity() == Associativity::Left) {
                            if let Some(o2) = ops.pop() {
                                out.push(o2.into_output()?);
                            }
                        } else {
                            break;
                        }
                    }
                }
                ops.push(ShuntOp {
                    typ: ShuntOpTyp::Operator(o1),
                    loc: tok.loc,
                });
            }

            TokTyp::Comma => pop_until_paren(&mut ops, &mut out)?,

            TokTyp::OpenParen => {
                ops.push(ShuntOp {
                    typ: ShuntOpTyp::OpenParen,
                    loc: tok.loc,
                });
            }

            TokTyp::CloseParen => {
                pop_until_paren(&mut ops, &mut out)?;

                if ops.pop().is_none() {
                    return Err(ParseErr {
                        typ: ParseErrTyp::ParenMismatch,
                        loc: tok.loc,
                    });
                }

                // handle functions
                match ops.pop() {
                    Some(op) if op.typ == ShuntOpTyp::Ident => out.push(op.into_output()?),
                    Some(op) => ops.push(op),
                    None => {}
                }
            }

            TokTyp::XGreater
            | TokTyp::XLess
            | TokTyp::XEqual
            | TokTyp::XPipe
            | TokTyp::XOpenSquareBracket
            | TokTyp::XCloseSquareBracket
            | TokTyp::XOpenCurly
            | TokTyp::XCloseCurly => {
                return Err(ParseErr {
                    typ: ParseErrTyp::LexErr(LexErrTyp::Unsupported(tok.typ)),
                    loc: tok.loc,
                })
            }
        }
    }

    while let Some(op) = ops.pop() {
        out.push(op.into_output()?);
    }

    let prog = Program::new(out);
    log::trace!("compiled {} operations", prog.ops().len());
    Ok(prog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stdlib::standard_idents;
    use std::sync::Arc;

    fn compile(src: &str) -> Result<Vec<String>, ParseErr> {
        let src = Arc::new(src.to_string());
        let prog = parse(Lexer::new(&src), &standard_idents())?;
        Ok(prog.ops().map(ToString::to_string).collect())
    }

    #[test]
    fn postfix_order() {
        assert_eq!(
            compile("1 + 2 * x").unwrap(),
            ["push 1", "push 2", "call 'x'", "call 'mul'", "call 'add'"]
        );
        assert_eq!(
            compile("sin(x) ^ 2").unwrap(),
            ["call 'x'", "call 'sin'", "push 2", "call 'pow'"]
        );
        assert_eq!(
            compile("logb(x, 2)").unwrap(),
            ["call 'x'", "push 2", "call 'logb'"]
        );
    }

    #[test]
    fn mismatched_parentheses() {
        let err = compile("nonsense(((").unwrap_err();
        assert!(matches!(err.typ, ParseErrTyp::ParenMismatch));
        assert_eq!(err.loc.get(), "(");

        let err = compile("x)").unwrap_err();
        assert!(matches!(err.typ, ParseErrTyp::ParenMismatch));
        assert_eq!(err.loc.start(), 1);
    }

    #[test]
    fn bad_number() {
        let err = compile("1.2.3 + x").unwrap_err();
        assert!(matches!(err.typ, ParseErrTyp::ParseNum(_)));
        assert_eq!(err.loc.get(), "1.2.3");
    }

    #[test]
    fn lex_errors_carry_their_span() {
        let err = compile("x | 2").unwrap_err();
        assert!(matches!(
            err.typ,
            ParseErrTyp::LexErr(LexErrTyp::Unsupported(TokTyp::XPipe))
        ));
        assert_eq!(err.loc.start(), 2);
    }
}
