// SPDX: CC0-1.0

use crate::eval::OperatorTyp;
use core::{fmt, iter::Peekable, str::CharIndices};
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubStr {
    // shared with every token and error that points into the same expression
    src: Arc<String>,
    start: usize,
    len: usize,
}

impl SubStr {
    #[inline]
    pub const fn new(src: Arc<String>, start: usize, len: usize) -> Self {
        Self { src, start, len }
    }

    #[inline]
    pub fn all(src: Arc<String>) -> Self {
        let len = src.len();
        Self::new(src, 0, len)
    }

    /// Zero-width span just past the end of `src`, for errors that belong to
    /// no particular token.
    #[inline]
    pub fn end(src: Arc<String>) -> Self {
        let len = src.len();
        Self::new(src, len, 0)
    }

    pub fn src(&self) -> Arc<String> {
        Arc::clone(&self.src)
    }

    pub const fn start(&self) -> usize {
        self.start
    }

    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self) -> &str {
        &self.src[self.start..self.start + self.len]
    }

    fn grow(&mut self, by: usize) {
        self.len += by;
    }
}

impl fmt::Display for SubStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.get())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokTyp {
    Ident,
    Number,
    Op(OperatorTyp),
    Comma,
    OpenParen,
    CloseParen,

    // unsupported tokens
    XGreater,
    XLess,
    XEqual,
    XPipe,
    XOpenSquareBracket,
    XCloseSquareBracket,
    XOpenCurly,
    XCloseCurly,
}

impl TokTyp {
    pub const fn is_unsupported(&self) -> bool {
        match self {
            Self::Ident
            | Self::Number
            | Self::Op(_)
            | Self::Comma
            | Self::OpenParen
            | Self::CloseParen => false,

            Self::XGreater
            | Self::XLess
            | Self::XEqual
            | Self::XPipe
            | Self::XOpenSquareBracket
            | Self::XCloseSquareBracket
            | Self::XOpenCurly
            | Self::XCloseCurly => true,
        }
    }

    /// Whether a `-` after this token starts a new operand rather than
    /// subtracting from the previous one.
    const fn expects_operand(prev: Option<Self>) -> bool {
        match prev {
            None | Some(Self::Op(_)) | Some(Self::Comma) | Some(Self::OpenParen) => true,
            Some(_) => false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Tok {
    pub typ: TokTyp,
    pub loc: SubStr,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum LexErrTyp {
    #[error("invalid character")]
    InvalidChar,
    #[error("unsupported character")]
    Unsupported(TokTyp),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[error("{typ} '{loc}'")]
pub struct LexErr {
    pub typ: LexErrTyp,
    pub loc: SubStr,
}

#[derive(Debug)]
pub struct Lexer<'src> {
    src: &'src Arc<String>,
    cur: Peekable<CharIndices<'src>>,
    prev: Option<TokTyp>,
    has_errored: bool, // tells iter to yield None after error
}

impl<'src> Lexer<'src> {
    pub fn new(src: &'src Arc<String>) -> Self {
        Self {
            src,
            cur: src.char_indices().peekable(),
            prev: None,
            has_errored: false,
        }
    }

    fn span(&self, start: usize, chr: char) -> SubStr {
        SubStr::new(Arc::clone(self.src), start, chr.len_utf8())
    }

    pub fn trim_whitespace(&mut self) {
        while self.cur.next_if(|(_, chr)| chr.is_whitespace()).is_some() {}
    }

    pub fn consume_unambiguous(&mut self) -> Option<Tok> {
        let (idx, chr) = self.cur.peek().copied()?;
        let typ = match chr {
            '+' => TokTyp::Op(OperatorTyp::Add),
            '*' => TokTyp::Op(OperatorTyp::Mul),
            '/' => TokTyp::Op(OperatorTyp::Div),
            '^' => TokTyp::Op(OperatorTyp::Exp),
            '-' if TokTyp::expects_operand(self.prev) => TokTyp::Op(OperatorTyp::Neg),
            '-' => TokTyp::Op(OperatorTyp::Sub),
            ',' => TokTyp::Comma,
            '(' => TokTyp::OpenParen,
            ')' => TokTyp::CloseParen,

            '>' => TokTyp::XGreater,
            '<' => TokTyp::XLess,
            '=' => TokTyp::XEqual,
            '|' => TokTyp::XPipe,
            '[' => TokTyp::XOpenSquareBracket,
            ']' => TokTyp::XCloseSquareBracket,
            '{' => TokTyp::XOpenCurly,
            '}' => TokTyp::XCloseCurly,
            _ => return None,
        };
        self.cur.next();
        Some(Tok {
            typ,
            loc: self.span(idx, chr),
        })
    }

    /// Gathers the longest run of characters matching `predicate` into a
    /// token of type `typ`, or returns `None` if the next character doesn't
    /// match.
    pub fn consume_by<P>(&mut self, start: usize, typ: TokTyp, predicate: P) -> Option<Tok>
    where
        P: Fn(char) -> bool,
    {
        let mut loc = SubStr::new(Arc::clone(self.src), start, 0);
        while let Some((_, chr)) = self.cur.next_if(|(_, chr)| predicate(*chr)) {
            loc.grow(chr.len_utf8());
        }
        if loc.is_empty() {
            None
        } else {
            Some(Tok { typ, loc })
        }
    }

    /// Extends a number token with an exponent such as `e3` or `E-2`. The
    /// `e` only belongs to the number when digits follow it, so in `2*e`
    /// and `2e` it is still the constant.
    fn consume_exponent(&mut self, num: &mut Tok) {
        let rest = self.src[num.loc.start() + num.loc.len()..].as_bytes();
        if !matches!(rest.first(), Some(b'e' | b'E')) {
            return;
        }
        let sign = usize::from(matches!(rest.get(1), Some(b'+' | b'-')));
        let digits = rest[1 + sign..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        if digits == 0 {
            return;
        }
        // all ascii, so one char per byte
        for _ in 0..1 + sign + digits {
            self.cur.next();
        }
        num.loc.grow(1 + sign + digits);
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Tok, LexErr>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.has_errored {
            return None;
        }

        self.trim_whitespace();

        let (next_idx, next_chr) = self.cur.peek().copied()?;
        let tok = if let Some(tok) = self.consume_unambiguous() {
            tok
        } else if let Some(tok) =
            self.consume_by(next_idx, TokTyp::Ident, |chr| chr.is_ascii_alphabetic())
        {
            tok
        } else if let Some(mut tok) = self.consume_by(next_idx, TokTyp::Number, |chr| {
            chr.is_ascii_digit() || chr == '.'
        }) {
            self.consume_exponent(&mut tok);
            tok
        } else {
            self.has_errored = true;
            return Some(Err(LexErr {
                typ: LexErrTyp::InvalidChar,
                loc: self.span(next_idx, next_chr),
            }));
        };

        if tok.typ.is_unsupported() {
            self.has_errored = true;
            return Some(Err(LexErr {
                typ: LexErrTyp::Unsupported(tok.typ),
                loc: tok.loc,
            }));
        }

        self.prev = Some(tok.typ);
        Some(Ok(tok))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(src: &str) -> Result<Vec<(TokTyp, String)>, LexErr> {
        let src = Arc::new(src.to_string());
        Lexer::new(&src)
            .map(|tok| tok.map(|tok| (tok.typ, tok.loc.get().to_string())))
            .collect()
    }

    #[test]
    fn tokens_and_spans() {
        let toks = lex("sin(x) * 2.5").unwrap();
        assert_eq!(
            toks,
            vec![
                (TokTyp::Ident, "sin".into()),
                (TokTyp::OpenParen, "(".into()),
                (TokTyp::Ident, "x".into()),
                (TokTyp::CloseParen, ")".into()),
                (TokTyp::Op(OperatorTyp::Mul), "*".into()),
                (TokTyp::Number, "2.5".into()),
            ]
        );
    }

    #[test]
    fn minus_is_negation_only_where_an_operand_is_expected() {
        let typs: Vec<TokTyp> = lex("-x-1*(-2)")
            .unwrap()
            .into_iter()
            .map(|(typ, _)| typ)
            .collect();
        assert_eq!(
            typs,
            vec![
                TokTyp::Op(OperatorTyp::Neg),
                TokTyp::Ident,
                TokTyp::Op(OperatorTyp::Sub),
                TokTyp::Number,
                TokTyp::Op(OperatorTyp::Mul),
                TokTyp::OpenParen,
                TokTyp::Op(OperatorTyp::Neg),
                TokTyp::Number,
                TokTyp::CloseParen,
            ]
        );
    }

    #[test]
    fn unsupported_and_invalid_characters() {
        let err = lex("x = 2").unwrap_err();
        assert_eq!(err.typ, LexErrTyp::Unsupported(TokTyp::XEqual));
        assert_eq!(err.loc.start(), 2);

        // multibyte characters get a span covering the whole character
        let err = lex("x²").unwrap_err();
        assert_eq!(err.typ, LexErrTyp::InvalidChar);
        assert_eq!(err.loc.get(), "²");
    }

    #[test]
    fn exponent_literals() {
        let toks = lex("1e3*x + 2.5E-1 - 4e+2").unwrap();
        let numbers: Vec<&str> = toks
            .iter()
            .filter(|(typ, _)| *typ == TokTyp::Number)
            .map(|(_, text)| text.as_str())
            .collect();
        assert_eq!(numbers, ["1e3", "2.5E-1", "4e+2"]);

        // without digits after it, `e` is the constant
        assert_eq!(
            lex("2*e").unwrap(),
            vec![
                (TokTyp::Number, "2".into()),
                (TokTyp::Op(OperatorTyp::Mul), "*".into()),
                (TokTyp::Ident, "e".into()),
            ]
        );
        assert_eq!(
            lex("2e-x").unwrap()[..2],
            [(TokTyp::Number, "2".into()), (TokTyp::Ident, "e".into())]
        );
    }

    #[test]
    fn lexer_stops_after_error() {
        let src = Arc::new(String::from("1 $ 2"));
        let mut lexer = Lexer::new(&src);
        assert!(lexer.next().unwrap().is_ok());
        assert!(lexer.next().unwrap().is_err());
        assert!(lexer.next().is_none());
    }
}
