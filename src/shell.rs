// SPDX: CC0-1.0

use crate::{eval::Program, lex::SubStr};
use anyhow::Context;
use core::fmt;
use std::{
    io::{self, stdin, BufRead, Write},
    sync::Arc,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Help,
    Quit,
    Mode,
    SetExpr,
    PrintProg,
    Plot,
    SetDomain,
    SetWin,
    SetCanvas,
}

impl Command {
    pub const fn exhaustive() -> &'static [Command] {
        &[
            Self::Help,
            Self::Quit,
            Self::Mode,
            Self::SetExpr,
            Self::Plot,
            Self::SetDomain,
            Self::SetWin,
            Self::SetCanvas,
            Self::PrintProg,
        ]
    }

    pub const fn help(&self) -> &'static str {
        match self {
            Self::Help => "display help for each command",
            Self::Quit => "quit the shell",
            Self::Mode => "switch between calculator and graph mode",
            Self::SetExpr => "set function to graph",
            Self::PrintProg => "print program compiled from the function (for debugging)",
            Self::Plot => "sample the function and write the graph to a file",
            Self::SetDomain => "set the range and step at which the function is sampled",
            Self::SetWin => "set the visible region of the graph",
            Self::SetCanvas => "set the size of the graph in pixels",
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Help => "help",
            Self::Quit => "quit",
            Self::Mode => "mode",
            Self::SetExpr => "set",
            Self::PrintProg => "prog",
            Self::Plot => "plot",
            Self::SetDomain => "domain",
            Self::SetWin => "window",
            Self::SetCanvas => "canvas",
        }
    }
}

impl core::str::FromStr for Command {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::exhaustive()
            .iter()
            .find(|c| s == c.name())
            .copied()
            .ok_or(())
    }
}

/// Picks the candidate most similar to `text`, if any is similar enough to
/// be worth mentioning.
pub fn suggest<'a, I>(text: &str, candidates: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let text = text.to_ascii_lowercase();
    candidates
        .into_iter()
        .map(|cand| {
            (
                strsim::normalized_damerau_levenshtein(&text, &cand.to_ascii_lowercase()),
                cand,
            )
        })
        .reduce(|acc, elem| if elem.0 > acc.0 { elem } else { acc })
        .filter(|(sim, _)| *sim > 0.3)
        .map(|(_, cand)| cand)
}

pub fn input<W: Write>(out: W, prompt: impl fmt::Display) -> anyhow::Result<String> {
    fn inner<W: Write>(mut out: W, prompt: impl fmt::Display) -> io::Result<String> {
        write!(out, "{prompt}")?;
        out.flush()?;
        let mut stdin = stdin().lock();
        let mut s = String::new();
        stdin.read_line(&mut s)?;
        Ok(s.trim().to_string())
    }

    let s = inner(out, prompt).context("read from standard input failed")?;
    Ok(s)
}

pub fn read_fromstr<W: Write, T: core::str::FromStr>(
    mut out: W,
    prompt: impl fmt::Display,
    ignore_empty: bool,
) -> anyhow::Result<Result<Option<T>, <T as core::str::FromStr>::Err>>
where
    <T as core::str::FromStr>::Err: fmt::Display,
{
    let input = Arc::new(input(&mut out, prompt)?);
    if ignore_empty && input.is_empty() {
        return Ok(Ok(None));
    }
    match input.parse::<T>() {
        Ok(new) => Ok(Ok(Some(new))),
        Err(err) => {
            writeln!(out)?;
            underline(&mut out, &SubStr::all(input))?;
            writeln!(out, "parse error: {err}")?;
            Ok(Err(err))
        }
    }
}

pub fn underline<W: Write>(mut out: W, span: &SubStr) -> io::Result<()> {
    let src = span.src();
    let col = src[..span.start()].chars().count();
    let width = span.get().chars().count().max(1);
    writeln!(out, "{src}")?;
    writeln!(out, "{}{}", " ".repeat(col), "^".repeat(width))?;
    Ok(())
}

pub fn dump_program<W: Write>(
    mut out: W,
    prog: &Program,
    title: core::fmt::Arguments,
) -> io::Result<()> {
    writeln!(out, "{title}: ")?;
    if prog.is_empty() {
        writeln!(out, "  (empty)")?;
    }
    for op in prog.ops() {
        writeln!(out, "  {op}")?;
    }
    Ok(())
}

pub fn expr_undefined<W: Write>(mut out: W) -> io::Result<()> {
    writeln!(out, "error: no function is defined, try \"set\"")
}
