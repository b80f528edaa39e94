// SPDX: CC0-1.0

use anyhow::Context;
use chrono::{DateTime, Local};
use core::num::NonZeroU32;
use graph_calc::{
    calc::{self, Calculator, Key, Operator, Pending, SpecialFn},
    eval::EvalErrTyp,
    lex::{LexErrTyp, SubStr, TokTyp},
    parse::ParseErrTyp,
    plot::{self, Canvas},
    shell::{self, Command},
    stdlib::X,
    Domain, Function, Number, Window,
};
use std::{
    fs::OpenOptions,
    io::{stdout, BufWriter, Write},
    process::ExitCode,
};

fn output_filename(now: DateTime<Local>, ext: &str) -> String {
    format!(
        "{}_output-{}.{}",
        env!("CARGO_PKG_NAME"),
        now.format("%Y-%m-%d_%H-%M-%S"),
        ext
    )
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match try_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("unexpected error: {err}");
            let chain = err.chain();
            if chain.len() > 1 {
                eprintln!();
                eprintln!("context:");
                for it in chain.skip(1) {
                    eprintln!("  {it}");
                }
            }
            ExitCode::FAILURE
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Calculator,
    Graph,
}

#[derive(Debug)]
struct State {
    mode: Mode,
    calc: Calculator,
    fun: Option<Function>,
    domain: Domain,
    win: Window,
    canvas: Canvas,
}

impl State {
    fn new() -> Self {
        Self {
            mode: Mode::Calculator,
            calc: Calculator::new(),
            fun: None,
            domain: Domain::default(),
            win: Window::default(),
            canvas: Canvas::default(),
        }
    }
}

fn try_main() -> anyhow::Result<()> {
    let mut state = State::new();

    let mut stdout = BufWriter::new(stdout());
    loop {
        match state.mode {
            Mode::Calculator => writeln!(stdout, "[{}]", state.calc.display())?,
            Mode::Graph => match state.fun {
                Some(ref fun) => writeln!(stdout, "f({X}) = {}", fun.src())?,
                None => writeln!(stdout, "f({X}) is not set")?,
            },
        }

        let line = shell::input(&mut stdout, "> ")?;
        writeln!(stdout)?;

        if let Ok(cmd) = line.to_ascii_lowercase().parse::<Command>() {
            match cmd {
                Command::Help => help(&mut stdout)?,

                Command::Quit => break,

                Command::Mode => toggle_mode(&mut stdout, &mut state)?,

                Command::SetExpr => set_expr(&mut stdout, &mut state)?,

                Command::Plot => plot_expr(&mut stdout, &mut state)?,

                Command::SetDomain => set_domain(&mut stdout, &mut state)?,

                Command::SetWin => set_win(&mut stdout, &mut state)?,

                Command::SetCanvas => set_canvas(&mut stdout, &mut state)?,

                Command::PrintProg => {
                    if let Some(ref fun) = state.fun {
                        shell::dump_program(&mut stdout, fun.program(), format_args!("program"))?;
                    } else {
                        shell::expr_undefined(&mut stdout)?;
                    }
                }
            }
        } else if state.mode == Mode::Calculator {
            press_keys(&mut stdout, &mut state, &line)?;
        } else {
            writeln!(stdout, r#"Unknown command, try "help" for help"#)?;
            let names = Command::exhaustive().iter().map(|c| c.name());
            if let Some(name) = shell::suggest(&line, names) {
                writeln!(stdout, "note: command '{name}' has a similar name")?;
            }
        }

        writeln!(stdout)?;
    }
    stdout.flush()?;
    Ok(())
}

fn help<W: Write>(mut out: W) -> anyhow::Result<()> {
    for c in Command::exhaustive() {
        writeln!(out, "{name}: {help}", name = c.name(), help = c.help())?;
    }
    writeln!(out)?;
    writeln!(out, "in calculator mode, anything else is read as keys:")?;
    writeln!(out, "  digits: 0-9 .")?;
    write!(out, "  operators:")?;
    for op in Operator::exhaustive() {
        write!(out, " {} ({})", op.symbol(), op.ascii())?;
    }
    writeln!(out)?;
    write!(out, "  functions:")?;
    for f in SpecialFn::exhaustive() {
        write!(out, " {}", f.name())?;
    }
    writeln!(out, " (degrees for sin, cos, tan)")?;
    writeln!(out, "  other: = c ( )")?;
    Ok(())
}

fn toggle_mode<W: Write>(mut out: W, state: &mut State) -> anyhow::Result<()> {
    let next = match state.mode {
        Mode::Calculator => {
            if state.fun.is_none() {
                compile_expr(&mut out, state, String::from(X))?;
            }
            Mode::Graph
        }
        Mode::Graph => Mode::Calculator,
    };
    state.mode = next;
    log::debug!("switched to {:?} mode", state.mode);
    Ok(())
}

fn press_keys<W: Write>(mut out: W, state: &mut State, line: &str) -> anyhow::Result<()> {
    let keys = calc::keys(line);

    // parentheses are keys on the keypad; they pass the next operand through
    let unknown = keys.iter().find_map(|key| match key {
        Key::Operator(Pending::PassThrough(sym)) if !matches!(sym.as_str(), "(" | ")") => {
            Some(sym)
        }
        _ => None,
    });
    if let Some(sym) = unknown {
        writeln!(out, "error: unknown key '{sym}', try \"help\" for help")?;
        let names = Command::exhaustive()
            .iter()
            .map(|c| c.name())
            .chain(SpecialFn::exhaustive().iter().map(|f| f.name()))
            .chain(Operator::exhaustive().iter().map(|op| op.ascii()));
        if let Some(name) = shell::suggest(sym, names) {
            writeln!(out, "note: '{name}' has a similar name")?;
        }
        return Ok(());
    }

    for key in keys {
        log::trace!("key {key:?}");
        // clearing the keypad starts the graph over too
        if matches!(key, Key::Clear) && state.fun.take().is_some() {
            log::debug!("cleared f({X})");
        }
        state.calc.press(key);
    }
    Ok(())
}

fn set_domain<W: Write>(mut out: W, state: &mut State) -> anyhow::Result<()> {
    writeln!(out, "domain = {:#}", state.domain)?;
    writeln!(out)?;
    writeln!(out, "note: leave blank to skip")?;

    let mut new = state.domain;
    for (name, dst) in [
        ("start", &mut new.start),
        ("end", &mut new.end),
        ("step", &mut new.step),
    ] {
        match shell::read_fromstr::<_, Number>(
            &mut out,
            format_args!("?{name} (is {cur}) = ", cur = *dst),
            true,
        )? {
            Ok(Some(val)) => *dst = val,
            Ok(None) => {}
            Err(_) => return Ok(()),
        }
    }

    if new.is_empty() {
        writeln!(
            out,
            "error: no points from {} to {} in steps of {}",
            new.start, new.end, new.step
        )?;
        writeln!(out, "note: the step must be positive and the end no less than the start")?;
        writeln!(out, "note: at most {} points are sampled", Domain::MAX_POINTS)?;
        return Ok(());
    }
    state.domain = new;
    Ok(())
}

fn set_win<W: Write>(mut out: W, state: &mut State) -> anyhow::Result<()> {
    writeln!(out, "win = {:#}", state.win)?;
    writeln!(out)?;
    writeln!(out, "note: leave blank to skip")?;

    let mut new = state.win.clone();
    for (name, dst) in [
        ("x min", &mut new.x.start),
        ("x max", &mut new.x.end),
        ("y min", &mut new.y.start),
        ("y max", &mut new.y.end),
    ] {
        match shell::read_fromstr::<_, Number>(
            &mut out,
            format_args!("?{name} (is {cur}) = ", cur = *dst),
            true,
        )? {
            Ok(Some(val)) => *dst = val,
            Ok(None) => {}
            Err(_) => return Ok(()),
        }
    }

    // the chart maps each range onto the canvas, so neither may be empty
    if !(new.x.start < new.x.end && new.y.start < new.y.end) {
        writeln!(out, "error: each minimum must be less than its maximum")?;
        return Ok(());
    }
    state.win = new;
    Ok(())
}

fn set_canvas<W: Write>(mut out: W, state: &mut State) -> anyhow::Result<()> {
    writeln!(out, "canvas = {}", state.canvas)?;
    writeln!(out)?;
    writeln!(out, "note: leave blank to skip, sizes must be nonzero integers")?;

    for (name, dst) in [
        ("width", &mut state.canvas.width),
        ("height", &mut state.canvas.height),
    ] {
        match shell::read_fromstr::<_, NonZeroU32>(
            &mut out,
            format_args!("?{name} (is {cur}) = ", cur = *dst),
            true,
        )? {
            Ok(Some(val)) => *dst = val.get(),
            Ok(None) => {}
            Err(_) => return Ok(()),
        }
    }

    Ok(())
}

fn plot_expr<W: Write>(mut out: W, state: &mut State) -> anyhow::Result<()> {
    let Some(ref mut fun) = state.fun else {
        shell::expr_undefined(&mut out)?;
        return Ok(());
    };

    // every sample fails the same way when the program is malformed, so
    // check one before writing anything
    if let Err(err) = fun.try_at(state.domain.start) {
        let loc = err.op.clone().map(|op| op.loc);
        shell::underline(&mut out, &loc.clone().unwrap_or(SubStr::end(fun.src())))?;
        writeln!(out, "evaluation error: {err}")?;

        if loc.is_none() {
            writeln!(
                out,
                "note: exactly 1 final value is expected on the stack after evaluation"
            )?;
        }

        match err.typ {
            EvalErrTyp::Empty | EvalErrTyp::MissingArgs { .. } | EvalErrTyp::NullVar { .. } => {}

            EvalErrTyp::StackMismatch { .. } => {
                writeln!(
                    out,
                    "note: implicit multiplication is not supported, so for example '5x' would be '5*x'",
                )?;
            }

            EvalErrTyp::UndefinedIdent { text } => {
                let idents = fun.idents();
                let names = idents.keys().map(|k| k.get());
                if let Some(name) = shell::suggest(text.get(), names) {
                    let kind = idents
                        .iter()
                        .find(|(key, _)| key.get() == name)
                        .map_or("identifier", |(_, ident)| ident.kind());
                    writeln!(out, "note: {kind} '{name}' has a similar name")?;
                }
            }
        }
        return Ok(());
    }

    let curve = fun.sample(&state.domain);
    log::info!("sampled {} points of {}", curve.len(), fun.src());

    let now = Local::now();
    let data_path = output_filename(now, "data");
    let svg_path = output_filename(now, "svg");
    let mut data = BufWriter::new(
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&data_path)
            .context("failed to open output data file")?,
    );
    let mut svg = BufWriter::new(
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&svg_path)
            .context("failed to open output svg file")?,
    );

    plot::write_data(&mut data, &curve).context("failed to write to output data file")?;
    data.flush()?;
    data.get_mut().sync_data()?;

    plot::write_svg(
        &mut svg,
        &curve,
        &state.win,
        &state.canvas,
        format_args!("f({X}) = {}", fun.src()),
    )
    .context("failed to write to output svg file")?;
    svg.flush()?;
    svg.get_mut().sync_data()?;

    writeln!(out, "sampled {} points", curve.len())?;
    writeln!(out, "wrote {data_path}")?;
    writeln!(out, "wrote {svg_path}")?;
    Ok(())
}

fn set_expr<W: Write>(mut out: W, state: &mut State) -> anyhow::Result<()> {
    let input = shell::input(&mut out, format_args!("f({X}) = "))?;
    if input.is_empty() {
        return Ok(());
    }
    compile_expr(&mut out, state, input)
}

fn compile_expr<W: Write>(mut out: W, state: &mut State, input: String) -> anyhow::Result<()> {
    let err = match Function::compile(input) {
        Ok(fun) => {
            state.fun = Some(fun);
            return Ok(());
        }
        Err(err) => err,
    };

    writeln!(out)?;
    shell::underline(&mut out, &err.loc)?;
    writeln!(out, "parse error: {}", err.typ)?;
    match err.typ {
        ParseErrTyp::LexErr(LexErrTyp::InvalidChar) => {
            writeln!(
                out,
                "note: available tokens are numbers, alphabetic identifiers, and symbols +-*/^,()"
            )?;
        }

        ParseErrTyp::LexErr(LexErrTyp::Unsupported(typ)) => match typ {
            TokTyp::XGreater | TokTyp::XLess => {
                writeln!(out, "note: expected an expression but found an inequality")?;
            }
            TokTyp::XEqual => {
                writeln!(out, "note: expected an expression but found an equation")?;
            }
            TokTyp::XPipe => {
                writeln!(out, "note: use the 'abs' function to compute absolute value")?
            }
            _ => {}
        },

        ParseErrTyp::ParseNum(_) => writeln!(out, "note: parsing as floating point number")?,

        ParseErrTyp::ParenMismatch => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_key_forgets_the_function() {
        let mut state = State::new();
        let mut out = Vec::new();
        compile_expr(&mut out, &mut state, String::from("x ^ 2")).unwrap();
        assert!(state.fun.is_some());

        press_keys(&mut out, &mut state, "7 + 8").unwrap();
        assert!(state.fun.is_some());

        press_keys(&mut out, &mut state, "c").unwrap();
        assert!(state.fun.is_none());
        assert_eq!(state.calc.display(), "0");
    }

    #[test]
    fn unknown_keys_change_nothing() {
        let mut state = State::new();
        let mut out = Vec::new();
        compile_expr(&mut out, &mut state, String::from("x")).unwrap();
        press_keys(&mut out, &mut state, "1 c qwerty").unwrap();
        assert!(state.fun.is_some());
        assert_eq!(state.calc.display(), "0");
        assert!(String::from_utf8(out).unwrap().contains("unknown key 'qwerty'"));
    }
}
