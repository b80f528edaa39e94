// SPDX: CC0-1.0

//! Drawing a sampled curve as an SVG chart.

use crate::{Number, Point, Window};
use core::fmt;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use std::io::{self, Write};

const AXIS_COLOR: RGBColor = RGBColor(0x66, 0x66, 0x66);
const CURVE_COLOR: RGBColor = RGBColor(0x4c, 0xaf, 0x50);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 300,
            height: 200,
        }
    }
}

impl fmt::Display for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PlotErr {
    #[error("failed to draw chart")]
    Draw(#[from] DrawingAreaErrorKind<io::Error>),

    #[error("failed to write chart")]
    Write(#[from] io::Error),
}

/// Splits `curve` wherever a sample is not a finite number, so a pole such
/// as the one in `1 / x` is not joined across.
pub fn segments(curve: &[Point<Number>]) -> Vec<Vec<(Number, Number)>> {
    let mut segments = Vec::new();
    let mut cur = Vec::new();
    for p in curve {
        if p.x.is_finite() && p.y.is_finite() {
            cur.push((p.x, p.y));
        } else if !cur.is_empty() {
            segments.push(core::mem::take(&mut cur));
        }
    }
    if !cur.is_empty() {
        segments.push(cur);
    }
    segments
}

fn draw(
    buf: &mut String,
    curve: &[Point<Number>],
    window: &Window,
    canvas: &Canvas,
    title: &str,
) -> Result<(), DrawingAreaErrorKind<io::Error>> {
    let root = SVGBackend::with_string(buf, (canvas.width, canvas.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 14).into_font())
        .margin(5)
        .x_label_area_size(20)
        .y_label_area_size(30)
        .build_cartesian_2d(window.x.clone(), window.y.clone())?;

    chart
        .configure_mesh()
        .disable_mesh()
        .axis_style(&AXIS_COLOR)
        .draw()?;

    // axes through the origin, when it is in view
    if window.y.contains(&0.0) {
        chart.draw_series(LineSeries::new(
            [(window.x.start, 0.0), (window.x.end, 0.0)],
            &AXIS_COLOR,
        ))?;
    }
    if window.x.contains(&0.0) {
        chart.draw_series(LineSeries::new(
            [(0.0, window.y.start), (0.0, window.y.end)],
            &AXIS_COLOR,
        ))?;
    }

    for segment in segments(curve) {
        chart.draw_series(LineSeries::new(segment, CURVE_COLOR.stroke_width(2)))?;
    }

    root.present()?;
    Ok(())
}

pub fn write_svg<W: Write>(
    mut out: W,
    curve: &[Point<Number>],
    window: &Window,
    canvas: &Canvas,
    title: impl fmt::Display,
) -> Result<(), PlotErr> {
    let mut buf = String::new();
    draw(&mut buf, curve, window, canvas, &title.to_string())?;
    out.write_all(buf.as_bytes())?;
    Ok(())
}

/// One `x y` line per sample.
pub fn write_data<W: Write>(mut out: W, curve: &[Point<Number>]) -> io::Result<()> {
    for Point { x, y } in curve {
        writeln!(out, "{x} {y}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample_sequence;

    fn curve_strokes(svg: &str) -> usize {
        svg.to_ascii_uppercase().matches("#4CAF50").count()
    }

    #[test]
    fn curve_breaks_at_non_finite_samples() {
        let curve = sample_sequence("1 / x", -2.0, 2.0, 1.0);
        let segments = segments(&curve);
        assert_eq!(
            segments,
            [vec![(-2.0, -0.5), (-1.0, -1.0)], vec![(1.0, 1.0), (2.0, 0.5)]]
        );

        let nan = [Point {
            x: 0.0,
            y: Number::NAN,
        }];
        assert!(super::segments(&nan).is_empty());
    }

    #[test]
    fn svg_output() {
        let curve = sample_sequence("x", -1.0, 1.0, 1.0);
        let mut out = Vec::new();
        write_svg(
            &mut out,
            &curve,
            &Window::default(),
            &Canvas::default(),
            "f(x) = x",
        )
        .unwrap();
        let svg = String::from_utf8(out).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"width="300""#));
        assert!(svg.contains(r#"height="200""#));
        assert!(svg.contains("f(x) = x"));
        assert_eq!(curve_strokes(&svg), 1);
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn svg_draws_one_stroke_per_segment() {
        let curve = sample_sequence("1 / x", -2.0, 2.0, 1.0);
        let mut out = Vec::new();
        let (win, canvas) = (Window::default(), Canvas::default());
        write_svg(&mut out, &curve, &win, &canvas, "f(x) = 1 / x").unwrap();
        assert_eq!(curve_strokes(&String::from_utf8(out).unwrap()), 2);

        let mut out = Vec::new();
        write_svg(&mut out, &[], &win, &canvas, "f(x) = 1 / x").unwrap();
        assert_eq!(curve_strokes(&String::from_utf8(out).unwrap()), 0);
    }

    #[test]
    fn data_output() {
        let curve = sample_sequence("x * 2", 0.0, 1.0, 0.5);
        let mut out = Vec::new();
        write_data(&mut out, &curve).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "0 0\n0.5 1\n1 2\n");
    }
}
