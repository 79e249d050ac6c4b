//! SVG backend for [`Lab::draw`](ballhit::Lab::draw).

use std::fmt::Write as _;

use ballhit::{Canvas, Material, Paint, Position, Rotation, Shape};

/// Drawing surface of the stock bench.
pub const WIDTH: f64 = 600.0;
/// Drawing surface of the stock bench.
pub const HEIGHT: f64 = 400.0;

/// Collects shapes into an SVG document.
#[derive(Debug, Clone)]
pub struct SvgCanvas {
    width: f64,
    height: f64,
    body: String,
}

impl Default for SvgCanvas {
    fn default() -> Self {
        Self::new(WIDTH, HEIGHT)
    }
}

impl SvgCanvas {
    /// Empty canvas of the given size.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            body: String::new(),
        }
    }

    /// Closes the document and returns it.
    pub fn finish(self) -> String {
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n{body}</svg>\n",
            w = self.width,
            h = self.height,
            body = self.body,
        )
    }
}

impl Canvas for SvgCanvas {
    fn draw(&mut self, shape: &Shape, transform: Option<Rotation>) {
        let t = transform_attr(transform);
        // Writing into a String cannot fail.
        let _ = match shape {
            Shape::Circle {
                center,
                radius,
                paint,
            } => writeln!(
                self.body,
                "  <circle cx=\"{}\" cy=\"{}\" r=\"{radius}\" fill=\"{}\" stroke=\"#000\"{t}/>",
                center.cx,
                center.cy,
                color(*paint),
            ),
            Shape::Rect {
                origin,
                width,
                height,
                paint,
            } => writeln!(
                self.body,
                "  <rect x=\"{}\" y=\"{}\" width=\"{width}\" height=\"{height}\" fill=\"{}\" stroke=\"#000\" stroke-width=\"2\"{t}/>",
                origin.cx,
                origin.cy,
                color(*paint),
            ),
            Shape::Line { from, to, width } => writeln!(
                self.body,
                "  <line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"#000\" stroke-width=\"{width}\"{t}/>",
                from.cx, from.cy, to.cx, to.cy,
            ),
            Shape::Polygon { points, paint } => writeln!(
                self.body,
                "  <polygon points=\"{}\" fill=\"{}\" stroke=\"#000\"{t}/>",
                points_attr(points),
                color(*paint),
            ),
            Shape::Arc {
                from,
                to,
                radius,
                width,
                clockwise,
                paint,
            } => writeln!(
                self.body,
                "  <path d=\"M{} {} A {radius} {radius} 0 0 {} {} {}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{width}\"{t}/>",
                from.cx,
                from.cy,
                u8::from(*clockwise),
                to.cx,
                to.cy,
                color(*paint),
            ),
            Shape::Text {
                at,
                content,
                size,
                paint,
            } => writeln!(
                self.body,
                "  <text x=\"{}\" y=\"{}\" font-size=\"{size}\" fill=\"{}\"{t}>{}</text>",
                at.cx,
                at.cy,
                color(*paint),
                escape(content),
            ),
        };
    }
}

fn transform_attr(transform: Option<Rotation>) -> String {
    match transform {
        Some(r) if !r.is_identity() => format!(
            " transform=\"rotate({} {} {})\"",
            r.angle, r.pivot.cx, r.pivot.cy
        ),
        _ => String::new(),
    }
}

fn points_attr(points: &[Position]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", p.cx, p.cy))
        .collect::<Vec<_>>()
        .join(" ")
}

const fn color(paint: Paint) -> &'static str {
    match paint {
        Paint::Ink => "#000",
        Paint::Stand => "rgb(0, 140, 255)",
        Paint::Band => "#b4b4b4",
        Paint::Button => "#969696",
        Paint::Readout => "#00f",
        Paint::ReadoutText => "#fff",
        Paint::Ball(Material::Metal) => "#888",
        Paint::Ball(Material::Plasticine) => "#622",
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
