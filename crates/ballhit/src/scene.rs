//! Drawing the bench.
//!
//! The lab knows what the bench looks like but not how to put pixels
//! anywhere. [`Lab::draw`] describes the whole scene as a sequence of
//! [`Shape`]s, each with an optional [`Rotation`], and hands them to a
//! [`Canvas`]. Redrawing after every tick gives an animation.
//!
//! ```rust
//! use ballhit::{Canvas, Lab, Rotation, Shape};
//!
//! #[derive(Default)]
//! struct Count(usize);
//!
//! impl Canvas for Count {
//!     fn draw(&mut self, _shape: &Shape, _transform: Option<Rotation>) {
//!         self.0 += 1;
//!     }
//! }
//!
//! let mut canvas = Count::default();
//! Lab::default().draw(&mut canvas);
//! assert!(canvas.0 > 100);
//! ```

use crate::ball::Material;
use crate::geometry::{Position, Rotation};
use crate::lab::Lab;
use crate::pendulum::Side;

/// Semantic fill or stroke colors. Canvases pick the actual look.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Paint {
    /// Outlines, arms and labels.
    Ink,
    /// Stand and scale bodies.
    Stand,
    /// Protractor bands.
    Band,
    /// Button faces.
    Button,
    /// Background of the numeric readouts.
    Readout,
    /// Digits on the readouts.
    ReadoutText,
    /// A ball of the given material.
    Ball(Material),
}

/// A primitive shape in lab coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Filled circle.
    Circle {
        /// Center point.
        center: Position,
        /// Radius.
        radius: f64,
        /// Fill.
        paint: Paint,
    },
    /// Filled, outlined rectangle.
    Rect {
        /// Top-left corner.
        origin: Position,
        /// Width.
        width: f64,
        /// Height.
        height: f64,
        /// Fill.
        paint: Paint,
    },
    /// Straight stroke.
    Line {
        /// Start point.
        from: Position,
        /// End point.
        to: Position,
        /// Stroke width.
        width: f64,
    },
    /// Filled polygon.
    Polygon {
        /// Corner points in order.
        points: Vec<Position>,
        /// Fill.
        paint: Paint,
    },
    /// A wide circular stroke from `from` to `to` around a center `radius`
    /// away from both.
    Arc {
        /// Start point.
        from: Position,
        /// End point.
        to: Position,
        /// Arc radius.
        radius: f64,
        /// Stroke width.
        width: f64,
        /// `true` to sweep clockwise on screen.
        clockwise: bool,
        /// Stroke color.
        paint: Paint,
    },
    /// A run of text with its baseline starting at `at`.
    Text {
        /// Baseline start.
        at: Position,
        /// Text to show.
        content: String,
        /// Font size.
        size: f64,
        /// Text color.
        paint: Paint,
    },
}

/// Something the scene can be drawn onto.
pub trait Canvas {
    /// Draws one shape, rotated by `transform` when given.
    fn draw(&mut self, shape: &Shape, transform: Option<Rotation>);
}

/// Protractor tick lengths past the band's inner edge.
const TICK: f64 = 10.0;
const TICK_FIVE: f64 = 15.0;
const TICK_TEN: f64 = 20.0;

impl Lab {
    /// Draws the whole bench in back-to-front order.
    pub fn draw(&self, canvas: &mut impl Canvas) {
        self.draw_scale(canvas);
        self.draw_stand(canvas);
        self.draw_controls(canvas);
        self.draw_arms(canvas);
        self.draw_balls(canvas);
    }

    fn draw_scale(&self, canvas: &mut impl Canvas) {
        let p = self.config().scale_point;

        canvas.draw(
            &Shape::Rect {
                origin: Position::new(0.0, p.cy - 100.0),
                width: p.cx + 40.0,
                height: 40.0,
                paint: Paint::Stand,
            },
            None,
        );
        line(canvas, Position::new(p.cx, p.cy - 60.0), p, 1.0, None);
        holder(canvas, p, None);

        text(canvas, Position::new(p.cx - 155.0, p.cy - 70.0), "Scale (kg)", 20.0, Paint::Ink);
        readout(
            canvas,
            Position::new(p.cx - 65.0, p.cy - 95.0),
            &format!("{:.3}", self.scale_reading()),
        );
    }

    fn draw_stand(&self, canvas: &mut impl Canvas) {
        let c = self.system().center();

        line(canvas, Position::new(c.cx - 20.0, c.cy + 192.0), Position::new(c.cx - 40.0, c.cy + 170.0), 4.0, None);
        line(canvas, Position::new(c.cx + 20.0, c.cy + 192.0), Position::new(c.cx + 40.0, c.cy + 170.0), 4.0, None);
        canvas.draw(
            &Shape::Rect {
                origin: Position::new(c.cx - 150.0, c.cy + 190.0),
                width: 300.0,
                height: 60.0,
                paint: Paint::Stand,
            },
            None,
        );
        line(canvas, Position::new(c.cx, c.cy - 60.0), c, 4.0, None);
        line(canvas, Position::new(c.cx - 20.0, c.cy), Position::new(c.cx + 20.0, c.cy), 4.0, None);

        for side in [Side::Left, Side::Right] {
            self.draw_protractor(canvas, side);
        }
    }

    /// A quarter-circle band under an arm, graduated every degree from 0 to
    /// 90 and labelled every ten.
    fn draw_protractor(&self, canvas: &mut impl Canvas, side: Side) {
        let system = self.system();
        let pivot = system.arm(side).pivot();
        let inner = system.len() + 15.0;
        let (outward, mirror) = match side {
            Side::Left => (-1.0, 1.0),
            Side::Right => (1.0, -1.0),
        };
        let bottom = Position::new(pivot.cx, pivot.cy + inner);

        canvas.draw(
            &Shape::Arc {
                from: bottom,
                to: Position::new(pivot.cx + outward * inner, pivot.cy),
                radius: inner,
                width: 40.0,
                clockwise: side == Side::Left,
                paint: Paint::Band,
            },
            None,
        );

        for d in 0..=90u32 {
            let len = if d % 10 == 0 {
                TICK_TEN
            } else if d % 5 == 0 {
                TICK_FIVE
            } else {
                TICK
            };
            let rotation = Rotation::new(mirror * f64::from(d), pivot);
            line(canvas, bottom, Position::new(bottom.cx, bottom.cy + len), 1.0, Some(rotation));
        }

        for d in (10..=90u32).step_by(10) {
            let rotation = Rotation::new(mirror * f64::from(d), pivot);
            canvas.draw(
                &Shape::Text {
                    at: Position::new(bottom.cx, bottom.cy - 3.0),
                    content: d.to_string(),
                    size: 15.0,
                    paint: Paint::Ink,
                },
                Some(rotation),
            );
        }
    }

    fn draw_controls(&self, canvas: &mut impl Canvas) {
        let c = self.system().center();
        let y = c.cy + 200.0;

        for (x, label) in [(c.cx - 140.0, "Start"), (c.cx - 50.0, "Reset")] {
            canvas.draw(
                &Shape::Rect {
                    origin: Position::new(x, y),
                    width: 80.0,
                    height: 30.0,
                    paint: Paint::Button,
                },
                None,
            );
            text(canvas, Position::new(x + 8.0, y + 22.0), label, 25.0, Paint::Ink);
        }

        readout(
            canvas,
            Position::new(c.cx + 40.0, y),
            &format!("{:.4}", self.timer_reading()),
        );
    }

    fn draw_arms(&self, canvas: &mut impl Canvas) {
        for side in [Side::Left, Side::Right] {
            let arm = self.system().arm(side);
            let transform = Some(arm.transform());
            line(canvas, arm.pivot(), arm.tip(), 1.0, transform);
            holder(canvas, arm.tip(), transform);
        }
    }

    fn draw_balls(&self, canvas: &mut impl Canvas) {
        for (_, ball) in self.balls().iter() {
            canvas.draw(
                &Shape::Circle {
                    center: ball.position(),
                    radius: ball.radius(),
                    paint: Paint::Ball(ball.material()),
                },
                ball.transform(),
            );
        }
    }
}

fn line(canvas: &mut impl Canvas, from: Position, to: Position, width: f64, transform: Option<Rotation>) {
    canvas.draw(&Shape::Line { from, to, width }, transform);
}

/// The small downward triangle that holds a ball.
fn holder(canvas: &mut impl Canvas, tip: Position, transform: Option<Rotation>) {
    canvas.draw(
        &Shape::Polygon {
            points: vec![
                Position::new(tip.cx - 5.0, tip.cy),
                Position::new(tip.cx + 5.0, tip.cy),
                Position::new(tip.cx, tip.cy + 15.0),
            ],
            paint: Paint::Ink,
        },
        transform,
    );
}

fn text(canvas: &mut impl Canvas, at: Position, content: &str, size: f64, paint: Paint) {
    canvas.draw(
        &Shape::Text {
            at,
            content: content.to_string(),
            size,
            paint,
        },
        None,
    );
}

fn readout(canvas: &mut impl Canvas, origin: Position, value: &str) {
    canvas.draw(
        &Shape::Rect {
            origin,
            width: 100.0,
            height: 30.0,
            paint: Paint::Readout,
        },
        None,
    );
    text(
        canvas,
        Position::new(origin.cx + 5.0, origin.cy + 25.0),
        value,
        30.0,
        Paint::ReadoutText,
    );
}
