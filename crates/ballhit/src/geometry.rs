//! Lab-space geometry: positions, offsets and rotation transforms.
//!
//! Lab space follows screen conventions: the origin is the top-left corner
//! of the drawing surface and `y` grows downward. A positive rotation angle
//! turns clockwise on screen.
//!
//! ```text
//!   ┌───── +x
//!   │
//!   │
//!   +y
//! ```

use core::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// A point on the drawing surface.
///
/// # Example
///
/// ```rust
/// use ballhit::Position;
///
/// let p = Position::new(200.0, 150.0);
/// assert_eq!(p.cx, 200.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate.
    pub cx: f64,
    /// Vertical coordinate.
    pub cy: f64,
}

impl Position {
    /// Creates a new position.
    #[inline]
    pub const fn new(cx: f64, cy: f64) -> Self {
        Self { cx, cy }
    }

    /// Euclidean distance to another position.
    #[inline]
    pub fn distance(self, other: Position) -> f64 {
        (self - other).length()
    }
}

/// A displacement between two positions.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Offset {
    /// Horizontal component.
    pub dx: f64,
    /// Vertical component.
    pub dy: f64,
}

impl Offset {
    /// Creates a new offset.
    #[inline]
    pub const fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    /// Length of the offset.
    #[inline]
    pub fn length(self) -> f64 {
        self.dx.hypot(self.dy)
    }
}

impl Add<Offset> for Position {
    type Output = Position;

    #[inline]
    fn add(self, o: Offset) -> Position {
        Position {
            cx: self.cx + o.dx,
            cy: self.cy + o.dy,
        }
    }
}

impl Sub for Position {
    type Output = Offset;

    #[inline]
    fn sub(self, other: Position) -> Offset {
        Offset {
            dx: self.cx - other.cx,
            dy: self.cy - other.cy,
        }
    }
}

/// A rotation by `angle` degrees around `pivot`.
///
/// This is the only transform the lab ever applies to a shape: arms and the
/// balls they carry are rotated around the arm's pivot.
///
/// # Example
///
/// ```rust
/// use ballhit::{Position, Rotation};
///
/// let quarter = Rotation::new(90.0, Position::new(0.0, 0.0));
/// let p = quarter.apply(Position::new(10.0, 0.0));
/// assert!((p.cx - 0.0).abs() < 1e-9);
/// assert!((p.cy - 10.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    /// Rotation angle in degrees, clockwise on screen.
    pub angle: f64,
    /// Fixed point of the rotation.
    pub pivot: Position,
}

impl Rotation {
    /// Creates a rotation of `angle` degrees around `pivot`.
    #[inline]
    pub const fn new(angle: f64, pivot: Position) -> Self {
        Self { angle, pivot }
    }

    /// Returns `true` if this rotation leaves every point where it is.
    #[inline]
    pub fn is_identity(&self) -> bool {
        self.angle == 0.0
    }

    /// Maps a point through the rotation.
    pub fn apply(&self, p: Position) -> Position {
        let (sin, cos) = self.angle.to_radians().sin_cos();
        let d = p - self.pivot;
        Position {
            cx: self.pivot.cx + d.dx * cos - d.dy * sin,
            cy: self.pivot.cy + d.dx * sin + d.dy * cos,
        }
    }
}
