//! Draggable masses and the rack that owns them.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::{Position, Rotation};

/// What a ball is made of. Decides how it collides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Material {
    /// Hard ball; two metal balls collide elastically.
    Metal,
    /// Soft ball; any pair with a plasticine ball sticks together.
    #[default]
    Plasticine,
}

impl Material {
    /// Returns the lowercase name of the material.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Metal => "metal",
            Self::Plasticine => "plasticine",
        }
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handle to a ball inside a [`BallSet`].
///
/// Pendulum slots and the scale hold handles, never the balls themselves,
/// so the same ball can move freely between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BallId(usize);

impl BallId {
    /// Position of the ball in its rack.
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for BallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A partial position change. Missing components keep their current value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PositionUpdate {
    /// New horizontal coordinate, if any.
    pub cx: Option<f64>,
    /// New vertical coordinate, if any.
    pub cy: Option<f64>,
}

impl PositionUpdate {
    /// Update only the horizontal coordinate.
    pub const fn cx(cx: f64) -> Self {
        Self {
            cx: Some(cx),
            cy: None,
        }
    }

    /// Update only the vertical coordinate.
    pub const fn cy(cy: f64) -> Self {
        Self {
            cx: None,
            cy: Some(cy),
        }
    }
}

impl From<Position> for PositionUpdate {
    fn from(p: Position) -> Self {
        Self {
            cx: Some(p.cx),
            cy: Some(p.cy),
        }
    }
}

/// A mass that can hang on a pendulum arm, sit on the scale or rest at home.
///
/// # Example
///
/// ```rust
/// use ballhit::{Ball, Material, Position};
///
/// let mut ball = Ball::new(0.02, 6.5, Material::Metal, Position::new(100.0, 100.0));
/// assert!(ball.is_near_point(105.0, 104.0, 7.0));
/// assert!(!ball.is_near_point(108.0, 100.0, 7.0));
///
/// ball.set_position(Position::new(0.0, 40.0));
/// assert_eq!(ball.position(), Position::new(0.0, 40.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    mass: f64,
    radius: f64,
    material: Material,
    home: Position,
    pos: Position,
    transform: Option<Rotation>,
}

impl Ball {
    /// Creates a ball resting at `home`.
    pub const fn new(mass: f64, radius: f64, material: Material, home: Position) -> Self {
        Self {
            mass,
            radius,
            material,
            home,
            pos: home,
            transform: None,
        }
    }

    /// Mass in kilograms.
    pub const fn mass(&self) -> f64 {
        self.mass
    }

    /// Drawing radius.
    pub const fn radius(&self) -> f64 {
        self.radius
    }

    /// Material of the ball.
    pub const fn material(&self) -> Material {
        self.material
    }

    /// Returns `true` for metal balls.
    pub const fn is_metal(&self) -> bool {
        matches!(self.material, Material::Metal)
    }

    /// Returns `true` for plasticine balls.
    pub const fn is_plasticine(&self) -> bool {
        !self.is_metal()
    }

    /// Resting place of the ball.
    pub const fn home(&self) -> Position {
        self.home
    }

    /// Untransformed position of the ball's center.
    pub const fn position(&self) -> Position {
        self.pos
    }

    /// Rotation applied while the ball rides a swinging arm.
    pub const fn transform(&self) -> Option<Rotation> {
        self.transform
    }

    /// Where the ball is drawn: its position mapped through its transform.
    pub fn rendered_center(&self) -> Position {
        self.transform
            .map_or(self.pos, |rotation| rotation.apply(self.pos))
    }

    /// Moves the ball. Components absent from `update` are left alone.
    pub fn set_position(&mut self, update: impl Into<PositionUpdate>) {
        let update = update.into();
        if let Some(cx) = update.cx {
            self.pos.cx = cx;
        }
        if let Some(cy) = update.cy {
            self.pos.cy = cy;
        }
    }

    /// Sends the ball back home and drops any transform.
    pub fn go_home(&mut self) {
        self.transform = None;
        self.set_position(self.home);
    }

    pub(crate) fn set_transform(&mut self, transform: Option<Rotation>) {
        self.transform = transform;
    }

    /// Square hit-test: both axis distances strictly below `radius`.
    pub fn is_near_point(&self, x: f64, y: f64, radius: f64) -> bool {
        (self.pos.cx - x).abs() < radius && (self.pos.cy - y).abs() < radius
    }
}

/// Owning arena for every ball in the lab.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BallSet {
    balls: Vec<Ball>,
}

impl BallSet {
    /// Creates an empty rack.
    pub const fn new() -> Self {
        Self { balls: Vec::new() }
    }

    /// Adds a ball and returns its handle.
    pub fn insert(&mut self, ball: Ball) -> BallId {
        self.balls.push(ball);
        BallId(self.balls.len() - 1)
    }

    /// Looks up a ball.
    pub fn get(&self, id: BallId) -> Option<&Ball> {
        self.balls.get(id.0)
    }

    /// Looks up a ball mutably.
    pub fn get_mut(&mut self, id: BallId) -> Option<&mut Ball> {
        self.balls.get_mut(id.0)
    }

    /// Handle for the ball at `index`, if there is one.
    pub fn id(&self, index: usize) -> Option<BallId> {
        (index < self.balls.len()).then_some(BallId(index))
    }

    /// Number of balls in the rack.
    pub fn len(&self) -> usize {
        self.balls.len()
    }

    /// Returns `true` if the rack holds no balls.
    pub fn is_empty(&self) -> bool {
        self.balls.is_empty()
    }

    /// Iterates over `(handle, ball)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (BallId, &Ball)> {
        self.balls.iter().enumerate().map(|(i, b)| (BallId(i), b))
    }

    /// Mass of a ball, or `NaN` for an unknown handle.
    pub(crate) fn mass_of(&self, id: BallId) -> f64 {
        self.get(id).map_or(f64::NAN, Ball::mass)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ball_at(cx: f64, cy: f64) -> Ball {
        Ball::new(0.03, 6.5, Material::Plasticine, Position::new(cx, cy))
    }

    #[test]
    fn test_hit_test_is_square_and_strict() {
        let ball = ball_at(100.0, 100.0);
        assert!(ball.is_near_point(105.0, 104.0, 7.0));
        assert!(!ball.is_near_point(108.0, 100.0, 7.0));
        // Exactly on the edge does not count.
        assert!(!ball.is_near_point(107.0, 100.0, 7.0));
        // A corner that a circular test would reject.
        assert!(ball.is_near_point(106.0, 106.0, 7.0));
    }

    #[test]
    fn test_partial_update_keeps_other_axis() {
        let mut ball = ball_at(10.0, 20.0);
        ball.set_position(PositionUpdate::cx(30.0));
        assert_eq!(ball.position(), Position::new(30.0, 20.0));
        ball.set_position(PositionUpdate::cy(5.0));
        assert_eq!(ball.position(), Position::new(30.0, 5.0));
        ball.set_position(PositionUpdate::default());
        assert_eq!(ball.position(), Position::new(30.0, 5.0));
    }

    #[test]
    fn test_zero_coordinate_is_applied() {
        let mut ball = ball_at(10.0, 20.0);
        ball.set_position(Position::new(0.0, 0.0));
        assert_eq!(ball.position(), Position::new(0.0, 0.0));
    }

    #[test]
    fn test_go_home_clears_transform() {
        let mut ball = ball_at(10.0, 20.0);
        ball.set_position(Position::new(193.0, 300.0));
        ball.set_transform(Some(Rotation::new(20.0, Position::new(193.0, 150.0))));
        assert_ne!(ball.rendered_center(), ball.position());

        ball.go_home();
        assert_eq!(ball.position(), Position::new(10.0, 20.0));
        assert!(ball.transform().is_none());
        assert_eq!(ball.rendered_center(), ball.position());
    }

    #[test]
    fn test_material_flags() {
        let metal = Ball::new(0.02, 6.5, Material::Metal, Position::default());
        assert!(metal.is_metal());
        assert!(!metal.is_plasticine());
        assert_eq!(Material::Plasticine.to_string(), "plasticine");
    }

    #[test]
    fn test_ball_set_handles() {
        let mut set = BallSet::new();
        assert!(set.is_empty());
        let a = set.insert(ball_at(0.0, 0.0));
        let b = set.insert(ball_at(1.0, 1.0));
        assert_eq!(set.len(), 2);
        assert_eq!(set.id(1), Some(b));
        assert_eq!(set.id(2), None);
        assert_eq!(a.index(), 0);
        assert_eq!(set.iter().map(|(id, _)| id).collect::<Vec<_>>(), vec![a, b]);
        assert!(set.mass_of(BallId(9)).is_nan());
    }
}
