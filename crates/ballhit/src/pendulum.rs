//! The twin pendulum: two arms hanging side by side, each able to carry a
//! ball.
//!
//! Angles are stored per side in degrees. Positive angles swing each arm
//! outward: the left arm to the left, the right arm to the right. On screen
//! that means the right arm's rotation is mirrored.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::ball::{BallId, BallSet};
use crate::geometry::{Position, Rotation};
use crate::physics::Collision;

/// Effective physical length of both pendulums in meters.
pub const EFFECTIVE_LENGTH: f64 = 0.5;

/// One of the two pendulum arms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// The target arm, hit by the released ball.
    Left,
    /// The arm that is pulled back and released.
    Right,
}

impl Side {
    /// The opposite arm.
    pub const fn other(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Factor turning a side angle into a screen rotation angle.
    const fn mirror(self) -> f64 {
        match self {
            Self::Left => 1.0,
            Self::Right => -1.0,
        }
    }

    /// Horizontal direction from the center to the arm's pivot.
    const fn offset(self) -> f64 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Left => "left",
            Self::Right => "right",
        })
    }
}

/// A single arm: a rod from its pivot down to the ball holder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arm {
    side: Side,
    pivot: Position,
    tip: Position,
    angle: f64,
    ball: Option<BallId>,
}

impl Arm {
    fn new(side: Side, pivot: Position, len: f64) -> Self {
        Self {
            side,
            pivot,
            tip: Position::new(pivot.cx, pivot.cy + len),
            angle: 0.0,
            ball: None,
        }
    }

    /// Which arm this is.
    pub const fn side(&self) -> Side {
        self.side
    }

    /// Fixed rotation point.
    pub const fn pivot(&self) -> Position {
        self.pivot
    }

    /// Lower end of the arm at rest, where a ball is held.
    pub const fn tip(&self) -> Position {
        self.tip
    }

    /// Swing angle in degrees.
    pub const fn angle(&self) -> f64 {
        self.angle
    }

    /// Ball currently carried by the arm.
    pub const fn ball(&self) -> Option<BallId> {
        self.ball
    }

    /// Screen rotation for the arm and whatever it carries.
    pub fn transform(&self) -> Rotation {
        Rotation::new(self.side.mirror() * self.angle, self.pivot)
    }
}

/// Two arms sharing one stand.
///
/// The system only refers to balls by handle; the balls themselves live in a
/// [`BallSet`] that every mutating call receives.
///
/// # Example
///
/// ```rust
/// use ballhit::{Ball, BallSet, Material, PendulumSystem, Position, Side};
///
/// let mut balls = BallSet::new();
/// let a = balls.insert(Ball::new(0.02, 6.5, Material::Metal, Position::new(280.0, 45.0)));
/// let b = balls.insert(Ball::new(0.02, 6.5, Material::Metal, Position::new(295.0, 45.0)));
///
/// let mut system = PendulumSystem::new(Position::new(200.0, 150.0), 150.0, 7.0);
/// system.set_ball(Side::Left, a, &mut balls);
/// system.set_ball(Side::Right, b, &mut balls);
/// system.set_right_angle(30.0, &mut balls);
///
/// assert!(system.is_metal(&balls));
/// assert_eq!(balls.get(b).unwrap().position(), system.right_pos());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PendulumSystem {
    center: Position,
    len: f64,
    l: f64,
    dist: f64,
    left: Arm,
    right: Arm,
}

impl PendulumSystem {
    /// Builds both arms around `center`, each `dist` away from it and `len`
    /// long on screen.
    pub fn new(center: Position, len: f64, dist: f64) -> Self {
        let pivot = |side: Side| Position::new(center.cx + side.offset() * dist, center.cy);
        Self {
            center,
            len,
            l: EFFECTIVE_LENGTH,
            dist,
            left: Arm::new(Side::Left, pivot(Side::Left), len),
            right: Arm::new(Side::Right, pivot(Side::Right), len),
        }
    }

    /// Replaces the physical pendulum length used by the simulation.
    pub fn with_effective_length(mut self, l: f64) -> Self {
        self.l = l;
        self
    }

    /// Midpoint between the pivots.
    pub const fn center(&self) -> Position {
        self.center
    }

    /// On-screen arm length.
    pub const fn len(&self) -> f64 {
        self.len
    }

    /// Physical pendulum length in meters.
    pub const fn effective_length(&self) -> f64 {
        self.l
    }

    /// Horizontal distance from the center to either pivot.
    pub const fn dist(&self) -> f64 {
        self.dist
    }

    /// Read access to an arm.
    pub const fn arm(&self, side: Side) -> &Arm {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    const fn arm_mut(&mut self, side: Side) -> &mut Arm {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// Left swing angle in degrees.
    pub const fn left_angle(&self) -> f64 {
        self.left.angle
    }

    /// Right swing angle in degrees.
    pub const fn right_angle(&self) -> f64 {
        self.right.angle
    }

    /// Ball on the left arm.
    pub const fn left_ball(&self) -> Option<BallId> {
        self.left.ball
    }

    /// Ball on the right arm.
    pub const fn right_ball(&self) -> Option<BallId> {
        self.right.ball
    }

    /// Returns `true` when both arms carry a ball.
    pub const fn has_both_balls(&self) -> bool {
        self.left.ball.is_some() && self.right.ball.is_some()
    }

    /// Which arm holds `ball`, if any.
    pub fn holder_of(&self, ball: BallId) -> Option<Side> {
        [Side::Left, Side::Right]
            .into_iter()
            .find(|&side| self.arm(side).ball == Some(ball))
    }

    /// Ball-holding point of the left arm at rest.
    pub const fn left_pos(&self) -> Position {
        Position::new(self.center.cx - self.dist, self.center.cy + self.len)
    }

    /// Ball-holding point of the right arm at rest.
    pub const fn right_pos(&self) -> Position {
        Position::new(self.center.cx + self.dist, self.center.cy + self.len)
    }

    /// Ball-holding point of either arm at rest.
    pub const fn holding_pos(&self, side: Side) -> Position {
        match side {
            Side::Left => self.left_pos(),
            Side::Right => self.right_pos(),
        }
    }

    /// Swings the left arm (and its ball) to `a` degrees.
    pub fn set_left_angle(&mut self, a: f64, balls: &mut BallSet) {
        self.set_angle(Side::Left, a, balls);
    }

    /// Swings the right arm (and its ball) to `a` degrees.
    pub fn set_right_angle(&mut self, a: f64, balls: &mut BallSet) {
        self.set_angle(Side::Right, a, balls);
    }

    /// Stores the angle and rotates the arm's ball around the pivot.
    pub fn set_angle(&mut self, side: Side, a: f64, balls: &mut BallSet) {
        let arm = self.arm_mut(side);
        arm.angle = a;
        let transform = arm.transform();
        if let Some(ball) = arm.ball.and_then(|id| balls.get_mut(id)) {
            ball.set_transform(Some(transform));
        }
    }

    /// Hangs `ball` on the left arm. See [`set_ball`](Self::set_ball).
    pub fn set_left_ball(&mut self, ball: BallId, balls: &mut BallSet) {
        self.set_ball(Side::Left, ball, balls);
    }

    /// Hangs `ball` on the right arm. See [`set_ball`](Self::set_ball).
    pub fn set_right_ball(&mut self, ball: BallId, balls: &mut BallSet) {
        self.set_ball(Side::Right, ball, balls);
    }

    /// Hangs `ball` on an arm.
    ///
    /// A different ball already on that arm goes back home. If `ball` was on
    /// the other arm it leaves it. Unknown handles are ignored.
    pub fn set_ball(&mut self, side: Side, ball: BallId, balls: &mut BallSet) {
        if balls.get(ball).is_none() {
            return;
        }

        let other = self.arm_mut(side.other());
        if other.ball == Some(ball) {
            other.ball = None;
        }

        let holding = self.holding_pos(side);
        let arm = self.arm_mut(side);
        if let Some(prev) = arm.ball.filter(|&prev| prev != ball) {
            if let Some(prev) = balls.get_mut(prev) {
                prev.go_home();
            }
        }
        arm.ball = Some(ball);

        let transform = arm.transform();
        if let Some(b) = balls.get_mut(ball) {
            b.set_position(holding);
            b.set_transform((!transform.is_identity()).then_some(transform));
        }
    }

    /// Takes `ball` off whichever arm holds it.
    ///
    /// The ball keeps its on-screen place: its rotated center becomes its
    /// plain position. Returns the side it was taken from.
    pub fn detach(&mut self, ball: BallId, balls: &mut BallSet) -> Option<Side> {
        let side = self.holder_of(ball)?;
        self.arm_mut(side).ball = None;
        if let Some(b) = balls.get_mut(ball) {
            let seen = b.rendered_center();
            b.set_transform(None);
            b.set_position(seen);
        }
        Some(side)
    }

    /// Returns `true` when both arms carry metal balls.
    pub fn is_metal(&self, balls: &BallSet) -> bool {
        let metal = |id: Option<BallId>| {
            id.and_then(|id| balls.get(id))
                .is_some_and(crate::ball::Ball::is_metal)
        };
        metal(self.left.ball) && metal(self.right.ball)
    }

    /// Collision model for the balls currently hung.
    pub fn collision(&self, balls: &BallSet) -> Collision {
        if self.is_metal(balls) {
            Collision::Elastic
        } else {
            Collision::Inelastic
        }
    }

    /// Maps a pointer dragging the right arm to an arm angle.
    ///
    /// The angle is measured between the vertical and the line from the right
    /// pivot to the pointer, clamped to `[0, max]`. A pointer sitting on the
    /// pivot gives no direction and yields `None`.
    pub fn right_arm_angle_from_pointer(&self, x: f64, y: f64, max: f64) -> Option<f64> {
        let pivot = self.right.pivot;
        let cx = x - pivot.cx;
        let cy = y - pivot.cy;
        let ry = cy / cx.hypot(cy);
        let a = 90.0 - ry.asin().to_degrees();
        if a.is_nan() {
            return None;
        }
        Some(a.clamp(0.0, max))
    }
}
