//! Time-stepped run of one collision experiment.
//!
//! A run goes through three phases:
//!
//! ```text
//!   PreHit ──(right arm passes the vertical)──▶ PostHit ──(both sides stop)──▶ Finished
//!                         │
//!                      the hit: velocities split, tao reported
//! ```
//!
//! The simulation owns no timer. An external driver calls
//! [`Simulation::step`] with the wall-clock time that actually passed since
//! the previous call; each step moves the arms by the angular speed computed
//! at the end of the previous step times that elapsed time. Every half-swing
//! conserves energy and is monotonic up to its turning point, so polling the
//! closed-form speed is enough.
//!
//! Physics never fails loudly: once a speed turns `NaN` or vanishes the side
//! is considered stopped, and when both sides are stopped the run is over.

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::ball::BallSet;
use crate::pendulum::{PendulumSystem, Side};
use crate::physics::{
    Collision, is_bad_speed, kinetic_energy, linear_to_angular, max_angle, release_energy, sign,
    speed,
};

/// Angle in degrees the right arm moves on the very first step, while it is
/// still at rest.
pub const START_NUDGE: f64 = 1.0;

/// Left swings beyond this many degrees are treated as a runaway.
pub const RUNAWAY_ANGLE: f64 = 180.0;

/// Why a run could not start.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum StartError {
    /// An arm has no ball on it.
    #[error("no ball on the {0} arm")]
    MissingBall(Side),

    /// The right arm is not pulled back far enough.
    #[error("right arm at {angle:.1}° must be pulled back more than {min:.1}°")]
    AngleTooSmall {
        /// Current right arm angle.
        angle: f64,
        /// Required minimum.
        min: f64,
    },

    /// A run is already in progress.
    #[error("a simulation is already running")]
    AlreadyRunning,
}

/// A specialized [`Result`] type for starting a run.
pub type StartResult<T> = std::result::Result<T, StartError>;

/// Coarse phase of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// The right arm swings down toward the left ball.
    PreHit,
    /// Both arms swing apart after the collision.
    PostHit,
    /// Nothing moves anymore.
    Finished,
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Both sides reached their turning points.
    Settled,
    /// The left arm swung over the top; its angle was reset to zero.
    Runaway,
    /// The released arm produced no usable speed before the hit.
    Stalled,
}

/// Kinematics at the moment of impact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HitReport {
    /// Time attributed to the collision, in seconds.
    pub tao: f64,
    /// Collision model that was applied.
    pub collision: Collision,
    /// Speed of the striking bob just before impact, in m/s.
    pub impact_velocity: f64,
    /// Right bob velocity after impact, in m/s. Negative means it bounces
    /// back outward.
    pub right_velocity: f64,
    /// Left bob velocity after impact, in m/s.
    pub left_velocity: f64,
    /// Right bob kinetic energy after impact, in joules.
    pub right_energy: f64,
    /// Left bob kinetic energy after impact, in joules.
    pub left_energy: f64,
    /// Highest angle the right bob can reach after impact, in degrees.
    pub right_max_angle: f64,
    /// Highest angle the left bob can reach after impact, in degrees.
    pub left_max_angle: f64,
}

/// What a single step did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    /// The run is over; nothing moved.
    Idle,
    /// Arms moved; the run continues.
    Swinging,
    /// The collision happened during this step.
    Hit(HitReport),
    /// The run ended during this step.
    ///
    /// When the hit and the end fall on the same step only this is
    /// returned; the impact is still available from
    /// [`Simulation::hit_report`].
    Finished(FinishReason),
}

/// How far a side moves on its next step.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Motion {
    /// A fixed angle, independent of the elapsed time.
    Delta(f64),
    /// An angular speed in degrees per second.
    Rate(f64),
}

impl Motion {
    fn displacement(self, dt: f64) -> f64 {
        match self {
            Self::Delta(d) => d,
            Self::Rate(w) => w * dt,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    PreHit {
        energy: f64,
        right: Motion,
    },
    PostHit {
        right_energy: f64,
        left_energy: f64,
        right: Motion,
        left: Motion,
    },
    Finished(FinishReason),
}

/// One collision run over a [`PendulumSystem`].
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
///
/// use ballhit::{Ball, BallSet, Material, PendulumSystem, Position, Side, Simulation, StepOutcome};
///
/// let mut balls = BallSet::new();
/// let a = balls.insert(Ball::new(0.02, 6.5, Material::Metal, Position::new(280.0, 45.0)));
/// let b = balls.insert(Ball::new(0.02, 6.5, Material::Metal, Position::new(295.0, 45.0)));
/// let mut system = PendulumSystem::new(Position::new(200.0, 150.0), 150.0, 7.0);
/// system.set_ball(Side::Left, a, &mut balls);
/// system.set_ball(Side::Right, b, &mut balls);
/// system.set_right_angle(30.0, &mut balls);
///
/// let mut sim = Simulation::start(&system, &balls).unwrap();
/// while !sim.is_finished() {
///     sim.step(&mut system, &mut balls, Duration::from_millis(2));
/// }
///
/// assert!((system.left_angle() - 30.0).abs() < 1.0);
/// assert_eq!(system.right_angle(), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Simulation {
    state: State,
    hit: Option<HitReport>,
    steps: u64,
    simulated: Duration,
}

impl Simulation {
    /// Releases the right arm from its current angle.
    ///
    /// The release energy is the right ball's potential energy at that angle.
    ///
    /// # Errors
    ///
    /// Returns [`StartError::MissingBall`] if either arm is empty, and
    /// [`StartError::AngleTooSmall`] if the right arm is not pulled back at
    /// all.
    pub fn start(system: &PendulumSystem, balls: &BallSet) -> StartResult<Self> {
        for side in [Side::Left, Side::Right] {
            if system.arm(side).ball().and_then(|id| balls.get(id)).is_none() {
                return Err(StartError::MissingBall(side));
            }
        }

        let a0 = system.right_angle();
        if !(a0 > 0.0) {
            return Err(StartError::AngleTooSmall { angle: a0, min: 0.0 });
        }

        let m = right_mass(system, balls);
        let energy = release_energy(a0, system.effective_length(), m);
        debug!(angle = a0, energy, mass = m, "Releasing right arm");

        Ok(Self {
            state: State::PreHit {
                energy,
                right: Motion::Delta(START_NUDGE),
            },
            hit: None,
            steps: 0,
            simulated: Duration::ZERO,
        })
    }

    /// Current phase.
    pub const fn phase(&self) -> Phase {
        match self.state {
            State::PreHit { .. } => Phase::PreHit,
            State::PostHit { .. } => Phase::PostHit,
            State::Finished(_) => Phase::Finished,
        }
    }

    /// Returns `true` once the run has ended.
    pub const fn is_finished(&self) -> bool {
        matches!(self.state, State::Finished(_))
    }

    /// Why the run ended, once it has.
    pub const fn finish_reason(&self) -> Option<FinishReason> {
        match self.state {
            State::Finished(reason) => Some(reason),
            _ => None,
        }
    }

    /// Impact kinematics, once the hit has happened.
    pub const fn hit_report(&self) -> Option<&HitReport> {
        self.hit.as_ref()
    }

    /// Number of steps that moved something.
    pub const fn steps(&self) -> u64 {
        self.steps
    }

    /// Sum of the elapsed times fed to [`step`](Self::step).
    pub const fn simulated_time(&self) -> Duration {
        self.simulated
    }

    /// Energy the run started with, while it is still before the hit.
    pub const fn release_energy(&self) -> Option<f64> {
        match self.state {
            State::PreHit { energy, .. } => Some(energy),
            _ => None,
        }
    }

    /// Post-hit energies as `(right, left)`, while both arms are swinging.
    pub const fn post_hit_energies(&self) -> Option<(f64, f64)> {
        match self.state {
            State::PostHit {
                right_energy,
                left_energy,
                ..
            } => Some((right_energy, left_energy)),
            _ => None,
        }
    }

    /// Advances the run by `elapsed` wall-clock time.
    pub fn step(
        &mut self,
        system: &mut PendulumSystem,
        balls: &mut BallSet,
        elapsed: Duration,
    ) -> StepOutcome {
        let dt = elapsed.as_secs_f64();
        let state = self.state;
        let outcome = match state {
            State::Finished(_) => return StepOutcome::Idle,
            State::PreHit { energy, right } => self.pre_hit(system, balls, energy, right, dt),
            State::PostHit {
                right_energy,
                left_energy,
                right,
                left,
            } => self.post_hit(system, balls, (right_energy, left_energy), (right, left), dt),
        };

        self.steps += 1;
        self.simulated += elapsed;
        if let StepOutcome::Finished(reason) = outcome {
            debug!(
                ?reason,
                steps = self.steps,
                left_angle = system.left_angle(),
                right_angle = system.right_angle(),
                "Simulation finished"
            );
        }
        outcome
    }

    fn pre_hit(
        &mut self,
        system: &mut PendulumSystem,
        balls: &mut BallSet,
        energy: f64,
        right: Motion,
        dt: f64,
    ) -> StepOutcome {
        let a = system.right_angle() - right.displacement(dt);
        if a < 0.0 {
            return self.hit(system, balls, energy, a);
        }

        system.set_right_angle(a, balls);
        let w = omega(a, energy, system.effective_length(), right_mass(system, balls));
        trace!(angle = a, omega = w, "Swinging down");

        if is_bad_speed(w) {
            return self.finish(StepOutcome::Finished(FinishReason::Stalled));
        }

        self.state = State::PreHit {
            energy,
            right: Motion::Rate(w.to_degrees()),
        };
        StepOutcome::Swinging
    }

    /// Resolves the impact. `overshoot` is how far past the vertical (as a
    /// negative angle) the last step would have carried the right arm.
    fn hit(
        &mut self,
        system: &mut PendulumSystem,
        balls: &mut BallSet,
        energy: f64,
        overshoot: f64,
    ) -> StepOutcome {
        system.set_right_angle(0.0, balls);

        let l = system.effective_length();
        let mr = right_mass(system, balls);
        let ml = left_mass(system, balls);
        let v = speed(0.0, energy, l, mr);

        let collision = system.collision(balls);
        let (vr, vl) = collision.split(mr, ml, v);
        let right_energy = kinetic_energy(vr, mr);
        let left_energy = kinetic_energy(vl, ml);

        let wr = linear_to_angular(vr, l);
        let wl = linear_to_angular(vl, l);
        let tao = (overshoot / wl).abs();

        let report = HitReport {
            tao,
            collision,
            impact_velocity: v,
            right_velocity: vr,
            left_velocity: vl,
            right_energy,
            left_energy,
            right_max_angle: max_angle(right_energy, l, mr),
            left_max_angle: max_angle(left_energy, l, ml),
        };
        debug!(?collision, v, vr, vl, tao, "Hit");

        self.hit = Some(report);

        // The first swing apart covers the time left over after the impact
        // and happens on the same step.
        let outcome = self.post_hit(
            system,
            balls,
            (right_energy, left_energy),
            (Motion::Delta(wr * tao), Motion::Delta(wl * tao)),
            0.0,
        );
        match outcome {
            StepOutcome::Finished(_) => outcome,
            _ => StepOutcome::Hit(report),
        }
    }

    fn post_hit(
        &mut self,
        system: &mut PendulumSystem,
        balls: &mut BallSet,
        (right_energy, left_energy): (f64, f64),
        (right, left): (Motion, Motion),
        dt: f64,
    ) -> StepOutcome {
        let dar = right.displacement(dt);
        let dal = left.displacement(dt);
        let ar = system.right_angle() - dar;
        let al = system.left_angle() + dal;

        system.set_right_angle(ar, balls);
        system.set_left_angle(al, balls);

        let l = system.effective_length();
        let wr = omega(ar, right_energy, l, right_mass(system, balls));
        let wl = omega(al, left_energy, l, left_mass(system, balls));
        trace!(right_angle = ar, left_angle = al, wr, wl, "Swinging apart");

        if is_bad_speed(wr) && is_bad_speed(wl) {
            return self.finish(StepOutcome::Finished(FinishReason::Settled));
        }

        if system.left_angle().abs() > RUNAWAY_ANGLE {
            warn!(left_angle = al, "Left arm swung over the top, resetting");
            system.set_left_angle(0.0, balls);
            return self.finish(StepOutcome::Finished(FinishReason::Runaway));
        }

        let wr = if is_bad_speed(wr) { 0.0 } else { wr };
        let wl = if is_bad_speed(wl) { 0.0 } else { wl };
        let wr = sign(dar) * wr;

        self.state = State::PostHit {
            right_energy,
            left_energy,
            right: Motion::Rate(wr.to_degrees()),
            left: Motion::Rate(wl.to_degrees()),
        };
        StepOutcome::Swinging
    }

    fn finish(&mut self, outcome: StepOutcome) -> StepOutcome {
        if let StepOutcome::Finished(reason) = outcome {
            self.state = State::Finished(reason);
        }
        outcome
    }
}

/// Angular speed in radians per second.
fn omega(a: f64, e: f64, l: f64, m: f64) -> f64 {
    speed(a, e, l, m) / l
}

fn right_mass(system: &PendulumSystem, balls: &BallSet) -> f64 {
    system.right_ball().map_or(f64::NAN, |id| balls.mass_of(id))
}

fn left_mass(system: &PendulumSystem, balls: &BallSet) -> f64 {
    system.left_ball().map_or(f64::NAN, |id| balls.mass_of(id))
}
