//! The lab session: every piece of state the experiment bench has, and the
//! operations a user (or a driver loop) performs on it.
//!
//! A [`Lab`] owns the ball rack, the pendulum system, the scale and the
//! session flags. Interactions that make no sense in the current state are
//! ignored rather than reported as failures, the way a physical bench simply
//! does not react. Anything other parts of an application may want to show
//! is published as a [`LabEvent`] and collected with [`Lab::drain_events`].
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//!
//! use ballhit::{Lab, LabEvent, Side};
//!
//! let mut lab = Lab::default();
//! let left = lab.balls().id(2).unwrap();
//! let right = lab.balls().id(3).unwrap();
//!
//! assert!(lab.hang(Side::Left, left));
//! assert!(lab.hang(Side::Right, right));
//! assert!(lab.pull_right_arm(30.0));
//! lab.start().unwrap();
//!
//! while !lab.simulation_finished() {
//!     lab.tick(Duration::from_millis(2));
//! }
//!
//! let tao = lab
//!     .drain_events()
//!     .find_map(|e| match e {
//!         LabEvent::TaoSimulated { tao } => Some(tao),
//!         _ => None,
//!     })
//!     .unwrap();
//! assert_eq!(lab.timer_reading(), tao);
//! ```

use std::collections::VecDeque;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info};

use crate::ball::{Ball, BallId, BallSet};
use crate::config::{ConfigResult, LabConfig};
use crate::geometry::Position;
use crate::pendulum::{PendulumSystem, Side};
use crate::simulation::{
    FinishReason, HitReport, Phase, Simulation, StartError, StartResult, StepOutcome,
};

/// Notifications published by the lab.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LabEvent {
    /// A ball was picked up.
    BallBeginDrag {
        /// The ball being dragged.
        ball: BallId,
    },
    /// A ball was released.
    BallEndDrag {
        /// The ball that was dropped.
        ball: BallId,
    },
    /// The scale readout changed.
    ScaleChanged {
        /// New readout in kilograms.
        reading: f64,
    },
    /// The collision happened.
    TaoSimulated {
        /// Time attributed to the collision, in seconds.
        tao: f64,
    },
    /// The run is over.
    SimulationFinished {
        /// How it ended.
        reason: FinishReason,
    },
}

/// Where a dropped ball ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    /// On a pendulum arm.
    Arm(Side),
    /// On the weighing scale.
    Scale,
    /// Back at its resting place.
    Home,
}

/// The experiment bench.
#[derive(Debug, Clone)]
pub struct Lab {
    config: LabConfig,
    balls: BallSet,
    system: PendulumSystem,
    on_scale: Option<BallId>,
    balls_locked: bool,
    in_simulation: bool,
    simulation_finished: bool,
    timer: f64,
    simulation: Option<Simulation>,
    events: VecDeque<LabEvent>,
}

impl Default for Lab {
    fn default() -> Self {
        Self::build(LabConfig::default())
    }
}

impl Lab {
    /// Sets up a bench from `config`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`](crate::ConfigError) if the configuration does
    /// not validate.
    pub fn new(config: LabConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: LabConfig) -> Self {
        let mut balls = BallSet::new();
        for spec in &config.balls {
            balls.insert(spec.build());
        }
        let system = PendulumSystem::new(config.pivot_center, config.arm_length, config.arm_offset)
            .with_effective_length(config.effective_length);
        debug!(balls = balls.len(), "Lab ready");

        Self {
            config,
            balls,
            system,
            on_scale: None,
            balls_locked: false,
            in_simulation: false,
            simulation_finished: false,
            timer: 0.0,
            simulation: None,
            events: VecDeque::new(),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Configuration the lab was built from.
    pub const fn config(&self) -> &LabConfig {
        &self.config
    }

    /// Every ball on the bench.
    pub const fn balls(&self) -> &BallSet {
        &self.balls
    }

    /// Looks up one ball.
    pub fn ball(&self, id: BallId) -> Option<&Ball> {
        self.balls.get(id)
    }

    /// The twin pendulum.
    pub const fn system(&self) -> &PendulumSystem {
        &self.system
    }

    /// Ball currently on the scale.
    pub const fn scale_ball(&self) -> Option<BallId> {
        self.on_scale
    }

    /// Scale readout in kilograms, zero when empty.
    pub fn scale_reading(&self) -> f64 {
        self.on_scale
            .and_then(|id| self.balls.get(id))
            .map_or(0.0, Ball::mass)
    }

    /// Timer readout: tao of the last run, in seconds.
    pub const fn timer_reading(&self) -> f64 {
        self.timer
    }

    /// Balls cannot be dragged once the arm has been pulled back.
    pub const fn balls_locked(&self) -> bool {
        self.balls_locked
    }

    /// A run has been started and not reset.
    pub const fn in_simulation(&self) -> bool {
        self.in_simulation
    }

    /// The current run has ended.
    pub const fn simulation_finished(&self) -> bool {
        self.simulation_finished
    }

    /// The current run, if any.
    pub const fn simulation(&self) -> Option<&Simulation> {
        self.simulation.as_ref()
    }

    /// Impact kinematics of the current run, once the hit has happened.
    pub fn hit_report(&self) -> Option<&HitReport> {
        self.simulation.as_ref().and_then(Simulation::hit_report)
    }

    /// Suggested delay between [`tick`](Self::tick) calls.
    pub const fn tick_interval(&self) -> Duration {
        self.config.tick_interval()
    }

    /// Takes every pending notification, oldest first.
    pub fn drain_events(&mut self) -> impl Iterator<Item = LabEvent> + '_ {
        self.events.drain(..)
    }

    fn emit(&mut self, event: LabEvent) {
        debug!(?event, "Lab event");
        self.events.push_back(event);
    }

    // ========================================================================
    // Dragging balls
    // ========================================================================

    /// Picks a ball up. It leaves the scale or the arm it was on.
    pub fn begin_drag(&mut self, id: BallId) {
        if self.balls_locked || self.balls.get(id).is_none() {
            return;
        }
        self.emit(LabEvent::BallBeginDrag { ball: id });

        if self.on_scale == Some(id) {
            self.on_scale = None;
            self.emit(LabEvent::ScaleChanged { reading: 0.0 });
        }
        self.system.detach(id, &mut self.balls);
    }

    /// Moves a dragged ball to the pointer.
    pub fn drag_to(&mut self, id: BallId, x: f64, y: f64) {
        if self.balls_locked {
            return;
        }
        if let Some(ball) = self.balls.get_mut(id) {
            ball.set_position(Position::new(x, y));
        }
    }

    /// Drops a ball where it is.
    ///
    /// It snaps onto the left arm, the right arm or the scale when dropped
    /// close enough to one of them (checked in that order) and goes home
    /// otherwise. Returns `None` if the drop was ignored.
    pub fn end_drag(&mut self, id: BallId) -> Option<Placement> {
        if self.balls_locked {
            return None;
        }
        let ball = self.balls.get(id)?;
        let near = |p: Position, r: f64| ball.is_near_point(p.cx, p.cy, r);

        let pivot_r = self.config.pivot_snap_radius;
        let placement = if near(self.system.left_pos(), pivot_r) {
            Placement::Arm(Side::Left)
        } else if near(self.system.right_pos(), pivot_r) {
            Placement::Arm(Side::Right)
        } else if near(self.config.scale_point, self.config.scale_snap_radius) {
            Placement::Scale
        } else {
            Placement::Home
        };

        self.emit(LabEvent::BallEndDrag { ball: id });
        match placement {
            Placement::Arm(side) => self.system.set_ball(side, id, &mut self.balls),
            Placement::Scale => self.put_on_scale(id),
            Placement::Home => {
                if let Some(ball) = self.balls.get_mut(id) {
                    ball.go_home();
                }
            }
        }
        Some(placement)
    }

    fn put_on_scale(&mut self, id: BallId) {
        let point = self.config.scale_point;
        if let Some(ball) = self.balls.get_mut(id) {
            ball.set_position(point);
        }
        if let Some(prev) = self.on_scale.filter(|&prev| prev != id) {
            if let Some(prev) = self.balls.get_mut(prev) {
                prev.go_home();
            }
        }
        self.on_scale = Some(id);
        let reading = self.scale_reading();
        self.emit(LabEvent::ScaleChanged { reading });
    }

    /// Drags a ball onto an arm in one go. Returns `true` if it landed there.
    pub fn hang(&mut self, side: Side, id: BallId) -> bool {
        self.place_at(id, self.system.holding_pos(side)) == Some(Placement::Arm(side))
    }

    /// Drags a ball onto the scale in one go. Returns `true` if it landed
    /// there.
    pub fn weigh(&mut self, id: BallId) -> bool {
        self.place_at(id, self.config.scale_point) == Some(Placement::Scale)
    }

    fn place_at(&mut self, id: BallId, target: Position) -> Option<Placement> {
        self.begin_drag(id);
        self.drag_to(id, target.cx, target.cy);
        self.end_drag(id)
    }

    // ========================================================================
    // The right arm
    // ========================================================================

    /// Drags the right arm toward the pointer at `(x, y)`.
    ///
    /// Ignored unless both arms carry a ball and no run is active. Pulling
    /// the arm locks the balls in place until [`reset`](Self::reset).
    pub fn drag_arm(&mut self, x: f64, y: f64) -> bool {
        let max = self.config.max_drag_angle;
        match self.system.right_arm_angle_from_pointer(x, y, max) {
            Some(angle) => self.pull_right_arm(angle),
            None => false,
        }
    }

    /// Pulls the right arm back to `angle` degrees, clamped to the drag
    /// range. Same rules as [`drag_arm`](Self::drag_arm).
    pub fn pull_right_arm(&mut self, angle: f64) -> bool {
        if !self.system.has_both_balls() || self.in_simulation || angle.is_nan() {
            return false;
        }
        let angle = angle.clamp(0.0, self.config.max_drag_angle);
        self.system.set_right_angle(angle, &mut self.balls);
        self.balls_locked = true;
        true
    }

    // ========================================================================
    // Running
    // ========================================================================

    /// Releases the right arm.
    ///
    /// # Errors
    ///
    /// Returns why the bench did not react: a run is already active, an arm
    /// is empty, or the right arm is not pulled back past the minimum angle.
    /// Nothing changes in that case.
    pub fn start(&mut self) -> StartResult<()> {
        if self.in_simulation {
            return Err(StartError::AlreadyRunning);
        }
        let angle = self.system.right_angle();
        let min = self.config.min_start_angle;
        if self.system.has_both_balls() && !(angle > min) {
            return Err(StartError::AngleTooSmall { angle, min });
        }

        let simulation = Simulation::start(&self.system, &self.balls)?;
        info!(angle, "Simulation started");
        self.simulation = Some(simulation);
        self.in_simulation = true;
        self.simulation_finished = false;
        Ok(())
    }

    /// Advances the active run by `elapsed`.
    ///
    /// Does nothing once the run is over or after a reset.
    pub fn tick(&mut self, elapsed: Duration) -> StepOutcome {
        if !self.in_simulation {
            return StepOutcome::Idle;
        }
        let Some(simulation) = self.simulation.as_mut() else {
            return StepOutcome::Idle;
        };

        let before_hit = simulation.phase() == Phase::PreHit;
        let outcome = simulation.step(&mut self.system, &mut self.balls, elapsed);
        let hit = match outcome {
            StepOutcome::Hit(report) => Some(report),
            StepOutcome::Finished(_) if before_hit => simulation.hit_report().copied(),
            _ => None,
        };
        if let Some(report) = hit {
            self.timer = report.tao;
            self.emit(LabEvent::TaoSimulated { tao: report.tao });
        }

        match outcome {
            StepOutcome::Finished(reason) => {
                self.simulation_finished = true;
                info!(
                    ?reason,
                    left_angle = self.system.left_angle(),
                    right_angle = self.system.right_angle(),
                    "Simulation finished"
                );
                self.emit(LabEvent::SimulationFinished { reason });
            }
            StepOutcome::Hit(_) | StepOutcome::Idle | StepOutcome::Swinging => {}
        }
        outcome
    }

    /// Cancels any run, lowers both arms and unlocks the balls.
    pub fn reset(&mut self) {
        self.in_simulation = false;
        self.balls_locked = false;
        self.simulation_finished = false;
        self.simulation = None;
        self.system.set_left_angle(0.0, &mut self.balls);
        self.system.set_right_angle(0.0, &mut self.balls);
        self.timer = 0.0;
        debug!("Lab reset");
    }
}
