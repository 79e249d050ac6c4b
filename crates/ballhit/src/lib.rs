#![forbid(unsafe_code)]
// Allow these clippy lints for physics/math code readability
#![allow(clippy::must_use_candidate)]
#![allow(clippy::suboptimal_flops)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::use_self)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]

//! # Ballhit
//!
//! A ballistic pendulum bench: two pendulums hanging side by side, a rack of
//! metal and plasticine balls, and a weighing scale.
//!
//! Hang a ball on each arm, pull the right arm back and release it. The
//! right ball swings down, hits the left one and both swing apart again.
//! Metal pairs collide elastically; as soon as plasticine is involved the
//! balls stick together and move off with a common velocity.
//!
//! Ballhit provides:
//! - **Lab**: the whole bench with its drag-and-drop interaction rules
//! - **Simulation**: the time-stepped swing, driven by an external clock
//! - **physics**: closed-form pendulum and collision formulas
//! - **Canvas**: a seam for drawing the bench with any backend
//!
//! ## Example
//!
//! ```rust
//! use std::time::Duration;
//!
//! use ballhit::{Lab, Side, StepOutcome};
//!
//! let mut lab = Lab::default();
//!
//! // Two metal balls of 20 g from the default rack
//! let left = lab.balls().id(2).unwrap();
//! let right = lab.balls().id(3).unwrap();
//! lab.hang(Side::Left, left);
//! lab.hang(Side::Right, right);
//!
//! lab.pull_right_arm(30.0);
//! lab.start().unwrap();
//!
//! let mut hit = None;
//! while !lab.simulation_finished() {
//!     if let StepOutcome::Hit(report) = lab.tick(Duration::from_millis(2)) {
//!         hit = Some(report);
//!     }
//! }
//!
//! // Equal metal balls swap their motion
//! let report = hit.unwrap();
//! assert!(report.right_velocity.abs() < 1e-12);
//! assert!((lab.system().left_angle() - 30.0).abs() < 1.0);
//! ```
//!
//! ## Units
//!
//! Masses are in kilograms, physical lengths in meters, speeds in m/s and
//! angles in degrees. Positions live in lab space, the drawing surface's
//! pixel coordinates; see [`geometry`](crate::Position).

mod ball;
mod config;
mod geometry;
mod lab;
mod pendulum;
pub mod physics;
mod scene;
mod simulation;

pub use ball::{Ball, BallId, BallSet, Material, PositionUpdate};
pub use config::{BallSpec, ConfigError, ConfigResult, LabConfig, default_rack};
pub use geometry::{Offset, Position, Rotation};
pub use lab::{Lab, LabEvent, Placement};
pub use pendulum::{Arm, EFFECTIVE_LENGTH, PendulumSystem, Side};
pub use physics::Collision;
pub use scene::{Canvas, Paint, Shape};
pub use simulation::{
    FinishReason, HitReport, Phase, RUNAWAY_ANGLE, START_NUDGE, Simulation, StartError,
    StartResult, StepOutcome,
};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::ball::{Ball, BallId, BallSet, Material};
    pub use crate::config::LabConfig;
    pub use crate::geometry::{Position, Rotation};
    pub use crate::lab::{Lab, LabEvent, Placement};
    pub use crate::pendulum::{PendulumSystem, Side};
    pub use crate::physics::Collision;
    pub use crate::scene::{Canvas, Paint, Shape};
    pub use crate::simulation::{FinishReason, HitReport, Simulation, StepOutcome};
}
