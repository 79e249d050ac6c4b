//! Lab layout and tuning.
//!
//! [`LabConfig`] is the single source of truth for where things sit on the
//! drawing surface and how the lab behaves. Its defaults reproduce the
//! classic bench: a stand centered at (200, 150) with two 150 px arms 14 px
//! apart, a weighing scale at (560, 150) and a rack of sixteen balls.
//!
//! Every field has a default, so a partial TOML or JSON document is enough
//! to override a few values:
//!
//! ```rust
//! use ballhit::LabConfig;
//!
//! let config: LabConfig = serde_json::from_str(r#"{ "min_start_angle": 5.0 }"#).unwrap();
//! assert_eq!(config.min_start_angle, 5.0);
//! assert_eq!(config.balls.len(), 16);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ball::{Ball, Material};
use crate::geometry::Position;
use crate::pendulum::EFFECTIVE_LENGTH;

/// Description of one ball in the rack.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallSpec {
    /// Mass in kilograms.
    pub mass: f64,
    /// Drawing radius.
    #[serde(default = "default_ball_radius")]
    pub radius: f64,
    /// What the ball is made of.
    pub material: Material,
    /// Resting place on the drawing surface.
    pub home: Position,
}

impl BallSpec {
    /// Builds the ball this spec describes.
    pub const fn build(&self) -> Ball {
        Ball::new(self.mass, self.radius, self.material, self.home)
    }
}

const fn default_ball_radius() -> f64 {
    6.5
}

/// Layout and tuning values for a [`Lab`](crate::Lab).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabConfig {
    /// Midpoint between the two pivots.
    pub pivot_center: Position,
    /// On-screen arm length.
    pub arm_length: f64,
    /// Horizontal distance from the center to each pivot.
    pub arm_offset: f64,
    /// Physical pendulum length in meters.
    pub effective_length: f64,
    /// Drop tolerance around an arm's ball holder.
    pub pivot_snap_radius: f64,
    /// Drop tolerance around the scale pad.
    pub scale_snap_radius: f64,
    /// Where a weighed ball sits.
    pub scale_point: Position,
    /// The right arm must be pulled back further than this to start a run.
    pub min_start_angle: f64,
    /// Largest angle the right arm can be dragged to.
    pub max_drag_angle: f64,
    /// Suggested delay between ticks, in milliseconds.
    pub tick_interval_ms: u64,
    /// The ball rack, in order.
    pub balls: Vec<BallSpec>,
}

impl Default for LabConfig {
    fn default() -> Self {
        Self {
            pivot_center: Position::new(200.0, 150.0),
            arm_length: 150.0,
            arm_offset: 7.0,
            effective_length: EFFECTIVE_LENGTH,
            pivot_snap_radius: 7.0,
            scale_snap_radius: 15.0,
            scale_point: Position::new(560.0, 150.0),
            min_start_angle: 10.0,
            max_drag_angle: 90.0,
            tick_interval_ms: 2,
            balls: default_rack(),
        }
    }
}

/// The stock rack: for every mass from 20 g to 50 g, two plasticine balls on
/// the left of the shelf and two metal balls on the right.
pub fn default_rack() -> Vec<BallSpec> {
    let radius = default_ball_radius();
    let mut rack = Vec::with_capacity(16);
    for i in 2..6u32 {
        let i = f64::from(i);
        let mass = 0.01 * i;
        for (material, x) in [
            (Material::Plasticine, -40.0 + i * 40.0),
            (Material::Plasticine, -40.0 + i * 40.0 + 15.0),
            (Material::Metal, 200.0 + i * 40.0),
            (Material::Metal, 200.0 + i * 40.0 + 15.0),
        ] {
            rack.push(BallSpec {
                mass,
                radius,
                material,
                home: Position::new(x, 45.0),
            });
        }
    }
    rack
}

impl LabConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Suggested delay between driver ticks.
    pub const fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Checks that every value is physically meaningful.
    ///
    /// # Errors
    ///
    /// Returns the first offending value as a [`ConfigError`].
    pub fn validate(&self) -> ConfigResult<()> {
        positive("arm_length", self.arm_length)?;
        positive("effective_length", self.effective_length)?;
        positive("pivot_snap_radius", self.pivot_snap_radius)?;
        positive("scale_snap_radius", self.scale_snap_radius)?;
        positive("arm_offset", self.arm_offset)?;
        finite("min_start_angle", self.min_start_angle)?;
        positive("max_drag_angle", self.max_drag_angle)?;

        // A drop on one holder must not land inside the other one.
        let spacing = 2.0 * self.arm_offset;
        if spacing <= self.pivot_snap_radius {
            return Err(ConfigError::HoldersOverlap {
                spacing,
                snap_radius: self.pivot_snap_radius,
            });
        }

        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        if self.balls.is_empty() {
            return Err(ConfigError::EmptyRack);
        }

        for (index, ball) in self.balls.iter().enumerate() {
            for (field, value) in [("mass", ball.mass), ("radius", ball.radius)] {
                if !(value.is_finite() && value > 0.0) {
                    return Err(ConfigError::InvalidBall {
                        index,
                        field,
                        value,
                    });
                }
            }
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> ConfigResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn finite(field: &'static str, value: f64) -> ConfigResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotFinite { field, value })
    }
}

/// Configuration error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A length, radius or angle that must be positive is not.
    #[error("{field} must be a positive number, got {value}")]
    NotPositive {
        /// Name of the offending field.
        field: &'static str,
        /// Value found.
        value: f64,
    },

    /// A value is NaN or infinite.
    #[error("{field} must be finite, got {value}")]
    NotFinite {
        /// Name of the offending field.
        field: &'static str,
        /// Value found.
        value: f64,
    },

    /// The two ball holders sit closer together than the drop tolerance, so
    /// a ball dropped on the right holder would snap to the left arm.
    #[error(
        "ball holders are {spacing} apart, more than pivot_snap_radius ({snap_radius}) is needed"
    )]
    HoldersOverlap {
        /// Distance between the holders, twice `arm_offset`.
        spacing: f64,
        /// Configured `pivot_snap_radius`.
        snap_radius: f64,
    },

    /// The tick interval is zero.
    #[error("tick_interval_ms must be at least 1")]
    ZeroTickInterval,

    /// The rack holds no balls.
    #[error("the ball rack is empty")]
    EmptyRack,

    /// A ball in the rack has an unusable mass or radius.
    #[error("ball {index}: {field} must be a positive number, got {value}")]
    InvalidBall {
        /// Position of the ball in the rack.
        index: usize,
        /// Name of the offending field.
        field: &'static str,
        /// Value found.
        value: f64,
    },
}

/// A specialized [`Result`] type for configuration checks.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
