//! Closed-form kinematics of a single ideal pendulum and of a head-on
//! collision between two pendulum bobs.
//!
//! All angles are in degrees, measured from the vertical. Energies are in
//! joules, masses in kilograms, lengths in meters.
//!
//! None of these functions fail: inputs outside the physical domain produce
//! `NaN`, which callers treat as a [bad speed](is_bad_speed).
//!
//! # Example
//!
//! ```rust
//! use ballhit::physics::{is_bad_speed, max_angle, release_energy, speed};
//!
//! let e = release_energy(30.0, 0.5, 0.02);
//! let top = max_angle(e, 0.5, 0.02);
//! assert!((top - 30.0).abs() < 1e-9);
//!
//! // At the turning point the speed vanishes (rounding may leave it NaN).
//! assert!(is_bad_speed(speed(top, e, 0.5, 0.02)));
//! ```

use serde::{Deserialize, Serialize};

/// Gravitational acceleration used by the lab, in m/s².
pub const G: f64 = 9.8;

/// Angular speeds with a smaller magnitude than this count as stopped.
pub const SPEED_EPSILON: f64 = 1e-6;

/// Cosine of an angle given in degrees.
#[inline]
pub fn cos_deg(deg: f64) -> f64 {
    deg.to_radians().cos()
}

/// Linear speed of a bob at angle `a` carrying total energy `e`.
///
/// `v = sqrt(2 (E/m - g l (1 - cos a)))`. Returns `NaN` past the turning
/// point, where the bob does not have enough energy to be.
#[inline]
pub fn speed(a: f64, e: f64, l: f64, m: f64) -> f64 {
    (2.0 * ((e / m) - G * l * (1.0 - cos_deg(a)))).sqrt()
}

/// Angular speed at angle `a` in degrees per second.
#[inline]
pub fn angular_speed(a: f64, e: f64, l: f64, m: f64) -> f64 {
    linear_to_angular(speed(a, e, l, m), l)
}

/// Converts a linear bob speed into an angular speed in degrees per second.
#[inline]
pub fn linear_to_angular(v: f64, l: f64) -> f64 {
    (v / l).to_degrees()
}

/// Highest angle a bob with energy `e` can reach.
///
/// `a_max = acos(1 - E / (m g l))`. Returns `NaN` when the energy is enough
/// to go over the top.
#[inline]
pub fn max_angle(e: f64, l: f64, m: f64) -> f64 {
    (1.0 - (e / (m * G * l))).acos().to_degrees()
}

/// Potential energy of a bob released at rest from angle `a0`.
#[inline]
pub fn release_energy(a0: f64, l: f64, m: f64) -> f64 {
    m * G * (1.0 - cos_deg(a0)) * l
}

/// Kinetic energy of a bob moving at linear speed `v`.
#[inline]
pub fn kinetic_energy(v: f64, m: f64) -> f64 {
    m * v * v / 2.0
}

/// Total mechanical energy of a bob at angle `a` moving at linear speed `v`.
#[inline]
pub fn mechanical_energy(a: f64, v: f64, l: f64, m: f64) -> f64 {
    m * G * l * (1.0 - cos_deg(a)) + kinetic_energy(v, m)
}

/// Returns `true` for speeds that should be read as "stopped".
#[inline]
pub fn is_bad_speed(w: f64) -> bool {
    w.is_nan() || w.abs() < SPEED_EPSILON
}

/// Sign of `x` as `-1`, `0` or `1`.
///
/// Unlike [`f64::signum`], zero maps to zero, so a side that did not move in
/// the last step does not pick up a direction.
#[inline]
pub fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        x
    }
}

/// How two bobs exchange momentum when they meet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collision {
    /// One-dimensional elastic collision: momentum and kinetic energy are
    /// both conserved.
    Elastic,
    /// Perfectly inelastic collision: the bobs stick and share one velocity.
    Inelastic,
}

impl Collision {
    /// Splits the striking bob's velocity `v` between both bobs.
    ///
    /// The striker has mass `m_striker`; the target hangs at rest with mass
    /// `m_target`. Returns `(v_striker, v_target)` right after the impact.
    ///
    /// # Example
    ///
    /// ```rust
    /// use ballhit::physics::Collision;
    ///
    /// let (vr, vl) = Collision::Elastic.split(0.02, 0.02, 1.0);
    /// assert!(vr.abs() < 1e-12);
    /// assert!((vl - 1.0).abs() < 1e-12);
    /// ```
    pub fn split(self, m_striker: f64, m_target: f64, v: f64) -> (f64, f64) {
        let total = m_striker + m_target;
        match self {
            Self::Elastic => (
                (m_striker - m_target) * v / total,
                2.0 * m_striker * v / total,
            ),
            Self::Inelastic => {
                let shared = m_striker * v / total;
                (shared, shared)
            }
        }
    }
}
