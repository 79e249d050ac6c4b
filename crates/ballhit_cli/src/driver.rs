//! The driver loop: sets up the bench, releases the arm and ticks the lab
//! until the run ends.

use std::fmt;
use std::thread;
use std::time::{Duration, Instant};

use ballhit::{
    BallId, Collision, FinishReason, HitReport, Lab, LabConfig, Material, Side, StepOutcome,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{CliError, Result};

/// Settings for one driven run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunOptions {
    /// Rack index of the target ball.
    pub left: usize,
    /// Rack index of the released ball.
    pub right: usize,
    /// Release angle in degrees.
    pub angle: f64,
    /// Tick length, or the sleep between ticks in realtime mode.
    pub tick: Duration,
    /// Step by measured wall-clock time instead of a fixed tick.
    pub realtime: bool,
    /// Tick cap.
    pub max_ticks: u64,
    /// Record a [`Sample`] after every tick.
    pub trace: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            left: 2,
            right: 3,
            angle: 30.0,
            tick: Duration::from_millis(2),
            realtime: false,
            max_ticks: 1_000_000,
            trace: false,
        }
    }
}

/// A rack ball as shown in reports.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BallSummary {
    /// Index in the rack.
    pub index: usize,
    /// Mass in kilograms.
    pub mass: f64,
    /// Material.
    pub material: Material,
}

/// Arm angles at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    /// Simulated seconds since release.
    pub t: f64,
    /// Left arm angle in degrees.
    pub left: f64,
    /// Right arm angle in degrees.
    pub right: f64,
}

/// Outcome of a driven run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    /// Ball on the left arm.
    pub left: BallSummary,
    /// Ball on the right arm.
    pub right: BallSummary,
    /// Release angle in degrees.
    pub release_angle: f64,
    /// Collision model selected by the materials.
    pub collision: Collision,
    /// Impact kinematics, missing if the run stalled before the hit.
    pub hit: Option<HitReport>,
    /// How the run ended.
    pub finish: FinishReason,
    /// Ticks performed.
    pub ticks: u64,
    /// Sum of the tick lengths, in seconds.
    pub simulated_seconds: f64,
    /// Final left arm angle.
    pub left_angle: f64,
    /// Final right arm angle.
    pub right_angle: f64,
    /// Timer readout at the end.
    pub timer: f64,
    /// Per-tick angles when tracing.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub samples: Vec<Sample>,
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Collision: {} ({} {:.3} kg -> {} {:.3} kg)",
            collision_name(self.collision),
            self.right.material,
            self.right.mass,
            self.left.material,
            self.left.mass,
        )?;
        writeln!(f, "Released at: {:.2}°", self.release_angle)?;
        if let Some(hit) = &self.hit {
            writeln!(f, "Timer: {:.4} s", self.timer)?;
            writeln!(f, "Impact velocity: {:.3} m/s", hit.impact_velocity)?;
            writeln!(
                f,
                "After hit: right {:.3} m/s, left {:.3} m/s",
                hit.right_velocity, hit.left_velocity
            )?;
        }
        writeln!(
            f,
            "Finished: {} after {} ticks ({:.3} s simulated)",
            finish_name(self.finish),
            self.ticks,
            self.simulated_seconds,
        )?;
        writeln!(
            f,
            "Final angles: left {:.2}°, right {:.2}°",
            self.left_angle, self.right_angle
        )
    }
}

const fn collision_name(collision: Collision) -> &'static str {
    match collision {
        Collision::Elastic => "elastic",
        Collision::Inelastic => "inelastic",
    }
}

const fn finish_name(reason: FinishReason) -> &'static str {
    match reason {
        FinishReason::Settled => "settled",
        FinishReason::Runaway => "runaway",
        FinishReason::Stalled => "stalled",
    }
}

/// Looks up a rack index.
///
/// # Errors
///
/// Returns [`CliError::UnknownBall`] for indices past the end of the rack.
pub fn ball_id(lab: &Lab, index: usize) -> Result<BallId> {
    lab.balls().id(index).ok_or(CliError::UnknownBall {
        index,
        len: lab.balls().len(),
    })
}

/// Summarizes one rack ball.
///
/// # Errors
///
/// Returns [`CliError::UnknownBall`] for indices past the end of the rack.
fn summary(lab: &Lab, index: usize) -> Result<BallSummary> {
    let id = ball_id(lab, index)?;
    let ball = lab.ball(id).ok_or(CliError::UnknownBall {
        index,
        len: lab.balls().len(),
    })?;
    Ok(BallSummary {
        index,
        mass: ball.mass(),
        material: ball.material(),
    })
}

/// Hangs two rack balls.
///
/// # Errors
///
/// Returns [`CliError::SameBall`] if both indices match,
/// [`CliError::UnknownBall`] if either does not exist and
/// [`CliError::Refused`] if a ball does not end up on its arm.
pub fn hang_pair(lab: &mut Lab, left: usize, right: usize) -> Result<()> {
    if left == right {
        return Err(CliError::SameBall(left));
    }
    hang(lab, Side::Left, left)?;
    hang(lab, Side::Right, right)
}

/// Hangs one rack ball on `side`.
///
/// # Errors
///
/// Returns [`CliError::UnknownBall`] for a bad index and
/// [`CliError::Refused`] if the ball does not end up on the arm.
pub fn hang(lab: &mut Lab, side: Side, index: usize) -> Result<()> {
    let id = ball_id(lab, index)?;
    if lab.hang(side, id) {
        Ok(())
    } else {
        Err(CliError::Refused(format!("hang ball #{index} on the {side} arm")))
    }
}

/// Pulls the right arm back to `angle` degrees.
///
/// # Errors
///
/// Returns [`CliError::Refused`] unless both arms carry a ball.
pub fn pull(lab: &mut Lab, angle: f64) -> Result<()> {
    if lab.pull_right_arm(angle) {
        Ok(())
    } else {
        Err(CliError::Refused(format!(
            "pull the right arm to {angle}° (both arms need a ball)"
        )))
    }
}

/// Runs one experiment from a fresh bench.
///
/// # Errors
///
/// Fails on a bad configuration or ball index, when the bench refuses to
/// start (for example a release angle under the minimum), or when the run
/// exceeds `max_ticks`.
pub fn run(config: LabConfig, options: &RunOptions) -> Result<RunReport> {
    let mut lab = Lab::new(config)?;
    hang_pair(&mut lab, options.left, options.right)?;
    pull(&mut lab, options.angle)?;
    let release_angle = lab.system().right_angle();
    let collision = lab.system().collision(lab.balls());
    lab.start()?;

    info!(
        left = options.left,
        right = options.right,
        angle = release_angle,
        ?collision,
        realtime = options.realtime,
        "Run started"
    );

    let mut clock = Clock::new(options.tick, options.realtime);
    let mut ticks = 0;
    let mut elapsed_total = Duration::ZERO;
    let mut hit = None;
    let mut samples = Vec::new();

    let finish = loop {
        if ticks >= options.max_ticks {
            return Err(CliError::Timeout { ticks });
        }
        let elapsed = clock.next_tick();
        ticks += 1;
        elapsed_total += elapsed;

        let outcome = lab.tick(elapsed);
        if options.trace {
            samples.push(Sample {
                t: elapsed_total.as_secs_f64(),
                left: lab.system().left_angle(),
                right: lab.system().right_angle(),
            });
        }
        match outcome {
            StepOutcome::Hit(report) => {
                debug!(tick = ticks, tao = report.tao, "Hit");
                hit = Some(report);
            }
            StepOutcome::Finished(reason) => {
                hit = hit.or_else(|| lab.hit_report().copied());
                break reason;
            }
            StepOutcome::Idle | StepOutcome::Swinging => {}
        }
    };
    info!(?finish, ticks, "Run finished");

    Ok(RunReport {
        left: summary(&lab, options.left)?,
        right: summary(&lab, options.right)?,
        release_angle,
        collision,
        hit,
        finish,
        ticks,
        simulated_seconds: elapsed_total.as_secs_f64(),
        left_angle: lab.system().left_angle(),
        right_angle: lab.system().right_angle(),
        timer: lab.timer_reading(),
        samples,
    })
}

/// Source of tick lengths.
#[derive(Debug)]
enum Clock {
    Fixed(Duration),
    Realtime { interval: Duration, last: Instant },
}

impl Clock {
    fn new(interval: Duration, realtime: bool) -> Self {
        if realtime {
            Self::Realtime {
                interval,
                last: Instant::now(),
            }
        } else {
            Self::Fixed(interval)
        }
    }

    /// Waits for the next tick if needed and returns the time it covers.
    fn next_tick(&mut self) -> Duration {
        match self {
            Self::Fixed(interval) => *interval,
            Self::Realtime { interval, last } => {
                thread::sleep(*interval);
                let now = Instant::now();
                let elapsed = now.duration_since(*last);
                *last = now;
                elapsed
            }
        }
    }
}
