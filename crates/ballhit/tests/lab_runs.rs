#![allow(clippy::doc_markdown)]
#![allow(clippy::float_cmp)]
#![allow(clippy::suboptimal_flops)]

//! End-to-end runs of the bench: loading balls, releasing the right arm and
//! checking where both arms end up.

use std::time::Duration;

use ballhit::physics::release_energy;
use ballhit::{
    Ball, BallSet, BallSpec, FinishReason, HitReport, Lab, LabConfig, LabEvent, Material,
    PendulumSystem, Position, Side, Simulation, StepOutcome,
};

const TICK: Duration = Duration::from_millis(2);

// Default rack indices.
const PLASTICINE_20G: usize = 0;
const METAL_20G: [usize; 2] = [2, 3];
const METAL_50G: usize = 14;

/// Runs the current lab to the end and returns the hit report and the
/// finish reason.
fn run(lab: &mut Lab, tick: Duration) -> (HitReport, FinishReason) {
    let mut report = None;
    for _ in 0..200_000 {
        match lab.tick(tick) {
            StepOutcome::Hit(r) => report = Some(r),
            StepOutcome::Finished(reason) => {
                let report = report.or_else(|| lab.hit_report().copied());
                return (report.expect("finished before the hit"), reason);
            }
            StepOutcome::Idle | StepOutcome::Swinging => {}
        }
    }
    panic!("run did not finish");
}

fn loaded(left: usize, right: usize, angle: f64) -> Lab {
    let mut lab = Lab::default();
    let l = lab.balls().id(left).unwrap();
    let r = lab.balls().id(right).unwrap();
    assert!(lab.hang(Side::Left, l));
    assert!(lab.hang(Side::Right, r));
    assert!(lab.pull_right_arm(angle));
    lab.start().unwrap();
    lab
}

// =============================================================================
// Elastic
// =============================================================================

#[test]
fn equal_metal_balls_swap_motion() {
    let mut lab = loaded(METAL_20G[0], METAL_20G[1], 30.0);
    let (report, reason) = run(&mut lab, TICK);

    assert_eq!(reason, FinishReason::Settled);
    assert_eq!(report.right_velocity, 0.0);
    assert!((report.left_max_angle - 30.0).abs() < 1e-6);
    assert_eq!(lab.system().right_angle(), 0.0);
    assert!(
        (lab.system().left_angle() - 30.0).abs() < 1.0,
        "left ended at {}",
        lab.system().left_angle()
    );
}

#[test]
fn elastic_hit_keeps_all_energy() {
    let mut lab = loaded(METAL_20G[0], METAL_50G, 40.0);
    let (report, _) = run(&mut lab, TICK);

    let e = release_energy(40.0, 0.5, 0.05);
    let after = report.right_energy + report.left_energy;
    assert!((after - e).abs() < e * 1e-9, "before={e}, after={after}");
}

#[test]
fn heavy_striker_follows_through() {
    let mut lab = loaded(METAL_20G[0], METAL_50G, 30.0);
    let (report, _) = run(&mut lab, TICK);

    assert!(report.right_velocity > 0.0);
    assert!(report.left_max_angle > 30.0);
    // The right arm keeps moving past the vertical, toward the left.
    assert!(lab.system().right_angle() < 0.0);
    assert!((lab.system().left_angle() - report.left_max_angle).abs() < 1.0);
}

#[test]
fn light_striker_bounces_back() {
    let mut lab = loaded(METAL_50G, METAL_20G[0], 30.0);
    let (report, _) = run(&mut lab, TICK);

    assert!(report.right_velocity < 0.0);
    assert!(report.left_max_angle < 30.0);
    assert!(lab.system().right_angle() > 0.0);
    assert!((lab.system().right_angle() - report.right_max_angle).abs() < 1.0);
}

// =============================================================================
// Inelastic
// =============================================================================

#[test]
fn plasticine_pair_moves_together() {
    let mut lab = loaded(METAL_20G[0], PLASTICINE_20G, 50.0);
    let (report, reason) = run(&mut lab, TICK);

    assert_eq!(reason, FinishReason::Settled);
    assert_eq!(report.left_velocity, report.right_velocity);
    assert!(report.right_energy + report.left_energy < release_energy(50.0, 0.5, 0.02));

    let left = lab.system().left_angle();
    let right = lab.system().right_angle();
    assert!((left + right).abs() < 1e-9, "left={left}, right={right}");
    assert!(left > 0.0 && left < 50.0);
}

// =============================================================================
// Degenerate runs
// =============================================================================

#[test]
fn runaway_resets_left_arm() {
    let config = LabConfig {
        balls: vec![
            BallSpec {
                mass: 0.01,
                radius: 6.5,
                material: Material::Metal,
                home: Position::new(40.0, 45.0),
            },
            BallSpec {
                mass: 0.05,
                radius: 6.5,
                material: Material::Metal,
                home: Position::new(55.0, 45.0),
            },
        ],
        ..LabConfig::default()
    };
    let mut lab = Lab::new(config).unwrap();
    let l = lab.balls().id(0).unwrap();
    let r = lab.balls().id(1).unwrap();
    lab.hang(Side::Left, l);
    lab.hang(Side::Right, r);
    lab.pull_right_arm(90.0);
    lab.start().unwrap();

    let (report, reason) = run(&mut lab, TICK);
    assert_eq!(reason, FinishReason::Runaway);
    assert!(report.left_max_angle.is_nan());
    assert_eq!(lab.system().left_angle(), 0.0);

    let events: Vec<_> = lab.drain_events().collect();
    assert_eq!(
        events.last(),
        Some(&LabEvent::SimulationFinished {
            reason: FinishReason::Runaway
        })
    );
}

#[test]
fn nan_mass_stalls_instead_of_panicking() {
    let mut balls = BallSet::new();
    let l = balls.insert(Ball::new(0.02, 6.5, Material::Metal, Position::new(40.0, 45.0)));
    let r = balls.insert(Ball::new(f64::NAN, 6.5, Material::Metal, Position::new(55.0, 45.0)));

    let mut system = PendulumSystem::new(Position::new(200.0, 150.0), 150.0, 7.0);
    system.set_ball(Side::Left, l, &mut balls);
    system.set_ball(Side::Right, r, &mut balls);
    system.set_right_angle(45.0, &mut balls);

    let mut sim = Simulation::start(&system, &balls).unwrap();
    assert_eq!(
        sim.step(&mut system, &mut balls, TICK),
        StepOutcome::Finished(FinishReason::Stalled)
    );
    assert!(sim.hit_report().is_none());
    assert_eq!(sim.step(&mut system, &mut balls, TICK), StepOutcome::Idle);
}

// =============================================================================
// Timing
// =============================================================================

#[test]
fn result_barely_depends_on_tick_length() {
    let mut fine = loaded(METAL_20G[0], METAL_50G, 45.0);
    let mut coarse = loaded(METAL_20G[0], METAL_50G, 45.0);
    run(&mut fine, Duration::from_millis(1));
    run(&mut coarse, Duration::from_millis(10));

    let diff = (fine.system().left_angle() - coarse.system().left_angle()).abs();
    assert!(diff < 3.0, "fine and coarse runs differ by {diff} degrees");
}

#[test]
fn timer_shows_tao_after_the_hit() {
    let mut lab = loaded(METAL_20G[0], METAL_20G[1], 60.0);
    assert_eq!(lab.timer_reading(), 0.0);

    let (report, _) = run(&mut lab, TICK);
    assert!(report.tao > 0.0);
    assert!(report.tao < TICK.as_secs_f64());
    assert_eq!(lab.timer_reading(), report.tao);
}

#[test]
fn partial_json_config_builds_a_lab() {
    let config: LabConfig =
        serde_json::from_str(r#"{ "arm_length": 120.0, "min_start_angle": 5.0 }"#).unwrap();
    let mut lab = Lab::new(config).unwrap();
    assert_eq!(lab.system().left_pos(), Position::new(193.0, 270.0));

    let l = lab.balls().id(METAL_20G[0]).unwrap();
    let r = lab.balls().id(METAL_20G[1]).unwrap();
    lab.hang(Side::Left, l);
    lab.hang(Side::Right, r);
    lab.pull_right_arm(7.0);
    assert_eq!(lab.start(), Ok(()));
}
