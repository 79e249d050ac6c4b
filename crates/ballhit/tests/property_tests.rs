#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::suboptimal_flops)]
#![allow(clippy::cast_lossless)]

use std::time::Duration;

use ballhit::physics::{
    Collision, kinetic_energy, max_angle, mechanical_energy, release_energy, speed,
};
use ballhit::{Ball, BallSet, Material, PendulumSystem, Position, Side, Simulation};
use proptest::prelude::*;

const L: f64 = 0.5;

fn material(metal: bool) -> Material {
    if metal {
        Material::Metal
    } else {
        Material::Plasticine
    }
}

// =============================================================================
// Single pendulum
// =============================================================================

proptest! {
    #[test]
    fn release_angle_is_the_turning_point(
        a0 in 1.0f64..170.0,
        m in 0.005f64..1.0,
    ) {
        let e = release_energy(a0, L, m);
        let top = max_angle(e, L, m);
        prop_assert!(
            (top - a0).abs() < 1e-6,
            "released at {}, turns at {}",
            a0, top
        );
    }

    #[test]
    fn swing_conserves_energy(
        a0 in 1.0f64..170.0,
        frac in 0.0f64..0.99,
        m in 0.005f64..1.0,
    ) {
        let e = release_energy(a0, L, m);
        let a = a0 * frac;
        let v = speed(a, e, L, m);
        prop_assert!(v.is_finite());

        let total = mechanical_energy(a, v, L, m);
        prop_assert!(
            (total - e).abs() <= e * 1e-9,
            "energy drifted: start={}, at {} deg={}",
            e, a, total
        );
    }

    #[test]
    fn speed_is_fastest_at_the_bottom(
        a0 in 1.0f64..170.0,
        frac in 0.01f64..0.99,
        m in 0.005f64..1.0,
    ) {
        let e = release_energy(a0, L, m);
        prop_assert!(speed(0.0, e, L, m) > speed(a0 * frac, e, L, m));
    }
}

// =============================================================================
// Collisions
// =============================================================================

proptest! {
    #[test]
    fn elastic_conserves_momentum_and_energy(
        ms in 0.005f64..1.0,
        mt in 0.005f64..1.0,
        v in 0.01f64..10.0,
    ) {
        let (vs, vt) = Collision::Elastic.split(ms, mt, v);

        let p_before = ms * v;
        let p_after = ms * vs + mt * vt;
        prop_assert!((p_after - p_before).abs() <= p_before * 1e-9);

        let k_before = kinetic_energy(v, ms);
        let k_after = kinetic_energy(vs, ms) + kinetic_energy(vt, mt);
        prop_assert!((k_after - k_before).abs() <= k_before * 1e-9);

        // The target always moves off forward.
        prop_assert!(vt > 0.0);
    }

    #[test]
    fn inelastic_shares_velocity_and_loses_energy(
        ms in 0.005f64..1.0,
        mt in 0.005f64..1.0,
        v in 0.01f64..10.0,
    ) {
        let (vs, vt) = Collision::Inelastic.split(ms, mt, v);
        prop_assert!((vs - vt).abs() < 1e-12);

        let p_before = ms * v;
        let p_after = ms * vs + mt * vt;
        prop_assert!((p_after - p_before).abs() <= p_before * 1e-9);

        let k_before = kinetic_energy(v, ms);
        let k_after = kinetic_energy(vs, ms) + kinetic_energy(vt, mt);
        prop_assert!(k_after < k_before);
    }
}

// =============================================================================
// Whole runs
// =============================================================================

proptest! {
    #[test]
    fn every_run_finishes(
        mr in 0.01f64..0.1,
        ml in 0.01f64..0.1,
        right_metal in any::<bool>(),
        left_metal in any::<bool>(),
        angle in 11.0f64..90.0,
        tick_ms in 1u64..20,
    ) {
        let mut balls = BallSet::new();
        let left = balls.insert(Ball::new(ml, 6.5, material(left_metal), Position::new(40.0, 45.0)));
        let right = balls.insert(Ball::new(mr, 6.5, material(right_metal), Position::new(55.0, 45.0)));

        let mut system = PendulumSystem::new(Position::new(200.0, 150.0), 150.0, 7.0);
        system.set_ball(Side::Left, left, &mut balls);
        system.set_ball(Side::Right, right, &mut balls);
        system.set_right_angle(angle, &mut balls);

        let mut sim = Simulation::start(&system, &balls).unwrap();
        let tick = Duration::from_millis(tick_ms);
        let mut steps = 0;
        while !sim.is_finished() && steps < 200_000 {
            sim.step(&mut system, &mut balls, tick);
            steps += 1;
        }

        prop_assert!(sim.is_finished(), "still running after {} steps", steps);
        prop_assert!(system.left_angle().is_finite());
        prop_assert!(system.right_angle().is_finite());

        let report = sim.hit_report();
        prop_assert!(report.is_some());
        let report = report.unwrap();
        prop_assert!(report.tao.is_finite() && report.tao >= 0.0);
    }
}
