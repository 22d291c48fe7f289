//! Property tests for the motion and combat rules.

use std::sync::{Arc, Mutex};

use proptest::prelude::*;

use crate::config::{ProjectileSpec, TankTuning, TurnMode};
use crate::entity::EntityId;
use crate::math::{heading_vector, move_toward_vec, rotated, Vector2};
use crate::projectile::Projectile;
use crate::resolver::{CollisionTarget, ResolutionOutcome};
use crate::tank::Tank;

use super::helpers::armed_spec;

fn tank_at(position: Vector2, heading: f64, turn_mode: TurnMode) -> Tank {
    Tank::new(
        EntityId::new(1),
        position,
        heading,
        TankTuning {
            turn_mode,
            ..Default::default()
        },
        Some(ProjectileSpec::default()),
    )
    .unwrap()
}

fn turn_mode() -> impl Strategy<Value = TurnMode> {
    prop_oneof![Just(TurnMode::Discrete), Just(TurnMode::Continuous)]
}

proptest! {
    #[test]
    fn braking_is_monotone_and_reaches_zero(
        vx in -300.0f64..300.0,
        vy in -300.0f64..300.0,
        speed in 10.0f64..500.0,
        dt in 0.001f64..0.1,
    ) {
        let step = speed * dt;
        let ratio = vx.abs().max(vy.abs()) / step;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let ticks = (ratio * (1.0 + 1e-9)).ceil() as usize;

        let mut v = Vector2::new(vx, vy);
        for _ in 0..ticks {
            let next = move_toward_vec(v, Vector2::ZERO, step);
            prop_assert!(next.x.abs() <= v.x.abs());
            prop_assert!(next.y.abs() <= v.y.abs());
            prop_assert!(next.x * v.x >= 0.0 && next.y * v.y >= 0.0, "overshoot");
            v = next;
        }
        prop_assert_eq!(v, Vector2::ZERO);
    }

    #[test]
    fn tank_coasts_to_a_stop(
        heading in -3.0f64..3.0,
        dt in 0.005f64..0.05,
    ) {
        let mut tank = tank_at(Vector2::ZERO, heading, TurnMode::Discrete);
        tank.set_control_vector(0.0, 1.0);
        tank.step(dt);
        tank.set_control_vector(0.0, 0.0);

        let mut last = tank.velocity().length();
        for _ in 0..((1.0 / dt).ceil() as usize + 1) {
            tank.step(dt);
            let now = tank.velocity().length();
            prop_assert!(now <= last);
            last = now;
        }
        prop_assert_eq!(tank.velocity(), Vector2::ZERO);
    }

    #[test]
    fn reflection_preserves_speed(
        heading in -3.1f64..3.1,
        speed in 1.0f64..1000.0,
        normal_angle in -3.1f64..3.1,
        scale in 0.1f64..10.0,
    ) {
        let mut shot = Projectile::spawn(None, Vector2::ZERO, heading_vector(heading), armed_spec(speed)).unwrap();
        let normal = rotated(Vector2::X, normal_angle) * scale;

        let outcome = shot.on_collision(normal, CollisionTarget::Surface);

        prop_assert_eq!(outcome, ResolutionOutcome::Bounced);
        prop_assert!(shot.is_alive());
        prop_assert!((shot.velocity().length() - speed).abs() < 1e-6 * speed.max(1.0));
    }

    #[test]
    fn spawned_projectile_moves_at_spec_speed(
        dx in -1e3f64..1e3,
        dy in -1e3f64..1e3,
        speed in 1.0f64..1000.0,
    ) {
        prop_assume!(Vector2::new(dx, dy).length() > 1e-6);
        let shot = Projectile::spawn(None, Vector2::ZERO, Vector2::new(dx, dy), armed_spec(speed)).unwrap();
        prop_assert!((shot.velocity().length() - speed).abs() < 1e-9 * speed);
    }

    #[test]
    fn heading_stays_wrapped(
        start in -10.0f64..10.0,
        mode in turn_mode(),
        turns in prop::collection::vec(-1.0f64..1.0, 1..200),
        dt in 0.001f64..0.5,
    ) {
        let mut tank = tank_at(Vector2::ZERO, start, mode);
        prop_assert!(tank.heading() > -std::f64::consts::PI && tank.heading() <= std::f64::consts::PI);
        for turn in turns {
            tank.set_control_vector(turn, 0.5);
            tank.step(dt);
            let h = tank.heading();
            prop_assert!(h > -std::f64::consts::PI && h <= std::f64::consts::PI, "heading {} escaped", h);
        }
    }

    #[test]
    fn repeated_hits_signal_once(hits in 1usize..20) {
        let mut tank = tank_at(Vector2::ZERO, 0.0, TurnMode::Discrete);
        let count = Arc::new(Mutex::new(0u32));
        let sink = Arc::clone(&count);
        tank.subscribe(move |_| *sink.lock().unwrap() += 1);

        for _ in 0..hits {
            tank.on_hit();
        }

        prop_assert_eq!(*count.lock().unwrap(), 1);
        prop_assert_eq!(tank.deaths(), 1);
    }

    #[test]
    fn firing_at_own_position_does_nothing(
        x in -1e4f64..1e4,
        y in -1e4f64..1e4,
    ) {
        let position = Vector2::new(x, y);
        let mut tank = tank_at(position, 0.0, TurnMode::Discrete);
        prop_assert!(tank.fire(position).is_none());
        prop_assert_eq!(tank.aim_target(), None);
    }

    #[test]
    fn unarmed_collisions_change_nothing(
        heading in -3.1f64..3.1,
        normal_angle in -3.1f64..3.1,
        arming_delay in 0.01f64..5.0,
        hit_something in any::<bool>(),
    ) {
        let spec = ProjectileSpec { arming_delay, ..ProjectileSpec::with_speed(150.0) };
        let mut shot = Projectile::spawn(None, Vector2::ZERO, heading_vector(heading), spec).unwrap();
        let mut bystander = tank_at(Vector2::ZERO, 0.0, TurnMode::Discrete);
        let before = shot.velocity();

        let target = if hit_something {
            CollisionTarget::Hittable(&mut bystander)
        } else {
            CollisionTarget::Surface
        };
        let outcome = shot.on_collision(rotated(Vector2::X, normal_angle), target);

        prop_assert_eq!(outcome, ResolutionOutcome::Ignored);
        prop_assert_eq!(shot.velocity(), before);
        prop_assert!(shot.is_alive());
        prop_assert!(bystander.is_alive());
    }
}
