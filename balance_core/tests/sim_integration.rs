//! Closed-loop runs against the bundled simulated rig.

use balance_core::config::{BalanceCfg, ControlMode, ControllerCfg};
use balance_core::{BalanceCore, TickStatus, build_balancer};
use balance_sim::{RigParams, SimulatedRig};
use balance_traits::clock::test_clock::TestClock;
use balance_traits::{Body, PhysicsWorld};

fn core_on_rig(
    clock: &TestClock,
    params: RigParams,
    mode: ControlMode,
) -> BalanceCore<SimulatedRig> {
    let cfg = BalanceCfg {
        controller: ControllerCfg {
            mode,
            ..ControllerCfg::default()
        },
        ..BalanceCfg::default()
    };
    build_balancer(SimulatedRig::new(params), cfg, Some(Box::new(clock.clone()))).unwrap()
}

#[test]
fn first_measurement_is_quarter_meter_short_of_sensor() {
    let clock = TestClock::new();
    let mut core = core_on_rig(&clock, RigParams::default(), ControlMode::Feedback);
    let dt = core.period();
    core.update(dt).unwrap();
    // Ball starts on the beam center; the sensor sits at the far end.
    assert!((core.draw().measurement_m + 0.25).abs() < 1e-9);
}

#[test]
fn feedback_keeps_ball_on_beam_and_settles_near_center() {
    let clock = TestClock::new();
    let params = RigParams {
        ball_offset: 50.0,
        ..RigParams::default()
    };
    let mut core = core_on_rig(&clock, params, ControlMode::Feedback);
    let dt = core.period();
    for tick in 0..3_000 {
        let status = core.update(dt).unwrap();
        assert_eq!(status, TickStatus::Running, "tripped at tick {tick}");
        assert!(core.world().ball_on_beam(), "ball fell at tick {tick}");
        clock.advance(dt);
    }
    let snap = core.draw();
    assert!(
        (snap.measurement_m + 0.25).abs() < 0.01,
        "ended at {} m",
        snap.measurement_m
    );
    // Rig follows the applied command exactly.
    assert_eq!(
        core.world().pose(Body::Actuator).angle,
        snap.actuator_angle
    );
}

#[test]
fn sweep_drops_the_ball_and_freezes_the_rig() {
    let clock = TestClock::new();
    let mut core = core_on_rig(&clock, RigParams::default(), ControlMode::Sweep);
    let dt = core.period();

    let mut first_lost = None;
    for tick in 0..1_000u64 {
        core.update(dt).unwrap();
        if first_lost.is_none() && core.draw().fault_ticks == 1 {
            first_lost = Some(tick);
        }
        clock.advance(dt);
        if core.frozen_at().is_some() {
            break;
        }
    }
    let lost = first_lost.expect("sweep should roll the ball off");
    assert_eq!(core.frozen_at(), Some(lost + 40));
    assert!(!core.world().ball_on_beam());

    // Frozen physics: simulated time stops, actuator writes continue.
    let t_frozen = core.world().sim_time_s();
    let angle_before = core.world().pose(Body::Actuator).angle;
    for _ in 0..20 {
        assert_eq!(core.update(dt).unwrap(), TickStatus::Frozen);
        clock.advance(dt);
    }
    assert_eq!(core.world().sim_time_s(), t_frozen);
    assert_ne!(
        core.world().pose(Body::Actuator).angle,
        angle_before
    );
}
