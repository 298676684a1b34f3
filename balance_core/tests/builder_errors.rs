use balance_core::config::*;
use balance_core::error::BuildError;
use balance_core::mocks::StaticWorld;
use balance_core::{Balancer, build_balancer};
use rstest::rstest;

#[rstest]
fn builder_missing_world_yields_typed_build_error() {
    let err = Balancer::builder()
        // missing with_world()
        .with_config(BalanceCfg::default())
        .try_build()
        .expect_err("should fail with MissingWorld");

    match err.downcast_ref::<BuildError>() {
        Some(BuildError::MissingWorld) => {}
        other => panic!("expected MissingWorld, got: {other:?}"),
    }
}

fn with(f: impl FnOnce(&mut BalanceCfg)) -> BalanceCfg {
    let mut cfg = BalanceCfg::default();
    f(&mut cfg);
    cfg
}

#[rstest]
#[case::zero_rate(with(|c| c.timing.tick_hz = 0), "tick_hz")]
#[case::negative_scale(with(|c| c.timing.time_scale = -1.0), "time_scale")]
#[case::nan_scale(with(|c| c.timing.time_scale = f64::NAN), "time_scale")]
#[case::zero_units(with(|c| c.sensor.units_per_meter = 0.0), "units_per_meter")]
#[case::inf_offset(with(|c| c.sensor.offset_along = f64::INFINITY), "sensor offsets")]
#[case::empty_window(with(|c| c.observer.window = 0), "window")]
#[case::nan_matrix(with(|c| c.observer.a[1][0] = f64::NAN), "observer matrices")]
#[case::nan_gain(with(|c| c.controller.gains[1] = f64::NAN), "gains")]
#[case::zero_limit(with(|c| c.controller.max_angle = 0.0), "max_angle")]
#[case::right_angle_limit(with(|c| c.controller.max_angle = std::f64::consts::FRAC_PI_2), "max_angle")]
fn invalid_config_is_rejected(#[case] cfg: BalanceCfg, #[case] needle: &str) {
    let err = build_balancer(StaticWorld::default(), cfg, None).expect_err("must reject");
    match err.downcast_ref::<BuildError>() {
        Some(BuildError::InvalidConfig(msg)) => {
            assert!(msg.contains(needle), "{msg:?} should mention {needle:?}")
        }
        other => panic!("expected InvalidConfig, got: {other:?}"),
    }
}

#[test]
fn zero_time_scale_is_allowed() {
    let cfg = with(|c| c.timing.time_scale = 0.0);
    let core = build_balancer(StaticWorld::default(), cfg, None).unwrap();
    assert_eq!(core.draw().time_scale, 0.0);
}

#[test]
fn non_finite_sweep_start_is_rejected() {
    let err = Balancer::builder()
        .with_world(StaticWorld::default())
        .with_sweep_start(f64::NAN)
        .build()
        .expect_err("must reject");
    assert!(err.to_string().contains("sweep start"));
}
