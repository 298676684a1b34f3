use std::error::Error;
use std::time::Duration;

use balance_core::error::BalanceError;
use balance_core::mocks::StaticWorld;
use balance_core::{BalanceCfg, build_balancer};
use balance_traits::{Body, PhysicsWorld, Pose, Shape};

/// A world that steps fine once, then refuses.
struct FlakyWorld {
    inner: StaticWorld,
    ok_sent: bool,
}

impl PhysicsWorld for FlakyWorld {
    fn step_world(&mut self, dt_s: f64) -> Result<(), Box<dyn Error + Send + Sync>> {
        if self.ok_sent {
            Err("solver diverged".into())
        } else {
            self.ok_sent = true;
            self.inner.step_world(dt_s)
        }
    }
    fn pose(&self, body: Body) -> Pose {
        self.inner.pose(body)
    }
    fn contact_points(&self, a: Shape, b: Shape) -> usize {
        self.inner.contact_points(a, b)
    }
    fn set_angle(&mut self, body: Body, angle: f64) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.inner.set_angle(body, angle)
    }
}

#[test]
fn step_errors_map_to_balance_error_physics() {
    let world = FlakyWorld {
        inner: StaticWorld::default(),
        ok_sent: false,
    };
    let mut core = build_balancer(world, BalanceCfg::default(), None).unwrap();

    // First tick OK, second should error:
    core.update(Duration::from_millis(16)).unwrap();
    let err = core
        .update(Duration::from_millis(16))
        .expect_err("expected physics error");
    match err.downcast_ref::<BalanceError>() {
        Some(BalanceError::Physics(msg)) => assert!(msg.contains("solver diverged")),
        other => panic!("unexpected error variant: {other:?}"),
    }
    assert!(format!("{err:#}").starts_with("stepping physics world"));
    // The failed tick did not count.
    assert_eq!(core.ticks(), 1);
}

#[test]
fn rejected_actuator_write_propagates_with_context() {
    let mut core = build_balancer(StaticWorld::default(), BalanceCfg::default(), None).unwrap();
    core.world_mut().fail_writes = true;
    let err = core.update(Duration::from_millis(16)).unwrap_err();
    assert!(format!("{err:#}").contains("writing actuator angle"));
    assert!(matches!(
        err.downcast_ref::<BalanceError>(),
        Some(BalanceError::Physics(_))
    ));
}
