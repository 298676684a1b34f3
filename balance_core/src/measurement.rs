//! Ball position measurement from raw poses.

use balance_traits::Pose;

use crate::config::SensorCfg;

/// A distance sensor rigidly mounted on the beam.
#[derive(Debug, Clone, Copy)]
pub struct SensorMount {
    along: f64,
    normal: f64,
    units_per_meter: f64,
}

impl Default for SensorMount {
    fn default() -> Self {
        Self::from(&SensorCfg::default())
    }
}

impl From<&SensorCfg> for SensorMount {
    fn from(c: &SensorCfg) -> Self {
        Self {
            along: c.offset_along,
            normal: c.offset_normal,
            units_per_meter: c.units_per_meter,
        }
    }
}

impl SensorMount {
    /// World coordinates of the sensor's reference point for a given beam pose.
    pub fn reference_point(&self, beam: Pose) -> (f64, f64) {
        let (sin, cos) = beam.angle.sin_cos();
        (
            beam.x + self.along * cos - self.normal * sin,
            beam.y + self.along * sin + self.normal * cos,
        )
    }

    /// Signed ball distance from the reference point, in meters.
    ///
    /// The magnitude is the Euclidean distance; the sign follows the projection
    /// onto the beam axis, so a ball on the near side of the sensor reads
    /// negative. Non-finite poses propagate as NaN.
    pub fn measure(&self, beam: Pose, ball: Pose) -> f64 {
        let (rx, ry) = self.reference_point(beam);
        let dx = ball.x - rx;
        let dy = ball.y - ry;
        let (sin, cos) = beam.angle.sin_cos();
        let along_axis = dx * cos + dy * sin;
        let dist = dx.hypot(dy);
        let signed = if along_axis < 0.0 { -dist } else { dist };
        signed / self.units_per_meter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const BEAM: Pose = Pose::new(365.0, 480.0, 0.0);

    #[test]
    fn ball_at_reference_reads_zero() {
        let m = SensorMount::default();
        assert_eq!(m.measure(BEAM, Pose::new(615.0, 505.0, 0.0)), 0.0);
    }

    #[rstest]
    #[case(365.0, -0.25)] // beam center
    #[case(115.0, -0.5)] // wall end
    #[case(665.0, 0.05)] // past the sensor
    fn level_beam_reads_along_axis(#[case] ball_x: f64, #[case] expected: f64) {
        let m = SensorMount::default();
        let d = m.measure(BEAM, Pose::new(ball_x, 505.0, 0.0));
        assert!((d - expected).abs() < 1e-12, "got {d}");
    }

    #[test]
    fn reading_is_invariant_under_rigid_rotation() {
        let m = SensorMount::default();
        let level = m.measure(BEAM, Pose::new(300.0, 505.0, 0.0));

        let phi: f64 = 0.3;
        let (sin, cos) = phi.sin_cos();
        let beam = Pose::new(365.0, 480.0, phi);
        // Same beam-frame ball position (-65, 25), rotated with the beam.
        let ball = Pose::new(365.0 - 65.0 * cos - 25.0 * sin, 480.0 - 65.0 * sin + 25.0 * cos, 0.0);
        let tilted = m.measure(beam, ball);
        assert!((level - tilted).abs() < 1e-12);
    }

    #[test]
    fn off_axis_ball_uses_euclidean_magnitude() {
        let m = SensorMount::default();
        // 30 along, 40 below the reference: distance 50.
        let d = m.measure(BEAM, Pose::new(645.0, 465.0, 0.0));
        assert!((d - 0.05).abs() < 1e-12);
    }
}
