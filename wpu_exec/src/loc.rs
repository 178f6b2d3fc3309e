//! # Localisation module
//!
//! Pose types shared by the route and the planner. Poses are produced by an external source,
//! this module only defines their shape.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::{Quaternion, UnitQuaternion, Vector2, Vector3};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A pose (position and attitude) in the map frame.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// The position in the map frame
    pub position_m: Vector3<f64>,

    /// The attitude in the map frame. This is a quaternion that will rotate
    /// an object from the map frame into the body frame.
    pub attitude_q: UnitQuaternion<f64>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Pose {
    fn default() -> Self {
        Self {
            position_m: Vector3::zeros(),
            attitude_q: UnitQuaternion::identity(),
        }
    }
}

impl Pose {
    /// Build a pose from raw message components.
    ///
    /// `attitude_q` is ordered `[i, j, k, w]` and is normalised.
    pub fn from_msg(position_m: [f64; 3], attitude_q: [f64; 4]) -> Self {
        Self {
            position_m: Vector3::from(position_m),
            attitude_q: UnitQuaternion::from_quaternion(Quaternion::new(
                attitude_q[3],
                attitude_q[0],
                attitude_q[1],
                attitude_q[2],
            )),
        }
    }

    /// Build a pose at the given position with the given heading about the map Z axis.
    pub fn from_position_heading(position_m: Vector3<f64>, heading_rad: f64) -> Self {
        Self {
            position_m,
            attitude_q: UnitQuaternion::from_euler_angles(0.0, 0.0, heading_rad),
        }
    }

    /// True if every component of the position and attitude is finite.
    pub fn is_finite(&self) -> bool {
        self.position_m.iter().all(|c| c.is_finite())
            && self.attitude_q.coords.iter().all(|c| c.is_finite())
    }

    /// Return the position projected into the XY plane.
    pub fn position2(&self) -> Vector2<f64> {
        self.position_m.xy()
    }

    /// Return the heading (angle to the positive map X axis) in radians.
    pub fn get_heading(&self) -> f64 {
        self.attitude_q.euler_angles().2
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_from_msg() {
        // 90 degrees about Z, as [i, j, k, w]
        let half = FRAC_PI_2 / 2.0;
        let pose = Pose::from_msg([1.0, 2.0, 3.0], [0.0, 0.0, half.sin(), half.cos()]);

        assert_eq!(pose.position2(), Vector2::new(1.0, 2.0));
        assert!((pose.get_heading() - FRAC_PI_2).abs() < 1e-9);
    }

    #[test]
    fn test_from_msg_normalises() {
        let pose = Pose::from_msg([0.0; 3], [0.0, 0.0, 0.0, 2.0]);

        assert!((pose.attitude_q.quaternion().norm() - 1.0).abs() < 1e-12);
        assert!(pose.get_heading().abs() < 1e-12);
    }
}
