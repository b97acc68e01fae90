//! Rigid pose (position + orientation) as reported by the native tracker.

use nalgebra::{Quaternion, UnitQuaternion, Vector3};

/// Squared norm below which a raw quaternion is treated as degenerate.
const MIN_QUATERNION_NORM_SQ: f64 = 1e-12;

/// Position and orientation of a tracked object in world coordinates.
///
/// The orientation is a `UnitQuaternion`, so it is normalized by
/// construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vector3<f64>,
    pub orientation: UnitQuaternion<f64>,
}

impl Pose {
    pub fn new(position: Vector3<f64>, orientation: UnitQuaternion<f64>) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// Origin with no rotation.
    pub fn identity() -> Self {
        Self {
            position: Vector3::zeros(),
            orientation: UnitQuaternion::identity(),
        }
    }

    /// Build a pose from an unnormalized quaternion.
    ///
    /// Returns `None` if any component is non-finite or the quaternion is
    /// (numerically) zero or too large to normalize, which is what garbage
    /// data from the native side looks like.
    pub fn from_raw(position: Vector3<f64>, orientation: Quaternion<f64>) -> Option<Self> {
        if !position.iter().all(|v| v.is_finite()) {
            return None;
        }
        if !orientation.coords.iter().all(|v| v.is_finite()) {
            return None;
        }
        // Finite components can still overflow the norm.
        let norm_sq = orientation.norm_squared();
        if !norm_sq.is_finite() || norm_sq < MIN_QUATERNION_NORM_SQ {
            return None;
        }

        Some(Self {
            position,
            orientation: UnitQuaternion::from_quaternion(orientation),
        })
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}
