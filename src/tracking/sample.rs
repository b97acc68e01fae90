//! Per-frame pose message delivered to subscribers.

use nalgebra::{UnitQuaternion, Vector3};

use crate::geometry::Pose;
use crate::tracking::TrackingMethodId;

/// One pose update produced by a tracking method for one frame.
///
/// Samples are immutable once built and carry no identity beyond the frame
/// and method they came from. When `is_detected` is false the pose is the
/// last known one (or identity) and must not be treated as authoritative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseSample {
    pub method: TrackingMethodId,
    pub pose: Pose,
    pub is_detected: bool,
    pub frame_id: u64,
}

impl PoseSample {
    pub fn new(method: TrackingMethodId, pose: Pose, is_detected: bool, frame_id: u64) -> Self {
        Self {
            method,
            pose,
            is_detected,
            frame_id,
        }
    }

    /// A "tracking lost" sample carrying a non-authoritative pose.
    pub fn lost(method: TrackingMethodId, last_known: Pose, frame_id: u64) -> Self {
        Self::new(method, last_known, false, frame_id)
    }

    pub fn position(&self) -> &Vector3<f64> {
        &self.pose.position
    }

    pub fn orientation(&self) -> &UnitQuaternion<f64> {
        &self.pose.orientation
    }
}
