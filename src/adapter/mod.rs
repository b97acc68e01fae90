//! Boundary to the native pose-computation engine.
//!
//! The session only ever talks to the engine through [`NativeTrackerAdapter`].
//! Marker detection, floor-plane estimation and markerless tracking all live
//! behind this trait; nothing in this crate reimplements them.
//!
//! Implementations are shared through `Arc` and must tolerate being called
//! while the engine is not ready: every call may answer `false` or `None`,
//! and callers treat that as a normal outcome rather than a fault.

pub mod simulated;

use nalgebra::{Quaternion, Vector3};

use crate::geometry::Pose;
use crate::tracking::TrackingMethodId;

pub use simulated::SimulatedTracker;

/// Pose exactly as the engine reports it.
///
/// The quaternion is not guaranteed to be normalized (or even valid).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawPose {
    pub position: Vector3<f64>,
    pub orientation: Quaternion<f64>,
    pub is_detected: bool,
}

impl RawPose {
    pub fn new(position: Vector3<f64>, orientation: Quaternion<f64>, is_detected: bool) -> Self {
        Self {
            position,
            orientation,
            is_detected,
        }
    }

    /// Raw report of an already-validated pose.
    pub fn from_pose(pose: &Pose, is_detected: bool) -> Self {
        Self {
            position: pose.position,
            orientation: *pose.orientation.quaternion(),
            is_detected,
        }
    }
}

/// Minimal surface of the native tracker used by tracking sessions.
pub trait NativeTrackerAdapter: Send + Sync {
    /// Enable a tracking method. Returns false if the engine does not
    /// support the id (or is not ready).
    fn enable_method(&self, id: TrackingMethodId) -> bool;

    /// Disable a tracking method. Returns false if the engine does not
    /// support the id (or is not ready).
    fn disable_method(&self, id: TrackingMethodId) -> bool;

    /// Current pose for a method, or `None` when no pose is available.
    fn pose(&self, id: TrackingMethodId) -> Option<RawPose>;

    /// Set the floor depth used by markerless tracking.
    fn set_floor_height(&self, depth: f64);

    /// Whether the engine currently has a lock for this method.
    fn is_tracking(&self, id: TrackingMethodId) -> bool;

    /// Pose on the detected floor plane where a markerless anchor would be
    /// placed, or `None` if no floor is available.
    fn floor_place_pose(&self) -> Option<RawPose>;

    /// Restart the (already enabled) markerless method `id` anchored at
    /// `pose`.
    fn start_markerless_at(&self, id: TrackingMethodId, pose: &Pose) -> bool;
}
