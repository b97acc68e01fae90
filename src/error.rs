//! Error taxonomy for tracking sessions.
//!
//! Every failure a session operation can report maps to exactly one
//! [`TrackingError`] variant. None of them are retried here; retry policy
//! (e.g. re-attempting camera initialization) belongs to the host.

use crate::tracking::TrackingMethodId;

/// Errors returned by tracking methods and sessions.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum TrackingError {
    /// The adapter rejected an enable/disable request for this id.
    #[error("tracking method {id} not supported by the native tracker")]
    UnsupportedMethod { id: TrackingMethodId },

    /// No method with this id is registered in the session.
    #[error("no tracking method registered with id {id}")]
    UnknownMethod { id: TrackingMethodId },

    /// A method with this id is already registered.
    #[error("tracking method id {id} is already registered")]
    DuplicateId { id: TrackingMethodId },

    /// The session has no adapter, or the adapter has been dropped.
    #[error("native tracker adapter is unavailable")]
    AdapterUnavailable,

    /// The adapter reported a pose that cannot be a real pose
    /// (non-finite coordinates or a degenerate quaternion).
    #[error("native tracker returned an invalid pose for method {id}")]
    InvalidPose { id: TrackingMethodId },

    /// Floor depths must be finite.
    #[error("invalid floor depth {depth} for tracking method {id}")]
    InvalidFloorDepth { id: TrackingMethodId, depth: f64 },

    /// The adapter could not provide a floor placement pose, or refused
    /// to start markerless tracking from it.
    #[error("floor placement is unavailable")]
    PlacementUnavailable,
}
