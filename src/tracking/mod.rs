//! Tracking methods and the messages they produce.
//!
//! This module contains everything below the session:
//! - method ids and per-method state
//! - the `PoseSample` message and the `PoseBus` that delivers it
//! - the `TrackingMethod` variants (marker, markerless)
//! - per-frame reports

pub mod events;
pub mod method;
pub mod result;
pub mod sample;
pub mod state;
pub mod types;

pub use events::PoseBus;
pub use method::{DEFAULT_FLOOR_DEPTH, MarkerlessState, MethodKind, MethodVariant, TrackingMethod};
pub use result::{FrameReport, MethodFailure, SessionStats};
pub use sample::PoseSample;
pub use state::TrackingState;
pub use types::{SubscriptionId, TrackingMethodId};
