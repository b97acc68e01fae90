//! Session orchestration.
//!
//! This module contains the top-level `TrackingSession` that owns the
//! registered tracking methods and drives them once per frame.

mod session;

pub use session::TrackingSession;
