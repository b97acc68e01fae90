//! Per-method tracking state as seen by the session.

/// State of a single tracking method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackingState {
    /// Not enabled in the native tracker.
    #[default]
    Idle,
    /// Enabled, but no frame has been processed since the last start.
    Started,
    /// Enabled and the last processed frame had a detection.
    Tracking,
    /// Enabled, but the last processed frame had no detection.
    Lost,
}
