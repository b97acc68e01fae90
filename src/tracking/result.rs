//! Per-frame results and session statistics.
//!
//! These types describe what happened while processing one frame:
//! - which samples were delivered to subscribers
//! - which methods failed and why (failures never block sibling methods)

use crate::error::TrackingError;
use crate::tracking::{PoseSample, TrackingMethodId};

/// Summary of one `process_frame` call.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub frame_id: u64,
    /// Samples delivered this frame, in method registration order.
    pub samples: Vec<PoseSample>,
    /// Methods whose pose could not be read this frame.
    pub failures: Vec<MethodFailure>,
}

impl FrameReport {
    pub fn new(frame_id: u64) -> Self {
        Self {
            frame_id,
            samples: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Sample produced by `id` this frame, if any.
    pub fn sample_for(&self, id: TrackingMethodId) -> Option<&PoseSample> {
        self.samples.iter().find(|s| s.method == id)
    }

    pub fn num_detected(&self) -> usize {
        self.samples.iter().filter(|s| s.is_detected).count()
    }
}

/// A per-method failure isolated during frame processing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MethodFailure {
    pub method: TrackingMethodId,
    pub error: TrackingError,
}

/// Running counters for a session.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SessionStats {
    /// Number of frames processed.
    pub frames_processed: u64,

    /// Number of per-frame samples delivered (excludes stop samples).
    pub samples_delivered: u64,

    /// Number of per-method frame failures that were isolated.
    pub frame_failures: u64,

    /// Number of start/stop requests rejected by the adapter.
    pub rejected_requests: u64,
}
