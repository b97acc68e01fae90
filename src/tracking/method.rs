//! Tracking methods: the closed set of ways to obtain a pose.
//!
//! A [`TrackingMethod`] pairs a stable id with a [`MethodVariant`] and holds
//! a weak reference to the adapter it reports through. The reference is
//! attached when the method is registered with a session; until then, and
//! after the adapter is dropped, every operation fails with
//! [`TrackingError::AdapterUnavailable`].

use std::sync::{Arc, Weak};

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::adapter::NativeTrackerAdapter;
use crate::error::TrackingError;
use crate::geometry::Pose;
use crate::tracking::{PoseBus, PoseSample, TrackingMethodId, TrackingState};

/// Default markerless floor depth, in native tracker units.
pub const DEFAULT_FLOOR_DEPTH: f64 = 200.0;

/// Kind of tracking method, without its runtime state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MethodKind {
    Marker,
    Markerless,
}

impl MethodKind {
    /// Id the native engine uses for this kind by default.
    pub fn default_id(&self) -> TrackingMethodId {
        match self {
            Self::Marker => TrackingMethodId::MARKER,
            Self::Markerless => TrackingMethodId::MARKERLESS,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Marker => "Marker",
            Self::Markerless => "Markerless",
        }
    }
}

/// Floor-relative tracking state.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerlessState {
    /// Floor depth to apply on the next successful start.
    pub floor_depth: f64,
    /// Floor depth sent to the adapter by the current run, if running.
    active_floor_depth: Option<f64>,
}

impl MarkerlessState {
    pub fn new(floor_depth: f64) -> Self {
        Self {
            floor_depth,
            active_floor_depth: None,
        }
    }
}

impl Default for MarkerlessState {
    fn default() -> Self {
        Self::new(DEFAULT_FLOOR_DEPTH)
    }
}

/// Variant-specific part of a tracking method.
#[derive(Debug, Clone, PartialEq)]
pub enum MethodVariant {
    /// Image-marker tracking. Detection comes with each pose report.
    Marker,
    /// Floor-relative tracking. Detection comes from the engine's
    /// tracking flag, and a lost sample is published on stop.
    Markerless(MarkerlessState),
}

impl MethodVariant {
    pub fn kind(&self) -> MethodKind {
        match self {
            Self::Marker => MethodKind::Marker,
            Self::Markerless(_) => MethodKind::Markerless,
        }
    }
}

/// A single tracking method registered with a session.
#[derive(Debug)]
pub struct TrackingMethod {
    id: TrackingMethodId,
    variant: MethodVariant,

    /// Adapter this method reports through. Weak so that methods never
    /// keep the native tracker alive on their own.
    adapter: Option<Weak<dyn NativeTrackerAdapter>>,

    initialized: bool,
    enabled: bool,
    state: TrackingState,

    /// Pose from the last frame with a detection.
    last_pose: Pose,
}

impl TrackingMethod {
    pub fn new(id: TrackingMethodId, variant: MethodVariant) -> Self {
        Self {
            id,
            variant,
            adapter: None,
            initialized: false,
            enabled: false,
            state: TrackingState::Idle,
            last_pose: Pose::identity(),
        }
    }

    /// Marker tracking with the engine's default id.
    pub fn marker() -> Self {
        Self::new(TrackingMethodId::MARKER, MethodVariant::Marker)
    }

    /// Markerless tracking with the engine's default id and floor depth.
    pub fn markerless() -> Self {
        Self::markerless_with_floor_depth(DEFAULT_FLOOR_DEPTH)
    }

    pub fn markerless_with_floor_depth(floor_depth: f64) -> Self {
        Self::new(
            TrackingMethodId::MARKERLESS,
            MethodVariant::Markerless(MarkerlessState::new(floor_depth)),
        )
    }

    /// Override the id (for engines with non-default numbering).
    pub fn with_id(mut self, id: TrackingMethodId) -> Self {
        self.id = id;
        self
    }

    /// Attach the adapter this method reports through.
    pub fn attach(&mut self, adapter: &Arc<dyn NativeTrackerAdapter>) {
        self.adapter = Some(Arc::downgrade(adapter));
    }

    pub fn id(&self) -> TrackingMethodId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.variant.kind().name()
    }

    pub fn kind(&self) -> MethodKind {
        self.variant.kind()
    }

    pub fn variant(&self) -> &MethodVariant {
        &self.variant
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn state(&self) -> TrackingState {
        self.state
    }

    /// Pose from the last frame that had a detection (identity if none).
    pub fn last_pose(&self) -> &Pose {
        &self.last_pose
    }

    /// Configured floor depth, for variants that have one.
    pub fn floor_depth(&self) -> Option<f64> {
        match &self.variant {
            MethodVariant::Markerless(m) => Some(m.floor_depth),
            MethodVariant::Marker => None,
        }
    }

    /// Floor depth the current run was started with.
    pub fn active_floor_depth(&self) -> Option<f64> {
        match &self.variant {
            MethodVariant::Markerless(m) => m.active_floor_depth,
            MethodVariant::Marker => None,
        }
    }

    /// Change the floor depth. It takes effect on the next start, not on a
    /// run in progress. Returns false for variants without a floor depth.
    pub fn set_floor_depth(&mut self, depth: f64) -> Result<bool, TrackingError> {
        match &mut self.variant {
            MethodVariant::Markerless(_) if !depth.is_finite() => {
                Err(TrackingError::InvalidFloorDepth { id: self.id, depth })
            }
            MethodVariant::Markerless(m) => {
                m.floor_depth = depth;
                Ok(true)
            }
            MethodVariant::Marker => Ok(false),
        }
    }

    /// Adopt a markerless run the adapter restarted from a new anchor.
    /// Detection state is reset; the next frame reports from the anchor.
    pub(crate) fn reanchor(&mut self, anchor: Pose) {
        self.last_pose = anchor;
        self.state = TrackingState::Started;
    }

    fn adapter(&self) -> Result<Arc<dyn NativeTrackerAdapter>, TrackingError> {
        self.adapter
            .as_ref()
            .and_then(Weak::upgrade)
            .ok_or(TrackingError::AdapterUnavailable)
    }

    /// One-time setup. Calling it again does nothing.
    pub fn init(&mut self) {
        if self.initialized {
            return;
        }
        self.initialized = true;
        debug!("Tracking method {} ({}) initialized", self.id, self.name());
    }

    /// Ask the adapter to enable this method.
    ///
    /// Already-enabled methods return `Ok` without touching the adapter.
    /// Markerless methods send their floor depth once the enable succeeds.
    pub fn start(&mut self) -> Result<(), TrackingError> {
        let adapter = self.adapter()?;

        if self.enabled {
            debug!("Tracking method {} already enabled", self.id);
            return Ok(());
        }

        if !adapter.enable_method(self.id) {
            warn!("Tracking method {} ({}) not supported", self.id, self.name());
            return Err(TrackingError::UnsupportedMethod { id: self.id });
        }

        if let MethodVariant::Markerless(m) = &mut self.variant {
            adapter.set_floor_height(m.floor_depth);
            m.active_floor_depth = Some(m.floor_depth);
        }

        self.enabled = true;
        self.state = TrackingState::Started;
        info!("Tracking method {} ({}) started", self.id, self.name());
        Ok(())
    }

    /// Ask the adapter to disable this method.
    ///
    /// Never-started methods return `Ok` without touching the adapter.
    /// A markerless method publishes exactly one lost sample on `bus`
    /// after a successful stop.
    pub fn stop(&mut self, frame_id: u64, bus: &mut PoseBus) -> Result<(), TrackingError> {
        let adapter = self.adapter()?;

        if !self.enabled {
            return Ok(());
        }

        if !adapter.disable_method(self.id) {
            warn!("Tracking method {} ({}) not supported", self.id, self.name());
            return Err(TrackingError::UnsupportedMethod { id: self.id });
        }

        self.enabled = false;
        self.state = TrackingState::Idle;
        info!("Tracking method {} ({}) stopped", self.id, self.name());

        if let MethodVariant::Markerless(m) = &mut self.variant {
            m.active_floor_depth = None;
            bus.publish(&PoseSample::lost(self.id, self.last_pose, frame_id));
        }
        Ok(())
    }

    /// Read the current pose from the adapter and publish it.
    ///
    /// Returns `Ok(None)` while disabled. A missing pose report yields a
    /// lost sample at the last known pose; only a report that cannot be a
    /// pose at all is an error.
    pub fn process_frame(
        &mut self,
        frame_id: u64,
        bus: &mut PoseBus,
    ) -> Result<Option<PoseSample>, TrackingError> {
        if !self.enabled {
            return Ok(None);
        }
        let adapter = self.adapter()?;

        let sample = match adapter.pose(self.id) {
            Some(raw) => {
                let pose = Pose::from_raw(raw.position, raw.orientation)
                    .ok_or(TrackingError::InvalidPose { id: self.id })?;
                let is_detected = match self.variant {
                    MethodVariant::Marker => raw.is_detected,
                    MethodVariant::Markerless(_) => adapter.is_tracking(self.id),
                };
                if is_detected {
                    self.last_pose = pose;
                }
                PoseSample::new(self.id, pose, is_detected, frame_id)
            }
            None => PoseSample::lost(self.id, self.last_pose, frame_id),
        };

        self.state = if sample.is_detected {
            TrackingState::Tracking
        } else {
            TrackingState::Lost
        };

        bus.publish(&sample);
        Ok(Some(sample))
    }
}
