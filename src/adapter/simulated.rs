//! Deterministic stand-in for the native tracker.
//!
//! `SimulatedTracker` replays scripted poses per method and records every
//! call it receives, so both the demo binary and the tests can drive a
//! session without a camera or the real engine.

use std::collections::{HashMap, HashSet, VecDeque};
use std::f64::consts::TAU;

use nalgebra::{UnitQuaternion, Vector3};
use parking_lot::Mutex;
use tracing::debug;

use super::{NativeTrackerAdapter, RawPose};
use crate::geometry::Pose;
use crate::tracking::TrackingMethodId;

/// Scripted pose stream for one method.
#[derive(Debug, Default)]
struct ScriptedTrack {
    /// Poses still to be reported, one per `pose()` call.
    pending: VecDeque<RawPose>,
    /// Last pose handed out; repeated once the script runs dry.
    last: Option<RawPose>,
}

#[derive(Debug, Default)]
struct SimState {
    available: bool,
    supported: HashSet<TrackingMethodId>,
    enabled: HashSet<TrackingMethodId>,
    tracks: HashMap<TrackingMethodId, ScriptedTrack>,
    floor_heights: Vec<f64>,
    enable_calls: Vec<TrackingMethodId>,
    disable_calls: Vec<TrackingMethodId>,
    floor_place: Option<RawPose>,
    anchor: Option<Pose>,
}

/// In-process simulation of the native tracker.
#[derive(Debug)]
pub struct SimulatedTracker {
    state: Mutex<SimState>,
}

impl SimulatedTracker {
    /// Create a tracker that supports the given method ids.
    pub fn new<I>(supported: I) -> Self
    where
        I: IntoIterator<Item = TrackingMethodId>,
    {
        Self {
            state: Mutex::new(SimState {
                available: true,
                supported: supported.into_iter().collect(),
                ..SimState::default()
            }),
        }
    }

    /// Tracker supporting both marker and markerless tracking.
    pub fn with_default_methods() -> Self {
        Self::new([TrackingMethodId::MARKER, TrackingMethodId::MARKERLESS])
    }

    /// Simulate the engine going away (or coming back). While unavailable
    /// every call answers `false` / `None`.
    pub fn set_available(&self, available: bool) {
        self.state.lock().available = available;
    }

    /// Queue a pose to be reported on the next `pose()` call for `id`.
    pub fn push_pose(&self, id: TrackingMethodId, pose: RawPose) {
        self.state
            .lock()
            .tracks
            .entry(id)
            .or_default()
            .pending
            .push_back(pose);
    }

    /// Queue a full script of poses for `id`.
    pub fn push_poses<I>(&self, id: TrackingMethodId, poses: I)
    where
        I: IntoIterator<Item = RawPose>,
    {
        let mut state = self.state.lock();
        let track = state.tracks.entry(id).or_default();
        track.pending.extend(poses);
    }

    /// Queue `n_frames` detected poses walking a horizontal circle of
    /// `radius` around the origin, facing along the direction of travel.
    pub fn push_orbit(&self, id: TrackingMethodId, n_frames: usize, radius: f64) {
        let poses = (0..n_frames).map(|i| {
            let theta = TAU * i as f64 / n_frames.max(1) as f64;
            let position = Vector3::new(radius * theta.cos(), 0.0, radius * theta.sin());
            let orientation = UnitQuaternion::from_euler_angles(0.0, -theta, 0.0);
            RawPose::from_pose(&Pose::new(position, orientation), true)
        });
        self.push_poses(id, poses);
    }

    /// Set the pose reported by `floor_place_pose()`.
    pub fn set_floor_place_pose(&self, pose: Option<RawPose>) {
        self.state.lock().floor_place = pose;
    }

    /// Every floor height received, in call order.
    pub fn floor_heights(&self) -> Vec<f64> {
        self.state.lock().floor_heights.clone()
    }

    /// Number of `enable_method` calls received for `id`.
    pub fn enable_calls(&self, id: TrackingMethodId) -> usize {
        self.state
            .lock()
            .enable_calls
            .iter()
            .filter(|c| **c == id)
            .count()
    }

    /// Number of `disable_method` calls received for `id`.
    pub fn disable_calls(&self, id: TrackingMethodId) -> usize {
        self.state
            .lock()
            .disable_calls
            .iter()
            .filter(|c| **c == id)
            .count()
    }

    /// Whether the simulated engine currently has `id` enabled.
    pub fn is_enabled(&self, id: TrackingMethodId) -> bool {
        self.state.lock().enabled.contains(&id)
    }

    /// Anchor set by the last successful `start_markerless_at`.
    pub fn anchor(&self) -> Option<Pose> {
        self.state.lock().anchor
    }
}

impl Default for SimulatedTracker {
    fn default() -> Self {
        Self::with_default_methods()
    }
}

impl NativeTrackerAdapter for SimulatedTracker {
    fn enable_method(&self, id: TrackingMethodId) -> bool {
        let mut state = self.state.lock();
        state.enable_calls.push(id);
        if !state.available || !state.supported.contains(&id) {
            return false;
        }
        state.enabled.insert(id);
        true
    }

    fn disable_method(&self, id: TrackingMethodId) -> bool {
        let mut state = self.state.lock();
        state.disable_calls.push(id);
        if !state.available || !state.supported.contains(&id) {
            return false;
        }
        state.enabled.remove(&id);
        true
    }

    fn pose(&self, id: TrackingMethodId) -> Option<RawPose> {
        let mut state = self.state.lock();
        if !state.available || !state.enabled.contains(&id) {
            return None;
        }
        let track = state.tracks.get_mut(&id)?;
        if let Some(next) = track.pending.pop_front() {
            track.last = Some(next);
        }
        track.last
    }

    fn set_floor_height(&self, depth: f64) {
        let mut state = self.state.lock();
        if state.available {
            debug!("Simulated tracker floor height set to {}", depth);
            state.floor_heights.push(depth);
        }
    }

    fn is_tracking(&self, id: TrackingMethodId) -> bool {
        let state = self.state.lock();
        state.available
            && state.enabled.contains(&id)
            && state
                .tracks
                .get(&id)
                .and_then(|t| t.last)
                .is_some_and(|p| p.is_detected)
    }

    fn floor_place_pose(&self) -> Option<RawPose> {
        let state = self.state.lock();
        if !state.available {
            return None;
        }
        state.floor_place
    }

    fn start_markerless_at(&self, id: TrackingMethodId, pose: &Pose) -> bool {
        let mut state = self.state.lock();
        if !state.available || !state.enabled.contains(&id) {
            return false;
        }
        state.anchor = Some(*pose);

        // Tracking resumes from the anchor; drop whatever was scripted for
        // the previous anchor.
        let track = state.tracks.entry(id).or_default();
        track.pending.clear();
        track.last = Some(RawPose::from_pose(pose, true));
        true
    }
}
