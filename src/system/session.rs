//! Tracking session - the runtime owner of all tracking methods.
//!
//! The `TrackingSession` is the top-level struct hosts interact with. It is
//! handed an adapter at construction, owns the registered methods and the
//! pose subscriber list, and is driven synchronously by the host: `init()`
//! once, `process_frame()` once per tick, `start`/`stop` on request.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::adapter::NativeTrackerAdapter;
use crate::error::TrackingError;
use crate::geometry::Pose;
use crate::io::SessionConfig;
use crate::tracking::{
    FrameReport, MethodFailure, MethodKind, PoseBus, PoseSample, SessionStats, SubscriptionId,
    TrackingMethod, TrackingMethodId,
};

/// Registry of tracking methods driven frame by frame.
pub struct TrackingSession {
    /// Native tracker. `None` makes the session inert.
    adapter: Option<Arc<dyn NativeTrackerAdapter>>,

    /// Registered methods, in registration order.
    methods: Vec<TrackingMethod>,

    /// Pose subscribers.
    bus: PoseBus,

    /// Id of the last processed frame (0 before the first frame).
    frame_count: u64,

    initialized: bool,
    stats: SessionStats,
}

impl TrackingSession {
    /// Create a session reporting through `adapter`.
    pub fn new(adapter: Arc<dyn NativeTrackerAdapter>) -> Self {
        Self::with_adapter(Some(adapter))
    }

    /// Create a session with no adapter. Every operation fails with
    /// [`TrackingError::AdapterUnavailable`].
    pub fn inert() -> Self {
        Self::with_adapter(None)
    }

    fn with_adapter(adapter: Option<Arc<dyn NativeTrackerAdapter>>) -> Self {
        if adapter.is_none() {
            warn!("Tracking session created without a native tracker");
        }
        Self {
            adapter,
            methods: Vec::new(),
            bus: PoseBus::new(),
            frame_count: 0,
            initialized: false,
            stats: SessionStats::default(),
        }
    }

    /// Build a session from a configuration: register every declared
    /// method, initialize, then start the `auto_start` ids in order.
    pub fn from_config(
        adapter: Arc<dyn NativeTrackerAdapter>,
        config: &SessionConfig,
    ) -> Result<Self, TrackingError> {
        let mut session = Self::new(adapter);
        for method in &config.methods {
            session.register(method.build())?;
        }
        session.init()?;
        for id in config.auto_start_ids() {
            session.start(id)?;
        }
        Ok(session)
    }

    fn adapter(&self) -> Result<&Arc<dyn NativeTrackerAdapter>, TrackingError> {
        self.adapter.as_ref().ok_or(TrackingError::AdapterUnavailable)
    }

    fn index_of(&self, id: TrackingMethodId) -> Result<usize, TrackingError> {
        self.methods
            .iter()
            .position(|m| m.id() == id)
            .ok_or(TrackingError::UnknownMethod { id })
    }

    /// Register a method. Fails with `DuplicateId` if its id is taken, in
    /// which case the registry is unchanged.
    pub fn register(&mut self, mut method: TrackingMethod) -> Result<(), TrackingError> {
        let adapter = self.adapter()?;
        let id = method.id();
        if self.methods.iter().any(|m| m.id() == id) {
            warn!("Tracking method id {} is already registered", id);
            return Err(TrackingError::DuplicateId { id });
        }

        method.attach(adapter);
        if self.initialized {
            method.init();
        }
        debug!("Registered tracking method {} ({})", id, method.name());
        self.methods.push(method);
        Ok(())
    }

    /// Initialize every registered method. Idempotent; methods registered
    /// afterwards are initialized on registration.
    pub fn init(&mut self) -> Result<(), TrackingError> {
        self.adapter()?;
        for method in self.methods.iter_mut() {
            method.init();
        }
        if !self.initialized {
            info!(
                "Tracking session initialized with {} method(s)",
                self.methods.len()
            );
        }
        self.initialized = true;
        Ok(())
    }

    /// Start the method registered under `id`.
    pub fn start(&mut self, id: TrackingMethodId) -> Result<(), TrackingError> {
        self.adapter()?;
        let idx = self.index_of(id)?;
        let result = self.methods[idx].start();
        if matches!(result, Err(TrackingError::UnsupportedMethod { .. })) {
            self.stats.rejected_requests += 1;
        }
        result
    }

    /// Stop the method registered under `id`.
    pub fn stop(&mut self, id: TrackingMethodId) -> Result<(), TrackingError> {
        self.adapter()?;
        let idx = self.index_of(id)?;
        let result = self.methods[idx].stop(self.frame_count, &mut self.bus);
        if matches!(result, Err(TrackingError::UnsupportedMethod { .. })) {
            self.stats.rejected_requests += 1;
        }
        result
    }

    /// Process one frame: every enabled method, in registration order,
    /// reads its pose and publishes a sample.
    ///
    /// A method whose pose cannot be read is logged and skipped; the others
    /// still run. The returned report lists both outcomes.
    pub fn process_frame(&mut self) -> Result<FrameReport, TrackingError> {
        self.adapter()?;

        self.frame_count += 1;
        let frame_id = self.frame_count;
        let mut report = FrameReport::new(frame_id);

        for method in self.methods.iter_mut().filter(|m| m.is_enabled()) {
            match method.process_frame(frame_id, &mut self.bus) {
                Ok(Some(sample)) => report.samples.push(sample),
                Ok(None) => {}
                Err(error) => {
                    warn!(
                        "Frame {}: tracking method {} ({}) failed: {}",
                        frame_id,
                        method.id(),
                        method.name(),
                        error
                    );
                    report.failures.push(MethodFailure {
                        method: method.id(),
                        error,
                    });
                }
            }
        }

        self.stats.frames_processed += 1;
        self.stats.samples_delivered += report.samples.len() as u64;
        self.stats.frame_failures += report.failures.len() as u64;

        debug!(
            "Frame {}: {} sample(s), {} detected, {} failure(s)",
            frame_id,
            report.samples.len(),
            report.num_detected(),
            report.failures.len()
        );
        Ok(report)
    }

    /// Place a markerless anchor on the detected floor and restart the
    /// registered markerless method from it. The method is started first if
    /// needed. Returns the anchor pose.
    pub fn place_markerless_anchor(&mut self) -> Result<Pose, TrackingError> {
        let adapter = self.adapter()?.clone();
        let idx = self
            .methods
            .iter()
            .position(|m| m.kind() == MethodKind::Markerless)
            .ok_or(TrackingError::UnknownMethod {
                id: TrackingMethodId::MARKERLESS,
            })?;
        let id = self.methods[idx].id();

        let raw = adapter
            .floor_place_pose()
            .ok_or(TrackingError::PlacementUnavailable)?;
        let anchor = Pose::from_raw(raw.position, raw.orientation)
            .ok_or(TrackingError::PlacementUnavailable)?;

        self.start(id)?;
        if !adapter.start_markerless_at(id, &anchor) {
            warn!("Native tracker refused to start markerless tracking at the floor pose");
            return Err(TrackingError::PlacementUnavailable);
        }
        self.methods[idx].reanchor(anchor);

        info!(
            "Markerless anchor placed at [{:.3}, {:.3}, {:.3}]",
            anchor.position.x, anchor.position.y, anchor.position.z
        );
        Ok(anchor)
    }

    /// Register a pose listener. Listeners see samples in method
    /// registration order, then in subscription order.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&PoseSample) + 'static,
    {
        self.bus.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    /// Change a method's floor depth; it takes effect on the next start.
    /// Returns false if the method has no floor depth.
    pub fn set_floor_depth(
        &mut self,
        id: TrackingMethodId,
        depth: f64,
    ) -> Result<bool, TrackingError> {
        let idx = self.index_of(id)?;
        self.methods[idx].set_floor_depth(depth)
    }

    pub fn method(&self, id: TrackingMethodId) -> Option<&TrackingMethod> {
        self.methods.iter().find(|m| m.id() == id)
    }

    /// Registered methods, in registration order.
    pub fn methods(&self) -> &[TrackingMethod] {
        &self.methods
    }

    /// Ids of currently enabled methods, in registration order.
    pub fn enabled_methods(&self) -> Vec<TrackingMethodId> {
        self.methods
            .iter()
            .filter(|m| m.is_enabled())
            .map(|m| m.id())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Id of the last processed frame.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Stop every enabled method and drop all methods.
    ///
    /// Stop failures are logged; teardown always completes.
    pub fn teardown(&mut self) {
        if self.methods.is_empty() {
            return;
        }
        for method in self.methods.iter_mut().filter(|m| m.is_enabled()) {
            if let Err(e) = method.stop(self.frame_count, &mut self.bus) {
                warn!(
                    "Failed to stop tracking method {} during teardown: {}",
                    method.id(),
                    e
                );
            }
        }
        info!(
            "Tracking session torn down after {} frame(s)",
            self.stats.frames_processed
        );
        self.methods.clear();
    }
}

impl Drop for TrackingSession {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use nalgebra::{Quaternion, UnitQuaternion, Vector3};

    use super::*;
    use crate::adapter::{RawPose, SimulatedTracker};
    use crate::tracking::{DEFAULT_FLOOR_DEPTH, TrackingState};

    const MARKERLESS: TrackingMethodId = TrackingMethodId::MARKERLESS;
    const MARKER: TrackingMethodId = TrackingMethodId::MARKER;

    fn session_with(sim: &Arc<SimulatedTracker>) -> TrackingSession {
        let adapter: Arc<dyn NativeTrackerAdapter> = sim.clone();
        TrackingSession::new(adapter)
    }

    fn record(session: &mut TrackingSession) -> Rc<RefCell<Vec<PoseSample>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        session.subscribe(move |s| sink.borrow_mut().push(*s));
        seen
    }

    fn detected(x: f64) -> RawPose {
        RawPose::new(Vector3::new(x, 0.0, 0.0), Quaternion::identity(), true)
    }

    #[test]
    fn test_markerless_lifecycle_scenario() {
        let sim = Arc::new(SimulatedTracker::with_default_methods());
        let mut session = session_with(&sim);
        let seen = record(&mut session);

        session
            .register(TrackingMethod::markerless_with_floor_depth(200.0))
            .unwrap();
        session.init().unwrap();

        session.start(MARKERLESS).unwrap();
        assert_eq!(sim.floor_heights(), vec![200.0]);

        sim.push_orbit(MARKERLESS, 5, 1.5);
        for _ in 0..5 {
            session.process_frame().unwrap();
        }
        assert_eq!(seen.borrow().len(), 5);
        assert!(seen.borrow().iter().all(|s| s.is_detected));

        session.stop(MARKERLESS).unwrap();
        {
            let seen = seen.borrow();
            assert_eq!(seen.len(), 6);
            assert!(!seen[5].is_detected);
            assert_eq!(seen.iter().filter(|s| !s.is_detected).count(), 1);
        }

        assert!(session.set_floor_depth(MARKERLESS, 50.0).unwrap());
        session.start(MARKERLESS).unwrap();
        assert_eq!(sim.floor_heights(), vec![200.0, 50.0]);
    }

    #[test]
    fn test_unsupported_method_scenario() {
        let sim = Arc::new(SimulatedTracker::with_default_methods());
        let mut session = session_with(&sim);
        let seen = record(&mut session);
        let id = TrackingMethodId::new(99);

        session
            .register(TrackingMethod::marker().with_id(id))
            .unwrap();

        assert_eq!(
            session.start(id),
            Err(TrackingError::UnsupportedMethod { id })
        );
        assert!(!session.method(id).unwrap().is_enabled());

        for _ in 0..3 {
            let report = session.process_frame().unwrap();
            assert!(report.sample_for(id).is_none());
        }
        assert!(seen.borrow().is_empty());
        assert_eq!(session.stats().rejected_requests, 1);
    }

    #[test]
    fn test_start_is_idempotent() {
        let sim = Arc::new(SimulatedTracker::with_default_methods());
        let mut session = session_with(&sim);
        session.register(TrackingMethod::markerless()).unwrap();

        session.start(MARKERLESS).unwrap();
        session.start(MARKERLESS).unwrap();

        assert_eq!(sim.enable_calls(MARKERLESS), 1);
        assert_eq!(sim.floor_heights(), vec![DEFAULT_FLOOR_DEPTH]);
    }

    #[test]
    fn test_stop_never_started_is_noop() {
        let sim = Arc::new(SimulatedTracker::with_default_methods());
        let mut session = session_with(&sim);
        let seen = record(&mut session);
        session.register(TrackingMethod::markerless()).unwrap();

        session.stop(MARKERLESS).unwrap();

        assert!(!session.method(MARKERLESS).unwrap().is_enabled());
        assert_eq!(sim.disable_calls(MARKERLESS), 0);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let sim = Arc::new(SimulatedTracker::with_default_methods());
        let mut session = session_with(&sim);
        session.register(TrackingMethod::markerless()).unwrap();

        let err = session
            .register(TrackingMethod::markerless_with_floor_depth(10.0))
            .unwrap_err();

        assert_eq!(err, TrackingError::DuplicateId { id: MARKERLESS });
        assert_eq!(session.len(), 1);
        assert_eq!(
            session.method(MARKERLESS).unwrap().floor_depth(),
            Some(DEFAULT_FLOOR_DEPTH)
        );
    }

    #[test]
    fn test_unknown_method() {
        let sim = Arc::new(SimulatedTracker::with_default_methods());
        let mut session = session_with(&sim);
        let id = TrackingMethodId::new(5);

        assert_eq!(session.start(id), Err(TrackingError::UnknownMethod { id }));
        assert_eq!(session.stop(id), Err(TrackingError::UnknownMethod { id }));
        assert_eq!(
            session.set_floor_depth(id, 1.0),
            Err(TrackingError::UnknownMethod { id })
        );
    }

    #[test]
    fn test_empty_frame_delivers_nothing() {
        let sim = Arc::new(SimulatedTracker::with_default_methods());
        let mut session = session_with(&sim);
        let seen = record(&mut session);
        session.register(TrackingMethod::marker()).unwrap();

        let report = session.process_frame().unwrap();

        assert_eq!(report.frame_id, 1);
        assert!(report.samples.is_empty());
        assert!(report.failures.is_empty());
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_failure_in_one_method_does_not_block_others() {
        let sim = Arc::new(SimulatedTracker::with_default_methods());
        let mut session = session_with(&sim);
        let seen = record(&mut session);
        session.register(TrackingMethod::marker()).unwrap();
        session.register(TrackingMethod::markerless()).unwrap();
        session.start(MARKER).unwrap();
        session.start(MARKERLESS).unwrap();

        sim.push_pose(
            MARKER,
            RawPose::new(Vector3::new(f64::NAN, 0.0, 0.0), Quaternion::identity(), true),
        );
        sim.push_pose(MARKERLESS, detected(2.0));

        let report = session.process_frame().unwrap();

        assert_eq!(
            report.failures,
            vec![MethodFailure {
                method: MARKER,
                error: TrackingError::InvalidPose { id: MARKER },
            }]
        );
        assert_eq!(report.samples.len(), 1);
        assert_eq!(report.samples[0].method, MARKERLESS);
        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(session.stats().frame_failures, 1);
    }

    #[test]
    fn test_delivery_follows_registration_order() {
        let sim = Arc::new(SimulatedTracker::with_default_methods());
        let mut session = session_with(&sim);
        let seen = record(&mut session);
        session.register(TrackingMethod::markerless()).unwrap();
        session.register(TrackingMethod::marker()).unwrap();
        session.start(MARKER).unwrap();
        session.start(MARKERLESS).unwrap();
        sim.push_pose(MARKER, detected(1.0));
        sim.push_pose(MARKERLESS, detected(2.0));

        session.process_frame().unwrap();

        let order: Vec<_> = seen.borrow().iter().map(|s| s.method).collect();
        assert_eq!(order, vec![MARKERLESS, MARKER]);
        assert_eq!(session.enabled_methods(), vec![MARKERLESS, MARKER]);
    }

    #[test]
    fn test_frame_ids_increase() {
        let sim = Arc::new(SimulatedTracker::with_default_methods());
        let mut session = session_with(&sim);
        session.register(TrackingMethod::markerless()).unwrap();
        session.start(MARKERLESS).unwrap();
        sim.push_orbit(MARKERLESS, 3, 1.0);

        let ids: Vec<u64> = (0..3)
            .map(|_| session.process_frame().unwrap().frame_id)
            .collect();

        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(session.frame_count(), 3);
        assert_eq!(
            session.method(MARKERLESS).unwrap().state(),
            TrackingState::Tracking
        );
    }

    #[test]
    fn test_inert_session_fails_fast() {
        let mut session = TrackingSession::inert();

        assert_eq!(
            session.register(TrackingMethod::marker()),
            Err(TrackingError::AdapterUnavailable)
        );
        assert_eq!(session.init(), Err(TrackingError::AdapterUnavailable));
        assert_eq!(session.start(MARKER), Err(TrackingError::AdapterUnavailable));
        assert_eq!(session.stop(MARKER), Err(TrackingError::AdapterUnavailable));
        assert_eq!(
            session.process_frame(),
            Err(TrackingError::AdapterUnavailable)
        );
        assert_eq!(
            session.place_markerless_anchor(),
            Err(TrackingError::AdapterUnavailable)
        );
        assert!(session.is_empty());
    }

    #[test]
    fn test_engine_outage_yields_lost_samples() {
        let sim = Arc::new(SimulatedTracker::with_default_methods());
        let mut session = session_with(&sim);
        session.register(TrackingMethod::markerless()).unwrap();
        session.start(MARKERLESS).unwrap();
        sim.push_pose(MARKERLESS, detected(3.0));
        session.process_frame().unwrap();

        sim.set_available(false);
        let report = session.process_frame().unwrap();

        let sample = report.sample_for(MARKERLESS).unwrap();
        assert!(!sample.is_detected);
        assert_eq!(sample.position().x, 3.0);
        assert!(report.failures.is_empty());
    }

    #[test]
    fn test_place_markerless_anchor() {
        let sim = Arc::new(SimulatedTracker::with_default_methods());
        let mut session = session_with(&sim);
        session.register(TrackingMethod::markerless()).unwrap();
        session.start(MARKERLESS).unwrap();

        assert_eq!(
            session.place_markerless_anchor(),
            Err(TrackingError::PlacementUnavailable)
        );

        let floor = Pose::new(
            Vector3::new(0.0, -1.2, 2.0),
            UnitQuaternion::from_euler_angles(0.0, 0.3, 0.0),
        );
        sim.set_floor_place_pose(Some(RawPose::from_pose(&floor, true)));

        let anchor = session.place_markerless_anchor().unwrap();
        assert_eq!(sim.anchor(), Some(anchor));

        let report = session.process_frame().unwrap();
        let sample = report.sample_for(MARKERLESS).unwrap();
        assert!(sample.is_detected);
        assert!((sample.position() - floor.position).norm() < 1e-12);
    }

    #[test]
    fn test_teardown_stops_enabled_methods() {
        let sim = Arc::new(SimulatedTracker::with_default_methods());
        let seen;
        {
            let mut session = session_with(&sim);
            seen = record(&mut session);
            session.register(TrackingMethod::markerless()).unwrap();
            session.register(TrackingMethod::marker()).unwrap();
            session.start(MARKERLESS).unwrap();
        }

        assert!(!sim.is_enabled(MARKERLESS));
        assert_eq!(sim.disable_calls(MARKERLESS), 1);
        assert_eq!(sim.disable_calls(MARKER), 0);
        assert_eq!(seen.borrow().len(), 1);
        assert!(!seen.borrow()[0].is_detected);
    }

    #[test]
    fn test_from_config_registers_and_auto_starts() {
        let sim = Arc::new(SimulatedTracker::with_default_methods());
        let adapter: Arc<dyn NativeTrackerAdapter> = sim.clone();
        let config = SessionConfig::from_yaml_str(
            "methods:\n  - kind: markerless\n    floor_depth: 75.0\n  - kind: marker\nauto_start: [1]\n",
        )
        .unwrap();

        let session = TrackingSession::from_config(adapter, &config).unwrap();

        assert!(session.is_initialized());
        assert_eq!(session.len(), 2);
        assert_eq!(session.enabled_methods(), vec![MARKERLESS]);
        assert_eq!(sim.floor_heights(), vec![75.0]);
        assert!(session.methods().iter().all(|m| m.is_initialized()));
    }

    #[test]
    fn test_placement_starts_registered_markerless_method() {
        let sim = Arc::new(SimulatedTracker::with_default_methods());
        let mut session = session_with(&sim);
        let seen = record(&mut session);
        session.register(TrackingMethod::markerless()).unwrap();
        let floor = Pose::new(Vector3::new(0.5, -1.0, 2.0), UnitQuaternion::identity());
        sim.set_floor_place_pose(Some(RawPose::from_pose(&floor, true)));

        let anchor = session.place_markerless_anchor().unwrap();

        let method = session.method(MARKERLESS).unwrap();
        assert!(method.is_enabled());
        assert_eq!(method.state(), TrackingState::Started);
        assert_eq!(method.active_floor_depth(), Some(DEFAULT_FLOOR_DEPTH));
        assert_eq!(sim.floor_heights(), vec![DEFAULT_FLOOR_DEPTH]);
        assert_eq!(sim.anchor(), Some(anchor));

        let report = session.process_frame().unwrap();
        assert!(report.sample_for(MARKERLESS).unwrap().is_detected);

        session.stop(MARKERLESS).unwrap();
        assert!(!sim.is_enabled(MARKERLESS));
        assert_eq!(session.enabled_methods(), Vec::new());
        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert!(!seen[1].is_detected);
    }

    #[test]
    fn test_placement_requires_markerless_method() {
        let sim = Arc::new(SimulatedTracker::with_default_methods());
        let mut session = session_with(&sim);
        session.register(TrackingMethod::marker()).unwrap();
        sim.set_floor_place_pose(Some(RawPose::from_pose(&Pose::identity(), true)));

        assert_eq!(
            session.place_markerless_anchor(),
            Err(TrackingError::UnknownMethod { id: MARKERLESS })
        );
        assert!(sim.anchor().is_none());
    }

    #[test]
    fn test_placement_without_floor_leaves_method_stopped() {
        let sim = Arc::new(SimulatedTracker::with_default_methods());
        let mut session = session_with(&sim);
        session.register(TrackingMethod::markerless()).unwrap();

        assert_eq!(
            session.place_markerless_anchor(),
            Err(TrackingError::PlacementUnavailable)
        );
        assert!(!session.method(MARKERLESS).unwrap().is_enabled());
        assert_eq!(sim.enable_calls(MARKERLESS), 0);
    }

    #[test]
    fn test_rejected_stop_keeps_method_enabled() {
        let sim = Arc::new(SimulatedTracker::with_default_methods());
        let mut session = session_with(&sim);
        let seen = record(&mut session);
        session.register(TrackingMethod::markerless()).unwrap();
        session.start(MARKERLESS).unwrap();
        sim.push_pose(MARKERLESS, detected(1.0));
        session.process_frame().unwrap();

        sim.set_available(false);
        assert_eq!(
            session.stop(MARKERLESS),
            Err(TrackingError::UnsupportedMethod { id: MARKERLESS })
        );

        let method = session.method(MARKERLESS).unwrap();
        assert!(method.is_enabled());
        assert_eq!(method.active_floor_depth(), Some(DEFAULT_FLOOR_DEPTH));
        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(session.stats().rejected_requests, 1);

        // Teardown logs the failed stop and still drops every method.
        session.teardown();
        assert!(session.is_empty());
        assert_eq!(sim.disable_calls(MARKERLESS), 2);
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn test_overflowing_orientation_is_isolated() {
        let sim = Arc::new(SimulatedTracker::with_default_methods());
        let mut session = session_with(&sim);
        let seen = record(&mut session);
        session.register(TrackingMethod::marker()).unwrap();
        session.start(MARKER).unwrap();
        sim.push_pose(
            MARKER,
            RawPose::new(Vector3::zeros(), Quaternion::new(1e200, 0.0, 0.0, 0.0), true),
        );

        let report = session.process_frame().unwrap();

        assert!(report.samples.is_empty());
        assert_eq!(
            report.failures,
            vec![MethodFailure {
                method: MARKER,
                error: TrackingError::InvalidPose { id: MARKER },
            }]
        );
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_non_finite_floor_depth_rejected() {
        let sim = Arc::new(SimulatedTracker::with_default_methods());
        let mut session = session_with(&sim);
        session.register(TrackingMethod::markerless()).unwrap();
        session.register(TrackingMethod::marker()).unwrap();

        assert!(matches!(
            session.set_floor_depth(MARKERLESS, f64::NAN),
            Err(TrackingError::InvalidFloorDepth { id: MARKERLESS, .. })
        ));
        assert_eq!(session.set_floor_depth(MARKER, 10.0), Ok(false));

        session.start(MARKERLESS).unwrap();
        assert_eq!(sim.floor_heights(), vec![DEFAULT_FLOOR_DEPTH]);
    }
}
