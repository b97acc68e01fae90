use std::sync::Arc;

use anyhow::{Context, Result};
use nalgebra::{Quaternion, Vector3};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use rust_artrack::adapter::{NativeTrackerAdapter, RawPose, SimulatedTracker};
use rust_artrack::io::{PoseScript, SessionConfig};
use rust_artrack::system::TrackingSession;
use rust_artrack::tracking::TrackingMethodId;

/// Frames to run when no pose script is given.
const DEFAULT_FRAMES: usize = 120;

/// Radius of the simulated orbit, in world units.
const ORBIT_RADIUS: f64 = 1.5;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Usage: rust-artrack [session.yaml] [poses.csv]
    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => SessionConfig::from_yaml_file(&path)?,
        None => SessionConfig::default(),
    };
    let script = args.next().map(PoseScript::from_path).transpose()?;

    let sim = Arc::new(SimulatedTracker::with_default_methods());
    let n_frames = match &script {
        Some(script) => {
            info!("Loaded pose script with {} rows", script.len());
            script.load_into(&sim);
            config
                .methods
                .iter()
                .map(|m| script.frames_for(m.id()))
                .max()
                .unwrap_or(0)
        }
        None => {
            for method in &config.methods {
                sim.push_orbit(method.id(), DEFAULT_FRAMES, ORBIT_RADIUS);
            }
            DEFAULT_FRAMES
        }
    };

    let adapter: Arc<dyn NativeTrackerAdapter> = sim.clone();
    let mut session = TrackingSession::from_config(adapter, &config)
        .context("Failed to configure tracking session")?;

    session.subscribe(|sample| {
        let p = sample.position();
        info!(
            "frame {:>4} method {} detected={} pos=[{:.3}, {:.3}, {:.3}] heading={:.1}deg",
            sample.frame_id,
            sample.method,
            sample.is_detected,
            p.x,
            p.y,
            p.z,
            sample.orientation().euler_angles().1.to_degrees()
        );
    });

    // Start whatever the config did not auto-start.
    for method in &config.methods {
        if !session.enabled_methods().contains(&method.id()) {
            session.start(method.id())?;
        }
    }

    // Anchor markerless tracking on the floor halfway through the run.
    sim.set_floor_place_pose(Some(RawPose::new(
        Vector3::new(0.0, -1.0, 2.0),
        Quaternion::identity(),
        true,
    )));

    for i in 0..n_frames {
        if i == n_frames / 2 && session.method(TrackingMethodId::MARKERLESS).is_some() {
            match session.place_markerless_anchor() {
                Ok(anchor) => info!("Anchor placed at {:?}", anchor.position.as_slice()),
                Err(e) => warn!("Anchor placement failed: {}", e),
            }
        }
        session.process_frame()?;
    }

    let ids = session.enabled_methods();
    for id in ids {
        session.stop(id)?;
    }

    let stats = session.stats();
    println!(
        "Done! Processed {} frames, delivered {} samples ({} failures, {} rejected requests)",
        stats.frames_processed,
        stats.samples_delivered,
        stats.frame_failures,
        stats.rejected_requests
    );

    Ok(())
}
