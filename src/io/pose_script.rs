//! CSV pose scripts for replaying recorded tracking runs.
//!
//! One row per pose report, `#` lines are comments:
//!
//! ```text
//! # method, px, py, pz, qw, qx, qy, qz, detected
//! 1, 0.0, -1.2, 2.0, 1.0, 0.0, 0.0, 0.0, 1
//! ```
//!
//! Rows for the same method are replayed in file order, one per frame.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use csv::{Reader, ReaderBuilder};
use nalgebra::{Quaternion, Vector3};

use crate::adapter::{RawPose, SimulatedTracker};
use crate::tracking::TrackingMethodId;

#[derive(Debug, Clone, PartialEq)]
pub struct PoseScriptEntry {
    pub method: TrackingMethodId,
    pub pose: RawPose,
}

/// A loaded pose script.
#[derive(Debug, Clone, Default)]
pub struct PoseScript {
    pub entries: Vec<PoseScriptEntry>,
}

impl PoseScript {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let rdr = script_reader()
            .from_path(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        Self::from_csv(rdr).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_csv(script_reader().from_reader(reader))
    }

    fn from_csv<R: Read>(mut rdr: Reader<R>) -> Result<Self> {
        let mut entries = Vec::new();
        for (line, rec) in rdr.records().enumerate() {
            let rec = rec?;
            if rec.len() < 9 {
                bail!("row {}: expected 9 columns, found {}", line + 1, rec.len());
            }
            let method = TrackingMethodId::new(rec[0].trim().parse()?);
            let position = Vector3::new(
                rec[1].trim().parse()?,
                rec[2].trim().parse()?,
                rec[3].trim().parse()?,
            );
            // w-first quaternion
            let orientation = Quaternion::new(
                rec[4].trim().parse()?,
                rec[5].trim().parse()?,
                rec[6].trim().parse()?,
                rec[7].trim().parse()?,
            );
            let is_detected = match rec[8].trim() {
                "1" | "true" => true,
                "0" | "false" => false,
                other => bail!("row {}: invalid detected flag {:?}", line + 1, other),
            };
            entries.push(PoseScriptEntry {
                method,
                pose: RawPose::new(position, orientation, is_detected),
            });
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of rows scripted for one method.
    pub fn frames_for(&self, method: TrackingMethodId) -> usize {
        self.entries.iter().filter(|e| e.method == method).count()
    }

    /// Queue every row on the simulated tracker.
    pub fn load_into(&self, tracker: &SimulatedTracker) {
        for entry in &self.entries {
            tracker.push_pose(entry.method, entry.pose);
        }
    }
}

fn script_reader() -> ReaderBuilder {
    let mut builder = ReaderBuilder::new();
    builder.has_headers(false).comment(Some(b'#')).trim(csv::Trim::All);
    builder
}
