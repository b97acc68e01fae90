//! YAML session configuration.
//!
//! ```yaml
//! methods:
//!   - kind: markerless
//!     floor_depth: 150.0
//!   - kind: marker
//! auto_start: [1]
//! ```

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::tracking::{MethodKind, TrackingMethod, TrackingMethodId};

/// Declaration of one tracking method.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MethodConfig {
    pub kind: MethodKind,

    /// Engine id; defaults to the kind's standard id.
    #[serde(default)]
    pub id: Option<u32>,

    /// Floor depth for markerless methods; defaults to 200.
    #[serde(default)]
    pub floor_depth: Option<f64>,
}

impl MethodConfig {
    pub fn id(&self) -> TrackingMethodId {
        self.id
            .map(TrackingMethodId::new)
            .unwrap_or_else(|| self.kind.default_id())
    }

    /// Build an unattached tracking method from this declaration.
    pub fn build(&self) -> TrackingMethod {
        let method = match self.kind {
            MethodKind::Marker => TrackingMethod::marker(),
            MethodKind::Markerless => match self.floor_depth {
                Some(depth) => TrackingMethod::markerless_with_floor_depth(depth),
                None => TrackingMethod::markerless(),
            },
        };
        method.with_id(self.id())
    }
}

/// Methods to register, and which of them to start right away.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub methods: Vec<MethodConfig>,
    pub auto_start: Vec<u32>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            methods: vec![MethodConfig {
                kind: MethodKind::Markerless,
                id: None,
                floor_depth: None,
            }],
            auto_start: Vec::new(),
        }
    }
}

impl SessionConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self =
            serde_yaml::from_str(yaml).context("Failed to parse session config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let config: Self = serde_yaml::from_reader(
            File::open(path).with_context(|| format!("Failed to open {:?}", path))?,
        )
        .with_context(|| format!("Failed to parse {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    /// Ids to start after registration.
    pub fn auto_start_ids(&self) -> impl Iterator<Item = TrackingMethodId> + '_ {
        self.auto_start.iter().copied().map(TrackingMethodId::new)
    }

    /// Reject declarations that could never work. Duplicate ids are left to
    /// the session, which reports them as registration errors.
    pub fn validate(&self) -> Result<()> {
        for method in &self.methods {
            match (method.kind, method.floor_depth) {
                (MethodKind::Marker, Some(_)) => {
                    bail!("method {}: floor_depth only applies to markerless", method.id())
                }
                (MethodKind::Markerless, Some(depth)) if !depth.is_finite() => {
                    bail!("method {}: floor_depth must be finite", method.id())
                }
                _ => {}
            }
        }
        for id in self.auto_start_ids() {
            if !self.methods.iter().any(|m| m.id() == id) {
                bail!("auto_start references undeclared method {}", id);
            }
        }
        Ok(())
    }
}
