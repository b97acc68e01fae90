//! File inputs: session configuration and recorded pose scripts.

pub mod config;
pub mod pose_script;

pub use config::{MethodConfig, SessionConfig};
pub use pose_script::{PoseScript, PoseScriptEntry};
