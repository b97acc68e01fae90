//! Geometry types shared by the tracker boundary and the session.

pub mod pose;

pub use pose::Pose;
