pub mod adapter;
pub mod error;
pub mod geometry;
pub mod io;
pub mod system;
pub mod tracking;

pub use error::TrackingError;
