//! Note detection modules
//!
//! Turn per-frame pitch estimates into discrete notes:
//! - Frequency-to-note mapping with cents deviation
//! - Stability-filtered note tracking with duration accounting

pub mod mapper;
pub mod tracker;

pub use mapper::map_frequency;
pub use tracker::{FrameEvents, NoteTracker};
