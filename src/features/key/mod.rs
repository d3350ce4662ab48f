//! Key inference modules
//!
//! Infer the most probable musical key from a session's note list:
//! - Scale interval templates (major, minor, and reference modes)
//! - Duration-weighted scale-fit scoring over 24 tonic/mode hypotheses
//! - Relative-key ambiguity detection

pub mod scales;
pub mod scorer;

pub use scales::{scale_notes, ScaleKind};
pub use scorer::analyze_key;
