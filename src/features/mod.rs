//! Feature extraction modules
//!
//! Core algorithms for the detection pipeline:
//! - Pitch estimation (YIN)
//! - Note mapping and stability tracking
//! - Key inference

pub mod key;
pub mod note;
pub mod pitch;
