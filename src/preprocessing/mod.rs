//! Audio preprocessing modules
//!
//! Frame-level signal conditioning ahead of pitch estimation:
//! - RMS energy computation and silence gating

pub mod gate;
