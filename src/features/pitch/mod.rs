//! Monophonic pitch estimation
//!
//! Estimate the fundamental frequency of a single frame using the YIN
//! difference-function method. Stateless; one call per frame.

pub mod yin;

pub use yin::estimate;
