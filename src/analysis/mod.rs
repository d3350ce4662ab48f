//! Analysis result types and aggregation
//!
//! Public data model for the detection pipeline:
//! - Pitch classes, note observations, finalized notes
//! - Key hypotheses and key analysis results
//! - Session-level output and metadata

pub mod result;
