//! Error types for the note tracking and key analysis engine

use std::fmt;

/// Errors that can occur during batch analysis
///
/// The streaming core itself never errors: anomalous frames degrade to
/// silence and `analyze_key` reports insufficient data as `None`. Only the
/// batch entry point rejects malformed arguments.
#[derive(Debug, Clone)]
pub enum AnalysisError {
    /// Invalid input parameters
    InvalidInput(String),

    /// Processing error during analysis
    ProcessingError(String),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            AnalysisError::ProcessingError(msg) => write!(f, "Processing error: {}", msg),
        }
    }
}

impl std::error::Error for AnalysisError {}
