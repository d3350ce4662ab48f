//! # Cantus DSP
//!
//! A real-time vocal analysis engine for note tracking and musical key
//! inference, built for live monophonic sources (a single singing voice).
//!
//! ## Features
//!
//! - **Note Tracking**: YIN pitch estimation with RMS gating, a
//!   stability-filtered note state machine, and exact duration accounting
//! - **Key Inference**: duration-weighted scale-fit scoring across 24
//!   tonic/mode hypotheses with relative-key ambiguity detection
//! - **Tuning Readout**: nearest equal-tempered note with cents deviation
//!   against a configurable tuning standard
//!
//! ## Quick Start
//!
//! Streaming use feeds frames into a [`NoteTracker`]; batch use hands a
//! whole buffer to [`analyze_samples`]:
//!
//! ```no_run
//! use cantus_dsp::{analyze_samples, DetectorConfig};
//!
//! // Mono samples, normalized to [-1.0, 1.0]
//! let samples: Vec<f32> = vec![]; // Your audio data
//! let result = analyze_samples(&samples, 44100, DetectorConfig::default())?;
//!
//! for note in &result.notes {
//!     println!("{} {:.0} ms ({:+} cents)", note.name(), note.duration_ms, note.cents_offset);
//! }
//! if let Some(key) = &result.key {
//!     println!("Key: {} (fit: {:.2})", key.primary.hypothesis.name(), key.primary.confidence);
//! }
//! # Ok::<(), cantus_dsp::AnalysisError>(())
//! ```
//!
//! ## Architecture
//!
//! The streaming pipeline runs once per audio frame:
//!
//! ```text
//! Frame -> RMS Gate -> YIN Estimator -> Note Mapper -> Stability Tracker -> Note events
//! ```
//!
//! The key scorer runs once per session over the accumulated note list.
//! The core never blocks, performs no I/O, and has no fatal error
//! conditions: pathological input degrades to "no pitch" / "no key".

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod features;
pub mod preprocessing;

// Re-export main types
pub use analysis::result::{
    DetectedNote, KeyAnalysisResult, KeyCandidate, KeyHypothesis, Mode, NoteObservation,
    PitchClass, SessionAnalysis, SessionMetadata,
};
pub use config::DetectorConfig;
pub use error::AnalysisError;
pub use features::key::analyze_key;
pub use features::note::{FrameEvents, NoteTracker};

/// Analyze a complete sample buffer in one call.
///
/// Offline mirror of the streaming path: chunks the buffer into
/// `config.frame_size` frames, drives a [`NoteTracker`] over them, flushes,
/// and runs [`analyze_key`] on the collected notes. A trailing partial
/// frame is dropped (it cannot carry a full pitch-estimation lag range).
///
/// # Arguments
///
/// * `samples` - Mono audio samples, normalized to [-1.0, 1.0]
/// * `sample_rate` - Sample rate in Hz (typically 44100 or 48000)
/// * `config` - Detector configuration parameters
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` for an empty buffer or a zero
/// sample rate. All other conditions are defined outcomes: an all-silent
/// buffer yields no notes and `key: None`.
///
/// # Example
///
/// ```no_run
/// use cantus_dsp::{analyze_samples, DetectorConfig};
///
/// let samples = vec![0.0f32; 44100 * 10]; // 10 seconds of silence
/// let result = analyze_samples(&samples, 44100, DetectorConfig::default())?;
/// assert!(result.notes.is_empty());
/// # Ok::<(), cantus_dsp::AnalysisError>(())
/// ```
pub fn analyze_samples(
    samples: &[f32],
    sample_rate: u32,
    config: DetectorConfig,
) -> Result<SessionAnalysis, AnalysisError> {
    use std::time::Instant;
    let start_time = Instant::now();

    log::debug!(
        "Starting session analysis: {} samples at {} Hz",
        samples.len(),
        sample_rate
    );

    if samples.is_empty() {
        return Err(AnalysisError::InvalidInput("Empty audio samples".to_string()));
    }

    if sample_rate == 0 {
        return Err(AnalysisError::InvalidInput("Invalid sample rate".to_string()));
    }

    if config.frame_size == 0 {
        return Err(AnalysisError::InvalidInput("Frame size must be > 0".to_string()));
    }

    let frame_size = config.frame_size;
    let mut tracker = NoteTracker::new(sample_rate, config);
    let mut notes = Vec::new();
    let mut frames_processed = 0usize;

    for frame in samples.chunks_exact(frame_size) {
        let events = tracker.process_frame(frame);
        if let Some(note) = events.completed {
            notes.push(note);
        }
        frames_processed += 1;
    }

    if let Some(note) = tracker.flush() {
        notes.push(note);
    }

    let key = analyze_key(&notes);
    let processing_time_ms = start_time.elapsed().as_secs_f32() * 1000.0;

    log::debug!(
        "Session analysis done: {} notes, key {:?} ({:.2} ms)",
        notes.len(),
        key.as_ref().map(|k| k.primary.hypothesis.name()),
        processing_time_ms
    );

    Ok(SessionAnalysis {
        notes,
        key,
        metadata: SessionMetadata {
            duration_seconds: samples.len() as f32 / sample_rate as f32,
            sample_rate,
            frames_processed,
            processing_time_ms,
        },
    })
}
