//! Configuration parameters for note tracking and key analysis

/// Detector configuration parameters
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    // Frame gate
    /// RMS silence threshold (default: 0.015)
    /// Frames with RMS below this value are treated as silent; tunable per
    /// deployment because microphone gain varies (useful range 0.01-0.02)
    pub silence_rms_threshold: f32,

    // Pitch estimation
    /// Minimum plausible fundamental frequency in Hz (default: 80.0)
    pub min_frequency_hz: f32,

    /// Maximum plausible fundamental frequency in Hz (default: 1100.0)
    /// The default band covers a single human voice
    pub max_frequency_hz: f32,

    /// YIN absolute threshold (default: 0.12, useful range 0.1-0.15)
    /// Lower values increase sensitivity but raise octave-error risk
    pub yin_threshold: f32,

    // Note stability
    /// Consecutive same-note frames required to confirm a note (default: 3)
    pub stability_frames: u32,

    /// Minimum duration in milliseconds for a finalized note (default: 80.0)
    /// Confirmed notes shorter than this are discarded at finalization
    pub min_note_duration_ms: f64,

    // Tuning reference
    /// Reference tuning frequency in Hz (default: 440.0, A4)
    pub reference_frequency_hz: f64,

    /// MIDI note number of the reference pitch (default: 69, A4)
    pub reference_midi_number: i32,

    // Batch path
    /// Frame length in samples for [`crate::analyze_samples`] (default: 2048)
    /// At 44.1 kHz a 2048-sample frame spans ~46 ms, enough for two full
    /// periods at the 80 Hz band edge
    pub frame_size: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            silence_rms_threshold: 0.015,
            min_frequency_hz: 80.0,
            max_frequency_hz: 1100.0,
            yin_threshold: 0.12,
            stability_frames: 3,
            min_note_duration_ms: 80.0,
            reference_frequency_hz: 440.0,
            reference_midi_number: 69,
            frame_size: 2048,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_consistent() {
        let config = DetectorConfig::default();
        assert!(config.min_frequency_hz < config.max_frequency_hz);
        assert!(config.silence_rms_threshold > 0.0);
        assert!(config.stability_frames >= 1);
        assert!(config.min_note_duration_ms > 0.0);
        assert!(config.frame_size > 0);
    }
}
