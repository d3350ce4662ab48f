//! Frame energy gate
//!
//! Classifies each incoming frame as signal or silence by RMS energy.
//! Silent frames skip pitch estimation entirely and drive note
//! finalization in the tracker, so the gate sits in front of everything
//! else on the audio path.

/// Compute the RMS energy of a frame.
///
/// RMS is the square root of the mean of squared sample values. Non-finite
/// samples (NaN, infinities from a misbehaving capture layer) contribute
/// zero energy, so pathological buffers degrade toward silence instead of
/// poisoning downstream math.
///
/// Returns 0.0 for an empty frame.
///
/// # Example
///
/// ```
/// use cantus_dsp::preprocessing::gate::rms;
///
/// assert_eq!(rms(&[]), 0.0);
/// assert!((rms(&[0.5, -0.5, 0.5, -0.5]) - 0.5).abs() < 1e-6);
/// ```
pub fn rms(frame: &[f32]) -> f32 {
    if frame.is_empty() {
        return 0.0;
    }

    let mut sum_sq = 0.0f64;
    for &s in frame {
        if s.is_finite() {
            sum_sq += (s as f64) * (s as f64);
        }
    }

    (sum_sq / frame.len() as f64).sqrt() as f32
}

/// Classify an RMS value against the silence threshold.
///
/// Strict comparison: a frame exactly at the threshold counts as signal.
/// A non-finite RMS (cannot happen via [`rms`], but callers may feed
/// their own measurements) is silence.
pub fn is_silence(rms_value: f32, threshold: f32) -> bool {
    !rms_value.is_finite() || rms_value < threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rms_empty_frame() {
        assert_eq!(rms(&[]), 0.0);
    }

    #[test]
    fn test_rms_constant_signal() {
        let frame = vec![0.25f32; 512];
        assert!((rms(&frame) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_rms_sine_amplitude() {
        // RMS of a full-cycle sine of amplitude A is A / sqrt(2)
        let frame: Vec<f32> = (0..1000)
            .map(|i| (i as f32 / 1000.0 * 2.0 * std::f32::consts::PI).sin() * 0.8)
            .collect();
        let expected = 0.8 / 2.0f32.sqrt();
        assert!((rms(&frame) - expected).abs() < 1e-3);
    }

    #[test]
    fn test_rms_nan_samples_count_as_zero() {
        let frame = [f32::NAN, f32::NAN, f32::NAN, f32::NAN];
        assert_eq!(rms(&frame), 0.0);

        // Half NaN: energy only from the finite half
        let frame = [0.5, f32::NAN, 0.5, f32::NAN];
        let expected = (0.5f32 * 0.5 * 2.0 / 4.0).sqrt();
        assert!((rms(&frame) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_is_silence_threshold() {
        assert!(is_silence(0.001, 0.015));
        assert!(!is_silence(0.015, 0.015)); // at threshold = signal
        assert!(!is_silence(0.5, 0.015));
        assert!(is_silence(f32::NAN, 0.015));
    }
}
