//! YIN fundamental frequency estimator
//!
//! Time-domain pitch estimation for monophonic sources.
//!
//! Algorithm:
//! 1. Difference function over the lag range derived from the plausible
//!    frequency band
//! 2. Cumulative mean normalized difference (CMND)
//! 3. Absolute threshold: first CMND dip below the threshold, walked
//!    forward to its valley minimum
//! 4. Global-minimum fallback with a quality gate when no dip qualifies
//! 5. Parabolic interpolation around the chosen lag for sub-sample accuracy
//!
//! # Reference
//!
//! de Cheveigné, A., & Kawahara, H. (2002). YIN, a fundamental frequency
//! estimator for speech and music. *Journal of the Acoustical Society of
//! America*, 111(4), 1917-1930.

/// CMND values above this are rejected as unpitched when the absolute
/// threshold found no dip
const FALLBACK_QUALITY_LIMIT: f32 = 0.5;

/// Estimate the fundamental frequency of one frame.
///
/// # Arguments
///
/// * `frame` - Time-domain samples (mono, nominally in [-1.0, 1.0])
/// * `sample_rate` - Sample rate in Hz
/// * `min_frequency_hz` - Low edge of the plausible band (default 80 Hz)
/// * `max_frequency_hz` - High edge of the plausible band (default 1100 Hz)
/// * `threshold` - CMND absolute threshold (default 0.12); lower values
///   increase sensitivity at the cost of octave-error risk
///
/// # Returns
///
/// Estimated frequency in Hz, or `None` when the frame carries no
/// discernible periodic pitch inside the plausible band. Frames that are
/// too short for the band's longest period, frames containing non-finite
/// samples, and estimates that interpolate outside the band all return
/// `None`; this function never errors.
///
/// Deterministic: identical inputs produce identical output.
pub fn estimate(
    frame: &[f32],
    sample_rate: f32,
    min_frequency_hz: f32,
    max_frequency_hz: f32,
    threshold: f32,
) -> Option<f32> {
    if frame.len() < 2 || sample_rate <= 0.0 {
        return None;
    }
    if min_frequency_hz <= 0.0 || max_frequency_hz <= min_frequency_hz {
        return None;
    }
    if frame.iter().any(|s| !s.is_finite()) {
        return None;
    }

    let min_lag = (sample_rate / max_frequency_hz).ceil() as usize;
    let min_lag = min_lag.max(1);
    let half_len = frame.len() / 2;
    let max_lag = ((sample_rate / min_frequency_hz).floor() as usize).min(half_len);

    if min_lag >= max_lag || max_lag < 2 {
        return None;
    }

    // Difference function over a half-frame correlation window
    let mut diff = vec![0.0f32; max_lag + 1];
    for (tau, d) in diff.iter_mut().enumerate().skip(1) {
        let mut sum = 0.0f32;
        for j in 0..half_len {
            let delta = frame[j] - frame[j + tau];
            sum += delta * delta;
        }
        *d = sum;
    }

    // Cumulative mean normalized difference
    let mut cmnd = vec![1.0f32; max_lag + 1];
    let mut running_sum = 0.0f32;
    for tau in 1..=max_lag {
        running_sum += diff[tau];
        if running_sum > 0.0 {
            cmnd[tau] = diff[tau] * tau as f32 / running_sum;
        }
    }

    // Absolute threshold: first dip below threshold, walked to its valley
    let mut best_tau = 0usize;
    for tau in min_lag..=max_lag {
        if cmnd[tau] < threshold {
            let mut t = tau;
            while t + 1 <= max_lag && cmnd[t + 1] < cmnd[t] {
                t += 1;
            }
            best_tau = t;
            break;
        }
    }

    // No qualifying dip: fall back to the global minimum, rejected if weak
    if best_tau == 0 {
        let mut min_val = f32::MAX;
        for tau in min_lag..=max_lag {
            if cmnd[tau] < min_val {
                min_val = cmnd[tau];
                best_tau = tau;
            }
        }
        if min_val > FALLBACK_QUALITY_LIMIT {
            return None;
        }
    }

    // Parabolic interpolation for sub-sample lag accuracy
    let tau_refined = if best_tau > 0 && best_tau < max_lag {
        let alpha = cmnd[best_tau - 1];
        let beta = cmnd[best_tau];
        let gamma = cmnd[best_tau + 1];
        let denom = 2.0 * (2.0 * beta - alpha - gamma);
        if denom.abs() > 1e-10 {
            best_tau as f32 + (alpha - gamma) / denom
        } else {
            best_tau as f32
        }
    } else {
        best_tau as f32
    };

    if tau_refined <= 0.0 {
        return None;
    }

    let frequency = sample_rate / tau_refined;
    if frequency < min_frequency_hz || frequency > max_frequency_hz {
        return None;
    }

    log::trace!("YIN: lag {} -> {:.2} Hz", best_tau, frequency);
    Some(frequency)
}
