//! Frequency-to-note mapping
//!
//! Converts a frequency in Hz to the nearest equal-tempered note identity
//! (pitch class + octave) and the deviation from that note in cents,
//! referenced to a configurable tuning standard.
//!
//! The formula defines note identity and is reproduced exactly:
//!
//! ```text
//! midi   = 12 * log2(freq / reference_hz) + reference_midi
//! note   = round(midi)
//! cents  = round((midi - note) * 100)
//! class  = note mod 12        (euclidean, non-negative below the reference)
//! octave = floor(note / 12) - 1
//! ```

use crate::analysis::result::{NoteObservation, PitchClass};

/// Map a frequency to the nearest equal-tempered note.
///
/// # Arguments
///
/// * `frequency_hz` - The frequency to map
/// * `reference_hz` - Tuning reference frequency (default 440.0)
/// * `reference_midi` - MIDI number of the reference pitch (default 69, A4)
///
/// # Returns
///
/// The mapped observation, or `None` for a non-finite or non-positive
/// frequency (or reference).
///
/// # Example
///
/// ```
/// use cantus_dsp::features::note::mapper::map_frequency;
/// use cantus_dsp::PitchClass;
///
/// let obs = map_frequency(440.0, 440.0, 69).unwrap();
/// assert_eq!(obs.pitch_class, PitchClass::A);
/// assert_eq!(obs.octave, 4);
/// assert_eq!(obs.cents_offset, 0);
/// ```
pub fn map_frequency(frequency_hz: f32, reference_hz: f64, reference_midi: i32) -> Option<NoteObservation> {
    if !frequency_hz.is_finite() || frequency_hz <= 0.0 {
        return None;
    }
    if !reference_hz.is_finite() || reference_hz <= 0.0 {
        return None;
    }

    let midi = 12.0 * (frequency_hz as f64 / reference_hz).log2() + reference_midi as f64;
    let rounded = midi.round();
    let cents_offset = ((midi - rounded) * 100.0).round() as i32;

    let rounded = rounded as i64;
    let pitch_class = PitchClass::from_index(rounded.rem_euclid(12) as u32);
    let octave = (rounded.div_euclid(12) - 1) as i32;

    Some(NoteObservation {
        pitch_class,
        octave,
        frequency_hz,
        cents_offset,
    })
}
