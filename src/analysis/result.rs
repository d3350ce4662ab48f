//! Analysis result types

use serde::{Deserialize, Serialize};

/// One of the 12 equal-tempered pitch classes, in canonical sharp notation.
///
/// Flats normalize to their enharmonic sharp equivalent (`Db` -> `C#`).
/// The set is cyclic under semitone addition modulo 12.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PitchClass {
    /// C
    C,
    /// C# / Db
    Cs,
    /// D
    D,
    /// D# / Eb
    Ds,
    /// E
    E,
    /// F
    F,
    /// F# / Gb
    Fs,
    /// G
    G,
    /// G# / Ab
    Gs,
    /// A
    A,
    /// A# / Bb
    As,
    /// B
    B,
}

const PITCH_CLASSES: [PitchClass; 12] = [
    PitchClass::C,
    PitchClass::Cs,
    PitchClass::D,
    PitchClass::Ds,
    PitchClass::E,
    PitchClass::F,
    PitchClass::Fs,
    PitchClass::G,
    PitchClass::Gs,
    PitchClass::A,
    PitchClass::As,
    PitchClass::B,
];

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

impl PitchClass {
    /// Semitone index within the octave (C = 0, B = 11).
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Pitch class for a semitone index; wraps modulo 12.
    ///
    /// # Example
    ///
    /// ```
    /// use cantus_dsp::PitchClass;
    ///
    /// assert_eq!(PitchClass::from_index(0), PitchClass::C);
    /// assert_eq!(PitchClass::from_index(13), PitchClass::Cs);
    /// ```
    pub fn from_index(index: u32) -> Self {
        PITCH_CLASSES[(index % 12) as usize]
    }

    /// Transpose by a signed number of semitones, wrapping cyclically.
    ///
    /// # Example
    ///
    /// ```
    /// use cantus_dsp::PitchClass;
    ///
    /// assert_eq!(PitchClass::C.transpose(7), PitchClass::G);
    /// assert_eq!(PitchClass::C.transpose(-3), PitchClass::A);
    /// ```
    pub fn transpose(self, semitones: i32) -> Self {
        let idx = (self.index() as i32 + semitones).rem_euclid(12);
        PITCH_CLASSES[idx as usize]
    }

    /// Note name in sharp notation (e.g., "C", "F#").
    pub fn name(self) -> &'static str {
        NOTE_NAMES[self.index() as usize]
    }

    /// Parse a note name; flats normalize to the equivalent sharp class.
    ///
    /// Accepts sharp names ("C#"), flat names ("Db"), and plain letters,
    /// case-insensitively. Returns `None` for anything else.
    ///
    /// # Example
    ///
    /// ```
    /// use cantus_dsp::PitchClass;
    ///
    /// assert_eq!(PitchClass::from_name("Db"), Some(PitchClass::Cs));
    /// assert_eq!(PitchClass::from_name("bb"), Some(PitchClass::As));
    /// assert_eq!(PitchClass::from_name("H"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        let mut chars = name.chars();
        let letter = chars.next()?.to_ascii_uppercase();
        let accidental = chars.next().map(|c| c.to_ascii_lowercase());
        if chars.next().is_some() {
            return None;
        }

        let base: i32 = match letter {
            'C' => 0,
            'D' => 2,
            'E' => 4,
            'F' => 5,
            'G' => 7,
            'A' => 9,
            'B' => 11,
            _ => return None,
        };

        let shift = match accidental {
            None => 0,
            Some('#') => 1,
            Some('b') => -1,
            Some(_) => return None,
        };

        Some(PitchClass::from_index((base + shift).rem_euclid(12) as u32))
    }
}

impl std::fmt::Display for PitchClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Key quality for the ranked hypothesis space.
///
/// Only major and minor participate in key ranking; the additional scale
/// templates in [`crate::features::key::scales`] are reference material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    /// Major (ionian)
    Major,
    /// Minor (natural minor / aeolian)
    Minor,
}

impl Mode {
    /// Lowercase label used in display names ("major" / "minor").
    pub fn label(self) -> &'static str {
        match self {
            Mode::Major => "major",
            Mode::Minor => "minor",
        }
    }
}

/// A mapped pitch at a single instant: note identity plus tuning deviation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoteObservation {
    /// Pitch class of the nearest equal-tempered note
    pub pitch_class: PitchClass,

    /// Octave in scientific pitch notation (A4 = octave 4)
    pub octave: i32,

    /// Estimated fundamental frequency in Hz
    pub frequency_hz: f32,

    /// Deviation from the nearest equal-tempered pitch in cents
    /// (expected within ±50 for a stable note)
    pub cents_offset: i32,
}

impl NoteObservation {
    /// Whether two observations name the same note (class + octave).
    ///
    /// Frequency and cents may differ between frames of the same held note.
    pub fn same_note(&self, other: &NoteObservation) -> bool {
        self.pitch_class == other.pitch_class && self.octave == other.octave
    }

    /// Display name, e.g. "A4" or "F#3".
    pub fn name(&self) -> String {
        format!("{}{}", self.pitch_class, self.octave)
    }
}

/// A finalized note: a stable pitch with exact start/end times.
///
/// Produced only once the stability filter has confirmed the note and it
/// has ended (silence, pitch loss, a new note, or an explicit flush).
/// Timestamps are in milliseconds on the tracker's sample-derived clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedNote {
    /// Pitch class of the note
    pub pitch_class: PitchClass,

    /// Octave in scientific pitch notation
    pub octave: i32,

    /// Fundamental frequency at confirmation time, in Hz
    pub frequency_hz: f32,

    /// Tuning deviation at confirmation time, in cents
    pub cents_offset: i32,

    /// Note duration in milliseconds (`end_ms - start_ms`)
    pub duration_ms: f64,

    /// Start of the note on the session clock, in milliseconds
    pub start_ms: f64,

    /// End of the note on the session clock, in milliseconds
    pub end_ms: f64,
}

impl DetectedNote {
    /// Display name, e.g. "A4".
    pub fn name(&self) -> String {
        format!("{}{}", self.pitch_class, self.octave)
    }
}

/// A key hypothesis: tonic pitch class plus mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyHypothesis {
    /// Tonic pitch class
    pub tonic: PitchClass,

    /// Major or minor
    pub mode: Mode,
}

impl KeyHypothesis {
    /// Display name, e.g. "C major" or "F# minor".
    pub fn name(&self) -> String {
        format!("{} {}", self.tonic, self.mode.label())
    }

    /// Whether `other` is the relative key of `self`.
    ///
    /// Relative pairs share all seven scale pitch classes: the minor tonic
    /// sits three semitones below the major tonic (A minor / C major).
    ///
    /// # Example
    ///
    /// ```
    /// use cantus_dsp::{KeyHypothesis, Mode, PitchClass};
    ///
    /// let c_major = KeyHypothesis { tonic: PitchClass::C, mode: Mode::Major };
    /// let a_minor = KeyHypothesis { tonic: PitchClass::A, mode: Mode::Minor };
    /// assert!(c_major.is_relative_of(&a_minor));
    /// assert!(a_minor.is_relative_of(&c_major));
    /// ```
    pub fn is_relative_of(&self, other: &KeyHypothesis) -> bool {
        match (self.mode, other.mode) {
            (Mode::Major, Mode::Minor) => other.tonic == self.tonic.transpose(-3),
            (Mode::Minor, Mode::Major) => self.tonic == other.tonic.transpose(-3),
            _ => false,
        }
    }
}

/// One ranked key with its confidence and scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyCandidate {
    /// The key hypothesis
    pub hypothesis: KeyHypothesis,

    /// Scale-fit ratio: fraction of total note duration whose pitch class
    /// lies within this key's scale (0.0-1.0)
    pub confidence: f32,

    /// The seven scale pitch classes in ascending order from the tonic
    pub scale_notes: [PitchClass; 7],
}

/// Result of key inference over one session's note list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyAnalysisResult {
    /// Best-scoring key
    pub primary: KeyCandidate,

    /// Relative key of the primary, reported when its score comes within
    /// 70% of the best score
    pub alternative: Option<KeyCandidate>,

    /// True when primary and alternative are tonally indistinguishable
    /// (alternative score within 85% of the best)
    pub is_ambiguous: bool,
}

/// Metadata about one batch analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionMetadata {
    /// Audio duration in seconds
    pub duration_seconds: f32,

    /// Sample rate in Hz
    pub sample_rate: u32,

    /// Number of full frames processed
    pub frames_processed: usize,

    /// Wall-clock processing time in milliseconds
    pub processing_time_ms: f32,
}

/// Output of [`crate::analyze_samples`]: notes, key, and run metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionAnalysis {
    /// All finalized notes in detection order
    pub notes: Vec<DetectedNote>,

    /// Key inference result; `None` when the session carried too little
    /// tonal signal to rank any key
    pub key: Option<KeyAnalysisResult>,

    /// Run metadata
    pub metadata: SessionMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pitch_class_cycle() {
        for i in 0..12u32 {
            assert_eq!(PitchClass::from_index(i).index() as u32, i);
            assert_eq!(PitchClass::from_index(i + 12), PitchClass::from_index(i));
        }
    }

    #[test]
    fn test_transpose_wraps() {
        assert_eq!(PitchClass::A.transpose(3), PitchClass::C);
        assert_eq!(PitchClass::C.transpose(-1), PitchClass::B);
        assert_eq!(PitchClass::Fs.transpose(12), PitchClass::Fs);
        assert_eq!(PitchClass::D.transpose(-26), PitchClass::C);
    }

    #[test]
    fn test_from_name_normalizes_flats() {
        assert_eq!(PitchClass::from_name("C"), Some(PitchClass::C));
        assert_eq!(PitchClass::from_name("c#"), Some(PitchClass::Cs));
        assert_eq!(PitchClass::from_name("Db"), Some(PitchClass::Cs));
        assert_eq!(PitchClass::from_name("Eb"), Some(PitchClass::Ds));
        assert_eq!(PitchClass::from_name("Cb"), Some(PitchClass::B));
        assert_eq!(PitchClass::from_name("B#"), Some(PitchClass::C));
        assert_eq!(PitchClass::from_name(""), None);
        assert_eq!(PitchClass::from_name("X"), None);
        assert_eq!(PitchClass::from_name("C##"), None);
    }

    #[test]
    fn test_relative_key_pairs() {
        let c_major = KeyHypothesis {
            tonic: PitchClass::C,
            mode: Mode::Major,
        };
        let a_minor = KeyHypothesis {
            tonic: PitchClass::A,
            mode: Mode::Minor,
        };
        let c_minor = KeyHypothesis {
            tonic: PitchClass::C,
            mode: Mode::Minor,
        };
        assert!(c_major.is_relative_of(&a_minor));
        assert!(a_minor.is_relative_of(&c_major));
        assert!(!c_major.is_relative_of(&c_minor));
        assert!(!c_major.is_relative_of(&c_major));
    }

    #[test]
    fn test_note_names() {
        let obs = NoteObservation {
            pitch_class: PitchClass::Fs,
            octave: 3,
            frequency_hz: 185.0,
            cents_offset: -2,
        };
        assert_eq!(obs.name(), "F#3");

        let hyp = KeyHypothesis {
            tonic: PitchClass::As,
            mode: Mode::Minor,
        };
        assert_eq!(hyp.name(), "A# minor");
    }
}
