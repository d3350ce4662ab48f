//! Scale interval templates
//!
//! Seven-note scale templates as semitone offsets from the tonic. Major
//! and natural minor drive the ranked hypothesis space; harmonic minor,
//! dorian, and mixolydian are reference templates for display and
//! downstream consumers, not ranked.

use crate::analysis::result::{Mode, PitchClass};

/// A seven-note scale shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScaleKind {
    /// Major (ionian): W-W-H-W-W-W-H
    Major,
    /// Natural minor (aeolian): W-H-W-W-H-W-W
    NaturalMinor,
    /// Harmonic minor: natural minor with a raised 7th
    HarmonicMinor,
    /// Dorian: minor quality with a raised 6th
    Dorian,
    /// Mixolydian: major quality with a flat 7th
    Mixolydian,
}

impl ScaleKind {
    /// Semitone offsets of the seven scale degrees from the tonic.
    pub fn intervals(self) -> [u8; 7] {
        match self {
            ScaleKind::Major => [0, 2, 4, 5, 7, 9, 11],
            ScaleKind::NaturalMinor => [0, 2, 3, 5, 7, 8, 10],
            ScaleKind::HarmonicMinor => [0, 2, 3, 5, 7, 8, 11],
            ScaleKind::Dorian => [0, 2, 3, 5, 7, 9, 10],
            ScaleKind::Mixolydian => [0, 2, 4, 5, 7, 9, 10],
        }
    }

    /// Semitone offset of the third scale degree (4 for major-quality
    /// shapes, 3 for minor-quality ones).
    pub fn third_offset(self) -> u8 {
        self.intervals()[2]
    }

    /// Semitone offset of the seventh scale degree.
    pub fn seventh_offset(self) -> u8 {
        self.intervals()[6]
    }

    /// The ranked scale shape for a key mode.
    pub fn from_mode(mode: Mode) -> Self {
        match mode {
            Mode::Major => ScaleKind::Major,
            Mode::Minor => ScaleKind::NaturalMinor,
        }
    }
}

/// The seven scale pitch classes in ascending order from the tonic.
///
/// # Example
///
/// ```
/// use cantus_dsp::features::key::{scale_notes, ScaleKind};
/// use cantus_dsp::PitchClass;
///
/// let c_major = scale_notes(PitchClass::C, ScaleKind::Major);
/// assert_eq!(c_major[0], PitchClass::C);
/// assert_eq!(c_major[6], PitchClass::B);
/// ```
pub fn scale_notes(tonic: PitchClass, kind: ScaleKind) -> [PitchClass; 7] {
    kind.intervals()
        .map(|offset| tonic.transpose(offset as i32))
}

/// Per-pitch-class membership mask for a scale.
pub(crate) fn membership(tonic: PitchClass, kind: ScaleKind) -> [bool; 12] {
    let mut mask = [false; 12];
    for note in scale_notes(tonic, kind) {
        mask[note.index() as usize] = true;
    }
    mask
}
