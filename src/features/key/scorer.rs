//! Duration-weighted key scoring
//!
//! Scores all 24 tonic/mode hypotheses against the session's note list and
//! reports the best key, its scale-fit confidence, and (when the relative
//! key scores nearly as well) an alternative.
//!
//! Scoring per hypothesis, with `w` = a pitch class's accumulated note
//! duration in seconds:
//! - in-scale class: `+2w`, out-of-scale class: `-1.5w`
//! - tonic `+5w`, fifth degree `+3w`, third degree `+2w` (offset 4 major /
//!   3 minor), leading tone (seventh degree position) `+1w`
//! - flat `+2` if the session's first note is the tonic, `+3` if the last
//!   note is (melodies disproportionately start and end on the tonic)
//! - the sum is damped by `0.5 + 0.5 * fit` where `fit` is the fraction of
//!   total duration that lies in the scale, then normalized by total
//!   duration in seconds so sessions of any length score comparably
//!
//! Confidence is the winner's scale-fit ratio, an independently
//! interpretable "fraction of singing time that fit this key" rather than
//! a softmax probability.

use crate::analysis::result::{
    DetectedNote, KeyAnalysisResult, KeyCandidate, KeyHypothesis, Mode, PitchClass,
};
use crate::features::key::scales::{self, ScaleKind};

/// Score ratio above which the relative key is reported as an alternative
const RELATIVE_ALTERNATIVE_RATIO: f64 = 0.70;

/// Score ratio above which the relative pair is flagged ambiguous
const RELATIVE_AMBIGUOUS_RATIO: f64 = 0.85;

/// One scored hypothesis.
#[derive(Debug, Clone, Copy)]
struct ScoredKey {
    hypothesis: KeyHypothesis,
    score: f64,
    fit: f64,
}

/// Infer the most probable key from an ordered note list.
///
/// Pure function over the finalized session notes; invoke once at session
/// stop. Repeat calls on the same list return bit-identical results. Ties
/// between equal scores resolve to the earlier hypothesis in chromatic
/// tonic order, major before minor.
///
/// # Returns
///
/// `None` when the list is empty, carries zero total duration, or no
/// hypothesis scores above zero (insufficient tonal signal). Callers must
/// treat `None` as "insufficient data", not as an error.
///
/// # Example
///
/// ```
/// use cantus_dsp::{analyze_key, DetectedNote, PitchClass};
///
/// let note = |pc, dur: f64, at: f64| DetectedNote {
///     pitch_class: pc,
///     octave: 4,
///     frequency_hz: 440.0,
///     cents_offset: 0,
///     duration_ms: dur,
///     start_ms: at,
///     end_ms: at + dur,
/// };
/// let notes = vec![
///     note(PitchClass::C, 800.0, 0.0),
///     note(PitchClass::E, 400.0, 900.0),
///     note(PitchClass::G, 400.0, 1400.0),
///     note(PitchClass::C, 600.0, 1900.0),
/// ];
/// let result = analyze_key(&notes).unwrap();
/// assert_eq!(result.primary.hypothesis.tonic, PitchClass::C);
/// ```
pub fn analyze_key(notes: &[DetectedNote]) -> Option<KeyAnalysisResult> {
    if notes.is_empty() {
        return None;
    }

    // Accumulate duration per pitch class, in seconds
    let mut weights = [0.0f64; 12];
    for note in notes {
        if note.duration_ms.is_finite() && note.duration_ms > 0.0 {
            weights[note.pitch_class.index() as usize] += note.duration_ms / 1000.0;
        }
    }

    let total_seconds: f64 = weights.iter().sum();
    if total_seconds <= 0.0 {
        return None;
    }

    let first_class = notes.first().map(|n| n.pitch_class)?;
    let last_class = notes.last().map(|n| n.pitch_class)?;

    log::debug!(
        "scoring 24 key hypotheses over {} notes ({:.2} s voiced)",
        notes.len(),
        total_seconds
    );

    // Score all 24 hypotheses: tonics in chromatic order, major before
    // minor. The stable descending sort makes this order the tie-break.
    let mut scored = Vec::with_capacity(24);
    for tonic_idx in 0..12 {
        let tonic = PitchClass::from_index(tonic_idx);
        for mode in [Mode::Major, Mode::Minor] {
            let hypothesis = KeyHypothesis { tonic, mode };
            scored.push(score_hypothesis(
                hypothesis,
                &weights,
                total_seconds,
                first_class,
                last_class,
            ));
        }
    }
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

    let best = scored[0];
    if best.score <= 0.0 {
        log::debug!("no hypothesis scored above zero; reporting no key");
        return None;
    }

    log::debug!(
        "best key {} (score {:.4}, fit {:.3})",
        best.hypothesis.name(),
        best.score,
        best.fit
    );

    let primary = candidate_from(&best);

    // Relative-key check against the runner-up only
    let runner_up = scored[1];
    let is_relative = best.hypothesis.is_relative_of(&runner_up.hypothesis);
    let (alternative, is_ambiguous) =
        if is_relative && runner_up.score > best.score * RELATIVE_ALTERNATIVE_RATIO {
            let ambiguous = runner_up.score > best.score * RELATIVE_AMBIGUOUS_RATIO;
            if ambiguous {
                log::debug!(
                    "relative pair {} / {} is tonally ambiguous",
                    best.hypothesis.name(),
                    runner_up.hypothesis.name()
                );
            }
            (Some(candidate_from(&runner_up)), ambiguous)
        } else {
            (None, false)
        };

    Some(KeyAnalysisResult {
        primary,
        alternative,
        is_ambiguous,
    })
}

fn candidate_from(scored: &ScoredKey) -> KeyCandidate {
    KeyCandidate {
        hypothesis: scored.hypothesis,
        confidence: scored.fit as f32,
        scale_notes: scales::scale_notes(
            scored.hypothesis.tonic,
            ScaleKind::from_mode(scored.hypothesis.mode),
        ),
    }
}

fn score_hypothesis(
    hypothesis: KeyHypothesis,
    weights: &[f64; 12],
    total_seconds: f64,
    first_class: PitchClass,
    last_class: PitchClass,
) -> ScoredKey {
    let kind = ScaleKind::from_mode(hypothesis.mode);
    let in_scale = scales::membership(hypothesis.tonic, kind);

    let tonic_idx = hypothesis.tonic.index() as usize;
    let fifth_idx = hypothesis.tonic.transpose(7).index() as usize;
    let third_idx = hypothesis
        .tonic
        .transpose(kind.third_offset() as i32)
        .index() as usize;
    let leading_idx = hypothesis
        .tonic
        .transpose(kind.seventh_offset() as i32)
        .index() as usize;

    let mut score = 0.0f64;
    let mut in_scale_seconds = 0.0f64;

    for (idx, &w) in weights.iter().enumerate() {
        if w <= 0.0 {
            continue;
        }
        if in_scale[idx] {
            in_scale_seconds += w;
            score += 2.0 * w;
            if idx == tonic_idx {
                score += 5.0 * w;
            }
            if idx == fifth_idx {
                score += 3.0 * w;
            }
            if idx == third_idx {
                score += 2.0 * w;
            }
            if idx == leading_idx {
                score += w;
            }
        } else {
            score -= 1.5 * w;
        }
    }

    if first_class == hypothesis.tonic {
        score += 2.0;
    }
    if last_class == hypothesis.tonic {
        score += 3.0;
    }

    let fit = in_scale_seconds / total_seconds;
    score *= 0.5 + 0.5 * fit;
    score /= total_seconds;

    ScoredKey {
        hypothesis,
        score,
        fit,
    }
}
