//! Streaming note tracker
//!
//! The central state machine of the engine. Consumes one audio frame per
//! call, runs the gate -> pitch estimator -> note mapper chain, debounces
//! the result with a consecutive-frame stability filter, and accounts for
//! note durations on a sample-derived clock.
//!
//! State:
//!
//! ```text
//! Idle                          no pitch / silence
//! Tracking(candidate)           a note is being confirmed
//! Stable { open, candidate }    a confirmed note is sounding; the optional
//!                               candidate confirms the *next* note
//! ```
//!
//! A note is finalized by silence, pitch loss, confirmation of a different
//! note, or an explicit flush. Frequency loss is deliberately treated
//! exactly like silence, so the machine stays two-way (voiced/unvoiced)
//! and `flush` is the only other finalization path. Finalized notes
//! shorter than the configured minimum duration are discarded silently.
//!
//! The tracker sits on the real-time audio callback path: processing one
//! frame is bounded, allocation-free apart from the pitch estimator's
//! scratch buffers, and never blocks or errors. Exactly one owner drives
//! it; hand completed notes to other threads over a channel, never by
//! sharing the tracker itself.

use crate::analysis::result::{DetectedNote, NoteObservation};
use crate::config::DetectorConfig;
use crate::features::note::mapper;
use crate::features::pitch;
use crate::preprocessing::gate;

/// A note identity being confirmed by consecutive matching frames.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    observation: NoteObservation,
    consecutive: u32,
}

/// A confirmed note that is currently sounding.
#[derive(Debug, Clone, Copy)]
struct OpenNote {
    observation: NoteObservation,
    start_ms: f64,
}

/// Tracker state as a tagged variant.
#[derive(Debug, Clone, Copy)]
enum TrackerState {
    /// No signal
    Idle,
    /// Counting toward the stability threshold
    Tracking(Candidate),
    /// A note is open; `candidate` counts toward the next note
    Stable {
        open: OpenNote,
        candidate: Option<Candidate>,
    },
}

/// Events produced by one frame of processing.
///
/// At most one note can complete and one can start per frame; when both
/// happen (a new stable note displaces the open one), `completed` refers
/// to the old note and `started` to the new one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameEvents {
    /// A note that was finalized on this frame
    pub completed: Option<DetectedNote>,

    /// A note that was confirmed and opened on this frame, reported with
    /// its instantaneous pitch and cents (duration is not yet known)
    pub started: Option<NoteObservation>,
}

impl FrameEvents {
    fn none() -> Self {
        Self::default()
    }
}

/// Streaming note detector.
///
/// Feed mono frames of the session's sample rate through
/// [`process_frame`](NoteTracker::process_frame); collect completed notes
/// from the returned events. Call [`flush`](NoteTracker::flush) when
/// capture stops and [`reset`](NoteTracker::reset) between sessions.
///
/// # Example
///
/// ```
/// use cantus_dsp::{DetectorConfig, NoteTracker};
///
/// let mut tracker = NoteTracker::new(44100, DetectorConfig::default());
/// let mut notes = Vec::new();
///
/// for frame in [[0.0f32; 2048]] {
///     let events = tracker.process_frame(&frame);
///     if let Some(note) = events.completed {
///         notes.push(note);
///     }
/// }
/// if let Some(note) = tracker.flush() {
///     notes.push(note);
/// }
/// ```
#[derive(Debug)]
pub struct NoteTracker {
    config: DetectorConfig,
    sample_rate: u32,
    state: TrackerState,
    clock_ms: f64,
}

impl NoteTracker {
    /// Create a tracker for a session at the given sample rate.
    pub fn new(sample_rate: u32, config: DetectorConfig) -> Self {
        Self {
            config,
            sample_rate,
            state: TrackerState::Idle,
            clock_ms: 0.0,
        }
    }

    /// The session clock in milliseconds, derived from processed samples.
    pub fn clock_ms(&self) -> f64 {
        self.clock_ms
    }

    /// The configuration this tracker runs with.
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// The currently open (confirmed, still sounding) note, if any.
    pub fn current_note(&self) -> Option<&NoteObservation> {
        match &self.state {
            TrackerState::Stable { open, .. } => Some(&open.observation),
            _ => None,
        }
    }

    /// Process one frame of audio.
    ///
    /// Advances the session clock by the frame's span, classifies the
    /// frame, and runs the stability state machine. Never errors: frames
    /// with NaN samples or unusable content are treated as silence.
    pub fn process_frame(&mut self, frame: &[f32]) -> FrameEvents {
        // Timestamps are taken at frame boundaries; the frame's own span
        // is attributed to whatever note is open when it begins.
        let frame_start_ms = self.clock_ms;
        if self.sample_rate > 0 {
            self.clock_ms += frame.len() as f64 / self.sample_rate as f64 * 1000.0;
        }

        let energy = gate::rms(frame);
        if gate::is_silence(energy, self.config.silence_rms_threshold) {
            return self.on_unvoiced(frame_start_ms);
        }

        let estimate = pitch::estimate(
            frame,
            self.sample_rate as f32,
            self.config.min_frequency_hz,
            self.config.max_frequency_hz,
            self.config.yin_threshold,
        );
        let Some(frequency) = estimate else {
            // Pitch loss finalizes like silence
            return self.on_unvoiced(frame_start_ms);
        };

        let Some(observation) = mapper::map_frequency(
            frequency,
            self.config.reference_frequency_hz,
            self.config.reference_midi_number,
        ) else {
            return self.on_unvoiced(frame_start_ms);
        };

        self.on_voiced(observation, frame_start_ms)
    }

    /// Force-finalize any open note; state returns to idle.
    ///
    /// Call when the caller stops capture. The minimum-duration rule
    /// applies, so a too-short open note returns `None`.
    pub fn flush(&mut self) -> Option<DetectedNote> {
        let note = self.close_open(self.clock_ms);
        self.state = TrackerState::Idle;
        note
    }

    /// Flush, then clear all state including the clock.
    ///
    /// Use between sessions. Returns the flushed note, if one survived
    /// the minimum-duration rule.
    pub fn reset(&mut self) -> Option<DetectedNote> {
        let note = self.flush();
        self.clock_ms = 0.0;
        note
    }

    /// Silence or pitch loss: finalize and go idle.
    fn on_unvoiced(&mut self, at_ms: f64) -> FrameEvents {
        let completed = self.close_open(at_ms);
        self.state = TrackerState::Idle;
        FrameEvents {
            completed,
            started: None,
        }
    }

    fn on_voiced(&mut self, observation: NoteObservation, at_ms: f64) -> FrameEvents {
        match &mut self.state {
            TrackerState::Idle => {
                let candidate = Candidate {
                    observation,
                    consecutive: 1,
                };
                self.state = TrackerState::Tracking(candidate);
                self.try_confirm(at_ms)
            }
            TrackerState::Tracking(candidate) => {
                if observation.same_note(&candidate.observation) {
                    candidate.consecutive += 1;
                    candidate.observation = observation;
                } else {
                    *candidate = Candidate {
                        observation,
                        consecutive: 1,
                    };
                }
                self.try_confirm(at_ms)
            }
            TrackerState::Stable { open, candidate } => {
                if observation.same_note(&open.observation) {
                    // Back on the open note: abandon any divergent run.
                    // Already reported, so nothing is emitted.
                    *candidate = None;
                    FrameEvents::none()
                } else {
                    match candidate {
                        Some(c) if observation.same_note(&c.observation) => {
                            c.consecutive += 1;
                            c.observation = observation;
                        }
                        _ => {
                            *candidate = Some(Candidate {
                                observation,
                                consecutive: 1,
                            });
                        }
                    }
                    self.try_confirm(at_ms)
                }
            }
        }
    }

    /// Promote the active candidate to a stable note once it reaches the
    /// stability threshold, finalizing any previously open note.
    fn try_confirm(&mut self, at_ms: f64) -> FrameEvents {
        let threshold = self.config.stability_frames.max(1);

        let confirmed = match &self.state {
            TrackerState::Tracking(c) if c.consecutive >= threshold => Some(c.observation),
            TrackerState::Stable {
                candidate: Some(c), ..
            } if c.consecutive >= threshold => Some(c.observation),
            _ => None,
        };

        let Some(observation) = confirmed else {
            return FrameEvents::none();
        };

        let completed = self.close_open(at_ms);
        self.state = TrackerState::Stable {
            open: OpenNote {
                observation,
                start_ms: at_ms,
            },
            candidate: None,
        };

        log::debug!(
            "note started: {} ({:.2} Hz, {:+} cents) at {:.1} ms",
            observation.name(),
            observation.frequency_hz,
            observation.cents_offset,
            at_ms
        );

        FrameEvents {
            completed,
            started: Some(observation),
        }
    }

    /// Finalize the open note at the given time, applying the
    /// minimum-duration rule. Leaves the state untouched otherwise.
    fn close_open(&mut self, at_ms: f64) -> Option<DetectedNote> {
        let TrackerState::Stable { open, .. } = self.state else {
            return None;
        };
        self.state = TrackerState::Idle;

        let duration_ms = at_ms - open.start_ms;
        if duration_ms < self.config.min_note_duration_ms {
            log::debug!(
                "discarding short note {} ({:.1} ms < {:.1} ms minimum)",
                open.observation.name(),
                duration_ms,
                self.config.min_note_duration_ms
            );
            return None;
        }

        let note = DetectedNote {
            pitch_class: open.observation.pitch_class,
            octave: open.observation.octave,
            frequency_hz: open.observation.frequency_hz,
            cents_offset: open.observation.cents_offset,
            duration_ms,
            start_ms: open.start_ms,
            end_ms: at_ms,
        };

        log::debug!(
            "note completed: {} ({:.1} ms)",
            note.name(),
            note.duration_ms
        );

        Some(note)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::result::PitchClass;

    const SAMPLE_RATE: u32 = 44100;
    const FRAME: usize = 2048;

    /// Frame duration in ms at the test rate (~46.4 ms)
    fn frame_ms() -> f64 {
        FRAME as f64 / SAMPLE_RATE as f64 * 1000.0
    }

    fn sine_frame(freq: f32) -> Vec<f32> {
        (0..FRAME)
            .map(|i| (i as f32 / SAMPLE_RATE as f32 * freq * 2.0 * std::f32::consts::PI).sin() * 0.5)
            .collect()
    }

    fn silent_frame() -> Vec<f32> {
        vec![0.0f32; FRAME]
    }

    fn tracker() -> NoteTracker {
        NoteTracker::new(SAMPLE_RATE, DetectorConfig::default())
    }

    #[test]
    fn test_silence_stays_idle() {
        let mut t = tracker();
        for _ in 0..10 {
            let events = t.process_frame(&silent_frame());
            assert_eq!(events, FrameEvents::default());
        }
        assert!(t.current_note().is_none());
        assert!(t.flush().is_none());
    }

    #[test]
    fn test_note_confirmed_after_stability_threshold() {
        let mut t = tracker();
        let frame = sine_frame(440.0);

        // Two frames: not yet stable
        assert!(t.process_frame(&frame).started.is_none());
        assert!(t.process_frame(&frame).started.is_none());

        // Third frame confirms
        let events = t.process_frame(&frame);
        let started = events.started.expect("note should start on frame 3");
        assert_eq!(started.pitch_class, PitchClass::A);
        assert_eq!(started.octave, 4);
        assert!(started.cents_offset.abs() <= 10);
        assert!(events.completed.is_none());

        assert_eq!(t.current_note().unwrap().pitch_class, PitchClass::A);
    }

    #[test]
    fn test_debounce_never_finalizes_on_alternation() {
        // Alternating two notes every frame keeps the counter at 1 and
        // never confirms either, so nothing is ever finalized
        let mut t = tracker();
        let a4 = sine_frame(440.0);
        let c5 = sine_frame(523.25);

        for i in 0..20 {
            let frame = if i % 2 == 0 { &a4 } else { &c5 };
            let events = t.process_frame(frame);
            assert!(events.started.is_none(), "frame {i} started a note");
            assert!(events.completed.is_none(), "frame {i} completed a note");
        }
        assert!(t.flush().is_none());
    }

    #[test]
    fn test_single_held_pitch_yields_one_note() {
        let mut t = tracker();
        let frame = sine_frame(261.63); // C4
        let n_frames = 12;

        let mut started = 0;
        let mut completed = Vec::new();
        for _ in 0..n_frames {
            let events = t.process_frame(&frame);
            if events.started.is_some() {
                started += 1;
            }
            if let Some(n) = events.completed {
                completed.push(n);
            }
        }
        if let Some(n) = t.flush() {
            completed.push(n);
        }

        assert_eq!(started, 1, "exactly one note-started event");
        assert_eq!(completed.len(), 1, "exactly one finalized note");

        let note = &completed[0];
        assert_eq!(note.pitch_class, PitchClass::C);
        assert_eq!(note.octave, 4);
        // The note opened on frame 3 (start of the confirming frame = 2
        // full frames in) and ran to the flush at the end of frame 12
        let expected = (n_frames - 2) as f64 * frame_ms();
        assert!(
            (note.duration_ms - expected).abs() < 1.0,
            "duration {} vs expected {}",
            note.duration_ms,
            expected
        );
        assert!((note.end_ms - note.start_ms - note.duration_ms).abs() < 1e-9);
    }

    #[test]
    fn test_silence_finalizes_open_note() {
        let mut t = tracker();
        let frame = sine_frame(440.0);
        for _ in 0..6 {
            t.process_frame(&frame);
        }

        let events = t.process_frame(&silent_frame());
        let note = events.completed.expect("silence should finalize");
        assert_eq!(note.pitch_class, PitchClass::A);
        assert!(t.current_note().is_none());

        // Further silence emits nothing
        assert_eq!(t.process_frame(&silent_frame()), FrameEvents::default());
    }

    #[test]
    fn test_short_note_discarded() {
        let config = DetectorConfig {
            min_note_duration_ms: 1000.0, // force-discard everything short
            ..DetectorConfig::default()
        };
        let mut t = NoteTracker::new(SAMPLE_RATE, config);

        let frame = sine_frame(440.0);
        for _ in 0..5 {
            t.process_frame(&frame);
        }
        // ~3 frames open (~139 ms) < 1000 ms minimum
        let events = t.process_frame(&silent_frame());
        assert!(events.completed.is_none());
    }

    #[test]
    fn test_new_note_closes_previous() {
        let mut t = tracker();
        let a4 = sine_frame(440.0);
        let c5 = sine_frame(523.25);

        for _ in 0..6 {
            t.process_frame(&a4);
        }

        let mut events = FrameEvents::default();
        for _ in 0..3 {
            events = t.process_frame(&c5);
        }

        let completed = events.completed.expect("A4 should finalize");
        assert_eq!(completed.pitch_class, PitchClass::A);
        let started = events.started.expect("C5 should start");
        assert_eq!(started.pitch_class, PitchClass::C);
        assert_eq!(started.octave, 5);

        assert_eq!(t.current_note().unwrap().pitch_class, PitchClass::C);

        // Old note's end equals the new note's start
        for _ in 0..3 {
            t.process_frame(&c5);
        }
        let new_note = t.flush().expect("C5 finalizes on flush");
        assert!((new_note.start_ms - completed.end_ms).abs() < 1e-9);
    }

    #[test]
    fn test_brief_excursion_does_not_split_note() {
        // A two-frame excursion to another note (below the stability
        // threshold) must not close the open note
        let mut t = tracker();
        let a4 = sine_frame(440.0);
        let c5 = sine_frame(523.25);

        for _ in 0..6 {
            t.process_frame(&a4);
        }
        for _ in 0..2 {
            let events = t.process_frame(&c5);
            assert!(events.completed.is_none());
            assert!(events.started.is_none());
        }
        // Back to A4: excursion abandoned, note still open
        t.process_frame(&a4);
        assert_eq!(t.current_note().unwrap().pitch_class, PitchClass::A);

        // One continuous note over the whole span
        let note = t.flush().expect("one note");
        assert_eq!(note.pitch_class, PitchClass::A);
    }

    #[test]
    fn test_nan_frame_is_silence() {
        let mut t = tracker();
        let frame = sine_frame(440.0);
        for _ in 0..6 {
            t.process_frame(&frame);
        }

        let nan_frame = vec![f32::NAN; FRAME];
        let events = t.process_frame(&nan_frame);
        assert!(events.completed.is_some(), "NaN frame finalizes like silence");
        assert!(t.current_note().is_none());
    }

    #[test]
    fn test_flush_is_idempotent() {
        let mut t = tracker();
        let frame = sine_frame(440.0);
        for _ in 0..6 {
            t.process_frame(&frame);
        }
        assert!(t.flush().is_some());
        assert!(t.flush().is_none());
    }

    #[test]
    fn test_reset_clears_clock() {
        let mut t = tracker();
        let frame = sine_frame(440.0);
        for _ in 0..6 {
            t.process_frame(&frame);
        }
        assert!(t.clock_ms() > 0.0);
        let note = t.reset();
        assert!(note.is_some());
        assert_eq!(t.clock_ms(), 0.0);
        assert!(t.current_note().is_none());
    }

    #[test]
    fn test_clock_advances_per_frame() {
        let mut t = tracker();
        t.process_frame(&silent_frame());
        t.process_frame(&silent_frame());
        assert!((t.clock_ms() - 2.0 * frame_ms()).abs() < 1e-9);
    }
}
