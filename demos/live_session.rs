//! Example: run a synthesized session through the streaming tracker
//!
//! Feeds a short melody frame-by-frame through a `NoteTracker`, printing
//! note events as they happen, then infers the session key.

use cantus_dsp::{analyze_key, DetectorConfig, NoteTracker};

const SAMPLE_RATE: u32 = 44100;
const FRAME: usize = 2048;

fn tone(freq: f32, frames: usize, out: &mut Vec<f32>) {
    for i in 0..frames * FRAME {
        out.push((i as f32 / SAMPLE_RATE as f32 * freq * 2.0 * std::f32::consts::PI).sin() * 0.4);
    }
    out.extend(std::iter::repeat(0.0f32).take(3 * FRAME));
}

fn main() {
    // Initialize logger
    env_logger::init();

    // Synthesize a melody: G4 - B4 - D5 - G4
    let mut samples = Vec::new();
    for &(freq, frames) in &[(392.0f32, 12), (493.88, 10), (587.33, 10), (392.0, 14)] {
        tone(freq, frames, &mut samples);
    }

    let mut tracker = NoteTracker::new(SAMPLE_RATE, DetectorConfig::default());
    let mut notes = Vec::new();

    for frame in samples.chunks_exact(FRAME) {
        let events = tracker.process_frame(frame);
        if let Some(obs) = events.started {
            println!(
                "started   {} ({:.1} Hz, {:+} cents)",
                obs.name(),
                obs.frequency_hz,
                obs.cents_offset
            );
        }
        if let Some(note) = events.completed {
            println!("completed {} ({:.0} ms)", note.name(), note.duration_ms);
            notes.push(note);
        }
    }
    if let Some(note) = tracker.flush() {
        println!("completed {} ({:.0} ms)", note.name(), note.duration_ms);
        notes.push(note);
    }

    match analyze_key(&notes) {
        Some(result) => {
            println!(
                "\nKey: {} (fit: {:.2})",
                result.primary.hypothesis.name(),
                result.primary.confidence
            );
            if let Some(alt) = &result.alternative {
                println!(
                    "Alternative: {} (fit: {:.2}){}",
                    alt.hypothesis.name(),
                    alt.confidence,
                    if result.is_ambiguous { " [ambiguous]" } else { "" }
                );
            }
        }
        None => println!("\nNo key could be determined"),
    }
}
