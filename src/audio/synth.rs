//! Chord synthesis - deterministic sine-mix rendering of pitch sets
//!
//! Both the WAV and live backends render notes through here so that a chord
//! sounds the same wherever it ends up. Output is mono f32 in [-1.0, 1.0].

use std::f32::consts::PI;

use crate::notes::{midi_or_fallback, midi_to_hz};

/// Sample rate used for rendered chords
pub const SYNTH_SAMPLE_RATE: u32 = 44_100;

/// Attack/release ramp length, avoids clicks at note boundaries
const ENVELOPE_MS: f32 = 10.0;

/// Render a chord as an equal-weight sine mix
///
/// # Arguments
/// * `notes` - Pitch names; unparseable names sound as middle C
/// * `duration_secs` - Length of the rendered buffer
/// * `sample_rate` - Output sample rate in Hz
/// * `amplitude` - Peak amplitude of the mix (clamped to [0.0, 1.0])
///
/// # Returns
/// Mono samples, empty when `notes` is empty or the duration is not positive
pub fn render_chord(notes: &[&str], duration_secs: f32, sample_rate: u32, amplitude: f32) -> Vec<f32> {
    if notes.is_empty() || !duration_secs.is_finite() || duration_secs <= 0.0 {
        return Vec::new();
    }

    let num_samples = (duration_secs * sample_rate as f32) as usize;
    let freqs: Vec<f32> = notes
        .iter()
        .map(|note| midi_to_hz(midi_or_fallback(note)))
        .collect();
    let gain = amplitude.clamp(0.0, 1.0) / freqs.len() as f32;
    let ramp = ((ENVELOPE_MS / 1000.0) * sample_rate as f32) as usize;

    let mut samples = Vec::with_capacity(num_samples);
    for i in 0..num_samples {
        let t = i as f32 / sample_rate as f32;
        let mix: f32 = freqs.iter().map(|f| (2.0 * PI * f * t).sin()).sum();
        samples.push(mix * gain * envelope(i, num_samples, ramp));
    }

    samples
}

fn envelope(i: usize, len: usize, ramp: usize) -> f32 {
    if ramp == 0 {
        return 1.0;
    }
    let from_start = i as f32 / ramp as f32;
    let from_end = (len - i) as f32 / ramp as f32;
    from_start.min(from_end).min(1.0)
}
