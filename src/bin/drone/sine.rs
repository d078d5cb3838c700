//! Naive additive renderer standing in for the real synthesis engine.
//!
//! The production synthesizer behind [`Renderer`] is a SoundFont engine;
//! this one sums sines so the binary can demonstrate the snapshot contract
//! without it. Reverb presets are ignored here (a reverb bus belongs to the
//! real engine).

use tempodrone_core::{RenderSnapshot, Renderer};

/// Fade applied at note edges to avoid clicks.
const EDGE_FADE_MS: f64 = 5.0;

pub struct SineRenderer;

impl SineRenderer {
    fn key_to_hz(key: u8) -> f64 {
        440.0 * 2f64.powf((key as f64 - 69.0) / 12.0)
    }
}

impl Renderer for SineRenderer {
    fn render(&mut self, snapshot: &RenderSnapshot, sample_rate: u32) -> Vec<f32> {
        let total_frames = (snapshot.beat_duration_ms as f64 / 1000.0 * sample_rate as f64) as usize;
        let note_frames = ((snapshot.note_duration_ms as f64 / 1000.0 * sample_rate as f64)
            as usize)
            .min(total_frames);
        let fade_frames = ((EDGE_FADE_MS / 1000.0 * sample_rate as f64) as usize).max(1);

        let amplitude = if snapshot.keys.is_empty() {
            0.0
        } else {
            snapshot.velocity as f64 / 127.0 / snapshot.keys.len() as f64
        };

        let mut buffer = vec![0.0f32; total_frames];
        for &key in &snapshot.keys {
            let hz = Self::key_to_hz(key);
            let step = std::f64::consts::TAU * hz / sample_rate as f64;
            for (frame, sample) in buffer.iter_mut().enumerate().take(note_frames) {
                let gate = envelope(frame, note_frames, fade_frames);
                *sample += (amplitude * gate * (step * frame as f64).sin()) as f32;
            }
        }

        if snapshot.volume_boost {
            // Stand-in for the engine's dynamic range compression.
            for sample in &mut buffer {
                *sample = (*sample * 2.0).tanh();
            }
        }

        buffer
    }
}

/// Linear fade-in/fade-out gate over the note's frames.
fn envelope(frame: usize, note_frames: usize, fade_frames: usize) -> f64 {
    let fade_in = frame as f64 / fade_frames as f64;
    let fade_out = (note_frames - frame) as f64 / fade_frames as f64;
    fade_in.min(fade_out).clamp(0.0, 1.0)
}
