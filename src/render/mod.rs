//! Render snapshot: the immutable parameter bundle handed to the synthesis
//! engine for one playable loop.

use std::collections::BTreeSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::SoundError;
use crate::key;
use crate::params::SoundParams;
use crate::registry::NoteRegistry;

/// Everything the renderer needs for one loop. Derived on demand from the
/// registry and parameters; never persisted.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSnapshot {
    /// Distinct MIDI keys to sound, ascending. Duplicate note slots on the
    /// same key collapse to one entry.
    pub keys: Vec<u8>,
    /// MIDI velocity byte, [1, 127].
    pub velocity: u8,
    /// How long the notes are held, in whole milliseconds.
    pub note_duration_ms: u64,
    /// Length of the recorded loop (one beat), in whole milliseconds.
    pub beat_duration_ms: u64,
    pub reverb_preset: u8,
    pub volume_boost: bool,
}

/// Build a snapshot of the current state.
///
/// Pure and deterministic; fails with `EmptyNoteSet` when no note is
/// occupied (the playback layer checks the note count before asking for
/// one). Durations use round-half-up: `f64::round` rounds half away from
/// zero and both inputs are positive.
pub fn build_snapshot(
    registry: &NoteRegistry,
    params: &SoundParams,
) -> Result<RenderSnapshot, SoundError> {
    if registry.is_empty() {
        return Err(SoundError::EmptyNoteSet);
    }

    let keys: BTreeSet<u8> = registry
        .handles()
        .iter()
        .map(|&handle| registry.key(handle))
        .collect::<Result<_, _>>()?;

    let ms_per_beat = key::ms_per_beat(params.bpm());
    Ok(RenderSnapshot {
        keys: keys.into_iter().collect(),
        velocity: key::encode_velocity(params.velocity()),
        note_duration_ms: (ms_per_beat * params.duration() as f64).round() as u64,
        beat_duration_ms: ms_per_beat.round() as u64,
        reverb_preset: params.reverb_preset(),
        volume_boost: params.volume_boost(),
    })
}

/// The narrow seam to the synthesis engine: one snapshot in, one loopable
/// PCM period out. The engine itself is an external service; the crate only
/// defines the contract (plus a naive stand-in in the `drone` binary).
pub trait Renderer {
    fn render(&mut self, snapshot: &RenderSnapshot, sample_rate: u32) -> Vec<f32>;
}
