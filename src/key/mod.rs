/*
MIDI Key Codec
==============

A playable key is addressed two ways:

- As a MIDI key number (0-127), the form the synthesizer consumes.
- As a pitch class (0-11) plus octave (0-7), the form the user picks.

The two are related by:

    key = pitch_class + 12 * octave + FIRST_KEY

with FIRST_KEY = 21 (MIDI A0), so pitch class 0 is A, pitch class 3 is C.
Encodable keys span A0 (21) through G#7 (116); the decode functions are
total over the full MIDI range so that keys picked up from an instrument's
key range never panic.
*/

pub mod range;

pub use range::KeyRange;

use crate::error::SoundError;

/// Highest MIDI key number.
pub const KEY_MAX: u8 = 127;
/// Number of MIDI key slots (0-127).
pub const KEY_COUNT: usize = 128;
/// MIDI number of A0, the first encodable key.
pub const FIRST_KEY: u8 = 21;
/// Pitches in an octave.
pub const PITCHES_PER_OCTAVE: u8 = 12;
/// Highest pitch class (G#).
pub const PITCH_CLASS_MAX: u8 = 11;
/// Highest selectable octave.
pub const OCTAVE_MAX: u8 = 7;

// Pitch classes, counted from A (the octave numbering of this model starts
// at A0, not C0).
pub const A: u8 = 0;
pub const AS: u8 = 1;
pub const BB: u8 = 1;
pub const B: u8 = 2;
pub const C: u8 = 3;
pub const CS: u8 = 4;
pub const DB: u8 = 4;
pub const D: u8 = 5;
pub const DS: u8 = 6;
pub const EB: u8 = 6;
pub const E: u8 = 7;
pub const F: u8 = 8;
pub const FS: u8 = 9;
pub const GB: u8 = 9;
pub const G: u8 = 10;
pub const GS: u8 = 11;
pub const AB: u8 = 11;

/// Convert a pitch class (0-11) and octave (0-7) to a MIDI key.
///
/// Fails with `InvalidArgument` when either component is out of its domain,
/// so the result is always a real key in [FIRST_KEY, 116].
pub fn encode_key(pitch_class: u8, octave: u8) -> Result<u8, SoundError> {
    if pitch_class > PITCH_CLASS_MAX {
        return Err(SoundError::InvalidArgument {
            what: "pitch class above 11",
        });
    }
    if octave > OCTAVE_MAX {
        return Err(SoundError::InvalidArgument {
            what: "octave above 7",
        });
    }
    Ok(pitch_class + PITCHES_PER_OCTAVE * octave + FIRST_KEY)
}

/// Extract the pitch class (0-11) from a MIDI key.
///
/// Total over the whole MIDI range; keys below A0 wrap modulo the octave.
pub fn decode_pitch_class(key: u8) -> u8 {
    (key as i32 - FIRST_KEY as i32).rem_euclid(PITCHES_PER_OCTAVE as i32) as u8
}

/// Extract the octave from a MIDI key.
///
/// Total over the whole MIDI range; keys below A0 report octave 0.
pub fn decode_octave(key: u8) -> u8 {
    (key as i32 - FIRST_KEY as i32)
        .div_euclid(PITCHES_PER_OCTAVE as i32)
        .max(0) as u8
}

/// Convert a normalized velocity in [0, 1] to a MIDI velocity byte.
///
/// The output range is [1, 127]: a note-on with velocity 0 means note-off in
/// MIDI semantics, so the scale bottoms out at 1 rather than silence.
pub fn encode_velocity(velocity: f32) -> u8 {
    debug_assert!((0.0..=1.0).contains(&velocity));
    let clamped = velocity.clamp(0.0, 1.0);
    (clamped * 126.0).floor() as u8 + 1
}

/// Milliseconds per beat at the given tempo.
///
/// Tempo bounds ([`crate::params::BPM_MIN`], [`crate::params::BPM_MAX`]) are
/// enforced by `SoundParams`; this only requires bpm > 0.
pub fn ms_per_beat(bpm: u16) -> f64 {
    debug_assert!(bpm > 0);
    60_000.0 / bpm as f64
}
