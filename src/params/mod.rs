//! Global sound parameters: everything about the rendered loop that is not
//! a note. Created once per session, mutated by user input, read whenever a
//! render snapshot is built.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::SoundError;

/// Slowest selectable tempo.
pub const BPM_MIN: u16 = 20;
/// Fastest selectable tempo.
pub const BPM_MAX: u16 = 512;

const DEFAULT_BPM: u16 = 80;
const DEFAULT_VELOCITY: f32 = 1.0;
const DEFAULT_DURATION: f32 = 0.95;
const DEFAULT_REVERB_PRESET: u8 = 1;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SoundParams {
    bpm: u16,
    /// Normalized note velocity in [0, 1].
    velocity: f32,
    /// Note length as a fraction of the beat, in [0, 1].
    duration: f32,
    reverb_preset: u8,
    max_reverb_preset: u8,
    volume_boost: bool,
}

impl SoundParams {
    /// Defaults for a fresh session, with the reverb preset clamped to what
    /// the instrument bank actually provides.
    pub fn new(num_reverb_presets: u8) -> Self {
        let max_reverb_preset = num_reverb_presets.saturating_sub(1);
        Self {
            bpm: DEFAULT_BPM,
            velocity: DEFAULT_VELOCITY,
            duration: DEFAULT_DURATION,
            reverb_preset: DEFAULT_REVERB_PRESET.min(max_reverb_preset),
            max_reverb_preset,
            volume_boost: false,
        }
    }

    pub fn bpm(&self) -> u16 {
        self.bpm
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn reverb_preset(&self) -> u8 {
        self.reverb_preset
    }

    pub fn max_reverb_preset(&self) -> u8 {
        self.max_reverb_preset
    }

    pub fn volume_boost(&self) -> bool {
        self.volume_boost
    }

    /// Set the tempo, clamped to [BPM_MIN, BPM_MAX]. Returns the value
    /// actually applied so the caller can echo it back to its input field.
    pub fn set_bpm(&mut self, desired: u16) -> u16 {
        self.bpm = desired.clamp(BPM_MIN, BPM_MAX);
        self.bpm
    }

    pub fn set_velocity(&mut self, desired: f32) -> Result<(), SoundError> {
        if !(0.0..=1.0).contains(&desired) {
            return Err(SoundError::InvalidArgument {
                what: "velocity outside [0, 1]",
            });
        }
        self.velocity = desired;
        Ok(())
    }

    pub fn set_duration(&mut self, desired: f32) -> Result<(), SoundError> {
        if !(0.0..=1.0).contains(&desired) {
            return Err(SoundError::InvalidArgument {
                what: "duration outside [0, 1]",
            });
        }
        self.duration = desired;
        Ok(())
    }

    pub fn set_reverb_preset(&mut self, preset: u8) -> Result<(), SoundError> {
        if preset > self.max_reverb_preset {
            return Err(SoundError::InvalidArgument {
                what: "reverb preset above bank maximum",
            });
        }
        self.reverb_preset = preset;
        Ok(())
    }

    pub fn set_volume_boost(&mut self, boost: bool) {
        self.volume_boost = boost;
    }

    /// Re-clamp the reverb preset when a new bank reports a different
    /// preset count.
    pub fn set_num_reverb_presets(&mut self, num_reverb_presets: u8) {
        self.max_reverb_preset = num_reverb_presets.saturating_sub(1);
        self.reverb_preset = self.reverb_preset.min(self.max_reverb_preset);
    }
}
