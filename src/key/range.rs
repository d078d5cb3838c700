use crate::error::SoundError;

use super::{encode_key, KEY_COUNT, OCTAVE_MAX, PITCHES_PER_OCTAVE, PITCH_CLASS_MAX};

/// Per-instrument mask of which MIDI keys produce sound.
///
/// Replaced wholesale whenever the loaded program changes. A mask is only
/// accepted if it admits at least one full octave of keys; below that there
/// is no guarantee any pitch class has a playable octave, and the instrument
/// data is treated as unusable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRange {
    valid: [bool; KEY_COUNT],
}

impl KeyRange {
    /// A range admitting every MIDI key. Placeholder until the first
    /// instrument reports its real range.
    pub fn full() -> Self {
        Self {
            valid: [true; KEY_COUNT],
        }
    }

    /// Build a range from an explicit per-key mask.
    ///
    /// Fails with `InvalidRange` when fewer than 12 keys are valid.
    pub fn try_new(valid: [bool; KEY_COUNT]) -> Result<Self, SoundError> {
        let valid_keys = valid.iter().filter(|v| **v).count();
        if valid_keys < PITCHES_PER_OCTAVE as usize {
            return Err(SoundError::InvalidRange { valid_keys });
        }
        Ok(Self { valid })
    }

    /// Build a contiguous range covering `lo..=hi`, the shape SoundFont
    /// programs report.
    pub fn from_bounds(lo: u8, hi: u8) -> Result<Self, SoundError> {
        let mut valid = [false; KEY_COUNT];
        for key in lo..=hi.min(127) {
            valid[key as usize] = true;
        }
        Self::try_new(valid)
    }

    /// Whether the instrument can produce this key. O(1).
    pub fn contains(&self, key: u8) -> bool {
        self.valid[key as usize]
    }

    /// Number of valid keys in the mask.
    pub fn valid_count(&self) -> usize {
        self.valid.iter().filter(|v| **v).count()
    }

    /// All octaves at which the given pitch class is playable, ascending.
    pub fn octave_choices(&self, pitch_class: u8) -> Vec<u8> {
        (0..=OCTAVE_MAX)
            .filter(|&octave| {
                encode_key(pitch_class, octave)
                    .map(|key| self.contains(key))
                    .unwrap_or(false)
            })
            .collect()
    }

    /// Whether the pitch class is playable at any octave.
    pub fn has_pitch(&self, pitch_class: u8) -> bool {
        !self.octave_choices(pitch_class).is_empty()
    }

    /// All pitch classes playable at some octave, ascending. Drives the
    /// pitch selection UI.
    pub fn pitch_choices(&self) -> Vec<u8> {
        (0..=PITCH_CLASS_MAX)
            .filter(|&pitch_class| self.has_pitch(pitch_class))
            .collect()
    }
}

impl Default for KeyRange {
    fn default() -> Self {
        Self::full()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::{C, FIRST_KEY};

    #[test]
    fn full_range_contains_everything() {
        let range = KeyRange::full();
        assert_eq!(range.valid_count(), KEY_COUNT);
        assert!(range.contains(0));
        assert!(range.contains(127));
    }

    #[test]
    fn rejects_mask_below_one_octave() {
        let mut valid = [false; KEY_COUNT];
        for key in 60..71 {
            valid[key] = true; // 11 keys, one short
        }
        assert_eq!(
            KeyRange::try_new(valid),
            Err(SoundError::InvalidRange { valid_keys: 11 })
        );

        valid[71] = true;
        assert!(KeyRange::try_new(valid).is_ok());
    }

    #[test]
    fn from_bounds_is_inclusive() {
        let range = KeyRange::from_bounds(40, 80).unwrap();
        assert!(!range.contains(39));
        assert!(range.contains(40));
        assert!(range.contains(80));
        assert!(!range.contains(81));
        assert_eq!(range.valid_count(), 41);
    }

    #[test]
    fn from_bounds_rejects_narrow_span() {
        assert!(matches!(
            KeyRange::from_bounds(60, 65),
            Err(SoundError::InvalidRange { valid_keys: 6 })
        ));
    }

    #[test]
    fn octave_choices_ascend_and_respect_mask() {
        // C playable only at octaves 2 and 4 (keys 48 and 72). Padding
        // keys 117..127 sit above G#7 and cannot alias any octave choice.
        let mut valid = [false; KEY_COUNT];
        valid[48] = true;
        valid[72] = true;
        for key in 117..KEY_COUNT {
            valid[key] = true;
        }
        let range = KeyRange::try_new(valid).unwrap();
        assert_eq!(range.octave_choices(C), vec![2, 4]);
        assert!(range.has_pitch(C));
    }

    #[test]
    fn pitch_choices_skip_unplayable_classes() {
        // Only one octave of keys starting at A0: every pitch class playable
        // at exactly octave 0.
        let range = KeyRange::from_bounds(FIRST_KEY, FIRST_KEY + 11).unwrap();
        assert_eq!(range.pitch_choices().len(), 12);
        for pitch_class in 0..12 {
            assert_eq!(range.octave_choices(pitch_class), vec![0]);
        }
    }

    #[test]
    fn keys_below_a0_never_yield_octaves() {
        // Valid keys exist but none are encodable as pitch class + octave.
        let mut valid = [false; KEY_COUNT];
        for key in 0..21 {
            valid[key] = true;
        }
        let range = KeyRange::try_new(valid).unwrap();
        for pitch_class in 0..12 {
            assert!(range.octave_choices(pitch_class).is_empty());
        }
        assert!(range.pitch_choices().is_empty());
    }
}
