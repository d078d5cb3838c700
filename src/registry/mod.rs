//! Note registry: a fixed-capacity pool of note slots.
//!
//! Each slot holds one MIDI key and is addressed by an opaque `usize` handle.
//! Handles cycle `Free -> Occupied -> Free`; the free and occupied sets
//! partition the handle space at all times. Occupied handles are kept in
//! insertion order, which doubles as display order for the caller's note
//! list.
//!
//! The registry also owns the active [`KeyRange`]. Whenever a requested key
//! falls outside it, the registry rounds to the nearest valid key instead of
//! failing, so the held notes always stay playable on the current
//! instrument.

use log::debug;

use crate::error::SoundError;
use crate::key::{self, KeyRange, KEY_MAX};

/// Key assigned to the first note of a fresh registry: pitch class 0 (A),
/// octave 3.
const STARTING_DEFAULT_PITCH_CLASS: u8 = 0;
const STARTING_DEFAULT_OCTAVE: u8 = 3;

pub struct NoteRegistry {
    /// One entry per handle; `Some(key)` while occupied.
    slots: Vec<Option<u8>>,
    /// Free handles, unordered. Allocation takes the lowest.
    free: Vec<usize>,
    /// Occupied handles in insertion order.
    occupied: Vec<usize>,
    /// Last explicitly set key; assigned (after rounding) to new notes.
    default_key: u8,
    range: KeyRange,
}

impl NoteRegistry {
    /// Create an empty registry with `capacity` note slots (the synth's
    /// maximum polyphony) and a fully open key range.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
            free: (0..capacity).collect(),
            occupied: Vec::with_capacity(capacity),
            default_key: STARTING_DEFAULT_PITCH_CLASS
                + key::PITCHES_PER_OCTAVE * STARTING_DEFAULT_OCTAVE
                + key::FIRST_KEY,
            range: KeyRange::full(),
        }
    }

    /// Whether there is no room for new notes.
    pub fn is_full(&self) -> bool {
        self.free.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.occupied.is_empty()
    }

    /// Number of occupied notes.
    pub fn len(&self) -> usize {
        self.occupied.len()
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Occupied handles in insertion order.
    pub fn handles(&self) -> &[usize] {
        &self.occupied
    }

    pub fn key_range(&self) -> &KeyRange {
        &self.range
    }

    /// Allocate the lowest free handle and assign it the current default
    /// key, rounded against the active key range.
    ///
    /// Fails with `Exhausted` when the pool is full.
    pub fn add_note(&mut self) -> Result<usize, SoundError> {
        let lowest = self
            .free
            .iter()
            .copied()
            .min()
            .ok_or(SoundError::Exhausted)?;
        self.free.retain(|&h| h != lowest);
        self.occupied.push(lowest);
        self.slots[lowest] = Some(self.default_key);
        self.round_key(lowest, self.default_key)?;
        Ok(lowest)
    }

    /// Return an occupied handle to the free pool.
    pub fn delete_note(&mut self, handle: usize) -> Result<(), SoundError> {
        let position = self
            .occupied
            .iter()
            .position(|&h| h == handle)
            .ok_or(SoundError::NotFound { handle })?;
        self.occupied.remove(position);
        self.slots[handle] = None;
        self.free.push(handle);
        Ok(())
    }

    /// The MIDI key held at `handle`.
    pub fn key(&self, handle: usize) -> Result<u8, SoundError> {
        self.slots
            .get(handle)
            .copied()
            .flatten()
            .ok_or(SoundError::NotFound { handle })
    }

    pub fn pitch_class(&self, handle: usize) -> Result<u8, SoundError> {
        Ok(key::decode_pitch_class(self.key(handle)?))
    }

    pub fn octave(&self, handle: usize) -> Result<u8, SoundError> {
        Ok(key::decode_octave(self.key(handle)?))
    }

    /// Set the pitch class of a note, keeping its octave where possible.
    ///
    /// Fails with `Unavailable` when the pitch class has no playable octave
    /// at all. When the note's current octave is not playable for the new
    /// pitch class, the nearest playable octave is chosen (ties toward the
    /// lower octave). Returns the resulting key.
    pub fn set_pitch(&mut self, handle: usize, pitch_class: u8) -> Result<u8, SoundError> {
        // Rounding can park a note above G#7 (keys 117-127), which decodes
        // to octave 8; clamp so the re-encode below stays in the encodable
        // range and the octave search still applies.
        let current_octave = self.octave(handle)?.min(key::OCTAVE_MAX);
        let choices = self.range.octave_choices(pitch_class);
        if choices.is_empty() {
            return Err(SoundError::Unavailable {
                pitch_class,
                octave: None,
            });
        }

        let desired = key::encode_key(pitch_class, current_octave)?;
        let new_key = if self.range.contains(desired) {
            desired
        } else {
            // Ascending scan with strict comparison: equal distances keep
            // the lower octave.
            let nearest = choices
                .iter()
                .copied()
                .min_by_key(|&octave| (octave as i32 - current_octave as i32).abs())
                .unwrap();
            key::encode_key(pitch_class, nearest)?
        };
        self.set_key(handle, new_key);
        Ok(new_key)
    }

    /// Set the octave of a note, keeping its pitch class.
    ///
    /// Unlike [`set_pitch`](Self::set_pitch) this never rounds: the octave
    /// choices offered to the caller (via [`octave_choices`](Self::octave_choices))
    /// are all valid, so an invalid request is reported as `Unavailable`
    /// rather than silently moved.
    pub fn set_octave(&mut self, handle: usize, octave: u8) -> Result<u8, SoundError> {
        let pitch_class = self.pitch_class(handle)?;
        let desired = key::encode_key(pitch_class, octave)?;
        if !self.range.contains(desired) {
            return Err(SoundError::Unavailable {
                pitch_class,
                octave: Some(octave),
            });
        }
        self.set_key(handle, desired);
        Ok(desired)
    }

    /// Move a note to the valid key nearest `desired`, preferring the lower
    /// key on ties. Returns the chosen key.
    ///
    /// The forward scan runs from `desired` up to the top of the MIDI range;
    /// once it has a match at distance `d`, the backward scan only needs to
    /// reach `desired - d` (anything lower is known to be farther). With no
    /// forward match the backward bound degenerates to 0 and the whole lower
    /// range is scanned.
    ///
    /// Fails with `NoValidKey` only when the mask admits nothing anywhere,
    /// which mask validation is supposed to prevent.
    pub fn round_key(&mut self, handle: usize, desired: u8) -> Result<u8, SoundError> {
        self.key(handle)?;

        let forward = (desired..=KEY_MAX).find(|&k| self.range.contains(k));
        let backward_limit = match forward {
            Some(m) => desired.saturating_sub(m - desired),
            None => 0,
        };
        let backward = (backward_limit..=desired)
            .rev()
            .find(|&k| self.range.contains(k));

        let chosen = backward.or(forward).ok_or(SoundError::NoValidKey)?;
        self.set_key(handle, chosen);
        Ok(chosen)
    }

    /// Replace the active key range and pull every occupied note back into
    /// it. Called when the loaded instrument changes.
    pub fn set_key_range(&mut self, range: KeyRange) -> Result<(), SoundError> {
        self.range = range;
        for handle in self.occupied.clone() {
            let current = self.key(handle)?;
            let rounded = self.round_key(handle, current)?;
            if rounded != current {
                debug!(
                    "key range change moved note {} from key {} to {}",
                    handle, current, rounded
                );
            }
        }
        Ok(())
    }

    /// Octaves at which the pitch class is playable. Used both by the
    /// octave selection UI and by `set_pitch` rounding.
    pub fn octave_choices(&self, pitch_class: u8) -> Vec<u8> {
        self.range.octave_choices(pitch_class)
    }

    /// Pitch classes playable at some octave.
    pub fn pitch_choices(&self) -> Vec<u8> {
        self.range.pitch_choices()
    }

    /// Store a key and remember it as the default for the next added note.
    fn set_key(&mut self, handle: usize, key: u8) {
        self.slots[handle] = Some(key);
        self.default_key = key;
    }
}
