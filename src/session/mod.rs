//! Drone session: the owning object behind one synthesizer instance.
//!
//! The session couples a [`NoteRegistry`] with its [`SoundParams`] and turns
//! every successful mutation into a [`SoundEvent`]. The owner drains the
//! event queue after each batch of user input and decides whether to
//! re-render; audio-side consumers can subscribe through an [`EventSink`]
//! instead.
//!
//! All mutation goes through `&mut self`, which is the mutual-exclusion
//! contract: a snapshot can never observe a half-applied mutation because
//! the borrow checker serializes them. Callers that share a session across
//! threads wrap it in their own `Mutex`, the way the playback binary does.

use std::collections::VecDeque;

use log::debug;

use crate::error::SoundError;
use crate::key::{KeyRange, KEY_COUNT};
use crate::params::SoundParams;
use crate::registry::NoteRegistry;
use crate::render::{build_snapshot, RenderSnapshot};

/// What changed, at the granularity a playback layer cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEvent {
    /// A note was added, deleted, or moved to a different key.
    NotesChanged,
    /// Tempo, velocity, duration, reverb, or boost changed.
    ParamsChanged,
    /// A new instrument installed its key range (notes may have moved too).
    InstrumentChanged,
}

/// Receiver half of the change notification seam.
pub trait EventSink {
    fn push(&mut self, event: SoundEvent);
}

#[cfg(feature = "rtrb")]
impl EventSink for rtrb::Producer<SoundEvent> {
    fn push(&mut self, event: SoundEvent) {
        // A full ring means the consumer is already behind on events that
        // each carry the same instruction: re-read the session. Dropping is
        // safe.
        let _ = rtrb::Producer::push(self, event);
    }
}

pub struct DroneSession {
    registry: NoteRegistry,
    params: SoundParams,
    pending: VecDeque<SoundEvent>,
    sinks: Vec<Box<dyn EventSink + Send>>,
}

impl DroneSession {
    /// Create a session with `max_notes` slots (the synth's polyphony) and
    /// the reverb preset count reported by the driver.
    ///
    /// Starts with one note occupied so there is always something to play;
    /// fails with `Exhausted` only if `max_notes` is zero.
    pub fn new(max_notes: usize, num_reverb_presets: u8) -> Result<Self, SoundError> {
        let mut registry = NoteRegistry::new(max_notes);
        registry.add_note()?;
        Ok(Self {
            registry,
            params: SoundParams::new(num_reverb_presets),
            pending: VecDeque::new(),
            sinks: Vec::new(),
        })
    }

    pub fn registry(&self) -> &NoteRegistry {
        &self.registry
    }

    pub fn params(&self) -> &SoundParams {
        &self.params
    }

    pub fn note_count(&self) -> usize {
        self.registry.len()
    }

    pub fn is_full(&self) -> bool {
        self.registry.is_full()
    }

    /// Occupied note handles in display order.
    pub fn handles(&self) -> &[usize] {
        self.registry.handles()
    }

    // Note mutations. Each forwards to the registry and reports
    // `NotesChanged` on success.

    pub fn add_note(&mut self) -> Result<usize, SoundError> {
        let handle = self.registry.add_note()?;
        self.emit(SoundEvent::NotesChanged);
        Ok(handle)
    }

    pub fn delete_note(&mut self, handle: usize) -> Result<(), SoundError> {
        self.registry.delete_note(handle)?;
        self.emit(SoundEvent::NotesChanged);
        Ok(())
    }

    pub fn set_pitch(&mut self, handle: usize, pitch_class: u8) -> Result<u8, SoundError> {
        let key = self.registry.set_pitch(handle, pitch_class)?;
        self.emit(SoundEvent::NotesChanged);
        Ok(key)
    }

    pub fn set_octave(&mut self, handle: usize, octave: u8) -> Result<u8, SoundError> {
        let key = self.registry.set_octave(handle, octave)?;
        self.emit(SoundEvent::NotesChanged);
        Ok(key)
    }

    // Parameter mutations.

    pub fn set_bpm(&mut self, desired: u16) -> u16 {
        let applied = self.params.set_bpm(desired);
        self.emit(SoundEvent::ParamsChanged);
        applied
    }

    pub fn set_velocity(&mut self, desired: f32) -> Result<(), SoundError> {
        self.params.set_velocity(desired)?;
        self.emit(SoundEvent::ParamsChanged);
        Ok(())
    }

    pub fn set_duration(&mut self, desired: f32) -> Result<(), SoundError> {
        self.params.set_duration(desired)?;
        self.emit(SoundEvent::ParamsChanged);
        Ok(())
    }

    pub fn set_reverb_preset(&mut self, preset: u8) -> Result<(), SoundError> {
        self.params.set_reverb_preset(preset)?;
        self.emit(SoundEvent::ParamsChanged);
        Ok(())
    }

    pub fn set_volume_boost(&mut self, boost: bool) {
        self.params.set_volume_boost(boost);
        self.emit(SoundEvent::ParamsChanged);
    }

    /// Install the key range reported by a newly loaded instrument program.
    ///
    /// Fails with `InvalidRange` (and leaves the old range active) when the
    /// mask admits fewer than one octave of keys. On success every occupied
    /// note has been re-rounded into the new range.
    pub fn on_instrument_changed(&mut self, mask: [bool; KEY_COUNT]) -> Result<(), SoundError> {
        let range = KeyRange::try_new(mask)?;
        debug!(
            "instrument change: {} valid keys, {} notes to revalidate",
            range.valid_count(),
            self.registry.len()
        );
        self.registry.set_key_range(range)?;
        self.emit(SoundEvent::InstrumentChanged);
        Ok(())
    }

    /// Build the render-parameter bundle for the current state.
    pub fn snapshot(&self) -> Result<RenderSnapshot, SoundError> {
        build_snapshot(&self.registry, &self.params)
    }

    /// Events accumulated since the last drain, oldest first.
    pub fn drain_events(&mut self) -> impl Iterator<Item = SoundEvent> + '_ {
        self.pending.drain(..)
    }

    /// Forward all future events into `sink` as well as the internal queue.
    pub fn attach_sink(&mut self, sink: Box<dyn EventSink + Send>) {
        self.sinks.push(sink);
    }

    fn emit(&mut self, event: SoundEvent) {
        self.pending.push_back(event);
        for sink in &mut self.sinks {
            sink.push(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_starts_with_one_note() {
        let session = DroneSession::new(8, 6).unwrap();
        assert_eq!(session.note_count(), 1);
        assert_eq!(session.handles(), &[0]);
    }

    #[test]
    fn zero_capacity_session_fails() {
        assert_eq!(DroneSession::new(0, 6).err(), Some(SoundError::Exhausted));
    }

    #[test]
    fn mutations_queue_events() {
        let mut session = DroneSession::new(8, 6).unwrap();
        session.drain_events().for_each(drop);

        let handle = session.add_note().unwrap();
        session.set_bpm(120);
        session.delete_note(handle).unwrap();

        let events: Vec<SoundEvent> = session.drain_events().collect();
        assert_eq!(
            events,
            vec![
                SoundEvent::NotesChanged,
                SoundEvent::ParamsChanged,
                SoundEvent::NotesChanged,
            ]
        );
        // Drained: nothing left.
        assert_eq!(session.drain_events().count(), 0);
    }

    #[test]
    fn failed_mutations_emit_nothing() {
        let mut session = DroneSession::new(1, 6).unwrap();
        session.drain_events().for_each(drop);

        assert!(session.add_note().is_err()); // full
        assert!(session.set_velocity(2.0).is_err());
        assert!(session.delete_note(7).is_err());

        assert_eq!(session.drain_events().count(), 0);
    }

    #[test]
    fn instrument_change_rounds_notes_and_emits() {
        let mut session = DroneSession::new(4, 6).unwrap();
        session.drain_events().for_each(drop);

        // Default note sits at key 57; restrict the range to 60..=80.
        let mut mask = [false; KEY_COUNT];
        for key in 60..=80 {
            mask[key] = true;
        }
        session.on_instrument_changed(mask).unwrap();

        let handle = session.handles()[0];
        assert_eq!(session.registry().key(handle).unwrap(), 60);
        assert_eq!(
            session.drain_events().collect::<Vec<_>>(),
            vec![SoundEvent::InstrumentChanged]
        );
    }

    #[test]
    fn rejected_mask_leaves_range_intact() {
        let mut session = DroneSession::new(4, 6).unwrap();
        let mut mask = [false; KEY_COUNT];
        mask[60] = true;
        assert_eq!(
            session.on_instrument_changed(mask),
            Err(SoundError::InvalidRange { valid_keys: 1 })
        );
        // Old (full) range still active: any octave settable.
        let handle = session.handles()[0];
        assert!(session.set_octave(handle, 7).is_ok());
    }

    #[test]
    fn snapshot_reflects_session_state() {
        let mut session = DroneSession::new(4, 6).unwrap();
        session.set_bpm(60);
        session.set_duration(0.5).unwrap();
        session.set_volume_boost(true);

        let snapshot = session.snapshot().unwrap();
        assert_eq!(snapshot.keys, vec![57]);
        assert_eq!(snapshot.beat_duration_ms, 1000);
        assert_eq!(snapshot.note_duration_ms, 500);
        assert!(snapshot.volume_boost);
    }

    #[cfg(feature = "rtrb")]
    #[test]
    fn events_flow_into_attached_ring_buffer() {
        let (producer, mut consumer) = rtrb::RingBuffer::new(8);
        let mut session = DroneSession::new(8, 6).unwrap();
        session.attach_sink(Box::new(producer));

        session.add_note().unwrap();
        session.set_bpm(90);

        assert_eq!(consumer.pop().unwrap(), SoundEvent::NotesChanged);
        assert_eq!(consumer.pop().unwrap(), SoundEvent::ParamsChanged);
        assert!(consumer.pop().is_err());
    }
}
