//! Core model for a MIDI drone/metronome synthesizer: which keys to sound,
//! which keys the loaded instrument can sound, and the parameter bundle the
//! rendering engine consumes.

pub mod error;
pub mod key; // MIDI key codec + per-instrument key ranges
pub mod params; // Tempo, velocity, duration, reverb, boost
pub mod registry; // Note slots, handle pool, nearest-key rounding
pub mod render; // Snapshot handed to the synthesis engine
pub mod session; // Owning object + change events

pub use error::SoundError;
pub use key::KeyRange;
pub use params::SoundParams;
pub use registry::NoteRegistry;
pub use render::{build_snapshot, RenderSnapshot, Renderer};
pub use session::{DroneSession, EventSink, SoundEvent};
