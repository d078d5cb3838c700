/// Errors produced by the note registry, key-range mask, and snapshot builder.
///
/// The variants split into caller bugs (`InvalidArgument`, `NotFound`,
/// `EmptyNoteSet`), recoverable conditions the caller should surface to the
/// user (`Unavailable`, `Exhausted`), and fatal instrument-data problems
/// (`InvalidRange`, `NoValidKey`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundError {
    /// An input was outside its documented domain (pitch class, octave,
    /// velocity, duration, reverb preset).
    InvalidArgument { what: &'static str },
    /// The handle does not refer to an occupied note slot.
    NotFound { handle: usize },
    /// The requested pitch class (or pitch class + octave combination) has no
    /// valid key under the current instrument's key range.
    Unavailable {
        pitch_class: u8,
        octave: Option<u8>,
    },
    /// The note pool is full; no free handle remains.
    Exhausted,
    /// The key-range mask admits no key at all. Prevented by the mask
    /// validation in `KeyRange::try_new`, so hitting this indicates corrupt
    /// instrument data.
    NoValidKey,
    /// A candidate key-range mask admits fewer than one octave of keys and
    /// was rejected.
    InvalidRange { valid_keys: usize },
    /// A render snapshot was requested with zero occupied notes. Callers are
    /// expected to check the note count before starting playback.
    EmptyNoteSet,
}

impl std::fmt::Display for SoundError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SoundError::InvalidArgument { what } => {
                write!(f, "argument out of range: {}", what)
            }
            SoundError::NotFound { handle } => {
                write!(f, "no note exists at handle {}", handle)
            }
            SoundError::Unavailable {
                pitch_class,
                octave: Some(octave),
            } => {
                write!(
                    f,
                    "pitch class {} at octave {} is outside the instrument's key range",
                    pitch_class, octave
                )
            }
            SoundError::Unavailable {
                pitch_class,
                octave: None,
            } => {
                write!(
                    f,
                    "pitch class {} has no playable octave under the current instrument",
                    pitch_class
                )
            }
            SoundError::Exhausted => {
                write!(f, "no slots left for new notes")
            }
            SoundError::NoValidKey => {
                write!(f, "failed to find any valid key")
            }
            SoundError::InvalidRange { valid_keys } => {
                write!(
                    f,
                    "key range admits only {} keys (need at least one full octave)",
                    valid_keys
                )
            }
            SoundError::EmptyNoteSet => {
                write!(f, "cannot build a render snapshot with no notes")
            }
        }
    }
}

impl std::error::Error for SoundError {}
