//! drone - render and loop a drone from the command line
//!
//! Run with: cargo run --bin drone -- [BPM [KEY...]]
//!
//! KEY arguments are MIDI key numbers (21-116); without any, the session's
//! default note (A3, key 57) plays alone.

mod audio;
mod sine;

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use sine::SineRenderer;
use tempodrone_core::{key, DroneSession, Renderer};

const SAMPLE_RATE: u32 = 48_000;
const MAX_NOTES: usize = 8;
const NUM_REVERB_PRESETS: u8 = 6;

fn main() -> EyreResult<()> {
    env_logger::init();
    color_eyre::install()?;

    let mut args = std::env::args().skip(1);
    let bpm: u16 = match args.next() {
        Some(raw) => raw.parse().wrap_err("BPM must be an integer")?,
        None => 80,
    };
    let keys: Vec<u8> = args
        .map(|raw| raw.parse().wrap_err("KEY must be a MIDI key number"))
        .collect::<EyreResult<_>>()?;

    if keys.len() > MAX_NOTES {
        return Err(eyre!("at most {} notes", MAX_NOTES));
    }

    let mut session = DroneSession::new(MAX_NOTES, NUM_REVERB_PRESETS)?;
    session.set_bpm(bpm);

    // The session bootstraps one note; retune it to the first requested key
    // and add the rest.
    for (index, &requested) in keys.iter().enumerate() {
        let handle = if index == 0 {
            session.handles()[0]
        } else {
            session.add_note()?
        };
        session.set_pitch(handle, key::decode_pitch_class(requested))?;
        session.set_octave(handle, key::decode_octave(requested))?;
    }

    let snapshot = session.snapshot()?;
    println!("=== drone ===");
    println!("BPM: {}", session.params().bpm());
    println!("Keys: {:?}", snapshot.keys);
    println!(
        "Note/beat: {} ms / {} ms",
        snapshot.note_duration_ms, snapshot.beat_duration_ms
    );

    let buffer = SineRenderer.render(&snapshot, SAMPLE_RATE);
    audio::play_loop(buffer, SAMPLE_RATE)
}
