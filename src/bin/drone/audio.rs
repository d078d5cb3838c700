//! Output-stream plumbing: loop one rendered PCM buffer through cpal.

use std::sync::{Arc, Mutex};

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

/// Position within the looped buffer, shared with the audio thread.
struct LoopState {
    buffer: Vec<f32>,
    frame: usize,
}

/// Play `buffer` (one mono loop period at `sample_rate`) until interrupted.
pub fn play_loop(buffer: Vec<f32>, sample_rate: u32) -> EyreResult<()> {
    if buffer.is_empty() {
        return Err(eyre!("nothing to play: empty render buffer"));
    }

    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;

    let config = cpal::StreamConfig {
        channels: 2,
        sample_rate: cpal::SampleRate(sample_rate),
        buffer_size: cpal::BufferSize::Default,
    };
    let channels = config.channels as usize;

    let state = Arc::new(Mutex::new(LoopState { buffer, frame: 0 }));
    let state_clone = state.clone();

    let stream = device
        .build_output_stream(
            &config,
            move |data: &mut [f32], _| {
                let mut state = state_clone.lock().unwrap();
                let len = state.buffer.len();
                for out_frame in data.chunks_mut(channels) {
                    let sample = state.buffer[state.frame % len];
                    for out in out_frame.iter_mut() {
                        *out = sample;
                    }
                    state.frame = (state.frame + 1) % len;
                }
            },
            |err| eprintln!("audio error: {}", err),
            None,
        )
        .wrap_err("failed to build output stream")?;

    stream.play().wrap_err("failed to start playback")?;

    println!("Playing... Press Ctrl+C to stop");
    loop {
        std::thread::sleep(std::time::Duration::from_millis(100));
    }
}
