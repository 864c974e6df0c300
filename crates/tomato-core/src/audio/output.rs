//! Playback to the default output device via cpal.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::StreamConfig;

use super::decode::Clip;
use crate::error::AudioError;

struct PlaybackBuffer {
    samples: Vec<f32>,
    position: usize,
    finished: bool,
}

/// Play `clip` on the default output device, blocking until it has drained.
pub fn play_blocking(clip: Clip) -> Result<(), AudioError> {
    if clip.samples.is_empty() {
        return Ok(());
    }

    let device = cpal::default_host()
        .default_output_device()
        .ok_or_else(|| AudioError::Output("no default output device".into()))?;
    let config = StreamConfig {
        channels: 1,
        sample_rate: clip.sample_rate,
        buffer_size: cpal::BufferSize::Default,
    };

    let buffer = Arc::new(Mutex::new(PlaybackBuffer {
        samples: clip.samples,
        position: 0,
        finished: false,
    }));
    let shared = Arc::clone(&buffer);

    let stream = device
        .build_output_stream(
            &config,
            move |data: &mut [f32], _info: &cpal::OutputCallbackInfo| {
                let Ok(mut buf) = shared.lock() else {
                    return;
                };
                for sample in data.iter_mut() {
                    if buf.position < buf.samples.len() {
                        *sample = buf.samples[buf.position];
                        buf.position += 1;
                    } else {
                        *sample = 0.0;
                        buf.finished = true;
                    }
                }
            },
            |err| tracing::error!("audio output stream error: {err}"),
            None,
        )
        .map_err(|e| AudioError::Output(format!("failed to build output stream: {e}")))?;

    stream
        .play()
        .map_err(|e| AudioError::Output(format!("failed to start output stream: {e}")))?;

    loop {
        std::thread::sleep(Duration::from_millis(10));
        let finished = buffer
            .lock()
            .map(|b| b.finished)
            .map_err(|e| AudioError::Output(format!("playback buffer lock poisoned: {e}")))?;
        if finished {
            break;
        }
    }
    Ok(())
}
