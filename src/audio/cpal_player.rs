//! Live sound backend on the default output device (desktop, `playback` feature)
//!
//! Triggers are rendered on the caller's thread and queued; the output
//! callback drains the queue and plays silence when it is empty, so
//! `play_notes` never blocks the frame loop.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use super::synth::render_chord;
use super::SoundPlayer;
use crate::error::SoundError;

/// Upper bound on queued samples (about ten seconds at 48 kHz)
const MAX_QUEUED_SAMPLES: usize = 480_000;

pub struct CpalPlayer {
    _stream: cpal::Stream,
    queue: Arc<Mutex<VecDeque<f32>>>,
    sample_rate: u32,
    amplitude: f32,
}

impl CpalPlayer {
    /// Open and start a stream on the default output device
    pub fn open(amplitude: f32) -> Result<Self, SoundError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| SoundError::BackendUnavailable {
                backend: "live".to_string(),
                reason: "No default output device found".to_string(),
            })?;

        let config = device
            .default_output_config()
            .map_err(|e| SoundError::StreamOpenFailed {
                reason: format!("Failed to get default output config: {:?}", e),
            })?;

        let stream_config: cpal::StreamConfig = config.clone().into();
        let channels_count = stream_config.channels as usize;
        let sample_rate = stream_config.sample_rate.0;

        let queue: Arc<Mutex<VecDeque<f32>>> = Arc::new(Mutex::new(VecDeque::new()));
        let callback_queue = Arc::clone(&queue);

        let err_fn = |err| log::error!("[SoundEngine] Output stream error: {}", err);

        let stream = match config.sample_format() {
            cpal::SampleFormat::F32 => device.build_output_stream(
                &stream_config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    // Never wait on the producer inside the audio callback
                    let mut pending = callback_queue.try_lock().ok();
                    for frame in data.chunks_mut(channels_count) {
                        let value = pending
                            .as_mut()
                            .and_then(|q| q.pop_front())
                            .unwrap_or(0.0);
                        for sample in frame.iter_mut() {
                            *sample = value;
                        }
                    }
                },
                err_fn,
                None,
            ),
            _ => {
                return Err(SoundError::StreamOpenFailed {
                    reason: "Only F32 sample format is currently supported for output".to_string(),
                })
            }
        }
        .map_err(|e| SoundError::StreamOpenFailed {
            reason: format!("{:?}", e),
        })?;

        stream.play().map_err(|e| SoundError::StreamOpenFailed {
            reason: format!("Output start failed: {}", e),
        })?;

        Ok(Self {
            _stream: stream,
            queue,
            sample_rate,
            amplitude,
        })
    }
}

impl SoundPlayer for CpalPlayer {
    fn play_notes(&self, notes: &[&str], duration_secs: f32) {
        let samples = render_chord(notes, duration_secs, self.sample_rate, self.amplitude);
        match self.queue.lock() {
            Ok(mut queue) => {
                if queue.len() + samples.len() > MAX_QUEUED_SAMPLES {
                    log::warn!("[SoundEngine] Output queue full, dropping {:?}", notes);
                    return;
                }
                queue.extend(samples);
            }
            Err(_) => log::error!("[SoundEngine] Output queue lock poisoned"),
        }
    }

    fn name(&self) -> &'static str {
        "live"
    }
}
