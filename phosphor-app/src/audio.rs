//! Audio transport - cpal output fed from a lock-free sample ring
//!
//! The transport owns its thread: it opens the default output device, hangs
//! a pop-only callback on the stream, and spends the rest of its life topping
//! up the ring from the track cursor. The callback never locks and never
//! blocks; an underrun plays silence for the missing samples.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use ringbuf::traits::{Consumer, Observer, Producer, Split};
use ringbuf::HeapRb;
use thiserror::Error;

use phosphor_engine::{DemoEvent, Track, TrackCursor};

/// Samples rendered per top-up block.
const BLOCK_SAMPLES: usize = 256;
/// Ring capacity: several blocks of slack between the producer and the
/// callback.
const RING_CAPACITY: usize = BLOCK_SAMPLES * 8;

/// Setup failures at the audio boundary. All of them are fatal: a
/// fixed-timeline production has no degraded mode worth running.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio output device available")]
    NoDevice,
    #[error("failed to query output config: {0}")]
    Config(#[from] cpal::DefaultStreamConfigError),
    #[error("failed to build audio stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),
    #[error("failed to start audio stream: {0}")]
    Play(#[from] cpal::PlayStreamError),
}

/// Audio thread body. Reports a fatal setup error through the event channel
/// and returns; otherwise streams until shutdown.
pub fn run_audio(events: crossbeam_channel::Sender<DemoEvent>, shutdown: Arc<AtomicBool>) {
    if let Err(err) = stream_track(&shutdown) {
        tracing::error!("audio transport failed: {err}");
        let _ = events.try_send(DemoEvent::AudioFault(err.to_string()));
    }
}

fn stream_track(shutdown: &AtomicBool) -> Result<(), AudioError> {
    let host = cpal::default_host();
    let device = host.default_output_device().ok_or(AudioError::NoDevice)?;
    let config = device.default_output_config()?;

    let sample_rate = config.sample_rate().0;
    let channels = config.channels() as usize;

    let (mut producer, mut consumer) = HeapRb::<f32>::new(RING_CAPACITY).split();

    let stream = device.build_output_stream(
        &config.into(),
        move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
            // Pop-only: silence on underrun, no locks in the callback.
            for frame in data.chunks_mut(channels) {
                let sample = consumer.try_pop().unwrap_or(0.0);
                for out in frame.iter_mut() {
                    *out = sample;
                }
            }
        },
        |err| {
            tracing::error!("audio stream error: {err}");
        },
        None,
    )?;
    stream.play()?;

    let track = Track::render();
    let mut cursor = TrackCursor::new(sample_rate);
    let mut block = [0.0f32; BLOCK_SAMPLES];

    tracing::info!(sample_rate, channels, "audio transport running");
    while !shutdown.load(Ordering::Relaxed) {
        while producer.vacant_len() >= BLOCK_SAMPLES {
            cursor.fill(&track, &mut block);
            producer.push_slice(&block);
        }
        thread::sleep(Duration::from_millis(2));
    }
    Ok(())
}
