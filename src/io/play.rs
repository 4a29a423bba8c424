//! Playback of a [`Signal`] through the default output device.
//!
//! A cpal output stream pulls from a ring buffer while the caller's thread
//! pushes the signal into it. Playback is blocking; a [`CancelToken`] lets
//! another thread (a key listener, a signal handler) stop it early.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleRate, StreamConfig};
use ringbuf::traits::{Consumer, Observer, Producer, Split};
use ringbuf::HeapRb;

use crate::core::types::Signal;
use crate::error::{Result, TransformError};

/// Ring buffer capacity: ~2 seconds of stereo audio at 44100 Hz.
const RING_BUFFER_SIZE: usize = 44100 * 2 * 2;

/// How long the feeder thread sleeps when the ring buffer is full.
const FEED_INTERVAL: Duration = Duration::from_millis(10);

/// Cooperative cancellation flag shared between the playback loop and
/// whoever wants to stop it. Cloning shares the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Idempotent.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Plays the signal to the default output device, blocking until the last
/// sample has been rendered or the token is cancelled.
///
/// The stream is opened at the signal's own channel count and sample rate;
/// no resampling happens here.
///
/// # Errors
/// Returns [`TransformError::Device`] if no output device exists or the
/// stream cannot be built at the signal's configuration.
pub fn play(signal: &Signal, cancel: &CancelToken) -> Result<()> {
    if signal.data.is_empty() {
        return Ok(());
    }

    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| TransformError::Device("no audio output device found".into()))?;

    let config = StreamConfig {
        channels: signal.channels,
        sample_rate: SampleRate(signal.sample_rate),
        buffer_size: cpal::BufferSize::Default,
    };

    let rb = HeapRb::<f32>::new(RING_BUFFER_SIZE);
    let (mut producer, mut consumer) = rb.split();

    // The callback owns the consumer, so completion is tracked through a
    // shared count of samples actually rendered.
    let played = Arc::new(AtomicUsize::new(0));
    let played_cb = played.clone();

    let stream = device
        .build_output_stream(
            &config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                let available = consumer.occupied_len();
                let to_read = data.len().min(available);
                let read = consumer.pop_slice(&mut data[..to_read]);
                played_cb.fetch_add(read, Ordering::Relaxed);

                // Underrun or end of signal: pad with silence.
                for sample in &mut data[read..] {
                    *sample = 0.0;
                }
            },
            move |err| {
                log::error!("audio output error: {err}");
            },
            None,
        )
        .map_err(|e| TransformError::Device(format!("failed to build output stream: {e}")))?;

    stream
        .play()
        .map_err(|e| TransformError::Device(format!("failed to start stream: {e}")))?;

    log::debug!(
        "playing {} frames at {} Hz on {} channel(s)",
        signal.num_frames(),
        signal.sample_rate,
        signal.channels
    );

    // Feed the ring buffer until the whole signal is queued.
    let mut pos = 0usize;
    while pos < signal.data.len() {
        if cancel.is_cancelled() {
            return Ok(());
        }
        pos += producer.push_slice(&signal.data[pos..]);
        std::thread::sleep(FEED_INTERVAL);
    }

    // Drain: wait for the callback to render everything that was queued.
    while played.load(Ordering::Relaxed) < signal.data.len() {
        if cancel.is_cancelled() {
            return Ok(());
        }
        std::thread::sleep(FEED_INTERVAL);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_token_shared_between_clones() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!token.is_cancelled());
        clone.cancel();
        assert!(token.is_cancelled());
        // Cancelling again is a no-op.
        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn test_empty_signal_returns_immediately() {
        let signal = Signal::from_mono(vec![], 44100);
        // Must not touch the audio device at all for an empty signal.
        assert!(play(&signal, &CancelToken::new()).is_ok());
    }
}
