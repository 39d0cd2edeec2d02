//! Audio playback sinks.
//!
//! A sink consumes a decoded [`PcmBuffer`] and returns a [`PlaybackHandle`]:
//! a one-shot completion signal with explicit cancellation. Only one
//! narration plays at a time; the session releases the previous handle when
//! a new narration starts or a stop is requested.
//!
//! [`RodioSink`] (feature `playback`) plays through the host's default
//! output device. [`NullSink`] records buffers without producing sound and
//! backs tests and the no-audio CLI paths.

use std::fmt;
use std::sync::{Arc, Mutex};

use tokio::sync::oneshot;

use crate::audio::PcmBuffer;
use crate::error::Result;

/// Consumer of decoded audio buffers.
pub trait AudioSink {
    /// Start playing a buffer; returns a handle for stop/completion.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink cannot accept the buffer.
    fn play(&self, buffer: PcmBuffer) -> Result<PlaybackHandle>;
}

/// Handle to an in-progress playback.
///
/// Completion is a one-shot event: [`wait`](Self::wait) resolves when the
/// audio finishes or is stopped. [`stop`](Self::stop) releases the audio
/// resource immediately.
pub struct PlaybackHandle {
    stop: Option<Box<dyn FnOnce() + Send>>,
    done: oneshot::Receiver<()>,
    finished: bool,
}

impl PlaybackHandle {
    /// Assemble a handle from a stop action and a completion receiver.
    #[must_use]
    pub fn new(stop: impl FnOnce() + Send + 'static, done: oneshot::Receiver<()>) -> Self {
        Self {
            stop: Some(Box::new(stop)),
            done,
            finished: false,
        }
    }

    /// Stop playback and release the audio resource. Idempotent.
    pub fn stop(&mut self) {
        if let Some(stop) = self.stop.take() {
            stop();
        }
        self.finished = true;
    }

    /// Whether playback has finished or been stopped, without blocking.
    pub fn is_finished(&mut self) -> bool {
        if self.finished {
            return true;
        }
        match self.done.try_recv() {
            Ok(()) | Err(oneshot::error::TryRecvError::Closed) => {
                self.finished = true;
                true
            }
            Err(oneshot::error::TryRecvError::Empty) => false,
        }
    }

    /// Wait until playback finishes or is stopped.
    pub async fn wait(self) {
        if self.finished {
            return;
        }
        // A dropped sender also counts as completion.
        let _ = self.done.await;
    }
}

impl fmt::Debug for PlaybackHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackHandle")
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}

/// A sink that records buffers without producing sound.
#[derive(Debug, Clone, Default)]
pub struct NullSink {
    hold: bool,
    played: Arc<Mutex<Vec<PcmBuffer>>>,
    pending: Arc<Mutex<Vec<oneshot::Sender<()>>>>,
}

impl NullSink {
    /// A sink whose playbacks complete immediately.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose playbacks stay in progress until [`finish_all`]
    /// (Self::finish_all) or an explicit stop.
    #[must_use]
    pub fn held() -> Self {
        Self {
            hold: true,
            ..Self::default()
        }
    }

    /// Number of buffers played so far.
    #[must_use]
    pub fn play_count(&self) -> usize {
        self.played.lock().expect("sink mutex poisoned").len()
    }

    /// The most recently played buffer, if any.
    #[must_use]
    pub fn last_buffer(&self) -> Option<PcmBuffer> {
        self.played
            .lock()
            .expect("sink mutex poisoned")
            .last()
            .cloned()
    }

    /// Complete all held playbacks.
    pub fn finish_all(&self) {
        let mut pending = self.pending.lock().expect("sink mutex poisoned");
        for sender in pending.drain(..) {
            let _ = sender.send(());
        }
    }
}

impl AudioSink for NullSink {
    fn play(&self, buffer: PcmBuffer) -> Result<PlaybackHandle> {
        self.played
            .lock()
            .expect("sink mutex poisoned")
            .push(buffer);

        let (tx, rx) = oneshot::channel();
        if self.hold {
            self.pending.lock().expect("sink mutex poisoned").push(tx);
        } else {
            let _ = tx.send(());
        }

        Ok(PlaybackHandle::new(|| {}, rx))
    }
}

/// A sink that plays through the host's default audio output device.
#[cfg(feature = "playback")]
pub struct RodioSink {
    // Dropping the stream tears down the device connection.
    stream: rodio::OutputStream,
}

#[cfg(feature = "playback")]
impl RodioSink {
    /// Open the default output device.
    ///
    /// # Errors
    ///
    /// Returns an error if no output device is available.
    pub fn open_default() -> Result<Self> {
        let stream = rodio::OutputStreamBuilder::open_default_stream()
            .map_err(|e| crate::error::Error::playback(format!("audio device: {e}")))?;
        Ok(Self { stream })
    }
}

#[cfg(feature = "playback")]
impl fmt::Debug for RodioSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RodioSink").finish_non_exhaustive()
    }
}

#[cfg(feature = "playback")]
impl AudioSink for RodioSink {
    fn play(&self, buffer: PcmBuffer) -> Result<PlaybackHandle> {
        let channels = u16::try_from(buffer.channel_count())
            .map_err(|_| crate::error::Error::playback("channel count exceeds device limit"))?;
        let source =
            rodio::buffer::SamplesBuffer::new(channels, buffer.sample_rate(), buffer.interleaved());

        let sink = Arc::new(rodio::Sink::connect_new(self.stream.mixer()));
        sink.append(source);

        let (tx, rx) = oneshot::channel();
        let waiter = Arc::clone(&sink);
        std::thread::spawn(move || {
            // Returns early when the sink is stopped; both paths complete
            // the one-shot.
            waiter.sleep_until_end();
            let _ = tx.send(());
        });

        let stopper = Arc::clone(&sink);
        Ok(PlaybackHandle::new(move || stopper.stop(), rx))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_buffer() -> PcmBuffer {
        PcmBuffer::decode(&[0x00, 0x00, 0xFF, 0x7F], 24_000, 1).unwrap()
    }

    #[tokio::test]
    async fn null_sink_completes_immediately() {
        let sink = NullSink::new();
        let mut handle = sink.play(test_buffer()).unwrap();

        assert!(handle.is_finished());
        assert_eq!(sink.play_count(), 1);
        handle.wait().await;
    }

    #[tokio::test]
    async fn held_sink_stays_in_progress() {
        let sink = NullSink::held();
        let mut handle = sink.play(test_buffer()).unwrap();

        assert!(!handle.is_finished());
        sink.finish_all();
        assert!(handle.is_finished());
    }

    #[tokio::test]
    async fn stop_marks_finished() {
        let sink = NullSink::held();
        let mut handle = sink.play(test_buffer()).unwrap();

        handle.stop();
        assert!(handle.is_finished());
        handle.wait().await;
    }

    #[test]
    fn records_played_buffers() {
        let sink = NullSink::new();
        let buffer = test_buffer();
        sink.play(buffer.clone()).unwrap();

        assert_eq!(sink.last_buffer().unwrap(), buffer);
    }
}
