//! Audio decoding types and the narration provider trait.
//!
//! The generative service returns synthesized speech as a base64-encoded
//! sequence of raw 16-bit signed little-endian PCM samples. This module
//! decodes that payload into a normalized floating-point buffer ready for a
//! playback sink:
//!
//! ```rust,ignore
//! let bytes = inkling::audio::decode_base64(&clip.data)?;
//! let buffer = PcmBuffer::decode(&bytes, 24_000, 1)?;
//! sink.play(buffer)?;
//! ```

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use std::time::Duration;

use crate::error::{AudioError, Result};

/// Sample rate of narration audio returned by the service, in Hz.
pub const NARRATION_SAMPLE_RATE: u32 = 24_000;

/// Channel count of narration audio returned by the service.
pub const NARRATION_CHANNELS: usize = 1;

/// Decode a base64 string into the exact byte sequence it encodes.
///
/// Pure transformation with no side effects.
///
/// # Errors
///
/// Returns [`AudioError::Base64`] on malformed input.
pub fn decode_base64(data: &str) -> std::result::Result<Vec<u8>, AudioError> {
    Ok(BASE64.decode(data)?)
}

/// A decoded multi-channel audio buffer with samples normalized to
/// `[-1.0, 1.0]`.
///
/// Created by [`PcmBuffer::decode`], consumed once by a playback sink or
/// encoded to WAV, then discarded.
#[derive(Debug, Clone, PartialEq)]
pub struct PcmBuffer {
    sample_rate: u32,
    channels: Vec<Vec<f32>>,
}

impl PcmBuffer {
    /// Decode raw bytes as interleaved 16-bit signed little-endian PCM.
    ///
    /// Frames per channel = `floor(bytes.len() / 2 / channel_count)`. A
    /// trailing odd byte and any samples that do not fill a whole frame are
    /// silently dropped. Each sample is normalized as `sample / 32768.0`.
    /// Empty input yields a zero-frame buffer without error.
    ///
    /// # Errors
    ///
    /// Returns an error if `channel_count` or `sample_rate` is zero; unlike
    /// the sample handling above there is no meaningful result to produce.
    pub fn decode(
        bytes: &[u8],
        sample_rate: u32,
        channel_count: usize,
    ) -> std::result::Result<Self, AudioError> {
        if channel_count == 0 {
            return Err(AudioError::ZeroChannels);
        }
        if sample_rate == 0 {
            return Err(AudioError::ZeroSampleRate);
        }

        let samples: Vec<i16> = bytes
            .chunks_exact(2)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
            .collect();

        let frames = samples.len() / channel_count;
        let mut channels = vec![Vec::with_capacity(frames); channel_count];
        for frame in samples.chunks_exact(channel_count) {
            for (channel, &sample) in channels.iter_mut().zip(frame) {
                channel.push(f32::from(sample) / 32768.0);
            }
        }

        Ok(Self {
            sample_rate,
            channels,
        })
    }

    /// The sample rate in Hz.
    #[must_use]
    pub const fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// The number of channels.
    #[must_use]
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// The number of frames (samples per channel).
    #[must_use]
    pub fn frames(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    /// Whether the buffer holds no frames.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames() == 0
    }

    /// The samples of a single channel, if it exists.
    #[must_use]
    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    /// Playback duration of the buffer.
    #[must_use]
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.frames() as f64 / f64::from(self.sample_rate))
    }

    /// Rebuild the interleaved sample order expected by audio output devices.
    #[must_use]
    pub fn interleaved(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.frames() * self.channel_count());
        for frame in 0..self.frames() {
            for channel in &self.channels {
                out.push(channel[frame]);
            }
        }
        out
    }

    /// Encode the buffer as a 16-bit PCM WAV blob.
    ///
    /// # Errors
    ///
    /// Returns an error if the channel count exceeds the WAV limit or the
    /// encoder fails.
    pub fn to_wav(&self) -> std::result::Result<Vec<u8>, AudioError> {
        let channels = u16::try_from(self.channel_count())
            .map_err(|_| AudioError::Wav("channel count exceeds WAV limit".into()))?;
        let spec = hound::WavSpec {
            channels,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut cursor = std::io::Cursor::new(Vec::new());
        let mut writer = hound::WavWriter::new(&mut cursor, spec)
            .map_err(|e| AudioError::Wav(e.to_string()))?;
        for sample in self.interleaved() {
            // Undo the [-1.0, 1.0] normalization; clamp guards against
            // values that would overflow i16 after rounding.
            #[allow(clippy::cast_possible_truncation)]
            let quantized = (sample * 32768.0).clamp(-32768.0, 32767.0) as i16;
            writer
                .write_sample(quantized)
                .map_err(|e| AudioError::Wav(e.to_string()))?;
        }
        writer
            .finalize()
            .map_err(|e| AudioError::Wav(e.to_string()))?;

        Ok(cursor.into_inner())
    }
}

/// A synthesized speech clip as returned by the generative service.
///
/// Holds the base64 payload together with the PCM parameters needed to
/// decode it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechClip {
    /// Base64-encoded raw PCM bytes.
    pub data: String,
    /// MIME type reported by the service, if any.
    pub mime_type: Option<String>,
    /// Sample rate of the encoded audio in Hz.
    pub sample_rate: u32,
    /// Channel count of the encoded audio.
    pub channels: usize,
}

impl SpeechClip {
    /// Create a clip with the service's fixed narration parameters.
    #[must_use]
    pub fn narration(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            mime_type: None,
            sample_rate: NARRATION_SAMPLE_RATE,
            channels: NARRATION_CHANNELS,
        }
    }

    /// Decode the clip into a playable buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the base64 payload is malformed or the PCM
    /// parameters are invalid.
    pub fn decode(&self) -> std::result::Result<PcmBuffer, AudioError> {
        let bytes = decode_base64(&self.data)?;
        PcmBuffer::decode(&bytes, self.sample_rate, self.channels)
    }
}

/// Provider of speech synthesis for story narration.
///
/// A missing audio payload in an otherwise successful response is "no
/// narration available", expressed as `Ok(None)` -- never an error.
#[async_trait]
pub trait NarrationProvider: Send + Sync {
    /// Synthesize a narration of the given story text.
    async fn narrate(&self, text: &str) -> Result<Option<SpeechClip>>;
}
