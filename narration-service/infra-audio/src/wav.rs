use std::io::Cursor;

use hound::WavReader;
use narration_domain::{AudioDecoderPort, AudioInfo, DomainError};

/// Reads WAV headers of payloads returned by the text-to-speech endpoint.
#[derive(Default)]
pub struct WavAudioDecoder;

impl WavAudioDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl AudioDecoderPort for WavAudioDecoder {
    fn inspect(&self, audio: &[u8]) -> Result<AudioInfo, DomainError> {
        if audio.is_empty() {
            return Err(DomainError::decode("audio payload is empty"));
        }

        let reader = WavReader::new(Cursor::new(audio))
            .map_err(|err| DomainError::decode(format!("invalid wav payload: {err}")))?;
        let spec = reader.spec();
        if spec.sample_rate == 0 || spec.channels == 0 {
            return Err(DomainError::decode("wav header declares no samples per second"));
        }

        let frames = reader.duration();
        let duration_seconds = f64::from(frames) / f64::from(spec.sample_rate);

        tracing::debug!(
            sample_rate_hz = spec.sample_rate,
            channels = spec.channels,
            bits_per_sample = spec.bits_per_sample,
            frames,
            duration_seconds,
            "wav payload inspected"
        );

        Ok(AudioInfo {
            duration_seconds: Some(duration_seconds),
            sample_rate_hz: spec.sample_rate,
            channels: spec.channels,
        })
    }
}
