use crate::{AudioInfo, DomainError};

/// Validates an opaque audio payload before playback is attempted.
///
/// `AudioInfo::duration_seconds` is `None` when the host only learns the
/// duration later; the controller then waits for a metadata callback.
pub trait AudioDecoderPort: Send + Sync {
    fn inspect(&self, audio: &[u8]) -> Result<AudioInfo, DomainError>;
}

/// The host's live audio clock. The controller drives it; position ticks
/// flow back through `PlaybackController::on_position_tick`.
pub trait PlaybackClockPort: Send + Sync {
    fn start(&self, from_seconds: f64, rate: f64);
    fn stop(&self);
    fn seek(&self, to_seconds: f64);
    fn set_rate(&self, rate: f64);
}
