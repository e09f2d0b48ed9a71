mod clock;
mod wav;

pub use clock::SimulatedPlaybackClock;
pub use wav::WavAudioDecoder;
