use std::sync::{Mutex, MutexGuard, PoisonError};

use narration_domain::PlaybackClockPort;
use tokio::time::Instant;

#[derive(Debug)]
struct ClockState {
    anchor_seconds: f64,
    started_at: Option<Instant>,
    rate: f64,
}

impl ClockState {
    fn position(&self) -> f64 {
        match self.started_at {
            Some(started_at) => {
                self.anchor_seconds + started_at.elapsed().as_secs_f64() * self.rate
            }
            None => self.anchor_seconds,
        }
    }
}

/// Headless stand-in for an audio output: advances a position at `rate`
/// against tokio time, without producing sound.
#[derive(Debug)]
pub struct SimulatedPlaybackClock {
    state: Mutex<ClockState>,
}

impl Default for SimulatedPlaybackClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedPlaybackClock {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ClockState {
                anchor_seconds: 0.0,
                started_at: None,
                rate: 1.0,
            }),
        }
    }

    pub fn position(&self) -> f64 {
        self.lock().position()
    }

    pub fn is_running(&self) -> bool {
        self.lock().started_at.is_some()
    }

    fn lock(&self) -> MutexGuard<'_, ClockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PlaybackClockPort for SimulatedPlaybackClock {
    fn start(&self, from_seconds: f64, rate: f64) {
        let mut state = self.lock();
        state.anchor_seconds = from_seconds;
        state.started_at = Some(Instant::now());
        state.rate = rate;
    }

    fn stop(&self) {
        let mut state = self.lock();
        state.anchor_seconds = state.position();
        state.started_at = None;
    }

    fn seek(&self, to_seconds: f64) {
        let mut state = self.lock();
        state.anchor_seconds = to_seconds;
        if state.started_at.is_some() {
            state.started_at = Some(Instant::now());
        }
    }

    fn set_rate(&self, rate: f64) {
        let mut state = self.lock();
        state.anchor_seconds = state.position();
        if state.started_at.is_some() {
            state.started_at = Some(Instant::now());
        }
        state.rate = rate;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use narration_domain::PlaybackClockPort;
    use tokio::time::advance;

    use super::SimulatedPlaybackClock;

    #[tokio::test(start_paused = true)]
    async fn position_follows_rate_and_seeks() {
        let clock = SimulatedPlaybackClock::new();
        clock.start(0.0, 2.0);
        advance(Duration::from_millis(500)).await;
        assert_eq!(clock.position(), 1.0);

        clock.set_rate(1.0);
        advance(Duration::from_millis(250)).await;
        assert_eq!(clock.position(), 1.25);

        clock.seek(4.0);
        advance(Duration::from_millis(500)).await;
        assert_eq!(clock.position(), 4.5);
    }

    #[tokio::test(start_paused = true)]
    async fn stopped_clock_holds_position() {
        let clock = SimulatedPlaybackClock::new();
        clock.start(1.0, 1.5);
        advance(Duration::from_secs(2)).await;
        clock.stop();
        assert!(!clock.is_running());

        advance(Duration::from_secs(5)).await;
        assert_eq!(clock.position(), 4.0);
    }
}
