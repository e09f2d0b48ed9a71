use std::sync::{Arc, Mutex};

use uuid::Uuid;

use narration_domain::{
    resolve_index, synthesize_with, AudioDecoderPort, PacingWeights, PlaybackClockPort,
    PlaybackPhase, PlaybackRate, PlaybackSnapshot, TimingSequence,
};

use crate::LoadError;

/// Multi-threaded hosts share one controller per audio session behind a single lock.
pub type SharedPlaybackController = Arc<Mutex<PlaybackController>>;

type ActiveIndexListener = Box<dyn FnMut(usize) + Send>;

/// Identifies one `load()` attempt. Metadata delivered with a superseded
/// ticket is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    pub session_id: Uuid,
    version: u64,
}

struct Session {
    ticket: LoadTicket,
    text: String,
    timings: TimingSequence,
    awaiting_synthesis: bool,
}

#[derive(Debug, Clone, Copy)]
struct PlaybackState {
    phase: PlaybackPhase,
    position_seconds: f64,
    duration_seconds: f64,
    rate: PlaybackRate,
    active_index: usize,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            phase: PlaybackPhase::Idle,
            position_seconds: 0.0,
            duration_seconds: 0.0,
            rate: PlaybackRate::default(),
            active_index: 0,
        }
    }
}

/// Keeps audio playback and the highlighted token in step.
///
/// Operations take `&mut self`; the host serializes calls coming from its
/// audio callbacks (see [`SharedPlaybackController`]).
pub struct PlaybackController {
    decoder: Arc<dyn AudioDecoderPort>,
    clock: Arc<dyn PlaybackClockPort>,
    pacing: PacingWeights,
    listener: Option<ActiveIndexListener>,
    session: Option<Session>,
    state: PlaybackState,
    load_version: u64,
}

impl PlaybackController {
    pub fn new(decoder: Arc<dyn AudioDecoderPort>, clock: Arc<dyn PlaybackClockPort>) -> Self {
        Self::with_pacing(decoder, clock, PacingWeights::default())
    }

    pub fn with_pacing(
        decoder: Arc<dyn AudioDecoderPort>,
        clock: Arc<dyn PlaybackClockPort>,
        pacing: PacingWeights,
    ) -> Self {
        Self {
            decoder,
            clock,
            pacing,
            listener: None,
            session: None,
            state: PlaybackState::default(),
            load_version: 0,
        }
    }

    /// Registers the single consumer of active-index changes, replacing any previous one.
    ///
    /// The callback runs while the controller is mutably borrowed; it must not
    /// call back into the controller (under [`SharedPlaybackController`] that
    /// would deadlock on the lock).
    pub fn set_listener<F>(&mut self, listener: F)
    where
        F: FnMut(usize) + Send + 'static,
    {
        self.listener = Some(Box::new(listener));
    }

    pub fn clear_listener(&mut self) {
        self.listener = None;
    }

    pub fn load(
        &mut self,
        text: impl Into<String>,
        audio: &[u8],
        server_timings: Option<TimingSequence>,
    ) -> Result<LoadTicket, LoadError> {
        let info = self.decoder.inspect(audio).map_err(|err| {
            tracing::warn!(error = %err, audio_bytes = audio.len(), "audio decode failed");
            LoadError::from(err)
        })?;

        if self.state.phase == PlaybackPhase::Playing {
            self.clock.stop();
        }

        self.load_version += 1;
        let ticket = LoadTicket {
            session_id: Uuid::new_v4(),
            version: self.load_version,
        };
        let (timings, awaiting_synthesis) = match server_timings {
            Some(timings) if !timings.is_empty() => (timings, false),
            _ => (TimingSequence::default(), true),
        };

        tracing::debug!(
            session_id = %ticket.session_id,
            audio_bytes = audio.len(),
            server_timings = timings.len(),
            sample_rate_hz = info.sample_rate_hz,
            channels = info.channels,
            "narration load started"
        );

        self.session = Some(Session {
            ticket,
            text: text.into(),
            timings,
            awaiting_synthesis,
        });
        self.state = PlaybackState {
            phase: PlaybackPhase::Loading,
            rate: self.state.rate,
            ..PlaybackState::default()
        };

        if let Some(duration_seconds) = info.duration_seconds {
            self.on_metadata_loaded(ticket, duration_seconds);
        }
        Ok(ticket)
    }

    /// Completes a pending load once the host knows the audio duration.
    /// Returns `false` when the ticket belongs to a superseded load.
    pub fn on_metadata_loaded(&mut self, ticket: LoadTicket, duration_seconds: f64) -> bool {
        let pacing = self.pacing;
        let session = match self.session.as_mut() {
            Some(session)
                if session.ticket == ticket && self.state.phase == PlaybackPhase::Loading =>
            {
                session
            }
            _ => {
                tracing::debug!(
                    session_id = %ticket.session_id,
                    "ignoring metadata for superseded load"
                );
                return false;
            }
        };

        let duration_seconds = if duration_seconds.is_finite() && duration_seconds > 0.0 {
            duration_seconds
        } else {
            0.0
        };
        if session.awaiting_synthesis {
            session.timings = synthesize_with(&session.text, duration_seconds, &pacing);
            session.awaiting_synthesis = false;
        }

        tracing::debug!(
            session_id = %ticket.session_id,
            duration_seconds,
            tokens = session.timings.len(),
            "narration ready"
        );

        self.state.duration_seconds = duration_seconds;
        self.state.phase = PlaybackPhase::Ready;
        self.announce_active_index();
        true
    }

    pub fn play(&mut self) {
        match self.state.phase {
            PlaybackPhase::Ready | PlaybackPhase::Paused | PlaybackPhase::Ended => {}
            PlaybackPhase::Idle | PlaybackPhase::Loading | PlaybackPhase::Playing => return,
        }
        if self.state.duration_seconds <= 0.0 {
            return;
        }

        if self.state.phase == PlaybackPhase::Ended {
            self.state.position_seconds = 0.0;
            self.refresh_active_index();
        }
        self.clock
            .start(self.state.position_seconds, self.state.rate.multiplier());
        self.state.phase = PlaybackPhase::Playing;
        tracing::debug!(
            position_seconds = self.state.position_seconds,
            rate = self.state.rate.multiplier(),
            "playback started"
        );
    }

    pub fn pause(&mut self) {
        if self.state.phase != PlaybackPhase::Playing {
            return;
        }
        self.clock.stop();
        self.state.phase = PlaybackPhase::Paused;
        tracing::debug!(position_seconds = self.state.position_seconds, "playback paused");
    }

    pub fn toggle(&mut self) {
        if self.state.phase == PlaybackPhase::Playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Jumps to `target_seconds`, clamped into the loaded duration, and
    /// re-resolves the active token before returning.
    pub fn seek(&mut self, target_seconds: f64) {
        if !self.state.phase.has_media() {
            return;
        }

        let duration = self.state.duration_seconds;
        let target = if target_seconds.is_nan() {
            0.0
        } else {
            target_seconds.clamp(0.0, duration)
        };
        self.state.position_seconds = target;

        match self.state.phase {
            PlaybackPhase::Playing if target >= duration => {
                self.finish();
                return;
            }
            PlaybackPhase::Playing => self.clock.seek(target),
            PlaybackPhase::Ended if target < duration => {
                self.state.phase = PlaybackPhase::Paused;
            }
            _ => {}
        }

        tracing::debug!(position_seconds = target, "seek applied");
        self.refresh_active_index();
    }

    /// Advances to the next rate in the fixed cycle and returns it.
    pub fn set_rate(&mut self) -> PlaybackRate {
        self.state.rate = self.state.rate.next();
        if self.state.phase == PlaybackPhase::Playing {
            self.clock.set_rate(self.state.rate.multiplier());
        }
        tracing::debug!(rate = self.state.rate.multiplier(), "playback rate changed");
        self.state.rate
    }

    pub fn on_position_tick(&mut self, current_seconds: f64) {
        if self.state.phase != PlaybackPhase::Playing || current_seconds.is_nan() {
            return;
        }
        if current_seconds >= self.state.duration_seconds {
            self.finish();
            return;
        }
        self.state.position_seconds = current_seconds.max(0.0);
        self.refresh_active_index();
    }

    /// Stops playback and drops the session, returning to `Idle`.
    pub fn dispose(&mut self) {
        if self.state.phase == PlaybackPhase::Playing {
            self.clock.stop();
        }
        self.session = None;
        self.state = PlaybackState {
            rate: self.state.rate,
            ..PlaybackState::default()
        };
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            position_seconds: self.state.position_seconds,
            duration_seconds: self.state.duration_seconds,
            rate: self.state.rate.multiplier(),
            is_playing: self.state.phase == PlaybackPhase::Playing,
        }
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.state.phase
    }

    pub fn rate(&self) -> PlaybackRate {
        self.state.rate
    }

    pub fn active_index(&self) -> usize {
        self.state.active_index
    }

    pub fn timings(&self) -> Option<&TimingSequence> {
        self.session.as_ref().map(|session| &session.timings)
    }

    pub fn current_ticket(&self) -> Option<LoadTicket> {
        self.session.as_ref().map(|session| session.ticket)
    }

    fn finish(&mut self) {
        self.state.position_seconds = self.state.duration_seconds;
        self.state.phase = PlaybackPhase::Ended;
        self.clock.stop();
        tracing::debug!(
            duration_seconds = self.state.duration_seconds,
            "playback reached end"
        );
        self.refresh_active_index();
    }

    /// Every new session starts with a notification so consumers drop any
    /// highlight left over from the previous session.
    fn announce_active_index(&mut self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        if session.timings.is_empty() {
            return;
        }
        let resolved = resolve_index(&session.timings, self.state.position_seconds);
        self.state.active_index = resolved;
        if let Some(listener) = self.listener.as_mut() {
            listener(resolved);
        }
    }

    fn refresh_active_index(&mut self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let resolved = resolve_index(&session.timings, self.state.position_seconds);
        if resolved == self.state.active_index {
            return;
        }

        self.state.active_index = resolved;
        tracing::trace!(
            active_index = resolved,
            position_seconds = self.state.position_seconds,
            "active token changed"
        );
        if let Some(listener) = self.listener.as_mut() {
            listener(resolved);
        }
    }
}
