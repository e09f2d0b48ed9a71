use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use anyhow::Error;
use serde::Serialize;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use uuid::Uuid;

use narration_application::{
    ApplicationError, AutoScrollGate, PlaybackController, SharedPlaybackController,
};
use narration_configuration::AppConfig;
use narration_domain::{
    format_clock, AudioDecoderPort, PacingWeights, PlaybackClockPort, PlaybackPhase,
    TimingSequence,
};
use narration_infra_audio::{SimulatedPlaybackClock, WavAudioDecoder};

use crate::TranscriptLayout;

#[derive(Debug, Clone, Serialize)]
pub struct Highlight {
    pub index: usize,
    pub token: String,
    pub position_seconds: f64,
    pub auto_scroll: bool,
    pub scrolled: bool,
    pub scroll_top_px: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct NarrationReport {
    pub session_id: Uuid,
    pub duration_seconds: f64,
    pub token_count: usize,
    pub highlights: Vec<Highlight>,
}

pub struct Application {
    pub config: AppConfig,
    clock: Arc<SimulatedPlaybackClock>,
    controller: SharedPlaybackController,
}

impl Application {
    pub fn new(config: AppConfig) -> Self {
        tracing::info!(
            scroll_debounce_ms = config.playback.scroll_debounce_ms,
            tick_interval_ms = config.playback.tick_interval_ms,
            "initializing narration application"
        );

        let decoder: Arc<dyn AudioDecoderPort> = Arc::new(WavAudioDecoder::new());
        let clock = Arc::new(SimulatedPlaybackClock::new());
        let clock_port: Arc<dyn PlaybackClockPort> = clock.clone();
        let controller = PlaybackController::with_pacing(
            decoder,
            clock_port,
            PacingWeights::from(&config.pacing),
        );

        Self {
            config,
            clock,
            controller: Arc::new(Mutex::new(controller)),
        }
    }

    pub fn controller(&self) -> SharedPlaybackController {
        Arc::clone(&self.controller)
    }

    /// Plays `audio` to the end on the simulated clock, recording every
    /// token the highlight lands on and whether the transcript scrolled to it.
    pub async fn narrate(
        &self,
        text: String,
        audio: Vec<u8>,
        server_timings: Option<TimingSequence>,
    ) -> Result<NarrationReport, Error> {
        let (tx, mut rx) = mpsc::unbounded_channel::<usize>();
        let gate = AutoScrollGate::new(
            Duration::from_millis(self.config.playback.scroll_debounce_ms),
            Handle::current(),
        );
        let mut layout = TranscriptLayout::from_config(&self.config.playback);

        let (session_id, duration_seconds, token_count) = {
            let mut controller = self.lock_controller()?;
            controller.set_listener(move |index| {
                let _ = tx.send(index);
            });
            let ticket = match controller.load(text, &audio, server_timings) {
                Ok(ticket) => ticket,
                Err(err) => {
                    controller.clear_listener();
                    return Err(ApplicationError::from(err).into());
                }
            };
            controller.play();

            let token_count = controller.timings().map_or(0, |timings| timings.len());
            (
                ticket.session_id,
                controller.snapshot().duration_seconds,
                token_count,
            )
        };

        tracing::info!(
            session_id = %session_id,
            duration = %format_clock(duration_seconds),
            tokens = token_count,
            "narration started"
        );

        let mut highlights = Vec::new();
        let mut interval =
            tokio::time::interval(Duration::from_millis(self.config.playback.tick_interval_ms));
        loop {
            interval.tick().await;
            let mut controller = self.lock_controller()?;
            if controller.phase() == PlaybackPhase::Playing {
                controller.on_position_tick(self.clock.position());
            }

            let position_seconds = controller.snapshot().position_seconds;
            while let Ok(index) = rx.try_recv() {
                let token = controller
                    .timings()
                    .and_then(|timings| timings.get(index))
                    .map(|entry| entry.token.clone())
                    .unwrap_or_default();
                let auto_scroll = gate.notify_active_index_changed(index);
                let scrolled = auto_scroll && layout.follow(index);
                tracing::debug!(
                    active_index = index,
                    token = %token,
                    elapsed = %format_clock(position_seconds),
                    auto_scroll,
                    scrolled,
                    "highlight moved"
                );
                highlights.push(Highlight {
                    index,
                    token,
                    position_seconds,
                    auto_scroll,
                    scrolled,
                    scroll_top_px: layout.scroll_top_px(),
                });
            }

            if controller.phase() != PlaybackPhase::Playing {
                break;
            }
        }

        self.lock_controller()?.clear_listener();
        tracing::info!(
            session_id = %session_id,
            highlights = highlights.len(),
            "narration finished"
        );

        Ok(NarrationReport {
            session_id,
            duration_seconds,
            token_count,
            highlights,
        })
    }

    fn lock_controller(&self) -> Result<MutexGuard<'_, PlaybackController>, ApplicationError> {
        self.controller
            .lock()
            .map_err(|_| ApplicationError::Internal("playback controller lock poisoned".into()))
    }
}
