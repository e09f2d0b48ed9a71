use narration_application::{needs_scroll, VerticalSpan};
use narration_configuration::PlaybackConfig;

/// Fixed-grid transcript layout used to decide when the headless player
/// would scroll the highlighted token back into view.
#[derive(Debug, Clone)]
pub struct TranscriptLayout {
    viewport_height_px: f64,
    line_height_px: f64,
    tokens_per_line: usize,
    safe_margin_px: f64,
    scroll_top_px: f64,
}

impl TranscriptLayout {
    pub fn from_config(config: &PlaybackConfig) -> Self {
        Self {
            viewport_height_px: config.viewport_height_px,
            line_height_px: config.line_height_px,
            tokens_per_line: config.tokens_per_line.max(1),
            safe_margin_px: config.scroll_safe_margin_px,
            scroll_top_px: 0.0,
        }
    }

    pub fn scroll_top_px(&self) -> f64 {
        self.scroll_top_px
    }

    pub fn token_span(&self, index: usize) -> VerticalSpan {
        let top = (index / self.tokens_per_line) as f64 * self.line_height_px;
        VerticalSpan::new(top, top + self.line_height_px)
    }

    pub fn viewport(&self) -> VerticalSpan {
        VerticalSpan::new(self.scroll_top_px, self.scroll_top_px + self.viewport_height_px)
    }

    /// Moves the viewport so the token sits at the top of the safe band when
    /// it has left that band. Returns whether the scroll offset changed.
    pub fn follow(&mut self, index: usize) -> bool {
        let target = self.token_span(index);
        if !needs_scroll(target, self.viewport(), self.safe_margin_px) {
            return false;
        }
        let next = (target.top - self.safe_margin_px).max(0.0);
        if next == self.scroll_top_px {
            return false;
        }
        self.scroll_top_px = next;
        true
    }
}
