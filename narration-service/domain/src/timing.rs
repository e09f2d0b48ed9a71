use serde::{Deserialize, Serialize};

use crate::{TimingEntry, TimingSequence};

/// Per-token pacing used when no server timings exist.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PacingWeights {
    pub long_word_threshold: f64,
    pub long_word_compression: f64,
    pub clause_pause: f64,
    pub sentence_pause: f64,
}

impl Default for PacingWeights {
    fn default() -> Self {
        Self {
            long_word_threshold: 8.0,
            long_word_compression: 0.3,
            clause_pause: 2.5,
            sentence_pause: 3.0,
        }
    }
}

impl PacingWeights {
    pub fn token_weight(&self, token: &str) -> f64 {
        let letters = token.chars().filter(|c| c.is_alphanumeric()).count().max(1) as f64;
        let mut weight = if letters > self.long_word_threshold {
            let excess = letters - self.long_word_threshold;
            self.long_word_threshold + excess * self.long_word_compression
        } else {
            letters
        };

        match token.chars().last() {
            Some('?' | '!') => weight += self.sentence_pause,
            Some('.' | ',' | ';' | ':') => weight += self.clause_pause,
            _ => {}
        }
        weight
    }
}

pub fn synthesize(text: &str, total_duration_seconds: f64) -> TimingSequence {
    synthesize_with(text, total_duration_seconds, &PacingWeights::default())
}

/// Spreads `total_duration_seconds` over the whitespace-separated tokens of
/// `text` in proportion to their pacing weight. The result is gapless and
/// its last `end` equals the duration.
pub fn synthesize_with(
    text: &str,
    total_duration_seconds: f64,
    weights: &PacingWeights,
) -> TimingSequence {
    let weighted: Vec<(&str, f64)> = text
        .split_whitespace()
        .map(|token| (token, weights.token_weight(token)))
        .collect();
    if weighted.is_empty() {
        return TimingSequence::default();
    }

    let duration = if total_duration_seconds.is_finite() && total_duration_seconds > 0.0 {
        total_duration_seconds
    } else {
        1.0
    };
    let total_weight: f64 = weighted.iter().map(|(_, weight)| weight).sum();
    let last = weighted.len() - 1;

    let mut cumulative = 0.0;
    let entries = weighted
        .into_iter()
        .enumerate()
        .map(|(idx, (token, weight))| {
            let start = cumulative / total_weight * duration;
            cumulative += weight;
            let end = if idx == last {
                duration
            } else {
                cumulative / total_weight * duration
            };
            TimingEntry::new(token, start, end)
        })
        .collect();

    TimingSequence::new(entries)
}

/// Index of the token active at `time_seconds`: the last entry whose
/// `start <= time_seconds`, advanced by one when the time already sits past
/// that entry's `end` and a next entry exists.
pub fn resolve_index(sequence: &TimingSequence, time_seconds: f64) -> usize {
    let entries = sequence.entries();
    let started = entries.partition_point(|entry| entry.start <= time_seconds);
    if started == 0 {
        return 0;
    }

    let idx = started - 1;
    if time_seconds > entries[idx].end && idx + 1 < entries.len() {
        idx + 1
    } else {
        idx
    }
}
