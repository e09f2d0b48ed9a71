use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingEntry {
    pub token: String,
    pub start: f64,
    pub end: f64,
}

impl TimingEntry {
    pub fn new(token: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            token: token.into(),
            start,
            end,
        }
    }
}

/// Ordered timing entries for one audio session. Entries are indexed by
/// token order and `start` must be non-decreasing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimingSequence {
    entries: Vec<TimingEntry>,
}

impl TimingSequence {
    pub fn new(entries: Vec<TimingEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[TimingEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&TimingEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn resolve_index(&self, time_seconds: f64) -> usize {
        crate::resolve_index(self, time_seconds)
    }
}

impl From<Vec<TimingEntry>> for TimingSequence {
    fn from(entries: Vec<TimingEntry>) -> Self {
        Self::new(entries)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaybackRate {
    #[default]
    Normal,
    OneAndQuarter,
    OneAndHalf,
    Double,
}

impl PlaybackRate {
    pub const ALL: [PlaybackRate; 4] = [
        PlaybackRate::Normal,
        PlaybackRate::OneAndQuarter,
        PlaybackRate::OneAndHalf,
        PlaybackRate::Double,
    ];

    pub fn multiplier(self) -> f64 {
        match self {
            PlaybackRate::Normal => 1.0,
            PlaybackRate::OneAndQuarter => 1.25,
            PlaybackRate::OneAndHalf => 1.5,
            PlaybackRate::Double => 2.0,
        }
    }

    pub fn next(self) -> Self {
        match self {
            PlaybackRate::Normal => PlaybackRate::OneAndQuarter,
            PlaybackRate::OneAndQuarter => PlaybackRate::OneAndHalf,
            PlaybackRate::OneAndHalf => PlaybackRate::Double,
            PlaybackRate::Double => PlaybackRate::Normal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackPhase {
    Idle,
    Loading,
    Ready,
    Playing,
    Paused,
    Ended,
}

impl PlaybackPhase {
    pub fn has_media(self) -> bool {
        !matches!(self, PlaybackPhase::Idle | PlaybackPhase::Loading)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaybackSnapshot {
    pub position_seconds: f64,
    pub duration_seconds: f64,
    pub rate: f64,
    pub is_playing: bool,
}

impl PlaybackSnapshot {
    pub fn remaining_seconds(&self) -> f64 {
        (self.duration_seconds - self.position_seconds).max(0.0)
    }

    pub fn elapsed_label(&self) -> String {
        crate::format_clock(self.position_seconds)
    }

    pub fn remaining_label(&self) -> String {
        crate::format_clock(self.remaining_seconds())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudioInfo {
    pub duration_seconds: Option<f64>,
    pub sample_rate_hz: u32,
    pub channels: u16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_cycles_through_fixed_set() {
        let mut rate = PlaybackRate::default();
        let mut seen = vec![rate.multiplier()];
        for _ in 0..4 {
            rate = rate.next();
            seen.push(rate.multiplier());
        }
        assert_eq!(seen, vec![1.0, 1.25, 1.5, 2.0, 1.0]);

        for pair in PlaybackRate::ALL.windows(2) {
            assert_eq!(pair[0].next(), pair[1]);
        }
    }

    #[test]
    fn snapshot_labels_report_elapsed_and_remaining() {
        let snapshot = PlaybackSnapshot {
            position_seconds: 65.4,
            duration_seconds: 130.0,
            rate: 1.0,
            is_playing: true,
        };
        assert_eq!(snapshot.elapsed_label(), "1:05");
        assert_eq!(snapshot.remaining_label(), "1:04");
    }
}
