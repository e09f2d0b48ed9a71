pub mod dto;
pub mod error;
pub mod playback;
pub mod scroll;

pub use dto::*;
pub use error::*;
pub use playback::{LoadTicket, PlaybackController, SharedPlaybackController};
pub use scroll::{needs_scroll, AutoScrollGate, VerticalSpan, DEFAULT_SCROLL_DEBOUNCE};
