mod gate;
mod viewport;

pub use gate::{AutoScrollGate, DEFAULT_SCROLL_DEBOUNCE};
pub use viewport::{needs_scroll, VerticalSpan};
