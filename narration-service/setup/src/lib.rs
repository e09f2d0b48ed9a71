mod app;
mod layout;

pub use app::{Application, Highlight, NarrationReport};
pub use layout::TranscriptLayout;
