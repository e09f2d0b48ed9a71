pub mod entity;
pub mod error;
pub mod format;
pub mod port;
pub mod timing;

pub use entity::*;
pub use error::DomainError;
pub use format::format_clock;
pub use port::*;
pub use timing::{resolve_index, synthesize, synthesize_with, PacingWeights};
