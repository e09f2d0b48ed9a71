mod server_timing;

pub use server_timing::{parse_server_timings, ServerTiming};
