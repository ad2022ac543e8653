//! Shared utilities for the note-head workspace: 2D buffers, deterministic
//! hashing, stage timing, arena index types and logging setup.

#[macro_use]
pub mod macros;
pub mod buffer2;
pub mod fnv;
pub mod stopwatch;

mod log_setup;

pub use buffer2::Buffer2;
pub use fnv::FnvHasher;
pub use log_setup::setup_logging;
pub use stopwatch::StopWatch;
