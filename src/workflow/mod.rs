pub mod poll_cycle;
pub mod retry_controller;

pub use poll_cycle::{CycleReport, PollCycle};
pub use retry_controller::{RetryController, DEFAULT_MAX_ATTEMPTS};
