pub mod orchestration;

pub use orchestration::{run_update, show_version, UpdateArgs, UpdateOutcome};
