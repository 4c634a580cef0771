pub mod orchestration;

pub use orchestration::{Orchestrator, RunOutcome};
