//! Turning a plan into filesystem changes.

pub mod actions;
pub mod duplicate;
pub mod executor;

pub use actions::perform_action;
pub use duplicate::next_duplicate_path;
pub use executor::{AppliedAction, ExecutionReport, ReorganizationExecutor};
