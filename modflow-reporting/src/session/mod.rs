//! The report conversation: a resumable state machine fed one message at a time.

mod machine;
pub mod prompts;
mod state;


pub use machine::ReportSession;
pub use state::{PendingReport, ReportOutcome, State};
