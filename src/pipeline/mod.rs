mod job;
mod poll;
mod reconcile;
mod submit;

pub use job::{Job, JobReport, JobStatus, PollConfig};
pub use poll::poll_to_completion;
pub use reconcile::{ErrorKind, Outcome, reconcile};
pub use submit::{InstructionPolicy, submit_job};
