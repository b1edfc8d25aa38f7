//! Requests domain: backend operations and the busy flag

pub mod busy;
pub mod errors;
pub mod orchestrator;

pub use busy::{BusyFlag, BusyGuard};
pub use errors::OperationError;
pub use orchestrator::RequestOrchestrator;
