//! Service ports the domains depend on, and their HTTP-backed adapters.

pub mod recognition;

pub use recognition::{ApiResult, RecognitionApiAdapter, RecognitionService};
