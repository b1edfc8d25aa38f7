//! Request orchestrator error types
//!
//! The user-facing text of every failure already went out as a
//! notification; these variants let callers and tests tell outcomes apart.

use rollcall_model::Operation;
use thiserror::Error;

use crate::infra::api_client::ApiError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OperationError {
    /// Required input missing; nothing was sent.
    #[error("{operation} needs: {}", .missing.join(", "))]
    Validation {
        operation: Operation,
        missing: Vec<&'static str>,
    },

    /// Refused because another operation holds the busy flag.
    #[error("{requested} refused while {in_flight} is in progress")]
    Busy {
        requested: Operation,
        in_flight: Operation,
    },

    #[error("{operation} failed: {source}")]
    Api {
        operation: Operation,
        #[source]
        source: ApiError,
    },
}

impl OperationError {
    pub fn operation(&self) -> Operation {
        match self {
            Self::Validation { operation, .. } | Self::Api { operation, .. } => {
                *operation
            }
            Self::Busy { requested, .. } => *requested,
        }
    }

    /// Whether the backend was contacted at all.
    pub fn reached_network(&self) -> bool {
        matches!(self, Self::Api { .. })
    }
}
