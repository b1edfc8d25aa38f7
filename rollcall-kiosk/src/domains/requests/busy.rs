//! Busy flag
//!
//! Raised at the start of an operation and lowered by the guard's drop, so
//! every exit path (including a dropped future) clears it.

use rollcall_config::BusyPolicy;
use rollcall_model::Operation;

use crate::domains::session::state_types::SessionStore;

use super::errors::OperationError;

#[derive(Clone, Debug)]
pub struct BusyFlag {
    store: SessionStore,
    policy: BusyPolicy,
}

impl BusyFlag {
    pub fn new(store: SessionStore, policy: BusyPolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> BusyPolicy {
        self.policy
    }

    pub fn is_busy(&self) -> bool {
        self.store.with_state(|s| s.busy)
    }

    /// Raise the flag for `operation`.
    ///
    /// Under [`BusyPolicy::Exclusive`] this fails when another operation
    /// already holds it. Under [`BusyPolicy::Cooperative`] it always
    /// succeeds and whichever guard drops first lowers the flag for
    /// everyone.
    pub fn begin(&self, operation: Operation) -> Result<BusyGuard, OperationError> {
        match self.policy {
            BusyPolicy::Exclusive => {
                let mut holder = None;
                let acquired = self.store.update_if(|state| {
                    if state.busy {
                        holder = state.in_flight;
                        return false;
                    }
                    state.busy = true;
                    state.in_flight = Some(operation);
                    true
                });
                if !acquired {
                    let in_flight = holder.unwrap_or(operation);
                    log::warn!(
                        "[Orchestrator] {} refused, {} still in flight",
                        operation,
                        in_flight
                    );
                    return Err(OperationError::Busy {
                        requested: operation,
                        in_flight,
                    });
                }
            }
            BusyPolicy::Cooperative => {
                self.store.update(|state| {
                    if state.busy {
                        log::debug!(
                            "[Orchestrator] {} overlaps {:?}",
                            operation,
                            state.in_flight
                        );
                    }
                    state.busy = true;
                    state.in_flight = Some(operation);
                });
            }
        }

        Ok(BusyGuard {
            store: self.store.clone(),
            operation,
        })
    }
}

#[derive(Debug)]
#[must_use = "the busy flag drops as soon as the guard does"]
pub struct BusyGuard {
    store: SessionStore,
    operation: Operation,
}

impl BusyGuard {
    pub fn operation(&self) -> Operation {
        self.operation
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.store.update(|state| {
            state.busy = false;
            state.in_flight = None;
        });
    }
}
