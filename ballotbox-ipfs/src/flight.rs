//! Single-flight coalescing for gateway reads.
//!
//! The first caller for an uncached hash leads the network round; callers
//! arriving while it runs wait on a oneshot for the leader's outcome.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::oneshot;

use ballotbox_core::error::{BallotError, Result};
use ballotbox_core::types::ContentHash;

type Waiter = oneshot::Sender<Result<Value>>;

/// Reads currently on the wire, keyed by hash.
#[derive(Default)]
pub(crate) struct InFlight {
    pending: Mutex<HashMap<ContentHash, Vec<Waiter>>>,
}

/// What a caller should do after joining.
pub(crate) enum Role {
    /// Perform the fetch and report through the guard.
    Leader(FlightGuard),
    /// Wait for the leader.
    Follower(oneshot::Receiver<Result<Value>>),
}

impl InFlight {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Joins the flight for `hash`, becoming leader if none is running.
    pub(crate) fn join(self: &Arc<Self>, hash: &ContentHash) -> Role {
        let mut pending = self.pending.lock();
        if let Some(waiters) = pending.get_mut(hash) {
            let (tx, rx) = oneshot::channel();
            waiters.push(tx);
            return Role::Follower(rx);
        }

        pending.insert(hash.clone(), Vec::new());
        Role::Leader(FlightGuard {
            flights: Arc::clone(self),
            hash: hash.clone(),
            completed: false,
        })
    }

    /// Number of hashes with a read on the wire.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.pending.lock().len()
    }
}

/// Held by the leader. Dropping it without completing releases the slot,
/// and waiters see their channel close.
pub(crate) struct FlightGuard {
    flights: Arc<InFlight>,
    hash: ContentHash,
    completed: bool,
}

impl FlightGuard {
    /// Hands the outcome to every waiter and releases the slot.
    pub(crate) fn complete(mut self, outcome: &Result<Value>) -> usize {
        let waiters = self
            .flights
            .pending
            .lock()
            .remove(&self.hash)
            .unwrap_or_default();
        self.completed = true;

        let count = waiters.len();
        for waiter in waiters {
            let _ = waiter.send(replay(outcome));
        }
        count
    }
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        if !self.completed {
            self.flights.pending.lock().remove(&self.hash);
        }
    }
}

/// Copies an outcome for another waiter. Gateway errors only carry strings,
/// so they are rebuilt as-is; anything else keeps its message.
fn replay(outcome: &Result<Value>) -> Result<Value> {
    match outcome {
        Ok(value) => Ok(value.clone()),
        Err(BallotError::NetworkFailure { endpoint, reason }) => Err(BallotError::NetworkFailure {
            endpoint: endpoint.clone(),
            reason: reason.clone(),
        }),
        Err(BallotError::RemoteError {
            endpoint,
            status,
            body,
        }) => Err(BallotError::RemoteError {
            endpoint: endpoint.clone(),
            status: *status,
            body: body.clone(),
        }),
        Err(BallotError::MalformedResponse { endpoint, reason }) => {
            Err(BallotError::MalformedResponse {
                endpoint: endpoint.clone(),
                reason: reason.clone(),
            })
        }
        Err(BallotError::ConfigError(msg)) => Err(BallotError::ConfigError(msg.clone())),
        Err(other) => Err(BallotError::InternalError(other.to_string())),
    }
}
