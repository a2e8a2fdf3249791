//! Collapse concurrent executions of one operation into a single run.
//!
//! The first caller of [`SingleFlight::run`] becomes the leader and executes
//! the operation. Everyone who arrives while the leader is still running is
//! queued and receives the leader's outcome instead of running their own.
//! Once the outcome is known the flag is cleared, so the next caller starts
//! a fresh run.

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::oneshot;

struct FlightState<T> {
    in_flight: bool,
    waiters: Vec<oneshot::Sender<T>>,
}

/// Single-flight coordinator owned by one client instance.
pub struct SingleFlight<T> {
    state: Mutex<FlightState<T>>,
    /// Outcome delivered to waiters when the leader is cancelled mid-run.
    abandoned: T,
}

impl<T: Clone> SingleFlight<T> {
    /// Create a coordinator. `abandoned` is what waiters receive if the
    /// leading future is dropped before it finishes.
    #[must_use]
    pub const fn new(abandoned: T) -> Self {
        Self {
            state: Mutex::new(FlightState {
                in_flight: false,
                waiters: Vec::new(),
            }),
            abandoned,
        }
    }

    /// Run `operation`, or join the run already in progress.
    ///
    /// The mutex is only held for the flag check-and-set and for draining
    /// the queue, never across an await.
    pub async fn run<F, Fut>(&self, operation: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let waiter = {
            let mut state = self.lock();
            if state.in_flight {
                let (tx, rx) = oneshot::channel();
                state.waiters.push(tx);
                tracing::debug!(waiters = state.waiters.len(), "Joining in-flight operation");
                Some(rx)
            } else {
                state.in_flight = true;
                None
            }
        };

        if let Some(rx) = waiter {
            return rx.await.unwrap_or_else(|_| self.abandoned.clone());
        }

        let mut leader = Leader {
            flight: self,
            settled: false,
        };
        let outcome = operation().await;
        leader.settle(outcome.clone());
        outcome
    }

    /// Whether a run is currently outstanding.
    #[must_use]
    pub fn in_flight(&self) -> bool {
        self.lock().in_flight
    }

    /// Number of callers queued behind the current run.
    #[must_use]
    pub fn waiting(&self) -> usize {
        self.lock().waiters.len()
    }

    fn lock(&self) -> MutexGuard<'_, FlightState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Clone> Default for SingleFlight<T>
where
    T: Default,
{
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> std::fmt::Debug for SingleFlight<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("SingleFlight")
            .field("in_flight", &state.in_flight)
            .field("waiters", &state.waiters.len())
            .finish()
    }
}

/// Settles the flight exactly once, including when the leader is dropped.
struct Leader<'a, T: Clone> {
    flight: &'a SingleFlight<T>,
    settled: bool,
}

impl<T: Clone> Leader<'_, T> {
    fn settle(&mut self, outcome: T) {
        self.settled = true;

        let waiters = {
            let mut state = self.flight.lock();
            state.in_flight = false;
            std::mem::take(&mut state.waiters)
        };

        for waiter in waiters {
            // A waiter that gave up has dropped its receiver; nothing to deliver.
            let _ = waiter.send(outcome.clone());
        }
    }
}

impl<T: Clone> Drop for Leader<'_, T> {
    fn drop(&mut self) {
        if !self.settled {
            tracing::debug!("In-flight operation cancelled; releasing waiters");
            self.settle(self.flight.abandoned.clone());
        }
    }
}
