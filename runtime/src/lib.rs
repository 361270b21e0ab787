//! # Smart Entry Runtime
//!
//! Store runtime for the Smart Entry client.
//!
//! The Store coordinates reducer execution and effect handling: actions
//! are reduced synchronously under a write lock, the returned effects are
//! executed on spawned tasks, and any actions those effects produce are
//! fed back into the reducer and broadcast to observers.
//!
//! ## Core Components
//!
//! - **Store**: manages state and executes effects
//! - **Effect execution**: interprets effect descriptions and feeds
//!   resulting actions back into the reducer
//! - **Action broadcast**: lets callers await the terminal action of a
//!   request/response flow (`send_and_wait_for`)
//!
//! The runtime never retries a failed effect; retry policy belongs to the
//! caller, and none of the client workflows retry.
//!
//! ## Example
//!
//! ```ignore
//! use smart_entry_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Send an action
//! store.send(Action::Search { term: "doe".into() }).await?;
//!
//! // Read state
//! let results = store.state(|s| s.results.clone()).await;
//! ```

use smart_entry_core::{effect::Effect, reducer::Reducer};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::{RwLock, broadcast};

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        ///
        /// This error is returned when `send()` is called after shutdown
        /// initiated.
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Shutdown timed out waiting for effects to complete
        ///
        /// Some effects were still running when the timeout elapsed.
        #[error("Shutdown timed out with {0} effects still running")]
        ShutdownTimeout(usize),

        /// Timeout waiting for terminal action
        ///
        /// Returned by `send_and_wait_for` when the timeout expires before
        /// a matching action is received.
        #[error("Timeout waiting for action")]
        Timeout,

        /// Action broadcast channel closed
        ///
        /// The action broadcast channel was closed, typically because the
        /// store is shutting down.
        #[error("Action broadcast channel closed")]
        ChannelClosed,
    }
}

pub use error::StoreError;

/// Decrements the pending-effect counter when dropped
///
/// Guards the counter against effect task panics: the decrement happens
/// in `Drop`, so `shutdown` never waits on a task that died early.
struct DecrementGuard {
    counter: Arc<AtomicUsize>,
}

impl Drop for DecrementGuard {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::AcqRel);
    }
}

/// The Store runtime
///
/// Owns workflow state behind an async `RwLock`, runs the reducer under
/// the write lock, and executes the returned effects on spawned tasks.
/// Actions produced by effects are broadcast to observers and fed back
/// into the reducer.
///
/// # Concurrency
///
/// - The reducer executes synchronously while holding the write lock
/// - Effects execute asynchronously in spawned tasks
/// - `send()` returns after starting effect execution, not completion
/// - Multiple concurrent `send()` calls serialize at the reducer level
/// - Effects may complete in non-deterministic order; workflows that care
///   about ordering carry a request sequence number in their actions
pub struct Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    state: Arc<RwLock<S>>,
    reducer: R,
    environment: E,
    shutdown: Arc<AtomicBool>,
    pending_effects: Arc<AtomicUsize>,
    /// Action broadcast channel for observing actions produced by effects.
    ///
    /// Only effect-produced actions are broadcast (not the initial action
    /// passed to `send`). This enables request/response patterns via
    /// `send_and_wait_for`.
    action_broadcast: broadcast::Sender<A>,
}

impl<S, A, E, R> Clone for Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Clone,
    E: Clone,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            reducer: self.reducer.clone(),
            environment: self.environment.clone(),
            shutdown: Arc::clone(&self.shutdown),
            pending_effects: Arc::clone(&self.pending_effects),
            action_broadcast: self.action_broadcast.clone(),
        }
    }
}

impl<S, A, E, R> Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Clone + Send + Sync + 'static,
    A: Send + Clone + 'static,
    S: Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Create a new store with initial state, reducer, and environment
    ///
    /// The action broadcast capacity defaults to 16; use
    /// [`Store::with_broadcast_capacity`] when many observers subscribe.
    #[must_use]
    pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
        Self::with_broadcast_capacity(initial_state, reducer, environment, 16)
    }

    /// Create a new store with a custom action broadcast capacity
    ///
    /// # Arguments
    ///
    /// - `initial_state`: the starting state for the store
    /// - `reducer`: the reducer implementation (workflow logic)
    /// - `environment`: injected dependencies
    /// - `capacity`: action broadcast channel capacity
    #[must_use]
    pub fn with_broadcast_capacity(
        initial_state: S,
        reducer: R,
        environment: E,
        capacity: usize,
    ) -> Self {
        let (action_broadcast, _) = broadcast::channel(capacity);

        Self {
            state: Arc::new(RwLock::new(initial_state)),
            reducer,
            environment,
            shutdown: Arc::new(AtomicBool::new(false)),
            pending_effects: Arc::new(AtomicUsize::new(0)),
            action_broadcast,
        }
    }

    /// Send an action to the store
    ///
    /// This is the primary way to interact with the store:
    /// 1. Acquires the write lock on state
    /// 2. Calls the reducer with (state, action, environment)
    /// 3. Spawns the returned effects
    /// 4. Effects may produce more actions (feedback loop)
    ///
    /// `send()` returns after starting effect execution, not completion.
    /// Use [`Store::send_and_wait_for`] to await a terminal action.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting
    /// down.
    #[tracing::instrument(skip(self, action), name = "store_send")]
    pub async fn send(&self, action: A) -> Result<(), StoreError> {
        if self.shutdown.load(Ordering::Acquire) {
            tracing::warn!("Rejected action: store is shutting down");
            return Err(StoreError::ShutdownInProgress);
        }

        tracing::debug!("Processing action");

        let effects = {
            let mut state = self.state.write().await;
            self.reducer.reduce(&mut state, action, &self.environment)
        };

        tracing::trace!("Reducer returned {} effects", effects.len());
        for effect in effects {
            self.spawn_effect(effect);
        }

        Ok(())
    }

    /// Send an action and wait for a matching result action
    ///
    /// Designed for request/response flows: subscribes to the action
    /// broadcast BEFORE sending (avoiding a race with fast effects), sends
    /// the initial action, then waits for the first effect-produced action
    /// matching the predicate.
    ///
    /// # Arguments
    ///
    /// - `action`: the initial action to send
    /// - `predicate`: test for the terminal result action
    /// - `timeout`: maximum time to wait for a matching action
    ///
    /// # Errors
    ///
    /// - [`StoreError::Timeout`]: no matching action within `timeout`
    /// - [`StoreError::ChannelClosed`]: broadcast channel closed
    /// - [`StoreError::ShutdownInProgress`]: store is shutting down
    pub async fn send_and_wait_for<F>(
        &self,
        action: A,
        predicate: F,
        timeout: Duration,
    ) -> Result<A, StoreError>
    where
        F: Fn(&A) -> bool,
    {
        // Subscribe BEFORE sending to avoid a race with fast effects
        let mut rx = self.action_broadcast.subscribe();

        self.send(action).await?;

        tokio::time::timeout(timeout, async {
            loop {
                match rx.recv().await {
                    Ok(action) if predicate(&action) => return Ok(action),
                    Ok(_) => {},
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        // Keep waiting; if the terminal action was among the
                        // skipped ones the timeout catches it.
                        tracing::warn!(skipped, "Action observer lagged");
                    },
                    Err(broadcast::error::RecvError::Closed) => {
                        return Err(StoreError::ChannelClosed);
                    },
                }
            }
        })
        .await
        .map_err(|_| StoreError::Timeout)?
    }

    /// Subscribe to all actions produced by effects
    ///
    /// Returns a receiver that gets a clone of every effect-produced
    /// action. Initial actions passed to `send` are not broadcast.
    #[must_use]
    pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
        self.action_broadcast.subscribe()
    }

    /// Read current state via a closure
    ///
    /// Access state through a closure so the read lock is released
    /// promptly:
    ///
    /// ```ignore
    /// let result_count = store.state(|s| s.results.len()).await;
    /// ```
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&S) -> T,
    {
        let state = self.state.read().await;
        f(&state)
    }

    /// Initiate graceful shutdown of the store
    ///
    /// Sets the shutdown flag (rejecting new actions), then waits for
    /// pending effects to complete.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownTimeout`] if the timeout expires
    /// before all pending effects complete.
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
        tracing::info!("Initiating graceful shutdown");

        self.shutdown.store(true, Ordering::Release);

        let start = std::time::Instant::now();
        let poll_interval = Duration::from_millis(100);

        loop {
            let pending = self.pending_effects.load(Ordering::Acquire);

            if pending == 0 {
                tracing::info!("All effects completed, shutdown successful");
                return Ok(());
            }

            if start.elapsed() >= timeout {
                tracing::error!(pending_effects = pending, "Shutdown timeout");
                return Err(StoreError::ShutdownTimeout(pending));
            }

            tokio::time::sleep(poll_interval).await;
        }
    }

    /// Spawn a single top-level effect as a tracked task
    fn spawn_effect(&self, effect: Effect<A>) {
        if effect.is_none() {
            return;
        }

        self.pending_effects.fetch_add(1, Ordering::AcqRel);
        let guard = DecrementGuard {
            counter: Arc::clone(&self.pending_effects),
        };

        let this = self.clone();
        tokio::spawn(async move {
            let _guard = guard;
            Self::run_effect(this, effect).await;
        });
    }

    /// Execute an effect to completion, including any feedback actions
    ///
    /// Boxed because `Parallel`/`Sequential` recurse through it.
    fn run_effect(this: Self, effect: Effect<A>) -> Pin<Box<dyn Future<Output = ()> + Send>> {
        Box::pin(async move {
            match effect {
                Effect::None => {},
                Effect::Parallel(effects) => {
                    let mut handles = Vec::with_capacity(effects.len());
                    for inner in effects {
                        handles.push(tokio::spawn(Self::run_effect(this.clone(), inner)));
                    }
                    for handle in handles {
                        if let Err(join_error) = handle.await {
                            tracing::error!(%join_error, "Parallel effect task failed");
                        }
                    }
                },
                Effect::Sequential(effects) => {
                    for inner in effects {
                        Self::run_effect(this.clone(), inner).await;
                    }
                },
                Effect::Delay { duration, action } => {
                    tokio::time::sleep(duration).await;
                    this.feedback(*action).await;
                },
                Effect::Future(future) => {
                    if let Some(action) = future.await {
                        this.feedback(action).await;
                    }
                },
            }
        })
    }

    /// Feed an effect-produced action back into the reducer
    ///
    /// The action is reduced first and broadcast after, so an observer
    /// woken by `send_and_wait_for` always sees the state the terminal
    /// action produced. Feedback is still applied during shutdown:
    /// in-flight effects are exactly what a graceful shutdown waits on.
    async fn feedback(&self, action: A) {
        let effects = {
            let mut state = self.state.write().await;
            self.reducer.reduce(&mut state, action.clone(), &self.environment)
        };

        // No receivers is fine; broadcast only fails when nobody listens.
        let _ = self.action_broadcast.send(action);

        for effect in effects {
            self.spawn_effect(effect);
        }
    }
}
