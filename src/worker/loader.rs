//! Off-thread loading with UI-thread completion delivery.
//!
//! [`AsyncLoader`] submits producer closures to a [`WorkerPool`] and keeps
//! their success and failure callbacks on the UI side, keyed by ticket.
//! Workers only ever send back the produced value or the error. Callbacks run
//! when the UI thread calls [`AsyncLoader::pump`] or
//! [`AsyncLoader::wait_and_pump`], so they are free to mutate UI state.
//!
//! The loader holds non-`Send` callbacks and therefore cannot leave the
//! thread that created it; the UI-thread guarantee is enforced by the type
//! system rather than checked at run time.
//!
//! There is no retry and no cancellation. Two submissions may complete in any
//! order; see [`RequestSequencer`](super::RequestSequencer) for discarding
//! superseded results.

use super::pool::WorkerPool;
use super::trace::TraceContext;
use crate::domain::{BoxError, LoadError, Result};
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};

type Outcome = std::result::Result<Box<dyn Any + Send>, LoadError>;
type Completion<S> = Box<dyn FnOnce(&mut S, Outcome)>;

/// Identifies one submitted load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadHandle(u64);

impl LoadHandle {
    pub const fn id(self) -> u64 {
        self.0
    }
}

/// Dispatches producers to worker threads and delivers their results to
/// callbacks that receive `&mut S` on the UI thread.
///
/// # Example
///
/// ```
/// use shelfdesk::worker::{AsyncLoader, WorkerPool};
/// use std::time::Duration;
///
/// let mut loader = AsyncLoader::<Vec<u32>>::new(WorkerPool::new(1).unwrap());
/// let mut shown = Vec::new();
///
/// loader.run(
///     || Ok::<_, String>(vec![1, 2, 3]),
///     |shown: &mut Vec<u32>, records| *shown = records,
///     |_, err| panic!("unexpected failure: {err}"),
/// );
///
/// assert!(loader.wait_idle(&mut shown, Duration::from_secs(5)));
/// assert_eq!(shown, vec![1, 2, 3]);
/// ```
pub struct AsyncLoader<S> {
    pool: WorkerPool,
    sender: Sender<(u64, Outcome)>,
    receiver: Receiver<(u64, Outcome)>,
    callbacks: HashMap<u64, Completion<S>>,
    next_ticket: u64,
}

impl<S> AsyncLoader<S> {
    /// Creates a loader submitting to `pool`.
    pub fn new(pool: WorkerPool) -> Self {
        let (sender, receiver) = unbounded();
        Self {
            pool,
            sender,
            receiver,
            callbacks: HashMap::new(),
            next_ticket: 0,
        }
    }

    /// Creates a loader submitting to the process-wide pool.
    ///
    /// # Errors
    ///
    /// Returns an error if the global pool has to be created and its threads
    /// cannot be spawned.
    pub fn with_global_pool() -> Result<Self> {
        Ok(Self::new(WorkerPool::global()?.clone()))
    }

    /// Runs `producer` on a worker thread.
    ///
    /// Exactly one of `on_success` or `on_failure` is later called from
    /// [`pump`](Self::pump) on this thread. A producer error is delivered as
    /// [`LoadError::Failed`], a producer panic as [`LoadError::Panicked`], and
    /// a shut-down pool as [`LoadError::PoolUnavailable`].
    pub fn run<R, E, P, F, G>(&mut self, producer: P, on_success: F, on_failure: G) -> LoadHandle
    where
        P: FnOnce() -> std::result::Result<R, E> + Send + 'static,
        R: Send + 'static,
        E: Into<BoxError> + 'static,
        S: 'static,
        F: FnOnce(&mut S, R) + 'static,
        G: FnOnce(&mut S, LoadError) + 'static,
    {
        self.next_ticket += 1;
        let ticket = self.next_ticket;

        self.callbacks.insert(
            ticket,
            Box::new(move |state: &mut S, outcome: Outcome| match outcome {
                Ok(value) => match value.downcast::<R>() {
                    Ok(value) => on_success(state, *value),
                    Err(_) => on_failure(state, LoadError::failed("load produced an unexpected type")),
                },
                Err(err) => on_failure(state, err),
            }),
        );

        let trace = TraceContext::from_current();
        let sender = self.sender.clone();
        let job = move || {
            let _context_guard = trace.as_ref().and_then(TraceContext::attach);
            let span = tracing::debug_span!("load_job", ticket);
            let _guard = span.entered();

            let outcome = match panic::catch_unwind(AssertUnwindSafe(producer)) {
                Ok(Ok(value)) => Ok(Box::new(value) as Box<dyn Any + Send>),
                Ok(Err(err)) => Err(LoadError::failed(err)),
                Err(payload) => Err(LoadError::Panicked(panic_message(payload.as_ref()))),
            };

            match &outcome {
                Ok(_) => tracing::debug!(ticket, "load completed"),
                Err(err) => tracing::warn!(ticket, error = %err, "load failed"),
            }

            // The loader may have been dropped; its completions are then moot.
            let _ = sender.send((ticket, outcome));
        };

        if let Err(err) = self.pool.execute(job) {
            tracing::warn!(ticket, error = %err, "load could not be submitted");
            // The receiver lives in `self`, so this send cannot fail.
            let _ = self.sender.send((ticket, Err(err)));
        }

        tracing::debug!(ticket, pending = self.callbacks.len(), "load submitted");
        LoadHandle(ticket)
    }

    /// Delivers every completion that has already arrived.
    ///
    /// Returns the number of callbacks run. Never blocks.
    pub fn pump(&mut self, state: &mut S) -> usize {
        let mut delivered = 0;
        while let Ok((ticket, outcome)) = self.receiver.try_recv() {
            self.deliver(state, ticket, outcome);
            delivered += 1;
        }
        delivered
    }

    /// Waits up to `timeout` for at least one completion, then delivers
    /// everything that has arrived.
    ///
    /// Returns immediately with 0 when nothing is pending.
    pub fn wait_and_pump(&mut self, state: &mut S, timeout: Duration) -> usize {
        if self.callbacks.is_empty() {
            return 0;
        }
        match self.receiver.recv_timeout(timeout) {
            Ok((ticket, outcome)) => {
                self.deliver(state, ticket, outcome);
                1 + self.pump(state)
            }
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => 0,
        }
    }

    /// Delivers completions until nothing is pending or `timeout` elapses.
    ///
    /// Returns `true` if every pending load was delivered.
    pub fn wait_idle(&mut self, state: &mut S, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while !self.callbacks.is_empty() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return false;
            }
            self.wait_and_pump(state, remaining);
        }
        true
    }

    /// Number of submitted loads whose callbacks have not run yet.
    pub fn pending(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_pending(&self, handle: LoadHandle) -> bool {
        self.callbacks.contains_key(&handle.0)
    }

    fn deliver(&mut self, state: &mut S, ticket: u64, outcome: Outcome) {
        match self.callbacks.remove(&ticket) {
            Some(callback) => callback(state, outcome),
            None => tracing::warn!(ticket, "completion without a registered callback"),
        }
    }
}

impl<S> fmt::Debug for AsyncLoader<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncLoader")
            .field("pool", &self.pool)
            .field("pending", &self.callbacks.len())
            .finish_non_exhaustive()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[derive(Default)]
    struct Screen {
        records: Vec<u32>,
        errors: Vec<String>,
        callback_threads: Vec<thread::ThreadId>,
    }

    fn loader() -> AsyncLoader<Screen> {
        AsyncLoader::new(WorkerPool::new(2).unwrap())
    }

    const WAIT: Duration = Duration::from_secs(5);

    #[test]
    fn success_is_delivered_on_the_pumping_thread() {
        let mut loader = loader();
        let mut screen = Screen::default();

        loader.run(
            || Ok::<_, String>(vec![7, 8]),
            |s: &mut Screen, records| {
                s.records = records;
                s.callback_threads.push(thread::current().id());
            },
            |s: &mut Screen, err| s.errors.push(err.to_string()),
        );

        assert!(loader.wait_idle(&mut screen, WAIT));
        assert_eq!(screen.records, vec![7, 8]);
        assert_eq!(screen.callback_threads, vec![thread::current().id()]);
    }

    #[test]
    fn failure_is_reported_once_and_loader_is_reusable() {
        let mut loader = loader();
        let mut screen = Screen {
            records: vec![1, 2, 3],
            ..Screen::default()
        };

        loader.run(
            || Err::<Vec<u32>, _>("boom"),
            |s: &mut Screen, records| s.records = records,
            |s: &mut Screen, err| {
                s.errors.push(err.to_string());
                s.callback_threads.push(thread::current().id());
            },
        );
        assert!(loader.wait_idle(&mut screen, WAIT));
        assert_eq!(screen.errors, vec!["boom".to_string()]);
        assert_eq!(screen.records, vec![1, 2, 3]);
        assert_eq!(screen.callback_threads, vec![thread::current().id()]);

        loader.run(
            || Ok::<_, String>(vec![9]),
            |s: &mut Screen, records| s.records = records,
            |s: &mut Screen, err| s.errors.push(err.to_string()),
        );
        assert!(loader.wait_idle(&mut screen, WAIT));
        assert_eq!(screen.records, vec![9]);
        assert_eq!(screen.errors.len(), 1);
    }

    #[test]
    fn producers_run_under_the_submitting_trace() {
        use opentelemetry::trace::{TraceContextExt, TraceId, TracerProvider as _};
        use tracing_opentelemetry::{OpenTelemetryLayer, OpenTelemetrySpanExt};
        use tracing_subscriber::layer::SubscriberExt;

        let provider = opentelemetry_sdk::trace::TracerProvider::builder().build();
        let subscriber =
            tracing_subscriber::registry().with(OpenTelemetryLayer::new(provider.tracer("loader-test")));

        let mut loader = AsyncLoader::<Option<TraceId>>::new(WorkerPool::new(1).unwrap());
        let mut seen = None;

        let submitted_under = tracing::subscriber::with_default(subscriber, || {
            let span = tracing::debug_span!("refresh");
            let _guard = span.enter();
            loader.run(
                || Ok::<_, String>(opentelemetry::Context::current().span().span_context().trace_id()),
                |seen: &mut Option<TraceId>, trace_id| *seen = Some(trace_id),
                |_, err| panic!("unexpected failure: {err}"),
            );
            span.context().span().span_context().trace_id()
        });

        assert!(loader.wait_idle(&mut seen, WAIT));
        assert_ne!(submitted_under, TraceId::INVALID);
        assert_eq!(seen, Some(submitted_under));
    }

    #[test]
    fn producer_panic_becomes_load_error() {
        let mut loader = loader();
        let mut screen = Screen::default();

        loader.run(
            || -> std::result::Result<Vec<u32>, String> { panic!("producer exploded") },
            |s: &mut Screen, records| s.records = records,
            |s: &mut Screen, err| {
                assert!(matches!(err, LoadError::Panicked(_)));
                s.errors.push(err.to_string());
            },
        );

        assert!(loader.wait_idle(&mut screen, WAIT));
        assert_eq!(screen.errors, vec!["load panicked: producer exploded".to_string()]);
    }

    #[test]
    fn callbacks_wait_for_pump() {
        let mut loader = loader();
        let mut screen = Screen::default();
        let (release_tx, release_rx) = crossbeam_channel::bounded::<()>(0);

        let handle = loader.run(
            move || {
                release_rx.recv().map_err(|e| e.to_string())?;
                Ok::<_, String>(vec![1])
            },
            |s: &mut Screen, records| s.records = records,
            |s: &mut Screen, err| s.errors.push(err.to_string()),
        );

        assert_eq!(loader.pump(&mut screen), 0);
        assert!(loader.is_pending(handle));
        assert_eq!(loader.pending(), 1);

        release_tx.send(()).unwrap();
        assert!(loader.wait_idle(&mut screen, WAIT));
        assert!(!loader.is_pending(handle));
        assert_eq!(screen.records, vec![1]);
    }

    #[test]
    fn wait_and_pump_without_pending_returns_immediately() {
        let mut loader = loader();
        let mut screen = Screen::default();
        assert_eq!(loader.wait_and_pump(&mut screen, Duration::from_secs(60)), 0);
    }

    #[test]
    fn every_submission_completes_exactly_once() {
        let mut loader = loader();
        let mut screen = Screen::default();

        for n in 0..20_u32 {
            loader.run(
                move || if n % 3 == 0 { Err(format!("fail {n}")) } else { Ok(n) },
                |s: &mut Screen, n| s.records.push(n),
                |s: &mut Screen, err| s.errors.push(err.to_string()),
            );
        }

        assert!(loader.wait_idle(&mut screen, WAIT));
        assert_eq!(screen.records.len() + screen.errors.len(), 20);
        assert_eq!(screen.errors.len(), 7);
    }
}
