//! Background completion fetching.
//!
//! One worker thread services all fetches for an engine. Work items carry a
//! generation token; the thread drains its queue to the newest item, sleeps
//! out the debounce interval, and re-checks the token before and after the
//! fetch so superseded work is dropped as early as possible. Staleness here
//! only avoids wasted work — the session re-validates the cursor when a
//! result is applied, so a stale evaluation that slips through is harmless.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use tracing::debug;

use crate::protocol::{
    AcceptCompletionRequest, CompletionItem, GetCompletionsRequest, GetCompletionsResponse,
};

/// The completion-request collaborator. Implementations block; they are only
/// ever called from the worker thread.
pub trait CompletionProvider: Send + Sync {
    fn completions(
        &self,
        request: &GetCompletionsRequest,
    ) -> Result<GetCompletionsResponse, FetchError>;

    /// Fire-and-forget acceptance report. Failures are logged, never
    /// surfaced.
    fn completion_accepted(&self, request: &AcceptCompletionRequest);
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request cancelled")]
    Cancelled,
    #[error("transport error: {0}")]
    Transport(String),
}

/// Collaborator notified of non-cancellation fetch failures, once per
/// occurrence. The extension surfaces these on its action icon.
pub trait HealthSink: Send + Sync {
    fn report_error(&self, message: &str);
}

/// Default sink: log and move on.
pub struct LogHealthSink;

impl HealthSink for LogHealthSink {
    fn report_error(&self, message: &str) {
        tracing::warn!(message, "completion fetch failed");
    }
}

pub(crate) struct CompletionWork {
    pub request: GetCompletionsRequest,
    pub prefix_byte_offset: u64,
    pub generation: u64,
    pub debounce: Duration,
}

pub(crate) struct CompletionFetched {
    pub generation: u64,
    pub prefix_byte_offset: u64,
    /// `None` when no usable response was produced (error or cancellation).
    pub items: Option<Vec<CompletionItem>>,
}

pub(crate) struct FetchWorker {
    work_tx: mpsc::Sender<CompletionWork>,
    result_rx: mpsc::Receiver<CompletionFetched>,
    generation: Arc<AtomicU64>,
}

impl FetchWorker {
    pub fn new(provider: Arc<dyn CompletionProvider>, health: Arc<dyn HealthSink>) -> Self {
        let generation = Arc::new(AtomicU64::new(0));
        let (work_tx, work_rx) = mpsc::channel::<CompletionWork>();
        let (result_tx, result_rx) = mpsc::channel::<CompletionFetched>();
        {
            let generation = Arc::clone(&generation);
            thread::Builder::new()
                .name("quill-completions".into())
                .spawn(move || fetch_worker(work_rx, result_tx, generation, provider, health))
                .expect("failed to spawn completion worker");
        }
        Self {
            work_tx,
            result_rx,
            generation,
        }
    }

    pub fn submit(&self, work: CompletionWork) {
        self.generation.store(work.generation, Ordering::SeqCst);
        let _ = self.work_tx.send(work);
    }

    pub fn try_recv(&self) -> Option<CompletionFetched> {
        self.result_rx.try_recv().ok()
    }
}

fn fetch_worker(
    rx: mpsc::Receiver<CompletionWork>,
    tx: mpsc::Sender<CompletionFetched>,
    generation: Arc<AtomicU64>,
    provider: Arc<dyn CompletionProvider>,
    health: Arc<dyn HealthSink>,
) {
    while let Ok(work) = rx.recv() {
        // Drain: if multiple work items queued, skip to latest.
        let mut latest = work;
        while let Ok(newer) = rx.try_recv() {
            latest = newer;
        }

        if !latest.debounce.is_zero() {
            thread::sleep(latest.debounce);
            if latest.generation != generation.load(Ordering::SeqCst) {
                continue;
            }
        }
        if latest.generation != generation.load(Ordering::SeqCst) {
            continue;
        }

        let items = match provider.completions(&latest.request) {
            Ok(response) => Some(response.completion_items),
            Err(FetchError::Cancelled) => None,
            Err(FetchError::Transport(message)) => {
                health.report_error(&message);
                None
            }
        };

        if latest.generation != generation.load(Ordering::SeqCst) {
            debug!(generation = latest.generation, "dropping stale fetch result");
            continue;
        }
        let _ = tx.send(CompletionFetched {
            generation: latest.generation,
            prefix_byte_offset: latest.prefix_byte_offset,
            items,
        });
    }
}
