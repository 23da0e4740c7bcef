//! Request table, deduplication and background dispatch.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use sheetwise_core::CellError;
use tokio::runtime::Handle;
use tokio::sync::{broadcast, watch};

use crate::client::{ChatClient, HttpChatClient};
use crate::config::GptConfig;
use crate::error::{GptError, Result};
use crate::request::{generate_request_id, placeholder, CompletionSignal, GptRequest, RequestStatus};

/// Capacity of the completion broadcast; slow subscribers see `Lagged`.
const COMPLETION_CHANNEL_CAPACITY: usize = 256;

type Outcome = watch::Sender<Option<CompletionSignal>>;

struct Entry {
    request: GptRequest,
    outcome: Arc<Outcome>,
}

struct Inner {
    client: Arc<dyn ChatClient>,
    runtime: Handle,
    table: Mutex<HashMap<String, Entry>>,
    completions: broadcast::Sender<CompletionSignal>,
}

impl Inner {
    fn table(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Owns the completion requests of one document or session.
///
/// Cloning is cheap and every clone shares the same table. Identical prompts
/// that are still pending share one request; once a request has finished, the
/// same prompt starts a new one. Failed requests are never retried.
#[derive(Clone)]
pub struct GptService {
    inner: Arc<Inner>,
}

impl GptService {
    /// Create a service that issues calls through `client` on `runtime`.
    pub fn new(client: impl ChatClient, runtime: Handle) -> Self {
        Self::with_client(Arc::new(client), runtime)
    }

    pub fn with_client(client: Arc<dyn ChatClient>, runtime: Handle) -> Self {
        let (completions, _) = broadcast::channel(COMPLETION_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                client,
                runtime,
                table: Mutex::new(HashMap::new()),
                completions,
            }),
        }
    }

    /// Create a service backed by [`HttpChatClient`].
    pub fn http(config: GptConfig, runtime: Handle) -> Result<Self> {
        Ok(Self::new(HttpChatClient::new(config)?, runtime))
    }

    /// Create a service on the runtime the caller is running in.
    pub fn current(client: impl ChatClient) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|e| GptError::NoRuntime(e.to_string()))?;
        Ok(Self::new(client, runtime))
    }

    /// Start (or join) the request for `prompt`. Never blocks on the network.
    pub fn request(&self, prompt: &str) -> GptHandle {
        let mut table = self.inner.table();

        if let Some(entry) = table
            .values()
            .find(|entry| entry.request.is_pending() && entry.request.prompt == prompt)
        {
            tracing::debug!("Joining pending request {}", entry.request.id);
            return GptHandle {
                request_id: entry.request.id.clone(),
                outcome: entry.outcome.subscribe(),
            };
        }

        let id = loop {
            let id = generate_request_id();
            if !table.contains_key(&id) {
                break id;
            }
        };

        let (outcome, receiver) = watch::channel(None);
        let outcome = Arc::new(outcome);
        table.insert(
            id.clone(),
            Entry {
                request: GptRequest::pending(id.clone(), prompt),
                outcome: Arc::clone(&outcome),
            },
        );
        drop(table);

        tracing::info!("Issuing completion request {id}");
        self.inner.runtime.spawn(run_request(
            Arc::clone(&self.inner),
            outcome,
            id.clone(),
            prompt.to_string(),
        ));

        GptHandle {
            request_id: id,
            outcome: receiver,
        }
    }

    /// Receive every completion signal issued after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<CompletionSignal> {
        self.inner.completions.subscribe()
    }

    /// Snapshot of one request.
    pub fn get(&self, request_id: &str) -> Option<GptRequest> {
        self.inner
            .table()
            .get(request_id)
            .map(|entry| entry.request.clone())
    }

    /// Snapshot of every request, oldest first.
    pub fn requests(&self) -> Vec<GptRequest> {
        let mut requests: Vec<GptRequest> = self
            .inner
            .table()
            .values()
            .map(|entry| entry.request.clone())
            .collect();
        requests.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        requests
    }

    pub fn pending_count(&self) -> usize {
        self.inner
            .table()
            .values()
            .filter(|entry| entry.request.is_pending())
            .count()
    }

    /// Drop completed and failed requests. Returns how many were removed.
    pub fn clear_finished(&self) -> usize {
        let mut table = self.inner.table();
        let before = table.len();
        table.retain(|_, entry| entry.request.is_pending());
        before - table.len()
    }

    /// Drop every request. Calls already in flight still deliver their
    /// completion to handles and subscribers.
    pub fn clear(&self) -> usize {
        let mut table = self.inner.table();
        let removed = table.len();
        table.clear();
        removed
    }
}

async fn run_request(inner: Arc<Inner>, outcome: Arc<Outcome>, id: String, prompt: String) {
    // A panicking client shows up here as a JoinError
    let client = Arc::clone(&inner.client);
    let call = inner.runtime.spawn({
        let prompt = prompt.clone();
        async move { client.complete(prompt).await }
    });

    let (status, result) = match call.await {
        Ok(Ok(reply)) => {
            tracing::info!("Completion request {id} finished");
            (RequestStatus::Completed, reply)
        }
        Ok(Err(e)) => {
            tracing::warn!("Completion request {id} failed: {e}");
            (RequestStatus::Error, CellError::ApiError.as_str().to_string())
        }
        Err(e) => {
            tracing::warn!("Completion request {id} aborted: {e}");
            (RequestStatus::Error, CellError::ApiError.as_str().to_string())
        }
    };

    let signal = CompletionSignal {
        request_id: id,
        result,
        prompt,
    };

    if let Some(entry) = inner.table().get_mut(&signal.request_id) {
        entry.request.finish(status, signal.result.clone());
    }

    outcome.send_replace(Some(signal.clone()));
    // No subscribers is fine
    let _ = inner.completions.send(signal);
}

/// A caller's view of one request: its id, its placeholder text and its
/// eventual completion.
#[derive(Debug, Clone)]
pub struct GptHandle {
    request_id: String,
    outcome: watch::Receiver<Option<CompletionSignal>>,
}

impl GptHandle {
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Text to display until the completion arrives.
    pub fn placeholder(&self) -> String {
        placeholder(&self.request_id)
    }

    /// The completion, if it has already arrived.
    pub fn try_result(&self) -> Option<CompletionSignal> {
        self.outcome.borrow().clone()
    }

    /// Wait for the completion.
    pub async fn wait(mut self) -> Result<CompletionSignal> {
        let request_id = self.request_id;
        let signal: Option<CompletionSignal> = self
            .outcome
            .wait_for(Option::is_some)
            .await
            .map_err(|_| GptError::Abandoned(request_id.clone()))?
            .clone();
        signal.ok_or(GptError::Abandoned(request_id))
    }
}
