//! The event-processing loop that owns browse state.
//!
//! All state lives in one [`CatalogEngine`]. User intents and fetch
//! completions are handled one at a time, so the state tuple is never
//! mutated from two places. Each accepted intent issues the derived query;
//! each completion either commits a fresh view model or is discarded.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

use crate::catalog::{
    CatalogClient, CatalogError, HttpCatalogClient, QueryKey, ReconcileMode, ResultReconciler,
};
use crate::config::CatalogConfig;
use crate::fetch::{Completion, FetchCoordinator, Settlement};
use crate::ui::browse::{BrowseIntent, BrowseReducer, BrowseState, StateError};
use crate::ui::mvi::Reducer;
use crate::ui::view::ViewModel;

const COMMAND_BUFFER: usize = 32;

#[derive(Debug, Clone, Copy)]
pub struct EngineSettings {
    /// Upper bound on a single fetch before it surfaces as a network error.
    pub deadline: Duration,
    pub reconcile_mode: ReconcileMode,
}

impl From<&CatalogConfig> for EngineSettings {
    fn from(config: &CatalogConfig) -> Self {
        Self {
            deadline: config.request_timeout(),
            reconcile_mode: config.reconcile_mode(),
        }
    }
}

/// A view model together with the state it was published under.
///
/// Renderers draw both halves from the same frame, so labels and chips
/// always describe the listed products.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    pub state: BrowseState,
    pub view: ViewModel,
}

pub struct CatalogEngine {
    state: BrowseState,
    coordinator: FetchCoordinator,
    completions: mpsc::UnboundedReceiver<Completion>,
    reconciler: ResultReconciler,
    frames: watch::Sender<Frame>,
}

impl CatalogEngine {
    pub fn new(client: Arc<dyn CatalogClient>, settings: EngineSettings) -> Self {
        let (coordinator, completions) = FetchCoordinator::new(client, settings.deadline);
        let (frames, _) = watch::channel(Frame::default());
        Self {
            state: BrowseState::default(),
            coordinator,
            completions,
            reconciler: ResultReconciler::new(settings.reconcile_mode),
            frames,
        }
    }

    /// Engine backed by the HTTP catalog client.
    pub fn from_config(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let client = HttpCatalogClient::new(config)?;
        Ok(Self::new(Arc::new(client), EngineSettings::from(config)))
    }

    /// Replace the starting state before anything is issued.
    pub fn with_state(mut self, state: BrowseState) -> Self {
        self.state = state;
        self
    }

    pub fn state(&self) -> &BrowseState {
        &self.state
    }

    pub fn view(&self) -> ViewModel {
        self.frames.borrow().view.clone()
    }

    pub fn frame(&self) -> Frame {
        self.frames.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Frame> {
        self.frames.subscribe()
    }

    /// Issue the query for the current state.
    pub fn start(&mut self) -> QueryKey {
        self.issue_current()
    }

    /// Apply an intent. Rejected intents leave state and view untouched.
    pub fn dispatch(&mut self, intent: BrowseIntent) -> Result<QueryKey, StateError> {
        let issues_query = intent.issues_query();
        let next = BrowseReducer::reduce(&self.state, intent).inspect_err(|e| {
            tracing::debug!(error = %e, "intent rejected");
        })?;
        self.state = next;

        if issues_query {
            Ok(self.issue_current())
        } else {
            Ok(self.state.query_key())
        }
    }

    /// Wait for the next fetch completion and handle it.
    ///
    /// Returns `Some(true)` if it committed a view model, `Some(false)` if it
    /// was discarded.
    pub async fn settle_next(&mut self) -> Option<bool> {
        let completion = self.completions.recv().await?;
        Some(self.handle_completion(completion))
    }

    /// Settle completions until one commits.
    pub async fn settle_until_commit(&mut self) -> Option<ViewModel> {
        loop {
            if self.settle_next().await? {
                return Some(self.view());
            }
        }
    }

    pub fn handle_completion(&mut self, completion: Completion) -> bool {
        let key = completion.key;
        match self.coordinator.settle(completion) {
            Settlement::Discard => false,
            Settlement::Commit(Ok(page)) => {
                let last_page = page.meta.as_ref().and_then(|m| m.last_page);
                let view = self.reconciler.reconcile(&key, page, &self.state);

                if let Some(total) = last_page {
                    match BrowseReducer::reduce(&self.state, BrowseIntent::PagesKnown(total)) {
                        Ok(next) => self.state = next,
                        Err(e) => tracing::warn!(error = %e, "failed to record page count"),
                    }
                }

                tracing::info!(
                    key = %key,
                    products = view.products.len(),
                    total = view.meta.total,
                    "view committed"
                );
                self.publish(view);
                true
            }
            Settlement::Commit(Err(e)) => {
                tracing::warn!(key = %key, error = %e, "committing error view");
                self.publish(ViewModel::error(e.error_kind(), key.page));
                true
            }
        }
    }

    /// Drive the engine from a command channel until shutdown.
    pub async fn run(mut self, mut commands: mpsc::Receiver<EngineCommand>) {
        enum Event {
            Command(Option<EngineCommand>),
            Completion(Completion),
        }

        loop {
            let event = tokio::select! {
                command = commands.recv() => Event::Command(command),
                Some(completion) = self.completions.recv() => Event::Completion(completion),
            };

            match event {
                Event::Command(None) | Event::Command(Some(EngineCommand::Shutdown)) => {
                    tracing::debug!("engine shutting down");
                    break;
                }
                Event::Command(Some(EngineCommand::Dispatch { intent, respond_to })) => {
                    let _ = respond_to.send(self.dispatch(intent));
                }
                Event::Command(Some(EngineCommand::Snapshot { respond_to })) => {
                    let _ = respond_to.send(self.state.clone());
                }
                Event::Completion(completion) => {
                    self.handle_completion(completion);
                }
            }
        }
    }

    /// Issue the initial query and move the engine onto its own task.
    pub fn spawn(mut self) -> (EngineHandle, JoinHandle<()>) {
        if self.coordinator.latest().is_none() {
            self.start();
        }
        let (sender, receiver) = mpsc::channel(COMMAND_BUFFER);
        let handle = EngineHandle {
            sender,
            frames: self.subscribe(),
        };
        let task = tokio::spawn(self.run(receiver));
        (handle, task)
    }

    fn issue_current(&mut self) -> QueryKey {
        let key = self.state.query_key();
        let outcome = self.coordinator.issue(key);
        tracing::debug!(
            key = %key,
            version = self.state.version(),
            ticket = outcome.ticket(),
            "query issued"
        );
        let loading = ViewModel::loading(&self.frames.borrow().view);
        self.publish(loading);
        key
    }

    fn publish(&self, view: ViewModel) {
        self.frames.send_replace(Frame {
            state: self.state.clone(),
            view,
        });
    }
}

/// Commands accepted by a running engine.
#[derive(Debug)]
pub enum EngineCommand {
    Dispatch {
        intent: BrowseIntent,
        respond_to: oneshot::Sender<Result<QueryKey, StateError>>,
    },
    Snapshot {
        respond_to: oneshot::Sender<BrowseState>,
    },
    Shutdown,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("Catalog engine is not running")]
    Disconnected,
}

/// Cloneable access to a spawned engine.
#[derive(Clone)]
pub struct EngineHandle {
    sender: mpsc::Sender<EngineCommand>,
    frames: watch::Receiver<Frame>,
}

impl EngineHandle {
    pub async fn dispatch(
        &self,
        intent: BrowseIntent,
    ) -> Result<Result<QueryKey, StateError>, EngineError> {
        let (respond_to, receiver) = oneshot::channel();
        self.sender
            .send(EngineCommand::Dispatch { intent, respond_to })
            .await
            .map_err(|_| EngineError::Disconnected)?;
        receiver.await.map_err(|_| EngineError::Disconnected)
    }

    pub async fn state(&self) -> Result<BrowseState, EngineError> {
        let (respond_to, receiver) = oneshot::channel();
        self.sender
            .send(EngineCommand::Snapshot { respond_to })
            .await
            .map_err(|_| EngineError::Disconnected)?;
        receiver.await.map_err(|_| EngineError::Disconnected)
    }

    /// A receiver that observes every published frame.
    pub fn frames(&self) -> watch::Receiver<Frame> {
        self.frames.clone()
    }

    pub async fn shutdown(&self) {
        let _ = self.sender.send(EngineCommand::Shutdown).await;
    }
}
