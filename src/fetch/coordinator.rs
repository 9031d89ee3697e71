//! Request supersession and de-duplication.
//!
//! The coordinator is driven from a single event loop. It spawns one tokio
//! task per distinct query key and receives their results back over a
//! channel; whether a result may commit is decided by comparing its key
//! against the most recently issued key at settle time.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::Instrument;
use uuid::Uuid;

use crate::catalog::{CatalogClient, CatalogError, ProductPage, QueryBuilder, QueryKey};

/// Result of one spawned fetch, delivered back to the event loop.
#[derive(Debug)]
pub struct Completion {
    pub key: QueryKey,
    pub ticket: u64,
    pub result: Result<ProductPage, CatalogError>,
}

/// Lifecycle of one in-flight request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    Loading,
    /// A newer key was issued. The response will be dropped on arrival
    /// unless this key is issued again first.
    Superseded,
}

/// Coordinator-level phase for the latest issued key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPhase {
    #[default]
    Idle,
    Loading(QueryKey),
    Success(QueryKey),
    Error(QueryKey),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueOutcome {
    /// A new network request was started.
    Spawned { ticket: u64 },
    /// A request for the same key was already pending and is shared.
    Joined { ticket: u64 },
}

impl IssueOutcome {
    pub fn ticket(self) -> u64 {
        match self {
            IssueOutcome::Spawned { ticket } | IssueOutcome::Joined { ticket } => ticket,
        }
    }
}

#[derive(Debug)]
pub enum Settlement {
    /// Result belongs to the latest key and must replace the view model.
    Commit(Result<ProductPage, CatalogError>),
    /// Result belongs to a superseded key; drop it without surfacing anything.
    Discard,
}

#[derive(Debug)]
struct InFlight {
    ticket: u64,
    request_id: Uuid,
    status: RequestStatus,
}

pub struct FetchCoordinator {
    client: Arc<dyn CatalogClient>,
    deadline: Duration,
    completions: mpsc::UnboundedSender<Completion>,
    in_flight: HashMap<QueryKey, InFlight>,
    latest: Option<QueryKey>,
    phase: FetchPhase,
    next_ticket: u64,
}

impl FetchCoordinator {
    /// Returns the coordinator and the receiver its completions arrive on.
    pub fn new(
        client: Arc<dyn CatalogClient>,
        deadline: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<Completion>) {
        let (completions, receiver) = mpsc::unbounded_channel();
        let coordinator = Self {
            client,
            deadline,
            completions,
            in_flight: HashMap::new(),
            latest: None,
            phase: FetchPhase::Idle,
            next_ticket: 0,
        };
        (coordinator, receiver)
    }

    /// Make `key` the latest query, superseding every other pending request.
    ///
    /// Must be called from within a tokio runtime.
    pub fn issue(&mut self, key: QueryKey) -> IssueOutcome {
        for (other, entry) in self.in_flight.iter_mut() {
            if *other != key && entry.status == RequestStatus::Loading {
                entry.status = RequestStatus::Superseded;
                tracing::debug!(
                    request_id = %entry.request_id,
                    superseded = %other,
                    by = %key,
                    "request superseded"
                );
            }
        }

        self.latest = Some(key);
        self.phase = FetchPhase::Loading(key);

        if let Some(entry) = self.in_flight.get_mut(&key) {
            entry.status = RequestStatus::Loading;
            tracing::debug!(request_id = %entry.request_id, key = %key, "joined pending request");
            return IssueOutcome::Joined {
                ticket: entry.ticket,
            };
        }

        let ticket = self.next_ticket;
        self.next_ticket += 1;
        let request_id = Uuid::new_v4();
        self.in_flight.insert(
            key,
            InFlight {
                ticket,
                request_id,
                status: RequestStatus::Loading,
            },
        );
        self.spawn_fetch(key, ticket, request_id);
        IssueOutcome::Spawned { ticket }
    }

    /// Decide what a completed fetch may do. Compare-and-set on the latest key.
    pub fn settle(&mut self, completion: Completion) -> Settlement {
        let Completion {
            key,
            ticket,
            result,
        } = completion;

        let owned = self
            .in_flight
            .get(&key)
            .is_some_and(|entry| entry.ticket == ticket);
        if !owned {
            tracing::debug!(key = %key, ticket, "dropping orphaned completion");
            return Settlement::Discard;
        }
        let entry = self.in_flight.remove(&key);

        if self.latest != Some(key) {
            if let Some(entry) = entry {
                tracing::debug!(
                    request_id = %entry.request_id,
                    key = %key,
                    "discarding superseded response"
                );
            }
            return Settlement::Discard;
        }

        self.phase = match &result {
            Ok(_) => FetchPhase::Success(key),
            Err(_) => FetchPhase::Error(key),
        };
        Settlement::Commit(result)
    }

    pub fn latest(&self) -> Option<QueryKey> {
        self.latest
    }

    pub fn phase(&self) -> FetchPhase {
        self.phase
    }

    /// Status of a pending request, `None` once settled or never issued.
    pub fn status(&self, key: &QueryKey) -> Option<RequestStatus> {
        self.in_flight.get(key).map(|entry| entry.status)
    }

    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, FetchPhase::Loading(_))
    }

    fn spawn_fetch(&self, key: QueryKey, ticket: u64, request_id: Uuid) {
        let client = Arc::clone(&self.client);
        let completions = self.completions.clone();
        let deadline = self.deadline;
        let request = QueryBuilder::request(&key);
        let span = tracing::debug_span!("catalog_fetch", %request_id, query = %key);

        tokio::spawn(
            async move {
                let started = std::time::Instant::now();
                let result = match tokio::time::timeout(deadline, client.fetch_page(&request)).await {
                    Ok(result) => result,
                    Err(_) => Err(CatalogError::Timeout {
                        duration_ms: deadline.as_millis() as u64,
                    }),
                };

                match &result {
                    Ok(page) => tracing::debug!(
                        products = page.data.len(),
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "fetch completed"
                    ),
                    Err(e) => tracing::warn!(
                        error = %e,
                        error_type = e.error_type(),
                        "fetch failed"
                    ),
                }

                // Receiver gone means the engine shut down.
                let _ = completions.send(Completion {
                    key,
                    ticket,
                    result,
                });
            }
            .instrument(span),
        );
    }
}
