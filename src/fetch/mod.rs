//! Fetch coordination: one authoritative request per query key.

mod coordinator;

pub use coordinator::{
    Completion, FetchCoordinator, FetchPhase, IssueOutcome, RequestStatus, Settlement,
};
