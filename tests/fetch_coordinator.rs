mod common;

use common::{key, page, product, ScriptedCatalog};
use std::sync::Arc;
use std::time::Duration;
use storefront::catalog::SortKey;
use storefront::fetch::{
    Completion, FetchCoordinator, FetchPhase, IssueOutcome, RequestStatus, Settlement,
};
use storefront::ErrorKind;
use tokio::sync::mpsc::UnboundedReceiver;

const PAGE_1: &str = "page=1&sort=-created_at";
const PAGE_2: &str = "page=2&sort=-created_at";

fn coordinator(
    catalog: &ScriptedCatalog,
    deadline: Duration,
) -> (FetchCoordinator, UnboundedReceiver<Completion>) {
    FetchCoordinator::new(Arc::new(catalog.clone()), deadline)
}

async fn next(rx: &mut UnboundedReceiver<Completion>) -> Completion {
    tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("completion timed out")
        .expect("completion channel closed")
}

#[tokio::test]
async fn test_newer_key_supersedes_pending_request() {
    let catalog = ScriptedCatalog::new();
    let (mut coord, mut rx) = coordinator(&catalog, Duration::from_secs(5));
    let k1 = key(1, SortKey::Newest, None, None);
    let k2 = key(2, SortKey::Newest, None, None);

    coord.issue(k1);
    coord.issue(k2);
    assert_eq!(coord.status(&k1), Some(RequestStatus::Superseded));
    assert_eq!(coord.status(&k2), Some(RequestStatus::Loading));
    assert_eq!(coord.latest(), Some(k2));
    assert_eq!(coord.phase(), FetchPhase::Loading(k2));

    catalog.wait_for_calls(2).await;
    catalog.resolve(PAGE_1, Ok(page(vec![product(1, 10.0, None)], 1, 2, 11)));
    let stale = next(&mut rx).await;
    assert_eq!(stale.key, k1);
    assert!(matches!(coord.settle(stale), Settlement::Discard));
    assert!(coord.is_loading());

    catalog.resolve(PAGE_2, Ok(page(vec![product(11, 10.0, None)], 2, 2, 11)));
    let fresh = next(&mut rx).await;
    match coord.settle(fresh) {
        Settlement::Commit(Ok(p)) => assert_eq!(p.data[0].id, 11),
        other => panic!("expected commit, got {:?}", other),
    }
    assert_eq!(coord.phase(), FetchPhase::Success(k2));
    assert_eq!(coord.in_flight_count(), 0);
}

#[tokio::test]
async fn test_out_of_order_arrival_never_regresses() {
    let catalog = ScriptedCatalog::new();
    let (mut coord, mut rx) = coordinator(&catalog, Duration::from_secs(5));
    let k1 = key(1, SortKey::Newest, None, None);
    let k2 = key(2, SortKey::Newest, None, None);

    coord.issue(k1);
    coord.issue(k2);
    catalog.wait_for_calls(2).await;

    // K2 lands first and commits.
    catalog.resolve(PAGE_2, Ok(page(vec![product(11, 1.0, None)], 2, 2, 11)));
    assert!(matches!(
        coord.settle(next(&mut rx).await),
        Settlement::Commit(Ok(_))
    ));

    // K1 lands afterwards and is dropped.
    catalog.resolve(PAGE_1, Ok(page(vec![product(1, 1.0, None)], 1, 2, 11)));
    assert!(matches!(coord.settle(next(&mut rx).await), Settlement::Discard));
    assert_eq!(coord.phase(), FetchPhase::Success(k2));
}

#[tokio::test]
async fn test_same_key_joins_pending_request() {
    let catalog = ScriptedCatalog::new();
    let (mut coord, mut rx) = coordinator(&catalog, Duration::from_secs(5));
    let k1 = key(1, SortKey::Newest, None, None);

    let first = coord.issue(k1);
    let second = coord.issue(k1);
    assert!(matches!(first, IssueOutcome::Spawned { .. }));
    assert_eq!(second, IssueOutcome::Joined { ticket: first.ticket() });

    catalog.wait_for_calls(1).await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(catalog.calls(), vec![PAGE_1.to_string()]);

    catalog.resolve(PAGE_1, Ok(page(vec![], 1, 0, 0)));
    assert!(matches!(
        coord.settle(next(&mut rx).await),
        Settlement::Commit(Ok(_))
    ));
}

#[tokio::test]
async fn test_returning_to_superseded_key_revives_it() {
    let catalog = ScriptedCatalog::new();
    let (mut coord, mut rx) = coordinator(&catalog, Duration::from_secs(5));
    let k1 = key(1, SortKey::Newest, None, None);
    let k2 = key(2, SortKey::Newest, None, None);

    coord.issue(k1);
    coord.issue(k2);
    let back = coord.issue(k1);
    assert!(matches!(back, IssueOutcome::Joined { .. }));
    assert_eq!(coord.status(&k1), Some(RequestStatus::Loading));
    assert_eq!(coord.status(&k2), Some(RequestStatus::Superseded));

    catalog.wait_for_calls(2).await;
    catalog.resolve(PAGE_2, Ok(page(vec![], 2, 2, 0)));
    catalog.resolve(PAGE_1, Ok(page(vec![product(1, 5.0, None)], 1, 2, 11)));

    let mut committed = 0;
    for _ in 0..2 {
        if let Settlement::Commit(Ok(p)) = coord.settle(next(&mut rx).await) {
            assert_eq!(p.data[0].id, 1);
            committed += 1;
        }
    }
    assert_eq!(committed, 1);
}

#[tokio::test]
async fn test_reissue_after_settle_fetches_again() {
    let catalog = ScriptedCatalog::new();
    let (mut coord, mut rx) = coordinator(&catalog, Duration::from_secs(5));
    let k1 = key(1, SortKey::Newest, None, None);

    coord.issue(k1);
    catalog.wait_for_calls(1).await;
    catalog.resolve(PAGE_1, Ok(page(vec![], 1, 0, 0)));
    coord.settle(next(&mut rx).await);

    let again = coord.issue(k1);
    assert!(matches!(again, IssueOutcome::Spawned { .. }));
    catalog.wait_for_calls(2).await;
}

#[tokio::test]
async fn test_deadline_surfaces_network_error() {
    let catalog = ScriptedCatalog::new();
    let (mut coord, mut rx) = coordinator(&catalog, Duration::from_millis(50));
    let k1 = key(1, SortKey::Newest, None, None);

    coord.issue(k1);
    match coord.settle(next(&mut rx).await) {
        Settlement::Commit(Err(e)) => assert_eq!(e.error_kind(), ErrorKind::Network),
        other => panic!("expected timeout error, got {:?}", other),
    }
    assert_eq!(coord.phase(), FetchPhase::Error(k1));
    assert!(!coord.is_loading());
}
