mod common;

use std::sync::Arc;

use dashboard_core::{ArtifactKind, RefreshOutcome};
use dashboard_engine::{CollectionController, FailureKind, Operation};
use pretty_assertions::assert_eq;

use common::{artifact, init_logging, transport_error, FakeService, RecordingSink};

fn controller(
    kind: ArtifactKind,
    service: &Arc<FakeService>,
    sink: &Arc<RecordingSink>,
) -> CollectionController {
    CollectionController::new(kind, service.clone(), sink.clone())
}

#[tokio::test]
async fn refresh_on_empty_collection_yields_empty_snapshot() {
    init_logging();
    let service = Arc::new(FakeService::new());
    let sink = Arc::new(RecordingSink::default());
    let media = controller(ArtifactKind::Media, &service, &sink);

    assert_eq!(media.refresh().await, Ok(RefreshOutcome::Applied));

    let state = media.current_state();
    assert!(state.items.is_empty());
    assert!(!state.is_loading);
    assert!(sink.take().is_empty());
}

#[tokio::test]
async fn refresh_replaces_items_with_new_snapshot() {
    init_logging();
    let service = Arc::new(FakeService::new());
    let sink = Arc::new(RecordingSink::default());
    let docs = controller(ArtifactKind::Document, &service, &sink);

    service.set_items(
        ArtifactKind::Document,
        vec![artifact(1, "https://x.org/a.pdf"), artifact(2, "https://x.org/b.pdf")],
    );
    docs.refresh().await.unwrap();
    assert_eq!(docs.current_state().items.len(), 2);

    service.set_items(ArtifactKind::Document, vec![artifact(3, "https://x.org/c.pdf")]);
    docs.refresh().await.unwrap();
    let ids: Vec<_> = docs
        .current_state()
        .items
        .into_iter()
        .map(|item| item.id.to_string())
        .collect();
    assert_eq!(ids, vec!["3"]);
    assert_eq!(FakeService::count(&service.document_lists), 2);
    assert_eq!(FakeService::count(&service.media_lists), 0);
}

#[tokio::test]
async fn failed_refresh_keeps_items_and_reports() {
    init_logging();
    let service = Arc::new(FakeService::new());
    let sink = Arc::new(RecordingSink::default());
    let docs = controller(ArtifactKind::Document, &service, &sink);

    service.set_items(ArtifactKind::Document, vec![artifact(1, "https://x.org/a.pdf")]);
    docs.refresh().await.unwrap();

    service.fail_lists(Some(transport_error(
        Operation::ListDocuments,
        FailureKind::Timeout,
    )));
    let err = docs.refresh().await.unwrap_err();
    assert_eq!(err.failure_kind(), Some(&FailureKind::Timeout));

    let state = docs.current_state();
    assert_eq!(state.items.len(), 1);
    assert!(!state.is_loading);

    let notifications = sink.take();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].operation, Operation::ListDocuments);
}

#[tokio::test]
async fn loading_flag_is_set_while_request_is_pending() {
    init_logging();
    let service = Arc::new(FakeService::new());
    let sink = Arc::new(RecordingSink::default());
    let media = Arc::new(controller(ArtifactKind::Media, &service, &sink));

    let reply = service.script_list();
    let pending = tokio::spawn({
        let media = media.clone();
        async move { media.refresh().await }
    });
    tokio::task::yield_now().await;
    assert!(media.current_state().is_loading);

    reply.send(Ok(vec![artifact(9, "https://v.example/9")])).unwrap();
    assert_eq!(pending.await.unwrap(), Ok(RefreshOutcome::Applied));
    let state = media.current_state();
    assert!(!state.is_loading);
    assert_eq!(state.items.len(), 1);
}

#[tokio::test]
async fn slow_older_response_does_not_overwrite_newer_one() {
    init_logging();
    let service = Arc::new(FakeService::new());
    let sink = Arc::new(RecordingSink::default());
    let media = Arc::new(controller(ArtifactKind::Media, &service, &sink));

    let slow_reply = service.script_list();
    let fast_reply = service.script_list();

    let slow = tokio::spawn({
        let media = media.clone();
        async move { media.refresh().await }
    });
    tokio::task::yield_now().await;
    let fast = tokio::spawn({
        let media = media.clone();
        async move { media.refresh().await }
    });
    tokio::task::yield_now().await;

    fast_reply
        .send(Ok(vec![artifact(2, "https://v.example/new")]))
        .unwrap();
    assert_eq!(fast.await.unwrap(), Ok(RefreshOutcome::Applied));

    slow_reply
        .send(Ok(vec![artifact(1, "https://v.example/old")]))
        .unwrap();
    assert_eq!(slow.await.unwrap(), Ok(RefreshOutcome::Superseded));

    let state = media.current_state();
    assert_eq!(state.items[0].source_url, "https://v.example/new");
    assert!(!state.is_loading);
}

#[tokio::test]
async fn superseded_failure_is_not_reported() {
    init_logging();
    let service = Arc::new(FakeService::new());
    let sink = Arc::new(RecordingSink::default());
    let media = Arc::new(controller(ArtifactKind::Media, &service, &sink));

    let old_reply = service.script_list();
    let old = tokio::spawn({
        let media = media.clone();
        async move { media.refresh().await }
    });
    tokio::task::yield_now().await;

    // Unscripted: answers immediately with the (empty) current items.
    media.refresh().await.unwrap();

    old_reply
        .send(Err(transport_error(Operation::ListMedia, FailureKind::Network)))
        .unwrap();
    assert!(old.await.unwrap().is_err());
    assert!(sink.take().is_empty());
    assert!(!media.current_state().is_loading);
}

#[tokio::test]
async fn dropped_refresh_does_not_leave_collection_loading() {
    init_logging();
    let service = Arc::new(FakeService::new());
    let sink = Arc::new(RecordingSink::default());
    let media = Arc::new(controller(ArtifactKind::Media, &service, &sink));

    let older_reply = service.script_list();
    let _never_answered = service.script_list();

    let older = tokio::spawn({
        let media = media.clone();
        async move { media.refresh().await }
    });
    tokio::task::yield_now().await;

    let timed_out =
        tokio::time::timeout(std::time::Duration::from_millis(10), media.refresh()).await;
    assert!(timed_out.is_err());
    assert!(media.current_state().is_loading);

    older_reply
        .send(Ok(vec![artifact(1, "https://v.example/1.mp4")]))
        .unwrap();
    assert_eq!(older.await.unwrap(), Ok(RefreshOutcome::Applied));

    let state = media.current_state();
    assert_eq!(state.items.len(), 1);
    assert!(!state.is_loading);
    assert!(sink.take().is_empty());
}

#[tokio::test]
async fn dropped_only_refresh_clears_loading() {
    init_logging();
    let service = Arc::new(FakeService::new());
    let sink = Arc::new(RecordingSink::default());
    let docs = controller(ArtifactKind::Document, &service, &sink);

    let _never_answered = service.script_list();
    let timed_out =
        tokio::time::timeout(std::time::Duration::from_millis(10), docs.refresh()).await;

    assert!(timed_out.is_err());
    assert!(!docs.current_state().is_loading);
}
