use dashboard_core::{CollectionModel, CollectionState, RefreshOutcome};

#[test]
fn refresh_of_empty_collection_clears_loading() {
    let mut model: CollectionModel<u32> = CollectionModel::new();
    let ticket = model.begin_refresh();
    assert!(model.is_loading());

    assert_eq!(model.complete(ticket, Vec::new()), RefreshOutcome::Applied);
    assert_eq!(
        model.snapshot(),
        CollectionState {
            items: Vec::new(),
            is_loading: false
        }
    );
}

#[test]
fn snapshot_replaces_items_wholesale() {
    let mut model = CollectionModel::new();
    let first = model.begin_refresh();
    model.complete(first, vec![1, 2, 3]);

    let second = model.begin_refresh();
    model.complete(second, vec![4]);

    assert_eq!(model.items(), &[4]);
}

#[test]
fn failure_keeps_previous_items_and_clears_loading() {
    let mut model = CollectionModel::new();
    let first = model.begin_refresh();
    model.complete(first, vec!["a", "b"]);

    let second = model.begin_refresh();
    assert!(model.is_loading());
    assert_eq!(model.fail(second), RefreshOutcome::Applied);

    let state = model.snapshot();
    assert_eq!(state.items, vec!["a", "b"]);
    assert!(!state.is_loading);
}

#[test]
fn stale_response_cannot_overwrite_newer_request() {
    let mut model = CollectionModel::new();
    let slow = model.begin_refresh();
    let fast = model.begin_refresh();
    assert!(slow < fast);

    // The older request finishing first is dropped; the view keeps waiting.
    assert_eq!(model.complete(slow, vec![1]), RefreshOutcome::Superseded);
    assert!(model.is_loading());
    assert!(model.items().is_empty());

    assert_eq!(model.complete(fast, vec![2]), RefreshOutcome::Applied);
    assert_eq!(model.items(), &[2]);
    assert!(!model.is_loading());

    // A late failure of the old request does not touch the state either.
    assert_eq!(model.fail(slow), RefreshOutcome::Superseded);
    assert_eq!(model.items(), &[2]);
}

#[test]
fn abandoned_refresh_clears_loading() {
    let mut model: CollectionModel<u8> = CollectionModel::new();
    let first = model.begin_refresh();
    model.complete(first, vec![7]);

    let lost = model.begin_refresh();
    assert!(model.is_loading());
    model.abandon(lost);

    assert!(!model.is_loading());
    assert_eq!(model.items(), &[7]);
    assert_eq!(model.complete(lost, vec![8]), RefreshOutcome::Superseded);
}

#[test]
fn older_request_applies_once_newer_one_is_abandoned() {
    let mut model = CollectionModel::new();
    let older = model.begin_refresh();
    let newer = model.begin_refresh();

    model.abandon(newer);
    assert!(model.is_loading());

    assert_eq!(model.complete(older, vec![1]), RefreshOutcome::Applied);
    assert_eq!(model.items(), &[1]);
    assert!(!model.is_loading());
}
