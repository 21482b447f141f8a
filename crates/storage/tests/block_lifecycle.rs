#![forbid(unsafe_code)]

use sc_core::ids::BlockId;
use sc_core::model::{BlockStatus, ItemStatus, User};
use sc_core::workflow::{CountEvent, apply};
use sc_storage::{CountStore, MemoryStore, SqliteStore, StoreError, load_seed};
use std::path::PathBuf;

fn temp_dir(test_name: &str) -> PathBuf {
    let base = std::env::temp_dir();
    let pid = std::process::id();
    let nonce = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    let dir = base.join(format!("sc_storage_{test_name}_{pid}_{nonce}"));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn seeded_memory() -> MemoryStore {
    let mut store = MemoryStore::new();
    load_seed(&mut store).expect("seed");
    store
}

fn count_everything(store: &mut dyn CountStore, id: BlockId) {
    let block = store.block(id).expect("read block").expect("block exists");
    let mut item_ids: Vec<_> = block.items.iter().map(|i| i.id.clone()).collect();
    let last = item_ids.pop().expect("at least one item");

    for item_id in &item_ids {
        let outcome = apply(&CountEvent::ConfirmCount {
            qty: 3,
            location_validated: true,
        })
        .expect("count outcome");
        store
            .record_count(id, item_id, &outcome, "Carlos Silva", "Agora")
            .expect("record count");
    }
    let outcome = apply(&CountEvent::ConfirmNotLocated).expect("not located outcome");
    store
        .record_count(id, &last, &outcome, "Carlos Silva", "Agora")
        .expect("record not located");
}

#[test]
fn reserve_count_finalize_removes_the_block() {
    let mut store = seeded_memory();
    let id = BlockId::new(1);

    store.reserve(id).expect("reserve");
    let reserved = store.block(id).expect("read").expect("still present");
    assert_eq!(reserved.status, BlockStatus::Progress);
    assert_eq!(reserved.items.len(), 3);

    count_everything(&mut store, id);
    store.finalize(id).expect("finalize");

    assert!(store.block(id).expect("read").is_none());
    let reserved_left: Vec<_> = store
        .blocks()
        .expect("blocks")
        .into_iter()
        .filter(|b| b.status == BlockStatus::Progress)
        .collect();
    assert!(reserved_left.is_empty());

    let events = store.events(100).expect("events");
    let types: Vec<_> = events.iter().map(|e| e.event_type.as_str()).collect();
    assert!(types.contains(&"block_reserved"));
    assert!(types.contains(&"count_recorded"));
    assert!(types.contains(&"block_finalized"));
    assert_eq!(events[0].event_id(), "evt_0000000000000001");
}

#[test]
fn finalize_refuses_while_items_are_pending() {
    let mut store = seeded_memory();
    let id = BlockId::new(1);
    store.reserve(id).expect("reserve");

    let block = store.block(id).expect("read").expect("present");
    let first = block.items[0].id.clone();
    let outcome = apply(&CountEvent::ConfirmCount {
        qty: 3,
        location_validated: true,
    })
    .expect("outcome");
    store
        .record_count(id, &first, &outcome, "Carlos Silva", "Agora")
        .expect("record");

    match store.finalize(id) {
        Err(StoreError::ItemsStillPending { pending }) => assert_eq!(pending, 2),
        other => panic!("expected pending refusal, got {other:?}"),
    }
    // Refusal is a no-op: the block is still reserved with its items.
    let block = store.block(id).expect("read").expect("still present");
    assert_eq!(block.status, BlockStatus::Progress);
    assert_eq!(block.items.len(), 3);
}

#[test]
fn finalize_requires_a_reservation() {
    let mut store = seeded_memory();
    match store.finalize(BlockId::new(2)) {
        Err(StoreError::NotReserved) => {}
        other => panic!("expected NotReserved, got {other:?}"),
    }
    match store.finalize(BlockId::new(999)) {
        Err(StoreError::UnknownId) => {}
        other => panic!("expected UnknownId, got {other:?}"),
    }
}

#[test]
fn re_reserving_is_a_no_op_in_effect() {
    let mut store = seeded_memory();
    let id = BlockId::new(2);
    store.reserve(id).expect("reserve");
    store.reserve(id).expect("reserve again");
    let block = store.block(id).expect("read").expect("present");
    assert_eq!(block.status, BlockStatus::Progress);
}

#[test]
fn unacknowledged_submit_keeps_the_block_for_retry() {
    let mut store = seeded_memory();
    let id = BlockId::new(2);
    store.reserve(id).expect("reserve");
    count_everything(&mut store, id);

    store.fail_next_finalize();
    match store.finalize(id) {
        Err(StoreError::SubmitNotAcknowledged) => {}
        other => panic!("expected SubmitNotAcknowledged, got {other:?}"),
    }
    let block = store.block(id).expect("read").expect("still present");
    assert_eq!(block.status, BlockStatus::Progress);

    // The retry goes through.
    store.finalize(id).expect("retry finalize");
    assert!(store.block(id).expect("read").is_none());
}

#[test]
fn reset_returns_items_to_pending() {
    let mut store = seeded_memory();
    let id = BlockId::new(3);
    store.reserve(id).expect("reserve");
    count_everything(&mut store, id);

    store.reset_block(id).expect("reset");
    let block = store.block(id).expect("read").expect("present");
    assert!(
        block
            .items
            .iter()
            .all(|item| item.status == ItemStatus::Pending)
    );
    assert!(block.items.iter().all(|item| item.counted_qty.is_none()));
    assert!(
        block
            .items
            .iter()
            .all(|item| item.divergence_reason.is_none())
    );
}

#[test]
fn recording_against_unknown_ids_is_rejected() {
    let mut store = seeded_memory();
    let outcome = apply(&CountEvent::ConfirmNotLocated).expect("outcome");

    let block = store
        .block(BlockId::new(1))
        .expect("read")
        .expect("present");
    let foreign = sc_core::ids::ItemId::compose(BlockId::new(99), 1);
    match store.record_count(BlockId::new(1), &foreign, &outcome, "X", "Agora") {
        Err(StoreError::UnknownItem) => {}
        other => panic!("expected UnknownItem, got {other:?}"),
    }
    match store.record_count(BlockId::new(999), &block.items[0].id, &outcome, "X", "Agora") {
        Err(StoreError::UnknownId) => {}
        other => panic!("expected UnknownId, got {other:?}"),
    }
}

#[test]
fn divergence_details_round_trip_through_sqlite() {
    let dir = temp_dir("divergence_details_round_trip");
    let id = BlockId::new(1);
    {
        let mut store = SqliteStore::open(&dir).expect("open store");
        load_seed(&mut store).expect("seed");
        store.reserve(id).expect("reserve");

        let block = store.block(id).expect("read").expect("present");
        let item_id = block.items[0].id.clone();
        let outcome = apply(&CountEvent::ConfirmDivergence {
            qty: 2,
            reason: "SKU físico diferente do sistema".to_string(),
        })
        .expect("divergence outcome");
        store
            .record_count(id, &item_id, &outcome, "Mariana Santos", "Agora")
            .expect("record divergence");
    }

    // Reopen: reservation and the recorded divergence survive.
    let store = SqliteStore::open(&dir).expect("reopen");
    let block = store.block(id).expect("read").expect("present");
    assert_eq!(block.status, BlockStatus::Progress);
    let item = &block.items[0];
    assert_eq!(item.status, ItemStatus::DivergenceInfo);
    assert_eq!(item.counted_qty, Some(2));
    assert_eq!(
        item.divergence_reason.as_deref(),
        Some("SKU físico diferente do sistema")
    );
    let echo = item.last_count.as_ref().expect("echo");
    assert_eq!(echo.user, "Mariana Santos");
    assert_eq!(echo.date, "Agora");
    assert_eq!(echo.qty, 2);
}

#[test]
fn sqlite_finalize_survives_reopen() {
    let dir = temp_dir("sqlite_finalize_survives_reopen");
    let id = BlockId::new(2);
    {
        let mut store = SqliteStore::open(&dir).expect("open store");
        load_seed(&mut store).expect("seed");
        store.reserve(id).expect("reserve");
        count_everything(&mut store, id);
        store.finalize(id).expect("finalize");
    }
    let store = SqliteStore::open(&dir).expect("reopen");
    assert!(store.block(id).expect("read").is_none());
    assert_eq!(store.blocks().expect("blocks").len(), 4);
}

#[test]
fn treatment_resolution_requires_permission() {
    let mut store = seeded_memory();
    let counter = User {
        id: "u2".to_string(),
        name: "Carlos Silva".to_string(),
        role: "Operador".to_string(),
        is_admin: false,
        can_treat: false,
    };
    let manager = User {
        id: "u1".to_string(),
        name: "Jose Victor".to_string(),
        role: "Gestor".to_string(),
        is_admin: true,
        can_treat: true,
    };

    match store.resolve_treatment(1, &counter) {
        Err(StoreError::PermissionDenied) => {}
        other => panic!("expected PermissionDenied, got {other:?}"),
    }
    store.resolve_treatment(1, &manager).expect("resolve");
    let items = store.treatment_items().expect("items");
    assert!(items.iter().find(|i| i.id == 1).expect("item").resolved);
    assert!(!items.iter().find(|i| i.id == 3).expect("item").resolved);
}
