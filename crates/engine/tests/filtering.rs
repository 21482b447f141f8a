#![forbid(unsafe_code)]

use sc_core::model::{Block, BlockStatus};
use sc_engine::{
    AuditQuery, ListMode, ListQuery, TimeFilter, filter_blocks, filter_history, filter_treatment,
    has_stale_items, reserved_blocks,
};
use sc_storage::{seed_blocks, seed_history, seed_treatment};
use time::{Date, Month};

fn today() -> Date {
    // Seed last-count dates are relative to late October.
    Date::from_calendar_date(2023, Month::October, 25).expect("valid date")
}

fn ids(blocks: &[&Block]) -> Vec<i64> {
    blocks.iter().map(|block| block.id.get()).collect()
}

#[test]
fn daily_meta_shows_all_open_blocks_by_default() {
    let blocks = seed_blocks();
    let visible = filter_blocks(&blocks, &ListQuery::daily_meta(), today());
    assert_eq!(ids(&visible), vec![1, 2, 3, 4, 5]);
}

#[test]
fn reserved_blocks_never_appear_in_lists() {
    let mut blocks = seed_blocks();
    blocks[1].status = BlockStatus::Progress;

    let daily = filter_blocks(&blocks, &ListQuery::daily_meta(), today());
    assert!(!ids(&daily).contains(&2));

    let browse = filter_blocks(&blocks, &ListQuery::browse(None), today());
    assert!(!ids(&browse).contains(&2));

    assert_eq!(ids(&reserved_blocks(&blocks)), vec![2]);
}

#[test]
fn daily_meta_hides_completed_but_browse_keeps_them() {
    let mut blocks = seed_blocks();
    blocks[2].status = BlockStatus::Completed;

    let daily = filter_blocks(&blocks, &ListQuery::daily_meta(), today());
    assert!(!ids(&daily).contains(&3));

    let browse = filter_blocks(&blocks, &ListQuery::browse(None), today());
    assert!(ids(&browse).contains(&3));
}

#[test]
fn daily_search_matches_items_or_location() {
    let blocks = seed_blocks();

    let mut by_item = ListQuery::daily_meta();
    by_item.search_text = Some("bronzina".to_string());
    assert_eq!(ids(&filter_blocks(&blocks, &by_item, today())), vec![1]);

    let mut by_location = ListQuery::daily_meta();
    by_location.search_text = Some("mezanino".to_string());
    assert_eq!(ids(&filter_blocks(&blocks, &by_location, today())), vec![5]);
}

#[test]
fn browse_search_ignores_locations() {
    let blocks = seed_blocks();
    let mut query = ListQuery::browse(None);
    query.search_text = Some("mezanino".to_string());
    assert!(filter_blocks(&blocks, &query, today()).is_empty());
}

#[test]
fn browse_segment_matches_subcategory_or_parent_ref() {
    let blocks = seed_blocks();

    let by_subcategory = ListQuery::browse(Some("Biela".to_string()));
    assert_eq!(
        ids(&filter_blocks(&blocks, &by_subcategory, today())),
        vec![1]
    );

    // "1029" only appears inside block 2's parent reference.
    let by_ref = ListQuery::browse(Some("1029".to_string()));
    assert_eq!(ids(&filter_blocks(&blocks, &by_ref, today())), vec![2]);

    let nothing = ListQuery::browse(Some("Radiadores".to_string()));
    assert!(filter_blocks(&blocks, &nothing, today()).is_empty());
}

#[test]
fn never_bucket_is_exactly_the_historyless_blocks() {
    let blocks = seed_blocks();
    let mut query = ListQuery::daily_meta();
    query.time_filter = TimeFilter::Never;
    // Only block 1 carries an item with no last count.
    assert_eq!(ids(&filter_blocks(&blocks, &query, today())), vec![1]);
}

#[test]
fn day_buckets_are_existential_over_items() {
    let blocks = seed_blocks();

    let mut query = ListQuery::daily_meta();
    query.time_filter = TimeFilter::Days30;
    // Block 1 via its historyless item, block 5 via 01/09 (54 days).
    assert_eq!(ids(&filter_blocks(&blocks, &query, today())), vec![1, 5]);

    query.time_filter = TimeFilter::Days15;
    // Block 4's 10/10 counts sit exactly on the 15-day threshold.
    assert_eq!(ids(&filter_blocks(&blocks, &query, today())), vec![1, 4, 5]);

    query.time_filter = TimeFilter::Days7;
    assert_eq!(ids(&filter_blocks(&blocks, &query, today())), vec![1, 4, 5]);
}

#[test]
fn time_buckets_compose_with_mode_predicates() {
    let blocks = seed_blocks();
    let mut query = ListQuery {
        mode: ListMode::Browse,
        search_text: None,
        segment: Some("Bomba D'água".to_string()),
        time_filter: TimeFilter::Days30,
    };
    assert_eq!(ids(&filter_blocks(&blocks, &query, today())), vec![5]);

    query.segment = Some("Pistões".to_string());
    assert!(filter_blocks(&blocks, &query, today()).is_empty());
}

#[test]
fn stale_badge_flags_historyless_or_month_old_items() {
    let blocks = seed_blocks();
    assert!(has_stale_items(&blocks[0], today()));
    assert!(has_stale_items(&blocks[4], today()));
    assert!(!has_stale_items(&blocks[2], today()));
}

#[test]
fn history_search_is_an_or_match_across_fields() {
    let history = seed_history();

    let by_item = AuditQuery {
        search_text: Some("bronzina".to_string()),
        ..AuditQuery::default()
    };
    let hits = filter_history(&history, &by_item);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, 1);

    let by_user = AuditQuery {
        search_text: Some("mariana".to_string()),
        ..AuditQuery::default()
    };
    assert_eq!(filter_history(&history, &by_user).len(), 1);

    let by_brand = AuditQuery {
        search_text: Some("tecfil".to_string()),
        ..AuditQuery::default()
    };
    assert_eq!(filter_history(&history, &by_brand)[0].id, 4);
}

#[test]
fn history_user_and_date_filters_are_conjunctive() {
    let history = seed_history();

    let by_users = AuditQuery {
        users: vec!["João Pedro".to_string()],
        ..AuditQuery::default()
    };
    assert_eq!(filter_history(&history, &by_users).len(), 1);

    // Inclusive range on the normalized ISO dates.
    let by_range = AuditQuery {
        start_date: Some("2023-10-24".to_string()),
        end_date: Some("2023-10-25".to_string()),
        ..AuditQuery::default()
    };
    assert_eq!(filter_history(&history, &by_range).len(), 3);

    let combined = AuditQuery {
        users: vec!["Carlos Silva".to_string()],
        start_date: Some("2023-10-24".to_string()),
        end_date: None,
        ..AuditQuery::default()
    };
    assert_eq!(filter_history(&history, &combined).len(), 2);
}

#[test]
fn treatment_filter_covers_reporter_and_skips_resolved() {
    let mut items = seed_treatment();

    let by_sku = AuditQuery {
        search_text: Some("wo-200".to_string()),
        ..AuditQuery::default()
    };
    assert_eq!(filter_treatment(&items, &by_sku).len(), 1);

    let by_reporter = AuditQuery {
        search_text: Some("carlos".to_string()),
        ..AuditQuery::default()
    };
    assert_eq!(filter_treatment(&items, &by_reporter)[0].id, 1);

    items[0].resolved = true;
    assert!(filter_treatment(&items, &by_reporter).is_empty());
    assert_eq!(filter_treatment(&items, &AuditQuery::default()).len(), 2);
}
