#![forbid(unsafe_code)]

use crate::dates::{DAYS_OVERDUE_UNKNOWN, days_since};
use sc_core::model::{Block, BlockStatus, HistoryBlock, Item, TreatmentItem};
use time::Date;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListMode {
    /// The daily goal list: open work only, search covers locations too.
    DailyMeta,
    /// Category browsing from the hub: segment-scoped, item search only.
    Browse,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeFilter {
    All,
    Days7,
    Days15,
    Days30,
    Never,
}

impl TimeFilter {
    fn threshold(self) -> Option<i64> {
        match self {
            TimeFilter::All | TimeFilter::Never => None,
            TimeFilter::Days7 => Some(7),
            TimeFilter::Days15 => Some(15),
            TimeFilter::Days30 => Some(30),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ListQuery {
    pub mode: ListMode,
    pub search_text: Option<String>,
    pub segment: Option<String>,
    pub time_filter: TimeFilter,
}

impl ListQuery {
    pub fn daily_meta() -> Self {
        Self {
            mode: ListMode::DailyMeta,
            search_text: None,
            segment: None,
            time_filter: TimeFilter::All,
        }
    }

    pub fn browse(segment: Option<String>) -> Self {
        Self {
            mode: ListMode::Browse,
            search_text: None,
            segment,
            time_filter: TimeFilter::All,
        }
    }
}

fn item_matches_search(item: &Item, needle: &str) -> bool {
    item.name.to_lowercase().contains(needle) || item.sku.to_lowercase().contains(needle)
}

fn item_days_since(item: &Item, today: Date) -> i64 {
    match &item.last_count {
        Some(last) => days_since(&last.date, today),
        None => DAYS_OVERDUE_UNKNOWN,
    }
}

fn item_in_bucket(item: &Item, filter: TimeFilter, today: Date) -> bool {
    match filter {
        TimeFilter::All => true,
        TimeFilter::Never => item.last_count.is_none(),
        _ => {
            // No history counts as overdue for every threshold.
            if item.last_count.is_none() {
                return true;
            }
            let threshold = filter.threshold().unwrap_or(0);
            item_days_since(item, today) >= threshold
        }
    }
}

/// Browse/daily list selection: an AND-combination of independently
/// composable predicates over the block set. Reserved (`progress`) blocks
/// never appear here.
pub fn filter_blocks<'a>(blocks: &'a [Block], query: &ListQuery, today: Date) -> Vec<&'a Block> {
    let needle = query
        .search_text
        .as_deref()
        .map(str::to_lowercase)
        .filter(|text| !text.is_empty());

    blocks
        .iter()
        .filter(|block| {
            if block.status == BlockStatus::Progress {
                return false;
            }

            match query.mode {
                ListMode::DailyMeta => {
                    if block.status == BlockStatus::Completed {
                        return false;
                    }
                    if let Some(needle) = &needle {
                        let matches_items =
                            block.items.iter().any(|item| item_matches_search(item, needle));
                        let matches_location = block.location.to_lowercase().contains(needle);
                        if !matches_items && !matches_location {
                            return false;
                        }
                    }
                }
                ListMode::Browse => {
                    if let Some(segment) = &query.segment {
                        let matches_segment = block.subcategory.as_deref() == Some(segment.as_str())
                            || block.parent_ref.contains(segment.as_str());
                        if !matches_segment {
                            return false;
                        }
                    }
                    if let Some(needle) = &needle {
                        if !block.items.iter().any(|item| item_matches_search(item, needle)) {
                            return false;
                        }
                    }
                }
            }

            if query.time_filter != TimeFilter::All {
                // Existential: one overdue item is enough for the block.
                let hit = block
                    .items
                    .iter()
                    .any(|item| item_in_bucket(item, query.time_filter, today));
                if !hit {
                    return false;
                }
            }

            true
        })
        .collect()
}

/// The reserved screen's working set.
pub fn reserved_blocks(blocks: &[Block]) -> Vec<&Block> {
    blocks
        .iter()
        .filter(|block| block.status == BlockStatus::Progress)
        .collect()
}

/// Critical-items badge: any item never counted or stale beyond 30 days.
pub fn has_stale_items(block: &Block, today: Date) -> bool {
    block
        .items
        .iter()
        .any(|item| item.last_count.is_none() || item_days_since(item, today) > 30)
}

/// Filter over the history/treatment audit datasets: free-text OR-match,
/// optional user-set membership, and an inclusive range over the
/// normalized ISO date (lexicographic compare).
#[derive(Clone, Debug, Default)]
pub struct AuditQuery {
    pub search_text: Option<String>,
    pub users: Vec<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl AuditQuery {
    fn needle(&self) -> Option<String> {
        self.search_text
            .as_deref()
            .map(str::to_lowercase)
            .filter(|text| !text.is_empty())
    }

    fn user_passes(&self, user: &str) -> bool {
        self.users.is_empty() || self.users.iter().any(|u| u == user)
    }

    fn date_passes(&self, raw_date: &str) -> bool {
        if let Some(start) = self.start_date.as_deref().filter(|d| !d.is_empty()) {
            if raw_date < start {
                return false;
            }
        }
        if let Some(end) = self.end_date.as_deref().filter(|d| !d.is_empty()) {
            if raw_date > end {
                return false;
            }
        }
        true
    }
}

pub fn filter_history<'a>(blocks: &'a [HistoryBlock], query: &AuditQuery) -> Vec<&'a HistoryBlock> {
    let needle = query.needle();
    blocks
        .iter()
        .filter(|block| {
            if let Some(needle) = &needle {
                let matches = block.location.to_lowercase().contains(needle)
                    || block.parent_ref.to_lowercase().contains(needle)
                    || block.user.to_lowercase().contains(needle)
                    || block.items.iter().any(|item| {
                        item.name.to_lowercase().contains(needle)
                            || item.sku.to_lowercase().contains(needle)
                            || item.brand.to_lowercase().contains(needle)
                    });
                if !matches {
                    return false;
                }
            }
            query.user_passes(&block.user) && query.date_passes(&block.raw_date)
        })
        .collect()
}

/// Open issues only; resolved entries have left the queue.
pub fn filter_treatment<'a>(
    items: &'a [TreatmentItem],
    query: &AuditQuery,
) -> Vec<&'a TreatmentItem> {
    let needle = query.needle();
    items
        .iter()
        .filter(|item| {
            if item.resolved {
                return false;
            }
            if let Some(needle) = &needle {
                let matches = item.name.to_lowercase().contains(needle)
                    || item.sku.to_lowercase().contains(needle)
                    || item.location.to_lowercase().contains(needle)
                    || item.reported_by.to_lowercase().contains(needle);
                if !matches {
                    return false;
                }
            }
            query.user_passes(&item.reported_by) && query.date_passes(&item.raw_date)
        })
        .collect()
}
