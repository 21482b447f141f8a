#![forbid(unsafe_code)]

//! Manager-facing aggregates, derived from store state and the counting
//! policy. Independent of the workflow engine.

use sc_core::model::{Block, BlockStatus, IssueKind, TreatmentItem};
use sc_core::settings::CountingSettings;
use sc_storage::EventRow;
use time::{Date, OffsetDateTime};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DailyProgress {
    pub counted: i64,
    pub target: i64,
    pub percent: u8,
    pub remaining: i64,
}

pub fn daily_progress(counted: i64, target: i64) -> DailyProgress {
    let percent = if target <= 0 {
        0
    } else {
        (((counted as f64 / target as f64) * 100.0).round() as i64).clamp(0, 100) as u8
    };
    DailyProgress {
        counted,
        target,
        percent,
        remaining: (target - counted).max(0),
    }
}

/// Count confirmations recorded on `today`, read off the event log.
pub fn counted_today(events: &[EventRow], today: Date) -> i64 {
    events
        .iter()
        .filter(|event| event.event_type == "count_recorded")
        .filter(|event| {
            let nanos = (event.ts_ms as i128) * 1_000_000i128;
            OffsetDateTime::from_unix_timestamp_nanos(nanos)
                .map(|dt| dt.date() == today)
                .unwrap_or(false)
        })
        .count() as i64
}

/// Per-curve share of the daily target (integer shares, truncated).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CurveTargets {
    pub curve_a: i64,
    pub curve_b: i64,
    pub curve_c: i64,
}

pub fn curve_targets(settings: &CountingSettings) -> CurveTargets {
    let share = |curve: i64| settings.daily_target * curve / 100;
    CurveTargets {
        curve_a: share(settings.curve_a),
        curve_b: share(settings.curve_b),
        curve_c: share(settings.curve_c),
    }
}

/// Open divergences by kind, for the analytics panel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DivergenceTally {
    pub not_located: i64,
    pub info_divergence: i64,
}

impl DivergenceTally {
    pub fn total(&self) -> i64 {
        self.not_located + self.info_divergence
    }
}

pub fn divergence_tally(items: &[TreatmentItem]) -> DivergenceTally {
    let mut tally = DivergenceTally::default();
    for item in items.iter().filter(|item| !item.resolved) {
        match item.issue {
            IssueKind::NotLocated => tally.not_located += 1,
            IssueKind::InfoDivergence => tally.info_divergence += 1,
        }
    }
    tally
}

/// Badge count on the navigation shell.
pub fn reserved_count(blocks: &[Block]) -> usize {
    blocks
        .iter()
        .filter(|block| block.status == BlockStatus::Progress)
        .count()
}
