#![forbid(unsafe_code)]

mod dashboard;
mod dates;
mod filter;
mod scan;
mod session;

pub use dashboard::{
    CurveTargets, DailyProgress, DivergenceTally, counted_today, curve_targets, daily_progress,
    divergence_tally, reserved_count,
};
pub use dates::{DAYS_OVERDUE_UNKNOWN, days_since, now_ms_i64, today_utc, ts_ms_to_rfc3339};
pub use filter::{
    AuditQuery, ListMode, ListQuery, TimeFilter, filter_blocks, filter_history, filter_treatment,
    has_stale_items, reserved_blocks,
};
pub use scan::{LocationFix, ScanSession};
pub use session::{Close, CountingSession, ItemEntry, SessionError, SessionExit};
