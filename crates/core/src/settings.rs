#![forbid(unsafe_code)]

//! Counting-policy settings: ABC curve splits and the daily counting
//! target, plus the field-wise diff used for the append-only change log.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CountingSettings {
    pub curve_a: i64,
    pub curve_b: i64,
    pub curve_c: i64,
    pub daily_target: i64,
}

impl Default for CountingSettings {
    fn default() -> Self {
        Self {
            curve_a: 50,
            curve_b: 30,
            curve_c: 20,
            daily_target: 150,
        }
    }
}

impl CountingSettings {
    pub fn curves_total(&self) -> i64 {
        self.curve_a + self.curve_b + self.curve_c
    }

    /// Advisory only: the panel shows a warning when the split does not
    /// total 100%, but saving is not blocked.
    pub fn curves_balanced(&self) -> bool {
        self.curves_total() == 100
    }
}

/// One human-readable line per differing field, in the product's shipped
/// wording. Empty when nothing changed.
pub fn diff_changes(old: &CountingSettings, new: &CountingSettings) -> Vec<String> {
    let mut changes = Vec::new();
    if old.curve_a != new.curve_a {
        changes.push(format!(
            "Curva A alterada de {}% para {}%",
            old.curve_a, new.curve_a
        ));
    }
    if old.curve_b != new.curve_b {
        changes.push(format!(
            "Curva B alterada de {}% para {}%",
            old.curve_b, new.curve_b
        ));
    }
    if old.curve_c != new.curve_c {
        changes.push(format!(
            "Curva C alterada de {}% para {}%",
            old.curve_c, new.curve_c
        ));
    }
    if old.daily_target != new.daily_target {
        changes.push(format!(
            "Meta Diária alterada de {} para {}",
            old.daily_target, new.daily_target
        ));
    }
    changes
}

/// Append-only change-log entry; newest entries are prepended. Display
/// dates are derived from the timestamp when rendered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettingsHistoryEntry {
    pub id: String,
    pub timestamp_ms: i64,
    pub user: String,
    pub changes: Vec<String>,
}

const WORKING_DAYS_PER_YEAR: i64 = 252;

/// Planned annual stock turns for a given daily target.
pub fn annual_turns(daily_target: i64, total_stock: i64) -> f64 {
    if total_stock <= 0 {
        return 0.0;
    }
    (daily_target * WORKING_DAYS_PER_YEAR) as f64 / total_stock as f64
}

/// Days needed to count the whole stock once at the daily target.
pub fn days_to_full_cycle(total_stock: i64, daily_target: i64) -> i64 {
    if daily_target <= 0 {
        return 0;
    }
    ((total_stock as f64) / (daily_target as f64)).round() as i64
}
