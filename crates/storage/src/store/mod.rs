#![forbid(unsafe_code)]

mod error;
mod memory;
mod sqlite;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use sc_core::ids::{BlockId, ItemId};
use sc_core::model::{Block, HistoryBlock, TreatmentItem, User};
use sc_core::settings::{CountingSettings, SettingsHistoryEntry, diff_changes};
use sc_core::workflow::CountOutcome;

/// Append-only log row. Sequence numbers are store-assigned and strictly
/// increasing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventRow {
    pub seq: i64,
    pub ts_ms: i64,
    pub block_id: Option<i64>,
    pub event_type: String,
    pub payload_json: String,
}

impl EventRow {
    pub fn event_id(&self) -> String {
        format!("evt_{:016}", self.seq)
    }
}

/// Persistence port for the counting workflow. The workflow and filter
/// engines only ever see this trait; `SqliteStore` is the durable
/// implementation and `MemoryStore` the fixture-backed test double.
///
/// Contracts:
/// - `reserve` is unconditional single-writer semantics: any known block
///   moves to `progress`, re-reserving is a no-op in effect.
/// - `record_count` only ever writes terminal item states; nothing here
///   can return an item to `pending` except `reset_block`.
/// - `finalize` refuses while any item is pending and submits exactly
///   once; a non-acknowledged submit leaves the block reserved and
///   surfaces `SubmitNotAcknowledged` so the caller can retry.
/// - `settings` and `settings_history` never fail: missing or corrupt
///   records fall back to defaults / an empty list.
pub trait CountStore {
    fn blocks(&self) -> Result<Vec<Block>, StoreError>;
    fn block(&self, id: BlockId) -> Result<Option<Block>, StoreError>;
    fn insert_block(&mut self, block: Block) -> Result<(), StoreError>;
    fn reserve(&mut self, id: BlockId) -> Result<(), StoreError>;
    fn record_count(
        &mut self,
        block_id: BlockId,
        item_id: &ItemId,
        outcome: &CountOutcome,
        actor: &str,
        now_token: &str,
    ) -> Result<(), StoreError>;
    fn finalize(&mut self, id: BlockId) -> Result<(), StoreError>;
    fn reset_block(&mut self, id: BlockId) -> Result<(), StoreError>;

    fn settings(&self) -> CountingSettings;
    fn save_settings(
        &mut self,
        new: &CountingSettings,
        actor: &str,
    ) -> Result<Vec<SettingsHistoryEntry>, StoreError>;
    fn settings_history(&self) -> Vec<SettingsHistoryEntry>;

    fn events(&self, limit: usize) -> Result<Vec<EventRow>, StoreError>;

    fn insert_history_block(&mut self, block: HistoryBlock) -> Result<(), StoreError>;
    fn history_blocks(&self) -> Result<Vec<HistoryBlock>, StoreError>;
    fn insert_treatment_item(&mut self, item: TreatmentItem) -> Result<(), StoreError>;
    fn treatment_items(&self) -> Result<Vec<TreatmentItem>, StoreError>;
    fn resolve_treatment(&mut self, id: i64, actor: &User) -> Result<(), StoreError>;
}

/// Shared save logic: diff the settings field-wise and prepend one history
/// entry only when something changed. The settings record itself is always
/// rewritten by the caller.
pub(crate) fn apply_settings_save(
    current: &CountingSettings,
    mut history: Vec<SettingsHistoryEntry>,
    new: &CountingSettings,
    actor: &str,
    now_ms: i64,
) -> Vec<SettingsHistoryEntry> {
    let changes = diff_changes(current, new);
    if !changes.is_empty() {
        history.insert(
            0,
            SettingsHistoryEntry {
                id: now_ms.to_string(),
                timestamp_ms: now_ms,
                user: actor.to_string(),
                changes,
            },
        );
    }
    history
}

pub(crate) fn now_ms() -> i64 {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    now.as_millis() as i64
}

/// JSON record codecs for the two settings records. A missing or mistyped
/// field reads as its default and a malformed record reads entirely as
/// defaults; storage corruption never propagates.
pub(crate) mod records {
    use sc_core::settings::{CountingSettings, SettingsHistoryEntry};
    use serde_json::{Value, json};

    pub const SETTINGS_KEY: &str = "settings_v1";
    pub const SETTINGS_HISTORY_KEY: &str = "settings_history_v1";

    pub fn settings_to_json(settings: &CountingSettings) -> String {
        json!({
            "curve_a": settings.curve_a,
            "curve_b": settings.curve_b,
            "curve_c": settings.curve_c,
            "daily_target": settings.daily_target,
        })
        .to_string()
    }

    pub fn settings_from_json(raw: &str) -> CountingSettings {
        let defaults = CountingSettings::default();
        let Ok(value) = serde_json::from_str::<Value>(raw) else {
            return defaults;
        };
        if !value.is_object() {
            return defaults;
        }
        let field = |name: &str, fallback: i64| {
            value.get(name).and_then(Value::as_i64).unwrap_or(fallback)
        };
        CountingSettings {
            curve_a: field("curve_a", defaults.curve_a),
            curve_b: field("curve_b", defaults.curve_b),
            curve_c: field("curve_c", defaults.curve_c),
            daily_target: field("daily_target", defaults.daily_target),
        }
    }

    pub fn history_to_json(entries: &[SettingsHistoryEntry]) -> String {
        let items: Vec<Value> = entries
            .iter()
            .map(|entry| {
                json!({
                    "id": entry.id,
                    "timestamp_ms": entry.timestamp_ms,
                    "user": entry.user,
                    "changes": entry.changes,
                })
            })
            .collect();
        Value::Array(items).to_string()
    }

    pub fn history_from_json(raw: &str) -> Vec<SettingsHistoryEntry> {
        let Ok(value) = serde_json::from_str::<Value>(raw) else {
            return Vec::new();
        };
        let Some(items) = value.as_array() else {
            return Vec::new();
        };
        items.iter().filter_map(entry_from_json).collect()
    }

    fn entry_from_json(value: &Value) -> Option<SettingsHistoryEntry> {
        Some(SettingsHistoryEntry {
            id: value.get("id")?.as_str()?.to_string(),
            timestamp_ms: value.get("timestamp_ms")?.as_i64()?,
            user: value.get("user")?.as_str()?.to_string(),
            changes: value
                .get("changes")?
                .as_array()?
                .iter()
                .filter_map(|change| change.as_str().map(str::to_string))
                .collect(),
        })
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn settings_round_trip() {
            let settings = CountingSettings {
                curve_a: 60,
                curve_b: 25,
                curve_c: 15,
                daily_target: 200,
            };
            assert_eq!(settings_from_json(&settings_to_json(&settings)), settings);
        }

        #[test]
        fn corrupt_settings_fall_back_to_defaults() {
            assert_eq!(settings_from_json("not json"), CountingSettings::default());
            assert_eq!(settings_from_json("[1,2,3]"), CountingSettings::default());
        }

        #[test]
        fn mistyped_fields_fall_back_individually() {
            let partial = settings_from_json(r#"{"curve_a": 70, "daily_target": "x"}"#);
            assert_eq!(partial.curve_a, 70);
            assert_eq!(partial.curve_b, 30);
            assert_eq!(partial.daily_target, 150);
        }

        #[test]
        fn corrupt_history_is_an_empty_list() {
            assert!(history_from_json("{{{{").is_empty());
            assert!(history_from_json(r#"{"not":"a list"}"#).is_empty());
        }
    }
}
