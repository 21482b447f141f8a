#![forbid(unsafe_code)]

use super::{CountStore, EventRow, StoreError, apply_settings_save, now_ms, records};
use sc_core::ids::{BlockId, ItemId};
use sc_core::model::{Block, BlockStatus, HistoryBlock, TreatmentItem, User};
use sc_core::settings::{CountingSettings, SettingsHistoryEntry};
use sc_core::workflow::{CountOutcome, record};
use serde_json::json;

/// In-memory double of the persistence port. Settings and history are held
/// as raw JSON record strings so the corrupt-record fallback path is the
/// same one the sqlite store exercises; `fail_next_finalize` simulates the
/// submit collaborator not acknowledging.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blocks: Vec<Block>,
    settings_record: Option<String>,
    history_record: Option<String>,
    history_blocks: Vec<HistoryBlock>,
    treatment: Vec<TreatmentItem>,
    events: Vec<EventRow>,
    next_event_seq: i64,
    fail_next_finalize: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Test hook: make the next finalize fail after its precondition
    /// checks, as if the submit was never acknowledged.
    pub fn fail_next_finalize(&mut self) {
        self.fail_next_finalize = true;
    }

    /// Test hook: inject an arbitrary (possibly corrupt) settings record.
    pub fn set_raw_settings_record(&mut self, raw: impl Into<String>) {
        self.settings_record = Some(raw.into());
    }

    /// Test hook: inject an arbitrary (possibly corrupt) history record.
    pub fn set_raw_history_record(&mut self, raw: impl Into<String>) {
        self.history_record = Some(raw.into());
    }

    fn push_event(&mut self, block_id: Option<i64>, event_type: &str, payload_json: String) {
        self.next_event_seq += 1;
        self.events.push(EventRow {
            seq: self.next_event_seq,
            ts_ms: now_ms(),
            block_id,
            event_type: event_type.to_string(),
            payload_json,
        });
    }

    fn block_index(&self, id: BlockId) -> Option<usize> {
        self.blocks.iter().position(|block| block.id == id)
    }
}

impl CountStore for MemoryStore {
    fn blocks(&self) -> Result<Vec<Block>, StoreError> {
        Ok(self.blocks.clone())
    }

    fn block(&self, id: BlockId) -> Result<Option<Block>, StoreError> {
        Ok(self.blocks.iter().find(|block| block.id == id).cloned())
    }

    fn insert_block(&mut self, block: Block) -> Result<(), StoreError> {
        if self.block_index(block.id).is_some() {
            return Err(StoreError::InvalidInput("duplicate block id"));
        }
        self.blocks.push(block);
        Ok(())
    }

    fn reserve(&mut self, id: BlockId) -> Result<(), StoreError> {
        let Some(index) = self.block_index(id) else {
            return Err(StoreError::UnknownId);
        };
        self.blocks[index].status = BlockStatus::Progress;
        self.push_event(
            Some(id.get()),
            "block_reserved",
            json!({ "block": id.get() }).to_string(),
        );
        Ok(())
    }

    fn record_count(
        &mut self,
        block_id: BlockId,
        item_id: &ItemId,
        outcome: &CountOutcome,
        actor: &str,
        now_token: &str,
    ) -> Result<(), StoreError> {
        let Some(index) = self.block_index(block_id) else {
            return Err(StoreError::UnknownId);
        };
        let Some(item) = self.blocks[index].item_mut(item_id) else {
            return Err(StoreError::UnknownItem);
        };
        record(item, outcome, actor, now_token);
        self.push_event(
            Some(block_id.get()),
            "count_recorded",
            json!({
                "block": block_id.get(),
                "item": item_id.as_str(),
                "status": outcome.status.as_str(),
                "qty": outcome.qty,
            })
            .to_string(),
        );
        Ok(())
    }

    fn finalize(&mut self, id: BlockId) -> Result<(), StoreError> {
        let Some(index) = self.block_index(id) else {
            return Err(StoreError::UnknownId);
        };
        let block = &self.blocks[index];
        if block.status != BlockStatus::Progress {
            return Err(StoreError::NotReserved);
        }
        if !block.all_items_processed() {
            return Err(StoreError::ItemsStillPending {
                pending: block.pending_count(),
            });
        }
        if self.fail_next_finalize {
            self.fail_next_finalize = false;
            return Err(StoreError::SubmitNotAcknowledged);
        }
        self.blocks.remove(index);
        self.push_event(
            Some(id.get()),
            "block_finalized",
            json!({ "block": id.get() }).to_string(),
        );
        Ok(())
    }

    fn reset_block(&mut self, id: BlockId) -> Result<(), StoreError> {
        let Some(index) = self.block_index(id) else {
            return Err(StoreError::UnknownId);
        };
        for item in &mut self.blocks[index].items {
            item.status = sc_core::model::ItemStatus::Pending;
            item.counted_qty = None;
            item.divergence_reason = None;
        }
        self.push_event(
            Some(id.get()),
            "block_reset",
            json!({ "block": id.get() }).to_string(),
        );
        Ok(())
    }

    fn settings(&self) -> CountingSettings {
        match &self.settings_record {
            Some(raw) => records::settings_from_json(raw),
            None => CountingSettings::default(),
        }
    }

    fn save_settings(
        &mut self,
        new: &CountingSettings,
        actor: &str,
    ) -> Result<Vec<SettingsHistoryEntry>, StoreError> {
        let history = apply_settings_save(&self.settings(), self.settings_history(), new, actor, now_ms());
        self.settings_record = Some(records::settings_to_json(new));
        self.history_record = Some(records::history_to_json(&history));
        Ok(history)
    }

    fn settings_history(&self) -> Vec<SettingsHistoryEntry> {
        match &self.history_record {
            Some(raw) => records::history_from_json(raw),
            None => Vec::new(),
        }
    }

    fn events(&self, limit: usize) -> Result<Vec<EventRow>, StoreError> {
        Ok(self.events.iter().take(limit).cloned().collect())
    }

    fn insert_history_block(&mut self, block: HistoryBlock) -> Result<(), StoreError> {
        self.history_blocks.push(block);
        Ok(())
    }

    fn history_blocks(&self) -> Result<Vec<HistoryBlock>, StoreError> {
        Ok(self.history_blocks.clone())
    }

    fn insert_treatment_item(&mut self, item: TreatmentItem) -> Result<(), StoreError> {
        self.treatment.push(item);
        Ok(())
    }

    fn treatment_items(&self) -> Result<Vec<TreatmentItem>, StoreError> {
        Ok(self.treatment.clone())
    }

    fn resolve_treatment(&mut self, id: i64, actor: &User) -> Result<(), StoreError> {
        if !actor.can_treat {
            return Err(StoreError::PermissionDenied);
        }
        let Some(item) = self.treatment.iter_mut().find(|item| item.id == id) else {
            return Err(StoreError::UnknownId);
        };
        item.resolved = true;
        self.push_event(
            None,
            "treatment_resolved",
            json!({ "treatment": id }).to_string(),
        );
        Ok(())
    }
}
