#![forbid(unsafe_code)]

use super::{CountStore, EventRow, StoreError, apply_settings_save, now_ms, records};
use rusqlite::{Connection, OptionalExtension, Transaction, params};
use sc_core::ids::{BlockId, ItemId};
use sc_core::model::{
    Block, BlockStatus, HistoryBlock, HistoryItem, HistoryOutcome, IssueKind, Item, ItemStatus,
    LastCount, ScanContext, TreatmentItem, User,
};
use sc_core::settings::{CountingSettings, SettingsHistoryEntry};
use sc_core::workflow::CountOutcome;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DB_FILE: &str = "stockcount.db";

#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
    storage_dir: PathBuf,
}

impl SqliteStore {
    pub fn open(storage_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let storage_dir = storage_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&storage_dir)?;

        let db_path = storage_dir.join(DB_FILE);
        let conn = Connection::open(db_path)?;
        conn.busy_timeout(Duration::from_secs(5))?;

        let store = Self { conn, storage_dir };
        store.migrate()?;
        Ok(store)
    }

    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    fn migrate(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            r#"
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;

            CREATE TABLE IF NOT EXISTS meta (
              key TEXT PRIMARY KEY,
              value TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS blocks (
              id INTEGER PRIMARY KEY,
              parent_ref TEXT NOT NULL,
              location TEXT NOT NULL,
              status TEXT NOT NULL,
              date TEXT NOT NULL,
              subcategory TEXT,
              context TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS items (
              block_id INTEGER NOT NULL,
              id TEXT NOT NULL,
              ordinal INTEGER NOT NULL,
              name TEXT NOT NULL,
              sku TEXT NOT NULL,
              brand TEXT NOT NULL,
              balance INTEGER NOT NULL,
              status TEXT NOT NULL,
              counted_qty INTEGER,
              divergence_reason TEXT,
              last_user TEXT,
              last_date TEXT,
              last_qty INTEGER,
              PRIMARY KEY (block_id, id)
            );

            CREATE TABLE IF NOT EXISTS events (
              seq INTEGER PRIMARY KEY AUTOINCREMENT,
              ts_ms INTEGER NOT NULL,
              block_id INTEGER,
              type TEXT NOT NULL,
              payload_json TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS history_blocks (
              id INTEGER PRIMARY KEY,
              parent_ref TEXT NOT NULL,
              location TEXT NOT NULL,
              user TEXT NOT NULL,
              finished_at TEXT NOT NULL,
              raw_date TEXT NOT NULL,
              outcome TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS history_items (
              block_id INTEGER NOT NULL,
              id TEXT NOT NULL,
              ordinal INTEGER NOT NULL,
              name TEXT NOT NULL,
              sku TEXT NOT NULL,
              brand TEXT NOT NULL,
              qty INTEGER NOT NULL,
              counted_by TEXT NOT NULL,
              counted_at TEXT NOT NULL,
              PRIMARY KEY (block_id, id)
            );

            CREATE TABLE IF NOT EXISTS treatment (
              id INTEGER PRIMARY KEY,
              name TEXT NOT NULL,
              sku TEXT NOT NULL,
              location TEXT NOT NULL,
              issue TEXT NOT NULL,
              reported_by TEXT NOT NULL,
              reported_at TEXT NOT NULL,
              raw_date TEXT NOT NULL,
              resolved INTEGER NOT NULL DEFAULT 0
            );

            CREATE INDEX IF NOT EXISTS idx_items_block ON items(block_id, ordinal);
            CREATE INDEX IF NOT EXISTS idx_events_seq ON events(seq);
            "#,
        )?;
        Ok(())
    }

    fn meta_get(&self, key: &str) -> Result<Option<String>, rusqlite::Error> {
        self.conn
            .query_row(
                "SELECT value FROM meta WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()
    }

    fn load_items(&self, block_id: i64) -> Result<Vec<Item>, StoreError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, name, sku, brand, balance, status, counted_qty, divergence_reason,
                   last_user, last_date, last_qty
            FROM items
            WHERE block_id = ?1
            ORDER BY ordinal ASC
            "#,
        )?;
        let rows = stmt.query_map(params![block_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, i64>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, Option<i64>>(6)?,
                row.get::<_, Option<String>>(7)?,
                row.get::<_, Option<String>>(8)?,
                row.get::<_, Option<String>>(9)?,
                row.get::<_, Option<i64>>(10)?,
            ))
        })?;

        let mut items = Vec::new();
        for row in rows {
            let (id, name, sku, brand, balance, status, counted_qty, reason, last_user, last_date, last_qty) =
                row?;
            let id = ItemId::try_new(id)
                .map_err(|_| StoreError::InvalidInput("malformed item id"))?;
            let status = ItemStatus::parse(&status)
                .ok_or(StoreError::InvalidInput("unknown item status"))?;
            let last_count = match (last_user, last_date, last_qty) {
                (Some(user), Some(date), Some(qty)) => Some(LastCount { user, date, qty }),
                _ => None,
            };
            items.push(Item {
                id,
                name,
                sku,
                brand,
                balance,
                last_count,
                status,
                counted_qty,
                divergence_reason: reason,
            });
        }
        Ok(items)
    }

    fn load_block_row(&self, id: i64) -> Result<Option<Block>, StoreError> {
        let row = self
            .conn
            .query_row(
                r#"
                SELECT id, parent_ref, location, status, date, subcategory, context
                FROM blocks
                WHERE id = ?1
                "#,
                params![id],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                        row.get::<_, Option<String>>(5)?,
                        row.get::<_, String>(6)?,
                    ))
                },
            )
            .optional()?;

        let Some((id, parent_ref, location, status, date, subcategory, context)) = row else {
            return Ok(None);
        };
        let status = BlockStatus::parse(&status)
            .ok_or(StoreError::InvalidInput("unknown block status"))?;
        let context = ScanContext::parse(&context)
            .ok_or(StoreError::InvalidInput("unknown scan context"))?;
        Ok(Some(Block {
            id: BlockId::new(id),
            parent_ref,
            location,
            status,
            date,
            subcategory,
            context,
            items: self.load_items(id)?,
        }))
    }
}

impl CountStore for SqliteStore {
    fn blocks(&self) -> Result<Vec<Block>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id FROM blocks ORDER BY id ASC")?;
        let ids = stmt
            .query_map([], |row| row.get::<_, i64>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        let mut blocks = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(block) = self.load_block_row(id)? {
                blocks.push(block);
            }
        }
        Ok(blocks)
    }

    fn block(&self, id: BlockId) -> Result<Option<Block>, StoreError> {
        self.load_block_row(id.get())
    }

    fn insert_block(&mut self, block: Block) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        tx.execute(
            r#"
            INSERT INTO blocks(id, parent_ref, location, status, date, subcategory, context)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                block.id.get(),
                block.parent_ref,
                block.location,
                block.status.as_str(),
                block.date,
                block.subcategory,
                block.context.as_str()
            ],
        )?;
        for (ordinal, item) in block.items.iter().enumerate() {
            let (last_user, last_date, last_qty) = match &item.last_count {
                Some(last) => (
                    Some(last.user.as_str()),
                    Some(last.date.as_str()),
                    Some(last.qty),
                ),
                None => (None, None, None),
            };
            tx.execute(
                r#"
                INSERT INTO items(block_id, id, ordinal, name, sku, brand, balance, status,
                                  counted_qty, divergence_reason, last_user, last_date, last_qty)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
                "#,
                params![
                    block.id.get(),
                    item.id.as_str(),
                    (ordinal + 1) as i64,
                    item.name,
                    item.sku,
                    item.brand,
                    item.balance,
                    item.status.as_str(),
                    item.counted_qty,
                    item.divergence_reason,
                    last_user,
                    last_date,
                    last_qty
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn reserve(&mut self, id: BlockId) -> Result<(), StoreError> {
        let now_ms = now_ms();
        let tx = self.conn.transaction()?;
        let updated = tx.execute(
            "UPDATE blocks SET status = ?2 WHERE id = ?1",
            params![id.get(), BlockStatus::Progress.as_str()],
        )?;
        if updated == 0 {
            return Err(StoreError::UnknownId);
        }
        insert_event_tx(
            &tx,
            now_ms,
            Some(id.get()),
            "block_reserved",
            &json!({ "block": id.get() }).to_string(),
        )?;
        tx.commit()?;
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
        let now_ms = now_ms();
        let tx = self.conn.transaction()?;

        let block_exists = tx
            .query_row(
                "SELECT 1 FROM blocks WHERE id = ?1",
                params![block_id.get()],
                |_| Ok(()),
            )
            .optional()?
            .is_some();
        if !block_exists {
            return Err(StoreError::UnknownId);
        }

        let updated = tx.execute(
            r#"
            UPDATE items
            SET status = ?3, counted_qty = ?4, divergence_reason = ?5,
                last_user = ?6, last_date = ?7, last_qty = ?4
            WHERE block_id = ?1 AND id = ?2
            "#,
            params![
                block_id.get(),
                item_id.as_str(),
                outcome.status.as_str(),
                outcome.qty,
                outcome.reason,
                actor,
                now_token
            ],
        )?;
        if updated == 0 {
            return Err(StoreError::UnknownItem);
        }

        insert_event_tx(
            &tx,
            now_ms,
            Some(block_id.get()),
            "count_recorded",
            &json!({
                "block": block_id.get(),
                "item": item_id.as_str(),
                "status": outcome.status.as_str(),
                "qty": outcome.qty,
            })
            .to_string(),
        )?;
        tx.commit()?;
        Ok(())
    }

    fn finalize(&mut self, id: BlockId) -> Result<(), StoreError> {
        let now_ms = now_ms();
        let tx = self.conn.transaction()?;

        let status = tx
            .query_row(
                "SELECT status FROM blocks WHERE id = ?1",
                params![id.get()],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        let Some(status) = status else {
            return Err(StoreError::UnknownId);
        };
        if BlockStatus::parse(&status) != Some(BlockStatus::Progress) {
            return Err(StoreError::NotReserved);
        }

        let pending: i64 = tx.query_row(
            "SELECT COUNT(*) FROM items WHERE block_id = ?1 AND status = ?2",
            params![id.get(), ItemStatus::Pending.as_str()],
            |row| row.get(0),
        )?;
        if pending > 0 {
            return Err(StoreError::ItemsStillPending {
                pending: pending as usize,
            });
        }

        tx.execute("DELETE FROM items WHERE block_id = ?1", params![id.get()])?;
        tx.execute("DELETE FROM blocks WHERE id = ?1", params![id.get()])?;
        insert_event_tx(
            &tx,
            now_ms,
            Some(id.get()),
            "block_finalized",
            &json!({ "block": id.get() }).to_string(),
        )?;
        // The commit is the submit acknowledgement: on failure the prior
        // state survives and the block stays reserved for a retry.
        tx.commit()?;
        Ok(())
    }

    fn reset_block(&mut self, id: BlockId) -> Result<(), StoreError> {
        let now_ms = now_ms();
        let tx = self.conn.transaction()?;

        let exists = tx
            .query_row(
                "SELECT 1 FROM blocks WHERE id = ?1",
                params![id.get()],
                |_| Ok(()),
            )
            .optional()?
            .is_some();
        if !exists {
            return Err(StoreError::UnknownId);
        }

        tx.execute(
            r#"
            UPDATE items
            SET status = ?2, counted_qty = NULL, divergence_reason = NULL
            WHERE block_id = ?1
            "#,
            params![id.get(), ItemStatus::Pending.as_str()],
        )?;
        insert_event_tx(
            &tx,
            now_ms,
            Some(id.get()),
            "block_reset",
            &json!({ "block": id.get() }).to_string(),
        )?;
        tx.commit()?;
        Ok(())
    }

    fn settings(&self) -> CountingSettings {
        match self.meta_get(records::SETTINGS_KEY) {
            Ok(Some(raw)) => records::settings_from_json(&raw),
            _ => CountingSettings::default(),
        }
    }

    fn save_settings(
        &mut self,
        new: &CountingSettings,
        actor: &str,
    ) -> Result<Vec<SettingsHistoryEntry>, StoreError> {
        let history =
            apply_settings_save(&self.settings(), self.settings_history(), new, actor, now_ms());

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO meta(key, value) VALUES (?1, ?2) ON CONFLICT(key) DO UPDATE SET value=excluded.value",
            params![records::SETTINGS_KEY, records::settings_to_json(new)],
        )?;
        tx.execute(
            "INSERT INTO meta(key, value) VALUES (?1, ?2) ON CONFLICT(key) DO UPDATE SET value=excluded.value",
            params![
                records::SETTINGS_HISTORY_KEY,
                records::history_to_json(&history)
            ],
        )?;
        tx.commit()?;
        Ok(history)
    }

    fn settings_history(&self) -> Vec<SettingsHistoryEntry> {
        match self.meta_get(records::SETTINGS_HISTORY_KEY) {
            Ok(Some(raw)) => records::history_from_json(&raw),
            _ => Vec::new(),
        }
    }

    fn events(&self, limit: usize) -> Result<Vec<EventRow>, StoreError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT seq, ts_ms, block_id, type, payload_json
            FROM events
            ORDER BY seq ASC
            LIMIT ?1
            "#,
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok(EventRow {
                seq: row.get(0)?,
                ts_ms: row.get(1)?,
                block_id: row.get(2)?,
                event_type: row.get(3)?,
                payload_json: row.get(4)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn insert_history_block(&mut self, block: HistoryBlock) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        tx.execute(
            r#"
            INSERT INTO history_blocks(id, parent_ref, location, user, finished_at, raw_date, outcome)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                block.id,
                block.parent_ref,
                block.location,
                block.user,
                block.finished_at,
                block.raw_date,
                block.outcome.as_str()
            ],
        )?;
        for (ordinal, item) in block.items.iter().enumerate() {
            tx.execute(
                r#"
                INSERT INTO history_items(block_id, id, ordinal, name, sku, brand, qty, counted_by, counted_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                "#,
                params![
                    block.id,
                    item.id,
                    (ordinal + 1) as i64,
                    item.name,
                    item.sku,
                    item.brand,
                    item.qty,
                    item.counted_by,
                    item.counted_at
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn history_blocks(&self) -> Result<Vec<HistoryBlock>, StoreError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, parent_ref, location, user, finished_at, raw_date, outcome
            FROM history_blocks
            ORDER BY id ASC
            "#,
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, String>(6)?,
            ))
        })?;

        let mut blocks = Vec::new();
        for row in rows {
            let (id, parent_ref, location, user, finished_at, raw_date, outcome) = row?;
            let outcome = HistoryOutcome::parse(&outcome)
                .ok_or(StoreError::InvalidInput("unknown history outcome"))?;

            let mut item_stmt = self.conn.prepare(
                r#"
                SELECT id, name, sku, brand, qty, counted_by, counted_at
                FROM history_items
                WHERE block_id = ?1
                ORDER BY ordinal ASC
                "#,
            )?;
            let items = item_stmt
                .query_map(params![id], |row| {
                    Ok(HistoryItem {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        sku: row.get(2)?,
                        brand: row.get(3)?,
                        qty: row.get(4)?,
                        counted_by: row.get(5)?,
                        counted_at: row.get(6)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;

            blocks.push(HistoryBlock {
                id,
                parent_ref,
                location,
                user,
                finished_at,
                raw_date,
                outcome,
                items,
            });
        }
        Ok(blocks)
    }

    fn insert_treatment_item(&mut self, item: TreatmentItem) -> Result<(), StoreError> {
        self.conn.execute(
            r#"
            INSERT INTO treatment(id, name, sku, location, issue, reported_by, reported_at, raw_date, resolved)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                item.id,
                item.name,
                item.sku,
                item.location,
                item.issue.as_str(),
                item.reported_by,
                item.reported_at,
                item.raw_date,
                if item.resolved { 1i64 } else { 0i64 }
            ],
        )?;
        Ok(())
    }

    fn treatment_items(&self) -> Result<Vec<TreatmentItem>, StoreError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, name, sku, location, issue, reported_by, reported_at, raw_date, resolved
            FROM treatment
            ORDER BY id ASC
            "#,
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, String>(6)?,
                row.get::<_, String>(7)?,
                row.get::<_, i64>(8)?,
            ))
        })?;

        let mut items = Vec::new();
        for row in rows {
            let (id, name, sku, location, issue, reported_by, reported_at, raw_date, resolved) =
                row?;
            let issue =
                IssueKind::parse(&issue).ok_or(StoreError::InvalidInput("unknown issue kind"))?;
            items.push(TreatmentItem {
                id,
                name,
                sku,
                location,
                issue,
                reported_by,
                reported_at,
                raw_date,
                resolved: resolved != 0,
            });
        }
        Ok(items)
    }

    fn resolve_treatment(&mut self, id: i64, actor: &User) -> Result<(), StoreError> {
        if !actor.can_treat {
            return Err(StoreError::PermissionDenied);
        }
        let now_ms = now_ms();
        let tx = self.conn.transaction()?;
        let updated = tx.execute(
            "UPDATE treatment SET resolved = 1 WHERE id = ?1",
            params![id],
        )?;
        if updated == 0 {
            return Err(StoreError::UnknownId);
        }
        insert_event_tx(
            &tx,
            now_ms,
            None,
            "treatment_resolved",
            &json!({ "treatment": id }).to_string(),
        )?;
        tx.commit()?;
        Ok(())
    }
}

fn insert_event_tx(
    tx: &Transaction<'_>,
    ts_ms: i64,
    block_id: Option<i64>,
    event_type: &str,
    payload_json: &str,
) -> Result<EventRow, StoreError> {
    tx.execute(
        "INSERT INTO events(ts_ms, block_id, type, payload_json) VALUES (?1, ?2, ?3, ?4)",
        params![ts_ms, block_id, event_type, payload_json],
    )?;
    let seq = tx.last_insert_rowid();
    Ok(EventRow {
        seq,
        ts_ms,
        block_id,
        event_type: event_type.to_string(),
        payload_json: payload_json.to_string(),
    })
}
