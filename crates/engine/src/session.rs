#![forbid(unsafe_code)]

use crate::scan::LocationFix;
use sc_core::ids::{BlockId, ItemId};
use sc_core::model::{Block, BlockStatus, Item, LastCount, ScanContext};
use sc_core::workflow::{CountEvent, TransitionRejected, apply, parse_quantity};
use sc_storage::{CountStore, StoreError};

/// Stepper starting value for a fresh entry.
const DEFAULT_ENTRY_QTY: i64 = 1;

/// The last-count echo written on every confirmation carries this display
/// token as its date.
pub const LAST_COUNT_NOW_TOKEN: &str = "Agora";

#[derive(Debug)]
pub enum SessionError {
    Store(StoreError),
    NotAMission,
    LocationNotValidated,
    ReasonTooShort { len: usize },
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "store: {err}"),
            Self::NotAMission => write!(f, "ad-hoc blocks cannot be finalized"),
            Self::LocationNotValidated => write!(f, "physical location not validated"),
            Self::ReasonTooShort { len } => {
                write!(f, "divergence description too short (len={len})")
            }
        }
    }
}

impl std::error::Error for SessionError {}

impl From<StoreError> for SessionError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<TransitionRejected> for SessionError {
    fn from(value: TransitionRejected) -> Self {
        match value {
            TransitionRejected::LocationNotValidated => Self::LocationNotValidated,
            TransitionRejected::ReasonTooShort { len } => Self::ReasonTooShort { len },
        }
    }
}

/// Abandon-guard verdict when an entry is closed without confirming.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Close {
    Clean,
    NeedsDiscardConfirm,
}

/// Terminal event handed to the navigation layer when a session ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionExit {
    Finalized,
    LeftOpen,
}

/// One item's entry flow: stepper quantity, the location-validation gate,
/// and the divergence description. Nothing mutates until the session
/// confirms it.
#[derive(Clone, Debug)]
pub struct ItemEntry {
    item_id: ItemId,
    name: String,
    sku: String,
    last_count: Option<LastCount>,
    initial_qty: i64,
    qty: i64,
    location: Option<LocationFix>,
    divergence_text: String,
}

impl ItemEntry {
    fn open(item: &Item) -> Self {
        Self {
            item_id: item.id.clone(),
            name: item.name.clone(),
            sku: item.sku.clone(),
            last_count: item.last_count.clone(),
            initial_qty: DEFAULT_ENTRY_QTY,
            qty: DEFAULT_ENTRY_QTY,
            location: None,
            divergence_text: String::new(),
        }
    }

    pub fn item_id(&self) -> &ItemId {
        &self.item_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn last_count(&self) -> Option<&LastCount> {
        self.last_count.as_ref()
    }

    pub fn quantity(&self) -> i64 {
        self.qty
    }

    pub fn increment(&mut self) {
        self.qty += 1;
    }

    /// Stepper floor is 1; typed entry may still go below it.
    pub fn decrement(&mut self) {
        self.qty = (self.qty - 1).max(1);
    }

    pub fn set_quantity(&mut self, qty: i64) {
        self.qty = qty;
    }

    /// Free-typed quantity; non-numeric input becomes 0 rather than an
    /// error.
    pub fn type_quantity(&mut self, text: &str) {
        self.qty = parse_quantity(text);
    }

    /// Records the location fix delivered by the validation side channel.
    pub fn validate_location(&mut self, code: &str) {
        self.location = Some(LocationFix::from_code(code));
    }

    pub fn location(&self) -> Option<&LocationFix> {
        self.location.as_ref()
    }

    pub fn location_validated(&self) -> bool {
        self.location.is_some()
    }

    pub fn set_divergence_text(&mut self, text: impl Into<String>) {
        self.divergence_text = text.into();
    }

    pub fn divergence_text(&self) -> &str {
        &self.divergence_text
    }

    /// Abandon guard input: has the stepper moved off its initial value?
    pub fn quantity_changed(&self) -> bool {
        self.qty != self.initial_qty
    }
}

enum Backing {
    Stored(BlockId),
    Transient(Block),
}

/// Drives the counting workflow for one block: reserved mission blocks
/// write through the store, ad-hoc scan blocks stay transient and are
/// dropped with the session.
pub struct CountingSession<'a, S: CountStore> {
    store: &'a mut S,
    backing: Backing,
    context: ScanContext,
    actor: String,
}

impl<'a, S: CountStore> CountingSession<'a, S> {
    /// Opens a session over a stored block. Mission blocks must have been
    /// reserved first.
    pub fn open(
        store: &'a mut S,
        block_id: BlockId,
        actor: impl Into<String>,
    ) -> Result<Self, SessionError> {
        let block = store.block(block_id)?.ok_or(StoreError::UnknownId)?;
        if block.context == ScanContext::Mission && block.status != BlockStatus::Progress {
            return Err(SessionError::Store(StoreError::NotReserved));
        }
        Ok(Self {
            store,
            backing: Backing::Stored(block_id),
            context: block.context,
            actor: actor.into(),
        })
    }

    /// Opens a session over the synthetic block for a scanned code. The
    /// block never enters the store: counts apply to the session copy and
    /// the whole thing is discarded on exit.
    pub fn open_scanned(store: &'a mut S, code: &str, actor: impl Into<String>) -> Self {
        let block = sc_core::scan::resolve_scan(code);
        let context = block.context;
        Self {
            store,
            backing: Backing::Transient(block),
            context,
            actor: actor.into(),
        }
    }

    pub fn context(&self) -> ScanContext {
        self.context
    }

    pub fn is_ad_hoc(&self) -> bool {
        self.context.is_ad_hoc()
    }

    /// Current view of the session's block.
    pub fn block(&self) -> Result<Block, SessionError> {
        match &self.backing {
            Backing::Stored(id) => Ok(self.store.block(*id)?.ok_or(StoreError::UnknownId)?),
            Backing::Transient(block) => Ok(block.clone()),
        }
    }

    pub fn open_item(&self, item_id: &ItemId) -> Result<ItemEntry, SessionError> {
        let block = self.block()?;
        let item = block.item(item_id).ok_or(StoreError::UnknownItem)?;
        Ok(ItemEntry::open(item))
    }

    /// Confirms a regular count; refused until the location side channel
    /// has validated where the counter is standing.
    pub fn confirm_count(&mut self, entry: &ItemEntry) -> Result<(), SessionError> {
        let outcome = apply(&CountEvent::ConfirmCount {
            qty: entry.quantity(),
            location_validated: entry.location_validated(),
        })?;
        self.record_outcome(entry.item_id().clone(), outcome)
    }

    /// Item not physically found: confirmed immediately with quantity 0.
    pub fn confirm_not_located(&mut self, entry: &ItemEntry) -> Result<(), SessionError> {
        let outcome = apply(&CountEvent::ConfirmNotLocated)?;
        self.record_outcome(entry.item_id().clone(), outcome)
    }

    /// Catalog/info divergence: requires the description to meet the
    /// minimum length, records the current stepper value alongside it.
    pub fn confirm_divergence(&mut self, entry: &ItemEntry) -> Result<(), SessionError> {
        let outcome = apply(&CountEvent::ConfirmDivergence {
            qty: entry.quantity(),
            reason: entry.divergence_text().to_string(),
        })?;
        self.record_outcome(entry.item_id().clone(), outcome)
    }

    fn record_outcome(
        &mut self,
        item_id: ItemId,
        outcome: sc_core::workflow::CountOutcome,
    ) -> Result<(), SessionError> {
        match &mut self.backing {
            Backing::Stored(id) => {
                self.store
                    .record_count(*id, &item_id, &outcome, &self.actor, LAST_COUNT_NOW_TOKEN)?;
            }
            Backing::Transient(block) => {
                let item = block.item_mut(&item_id).ok_or(StoreError::UnknownItem)?;
                sc_core::workflow::record(item, &outcome, &self.actor, LAST_COUNT_NOW_TOKEN);
            }
        }
        Ok(())
    }

    /// Abandon guard for an entry being closed without confirmation. A
    /// `NeedsDiscardConfirm` close mutates nothing; the caller either
    /// returns to the entry or discards it.
    pub fn close_entry(&self, entry: &ItemEntry) -> Close {
        if entry.quantity_changed() {
            Close::NeedsDiscardConfirm
        } else {
            Close::Clean
        }
    }

    /// Submits the block. Only mission blocks finalize, only once every
    /// item has left `pending`; a non-acknowledged submit surfaces as an
    /// error and the block stays reserved for retry.
    pub fn finalize(&mut self) -> Result<SessionExit, SessionError> {
        match &self.backing {
            Backing::Transient(_) => Err(SessionError::NotAMission),
            Backing::Stored(id) => {
                if self.context.is_ad_hoc() {
                    return Err(SessionError::NotAMission);
                }
                self.store.finalize(*id)?;
                Ok(SessionExit::Finalized)
            }
        }
    }

    /// Leaves the session without submitting; per-item confirmations are
    /// already saved.
    pub fn leave(self) -> SessionExit {
        SessionExit::LeftOpen
    }
}
