#![forbid(unsafe_code)]

use crate::ids::{BlockId, ItemId};

/// Per-item counting status. `Pending` is the only non-terminal state; a
/// terminal state may be re-edited into another terminal state but never
/// back to `Pending` (a full block reset is the single exception).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemStatus {
    Pending,
    Counted,
    NotLocated,
    DivergenceInfo,
}

impl ItemStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemStatus::Pending => "pending",
            ItemStatus::Counted => "counted",
            ItemStatus::NotLocated => "not_located",
            ItemStatus::DivergenceInfo => "divergence_info",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(ItemStatus::Pending),
            "counted" => Some(ItemStatus::Counted),
            "not_located" => Some(ItemStatus::NotLocated),
            "divergence_info" => Some(ItemStatus::DivergenceInfo),
            _ => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self != ItemStatus::Pending
    }
}

/// Block scheduling/working status. `Pending` and `Late` are hints derived
/// from the block's date, not from item state; `Progress` means reserved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockStatus {
    Pending,
    Progress,
    Late,
    Completed,
}

impl BlockStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BlockStatus::Pending => "pending",
            BlockStatus::Progress => "progress",
            BlockStatus::Late => "late",
            BlockStatus::Completed => "completed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(BlockStatus::Pending),
            "progress" => Some(BlockStatus::Progress),
            "late" => Some(BlockStatus::Late),
            "completed" => Some(BlockStatus::Completed),
            _ => None,
        }
    }
}

/// How a block entered the working set. Scan contexts are ad-hoc: they
/// bypass the browse lists, are never reserved, and never finalize.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanContext {
    Mission,
    ProductScan,
    LocationScan,
}

impl ScanContext {
    pub fn as_str(self) -> &'static str {
        match self {
            ScanContext::Mission => "mission",
            ScanContext::ProductScan => "product_scan",
            ScanContext::LocationScan => "location_scan",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "mission" => Some(ScanContext::Mission),
            "product_scan" => Some(ScanContext::ProductScan),
            "location_scan" => Some(ScanContext::LocationScan),
            _ => None,
        }
    }

    pub fn is_ad_hoc(self) -> bool {
        !matches!(self, ScanContext::Mission)
    }
}

/// Display echo of the most recent count. Overwritten on every confirmed
/// count; not an audit trail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LastCount {
    pub user: String,
    pub date: String,
    pub qty: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub sku: String,
    pub brand: String,
    pub balance: i64,
    pub last_count: Option<LastCount>,
    pub status: ItemStatus,
    pub counted_qty: Option<i64>,
    pub divergence_reason: Option<String>,
}

/// Item fields as they come from seed data or a scan, before the block
/// assigns the synthetic id.
#[derive(Clone, Debug)]
pub struct ItemSeed {
    pub name: String,
    pub sku: String,
    pub brand: String,
    pub balance: i64,
    pub last_count: Option<LastCount>,
}

impl ItemSeed {
    pub fn new(
        name: impl Into<String>,
        sku: impl Into<String>,
        brand: impl Into<String>,
        balance: i64,
        last_count: Option<LastCount>,
    ) -> Self {
        Self {
            name: name.into(),
            sku: sku.into(),
            brand: brand.into(),
            balance,
            last_count,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    pub id: BlockId,
    pub parent_ref: String,
    pub location: String,
    pub status: BlockStatus,
    pub date: String,
    pub subcategory: Option<String>,
    pub context: ScanContext,
    pub items: Vec<Item>,
}

impl Block {
    /// Builds a block and assigns every item its stable synthetic id
    /// (ordinals start at 1).
    pub fn new(
        id: BlockId,
        parent_ref: impl Into<String>,
        location: impl Into<String>,
        status: BlockStatus,
        date: impl Into<String>,
        subcategory: Option<String>,
        context: ScanContext,
        seeds: Vec<ItemSeed>,
    ) -> Self {
        let items = seeds
            .into_iter()
            .enumerate()
            .map(|(index, seed)| Item {
                id: ItemId::compose(id, index + 1),
                name: seed.name,
                sku: seed.sku,
                brand: seed.brand,
                balance: seed.balance,
                last_count: seed.last_count,
                status: ItemStatus::Pending,
                counted_qty: None,
                divergence_reason: None,
            })
            .collect();
        Self {
            id,
            parent_ref: parent_ref.into(),
            location: location.into(),
            status,
            date: date.into(),
            subcategory,
            context,
            items,
        }
    }

    pub fn item(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|item| &item.id == id)
    }

    pub fn item_mut(&mut self, id: &ItemId) -> Option<&mut Item> {
        self.items.iter_mut().find(|item| &item.id == id)
    }

    pub fn processed_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| item.status.is_terminal())
            .count()
    }

    /// Finalize gate: every item must have left `Pending`.
    pub fn all_items_processed(&self) -> bool {
        !self.items.is_empty() && self.items.iter().all(|item| item.status.is_terminal())
    }

    pub fn pending_count(&self) -> usize {
        self.items.len() - self.processed_count()
    }

    pub fn progress_percent(&self) -> u8 {
        if self.items.is_empty() {
            return 0;
        }
        let ratio = self.processed_count() as f64 / self.items.len() as f64;
        (ratio * 100.0).round() as u8
    }

    pub fn is_ad_hoc(&self) -> bool {
        self.context.is_ad_hoc()
    }
}

/// Acting identity. Authentication is out of scope; these flags gate the
/// settings panel and the divergence-treatment queue only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub role: String,
    pub is_admin: bool,
    pub can_treat: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IssueKind {
    NotLocated,
    InfoDivergence,
}

impl IssueKind {
    pub fn as_str(self) -> &'static str {
        match self {
            IssueKind::NotLocated => "not_located",
            IssueKind::InfoDivergence => "info_divergence",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "not_located" => Some(IssueKind::NotLocated),
            "info_divergence" => Some(IssueKind::InfoDivergence),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HistoryOutcome {
    Completed,
    WithDivergence,
}

impl HistoryOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            HistoryOutcome::Completed => "completed",
            HistoryOutcome::WithDivergence => "with_divergence",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "completed" => Some(HistoryOutcome::Completed),
            "with_divergence" => Some(HistoryOutcome::WithDivergence),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryItem {
    pub id: String,
    pub name: String,
    pub sku: String,
    pub brand: String,
    pub qty: i64,
    pub counted_by: String,
    pub counted_at: String,
}

/// Finished-count record shown on the history screen. Fed by a dataset
/// disconnected from the live blocks; `raw_date` is a normalized ISO date
/// (`yyyy-mm-dd`) used for range filtering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryBlock {
    pub id: i64,
    pub parent_ref: String,
    pub location: String,
    pub user: String,
    pub finished_at: String,
    pub raw_date: String,
    pub outcome: HistoryOutcome,
    pub items: Vec<HistoryItem>,
}

/// Open divergence awaiting treatment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreatmentItem {
    pub id: i64,
    pub name: String,
    pub sku: String,
    pub location: String,
    pub issue: IssueKind,
    pub reported_by: String,
    pub reported_at: String,
    pub raw_date: String,
    pub resolved: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block_with_statuses(statuses: &[ItemStatus]) -> Block {
        let seeds = statuses
            .iter()
            .map(|_| ItemSeed::new("BRONZINA DE BIELA", "BB121 000", "METAL LEVE", 3, None))
            .collect();
        let mut block = Block::new(
            BlockId::new(1),
            "S/REF",
            "Rua 04",
            BlockStatus::Progress,
            "Hoje",
            None,
            ScanContext::Mission,
            seeds,
        );
        for (item, status) in block.items.iter_mut().zip(statuses) {
            item.status = *status;
        }
        block
    }

    #[test]
    fn items_receive_stable_ordinal_ids() {
        let block = block_with_statuses(&[ItemStatus::Pending, ItemStatus::Pending]);
        assert_eq!(block.items[0].id.as_str(), "itm_1_1");
        assert_eq!(block.items[1].id.as_str(), "itm_1_2");
    }

    #[test]
    fn completion_requires_every_item_terminal() {
        let partial = block_with_statuses(&[ItemStatus::Counted, ItemStatus::Pending]);
        assert!(!partial.all_items_processed());
        assert_eq!(partial.pending_count(), 1);

        let done = block_with_statuses(&[ItemStatus::Counted, ItemStatus::NotLocated]);
        assert!(done.all_items_processed());
        assert_eq!(done.progress_percent(), 100);
    }

    #[test]
    fn empty_block_is_never_complete() {
        let block = block_with_statuses(&[]);
        assert!(!block.all_items_processed());
        assert_eq!(block.progress_percent(), 0);
    }

    #[test]
    fn status_strings_round_trip() {
        for status in [
            ItemStatus::Pending,
            ItemStatus::Counted,
            ItemStatus::NotLocated,
            ItemStatus::DivergenceInfo,
        ] {
            assert_eq!(ItemStatus::parse(status.as_str()), Some(status));
        }
        for status in [
            BlockStatus::Pending,
            BlockStatus::Progress,
            BlockStatus::Late,
            BlockStatus::Completed,
        ] {
            assert_eq!(BlockStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(ItemStatus::parse("counted_twice"), None);
    }
}
