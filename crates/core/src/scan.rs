#![forbid(unsafe_code)]

//! Ad-hoc scan resolution: a scanned code becomes a transient block that
//! opens straight into a counting session. Synthetic blocks use the 900
//! id range so they can never collide with seeded blocks, skip the browse
//! filters, and are never reserved or finalized.

use crate::ids::BlockId;
use crate::model::{Block, BlockStatus, ItemSeed, LastCount, ScanContext};

pub const PRODUCT_SCAN_BLOCK_ID: i64 = 901;
pub const LOCATION_SCAN_BLOCK_ID: i64 = 903;

const PRODUCT_CODE_PREFIX: &str = "PRD-";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanKind {
    Product,
    Location,
}

/// Product codes are `PRD-` prefixed; every other code is read as a
/// shelf/location tag.
pub fn classify(code: &str) -> ScanKind {
    if code.starts_with(PRODUCT_CODE_PREFIX) {
        ScanKind::Product
    } else {
        ScanKind::Location
    }
}

/// Builds the synthetic block for a scanned code: a single-item product
/// context carrying the scanned code as the item SKU, or a multi-item
/// location context.
pub fn resolve_scan(code: &str) -> Block {
    match classify(code) {
        ScanKind::Product => Block::new(
            BlockId::new(PRODUCT_SCAN_BLOCK_ID),
            "BOMBA D'ÁGUA",
            "Item Avulso",
            BlockStatus::Progress,
            "Hoje",
            None,
            ScanContext::ProductScan,
            vec![ItemSeed::new(
                "BOMBA D'ÁGUA",
                code,
                "URBA",
                10,
                Some(LastCount {
                    user: "Mariana Santos".to_string(),
                    date: "24/10".to_string(),
                    qty: 12,
                }),
            )],
        ),
        ScanKind::Location => Block::new(
            BlockId::new(LOCATION_SCAN_BLOCK_ID),
            "ESTANTE 04 - GALPÃO A",
            "Corredor Central",
            BlockStatus::Progress,
            "Hoje",
            None,
            ScanContext::LocationScan,
            vec![
                ItemSeed::new(
                    "ITEM DA ESTANTE A",
                    "ABC-123",
                    "GENERICO",
                    50,
                    Some(LastCount {
                        user: "Carlos Silva".to_string(),
                        date: "Ontem".to_string(),
                        qty: 50,
                    }),
                ),
                ItemSeed::new(
                    "ITEM DA ESTANTE B",
                    "DEF-456",
                    "GENERICO",
                    20,
                    Some(LastCount {
                        user: "Carlos Silva".to_string(),
                        date: "Ontem".to_string(),
                        qty: 20,
                    }),
                ),
            ],
        ),
    }
}
