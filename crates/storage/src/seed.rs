#![forbid(unsafe_code)]

//! Demo datasets. The live blocks feed the browse/daily lists; the history
//! and treatment datasets are intentionally disconnected from them, as the
//! audit screens ship with their own records.

use crate::store::{CountStore, StoreError};
use sc_core::ids::BlockId;
use sc_core::model::{
    Block, BlockStatus, HistoryBlock, HistoryItem, HistoryOutcome, IssueKind, ItemSeed, LastCount,
    ScanContext, TreatmentItem,
};

fn last(user: &str, date: &str, qty: i64) -> Option<LastCount> {
    Some(LastCount {
        user: user.to_string(),
        date: date.to_string(),
        qty,
    })
}

pub fn seed_blocks() -> Vec<Block> {
    vec![
        Block::new(
            BlockId::new(1),
            "S/REF",
            "Rua 04 • Nível 2 • Apto 10",
            BlockStatus::Late,
            "Ontem",
            Some("Biela".to_string()),
            ScanContext::Mission,
            vec![
                ItemSeed::new(
                    "BRONZINA DE BIELA",
                    "BB121 000",
                    "METAL LEVE",
                    3,
                    last("Carlos Silva", "20/10", 3),
                ),
                ItemSeed::new(
                    "BRONZINA DE BIELA",
                    "87998604",
                    "KS",
                    2,
                    last("Mariana Santos", "15/10", 2),
                ),
                ItemSeed::new("BRONZINA DE BIELA", "10482-A", "SINTERMETAL", 5, None),
            ],
        ),
        Block::new(
            BlockId::new(2),
            "REF: 1029",
            "Rua 12 • Bloco B",
            BlockStatus::Pending,
            "Hoje",
            Some("Pistões".to_string()),
            ScanContext::Mission,
            vec![ItemSeed::new(
                "PISTÃO C/ ANÉIS 0,50",
                "P9120 050",
                "MAHLE",
                12,
                last("João Pedro", "Hoje", 12),
            )],
        ),
        Block::new(
            BlockId::new(3),
            "S/REF",
            "Corredor C • Nível 1",
            BlockStatus::Pending,
            "Hoje",
            Some("Juntas do Motor".to_string()),
            ScanContext::Mission,
            vec![
                ItemSeed::new(
                    "JUNTA CABEÇOTE",
                    "829102",
                    "SABÓ",
                    15,
                    last("Carlos Silva", "22/10", 15),
                ),
                ItemSeed::new(
                    "JUNTA TAPA VÁLVULA",
                    "110293",
                    "TARANTO",
                    8,
                    last("Carlos Silva", "22/10", 8),
                ),
            ],
        ),
        Block::new(
            BlockId::new(4),
            "REF: 5502",
            "Rua 01 • Nível 1",
            BlockStatus::Pending,
            "Amanhã",
            Some("Filtro de Óleo".to_string()),
            ScanContext::Mission,
            vec![
                ItemSeed::new(
                    "FILTRO DE ÓLEO",
                    "PSL 55",
                    "TECFIL",
                    100,
                    last("Mariana Santos", "10/10", 98),
                ),
                ItemSeed::new(
                    "FILTRO DE ÓLEO",
                    "LB 55",
                    "VOX",
                    50,
                    last("Mariana Santos", "10/10", 50),
                ),
                ItemSeed::new(
                    "FILTRO DE ÓLEO",
                    "WO 200",
                    "WEGA",
                    20,
                    last("Mariana Santos", "10/10", 20),
                ),
            ],
        ),
        Block::new(
            BlockId::new(5),
            "REF: 9912",
            "Mezanino • Box 4",
            BlockStatus::Late,
            "24/10",
            Some("Bomba D'água".to_string()),
            ScanContext::Mission,
            vec![ItemSeed::new(
                "BOMBA D'ÁGUA",
                "UB0625",
                "URBA",
                4,
                last("João Pedro", "01/09", 4),
            )],
        ),
    ]
}

fn history_item(
    id: &str,
    name: &str,
    sku: &str,
    brand: &str,
    qty: i64,
    counted_by: &str,
    counted_at: &str,
) -> HistoryItem {
    HistoryItem {
        id: id.to_string(),
        name: name.to_string(),
        sku: sku.to_string(),
        brand: brand.to_string(),
        qty,
        counted_by: counted_by.to_string(),
        counted_at: counted_at.to_string(),
    }
}

pub fn seed_history() -> Vec<HistoryBlock> {
    vec![
        HistoryBlock {
            id: 1,
            parent_ref: "S/REF".to_string(),
            location: "Rua 04 • Nível 2 • Apto 10".to_string(),
            user: "Carlos Silva".to_string(),
            finished_at: "Hoje, 14:45".to_string(),
            raw_date: "2023-10-25".to_string(),
            outcome: HistoryOutcome::Completed,
            items: vec![
                history_item("i1", "BRONZINA DE BIELA", "BB121 000", "METAL LEVE", 3, "Carlos Silva", "Hoje 14:40"),
                history_item("i2", "BRONZINA DE BIELA", "87998604", "KS", 2, "Carlos Silva", "Hoje 14:42"),
                history_item("i3", "BRONZINA DE BIELA", "10482-A", "SINTERMETAL", 5, "Carlos Silva", "Hoje 14:44"),
            ],
        },
        HistoryBlock {
            id: 2,
            parent_ref: "REF: 1029".to_string(),
            location: "Rua 12 • Bloco B".to_string(),
            user: "Carlos Silva".to_string(),
            finished_at: "Hoje, 11:20".to_string(),
            raw_date: "2023-10-25".to_string(),
            outcome: HistoryOutcome::Completed,
            items: vec![history_item(
                "i4",
                "PISTÃO C/ ANÉIS 0,50",
                "P9120 050",
                "MAHLE",
                12,
                "Carlos Silva",
                "Hoje 11:15",
            )],
        },
        HistoryBlock {
            id: 3,
            parent_ref: "REF: 9912".to_string(),
            location: "Mezanino • Box 4".to_string(),
            user: "Mariana Santos".to_string(),
            finished_at: "Ontem, 16:30".to_string(),
            raw_date: "2023-10-24".to_string(),
            outcome: HistoryOutcome::WithDivergence,
            items: vec![
                history_item("i5", "BOMBA D'ÁGUA", "UB0625", "URBA", 4, "Mariana Santos", "Ontem 16:10"),
                history_item("i6", "BOMBA D'ÁGUA", "UB0628", "URBA", 2, "Mariana Santos", "Ontem 16:15"),
                history_item("i7", "VÁLVULA TERMOSTÁTICA", "VT 200", "MTE", 10, "Mariana Santos", "Ontem 16:20"),
                history_item("i8", "SENSOR DE TEMPERATURA", "ST 3030", "MTE", 5, "Mariana Santos", "Ontem 16:25"),
            ],
        },
        HistoryBlock {
            id: 4,
            parent_ref: "REF: 5502".to_string(),
            location: "Rua 01 • Nível 1".to_string(),
            user: "João Pedro".to_string(),
            finished_at: "23/10, 09:15".to_string(),
            raw_date: "2023-10-23".to_string(),
            outcome: HistoryOutcome::Completed,
            items: vec![
                history_item("i9", "FILTRO DE ÓLEO", "PSL 55", "TECFIL", 100, "João Pedro", "23/10 09:00"),
                history_item("i10", "FILTRO DE ÓLEO", "LB 55", "VOX", 50, "João Pedro", "23/10 09:10"),
            ],
        },
    ]
}

pub fn seed_treatment() -> Vec<TreatmentItem> {
    vec![
        TreatmentItem {
            id: 1,
            name: "Bronzina de Biela".to_string(),
            sku: "10482-A".to_string(),
            location: "A-04-2".to_string(),
            issue: IssueKind::InfoDivergence,
            reported_by: "Carlos Silva".to_string(),
            reported_at: "Hoje, 10:30".to_string(),
            raw_date: "2023-10-25".to_string(),
            resolved: false,
        },
        TreatmentItem {
            id: 2,
            name: "Junta do Cabeçote".to_string(),
            sku: "829102".to_string(),
            location: "B-12-1".to_string(),
            issue: IssueKind::InfoDivergence,
            reported_by: "Mariana Santos".to_string(),
            reported_at: "Ontem, 16:45".to_string(),
            raw_date: "2023-10-24".to_string(),
            resolved: false,
        },
        TreatmentItem {
            id: 3,
            name: "Filtro de Óleo".to_string(),
            sku: "WO-200".to_string(),
            location: "C-01-4".to_string(),
            issue: IssueKind::NotLocated,
            reported_by: "João Pedro".to_string(),
            reported_at: "22/10, 09:00".to_string(),
            raw_date: "2023-10-22".to_string(),
            resolved: false,
        },
    ]
}

/// Loads every demo dataset into an empty store.
pub fn load_seed(store: &mut dyn CountStore) -> Result<(), StoreError> {
    for block in seed_blocks() {
        store.insert_block(block)?;
    }
    for block in seed_history() {
        store.insert_history_block(block)?;
    }
    for item in seed_treatment() {
        store.insert_treatment_item(item)?;
    }
    Ok(())
}
