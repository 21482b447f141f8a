#![forbid(unsafe_code)]

mod seed;
mod store;

pub use seed::{load_seed, seed_blocks, seed_history, seed_treatment};
pub use store::{CountStore, EventRow, MemoryStore, SqliteStore, StoreError};
