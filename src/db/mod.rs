pub mod migrations;
pub mod store;

pub use migrations::run_migrations;
pub use store::{HISTORY_KEY, KeyValueStore, LAST_MONTH_KEY, MemoryStore, SqliteStore, TASBEEH_KEY};
