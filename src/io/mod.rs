pub mod csv_export;
pub mod csv_import;
pub mod file;
pub mod state;
pub mod store;

pub use file::{load_backup, save_backup};
pub use state::{
    load_state, preserve_unreadable_state, read_state, save_state, STORAGE_KEY, UNREADABLE_KEY,
};
pub use store::{FileStore, KeyValueStore, MemoryStore};
