pub mod config;
pub mod error;
pub mod json_bridge;
pub mod profile;
pub mod schema;
pub mod selections;
pub mod store;

pub use config::StoreConfig;
pub use error::{Result, StoreError};
pub use profile::{ProfileStore, default_base_dir, sanitize_name};
pub use selections::Selections;
pub use store::{HistoryEntry, Store};
