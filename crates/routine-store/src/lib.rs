pub mod database;
pub mod error;
pub mod export;
pub mod kv;
pub mod mirror;
pub mod prefs;
pub mod schema;

pub use database::Database;
pub use error::StoreError;
pub use kv::KvRepo;
pub use mirror::RoutineMirror;
pub use prefs::{View, ViewPrefs};
