pub mod catalog_loader;
pub mod error;
pub mod events;
pub mod routine_manager;
pub mod session;

pub use catalog_loader::{load_catalog, load_catalog_or_empty, CatalogSource, CatalogStatus};
pub use error::{CatalogError, SessionError};
pub use events::SessionEvent;
pub use routine_manager::RoutineManager;
pub use session::{PendingTurn, Session, TurnOutcome, NETWORK_ERROR_NOTICE, THINKING_PLACEHOLDER};
