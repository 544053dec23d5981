pub mod applier;
pub mod catalog;
pub mod errors;
pub mod hints;
pub mod ids;
pub mod messages;
pub mod product;
pub mod routine;
pub mod transport;

pub use applier::{apply, ApplyReport};
pub use catalog::{filter, Catalog, FilterCriteria};
pub use errors::TransportError;
pub use hints::extract;
pub use ids::{ProductId, SessionId};
pub use messages::{ConversationLog, Message, Role};
pub use product::{Product, Slot};
pub use routine::RoutineState;
pub use transport::ChatTransport;
