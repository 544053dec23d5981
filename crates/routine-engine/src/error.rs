use routine_store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("could not read catalog {path}: {detail}")]
    Io { path: String, detail: String },

    #[error("could not fetch catalog: {0}")]
    Fetch(String),

    #[error("catalog fetch returned status {0}")]
    Status(u16),

    #[error("catalog is not a JSON array of products: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("message is empty")]
    EmptyInput,

    #[error("a reply is still pending")]
    TurnInFlight,

    #[error("no pending turn matches this reply")]
    StaleTurn,

    #[error("unknown product: {0}")]
    UnknownProduct(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
