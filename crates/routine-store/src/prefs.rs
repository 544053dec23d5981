use std::fmt;
use std::str::FromStr;

use tracing::warn;

use crate::database::Database;
use crate::error::StoreError;
use crate::kv::KvRepo;

pub const SELECTED_TAB_KEY: &str = "selectedTab";

/// The top-level views a front-end can show.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    Chat,
    Products,
    Routine,
}

impl View {
    pub const ALL: [View; 3] = [View::Chat, View::Products, View::Routine];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::Products => "products",
            Self::Routine => "routine",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| format!("unknown view: {s}"))
    }
}

/// Remembers the last selected view between runs.
#[derive(Clone)]
pub struct ViewPrefs {
    kv: KvRepo,
}

impl ViewPrefs {
    pub fn new(db: Database) -> Self {
        Self { kv: KvRepo::new(db) }
    }

    pub fn save(&self, view: View) -> Result<(), StoreError> {
        self.kv.put(SELECTED_TAB_KEY, view.as_str())
    }

    /// The saved view, or the first view when nothing valid is stored.
    pub fn load(&self) -> View {
        match self.kv.get(SELECTED_TAB_KEY) {
            Ok(Some(raw)) => raw.parse().unwrap_or_default(),
            Ok(None) => View::default(),
            Err(e) => {
                warn!(error = %e, "could not read selected view");
                View::default()
            }
        }
    }
}
