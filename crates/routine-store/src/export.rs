use std::path::Path;

use routine_core::RoutineState;
use tracing::info;

use crate::error::StoreError;

pub const DEFAULT_EXPORT_FILE: &str = "routine.json";

/// Write `state` as pretty-printed JSON to `path`, replacing any existing file.
pub fn export_routine(state: &RoutineState, path: &Path) -> Result<(), StoreError> {
    let json = state.to_pretty_json()?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, json)?;
    info!(path = %path.display(), "routine exported");
    Ok(())
}
