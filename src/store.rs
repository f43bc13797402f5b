//! The state file: one JSON blob holding catalog, ledger, import log and
//! settings. Loading is forgiving (a missing or corrupt file starts fresh),
//! saving is whole-state, and backups reuse the same payload shape so a
//! state file and a backup are interchangeable.

use std::path::{Path, PathBuf};

use crate::error::{FolioError, Result};
use crate::models::AppState;

pub const STATE_FILE: &str = "state.json";

pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("folio")
}

pub fn state_path(data_dir: &Path) -> PathBuf {
    data_dir.join(STATE_FILE)
}

/// Load the state file, or defaults when it is missing or unreadable. A
/// corrupt file is left on disk untouched; the next save overwrites it.
pub fn load_state(path: &Path) -> AppState {
    let Ok(content) = std::fs::read_to_string(path) else {
        return AppState::default();
    };
    match serde_json::from_str(&content) {
        Ok(state) => state,
        Err(e) => {
            log::warn!("{}: unreadable state file ({e}), starting fresh", path.display());
            AppState::default()
        }
    }
}

pub fn save_state(path: &Path, state: &AppState) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(state)?;
    std::fs::write(path, format!("{json}\n"))?;
    Ok(())
}

/// Remove the state file. A path that does not exist counts as success.
pub fn reset_state(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

pub fn default_backup_name(today: &str) -> String {
    format!("folio-backup-{today}.json")
}

pub fn export_backup(state: &AppState, out: &Path) -> Result<()> {
    save_state(out, state)
}

/// Parse a backup payload. `books`, `sales` and `imports` must all be
/// present as arrays; anything else in the payload is ignored or defaulted,
/// so backups written by the web edition of the tracker restore cleanly.
pub fn parse_backup(text: &str) -> Result<AppState> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|_| FolioError::InvalidBackupFormat)?;
    for field in ["books", "sales", "imports"] {
        if !value.get(field).map(|v| v.is_array()).unwrap_or(false) {
            return Err(FolioError::InvalidBackupFormat);
        }
    }
    serde_json::from_value(value).map_err(|_| FolioError::InvalidBackupFormat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Book;

    fn sample_state() -> AppState {
        let mut state = AppState::default();
        state.books.push(Book {
            id: "b1".to_string(),
            title: "Night Runs".to_string(),
            series: String::new(),
            niche: "Fitness".to_string(),
            format: "Paperback".to_string(),
            publish_date: "2024-01-01".to_string(),
            design_cost: 10.0,
            marketing_cost: 5.0,
        });
        state
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deep").join("state.json");
        save_state(&path, &sample_state()).unwrap();
        let loaded = load_state(&path);
        assert_eq!(loaded.books.len(), 1);
        assert_eq!(loaded.books[0].title, "Night Runs");
        assert_eq!(loaded.settings.default_niche, "Uncategorized");
    }

    #[test]
    fn test_load_missing_file_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let state = load_state(&dir.path().join("nope.json"));
        assert!(state.books.is_empty());
        assert!(state.sales.is_empty());
        assert!(state.imports.is_empty());
    }

    #[test]
    fn test_load_corrupt_file_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{not json").unwrap();
        let state = load_state(&path);
        assert!(state.books.is_empty());
        // The corrupt file is not deleted.
        assert!(path.exists());
    }

    #[test]
    fn test_reset_state_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        save_state(&path, &AppState::default()).unwrap();
        reset_state(&path).unwrap();
        assert!(!path.exists());
        reset_state(&path).unwrap();
    }

    #[test]
    fn test_parse_backup_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("backup.json");
        export_backup(&sample_state(), &out).unwrap();
        let text = std::fs::read_to_string(&out).unwrap();
        let restored = parse_backup(&text).unwrap();
        assert_eq!(restored.books[0].id, "b1");
    }

    #[test]
    fn test_parse_backup_requires_core_arrays() {
        let missing_sales = r#"{"books": [], "imports": []}"#;
        assert!(matches!(
            parse_backup(missing_sales).unwrap_err(),
            FolioError::InvalidBackupFormat
        ));

        let wrong_type = r#"{"books": [], "sales": {}, "imports": []}"#;
        assert!(matches!(
            parse_backup(wrong_type).unwrap_err(),
            FolioError::InvalidBackupFormat
        ));

        assert!(matches!(
            parse_backup("not json at all").unwrap_err(),
            FolioError::InvalidBackupFormat
        ));
    }

    #[test]
    fn test_parse_backup_ignores_extra_fields() {
        let payload = r#"{"books": [], "sales": [], "imports": [], "settings": {"firstRunNoticeDismissed": true}}"#;
        let state = parse_backup(payload).unwrap();
        assert_eq!(state.settings.default_format, "Paperback");
    }

    #[test]
    fn test_default_backup_name() {
        assert_eq!(default_backup_name("2024-06-01"), "folio-backup-2024-06-01.json");
    }
}
