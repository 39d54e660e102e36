use std::fs;
use std::path::{Path, PathBuf};

use crate::error::SaveError;

use super::prefs::Prefs;

/// File-backed preference storage.
///
/// Saves are atomic: the JSON is written to a sibling temp file and renamed
/// over the target.
pub struct PrefsStore {
    path: PathBuf,
}

impl PrefsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        PrefsStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load preferences. A missing file is a fresh install: empty prefs.
    pub fn load(&self) -> Result<Prefs, SaveError> {
        if !self.path.exists() {
            return Ok(Prefs::default());
        }
        let content = fs::read_to_string(&self.path).map_err(|e| SaveError::PrefsRead {
            path: self.path.clone(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(|e| SaveError::PrefsParse {
            path: self.path.clone(),
            source: e,
        })
    }

    /// Save preferences atomically
    pub fn save(&self, prefs: &Prefs) -> Result<(), SaveError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(prefs)?;
        let mut tmp = self.path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> PrefsStore {
        PrefsStore::new(dir.path().join("prefs.json"))
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let prefs = store.load().unwrap();
        assert!(prefs.is_empty());
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let mut prefs = Prefs::new();
        prefs.set_int("player.level", 3);
        prefs.set_text("settings.speed", "turbo");
        store.save(&prefs).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, prefs);
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let store = PrefsStore::new(dir.path().join("nested/deep/prefs.json"));
        store.save(&Prefs::new()).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn test_save_overwrites_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let mut first = Prefs::new();
        first.set_int("gold", 100);
        store.save(&first).unwrap();

        let mut second = Prefs::new();
        second.set_int("gold", 250);
        store.save(&second).unwrap();

        assert_eq!(store.load().unwrap().get_int("gold"), Some(250));
    }

    #[test]
    fn test_save_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.save(&Prefs::new()).unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec!["prefs.json"]);
    }

    #[test]
    fn test_load_corrupt_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "not json {").unwrap();

        let err = store.load().unwrap_err();
        assert!(
            matches!(err, SaveError::PrefsParse { .. }),
            "expected PrefsParse, got: {err}"
        );
    }
}
