use std::fs;
use std::path::PathBuf;

use log::{info, warn};

use crate::error::GameError;

/// Persisted high score: a single non-negative integer in a small text file.
/// Touched at most twice per session, once to load and once to reconcile.
pub struct ScoreStore {
    path: PathBuf,
}

impl ScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ScoreStore { path: path.into() }
    }

    /// First-run initialization: writes a 0 record when the file is missing,
    /// so a fresh install never has to treat "no file" as an error later.
    pub fn ensure_exists(&self) -> Result<(), GameError> {
        if !self.path.exists() {
            info!("initializing high score file at {:?}", self.path);
            fs::write(&self.path, "0")?;
        }
        Ok(())
    }

    /// An unreadable or unparseable store is worth a warning, never a crash;
    /// it simply counts as 0.
    pub fn load(&self) -> u32 {
        match fs::read_to_string(&self.path) {
            Ok(contents) => match contents.trim().parse() {
                Ok(score) => score,
                Err(_) => {
                    warn!("high score file {:?} holds garbage, treating as 0", self.path);
                    0
                }
            },
            Err(err) => {
                warn!("could not read high score file {:?}: {}", self.path, err);
                0
            }
        }
    }

    /// Overwrites the store only when the session beat it. Returns whether a
    /// new record was written. The stored value never decreases.
    pub fn save_if_higher(&self, session_score: u32) -> Result<bool, GameError> {
        if session_score > self.load() {
            fs::write(&self.path, session_score.to_string())?;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store_in(dir: &tempfile::TempDir) -> ScoreStore {
        ScoreStore::new(dir.path().join("highscore"))
    }

    #[test]
    fn ensure_exists_initializes_to_zero() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        store.ensure_exists().unwrap();
        assert_eq!(store.load(), 0);

        // A second call must not clobber an existing record.
        store.save_if_higher(12).unwrap();
        store.ensure_exists().unwrap();
        assert_eq!(store.load(), 12);
    }

    #[test]
    fn missing_file_loads_as_zero() {
        let dir = tempdir().unwrap();
        assert_eq!(store_in(&dir).load(), 0);
    }

    #[test]
    fn garbage_content_loads_as_zero() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(dir.path().join("highscore"), "not a number").unwrap();
        assert_eq!(store.load(), 0);
    }

    #[test]
    fn lower_session_score_leaves_the_record_alone() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(dir.path().join("highscore"), "10").unwrap();

        assert!(!store.save_if_higher(7).unwrap());
        assert_eq!(store.load(), 10);

        assert!(!store.save_if_higher(10).unwrap());
        assert_eq!(store.load(), 10);
    }

    #[test]
    fn higher_session_score_replaces_the_record() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(dir.path().join("highscore"), "10").unwrap();

        assert!(store.save_if_higher(15).unwrap());
        assert_eq!(store.load(), 15);
    }
}
