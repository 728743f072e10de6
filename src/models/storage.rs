//! Persistence slots used by the session controller: the known players list, the current
//! session snapshot and the snapshot of the previous run.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

/// String-valued key/value slots. Reads return `None` when a slot was never written.
/// Writes are fire-and-forget: implementations log failures instead of returning them.
pub trait AdminStorage: Send + Sync {
    fn players(&self) -> Option<String>;
    fn set_players(&mut self, value: String);
    fn state(&self) -> Option<String>;
    fn set_state(&mut self, value: String);
    fn old_state(&self) -> Option<String>;
    fn set_old_state(&mut self, value: String);
}

/// Keeps everything in memory. Used by tests and as a scratch store.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    pub players: Option<String>,
    pub state: Option<String>,
    pub old_state: Option<String>,
}

impl AdminStorage for MemoryStorage {
    fn players(&self) -> Option<String> {
        self.players.clone()
    }
    fn set_players(&mut self, value: String) {
        self.players = Some(value);
    }
    fn state(&self) -> Option<String> {
        self.state.clone()
    }
    fn set_state(&mut self, value: String) {
        self.state = Some(value);
    }
    fn old_state(&self) -> Option<String> {
        self.old_state.clone()
    }
    fn set_old_state(&mut self, value: String) {
        self.old_state = Some(value);
    }
}

const PLAYERS_FILE: &str = "participants.json";
const STATE_FILE: &str = "state.json";
const OLD_STATE_FILE: &str = "old_state.json";

/// One file per slot inside a data directory.
#[derive(Clone, Debug)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Use `dir`, creating it when missing.
    pub fn new(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn read(&self, file: &str) -> Option<String> {
        let path = self.dir.join(file);
        match fs::read_to_string(&path) {
            Ok(contents) => Some(contents),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                log::warn!("Could not read {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Write to a sibling temp file, then rename it over the slot file.
    fn write(&self, file: &str, value: &str) {
        let path = self.dir.join(file);
        let tmp = self.dir.join(format!("{}.tmp", file));
        if let Err(e) = fs::write(&tmp, value).and_then(|_| fs::rename(&tmp, &path)) {
            log::warn!("Could not write {}: {}", path.display(), e);
            let _ = fs::remove_file(&tmp);
        }
    }
}

impl AdminStorage for FileStorage {
    fn players(&self) -> Option<String> {
        self.read(PLAYERS_FILE)
    }
    fn set_players(&mut self, value: String) {
        self.write(PLAYERS_FILE, &value);
    }
    fn state(&self) -> Option<String> {
        self.read(STATE_FILE)
    }
    fn set_state(&mut self, value: String) {
        self.write(STATE_FILE, &value);
    }
    fn old_state(&self) -> Option<String> {
        self.read(OLD_STATE_FILE)
    }
    fn set_old_state(&mut self, value: String) {
        self.write(OLD_STATE_FILE, &value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_storage_round_trips_slots() {
        let dir = std::env::temp_dir().join(format!("court_rotation_{}", uuid::Uuid::new_v4()));
        let mut storage = FileStorage::new(&dir).unwrap();
        assert_eq!(storage.state(), None);
        storage.set_state("{}".into());
        storage.set_players("[]".into());
        assert_eq!(storage.state().as_deref(), Some("{}"));
        assert_eq!(storage.players().as_deref(), Some("[]"));
        assert_eq!(storage.old_state(), None);

        storage.set_state(r#"{"w":[]}"#.into());
        assert_eq!(storage.state().as_deref(), Some(r#"{"w":[]}"#));
        assert!(!dir.join("state.json.tmp").exists());
        fs::remove_dir_all(&dir).unwrap();
    }
}
