//! Periodic saving and restore of the editing session.

use super::{FileStorage, SessionSnapshot, Storage, StorageResult};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default auto-save interval in seconds.
pub const DEFAULT_AUTOSAVE_INTERVAL_SECS: u64 = 30;

/// Key under which the most recent session is mirrored.
pub const LAST_SESSION_KEY: &str = "__last_session__";

/// Tracks unsaved changes and writes them through a [`Storage`] backend.
pub struct AutoSaveManager<S: Storage> {
    storage: Arc<S>,
    interval: Duration,
    last_save: Option<Instant>,
    dirty: bool,
    session_id: Option<String>,
}

impl<S: Storage> AutoSaveManager<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self {
            storage,
            interval: Duration::from_secs(DEFAULT_AUTOSAVE_INTERVAL_SECS),
            last_save: None,
            dirty: false,
            session_id: None,
        }
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_session_id(&mut self, id: Option<String>) {
        self.session_id = id;
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Dirty and the interval has elapsed (or nothing was saved yet).
    pub fn should_save(&self) -> bool {
        self.dirty && self.last_save.is_none_or(|last| last.elapsed() >= self.interval)
    }

    /// Save if [`should_save`](Self::should_save). Returns whether a save
    /// happened.
    pub async fn maybe_save(&mut self, session: &SessionSnapshot) -> StorageResult<bool> {
        if !self.should_save() {
            return Ok(false);
        }
        self.save(session).await?;
        Ok(true)
    }

    /// Save now, under the session id (if any) and the last-session key.
    pub async fn save(&mut self, session: &SessionSnapshot) -> StorageResult<()> {
        if let Some(id) = &self.session_id {
            self.storage.save(id, session).await?;
        }
        self.storage.save(LAST_SESSION_KEY, session).await?;
        self.last_save = Some(Instant::now());
        self.dirty = false;
        log::info!("autosaved session ({} elements)", session.elements.len());
        Ok(())
    }

    pub async fn load(&mut self, id: &str) -> StorageResult<SessionSnapshot> {
        let session = self.storage.load(id).await?;
        self.session_id = Some(id.to_string());
        self.dirty = false;
        self.last_save = Some(Instant::now());
        Ok(session)
    }

    /// The most recently saved session, if any.
    pub async fn restore_last(&mut self) -> Option<SessionSnapshot> {
        match self.storage.load(LAST_SESSION_KEY).await {
            Ok(session) => {
                self.dirty = false;
                self.last_save = Some(Instant::now());
                Some(session)
            }
            Err(e) => {
                log::debug!("no session to restore: {e}");
                None
            }
        }
    }

    /// Stored session ids, excluding the last-session mirror.
    pub async fn list_sessions(&self) -> StorageResult<Vec<String>> {
        let mut ids = self.storage.list().await?;
        ids.retain(|id| id != LAST_SESSION_KEY);
        Ok(ids)
    }

    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }
}

/// Auto-save manager over file storage in `dir`, or the default data
/// directory when `dir` is `None`.
pub fn create_autosave_manager(dir: Option<&std::path::Path>) -> StorageResult<AutoSaveManager<FileStorage>> {
    let storage = match dir {
        Some(dir) => FileStorage::new(dir)?,
        None => FileStorage::default_location()?,
    };
    Ok(AutoSaveManager::new(Arc::new(storage)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;
    use crate::storage::{MemoryStorage, block_on};

    #[test]
    fn test_clean_manager_does_not_save() {
        let manager = AutoSaveManager::new(Arc::new(MemoryStorage::new()));
        assert!(!manager.is_dirty());
        assert!(!manager.should_save());
    }

    #[test]
    fn test_interval_gates_saves() {
        let mut manager = AutoSaveManager::new(Arc::new(MemoryStorage::new()));
        let session = Canvas::new().session_snapshot();

        manager.mark_dirty();
        assert!(block_on(manager.maybe_save(&session)).unwrap());
        assert!(!manager.is_dirty());

        manager.mark_dirty();
        assert!(!block_on(manager.maybe_save(&session)).unwrap());

        manager.set_interval(Duration::ZERO);
        assert!(block_on(manager.maybe_save(&session)).unwrap());
    }

    #[test]
    fn test_restore_last_session() {
        let mut manager = AutoSaveManager::new(Arc::new(MemoryStorage::new()));
        manager.set_session_id(Some("board".to_string()));
        let mut session = Canvas::new().session_snapshot();
        session.stroke_width = 7.0;
        manager.mark_dirty();
        block_on(manager.save(&session)).unwrap();

        let mut fresh = AutoSaveManager::new(manager.storage().clone());
        let restored = block_on(fresh.restore_last()).unwrap();
        assert!((restored.stroke_width - 7.0).abs() < f64::EPSILON);
        assert_eq!(block_on(fresh.list_sessions()).unwrap(), vec!["board".to_string()]);
    }

    #[test]
    fn test_restore_without_saved_session() {
        let mut manager = AutoSaveManager::new(Arc::new(MemoryStorage::new()));
        assert!(block_on(manager.restore_last()).is_none());
    }

    #[test]
    fn test_file_backed_manager() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = create_autosave_manager(Some(dir.path())).unwrap();
        manager.mark_dirty();
        block_on(manager.save(&Canvas::new().session_snapshot())).unwrap();
        assert!(manager.storage().base_path().join(format!("{LAST_SESSION_KEY}.json")).exists());
    }
}
