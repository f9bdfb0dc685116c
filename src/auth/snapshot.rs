use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::User;

/// Snapshot file name in the data directory
const SNAPSHOT_FILE: &str = "session.json";

/// The one record this client persists: the last authenticated identity.
/// Written on successful login/signup, removed on logout or a failed
/// session refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub user: User,
    pub saved_at: DateTime<Utc>,
}

pub struct SnapshotStore {
    data_dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Load the persisted identity, if one exists.
    pub fn load(&self) -> Result<Option<User>> {
        let path = self.snapshot_path();
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)
            .context("Failed to read session snapshot")?;
        let snapshot: SessionSnapshot = serde_json::from_str(&contents)
            .context("Failed to parse session snapshot")?;

        Ok(Some(snapshot.user))
    }

    /// Persist the identity, replacing any previous snapshot.
    pub fn save(&self, user: &User) -> Result<()> {
        let snapshot = SessionSnapshot {
            user: user.clone(),
            saved_at: Utc::now(),
        };

        let path = self.snapshot_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(&snapshot)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Remove the persisted identity.
    pub fn clear(&self) -> Result<()> {
        let path = self.snapshot_path();
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    /// True when a snapshot file is present on disk.
    pub fn exists(&self) -> bool {
        self.snapshot_path().exists()
    }

    fn snapshot_path(&self) -> PathBuf {
        self.data_dir.join(SNAPSHOT_FILE)
    }
}
