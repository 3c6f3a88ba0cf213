//! The one piece of persisted state: a marker file whose presence means
//! "logged in". Written at login, removed at logout, checked at startup.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use chrono::Utc;
use log::info;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

static DATA_DIR_OVERRIDE: OnceCell<PathBuf> = OnceCell::new();

/// Override the data directory for the whole process (set from the
/// --data-dir flag before anything touches the session file).
pub fn set_data_dir_override(dir: PathBuf) {
    let _ = DATA_DIR_OVERRIDE.set(dir);
}

pub fn data_dir() -> Result<PathBuf> {
    if let Some(dir) = DATA_DIR_OVERRIDE.get() {
        if !dir.exists() {
            fs::create_dir_all(dir)?;
        }
        return Ok(dir.clone());
    }
    let dir = dirs::config_dir()
        .ok_or_else(|| anyhow!("Could not determine config directory"))?
        .join("hugup");

    if !dir.exists() {
        fs::create_dir_all(&dir)?;
    }

    Ok(dir)
}

#[derive(Serialize, Deserialize)]
struct SessionRecord {
    phone: String,
    since: u64,
}

/// Handle to the session marker file.
pub struct SessionFlag {
    path: PathBuf,
}

impl SessionFlag {
    pub fn open_default() -> Result<Self> {
        Ok(SessionFlag::at(&data_dir()?))
    }

    pub fn at(dir: &Path) -> Self {
        SessionFlag {
            path: dir.join("session.json"),
        }
    }

    /// Presence of the file is the flag; the contents are informational.
    pub fn is_authenticated(&self) -> bool {
        self.path.exists()
    }

    pub fn set(&self, phone: &str) -> Result<()> {
        let record = SessionRecord {
            phone: phone.to_string(),
            since: Utc::now().timestamp() as u64,
        };
        let file = File::create(&self.path)?;
        serde_json::to_writer_pretty(file, &record)?;

        info!("Session flag written for {}", phone);
        Ok(())
    }

    pub fn phone(&self) -> Option<String> {
        let contents = fs::read_to_string(&self.path).ok()?;
        let record: SessionRecord = serde_json::from_str(&contents).ok()?;
        Some(record.phone)
    }

    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
            info!("Session flag cleared");
        }
        Ok(())
    }
}
