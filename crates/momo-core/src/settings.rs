//! Persistent bot settings: a small JSON file holding the flags that must
//! survive a restart.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;

/// On-disk settings shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Whether the daily webhook delivery is enabled.
    #[serde(default)]
    pub daily_webhook_enabled: bool,
}

/// Load/save wrapper around the settings file.
///
/// Every mutation is persisted synchronously so a crash cannot lose a toggle.
pub struct SettingsStore {
    path: PathBuf,
    settings: RwLock<Settings>,
}

impl SettingsStore {
    /// Open the settings file, creating it with defaults when missing.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let settings = match std::fs::read(&path) {
            Ok(data) => serde_json::from_slice(&data)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let defaults = Settings::default();
                write_settings(&path, &defaults)?;
                info!(path = %path.display(), "created settings file with defaults");
                defaults
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            settings: RwLock::new(settings),
        })
    }

    pub fn daily_enabled(&self) -> bool {
        self.settings.read().unwrap().daily_webhook_enabled
    }

    pub fn set_daily_enabled(&self, enabled: bool) -> Result<()> {
        let snapshot = {
            let mut settings = self.settings.write().unwrap();
            settings.daily_webhook_enabled = enabled;
            settings.clone()
        };
        write_settings(&self.path, &snapshot)
    }

    /// Flip the daily flag and persist. Returns the new value.
    pub fn toggle_daily(&self) -> Result<bool> {
        let (snapshot, new_state) = {
            let mut settings = self.settings.write().unwrap();
            settings.daily_webhook_enabled = !settings.daily_webhook_enabled;
            (settings.clone(), settings.daily_webhook_enabled)
        };
        write_settings(&self.path, &snapshot)?;
        Ok(new_state)
    }
}

fn write_settings(path: &Path, settings: &Settings) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let data = serde_json::to_string_pretty(settings)?;
    std::fs::write(path, data)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_starts_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let store = SettingsStore::load(&path).unwrap();
        assert!(!store.daily_enabled());
        // The file was created with defaults.
        assert!(path.exists());
    }

    #[test]
    fn toggle_persists_across_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/settings.json");

        let store = SettingsStore::load(&path).unwrap();
        assert!(store.toggle_daily().unwrap());
        drop(store);

        let reloaded = SettingsStore::load(&path).unwrap();
        assert!(reloaded.daily_enabled());
        assert!(!reloaded.toggle_daily().unwrap());
    }

    #[test]
    fn set_overwrites_value() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::load(dir.path().join("s.json")).unwrap();
        store.set_daily_enabled(true).unwrap();
        assert!(store.daily_enabled());
        store.set_daily_enabled(false).unwrap();
        assert!(!store.daily_enabled());
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, b"not json").unwrap();
        assert!(SettingsStore::load(&path).is_err());
    }
}
