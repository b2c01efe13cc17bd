// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Filesystem-backed `ConfigStore` for the overlay settings document.
//!
//! By default documents live under the platform config directory
//! (`~/.config/vnotify` on Linux) as `<key>.json`. A store can also be
//! rooted at any directory, or opened on one explicit settings file as an
//! add-on ships it next to its own sources.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use vnotify_core::config::{ConfigError, ConfigService, ConfigStore};
use vnotify_core::OverlayConfig;

/// Store settings as JSON files on disk.
#[derive(Debug, Clone)]
pub struct FsConfigStore {
    layout: Layout,
}

#[derive(Debug, Clone)]
enum Layout {
    /// `<base>/<key>.json`
    Dir(PathBuf),
    /// Every key maps to the same file.
    File(PathBuf),
}

impl FsConfigStore {
    /// Store rooted at the user config directory, created if missing.
    pub fn new() -> Result<Self, ConfigError> {
        let proj = ProjectDirs::from("dev", "vnotify", "vnotify")
            .ok_or_else(|| ConfigError::Other("could not resolve config dir".into()))?;
        let base = proj.config_dir().to_path_buf();
        fs::create_dir_all(&base)?;
        Ok(Self::in_dir(base))
    }

    /// Store rooted at `base`. The directory is created on first save.
    pub fn in_dir(base: impl Into<PathBuf>) -> Self {
        Self {
            layout: Layout::Dir(base.into()),
        }
    }

    /// Store backed by a single settings file, whatever the key.
    pub fn single_file(path: impl Into<PathBuf>) -> Self {
        Self {
            layout: Layout::File(path.into()),
        }
    }

    /// File that `key` reads from and writes to.
    pub fn path_for(&self, key: &str) -> PathBuf {
        match &self.layout {
            Layout::Dir(base) => base.join(format!("{key}.json")),
            Layout::File(path) => path.clone(),
        }
    }
}

impl ConfigStore for FsConfigStore {
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError> {
        let path = self.path_for(key);
        match fs::read(&path) {
            Ok(bytes) => {
                tracing::debug!(path = %path.display(), "settings loaded");
                Ok(bytes)
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Err(ConfigError::NotFound),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError> {
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, data)?;
        tracing::debug!(path = %path.display(), bytes = data.len(), "settings saved");
        Ok(())
    }
}

/// Read the overlay settings from `path`, defaulting when the file is absent.
pub fn load_settings_file(path: &Path) -> Result<OverlayConfig, ConfigError> {
    ConfigService::new(FsConfigStore::single_file(path)).load_overlay()
}
