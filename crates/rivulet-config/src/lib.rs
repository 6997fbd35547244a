//! Persisted preferences for the rivulet front-end.
//!
//! A flat TOML file (`settings.toml`) in the config directory, loaded with
//! figment over built-in defaults, plus the overlay that folds launch
//! options into it before a fresh instance boots.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Format, Serialized, Toml},
};
use thiserror::Error;
use tracing::debug;

pub mod overlay;
pub mod preferences;

pub use overlay::{Overrides, Startup, apply};
pub use preferences::{Key, PrefValue, Preferences};

/// Application name used for directories and endpoint naming.
pub const APP_NAME: &str = "rivulet";

/// Environment variable that overrides the config directory.
pub const HOME_ENV: &str = "RIVULET_HOME";

/// File name of the preference store inside the config directory.
pub const SETTINGS_FILE: &str = "settings.toml";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to serialize preferences: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("preference loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Config directory ────────────────────────────────────────────────

/// Platform config directory for rivulet.
pub fn default_config_dir() -> PathBuf {
    ProjectDirs::from("org", APP_NAME, APP_NAME)
        .map_or_else(dirs_fallback, |dirs| dirs.config_dir().to_path_buf())
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push(APP_NAME);
    p
}

/// Config directory for this launch: explicit option, then [`HOME_ENV`],
/// then the platform default.
pub fn resolve_config_dir(explicit: Option<&Path>) -> PathBuf {
    pick_config_dir(explicit, std::env::var_os(HOME_ENV))
}

fn pick_config_dir(explicit: Option<&Path>, home_env: Option<OsString>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir.to_path_buf();
    }
    match home_env {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => default_config_dir(),
    }
}

// ── Store ───────────────────────────────────────────────────────────

/// Where preferences live between launches.
pub trait PreferenceStore {
    fn load(&self) -> Result<Preferences, ConfigError>;
    fn save(&self, preferences: &Preferences) -> Result<(), ConfigError>;
}

/// `settings.toml` inside a config directory.
#[derive(Debug, Clone)]
pub struct TomlStore {
    path: PathBuf,
}

impl TomlStore {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            path: dir.join(SETTINGS_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for TomlStore {
    /// Defaults merged under the file; a missing file yields the defaults.
    fn load(&self) -> Result<Preferences, ConfigError> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Preferences::default()))
            .merge(Toml::file(&self.path));

        let preferences: Preferences = figment.extract()?;
        debug!(path = %self.path.display(), entries = preferences.len(), "loaded preferences");
        Ok(preferences)
    }

    fn save(&self, preferences: &Preferences) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(preferences)?;
        std::fs::write(&self.path, toml_str)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_dir_beats_environment() {
        let dir = pick_config_dir(Some(Path::new("/opt/a")), Some("/opt/b".into()));
        assert_eq!(dir, PathBuf::from("/opt/a"));
    }

    #[test]
    fn environment_beats_platform_default() {
        assert_eq!(
            pick_config_dir(None, Some("/opt/b".into())),
            PathBuf::from("/opt/b")
        );
    }

    #[test]
    fn empty_environment_falls_back_to_platform_default() {
        assert_eq!(pick_config_dir(None, Some(OsString::new())), default_config_dir());
        assert!(default_config_dir().to_string_lossy().contains(APP_NAME));
    }
}
