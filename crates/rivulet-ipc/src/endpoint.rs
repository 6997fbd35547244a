// Well-known address of the single-instance channel.
//
// Unix: a socket under the per-user runtime directory. Windows: a named pipe.
// Both are derived from the application name so every launch of the same
// application agrees on where to look.

use std::fmt;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the endpoint location.
pub const ENDPOINT_ENV: &str = "RIVULET_INSTANCE_ENDPOINT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    path: PathBuf,
}

impl Endpoint {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Socket path (Unix) or pipe name (Windows).
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Resolve the endpoint for `app_name`, honouring [`ENDPOINT_ENV`].
    pub fn resolve(app_name: &str) -> Self {
        match std::env::var_os(ENDPOINT_ENV) {
            Some(value) if !value.is_empty() => Self::new(value),
            _ => Self::default_for(app_name),
        }
    }

    #[cfg(unix)]
    pub fn default_for(app_name: &str) -> Self {
        let runtime = directories::ProjectDirs::from("", "", app_name)
            .and_then(|dirs| dirs.runtime_dir().map(|dir| dir.join("instance.sock")));

        runtime.map_or_else(
            || {
                let user = std::env::var("USER").unwrap_or_else(|_| "default".into());
                Self::new(std::env::temp_dir().join(format!("{app_name}-{user}.sock")))
            },
            Self::new,
        )
    }

    #[cfg(windows)]
    pub fn default_for(app_name: &str) -> Self {
        Self::new(format!(r"\\.\pipe\{app_name}-instance"))
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}
