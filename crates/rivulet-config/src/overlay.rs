//! Folding launch options into stored preferences.
//!
//! Launch options win for the keys they name; every other entry is left as
//! loaded. Nothing here touches the disk.

use secrecy::{ExposeSecret, SecretString};

use crate::preferences::{Key, Preferences};

/// Preference-affecting launch options.
#[derive(Debug, Default)]
pub struct Overrides {
    pub minimized: bool,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<SecretString>,
}

impl Overrides {
    /// Whether any remote-session option was given.
    pub fn touches_remote_session(&self) -> bool {
        self.host.is_some()
            || self.port.is_some()
            || self.username.is_some()
            || self.password.is_some()
    }
}

/// Preferences and flags a fresh instance boots with.
#[derive(Debug, Clone, PartialEq)]
pub struct Startup {
    pub preferences: Preferences,
    /// Start hidden in the tray. Derived; never written back.
    pub minimized: bool,
}

/// Apply `overrides` on top of `stored`.
///
/// Minimizing needs somewhere to minimize to, so without a tray icon the
/// window always starts visible.
pub fn apply(overrides: &Overrides, mut stored: Preferences) -> Startup {
    if let Some(host) = &overrides.host {
        stored.set(Key::RemoteHost, host.as_str());
    }
    if let Some(port) = overrides.port {
        stored.set(Key::RemotePort, port);
    }
    if let Some(username) = &overrides.username {
        stored.set(Key::RemoteUsername, username.as_str());
    }
    if let Some(password) = &overrides.password {
        stored.set(Key::RemotePassword, password.expose_secret());
    }
    if overrides.touches_remote_session() {
        stored.set(Key::RemoteSessionEnabled, true);
    }

    let minimized = (overrides.minimized || stored.get_bool(Key::StartMinimized))
        && stored.get_bool(Key::ShowTrayIcon);

    Startup {
        preferences: stored,
        minimized,
    }
}
