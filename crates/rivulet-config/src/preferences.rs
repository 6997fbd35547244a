// Preference set: an ordered map of kebab-case keys to scalar values.
//
// Only the keys in `Key` are interpreted. Everything else in the file is
// carried through untouched so saving never drops another component's data.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

/// Keys the launcher reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumIter, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum Key {
    RemoteHost,
    RemotePort,
    RemoteUsername,
    RemotePassword,
    RemoteSessionEnabled,
    StartMinimized,
    ShowTrayIcon,
}

impl Key {
    pub fn default_value(self) -> PrefValue {
        match self {
            Self::RemoteHost => PrefValue::Str("localhost".into()),
            Self::RemotePort => PrefValue::Int(9091),
            Self::RemoteUsername | Self::RemotePassword => PrefValue::Str(String::new()),
            Self::RemoteSessionEnabled | Self::StartMinimized | Self::ShowTrayIcon => {
                PrefValue::Bool(false)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrefValue {
    Bool(bool),
    Int(i64),
    Str(String),
    /// Anything else found on disk (floats, arrays, tables).
    Other(toml::Value),
}

impl From<bool> for PrefValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for PrefValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u16> for PrefValue {
    fn from(value: u16) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<String> for PrefValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&str> for PrefValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Preferences(BTreeMap<String, PrefValue>);

impl Default for Preferences {
    fn default() -> Self {
        Self(
            Key::iter()
                .map(|key| (key.to_string(), key.default_value()))
                .collect(),
        )
    }
}

impl Preferences {
    pub fn get(&self, key: &str) -> Option<&PrefValue> {
        self.0.get(key)
    }

    /// Boolean value of `key`; missing or mistyped entries read as the
    /// key's default.
    pub fn get_bool(&self, key: Key) -> bool {
        match self.0.get(key.as_ref()) {
            Some(PrefValue::Bool(value)) => *value,
            _ => matches!(key.default_value(), PrefValue::Bool(true)),
        }
    }

    pub fn get_int(&self, key: Key) -> Option<i64> {
        match self.0.get(key.as_ref()) {
            Some(PrefValue::Int(value)) => Some(*value),
            _ => match key.default_value() {
                PrefValue::Int(value) => Some(value),
                _ => None,
            },
        }
    }

    pub fn get_str(&self, key: Key) -> Option<&str> {
        match self.0.get(key.as_ref()) {
            Some(PrefValue::Str(value)) => Some(value),
            _ => None,
        }
    }

    pub fn set(&mut self, key: Key, value: impl Into<PrefValue>) {
        self.0.insert(key.to_string(), value.into());
    }

    /// Set an entry the launcher does not interpret.
    pub fn set_raw(&mut self, key: impl Into<String>, value: impl Into<PrefValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PrefValue)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }
}
