// Hand-off to the window.
//
// The windowing front-end lives outside this crate. `ReportingShell` stands
// in for it: it persists the effective preferences and writes the launch
// plan as JSON so packaging scripts and tests can see what would start.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;

use serde::Serialize;
use tracing::info;

use rivulet_config::{Key, PrefValue, PreferenceStore, Preferences, TomlStore};

use crate::error::CliError;

/// Everything a fresh instance boots with.
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchPlan {
    pub config_dir: PathBuf,
    pub preferences: Preferences,
    pub minimized: bool,
    /// Targets that classified as something transferable, in order.
    pub targets: Vec<String>,
    /// Program name followed by the toolkit pass-through arguments.
    pub toolkit_argv: Vec<String>,
}

/// Starts the window for a launch that was not delegated.
pub trait GuiBootstrap {
    fn start(&mut self, plan: LaunchPlan) -> Result<(), CliError>;
}

#[derive(Serialize)]
struct LaunchReport<'a> {
    config_dir: &'a PathBuf,
    minimized: bool,
    targets: &'a [String],
    toolkit_argv: &'a [String],
    preferences: BTreeMap<&'a str, &'a PrefValue>,
}

pub struct ReportingShell<W> {
    out: W,
}

impl<W: Write> ReportingShell<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> GuiBootstrap for ReportingShell<W> {
    fn start(&mut self, plan: LaunchPlan) -> Result<(), CliError> {
        let store = TomlStore::in_dir(&plan.config_dir);
        store.save(&plan.preferences)?;
        info!(path = %store.path().display(), "saved preferences");

        // The password never leaves the settings file.
        let secret = Key::RemotePassword.as_ref();
        let report = LaunchReport {
            config_dir: &plan.config_dir,
            minimized: plan.minimized,
            targets: &plan.targets,
            toolkit_argv: &plan.toolkit_argv,
            preferences: plan
                .preferences
                .iter()
                .filter(|(key, _)| *key != secret)
                .collect(),
        };

        serde_json::to_writer_pretty(&mut self.out, &report).map_err(CliError::bootstrap)?;
        writeln!(self.out).map_err(CliError::bootstrap)?;
        self.out.flush().map_err(CliError::bootstrap)
    }
}
