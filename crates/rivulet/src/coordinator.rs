// Startup sequencing: classify, try a running instance, else boot locally.

use tracing::{debug, info, warn};

use rivulet_config::{PreferenceStore, Preferences, TomlStore, apply, resolve_config_dir};
use rivulet_core::{AddRequest, InstanceProbe, classify_all, delegate};

use crate::args::ParsedArgs;
use crate::error::CliError;
use crate::shell::{GuiBootstrap, LaunchPlan};

/// How a launch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A running instance accepted at least one target.
    Delegated,
    /// A new window was started.
    Launched,
}

pub struct Coordinator<P, G> {
    probe: P,
    gui: G,
    program: String,
}

impl<P: InstanceProbe, G: GuiBootstrap> Coordinator<P, G> {
    pub fn new(probe: P, gui: G, program: impl Into<String>) -> Self {
        Self {
            probe,
            gui,
            program: program.into(),
        }
    }

    pub async fn run(&mut self, parsed: ParsedArgs) -> Result<Outcome, CliError> {
        let requests = classify_all(&parsed.targets);

        if requests.iter().any(AddRequest::is_transferable) {
            if let Some(mut channel) = self.probe.locate().await {
                if delegate(&mut channel, &requests).await {
                    info!("handed targets to the running instance");
                    return Ok(Outcome::Delegated);
                }
                warn!("running instance accepted nothing, starting locally");
            }
        } else {
            debug!("nothing to hand over, skipping instance probe");
        }

        let config_dir = resolve_config_dir(parsed.config_dir.as_deref());
        let stored = TomlStore::in_dir(&config_dir).load().unwrap_or_else(|err| {
            warn!(dir = %config_dir.display(), error = %err, "using default preferences");
            Preferences::default()
        });
        let startup = apply(&parsed.overrides, stored);

        let targets = parsed
            .targets
            .iter()
            .zip(&requests)
            .filter(|(_, request)| request.is_transferable())
            .map(|(target, _)| target.clone())
            .collect();

        let plan = LaunchPlan {
            config_dir,
            preferences: startup.preferences,
            minimized: startup.minimized,
            targets,
            toolkit_argv: parsed.toolkit_argv(&self.program),
        };
        self.gui.start(plan)?;
        Ok(Outcome::Launched)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::Cell;
    use std::fs;
    use std::sync::{Arc, Mutex};

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use rivulet_config::{Key, Overrides, SETTINGS_FILE};
    use rivulet_core::AddSink;
    use rivulet_ipc::{AddPayload, IpcError};

    use super::*;

    type Seen = Arc<Mutex<Vec<AddPayload>>>;

    struct FakeSink {
        accept: bool,
        seen: Seen,
    }

    impl AddSink for FakeSink {
        async fn submit(&mut self, payload: AddPayload) -> Result<(), IpcError> {
            self.seen.lock().unwrap().push(payload);
            if self.accept {
                Ok(())
            } else {
                Err(IpcError::Rejected {
                    reason: "busy".into(),
                })
            }
        }
    }

    /// `None`: no instance running. `Some(accept)`: an instance that
    /// accepts or refuses everything.
    struct FakeProbe {
        running: Option<bool>,
        probes: Cell<usize>,
        seen: Seen,
    }

    impl FakeProbe {
        fn new(running: Option<bool>) -> Self {
            Self {
                running,
                probes: Cell::new(0),
                seen: Seen::default(),
            }
        }
    }

    impl InstanceProbe for FakeProbe {
        type Channel = FakeSink;

        async fn locate(&self) -> Option<FakeSink> {
            self.probes.set(self.probes.get() + 1);
            self.running.map(|accept| FakeSink {
                accept,
                seen: Arc::clone(&self.seen),
            })
        }
    }

    #[derive(Default)]
    struct FakeGui {
        plans: Vec<LaunchPlan>,
    }

    impl GuiBootstrap for FakeGui {
        fn start(&mut self, plan: LaunchPlan) -> Result<(), CliError> {
            self.plans.push(plan);
            Ok(())
        }
    }

    fn parsed(dir: &TempDir, targets: &[&str], overrides: Overrides) -> ParsedArgs {
        ParsedArgs {
            config_dir: Some(dir.path().to_path_buf()),
            overrides,
            targets: targets.iter().map(ToString::to_string).collect(),
            toolkit_args: Vec::new(),
            passthrough_start: None,
        }
    }

    #[tokio::test]
    async fn accepted_targets_end_the_launch() {
        let dir = TempDir::new().unwrap();
        let mut coordinator = Coordinator::new(FakeProbe::new(Some(true)), FakeGui::default(), "rivulet");
        let overrides = Overrides {
            host: Some("host1".into()),
            port: Some(9091),
            ..Overrides::default()
        };

        let outcome = coordinator
            .run(parsed(&dir, &["magnet:?xt=urn:btih:ABC"], overrides))
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Delegated);
        assert!(coordinator.gui.plans.is_empty());
        assert_eq!(
            *coordinator.probe.seen.lock().unwrap(),
            vec![AddPayload::Magnet("magnet:?xt=urn:btih:ABC".into())]
        );
        assert!(!dir.path().join(SETTINGS_FILE).exists());
    }

    #[tokio::test]
    async fn refused_targets_fall_back_to_a_local_start() {
        let dir = TempDir::new().unwrap();
        let mut coordinator = Coordinator::new(FakeProbe::new(Some(false)), FakeGui::default(), "rivulet");

        let outcome = coordinator
            .run(parsed(&dir, &["magnet:?xt=urn:btih:ABC"], Overrides::default()))
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Launched);
        assert_eq!(coordinator.gui.plans[0].targets, ["magnet:?xt=urn:btih:ABC"]);
    }

    #[tokio::test]
    async fn unrecognized_targets_skip_the_probe_and_are_dropped() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("bogus-file");
        let mut coordinator = Coordinator::new(FakeProbe::new(Some(true)), FakeGui::default(), "rivulet");

        let outcome = coordinator
            .run(parsed(&dir, &[missing.to_str().unwrap()], Overrides::default()))
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Launched);
        assert_eq!(coordinator.probe.probes.get(), 0);
        assert!(coordinator.gui.plans[0].targets.is_empty());
    }

    #[tokio::test]
    async fn local_start_gets_overlaid_preferences() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(SETTINGS_FILE),
            "show-tray-icon = true\nremote-session-enabled = false\n",
        )
        .unwrap();
        let torrent = dir.path().join("notes.torrent");
        fs::write(&torrent, b"plain text").unwrap();

        let mut coordinator = Coordinator::new(FakeProbe::new(None), FakeGui::default(), "rivulet");
        let overrides = Overrides {
            minimized: true,
            username: Some("alice".into()),
            ..Overrides::default()
        };
        coordinator
            .run(parsed(&dir, &[torrent.to_str().unwrap()], overrides))
            .await
            .unwrap();

        let plan = &coordinator.gui.plans[0];
        assert_eq!(coordinator.probe.probes.get(), 1);
        assert!(plan.minimized);
        assert_eq!(plan.config_dir, dir.path());
        assert_eq!(plan.targets, [torrent.to_str().unwrap()]);
        assert_eq!(plan.toolkit_argv, ["rivulet"]);
        assert!(plan.preferences.get_bool(Key::RemoteSessionEnabled));
        assert_eq!(plan.preferences.get_str(Key::RemoteUsername), Some("alice"));
    }

    #[tokio::test]
    async fn unreadable_settings_fall_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(SETTINGS_FILE), "remote-port = [").unwrap();

        let mut coordinator = Coordinator::new(FakeProbe::new(None), FakeGui::default(), "rivulet");
        coordinator
            .run(parsed(&dir, &[], Overrides::default()))
            .await
            .unwrap();

        assert_eq!(coordinator.gui.plans[0].preferences, Preferences::default());
    }
}
