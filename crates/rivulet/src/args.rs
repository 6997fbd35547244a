// Turning argv into a launch request.
//
// No printing and no exiting here: version and help come back as outcomes
// and the caller decides what to do with them.

use std::path::PathBuf;

use clap::FromArgMatches;
use clap::error::ErrorKind;
use secrecy::SecretString;
use thiserror::Error;

use rivulet_config::Overrides;

use crate::cli::{self, Cli};

/// Literal separator before the toolkit arguments.
const PASSTHROUGH_SEPARATOR: &str = "--";

#[derive(Debug)]
pub enum ParseOutcome {
    Run(ParsedArgs),
    ShowVersion,
    /// Rendered help text.
    ShowHelp(String),
}

#[derive(Debug)]
pub struct ParsedArgs {
    pub config_dir: Option<PathBuf>,
    pub overrides: Overrides,
    /// Add-targets, in command-line order.
    pub targets: Vec<String>,
    pub toolkit_args: Vec<String>,
    /// argv index of the first token after `--`.
    pub passthrough_start: Option<usize>,
}

impl ParsedArgs {
    /// argv for the windowing toolkit: program name, then the pass-through
    /// tail.
    pub fn toolkit_argv(&self, program: &str) -> Vec<String> {
        std::iter::once(program.to_owned())
            .chain(self.toolkit_args.iter().cloned())
            .collect()
    }
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("{message}")]
    InvalidOption { message: String, usage: String },
}

/// Parse the full argv, program name included.
pub fn parse<I, T>(argv: I) -> Result<ParseOutcome, ParseError>
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    let argv: Vec<String> = argv.into_iter().map(Into::into).collect();
    let mut command = cli::command();

    let matches = match command.try_get_matches_from_mut(&argv) {
        Ok(matches) => matches,
        Err(err) => {
            return match err.kind() {
                ErrorKind::DisplayVersion => Ok(ParseOutcome::ShowVersion),
                ErrorKind::DisplayHelp => Ok(ParseOutcome::ShowHelp(err.to_string())),
                _ => Err(invalid_option(&err, &mut command)),
            };
        }
    };
    let cli = Cli::from_arg_matches(&matches).map_err(|err| invalid_option(&err, &mut command))?;

    let passthrough_start = argv
        .iter()
        .skip(1)
        .position(|arg| arg == PASSTHROUGH_SEPARATOR)
        .map(|index| index + 2);
    // The tail is taken from argv itself so it stays byte-for-byte what the
    // caller passed.
    let toolkit_args = passthrough_start
        .and_then(|start| argv.get(start..))
        .map(<[String]>::to_vec)
        .unwrap_or(cli.toolkit_args);

    Ok(ParseOutcome::Run(ParsedArgs {
        config_dir: cli.config_dir,
        overrides: Overrides {
            minimized: cli.minimized,
            host: cli.host,
            port: cli.port,
            username: cli.username,
            password: cli.password.map(SecretString::from),
        },
        targets: cli.targets,
        toolkit_args,
        passthrough_start,
    }))
}

fn invalid_option(err: &clap::Error, command: &mut clap::Command) -> ParseError {
    let rendered = err.to_string();
    let message = rendered
        .lines()
        .next()
        .unwrap_or_default()
        .trim_start_matches("error: ")
        .to_owned();

    ParseError::InvalidOption {
        message,
        usage: command.render_usage().to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    fn run(argv: &[&str]) -> ParsedArgs {
        match parse(argv.iter().copied()).unwrap() {
            ParseOutcome::Run(parsed) => parsed,
            other => panic!("expected Run, got {other:?}"),
        }
    }

    fn invalid(argv: &[&str]) -> String {
        match parse(argv.iter().copied()) {
            Err(ParseError::InvalidOption { message, usage }) => {
                assert!(usage.contains("rivulet"), "usage missing: {usage}");
                message
            }
            other => panic!("expected InvalidOption, got {other:?}"),
        }
    }

    #[test]
    fn bare_invocation_has_nothing_to_do() {
        let parsed = run(&["rivulet"]);
        assert!(parsed.targets.is_empty());
        assert!(parsed.toolkit_args.is_empty());
        assert_eq!(parsed.passthrough_start, None);
        assert!(!parsed.overrides.touches_remote_session());
    }

    #[test]
    fn options_and_targets_mix_freely() {
        let parsed = run(&[
            "rivulet", "a.torrent", "-m", "-r", "nas", "b.torrent", "-p", "9092", "-u", "alice",
            "-w", "secret", "-g", "/tmp/cfg", "a.torrent",
        ]);

        assert_eq!(parsed.targets, ["a.torrent", "b.torrent", "a.torrent"]);
        assert_eq!(parsed.config_dir, Some(PathBuf::from("/tmp/cfg")));
        assert!(parsed.overrides.minimized);
        assert_eq!(parsed.overrides.host.as_deref(), Some("nas"));
        assert_eq!(parsed.overrides.port, Some(9092));
        assert_eq!(parsed.overrides.username.as_deref(), Some("alice"));
        assert_eq!(
            parsed.overrides.password.as_ref().map(|p| p.expose_secret()),
            Some("secret")
        );
    }

    #[test]
    fn separator_stops_parsing() {
        let parsed = run(&["rivulet", "x.torrent", "--", "--display", ":1", "-v"]);

        assert_eq!(parsed.targets, ["x.torrent"]);
        assert_eq!(parsed.toolkit_args, ["--display", ":1", "-v"]);
        assert_eq!(parsed.passthrough_start, Some(3));
        assert_eq!(parsed.toolkit_argv("rivulet"), ["rivulet", "--display", ":1", "-v"]);
    }

    #[test]
    fn tail_after_separator_is_kept_verbatim() {
        let argv = ["rivulet", "-m", "--", "--", "-g", "a.torrent"];
        let parsed = run(&argv);

        let start = parsed.passthrough_start.unwrap();
        assert_eq!(start, 3);
        assert_eq!(parsed.toolkit_args, argv[start..]);
        assert!(parsed.targets.is_empty());
        assert_eq!(parsed.config_dir, None);
    }

    #[test]
    fn separator_at_the_end_leaves_an_empty_tail() {
        let parsed = run(&["rivulet", "a.torrent", "--"]);
        assert_eq!(parsed.passthrough_start, Some(3));
        assert!(parsed.toolkit_args.is_empty());
        assert_eq!(parsed.toolkit_argv("rivulet"), ["rivulet"]);
    }

    #[test]
    fn repeated_options_keep_the_last_value() {
        let parsed = run(&["rivulet", "-r", "a", "-r", "b"]);
        assert_eq!(parsed.overrides.host.as_deref(), Some("b"));

        let parsed = run(&["rivulet", "-m", "-m"]);
        assert!(parsed.overrides.minimized);

        let parsed = run(&["rivulet", "-g", "/a", "-g", "/b", "-p", "1", "-p", "2"]);
        assert_eq!(parsed.config_dir, Some(PathBuf::from("/b")));
        assert_eq!(parsed.overrides.port, Some(2));
    }

    #[test]
    fn version_short_circuits() {
        assert!(matches!(
            parse(["rivulet", "-v", "--no-such-flag"]),
            Ok(ParseOutcome::ShowVersion)
        ));
        assert!(matches!(
            parse(["rivulet", "--version"]),
            Ok(ParseOutcome::ShowVersion)
        ));
    }

    #[test]
    fn help_is_rendered_not_printed() {
        let Ok(ParseOutcome::ShowHelp(text)) = parse(["rivulet", "-h"]) else {
            panic!("expected ShowHelp");
        };
        assert!(text.contains("--config-dir"));
        assert!(text.contains("--version"));
    }

    #[test]
    fn bad_options_are_invalid() {
        assert!(invalid(&["rivulet", "--bogus"]).contains("--bogus"));
        assert!(invalid(&["rivulet", "-p", "http"]).contains("http"));
        assert!(invalid(&["rivulet", "-p", "70000"]).contains("70000"));
        invalid(&["rivulet", "-r"]);
    }
}
