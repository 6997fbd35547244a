//! Launcher error types with miette diagnostics.
//!
//! Only a bad command line or a failed hand-off to the window ever reaches
//! the user; everything on the delegation path degrades to a local start.

use miette::Diagnostic;
use thiserror::Error;

use rivulet_config::ConfigError;

use crate::args::ParseError;

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const INVALID_OPTION: i32 = 1;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Usage ────────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(rivulet::invalid_option), help("{usage}\nFor more information, try '--help'."))]
    InvalidOption { message: String, usage: String },

    // ── Startup ──────────────────────────────────────────────────────
    #[error("Could not start the window")]
    #[diagnostic(code(rivulet::bootstrap))]
    Bootstrap {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Could not save preferences")]
    #[diagnostic(
        code(rivulet::preferences),
        help("Check that the config directory is writable, or pick another with --config-dir.")
    )]
    Preferences(#[source] ConfigError),
}

impl CliError {
    pub fn bootstrap(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Bootstrap {
            source: source.into(),
        }
    }

    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidOption { .. } => exit_code::INVALID_OPTION,
            Self::Bootstrap { .. } | Self::Preferences(_) => exit_code::GENERAL,
        }
    }
}

impl From<ParseError> for CliError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::InvalidOption { message, usage } => Self::InvalidOption { message, usage },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::Preferences(err)
    }
}
