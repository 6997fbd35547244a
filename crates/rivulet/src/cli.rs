//! Clap derive structures for the `rivulet` launcher.
//!
//! Shared with `build.rs` for man page generation, so this file depends on
//! nothing but clap.

use std::path::PathBuf;

use clap::{Arg, ArgAction, CommandFactory, Parser};

/// rivulet -- BitTorrent client front-end
#[derive(Debug, Parser)]
#[command(
    name = "rivulet",
    version,
    about = "Open torrents, magnet links and URLs in rivulet",
    long_about = "Open torrents, magnet links and URLs in rivulet.\n\n\
        If rivulet is already running, the targets are handed to that\n\
        instance and this launch exits. Otherwise a new window starts\n\
        with the targets queued.",
    disable_version_flag = true,
    args_override_self = true,
    after_help = "Arguments after `--` are passed to the windowing toolkit unchanged."
)]
pub struct Cli {
    /// Directory holding settings.toml
    #[arg(long, short = 'g', value_name = "PATH")]
    pub config_dir: Option<PathBuf>,

    /// Start minimized to the tray (needs the tray icon enabled)
    #[arg(long, short = 'm')]
    pub minimized: bool,

    /// Port of the remote session
    #[arg(long, short = 'p', value_name = "PORT")]
    pub port: Option<u16>,

    /// Host of the remote session
    #[arg(long = "remote", short = 'r', value_name = "HOST")]
    pub host: Option<String>,

    /// User name for the remote session
    #[arg(long, short = 'u', value_name = "USER")]
    pub username: Option<String>,

    /// Password for the remote session
    #[arg(long, short = 'w', value_name = "PASSWORD")]
    pub password: Option<String>,

    /// Torrent files, magnet links or URLs to add
    #[arg(value_name = "TARGET")]
    pub targets: Vec<String>,

    /// Toolkit arguments
    #[arg(last = true, value_name = "TOOLKIT_ARGS")]
    pub toolkit_args: Vec<String>,
}

/// Full command definition, including `-v/--version`.
pub fn command() -> clap::Command {
    Cli::command().arg(
        Arg::new("version")
            .short('v')
            .long("version")
            .help("Print version")
            .action(ArgAction::Version),
    )
}
