mod args;
mod cli;
mod coordinator;
mod error;
mod shell;

use tracing_subscriber::EnvFilter;

use rivulet_config::APP_NAME;
use rivulet_ipc::{Endpoint, InstanceLocator};

use crate::args::ParseOutcome;
use crate::coordinator::Coordinator;
use crate::error::{CliError, exit_code};
use crate::shell::ReportingShell;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_tracing();

    let argv: Vec<String> = std::env::args_os()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();

    match run(argv).await {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            let code = err.exit_code();
            eprintln!("{:?}", miette::Report::new(err));
            std::process::exit(code);
        }
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(argv: Vec<String>) -> Result<i32, CliError> {
    let program = argv.first().cloned().unwrap_or_else(|| APP_NAME.to_owned());

    let parsed = match args::parse(argv)? {
        ParseOutcome::Run(parsed) => parsed,
        ParseOutcome::ShowVersion => {
            println!("{APP_NAME} {}", env!("CARGO_PKG_VERSION"));
            return Ok(exit_code::SUCCESS);
        }
        ParseOutcome::ShowHelp(text) => {
            println!("{}", text.trim_end());
            return Ok(exit_code::SUCCESS);
        }
    };

    let locator = InstanceLocator::new(Endpoint::resolve(APP_NAME));
    let shell = ReportingShell::new(std::io::stdout().lock());
    let outcome = Coordinator::new(locator, shell, program).run(parsed).await?;

    tracing::debug!(?outcome, "launch finished");
    Ok(exit_code::SUCCESS)
}
