//! Carafe designer command-line entry point

mod command;

use std::process::ExitCode;

use command::Command;

fn main() -> ExitCode {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "carafe_cli=info,carafe_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    let result = Command::parse(&args).and_then(|command| {
        tracing::debug!("Running {:?}", command);
        command.run(&mut std::io::stdout().lock())
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            if matches!(e, command::CliError::Usage(_)) {
                eprintln!("{}", command::USAGE);
            }
            ExitCode::FAILURE
        }
    }
}
