use clap::error::ErrorKind;
use prefix_migrate::cli::Cli;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = match Cli::try_parse_args(std::env::args_os()) {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            if e.print().is_err() {
                eprintln!("{e}");
            }
            return ExitCode::FAILURE;
        }
    };

    init_tracing(cli.verbose);

    match try_main(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        // Display already includes the cause
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn try_main(cli: &Cli) -> anyhow::Result<()> {
    let config = cli.config()?;
    let report = prefix_migrate::run(&config, &cli.input, &cli.output)?;

    if cli.json {
        let summary = serde_json::to_string_pretty(&report.summary())
            .map_err(|e| anyhow::anyhow!("failed to render run summary: {e}"))?;
        println!("{summary}");
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
