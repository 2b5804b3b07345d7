use anyhow::Result;
use clap::Parser;
use tars::cli::{self, Cli};
use tars::core::{load_settings, settings_path};

/// Install the global subscriber; logs go to stderr so stdout stays clean
fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init()?;

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Settings come first so their log level can configure tracing
    let path = cli.settings.clone().unwrap_or_else(settings_path);
    let (mut settings, outcome) = load_settings(&path);
    if let Some(level) = &cli.log_level {
        settings.log_level = level.clone();
    }
    settings.validate()?;

    init_tracing(&settings.log_level)?;
    outcome.log(&path);

    let report = cli::run(&cli.command, &settings, &path)?;
    print!("{report}");
    Ok(())
}
