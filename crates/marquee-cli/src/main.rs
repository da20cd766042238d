use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use marquee_core::AppConfig;

mod commands;

use commands::{SimulateArgs, WatchArgs};

#[derive(Parser)]
#[command(name = "marquee")]
#[command(author, version, about = "Scrolling-text marquee engine and terminal demo")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the TUI demo
    Run,
    /// Drive one marquee through virtual time and print every change
    Simulate(SimulateArgs),
    /// Run the async marquee service in real time and print hints as they change
    Watch(WatchArgs),
    /// Print the effective configuration
    Config {
        /// Write the default config file if none exists
        #[arg(long)]
        init: bool,
    },
}

fn env_filter(config: &AppConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.general.log_level))
}

/// Log to stderr for the line-oriented commands
fn init_stderr_logging(config: &AppConfig) {
    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

/// The TUI owns the terminal, so its logs go to a file
fn init_file_logging(config: &AppConfig) -> Result<WorkerGuard> {
    let log_dir = config.log_dir();
    std::fs::create_dir_all(&log_dir)?;
    let appender = tracing_appender::rolling::never(&log_dir, "marquee.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer),
        )
        .init();

    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = AppConfig::load()?;

    match cli.command {
        Some(Commands::Run) | None => {
            let _guard = init_file_logging(&config)?;
            commands::run::run(&config)
        }
        Some(Commands::Simulate(args)) => {
            init_stderr_logging(&config);
            commands::simulate::run(&config, &args)
        }
        Some(Commands::Watch(args)) => {
            init_stderr_logging(&config);
            commands::watch::run(&config, &args).await
        }
        Some(Commands::Config { init }) => {
            init_stderr_logging(&config);
            commands::config::run(&config, init)
        }
    }
}
