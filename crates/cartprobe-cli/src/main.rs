use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "cartprobe")]
#[command(about = "Storefront checkout reconnaissance probe")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Probe a storefront URL and print the report as JSON.
    Probe {
        /// Absolute http(s) URL of the target storefront.
        url: String,
        /// Pretty-print the JSON report.
        #[arg(long)]
        pretty: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = cartprobe_core::load_app_config_from_env()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Probe { url, pretty } => {
            // Probe-level failures are encoded in the report's status; the
            // report itself is the deliverable, so the exit code stays 0.
            let report = cartprobe_probe::run_probe(&config, &url).await;
            let json = if pretty {
                serde_json::to_string_pretty(&report)?
            } else {
                serde_json::to_string(&report)?
            };
            println!("{json}");
        }
    }

    Ok(())
}
