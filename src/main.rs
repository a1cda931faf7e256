use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use leo_gateway::api::ApiServer;
use leo_gateway::keys::Provider;
use leo_gateway::Config;

/// Leo - browser voice assistant gateway
#[derive(Parser)]
#[command(name = "leo", version, about)]
struct Cli {
    /// Port to listen on
    #[arg(long, env = "LEO_PORT")]
    port: Option<u16>,

    /// Directory with the web frontend
    #[arg(long, env = "LEO_STATIC_DIR")]
    static_dir: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Show which provider keys are configured
    Check,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,leo_gateway=info",
        1 => "info,leo_gateway=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.port, cli.static_dir)?;

    if let Some(Command::Check) = cli.command {
        return check_keys(&config);
    }

    tracing::info!(
        port = config.server.port,
        persona = %config.persona.name,
        "starting leo gateway"
    );

    let server = ApiServer::new(&config);
    server.run().await?;

    Ok(())
}

/// Print per-provider key status and exit
fn check_keys(config: &Config) -> anyhow::Result<()> {
    let keys = config.api_keys.initial_keys();
    for provider in Provider::ALL {
        let mark = if keys.contains_key(&provider) {
            "configured"
        } else {
            "missing"
        };
        println!("{:<12} {mark}", provider.slug());
    }
    Ok(())
}
