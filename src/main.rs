use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use trivia_client::client::{self, ClientConfig};
use trivia_client::protocol::DEFAULT_PORT;
use trivia_client::round::RoundConfig;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Server host to connect to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Server port
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Join right away with this name instead of asking for one
    #[arg(short, long)]
    name: Option<String>,

    /// Delay between the verdict and the round statistics, in milliseconds
    #[arg(long, default_value_t = 1500)]
    stats_delay_ms: u64,

    /// Where to write logs; the terminal itself is taken by the UI
    #[arg(long, default_value = "trivia-client.log")]
    log_file: PathBuf,
}

fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    if let Err(e) = init_logging(&args.log_file) {
        eprintln!("{e:#}");
    }

    let config = ClientConfig {
        host: args.host,
        port: args.port,
        username: args.name,
        round: RoundConfig {
            stats_delay: Duration::from_millis(args.stats_delay_ms),
            ..RoundConfig::default()
        },
    };

    if let Err(e) = client::run(config).await {
        log::error!("Client stopped: {e}");
        eprintln!("Error running client: {}", e);
        std::process::exit(1);
    }
}
