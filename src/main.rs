use clap::Parser;
use std::path::PathBuf;
use sysbridge::{App, Config, Result};

#[derive(Parser, Debug)]
#[command(name = "sysbridge")]
#[command(author, version, about = "Host stats reporting agent", long_about = None)]
struct Args {
    #[arg(short, long, help = "Path to custom config file")]
    config: Option<PathBuf>,

    #[arg(short, long, help = "Report interval in milliseconds")]
    interval: Option<u64>,

    #[arg(long, help = "Path to the router socket")]
    socket: Option<PathBuf>,

    #[arg(long, help = "Path whose filesystem is sampled for disk usage")]
    disk_path: Option<PathBuf>,

    #[arg(short, long, help = "Verbose logging")]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    log::info!("Starting sysbridge v{}", env!("CARGO_PKG_VERSION"));

    let mut config = if let Some(config_path) = args.config {
        log::info!("Loading config from: {}", config_path.display());
        Config::load_from(&config_path)?
    } else {
        Config::load().unwrap_or_default()
    };

    if let Some(interval) = args.interval {
        config.report.interval_ms = interval;
    }
    if let Some(socket) = args.socket {
        config.transport.socket = socket;
    }
    if let Some(disk_path) = args.disk_path {
        config.sampler.disk_path = disk_path;
    }

    log::info!(
        "Reporting to {} every {}ms",
        config.transport.socket.display(),
        config.report.interval_ms
    );

    App::new(config).run()
}
