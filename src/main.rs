use std::fs::File;
use std::path::PathBuf;

use clap::Parser;
use lnboard::core::config::{CliOverrides, LnboardConfig, load_config, resolve};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

#[derive(Parser)]
#[command(name = "lnboard", about = "Terminal dashboard for an lnd node, driven by lncli")]
struct Args {
    /// Config file (default: ~/.lnboard/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log file
    #[arg(long, default_value = "lnboard.log")]
    log_file: PathBuf,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "debug")]
    log_level: LevelFilter,

    /// Seconds between refreshes of the active view
    #[arg(short, long)]
    refresh: Option<u64>,

    /// Path to the lncli binary
    #[arg(long)]
    lncli: Option<String>,

    /// lnd RPC server passed to lncli as --rpcserver
    #[arg(long)]
    rpcserver: Option<String>,

    /// Hide the node and wallet summary panels
    #[arg(long)]
    no_header: bool,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create(&args.log_file) {
        let _ = WriteLogger::init(args.log_level, log_config, log_file);
    }

    log::info!("lnboard starting up");

    let file_config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Ignoring config file: {}", e);
            LnboardConfig::default()
        }
    };
    let overrides = CliOverrides {
        refresh_secs: args.refresh,
        lncli: args.lncli,
        rpcserver: args.rpcserver,
        no_header: args.no_header,
    };
    let config = resolve(&file_config, &overrides);

    lnboard::tui::run(config)
}
