//! Main application entry point.

use clap::Parser;
use infiniboard_app::Cli;

#[tokio::main]
async fn main() {
    env_logger::init();
    log::info!("Starting Infiniboard");

    let cli = Cli::parse();
    if let Err(e) = infiniboard_app::run(cli).await {
        log::error!("{e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
