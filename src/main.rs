use std::process;

use clap::Parser;
use tracing::info;

use rusty_accounts::{init_telemetry, load_accounts, serve, Config};

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {:#}", err);
        process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = Config::parse();
    init_telemetry();

    let handler = config.handler();
    if let Some(path) = &config.seed {
        load_accounts(&handler, path)?;
    }

    info!(
        page_size = config.page_size.get(),
        first_account_number = config.first_account_number,
        accounts = handler.store().len(),
        "starting account service"
    );
    serve(config.bind, handler).await?;
    Ok(())
}
