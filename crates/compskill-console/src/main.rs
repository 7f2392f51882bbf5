mod config;
mod scene;
mod service;

use anyhow::Result;
use config::Config;
use service::ConsoleService;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;

    let console = ConsoleService::new(config);
    console.run().await
}
