use anyhow::Result;
use listing_harvester::{Harvester, PagingSize, ScraperOptions};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting listing harvester");

    let options = ScraperOptions::new(PagingSize::Fifty, 2008, 2021);
    let mut harvester = Harvester::new(options).await?;

    harvester.run().await?;

    Ok(())
}
