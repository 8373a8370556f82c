use chrono::Local;
use store_reviews::{info_time, process::process_site, HarvestConfig, Result};

#[tokio::main]
async fn main() -> Result<()> {
    let start_time = Local::now();
    process_site(HarvestConfig::default()).await?;
    info_time!(start_time, "Full program time:");

    Ok(())
}
