use chrono::Local;

use crate::country::CountryDb;
use crate::dataset::Dataset;
use crate::parse::{PageContent, ReviewRecord};
use crate::request::FeedClient;
use crate::storefront::{load_storefronts, Storefront};
use crate::{info_time, HarvestConfig, Result};

/// Why a storefront's pagination ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// A fetch came back empty: non-200 status, 503 or an unreadable body.
    Exhausted,
    /// A page held an entry of unexpected shape. That page was dropped.
    Malformed,
    /// The configured page limit was reached.
    PageLimit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageState {
    Fetching(u32),
    Stopped(StopReason),
}

/// Records collected for one storefront and how collection ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontHarvest {
    pub records: Vec<ReviewRecord>,
    pub stop: StopReason,
    /// Pages fetched successfully, including skipped empty ones and a dropped malformed one.
    pub pages_fetched: u32,
}

/// Drives the feed client across storefronts and pages, one request at a time.
#[derive(Debug, Clone)]
pub struct Harvester {
    client: FeedClient,
    countries: CountryDb,
    config: HarvestConfig,
}

impl Harvester {
    pub fn new(config: HarvestConfig, countries: CountryDb) -> Self {
        let client = FeedClient::new(reqwest::Client::new(), config.unavailable_delay);
        Self::with_client(client, config, countries)
    }

    pub fn with_client(client: FeedClient, config: HarvestConfig, countries: CountryDb) -> Self {
        Self {
            client,
            countries,
            config,
        }
    }

    /// Collects every storefront in the given order and concatenates the results.
    /// A storefront that yields nothing never stops the run.
    pub async fn run(&self, app_id: &str, storefronts: &[Storefront]) -> Result<Dataset> {
        let mut dataset = Dataset::new();

        for storefront in storefronts {
            let start_time = Local::now();
            let country = self.countries.resolve(&storefront.name);
            info_time!(
                "Parsing {} ({}), country: {:?}",
                storefront.name,
                storefront.code,
                country
            );

            let harvest = self.collect(app_id, storefront, country).await?;
            info_time!(
                start_time,
                "Finished {}: {} reviews from {} pages, stop: {:?}",
                storefront.name,
                harvest.records.len(),
                harvest.pages_fetched,
                harvest.stop
            );
            dataset.append(harvest.records);
        }

        Ok(dataset)
    }

    /// Fetches pages 1, 2, ... of one storefront until a fetch comes back empty.
    /// Pages without entries are skipped. A malformed page ends pagination and
    /// contributes nothing; records from earlier pages are kept.
    pub async fn collect(
        &self,
        app_id: &str,
        storefront: &Storefront,
        country: Option<&str>,
    ) -> Result<StorefrontHarvest> {
        let max_page = self.config.max_page();
        let mut records = Vec::new();
        let mut pages_fetched = 0;
        let mut state = PageState::Fetching(1);

        let stop = loop {
            let page = match state {
                PageState::Fetching(page) => page,
                PageState::Stopped(reason) => break reason,
            };

            let url = self.config.feed_url(app_id, &storefront.code, page);
            let Some(feed) = self.client.fetch(&url).await? else {
                state = PageState::Stopped(StopReason::Exhausted);
                continue;
            };
            pages_fetched += 1;

            state = match feed.extract(page, country) {
                Ok(PageContent::NoEntries) => {
                    info_time!("{} page {page}: no entries, skipping", storefront.code);
                    next_page(page, max_page)
                }
                Ok(PageContent::Records(batch)) => {
                    info_time!("{} page {page}: {} reviews", storefront.code, batch.len());
                    records.extend(batch);
                    next_page(page, max_page)
                }
                Err(e) => {
                    info_time!("{} page {page}: dropping page, {e}", storefront.code);
                    PageState::Stopped(StopReason::Malformed)
                }
            };
        };

        Ok(StorefrontHarvest {
            records,
            stop,
            pages_fetched,
        })
    }
}

#[inline]
fn next_page(page: u32, max_page: u32) -> PageState {
    if page >= max_page {
        PageState::Stopped(StopReason::PageLimit)
    } else {
        PageState::Fetching(page + 1)
    }
}

/// Loads the storefront list, harvests every storefront and writes the table.
pub async fn process_site(config: HarvestConfig) -> Result<Dataset> {
    let start_time = Local::now();
    info_time!("Started harvesting app {}", config.app_id);

    let storefronts = load_storefronts(&config.countries_path)?;
    info_time!(
        "Loaded {} storefronts from {}",
        storefronts.len(),
        config.countries_path.display()
    );

    let harvester = Harvester::new(config.clone(), CountryDb::iso3166());
    let dataset = harvester.run(&config.app_id, &storefronts).await?;
    info_time!(
        start_time,
        "Finished PROCESSING ALL storefronts: {} reviews.",
        dataset.len()
    );

    let local_now = Local::now();
    dataset.write_csv(&config.output_path)?;
    info_time!(
        local_now,
        "Wrote the results to file: {}",
        config.output_path.display()
    );

    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_page_advances_until_limit() {
        assert_eq!(next_page(1, u32::MAX), PageState::Fetching(2));
        assert_eq!(next_page(2, 3), PageState::Fetching(3));
        assert_eq!(next_page(3, 3), PageState::Stopped(StopReason::PageLimit));
        assert_eq!(
            next_page(u32::MAX, u32::MAX),
            PageState::Stopped(StopReason::PageLimit)
        );
    }
}
