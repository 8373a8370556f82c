use std::{path::PathBuf, time::Duration};

use crate::{
    APP_ID, COUNTRIES_FILE, FEED_BASE_URL, OUTPUT_FILE, PAGE_LIMIT, UNAVAILABLE_DELAY_SECS,
};

/// Everything a harvest run needs to know up front.
/// `Default` is built from the crate constants.
#[derive(Debug, Clone)]
pub struct HarvestConfig {
    pub app_id: String,
    /// Scheme and host of the feed, without a trailing slash.
    pub feed_base_url: String,
    pub countries_path: PathBuf,
    pub output_path: PathBuf,
    pub unavailable_delay: Duration,
    /// 0 means no limit.
    pub page_limit: u32,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            app_id: APP_ID.into(),
            feed_base_url: FEED_BASE_URL.into(),
            countries_path: COUNTRIES_FILE.into(),
            output_path: OUTPUT_FILE.into(),
            unavailable_delay: Duration::from_secs(UNAVAILABLE_DELAY_SECS),
            page_limit: PAGE_LIMIT,
        }
    }
}

impl HarvestConfig {
    /// Builds the customer-review feed URL for one storefront page.
    pub fn feed_url(&self, app_id: &str, locale: &str, page: u32) -> String {
        format!(
            "{}/{locale}/rss/customerreviews/page={page}/id={app_id}/sortBy=mostRecent/json",
            self.feed_base_url.trim_end_matches('/'),
        )
    }

    pub(crate) fn max_page(&self) -> u32 {
        if self.page_limit > 0 {
            self.page_limit
        } else {
            u32::MAX
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_url_follows_template() {
        let config = HarvestConfig::default();
        assert_eq!(
            config.feed_url(&config.app_id, "us", 3),
            "https://itunes.apple.com/us/rss/customerreviews/page=3/id=373311252/sortBy=mostRecent/json"
        );
    }

    #[test]
    fn zero_page_limit_means_unbounded() {
        let mut config = HarvestConfig::default();
        assert_eq!(config.max_page(), u32::MAX);
        config.page_limit = 4;
        assert_eq!(config.max_page(), 4);
    }
}
