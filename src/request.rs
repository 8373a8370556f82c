use std::time::Duration;

use reqwest::{Client, StatusCode};

use crate::{info_time, parse::FeedPage, Result};

/// How a single feed response is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchClass {
    Success,
    /// 503: pause before handing back, but do not re-issue the request.
    Unavailable,
    Failed,
}

impl FetchClass {
    pub fn of(status: StatusCode) -> Self {
        match status {
            StatusCode::OK => FetchClass::Success,
            StatusCode::SERVICE_UNAVAILABLE => FetchClass::Unavailable,
            _ => FetchClass::Failed,
        }
    }
}

/// Issues one blocking-in-sequence GET per call against the review feed.
#[derive(Debug, Clone)]
pub struct FeedClient {
    // Client uses Arc so we can clone cheaply
    client: Client,
    unavailable_delay: Duration,
}

impl FeedClient {
    pub fn new(client: Client, unavailable_delay: Duration) -> Self {
        Self {
            client,
            unavailable_delay,
        }
    }

    /// Requests a feed page and returns `Ok(Some(page))` when the feed answered 200 with JSON.
    /// Every other answer, including an unreadable body, comes back as `Ok(None)`.
    /// Only transport failures (no HTTP answer at all) are errors.
    pub async fn fetch(&self, url: &str) -> Result<Option<FeedPage>> {
        let res = self.client.get(url).send().await?;
        let status = res.status();

        match FetchClass::of(status) {
            FetchClass::Success => {}
            FetchClass::Unavailable => {
                info_time!(
                    "Feed unavailable ({status}), pausing {:?}: {url}",
                    self.unavailable_delay
                );
                tokio::time::sleep(self.unavailable_delay).await;
                return Ok(None);
            }
            FetchClass::Failed => {
                info_time!("Feed answered {status}: {url}");
                return Ok(None);
            }
        }

        let body = match res.text().await {
            Ok(body) => body,
            Err(e) => {
                info_time!("Couldn't read feed body ({e}): {url}");
                return Ok(None);
            }
        };
        match serde_json::from_str(&body) {
            Ok(doc) => Ok(Some(FeedPage::new(doc))),
            Err(e) => {
                info_time!("Feed body is not JSON ({e}): {url}");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_200_is_success() {
        assert_eq!(FetchClass::of(StatusCode::OK), FetchClass::Success);
        assert_eq!(FetchClass::of(StatusCode::NO_CONTENT), FetchClass::Failed);
        assert_eq!(FetchClass::of(StatusCode::NOT_FOUND), FetchClass::Failed);
        assert_eq!(FetchClass::of(StatusCode::BAD_REQUEST), FetchClass::Failed);
    }

    #[test]
    fn only_503_is_unavailable() {
        assert_eq!(
            FetchClass::of(StatusCode::SERVICE_UNAVAILABLE),
            FetchClass::Unavailable
        );
        assert_eq!(
            FetchClass::of(StatusCode::INTERNAL_SERVER_ERROR),
            FetchClass::Failed
        );
        assert_eq!(
            FetchClass::of(StatusCode::TOO_MANY_REQUESTS),
            FetchClass::Failed
        );
    }
}
