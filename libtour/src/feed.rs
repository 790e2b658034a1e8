//! Client for the static GeoJSON location feed.

use crate::{
    Error, Result,
    location::{FeatureCollection, Location},
};
use tracing::debug;

/// Fetches the FeatureCollection document and normalizes every feature. The
/// feed is read once per map load; callers hold the result in memory.
#[derive(Debug, Clone)]
pub struct FeedClient {
    http: reqwest::Client,
}

impl FeedClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Download and parse the raw feed document.
    pub async fn fetch_collection(&self, url: &str) -> Result<FeatureCollection> {
        debug!("fetching location feed from {url}");
        let body = self
            .http
            .get(url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(Error::FeedRequest)?
            .text()
            .await
            .map_err(Error::FeedRequest)?;
        serde_json::from_str(&body).map_err(Error::FeedDecode)
    }

    /// Download the feed and normalize it into canonical locations.
    pub async fn fetch(&self, url: &str) -> Result<Vec<Location>> {
        let collection = self.fetch_collection(url).await?;
        let locations = collection.normalize_all();
        debug!("normalized {} locations from the feed", locations.len());
        Ok(locations)
    }
}
