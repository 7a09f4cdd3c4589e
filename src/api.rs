use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::LoadError;
use crate::window::TimeWindow;

/// One clip as returned by the `clips` response shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipRecord {
    pub thumbnail_url: String,
    pub embed_url: String,
    pub timestamp: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClipsResponse {
    pub clips: Vec<ClipRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClipUrlsResponse {
    pub clip_urls: Vec<String>,
}

/// Thin client for the clip endpoint. One GET per call, no retries.
#[derive(Debug, Clone)]
pub struct ClipApi {
    http: reqwest::Client,
    endpoint: Url,
}

impl ClipApi {
    pub fn new(http: reqwest::Client, endpoint: &str) -> Result<Self, LoadError> {
        let endpoint = Url::parse(endpoint).map_err(|source| LoadError::Url { url: endpoint.to_string(), source })?;
        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &Url { &self.endpoint }

    pub fn request_url(&self, window: &TimeWindow) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut q = url.query_pairs_mut();
            for (name, value) in window.query_pairs() {
                q.append_pair(name, &value);
            }
        }
        url
    }

    pub async fn fetch_clips(&self, window: &TimeWindow) -> Result<Vec<ClipRecord>, LoadError> {
        Ok(self.get::<ClipsResponse>(window).await?.clips)
    }

    pub async fn fetch_clip_urls(&self, window: &TimeWindow) -> Result<Vec<String>, LoadError> {
        Ok(self.get::<ClipUrlsResponse>(window).await?.clip_urls)
    }

    async fn get<T: DeserializeOwned>(&self, window: &TimeWindow) -> Result<T, LoadError> {
        let url = self.request_url(window);
        tracing::debug!(%url, "requesting clip list");
        let resp = self.http.get(url).send().await?.error_for_status()?;
        Ok(resp.json::<T>().await?)
    }
}
