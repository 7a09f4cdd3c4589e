pub mod api;
pub mod config;
pub mod embed;
pub mod error;
pub mod gallery;
pub mod logging;
pub mod pipeline;
pub mod sizing;
pub mod window;

// --- Library API for embedding ---

/// Convenience re-exports for embedders.
pub mod prelude {
    pub use crate::api::ClipRecord;
    pub use crate::config::{FailurePolicy, LoaderConfig, ResponseShape};
    pub use crate::error::{LoadError, SizeError, SubstitutionError};
    pub use crate::gallery::{Gallery, Node, NodeId, SharedGallery};
    pub use crate::sizing::{Dimensions, ThumbnailSizer};
    pub use crate::window::TimeWindow;
    pub use crate::{ClipLoader, LoadReport};
}

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::api::ClipApi;
use crate::config::{LoaderConfig, ResponseShape};
use crate::error::LoadError;
use crate::gallery::{Gallery, SharedGallery};
use crate::pipeline::{render_direct, resolve_and_render, RenderSummary};
use crate::sizing::{HttpSizer, ThumbnailSizer};
use crate::window::TimeWindow;

/// Outcome of one load. Failures are already logged when this is returned.
#[derive(Debug, Clone, Serialize)]
pub struct LoadReport {
    pub success: bool,
    /// Window bounds; `None` only when the window itself could not be built.
    pub start: Option<String>,
    pub end: Option<String>,
    pub requested: usize,
    pub rendered: usize,
    pub skipped: usize,
    pub error: Option<String>,
}

impl LoadReport {
    fn from_summary(window: &TimeWindow, s: RenderSummary) -> Self {
        Self {
            success: true,
            start: Some(window.start_param()),
            end: Some(window.end_param()),
            requested: s.requested,
            rendered: s.rendered,
            skipped: s.skipped,
            error: None,
        }
    }

    fn failed(window: Option<&TimeWindow>, requested: usize, err: &LoadError) -> Self {
        Self {
            success: false,
            start: window.map(TimeWindow::start_param),
            end: window.map(TimeWindow::end_param),
            requested,
            rendered: 0,
            skipped: 0,
            error: Some(err.to_string()),
        }
    }
}

/// Fetches the trailing window of clips and renders them into a gallery.
///
/// No retries, no caching, no cancellation. Loading twice into the same
/// gallery appends twice.
pub struct ClipLoader {
    config: LoaderConfig,
    api: ClipApi,
    sizer: Arc<dyn ThumbnailSizer>,
}

impl ClipLoader {
    pub fn new(config: LoaderConfig) -> Result<Self, LoadError> {
        let http = build_http_client(&config)?;
        let sizer = Arc::new(HttpSizer::new(http.clone()));
        Self::assemble(config, http, sizer)
    }

    /// Same as [`ClipLoader::new`] but measures thumbnails with `sizer`.
    pub fn with_sizer(config: LoaderConfig, sizer: Arc<dyn ThumbnailSizer>) -> Result<Self, LoadError> {
        let http = build_http_client(&config)?;
        Self::assemble(config, http, sizer)
    }

    fn assemble(config: LoaderConfig, http: reqwest::Client, sizer: Arc<dyn ThumbnailSizer>) -> Result<Self, LoadError> {
        let api = ClipApi::new(http, &config.endpoint)?;
        Ok(Self { config, api, sizer })
    }

    pub fn config(&self) -> &LoaderConfig { &self.config }

    /// Empty container bound to the configured parent domain.
    pub fn new_gallery(&self) -> SharedGallery { Arc::new(Mutex::new(Gallery::new(self.config.parent_domain.clone()))) }

    pub fn window_at(&self, now: DateTime<Utc>) -> Result<TimeWindow, LoadError> {
        let hours = self.config.lookback_hours;
        TimeWindow::trailing_hours(now, hours).ok_or(LoadError::Window { hours })
    }

    pub async fn fetch_videos(&self, gallery: &Mutex<Gallery>) -> LoadReport { self.fetch_videos_at(gallery, Utc::now()).await }

    /// Never fails: errors are logged and reported, and the gallery is left
    /// as it was.
    pub async fn fetch_videos_at(&self, gallery: &Mutex<Gallery>, now: DateTime<Utc>) -> LoadReport {
        let window = match self.window_at(now) {
            Ok(w) => w,
            Err(e) => {
                tracing::error!(error = %e, "failed to load clips");
                return LoadReport::failed(None, 0, &e);
            }
        };
        let mut requested = 0;
        match self.load(gallery, &window, &mut requested).await {
            Ok(summary) => LoadReport::from_summary(&window, summary),
            Err(e) => {
                tracing::error!(error = %e, requested, "failed to load clips");
                LoadReport::failed(Some(&window), requested, &e)
            }
        }
    }

    pub async fn try_fetch_videos_at(&self, gallery: &Mutex<Gallery>, now: DateTime<Utc>) -> Result<LoadReport, LoadError> {
        let window = self.window_at(now)?;
        let summary = self.load(gallery, &window, &mut 0).await?;
        Ok(LoadReport::from_summary(&window, summary))
    }

    // `requested` is set as soon as the list arrives so failures can report it.
    async fn load(&self, gallery: &Mutex<Gallery>, window: &TimeWindow, requested: &mut usize) -> Result<RenderSummary, LoadError> {
        match self.config.shape {
            ResponseShape::Clips => {
                let clips = self.api.fetch_clips(window).await?;
                *requested = clips.len();
                resolve_and_render(gallery, clips, self.sizer.as_ref(), self.config.failure_policy).await
            }
            ResponseShape::ClipUrls => {
                let urls = self.api.fetch_clip_urls(window).await?;
                *requested = urls.len();
                Ok(render_direct(gallery, urls))
            }
        }
    }
}

fn build_http_client(config: &LoaderConfig) -> Result<reqwest::Client, LoadError> {
    let mut builder = reqwest::Client::builder();
    if let Some(t) = config.request_timeout() { builder = builder.timeout(t); }
    Ok(builder.build()?)
}
