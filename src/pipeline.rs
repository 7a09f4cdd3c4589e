use std::sync::{Mutex, PoisonError};

use futures::future::join_all;
use serde::Serialize;

use crate::api::ClipRecord;
use crate::config::FailurePolicy;
use crate::embed::player_src;
use crate::error::LoadError;
use crate::gallery::Gallery;
use crate::sizing::{Dimensions, ThumbnailSizer};

/// A measured thumbnail waiting to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct ThumbnailEntry {
    pub src: String,
    pub embed_url: String,
    pub size: Dimensions,
    pub timestamp: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RenderSummary {
    pub requested: usize,
    pub rendered: usize,
    pub skipped: usize,
}

/// Measures every thumbnail concurrently and waits for all of them to settle.
/// Entries come back newest first; ties keep response order.
pub async fn resolve_thumbnails<P>(clips: Vec<ClipRecord>, sizer: &P, policy: FailurePolicy) -> Result<(Vec<ThumbnailEntry>, usize), LoadError>
where
    P: ThumbnailSizer + ?Sized,
{
    let settled = join_all(clips.iter().map(|c| sizer.size_of(&c.thumbnail_url))).await;

    let mut entries = Vec::with_capacity(clips.len());
    let mut skipped = 0;
    for (clip, res) in clips.into_iter().zip(settled) {
        match res {
            Ok(size) => entries.push(ThumbnailEntry { src: clip.thumbnail_url, embed_url: clip.embed_url, size, timestamp: clip.timestamp }),
            Err(source) => match policy {
                FailurePolicy::SkipFailed => {
                    tracing::warn!(url = %clip.thumbnail_url, error = %source, "skipping thumbnail that failed to load");
                    skipped += 1;
                }
                FailurePolicy::AbortAll => return Err(LoadError::Thumbnail { url: clip.thumbnail_url, source }),
            },
        }
    }
    entries.sort_by(|a, b| b.timestamp.total_cmp(&a.timestamp));
    Ok((entries, skipped))
}

/// Shape (a): measure, sort, then append everything in one go.
pub async fn resolve_and_render<P>(gallery: &Mutex<Gallery>, clips: Vec<ClipRecord>, sizer: &P, policy: FailurePolicy) -> Result<RenderSummary, LoadError>
where
    P: ThumbnailSizer + ?Sized,
{
    let requested = clips.len();
    let (entries, skipped) = resolve_thumbnails(clips, sizer, policy).await?;
    let rendered = entries.len();

    let mut g = gallery.lock().unwrap_or_else(PoisonError::into_inner);
    for e in entries {
        g.append_thumbnail(e.src, e.embed_url, e.size);
    }
    tracing::info!(rendered, skipped, "thumbnail gallery rendered");
    Ok(RenderSummary { requested, rendered, skipped })
}

/// Shape (b): one always-visible player per URL, in response order.
pub fn render_direct(gallery: &Mutex<Gallery>, clip_urls: Vec<String>) -> RenderSummary {
    let requested = clip_urls.len();
    let mut g = gallery.lock().unwrap_or_else(PoisonError::into_inner);
    let parent = g.parent_domain().to_string();
    for url in clip_urls {
        g.append_player(player_src(&url, &parent, false), None);
    }
    tracing::info!(rendered = requested, "clip players rendered");
    RenderSummary { requested, rendered: requested, skipped: 0 }
}

#[cfg(test)]
pub(crate) mod fakes {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tokio::sync::oneshot;

    use crate::error::SizeError;
    use crate::sizing::{Dimensions, ThumbnailSizer};

    pub(crate) type Outcome = Result<Dimensions, SizeError>;

    /// Each URL settles only when the test sends its outcome.
    pub(crate) struct ControlledSizer {
        pending: Mutex<HashMap<String, oneshot::Receiver<Outcome>>>,
    }

    impl ControlledSizer {
        pub(crate) fn new(urls: &[&str]) -> (Self, HashMap<String, oneshot::Sender<Outcome>>) {
            let mut pending = HashMap::new();
            let mut senders = HashMap::new();
            for u in urls {
                let (tx, rx) = oneshot::channel();
                pending.insert(u.to_string(), rx);
                senders.insert(u.to_string(), tx);
            }
            (Self { pending: Mutex::new(pending) }, senders)
        }
    }

    #[async_trait]
    impl ThumbnailSizer for ControlledSizer {
        async fn size_of(&self, url: &str) -> Result<Dimensions, SizeError> {
            let rx = self.pending.lock().unwrap().remove(url);
            match rx {
                Some(rx) => rx.await.unwrap_or(Err(SizeError::Empty)),
                None => Err(SizeError::Empty),
            }
        }
    }

    /// Settles immediately; URLs missing from the map fail.
    pub(crate) struct StaticSizer(pub(crate) HashMap<String, Dimensions>);

    #[async_trait]
    impl ThumbnailSizer for StaticSizer {
        async fn size_of(&self, url: &str) -> Result<Dimensions, SizeError> {
            self.0.get(url).copied().ok_or(SizeError::Empty)
        }
    }
}
