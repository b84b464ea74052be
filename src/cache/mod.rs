use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

/// A rendered view and when it was produced.
#[derive(Debug, Clone)]
pub struct CachedView {
    pub body: Arc<str>,
    pub rendered_at: DateTime<Utc>,
}

#[derive(Default)]
struct Views {
    entries: HashMap<String, CachedView>,
    /// Bumped by every revalidation
    generation: u64,
}

/// Path-keyed cache of rendered views.
///
/// Mutations call [`ViewCache::revalidate_path`] for every view that
/// depends on the changed entity; the next read renders again.
#[derive(Clone, Default)]
pub struct ViewCache {
    views: Arc<RwLock<Views>>,
}

impl ViewCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, path: &str) -> Option<CachedView> {
        self.views.read().await.entries.get(path).cloned()
    }

    /// Return the cached view for `path`, rendering and storing it on a miss.
    ///
    /// A render that overlaps a revalidation is returned but not stored,
    /// since it may have read rows from before the mutation.
    pub async fn get_or_render<F, Fut, E>(&self, path: &str, render: F) -> Result<CachedView, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, E>>,
    {
        let started_at = {
            let views = self.views.read().await;
            if let Some(view) = views.entries.get(path) {
                debug!("View cache hit: {}", path);
                return Ok(view.clone());
            }
            views.generation
        };

        let view = CachedView {
            body: Arc::from(render().await?),
            rendered_at: Utc::now(),
        };

        let mut views = self.views.write().await;
        if views.generation == started_at {
            views.entries.insert(path.to_string(), view.clone());
            debug!("View cache stored: {}", path);
        } else {
            debug!("View cache skipped store for {}: revalidated during render", path);
        }
        Ok(view)
    }

    /// Evict `path` and every view nested below it.
    pub async fn revalidate_path(&self, path: &str) {
        let prefix = format!("{}/", path.trim_end_matches('/'));
        let mut views = self.views.write().await;
        views.generation += 1;
        let before = views.entries.len();
        views.entries.retain(|key, _| key != path && !key.starts_with(&prefix));
        debug!("Revalidated {} ({} views evicted)", path, before - views.entries.len());
    }

    pub async fn len(&self) -> usize {
        self.views.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.views.read().await.entries.is_empty()
    }
}

/// Views listing an organization's examples
pub fn organization_examples_path(organization_id: uuid::Uuid) -> String {
    format!("/organizations/{}/examples", organization_id)
}

/// Views showing a single example
pub fn example_path(id: uuid::Uuid) -> String {
    format!("/examples/{}", id)
}
