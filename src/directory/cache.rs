use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::dto::RoommateCard;

/// Listing that only shows users who finished signup.
pub const FIND_ROOMMATES_PATH: &str = "/find-roommates";

/// Signal that a rendered view depending on user data is stale.
#[async_trait]
pub trait ViewInvalidator: Send + Sync {
    async fn revalidate(&self, path: &str);
}

#[derive(Default)]
struct Page {
    generation: u64,
    cards: Option<Vec<RoommateCard>>,
}

/// Rendered listings keyed by view path.
///
/// Every `revalidate` bumps the path's generation; a rebuild started before
/// that bump is not stored.
#[derive(Default)]
pub struct PageCache {
    pages: RwLock<HashMap<String, Page>>,
}

impl PageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, path: &str) -> Option<Vec<RoommateCard>> {
        self.pages
            .read()
            .await
            .get(path)
            .and_then(|p| p.cards.clone())
    }

    /// Generation to hand back to `put_if_current` after a rebuild.
    pub async fn generation(&self, path: &str) -> u64 {
        self.pages
            .read()
            .await
            .get(path)
            .map_or(0, |p| p.generation)
    }

    /// Stores `cards` unless the path was revalidated since `generation`.
    pub async fn put_if_current(&self, path: &str, generation: u64, cards: Vec<RoommateCard>) -> bool {
        let mut pages = self.pages.write().await;
        let page = pages.entry(path.to_string()).or_default();
        if page.generation != generation {
            return false;
        }
        page.cards = Some(cards);
        true
    }
}

#[async_trait]
impl ViewInvalidator for PageCache {
    async fn revalidate(&self, path: &str) {
        let mut pages = self.pages.write().await;
        let page = pages.entry(path.to_string()).or_default();
        page.generation += 1;
        let dropped = page.cards.take().is_some();
        debug!(path, dropped, generation = page.generation, "view revalidated");
    }
}
