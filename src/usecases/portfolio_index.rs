//! Portfolio matching: skills -> most relevant case-study links.
//!
//! The catalog is embedded once into an in-memory vector store (lazily on first query,
//! or eagerly via `warm_up`). Queries only read the current snapshot. `reload` builds a
//! fresh snapshot off to the side and swaps it in, so a query never sees a half-built index.

use crate::adapters::vector::MemoryVectorStore;
use crate::domain::{DomainError, PortfolioEntry};
use crate::ports::{CatalogPort, EmbeddingPort};
use std::sync::{Arc, RwLock};
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, info, warn};

pub const DEFAULT_TOP_K: usize = 2;

/// Immutable, fully built index. Replaced wholesale on reload.
#[derive(Default)]
struct IndexSnapshot {
    store: MemoryVectorStore<String>,
}

pub struct PortfolioIndex {
    catalog: Arc<dyn CatalogPort>,
    embedder: Arc<dyn EmbeddingPort>,
    top_k: usize,
    /// One-time build barrier; queries wait on it instead of locking per call.
    ready: OnceCell<()>,
    /// Held across catalog load and swap so builds land in the order they started.
    build_lock: Mutex<()>,
    current: RwLock<Arc<IndexSnapshot>>,
}

impl PortfolioIndex {
    /// Create an index over `catalog`. Nothing is loaded until the first query or `warm_up`.
    pub fn new(
        catalog: Arc<dyn CatalogPort>,
        embedder: Arc<dyn EmbeddingPort>,
        top_k: usize,
    ) -> Self {
        Self {
            catalog,
            embedder,
            top_k,
            ready: OnceCell::new(),
            build_lock: Mutex::new(()),
            current: RwLock::new(Arc::new(IndexSnapshot::default())),
        }
    }

    /// Build an index over a fixed list of entries and embed it immediately.
    pub async fn build(
        entries: Vec<PortfolioEntry>,
        embedder: Arc<dyn EmbeddingPort>,
        top_k: usize,
    ) -> Result<Self, DomainError> {
        let index = Self::new(Arc::new(StaticCatalog::new(entries)), embedder, top_k);
        index.warm_up().await?;
        Ok(index)
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Number of matchable entries in the current snapshot.
    pub fn len(&self) -> usize {
        self.snapshot().store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Build the index now if it has not been built yet. Subsequent calls are no-ops.
    pub async fn warm_up(&self) -> Result<(), DomainError> {
        self.ready
            .get_or_try_init(|| self.rebuild())
            .await?;
        Ok(())
    }

    /// Re-read the catalog and atomically replace the index.
    ///
    /// On failure the previous snapshot stays in place.
    pub async fn reload(&self) -> Result<(), DomainError> {
        self.rebuild().await?;
        // Mark built so a first query after an explicit reload does not build again.
        let _ = self.ready.set(());
        info!(entries = self.len(), "portfolio index reloaded");
        Ok(())
    }

    /// Links for `skills` using the configured top-k.
    pub async fn query_links(&self, skills: &[String]) -> Result<Vec<String>, DomainError> {
        self.query(skills, self.top_k).await
    }

    /// Up to `k` links, closest first, deduplicated.
    ///
    /// An empty skill list or an empty catalog yields an empty result, not an error.
    pub async fn query(&self, skills: &[String], k: usize) -> Result<Vec<String>, DomainError> {
        let skills: Vec<&str> = skills
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect();
        if skills.is_empty() || k == 0 {
            debug!("empty skill query; no links");
            return Ok(Vec::new());
        }

        self.warm_up().await?;
        let snapshot = self.snapshot();
        if snapshot.store.is_empty() {
            return Ok(Vec::new());
        }

        let query_text = skills.join(", ");
        let query_vec = self
            .embedder
            .embed(std::slice::from_ref(&query_text))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::Embedding("no vector returned for query".to_string()))?;

        let mut links: Vec<String> = Vec::with_capacity(k);
        for neighbor in snapshot.store.nearest(&query_vec, k) {
            debug!(link = %neighbor.payload, score = neighbor.score, "portfolio match");
            if !links.contains(neighbor.payload) {
                links.push(neighbor.payload.clone());
            }
        }

        Ok(links)
    }

    fn snapshot(&self) -> Arc<IndexSnapshot> {
        let guard = self.current.read().unwrap_or_else(|p| p.into_inner());
        Arc::clone(&guard)
    }

    /// Load, embed and swap under `build_lock`. A later caller always reads the catalog
    /// after an earlier one has swapped, so an older snapshot never overwrites a newer one.
    async fn rebuild(&self) -> Result<(), DomainError> {
        let _guard = self.build_lock.lock().await;
        let snapshot = self.build_snapshot().await?;
        self.swap(snapshot);
        Ok(())
    }

    fn swap(&self, snapshot: IndexSnapshot) {
        let mut guard = self.current.write().unwrap_or_else(|p| p.into_inner());
        *guard = Arc::new(snapshot);
    }

    async fn build_snapshot(&self) -> Result<IndexSnapshot, DomainError> {
        let entries = self.catalog.load_entries().await?;
        let total = entries.len();

        // Entries without skills can never match; keep them out of the store.
        let matchable: Vec<PortfolioEntry> =
            entries.into_iter().filter(|e| !e.skills.is_empty()).collect();

        if matchable.is_empty() {
            warn!(entries = total, "portfolio catalog is empty; queries will return no links");
            return Ok(IndexSnapshot::default());
        }

        let texts: Vec<String> = matchable.iter().map(PortfolioEntry::skills_text).collect();
        let vectors = self.embedder.embed(&texts).await?;
        if vectors.len() != texts.len() {
            return Err(DomainError::Embedding(format!(
                "expected {} vectors, got {}",
                texts.len(),
                vectors.len()
            )));
        }

        let mut store = MemoryVectorStore::new();
        for (vector, entry) in vectors.into_iter().zip(matchable) {
            store.insert(vector, entry.link);
        }

        info!(
            entries = total,
            indexed = store.len(),
            "portfolio index built"
        );
        Ok(IndexSnapshot { store })
    }
}

/// In-memory catalog over a fixed entry list.
pub struct StaticCatalog {
    entries: Vec<PortfolioEntry>,
}

impl StaticCatalog {
    pub fn new(entries: Vec<PortfolioEntry>) -> Self {
        Self { entries }
    }
}

#[async_trait::async_trait]
impl CatalogPort for StaticCatalog {
    async fn load_entries(&self) -> Result<Vec<PortfolioEntry>, DomainError> {
        Ok(self.entries.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::embedding::HashingEmbedder;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn entry(skills: &[&str], link: &str) -> PortfolioEntry {
        PortfolioEntry::new(skills.iter().map(|s| s.to_string()).collect(), link).unwrap()
    }

    fn skills(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn sample_catalog() -> Vec<PortfolioEntry> {
        vec![
            entry(&["React", "Node.js", "MongoDB"], "https://example.com/web"),
            entry(&["Go", "Kubernetes"], "https://example.com/case1"),
            entry(&["Python", "Machine Learning", "PyTorch"], "https://example.com/ml"),
            entry(&["Go", "Kubernetes", "Docker"], "https://example.com/case1"),
            entry(&[], "https://example.com/no-skills"),
        ]
    }

    /// Counts embed calls and delegates to the hashing embedder.
    struct CountingEmbedder {
        inner: HashingEmbedder,
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl EmbeddingPort for CountingEmbedder {
        async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.embed(texts).await
        }
    }

    /// Catalog whose contents can be changed between loads.
    struct MutableCatalog {
        entries: Mutex<Vec<PortfolioEntry>>,
    }

    #[async_trait::async_trait]
    impl CatalogPort for MutableCatalog {
        async fn load_entries(&self) -> Result<Vec<PortfolioEntry>, DomainError> {
            Ok(self.entries.lock().unwrap().clone())
        }
    }

    #[tokio::test]
    async fn test_query_returns_closest_entry() {
        let index = PortfolioIndex::build(
            vec![entry(&["Go", "Kubernetes"], "https://example.com/case1")],
            Arc::new(HashingEmbedder::default()),
            DEFAULT_TOP_K,
        )
        .await
        .unwrap();

        let links = index.query_links(&skills(&["Go", "Kubernetes", "gRPC"])).await.unwrap();
        assert_eq!(links, vec!["https://example.com/case1".to_string()]);
    }

    #[tokio::test]
    async fn test_query_dedups_links_and_ranks_best_first() {
        let index = PortfolioIndex::build(
            sample_catalog(),
            Arc::new(HashingEmbedder::default()),
            2,
        )
        .await
        .unwrap();

        // The two Go/Kubernetes entries share a link and are the two nearest.
        let links = index.query_links(&skills(&["Go", "Kubernetes"])).await.unwrap();
        assert_eq!(links, vec!["https://example.com/case1".to_string()]);

        let links = index.query(&skills(&["PyTorch", "Python"]), 1).await.unwrap();
        assert_eq!(links, vec!["https://example.com/ml".to_string()]);
    }

    #[tokio::test]
    async fn test_query_is_deterministic() {
        let index = PortfolioIndex::build(
            sample_catalog(),
            Arc::new(HashingEmbedder::default()),
            3,
        )
        .await
        .unwrap();

        let q = skills(&["Node.js", "Docker", "Python"]);
        let first = index.query_links(&q).await.unwrap();
        let second = index.query_links(&q).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_empty_catalog_returns_nothing() {
        let index = PortfolioIndex::build(Vec::new(), Arc::new(HashingEmbedder::default()), 2)
            .await
            .unwrap();

        assert!(index.is_empty());
        assert!(index.query_links(&skills(&["Go"])).await.unwrap().is_empty());
        assert!(index.query(&skills(&["Rust", "SQL"]), 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_entries_without_skills_never_match() {
        let index = PortfolioIndex::build(
            vec![entry(&[], "https://example.com/no-skills")],
            Arc::new(HashingEmbedder::default()),
            2,
        )
        .await
        .unwrap();
        assert!(index.query_links(&skills(&["Go"])).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_query_skips_embedding() {
        let embedder = Arc::new(CountingEmbedder {
            inner: HashingEmbedder::default(),
            calls: AtomicUsize::new(0),
        });
        let index = PortfolioIndex::new(
            Arc::new(StaticCatalog::new(sample_catalog())),
            embedder.clone(),
            2,
        );

        assert!(index.query_links(&[]).await.unwrap().is_empty());
        assert!(index.query_links(&skills(&["  "])).await.unwrap().is_empty());
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_catalog_is_built_once() {
        let embedder = Arc::new(CountingEmbedder {
            inner: HashingEmbedder::default(),
            calls: AtomicUsize::new(0),
        });
        let index = PortfolioIndex::new(
            Arc::new(StaticCatalog::new(sample_catalog())),
            embedder.clone(),
            2,
        );

        index.query_links(&skills(&["Go"])).await.unwrap();
        index.query_links(&skills(&["Python"])).await.unwrap();
        index.warm_up().await.unwrap();

        // One batched build call plus one call per query.
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_reload_swaps_in_new_catalog() {
        let catalog = Arc::new(MutableCatalog {
            entries: Mutex::new(vec![entry(&["Go"], "https://example.com/old")]),
        });
        let index = PortfolioIndex::new(catalog.clone(), Arc::new(HashingEmbedder::default()), 2);

        let q = skills(&["Go"]);
        assert_eq!(index.query_links(&q).await.unwrap(), vec!["https://example.com/old"]);

        *catalog.entries.lock().unwrap() = vec![entry(&["Go"], "https://example.com/new")];
        // Unchanged until an explicit reload.
        assert_eq!(index.query_links(&q).await.unwrap(), vec!["https://example.com/old"]);

        index.reload().await.unwrap();
        assert_eq!(index.query_links(&q).await.unwrap(), vec!["https://example.com/new"]);
    }

    /// First load is slow and returns the old catalog; every later load is instant and new.
    struct SlowFirstLoadCatalog {
        loads: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl CatalogPort for SlowFirstLoadCatalog {
        async fn load_entries(&self) -> Result<Vec<PortfolioEntry>, DomainError> {
            if self.loads.fetch_add(1, Ordering::SeqCst) == 0 {
                tokio::time::sleep(std::time::Duration::from_secs(10)).await;
                return Ok(vec![entry(&["Go"], "https://example.com/old")]);
            }
            Ok(vec![entry(&["Go"], "https://example.com/new")])
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_reload_during_initial_build_keeps_newest() {
        let index = Arc::new(PortfolioIndex::new(
            Arc::new(SlowFirstLoadCatalog {
                loads: AtomicUsize::new(0),
            }),
            Arc::new(HashingEmbedder::default()),
            2,
        ));

        let warm = {
            let index = Arc::clone(&index);
            tokio::spawn(async move { index.warm_up().await })
        };
        // Let the initial build start its slow load before reloading.
        tokio::task::yield_now().await;

        index.reload().await.unwrap();
        warm.await.unwrap().unwrap();

        assert_eq!(
            index.query_links(&skills(&["Go"])).await.unwrap(),
            vec!["https://example.com/new"]
        );
    }

    #[tokio::test]
    async fn test_concurrent_queries_share_one_build() {
        let embedder = Arc::new(CountingEmbedder {
            inner: HashingEmbedder::default(),
            calls: AtomicUsize::new(0),
        });
        let index = Arc::new(PortfolioIndex::new(
            Arc::new(StaticCatalog::new(sample_catalog())),
            embedder.clone(),
            2,
        ));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let index = Arc::clone(&index);
            handles.push(tokio::spawn(async move {
                index.query_links(&skills(&["Go", "Kubernetes"])).await
            }));
        }
        for h in handles {
            assert_eq!(
                h.await.unwrap().unwrap(),
                vec!["https://example.com/case1".to_string()]
            );
        }
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 1 + 8);
    }
}
