//! In-memory TTL cache in front of any `JobSource`.
//!
//! Keys are normalized `SearchRequest`s, so `" rust "` and `"rust"` share an
//! entry. Only successful searches are stored; errors always reach the caller.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::debug;

use crate::jobs::client::{JobSource, JobSourceError};
use crate::jobs::models::{JobPosting, SearchRequest};

struct CacheEntry {
    stored_at: Instant,
    postings: Vec<JobPosting>,
}

pub struct CachedJobSource {
    inner: Arc<dyn JobSource>,
    ttl: Duration,
    entries: Mutex<HashMap<SearchRequest, CacheEntry>>,
}

impl CachedJobSource {
    pub fn new(inner: Arc<dyn JobSource>, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.lock().len()
    }

    fn lookup(&self, key: &SearchRequest) -> Option<Vec<JobPosting>> {
        let mut entries = self.entries.lock();
        let now = Instant::now();
        entries.retain(|_, entry| now.duration_since(entry.stored_at) < self.ttl);
        entries.get(key).map(|entry| entry.postings.clone())
    }
}

#[async_trait]
impl JobSource for CachedJobSource {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<JobPosting>, JobSourceError> {
        let key = request.normalized();

        if let Some(postings) = self.lookup(&key) {
            debug!("Job search cache hit: {}", key.search_query());
            return Ok(postings);
        }

        // Lock is not held across the await; concurrent misses may both fetch.
        let postings = self.inner.search(&key).await?;
        self.entries.lock().insert(
            key,
            CacheEntry {
                stored_at: Instant::now(),
                postings: postings.clone(),
            },
        );
        Ok(postings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl JobSource for CountingSource {
        async fn search(
            &self,
            request: &SearchRequest,
        ) -> Result<Vec<JobPosting>, JobSourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(JobSourceError::RateLimited);
            }
            Ok(vec![JobPosting {
                title: request.query.clone(),
                company: "Acme".to_string(),
                location: "Remote".to_string(),
                description: "Rust services".to_string(),
                salary_range: None,
                skills_required: BTreeSet::new(),
                source_url: String::new(),
                employment_type: None,
                is_remote: true,
                posted_at: None,
            }])
        }
    }

    fn counting(fail: bool) -> Arc<CountingSource> {
        Arc::new(CountingSource {
            calls: AtomicUsize::new(0),
            fail,
        })
    }

    #[tokio::test]
    async fn test_repeat_search_is_served_from_cache() {
        let inner = counting(false);
        let cache = CachedJobSource::new(inner.clone(), Duration::from_secs(60));

        let first = cache.search(&SearchRequest::new("rust", "Berlin")).await.unwrap();
        let second = cache.search(&SearchRequest::new("  rust ", "Berlin ")).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_different_filters_are_different_keys() {
        let inner = counting(false);
        let cache = CachedJobSource::new(inner.clone(), Duration::from_secs(60));

        cache.search(&SearchRequest::new("rust", "")).await.unwrap();
        let remote = SearchRequest {
            remote_only: true,
            ..SearchRequest::new("rust", "")
        };
        cache.search(&remote).await.unwrap();

        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let inner = counting(true);
        let cache = CachedJobSource::new(inner.clone(), Duration::from_secs(60));

        assert!(cache.search(&SearchRequest::new("rust", "")).await.is_err());
        assert!(cache.search(&SearchRequest::new("rust", "")).await.is_err());
        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.len(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entries_expire_after_ttl() {
        let inner = counting(false);
        let cache = CachedJobSource::new(inner.clone(), Duration::from_secs(10));

        cache.search(&SearchRequest::new("rust", "")).await.unwrap();
        tokio::time::advance(Duration::from_secs(11)).await;
        cache.search(&SearchRequest::new("rust", "")).await.unwrap();

        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
    }
}
