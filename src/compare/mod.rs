//! Side-by-side comparison pipeline
//!
//! A comparison first checks the fragment cache for each language. Only when
//! either lookup misses is the task page fetched and scanned; both resulting
//! raw fragments, including empty ones, are then written back. Fragments are
//! rendered only on the way out, for fresh scans and cache hits alike. Cache
//! failures are logged and treated as misses.

mod overlap;

pub use overlap::{common_tasks, find_overlap, task_index};

use crate::error::{Error, Result};
use crate::extract::{
    fragment_text, parse_document, render_fragment, scan, section_nodes, side_by_side, ScanReport, TargetPair,
    TaskDescriptor,
};
use crate::source::DocumentSource;
use crate::storage::FragmentCache;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Code for one task in two languages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragments {
    /// Task page name
    pub task: String,
    /// Normalized identifiers of the two languages
    pub languages: TargetPair,
    /// Wrapped code for the first language
    pub first: String,
    /// Wrapped code for the second language
    pub second: String,
    /// Whether both fragments came from the cache
    pub cached: bool,
}

impl Fragments {
    /// Two-column markup for the pair
    pub fn to_html(&self) -> String {
        side_by_side(&self.first, &self.second)
    }

    /// Decoded code text for the first and second language
    pub fn to_text(&self) -> (String, String) {
        (fragment_text(&self.first), fragment_text(&self.second))
    }
}

/// Runs comparisons against a page source through a fragment cache
pub struct Comparer {
    source: Arc<dyn DocumentSource>,
    cache: Arc<dyn FragmentCache>,
    ttl: Duration,
}

impl Comparer {
    /// Create a comparer over a shared source and cache
    pub fn new(source: Arc<dyn DocumentSource>, cache: Arc<dyn FragmentCache>, ttl: Duration) -> Self {
        Self { source, cache, ttl }
    }

    /// Extract the code for `task` in both languages
    pub async fn extract(&self, task: &str, lang1: &str, lang2: &str) -> Result<Fragments> {
        let task = task.trim();
        let targets = TargetPair::new(lang1, lang2);
        if targets.is_degenerate() {
            return Err(Error::SameLanguage(targets.first));
        }

        let hits = (
            self.cached(task, &targets.first),
            self.cached(task, &targets.second),
        );

        let (first, second, cached) = match hits {
            (Some(first), Some(second)) => {
                tracing::debug!("Cache hit for {} ({}, {})", task, targets.first, targets.second);
                (first, second, true)
            }
            _ => {
                let report = self.scan_page(task, &targets).await?;
                self.store(task, &targets.first, &report.slots.first);
                self.store(task, &targets.second, &report.slots.second);
                (report.slots.first, report.slots.second, false)
            }
        };

        if first.is_empty() || second.is_empty() {
            return Err(Error::NotFound {
                task: task.to_string(),
                lang1: targets.first,
                lang2: targets.second,
            });
        }

        Ok(Fragments {
            task: task.to_string(),
            first: render_fragment(&first, &targets.first),
            second: render_fragment(&second, &targets.second),
            languages: targets,
            cached,
        })
    }

    /// Tasks solved in both languages
    pub async fn overlap(&self, lang1: &str, lang2: &str) -> Result<Vec<TaskDescriptor>> {
        find_overlap(self.source.as_ref(), lang1, lang2).await
    }

    /// Tasks solved in one language
    pub async fn tasks(&self, language: &str) -> Result<Vec<TaskDescriptor>> {
        task_index(self.source.as_ref(), language).await
    }

    async fn scan_page(&self, task: &str, targets: &TargetPair) -> Result<ScanReport> {
        let body = self.source.fetch(task).await?;
        let report = scan_body(task, &body, targets)?;

        tracing::debug!(
            "Scanned {}: {} nodes, {} skipped blocks, stopped early: {}",
            task,
            report.nodes_visited,
            report.skipped_blocks,
            report.stopped_early
        );
        if report.skipped_blocks > 0 {
            tracing::warn!("Skipped {} unreadable blocks on {}", report.skipped_blocks, task);
        }

        Ok(report)
    }

    fn cached(&self, task: &str, language: &str) -> Option<String> {
        match self.cache.get(task, language) {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!("Cache lookup failed for {}::{}: {}", task, language, e);
                None
            }
        }
    }

    fn store(&self, task: &str, language: &str, markup: &str) {
        if let Err(e) = self.cache.put(task, language, markup, self.ttl) {
            tracing::warn!("Cache write failed for {}::{}: {}", task, language, e);
        }
    }
}

fn scan_body(task: &str, body: &[u8], targets: &TargetPair) -> Result<ScanReport> {
    let doc = parse_document(task, body)?;
    Ok(scan(targets, section_nodes(&doc)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{raw_block, wrap_block};
    use crate::source::MockSource;
    use crate::storage::{CacheStats, NoCache, SqliteCache};

    const HOUR: Duration = Duration::from_secs(3600);

    const SUM_PAGE: &str = r#"<html><body><div id="mw-content-text">
<h2><span class="mw-headline">Go</span></h2>
<pre>G</pre>
<h2><span class="mw-headline">Python</span></h2>
<pre>P</pre>
<h2><span class="mw-headline">Rust</span></h2>
<pre>R</pre>
<h2><span class="mw-headline">Zig</span></h2>
<pre>Z</pre>
</div></body></html>"#;

    /// Cache whose backend is always down
    struct BrokenCache;

    impl FragmentCache for BrokenCache {
        fn get(&self, _task: &str, _language: &str) -> Result<Option<String>> {
            Err(Error::Cache("connection refused".to_string()))
        }

        fn put(&self, _task: &str, _language: &str, _markup: &str, _ttl: Duration) -> Result<()> {
            Err(Error::Cache("connection refused".to_string()))
        }

        fn clear(&self) -> Result<usize> {
            Err(Error::Cache("connection refused".to_string()))
        }

        fn stats(&self) -> Result<CacheStats> {
            Err(Error::Cache("connection refused".to_string()))
        }
    }

    fn comparer(source: &Arc<MockSource>, cache: Arc<dyn FragmentCache>) -> Comparer {
        Comparer::new(source.clone(), cache, HOUR)
    }

    #[tokio::test]
    async fn test_extract_go_and_rust() {
        let source = Arc::new(MockSource::new().with_page("Sum", SUM_PAGE));
        let comparer = comparer(&source, Arc::new(NoCache));

        let fragments = comparer.extract("Sum", "go", "rust").await.unwrap();
        assert_eq!(fragments.first, wrap_block("G", "go"));
        assert_eq!(fragments.second, wrap_block("R", "rust"));
        assert!(!fragments.cached);
    }

    #[tokio::test]
    async fn test_second_call_served_from_cache() {
        let source = Arc::new(MockSource::new().with_page("Sum", SUM_PAGE));
        let comparer = comparer(&source, Arc::new(SqliteCache::open_in_memory().unwrap()));

        let first = comparer.extract("Sum", "Go", "Rust").await.unwrap();
        let second = comparer.extract("Sum", "go", "rust").await.unwrap();

        assert_eq!(first.first, second.first);
        assert_eq!(first.second, second.second);
        assert!(second.cached);
        assert_eq!(source.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_partial_hit_refetches() {
        let source = Arc::new(MockSource::new().with_page("Sum", SUM_PAGE));
        let cache = Arc::new(SqliteCache::open_in_memory().unwrap());
        let comparer = comparer(&source, cache.clone());

        comparer.extract("Sum", "go", "rust").await.unwrap();
        comparer.extract("Sum", "go", "python").await.unwrap();

        assert_eq!(source.fetch_count(), 2);
        assert_eq!(cache.get("Sum", "python").unwrap(), Some(raw_block("P")));
    }

    #[tokio::test]
    async fn test_missing_language_is_not_found_and_cached() {
        let source = Arc::new(MockSource::new().with_page("Sum", SUM_PAGE));
        let cache = Arc::new(SqliteCache::open_in_memory().unwrap());
        let comparer = comparer(&source, cache.clone());

        let err = comparer.extract("Sum", "cobol", "go").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(cache.get("Sum", "cobol").unwrap(), Some(String::new()));

        let err = comparer.extract("Sum", "cobol", "go").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(source.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_fetch_failure_leaves_cache_untouched() {
        let source = Arc::new(MockSource::new());
        let cache = Arc::new(SqliteCache::open_in_memory().unwrap());
        let comparer = comparer(&source, cache.clone());

        let err = comparer.extract("Sum", "go", "rust").await.unwrap_err();
        assert!(matches!(err, Error::Fetch { .. }));
        assert_eq!(cache.stats().unwrap(), CacheStats::default());
    }

    #[tokio::test]
    async fn test_parse_failure_is_terminal() {
        let source = Arc::new(MockSource::new().with_page("Sum", "  "));
        let comparer = comparer(&source, Arc::new(NoCache));

        let err = comparer.extract("Sum", "go", "rust").await.unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[tokio::test]
    async fn test_broken_cache_falls_back_to_extraction() {
        let source = Arc::new(MockSource::new().with_page("Sum", SUM_PAGE));
        let comparer = comparer(&source, Arc::new(BrokenCache));

        let fragments = comparer.extract("Sum", "go", "rust").await.unwrap();
        assert_eq!(fragments.second, wrap_block("R", "rust"));
        assert_eq!(source.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_same_language_rejected() {
        let source = Arc::new(MockSource::new().with_page("Sum", SUM_PAGE));
        let comparer = comparer(&source, Arc::new(NoCache));

        let err = comparer.extract("Sum", "Go", " go ").await.unwrap_err();
        assert!(matches!(err, Error::SameLanguage(ref lang) if lang == "go"));
        assert_eq!(source.fetch_count(), 0);
    }

    #[tokio::test]
    async fn test_fragments_render_side_by_side() {
        let source = Arc::new(MockSource::new().with_page("Sum", SUM_PAGE));
        let comparer = comparer(&source, Arc::new(NoCache));

        let html = comparer.extract("Sum", "go", "rust").await.unwrap().to_html();
        let go = html.find("language-go").unwrap();
        let rust = html.find("language-rust").unwrap();
        assert!(go < rust);
    }

    #[tokio::test]
    async fn test_cache_holds_raw_markup() {
        let source = Arc::new(MockSource::new().with_page("Sum", SUM_PAGE));
        let cache = Arc::new(SqliteCache::open_in_memory().unwrap());
        let comparer = comparer(&source, cache.clone());

        let fresh = comparer.extract("Sum", "go", "rust").await.unwrap();

        let stored = cache.get("Sum", "go").unwrap().unwrap();
        assert_eq!(stored, "<pre>G</pre>");
        assert!(!stored.contains("<pre><code"));

        let hit = comparer.extract("Sum", "go", "rust").await.unwrap();
        assert!(hit.cached);
        assert_eq!(hit.first, fresh.first);
        assert_eq!(hit.first, wrap_block("G", "go"));
    }

    #[tokio::test]
    async fn test_page_markup_does_not_leak_into_code() {
        let page = r#"<div id="mw-content-text"><h2><span class="mw-headline">Go</span></h2>
<pre><span title="a>b<img src=x onerror=alert(1)>">code</span>x<!-- hidden > leaked -->y</pre>
<h2><span class="mw-headline">Rust</span></h2>
<pre>fn main() {}</pre></div>"#;
        let source = Arc::new(MockSource::new().with_page("Leak", page));
        let comparer = comparer(&source, Arc::new(SqliteCache::open_in_memory().unwrap()));

        let fragments = comparer.extract("Leak", "go", "rust").await.unwrap();
        assert!(!fragments.first.contains("leaked"));
        assert_eq!(fragments.first, "<pre><code class=\"language-go\">codexy</code></pre>");

        let cached = comparer.extract("Leak", "go", "rust").await.unwrap();
        assert_eq!(cached.first, fragments.first);
    }

    #[tokio::test]
    async fn test_fragments_to_text_decodes_code() {
        let page = r#"<div id="mw-content-text"><h2>Go</h2><pre>if a &lt; b {}</pre>
<h2>Rust</h2><pre>a &amp;&amp; b</pre></div>"#;
        let source = Arc::new(MockSource::new().with_page("Text", page));
        let comparer = comparer(&source, Arc::new(NoCache));

        let (go, rust) = comparer.extract("Text", "go", "rust").await.unwrap().to_text();
        assert_eq!(go, "if a < b {}");
        assert_eq!(rust, "a && b");
    }
}
