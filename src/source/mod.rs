//! Wiki page retrieval
//!
//! Pages are fetched by name (a task or a language) through the
//! [`DocumentSource`] trait so the comparison pipeline can be driven by the
//! live wiki or by in-memory pages in tests.

mod client;

pub use client::{SourceConfig, WikiClient};

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Trait for page sources
#[async_trait::async_trait]
pub trait DocumentSource: Send + Sync {
    /// Fetch the raw body of a named page
    async fn fetch(&self, page: &str) -> Result<Vec<u8>>;
}

/// In-memory page source for testing
pub struct MockSource {
    pages: HashMap<String, String>,
    fetches: AtomicUsize,
    requested: Mutex<Vec<String>>,
}

impl MockSource {
    /// Create an empty mock source
    pub fn new() -> Self {
        Self {
            pages: HashMap::new(),
            fetches: AtomicUsize::new(0),
            requested: Mutex::new(Vec::new()),
        }
    }

    /// Add a page
    pub fn with_page(mut self, page: &str, body: &str) -> Self {
        self.pages.insert(page.to_string(), body.to_string());
        self
    }

    /// Number of fetches performed so far, including failed ones
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Page names requested so far, in order
    pub fn requested(&self) -> Vec<String> {
        self.requested
            .lock()
            .map(|pages| pages.clone())
            .unwrap_or_default()
    }
}

impl Default for MockSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl DocumentSource for MockSource {
    async fn fetch(&self, page: &str) -> Result<Vec<u8>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requested) = self.requested.lock() {
            requested.push(page.to_string());
        }

        self.pages
            .get(page)
            .map(|body| body.as_bytes().to_vec())
            .ok_or_else(|| Error::Fetch {
                page: page.to_string(),
                reason: "404 Not Found".to_string(),
            })
    }
}
