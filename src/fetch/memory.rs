// src/fetch/memory.rs

use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use url::Url;

use super::CsvSource;

/// In-memory CSV bodies keyed by URL. Unknown URLs are an error.
#[derive(Debug, Default)]
pub struct StaticSource {
    bodies: HashMap<Url, String>,
    fetches: AtomicUsize,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: &str, body: impl Into<String>) -> Result<Self> {
        self.insert(url, body)?;
        Ok(self)
    }

    pub fn insert(&mut self, url: &str, body: impl Into<String>) -> Result<()> {
        let url = Url::parse(url)?;
        self.bodies.insert(url, body.into());
        Ok(())
    }

    /// Number of `fetch_csv` calls so far, failed ones included.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }
}

impl CsvSource for StaticSource {
    fn fetch_csv(&self, url: &Url) -> Result<String> {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        self.bodies
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow!("no document registered for {}", url))
    }
}
