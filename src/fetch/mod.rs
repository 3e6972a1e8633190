// src/fetch/mod.rs

use anyhow::Result;
use reqwest::StatusCode;
use tracing::{info, warn};
use url::Url;

use crate::regions::RegionRegistry;

pub mod http;
pub mod memory;

pub use http::HttpSource;
pub use memory::StaticSource;

/// Anything that can hand back the body of a CSV document by URL.
///
/// Non-success responses and transport failures are errors; no retry.
pub trait CsvSource {
    fn fetch_csv(&self, url: &Url) -> Result<String>;
}

impl<S: CsvSource + ?Sized> CsvSource for &S {
    fn fetch_csv(&self, url: &Url) -> Result<String> {
        (**self).fetch_csv(url)
    }
}

/// Outcome of probing one registry URL.
#[derive(Debug, Clone)]
pub struct SourceStatus {
    pub region: String,
    pub url: Url,
    pub status: StatusCode,
}

impl SourceStatus {
    pub fn is_ok(&self) -> bool {
        self.status == StatusCode::OK
    }
}

/// GET every registry URL in order and record the status it answered with.
///
/// A non-200 status is reported, not raised; an unreachable host is an error.
pub fn check_sources(source: &HttpSource, registry: &RegionRegistry) -> Result<Vec<SourceStatus>> {
    let mut out = Vec::with_capacity(registry.len());
    for region in registry.iter() {
        let status = source.status(&region.url)?;
        if status == StatusCode::OK {
            info!(region = %region.name, url = %region.url, "source ok");
        } else {
            warn!(region = %region.name, url = %region.url, %status, "source not ok");
        }
        out.push(SourceStatus {
            region: region.name.clone(),
            url: region.url.clone(),
            status,
        });
    }
    Ok(out)
}
