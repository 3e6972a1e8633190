// src/fetch/http.rs

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use tracing::debug;
use url::Url;

use super::CsvSource;

static USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Blocking HTTP(S) GET. One request per call, no retry, no timeout.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    pub fn new() -> Result<Self> {
        // blocking client otherwise applies a 30s total timeout
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(None)
            .build()
            .context("building HTTP client")?;
        Ok(Self { client })
    }

    /// Status code answered for a GET of `url`; the body is discarded.
    pub fn status(&self, url: &Url) -> Result<StatusCode> {
        let resp = self
            .client
            .get(url.clone())
            .send()
            .with_context(|| format!("GET {}", url))?;
        Ok(resp.status())
    }
}

impl CsvSource for HttpSource {
    /// The body must be valid UTF-8.
    fn fetch_csv(&self, url: &Url) -> Result<String> {
        let bytes = self
            .client
            .get(url.clone())
            .send()
            .with_context(|| format!("GET {}", url))?
            .error_for_status()?
            .bytes()
            .with_context(|| format!("reading body from {}", url))?;
        let body = String::from_utf8(bytes.to_vec())
            .with_context(|| format!("decoding body from {} as UTF-8", url))?;
        debug!(%url, bytes = body.len(), "fetched");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::test_server;
    use std::time::Duration;

    #[test]
    fn test_fetch_csv_ok() -> Result<()> {
        let base = test_server::serve(vec![(200, b"EIN,NAME\n1,A\n".to_vec())]);
        let url = Url::parse(&format!("{}eo1.csv", base))?;

        let body = HttpSource::new()?.fetch_csv(&url)?;
        assert_eq!(body, "EIN,NAME\n1,A\n");
        Ok(())
    }

    #[test]
    fn test_fetch_csv_bad_status() -> Result<()> {
        let base = test_server::serve(vec![(500, b"boom".to_vec())]);
        let url = Url::parse(&format!("{}eo1.csv", base))?;

        let err = HttpSource::new()?.fetch_csv(&url).unwrap_err();
        assert!(format!("{:#}", err).contains("500"));
        Ok(())
    }

    #[test]
    fn test_fetch_csv_unreachable() -> Result<()> {
        // bind then drop so nothing is listening
        let addr = std::net::TcpListener::bind("127.0.0.1:0")?.local_addr()?;
        let url = Url::parse(&format!("http://{}/eo1.csv", addr))?;

        let err = HttpSource::new()?.fetch_csv(&url).unwrap_err();
        assert!(err.to_string().starts_with("GET "));
        Ok(())
    }

    #[test]
    fn test_fetch_csv_invalid_utf8_is_error() -> Result<()> {
        let base = test_server::serve(vec![(200, b"EIN,NAME\n1,CAF\xC9\n".to_vec())]);
        let url = Url::parse(&format!("{}eo1.csv", base))?;

        let err = HttpSource::new()?.fetch_csv(&url).unwrap_err();
        assert!(err.to_string().contains("UTF-8"));
        Ok(())
    }

    /// Body arrives after more than 30s; takes that long to run.
    #[test]
    fn test_fetch_csv_slow_body_completes() -> Result<()> {
        let base = test_server::serve_slow(
            vec![b"EIN,NAME\n".to_vec(), b"1,A\n".to_vec()],
            Duration::from_secs(32),
        );
        let url = Url::parse(&format!("{}eo1.csv", base))?;

        let body = HttpSource::new()?.fetch_csv(&url)?;
        assert_eq!(body, "EIN,NAME\n1,A\n");
        Ok(())
    }
}
