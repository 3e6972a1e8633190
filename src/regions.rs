// src/regions.rs

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use url::Url;

/// The IRS SOI exempt-organization BMF downloads, one CSV per region.
static IRS_EO_BMF_REGIONS: &[(&str, &str)] = &[
    ("northeast", "https://www.irs.gov/pub/irs-soi/eo1.csv"),
    (
        "mid_atlantic_great_lakes",
        "https://www.irs.gov/pub/irs-soi/eo2.csv",
    ),
    ("gulf_coast_pacific", "https://www.irs.gov/pub/irs-soi/eo3.csv"),
    ("international_other", "https://www.irs.gov/pub/irs-soi/eo4.csv"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub name: String,
    pub url: Url,
}

/// Ordered, immutable mapping of region name → CSV source URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionRegistry {
    regions: Vec<Region>,
}

#[derive(Debug, Deserialize)]
struct RegistryFile {
    regions: Vec<RegionEntry>,
}

#[derive(Debug, Deserialize)]
struct RegionEntry {
    name: String,
    url: String,
}

impl RegionRegistry {
    /// Build a registry, rejecting empty or duplicate names and non-HTTP URLs.
    /// Iteration order is the order of `regions`.
    pub fn new(regions: Vec<Region>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(regions.len());
        for region in &regions {
            if region.name.trim().is_empty() {
                bail!("region name must not be empty (url {})", region.url);
            }
            if !seen.insert(region.name.as_str()) {
                bail!("duplicate region name {:?}", region.name);
            }
            match region.url.scheme() {
                "http" | "https" => {}
                other => bail!(
                    "region {:?}: unsupported URL scheme {:?} in {}",
                    region.name,
                    other,
                    region.url
                ),
            }
        }
        Ok(Self { regions })
    }

    /// Parse `(name, url)` pairs into a registry.
    pub fn from_pairs<N, U>(pairs: impl IntoIterator<Item = (N, U)>) -> Result<Self>
    where
        N: Into<String>,
        U: AsRef<str>,
    {
        let regions = pairs
            .into_iter()
            .map(|(name, url)| {
                let name = name.into();
                let url = Url::parse(url.as_ref())
                    .with_context(|| format!("parsing URL for region {:?}", name))?;
                Ok(Region { name, url })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(regions)
    }

    /// The built-in IRS EO BMF registry.
    pub fn irs_eo_bmf() -> Result<Self> {
        Self::from_pairs(IRS_EO_BMF_REGIONS.iter().copied())
    }

    /// Parse a YAML document of the form:
    ///
    /// ```yaml
    /// regions:
    ///   - name: northeast
    ///     url: https://www.irs.gov/pub/irs-soi/eo1.csv
    /// ```
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let file: RegistryFile =
            serde_yaml::from_str(yaml).context("parsing region registry YAML")?;
        Self::from_pairs(file.regions.into_iter().map(|e| (e.name, e.url)))
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = fs::read_to_string(path)
            .with_context(|| format!("reading region registry {}", path.display()))?;
        Self::from_yaml_str(&yaml)
            .with_context(|| format!("loading region registry {}", path.display()))
    }

    pub fn get(&self, name: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.name == name)
    }

    /// Region names in registry order.
    pub fn names(&self) -> Vec<&str> {
        self.regions.iter().map(|r| r.name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_irs_registry_order() -> Result<()> {
        let registry = RegionRegistry::irs_eo_bmf()?;
        assert_eq!(
            registry.names(),
            vec![
                "northeast",
                "mid_atlantic_great_lakes",
                "gulf_coast_pacific",
                "international_other"
            ]
        );
        assert_eq!(
            registry.get("northeast").map(|r| r.url.as_str()),
            Some("https://www.irs.gov/pub/irs-soi/eo1.csv")
        );
        assert!(registry.get("west").is_none());
        Ok(())
    }

    #[test]
    fn test_rejects_duplicates_and_bad_urls() {
        let dup = RegionRegistry::from_pairs([
            ("south", "https://example.org/a.csv"),
            ("south", "https://example.org/b.csv"),
        ]);
        assert!(dup.unwrap_err().to_string().contains("duplicate"));

        let ftp = RegionRegistry::from_pairs([("south", "ftp://example.org/a.csv")]);
        assert!(ftp.is_err());

        let relative = RegionRegistry::from_pairs([("south", "/a.csv")]);
        assert!(relative.is_err());

        let blank = RegionRegistry::from_pairs([("  ", "https://example.org/a.csv")]);
        assert!(blank.is_err());
    }

    #[test]
    fn test_from_yaml_file_keeps_order() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(
            file,
            "regions:\n  - name: south\n    url: https://example.org/south.csv\n  - name: northeast\n    url: https://example.org/ne.csv"
        )?;

        let registry = RegionRegistry::from_yaml_file(file.path())?;
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), vec!["south", "northeast"]);
        Ok(())
    }

    #[test]
    fn test_from_yaml_str_rejects_missing_url() {
        let err = RegionRegistry::from_yaml_str("regions:\n  - name: south\n").unwrap_err();
        assert!(format!("{:#}", err).contains("YAML"));
    }
}
