// src/extract.rs

use anyhow::{Context, Result};
use arrow::record_batch::RecordBatch;
use tracing::{info, instrument};

use crate::fetch::CsvSource;
use crate::regions::{Region, RegionRegistry};
use crate::table::RecordTable;

/// Region-keyed extractor over an immutable registry.
pub struct Extractor<S> {
    registry: RegionRegistry,
    source: S,
}

impl<S: CsvSource> Extractor<S> {
    pub fn new(registry: RegionRegistry, source: S) -> Self {
        Self { registry, source }
    }

    pub fn registry(&self) -> &RegionRegistry {
        &self.registry
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch one region, or every region concatenated in registry order.
    ///
    /// An unknown region prints the valid names and yields `Ok(None)`.
    /// An empty name counts as no region.
    /// Fetch and parse failures propagate; with no region the first failure
    /// aborts the whole batch.
    pub fn extract(&self, region: Option<&str>) -> Result<Option<RecordTable>> {
        match region.filter(|name| !name.is_empty()) {
            Some(name) => match self.registry.get(name) {
                Some(region) => self.fetch_region(region).map(Some),
                None => {
                    let message = unknown_region_message(name, &self.registry.names());
                    info!(region = name, "{}", message);
                    println!("{}", message);
                    Ok(None)
                }
            },
            None => {
                let tables = self
                    .registry
                    .iter()
                    .map(|region| self.fetch_region(region))
                    .collect::<Result<Vec<_>>>()?;
                let all = RecordTable::concat(tables);
                info!(
                    regions = self.registry.len(),
                    rows = all.num_rows(),
                    columns = all.num_columns(),
                    "extracted all regions"
                );
                Ok(Some(all))
            }
        }
    }

    /// extract → transform → load. Returns the transformed table, if any.
    pub fn run(&self, region: Option<&str>) -> Result<Option<RecordTable>> {
        let Some(data) = self.extract(region)? else {
            return Ok(None);
        };
        let data = transform(data);
        load(&data)?;
        Ok(Some(data))
    }

    #[instrument(level = "info", skip(self, region), fields(region = %region.name, url = %region.url))]
    fn fetch_region(&self, region: &Region) -> Result<RecordTable> {
        let body = self
            .source
            .fetch_csv(&region.url)
            .with_context(|| format!("fetching region {:?} from {}", region.name, region.url))?;
        let table = RecordTable::from_csv_str(&body)
            .with_context(|| format!("parsing CSV for region {:?} from {}", region.name, region.url))?;
        info!(rows = table.num_rows(), columns = table.num_columns(), "extracted");
        Ok(table)
    }
}

/// Guidance shown when `name` is not a registered region.
pub fn unknown_region_message(name: &str, valid: &[&str]) -> String {
    format!("Unknown region {:?}. Valid regions: {:?}", name, valid)
}

/// No transformation is defined yet; data passes through unchanged.
pub fn transform(data: RecordTable) -> RecordTable {
    data
}

/// No sink is defined yet. Builds the Arrow hand-off batch, records its
/// shape and returns it.
pub fn load(data: &RecordTable) -> Result<RecordBatch> {
    let batch = data.to_record_batch().context("loading extracted table")?;
    info!(
        rows = batch.num_rows(),
        columns = batch.num_columns(),
        bytes = batch.get_array_memory_size(),
        "load: no sink configured"
    );
    Ok(batch)
}
