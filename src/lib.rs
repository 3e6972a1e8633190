pub mod extract;
pub mod fetch;
pub mod regions;
pub mod table;

pub use extract::{load, transform, unknown_region_message, Extractor};
pub use fetch::{check_sources, CsvSource, HttpSource, SourceStatus, StaticSource};
pub use regions::{Region, RegionRegistry};
pub use table::RecordTable;
