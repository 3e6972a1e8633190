use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use us_nonprofits::{Extractor, HttpSource, RegionRegistry};

#[derive(Parser)]
#[command(author, version, about = "Download IRS EO BMF regional CSVs into one table")]
struct Args {
    /// Region to extract; omit to extract every region.
    region: Option<String>,
    /// YAML region registry; defaults to the built-in IRS registry.
    #[arg(long, env = "US_NONPROFITS_REGIONS")]
    regions: Option<PathBuf>,
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let args = Args::parse();
    let registry = match &args.regions {
        Some(path) => RegionRegistry::from_yaml_file(path)?,
        None => RegionRegistry::irs_eo_bmf()?,
    };
    info!(regions = ?registry.names(), "startup");

    let extractor = Extractor::new(registry, HttpSource::new()?);
    if let Some(table) = extractor.run(args.region.as_deref())? {
        println!("rows={} columns={}", table.num_rows(), table.num_columns());
    }

    info!("all done");
    Ok(())
}
