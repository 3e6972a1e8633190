// src/bin/check_sources.rs

use anyhow::{bail, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};
use us_nonprofits::{check_sources, HttpSource, RegionRegistry};

#[derive(Parser)]
#[command(author, version, about = "Check that every region source answers HTTP 200")]
struct Args {
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

    let statuses = check_sources(&HttpSource::new()?, &registry)?;
    for s in &statuses {
        println!("{:<28} {} {}", s.region, s.status.as_u16(), s.url);
    }

    let failed = statuses.iter().filter(|s| !s.is_ok()).count();
    if failed > 0 {
        bail!("{} of {} sources did not answer 200", failed, statuses.len());
    }
    Ok(())
}
