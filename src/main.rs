//! heat-parser — fetch one World Bank indicator for every country and
//! reduce it to the `heat.json` dataset the world map consumes.

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::Parser;
use tracing::info;
use world_heat_map::{worldbank, HeatEntry};

#[derive(Parser)]
#[command(name = "heat-parser", version, about = "Reduce a World Bank indicator to a per-country heat dataset")]
struct Args {
    /// Indicator id, e.g. SP.POP.TOTL
    #[arg(short, long, default_value = "NY.GDP.MKTP.CD")]
    indicator: String,

    /// Read a saved API response instead of fetching
    #[arg(long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output file
    #[arg(short, long, default_value = "heat.json")]
    out: PathBuf,

    #[arg(long, default_value = worldbank::BASE_URL)]
    base_url: String,

    #[arg(long, default_value_t = worldbank::DEFAULT_PER_PAGE)]
    per_page: u32,
}

fn main() -> anyhow::Result<()> {
    world_heat_map::init_tracing();
    let args = Args::parse();

    let body = match &args.input {
        Some(path) => {
            info!(file = %path.display(), "reading saved response");
            fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?
        }
        None => {
            let url = worldbank::indicator_url(&args.base_url, &args.indicator, args.per_page);
            info!(
                indicator = %args.indicator,
                title = worldbank::indicator_title(&args.indicator).unwrap_or("-"),
                "fetching indicator from World Bank"
            );
            worldbank::fetch_indicator(&url)?
        }
    };

    let rows = worldbank::parse_response(&body)?;
    info!(rows = rows.len(), "parsed response");

    let heat = worldbank::latest_heat(&rows);
    let with_data = heat.iter().filter(|e| e.value != 0.0).count();
    info!(countries = heat.len(), with_data, "reduced to latest values");

    write_atomically(&args.out, &heat)?;
    info!(file = %args.out.display(), "done");
    Ok(())
}

/// Write to a temp file next to `path`, then rename over it.
fn write_atomically(path: &Path, heat: &[HeatEntry]) -> anyhow::Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    {
        let file = File::create(&tmp).with_context(|| format!("failed to create {}", tmp.display()))?;
        let mut w = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut w, heat)?;
        writeln!(w)?;
        w.flush()?;
    }

    fs::rename(&tmp, path).with_context(|| format!("failed to move {} into place", tmp.display()))?;
    Ok(())
}
