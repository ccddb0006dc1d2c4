//! world-map — render a heat dataset onto a self-contained SVG world map.
//!
//! Country outlines come from a GeoJSON file or are fetched at runtime
//! (Natural Earth based `world.geojson`). Values come from `heat.json`, as
//! written by `heat-parser`. Output: `map.svg`, projected equirectangular
//! into a 2000 x 857 view box.
//!
//! `--pointer` and `--click` replay a pointer position and a click against
//! the map before it is written, so the hovered country and its tooltip are
//! baked into the output.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context};
use clap::Parser;
use serde_json::Value;
use tracing::{info, warn};
use world_heat_map::{
    geometry::{GeometryStore, DEFAULT_NAME_KEYS},
    svg::{to_svg, SvgOptions},
    HeatEntry, MapRenderer,
};

const GEOJSON_URL: &str =
    "https://raw.githubusercontent.com/holtzy/D3-graph-gallery/master/DATA/world.geojson";

#[derive(Parser)]
#[command(name = "world-map", version, about = "Render a heat dataset onto an SVG world map")]
struct Args {
    /// Country outlines as a GeoJSON FeatureCollection; fetched when absent
    #[arg(long, value_name = "FILE")]
    geojson: Option<PathBuf>,

    #[arg(long, default_value = GEOJSON_URL)]
    geojson_url: String,

    /// Property holding the country name (repeatable, tried in order)
    #[arg(long = "name-key", value_name = "KEY")]
    name_keys: Vec<String>,

    /// Heat dataset: JSON list of {"name", "value"}
    #[arg(long, default_value = "heat.json")]
    heat: PathBuf,

    #[arg(short, long, default_value = "map.svg")]
    out: PathBuf,

    #[arg(long)]
    title: Option<String>,

    /// Draw the Low/High legend
    #[arg(long)]
    legend: bool,

    /// Pointer position "X,Y" in map coordinates
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
    pointer: Option<(f64, f64)>,

    /// Click position "X,Y" in map coordinates
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
    click: Option<(f64, f64)>,
}

fn parse_point(s: &str) -> Result<(f64, f64), String> {
    let (x, y) = s.split_once(',').ok_or_else(|| format!("expected X,Y, got {s:?}"))?;
    let x = x.trim().parse::<f64>().map_err(|e| format!("bad X in {s:?}: {e}"))?;
    let y = y.trim().parse::<f64>().map_err(|e| format!("bad Y in {s:?}: {e}"))?;
    Ok((x, y))
}

fn main() -> anyhow::Result<()> {
    world_heat_map::init_tracing();
    let args = Args::parse();

    let name_keys: Vec<&str> = if args.name_keys.is_empty() {
        DEFAULT_NAME_KEYS.to_vec()
    } else {
        args.name_keys.iter().map(String::as_str).collect()
    };

    let geometry = match &args.geojson {
        Some(path) => {
            info!(file = %path.display(), "loading country polygons");
            GeometryStore::load(path, &name_keys)?
        }
        None => {
            info!(url = %args.geojson_url, "fetching country polygons");
            let resp = ureq::get(&args.geojson_url)
                .call()
                .with_context(|| format!("GET {} failed", args.geojson_url))?;
            let geojson: Value = serde_json::from_reader(resp.into_reader())
                .context("failed to parse fetched GeoJSON")?;
            GeometryStore::from_geojson(&geojson, &name_keys)
        }
    };
    if geometry.is_empty() {
        bail!("no country polygons found; check --name-key");
    }
    info!(countries = geometry.len(), "geometry ready");

    let heat = load_heat(&args.heat)?;
    let unmatched = heat.iter().filter(|e| geometry.get(&e.name).is_none()).count();
    info!(entries = heat.len(), unmatched, "heat dataset ready");

    let mut selected: Option<String> = None;
    let svg = {
        let mut map = MapRenderer::new(&geometry, heat)
            .on_select(|name| selected = Some(name.to_string()));

        if let Some((x, y)) = args.pointer {
            map.pointer_move(x, y, x, y);
            match map.hover() {
                Some(name) => info!(country = name, "pointer over country"),
                None => info!("pointer over sea"),
            }
        }
        if let Some((x, y)) = args.click {
            map.click_at(x, y);
        }

        let options = SvgOptions { title: args.title.as_deref(), legend: args.legend };
        to_svg(&map.scene(), map.tooltip(), &options)
    };

    if let Some(name) = &selected {
        info!(country = %name, "selected");
        println!("{name}");
    }

    fs::write(&args.out, &svg).with_context(|| format!("failed to write {}", args.out.display()))?;
    info!(file = %args.out.display(), bytes = svg.len(), "written");
    Ok(())
}

/// A missing file is an empty dataset, which renders every country gray.
fn load_heat(path: &Path) -> anyhow::Result<Vec<HeatEntry>> {
    if !path.exists() {
        warn!(file = %path.display(), "heat file not found; rendering without data");
        return Ok(Vec::new());
    }
    let text = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse heat dataset {}", path.display()))
}
