//! Country outlines: a fixed, ordered table of country name → SVG path data.
//!
//! The store is built once and never changes. Its iteration order is the
//! draw order, which also decides hit-testing ties (last drawn wins).

use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{debug, warn};

use crate::path::Outline;

/// Width of the map's view box.
pub const WIDTH: f64 = 2000.0;
/// Height of the map's view box.
pub const HEIGHT: f64 = 857.0;

/// GeoJSON property keys tried, in order, for a feature's country name.
pub const DEFAULT_NAME_KEYS: &[&str] = &["name", "ADMIN", "NAME"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryGeometry {
    pub name: String,
    pub path_data: String,
}

impl CountryGeometry {
    pub fn new(name: impl Into<String>, path_data: impl Into<String>) -> Self {
        Self { name: name.into(), path_data: path_data.into() }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    geometry: CountryGeometry,
    outline: Outline,
}

#[derive(Debug, Clone, Default)]
pub struct GeometryStore {
    entries: Vec<Entry>,
}

impl GeometryStore {
    pub fn new(records: Vec<CountryGeometry>) -> Self {
        let entries = records
            .into_iter()
            .map(|geometry| Entry { outline: Outline::parse(&geometry.path_data), geometry })
            .collect();
        Self { entries }
    }

    /// Read a GeoJSON FeatureCollection from disk.
    pub fn load(path: &Path, name_keys: &[&str]) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read geometry file {}", path.display()))?;
        let geojson: Value = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse GeoJSON in {}", path.display()))?;
        Ok(Self::from_geojson(&geojson, name_keys))
    }

    /// One record per named Polygon/MultiPolygon feature, projected into the
    /// `WIDTH` x `HEIGHT` view box. Anything else is skipped.
    pub fn from_geojson(geojson: &Value, name_keys: &[&str]) -> Self {
        let mut records = Vec::new();
        let Some(features) = geojson["features"].as_array() else {
            warn!("GeoJSON has no features array; geometry store is empty");
            return Self::default();
        };

        for (i, feature) in features.iter().enumerate() {
            let name = name_keys
                .iter()
                .find_map(|key| feature["properties"][*key].as_str());
            let Some(name) = name else {
                warn!(feature = i, "skipping feature without a name property");
                continue;
            };
            let d = geometry_paths(&feature["geometry"]).concat();
            if d.is_empty() {
                warn!(feature = i, country = name, "skipping feature without polygon geometry");
                continue;
            }
            records.push(CountryGeometry::new(name, d));
        }

        debug!(countries = records.len(), "built geometry store from GeoJSON");
        Self::new(records)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records in draw order.
    pub fn iter(&self) -> impl Iterator<Item = &CountryGeometry> {
        self.entries.iter().map(|e| &e.geometry)
    }

    /// Exact, case-sensitive lookup.
    pub fn get(&self, name: &str) -> Option<&CountryGeometry> {
        self.iter().find(|g| g.name == name)
    }

    /// Name of the topmost shape under `(x, y)` in view-box coordinates.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.outline.contains(x, y))
            .map(|e| e.geometry.name.as_str())
    }
}

// ---------------------------------------------------------------------------
// Projection (equirectangular)
// ---------------------------------------------------------------------------

#[inline]
pub fn project(lon: f64, lat: f64) -> (f64, f64) {
    ((lon + 180.0) / 360.0 * WIDTH, (90.0 - lat) / 180.0 * HEIGHT)
}

// ---------------------------------------------------------------------------
// GeoJSON → SVG paths
// ---------------------------------------------------------------------------

fn ring_to_path(coords: &[Value]) -> String {
    let mut d = String::new();
    for pt in coords {
        let arr = match pt.as_array() { Some(a) => a, None => continue };
        let lon = match arr.first().and_then(|v| v.as_f64()) { Some(v) => v, None => continue };
        let lat = match arr.get(1).and_then(|v| v.as_f64())  { Some(v) => v, None => continue };
        let (x, y) = project(lon, lat);
        if d.is_empty() { d.push_str(&format!("M{x:.2},{y:.2}")) }
        else            { d.push_str(&format!("L{x:.2},{y:.2}")) }
    }
    if !d.is_empty() {
        d.push('Z');
    }
    d
}

fn polygon_paths(rings: &Value, paths: &mut Vec<String>) {
    if let Some(rings) = rings.as_array() {
        for ring in rings {
            if let Some(pts) = ring.as_array() {
                let d = ring_to_path(pts);
                if !d.is_empty() { paths.push(d) }
            }
        }
    }
}

fn geometry_paths(geom: &Value) -> Vec<String> {
    let mut paths = Vec::new();
    match geom["type"].as_str().unwrap_or("") {
        "Polygon" => polygon_paths(&geom["coordinates"], &mut paths),
        "MultiPolygon" => {
            if let Some(polys) = geom["coordinates"].as_array() {
                for poly in polys {
                    polygon_paths(poly, &mut paths);
                }
            }
        }
        _ => {}
    }
    paths
}
