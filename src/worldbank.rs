//! World Bank indicator responses → heat dataset.
//!
//! The API answers `/country/all/indicator/{id}` with a two-element array:
//! paging metadata, then one row per (country, year). Errors come back as a
//! one-element array carrying a `message` list.

use std::collections::HashMap;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::heat::HeatEntry;

pub const BASE_URL: &str = "https://api.worldbank.org/v2";

/// Large enough to get every country-year of an indicator in one page.
pub const DEFAULT_PER_PAGE: u32 = 9999;

/// Indicators offered by default, with their display names.
pub const POPULAR_INDICATORS: &[(&str, &str)] = &[
    ("NY.GDP.MKTP.CD", "GDP (current US$)"),
    ("NY.GDP.PCAP.CD", "GDP per capita (current US$)"),
    ("SP.POP.TOTL", "Population, total"),
    ("FP.CPI.TOTL.ZG", "Inflation, consumer prices (annual %)"),
    ("SL.UEM.TOTL.ZS", "Unemployment, total (% of labor force)"),
    ("NY.GNS.ICTR.ZS", "Gross savings (% of GDP)"),
    ("BX.KLT.DINV.WD.GD.ZS", "Foreign direct investment (%)"),
    ("SE.XPD.TOTL.GD.ZS", "Government expenditure on education"),
    ("SH.XPD.CHEX.GD.ZS", "Current health expenditure (% of GDP)"),
    ("EG.USE.PCAP.KG.OE", "Energy use (kg of oil equivalent per capita)"),
];

#[derive(Debug, Clone, Deserialize)]
pub struct Named {
    pub id: String,
    pub value: String,
}

/// One (country, year) row.
#[derive(Debug, Clone, Deserialize)]
pub struct Observation {
    #[serde(default)]
    pub indicator: Option<Named>,
    pub country: Named,
    pub date: String,
    pub value: Option<f64>,
}

impl Observation {
    /// Leading year digits of `date` ("2021", "2021Q3", "2021M07").
    fn year(&self) -> Option<i32> {
        let digits: String = self.date.chars().take_while(|c| c.is_ascii_digit()).collect();
        digits.parse().ok()
    }
}

pub fn indicator_title(id: &str) -> Option<&'static str> {
    POPULAR_INDICATORS
        .iter()
        .find(|(known, _)| *known == id)
        .map(|(_, title)| *title)
}

pub fn indicator_url(base: &str, indicator: &str, per_page: u32) -> String {
    format!(
        "{}/country/all/indicator/{indicator}?format=json&per_page={per_page}",
        base.trim_end_matches('/')
    )
}

/// GET `url` and return the raw body.
pub fn fetch_indicator(url: &str) -> Result<String> {
    let body = ureq::get(url)
        .set("Accept-Encoding", "identity")
        .call()
        .with_context(|| format!("GET {url} failed"))?
        .into_string()
        .context("failed to read World Bank response body")?;
    Ok(body)
}

/// Rows of a response body. A `null` rows element (indicator without data)
/// gives an empty list.
pub fn parse_response(body: &str) -> Result<Vec<Observation>> {
    let mut parts: Vec<Value> =
        serde_json::from_str(body).context("World Bank response is not a JSON array")?;

    if parts.len() < 2 {
        let message = parts
            .first()
            .and_then(|meta| meta["message"][0]["value"].as_str())
            .unwrap_or("response has no data element");
        bail!("World Bank API error: {message}");
    }

    let rows = parts.swap_remove(1);
    if rows.is_null() {
        warn!("World Bank response has no rows");
        return Ok(Vec::new());
    }
    serde_json::from_value(rows).context("unexpected World Bank row layout")
}

/// One entry per distinct country name, in first-seen order, holding the
/// most recent non-null, non-zero value; 0 if the country has none.
pub fn latest_heat(rows: &[Observation]) -> Vec<HeatEntry> {
    let mut order: Vec<&str> = Vec::new();
    let mut by_country: HashMap<&str, Vec<&Observation>> = HashMap::new();
    for row in rows {
        let name = row.country.value.as_str();
        by_country
            .entry(name)
            .or_insert_with(|| {
                order.push(name);
                Vec::new()
            })
            .push(row);
    }

    order
        .into_iter()
        .map(|name| {
            let mut observations = by_country.remove(name).unwrap_or_default();
            // newest first; stable, so rows without a year keep response order
            observations.sort_by(|a, b| b.year().cmp(&a.year()));
            let value = observations
                .iter()
                .find_map(|o| o.value.filter(|v| *v != 0.0))
                .unwrap_or(0.0);
            HeatEntry::new(name, value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"[
        {"page":1,"pages":1,"per_page":9999,"total":6},
        [
            {"indicator":{"id":"SP.POP.TOTL","value":"Population, total"},"country":{"id":"AA","value":"Alpha"},"date":"2023","value":null},
            {"indicator":{"id":"SP.POP.TOTL","value":"Population, total"},"country":{"id":"AA","value":"Alpha"},"date":"2022","value":0},
            {"indicator":{"id":"SP.POP.TOTL","value":"Population, total"},"country":{"id":"AA","value":"Alpha"},"date":"2021","value":50.5},
            {"indicator":{"id":"SP.POP.TOTL","value":"Population, total"},"country":{"id":"BB","value":"Beta"},"date":"2022","value":100},
            {"indicator":{"id":"SP.POP.TOTL","value":"Population, total"},"country":{"id":"BB","value":"Beta"},"date":"2023","value":120},
            {"indicator":{"id":"SP.POP.TOTL","value":"Population, total"},"country":{"id":"GG","value":"Gamma"},"date":"2023","value":null}
        ]
    ]"#;

    #[test]
    fn reduces_to_latest_non_zero_value() {
        let rows = parse_response(BODY).unwrap();
        assert_eq!(rows.len(), 6);
        let heat = latest_heat(&rows);
        assert_eq!(
            heat,
            vec![
                HeatEntry::new("Alpha", 50.5),
                HeatEntry::new("Beta", 120.0),
                HeatEntry::new("Gamma", 0.0),
            ]
        );
    }

    #[test]
    fn null_rows_mean_no_data() {
        let rows = parse_response(r#"[{"page":0,"pages":0,"total":0}, null]"#).unwrap();
        assert!(rows.is_empty());
        assert!(latest_heat(&rows).is_empty());
    }

    #[test]
    fn api_error_message_is_surfaced() {
        let body = r#"[{"message":[{"id":"120","key":"Invalid value","value":"The provided parameter value is not valid"}]}]"#;
        let err = parse_response(body).unwrap_err();
        assert!(err.to_string().contains("The provided parameter value is not valid"));
    }

    #[test]
    fn non_array_body_is_an_error() {
        assert!(parse_response("<html>bad gateway</html>").is_err());
    }

    #[test]
    fn url_and_titles() {
        assert_eq!(
            indicator_url("https://api.worldbank.org/v2/", "SP.POP.TOTL", 9999),
            "https://api.worldbank.org/v2/country/all/indicator/SP.POP.TOTL?format=json&per_page=9999"
        );
        assert_eq!(indicator_title("SP.POP.TOTL"), Some("Population, total"));
        assert_eq!(indicator_title("XX.UNKNOWN"), None);
    }
}
