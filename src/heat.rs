//! Heat colouring: maps each country's indicator value to a fill colour on
//! a blue ramp anchored at the largest value in the current dataset.
//!
//! A value of zero and a missing entry are treated the same way. Whether a
//! real zero should ever be told apart from "no data" is still open; both
//! currently resolve to value 0.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::color::{Rgb, NEUTRAL_GRAY};

/// One country's value for the indicator being displayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatEntry {
    pub name: String,
    #[serde(default)]
    pub value: f64,
}

impl HeatEntry {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self { name: name.into(), value }
    }
}

/// Snapshot of one dataset, ready for repeated per-country lookups.
///
/// Built fresh for every dataset; it borrows the entries and keeps nothing
/// across datasets.
#[derive(Debug, Clone)]
pub struct HeatScale<'a> {
    values: HashMap<&'a str, f64>,
    max_heat: f64,
}

impl<'a> HeatScale<'a> {
    pub fn new(entries: &'a [HeatEntry]) -> Self {
        let mut values = HashMap::with_capacity(entries.len());
        for entry in entries {
            // first entry wins on duplicate names
            values.entry(entry.name.as_str()).or_insert(sanitize(entry.value));
        }
        Self { values, max_heat: max_heat(entries) }
    }

    pub fn max_heat(&self) -> f64 {
        self.max_heat
    }

    /// Raw value for `name`; 0 when the dataset has no entry with exactly
    /// that name.
    pub fn value_of(&self, name: &str) -> f64 {
        self.values.get(name).copied().unwrap_or(0.0)
    }

    /// `value / max_heat`, clamped to [0, 1]. 0 when `max_heat` is 0.
    pub fn intensity(&self, name: &str) -> f64 {
        if self.max_heat <= 0.0 {
            return 0.0;
        }
        (self.value_of(name) / self.max_heat).clamp(0.0, 1.0)
    }

    pub fn color(&self, name: &str) -> Rgb {
        if self.max_heat <= 0.0 {
            return NEUTRAL_GRAY;
        }
        Rgb::heat(self.intensity(name))
    }
}

/// Largest finite value in the dataset, or 0 if there is no positive one.
pub fn max_heat(entries: &[HeatEntry]) -> f64 {
    entries
        .iter()
        .map(|e| sanitize(e.value))
        .fold(0.0, f64::max)
}

/// Fill colour for `name` under `entries`.
pub fn heat_color(entries: &[HeatEntry], name: &str) -> Rgb {
    HeatScale::new(entries).color(name)
}

fn sanitize(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> Vec<HeatEntry> {
        vec![HeatEntry::new("Alpha", 50.0), HeatEntry::new("Beta", 100.0)]
    }

    #[test]
    fn intensity_is_relative_to_max() {
        let entries = dataset();
        let scale = HeatScale::new(&entries);
        assert_eq!(scale.max_heat(), 100.0);
        assert_eq!(scale.intensity("Alpha"), 0.5);
        assert_eq!(scale.intensity("Beta"), 1.0);
        assert!(scale.color("Beta").luminance_sum() < scale.color("Alpha").luminance_sum());
    }

    #[test]
    fn empty_dataset_is_gray() {
        let scale = HeatScale::new(&[]);
        assert_eq!(scale.max_heat(), 0.0);
        assert_eq!(scale.color("Anywhere"), NEUTRAL_GRAY);
        assert_eq!(scale.value_of("Anywhere"), 0.0);
    }

    #[test]
    fn zero_max_overrides_lookup() {
        let entries = vec![HeatEntry::new("Gamma", 0.0)];
        assert_eq!(heat_color(&entries, "Gamma"), NEUTRAL_GRAY);
        assert_eq!(heat_color(&entries, "Delta"), NEUTRAL_GRAY);
    }

    #[test]
    fn negative_values_do_not_count_as_max() {
        let entries = vec![HeatEntry::new("Neg", -5.0), HeatEntry::new("Zero", 0.0)];
        assert_eq!(max_heat(&entries), 0.0);
        assert_eq!(heat_color(&entries, "Neg"), NEUTRAL_GRAY);
    }

    #[test]
    fn negative_value_clamps_to_baseline() {
        let entries = vec![HeatEntry::new("Neg", -5.0), HeatEntry::new("Pos", 10.0)];
        let scale = HeatScale::new(&entries);
        assert_eq!(scale.intensity("Neg"), 0.0);
        assert_eq!(scale.color("Neg"), Rgb::heat(0.0));
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let entries = dataset();
        let scale = HeatScale::new(&entries);
        assert_eq!(scale.value_of("alpha"), 0.0);
        assert_eq!(scale.color("alpha"), scale.color("Nowhere"));
    }

    #[test]
    fn first_duplicate_wins() {
        let entries = vec![
            HeatEntry::new("Alpha", 10.0),
            HeatEntry::new("Alpha", 90.0),
            HeatEntry::new("Beta", 100.0),
        ];
        let scale = HeatScale::new(&entries);
        assert_eq!(scale.value_of("Alpha"), 10.0);
        assert_eq!(scale.max_heat(), 100.0);
    }

    #[test]
    fn non_finite_values_count_as_zero() {
        let entries = vec![HeatEntry::new("Inf", f64::INFINITY), HeatEntry::new("Beta", 4.0)];
        let scale = HeatScale::new(&entries);
        assert_eq!(scale.max_heat(), 4.0);
        assert_eq!(scale.value_of("Inf"), 0.0);
    }

    #[test]
    fn missing_value_field_deserializes_as_zero() {
        let entry: HeatEntry = serde_json::from_str(r#"{"name":"Alpha"}"#).unwrap();
        assert_eq!(entry, HeatEntry::new("Alpha", 0.0));
    }
}
