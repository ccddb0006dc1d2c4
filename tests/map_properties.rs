use std::cell::RefCell;

use world_heat_map::{
    color::{Rgb, NEUTRAL_GRAY},
    heat_color, CountryGeometry, GeometryStore, HeatEntry, HeatScale, MapRenderer, PointerEvent,
};

fn strip(names: &[&str]) -> GeometryStore {
    // side-by-side 10x10 squares, no gaps
    GeometryStore::new(
        names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let x = i as f64 * 10.0;
                CountryGeometry::new(*name, format!("M{x},0L{},0L{},10L{x},10Z", x + 10.0, x + 10.0))
            })
            .collect(),
    )
}

#[test]
fn larger_value_is_never_lighter() {
    let entries: Vec<HeatEntry> = (0..50)
        .map(|i| HeatEntry::new(format!("C{i}"), (i * i) as f64 * 0.37))
        .collect();
    let scale = HeatScale::new(&entries);
    for a in &entries {
        for b in &entries {
            if a.value > b.value {
                assert!(scale.intensity(&a.name) >= scale.intensity(&b.name));
                let (ca, cb) = (scale.color(&a.name), scale.color(&b.name));
                assert!(ca.r <= cb.r && ca.g <= cb.g && ca.b <= cb.b, "{} lighter than {}", a.name, b.name);
            }
        }
    }
}

#[test]
fn all_zero_dataset_is_gray_everywhere() {
    let entries = vec![HeatEntry::new("Alpha", 0.0), HeatEntry::new("Beta", 0.0)];
    let geometry = strip(&["Alpha", "Beta", "Gamma"]);
    let map = MapRenderer::new(&geometry, entries);
    assert!(map.scene().iter().all(|s| s.fill == NEUTRAL_GRAY));
}

#[test]
fn unknown_country_matches_explicit_zero() {
    let entries = vec![HeatEntry::new("Zero", 0.0), HeatEntry::new("Some", 40.0)];
    assert_eq!(heat_color(&entries, "Missing"), heat_color(&entries, "Zero"));
    assert_eq!(heat_color(&entries, "Missing"), Rgb::heat(0.0));
}

#[test]
fn at_most_one_country_hovered() {
    let geometry = strip(&["Alpha", "Beta", "Gamma"]);
    let mut map = MapRenderer::new(&geometry, vec![]);
    map.dispatch(PointerEvent::enter("Alpha", 0.0, 0.0));
    map.dispatch(PointerEvent::enter("Beta", 0.0, 0.0));
    map.dispatch(PointerEvent::enter("Gamma", 0.0, 0.0));
    assert_eq!(map.hover(), Some("Gamma"));
    let highlighted: Vec<_> = map
        .scene()
        .into_iter()
        .filter(|s| s.fill == world_heat_map::color::HIGHLIGHT)
        .map(|s| s.name)
        .collect();
    assert_eq!(highlighted, ["Gamma"]);
}

#[test]
fn click_reports_regardless_of_hover() {
    let geometry = strip(&["Alpha", "Beta"]);
    let clicks = RefCell::new(Vec::new());
    let mut map = MapRenderer::new(&geometry, vec![HeatEntry::new("Alpha", 1.0)])
        .on_select(|name| clicks.borrow_mut().push(name.to_string()));

    map.dispatch(PointerEvent::click("Alpha"));
    assert_eq!(map.hover(), None);
    assert!(!map.tooltip().visible);

    map.dispatch(PointerEvent::enter("Beta", 3.0, 4.0));
    let tooltip = map.tooltip().clone();
    map.dispatch(PointerEvent::click("Alpha"));
    assert_eq!(map.hover(), Some("Beta"));
    assert_eq!(map.tooltip(), &tooltip);

    drop(map);
    assert_eq!(clicks.into_inner(), ["Alpha", "Alpha"]);
}

#[test]
fn half_of_max_is_lighter_than_max() {
    let entries = vec![HeatEntry::new("Alpha", 50.0), HeatEntry::new("Beta", 100.0)];
    let scale = HeatScale::new(&entries);
    assert_eq!(scale.max_heat(), 100.0);
    assert_eq!(scale.intensity("Alpha"), 0.5);
    assert_eq!(scale.intensity("Beta"), 1.0);
    assert!(scale.color("Beta").luminance_sum() < scale.color("Alpha").luminance_sum());
}

#[test]
fn empty_dataset_renders_gray_and_tooltip_reads_zero() {
    let geometry = strip(&["Alpha", "Beta"]);
    let mut map = MapRenderer::new(&geometry, vec![]);
    assert_eq!(map.scene().len(), 2);
    assert!(map.scene().iter().all(|s| s.fill == NEUTRAL_GRAY));

    map.pointer_move(15.0, 5.0, 300.0, 200.0);
    assert_eq!(map.hover(), Some("Beta"));
    assert_eq!(map.tooltip().value, 0.0);
    assert_eq!(map.tooltip().text(), "Beta: 0.00");
}

#[test]
fn zero_max_guard_beats_lookup() {
    let geometry = strip(&["Gamma", "Delta"]);
    let map = MapRenderer::new(&geometry, vec![HeatEntry::new("Gamma", 0.0)]);
    let scene = map.scene();
    assert_eq!(scene[0].fill, NEUTRAL_GRAY);
    assert_eq!(scene[1].fill, NEUTRAL_GRAY);
}

#[test]
fn tooltip_is_not_clamped_to_viewport() {
    let geometry = strip(&["Alpha"]);
    let mut map = MapRenderer::new(&geometry, vec![]);
    map.dispatch(PointerEvent::enter("Alpha", 1e6, -50.0));
    assert_eq!(map.tooltip().x, 1e6 + 10.0);
    assert_eq!(map.tooltip().y, -40.0);
}
