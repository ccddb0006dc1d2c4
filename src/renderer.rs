//! Interactive map: draws every country with its heat colour, tracks which
//! country is under the pointer, positions the tooltip and reports clicks.
//!
//! Pointer handling goes through one delegated entry point,
//! [`MapRenderer::dispatch`], keyed by the country name each shape carries.
//! Hover and tooltip state are plain values rebuilt on every event.

use std::fmt;

use tracing::debug;

use crate::color::{Rgb, BORDER, HIGHLIGHT};
use crate::geometry::GeometryStore;
use crate::heat::{HeatEntry, HeatScale};

/// Distance from the pointer to the tooltip's top-left corner, on both axes.
pub const TOOLTIP_OFFSET: f64 = 10.0;

/// Name of the country under the pointer, if any.
pub type HoverState = Option<String>;

#[derive(Debug, Clone, PartialEq)]
pub struct TooltipState {
    pub visible: bool,
    pub x: f64,
    pub y: f64,
    pub country_name: String,
    pub value: f64,
}

impl TooltipState {
    pub fn hidden() -> Self {
        Self { visible: false, x: 0.0, y: 0.0, country_name: String::new(), value: 0.0 }
    }

    /// Visible tooltip for `country_name`, offset from the pointer's client
    /// position. Not clamped to the viewport.
    pub fn at(client_x: f64, client_y: f64, country_name: &str, value: f64) -> Self {
        Self {
            visible: true,
            x: client_x + TOOLTIP_OFFSET,
            y: client_y + TOOLTIP_OFFSET,
            country_name: country_name.to_string(),
            value: round2(value),
        }
    }

    /// Same tooltip, hidden.
    pub fn hide(&self) -> Self {
        Self { visible: false, ..self.clone() }
    }

    pub fn text(&self) -> String {
        self.to_string()
    }
}

impl Default for TooltipState {
    fn default() -> Self {
        Self::hidden()
    }
}

impl fmt::Display for TooltipState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:.2}", self.country_name, self.value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Enter,
    Leave,
    Click,
}

/// A pointer event on one shape, identified by the country name it carries.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub target: String,
    pub client_x: f64,
    pub client_y: f64,
}

impl PointerEvent {
    pub fn enter(target: impl Into<String>, client_x: f64, client_y: f64) -> Self {
        Self { kind: PointerKind::Enter, target: target.into(), client_x, client_y }
    }

    pub fn leave(target: impl Into<String>) -> Self {
        Self { kind: PointerKind::Leave, target: target.into(), client_x: 0.0, client_y: 0.0 }
    }

    pub fn click(target: impl Into<String>) -> Self {
        Self { kind: PointerKind::Click, target: target.into(), client_x: 0.0, client_y: 0.0 }
    }
}

/// One drawable country in the current frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub name: String,
    pub path_data: String,
    pub fill: Rgb,
    pub stroke: Rgb,
    /// Value shown in this country's tooltip.
    pub value: f64,
}

type SelectCallback<'a> = Box<dyn FnMut(&str) + 'a>;

pub struct MapRenderer<'a> {
    geometry: &'a GeometryStore,
    heat: Vec<HeatEntry>,
    hover: HoverState,
    tooltip: TooltipState,
    on_select: Option<SelectCallback<'a>>,
}

impl<'a> MapRenderer<'a> {
    pub fn new(geometry: &'a GeometryStore, heat: Vec<HeatEntry>) -> Self {
        Self {
            geometry,
            heat,
            hover: None,
            tooltip: TooltipState::hidden(),
            on_select: None,
        }
    }

    /// Register the callback invoked with a country's name when its shape is
    /// clicked. Replaces any previous callback.
    pub fn on_select(mut self, callback: impl FnMut(&str) + 'a) -> Self {
        self.on_select = Some(Box::new(callback));
        self
    }

    /// Replace the dataset wholesale. Hover state is kept.
    pub fn set_heat(&mut self, heat: Vec<HeatEntry>) {
        self.heat = heat;
    }

    pub fn heat(&self) -> &[HeatEntry] {
        &self.heat
    }

    pub fn hover(&self) -> Option<&str> {
        self.hover.as_deref()
    }

    pub fn tooltip(&self) -> &TooltipState {
        &self.tooltip
    }

    pub fn dispatch(&mut self, event: PointerEvent) {
        match event.kind {
            PointerKind::Enter => {
                let value = HeatScale::new(&self.heat).value_of(&event.target);
                debug!(from = ?self.hover, to = %event.target, "hover");
                self.tooltip = TooltipState::at(event.client_x, event.client_y, &event.target, value);
                self.hover = Some(event.target);
            }
            PointerKind::Leave => {
                // a leave for a shape we already moved off is stale
                if self.hover.as_deref() == Some(event.target.as_str()) {
                    debug!(from = %event.target, "hover cleared");
                    self.hover = None;
                    self.tooltip = self.tooltip.hide();
                }
            }
            PointerKind::Click => {
                debug!(country = %event.target, "select");
                if let Some(callback) = self.on_select.as_mut() {
                    callback(&event.target);
                }
            }
        }
    }

    /// Pointer moved to `(scene_x, scene_y)` in view-box coordinates. Emits
    /// at most one enter and one leave, so moving straight from one country
    /// onto its neighbour never passes through the idle state.
    pub fn pointer_move(&mut self, scene_x: f64, scene_y: f64, client_x: f64, client_y: f64) {
        let hit = self.geometry.hit_test(scene_x, scene_y).map(str::to_string);
        match (self.hover.clone(), hit) {
            (Some(current), Some(hit)) if current == hit => {}
            (_, Some(hit)) => self.dispatch(PointerEvent::enter(hit, client_x, client_y)),
            (Some(current), None) => self.dispatch(PointerEvent::leave(current)),
            (None, None) => {}
        }
    }

    /// Click at `(scene_x, scene_y)`; a click over the sea does nothing.
    pub fn click_at(&mut self, scene_x: f64, scene_y: f64) {
        if let Some(hit) = self.geometry.hit_test(scene_x, scene_y).map(str::to_string) {
            self.dispatch(PointerEvent::click(hit));
        }
    }

    /// Every country in draw order with its fill and stroke for this frame.
    pub fn scene(&self) -> Vec<Shape> {
        let scale = HeatScale::new(&self.heat);
        self.geometry
            .iter()
            .map(|country| {
                let hovered = self.hover.as_deref() == Some(country.name.as_str());
                Shape {
                    name: country.name.clone(),
                    path_data: country.path_data.clone(),
                    fill: if hovered { HIGHLIGHT } else { scale.color(&country.name) },
                    stroke: if hovered { HIGHLIGHT } else { BORDER },
                    value: round2(scale.value_of(&country.name)),
                }
            })
            .collect()
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
