//! Heat-coloured world map: country outlines, per-country heat colouring,
//! hover/tooltip/click handling and SVG output.

pub mod color;
pub mod geometry;
pub mod heat;
pub mod path;
pub mod renderer;
pub mod svg;
pub mod worldbank;

pub use color::Rgb;
pub use geometry::{CountryGeometry, GeometryStore};
pub use heat::{heat_color, HeatEntry, HeatScale};
pub use renderer::{HoverState, MapRenderer, PointerEvent, PointerKind, Shape, TooltipState};

use tracing_subscriber::EnvFilter;

/// Log to stderr; `RUST_LOG` overrides the default `info` level.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
