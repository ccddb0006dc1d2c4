//! Serializes a rendered scene into a self-contained SVG document.
//!
//! Pure function of its inputs; writing the file is up to the caller.

use std::fmt::Write;

use crate::color::Rgb;
use crate::geometry::{HEIGHT, WIDTH};
use crate::renderer::{Shape, TooltipState};

#[derive(Debug, Clone, Default)]
pub struct SvgOptions<'a> {
    /// Emitted as the document's `<title>`.
    pub title: Option<&'a str>,
    /// Draw the Low/High legend in the bottom-left corner.
    pub legend: bool,
}

pub fn to_svg(shapes: &[Shape], tooltip: &TooltipState, options: &SvgOptions<'_>) -> String {
    let mut s = String::with_capacity(shapes.iter().map(|sh| sh.path_data.len() + 160).sum::<usize>() + 1024);

    // header
    let _ = writeln!(s, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    let _ = writeln!(
        s,
        r##"<svg xmlns="http://www.w3.org/2000/svg" version="1.2" baseProfile="tiny" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}" fill="#ececec" stroke="black" stroke-linecap="round" stroke-linejoin="round" stroke-width=".2">"##
    );
    if let Some(title) = options.title {
        let _ = writeln!(s, "  <title>{}</title>", xml_escape(title));
    }

    // countries, in draw order
    s.push_str("  <g class='countries'>\n");
    for shape in shapes {
        let name = xml_escape(&shape.name);
        let _ = writeln!(
            s,
            "    <path id=\"{name}\" data-name=\"{name}\" d=\"{}\" fill=\"{}\" stroke=\"{}\"><title>{name}: {:.2}</title></path>",
            xml_escape(&shape.path_data),
            shape.fill,
            shape.stroke,
            shape.value,
        );
    }
    s.push_str("  </g>\n");

    if options.legend {
        write_legend(&mut s);
    }

    if tooltip.visible {
        let text = xml_escape(&tooltip.text());
        // rough text width for the monospace label background
        let w = 10.0 + 8.4 * tooltip.text().chars().count() as f64;
        let _ = writeln!(s, "  <g class='tooltip' pointer-events='none' font-family='monospace' font-size='14'>");
        let _ = writeln!(
            s,
            "    <rect x='{:.1}' y='{:.1}' width='{w:.1}' height='26' rx='5' fill='#333' stroke='none'/>",
            tooltip.x, tooltip.y
        );
        let _ = writeln!(
            s,
            "    <text x='{:.1}' y='{:.1}' fill='white' stroke='none'>{text}</text>",
            tooltip.x + 5.0,
            tooltip.y + 18.0
        );
        s.push_str("  </g>\n");
    }

    s.push_str("</svg>\n");
    s
}

fn write_legend(s: &mut String) {
    let lx = 16.0_f64;
    let ly = HEIGHT - 40.0;
    let legend = [(Rgb::heat(0.1), "Low"), (Rgb::heat(0.6), "High")];
    s.push_str("  <g class='legend' font-family='sans-serif' font-size='12' stroke='none'>\n");
    for (i, (color, label)) in legend.iter().enumerate() {
        let x = lx + i as f64 * 70.0;
        let _ = writeln!(s, "    <rect x='{x:.1}' y='{ly:.1}' width='14' height='14' fill='{color}'/>");
        let _ = writeln!(s, "    <text x='{:.1}' y='{:.1}' fill='#333'>{label}</text>", x + 20.0, ly + 12.0);
    }
    s.push_str("  </g>\n");
}

/// Escape the five XML special characters for text and attribute values.
fn xml_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}
