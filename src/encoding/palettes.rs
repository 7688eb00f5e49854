//! Named palettes for default visual frames
//!
//! Categorical palettes seed categorical frames, sequential palettes seed the
//! end points of linear color frames, and the symbol/texture/dash lists seed
//! shape-family frames.

use palette::{FromColor, IntoColor, LinSrgb, Mix, Oklab, Srgb};

// =============================================================================
// Categorical Color Palettes
// =============================================================================

/// Tableau 10 - default categorical palette
pub const TABLEAU10: &[&str] = &[
    "#4e79a7", "#f28e2b", "#e15759", "#76b7b2", "#59a14f",
    "#edc948", "#b07aa1", "#ff9da7", "#9c755f", "#bab0ac",
];

/// D3 Category 10
pub const CATEGORY10: &[&str] = &[
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd",
    "#8c564b", "#e377c2", "#7f7f7f", "#bcbd22", "#17becf",
];

/// ColorBrewer Set2
pub const SET2: &[&str] = &[
    "#66c2a5", "#fc8d62", "#8da0cb", "#e78ac3", "#a6d854",
    "#ffd92f", "#e5c494", "#b3b3b3",
];

/// ColorBrewer Dark2
pub const DARK2: &[&str] = &[
    "#1b9e77", "#d95f02", "#7570b3", "#e7298a", "#66a61e",
    "#e6ab02", "#a6761d", "#666666",
];

// =============================================================================
// Sequential Color Palettes
// =============================================================================

/// Blues - default ramp for linear color frames
pub const BLUES: &[&str] = &[
    "#f7fbff", "#deebf7", "#c6dbef", "#9ecae1", "#6baed6",
    "#4292c6", "#2171b5", "#08519c", "#08306b",
];

pub const GREENS: &[&str] = &[
    "#f7fcf5", "#e5f5e0", "#c7e9c0", "#a1d99b", "#74c476",
    "#41ab5d", "#238b45", "#006d2c", "#00441b",
];

pub const REDS: &[&str] = &[
    "#fff5f0", "#fee0d2", "#fcbba1", "#fc9272", "#fb6a4a",
    "#ef3b2c", "#cb181d", "#a50f15", "#67000d",
];

pub const VIRIDIS: &[&str] = &[
    "#440154", "#482878", "#3e4a89", "#31688e", "#26828e",
    "#1f9e89", "#35b779", "#6ece58", "#b5de2b", "#fde725",
];

// =============================================================================
// Shape-family Palettes
// =============================================================================

/// Point symbols
pub const SHAPES: &[&str] = &[
    "circle",
    "square",
    "triangle-up",
    "diamond",
    "cross",
    "triangle-down",
    "star",
    "plus",
];

/// Fill textures for interval marks
pub const TEXTURES: &[&str] = &[
    "solid",
    "left-tilt",
    "right-tilt",
    "horizontal",
    "vertical",
    "grid",
    "crosshatch",
    "dots",
];

/// Line dash styles
pub const LINE_DASHES: &[&str] = &[
    "solid",
    "dashed",
    "dotted",
    "dash-dot",
    "long-dash",
    "long-dash-dot",
];

/// Sizes handed out by a categorical size frame
pub const SIZE_STEPS: &[f64] = &[6.0, 10.0, 14.0, 18.0, 22.0];

// =============================================================================
// Lookup Functions
// =============================================================================

/// Look up a color palette by name (case insensitive).
pub fn get_color_palette(name: &str) -> Option<&'static [&'static str]> {
    match name.to_lowercase().as_str() {
        "tableau10" | "tableau" => Some(TABLEAU10),
        "category10" => Some(CATEGORY10),
        "set2" => Some(SET2),
        "dark2" => Some(DARK2),
        "blues" => Some(BLUES),
        "greens" => Some(GREENS),
        "reds" => Some(REDS),
        "viridis" => Some(VIRIDIS),
        _ => None,
    }
}

pub fn default_color_palette() -> &'static [&'static str] {
    TABLEAU10
}

// =============================================================================
// Color Utilities
// =============================================================================

/// Convert any CSS color (named, hex, rgb(), hsl(), ...) to hex.
pub fn color_to_hex(value: &str) -> Result<String, String> {
    csscolorparser::parse(value)
        .map(|c| c.to_css_hex())
        .map_err(|e| format!("Invalid color '{}': {}", value, e))
}

/// `count` evenly spaced colors from `start` to `end`, interpolated in Oklab.
///
/// The end points are returned exactly as given (normalized to hex).
pub fn gradient(start: &str, end: &str, count: usize) -> Result<Vec<String>, String> {
    let first = color_to_hex(start)?;
    let last = color_to_hex(end)?;

    match count {
        0 => return Ok(vec![]),
        1 => return Ok(vec![first]),
        _ => {}
    }

    let from = Oklab::from_color(parse_to_srgb(start)?.into_linear::<f32>());
    let to = Oklab::from_color(parse_to_srgb(end)?.into_linear::<f32>());

    let mut colors: Vec<String> = (0..count)
        .map(|i| {
            let t = i as f32 / (count - 1) as f32;
            let lin: LinSrgb<f32> = from.mix(to, t).into_color();
            srgb_to_hex(&Srgb::from_linear(lin))
        })
        .collect();

    colors[0] = first;
    colors[count - 1] = last;
    Ok(colors)
}

fn parse_to_srgb(color: &str) -> Result<Srgb<f32>, String> {
    let parsed =
        csscolorparser::parse(color).map_err(|e| format!("Invalid color '{}': {}", color, e))?;
    Ok(Srgb::new(parsed.r as f32, parsed.g as f32, parsed.b as f32))
}

fn srgb_to_hex(color: &Srgb<f32>) -> String {
    let r = (color.red.clamp(0.0, 1.0) * 255.0).round() as u8;
    let g = (color.green.clamp(0.0, 1.0) * 255.0).round() as u8;
    let b = (color.blue.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_color_palette() {
        assert!(get_color_palette("blues").is_some());
        assert!(get_color_palette("BLUES").is_some());
        assert_eq!(get_color_palette("tableau"), Some(TABLEAU10));
        assert!(get_color_palette("nonexistent").is_none());
    }

    #[test]
    fn test_color_to_hex() {
        assert_eq!(color_to_hex("red").unwrap(), "#ff0000");
        assert_eq!(color_to_hex("#00F").unwrap(), "#0000ff");
        assert!(color_to_hex("notacolor").unwrap_err().contains("Invalid color"));
    }

    #[test]
    fn test_gradient_keeps_end_points() {
        let colors = gradient("white", "black", 3).unwrap();
        assert_eq!(colors.len(), 3);
        assert_eq!(colors[0], "#ffffff");
        assert_eq!(colors[2], "#000000");
        assert_ne!(colors[1], "#ffffff");
        assert_ne!(colors[1], "#000000");
    }

    #[test]
    fn test_gradient_small_counts() {
        assert!(gradient("red", "blue", 0).unwrap().is_empty());
        assert_eq!(gradient("red", "blue", 1).unwrap(), vec!["#ff0000"]);
        assert_eq!(gradient("red", "blue", 2).unwrap(), vec!["#ff0000", "#0000ff"]);
    }

    #[test]
    fn test_gradient_invalid_color() {
        assert!(gradient("red", "notacolor", 4).is_err());
    }
}
