//! Axis, legend, plot and title descriptors
//!
//! Descriptors are owned by value: the binding owns its axis descriptors,
//! every aggregate owns its own axis/text descriptors and every aesthetic ref
//! owns its legend descriptor. Transitions copy them, never share them.

use serde::{Deserialize, Serialize};

/// Label/format settings for text rendered on the plot or in a legend
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextFormat {
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub font: Option<String>,
    #[serde(default)]
    pub rotation: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisDescriptor {
    #[serde(default)]
    pub label_color: Option<String>,
    #[serde(default)]
    pub font: Option<String>,
    #[serde(default)]
    pub rotation: Option<f64>,
    #[serde(default = "default_true")]
    pub label_visible: bool,
    #[serde(default = "default_true")]
    pub ticks_visible: bool,
    #[serde(default = "default_true")]
    pub line_visible: bool,
    #[serde(default)]
    pub line_color: Option<String>,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub increment: Option<f64>,
    #[serde(default)]
    pub minor_increment: Option<f64>,
    /// Number/date format of the labels
    #[serde(default)]
    pub format: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Default for AxisDescriptor {
    fn default() -> Self {
        Self {
            label_color: None,
            font: None,
            rotation: None,
            label_visible: true,
            ticks_visible: true,
            line_visible: true,
            line_color: None,
            min: None,
            max: None,
            increment: None,
            minor_increment: None,
            format: None,
        }
    }
}

impl AxisDescriptor {
    /// Copy the style attributes of `other`, keeping this axis' format
    pub fn copy_style_from(&mut self, other: &AxisDescriptor) {
        let format = self.format.take();
        *self = AxisDescriptor {
            format,
            ..other.clone()
        };
    }
}

/// Primary and secondary axis descriptors of a chart
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AxisPair {
    #[serde(default)]
    pub primary: AxisDescriptor,
    #[serde(default)]
    pub secondary: AxisDescriptor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendDescriptor {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default = "default_true")]
    pub title_visible: bool,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub text_format: TextFormat,
}

impl Default for LegendDescriptor {
    fn default() -> Self {
        Self {
            title: None,
            title_visible: true,
            visible: true,
            text_format: TextFormat::default(),
        }
    }
}

/// Shared legend descriptors, one per aesthetic with a legend
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LegendsDescriptor {
    #[serde(default)]
    pub color: LegendDescriptor,
    #[serde(default)]
    pub shape: LegendDescriptor,
    #[serde(default)]
    pub size: LegendDescriptor,
}

/// Alternating background band behind one axis
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BandDescriptor {
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub size: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlotDescriptor {
    #[serde(default)]
    pub values_visible: bool,
    /// Format of value labels drawn on the marks
    #[serde(default)]
    pub text_format: TextFormat,
    #[serde(default)]
    pub x_band: BandDescriptor,
    #[serde(default)]
    pub y_band: BandDescriptor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleDescriptor {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default = "default_true")]
    pub visible: bool,
}

impl Default for TitleDescriptor {
    fn default() -> Self {
        Self {
            text: None,
            visible: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TitlesDescriptor {
    #[serde(default)]
    pub x: TitleDescriptor,
    #[serde(default)]
    pub x2: TitleDescriptor,
    #[serde(default)]
    pub y: TitleDescriptor,
    #[serde(default)]
    pub y2: TitleDescriptor,
}

/// Chart-level descriptor aggregate
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartDescriptor {
    #[serde(default)]
    pub plot: PlotDescriptor,
    #[serde(default)]
    pub legends: LegendsDescriptor,
    #[serde(default)]
    pub titles: TitlesDescriptor,
}
