//! Visual frames
//!
//! A visual frame maps a field's values onto a visual property. Frames are a
//! kind (static single value, categorical palette, linear ramp) crossed with a
//! channel (color, shape, size, texture, line, text).

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::encoding::palettes;

/// Nominal size of a freshly created static size frame
pub const DEFAULT_SIZE: f64 = 6.0;

/// Min/max of a freshly created linear size frame
pub const DEFAULT_SIZE_RANGE: (f64, f64) = (1.0, 30.0);

/// Visual property a frame drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameChannel {
    Color,
    Shape,
    Size,
    Texture,
    Line,
    Text,
}

/// Categorical/continuous kind of a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameKind {
    Static,
    Categorical,
    Linear,
}

/// Single frame value: a size/width or a named color/shape/texture/dash
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FrameValue {
    Number(f64),
    Name(String),
}

impl FrameValue {
    pub fn name(value: &str) -> Self {
        FrameValue::Name(value.to_string())
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FrameValue::Number(n) => Some(*n),
            FrameValue::Name(_) => None,
        }
    }

    pub fn as_name(&self) -> Option<&str> {
        match self {
            FrameValue::Name(s) => Some(s),
            FrameValue::Number(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum VisualFrame {
    Static {
        channel: FrameChannel,
        value: FrameValue,
    },
    Categorical {
        channel: FrameChannel,
        values: Vec<FrameValue>,
    },
    Linear {
        channel: FrameChannel,
        from: FrameValue,
        to: FrameValue,
    },
}

impl VisualFrame {
    pub fn channel(&self) -> FrameChannel {
        match self {
            VisualFrame::Static { channel, .. }
            | VisualFrame::Categorical { channel, .. }
            | VisualFrame::Linear { channel, .. } => *channel,
        }
    }

    pub fn kind(&self) -> FrameKind {
        match self {
            VisualFrame::Static { .. } => FrameKind::Static,
            VisualFrame::Categorical { .. } => FrameKind::Categorical,
            VisualFrame::Linear { .. } => FrameKind::Linear,
        }
    }

    pub fn is_categorical(&self) -> bool {
        self.kind() == FrameKind::Categorical
    }

    pub fn is_linear(&self) -> bool {
        self.kind() == FrameKind::Linear
    }

    /// Build the default frame of a channel and kind.
    ///
    /// Text frames are always static: labels carry no palette.
    pub fn default_for(channel: FrameChannel, kind: FrameKind, config: &EngineConfig) -> Self {
        match (channel, kind) {
            (FrameChannel::Text, _) | (_, FrameKind::Static) => Self::static_default(channel, config),
            (_, FrameKind::Categorical) => VisualFrame::Categorical {
                channel,
                values: categorical_values(channel, config),
            },
            (_, FrameKind::Linear) => {
                let (from, to) = linear_bounds(channel, config);
                VisualFrame::Linear { channel, from, to }
            }
        }
    }

    pub fn static_default(channel: FrameChannel, config: &EngineConfig) -> Self {
        let value = match channel {
            FrameChannel::Color => FrameValue::name(&config.static_color),
            FrameChannel::Shape => FrameValue::name(&config.static_shape),
            FrameChannel::Size => FrameValue::Number(DEFAULT_SIZE),
            FrameChannel::Texture => FrameValue::name(&config.static_texture),
            FrameChannel::Line => FrameValue::name(&config.static_line),
            FrameChannel::Text => FrameValue::name(""),
        };
        VisualFrame::Static { channel, value }
    }

    /// Min/max of a linear size frame, or the nominal size of a static one
    pub fn size_range(&self) -> Option<(f64, f64)> {
        match self {
            VisualFrame::Linear {
                channel: FrameChannel::Size,
                from,
                to,
            } => Some((from.as_number()?, to.as_number()?)),
            VisualFrame::Static {
                channel: FrameChannel::Size,
                value,
            } => value.as_number().map(|n| (n, n)),
            _ => None,
        }
    }

    /// Sample `count` colors from a color frame.
    ///
    /// Linear frames interpolate between their end points, categorical frames
    /// cycle through their palette and static frames repeat their color.
    pub fn sample_colors(&self, count: usize) -> Result<Vec<String>, String> {
        if self.channel() != FrameChannel::Color {
            return Err(format!("{:?} frame has no colors", self.channel()));
        }

        match self {
            VisualFrame::Linear { from, to, .. } => {
                let start = from.as_name().ok_or("Linear color start is not a color")?;
                let end = to.as_name().ok_or("Linear color end is not a color")?;
                palettes::gradient(start, end, count)
            }
            VisualFrame::Categorical { values, .. } => {
                let names: Vec<&str> = values.iter().filter_map(|v| v.as_name()).collect();
                if names.is_empty() {
                    return Err("Categorical color frame has no colors".to_string());
                }
                names
                    .iter()
                    .cycle()
                    .take(count)
                    .map(|c| palettes::color_to_hex(c))
                    .collect()
            }
            VisualFrame::Static { value, .. } => {
                let color = value.as_name().ok_or("Static color is not a color")?;
                Ok(vec![palettes::color_to_hex(color)?; count])
            }
        }
    }
}

fn categorical_values(channel: FrameChannel, config: &EngineConfig) -> Vec<FrameValue> {
    match channel {
        FrameChannel::Color => palettes::get_color_palette(&config.categorical_palette)
            .unwrap_or_else(palettes::default_color_palette)
            .iter()
            .map(|c| FrameValue::name(c))
            .collect(),
        FrameChannel::Shape => names(palettes::SHAPES),
        FrameChannel::Texture => names(palettes::TEXTURES),
        FrameChannel::Line => names(palettes::LINE_DASHES),
        FrameChannel::Size => palettes::SIZE_STEPS
            .iter()
            .map(|s| FrameValue::Number(*s))
            .collect(),
        FrameChannel::Text => Vec::new(),
    }
}

fn linear_bounds(channel: FrameChannel, config: &EngineConfig) -> (FrameValue, FrameValue) {
    match channel {
        FrameChannel::Color => {
            let ramp = palettes::get_color_palette(&config.sequential_palette)
                .unwrap_or(palettes::BLUES);
            let first = ramp.first().copied().unwrap_or("#f7fbff");
            let last = ramp.last().copied().unwrap_or("#08306b");
            (FrameValue::name(first), FrameValue::name(last))
        }
        FrameChannel::Shape => (FrameValue::name("empty"), FrameValue::name("filled")),
        FrameChannel::Texture => (FrameValue::name("sparse"), FrameValue::name("dense")),
        FrameChannel::Line => (FrameValue::Number(1.0), FrameValue::Number(4.0)),
        FrameChannel::Size => {
            let (min, max) = DEFAULT_SIZE_RANGE;
            (FrameValue::Number(min), FrameValue::Number(max))
        }
        FrameChannel::Text => (FrameValue::name(""), FrameValue::name("")),
    }
}

fn names(values: &[&str]) -> Vec<FrameValue> {
    values.iter().map(|v| FrameValue::name(v)).collect()
}

/// Frames used when no field is bound to the color/shape/size aesthetic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticFrames {
    pub color: VisualFrame,
    /// Shape, texture or line frame depending on the chart type
    pub shape: VisualFrame,
    pub size: VisualFrame,
}

impl Default for StaticFrames {
    fn default() -> Self {
        let config = EngineConfig::default();
        Self {
            color: VisualFrame::static_default(FrameChannel::Color, &config),
            shape: VisualFrame::static_default(FrameChannel::Shape, &config),
            size: VisualFrame::static_default(FrameChannel::Size, &config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_for_kinds() {
        let config = EngineConfig::default();

        let cat = VisualFrame::default_for(FrameChannel::Color, FrameKind::Categorical, &config);
        assert!(cat.is_categorical());
        assert_eq!(cat.channel(), FrameChannel::Color);

        let lin = VisualFrame::default_for(FrameChannel::Size, FrameKind::Linear, &config);
        assert!(lin.is_linear());
        assert_eq!(lin.size_range(), Some((1.0, 30.0)));

        let text = VisualFrame::default_for(FrameChannel::Text, FrameKind::Categorical, &config);
        assert_eq!(text.kind(), FrameKind::Static);
    }

    #[test]
    fn test_linear_color_defaults_to_blue_ramp() {
        let config = EngineConfig::default();
        let frame = VisualFrame::default_for(FrameChannel::Color, FrameKind::Linear, &config);
        match frame {
            VisualFrame::Linear { from, to, .. } => {
                assert_eq!(from, FrameValue::name("#f7fbff"));
                assert_eq!(to, FrameValue::name("#08306b"));
            }
            other => panic!("expected linear frame, got {:?}", other),
        }
    }

    #[test]
    fn test_sample_colors() {
        let config = EngineConfig::default();

        let lin = VisualFrame::default_for(FrameChannel::Color, FrameKind::Linear, &config);
        let ramp = lin.sample_colors(5).unwrap();
        assert_eq!(ramp.len(), 5);
        assert_eq!(ramp[0], "#f7fbff");
        assert_eq!(ramp[4], "#08306b");

        let cat = VisualFrame::default_for(FrameChannel::Color, FrameKind::Categorical, &config);
        let colors = cat.sample_colors(12).unwrap();
        assert_eq!(colors.len(), 12);
        assert_eq!(colors[0], colors[10]);

        let shape = VisualFrame::static_default(FrameChannel::Shape, &config);
        assert!(shape.sample_colors(2).is_err());
    }

    #[test]
    fn test_frame_serialization() {
        let frame = VisualFrame::Linear {
            channel: FrameChannel::Size,
            from: FrameValue::Number(1.0),
            to: FrameValue::Number(15.0),
        };
        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["kind"], "linear");
        assert_eq!(json["channel"], "size");
        assert_eq!(json["to"], 15.0);

        let back: VisualFrame = serde_json::from_value(json).unwrap();
        assert_eq!(back, frame);
    }
}
