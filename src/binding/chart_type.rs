//! Chart type table
//!
//! Every chart type the engine knows about, together with the capability
//! flags the transition rules dispatch on.
//!
//! # Families
//!
//! Simple types share the generic X/Y/Group topology. The remaining types are
//! grouped into "merged" families whose channel topology differs structurally
//! (hierarchy levels, source/target pairs, start/end dates, geo channels, ...).
//! Moving between families redistributes fields; moving inside a family only
//! changes the type code.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::aesthetic::AestheticSlot;
use crate::ChartError;

/// Enum of all chart types for pattern matching and serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartType {
    /// Resolved from the bound fields (bar with measures, point without)
    #[default]
    Auto,
    Bar,
    Line,
    Area,
    Point,
    Step,
    StepArea,
    Jump,
    Interval,
    Pie,
    Donut,
    Waterfall,
    Pareto,
    Radar,
    FilledRadar,
    Stock,
    Candle,
    Boxplot,
    Map,
    Treemap,
    Sunburst,
    CirclePacking,
    Icicle,
    Mekko,
    Tree,
    Network,
    CircularNetwork,
    Gantt,
    Funnel,
    Contour,
}

/// Channel topology shared by a group of chart types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartFamily {
    /// Generic X/Y/Group axis charts
    Simple,
    /// Hierarchy charts (treemap, sunburst, circle packing, icicle)
    Treemap,
    Mekko,
    /// Network and tree charts with source/target slots
    Relation,
    Gantt,
    /// Candle and stock charts with high/low/open/close slots
    Stock,
    Radar,
    Map,
    Funnel,
    Contour,
    Boxplot,
}

/// Concrete binding-model variant required by a chart type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantKind {
    Generic,
    Map,
    Relation,
    Gantt,
    Stock,
    Radar,
}

pub const ALL_CHART_TYPES: &[ChartType] = &[
    ChartType::Auto,
    ChartType::Bar,
    ChartType::Line,
    ChartType::Area,
    ChartType::Point,
    ChartType::Step,
    ChartType::StepArea,
    ChartType::Jump,
    ChartType::Interval,
    ChartType::Pie,
    ChartType::Donut,
    ChartType::Waterfall,
    ChartType::Pareto,
    ChartType::Radar,
    ChartType::FilledRadar,
    ChartType::Stock,
    ChartType::Candle,
    ChartType::Boxplot,
    ChartType::Map,
    ChartType::Treemap,
    ChartType::Sunburst,
    ChartType::CirclePacking,
    ChartType::Icicle,
    ChartType::Mekko,
    ChartType::Tree,
    ChartType::Network,
    ChartType::CircularNetwork,
    ChartType::Gantt,
    ChartType::Funnel,
    ChartType::Contour,
];

impl ChartType {
    /// Canonical name for parsing and display
    pub fn name(self) -> &'static str {
        match self {
            ChartType::Auto => "auto",
            ChartType::Bar => "bar",
            ChartType::Line => "line",
            ChartType::Area => "area",
            ChartType::Point => "point",
            ChartType::Step => "step",
            ChartType::StepArea => "step_area",
            ChartType::Jump => "jump",
            ChartType::Interval => "interval",
            ChartType::Pie => "pie",
            ChartType::Donut => "donut",
            ChartType::Waterfall => "waterfall",
            ChartType::Pareto => "pareto",
            ChartType::Radar => "radar",
            ChartType::FilledRadar => "filled_radar",
            ChartType::Stock => "stock",
            ChartType::Candle => "candle",
            ChartType::Boxplot => "boxplot",
            ChartType::Map => "map",
            ChartType::Treemap => "treemap",
            ChartType::Sunburst => "sunburst",
            ChartType::CirclePacking => "circle_packing",
            ChartType::Icicle => "icicle",
            ChartType::Mekko => "mekko",
            ChartType::Tree => "tree",
            ChartType::Network => "network",
            ChartType::CircularNetwork => "circular_network",
            ChartType::Gantt => "gantt",
            ChartType::Funnel => "funnel",
            ChartType::Contour => "contour",
        }
    }

    pub fn family(self) -> ChartFamily {
        match self {
            ChartType::Treemap | ChartType::Sunburst | ChartType::CirclePacking | ChartType::Icicle => {
                ChartFamily::Treemap
            }
            ChartType::Mekko => ChartFamily::Mekko,
            ChartType::Tree | ChartType::Network | ChartType::CircularNetwork => {
                ChartFamily::Relation
            }
            ChartType::Gantt => ChartFamily::Gantt,
            ChartType::Stock | ChartType::Candle => ChartFamily::Stock,
            ChartType::Radar | ChartType::FilledRadar => ChartFamily::Radar,
            ChartType::Map => ChartFamily::Map,
            ChartType::Funnel => ChartFamily::Funnel,
            ChartType::Contour => ChartFamily::Contour,
            ChartType::Boxplot => ChartFamily::Boxplot,
            _ => ChartFamily::Simple,
        }
    }

    /// Whether the type belongs to a family with its own channel topology
    pub fn is_merged(self) -> bool {
        self.family() != ChartFamily::Simple
    }

    pub fn is_pie(self) -> bool {
        matches!(self, ChartType::Pie | ChartType::Donut)
    }

    /// Resolve `Auto` against whether any measure is bound to an axis
    pub fn resolve(self, has_axis_measure: bool) -> ChartType {
        match self {
            ChartType::Auto if has_axis_measure => ChartType::Bar,
            ChartType::Auto => ChartType::Point,
            other => other,
        }
    }

    pub fn supports_point(self) -> bool {
        matches!(
            self,
            ChartType::Auto | ChartType::Point | ChartType::Map | ChartType::Contour
        )
    }

    pub fn supports_line(self) -> bool {
        matches!(
            self,
            ChartType::Line | ChartType::Step | ChartType::Jump | ChartType::Radar
        )
    }

    pub fn supports_texture(self) -> bool {
        matches!(
            self,
            ChartType::Bar
                | ChartType::Interval
                | ChartType::Pie
                | ChartType::Donut
                | ChartType::Waterfall
                | ChartType::Pareto
                | ChartType::Area
                | ChartType::StepArea
                | ChartType::FilledRadar
                | ChartType::Treemap
                | ChartType::Sunburst
                | ChartType::CirclePacking
                | ChartType::Icicle
                | ChartType::Mekko
                | ChartType::Funnel
                | ChartType::Boxplot
                | ChartType::Gantt
        )
    }

    /// Whether a measure may sit on the X axis (horizontal rendering)
    pub fn supports_inverted(self) -> bool {
        matches!(
            self,
            ChartType::Auto
                | ChartType::Bar
                | ChartType::Line
                | ChartType::Area
                | ChartType::Point
                | ChartType::Step
                | ChartType::StepArea
                | ChartType::Jump
                | ChartType::Interval
                | ChartType::Waterfall
                | ChartType::Boxplot
                | ChartType::Funnel
                | ChartType::Contour
        )
    }

    /// Whether a dimension bound to the aesthetic slot can still be rendered
    pub fn supports_aesthetic_dimension(self, slot: AestheticSlot) -> bool {
        let family = self.family();
        match slot {
            AestheticSlot::Text => true,
            AestheticSlot::Color => family != ChartFamily::Contour,
            AestheticSlot::Shape => !matches!(
                family,
                ChartFamily::Treemap
                    | ChartFamily::Mekko
                    | ChartFamily::Funnel
                    | ChartFamily::Contour
                    | ChartFamily::Relation
                    | ChartFamily::Gantt
                    | ChartFamily::Boxplot
            ),
            AestheticSlot::Size => !matches!(
                family,
                ChartFamily::Treemap
                    | ChartFamily::Mekko
                    | ChartFamily::Funnel
                    | ChartFamily::Contour
            ),
        }
    }

    pub fn supports_named_group(self) -> bool {
        !matches!(
            self.family(),
            ChartFamily::Boxplot | ChartFamily::Gantt | ChartFamily::Relation
        )
    }

    /// Stacked single-series types carry at most one measure
    pub fn is_single_measure(self, multi_style: bool) -> bool {
        match self {
            ChartType::Waterfall => true,
            ChartType::Pie | ChartType::Donut => !multi_style,
            _ => false,
        }
    }

    /// Maximum number of fields on Y when fields are returned from a
    /// family-specific slot; `None` is unlimited
    pub fn max_y_fields(self) -> Option<usize> {
        match self.family() {
            ChartFamily::Funnel
            | ChartFamily::Treemap
            | ChartFamily::Relation
            | ChartFamily::Stock
            | ChartFamily::Map => Some(0),
            ChartFamily::Mekko => Some(1),
            _ if self == ChartType::Waterfall => Some(1),
            _ => None,
        }
    }

    pub fn variant_kind(self) -> VariantKind {
        match self.family() {
            ChartFamily::Map => VariantKind::Map,
            ChartFamily::Relation => VariantKind::Relation,
            ChartFamily::Gantt => VariantKind::Gantt,
            ChartFamily::Stock => VariantKind::Stock,
            ChartFamily::Radar => VariantKind::Radar,
            _ => VariantKind::Generic,
        }
    }
}

impl ChartFamily {
    pub fn is_merged(self) -> bool {
        self != ChartFamily::Simple
    }
}

impl std::fmt::Display for ChartType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::fmt::Display for ChartFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ChartFamily::Simple => "simple",
            ChartFamily::Treemap => "treemap",
            ChartFamily::Mekko => "mekko",
            ChartFamily::Relation => "relation",
            ChartFamily::Gantt => "gantt",
            ChartFamily::Stock => "stock",
            ChartFamily::Radar => "radar",
            ChartFamily::Map => "map",
            ChartFamily::Funnel => "funnel",
            ChartFamily::Contour => "contour",
            ChartFamily::Boxplot => "boxplot",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for ChartType {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        ALL_CHART_TYPES
            .iter()
            .copied()
            .find(|t| t.name() == normalized)
            .ok_or_else(|| ChartError::ParseError(format!("Unknown chart type '{}'", s)))
    }
}
