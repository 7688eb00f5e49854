//! Chart binding root
//!
//! [`ChartBinding`] owns every channel sequence, the chart-level aesthetics and
//! frames, and a [`BindingVariant`] payload carrying the family-specific slots
//! (geo fields, source/target, start/end/milestone, high/low/open/close).

use serde::{Deserialize, Serialize};

use super::aesthetic::Aesthetics;
use super::chart_type::{ChartType, VariantKind};
use super::descriptor::AxisPair;
use super::field::{AggregateRef, ChartFieldRef};
use super::frame::StaticFrames;

/// Axis-like channel holding an ordered field sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    X,
    Y,
    Group,
}

/// Family-specific payload of a binding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BindingVariant {
    Generic,
    Map {
        #[serde(default)]
        geo_fields: Vec<ChartFieldRef>,
    },
    Relation {
        #[serde(default)]
        source: Option<ChartFieldRef>,
        #[serde(default)]
        target: Option<ChartFieldRef>,
    },
    Gantt {
        #[serde(default)]
        start: Option<ChartFieldRef>,
        #[serde(default)]
        end: Option<ChartFieldRef>,
        #[serde(default)]
        milestone: Option<ChartFieldRef>,
    },
    Stock {
        #[serde(default)]
        high: Option<ChartFieldRef>,
        #[serde(default)]
        low: Option<ChartFieldRef>,
        #[serde(default)]
        open: Option<ChartFieldRef>,
        #[serde(default)]
        close: Option<ChartFieldRef>,
    },
    Radar,
}

impl BindingVariant {
    pub fn empty(kind: VariantKind) -> Self {
        match kind {
            VariantKind::Generic => BindingVariant::Generic,
            VariantKind::Map => BindingVariant::Map {
                geo_fields: Vec::new(),
            },
            VariantKind::Relation => BindingVariant::Relation {
                source: None,
                target: None,
            },
            VariantKind::Gantt => BindingVariant::Gantt {
                start: None,
                end: None,
                milestone: None,
            },
            VariantKind::Stock => BindingVariant::Stock {
                high: None,
                low: None,
                open: None,
                close: None,
            },
            VariantKind::Radar => BindingVariant::Radar,
        }
    }

    pub fn kind(&self) -> VariantKind {
        match self {
            BindingVariant::Generic => VariantKind::Generic,
            BindingVariant::Map { .. } => VariantKind::Map,
            BindingVariant::Relation { .. } => VariantKind::Relation,
            BindingVariant::Gantt { .. } => VariantKind::Gantt,
            BindingVariant::Stock { .. } => VariantKind::Stock,
            BindingVariant::Radar => VariantKind::Radar,
        }
    }

    /// Family slots in declaration order (geo fields for maps)
    pub fn fields(&self) -> Vec<&ChartFieldRef> {
        match self {
            BindingVariant::Generic | BindingVariant::Radar => Vec::new(),
            BindingVariant::Map { geo_fields } => geo_fields.iter().collect(),
            BindingVariant::Relation { source, target } => {
                [source, target].into_iter().flatten().collect()
            }
            BindingVariant::Gantt {
                start,
                end,
                milestone,
            } => [start, end, milestone].into_iter().flatten().collect(),
            BindingVariant::Stock {
                high,
                low,
                open,
                close,
            } => [close, high, low, open].into_iter().flatten().collect(),
        }
    }

    pub fn fields_mut(&mut self) -> Vec<&mut ChartFieldRef> {
        match self {
            BindingVariant::Generic | BindingVariant::Radar => Vec::new(),
            BindingVariant::Map { geo_fields } => geo_fields.iter_mut().collect(),
            BindingVariant::Relation { source, target } => {
                [source, target].into_iter().flatten().collect()
            }
            BindingVariant::Gantt {
                start,
                end,
                milestone,
            } => [start, end, milestone].into_iter().flatten().collect(),
            BindingVariant::Stock {
                high,
                low,
                open,
                close,
            } => [close, high, low, open].into_iter().flatten().collect(),
        }
    }

    /// Remove and return every slotted field, in slot order
    pub fn take_fields(&mut self) -> Vec<ChartFieldRef> {
        match self {
            BindingVariant::Generic | BindingVariant::Radar => Vec::new(),
            BindingVariant::Map { geo_fields } => std::mem::take(geo_fields),
            BindingVariant::Relation { source, target } => {
                [source.take(), target.take()].into_iter().flatten().collect()
            }
            BindingVariant::Gantt {
                start,
                end,
                milestone,
            } => [start.take(), end.take(), milestone.take()]
                .into_iter()
                .flatten()
                .collect(),
            BindingVariant::Stock {
                high,
                low,
                open,
                close,
            } => [close.take(), high.take(), low.take(), open.take()]
                .into_iter()
                .flatten()
                .collect(),
        }
    }
}

impl Default for BindingVariant {
    fn default() -> Self {
        BindingVariant::Generic
    }
}

/// Conditional highlight carried over only between merged chart types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    pub name: String,
    pub condition: String,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartBinding {
    #[serde(default)]
    pub chart_type: ChartType,
    #[serde(default)]
    pub x_fields: Vec<ChartFieldRef>,
    #[serde(default)]
    pub y_fields: Vec<ChartFieldRef>,
    #[serde(default)]
    pub group_fields: Vec<ChartFieldRef>,
    #[serde(default)]
    pub aesthetics: Aesthetics,
    /// Frames used when the matching aesthetic is unbound
    #[serde(default)]
    pub frames: StaticFrames,
    /// One axis per measure instead of a shared axis
    #[serde(default = "default_separated")]
    pub separated: bool,
    /// Each measure renders with its own chart type and aesthetics
    #[serde(default)]
    pub multi_style: bool,
    #[serde(default)]
    pub axis: AxisPair,
    /// User tooltip template; `{i}` refers to the i-th axis field
    #[serde(default)]
    pub tooltip: Option<String>,
    #[serde(default)]
    pub highlights: Vec<Highlight>,
    #[serde(default)]
    pub hyperlink: Option<String>,
    #[serde(default)]
    pub variant: BindingVariant,
}

fn default_separated() -> bool {
    true
}

impl Default for ChartBinding {
    fn default() -> Self {
        Self::new(ChartType::Auto)
    }
}

fn visit_field(field: &ChartFieldRef, f: &mut dyn FnMut(&ChartFieldRef)) {
    f(field);
    if let ChartFieldRef::Aggregate(agg) = field {
        for (_, aesthetic) in agg.aesthetics.iter() {
            visit_field(&aesthetic.field, f);
        }
    }
}

fn visit_field_mut(field: &mut ChartFieldRef, f: &mut dyn FnMut(&mut ChartFieldRef)) {
    f(field);
    if let ChartFieldRef::Aggregate(agg) = field {
        for aesthetic in agg.aesthetics.iter_mut() {
            visit_field_mut(&mut aesthetic.field, f);
        }
    }
}

impl ChartBinding {
    pub fn new(chart_type: ChartType) -> Self {
        Self {
            chart_type,
            x_fields: Vec::new(),
            y_fields: Vec::new(),
            group_fields: Vec::new(),
            aesthetics: Aesthetics::default(),
            frames: StaticFrames::default(),
            separated: true,
            multi_style: false,
            axis: AxisPair::default(),
            tooltip: None,
            highlights: Vec::new(),
            hyperlink: None,
            variant: BindingVariant::empty(chart_type.variant_kind()),
        }
    }

    pub fn with_x(mut self, field: impl Into<ChartFieldRef>) -> Self {
        self.x_fields.push(field.into());
        self
    }

    pub fn with_y(mut self, field: impl Into<ChartFieldRef>) -> Self {
        self.y_fields.push(field.into());
        self
    }

    pub fn with_group(mut self, field: impl Into<ChartFieldRef>) -> Self {
        self.group_fields.push(field.into());
        self
    }

    pub fn channel(&self, channel: Channel) -> &Vec<ChartFieldRef> {
        match channel {
            Channel::X => &self.x_fields,
            Channel::Y => &self.y_fields,
            Channel::Group => &self.group_fields,
        }
    }

    pub fn channel_mut(&mut self, channel: Channel) -> &mut Vec<ChartFieldRef> {
        match channel {
            Channel::X => &mut self.x_fields,
            Channel::Y => &mut self.y_fields,
            Channel::Group => &mut self.group_fields,
        }
    }

    /// X fields followed by Y fields
    pub fn axis_fields(&self) -> impl Iterator<Item = &ChartFieldRef> {
        self.x_fields.iter().chain(self.y_fields.iter())
    }

    pub fn axis_aggregates(&self) -> impl Iterator<Item = &AggregateRef> {
        self.axis_fields().filter_map(|f| f.as_aggregate())
    }

    pub fn axis_aggregates_mut(&mut self) -> impl Iterator<Item = &mut AggregateRef> {
        self.x_fields
            .iter_mut()
            .chain(self.y_fields.iter_mut())
            .filter_map(|f| f.as_aggregate_mut())
    }

    pub fn has_axis_measure(&self) -> bool {
        self.axis_fields().any(|f| f.is_measure())
    }

    /// Chart-level type with `Auto` resolved
    pub fn resolved_type(&self) -> ChartType {
        self.chart_type.resolve(self.has_axis_measure())
    }

    /// Type a series actually renders with
    pub fn effective_type(&self, aggregate: &AggregateRef) -> ChartType {
        if self.multi_style && aggregate.chart_type != ChartType::Auto {
            aggregate.chart_type
        } else {
            self.resolved_type()
        }
    }

    pub fn geo_fields(&self) -> &[ChartFieldRef] {
        match &self.variant {
            BindingVariant::Map { geo_fields } => geo_fields,
            _ => &[],
        }
    }

    pub fn geo_fields_mut(&mut self) -> Option<&mut Vec<ChartFieldRef>> {
        match &mut self.variant {
            BindingVariant::Map { geo_fields } => Some(geo_fields),
            _ => None,
        }
    }

    /// Visit every field of the binding: channels, aesthetics, family slots
    /// and the per-series aesthetics nested inside aggregates
    pub fn for_each_field(&self, f: &mut dyn FnMut(&ChartFieldRef)) {
        for field in self
            .x_fields
            .iter()
            .chain(self.y_fields.iter())
            .chain(self.group_fields.iter())
        {
            visit_field(field, f);
        }
        for (_, aesthetic) in self.aesthetics.iter() {
            visit_field(&aesthetic.field, f);
        }
        for field in self.variant.fields() {
            visit_field(field, f);
        }
    }

    pub fn for_each_field_mut(&mut self, f: &mut dyn FnMut(&mut ChartFieldRef)) {
        for field in self
            .x_fields
            .iter_mut()
            .chain(self.y_fields.iter_mut())
            .chain(self.group_fields.iter_mut())
        {
            visit_field_mut(field, f);
        }
        for aesthetic in self.aesthetics.iter_mut() {
            visit_field_mut(&mut aesthetic.field, f);
        }
        for field in self.variant.fields_mut() {
            visit_field_mut(field, f);
        }
    }

    /// Full names of every bound dimension, deduplicated, in visit order
    pub fn dimension_names(&self) -> Vec<String> {
        self.collect_names(|f| f.is_dimension())
    }

    /// Full names of every bound aggregate, deduplicated, in visit order
    pub fn aggregate_names(&self) -> Vec<String> {
        self.collect_names(|f| f.is_measure())
    }

    fn collect_names(&self, keep: impl Fn(&ChartFieldRef) -> bool) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        self.for_each_field(&mut |field| {
            if keep(field) {
                let name = field.full_name();
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        });
        names
    }

    /// Whether a dimension with this full name is still bound anywhere
    pub fn find_dim_ref(&self, name: &str) -> bool {
        self.dimension_names().iter().any(|n| n == name)
    }

    /// Axis aggregate by full name
    pub fn axis_aggregate_mut(&mut self, name: &str) -> Option<&mut AggregateRef> {
        self.axis_aggregates_mut().find(|agg| agg.full_name() == name)
    }

    /// Point chart crossing several measures on both axes
    pub fn is_scatter_matrix(&self) -> bool {
        if self.resolved_type() != ChartType::Point {
            return false;
        }
        let x = self.x_fields.iter().filter(|f| f.is_measure()).count();
        let y = self.y_fields.iter().filter(|f| f.is_measure()).count();
        x >= 1 && y >= 1 && (x > 1 || y > 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::aesthetic::{AestheticRef, AestheticSlot};
    use crate::binding::field::DimensionRef;
    use crate::binding::frame::{FrameChannel, FrameKind, VisualFrame};
    use crate::config::EngineConfig;

    fn sample() -> ChartBinding {
        ChartBinding::new(ChartType::Bar)
            .with_x(DimensionRef::new("Region"))
            .with_y(AggregateRef::new("Sales"))
            .with_y(AggregateRef::new("Profit"))
    }

    #[test]
    fn test_new_picks_variant() {
        assert_eq!(ChartBinding::new(ChartType::Bar).variant.kind(), VariantKind::Generic);
        assert_eq!(ChartBinding::new(ChartType::Map).variant.kind(), VariantKind::Map);
        assert_eq!(ChartBinding::new(ChartType::Tree).variant.kind(), VariantKind::Relation);
        assert_eq!(ChartBinding::new(ChartType::Candle).variant.kind(), VariantKind::Stock);
    }

    #[test]
    fn test_names_include_nested_aesthetics() {
        let mut binding = sample();
        let frame = VisualFrame::default_for(
            FrameChannel::Color,
            FrameKind::Categorical,
            &EngineConfig::default(),
        );
        let sales = binding.y_fields[0].as_aggregate_mut().unwrap();
        sales.aesthetics.set(
            AestheticSlot::Color,
            AestheticRef::new(ChartFieldRef::dimension("Segment"), frame),
        );

        assert_eq!(binding.dimension_names(), vec!["Region", "Segment"]);
        assert_eq!(binding.aggregate_names(), vec!["Sum(Sales)", "Sum(Profit)"]);
        assert!(binding.find_dim_ref("Segment"));
        assert!(!binding.find_dim_ref("Sales"));
    }

    #[test]
    fn test_effective_type() {
        let mut binding = sample();
        binding.y_fields[1]
            .as_aggregate_mut()
            .unwrap()
            .chart_type = ChartType::Line;

        let profit = binding.y_fields[1].as_aggregate().unwrap().clone();
        assert_eq!(binding.effective_type(&profit), ChartType::Bar);

        binding.multi_style = true;
        assert_eq!(binding.effective_type(&profit), ChartType::Line);
    }

    #[test]
    fn test_take_variant_fields() {
        let mut variant = BindingVariant::Gantt {
            start: Some(ChartFieldRef::aggregate("Start")),
            end: None,
            milestone: Some(ChartFieldRef::aggregate("Due")),
        };
        let names: Vec<String> = variant.take_fields().iter().map(|f| f.full_name()).collect();
        assert_eq!(names, vec!["Sum(Start)", "Sum(Due)"]);
        assert!(variant.fields().is_empty());
    }

    #[test]
    fn test_scatter_matrix() {
        let mut binding = ChartBinding::new(ChartType::Point)
            .with_x(AggregateRef::new("A"))
            .with_y(AggregateRef::new("B"));
        assert!(!binding.is_scatter_matrix());

        binding.y_fields.push(AggregateRef::new("C").into());
        assert!(binding.is_scatter_matrix());

        binding.chart_type = ChartType::Bar;
        assert!(!binding.is_scatter_matrix());
    }

    #[test]
    fn test_binding_deserializes_with_defaults() {
        let binding: ChartBinding = serde_json::from_str(
            r#"{
                "chart_type": "line",
                "x_fields": [{"kind": "dimension", "column": "Month"}],
                "y_fields": [{"kind": "aggregate", "column": "Sales"}]
            }"#,
        )
        .unwrap();
        assert_eq!(binding.chart_type, ChartType::Line);
        assert!(binding.separated);
        assert_eq!(binding.variant, BindingVariant::Generic);
        assert_eq!(binding.frames, StaticFrames::default());
    }
}
