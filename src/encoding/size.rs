//! Size defaults per chart type

use crate::binding::{ChartBinding, ChartFamily, ChartType};

/// Nominal size and range handed to size frames
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeDefaults {
    pub size: f64,
    pub min: f64,
    pub max: f64,
}

impl SizeDefaults {
    const fn new(size: f64, min: f64, max: f64) -> Self {
        Self { size, min, max }
    }
}

const INTERVAL: SizeDefaults = SizeDefaults::new(15.0, 10.0, 25.0);
const LINE: SizeDefaults = SizeDefaults::new(3.0, 1.0, 15.0);
const POINT: SizeDefaults = SizeDefaults::new(6.0, 1.0, 30.0);
const AREA_FILL: SizeDefaults = SizeDefaults::new(30.0, 1.0, 30.0);
const RELATION: SizeDefaults = SizeDefaults::new(15.0, 5.0, 30.0);
const FAKE: SizeDefaults = SizeDefaults::new(1.0, 1.0, 15.0);

/// Size lookup for a (resolved) chart type
pub fn size_defaults(chart_type: ChartType) -> SizeDefaults {
    match chart_type {
        ChartType::Line
        | ChartType::Step
        | ChartType::Jump
        | ChartType::Area
        | ChartType::StepArea
        | ChartType::Radar
        | ChartType::FilledRadar => LINE,
        ChartType::Auto | ChartType::Point | ChartType::Map | ChartType::Contour => POINT,
        ChartType::Pie | ChartType::Donut => AREA_FILL,
        t if t.family() == ChartFamily::Treemap => AREA_FILL,
        t if t.family() == ChartFamily::Relation => RELATION,
        _ => INTERVAL,
    }
}

/// A simple chart with no measure on either axis renders as bare points
pub fn is_fake(binding: &ChartBinding) -> bool {
    !binding.has_axis_measure() && !binding.resolved_type().is_merged()
}

/// Size defaults for a binding rendered as `chart_type`
pub fn resolve_size_defaults(binding: &ChartBinding, chart_type: ChartType) -> SizeDefaults {
    if is_fake(binding) && !chart_type.is_merged() {
        FAKE
    } else {
        size_defaults(chart_type)
    }
}

/// Size defaults in effect for a binding, chart-wide and per axis series
///
/// Captured before an edit so the edit can tell a default size from one the
/// user picked.
#[derive(Debug, Clone, PartialEq)]
pub struct SizeState {
    defaults: Vec<SizeDefaults>,
}

impl SizeState {
    pub fn holds_size(&self, size: f64) -> bool {
        self.defaults.iter().any(|d| d.size == size)
    }

    pub fn holds_range(&self, min: f64, max: f64) -> bool {
        self.defaults.iter().any(|d| d.min == min && d.max == max)
    }
}

pub fn size_state(binding: &ChartBinding) -> SizeState {
    let mut defaults = vec![resolve_size_defaults(binding, binding.resolved_type())];
    if binding.multi_style {
        defaults.extend(
            binding
                .axis_aggregates()
                .map(|agg| resolve_size_defaults(binding, binding.effective_type(agg))),
        );
    }
    SizeState { defaults }
}
