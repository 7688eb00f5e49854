//! Field references bound to chart channels
//!
//! A [`ChartFieldRef`] is either a dimension (grouping column) or an
//! aggregate (measure). Both carry the base column and data type; dimensions
//! add sorting, named groups, date levels and ranking, aggregates add the
//! formula, an optional calculator and the per-series settings used when the
//! chart renders each measure with its own style.

use serde::{Deserialize, Serialize};

use super::aesthetic::Aesthetics;
use super::chart_type::ChartType;
use super::descriptor::{AxisDescriptor, TextFormat};
use super::frame::StaticFrames;

/// Data type of the underlying column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    #[default]
    String,
    Integer,
    Double,
    Boolean,
    Date,
    Time,
    Timestamp,
}

impl DataType {
    pub fn is_date(self) -> bool {
        matches!(self, DataType::Date | DataType::Time | DataType::Timestamp)
    }
}

/// Sort order of a dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    None,
    #[default]
    Asc,
    Desc,
    /// Keep data order
    Original,
    /// Manual order, usually driven by a named group
    Specific,
    /// Sort by an aggregate's value, ascending
    ValueAsc,
    /// Sort by an aggregate's value, descending
    ValueDesc,
}

impl SortOrder {
    pub fn is_by_value(self) -> bool {
        matches!(self, SortOrder::ValueAsc | SortOrder::ValueDesc)
    }

    /// Reduce to the plain none/asc/desc/original set
    pub fn plain(self) -> SortOrder {
        match self {
            SortOrder::ValueAsc | SortOrder::Specific => SortOrder::Asc,
            SortOrder::ValueDesc => SortOrder::Desc,
            other => other,
        }
    }
}

/// Date grouping level of a dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateLevel {
    #[default]
    None,
    Year,
    Quarter,
    Month,
    Week,
    Day,
    Hour,
    Minute,
    Second,
}

impl DateLevel {
    fn label(self) -> Option<&'static str> {
        match self {
            DateLevel::None => None,
            DateLevel::Year => Some("Year"),
            DateLevel::Quarter => Some("Quarter"),
            DateLevel::Month => Some("Month"),
            DateLevel::Week => Some("Week"),
            DateLevel::Day => Some("Day"),
            DateLevel::Hour => Some("Hour"),
            DateLevel::Minute => Some("Minute"),
            DateLevel::Second => Some("Second"),
        }
    }
}

/// Named group: user buckets of raw dimension values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NamedGroup {
    /// Explicit value → group assignments
    Explicit { groups: Vec<ValueGroup> },
    /// Condition-based groups
    Condition { groups: Vec<ConditionGroup> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueGroup {
    pub name: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionGroup {
    pub name: String,
    pub condition: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingOption {
    #[default]
    None,
    Top,
    Bottom,
}

/// Top-N / bottom-N ranking of a dimension by an aggregate
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Ranking {
    #[serde(default)]
    pub option: RankingOption,
    #[serde(default)]
    pub n: usize,
    /// Full name of the aggregate ranked by
    #[serde(default)]
    pub column: Option<String>,
    #[serde(default)]
    pub group_others: bool,
}

impl Ranking {
    pub fn is_active(&self) -> bool {
        self.option != RankingOption::None
    }
}

/// Raw data value matched to a geographic entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoMatch {
    pub value: String,
    pub code: String,
}

/// Dimension (grouping) field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionRef {
    pub column: String,
    #[serde(default)]
    pub data_type: DataType,
    #[serde(default)]
    pub order: SortOrder,
    /// Aggregate full name used when sorting by value
    #[serde(default)]
    pub sort_by: Option<String>,
    /// Manual value order for `SortOrder::Specific`
    #[serde(default)]
    pub manual_order: Vec<String>,
    #[serde(default)]
    pub named_group: Option<NamedGroup>,
    #[serde(default)]
    pub date_level: DateLevel,
    #[serde(default)]
    pub ranking: Ranking,
    /// Explicitly flagged as geographic
    #[serde(default)]
    pub geographic: bool,
    /// Raw value to geographic code matches (geo fields only)
    #[serde(default)]
    pub geo_matches: Vec<GeoMatch>,
}

impl DimensionRef {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            data_type: DataType::String,
            order: SortOrder::Asc,
            sort_by: None,
            manual_order: Vec::new(),
            named_group: None,
            date_level: DateLevel::None,
            ranking: Ranking::default(),
            geographic: false,
            geo_matches: Vec::new(),
        }
    }

    pub fn with_type(mut self, data_type: DataType) -> Self {
        self.data_type = data_type;
        self
    }

    pub fn with_date_level(mut self, level: DateLevel) -> Self {
        self.date_level = level;
        self
    }

    pub fn with_named_group(mut self, group: NamedGroup) -> Self {
        self.named_group = Some(group);
        self
    }

    pub fn with_order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    pub fn geographic(mut self) -> Self {
        self.geographic = true;
        self
    }

    pub fn full_name(&self) -> String {
        match self.date_level.label() {
            Some(level) => format!("{}({})", level, self.column),
            None => self.column.clone(),
        }
    }

    /// Date-typed columns grouped to a level still behave as dates
    pub fn is_date(&self) -> bool {
        self.data_type.is_date()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateFormula {
    /// Pre-aggregated or detail values
    None,
    #[default]
    Sum,
    Count,
    DistinctCount,
    Average,
    Min,
    Max,
}

impl AggregateFormula {
    fn label(self) -> Option<&'static str> {
        match self {
            AggregateFormula::None => None,
            AggregateFormula::Sum => Some("Sum"),
            AggregateFormula::Count => Some("Count"),
            AggregateFormula::DistinctCount => Some("DistinctCount"),
            AggregateFormula::Average => Some("Average"),
            AggregateFormula::Min => Some("Min"),
            AggregateFormula::Max => Some("Max"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PercentLevel {
    #[default]
    GrandTotal,
    /// Percent of the subtotal of `column`
    Group,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueFrom {
    First,
    #[default]
    Previous,
    Next,
    Last,
}

/// Post-aggregation calculation applied to a measure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Calculator {
    PercentOf {
        #[serde(default)]
        level: PercentLevel,
        #[serde(default)]
        column: Option<String>,
    },
    RunningTotal {
        #[serde(default)]
        break_by: Option<String>,
    },
    CompoundGrowth {
        #[serde(default)]
        break_by: Option<String>,
    },
    Change {
        #[serde(default)]
        column: Option<String>,
        #[serde(default)]
        from: ValueFrom,
        #[serde(default)]
        as_percent: bool,
    },
    ValueOf {
        #[serde(default)]
        column: Option<String>,
        #[serde(default)]
        from: ValueFrom,
    },
}

impl Calculator {
    /// Dimension the calculation refers to, if any
    pub fn target(&self) -> Option<&str> {
        match self {
            Calculator::PercentOf { column, .. }
            | Calculator::Change { column, .. }
            | Calculator::ValueOf { column, .. } => column.as_deref(),
            Calculator::RunningTotal { break_by } | Calculator::CompoundGrowth { break_by } => {
                break_by.as_deref()
            }
        }
    }

    /// Drop the dimension reference, falling back to the grand total
    pub fn clear_target(&mut self) {
        match self {
            Calculator::PercentOf { level, column } => {
                *level = PercentLevel::GrandTotal;
                *column = None;
            }
            Calculator::Change { column, .. } | Calculator::ValueOf { column, .. } => {
                *column = None;
            }
            Calculator::RunningTotal { break_by } | Calculator::CompoundGrowth { break_by } => {
                *break_by = None;
            }
        }
    }
}

/// Aggregate (measure) field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateRef {
    pub column: String,
    #[serde(default = "default_measure_type")]
    pub data_type: DataType,
    #[serde(default)]
    pub formula: AggregateFormula,
    #[serde(default)]
    pub calculator: Option<Calculator>,
    /// Per-series chart type; `Auto` inherits the chart-level type
    #[serde(default)]
    pub chart_type: ChartType,
    /// Treat the measure as categorical for frame selection
    #[serde(default)]
    pub discrete: bool,
    #[serde(default)]
    pub secondary_y: bool,
    /// Per-series aesthetics (multi-style mode)
    #[serde(default)]
    pub aesthetics: Aesthetics,
    /// Per-series static frames (multi-style mode)
    #[serde(default)]
    pub frames: StaticFrames,
    #[serde(default)]
    pub text_format: TextFormat,
    /// Per-series axis descriptor (separated mode)
    #[serde(default)]
    pub axis: AxisDescriptor,
}

fn default_measure_type() -> DataType {
    DataType::Double
}

impl AggregateRef {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            data_type: DataType::Double,
            formula: AggregateFormula::Sum,
            calculator: None,
            chart_type: ChartType::Auto,
            discrete: false,
            secondary_y: false,
            aesthetics: Aesthetics::default(),
            frames: StaticFrames::default(),
            text_format: TextFormat::default(),
            axis: AxisDescriptor::default(),
        }
    }

    pub fn with_formula(mut self, formula: AggregateFormula) -> Self {
        self.formula = formula;
        self
    }

    pub fn with_type(mut self, data_type: DataType) -> Self {
        self.data_type = data_type;
        self
    }

    pub fn with_calculator(mut self, calculator: Calculator) -> Self {
        self.calculator = Some(calculator);
        self
    }

    pub fn with_chart_type(mut self, chart_type: ChartType) -> Self {
        self.chart_type = chart_type;
        self
    }

    pub fn full_name(&self) -> String {
        match self.formula.label() {
            Some(formula) => format!("{}({})", formula, self.column),
            None => self.column.clone(),
        }
    }
}

/// Field bound to a chart channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartFieldRef {
    Dimension(DimensionRef),
    Aggregate(Box<AggregateRef>),
}

impl ChartFieldRef {
    pub fn dimension(column: impl Into<String>) -> Self {
        ChartFieldRef::Dimension(DimensionRef::new(column))
    }

    pub fn aggregate(column: impl Into<String>) -> Self {
        ChartFieldRef::Aggregate(Box::new(AggregateRef::new(column)))
    }

    pub fn full_name(&self) -> String {
        match self {
            ChartFieldRef::Dimension(dim) => dim.full_name(),
            ChartFieldRef::Aggregate(agg) => agg.full_name(),
        }
    }

    pub fn column(&self) -> &str {
        match self {
            ChartFieldRef::Dimension(dim) => &dim.column,
            ChartFieldRef::Aggregate(agg) => &agg.column,
        }
    }

    pub fn data_type(&self) -> DataType {
        match self {
            ChartFieldRef::Dimension(dim) => dim.data_type,
            ChartFieldRef::Aggregate(agg) => agg.data_type,
        }
    }

    pub fn is_measure(&self) -> bool {
        matches!(self, ChartFieldRef::Aggregate(_))
    }

    pub fn is_dimension(&self) -> bool {
        matches!(self, ChartFieldRef::Dimension(_))
    }

    pub fn is_date(&self) -> bool {
        self.data_type().is_date()
    }

    /// Whether frames bound to this field must be categorical
    pub fn is_categorical(&self) -> bool {
        match self {
            ChartFieldRef::Dimension(_) => true,
            ChartFieldRef::Aggregate(agg) => agg.discrete,
        }
    }

    pub fn as_dimension(&self) -> Option<&DimensionRef> {
        match self {
            ChartFieldRef::Dimension(dim) => Some(dim),
            _ => None,
        }
    }

    pub fn as_dimension_mut(&mut self) -> Option<&mut DimensionRef> {
        match self {
            ChartFieldRef::Dimension(dim) => Some(dim),
            _ => None,
        }
    }

    pub fn as_aggregate(&self) -> Option<&AggregateRef> {
        match self {
            ChartFieldRef::Aggregate(agg) => Some(agg),
            _ => None,
        }
    }

    pub fn as_aggregate_mut(&mut self) -> Option<&mut AggregateRef> {
        match self {
            ChartFieldRef::Aggregate(agg) => Some(agg),
            _ => None,
        }
    }
}

impl From<DimensionRef> for ChartFieldRef {
    fn from(dim: DimensionRef) -> Self {
        ChartFieldRef::Dimension(dim)
    }
}

impl From<AggregateRef> for ChartFieldRef {
    fn from(agg: AggregateRef) -> Self {
        ChartFieldRef::Aggregate(Box::new(agg))
    }
}

impl std::fmt::Display for ChartFieldRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.full_name())
    }
}
