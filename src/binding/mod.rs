//! Chart binding model
//!
//! Plain data: channel field sequences, field refs, aesthetic refs, visual
//! frames and descriptors. Behavior lives in the encoding, normalize,
//! transition, swap and style modules.

pub mod aesthetic;
pub mod chart_type;
pub mod descriptor;
pub mod field;
pub mod frame;
pub mod types;

pub use aesthetic::{AestheticRef, AestheticSlot, Aesthetics};
pub use chart_type::{ChartFamily, ChartType, VariantKind, ALL_CHART_TYPES};
pub use descriptor::{
    AxisDescriptor, AxisPair, BandDescriptor, ChartDescriptor, LegendDescriptor,
    LegendsDescriptor, PlotDescriptor, TextFormat, TitleDescriptor, TitlesDescriptor,
};
pub use field::{
    AggregateFormula, AggregateRef, Calculator, ChartFieldRef, ConditionGroup, DataType,
    DateLevel, DimensionRef, GeoMatch, NamedGroup, PercentLevel, Ranking, RankingOption,
    SortOrder, ValueFrom, ValueGroup,
};
pub use frame::{
    FrameChannel, FrameKind, FrameValue, StaticFrames, VisualFrame, DEFAULT_SIZE, DEFAULT_SIZE_RANGE,
};
pub use types::{BindingVariant, Channel, ChartBinding, Highlight};
