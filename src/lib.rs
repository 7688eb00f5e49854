/*!
# chartbind - chart binding rule engine

Keeps a chart's *binding* consistent while the user edits it: which fields
sit on the X, Y and Group channels, which aesthetics (color, shape, size,
text) they drive, and which visual frame renders each of them.

Every structural edit re-establishes the same invariants: channel limits of
the chart type, dimensions before measures, categorical frames for
categorical fields, and no sort, ranking or calculation pointing at a field
that is no longer bound.

## Example

```rust
use chartbind::{
    apply_type_change, AggregateRef, ChartBinding, ChartDescriptor, ChartType, DefaultCatalog,
    DimensionRef, EditContext, EngineConfig, NoGeoLookup, TypeChange,
};

let mut binding = ChartBinding::new(ChartType::Bar)
    .with_x(DimensionRef::new("Region"))
    .with_y(AggregateRef::new("Sales"))
    .with_y(AggregateRef::new("Profit"));
let mut descriptor = ChartDescriptor::default();
let mut warnings: Vec<String> = Vec::new();

let mut ctx = EditContext::new(EngineConfig::default(), &DefaultCatalog, &NoGeoLookup, &mut warnings);
apply_type_change(&mut binding, &mut descriptor, &TypeChange::to(ChartType::Waterfall), &mut ctx)?;
drop(ctx);

assert_eq!(binding.y_fields.len(), 1);
assert_eq!(warnings.len(), 1);
# Ok::<(), chartbind::ChartError>(())
```

## Core Components

- [`binding`] - Binding model: channels, field refs, aesthetics, frames, descriptors
- [`encoding`] - Default-encoding resolver and palettes
- [`normalize`] - Binding normalizer
- [`transition`] - Chart type transitions
- [`swap`] - Axis-orientation swapper
- [`style`] - Separated / multi-style toggler
*/

pub mod binding;
pub mod config;
pub mod context;
pub mod encoding;
pub mod normalize;
pub mod style;
pub mod swap;
pub mod transition;

use tracing::info;

// Re-export key types for convenience
pub use binding::{
    AestheticRef, AestheticSlot, AggregateRef, BindingVariant, ChartBinding, ChartDescriptor,
    ChartFamily, ChartFieldRef, ChartType, DimensionRef, FrameChannel, FrameKind, VisualFrame,
};
pub use config::EngineConfig;
pub use context::{
    Catalog, DefaultCatalog, EditContext, EditOrigin, GeoLookup, KeywordGeoLookup, NoGeoLookup,
    WarningSink,
};
pub use transition::TypeChange;

/// Main library error type
#[derive(thiserror::Error, Debug)]
pub enum ChartError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ChartError>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Re-normalize after an arbitrary field add, remove or rename
pub fn apply_binding_edit(binding: &mut ChartBinding, ctx: &mut EditContext) {
    info!(chart_type = %binding.chart_type, origin = ?ctx.origin, "binding edit");
    let sizes = encoding::size_state(binding);
    normalize::normalize(binding, ctx);
    let config = ctx.config.clone();
    encoding::resolve_frames(binding, &config);
    encoding::apply_size_defaults(binding, &sizes);
}

/// Change the chart type, chart-wide or for one series
pub fn apply_type_change(
    binding: &mut ChartBinding,
    descriptor: &mut ChartDescriptor,
    change: &TypeChange,
    ctx: &mut EditContext,
) -> Result<()> {
    transition::change_type(binding, descriptor, change, ctx)
}

/// Swap the X and Y axes
pub fn apply_axis_swap(binding: &mut ChartBinding, descriptor: &mut ChartDescriptor) {
    swap::swap_axes(binding, descriptor);
}

/// Switch separated and multi-style rendering
pub fn apply_style_mode_toggle(
    binding: &mut ChartBinding,
    descriptor: &mut ChartDescriptor,
    separated: bool,
    multi_style: bool,
    ctx: &mut EditContext,
) {
    style::toggle(binding, descriptor, separated, multi_style, ctx);
}
