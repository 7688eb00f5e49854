//! Type-transition engine
//!
//! Changing the chart type either stays inside one family (the type code
//! changes in place, chart-wide or for one series) or crosses a family
//! boundary. A crossing leaves the old family ([`reverse`]), swaps the
//! binding variant when the topology differs, filters aesthetics the new
//! type cannot render, and redistributes fields for the new family
//! ([`family`]). Both paths end with named-group stripping, color-frame
//! repair, frame resolution and normalization.

pub mod family;
pub mod map;
pub mod pie;
pub mod reverse;

use tracing::{debug, info};

use crate::binding::{
    AestheticSlot, Aesthetics, BindingVariant, ChartBinding, ChartDescriptor, ChartFamily,
    ChartFieldRef, ChartType, FrameChannel, FrameKind, StaticFrames, VisualFrame,
};
use crate::config::EngineConfig;
use crate::context::EditContext;
use crate::encoding;
use crate::normalize::{self, named_group};
use crate::style;
use crate::Result;

/// A requested chart type change
#[derive(Debug, Clone, PartialEq)]
pub struct TypeChange {
    pub to: ChartType,
    /// Full name of the one series to change (multi-style only)
    pub series: Option<String>,
    /// Multi-style flag after the change, `None` keeps the current mode
    pub multi_style: Option<bool>,
    /// Run the full transition even when nothing seems to change
    pub forced: bool,
}

impl TypeChange {
    pub fn to(chart_type: ChartType) -> Self {
        Self {
            to: chart_type,
            series: None,
            multi_style: None,
            forced: false,
        }
    }

    pub fn for_series(mut self, series: impl Into<String>) -> Self {
        self.series = Some(series.into());
        self
    }

    pub fn multi_style(mut self, multi_style: bool) -> Self {
        self.multi_style = Some(multi_style);
        self
    }

    pub fn forced(mut self) -> Self {
        self.forced = true;
        self
    }
}

/// Apply a chart type change to the binding
pub fn change_type(
    binding: &mut ChartBinding,
    descriptor: &mut ChartDescriptor,
    change: &TypeChange,
    ctx: &mut EditContext,
) -> Result<()> {
    let old = binding.chart_type;
    let to = change.to;
    let multi_style = change.multi_style.unwrap_or(binding.multi_style);
    let multi_changed = binding.multi_style != multi_style;

    if !change.forced && change.series.is_none() && old == to && !multi_changed {
        debug!(%to, "type change is a no-op");
        return Ok(());
    }
    info!(from = %old, %to, series = ?change.series, multi_style, "changing chart type");

    let sizes = encoding::size_state(binding);
    if multi_changed {
        style::apply_multi_style(binding, descriptor, multi_style);
    }

    pie::leave(binding, old, to);

    if old.family() == to.family() {
        apply_in_place(binding, to, change.series.as_deref());
    } else {
        cross_family(binding, old, to, ctx)?;
    }

    let config = ctx.config.clone();
    named_group::strip_unsupported(binding, to, ctx);
    repair_color_frames(binding, to, &config);
    pie::enter(binding, to, &config);
    if to.family() != ChartFamily::Map {
        repair_inverted(binding);
    }

    encoding::resolve_frames(binding, &config);
    encoding::apply_size_defaults(binding, &sizes);
    normalize::normalize(binding, ctx);
    Ok(())
}

/// Same-family change: only type codes move
fn apply_in_place(binding: &mut ChartBinding, to: ChartType, series: Option<&str>) {
    if let Some(name) = series.filter(|_| binding.multi_style && !to.is_merged()) {
        if let Some(agg) = binding.axis_aggregate_mut(name) {
            debug!(series = name, %to, "changing series type");
            agg.chart_type = to;
            return;
        }
        debug!(series = name, "series not bound, changing chart type instead");
    }

    binding.chart_type = to;
    if binding.multi_style {
        for agg in binding.axis_aggregates_mut() {
            agg.chart_type = to;
        }
    }
}

fn cross_family(
    binding: &mut ChartBinding,
    old: ChartType,
    to: ChartType,
    ctx: &mut EditContext,
) -> Result<()> {
    debug!(from = %old.family(), to = %to.family(), "crossing chart families");

    reverse::leave(binding, old, to, ctx)?;

    if binding.variant.kind() != to.variant_kind() {
        let leftover = binding.variant.take_fields();
        binding.x_fields.extend(leftover);
        binding.variant = BindingVariant::empty(to.variant_kind());
    }

    binding.chart_type = to;
    if binding.multi_style {
        for agg in binding.axis_aggregates_mut() {
            agg.chart_type = to;
        }
    }

    filter_aesthetics(binding, to, ctx);

    if !(old.is_merged() && to.is_merged())
        && (!binding.highlights.is_empty() || binding.hyperlink.is_some())
    {
        binding.highlights.clear();
        binding.hyperlink = None;
        ctx.warn("highlight.dropped", &[to.name()]);
    }

    family::enter(binding, to, ctx)
}

/// Drop dimensions bound to aesthetics the chart type cannot render
/// categorically
pub fn filter_aesthetics(binding: &mut ChartBinding, to: ChartType, ctx: &mut EditContext) {
    for slot in AestheticSlot::ALL {
        let unsupported = binding
            .aesthetics
            .get(slot)
            .map(|a| a.field.is_dimension() && !to.supports_aesthetic_dimension(slot))
            .unwrap_or(false);
        if !unsupported {
            continue;
        }
        if let Some(removed) = binding.aesthetics.take(slot) {
            ctx.warn(
                "aesthetic.dropped",
                &[&removed.field.full_name(), slot.name(), to.name()],
            );
        }
    }
}

/// Move X measures whose type cannot render horizontally to the end of Y
pub fn repair_inverted(binding: &mut ChartBinding) {
    let blocked: Vec<usize> = binding
        .x_fields
        .iter()
        .enumerate()
        .filter_map(|(i, f)| {
            let agg = f.as_aggregate()?;
            (!binding.effective_type(agg).supports_inverted()).then_some(i)
        })
        .collect();

    for i in blocked.into_iter().rev() {
        let field = binding.x_fields.remove(i);
        debug!(field = %field, "moving measure off the inverted axis");
        binding.y_fields.push(field);
    }
}

/// Contour needs a linear unbound color; everything else a static one unless
/// the frame is categorical on purpose
fn repair_color_frames(binding: &mut ChartBinding, to: ChartType, config: &EngineConfig) {
    repair_color_frame(&mut binding.frames, to, config);
    if binding.multi_style {
        for agg in binding.axis_aggregates_mut() {
            repair_color_frame(&mut agg.frames, to, config);
        }
    }
}

fn repair_color_frame(frames: &mut StaticFrames, to: ChartType, config: &EngineConfig) {
    if to.family() == ChartFamily::Contour {
        if !frames.color.is_linear() {
            frames.color = VisualFrame::default_for(FrameChannel::Color, FrameKind::Linear, config);
        }
    } else if frames.color.is_linear() {
        frames.color = VisualFrame::static_default(FrameChannel::Color, config);
    }
}

/// Split fields into dimensions and measures, keeping relative order
pub(crate) fn split_fields(
    fields: impl IntoIterator<Item = ChartFieldRef>,
) -> (Vec<ChartFieldRef>, Vec<ChartFieldRef>) {
    fields.into_iter().partition(|f| f.is_dimension())
}

/// Report a field that has nowhere to go
pub(crate) fn drop_field(field: &ChartFieldRef, chart_type: ChartType, ctx: &mut EditContext) {
    let key = if field.is_measure() {
        "measure.dropped"
    } else {
        "field.dropped"
    };
    debug!(field = %field, %chart_type, "dropping field");
    ctx.warn(key, &[&field.full_name(), chart_type.name()]);
}

/// Bind `field` to the first free slot of `order`, or drop it with a warning
pub(crate) fn place_or_drop(
    aesthetics: &mut Aesthetics,
    field: ChartFieldRef,
    order: &[AestheticSlot],
    chart_type: ChartType,
    ctx: &mut EditContext,
) {
    match aesthetics.first_free(order) {
        Some(slot) => {
            debug!(field = %field, %slot, "moving field to aesthetic");
            let aesthetic = encoding::default_aesthetic(field, slot, chart_type, &ctx.config);
            aesthetics.set(slot, aesthetic);
        }
        None => drop_field(&field, chart_type, ctx),
    }
}
