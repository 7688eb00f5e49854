//! Redistribution when entering a merged family
//!
//! Each routine gathers the fields of the X, Y and Group channels and deals
//! them out to the destination family's topology. Fields that do not fit
//! anywhere are dropped with one warning each.

use tracing::debug;

use super::{drop_field, map, place_or_drop, split_fields};
use crate::binding::{
    AestheticSlot, BindingVariant, ChartBinding, ChartFamily, ChartFieldRef, ChartType,
    FrameChannel, FrameKind, VariantKind, VisualFrame,
};
use crate::context::EditContext;
use crate::normalize::calculator;
use crate::style;
use crate::{ChartError, Result};

const MEASURE_SLOTS: [AestheticSlot; 3] =
    [AestheticSlot::Size, AestheticSlot::Color, AestheticSlot::Shape];

const OVERFLOW_SLOTS: [AestheticSlot; 3] =
    [AestheticSlot::Color, AestheticSlot::Shape, AestheticSlot::Size];

/// Drain X, Y and Group, in that order
fn drain_channels(binding: &mut ChartBinding) -> Vec<ChartFieldRef> {
    let mut fields = std::mem::take(&mut binding.x_fields);
    fields.append(&mut binding.y_fields);
    fields.append(&mut binding.group_fields);
    fields
}

fn unexpected_variant(kind: VariantKind, to: ChartType) -> ChartError {
    ChartError::InternalError(format!(
        "{} chart reached with a {:?} binding variant",
        to, kind
    ))
}

/// Run the destination family's redistribution routine
pub fn enter(binding: &mut ChartBinding, to: ChartType, ctx: &mut EditContext) -> Result<()> {
    match to.family() {
        ChartFamily::Treemap => enter_treemap(binding, to, ctx),
        ChartFamily::Mekko => enter_mekko(binding, to, ctx),
        ChartFamily::Relation => enter_relation(binding, to, ctx)?,
        ChartFamily::Gantt => enter_gantt(binding, to, ctx)?,
        ChartFamily::Stock => enter_stock(binding, to, ctx)?,
        ChartFamily::Radar => enter_radar(binding),
        ChartFamily::Funnel => enter_funnel(binding, to, ctx),
        ChartFamily::Contour => enter_contour(binding, to, ctx),
        ChartFamily::Map => map::enter(binding, to, ctx)?,
        ChartFamily::Boxplot | ChartFamily::Simple => {}
    }
    Ok(())
}

/// Every dimension becomes a hierarchy level (existing levels first);
/// measures fill Size, Color, Shape
fn enter_treemap(binding: &mut ChartBinding, to: ChartType, ctx: &mut EditContext) {
    let mut fields = std::mem::take(&mut binding.group_fields);
    fields.extend(drain_channels(binding));
    let (dims, measures) = split_fields(fields);

    debug!(levels = dims.len(), measures = measures.len(), "entering treemap");
    binding.group_fields = dims;
    for measure in measures {
        place_or_drop(&mut binding.aesthetics, measure, &MEASURE_SLOTS, to, ctx);
    }
}

/// First dimension on X, second on Group, a third only if Color is free;
/// first measure on Y, the rest to Color, Shape, Size
fn enter_mekko(binding: &mut ChartBinding, to: ChartType, ctx: &mut EditContext) {
    let (dims, measures) = split_fields(drain_channels(binding));

    let mut dims = dims.into_iter();
    binding.x_fields.extend(dims.next());
    binding.group_fields.extend(dims.next());
    for dim in dims {
        place_or_drop(&mut binding.aesthetics, dim, &[AestheticSlot::Color], to, ctx);
    }

    let mut measures = measures.into_iter();
    binding.y_fields.extend(measures.next());
    for measure in measures {
        place_or_drop(&mut binding.aesthetics, measure, &OVERFLOW_SLOTS, to, ctx);
    }
}

/// First two dimensions become source and target; measures fill Size,
/// Color, Shape
fn enter_relation(binding: &mut ChartBinding, to: ChartType, ctx: &mut EditContext) -> Result<()> {
    let (dims, measures) = split_fields(drain_channels(binding));
    let mut dims = dims.into_iter();

    let kind = binding.variant.kind();
    match &mut binding.variant {
        BindingVariant::Relation { source, target } => {
            *source = dims.next();
            *target = dims.next();
        }
        _ => return Err(unexpected_variant(kind, to)),
    }

    for dim in dims {
        drop_field(&dim, to, ctx);
    }
    for measure in measures {
        place_or_drop(&mut binding.aesthetics, measure, &MEASURE_SLOTS, to, ctx);
    }
    Ok(())
}

/// Date fields become start, end and milestone; other dimensions go to Y;
/// other measures style the start field (or the chart when start is a
/// dimension)
fn enter_gantt(binding: &mut ChartBinding, to: ChartType, ctx: &mut EditContext) -> Result<()> {
    let (dates, others): (Vec<ChartFieldRef>, Vec<ChartFieldRef>) =
        drain_channels(binding).into_iter().partition(|f| f.is_date());
    let (dims, measures) = split_fields(others);

    let mut dates = dates.into_iter();
    let (first, second, third) = (dates.next(), dates.next(), dates.next());
    for extra in dates {
        drop_field(&extra, to, ctx);
    }

    binding.y_fields.extend(dims);

    let mut start_field = first;
    match start_field.as_mut().and_then(|f| f.as_aggregate_mut()) {
        Some(start) => {
            for measure in measures {
                place_or_drop(&mut start.aesthetics, measure, &OVERFLOW_SLOTS, to, ctx);
            }
        }
        None => {
            for measure in measures {
                place_or_drop(&mut binding.aesthetics, measure, &OVERFLOW_SLOTS, to, ctx);
            }
        }
    }

    let kind = binding.variant.kind();
    match &mut binding.variant {
        BindingVariant::Gantt {
            start,
            end,
            milestone,
        } => {
            *start = start_field;
            *end = second;
            *milestone = third;
            Ok(())
        }
        _ => Err(unexpected_variant(kind, to)),
    }
}

/// Measures fill close/high/low/open (candle) or high/low/close (stock);
/// the first dimension stays on X
fn enter_stock(binding: &mut ChartBinding, to: ChartType, ctx: &mut EditContext) -> Result<()> {
    let (dims, measures) = split_fields(drain_channels(binding));

    let mut dims = dims.into_iter();
    binding.x_fields.extend(dims.next());
    let extra_dims: Vec<ChartFieldRef> = dims.collect();

    let mut measures = measures.into_iter();
    let kind = binding.variant.kind();
    let slots = match (&mut binding.variant, to) {
        (
            BindingVariant::Stock {
                high,
                low,
                open,
                close,
            },
            ChartType::Candle,
        ) => vec![close, high, low, open],
        (
            BindingVariant::Stock {
                high, low, close, ..
            },
            _,
        ) => vec![high, low, close],
        _ => return Err(unexpected_variant(kind, to)),
    };
    for slot in slots {
        if let Some(measure) = measures.next() {
            *slot = Some(measure);
        }
    }

    let overflow: Vec<ChartFieldRef> = measures.collect();
    for field in extra_dims.iter().chain(overflow.iter()) {
        drop_field(field, to, ctx);
    }
    Ok(())
}

/// The innermost X dimension becomes the radar's series when Group is empty
fn enter_radar(binding: &mut ChartBinding) {
    if !binding.group_fields.is_empty() {
        return;
    }
    if let Some(pos) = binding.x_fields.iter().rposition(|f| f.is_dimension()) {
        let dim = binding.x_fields.remove(pos);
        debug!(field = %dim, "radar series from X");
        binding.group_fields.push(dim);
    }
}

/// Single-axis funnel: Y measures move to X, calculators go away
fn enter_funnel(binding: &mut ChartBinding, to: ChartType, ctx: &mut EditContext) {
    let (measures, rest): (Vec<ChartFieldRef>, Vec<ChartFieldRef>) =
        std::mem::take(&mut binding.y_fields)
            .into_iter()
            .partition(|f| f.is_measure());
    binding.y_fields = rest;
    binding.x_fields.extend(measures);
    calculator::clear_calculators(binding, to, ctx);
}

/// Contour renders density: a color measure turns into the size measure,
/// shape is cleared, calculators and discrete flags go away
fn enter_contour(binding: &mut ChartBinding, to: ChartType, ctx: &mut EditContext) {
    style::apply_separated(binding, true);

    let color_is_measure = binding
        .aesthetics
        .get(AestheticSlot::Color)
        .map(|a| a.field.is_measure())
        .unwrap_or(false);
    if color_is_measure {
        if let Some(mut color) = binding.aesthetics.take(AestheticSlot::Color) {
            color.frame =
                VisualFrame::default_for(FrameChannel::Size, FrameKind::Linear, &ctx.config);
            if let Some(replaced) = binding.aesthetics.set(AestheticSlot::Size, color) {
                ctx.warn(
                    "aesthetic.dropped",
                    &[&replaced.field.full_name(), AestheticSlot::Size.name(), to.name()],
                );
            }
        }
    }

    if let Some(shape) = binding.aesthetics.take(AestheticSlot::Shape) {
        ctx.warn(
            "aesthetic.dropped",
            &[&shape.field.full_name(), AestheticSlot::Shape.name(), to.name()],
        );
    }

    calculator::clear_calculators(binding, to, ctx);
    binding.for_each_field_mut(&mut |field| {
        if let Some(agg) = field.as_aggregate_mut() {
            agg.discrete = false;
        }
    });
}
