//! Leaving a merged family
//!
//! Family slots hand their fields back to the generic channels before the
//! binding variant is replaced.

use tracing::debug;

use super::{drop_field, map};
use crate::binding::{AestheticSlot, ChartBinding, ChartFamily, ChartFieldRef, ChartType};
use crate::context::EditContext;
use crate::encoding;
use crate::Result;

/// Order in which measure aesthetics are promoted back onto Y
const PROMOTION_ORDER: [AestheticSlot; 4] = [
    AestheticSlot::Size,
    AestheticSlot::Color,
    AestheticSlot::Shape,
    AestheticSlot::Text,
];

pub fn leave(
    binding: &mut ChartBinding,
    from: ChartType,
    to: ChartType,
    ctx: &mut EditContext,
) -> Result<()> {
    match from.family() {
        ChartFamily::Relation => leave_relation(binding),
        ChartFamily::Gantt | ChartFamily::Stock => leave_slots(binding, to, ctx),
        ChartFamily::Radar => leave_radar(binding),
        ChartFamily::Map => map::leave(binding, to),
        ChartFamily::Treemap
        | ChartFamily::Mekko
        | ChartFamily::Funnel
        | ChartFamily::Contour
        | ChartFamily::Boxplot => leave_to_axes(binding, from, to),
        ChartFamily::Simple => {}
    }
    Ok(())
}

/// Source and target return to Group
fn leave_relation(binding: &mut ChartBinding) {
    let fields = binding.variant.take_fields();
    debug!(count = fields.len(), "relation slots to group");
    binding.group_fields.extend(fields);
}

/// Start/end/milestone or close/high/low/open return to Y up to the
/// destination's Y limit; the rest fill Color, Shape, Size, Text
fn leave_slots(binding: &mut ChartBinding, to: ChartType, ctx: &mut EditContext) {
    let fields = binding.variant.take_fields();
    return_to_y(binding, fields, to, ctx);
}

pub(crate) fn return_to_y(
    binding: &mut ChartBinding,
    fields: Vec<ChartFieldRef>,
    to: ChartType,
    ctx: &mut EditContext,
) {
    let limit = to.max_y_fields();
    for field in fields {
        if limit.map_or(true, |max| binding.y_fields.len() < max) {
            binding.y_fields.push(field);
            continue;
        }
        match binding.aesthetics.first_free(&AestheticSlot::ALL) {
            Some(slot) => {
                debug!(field = %field, %slot, "Y is full, moving to aesthetic");
                let aesthetic = encoding::default_aesthetic(field, slot, to, &ctx.config);
                binding.aesthetics.set(slot, aesthetic);
            }
            None => drop_field(&field, to, ctx),
        }
    }
}

/// The radar series returns to X
fn leave_radar(binding: &mut ChartBinding) {
    if binding.group_fields.len() == 1 {
        binding.x_fields.append(&mut binding.group_fields);
    }
}

/// Axis-less families hand their fields back when the destination is a
/// plain axis chart: Group levels to an empty X, a measure to an empty Y
fn leave_to_axes(binding: &mut ChartBinding, from: ChartType, to: ChartType) {
    if to.family() != ChartFamily::Simple {
        return;
    }

    let y_has_measure = |b: &ChartBinding| b.y_fields.iter().any(|f| f.is_measure());

    if from.family() == ChartFamily::Funnel && !y_has_measure(binding) {
        let (measures, rest): (Vec<ChartFieldRef>, Vec<ChartFieldRef>) =
            std::mem::take(&mut binding.x_fields)
                .into_iter()
                .partition(|f| f.is_measure());
        binding.x_fields = rest;
        binding.y_fields.extend(measures);
    }

    if binding.x_fields.is_empty() {
        let (dims, rest): (Vec<ChartFieldRef>, Vec<ChartFieldRef>) =
            std::mem::take(&mut binding.group_fields)
                .into_iter()
                .partition(|f| f.is_dimension());
        binding.group_fields = rest;
        binding.x_fields.extend(dims);
    }

    if !y_has_measure(binding) {
        promote_measure_aesthetic(binding, &PROMOTION_ORDER);
    }
}

/// Move the first measure bound to one of `order` onto Y
pub(crate) fn promote_measure_aesthetic(binding: &mut ChartBinding, order: &[AestheticSlot]) -> bool {
    let slot = order.iter().copied().find(|slot| {
        binding
            .aesthetics
            .get(*slot)
            .map(|a| a.field.is_measure())
            .unwrap_or(false)
    });
    match slot.and_then(|slot| binding.aesthetics.take(slot)) {
        Some(aesthetic) => {
            debug!(field = %aesthetic.field, "measure aesthetic back to Y");
            binding.y_fields.push(aesthetic.field);
            true
        }
        None => false,
    }
}
