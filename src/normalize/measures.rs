//! Measure cardinality rules

use std::collections::HashSet;

use tracing::debug;

use crate::binding::{Channel, ChartBinding};
use crate::context::EditContext;

/// Drop repeated aggregates so each measure sits in one channel only.
/// The first occurrence in X, Y, Group order wins.
pub fn dedupe_aggregates(binding: &mut ChartBinding) {
    let mut seen: HashSet<String> = HashSet::new();
    for channel in [Channel::X, Channel::Y, Channel::Group] {
        binding.channel_mut(channel).retain(|field| {
            if !field.is_measure() {
                return true;
            }
            let keep = seen.insert(field.full_name());
            if !keep {
                debug!(field = %field, ?channel, "dropping duplicate aggregate");
            }
            keep
        });
    }
}

/// Keep one measure on single-series chart types (waterfall, pie/donut
/// outside multi-style). The first measure of Y, else of X, survives; the
/// rest are removed from the back and each removal is reported.
pub fn enforce_single_measure(binding: &mut ChartBinding, ctx: &mut EditContext) {
    let chart_type = binding.resolved_type();
    if !chart_type.is_single_measure(binding.multi_style) {
        return;
    }

    let mut positions: Vec<(Channel, usize)> = Vec::new();
    for channel in [Channel::Y, Channel::X] {
        for (i, field) in binding.channel(channel).iter().enumerate() {
            if field.is_measure() {
                positions.push((channel, i));
            }
        }
    }
    if positions.len() <= 1 {
        return;
    }

    // Indices shift on removal, so remove back to front within each channel.
    for (channel, index) in positions.into_iter().skip(1).rev() {
        let removed = binding.channel_mut(channel).remove(index);
        debug!(field = %removed, %chart_type, "dropping excess measure");
        ctx.warn("measure.dropped", &[&removed.full_name(), chart_type.name()]);
    }
}
