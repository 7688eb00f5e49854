//! Ranking and sort-by-value target repair

use tracing::debug;

use crate::binding::{ChartBinding, RankingOption, SortOrder};
use crate::context::EditContext;

/// Measure a dangling ranking/sort falls back to: the first axis aggregate,
/// else the first aggregate bound anywhere
fn fallback_measure(binding: &ChartBinding) -> Option<String> {
    binding
        .axis_aggregates()
        .next()
        .map(|agg| agg.full_name())
        .or_else(|| binding.aggregate_names().into_iter().next())
}

/// Re-point rankings and by-value sorts whose target aggregate is gone.
/// Without any aggregate left the option is reset and reported, even when it
/// never had a target.
pub fn repair_targets(binding: &mut ChartBinding, ctx: &mut EditContext) {
    let aggregates = binding.aggregate_names();
    let fallback = fallback_measure(binding);
    let is_live = |target: &Option<String>| {
        target
            .as_ref()
            .map(|t| aggregates.iter().any(|a| a == t))
            .unwrap_or(false)
    };

    binding.for_each_field_mut(&mut |field| {
        let Some(dim) = field.as_dimension_mut() else {
            return;
        };
        let name = dim.full_name();

        if dim.ranking.is_active() && !is_live(&dim.ranking.column) {
            let lost = dim.ranking.column.take();
            match &fallback {
                Some(measure) => {
                    debug!(field = %name, to = %measure, "ranking target moved");
                    dim.ranking.column = Some(measure.clone());
                }
                None => {
                    dim.ranking.option = RankingOption::None;
                    ctx.warn("ranking.reset", &[&name, &lost.unwrap_or_default()]);
                }
            }
        }

        if dim.order.is_by_value() && !is_live(&dim.sort_by) {
            let lost = dim.sort_by.take();
            match &fallback {
                Some(measure) => {
                    debug!(field = %name, to = %measure, "sort target moved");
                    dim.sort_by = Some(measure.clone());
                }
                None => {
                    dim.order = SortOrder::None;
                    ctx.warn("sort.reset", &[&name, &lost.unwrap_or_default()]);
                }
            }
        } else if !dim.order.is_by_value() && dim.sort_by.is_some() {
            dim.sort_by = None;
        }
    });
}
