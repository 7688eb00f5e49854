//! Binding normalizer
//!
//! Re-establishes the cross-cutting consistency rules after any structural
//! edit. Every rule is idempotent and can be run on its own; [`normalize`]
//! runs all of them in dependency order, so normalizing an already
//! normalized binding changes nothing.

pub mod calculator;
pub mod measures;
pub mod named_group;
pub mod order;
pub mod pareto;
pub mod ranking;

use tracing::debug;

use crate::binding::ChartBinding;
use crate::context::EditContext;

pub fn normalize(binding: &mut ChartBinding, ctx: &mut EditContext) {
    debug!(chart_type = %binding.chart_type, "normalizing binding");

    measures::dedupe_aggregates(binding);
    order::sort_axis_channels(binding);
    measures::enforce_single_measure(binding, ctx);
    named_group::sync_aesthetic_named_groups(binding, ctx.origin);
    named_group::merge_geo_named_groups(binding);
    ranking::repair_targets(binding, ctx);
    calculator::repair_targets(binding, ctx);
    pareto::apply_default_sort(binding);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::{
        AestheticRef, AestheticSlot, AggregateRef, Calculator, ChartFieldRef, ChartType,
        DimensionRef, FrameChannel, SortOrder, VisualFrame,
    };
    use crate::config::EngineConfig;
    use crate::context::{DefaultCatalog, NoGeoLookup};
    use proptest::prelude::*;

    fn run(binding: &mut ChartBinding) -> Vec<String> {
        let mut warnings: Vec<String> = Vec::new();
        {
            let mut ctx =
                EditContext::new(EngineConfig::default(), &DefaultCatalog, &NoGeoLookup, &mut warnings);
            normalize(binding, &mut ctx);
        }
        warnings
    }

    #[test]
    fn test_normalize_repairs_everything_at_once() {
        let mut region = DimensionRef::new("Region").with_order(SortOrder::ValueAsc);
        region.sort_by = Some("Sum(Removed)".to_string());

        let mut binding = ChartBinding::new(ChartType::Bar)
            .with_y(
                AggregateRef::new("Sales")
                    .with_calculator(Calculator::RunningTotal { break_by: Some("Year".to_string()) }),
            )
            .with_y(region);

        let warnings = run(&mut binding);

        assert!(binding.y_fields[0].is_dimension());
        let region = binding.y_fields[0].as_dimension().unwrap();
        assert_eq!(region.sort_by.as_deref(), Some("Sum(Sales)"));
        let sales = binding.y_fields[1].as_aggregate().unwrap();
        assert_eq!(sales.calculator.as_ref().and_then(|c| c.target()), None);
        assert_eq!(warnings.len(), 1);
    }

    fn arb_field() -> impl Strategy<Value = ChartFieldRef> {
        prop_oneof![
            (0..4usize).prop_map(|i| ChartFieldRef::dimension(format!("D{}", i))),
            (0..4usize, any::<bool>()).prop_map(|(i, calc)| {
                let mut agg = AggregateRef::new(format!("M{}", i));
                if calc {
                    agg.calculator = Some(Calculator::PercentOf {
                        level: Default::default(),
                        column: Some(format!("D{}", i)),
                    });
                }
                agg.into()
            }),
        ]
    }

    fn arb_binding() -> impl Strategy<Value = ChartBinding> {
        let types = prop::sample::select(vec![
            ChartType::Bar,
            ChartType::Line,
            ChartType::Pie,
            ChartType::Waterfall,
            ChartType::Pareto,
            ChartType::Point,
        ]);
        (
            types,
            prop::collection::vec(arb_field(), 0..4),
            prop::collection::vec(arb_field(), 0..4),
            prop::option::of(0..4usize),
        )
            .prop_map(|(chart_type, x, y, color)| {
                let mut binding = ChartBinding::new(chart_type);
                binding.x_fields = x;
                binding.y_fields = y;
                if let Some(i) = color {
                    let frame =
                        VisualFrame::static_default(FrameChannel::Color, &EngineConfig::default());
                    binding.aesthetics.set(
                        AestheticSlot::Color,
                        AestheticRef::new(ChartFieldRef::dimension(format!("D{}", i)), frame),
                    );
                }
                binding
            })
    }

    proptest! {
        #[test]
        fn prop_normalize_is_idempotent(binding in arb_binding()) {
            let mut once = binding;
            run(&mut once);
            let mut twice = once.clone();
            let warnings = run(&mut twice);
            prop_assert_eq!(twice, once);
            prop_assert!(warnings.is_empty());
        }

        #[test]
        fn prop_normalized_channels_are_ordered(binding in arb_binding()) {
            let mut binding = binding;
            run(&mut binding);
            prop_assert!(order::is_ordered(&binding.x_fields));
            prop_assert!(order::is_ordered(&binding.y_fields));
        }

        #[test]
        fn prop_calculator_targets_are_bound(binding in arb_binding()) {
            let mut binding = binding;
            run(&mut binding);
            let mut targets: Vec<String> = Vec::new();
            binding.for_each_field(&mut |field| {
                if let Some(target) = field
                    .as_aggregate()
                    .and_then(|agg| agg.calculator.as_ref())
                    .and_then(|c| c.target())
                {
                    targets.push(target.to_string());
                }
            });
            for target in targets {
                prop_assert!(binding.find_dim_ref(&target));
            }
        }
    }
}
