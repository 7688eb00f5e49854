//! Calculator target repair

use tracing::debug;

use crate::binding::{Calculator, ChartBinding, ChartType, PercentLevel};
use crate::context::EditContext;

/// Clear calculator references to dimensions that are no longer bound.
///
/// Percent-of falls back to the grand total, running totals and compound
/// growth lose their break-by, change/value-of lose their reference column.
pub fn repair_targets(binding: &mut ChartBinding, ctx: &mut EditContext) {
    let dimensions = binding.dimension_names();

    binding.for_each_field_mut(&mut |field| {
        let Some(agg) = field.as_aggregate_mut() else {
            return;
        };
        let name = agg.full_name();
        let Some(calculator) = agg.calculator.as_mut() else {
            return;
        };

        match calculator.target().map(str::to_string) {
            Some(target) if !dimensions.contains(&target) => {
                debug!(field = %name, %target, "clearing calculator target");
                calculator.clear_target();
                ctx.warn("calculator.reset", &[&name, &target]);
            }
            None => {
                // Percent of a group needs a group column
                if let Calculator::PercentOf { level, .. } = calculator {
                    *level = PercentLevel::GrandTotal;
                }
            }
            _ => {}
        }
    });
}

/// Drop every calculator for chart types that cannot show them
pub fn clear_calculators(binding: &mut ChartBinding, chart_type: ChartType, ctx: &mut EditContext) {
    binding.for_each_field_mut(&mut |field| {
        if let Some(agg) = field.as_aggregate_mut() {
            if agg.calculator.take().is_some() {
                ctx.warn("calculator.unsupported", &[&agg.full_name(), chart_type.name()]);
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::{AggregateRef, DimensionRef, ValueFrom};
    use crate::config::EngineConfig;
    use crate::context::{DefaultCatalog, NoGeoLookup};

    fn run(binding: &mut ChartBinding) -> Vec<String> {
        let mut warnings: Vec<String> = Vec::new();
        {
            let mut ctx =
                EditContext::new(EngineConfig::default(), &DefaultCatalog, &NoGeoLookup, &mut warnings);
            repair_targets(binding, &mut ctx);
        }
        warnings
    }

    #[test]
    fn test_valid_targets_kept() {
        let calc = Calculator::PercentOf {
            level: PercentLevel::Group,
            column: Some("Region".to_string()),
        };
        let mut binding = ChartBinding::new(ChartType::Bar)
            .with_x(DimensionRef::new("Region"))
            .with_y(AggregateRef::new("Sales").with_calculator(calc.clone()));

        assert!(run(&mut binding).is_empty());
        assert_eq!(binding.y_fields[0].as_aggregate().unwrap().calculator, Some(calc));
    }

    #[test]
    fn test_removed_target_cleared() {
        let mut binding = ChartBinding::new(ChartType::Bar)
            .with_x(DimensionRef::new("Month"))
            .with_y(AggregateRef::new("Sales").with_calculator(Calculator::PercentOf {
                level: PercentLevel::Group,
                column: Some("Region".to_string()),
            }))
            .with_y(AggregateRef::new("Profit").with_calculator(Calculator::Change {
                column: Some("Year".to_string()),
                from: ValueFrom::First,
                as_percent: true,
            }));

        let warnings = run(&mut binding);
        assert_eq!(warnings.len(), 2);

        let sales = binding.y_fields[0].as_aggregate().unwrap();
        assert_eq!(
            sales.calculator,
            Some(Calculator::PercentOf {
                level: PercentLevel::GrandTotal,
                column: None
            })
        );
        let profit = binding.y_fields[1].as_aggregate().unwrap();
        assert_eq!(profit.calculator.as_ref().and_then(|c| c.target()), None);

        let once = binding.clone();
        assert!(run(&mut binding).is_empty());
        assert_eq!(binding, once);
    }

    #[test]
    fn test_clear_calculators() {
        let mut binding = ChartBinding::new(ChartType::Funnel).with_x(
            AggregateRef::new("Sales").with_calculator(Calculator::RunningTotal { break_by: None }),
        );
        let mut warnings: Vec<String> = Vec::new();
        {
            let mut ctx =
                EditContext::new(EngineConfig::default(), &DefaultCatalog, &NoGeoLookup, &mut warnings);
            clear_calculators(&mut binding, ChartType::Funnel, &mut ctx);
        }
        assert_eq!(binding.x_fields[0].as_aggregate().unwrap().calculator, None);
        assert_eq!(warnings.len(), 1);
    }
}
