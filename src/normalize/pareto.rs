//! Pareto default sort

use tracing::debug;

use crate::binding::{Channel, ChartBinding, ChartType, SortOrder};

fn last_pareto_measure(binding: &ChartBinding, channel: Channel) -> Option<String> {
    binding
        .channel(channel)
        .iter()
        .rev()
        .filter_map(|f| f.as_aggregate())
        .find(|agg| binding.effective_type(agg) == ChartType::Pareto)
        .map(|agg| agg.full_name())
}

/// Sort the innermost category dimension descending by the Pareto measure.
///
/// The measure is the last Pareto aggregate on Y (else X); the dimension is
/// the last one on the opposite axis. A named group with a manual order
/// keeps its order.
pub fn apply_default_sort(binding: &mut ChartBinding) {
    let (measure, dim_channel) = match last_pareto_measure(binding, Channel::Y) {
        Some(m) => (m, Channel::X),
        None => match last_pareto_measure(binding, Channel::X) {
            Some(m) => (m, Channel::Y),
            None => return,
        },
    };

    let Some(dim) = binding
        .channel_mut(dim_channel)
        .iter_mut()
        .rev()
        .find_map(|f| f.as_dimension_mut())
    else {
        return;
    };

    if dim.named_group.is_some() && dim.order == SortOrder::Specific {
        return;
    }

    if dim.order != SortOrder::ValueDesc || dim.sort_by.as_deref() != Some(measure.as_str()) {
        debug!(field = %dim.full_name(), by = %measure, "pareto sort");
        dim.order = SortOrder::ValueDesc;
        dim.sort_by = Some(measure);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::{AggregateRef, DimensionRef, NamedGroup, ValueGroup};

    #[test]
    fn test_pareto_sorts_last_dimension() {
        let mut binding = ChartBinding::new(ChartType::Pareto)
            .with_x(DimensionRef::new("Category"))
            .with_x(DimensionRef::new("Product"))
            .with_y(AggregateRef::new("Sales"))
            .with_y(AggregateRef::new("Profit"));

        apply_default_sort(&mut binding);

        let category = binding.x_fields[0].as_dimension().unwrap();
        assert_eq!(category.order, SortOrder::Asc);
        let product = binding.x_fields[1].as_dimension().unwrap();
        assert_eq!(product.order, SortOrder::ValueDesc);
        assert_eq!(product.sort_by.as_deref(), Some("Sum(Profit)"));
    }

    #[test]
    fn test_horizontal_pareto() {
        let mut binding = ChartBinding::new(ChartType::Pareto)
            .with_x(AggregateRef::new("Sales"))
            .with_y(DimensionRef::new("Product"));
        apply_default_sort(&mut binding);
        let product = binding.y_fields[0].as_dimension().unwrap();
        assert_eq!(product.sort_by.as_deref(), Some("Sum(Sales)"));
    }

    #[test]
    fn test_manual_named_group_order_wins() {
        let group = NamedGroup::Explicit {
            groups: vec![ValueGroup {
                name: "Top".to_string(),
                values: vec!["A".to_string()],
            }],
        };
        let mut binding = ChartBinding::new(ChartType::Pareto)
            .with_x(
                DimensionRef::new("Product")
                    .with_named_group(group)
                    .with_order(SortOrder::Specific),
            )
            .with_y(AggregateRef::new("Sales"));

        apply_default_sort(&mut binding);
        let product = binding.x_fields[0].as_dimension().unwrap();
        assert_eq!(product.order, SortOrder::Specific);
        assert_eq!(product.sort_by, None);
    }

    #[test]
    fn test_non_pareto_untouched() {
        let mut binding = ChartBinding::new(ChartType::Bar)
            .with_x(DimensionRef::new("Product"))
            .with_y(AggregateRef::new("Sales"));
        let before = binding.clone();
        apply_default_sort(&mut binding);
        assert_eq!(binding, before);
    }
}
