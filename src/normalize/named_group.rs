//! Named-group consistency
//!
//! A dimension bound both to an axis channel and to an aesthetic must show
//! the same buckets in both places. Geo fields never carry named groups of
//! their own; raw values mapped to one geographic entity are folded into
//! the matching axis dimension's named group instead.

use std::collections::BTreeMap;

use tracing::debug;

use crate::binding::{
    ChartBinding, ChartFieldRef, ChartType, DimensionRef, NamedGroup, SortOrder, ValueGroup,
};
use crate::context::{EditContext, EditOrigin};

/// Named group plus the ordering that travels with it
#[derive(Debug, Clone, PartialEq)]
struct GroupSettings {
    named_group: Option<NamedGroup>,
    order: SortOrder,
    manual_order: Vec<String>,
}

impl GroupSettings {
    fn of(dim: &DimensionRef) -> Self {
        Self {
            named_group: dim.named_group.clone(),
            order: dim.order,
            manual_order: dim.manual_order.clone(),
        }
    }

    fn apply_to(&self, dim: &mut DimensionRef) {
        dim.named_group = self.named_group.clone();
        dim.order = self.order;
        dim.manual_order = self.manual_order.clone();
    }
}

fn axis_dims(binding: &ChartBinding) -> impl Iterator<Item = &DimensionRef> {
    binding
        .x_fields
        .iter()
        .chain(binding.y_fields.iter())
        .chain(binding.group_fields.iter())
        .filter_map(|f| f.as_dimension())
}

fn axis_dims_mut(binding: &mut ChartBinding) -> impl Iterator<Item = &mut DimensionRef> {
    binding
        .x_fields
        .iter_mut()
        .chain(binding.y_fields.iter_mut())
        .chain(binding.group_fields.iter_mut())
        .filter_map(|f| f.as_dimension_mut())
}

/// Visit every dimension bound to an aesthetic, chart-level or per series
fn for_each_aesthetic_dim(binding: &ChartBinding, f: &mut dyn FnMut(&DimensionRef)) {
    for (_, aesthetic) in binding.aesthetics.iter() {
        if let Some(dim) = aesthetic.field.as_dimension() {
            f(dim);
        }
    }
    for agg in binding.axis_aggregates() {
        for (_, aesthetic) in agg.aesthetics.iter() {
            if let Some(dim) = aesthetic.field.as_dimension() {
                f(dim);
            }
        }
    }
}

fn for_each_aesthetic_dim_mut(binding: &mut ChartBinding, f: &mut dyn FnMut(&mut DimensionRef)) {
    for aesthetic in binding.aesthetics.iter_mut() {
        if let Some(dim) = aesthetic.field.as_dimension_mut() {
            f(dim);
        }
    }
    for agg in binding.axis_aggregates_mut() {
        for aesthetic in agg.aesthetics.iter_mut() {
            if let Some(dim) = aesthetic.field.as_dimension_mut() {
                f(dim);
            }
        }
    }
}

/// Propagate named groups between axis and aesthetic copies of a dimension.
///
/// Axis edits push the axis settings onto the aesthetic copy; legend edits
/// push the aesthetic settings back onto the axis copy.
pub fn sync_aesthetic_named_groups(binding: &mut ChartBinding, origin: EditOrigin) {
    match origin {
        EditOrigin::Axis => {
            let mut sources: BTreeMap<String, GroupSettings> = BTreeMap::new();
            for dim in axis_dims(binding) {
                sources
                    .entry(dim.full_name())
                    .or_insert_with(|| GroupSettings::of(dim));
            }
            for_each_aesthetic_dim_mut(binding, &mut |dim| {
                sync_one(dim, &sources);
            });
        }
        EditOrigin::Legend => {
            let mut sources: BTreeMap<String, GroupSettings> = BTreeMap::new();
            for_each_aesthetic_dim(binding, &mut |dim| {
                sources
                    .entry(dim.full_name())
                    .or_insert_with(|| GroupSettings::of(dim));
            });
            for dim in axis_dims_mut(binding) {
                sync_one(dim, &sources);
            }
        }
    }
}

fn sync_one(dim: &mut DimensionRef, sources: &BTreeMap<String, GroupSettings>) {
    let Some(source) = sources.get(&dim.full_name()) else {
        return;
    };
    if source.named_group != dim.named_group {
        debug!(field = %dim.full_name(), "syncing named group");
        source.apply_to(dim);
    }
}

/// Explicit groups for geographic codes matched by more than one raw value.
/// Each group is named after its first raw value in sorted order.
fn duplicate_mappings(dim: &DimensionRef) -> Vec<ValueGroup> {
    let mut by_code: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for m in &dim.geo_matches {
        let values = by_code.entry(m.code.as_str()).or_default();
        if !values.contains(&m.value) {
            values.push(m.value.clone());
        }
    }

    by_code
        .into_values()
        .filter(|values| values.len() > 1)
        .map(|mut values| {
            values.sort();
            ValueGroup {
                name: values[0].clone(),
                values,
            }
        })
        .collect()
}

fn merge_groups(dim: &mut DimensionRef, groups: &[ValueGroup]) {
    match &mut dim.named_group {
        None => {
            dim.named_group = Some(NamedGroup::Explicit {
                groups: groups.to_vec(),
            });
        }
        Some(NamedGroup::Explicit { groups: existing }) => {
            for group in groups {
                let present = existing.iter().any(|g| {
                    g.name == group.name || g.values.iter().any(|v| group.values.contains(v))
                });
                if !present {
                    existing.push(group.clone());
                }
            }
        }
        // Condition groups cannot hold value lists
        Some(NamedGroup::Condition { .. }) => {}
    }
}

/// Fold duplicate geo mappings into matching axis dimensions and strip
/// named groups from the geo fields themselves.
pub fn merge_geo_named_groups(binding: &mut ChartBinding) {
    let Some(geo_fields) = binding.geo_fields_mut() else {
        return;
    };

    let mut merges: Vec<(String, Vec<ValueGroup>)> = Vec::new();
    for field in geo_fields.iter_mut() {
        let Some(dim) = field.as_dimension_mut() else {
            continue;
        };
        let groups = duplicate_mappings(dim);
        if !groups.is_empty() {
            merges.push((dim.column.clone(), groups));
        }
        dim.named_group = None;
        dim.manual_order.clear();
        dim.order = dim.order.plain();
    }

    for (column, groups) in merges {
        for dim in axis_dims_mut(binding) {
            if dim.column == column {
                debug!(field = %dim.full_name(), count = groups.len(), "merging geo duplicates");
                merge_groups(dim, &groups);
            }
        }
    }
}

/// Clear named groups the chart type cannot render, downgrading any manual
/// order that depended on them. One warning per affected field.
pub fn strip_unsupported(binding: &mut ChartBinding, chart_type: ChartType, ctx: &mut EditContext) {
    if chart_type.supports_named_group() {
        return;
    }

    binding.for_each_field_mut(&mut |field: &mut ChartFieldRef| {
        let Some(dim) = field.as_dimension_mut() else {
            return;
        };
        if dim.named_group.take().is_some() {
            if dim.order == SortOrder::Specific {
                dim.order = SortOrder::Asc;
                dim.manual_order.clear();
            }
            ctx.warn("namedgroup.unsupported", &[&dim.full_name(), chart_type.name()]);
        }
    });
}
