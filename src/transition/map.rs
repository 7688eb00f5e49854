//! Entering and leaving the map family
//!
//! A map has no value axes: measures become aesthetics and the geographic
//! dimensions move into the variant's geo slot. Leaving hands the geo
//! fields back to X and, when the destination draws values, promotes one
//! measure aesthetic to Y.

use tracing::debug;

use super::reverse::promote_measure_aesthetic;
use super::{place_or_drop, split_fields};
use crate::binding::{AestheticSlot, ChartBinding, ChartFamily, ChartFieldRef, ChartType};
use crate::context::EditContext;
use crate::{ChartError, Result};

fn is_geo_field(field: &ChartFieldRef, ctx: &EditContext) -> bool {
    match field.as_dimension() {
        Some(dim) => dim.geographic || ctx.is_geographic(&dim.column),
        None => false,
    }
}

/// Move geographic dimensions out of `fields`
fn take_geo(fields: &mut Vec<ChartFieldRef>, ctx: &EditContext) -> Vec<ChartFieldRef> {
    let (geo, rest): (Vec<ChartFieldRef>, Vec<ChartFieldRef>) =
        std::mem::take(fields).into_iter().partition(|f| is_geo_field(f, ctx));
    *fields = rest;
    geo
}

fn take_last_non_date(fields: &mut Vec<ChartFieldRef>) -> Option<ChartFieldRef> {
    let index = fields.iter().rposition(|f| f.is_dimension() && !f.is_date())?;
    Some(fields.remove(index))
}

pub fn enter(binding: &mut ChartBinding, to: ChartType, ctx: &mut EditContext) -> Result<()> {
    let (x_dims, x_measures) = split_fields(std::mem::take(&mut binding.x_fields));
    let (y_dims, y_measures) = split_fields(std::mem::take(&mut binding.y_fields));
    binding.x_fields = x_dims;
    binding.y_fields = y_dims;

    for measure in x_measures.into_iter().chain(y_measures) {
        place_or_drop(&mut binding.aesthetics, measure, &AestheticSlot::ALL, to, ctx);
    }

    let mut geo = take_geo(&mut binding.x_fields, ctx);
    geo.extend(take_geo(&mut binding.y_fields, ctx));
    geo.extend(take_geo(&mut binding.group_fields, ctx));

    if geo.is_empty() {
        let fallback = take_last_non_date(&mut binding.x_fields)
            .or_else(|| take_last_non_date(&mut binding.y_fields));
        geo.extend(fallback);
    }

    for field in geo.iter_mut() {
        if let Some(dim) = field.as_dimension_mut() {
            dim.geographic = true;
        }
    }
    debug!(count = geo.len(), "geographic fields");

    let slot = binding
        .geo_fields_mut()
        .ok_or_else(|| ChartError::InternalError(format!("{} chart without a geo slot", to)))?;
    slot.extend(geo);
    Ok(())
}

/// Geo fields return to X; a measure comes back to Y unless the
/// destination lays its values out in slots
pub fn leave(binding: &mut ChartBinding, to: ChartType) {
    let geo = binding.variant.take_fields();
    debug!(count = geo.len(), "geo fields back to X");
    binding.x_fields.extend(geo);

    if to.family() == ChartFamily::Stock {
        return;
    }
    if !binding.y_fields.iter().any(|f| f.is_measure()) {
        promote_measure_aesthetic(binding, &AestheticSlot::ALL);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::{AggregateRef, BindingVariant, DataType, DimensionRef};
    use crate::config::EngineConfig;
    use crate::context::{DefaultCatalog, KeywordGeoLookup, NoGeoLookup};

    fn map_binding(binding: ChartBinding) -> ChartBinding {
        let mut binding = binding;
        binding.chart_type = ChartType::Map;
        binding.variant = BindingVariant::empty(ChartType::Map.variant_kind());
        binding
    }

    #[test]
    fn test_enter_uses_geo_lookup() {
        let mut binding = map_binding(
            ChartBinding::new(ChartType::Bar)
                .with_x(DimensionRef::new("Product"))
                .with_x(DimensionRef::new("State"))
                .with_y(AggregateRef::new("Sales")),
        );
        let mut warnings: Vec<String> = Vec::new();
        {
            let geo = KeywordGeoLookup::default();
            let mut ctx =
                EditContext::new(EngineConfig::default(), &DefaultCatalog, &geo, &mut warnings);
            enter(&mut binding, ChartType::Map, &mut ctx).unwrap();
        }

        assert_eq!(binding.geo_fields().len(), 1);
        assert_eq!(binding.geo_fields()[0].full_name(), "State");
        assert!(binding.geo_fields()[0].as_dimension().unwrap().geographic);
        assert_eq!(binding.x_fields[0].full_name(), "Product");
        assert!(binding.y_fields.is_empty());
        assert_eq!(
            binding.aesthetics.get(AestheticSlot::Color).unwrap().field.full_name(),
            "Sum(Sales)"
        );
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_enter_falls_back_to_last_non_date_dimension() {
        let mut binding = map_binding(
            ChartBinding::new(ChartType::Bar)
                .with_x(DimensionRef::new("Site"))
                .with_x(DimensionRef::new("Day").with_type(DataType::Date))
                .with_y(AggregateRef::new("Sales")),
        );
        let mut warnings: Vec<String> = Vec::new();
        {
            let mut ctx =
                EditContext::new(EngineConfig::default(), &DefaultCatalog, &NoGeoLookup, &mut warnings);
            enter(&mut binding, ChartType::Map, &mut ctx).unwrap();
        }
        assert_eq!(binding.geo_fields()[0].full_name(), "Site");
        assert_eq!(binding.x_fields.len(), 1);
    }

    #[test]
    fn test_enter_without_geo_slot_is_an_error() {
        let mut binding = ChartBinding::new(ChartType::Bar).with_x(DimensionRef::new("State"));
        let mut warnings: Vec<String> = Vec::new();
        let mut ctx =
            EditContext::new(EngineConfig::default(), &DefaultCatalog, &NoGeoLookup, &mut warnings);
        let result = enter(&mut binding, ChartType::Map, &mut ctx);
        assert!(matches!(result, Err(ChartError::InternalError(_))));
    }

    #[test]
    fn test_leave_restores_axes() {
        let mut binding = map_binding(ChartBinding::new(ChartType::Bar));
        binding.variant = BindingVariant::Map {
            geo_fields: vec![DimensionRef::new("State").geographic().into()],
        };
        let color = crate::encoding::default_aesthetic(
            AggregateRef::new("Sales").into(),
            AestheticSlot::Color,
            ChartType::Map,
            &EngineConfig::default(),
        );
        binding.aesthetics.set(AestheticSlot::Color, color);

        leave(&mut binding, ChartType::Bar);
        assert_eq!(binding.x_fields[0].full_name(), "State");
        assert_eq!(binding.y_fields[0].full_name(), "Sum(Sales)");
        assert!(binding.aesthetics.is_empty());
    }

    #[test]
    fn test_leave_to_stock_keeps_aesthetics() {
        let mut binding = map_binding(ChartBinding::new(ChartType::Bar));
        let color = crate::encoding::default_aesthetic(
            AggregateRef::new("Sales").into(),
            AestheticSlot::Color,
            ChartType::Map,
            &EngineConfig::default(),
        );
        binding.aesthetics.set(AestheticSlot::Color, color);

        leave(&mut binding, ChartType::Stock);
        assert!(binding.y_fields.is_empty());
        assert!(binding.aesthetics.is_bound(AestheticSlot::Color));
    }
}
