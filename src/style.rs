//! Separated and multi-style rendering modes
//!
//! Toggling a mode moves style settings between the shared chart-level
//! representation and the per-series one, always in the direction of the
//! new state. Leaving multi-style keeps the first series' settings.

use tracing::{debug, info};

use crate::binding::{
    AestheticSlot, Aesthetics, ChartBinding, ChartDescriptor, ChartType, LegendDescriptor,
    LegendsDescriptor, StaticFrames,
};
use crate::context::EditContext;
use crate::encoding;
use crate::normalize;

fn legend_mut(legends: &mut LegendsDescriptor, slot: AestheticSlot) -> Option<&mut LegendDescriptor> {
    match slot {
        AestheticSlot::Color => Some(&mut legends.color),
        AestheticSlot::Shape => Some(&mut legends.shape),
        AestheticSlot::Size => Some(&mut legends.size),
        AestheticSlot::Text => None,
    }
}

/// Switch between one shared axis and one axis per measure
pub fn apply_separated(binding: &mut ChartBinding, separated: bool) {
    if binding.separated == separated {
        return;
    }

    let chart_axis = binding.axis.primary.clone();
    let mut promoted = None;
    if let Some(first) = binding.axis_aggregates_mut().next() {
        if separated {
            first.axis.copy_style_from(&chart_axis);
        } else {
            promoted = Some(first.axis.clone());
        }
    }
    if let Some(axis) = promoted {
        binding.axis.primary.copy_style_from(&axis);
    }

    debug!(separated, "axis mode changed");
    binding.separated = separated;
}

/// Switch between shared and per-series aesthetics
pub fn apply_multi_style(binding: &mut ChartBinding, descriptor: &mut ChartDescriptor, multi_style: bool) {
    if binding.multi_style == multi_style {
        return;
    }
    if multi_style {
        enter_multi_style(binding, descriptor);
    } else {
        leave_multi_style(binding, descriptor);
    }
    debug!(multi_style, "style mode changed");
    binding.multi_style = multi_style;
}

fn enter_multi_style(binding: &mut ChartBinding, descriptor: &ChartDescriptor) {
    if binding.axis_aggregates().next().is_none() {
        return;
    }

    let chart_type = binding.chart_type;
    let aesthetics = std::mem::take(&mut binding.aesthetics);
    let frames = binding.frames.clone();
    for agg in binding.axis_aggregates_mut() {
        agg.aesthetics = aesthetics.clone();
        agg.frames = frames.clone();
        if agg.chart_type == ChartType::Auto {
            agg.chart_type = chart_type;
        }
        agg.text_format = descriptor.plot.text_format.clone();

        let mut legends = descriptor.legends.clone();
        for slot in AestheticSlot::ALL {
            if let (Some(aesthetic), Some(legend)) =
                (agg.aesthetics.get_mut(slot), legend_mut(&mut legends, slot))
            {
                aesthetic.legend = legend.clone();
            }
        }
    }
}

fn leave_multi_style(binding: &mut ChartBinding, descriptor: &mut ChartDescriptor) {
    let mut first = true;
    let mut promoted: Option<(Aesthetics, StaticFrames)> = None;
    for agg in binding.axis_aggregates_mut() {
        if first {
            first = false;
            descriptor.plot.text_format = agg.text_format.clone();
            for slot in AestheticSlot::ALL {
                if let (Some(aesthetic), Some(legend)) =
                    (agg.aesthetics.get(slot), legend_mut(&mut descriptor.legends, slot))
                {
                    *legend = aesthetic.legend.clone();
                }
            }
            promoted = Some((
                std::mem::take(&mut agg.aesthetics),
                std::mem::take(&mut agg.frames),
            ));
        } else {
            agg.aesthetics = Aesthetics::default();
            agg.frames = StaticFrames::default();
        }
        agg.chart_type = ChartType::Auto;
    }

    if let Some((aesthetics, frames)) = promoted {
        binding.aesthetics = aesthetics;
        binding.frames = frames;
    }
}

/// Apply both mode flags, then re-resolve frames and re-normalize
pub fn toggle(
    binding: &mut ChartBinding,
    descriptor: &mut ChartDescriptor,
    separated: bool,
    multi_style: bool,
    ctx: &mut EditContext,
) {
    info!(separated, multi_style, "toggling style mode");
    let sizes = encoding::size_state(binding);
    apply_separated(binding, separated);
    apply_multi_style(binding, descriptor, multi_style);

    let config = ctx.config.clone();
    encoding::resolve_frames(binding, &config);
    encoding::apply_size_defaults(binding, &sizes);
    normalize::normalize(binding, ctx);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::{
        AestheticRef, AggregateRef, DimensionRef, FrameChannel, FrameKind, VisualFrame,
    };
    use crate::config::EngineConfig;

    fn two_series() -> ChartBinding {
        let mut binding = ChartBinding::new(ChartType::Bar)
            .with_x(DimensionRef::new("Month"))
            .with_y(AggregateRef::new("Sales"))
            .with_y(AggregateRef::new("Profit"));
        let frame = VisualFrame::default_for(
            FrameChannel::Color,
            FrameKind::Categorical,
            &EngineConfig::default(),
        );
        binding.aesthetics.set(
            AestheticSlot::Color,
            AestheticRef::new(DimensionRef::new("Region").into(), frame),
        );
        binding
    }

    #[test]
    fn test_separated_copies_style_but_not_format() {
        let mut binding = two_series();
        binding.separated = false;
        binding.axis.primary.label_color = Some("#ff0000".to_string());
        binding.axis.primary.format = Some("0.00".to_string());

        apply_separated(&mut binding, true);
        let first = binding.y_fields[0].as_aggregate().unwrap();
        assert_eq!(first.axis.label_color.as_deref(), Some("#ff0000"));
        assert_eq!(first.axis.format, None);
        assert!(binding.separated);
    }

    #[test]
    fn test_combined_promotes_first_axis() {
        let mut binding = two_series();
        binding.y_fields[0].as_aggregate_mut().unwrap().axis.rotation = Some(45.0);

        apply_separated(&mut binding, false);
        assert_eq!(binding.axis.primary.rotation, Some(45.0));
        assert!(!binding.separated);
    }

    #[test]
    fn test_enter_multi_style_copies_to_every_series() {
        let mut binding = two_series();
        let mut descriptor = ChartDescriptor::default();
        descriptor.plot.text_format.format = Some("$0".to_string());
        descriptor.legends.color.title = Some("Regions".to_string());

        apply_multi_style(&mut binding, &mut descriptor, true);
        assert!(binding.multi_style);
        assert!(binding.aesthetics.is_empty());
        for agg in binding.axis_aggregates() {
            assert_eq!(agg.chart_type, ChartType::Bar);
            assert_eq!(agg.text_format.format.as_deref(), Some("$0"));
            let color = agg.aesthetics.get(AestheticSlot::Color).unwrap();
            assert_eq!(color.field.full_name(), "Region");
            assert_eq!(color.legend.title.as_deref(), Some("Regions"));
        }
    }

    #[test]
    fn test_leave_multi_style_keeps_first_series() {
        let mut binding = two_series();
        let mut descriptor = ChartDescriptor::default();
        apply_multi_style(&mut binding, &mut descriptor, true);

        binding.y_fields[0].as_aggregate_mut().unwrap().text_format.format = Some("first".to_string());
        binding.y_fields[1].as_aggregate_mut().unwrap().text_format.format = Some("second".to_string());
        if let Some(color) = binding.y_fields[0]
            .as_aggregate_mut()
            .unwrap()
            .aesthetics
            .get_mut(AestheticSlot::Color)
        {
            color.legend.title = Some("First legend".to_string());
        }

        apply_multi_style(&mut binding, &mut descriptor, false);
        assert!(!binding.multi_style);
        assert_eq!(descriptor.plot.text_format.format.as_deref(), Some("first"));
        assert_eq!(descriptor.legends.color.title.as_deref(), Some("First legend"));
        assert!(binding.aesthetics.is_bound(AestheticSlot::Color));
        for agg in binding.axis_aggregates() {
            assert!(agg.aesthetics.is_empty());
            assert_eq!(agg.chart_type, ChartType::Auto);
        }
    }

    #[test]
    fn test_multi_style_without_measures_keeps_chart_aesthetics() {
        let mut binding = ChartBinding::new(ChartType::Point).with_x(DimensionRef::new("Month"));
        let frame = VisualFrame::static_default(FrameChannel::Color, &EngineConfig::default());
        binding.aesthetics.set(
            AestheticSlot::Color,
            AestheticRef::new(AggregateRef::new("Sales").into(), frame),
        );
        let mut descriptor = ChartDescriptor::default();

        apply_multi_style(&mut binding, &mut descriptor, true);
        assert!(binding.multi_style);
        assert!(binding.aesthetics.is_bound(AestheticSlot::Color));
    }
}
