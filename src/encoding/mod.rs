//! Default-encoding resolver
//!
//! Picks the frame family and kind every aesthetic needs for a chart type:
//! dimension (and discrete measure) fields get categorical frames, measures
//! get linear or static ones, and the shape slot renders as texture, line
//! dash or point symbol depending on what the chart type draws.
//!
//! Resolution only replaces frames that do not fit, so running it twice is a
//! no-op. It never fails: a missing field or frame is simply skipped.

pub mod palettes;
pub mod size;

use tracing::debug;

use crate::binding::{
    AestheticRef, AestheticSlot, Aesthetics, ChartBinding, ChartFieldRef, ChartType,
    FrameChannel, FrameKind, FrameValue, StaticFrames, VisualFrame, DEFAULT_SIZE,
    DEFAULT_SIZE_RANGE,
};
use crate::config::EngineConfig;

pub use size::{is_fake, resolve_size_defaults, size_defaults, size_state, SizeDefaults, SizeState};

/// Frame channel the shape slot renders through for a chart type
pub fn shape_channel(chart_type: ChartType) -> FrameChannel {
    if chart_type.supports_point() {
        FrameChannel::Shape
    } else if chart_type.supports_texture() {
        FrameChannel::Texture
    } else if chart_type.supports_line() {
        FrameChannel::Line
    } else {
        // Nothing drawn per mark; the point symbol frame stays as a placeholder
        FrameChannel::Shape
    }
}

/// Frame channel an aesthetic slot requires for a chart type
pub fn slot_channel(slot: AestheticSlot, chart_type: ChartType) -> FrameChannel {
    match slot {
        AestheticSlot::Color => FrameChannel::Color,
        AestheticSlot::Shape => shape_channel(chart_type),
        AestheticSlot::Size => FrameChannel::Size,
        AestheticSlot::Text => FrameChannel::Text,
    }
}

/// Whether a frame's kind agrees with the field it renders
pub fn kind_fits(field: &ChartFieldRef, kind: FrameKind) -> bool {
    if field.is_categorical() {
        kind == FrameKind::Categorical
    } else {
        kind != FrameKind::Categorical
    }
}

fn required_kind(field: &ChartFieldRef, channel: FrameChannel) -> FrameKind {
    if channel == FrameChannel::Text {
        FrameKind::Static
    } else if field.is_categorical() {
        FrameKind::Categorical
    } else {
        FrameKind::Linear
    }
}

/// Replace the frame of one aesthetic if it does not fit; returns whether it changed
pub fn resolve_aesthetic(
    aesthetic: &mut AestheticRef,
    slot: AestheticSlot,
    chart_type: ChartType,
    config: &EngineConfig,
) -> bool {
    let channel = slot_channel(slot, chart_type);
    let fits = aesthetic.frame.channel() == channel
        && (channel == FrameChannel::Text || kind_fits(&aesthetic.field, aesthetic.frame.kind()));
    if fits {
        return false;
    }

    let kind = required_kind(&aesthetic.field, channel);
    debug!(
        field = %aesthetic.field,
        slot = %slot,
        ?channel,
        ?kind,
        "replacing aesthetic frame"
    );
    aesthetic.frame = replacement_frame(&aesthetic.frame, channel, kind, config);
    true
}

/// Default frame for `channel` and `kind`, keeping the colors of a linear
/// color ramp that turns categorical
fn replacement_frame(
    old: &VisualFrame,
    channel: FrameChannel,
    kind: FrameKind,
    config: &EngineConfig,
) -> VisualFrame {
    let fresh = VisualFrame::default_for(channel, kind, config);
    let ramp = old.is_linear() && old.channel() == FrameChannel::Color;
    let count = match &fresh {
        VisualFrame::Categorical { values, .. } if ramp && channel == FrameChannel::Color => values.len(),
        _ => 0,
    };
    if count == 0 {
        return fresh;
    }

    match old.sample_colors(count) {
        Ok(colors) => VisualFrame::Categorical {
            channel,
            values: colors.iter().map(|c| FrameValue::name(c)).collect(),
        },
        Err(e) => {
            debug!(error = %e, "color ramp cannot be sampled, using the default palette");
            fresh
        }
    }
}

/// Fresh aesthetic ref for a field moved into `slot`
pub fn default_aesthetic(
    field: ChartFieldRef,
    slot: AestheticSlot,
    chart_type: ChartType,
    config: &EngineConfig,
) -> AestheticRef {
    let channel = slot_channel(slot, chart_type);
    let kind = required_kind(&field, channel);
    AestheticRef::new(field, VisualFrame::default_for(channel, kind, config))
}

pub fn resolve_aesthetics(aesthetics: &mut Aesthetics, chart_type: ChartType, config: &EngineConfig) {
    for slot in AestheticSlot::ALL {
        if let Some(aesthetic) = aesthetics.get_mut(slot) {
            resolve_aesthetic(aesthetic, slot, chart_type, config);
        }
    }
}

/// Keep the unbound shape frame in the family the chart type draws
pub fn resolve_static_frames(frames: &mut StaticFrames, chart_type: ChartType, config: &EngineConfig) {
    let channel = shape_channel(chart_type);
    if frames.shape.channel() != channel {
        frames.shape = VisualFrame::static_default(channel, config);
    }
}

/// Re-resolve the chart-level shape frames against `effective_type`
pub fn resolve_shape_frame(binding: &mut ChartBinding, effective_type: ChartType, config: &EngineConfig) {
    if let Some(aesthetic) = binding.aesthetics.get_mut(AestheticSlot::Shape) {
        resolve_aesthetic(aesthetic, AestheticSlot::Shape, effective_type, config);
    }
    resolve_static_frames(&mut binding.frames, effective_type, config);
}

/// Re-resolve the chart-level color frame against `effective_type`
pub fn resolve_color_frame(binding: &mut ChartBinding, effective_type: ChartType, config: &EngineConfig) {
    if let Some(aesthetic) = binding.aesthetics.get_mut(AestheticSlot::Color) {
        resolve_aesthetic(aesthetic, AestheticSlot::Color, effective_type, config);
    }
}

/// Resolve every frame of the binding: chart-level, and per series in
/// multi-style mode using each series' effective type
pub fn resolve_frames(binding: &mut ChartBinding, config: &EngineConfig) {
    let chart_type = binding.resolved_type();
    resolve_aesthetics(&mut binding.aesthetics, chart_type, config);
    resolve_static_frames(&mut binding.frames, chart_type, config);

    if binding.multi_style {
        let view: &ChartBinding = binding;
        let types: Vec<ChartType> = view
            .axis_aggregates()
            .map(|agg| view.effective_type(agg))
            .collect();
        for (agg, series_type) in binding.axis_aggregates_mut().zip(types) {
            resolve_aesthetics(&mut agg.aesthetics, series_type, config);
            resolve_static_frames(&mut agg.frames, series_type, config);
        }
    }
}

fn apply_size(
    aesthetics: &mut Aesthetics,
    frames: &mut StaticFrames,
    previous: &SizeState,
    defaults: SizeDefaults,
) {
    let untouched = match frames.size.size_range() {
        Some((from, to)) => from == to && (from == DEFAULT_SIZE || previous.holds_size(from)),
        None => true,
    };
    if untouched {
        frames.size = VisualFrame::Static {
            channel: FrameChannel::Size,
            value: FrameValue::Number(defaults.size),
        };
    }

    if let Some(aesthetic) = aesthetics.get_mut(AestheticSlot::Size) {
        if let VisualFrame::Linear { from, to, .. } = &mut aesthetic.frame {
            let range = (from.as_number(), to.as_number());
            let untouched = match range {
                (Some(min), Some(max)) => {
                    (min, max) == DEFAULT_SIZE_RANGE || previous.holds_range(min, max)
                }
                _ => true,
            };
            if untouched {
                *from = FrameValue::Number(defaults.min);
                *to = FrameValue::Number(defaults.max);
            }
        }
    }
}

/// Move size frames to the defaults of the current type(s)
///
/// Only sizes still holding a default are touched: a fresh frame, or the
/// defaults in effect before the edit (`previous`). Sizes the user tuned are
/// kept.
pub fn apply_size_defaults(binding: &mut ChartBinding, previous: &SizeState) {
    let chart_type = binding.resolved_type();
    let defaults = resolve_size_defaults(binding, chart_type);
    apply_size(&mut binding.aesthetics, &mut binding.frames, previous, defaults);

    if binding.multi_style {
        let view: &ChartBinding = binding;
        let series: Vec<SizeDefaults> = view
            .axis_aggregates()
            .map(|agg| resolve_size_defaults(view, view.effective_type(agg)))
            .collect();
        for (agg, defaults) in binding.axis_aggregates_mut().zip(series) {
            apply_size(&mut agg.aesthetics, &mut agg.frames, previous, defaults);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::{AggregateRef, DimensionRef};

    fn config() -> EngineConfig {
        EngineConfig::default()
    }

    fn with_aesthetic(
        binding: ChartBinding,
        slot: AestheticSlot,
        field: ChartFieldRef,
        frame: VisualFrame,
    ) -> ChartBinding {
        let mut binding = binding;
        binding.aesthetics.set(slot, AestheticRef::new(field, frame));
        binding
    }

    #[test]
    fn test_shape_channel() {
        assert_eq!(shape_channel(ChartType::Bar), FrameChannel::Texture);
        assert_eq!(shape_channel(ChartType::Line), FrameChannel::Line);
        assert_eq!(shape_channel(ChartType::Point), FrameChannel::Shape);
        assert_eq!(shape_channel(ChartType::Map), FrameChannel::Shape);
    }

    #[test]
    fn test_dimension_gets_categorical_frame() {
        let frame = VisualFrame::default_for(FrameChannel::Color, FrameKind::Linear, &config());
        let mut binding = with_aesthetic(
            ChartBinding::new(ChartType::Bar).with_y(AggregateRef::new("Sales")),
            AestheticSlot::Color,
            ChartFieldRef::dimension("Region"),
            frame,
        );

        resolve_frames(&mut binding, &config());
        let color = binding.aesthetics.get(AestheticSlot::Color).unwrap();
        assert!(color.frame.is_categorical());
    }

    #[test]
    fn test_measure_keeps_static_frame() {
        let frame = VisualFrame::static_default(FrameChannel::Color, &config());
        let mut binding = with_aesthetic(
            ChartBinding::new(ChartType::Bar).with_y(AggregateRef::new("Sales")),
            AestheticSlot::Color,
            ChartFieldRef::aggregate("Profit"),
            frame.clone(),
        );

        resolve_frames(&mut binding, &config());
        assert_eq!(binding.aesthetics.get(AestheticSlot::Color).unwrap().frame, frame);
    }

    #[test]
    fn test_measure_loses_categorical_frame() {
        let frame = VisualFrame::default_for(FrameChannel::Size, FrameKind::Categorical, &config());
        let mut binding = with_aesthetic(
            ChartBinding::new(ChartType::Point).with_y(AggregateRef::new("Sales")),
            AestheticSlot::Size,
            ChartFieldRef::aggregate("Profit"),
            frame,
        );

        resolve_frames(&mut binding, &config());
        assert!(binding.aesthetics.get(AestheticSlot::Size).unwrap().frame.is_linear());
    }

    #[test]
    fn test_shape_becomes_texture_for_bars() {
        let frame = VisualFrame::default_for(FrameChannel::Shape, FrameKind::Categorical, &config());
        let mut binding = with_aesthetic(
            ChartBinding::new(ChartType::Bar)
                .with_x(DimensionRef::new("Region"))
                .with_y(AggregateRef::new("Sales")),
            AestheticSlot::Shape,
            ChartFieldRef::dimension("Segment"),
            frame,
        );

        resolve_shape_frame(&mut binding, ChartType::Bar, &config());
        let shape = binding.aesthetics.get(AestheticSlot::Shape).unwrap();
        assert_eq!(shape.frame.channel(), FrameChannel::Texture);
        assert!(shape.frame.is_categorical());
        assert_eq!(binding.frames.shape.channel(), FrameChannel::Texture);
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let frame = VisualFrame::default_for(FrameChannel::Shape, FrameKind::Linear, &config());
        let mut binding = with_aesthetic(
            ChartBinding::new(ChartType::Line)
                .with_x(DimensionRef::new("Month"))
                .with_y(AggregateRef::new("Sales")),
            AestheticSlot::Shape,
            ChartFieldRef::dimension("Segment"),
            frame,
        );

        resolve_frames(&mut binding, &config());
        let once = binding.clone();
        resolve_frames(&mut binding, &config());
        assert_eq!(binding, once);
    }

    #[test]
    fn test_multi_style_resolves_per_series() {
        let mut binding = ChartBinding::new(ChartType::Bar)
            .with_x(DimensionRef::new("Month"))
            .with_y(AggregateRef::new("Sales"))
            .with_y(AggregateRef::new("Profit").with_chart_type(ChartType::Line));
        binding.multi_style = true;

        resolve_frames(&mut binding, &config());
        let sales = binding.y_fields[0].as_aggregate().unwrap();
        let profit = binding.y_fields[1].as_aggregate().unwrap();
        assert_eq!(sales.frames.shape.channel(), FrameChannel::Texture);
        assert_eq!(profit.frames.shape.channel(), FrameChannel::Line);
    }

    #[test]
    fn test_apply_size_defaults() {
        let frame = VisualFrame::default_for(FrameChannel::Size, FrameKind::Linear, &config());
        let mut binding = with_aesthetic(
            ChartBinding::new(ChartType::Bar)
                .with_x(DimensionRef::new("Region"))
                .with_y(AggregateRef::new("Sales")),
            AestheticSlot::Size,
            ChartFieldRef::aggregate("Profit"),
            frame,
        );

        let previous = size_state(&binding);
        apply_size_defaults(&mut binding, &previous);
        assert_eq!(binding.frames.size.size_range(), Some((15.0, 15.0)));
        assert_eq!(
            binding.aesthetics.get(AestheticSlot::Size).unwrap().frame.size_range(),
            Some((10.0, 25.0))
        );
    }

    #[test]
    fn test_size_defaults_keep_tuned_sizes() {
        let tuned = VisualFrame::Linear {
            channel: FrameChannel::Size,
            from: FrameValue::Number(2.0),
            to: FrameValue::Number(8.0),
        };
        let mut binding = with_aesthetic(
            ChartBinding::new(ChartType::Point)
                .with_x(AggregateRef::new("Sales"))
                .with_y(AggregateRef::new("Profit")),
            AestheticSlot::Size,
            ChartFieldRef::aggregate("Quantity"),
            tuned,
        );
        binding.frames.size = VisualFrame::Static {
            channel: FrameChannel::Size,
            value: FrameValue::Number(9.0),
        };

        let previous = size_state(&binding);
        binding.chart_type = ChartType::Line;
        apply_size_defaults(&mut binding, &previous);
        assert_eq!(binding.frames.size.size_range(), Some((9.0, 9.0)));
        assert_eq!(
            binding.aesthetics.get(AestheticSlot::Size).unwrap().frame.size_range(),
            Some((2.0, 8.0))
        );
    }

    #[test]
    fn test_size_defaults_follow_type_change() {
        let mut binding = ChartBinding::new(ChartType::Point)
            .with_x(DimensionRef::new("Region"))
            .with_y(AggregateRef::new("Sales"));
        let previous = size_state(&binding);
        apply_size_defaults(&mut binding, &previous);
        assert_eq!(binding.frames.size.size_range(), Some((6.0, 6.0)));

        let previous = size_state(&binding);
        binding.chart_type = ChartType::Line;
        apply_size_defaults(&mut binding, &previous);
        assert_eq!(binding.frames.size.size_range(), Some((3.0, 3.0)));
    }

    #[test]
    fn test_linear_color_ramp_keeps_colors_when_categorical() {
        let ramp = VisualFrame::Linear {
            channel: FrameChannel::Color,
            from: FrameValue::name("white"),
            to: FrameValue::name("black"),
        };
        let mut binding = with_aesthetic(
            ChartBinding::new(ChartType::Bar).with_y(AggregateRef::new("Sales")),
            AestheticSlot::Color,
            ChartFieldRef::dimension("Region"),
            ramp,
        );

        resolve_frames(&mut binding, &config());
        let frame = &binding.aesthetics.get(AestheticSlot::Color).unwrap().frame;
        match frame {
            VisualFrame::Categorical { values, .. } => {
                assert_eq!(values.first(), Some(&FrameValue::name("#ffffff")));
                assert_eq!(values.last(), Some(&FrameValue::name("#000000")));
            }
            other => panic!("expected categorical frame, got {:?}", other),
        }
    }
}
