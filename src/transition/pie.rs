//! Pie and donut slice handling
//!
//! Pies draw their slices through the color aesthetic, so entering one moves
//! the slicing dimension from the axes onto Color, and leaving moves it back.

use tracing::debug;

use crate::binding::{
    AestheticRef, AestheticSlot, ChartBinding, ChartFieldRef, ChartType, FrameChannel, FrameKind,
    VisualFrame,
};
use crate::config::EngineConfig;

fn has_axis_dimension(binding: &ChartBinding) -> bool {
    binding.axis_fields().any(|f| f.is_dimension())
}

/// Return the slicing dimension to the axes when leaving a pie
pub fn leave(binding: &mut ChartBinding, old: ChartType, to: ChartType) {
    if !old.is_pie() || to.is_pie() || to == ChartType::Map || has_axis_dimension(binding) {
        return;
    }

    let is_dimension = binding
        .aesthetics
        .get(AestheticSlot::Color)
        .map(|a| a.field.is_dimension())
        .unwrap_or(false);
    if !is_dimension {
        return;
    }
    let Some(color) = binding.aesthetics.take(AestheticSlot::Color) else {
        return;
    };

    let x_has_measure = binding.x_fields.iter().any(|f| f.is_measure());
    let y_has_measure = binding.y_fields.iter().any(|f| f.is_measure());
    debug!(field = %color.field, "slices back to the axes");
    if x_has_measure && !y_has_measure {
        binding.y_fields.push(color.field);
    } else {
        binding.x_fields.push(color.field);
    }
}

fn take_last_dimension(fields: &mut Vec<ChartFieldRef>) -> Option<ChartFieldRef> {
    let index = fields.iter().rposition(|f| f.is_dimension())?;
    Some(fields.remove(index))
}

/// Slice a pie by the last axis dimension when no aesthetic slices it yet
pub fn enter(binding: &mut ChartBinding, to: ChartType, config: &EngineConfig) {
    if !to.is_pie() || binding.multi_style || binding.aesthetics.has_dimension() {
        return;
    }

    let field = take_last_dimension(&mut binding.x_fields)
        .or_else(|| take_last_dimension(&mut binding.y_fields));
    if let Some(field) = field {
        debug!(field = %field, "slicing pie by dimension");
        let frame = VisualFrame::default_for(FrameChannel::Color, FrameKind::Categorical, config);
        if let Some(replaced) = binding
            .aesthetics
            .set(AestheticSlot::Color, AestheticRef::new(field, frame))
        {
            // A measure on color would otherwise be lost
            binding.y_fields.push(replaced.field);
        }
    }
}
