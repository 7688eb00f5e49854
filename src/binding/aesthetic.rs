//! Aesthetic slots and refs
//!
//! An aesthetic ref binds a field to one of the non-axis channels (color,
//! shape, size, text) together with the visual frame that renders it and the
//! legend descriptor shown for it.

use serde::{Deserialize, Serialize};

use super::descriptor::LegendDescriptor;
use super::field::ChartFieldRef;
use super::frame::{FrameChannel, VisualFrame};

/// Non-axis channel a field can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AestheticSlot {
    Color,
    Shape,
    Size,
    Text,
}

impl AestheticSlot {
    /// Fill order used when fields overflow into aesthetics
    pub const ALL: [AestheticSlot; 4] = [
        AestheticSlot::Color,
        AestheticSlot::Shape,
        AestheticSlot::Size,
        AestheticSlot::Text,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AestheticSlot::Color => "color",
            AestheticSlot::Shape => "shape",
            AestheticSlot::Size => "size",
            AestheticSlot::Text => "text",
        }
    }
}

impl std::fmt::Display for AestheticSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AestheticRef {
    pub field: ChartFieldRef,
    pub frame: VisualFrame,
    #[serde(default)]
    pub legend: LegendDescriptor,
}

impl AestheticRef {
    pub fn new(field: ChartFieldRef, frame: VisualFrame) -> Self {
        Self {
            field,
            frame,
            legend: LegendDescriptor::default(),
        }
    }

    /// Frame channel the ref currently renders through
    pub fn channel(&self) -> FrameChannel {
        self.frame.channel()
    }
}

/// The four aesthetic slots of a chart or of one series
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Aesthetics {
    #[serde(default)]
    pub color: Option<AestheticRef>,
    #[serde(default)]
    pub shape: Option<AestheticRef>,
    #[serde(default)]
    pub size: Option<AestheticRef>,
    #[serde(default)]
    pub text: Option<AestheticRef>,
}

impl Aesthetics {
    pub fn get(&self, slot: AestheticSlot) -> Option<&AestheticRef> {
        match slot {
            AestheticSlot::Color => self.color.as_ref(),
            AestheticSlot::Shape => self.shape.as_ref(),
            AestheticSlot::Size => self.size.as_ref(),
            AestheticSlot::Text => self.text.as_ref(),
        }
    }

    pub fn slot_mut(&mut self, slot: AestheticSlot) -> &mut Option<AestheticRef> {
        match slot {
            AestheticSlot::Color => &mut self.color,
            AestheticSlot::Shape => &mut self.shape,
            AestheticSlot::Size => &mut self.size,
            AestheticSlot::Text => &mut self.text,
        }
    }

    pub fn get_mut(&mut self, slot: AestheticSlot) -> Option<&mut AestheticRef> {
        self.slot_mut(slot).as_mut()
    }

    pub fn set(&mut self, slot: AestheticSlot, aesthetic: AestheticRef) -> Option<AestheticRef> {
        self.slot_mut(slot).replace(aesthetic)
    }

    pub fn take(&mut self, slot: AestheticSlot) -> Option<AestheticRef> {
        self.slot_mut(slot).take()
    }

    pub fn is_bound(&self, slot: AestheticSlot) -> bool {
        self.get(slot).is_some()
    }

    pub fn is_empty(&self) -> bool {
        AestheticSlot::ALL.iter().all(|slot| !self.is_bound(*slot))
    }

    /// Bound slots in fill order
    pub fn iter(&self) -> impl Iterator<Item = (AestheticSlot, &AestheticRef)> {
        AestheticSlot::ALL
            .into_iter()
            .filter_map(move |slot| self.get(slot).map(|a| (slot, a)))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut AestheticRef> {
        [
            self.color.as_mut(),
            self.shape.as_mut(),
            self.size.as_mut(),
            self.text.as_mut(),
        ]
        .into_iter()
        .flatten()
    }

    pub fn has_dimension(&self) -> bool {
        self.iter().any(|(_, a)| a.field.is_dimension())
    }

    /// First unbound slot among `order`
    pub fn first_free(&self, order: &[AestheticSlot]) -> Option<AestheticSlot> {
        order.iter().copied().find(|slot| !self.is_bound(*slot))
    }
}
