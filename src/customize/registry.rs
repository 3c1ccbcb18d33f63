//! Attachment registry: one selection slot per attachment kind

use std::collections::HashMap;

use tracing::debug;

use super::slot::{AttachmentKind, CycleDirection, SlotBinding, VariantSlot};
use crate::scene::Activation;

/// Owns the attachment slots of one character, keyed by kind.
///
/// The key set is fixed at construction; only the slots' current indices
/// change afterwards.
#[derive(Debug, Clone, Default)]
pub struct SlotRegistry {
    slots: HashMap<AttachmentKind, VariantSlot>,
}

impl SlotRegistry {
    /// Build the lookup. A kind listed twice keeps its last entry.
    ///
    /// Nothing is activated here; the scene is assumed to already show the
    /// variant at each slot's start index.
    pub fn new<I>(bindings: I) -> Self
    where
        I: IntoIterator<Item = SlotBinding>,
    {
        let mut slots = HashMap::new();
        for binding in bindings {
            let slot = VariantSlot::new(binding.kind, binding.variants)
                .with_current_index(binding.start_index);
            slots.insert(binding.kind, slot);
        }
        Self { slots }
    }

    /// Get the slot for a kind
    pub fn get(&self, kind: AttachmentKind) -> Option<&VariantSlot> {
        self.slots.get(&kind)
    }

    /// All registered kinds, in declaration order of the enum
    pub fn kinds(&self) -> impl Iterator<Item = AttachmentKind> + '_ {
        AttachmentKind::ALL
            .into_iter()
            .filter(move |kind| self.slots.contains_key(kind))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Cycle the slot for `kind`.
    ///
    /// Unknown kinds and empty slots are silent no-ops. Otherwise exactly two
    /// activation calls are made: the old variant off, the new one on.
    pub fn cycle<A: Activation + ?Sized>(
        &mut self,
        kind: AttachmentKind,
        direction: CycleDirection,
        scene: &mut A,
    ) {
        let Some(slot) = self.slots.get_mut(&kind) else {
            debug!("No {} slot registered, ignoring cycle", kind);
            return;
        };

        match slot.cycle(direction, scene) {
            Some(index) => debug!("{} -> variant {} of {}", kind, index, slot.len()),
            None => debug!("{} slot has no variants, ignoring cycle", kind),
        }
    }
}
