//! Selection slots: an ordered list of variants with one active index

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::scene::{Activation, NodeId};

/// Attachment categories a character can cycle through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    Beard,
    Armor,
    Hair,
}

impl AttachmentKind {
    pub const ALL: [AttachmentKind; 3] = [Self::Beard, Self::Armor, Self::Hair];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beard => "beard",
            Self::Armor => "armor",
            Self::Hair => "hair",
        }
    }
}

impl std::fmt::Display for AttachmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttachmentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "beard" => Ok(Self::Beard),
            "armor" | "armour" => Ok(Self::Armor),
            "hair" => Ok(Self::Hair),
            other => Err(format!("unknown attachment kind: {}", other)),
        }
    }
}

/// Which way to cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CycleDirection {
    #[default]
    Next,
    Prev,
}

impl CycleDirection {
    /// Move `index` one step in this direction within `[0, len)`, wrapping
    /// at both ends. `len` must be non-zero.
    pub fn step(self, index: usize, len: usize) -> usize {
        debug_assert!(len > 0);
        match self {
            Self::Next => (index + 1) % len,
            Self::Prev => (index + len - 1) % len,
        }
    }

    /// Index to use when the current position is unknown: one before the
    /// first element, so `Next` lands on the first and `Prev` on the last.
    pub fn entry(self, len: usize) -> usize {
        debug_assert!(len > 0);
        match self {
            Self::Next => 0,
            Self::Prev => len - 1,
        }
    }
}

/// One attachment category as handed to [`SlotRegistry::new`](super::SlotRegistry::new)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotBinding {
    pub kind: AttachmentKind,
    pub variants: Vec<NodeId>,
    pub start_index: usize,
}

/// A category of mutually exclusive variants.
///
/// The variant at `current_index` is the active one. Activation itself lives
/// in the scene, the slot only decides which handle to flip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantSlot {
    kind: AttachmentKind,
    variants: Vec<NodeId>,
    current_index: usize,
}

impl VariantSlot {
    pub fn new(kind: AttachmentKind, variants: Vec<NodeId>) -> Self {
        Self {
            kind,
            variants,
            current_index: 0,
        }
    }

    /// Start at `index` instead of the first variant. Out-of-range indices
    /// fall back to 0.
    pub fn with_current_index(mut self, index: usize) -> Self {
        self.current_index = if index < self.variants.len() { index } else { 0 };
        self
    }

    pub fn kind(&self) -> AttachmentKind {
        self.kind
    }

    pub fn variants(&self) -> &[NodeId] {
        &self.variants
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// Index of the active variant (meaningless when the slot is empty)
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Handle of the active variant
    pub fn current(&self) -> Option<NodeId> {
        self.variants.get(self.current_index).copied()
    }

    /// Deactivate the current variant, step, and activate the new one.
    ///
    /// Returns the new index, or `None` for an empty slot (no toggles issued).
    pub fn cycle<A: Activation + ?Sized>(
        &mut self,
        direction: CycleDirection,
        scene: &mut A,
    ) -> Option<usize> {
        let len = self.variants.len();
        if len == 0 {
            return None;
        }

        scene.set_active(self.variants[self.current_index], false);
        self.current_index = direction.step(self.current_index, len);
        scene.set_active(self.variants[self.current_index], true);

        Some(self.current_index)
    }
}
