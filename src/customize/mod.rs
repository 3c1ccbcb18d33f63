//! Character customization module
//!
//! Attachment slots, outfit meshes and the UI commands that cycle them.

pub mod command;
pub mod outfit;
pub mod registry;
pub mod slot;

pub use command::{CommandTarget, CustomizationCommand};
pub use outfit::{OutfitBinding, OutfitSwitcher};
pub use registry::SlotRegistry;
pub use slot::{AttachmentKind, CycleDirection, SlotBinding, VariantSlot};
