//! Outfit switching: cycle the mesh shown by a single renderer

use tracing::debug;

use super::slot::CycleDirection;
use crate::scene::{MeshAssignment, MeshId, RendererId};

/// A renderer and the meshes it can be dressed in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutfitBinding {
    pub renderer: RendererId,
    pub meshes: Vec<MeshId>,
}

/// Cycles outfit meshes on a renderer.
///
/// The current outfit is not stored: it is read back from the renderer on
/// every call, so external mesh changes are picked up. Only the first
/// configured outfit is ever cycled.
#[derive(Debug, Clone, Default)]
pub struct OutfitSwitcher {
    outfits: Vec<OutfitBinding>,
}

impl OutfitSwitcher {
    pub fn new(outfits: Vec<OutfitBinding>) -> Self {
        Self { outfits }
    }

    /// The outfit that [`cycle`](Self::cycle) acts on
    pub fn active_outfit(&self) -> Option<&OutfitBinding> {
        self.outfits.first()
    }

    /// Index of the renderer's current mesh in the outfit list, if it is there
    pub fn current_index<M: MeshAssignment + ?Sized>(&self, scene: &M) -> Option<usize> {
        let outfit = self.active_outfit()?;
        let mesh = scene.shared_mesh(outfit.renderer)?;
        outfit.meshes.iter().position(|&m| m == mesh)
    }

    /// Assign the next/previous mesh to the renderer.
    ///
    /// When the renderer shows a mesh that is not in the list (or nothing at
    /// all), the position is taken as one before the first mesh: `Next`
    /// assigns the first mesh and `Prev` the last. Returns the assigned mesh.
    pub fn cycle<M: MeshAssignment + ?Sized>(
        &self,
        direction: CycleDirection,
        scene: &mut M,
    ) -> Option<MeshId> {
        let Some(outfit) = self.active_outfit() else {
            debug!("No outfit configured, ignoring cycle");
            return None;
        };
        let len = outfit.meshes.len();
        if len == 0 {
            debug!("Outfit has no meshes, ignoring cycle");
            return None;
        }

        let index = match self.current_index(&*scene) {
            Some(current) => direction.step(current, len),
            None => {
                debug!("Current mesh is not part of the outfit, starting from the edge");
                direction.entry(len)
            }
        };

        let mesh = outfit.meshes[index];
        scene.set_shared_mesh(outfit.renderer, mesh);
        debug!("Outfit -> mesh {} of {}", index, len);
        Some(mesh)
    }
}
