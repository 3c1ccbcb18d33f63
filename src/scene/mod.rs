//! Rendering collaborator interface.
//!
//! The customization and rotation core never owns scene objects. It talks to
//! the renderer through the small traits below, using opaque `Copy` handles.
//! [`HeadlessScene`] is an in-memory implementation used by the CLI driver
//! and by tests.

pub mod headless;

pub use headless::{HeadlessCamera, HeadlessScene};

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Handle to a scene node (a showable/hideable object with a transform)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// Handle to a mesh asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshId(pub u32);

/// Handle to a skinned mesh renderer (a single mesh slot on a node)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RendererId(pub u32);

/// Handle to a collision volume
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColliderId(pub u32);

/// Handle to a camera
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CameraId(pub u32);

/// Bit mask of the collision layers a raycast considers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const ALL: LayerMask = LayerMask(u32::MAX);
    pub const NONE: LayerMask = LayerMask(0);

    /// Mask containing a single layer
    pub fn layer(layer: u8) -> Self {
        Self(1u32.checked_shl(layer as u32).unwrap_or(0))
    }

    /// Whether `layer` is part of this mask
    pub fn contains(self, layer: u8) -> bool {
        self.0 & Self::layer(layer).0 != 0
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::ALL
    }
}

/// Nearest hit returned by [`Picking::raycast`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    /// Node owning the collider that was hit
    pub node: NodeId,
    /// Collider that was hit
    pub collider: ColliderId,
    /// Distance along the ray
    pub distance: f32,
}

/// Show/hide objects.
pub trait Activation {
    fn set_active(&mut self, node: NodeId, active: bool);
}

/// Read and assign the shared mesh of a renderer.
pub trait MeshAssignment {
    fn shared_mesh(&self, renderer: RendererId) -> Option<MeshId>;
    fn set_shared_mesh(&mut self, renderer: RendererId, mesh: MeshId);
}

/// Rotate a node about an axis in its local frame. Positive degrees turn
/// clockwise as seen from the tip of the axis, so about +Y that is
/// clockwise seen from above.
pub trait Orientation {
    fn rotate(&mut self, node: NodeId, axis: Vec3, degrees: f32);
}

/// Camera lookup, screen-space raycasts and hierarchy queries.
pub trait Picking {
    /// The camera pointer input is projected through, if one exists right now
    fn main_camera(&self) -> Option<CameraId>;

    /// Whether a previously resolved camera still exists
    fn camera_alive(&self, camera: CameraId) -> bool;

    /// Cast a ray from `camera` through `screen_point` and return the nearest
    /// hit on a collider whose layer is in `layers`.
    fn raycast(&self, camera: CameraId, screen_point: Vec2, layers: LayerMask)
        -> Option<RaycastHit>;

    /// Whether `node` is a (transitive) descendant of `ancestor`.
    /// A node counts as a child of itself.
    fn is_child_of(&self, node: NodeId, ancestor: NodeId) -> bool;
}

/// Everything a [`Character`](crate::character::Character) needs from the renderer
pub trait Scene: Activation + MeshAssignment + Orientation + Picking {}

impl<T> Scene for T where T: Activation + MeshAssignment + Orientation + Picking {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_mask() {
        assert!(LayerMask::ALL.contains(0));
        assert!(LayerMask::ALL.contains(31));
        assert!(!LayerMask::NONE.contains(0));

        let mask = LayerMask(LayerMask::layer(3).0 | LayerMask::layer(8).0);
        assert!(mask.contains(3));
        assert!(mask.contains(8));
        assert!(!mask.contains(0));
        assert!(!LayerMask::ALL.contains(40));
    }
}
