//! Pointer interaction: decides when a drag on the character starts and ends

use glam::Vec2;
use tracing::{debug, trace};

use crate::scene::{CameraId, ColliderId, LayerMask, NodeId, Picking};

/// Pointer state sampled once per tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerFrame {
    /// Pointer position in screen pixels, origin bottom-left
    pub position: Vec2,
    /// Primary button went down this tick
    pub pressed: bool,
    /// Primary button went up this tick
    pub released: bool,
}

impl PointerFrame {
    /// A frame with the pointer at `position` and no button transitions
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn with_press(mut self) -> Self {
        self.pressed = true;
        self
    }

    pub fn with_release(mut self) -> Self {
        self.released = true;
        self
    }
}

/// Outcome of one [`PointerController::update`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerUpdate {
    /// No camera could be resolved, nothing was processed
    NoCamera,
    /// A drag is in progress; horizontal movement since the last tick
    Drag { delta_x: f32 },
    /// A drag ended this tick
    Released,
    /// Not dragging
    Idle,
}

/// Tracks drag state for one character.
///
/// The root node, optional designated collider and layer mask are injected at
/// construction. The camera is resolved lazily and re-resolved whenever it is
/// missing.
#[derive(Debug, Clone)]
pub struct PointerController {
    root: NodeId,
    collider: Option<ColliderId>,
    layers: LayerMask,
    camera: Option<CameraId>,
    dragging: bool,
    previous_x: f32,
}

impl PointerController {
    pub fn new(root: NodeId, collider: Option<ColliderId>, layers: LayerMask) -> Self {
        Self {
            root,
            collider,
            layers,
            camera: None,
            dragging: false,
            previous_x: 0.0,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Process one tick of pointer input.
    pub fn update<P: Picking + ?Sized>(&mut self, frame: &PointerFrame, scene: &P) -> PointerUpdate {
        let Some(camera) = self.resolve_camera(scene) else {
            trace!("No camera available, skipping pointer handling");
            return PointerUpdate::NoCamera;
        };

        if frame.pressed {
            self.try_start_drag(camera, frame.position, scene);
        }

        let released = frame.released;
        if released && self.dragging {
            debug!("Drag ended");
        }
        if released {
            self.dragging = false;
        }

        if self.dragging {
            let delta_x = frame.position.x - self.previous_x;
            self.previous_x = frame.position.x;
            PointerUpdate::Drag { delta_x }
        } else if released {
            PointerUpdate::Released
        } else {
            PointerUpdate::Idle
        }
    }

    /// Whether a raycast through `screen_point` lands on this character:
    /// the root itself, any descendant, or the designated collider.
    pub fn hits_character<P: Picking + ?Sized>(
        &self,
        camera: CameraId,
        screen_point: Vec2,
        scene: &P,
    ) -> bool {
        let Some(hit) = scene.raycast(camera, screen_point, self.layers) else {
            return false;
        };

        hit.node == self.root
            || scene.is_child_of(hit.node, self.root)
            || self.collider == Some(hit.collider)
    }

    fn resolve_camera<P: Picking + ?Sized>(&mut self, scene: &P) -> Option<CameraId> {
        match self.camera {
            Some(camera) if scene.camera_alive(camera) => Some(camera),
            _ => {
                self.camera = scene.main_camera();
                self.camera
            }
        }
    }

    fn try_start_drag<P: Picking + ?Sized>(&mut self, camera: CameraId, position: Vec2, scene: &P) {
        if self.hits_character(camera, position, scene) {
            debug!("Drag started at x={}", position.x);
            self.dragging = true;
            self.previous_x = position.x;
        } else {
            trace!("Press at {:?} missed the character", position);
        }
    }
}
