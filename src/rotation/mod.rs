//! Click-drag rotation with idle auto rotation
//!
//! [`PointerController`] owns the drag state machine and hit testing,
//! [`RotationEngine`] owns the resume timer and angle math, and
//! [`CharacterRotator`] glues them to a node in the scene.

pub mod engine;
pub mod pointer;

pub use engine::{RotationEngine, RotationMode, RotationStep};
pub use pointer::{PointerController, PointerFrame, PointerUpdate};

use glam::Vec3;

use crate::config::RotationConfig;
use crate::scene::{ColliderId, NodeId, Orientation, Picking};

/// Rotates one character node about its vertical axis
#[derive(Debug, Clone)]
pub struct CharacterRotator {
    pointer: PointerController,
    engine: RotationEngine,
}

impl CharacterRotator {
    /// `collider` is an optional extra collision volume that counts as the
    /// character even when it is not part of the root's hierarchy.
    pub fn new(root: NodeId, collider: Option<ColliderId>, config: &RotationConfig) -> Self {
        Self {
            pointer: PointerController::new(root, collider, config.character_layers),
            engine: RotationEngine::new(config),
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.pointer.is_dragging()
    }

    pub fn engine(&self) -> &RotationEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut RotationEngine {
        &mut self.engine
    }

    /// Advance one tick and rotate the root node by the resulting angle.
    pub fn tick<S>(&mut self, dt: f32, frame: &PointerFrame, scene: &mut S) -> RotationStep
    where
        S: Orientation + Picking + ?Sized,
    {
        let update = self.pointer.update(frame, &*scene);
        let step = self.engine.step(update, dt);
        if step.angle != 0.0 {
            scene.rotate(self.pointer.root(), Vec3::Y, step.angle);
        }
        step
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{CameraId, LayerMask, RaycastHit};
    use glam::{vec2, Vec2};

    /// Records rotations; the character is hit whenever the pointer x < 100
    #[derive(Default)]
    struct Recorder {
        rotations: Vec<(NodeId, Vec3, f32)>,
        no_camera: bool,
    }

    impl Orientation for Recorder {
        fn rotate(&mut self, node: NodeId, axis: Vec3, degrees: f32) {
            self.rotations.push((node, axis, degrees));
        }
    }

    impl Picking for Recorder {
        fn main_camera(&self) -> Option<CameraId> {
            (!self.no_camera).then_some(CameraId(0))
        }

        fn camera_alive(&self, _: CameraId) -> bool {
            !self.no_camera
        }

        fn raycast(&self, _: CameraId, point: Vec2, _: LayerMask) -> Option<RaycastHit> {
            (point.x < 100.0).then_some(RaycastHit {
                node: NodeId(0),
                collider: ColliderId(0),
                distance: 2.0,
            })
        }

        fn is_child_of(&self, node: NodeId, ancestor: NodeId) -> bool {
            node == ancestor
        }
    }

    fn config() -> RotationConfig {
        RotationConfig {
            manual_speed: 8.0,
            auto_enabled: true,
            auto_speed: 30.0,
            auto_direction: 1.0,
            resume_delay: 0.5,
            character_layers: LayerMask::ALL,
        }
    }

    fn total(recorder: &Recorder) -> f32 {
        recorder.rotations.iter().map(|r| r.2).sum()
    }

    #[test]
    fn test_drag_rotates_against_pointer() {
        let mut scene = Recorder::default();
        let mut rotator = CharacterRotator::new(NodeId(0), None, &config());
        let dt = 0.02;

        rotator.tick(dt, &PointerFrame::at(vec2(50.0, 0.0)).with_press(), &mut scene);
        let step = rotator.tick(dt, &PointerFrame::at(vec2(60.0, 0.0)), &mut scene);

        assert_eq!(step.mode, RotationMode::Dragging);
        assert_eq!(scene.rotations.len(), 1);
        let (node, axis, degrees) = scene.rotations[0];
        assert_eq!(node, NodeId(0));
        assert_eq!(axis, Vec3::Y);
        assert!((degrees - (-10.0 * 8.0 * dt)).abs() < 1e-6);
    }

    #[test]
    fn test_missed_press_produces_no_rotation() {
        let mut scene = Recorder::default();
        let mut rotator = CharacterRotator::new(NodeId(0), None, &config());

        rotator.tick(0.1, &PointerFrame::at(vec2(300.0, 0.0)).with_press(), &mut scene);
        rotator.tick(0.1, &PointerFrame::at(vec2(350.0, 0.0)), &mut scene);
        rotator.tick(0.1, &PointerFrame::at(vec2(400.0, 0.0)), &mut scene);

        assert!(!rotator.is_dragging());
        assert!(scene.rotations.is_empty());
    }

    #[test]
    fn test_auto_rotation_resumes_after_delay() {
        let mut scene = Recorder::default();
        let mut rotator = CharacterRotator::new(NodeId(0), None, &config());
        let dt = 0.125;

        rotator.tick(dt, &PointerFrame::at(vec2(10.0, 0.0)).with_press(), &mut scene);
        rotator.tick(dt, &PointerFrame::at(vec2(10.0, 0.0)).with_release(), &mut scene);
        scene.rotations.clear();

        // 0.125 already accumulated on the release tick
        for _ in 0..3 {
            let step = rotator.tick(dt, &PointerFrame::at(vec2(10.0, 0.0)), &mut scene);
            assert_eq!(step.mode, RotationMode::Idle);
        }
        assert!(scene.rotations.is_empty());

        for _ in 0..4 {
            let step = rotator.tick(dt, &PointerFrame::at(vec2(10.0, 0.0)), &mut scene);
            assert_eq!(step.mode, RotationMode::AutoRotating);
        }
        assert_eq!(scene.rotations.len(), 4);
        for &(_, _, degrees) in &scene.rotations {
            assert!((degrees - 30.0 * dt).abs() < 1e-6);
        }
        assert!((total(&scene) - 4.0 * 30.0 * dt).abs() < 1e-4);
    }

    #[test]
    fn test_no_camera_skips_everything() {
        let mut scene = Recorder {
            no_camera: true,
            ..Default::default()
        };
        let mut rotator = CharacterRotator::new(
            NodeId(0),
            None,
            &RotationConfig {
                resume_delay: 0.0,
                ..config()
            },
        );

        for _ in 0..5 {
            let step = rotator.tick(0.1, &PointerFrame::at(vec2(10.0, 0.0)).with_press(), &mut scene);
            assert_eq!(step.mode, RotationMode::Skipped);
        }
        assert!(scene.rotations.is_empty());
        assert!(!rotator.is_dragging());

        scene.no_camera = false;
        let step = rotator.tick(0.1, &PointerFrame::at(vec2(10.0, 0.0)), &mut scene);
        assert_eq!(step.mode, RotationMode::AutoRotating);
    }

    #[test]
    fn test_dragging_suppresses_auto_rotation() {
        let mut scene = Recorder::default();
        let mut rotator = CharacterRotator::new(
            NodeId(0),
            None,
            &RotationConfig {
                resume_delay: 0.0,
                ..config()
            },
        );

        rotator.tick(0.1, &PointerFrame::at(vec2(20.0, 0.0)).with_press(), &mut scene);
        for _ in 0..5 {
            let step = rotator.tick(0.1, &PointerFrame::at(vec2(20.0, 0.0)), &mut scene);
            assert_eq!(step.mode, RotationMode::Dragging);
            assert_eq!(step.angle, 0.0);
        }
        assert!(scene.rotations.is_empty());
    }
}
