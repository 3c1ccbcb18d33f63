//! A customizable, rotatable character

use tracing::{debug, info};

use crate::config::RotationConfig;
use crate::customize::{
    AttachmentKind, CommandTarget, CustomizationCommand, CycleDirection, OutfitBinding,
    OutfitSwitcher, SlotBinding, SlotRegistry,
};
use crate::rotation::{CharacterRotator, PointerFrame, RotationStep};
use crate::scene::{Activation, ColliderId, MeshAssignment, NodeId, Scene};

/// Everything needed to initialize a [`Character`], already resolved to
/// scene handles.
#[derive(Debug, Clone)]
pub struct CharacterSetup {
    /// Node that gets rotated and whose hierarchy counts as "the character"
    pub root: NodeId,
    /// Extra collision volume that counts as the character
    pub collider: Option<ColliderId>,
    pub outfits: Vec<OutfitBinding>,
    pub attachments: Vec<SlotBinding>,
    pub rotation: RotationConfig,
}

/// Per-character customization and viewing state.
///
/// Driven externally: call [`tick`](Self::tick) once per frame and
/// [`apply`](Self::apply) for each UI command.
#[derive(Debug, Clone)]
pub struct Character {
    root: NodeId,
    attachments: SlotRegistry,
    outfits: OutfitSwitcher,
    rotator: CharacterRotator,
}

impl Character {
    pub fn initialize(setup: CharacterSetup) -> Self {
        let attachments = SlotRegistry::new(setup.attachments);
        info!(
            "Character initialized: {} attachment slots, {} outfits",
            attachments.len(),
            setup.outfits.len()
        );

        Self {
            root: setup.root,
            attachments,
            outfits: OutfitSwitcher::new(setup.outfits),
            rotator: CharacterRotator::new(setup.root, setup.collider, &setup.rotation),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn attachments(&self) -> &SlotRegistry {
        &self.attachments
    }

    pub fn outfits(&self) -> &OutfitSwitcher {
        &self.outfits
    }

    pub fn rotator(&self) -> &CharacterRotator {
        &self.rotator
    }

    pub fn rotator_mut(&mut self) -> &mut CharacterRotator {
        &mut self.rotator
    }

    /// Advance rotation by one frame of `dt` seconds.
    pub fn tick<S: Scene + ?Sized>(
        &mut self,
        dt: f32,
        pointer: &PointerFrame,
        scene: &mut S,
    ) -> RotationStep {
        self.rotator.tick(dt, pointer, scene)
    }

    /// Run a UI command.
    pub fn apply<S>(&mut self, command: CustomizationCommand, scene: &mut S)
    where
        S: Activation + MeshAssignment + ?Sized,
    {
        debug!("Applying {:?}", command);
        match command.target() {
            CommandTarget::Outfit(direction) => self.cycle_outfit(direction, scene),
            CommandTarget::Attachment(kind, direction) => {
                self.cycle_attachment(kind, direction, scene)
            }
        }
    }

    pub fn cycle_outfit<M: MeshAssignment + ?Sized>(
        &mut self,
        direction: CycleDirection,
        scene: &mut M,
    ) {
        self.outfits.cycle(direction, scene);
    }

    pub fn cycle_attachment<A: Activation + ?Sized>(
        &mut self,
        kind: AttachmentKind,
        direction: CycleDirection,
        scene: &mut A,
    ) {
        self.attachments.cycle(kind, direction, scene);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::rotation::RotationMode;
    use crate::scene::headless::{HeadlessCamera, VIEWPORT};
    use crate::scene::{HeadlessScene, Picking};
    use glam::{Vec2, Vec3};

    fn setup() -> (HeadlessScene, Character) {
        let config = Config::from_str(
            r#"
            [rotation]
            manual_speed = 10.0
            auto_speed = 30.0
            resume_delay = 0.5

            [[outfits]]
            renderer = "body"
            meshes = ["peasant", "knight", "ranger"]

            [[attachments]]
            kind = "hair"
            variants = ["hair_0", "hair_1", "hair_2"]

            [[attachments]]
            kind = "armor"
            variants = ["armor_none", "armor_plate"]
            "#,
        )
        .unwrap();
        let (scene, setup) = HeadlessScene::from_config(&config).unwrap();
        (scene, Character::initialize(setup))
    }

    fn active_hair(scene: &HeadlessScene) -> Vec<&str> {
        scene
            .active_children(scene.node("character").unwrap())
            .into_iter()
            .filter(|name| name.starts_with("hair"))
            .collect()
    }

    #[test]
    fn test_hair_button_cycles() {
        let (mut scene, mut character) = setup();
        assert_eq!(active_hair(&scene), vec!["hair_0"]);

        character.apply(CustomizationCommand::ChangeHair, &mut scene);
        assert_eq!(active_hair(&scene), vec!["hair_1"]);
        character.apply(CustomizationCommand::ChangeHair, &mut scene);
        assert_eq!(active_hair(&scene), vec!["hair_2"]);
        character.apply(CustomizationCommand::ChangeHair, &mut scene);
        assert_eq!(active_hair(&scene), vec!["hair_0"]);

        character.apply(
            CustomizationCommand::CycleAttachment(AttachmentKind::Hair, CycleDirection::Prev),
            &mut scene,
        );
        assert_eq!(active_hair(&scene), vec!["hair_2"]);
    }

    #[test]
    fn test_beard_without_slot_is_noop() {
        let (mut scene, mut character) = setup();
        let before = scene.active_children(character.root()).len();

        character.apply(CustomizationCommand::ChangeBeard, &mut scene);

        assert_eq!(scene.active_children(character.root()).len(), before);
        assert!(character.attachments().get(AttachmentKind::Beard).is_none());
    }

    #[test]
    fn test_outfit_button_cycles() {
        let (mut scene, mut character) = setup();
        let body = scene.renderer("body").unwrap();
        let worn = |scene: &HeadlessScene| {
            scene
                .shared_mesh(body)
                .and_then(|m| scene.mesh_name(m))
                .map(str::to_string)
        };

        character.apply(CustomizationCommand::ChangeOutfit, &mut scene);
        assert_eq!(worn(&scene).as_deref(), Some("knight"));
        character.apply(CustomizationCommand::CycleOutfit(CycleDirection::Prev), &mut scene);
        character.apply(CustomizationCommand::CycleOutfit(CycleDirection::Prev), &mut scene);
        assert_eq!(worn(&scene).as_deref(), Some("ranger"));
    }

    #[test]
    fn test_drag_on_character_rotates_scene_node() {
        let (mut scene, mut character) = setup();
        let center = VIEWPORT * 0.5;
        let dt = 0.02;

        character.tick(dt, &PointerFrame::at(center).with_press(), &mut scene);
        let step = character.tick(dt, &PointerFrame::at(center + Vec2::new(10.0, 0.0)), &mut scene);

        assert_eq!(step.mode, RotationMode::Dragging);
        let expected = -10.0 * 10.0 * dt;
        assert!((scene.yaw_degrees(character.root()) - expected).abs() < 1e-3);
    }

    #[test]
    fn test_front_follows_pointer_while_dragging() {
        let (mut scene, mut character) = setup();
        let camera = HeadlessCamera::facing_character();
        let center = VIEWPORT * 0.5;
        let chest = Vec3::new(0.0, 1.0, 0.0);
        let root = character.root();
        let front_on_screen = |scene: &HeadlessScene| {
            let front = scene.rotation(root) * Vec3::Z;
            camera.world_to_screen(chest + front * 0.5).x
        };
        let before = front_on_screen(&scene);

        character.tick(0.02, &PointerFrame::at(center).with_press(), &mut scene);
        character.tick(0.02, &PointerFrame::at(center + Vec2::new(50.0, 0.0)), &mut scene);

        let front = scene.rotation(root) * Vec3::Z;
        assert!(front.x > 0.0);
        assert!(front_on_screen(&scene) > before);
    }

    #[test]
    fn test_drag_off_character_does_nothing() {
        let (mut scene, mut character) = setup();
        character.rotator_mut().engine_mut().set_auto_enabled(false);

        character.tick(0.02, &PointerFrame::at(Vec2::new(10.0, 10.0)).with_press(), &mut scene);
        for i in 1..10 {
            character.tick(
                0.02,
                &PointerFrame::at(Vec2::new(10.0 + 10.0 * i as f32, 10.0)),
                &mut scene,
            );
        }

        assert!(!character.rotator().is_dragging());
        assert_eq!(scene.yaw_degrees(character.root()), 0.0);
    }

    #[test]
    fn test_idle_auto_rotation() {
        let (mut scene, mut character) = setup();
        let dt = 0.125;
        let pointer = PointerFrame::at(Vec2::ZERO);

        // Startup waits out the resume delay too
        for _ in 0..4 {
            character.tick(dt, &pointer, &mut scene);
        }
        assert_eq!(scene.yaw_degrees(character.root()), 0.0);

        for _ in 0..4 {
            character.tick(dt, &pointer, &mut scene);
        }
        assert!((scene.yaw_degrees(character.root()) - 4.0 * 30.0 * dt).abs() < 1e-3);
    }

    #[test]
    fn test_missing_camera_freezes_rotation() {
        let (mut scene, mut character) = setup();
        let camera = scene.main_camera().unwrap();
        scene.remove_camera(camera);

        for _ in 0..20 {
            let step = character.tick(0.125, &PointerFrame::at(Vec2::ZERO), &mut scene);
            assert_eq!(step.mode, RotationMode::Skipped);
        }
        assert_eq!(scene.yaw_degrees(character.root()), 0.0);
    }
}
