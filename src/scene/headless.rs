//! In-memory scene graph.
//!
//! Stands in for the renderer when running without a window: nodes with
//! parents, active flags and local rotations, mesh renderers, sphere
//! colliders on layers, and perspective cameras that can cast rays through
//! screen points.

use std::collections::HashMap;

use glam::{EulerRot, Mat4, Quat, Vec2, Vec3};
use tracing::debug;

use super::{
    Activation, CameraId, ColliderId, LayerMask, MeshAssignment, MeshId, NodeId, Orientation,
    Picking, RaycastHit, RendererId,
};
use crate::character::CharacterSetup;
use crate::config::Config;
use crate::customize::{OutfitBinding, SlotBinding};
use crate::error::SceneError;

/// Name of the character root node created by [`HeadlessScene::from_config`]
pub const CHARACTER_ROOT: &str = "character";
/// Viewport size of the default camera
pub const VIEWPORT: Vec2 = Vec2::new(640.0, 480.0);

/// Perspective camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadlessCamera {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view in radians
    pub yfov: f32,
    /// Viewport size in pixels
    pub viewport: Vec2,
}

impl HeadlessCamera {
    /// Camera a few units in front of the origin at chest height, looking back at it
    pub fn facing_character() -> Self {
        Self {
            position: Vec3::new(0.0, 1.0, 3.0),
            target: Vec3::new(0.0, 1.0, 0.0),
            yfov: std::f32::consts::FRAC_PI_3,
            viewport: VIEWPORT,
        }
    }

    /// Ray through a screen point (pixels, origin bottom-left).
    /// Returns origin and normalized direction.
    pub fn screen_point_to_ray(&self, point: Vec2) -> (Vec3, Vec3) {
        let aspect = self.viewport.x / self.viewport.y;
        let projection = Mat4::perspective_rh(self.yfov, aspect, 0.01, 100.0);
        let view = Mat4::look_at_rh(self.position, self.target, Vec3::Y);
        let inverse = (projection * view).inverse();

        let ndc = Vec2::new(
            2.0 * point.x / self.viewport.x - 1.0,
            2.0 * point.y / self.viewport.y - 1.0,
        );
        let near = inverse.project_point3(ndc.extend(0.0));
        let far = inverse.project_point3(ndc.extend(1.0));

        (near, (far - near).normalize())
    }

    /// Screen position of a world point (pixels, origin bottom-left)
    pub fn world_to_screen(&self, point: Vec3) -> Vec2 {
        let aspect = self.viewport.x / self.viewport.y;
        let projection = Mat4::perspective_rh(self.yfov, aspect, 0.01, 100.0);
        let view = Mat4::look_at_rh(self.position, self.target, Vec3::Y);
        let ndc = (projection * view).project_point3(point);

        Vec2::new(
            (ndc.x + 1.0) * 0.5 * self.viewport.x,
            (ndc.y + 1.0) * 0.5 * self.viewport.y,
        )
    }
}

#[derive(Debug, Clone)]
struct Node {
    name: String,
    parent: Option<NodeId>,
    active: bool,
    rotation: Quat,
}

#[derive(Debug, Clone)]
struct Renderer {
    name: String,
    mesh: Option<MeshId>,
}

#[derive(Debug, Clone, Copy)]
struct SphereCollider {
    node: NodeId,
    center: Vec3,
    radius: f32,
    layer: u8,
}

/// In-memory implementation of every scene collaborator trait
#[derive(Debug, Clone, Default)]
pub struct HeadlessScene {
    nodes: Vec<Node>,
    node_names: HashMap<String, NodeId>,
    meshes: Vec<String>,
    mesh_names: HashMap<String, MeshId>,
    renderers: Vec<Renderer>,
    renderer_names: HashMap<String, RendererId>,
    colliders: Vec<SphereCollider>,
    cameras: Vec<Option<HeadlessCamera>>,
}

impl HeadlessScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the scene a configured character lives in and the handles the
    /// character needs.
    ///
    /// Layout: a root node with a sphere collider, one child node per
    /// attachment variant (only the start variant active), one renderer per
    /// outfit showing its initial mesh, and a camera facing the character.
    pub fn from_config(config: &Config) -> Result<(Self, CharacterSetup), SceneError> {
        let mut scene = Self::new();
        let root = scene.add_node(CHARACTER_ROOT, None)?;
        let collider = scene.add_sphere_collider(root, Vec3::new(0.0, 1.0, 0.0), 0.6, 0);

        let mut outfits = Vec::with_capacity(config.outfits.len());
        for outfit in &config.outfits {
            let meshes = outfit
                .meshes
                .iter()
                .map(|name| scene.mesh_or_insert(name))
                .collect::<Vec<_>>();
            let initial = match &outfit.initial_mesh {
                Some(name) => Some(scene.mesh_or_insert(name)),
                None => meshes.first().copied(),
            };
            let renderer = scene.add_renderer(&outfit.renderer, initial)?;
            outfits.push(OutfitBinding { renderer, meshes });
        }

        let mut attachments = Vec::with_capacity(config.attachments.len());
        for attachment in &config.attachments {
            // Same fallback as VariantSlot::with_current_index
            let start = if attachment.start_index < attachment.variants.len() {
                attachment.start_index
            } else {
                0
            };
            let mut variants = Vec::with_capacity(attachment.variants.len());
            for (i, name) in attachment.variants.iter().enumerate() {
                // A kind configured twice may reuse its variant objects
                let node = match scene.node(name) {
                    Some(node) => node,
                    None => scene.add_node(name, Some(root))?,
                };
                scene.set_active(node, i == start);
                variants.push(node);
            }
            attachments.push(SlotBinding {
                kind: attachment.kind,
                variants,
                start_index: attachment.start_index,
            });
        }

        scene.add_camera(HeadlessCamera::facing_character());

        debug!(
            "Headless scene: {} nodes, {} meshes, {} renderers",
            scene.nodes.len(),
            scene.meshes.len(),
            scene.renderers.len()
        );

        let setup = CharacterSetup {
            root,
            collider: Some(collider),
            outfits,
            attachments,
            rotation: config.rotation.clone(),
        };
        Ok((scene, setup))
    }

    /// Add an active node with identity rotation
    pub fn add_node(&mut self, name: &str, parent: Option<NodeId>) -> Result<NodeId, SceneError> {
        if self.node_names.contains_key(name) {
            return Err(SceneError::DuplicateName(name.to_string()));
        }
        if let Some(parent) = parent {
            if self.nodes.get(parent.0 as usize).is_none() {
                return Err(SceneError::UnknownNode(format!("{:?}", parent)));
            }
        }

        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            name: name.to_string(),
            parent,
            active: true,
            rotation: Quat::IDENTITY,
        });
        self.node_names.insert(name.to_string(), id);
        Ok(id)
    }

    /// Register a mesh by name, returning the existing handle if it is known
    pub fn mesh_or_insert(&mut self, name: &str) -> MeshId {
        if let Some(&id) = self.mesh_names.get(name) {
            return id;
        }
        let id = MeshId(self.meshes.len() as u32);
        self.meshes.push(name.to_string());
        self.mesh_names.insert(name.to_string(), id);
        id
    }

    pub fn add_renderer(
        &mut self,
        name: &str,
        mesh: Option<MeshId>,
    ) -> Result<RendererId, SceneError> {
        if self.renderer_names.contains_key(name) {
            return Err(SceneError::DuplicateName(name.to_string()));
        }
        if let Some(mesh) = mesh {
            if self.meshes.get(mesh.0 as usize).is_none() {
                return Err(SceneError::UnknownMesh(format!("{:?}", mesh)));
            }
        }

        let id = RendererId(self.renderers.len() as u32);
        self.renderers.push(Renderer {
            name: name.to_string(),
            mesh,
        });
        self.renderer_names.insert(name.to_string(), id);
        Ok(id)
    }

    /// Attach a sphere collider (world-space center) to a node
    pub fn add_sphere_collider(
        &mut self,
        node: NodeId,
        center: Vec3,
        radius: f32,
        layer: u8,
    ) -> ColliderId {
        let id = ColliderId(self.colliders.len() as u32);
        self.colliders.push(SphereCollider {
            node,
            center,
            radius,
            layer,
        });
        id
    }

    pub fn add_camera(&mut self, camera: HeadlessCamera) -> CameraId {
        let id = CameraId(self.cameras.len() as u32);
        self.cameras.push(Some(camera));
        id
    }

    pub fn remove_camera(&mut self, camera: CameraId) {
        if let Some(slot) = self.cameras.get_mut(camera.0 as usize) {
            *slot = None;
        }
    }

    pub fn camera(&self, camera: CameraId) -> Option<&HeadlessCamera> {
        self.cameras.get(camera.0 as usize).and_then(Option::as_ref)
    }

    pub fn node(&self, name: &str) -> Option<NodeId> {
        self.node_names.get(name).copied()
    }

    pub fn node_name(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(node.0 as usize).map(|n| n.name.as_str())
    }

    pub fn mesh(&self, name: &str) -> Option<MeshId> {
        self.mesh_names.get(name).copied()
    }

    pub fn mesh_name(&self, mesh: MeshId) -> Option<&str> {
        self.meshes.get(mesh.0 as usize).map(String::as_str)
    }

    pub fn renderer(&self, name: &str) -> Option<RendererId> {
        self.renderer_names.get(name).copied()
    }

    pub fn renderer_name(&self, renderer: RendererId) -> Option<&str> {
        self.renderers
            .get(renderer.0 as usize)
            .map(|r| r.name.as_str())
    }

    pub fn is_active(&self, node: NodeId) -> bool {
        self.nodes
            .get(node.0 as usize)
            .map(|n| n.active)
            .unwrap_or(false)
    }

    /// Names of the active children of `parent`
    pub fn active_children(&self, parent: NodeId) -> Vec<&str> {
        self.nodes
            .iter()
            .filter(|n| n.parent == Some(parent) && n.active)
            .map(|n| n.name.as_str())
            .collect()
    }

    pub fn rotation(&self, node: NodeId) -> Quat {
        self.nodes
            .get(node.0 as usize)
            .map(|n| n.rotation)
            .unwrap_or(Quat::IDENTITY)
    }

    /// Yaw of a node in degrees, clockwise seen from above
    pub fn yaw_degrees(&self, node: NodeId) -> f32 {
        let (yaw, _, _) = self.rotation(node).to_euler(EulerRot::YXZ);
        -yaw.to_degrees()
    }
}

impl Activation for HeadlessScene {
    fn set_active(&mut self, node: NodeId, active: bool) {
        if let Some(n) = self.nodes.get_mut(node.0 as usize) {
            n.active = active;
        }
    }
}

impl MeshAssignment for HeadlessScene {
    fn shared_mesh(&self, renderer: RendererId) -> Option<MeshId> {
        self.renderers.get(renderer.0 as usize).and_then(|r| r.mesh)
    }

    fn set_shared_mesh(&mut self, renderer: RendererId, mesh: MeshId) {
        if let Some(r) = self.renderers.get_mut(renderer.0 as usize) {
            r.mesh = Some(mesh);
        }
    }
}

impl Orientation for HeadlessScene {
    /// glam quaternions turn counterclockwise for positive angles
    fn rotate(&mut self, node: NodeId, axis: Vec3, degrees: f32) {
        if let Some(n) = self.nodes.get_mut(node.0 as usize) {
            let delta = Quat::from_axis_angle(axis.normalize(), -degrees.to_radians());
            n.rotation = (n.rotation * delta).normalize();
        }
    }
}

impl Picking for HeadlessScene {
    fn main_camera(&self) -> Option<CameraId> {
        self.cameras
            .iter()
            .position(Option::is_some)
            .map(|i| CameraId(i as u32))
    }

    fn camera_alive(&self, camera: CameraId) -> bool {
        self.camera(camera).is_some()
    }

    fn raycast(&self, camera: CameraId, screen_point: Vec2, layers: LayerMask) -> Option<RaycastHit> {
        let camera = self.camera(camera)?;
        let (origin, direction) = camera.screen_point_to_ray(screen_point);

        self.colliders
            .iter()
            .enumerate()
            .filter(|(_, c)| layers.contains(c.layer))
            .filter_map(|(i, c)| {
                intersect_sphere(origin, direction, c.center, c.radius).map(|distance| RaycastHit {
                    node: c.node,
                    collider: ColliderId(i as u32),
                    distance,
                })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    fn is_child_of(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes.get(id.0 as usize).and_then(|n| n.parent);
        }
        false
    }
}

/// Distance along a normalized ray to the first intersection with a sphere
fn intersect_sphere(origin: Vec3, direction: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let oc = origin - center;
    let b = oc.dot(direction);
    let c = oc.length_squared() - radius * radius;
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrt = discriminant.sqrt();
    [-b - sqrt, -b + sqrt].into_iter().find(|&t| t >= 0.0)
}
