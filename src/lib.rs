//! Character Creator - interactive 3D character customization core
//!
//! - Attachment slots (beard, armor, hair) cycled with wraparound
//! - Outfit meshes switched on a single renderer
//! - Click-drag rotation with idle auto rotation and a resume delay
//! - Renderer access through small collaborator traits, with a headless
//!   in-memory scene for running without a window

pub mod character;
pub mod config;
pub mod customize;
pub mod error;
pub mod rotation;
pub mod scene;
pub mod script;

pub use character::{Character, CharacterSetup};
pub use config::Config;
pub use error::{CreatorError, Result};

use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};

use customize::{AttachmentKind, CustomizationCommand};
use rotation::{PointerFrame, RotationStep};
use scene::{HeadlessScene, MeshAssignment};

/// A character together with the scene it lives in
#[derive(Debug)]
pub struct Session {
    pub scene: HeadlessScene,
    pub character: Character,
}

/// What the character currently looks like
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharacterSnapshot {
    /// Mesh shown by the first outfit renderer
    pub outfit: Option<String>,
    /// Active variant per registered attachment kind
    pub attachments: Vec<(AttachmentKind, Option<String>)>,
    /// Root yaw in degrees
    pub yaw: f32,
    pub dragging: bool,
}

impl Session {
    pub fn snapshot(&self) -> CharacterSnapshot {
        let outfit = self
            .character
            .outfits()
            .active_outfit()
            .and_then(|o| self.scene.shared_mesh(o.renderer))
            .and_then(|m| self.scene.mesh_name(m))
            .map(str::to_string);

        let registry = self.character.attachments();
        let attachments = registry
            .kinds()
            .filter_map(|kind| registry.get(kind))
            .map(|slot| {
                let name = slot
                    .current()
                    .and_then(|node| self.scene.node_name(node))
                    .map(str::to_string);
                (slot.kind(), name)
            })
            .collect();

        CharacterSnapshot {
            outfit,
            attachments,
            yaw: self.scene.yaw_degrees(self.character.root()),
            dragging: self.character.rotator().is_dragging(),
        }
    }
}

/// Application state shared between the tick loop and command sources.
///
/// Every access to the character goes through one mutex, so ticks and
/// commands never interleave.
#[derive(Debug)]
pub struct AppState {
    /// Configuration the session was built from
    pub config: Config,
    /// The character and its scene
    pub session: Mutex<Session>,
    /// Shutdown signal
    pub shutdown_tx: broadcast::Sender<()>,
}

impl AppState {
    /// Validate `config` and build the headless scene and character it describes
    pub fn new(config: Config) -> Result<Arc<Self>> {
        config.validate()?;
        let (scene, setup) = HeadlessScene::from_config(&config)?;
        let character = Character::initialize(setup);
        let (shutdown_tx, _) = broadcast::channel(1);

        Ok(Arc::new(Self {
            config,
            session: Mutex::new(Session { scene, character }),
            shutdown_tx,
        }))
    }

    /// Apply a customization command
    pub async fn apply(&self, command: CustomizationCommand) {
        let mut session = self.session.lock().await;
        let Session { scene, character } = &mut *session;
        character.apply(command, scene);
    }

    /// Advance the character by one tick
    pub async fn tick(&self, dt: f32, pointer: &PointerFrame) -> RotationStep {
        let mut session = self.session.lock().await;
        let Session { scene, character } = &mut *session;
        character.tick(dt, pointer, scene)
    }

    /// Get the current look of the character
    pub async fn snapshot(&self) -> CharacterSnapshot {
        self.session.lock().await.snapshot()
    }

    /// Subscribe to shutdown signal
    pub fn subscribe_shutdown(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Signal shutdown
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
