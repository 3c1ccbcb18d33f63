//! Rotation engine: turns pointer updates into a yaw angle per tick

use tracing::trace;

use super::pointer::PointerUpdate;
use crate::config::RotationConfig;

/// What the engine did during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationMode {
    /// The tick was not processed (no camera)
    Skipped,
    /// No rotation: auto rotation disabled or still waiting out the resume delay
    Idle,
    /// Following the pointer
    Dragging,
    /// Constant-speed rotation
    AutoRotating,
}

/// Rotation to apply for one tick, in degrees about the vertical axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationStep {
    pub mode: RotationMode,
    pub angle: f32,
}

impl RotationStep {
    fn still(mode: RotationMode) -> Self {
        Self { mode, angle: 0.0 }
    }
}

/// Manual vs. automatic rotation arbitration.
///
/// Auto rotation only runs while not dragging, when enabled, and once
/// `resume_delay` seconds have passed since the last release. The timer
/// also starts at zero, so the character stands still for the first
/// `resume_delay` seconds.
#[derive(Debug, Clone)]
pub struct RotationEngine {
    manual_speed: f32,
    auto_enabled: bool,
    auto_speed: f32,
    auto_direction: f32,
    resume_delay: f32,
    resume_timer: f32,
}

impl RotationEngine {
    pub fn new(config: &RotationConfig) -> Self {
        Self {
            manual_speed: config.manual_speed,
            auto_enabled: config.auto_enabled,
            auto_speed: config.auto_speed,
            auto_direction: config.auto_direction,
            resume_delay: config.resume_delay,
            resume_timer: 0.0,
        }
    }

    pub fn set_auto_enabled(&mut self, enabled: bool) {
        self.auto_enabled = enabled;
    }

    /// Seconds of idle time accumulated since the last release
    pub fn resume_timer(&self) -> f32 {
        self.resume_timer
    }

    /// Compute this tick's rotation from the pointer outcome
    pub fn step(&mut self, update: PointerUpdate, dt: f32) -> RotationStep {
        let step = match update {
            PointerUpdate::NoCamera => RotationStep::still(RotationMode::Skipped),
            PointerUpdate::Drag { delta_x } => self.manual(delta_x, dt),
            PointerUpdate::Released => {
                self.resume_timer = 0.0;
                self.idle(dt)
            }
            PointerUpdate::Idle => self.idle(dt),
        };
        trace!(?step, timer = self.resume_timer, "rotation step");
        step
    }

    /// Pointer moving right turns the character the other way so it follows
    /// the pointer visually.
    fn manual(&self, delta_x: f32, dt: f32) -> RotationStep {
        RotationStep {
            mode: RotationMode::Dragging,
            angle: -delta_x * self.manual_speed * dt,
        }
    }

    fn idle(&mut self, dt: f32) -> RotationStep {
        if !self.auto_enabled {
            return RotationStep::still(RotationMode::Idle);
        }

        if self.resume_timer >= self.resume_delay {
            RotationStep {
                mode: RotationMode::AutoRotating,
                angle: self.auto_speed * self.auto_direction * dt,
            }
        } else {
            self.resume_timer += dt;
            RotationStep::still(RotationMode::Idle)
        }
    }
}
