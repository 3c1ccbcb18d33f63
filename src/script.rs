//! Timed pointer input for the headless driver
//!
//! ```toml
//! [[events]]
//! at = 1.0
//! position = [320.0, 240.0]
//! button = "down"
//! ```

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{CreatorError, ScriptError};
use crate::rotation::PointerFrame;

/// Primary button transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonEvent {
    Down,
    Up,
}

/// One pointer event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputEvent {
    /// Seconds since the start of the run
    pub at: f32,
    /// Pointer position in screen pixels
    pub position: [f32; 2],
    /// Button transition, if any (otherwise a plain move)
    #[serde(default)]
    pub button: Option<ButtonEvent>,
}

/// A time-ordered list of pointer events
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputScript {
    #[serde(default)]
    events: Vec<InputEvent>,
}

impl InputScript {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CreatorError> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ScriptError::ReadFile(format!("{}: {}", path.as_ref().display(), e))
        })?;

        Self::from_str(&contents)
    }

    /// Parse and validate a script. Events must have non-negative, finite,
    /// non-decreasing times and finite positions.
    pub fn from_str(s: &str) -> Result<Self, CreatorError> {
        let script: Self = toml::from_str(s).map_err(|e| ScriptError::Parse(e.to_string()))?;
        script.validate()?;
        Ok(script)
    }

    fn validate(&self) -> Result<(), ScriptError> {
        let mut last = 0.0f32;
        for (index, event) in self.events.iter().enumerate() {
            if !event.at.is_finite() || event.at < 0.0 {
                return Err(ScriptError::InvalidEvent {
                    index,
                    message: format!("time {} must be a non-negative number", event.at),
                });
            }
            if !event.position.iter().all(|c| c.is_finite()) {
                return Err(ScriptError::InvalidEvent {
                    index,
                    message: format!("position {:?} must be finite", event.position),
                });
            }
            if event.at < last {
                return Err(ScriptError::InvalidEvent {
                    index,
                    message: format!("time {} is earlier than the previous event ({})", event.at, last),
                });
            }
            last = event.at;
        }
        Ok(())
    }

    pub fn events(&self) -> &[InputEvent] {
        &self.events
    }

    /// Start replaying from time zero
    pub fn player(&self) -> ScriptPlayer<'_> {
        ScriptPlayer {
            events: &self.events,
            next: 0,
            position: Vec2::ZERO,
        }
    }
}

/// Replays an [`InputScript`] as one [`PointerFrame`] per tick
#[derive(Debug, Clone)]
pub struct ScriptPlayer<'a> {
    events: &'a [InputEvent],
    next: usize,
    position: Vec2,
}

impl ScriptPlayer<'_> {
    /// Fold every event with `at <= time` into a single frame. The pointer
    /// keeps its last position between events.
    pub fn frame_at(&mut self, time: f32) -> PointerFrame {
        let mut frame = PointerFrame::at(self.position);

        while let Some(event) = self.events.get(self.next) {
            if event.at > time {
                break;
            }
            self.position = Vec2::from(event.position);
            frame.position = self.position;
            match event.button {
                Some(ButtonEvent::Down) => frame.pressed = true,
                Some(ButtonEvent::Up) => frame.released = true,
                None => {}
            }
            self.next += 1;
        }

        frame
    }

    pub fn is_finished(&self) -> bool {
        self.next >= self.events.len()
    }
}
