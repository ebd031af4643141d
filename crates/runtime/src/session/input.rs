use glam::Vec3;
use melody_core::ControlInput;
use serde::{Deserialize, Serialize};

/// Inputs gathered for one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameInput {
    /// Raw note keys (0-3), bypassing the controller.
    pub notes: Vec<usize>,
    pub controls: Vec<ControlInput>,
    /// Desired movement direction; scaled by the session move speed.
    pub movement: Vec3,
    pub facing: Option<Vec3>,
}

impl FrameInput {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn with_note(mut self, key: usize) -> Self {
        self.notes.push(key);
        self
    }

    pub fn with_control(mut self, input: ControlInput) -> Self {
        self.controls.push(input);
        self
    }

    pub fn with_movement(mut self, movement: Vec3) -> Self {
        self.movement = movement;
        self
    }

    pub fn facing(mut self, facing: Vec3) -> Self {
        self.facing = Some(facing);
        self
    }
}
