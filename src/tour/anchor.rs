use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use super::control::ControlCommand;
use crate::viewport::Viewport;

/// Fixed 3D point a control button follows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub name: String,
    pub label: String,
    pub position: Vec3,
    pub control: ControlCommand,
}

/// Window position in physical pixels, origin top-left, y down
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

/// Where an anchor's button sits this frame
#[derive(Debug, Clone, PartialEq)]
pub struct ButtonPlacement {
    pub control: ControlCommand,
    pub label: String,
    pub point: ScreenPoint,
}

/// Map a world point to window pixels through a view-projection matrix
pub fn project_to_screen(point: Vec3, view_projection: Mat4, viewport: Viewport) -> ScreenPoint {
    let ndc = view_projection.project_point3(point);
    ScreenPoint {
        x: (ndc.x * 0.5 + 0.5) * viewport.width as f32,
        y: (-(ndc.y * 0.5) + 0.5) * viewport.height as f32,
    }
}

impl Anchor {
    pub fn place(&self, view_projection: Mat4, viewport: Viewport) -> ButtonPlacement {
        ButtonPlacement {
            control: self.control,
            label: self.label.clone(),
            point: project_to_screen(self.position, view_projection, viewport),
        }
    }
}
