use glam::{Mat4, Vec3};

use super::graph::SceneGraph;
use crate::viewport::Viewport;

/// Far plane used when a perspective camera leaves it open
pub const DEFAULT_FAR: f32 = 2_000_000.0;

/// Vertical field of view of the fallback camera, in degrees
pub const FALLBACK_FOV_DEGREES: f32 = 45.0;

/// Lens of an embedded camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    Perspective {
        /// Vertical field of view in radians
        yfov: f32,
        /// Aspect stored in the file; rendering follows the viewport instead
        aspect_ratio: Option<f32>,
        znear: f32,
        zfar: Option<f32>,
    },
    Orthographic {
        xmag: f32,
        ymag: f32,
        znear: f32,
        zfar: f32,
    },
}

impl Projection {
    /// Projection matrix for a viewport with the given aspect
    pub fn matrix(&self, aspect: f32) -> Mat4 {
        match *self {
            Projection::Perspective { yfov, znear, zfar, .. } => {
                Mat4::perspective_rh(yfov, aspect, znear, zfar.unwrap_or(DEFAULT_FAR))
            }
            Projection::Orthographic { xmag, ymag, znear, zfar } => {
                Mat4::orthographic_rh(-xmag, xmag, -ymag, ymag, znear, zfar)
            }
        }
    }
}

/// Camera embedded in the model, attached to the first node that references it
#[derive(Debug, Clone, PartialEq)]
pub struct CameraData {
    pub name: Option<String>,
    pub node: Option<usize>,
    pub projection: Projection,
}

impl CameraData {
    /// Resolve against the current world matrices and viewport
    pub fn resolve(&self, graph: &SceneGraph, viewport: Viewport) -> CameraView {
        let world = self.node.map(|n| graph.world(n)).unwrap_or(Mat4::IDENTITY);
        CameraView {
            view: world.inverse(),
            projection: self.projection.matrix(viewport.aspect()),
            position: world.w_axis.truncate(),
        }
    }
}

/// View and projection of a camera for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraView {
    pub view: Mat4,
    pub projection: Mat4,
    pub position: Vec3,
}

impl CameraView {
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }

    /// Camera for models without one: looks down -Z at the origin from the
    /// distance where one world unit spans one pixel at z = 0.
    pub fn fallback(viewport: Viewport) -> Self {
        let fov = FALLBACK_FOV_DEGREES.to_radians();
        let height = viewport.height.max(1) as f32;
        let distance = (height / 2.0) / (fov / 2.0).tan();
        let position = Vec3::new(0.0, 0.0, distance);

        Self {
            view: Mat4::look_at_rh(position, Vec3::ZERO, Vec3::Y),
            projection: Mat4::perspective_rh(fov, viewport.aspect(), 1.0, distance * 2.0),
            position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::graph::{NodeData, Transform};

    fn perspective() -> Projection {
        Projection::Perspective {
            yfov: 0.8,
            aspect_ratio: Some(1.0),
            znear: 0.1,
            zfar: Some(100.0),
        }
    }

    #[test]
    fn test_perspective_follows_viewport_aspect() {
        let wide = perspective().matrix(2.0);
        let square = perspective().matrix(1.0);
        assert!((wide.x_axis.x * 2.0 - square.x_axis.x).abs() < 1e-6);
        assert_eq!(wide.y_axis.y, square.y_axis.y);
    }

    #[test]
    fn test_open_far_plane_uses_default() {
        let open = Projection::Perspective {
            yfov: 0.8,
            aspect_ratio: None,
            znear: 0.1,
            zfar: None,
        };
        let closed = Projection::Perspective {
            yfov: 0.8,
            aspect_ratio: None,
            znear: 0.1,
            zfar: Some(DEFAULT_FAR),
        };
        assert_eq!(open.matrix(1.5), closed.matrix(1.5));
    }

    #[test]
    fn test_camera_view_is_inverse_of_node_world() {
        let nodes = vec![NodeData {
            transform: Transform::from_translation(Vec3::new(0.0, 2.0, 10.0)),
            camera: Some(0),
            ..Default::default()
        }];
        let graph = SceneGraph::new(nodes, &[0]).unwrap();
        let camera = CameraData {
            name: None,
            node: Some(0),
            projection: perspective(),
        };

        let view = camera.resolve(&graph, Viewport::new(800, 600));
        assert_eq!(view.position, Vec3::new(0.0, 2.0, 10.0));
        let eye_space = view.view.transform_point3(Vec3::new(0.0, 2.0, 0.0));
        assert!((eye_space - Vec3::new(0.0, 0.0, -10.0)).length() < 1e-5);
    }

    #[test]
    fn test_fallback_camera_distance() {
        let view = CameraView::fallback(Viewport::new(800, 600));
        let expected = 300.0 / (22.5f32.to_radians()).tan();
        assert!((view.position.z - expected).abs() < 1e-3);

        // A point one pixel up at z = 0 projects one pixel up on screen
        let ndc = view.view_projection().project_point3(Vec3::new(0.0, 1.0, 0.0));
        assert!((ndc.y * 300.0 - 1.0).abs() < 1e-3);
    }
}
