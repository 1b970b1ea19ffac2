pub mod camera;
pub mod graph;
pub mod mesh;

pub use camera::{CameraData, CameraView, Projection};
pub use graph::{NodeData, SceneGraph, Transform};
pub use mesh::{MeshData, MeshVertex, PrimitiveData};

use crate::animation::AnimationClip;

/// Everything the tour needs from one model file
#[derive(Debug, Clone)]
pub struct SceneAsset {
    pub graph: SceneGraph,
    pub meshes: Vec<MeshData>,
    pub cameras: Vec<CameraData>,
    pub clips: Vec<AnimationClip>,
}
