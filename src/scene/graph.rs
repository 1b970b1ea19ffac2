use glam::{Mat4, Quat, Vec3};

use crate::error::SceneError;

/// Local translation/rotation/scale of a node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Node as read from the model file
#[derive(Debug, Clone, Default)]
pub struct NodeData {
    pub name: Option<String>,
    pub transform: Transform,
    pub children: Vec<usize>,
    pub mesh: Option<usize>,
    pub camera: Option<usize>,
}

/// Node hierarchy with a rest pose, an animated pose and cached world matrices.
///
/// Nodes are stored by their file index. `order` lists every node with parents
/// ahead of their children so world matrices resolve in one sweep.
#[derive(Debug, Clone)]
pub struct SceneGraph {
    nodes: Vec<NodeData>,
    parents: Vec<Option<usize>>,
    order: Vec<usize>,
    in_scene: Vec<bool>,
    pose: Vec<Transform>,
    world: Vec<Mat4>,
}

impl SceneGraph {
    /// Build the hierarchy; `scene_roots` marks which subtrees are displayed
    pub fn new(nodes: Vec<NodeData>, scene_roots: &[usize]) -> Result<Self, SceneError> {
        let count = nodes.len();
        let mut parents = vec![None; count];

        for (index, node) in nodes.iter().enumerate() {
            for &child in &node.children {
                if child >= count {
                    return Err(SceneError::MissingChild { node: index, child });
                }
                if parents[child].replace(index).is_some() {
                    return Err(SceneError::MultipleParents(child));
                }
            }
        }

        let roots: Vec<usize> = (0..count).filter(|&i| parents[i].is_none()).collect();
        let order = Self::depth_first(&nodes, &roots);
        if order.len() < count {
            let mut seen = vec![false; count];
            order.iter().for_each(|&i| seen[i] = true);
            let stuck = seen.iter().position(|s| !s).unwrap_or(0);
            return Err(SceneError::Cycle(stuck));
        }

        if let Some(&missing) = scene_roots.iter().find(|&&root| root >= count) {
            return Err(SceneError::MissingRoot(missing));
        }
        let mut in_scene = vec![false; count];
        for index in Self::depth_first(&nodes, scene_roots) {
            in_scene[index] = true;
        }

        let pose: Vec<Transform> = nodes.iter().map(|n| n.transform).collect();
        let mut graph = Self {
            nodes,
            parents,
            order,
            in_scene,
            pose,
            world: vec![Mat4::IDENTITY; count],
        };
        graph.update_world();
        Ok(graph)
    }

    fn depth_first(nodes: &[NodeData], roots: &[usize]) -> Vec<usize> {
        let mut order = Vec::with_capacity(nodes.len());
        let mut stack: Vec<usize> = roots.iter().rev().copied().collect();
        while let Some(index) = stack.pop() {
            order.push(index);
            stack.extend(nodes[index].children.iter().rev());
        }
        order
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, index: usize) -> Option<&NodeData> {
        self.nodes.get(index)
    }

    pub fn nodes(&self) -> &[NodeData] {
        &self.nodes
    }

    pub fn parent(&self, index: usize) -> Option<usize> {
        self.parents.get(index).copied().flatten()
    }

    /// Whether the node belongs to the displayed scene
    pub fn in_scene(&self, index: usize) -> bool {
        self.in_scene.get(index).copied().unwrap_or(false)
    }

    pub fn rest(&self, index: usize) -> Option<&Transform> {
        self.nodes.get(index).map(|n| &n.transform)
    }

    pub fn pose(&self, index: usize) -> Option<&Transform> {
        self.pose.get(index)
    }

    pub fn pose_mut(&mut self, index: usize) -> Option<&mut Transform> {
        self.pose.get_mut(index)
    }

    /// Put a node back into the pose it was loaded with
    pub fn reset_to_rest(&mut self, index: usize) {
        if let (Some(pose), Some(node)) = (self.pose.get_mut(index), self.nodes.get(index)) {
            *pose = node.transform;
        }
    }

    /// Recompute world matrices from the current pose
    pub fn update_world(&mut self) {
        for &index in &self.order {
            let local = self.pose[index].matrix();
            self.world[index] = match self.parents[index] {
                Some(parent) => self.world[parent] * local,
                None => local,
            };
        }
    }

    /// World matrix as of the last `update_world`; unknown nodes sit at the origin
    pub fn world(&self, index: usize) -> Mat4 {
        self.world.get(index).copied().unwrap_or(Mat4::IDENTITY)
    }

    /// Displayed nodes carrying a mesh, with the mesh index
    pub fn mesh_nodes(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.order
            .iter()
            .filter(|&&i| self.in_scene[i])
            .filter_map(|&i| self.nodes[i].mesh.map(|mesh| (i, mesh)))
    }
}
