use anyhow::{bail, Context, Result};
use glam::{Quat, Vec3};
use gltf::animation::util::ReadOutputs;
use gltf::mesh::Mode;
use std::path::Path;

use crate::animation::{AnimationClip, Channel, Interpolation, Track};
use crate::error::SceneError;
use crate::scene::mesh::compute_normals;
use crate::scene::{
    CameraData, MeshData, MeshVertex, NodeData, PrimitiveData, Projection, SceneAsset, SceneGraph,
    Transform,
};

/// Compressed primitives under this extension are not decoded
pub const DRACO_EXTENSION: &str = "KHR_draco_mesh_compression";

/// Loads a glTF or GLB file with its meshes, cameras and animations
pub fn load_scene(path: impl AsRef<Path>) -> Result<SceneAsset> {
    let path = path.as_ref();
    log::info!("Loading glTF file: {:?}", path);

    let bytes = std::fs::read(path).context(format!("Failed to load glTF file: {:?}", path))?;
    let (document, buffers) = import_document(&bytes, path.parent())
        .context(format!("Failed to load glTF file: {:?}", path))?;

    scene_from_document(&document, &buffers)
        .context(format!("Failed to read scene from {:?}", path))
}

/// Loads a model already in memory, such as an embedded GLB
pub fn load_scene_from_slice(bytes: &[u8]) -> Result<SceneAsset> {
    let (document, buffers) = import_document(bytes, None).context("Failed to parse glTF data")?;
    scene_from_document(&document, &buffers)
}

fn import_document(
    bytes: &[u8],
    base: Option<&Path>,
) -> Result<(gltf::Document, Vec<gltf::buffer::Data>)> {
    let gltf::Gltf { document, blob } = gltf::Gltf::from_slice_without_validation(bytes)?;
    validate_document(&document)?;

    if document.extensions_required().any(|ext| ext == DRACO_EXTENSION) {
        log::warn!(
            "Model requires {}; compressed primitives will be skipped",
            DRACO_EXTENSION
        );
    }

    let buffers = gltf::import_buffers(&document, base, blob)?;
    Ok((document, buffers))
}

/// Full glTF validation, except that Draco may be listed as required
fn validate_document(document: &gltf::Document) -> Result<()> {
    use gltf::json::validation::{Error as ValidationError, Validate};

    let root = document.as_json();
    let draco_marker = format!("\"{}\"", DRACO_EXTENSION);
    let mut errors = Vec::new();
    root.validate(root, gltf::json::Path::new, &mut |path, error| {
        let path = path();
        let required_draco = error == ValidationError::Unsupported
            && path.as_str().starts_with("extensionsRequired")
            && path.as_str().ends_with(&draco_marker);
        if !required_draco {
            errors.push(format!("{} = {}", path, error));
        }
    });

    if errors.is_empty() {
        Ok(())
    } else {
        bail!("invalid glTF: {}", errors.join("; "))
    }
}

pub fn scene_from_document(
    document: &gltf::Document,
    buffers: &[gltf::buffer::Data],
) -> Result<SceneAsset> {
    log::info!(
        "glTF: {} scenes, {} nodes, {} meshes, {} cameras, {} animations",
        document.scenes().count(),
        document.nodes().count(),
        document.meshes().count(),
        document.cameras().count(),
        document.animations().count()
    );

    let nodes: Vec<NodeData> = document.nodes().map(|node| read_node(&node)).collect();

    // Displayed scene: the default one, else the first
    let roots: Vec<usize> = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .map(|scene| scene.nodes().map(|n| n.index()).collect())
        .unwrap_or_default();

    let graph = SceneGraph::new(nodes, &roots)?;

    let meshes = document
        .meshes()
        .map(|mesh| read_mesh(&mesh, buffers))
        .collect::<Result<Vec<_>>>()?;

    let cameras = document
        .cameras()
        .map(|camera| read_camera(&camera, document))
        .collect();

    let clips = document
        .animations()
        .map(|animation| read_animation(&animation, buffers, graph.len()))
        .collect::<Result<Vec<_>>>()?;

    let asset = SceneAsset {
        graph,
        meshes,
        cameras,
        clips,
    };
    log::info!(
        "Scene ready: {} mesh nodes, {} cameras, {} clips",
        asset.graph.mesh_nodes().count(),
        asset.cameras.len(),
        asset.clips.len()
    );
    Ok(asset)
}

fn read_node(node: &gltf::Node) -> NodeData {
    let (translation, rotation, scale) = node.transform().decomposed();
    NodeData {
        name: node.name().map(str::to_string),
        transform: Transform {
            translation: Vec3::from(translation),
            rotation: Quat::from_array(rotation),
            scale: Vec3::from(scale),
        },
        children: node.children().map(|c| c.index()).collect(),
        mesh: node.mesh().map(|m| m.index()),
        camera: node.camera().map(|c| c.index()),
    }
}

/// A camera follows the first node that references it
fn read_camera(camera: &gltf::Camera, document: &gltf::Document) -> CameraData {
    let node = document
        .nodes()
        .find(|n| n.camera().map(|c| c.index()) == Some(camera.index()))
        .map(|n| n.index());
    if node.is_none() {
        log::warn!("Camera {} is not attached to any node", camera.index());
    }

    let projection = match camera.projection() {
        gltf::camera::Projection::Perspective(p) => Projection::Perspective {
            yfov: p.yfov(),
            aspect_ratio: p.aspect_ratio(),
            znear: p.znear(),
            zfar: p.zfar(),
        },
        gltf::camera::Projection::Orthographic(o) => Projection::Orthographic {
            xmag: o.xmag(),
            ymag: o.ymag(),
            znear: o.znear(),
            zfar: o.zfar(),
        },
    };

    CameraData {
        name: camera.name().map(str::to_string),
        node,
        projection,
    }
}

fn read_mesh(mesh: &gltf::Mesh, buffers: &[gltf::buffer::Data]) -> Result<MeshData> {
    let mut primitives = Vec::new();

    for primitive in mesh.primitives() {
        if primitive.extension_value(DRACO_EXTENSION).is_some() {
            log::warn!(
                "Skipping Draco-compressed primitive {} in mesh {:?}",
                primitive.index(),
                mesh.name()
            );
            continue;
        }
        if primitive.mode() != Mode::Triangles {
            log::warn!(
                "Skipping {:?} primitive in mesh {:?}",
                primitive.mode(),
                mesh.name()
            );
            continue;
        }

        let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

        let Some(positions) = reader.read_positions() else {
            log::warn!("Skipping primitive without positions in mesh {:?}", mesh.name());
            continue;
        };
        let positions: Vec<Vec3> = positions.map(Vec3::from).collect();

        let indices: Vec<u32> = match reader.read_indices() {
            Some(indices) => indices.into_u32().collect(),
            None => (0..positions.len() as u32).collect(),
        };

        let normals: Vec<Vec3> = match reader.read_normals() {
            Some(normals) => normals.map(Vec3::from).collect(),
            None => compute_normals(&positions, &indices),
        };

        let colors: Vec<[f32; 4]> = match reader.read_colors(0) {
            Some(colors) => colors.into_rgba_f32().collect(),
            None => vec![[1.0; 4]; positions.len()],
        };

        let vertices = positions
            .iter()
            .enumerate()
            .map(|(i, position)| MeshVertex {
                position: position.to_array(),
                normal: normals.get(i).copied().unwrap_or(Vec3::Y).to_array(),
                color: colors.get(i).copied().unwrap_or([1.0; 4]),
            })
            .collect();

        primitives.push(PrimitiveData {
            vertices,
            indices,
            base_color: primitive
                .material()
                .pbr_metallic_roughness()
                .base_color_factor(),
        });
    }

    log::debug!("Mesh {:?}: {} primitives", mesh.name(), primitives.len());
    Ok(MeshData {
        name: mesh.name().map(str::to_string),
        primitives,
    })
}

fn read_animation(
    animation: &gltf::Animation,
    buffers: &[gltf::buffer::Data],
    node_count: usize,
) -> Result<AnimationClip> {
    let name = animation.name().map(str::to_string);
    let mut tracks = Vec::new();

    for channel in animation.channels() {
        let target = channel.target();
        let node = target.node().index();
        if node >= node_count {
            return Err(SceneError::MissingNode(node).into());
        }

        let reader = channel.reader(|buffer| Some(&buffers[buffer.index()]));
        let times: Vec<f32> = reader
            .read_inputs()
            .context(format!("Animation {:?} channel has no inputs", name))?
            .collect();
        let outputs = reader
            .read_outputs()
            .context(format!("Animation {:?} channel has no outputs", name))?;

        let channel_values = match outputs {
            ReadOutputs::Translations(values) => Channel::Translation(values.map(Vec3::from).collect()),
            ReadOutputs::Rotations(values) => {
                Channel::Rotation(values.into_f32().map(Quat::from_array).collect())
            }
            ReadOutputs::Scales(values) => Channel::Scale(values.map(Vec3::from).collect()),
            ReadOutputs::MorphTargetWeights(_) => {
                log::debug!("Skipping morph target weights in animation {:?}", name);
                continue;
            }
        };

        let interpolation = match channel.sampler().interpolation() {
            gltf::animation::Interpolation::Step => Interpolation::Step,
            gltf::animation::Interpolation::Linear => Interpolation::Linear,
            gltf::animation::Interpolation::CubicSpline => Interpolation::CubicSpline,
        };

        let track = Track::new(node, interpolation, times, channel_values)
            .context(format!("Invalid track in animation {:?}", name))?;
        tracks.push(track);
    }

    let clip = AnimationClip::new(name, tracks);
    log::debug!("Animation {:?}: {:.2}s", clip.name(), clip.duration());
    Ok(clip)
}
