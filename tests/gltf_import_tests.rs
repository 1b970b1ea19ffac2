use glam::Vec3;
use island_tour::loaders::{load_scene, load_scene_from_slice};
use island_tour::scene::Projection;
use island_tour::tour::Tour;
use island_tour::viewport::Viewport;
use serde_json::{json, Value};

const GLB_MAGIC: u32 = 0x4654_6C67;
const CHUNK_JSON: u32 = 0x4E4F_534A;
const CHUNK_BIN: u32 = 0x004E_4942;

fn f32_bytes(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

fn pad(mut data: Vec<u8>, fill: u8) -> Vec<u8> {
    while data.len() % 4 != 0 {
        data.push(fill);
    }
    data
}

fn island_bin() -> Vec<u8> {
    let mut bin = f32_bytes(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
    bin.extend(f32_bytes(&[0.0, 1.0]));
    bin.extend(f32_bytes(&[0.0, 0.0, 0.0, 0.0, 2.0, 0.0]));
    bin
}

/// One triangle mesh, one camera node and a one-second translation clip
fn island_document(bin_len: usize) -> Value {
    json!({
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [ { "nodes": [0, 1] } ],
        "nodes": [
            { "name": "island", "mesh": 0 },
            { "name": "view", "camera": 0, "translation": [0.0, 1.0, 5.0] }
        ],
        "meshes": [ { "primitives": [ { "attributes": { "POSITION": 0 } } ] } ],
        "cameras": [ { "type": "perspective", "perspective": { "yfov": 0.7, "znear": 0.1 } } ],
        "animations": [ {
            "name": "fly",
            "channels": [ { "sampler": 0, "target": { "node": 0, "path": "translation" } } ],
            "samplers": [ { "input": 1, "output": 2, "interpolation": "LINEAR" } ]
        } ],
        "buffers": [ { "byteLength": bin_len } ],
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": 36 },
            { "buffer": 0, "byteOffset": 36, "byteLength": 8 },
            { "buffer": 0, "byteOffset": 44, "byteLength": 24 }
        ],
        "accessors": [
            { "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
              "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0] },
            { "bufferView": 1, "componentType": 5126, "count": 2, "type": "SCALAR",
              "min": [0.0], "max": [1.0] },
            { "bufferView": 2, "componentType": 5126, "count": 2, "type": "VEC3" }
        ]
    })
}

fn build_glb() -> Vec<u8> {
    let bin = island_bin();
    pack_glb(&island_document(bin.len()), bin)
}

/// Adds a Draco-compressed rock mesh and marks the extension as required
fn build_draco_glb() -> Vec<u8> {
    let bin = island_bin();
    let mut document = island_document(bin.len());

    document["extensionsUsed"] = json!(["KHR_draco_mesh_compression"]);
    document["extensionsRequired"] = json!(["KHR_draco_mesh_compression"]);
    document["scenes"][0]["nodes"] = json!([0, 1, 2]);
    document["nodes"]
        .as_array_mut()
        .unwrap()
        .push(json!({ "name": "rock", "mesh": 1 }));
    document["meshes"].as_array_mut().unwrap().push(json!({
        "name": "rock",
        "primitives": [ {
            "attributes": { "POSITION": 3 },
            "extensions": {
                "KHR_draco_mesh_compression": { "bufferView": 0, "attributes": { "POSITION": 0 } }
            }
        } ]
    }));
    document["accessors"].as_array_mut().unwrap().push(json!({
        "componentType": 5126, "count": 3, "type": "VEC3",
        "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0]
    }));

    pack_glb(&document, bin)
}

fn pack_glb(document: &Value, bin: Vec<u8>) -> Vec<u8> {
    let json_chunk = pad(serde_json::to_vec(document).unwrap(), b' ');
    let bin_chunk = pad(bin, 0);
    let total = 12 + 8 + json_chunk.len() + 8 + bin_chunk.len();

    let mut glb = Vec::with_capacity(total);
    glb.extend(GLB_MAGIC.to_le_bytes());
    glb.extend(2u32.to_le_bytes());
    glb.extend((total as u32).to_le_bytes());
    glb.extend((json_chunk.len() as u32).to_le_bytes());
    glb.extend(CHUNK_JSON.to_le_bytes());
    glb.extend(json_chunk);
    glb.extend((bin_chunk.len() as u32).to_le_bytes());
    glb.extend(CHUNK_BIN.to_le_bytes());
    glb.extend(bin_chunk);
    glb
}

#[cfg(test)]
mod gltf_import_tests {
    use super::*;

    #[test]
    fn test_mesh_imported_with_generated_indices_and_normals() {
        let asset = load_scene_from_slice(&build_glb()).unwrap();

        assert_eq!(asset.meshes.len(), 1);
        let primitive = &asset.meshes[0].primitives[0];
        assert_eq!(primitive.vertices.len(), 3);
        assert_eq!(primitive.indices, vec![0, 1, 2]);
        assert_eq!(primitive.vertices[1].position, [1.0, 0.0, 0.0]);
        assert_eq!(primitive.vertices[0].normal, [0.0, 0.0, 1.0]);
        assert_eq!(primitive.vertices[0].color, [1.0; 4]);
        assert_eq!(primitive.base_color, [1.0; 4]);
        assert_eq!(asset.graph.mesh_nodes().collect::<Vec<_>>(), vec![(0, 0)]);
    }

    #[test]
    fn test_camera_attached_to_its_node() {
        let asset = load_scene_from_slice(&build_glb()).unwrap();

        assert_eq!(asset.cameras.len(), 1);
        let camera = &asset.cameras[0];
        assert_eq!(camera.node, Some(1));
        match camera.projection {
            Projection::Perspective { yfov, zfar, .. } => {
                assert!((yfov - 0.7).abs() < 1e-6);
                assert_eq!(zfar, None);
            }
            other => panic!("unexpected projection {:?}", other),
        }
        assert_eq!(asset.graph.world(1).w_axis.truncate(), Vec3::new(0.0, 1.0, 5.0));
    }

    #[test]
    fn test_animation_clip_imported() {
        let asset = load_scene_from_slice(&build_glb()).unwrap();

        assert_eq!(asset.clips.len(), 1);
        assert_eq!(asset.clips[0].name(), Some("fly"));
        assert_eq!(asset.clips[0].duration(), 1.0);
        assert_eq!(asset.clips[0].nodes().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn test_imported_scene_drives_tour() {
        let asset = load_scene_from_slice(&build_glb()).unwrap();
        let mut tour = Tour::new(vec![], 1.0, Viewport::new(640, 480));
        tour.attach_scene(asset);

        assert_eq!(tour.camera_view().position, Vec3::new(0.0, 1.0, 5.0));
        tour.switch_camera(0);
        tour.update(0.5);
        let island = tour.graph().unwrap().world(0).w_axis;
        assert!((island.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_required_draco_skips_compressed_primitives_only() {
        let asset = load_scene_from_slice(&build_draco_glb()).unwrap();

        assert_eq!(asset.meshes.len(), 2);
        assert_eq!(asset.meshes[0].primitives.len(), 1);
        assert!(asset.meshes[1].primitives.is_empty());
        assert_eq!(asset.cameras.len(), 1);
        assert_eq!(asset.clips.len(), 1);
        assert_eq!(asset.graph.len(), 3);

        let mut tour = Tour::new(vec![], 1.0, Viewport::new(640, 480));
        tour.attach_scene(asset);
        tour.switch_camera(0);
        tour.update(0.5);
        assert!((tour.graph().unwrap().world(0).w_axis.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_other_required_extension_rejected() {
        let bin = island_bin();
        let mut document = island_document(bin.len());
        document["extensionsRequired"] = json!(["EXT_meshopt_compression"]);

        let err = load_scene_from_slice(&pack_glb(&document, bin)).unwrap_err();
        assert!(format!("{:#}", err).contains("EXT_meshopt_compression"));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(load_scene_from_slice(b"not a model").is_err());
    }

    #[test]
    fn test_missing_file_error_names_path() {
        let err = load_scene("no/such/island.glb").unwrap_err();
        assert!(format!("{:#}", err).contains("no/such/island.glb"));
    }
}
