//! Binary glTF (GLB) reader
//!
//! Only the JSON chunk is decoded, and only the parts needed to name the
//! default scene's root nodes. Meshes, child nodes and the BIN chunk are
//! left to the client that renders the model.

use serde::Deserialize;

use crate::error::AppError;

/// GLB magic number: "glTF"
pub const GLB_MAGIC: u32 = 0x46546C67;
/// GLB version 2
pub const GLB_VERSION: u32 = 2;
/// JSON chunk type
pub const CHUNK_TYPE_JSON: u32 = 0x4E4F534A;

const HEADER_LEN: usize = 12;
const CHUNK_HEADER_LEN: usize = 8;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GltfDocument {
    /// Index of the default scene
    #[serde(default)]
    pub scene: Option<usize>,
    #[serde(default)]
    pub scenes: Vec<GltfScene>,
    #[serde(default)]
    pub nodes: Vec<GltfNode>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GltfScene {
    #[serde(default)]
    pub nodes: Vec<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GltfNode {
    #[serde(default)]
    pub name: Option<String>,
}

impl GltfDocument {
    /// Root nodes of the default scene (scene 0 when none is declared)
    pub fn root_nodes(&self) -> Result<Vec<&GltfNode>, AppError> {
        let index = self.scene.unwrap_or(0);
        let scene = self
            .scenes
            .get(index)
            .ok_or_else(|| AppError::Model(format!("scene {index} does not exist")))?;

        scene
            .nodes
            .iter()
            .map(|&node| {
                self.nodes
                    .get(node)
                    .ok_or_else(|| AppError::Model(format!("scene references missing node {node}")))
            })
            .collect()
    }
}

fn read_u32(bytes: &[u8], offset: usize) -> Option<u32> {
    bytes
        .get(offset..offset + 4)
        .and_then(|b| b.try_into().ok())
        .map(u32::from_le_bytes)
}

/// Validate the GLB container and decode its JSON chunk
pub fn parse_glb(bytes: &[u8]) -> Result<GltfDocument, AppError> {
    if bytes.len() < HEADER_LEN + CHUNK_HEADER_LEN {
        return Err(AppError::Model("file too short for a GLB header".to_string()));
    }

    let magic = read_u32(bytes, 0).unwrap_or_default();
    if magic != GLB_MAGIC {
        return Err(AppError::Model("not a GLB file (bad magic)".to_string()));
    }

    let version = read_u32(bytes, 4).unwrap_or_default();
    if version != GLB_VERSION {
        return Err(AppError::Model(format!("unsupported GLB version {version}")));
    }

    let total_length = read_u32(bytes, 8).unwrap_or_default() as usize;
    if total_length > bytes.len() {
        return Err(AppError::Model(format!(
            "GLB declares {total_length} bytes but only {} are present",
            bytes.len()
        )));
    }

    let chunk_length = read_u32(bytes, HEADER_LEN).unwrap_or_default() as usize;
    let chunk_type = read_u32(bytes, HEADER_LEN + 4).unwrap_or_default();
    if chunk_type != CHUNK_TYPE_JSON {
        return Err(AppError::Model("first GLB chunk is not JSON".to_string()));
    }

    let start = HEADER_LEN + CHUNK_HEADER_LEN;
    let json = start
        .checked_add(chunk_length)
        .filter(|&end| end <= total_length)
        .map(|end| &bytes[start..end])
        .ok_or_else(|| AppError::Model("JSON chunk overruns the file".to_string()))?;

    serde_json::from_slice(json).map_err(|e| AppError::Model(format!("invalid glTF JSON: {e}")))
}

#[cfg(test)]
pub(crate) fn encode_glb(json: &serde_json::Value) -> Vec<u8> {
    let mut json_bytes = serde_json::to_vec(json).unwrap();
    while json_bytes.len() % 4 != 0 {
        json_bytes.push(b' ');
    }

    let total_length = (HEADER_LEN + CHUNK_HEADER_LEN + json_bytes.len()) as u32;
    let mut glb = Vec::with_capacity(total_length as usize);
    glb.extend_from_slice(&GLB_MAGIC.to_le_bytes());
    glb.extend_from_slice(&GLB_VERSION.to_le_bytes());
    glb.extend_from_slice(&total_length.to_le_bytes());
    glb.extend_from_slice(&(json_bytes.len() as u32).to_le_bytes());
    glb.extend_from_slice(&CHUNK_TYPE_JSON.to_le_bytes());
    glb.extend_from_slice(&json_bytes);
    glb
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> serde_json::Value {
        serde_json::json!({
            "asset": { "version": "2.0" },
            "scene": 0,
            "scenes": [{ "name": "Scene", "nodes": [0, 2] }],
            "nodes": [
                { "name": "Building", "mesh": 0, "children": [1] },
                { "name": "Nested" },
                { "name": "Frame", "mesh": 1 }
            ]
        })
    }

    #[test]
    fn parses_root_nodes_of_default_scene() {
        let document = parse_glb(&encode_glb(&sample())).unwrap();
        let names: Vec<_> = document
            .root_nodes()
            .unwrap()
            .iter()
            .map(|n| n.name.clone().unwrap_or_default())
            .collect();
        assert_eq!(names, vec!["Building", "Frame"]);
    }

    #[test]
    fn trailing_binary_chunk_is_skipped() {
        let mut bytes = encode_glb(&sample());
        let bin = [0u8; 8];
        bytes.extend_from_slice(&(bin.len() as u32).to_le_bytes());
        bytes.extend_from_slice(&0x004E4942u32.to_le_bytes());
        bytes.extend_from_slice(&bin);
        let total = bytes.len() as u32;
        bytes[8..12].copy_from_slice(&total.to_le_bytes());

        let document = parse_glb(&bytes).unwrap();
        assert_eq!(document.root_nodes().unwrap().len(), 2);
    }

    #[test]
    fn rejects_bad_magic() {
        let mut bytes = encode_glb(&sample());
        bytes[0] = b'x';
        assert!(matches!(parse_glb(&bytes), Err(AppError::Model(msg)) if msg.contains("magic")));
    }

    #[test]
    fn rejects_truncated_file() {
        let bytes = encode_glb(&sample());
        assert!(parse_glb(&bytes[..bytes.len() - 8]).is_err());
        assert!(parse_glb(&bytes[..10]).is_err());
    }

    #[test]
    fn rejects_dangling_node_reference() {
        let json = serde_json::json!({
            "scenes": [{ "nodes": [5] }],
            "nodes": []
        });
        let document = parse_glb(&encode_glb(&json)).unwrap();
        assert!(document.root_nodes().is_err());
    }
}
