//! Building assembly
//!
//! The building is authored as three GLB fragments. Each fragment's root
//! nodes are styled by exact node name, then the fragment is scaled,
//! positioned and named before joining the `building` group.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

use super::glb::{GltfDocument, parse_glb};
use super::materials::{Material, MaterialKind, palette};
use crate::error::AppError;

/// Uniform scale applied to every fragment
pub const FRAGMENT_SCALE: [f32; 3] = [0.5, 0.5, 0.5];

/// Styling applied to one named root node
#[derive(Debug, Clone, Copy)]
pub struct NodeStyle {
    pub node: &'static str,
    pub material: MaterialKind,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

const fn style(
    node: &'static str,
    material: MaterialKind,
    cast_shadow: bool,
    receive_shadow: bool,
) -> NodeStyle {
    NodeStyle {
        node,
        material,
        cast_shadow,
        receive_shadow,
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FragmentSpec {
    pub name: &'static str,
    pub file: &'static str,
    pub position: [f32; 3],
    pub styles: &'static [NodeStyle],
}

pub const FLOOR: FragmentSpec = FragmentSpec {
    name: "floor",
    file: "building-fragments-floor.glb",
    position: [0.0, 0.5, 0.0],
    styles: &[
        style("Building", MaterialKind::Building, true, true),
        style("Windows", MaterialKind::LightWindow, false, true),
        style("Windows005", MaterialKind::DarkWindow, false, true),
        style("Frame", MaterialKind::Frame, false, false),
    ],
};

pub const GROUND: FragmentSpec = FragmentSpec {
    name: "ground",
    file: "building-fragments-ground.glb",
    position: [0.0, 0.0, 0.0],
    styles: &[
        style("Building001", MaterialKind::Building, true, true),
        style("Windows001", MaterialKind::LightWindow, false, true),
        style("Windows003", MaterialKind::DarkWindow, false, true),
        style("Frame001", MaterialKind::Frame, false, false),
    ],
};

pub const ROOF: FragmentSpec = FragmentSpec {
    name: "roof",
    file: "building-fragments-roof.glb",
    position: [0.0, 1.0, 0.0],
    styles: &[
        style("Building002", MaterialKind::Building, true, true),
        style("Windows002", MaterialKind::LightWindow, true, true),
        style("Windows004", MaterialKind::DarkWindow, true, true),
        style("Frame002", MaterialKind::Frame, true, false),
    ],
};

/// A root node of a fragment after styling
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneNode {
    pub name: String,
    pub material: Option<MaterialKind>,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

/// One positioned fragment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneGroup {
    pub name: String,
    /// Model file the group was loaded from
    pub source: String,
    pub scale: [f32; 3],
    pub position: [f32; 3],
    pub children: Vec<SceneNode>,
}

/// The composed building
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Building {
    pub name: String,
    pub materials: BTreeMap<MaterialKind, Material>,
    pub fragments: Vec<SceneGroup>,
}

/// Apply a fragment's styling table to a parsed document
pub fn style_fragment(spec: &FragmentSpec, document: &GltfDocument) -> Result<SceneGroup, AppError> {
    let roots = document.root_nodes()?;

    let children: Vec<SceneNode> = roots
        .iter()
        .map(|node| {
            let name = node.name.clone().unwrap_or_default();
            match spec.styles.iter().find(|s| s.node == name) {
                Some(style) => SceneNode {
                    name,
                    material: Some(style.material),
                    cast_shadow: style.cast_shadow,
                    receive_shadow: style.receive_shadow,
                },
                None => SceneNode {
                    name,
                    material: None,
                    cast_shadow: false,
                    receive_shadow: false,
                },
            }
        })
        .collect();

    for style in spec.styles {
        if !children.iter().any(|child| child.name == style.node) {
            tracing::warn!(
                fragment = spec.name,
                node = style.node,
                "Styled node missing from model; it will render unstyled"
            );
        }
    }

    Ok(SceneGroup {
        name: spec.name.to_string(),
        source: spec.file.to_string(),
        scale: FRAGMENT_SCALE,
        position: spec.position,
        children,
    })
}

/// Read, parse and style one fragment
pub async fn load_fragment(dir: &Path, spec: &FragmentSpec) -> Result<SceneGroup, AppError> {
    let path = dir.join(spec.file);
    let bytes = tokio::fs::read(&path).await.map_err(|e| {
        tracing::error!(path = %path.display(), error = %e, "Failed to read model file");
        AppError::Model(format!("failed to read {}: {}", spec.file, e.kind()))
    })?;
    let document = parse_glb(&bytes)?;
    let group = style_fragment(spec, &document)?;

    tracing::debug!(fragment = spec.name, nodes = group.children.len(), "Fragment loaded");
    Ok(group)
}

/// Load the three fragments concurrently and compose the building
pub async fn assemble_building(dir: &Path) -> Result<Building, AppError> {
    let (floor, ground, roof) = tokio::try_join!(
        load_fragment(dir, &FLOOR),
        load_fragment(dir, &GROUND),
        load_fragment(dir, &ROOF),
    )?;

    tracing::info!("Building assembled");
    Ok(Building {
        name: "building".to_string(),
        materials: palette(),
        fragments: vec![floor, ground, roof],
    })
}
