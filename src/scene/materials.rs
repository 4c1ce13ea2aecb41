//! Building material palette

use std::collections::BTreeMap;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialKind {
    Building,
    LightWindow,
    DarkWindow,
    Frame,
}

/// Standard PBR material parameters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Material {
    /// 0xRRGGBB
    pub color: u32,
    pub metalness: f32,
    pub roughness: f32,
    pub emissive: u32,
    pub emissive_intensity: f32,
    pub double_sided: bool,
    pub flat_shading: bool,
}

impl MaterialKind {
    pub const ALL: [MaterialKind; 4] = [
        MaterialKind::Building,
        MaterialKind::LightWindow,
        MaterialKind::DarkWindow,
        MaterialKind::Frame,
    ];

    pub fn material(self) -> Material {
        match self {
            MaterialKind::Building => Material {
                color: 0xffffff,
                metalness: 0.5,
                roughness: 1.0,
                emissive: 0x000000,
                emissive_intensity: 1.0,
                double_sided: true,
                flat_shading: true,
            },
            MaterialKind::LightWindow => Material {
                color: 0xffffcc,
                metalness: 0.0,
                roughness: 0.1,
                emissive: 0xffffaa,
                emissive_intensity: 2.0,
                double_sided: false,
                flat_shading: true,
            },
            // Dark glass and frames share parameters but stay separate materials.
            MaterialKind::DarkWindow | MaterialKind::Frame => Material {
                color: 0x000000,
                metalness: 1.0,
                roughness: 0.5,
                emissive: 0x000000,
                emissive_intensity: 1.0,
                double_sided: false,
                flat_shading: true,
            },
        }
    }
}

/// Every material referenced by the building, keyed by kind
pub fn palette() -> BTreeMap<MaterialKind, Material> {
    MaterialKind::ALL
        .into_iter()
        .map(|kind| (kind, kind.material()))
        .collect()
}
