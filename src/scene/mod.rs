//! 3D building scene
//!
//! - GLB container parsing
//! - Material palette
//! - Fragment styling and composition

mod assembler;
mod glb;
mod materials;

pub use assembler::{
    Building, FLOOR, FRAGMENT_SCALE, FragmentSpec, GROUND, NodeStyle, ROOF, SceneGroup, SceneNode,
    assemble_building, load_fragment, style_fragment,
};
pub use glb::{GltfDocument, GltfNode, GltfScene, parse_glb};
pub use materials::{Material, MaterialKind, palette};

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::error::AppError;

/// Assembles the building once and hands out the shared result
///
/// A failed assembly is not remembered; the next call tries again.
pub struct SceneCache {
    models_dir: PathBuf,
    building: OnceCell<Arc<Building>>,
}

impl SceneCache {
    pub fn new(models_dir: impl Into<PathBuf>) -> Self {
        Self {
            models_dir: models_dir.into(),
            building: OnceCell::new(),
        }
    }

    pub async fn building(&self) -> Result<Arc<Building>, AppError> {
        self.building
            .get_or_try_init(|| async {
                assemble_building(&self.models_dir).await.map(Arc::new)
            })
            .await
            .cloned()
    }
}
