//! Mesh data: the external flower asset, the growing emission buffers and the
//! finalized mesh handed to the renderer.
//!
//! Positions and normals are stored four floats per vertex. Positions carry `w = 1`,
//! normals `w = 0`, so downstream transforms treat them as points and directions.

use crate::error::{PlantError, PlantResult};
use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// A triangle mesh supplied by the asset loader, drawn at every flower symbol.
///
/// Read-only once built; construction validates it so emission can't produce
/// out-of-range indices.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowerMesh {
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    indices: Vec<u32>,
}

impl FlowerMesh {
    /// Builds a mesh from flat `xyz` arrays and a triangle index list.
    pub fn from_flat(positions: &[f32], normals: &[f32], indices: &[u32]) -> PlantResult<Self> {
        if positions.len() % 3 != 0 {
            return Err(PlantError::InvalidFlowerMesh(format!(
                "position array length {} is not a multiple of 3",
                positions.len()
            )));
        }
        if normals.len() != positions.len() {
            return Err(PlantError::InvalidFlowerMesh(format!(
                "{} normal floats for {} position floats",
                normals.len(),
                positions.len()
            )));
        }
        Self::new(
            positions.chunks_exact(3).map(Vec3::from_slice).collect(),
            normals.chunks_exact(3).map(Vec3::from_slice).collect(),
            indices.to_vec(),
        )
    }

    pub fn new(positions: Vec<Vec3>, normals: Vec<Vec3>, indices: Vec<u32>) -> PlantResult<Self> {
        if normals.len() != positions.len() {
            return Err(PlantError::InvalidFlowerMesh(format!(
                "{} normals for {} vertices",
                normals.len(),
                positions.len()
            )));
        }
        if indices.len() % 3 != 0 {
            return Err(PlantError::InvalidFlowerMesh(format!(
                "index count {} is not a multiple of 3",
                indices.len()
            )));
        }
        if let Some(&bad) = indices.iter().find(|&&i| i as usize >= positions.len()) {
            return Err(PlantError::InvalidFlowerMesh(format!(
                "index {bad} out of range for {} vertices",
                positions.len()
            )));
        }
        Ok(Self {
            positions,
            normals,
            indices,
        })
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }
}

/// Append-only buffers filled while the turtle walks the grammar.
#[derive(Clone, Debug, Default)]
pub struct MeshBuffers {
    indices: Vec<u32>,
    positions: Vec<f32>,
    normals: Vec<f32>,
}

impl MeshBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of vertices appended so far. New index blocks are offset by this.
    ///
    /// Fails once the count no longer fits a `u32` index.
    pub fn vertex_count(&self) -> PlantResult<u32> {
        let vertices = self.positions.len() / 4;
        u32::try_from(vertices).map_err(|_| PlantError::IndexOverflow { vertices })
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Appends one vertex; `position` gets `w = 1`, `normal` gets `w = 0`.
    pub fn push_vertex(&mut self, position: Vec3, normal: Vec3) {
        self.positions.extend_from_slice(&position.extend(1.0).to_array());
        self.normals.extend_from_slice(&normal.extend(0.0).to_array());
    }

    /// Appends `indices`, each shifted by `base`.
    ///
    /// Nothing is appended if any shifted index would overflow.
    pub fn push_indices(&mut self, base: u32, indices: &[u32]) -> PlantResult<()> {
        let shifted = indices
            .iter()
            .map(|&i| i.checked_add(base))
            .collect::<Option<Vec<u32>>>()
            .ok_or(PlantError::IndexOverflow {
                vertices: base as usize + indices.iter().copied().max().unwrap_or(0) as usize + 1,
            })?;
        self.indices.extend(shifted);
        Ok(())
    }

    /// Freezes the buffers. Consumes `self`, so a build finalizes exactly once.
    pub fn finalize(self) -> PlantMesh {
        PlantMesh {
            indices: self.indices.into_boxed_slice(),
            positions: self.positions.into_boxed_slice(),
            normals: self.normals.into_boxed_slice(),
        }
    }
}

/// The finished, immutable plant mesh.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlantMesh {
    indices: Box<[u32]>,
    positions: Box<[f32]>,
    normals: Box<[f32]>,
}

impl PlantMesh {
    /// Triangle list, three indices per triangle.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// `xyzw` per vertex, `w = 1`.
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// `xyzw` per vertex, `w = 0`.
    pub fn normals(&self) -> &[f32] {
        &self.normals
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 4
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn position(&self, vertex: usize) -> Option<Vec4> {
        self.positions
            .get(vertex * 4..vertex * 4 + 4)
            .map(Vec4::from_slice)
    }

    pub fn normal(&self, vertex: usize) -> Option<Vec4> {
        self.normals.get(vertex * 4..vertex * 4 + 4).map(Vec4::from_slice)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices[..])
    }

    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions[..])
    }

    pub fn normal_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.normals[..])
    }
}
