//! # symbios-flora
//!
//! Procedural plants from L-System grammars.
//!
//! An axiom is rewritten by an [`ExpandRules`] table, then walked by a stack-based
//! [`Turtle`] that emits tapered box branches and an externally supplied flower mesh
//! into index/position/normal buffers ready for GPU upload ([`PlantMesh`]).
//!
//! ```no_run
//! use symbios_flora::{FlowerMesh, PlantConfig, PlantInterpreter};
//!
//! # fn main() -> Result<(), symbios_flora::PlantError> {
//! let flower = FlowerMesh::from_flat(&[0.0; 9], &[0.0f32, 0.0, 1.0].repeat(3), &[0, 1, 2])?;
//! let mesh = PlantInterpreter::new(PlantConfig::default()).generate(&flower)?;
//! println!("{} triangles", mesh.triangle_count());
//! # Ok(())
//! # }
//! ```

pub mod asset;
pub mod error;
pub mod grammar;
pub mod interpreter;
pub mod mesh;
pub mod turtle;

pub use asset::*;
pub use error::*;
pub use grammar::*;
pub use interpreter::*;
pub use mesh::*;
pub use turtle::*;
