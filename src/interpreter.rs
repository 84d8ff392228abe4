//! Interpreter that turns an expanded grammar into a [`PlantMesh`].
//!
//! The entry point is [`PlantInterpreter`]. Configure it with a [`PlantConfig`] and an
//! [`ExpandRules`] table, then call [`PlantInterpreter::generate`] with a ready
//! [`FlowerMesh`], or expand and draw separately with [`PlantInterpreter::expand`] and
//! [`PlantInterpreter::build_mesh`].

use crate::error::{PlantError, PlantResult};
use crate::grammar::{ExpandRules, SymbolString};
use crate::mesh::{FlowerMesh, MeshBuffers, PlantMesh};
use crate::turtle::{DrawOp, Turtle};
use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Unit box corners, four per face, extruded along +Z from the turtle position.
const BOX_CORNERS: [[f32; 3]; 24] = [
    // -Z
    [-0.5, -0.5, 0.0],
    [-0.5, 0.5, 0.0],
    [0.5, 0.5, 0.0],
    [0.5, -0.5, 0.0],
    // +Z
    [-0.5, -0.5, 1.0],
    [-0.5, 0.5, 1.0],
    [0.5, 0.5, 1.0],
    [0.5, -0.5, 1.0],
    // -X
    [-0.5, -0.5, 0.0],
    [-0.5, 0.5, 0.0],
    [-0.5, 0.5, 1.0],
    [-0.5, -0.5, 1.0],
    // +X
    [0.5, 0.5, 0.0],
    [0.5, -0.5, 0.0],
    [0.5, -0.5, 1.0],
    [0.5, 0.5, 1.0],
    // +Y
    [-0.5, 0.5, 0.0],
    [0.5, 0.5, 0.0],
    [0.5, 0.5, 1.0],
    [-0.5, 0.5, 1.0],
    // -Y
    [-0.5, -0.5, 0.0],
    [0.5, -0.5, 0.0],
    [0.5, -0.5, 1.0],
    [-0.5, -0.5, 1.0],
];

/// Face normals in the same order as [`BOX_CORNERS`].
const BOX_FACE_NORMALS: [[f32; 3]; 6] = [
    [0.0, 0.0, -1.0],
    [0.0, 0.0, 1.0],
    [-1.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, -1.0, 0.0],
];

/// Two triangles per face.
const BOX_INDICES: [u32; 36] = [
    0, 1, 2, 0, 2, 3, //
    4, 5, 6, 4, 6, 7, //
    8, 9, 10, 8, 10, 11, //
    12, 13, 14, 12, 14, 15, //
    16, 17, 18, 16, 18, 19, //
    20, 21, 22, 20, 22, 23,
];

/// Configuration for plant generation.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PlantConfig {
    /// Seed string the rules are applied to.
    pub axiom: String,
    /// Number of rewriting passes. Output size grows geometrically with this.
    pub iterations: u32,
    /// Randomness scale for branch length and turn angle. 0 disables jitter.
    pub variation: f32,
    /// Length of an untapered, unjittered root branch.
    pub min_length: f32,
    /// Turn angle in degrees before jitter.
    pub base_angle: f32,
    /// Branch width at depth 0.
    pub base_width: f32,
    /// Width lost per unit of stack depth is `1 / width_taper`.
    pub width_taper: f32,
    /// Flower vertex positions are divided by this.
    pub flower_position_divisor: f32,
    /// Flower vertex normals are divided by this.
    pub flower_normal_divisor: f32,
}

impl Default for PlantConfig {
    fn default() -> Self {
        Self {
            axiom: "SDSBS".to_string(),
            iterations: 2,
            variation: 20.0,
            min_length: 2.0,
            base_angle: 30.0,
            base_width: 0.7,
            width_taper: 7.0,
            flower_position_divisor: 3.0,
            flower_normal_divisor: 2.0,
        }
    }
}

impl PlantConfig {
    /// Branch length at stack `depth` for a jitter sample `u` in `[0, 1)`.
    pub fn branch_length(&self, depth: usize, u: f32) -> f32 {
        let jitter = u * (self.variation / 20.0) - self.variation / 50.0;
        let taper = if self.iterations == 0 {
            0.0
        } else {
            (depth as f32 - 1.0) / self.iterations as f32
        };
        self.min_length + jitter - taper
    }

    /// Branch width at stack `depth`.
    pub fn branch_width(&self, depth: usize) -> f32 {
        self.base_width - depth as f32 / self.width_taper
    }

    /// Turn angle in degrees for a jitter sample `u` in `[0, 1)`.
    pub fn turn_angle(&self, u: f32) -> f32 {
        self.base_angle + u * self.variation
    }
}

/// Expands a plant grammar and draws it with a turtle.
pub struct PlantInterpreter {
    rules: ExpandRules,
    config: PlantConfig,
}

impl PlantInterpreter {
    /// Creates an interpreter with the given configuration and the standard plant rules.
    pub fn new(config: PlantConfig) -> Self {
        Self {
            rules: ExpandRules::standard(),
            config,
        }
    }

    /// Replaces the rewrite table (builder pattern).
    pub fn with_rules(mut self, rules: ExpandRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn config(&self) -> &PlantConfig {
        &self.config
    }

    pub fn rules(&self) -> &ExpandRules {
        &self.rules
    }

    /// Expands the configured axiom for the configured number of passes.
    pub fn expand(&self) -> SymbolString {
        let seed = SymbolString::from(self.config.axiom.as_str());
        log::debug!(
            "expanding {:?} for {} passes, predicted {} symbols",
            self.config.axiom,
            self.config.iterations,
            self.rules.predicted_len(&seed, self.config.iterations)
        );
        self.rules.expand(&seed, self.config.iterations)
    }

    /// Expands the axiom and draws it, using the thread-local RNG.
    pub fn generate(&self, flower: &FlowerMesh) -> PlantResult<PlantMesh> {
        self.generate_with_rng(flower, &mut rand::rng())
    }

    /// Expands the axiom and draws it. Seeding `rng` makes the output reproducible.
    pub fn generate_with_rng<R: Rng + ?Sized>(
        &self,
        flower: &FlowerMesh,
        rng: &mut R,
    ) -> PlantResult<PlantMesh> {
        let grammar = self.expand();
        self.build_mesh(&grammar, flower, rng)
    }

    /// Walks `grammar` once, left to right, and returns the finished mesh.
    ///
    /// `[` and `]` must balance. An extra `]` or a `[` left open at the end fails the
    /// whole build with [`PlantError::StackUnderflow`]; no partial mesh is returned.
    pub fn build_mesh<R: Rng + ?Sized>(
        &self,
        grammar: &SymbolString,
        flower: &FlowerMesh,
        rng: &mut R,
    ) -> PlantResult<PlantMesh> {
        let mut turtle = Turtle::new();
        let mut buffers = MeshBuffers::new();

        for (position, sym) in grammar.iter().enumerate() {
            match sym.draw_op() {
                DrawOp::Push => turtle.push(),
                DrawOp::Pop => {
                    turtle.pop(position)?;
                }
                DrawOp::Branch => self.emit_branch(&mut turtle, &mut buffers, rng)?,
                DrawOp::Turn => {
                    let angle = self.config.turn_angle(rng.random::<f32>());
                    turtle.current_mut().reorient(angle, rng);
                }
                DrawOp::Flower => self.emit_flower(&turtle, &mut buffers, flower)?,
                DrawOp::Ignore => {}
            }
        }

        if turtle.depth() > 1 {
            return Err(PlantError::StackUnderflow {
                position: grammar.len(),
                unclosed: turtle.depth() - 1,
            });
        }

        let mesh = buffers.finalize();
        log::info!(
            "built plant mesh with {} vertices, {} triangles",
            mesh.vertex_count(),
            mesh.triangle_count()
        );
        Ok(mesh)
    }

    /// Appends one tapered box along the turtle heading, then moves the turtle to its end.
    pub fn emit_branch<R: Rng + ?Sized>(
        &self,
        turtle: &mut Turtle,
        buffers: &mut MeshBuffers,
        rng: &mut R,
    ) -> PlantResult<()> {
        let depth = turtle.depth();
        let length = self.config.branch_length(depth, rng.random::<f32>());
        let width = self.config.branch_width(depth);
        let scale = Vec3::new(width, width, length);

        let state = turtle.current_mut();
        let base = buffers.vertex_count()?;
        for (i, corner) in BOX_CORNERS.iter().enumerate() {
            let position = state.transform_point(Vec3::from_array(*corner) * scale);
            let normal = state.transform_vector(Vec3::from_array(BOX_FACE_NORMALS[i / 4]));
            buffers.push_vertex(position, normal);
        }
        buffers.push_indices(base, &BOX_INDICES)?;
        log::trace!(
            "branch at {} depth {depth}, length {length:.3}, width {width:.3}",
            state.position
        );

        state.extend(length);
        Ok(())
    }

    /// Appends the flower mesh at the turtle's current transform.
    pub fn emit_flower(
        &self,
        turtle: &Turtle,
        buffers: &mut MeshBuffers,
        flower: &FlowerMesh,
    ) -> PlantResult<()> {
        let state = turtle.current();
        let base = buffers.vertex_count()?;
        for (p, n) in flower.positions().iter().zip(flower.normals()) {
            let position = state.transform_point(*p / self.config.flower_position_divisor);
            let normal = state.transform_vector(*n / self.config.flower_normal_divisor);
            buffers.push_vertex(position, normal);
        }
        buffers.push_indices(base, flower.indices())?;
        log::trace!(
            "flower at {} ({} vertices)",
            state.position,
            flower.vertex_count()
        );
        Ok(())
    }
}
