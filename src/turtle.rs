//! Turtle state and the branch stack.

use crate::error::{PlantError, PlantResult};
use glam::{Mat3, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// The four orientation templates a turn can pick from.
///
/// A turn replaces the turtle's rotation with one of these, it does not compose
/// with the previous orientation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AxisTemplate {
    /// Rotation about +X.
    PitchUp,
    /// Rotation about +Y.
    RollRight,
    /// Rotation about +X with the Y axis mirrored. Improper (det = -1).
    PitchMirrored,
    /// Rotation about -Y.
    RollLeft,
}

impl AxisTemplate {
    pub const ALL: [AxisTemplate; 4] = [
        AxisTemplate::PitchUp,
        AxisTemplate::RollRight,
        AxisTemplate::PitchMirrored,
        AxisTemplate::RollLeft,
    ];

    /// Picks a template uniformly at random.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    /// Builds the rotation matrix for `angle` radians.
    pub fn matrix(self, angle: f32) -> Mat3 {
        let (s, c) = angle.sin_cos();
        match self {
            AxisTemplate::PitchUp => Mat3::from_cols(
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, c, s),
                Vec3::new(0.0, -s, c),
            ),
            AxisTemplate::RollRight => Mat3::from_cols(
                Vec3::new(c, 0.0, -s),
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(s, 0.0, c),
            ),
            AxisTemplate::PitchMirrored => Mat3::from_cols(
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, -c, s),
                Vec3::new(0.0, s, c),
            ),
            AxisTemplate::RollLeft => Mat3::from_cols(
                Vec3::new(c, 0.0, s),
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(-s, 0.0, c),
            ),
        }
    }
}

/// Position and orientation of the turtle at one point in the walk.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurtleState {
    /// World-space position of the cursor.
    pub position: Vec3,

    /// Local-to-world orientation.
    pub rotation: Mat3,
}

impl Default for TurtleState {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Mat3::IDENTITY,
        }
    }
}

impl TurtleState {
    /// Returns the turtle's heading (local Z axis) in world space.
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// Moves the turtle `distance` along its heading.
    pub fn extend(&mut self, distance: f32) {
        self.position += self.forward() * distance;
    }

    /// Replaces the rotation with a randomly chosen template turned by `angle_degrees`.
    pub fn reorient<R: Rng + ?Sized>(&mut self, angle_degrees: f32, rng: &mut R) {
        self.reorient_with(AxisTemplate::random(rng), angle_degrees);
    }

    /// Replaces the rotation with `template` turned by `angle_degrees`.
    pub fn reorient_with(&mut self, template: AxisTemplate, angle_degrees: f32) {
        self.rotation = template.matrix(angle_degrees.to_radians());
    }

    /// Local-space point to world space.
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.rotation * local + self.position
    }

    /// Local-space direction to world space. Ignores position.
    pub fn transform_vector(&self, local: Vec3) -> Vec3 {
        self.rotation * local
    }
}

/// A stack of turtle states. Never empty.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Turtle {
    states: Vec<TurtleState>,
}

impl Default for Turtle {
    fn default() -> Self {
        Self::new()
    }
}

impl Turtle {
    /// A turtle at the origin with identity rotation.
    pub fn new() -> Self {
        Self {
            states: vec![TurtleState::default()],
        }
    }

    pub fn current(&self) -> &TurtleState {
        // `states` always holds the root state.
        &self.states[self.states.len() - 1]
    }

    pub fn current_mut(&mut self) -> &mut TurtleState {
        let top = self.states.len() - 1;
        &mut self.states[top]
    }

    /// Stack size; 1 at the root.
    pub fn depth(&self) -> usize {
        self.states.len()
    }

    /// Duplicates the top state (`[`).
    pub fn push(&mut self) {
        let top = *self.current();
        self.states.push(top);
    }

    /// Discards the top state (`]`).
    ///
    /// Fails with [`PlantError::StackUnderflow`] instead of removing the root state.
    /// `position` is only used for the error report.
    pub fn pop(&mut self, position: usize) -> PlantResult<TurtleState> {
        if self.states.len() > 1
            && let Some(state) = self.states.pop()
        {
            return Ok(state);
        }
        Err(PlantError::StackUnderflow {
            position,
            unclosed: 0,
        })
    }
}

/// What the turtle does for a symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawOp {
    /// Save the full turtle state onto the stack (`[`).
    Push,
    /// Restore the most recently pushed turtle state (`]`).
    Pop,
    /// Emit a box segment and advance along it.
    Branch,
    /// Random reorientation.
    Turn,
    /// Emit a flower at the current position. The turtle does not move.
    Flower,
    /// No-op: symbol has no drawing meaning.
    Ignore,
}
