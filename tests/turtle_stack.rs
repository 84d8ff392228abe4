// tests/turtle_stack.rs
use glam::{Mat3, Vec3};
use rand::SeedableRng;
use rand::rngs::StdRng;
use symbios_flora::{AxisTemplate, PlantError, Turtle, TurtleState};

#[test]
fn test_new_turtle_at_origin() {
    let turtle = Turtle::new();
    assert_eq!(turtle.depth(), 1);
    assert_eq!(turtle.current().position, Vec3::ZERO);
    assert_eq!(turtle.current().rotation, Mat3::IDENTITY);
}

#[test]
fn test_extend_follows_heading() {
    let mut state = TurtleState::default();
    state.extend(2.5);
    assert_eq!(state.position, Vec3::new(0.0, 0.0, 2.5));

    // Pitch 90 degrees about X: heading Z turns to -Y.
    state.reorient_with(AxisTemplate::PitchUp, 90.0);
    assert!(state.forward().abs_diff_eq(Vec3::NEG_Y, 1e-6));
    state.extend(1.0);
    assert!(state.position.abs_diff_eq(Vec3::new(0.0, -1.0, 2.5), 1e-5));
}

#[test]
fn test_reorient_replaces_rotation() {
    let mut a = TurtleState::default();
    a.reorient_with(AxisTemplate::RollRight, 45.0);
    a.reorient_with(AxisTemplate::RollRight, 45.0);

    let mut b = TurtleState::default();
    b.reorient_with(AxisTemplate::RollRight, 45.0);

    // Two turns of 45 are not 90: the second one discards the first.
    assert!(a.rotation.abs_diff_eq(b.rotation, 1e-6));
}

#[test]
fn test_templates_are_orthonormal() {
    for template in AxisTemplate::ALL {
        let m = template.matrix(37f32.to_radians());
        assert!((m.transpose() * m).abs_diff_eq(Mat3::IDENTITY, 1e-5));
    }
    assert!((AxisTemplate::PitchMirrored.matrix(0.3).determinant() + 1.0).abs() < 1e-5);
    assert!((AxisTemplate::RollLeft.matrix(0.3).determinant() - 1.0).abs() < 1e-5);
}

#[test]
fn test_random_reorient_picks_a_template() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..32 {
        let mut state = TurtleState::default();
        state.reorient(30.0, &mut rng);
        let matches = AxisTemplate::ALL
            .iter()
            .any(|t| t.matrix(30f32.to_radians()).abs_diff_eq(state.rotation, 1e-6));
        assert!(matches);
    }
}

#[test]
fn test_push_copies_and_pop_restores() {
    let mut turtle = Turtle::new();
    turtle.current_mut().extend(1.0);
    turtle.push();
    assert_eq!(turtle.depth(), 2);
    assert_eq!(turtle.current().position, Vec3::new(0.0, 0.0, 1.0));

    turtle.current_mut().extend(3.0);
    turtle
        .current_mut()
        .reorient_with(AxisTemplate::RollLeft, 60.0);
    let popped = turtle.pop(0).unwrap();
    assert_eq!(popped.position, Vec3::new(0.0, 0.0, 4.0));

    assert_eq!(turtle.depth(), 1);
    assert_eq!(turtle.current().position, Vec3::new(0.0, 0.0, 1.0));
    assert_eq!(turtle.current().rotation, Mat3::IDENTITY);
}

#[test]
fn test_pop_root_underflows() {
    let mut turtle = Turtle::new();
    assert_eq!(
        turtle.pop(5),
        Err(PlantError::StackUnderflow {
            position: 5,
            unclosed: 0
        })
    );
    assert_eq!(turtle.depth(), 1);
}
