use super::{current_offset, matrix::Matrix, Vec3D, WorldMatrix, WORLD_MATRIX_LEN};
use rand::{rng, Rng};

const EPS: f64 = 1e-9;

fn random_vec(range: f64) -> Vec3D<f64> {
    let mut r = rng();
    Vec3D::new(
        r.random_range(-range..range),
        r.random_range(-range..range),
        r.random_range(-range..range),
    )
}

/// A random orientation built from two random, non-parallel directions.
fn random_frame() -> WorldMatrix {
    loop {
        let forward = random_vec(1.0);
        let up = random_vec(1.0);
        if forward.abs() < 0.1 || up.abs() < 0.1 || forward.normalize().cross(up.normalize()).abs() < 0.1 {
            continue;
        }
        return WorldMatrix::create_world(random_vec(10_000.0), forward, up);
    }
}

#[test]
fn test_vector_basics() {
    let a = Vec3D::<f64>::new(1.0, 2.0, 3.0);
    let b = Vec3D::new(-2.0, 0.5, 4.0);
    assert_eq!(a + b, Vec3D::new(-1.0, 2.5, 7.0));
    assert_eq!(a - b, Vec3D::new(3.0, 1.5, -1.0));
    assert_eq!(a * 2.0, Vec3D::new(2.0, 4.0, 6.0));
    assert!((a.dot(b) - 11.0).abs() < EPS);
    assert_eq!(
        Vec3D::new(1.0, 0.0, 0.0).cross(Vec3D::new(0.0, 1.0, 0.0)),
        Vec3D::new(0.0, 0.0, 1.0)
    );
    assert!((Vec3D::<f64>::new(3.0, 4.0, 0.0).abs() - 5.0).abs() < EPS);
    assert!(Vec3D::<f64>::zero().is_zero());
}

#[test]
fn test_matrix_product_and_transpose() {
    let m = Matrix::new([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
    let t = m.transpose();
    assert_eq!(t.row(2), [3.0, 6.0]);
    let product = m * t;
    assert_eq!(product.row(0), [14.0, 32.0]);
    assert_eq!(product.row(1), [32.0, 77.0]);
    assert_eq!(Matrix::<f64, 3, 3>::identity() * Matrix::new([[1.0], [2.0], [3.0]]), Matrix::new([[1.0], [2.0], [3.0]]));
}

#[test]
fn test_identity_offsets() {
    let frame = WorldMatrix::identity().with_translation(Vec3D::new(10.0, 0.0, 0.0));
    assert_eq!(frame.forward(), Vec3D::new(0.0, 0.0, -1.0));
    assert_eq!(frame.transform(Vec3D::new(50.0, 0.0, 0.0)), Vec3D::new(60.0, 0.0, 0.0));
    assert_eq!(frame.transform(Vec3D::new(0.0, 0.0, 5.0)), Vec3D::new(10.0, 0.0, 5.0));
}

#[test]
fn test_create_world_axes() {
    let frame = WorldMatrix::create_world(
        Vec3D::new(1.0, 2.0, 3.0),
        Vec3D::new(1.0, 0.0, 0.0),
        Vec3D::new(0.2, 1.0, 0.0),
    );
    assert!(frame.forward().approx_eq(&Vec3D::new(1.0, 0.0, 0.0), EPS));
    assert!(frame.up().approx_eq(&Vec3D::new(0.0, 1.0, 0.0), EPS));
    assert!(frame.right().approx_eq(&Vec3D::new(0.0, 0.0, 1.0), EPS));
    assert!(frame.right().dot(frame.up()).abs() < EPS);
    // one unit to the right of a vehicle facing +x lies at +z
    let right_of = frame.transform(Vec3D::new(1.0, 0.0, 0.0));
    assert!(right_of.approx_eq(&Vec3D::new(1.0, 2.0, 4.0), EPS));
}

#[test]
fn test_offset_round_trip() {
    for _ in 0..200 {
        let frame = random_frame();
        let offset = random_vec(500.0);
        let world = frame.transform(offset);
        assert!(current_offset(&frame, world).approx_eq(&offset, 1e-6));
    }
}

#[test]
fn test_world_position_round_trip() {
    for _ in 0..200 {
        let frame = random_frame();
        let world = frame.translation() + random_vec(500.0);
        let offset = current_offset(&frame, world);
        assert!(frame.transform(offset).approx_eq(&world, 1e-6));
    }
}

#[test]
fn test_serialized_layout() {
    let frame = WorldMatrix::create_world(
        Vec3D::new(7.0, 8.0, 9.0),
        Vec3D::new(0.0, 0.0, -1.0),
        Vec3D::new(0.0, 1.0, 0.0),
    );
    let values = frame.to_array();
    assert_eq!(values.len(), WORLD_MATRIX_LEN);
    assert_eq!(values[12..16], [7.0, 8.0, 9.0, 1.0]);
    assert_eq!([values[3], values[7], values[11]], [0.0, 0.0, 0.0]);
    assert_eq!(WorldMatrix::from_array(&values), frame);
}

#[test]
fn test_gravity_alignment() {
    let tilted = WorldMatrix::create_world(
        Vec3D::zero(),
        Vec3D::new(0.0, 0.3, -1.0),
        Vec3D::new(0.2, 1.0, 0.0),
    );
    let aligned = tilted.aligned_to_gravity(Vec3D::new(0.0, -9.81, 0.0));
    assert!(aligned.up().approx_eq(&Vec3D::new(0.0, 1.0, 0.0), EPS));
    assert!(aligned.forward().y().abs() < EPS);
    assert!(aligned.forward().dot(tilted.forward()) > 0.0);
    assert!(aligned.right().dot(aligned.forward()).abs() < EPS);
    assert_eq!(tilted.aligned_to_gravity(Vec3D::zero()), tilted);
}
