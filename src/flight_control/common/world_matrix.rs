use super::{matrix::Matrix, vec3d::Vec3D};

/// Number of scalars in the serialized 4×4 world transform.
pub const WORLD_MATRIX_LEN: usize = 16;

/// Orientation and position of a vehicle, equivalent to a 4×4 affine world transform.
///
/// The rotation is stored row-wise as the `right`, `up` and `backward` axes expressed in
/// world space, so a vehicle-local vector `v` maps to world space as `v · R + t`.
/// Local axes follow the same convention as offsets: `+x` right, `+y` up, `+z` backward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldMatrix {
    rotation: Matrix<f64, 3, 3>,
    translation: Vec3D<f64>,
}

impl WorldMatrix {
    /// Builds a world matrix at `position` looking along `forward` with `up` as the
    /// approximate up direction. The axes are re-orthogonalized around `forward`.
    pub fn create_world(position: Vec3D<f64>, forward: Vec3D<f64>, up: Vec3D<f64>) -> Self {
        let backward = -forward.normalize();
        let right = up.cross(backward).normalize();
        let true_up = backward.cross(right);
        Self::from_axes(right, true_up, backward, position)
    }

    /// Builds a world matrix from already orthonormal axes.
    pub fn from_axes(
        right: Vec3D<f64>,
        up: Vec3D<f64>,
        backward: Vec3D<f64>,
        translation: Vec3D<f64>,
    ) -> Self {
        Self { rotation: Matrix::new([right.into(), up.into(), backward.into()]), translation }
    }

    pub fn identity() -> Self { Self { rotation: Matrix::identity(), translation: Vec3D::zero() } }

    pub fn right(&self) -> Vec3D<f64> { Self::axis(self.rotation.row(0)) }

    pub fn up(&self) -> Vec3D<f64> { Self::axis(self.rotation.row(1)) }

    pub fn backward(&self) -> Vec3D<f64> { Self::axis(self.rotation.row(2)) }

    pub fn forward(&self) -> Vec3D<f64> { -self.backward() }

    pub fn translation(&self) -> Vec3D<f64> { self.translation }

    pub fn with_translation(self, translation: Vec3D<f64>) -> Self { Self { translation, ..self } }

    /// Maps a vehicle-local point into world space (rotate, then translate).
    pub fn transform(&self, local: Vec3D<f64>) -> Vec3D<f64> {
        self.rotate(local) + self.translation
    }

    /// Maps a world-space point into this frame's local coordinates, the inverse of
    /// [`WorldMatrix::transform`] for orthonormal rotations.
    pub fn inverse_transform(&self, world: Vec3D<f64>) -> Vec3D<f64> {
        let delta: [f64; 3] = (world - self.translation).into();
        let local = Matrix::new([delta]) * self.rotation.transpose();
        Self::axis(local.row(0))
    }

    /// Replaces the up axis with the inverse of `gravity` and re-orthogonalizes forward
    /// and right against it. A zero gravity vector leaves the matrix untouched.
    pub fn aligned_to_gravity(&self, gravity: Vec3D<f64>) -> Self {
        if gravity.is_zero() {
            return *self;
        }
        let up = -gravity.normalize();
        let right = self.forward().cross(up).normalize();
        let forward = up.cross(right);
        Self::from_axes(right, up, -forward, self.translation)
    }

    /// Row-major 4×4 layout: three axis rows padded with `0`, then the translation row
    /// padded with `1`.
    pub fn to_array(&self) -> [f64; WORLD_MATRIX_LEN] {
        let mut out = [0.0; WORLD_MATRIX_LEN];
        for row in 0..3 {
            out[row * 4..row * 4 + 3].copy_from_slice(&self.rotation.row(row));
        }
        out[12..15].copy_from_slice(&<[f64; 3]>::from(self.translation));
        out[15] = 1.0;
        out
    }

    pub fn from_array(values: &[f64; WORLD_MATRIX_LEN]) -> Self {
        let row = |i: usize| Vec3D::new(values[i * 4], values[i * 4 + 1], values[i * 4 + 2]);
        Self::from_axes(row(0), row(1), row(2), row(3))
    }

    fn rotate(&self, local: Vec3D<f64>) -> Vec3D<f64> {
        let rotated = Matrix::new([<[f64; 3]>::from(local)]) * self.rotation;
        Self::axis(rotated.row(0))
    }

    fn axis(row: [f64; 3]) -> Vec3D<f64> { Vec3D::new(row[0], row[1], row[2]) }
}

/// Expresses `world_position` in the local coordinate system of `frame`.
///
/// This is the follower's "current offset": where it sits relative to the leader.
pub fn current_offset(frame: &WorldMatrix, world_position: Vec3D<f64>) -> Vec3D<f64> {
    frame.inverse_transform(world_position)
}
