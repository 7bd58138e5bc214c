use num::traits::{Float, Num};
use std::fmt::{Display, Formatter};
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub};

/// A 3D vector generic over any numeric type.
///
/// This struct represents a point or direction in world or vehicle-local space and
/// provides the arithmetic used by the pose transforms: addition, scaling, dot and
/// cross products, normalization and distances.
///
/// # Type Parameters
/// * `T` - The functionality for the vector depends on traits implemented by `T`.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Default)]
pub struct Vec3D<T> {
    /// The x-component of the vector (+right in vehicle-local space).
    x: T,
    /// The y-component of the vector (+up in vehicle-local space).
    y: T,
    /// The z-component of the vector (+backward in vehicle-local space).
    z: T,
}

impl<T: Copy> Vec3D<T> {
    /// Creates a new vector with the given components.
    pub const fn new(x: T, y: T, z: T) -> Self { Self { x, y, z } }

    /// Returns the x-component of the vector.
    pub const fn x(&self) -> T { self.x }

    /// Returns the y-component of the vector.
    pub const fn y(&self) -> T { self.y }

    /// Returns the z-component of the vector.
    pub const fn z(&self) -> T { self.z }
}

impl<T: Num + Copy> Vec3D<T> {
    /// Creates a zero vector (x = 0, y = 0, z = 0).
    pub fn zero() -> Self { Self::new(T::zero(), T::zero(), T::zero()) }

    /// Checks whether all components are exactly zero.
    pub fn is_zero(&self) -> bool { self.x.is_zero() && self.y.is_zero() && self.z.is_zero() }

    /// Computes the dot product of the current vector with another vector.
    ///
    /// ```text
    /// dot_product = (x1 * x2) + (y1 * y2) + (z1 * z2)
    /// ```
    pub fn dot(self, other: Self) -> T { self.x * other.x + self.y * other.y + self.z * other.z }

    /// Computes the right-handed cross product `self × other`.
    pub fn cross(self, other: Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }
}

impl<T: Float> Vec3D<T> {
    /// Computes the magnitude (absolute value) of the vector.
    pub fn abs(&self) -> T { self.dot(*self).sqrt() }

    /// Normalizes the vector to have a magnitude of 1.
    /// If the magnitude is zero, the original vector is returned unmodified.
    pub fn normalize(self) -> Self {
        let magnitude = self.abs();
        if magnitude.is_zero() { self } else { self / magnitude }
    }

    /// Computes the Euclidean distance between the current vector and another vector.
    pub fn euclid_distance(&self, other: &Self) -> T { (*self - *other).abs() }

    /// Checks if all components are within `tolerance` of `other`.
    pub fn approx_eq(&self, other: &Self, tolerance: T) -> bool {
        (self.x - other.x).abs() <= tolerance
            && (self.y - other.y).abs() <= tolerance
            && (self.z - other.z).abs() <= tolerance
    }
}

impl<T: Num + Copy> Add for Vec3D<T> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl<T: Num + Copy> AddAssign for Vec3D<T> {
    fn add_assign(&mut self, rhs: Self) { *self = *self + rhs; }
}

impl<T: Num + Copy> Sub for Vec3D<T> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl<T: Num + Copy> Mul<T> for Vec3D<T> {
    type Output = Self;

    /// Scales every component by `rhs`.
    fn mul(self, rhs: T) -> Self::Output { Self::new(self.x * rhs, self.y * rhs, self.z * rhs) }
}

impl<T: Num + Copy> Div<T> for Vec3D<T> {
    type Output = Self;

    fn div(self, rhs: T) -> Self::Output { Self::new(self.x / rhs, self.y / rhs, self.z / rhs) }
}

impl<T: Num + Copy + Neg<Output = T>> Neg for Vec3D<T> {
    type Output = Self;

    fn neg(self) -> Self::Output { Self::new(-self.x, -self.y, -self.z) }
}

impl<T: Copy> From<Vec3D<T>> for [T; 3] {
    fn from(vec: Vec3D<T>) -> Self { [vec.x, vec.y, vec.z] }
}

impl<T: Display> Display for Vec3D<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if let Some(precision) = f.precision() {
            write!(f, "[{:.*}, {:.*}, {:.*}]", precision, self.x, precision, self.y, precision, self.z)
        } else {
            write!(f, "[{}, {}, {}]", self.x, self.y, self.z)
        }
    }
}
