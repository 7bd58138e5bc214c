pub(crate) mod matrix;
pub mod vec3d;
pub mod world_matrix;
#[cfg(test)]
mod tests;

pub use vec3d::Vec3D;
pub use world_matrix::{current_offset, WorldMatrix, WORLD_MATRIX_LEN};
