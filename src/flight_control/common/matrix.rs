use num::traits::{One, Zero};
use std::ops::{Add, Mul};

/// Dense row-major `M`×`N` matrix.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Matrix<T, const M: usize, const N: usize> {
    pub(crate) data: [[T; N]; M],
}

impl<T, const M: usize, const N: usize> Matrix<T, M, N>
where T: Copy
{
    pub fn new(data: [[T; N]; M]) -> Self { Matrix { data } }

    pub fn row(&self, row: usize) -> [T; N] { self.data[row] }
}

impl<T, const M: usize, const N: usize> Matrix<T, M, N>
where T: Copy + Zero
{
    pub fn zero() -> Self {
        Self {
            data: [[T::zero(); N]; M],
        }
    }
}

impl<T, const N: usize> Matrix<T, N, N>
where T: Copy + Zero + One
{
    pub fn identity() -> Self {
        let mut result = Self::zero();
        for i in 0..N {
            result.data[i][i] = T::one();
        }
        result
    }
}

impl<T, const M: usize, const N: usize, const P: usize> Mul<Matrix<T, N, P>> for Matrix<T, M, N>
where T: Copy + Zero + Add<Output = T> + Mul<Output = T>
{
    type Output = Matrix<T, M, P>;

    fn mul(self, rhs: Matrix<T, N, P>) -> Self::Output {
        let mut result = Matrix::<T, M, P>::zero();

        for i in 0..M {
            for j in 0..P {
                let mut sum = T::zero();
                for k in 0..N {
                    sum = sum + self.data[i][k] * rhs.data[k][j];
                }
                result.data[i][j] = sum;
            }
        }

        result
    }
}

impl<T, const M: usize, const N: usize> Matrix<T, M, N>
where T: Copy + Zero
{
    pub fn transpose(&self) -> Matrix<T, N, M> {
        let mut result = Matrix::<T, N, M>::zero();

        for i in 0..M {
            for j in 0..N {
                result.data[j][i] = self.data[i][j];
            }
        }

        result
    }
}
