#![allow(dead_code)]

pub type Mat = nalgebra::DMatrix<f32>;
pub type DVec = nalgebra::DVector<f32>;

/// Symmetrize a square matrix: `0.5 * (C + C')`
///
/// Floating-point asymmetry accumulates in products like `L S L'`;
/// factorization routines downstream expect an exactly symmetric input.
pub fn symmetrize(cc: &Mat) -> Mat {
    (cc + cc.transpose()) * 0.5
}
