use crate::common::{DVec, Mat};
use rand::Rng;

/// A Gaussian process prior evaluated at finite sets of input
/// locations. Inputs are `d x n` matrices with one column per point.
pub trait PriorProcess {
    /// Mean vector at `inputs` (length = number of columns)
    fn mean(&self, inputs: &Mat) -> DVec;

    /// Cross-covariance between two input sets: `n_a x n_b`
    fn covariance(&self, aa: &Mat, bb: &Mat) -> Mat;

    /// Self-covariance at one input set
    fn self_covariance(&self, inputs: &Mat) -> Mat {
        self.covariance(inputs, inputs)
    }
}

/// A function-valued sample: evaluate anywhere, repeatedly, at
/// arbitrary finite input sets.
pub trait SamplePath {
    fn at(&self, inputs: &Mat) -> DVec;
}

/// A finite-dimensional (basis-function) stand-in for a GP prior.
/// Draws are themselves callables over input space.
pub trait FiniteBasisPrior {
    type Path: SamplePath;

    /// Draw one prior sample path
    fn sample_path<R: Rng>(&self, rng: &mut R) -> Self::Path;

    /// Draw `nn` iid prior sample paths. The default loops; implement
    /// directly when the basis supports a batched weight draw.
    fn sample_paths<R: Rng>(&self, rng: &mut R, nn: usize) -> Vec<Self::Path> {
        (0..nn).map(|_| self.sample_path(rng)).collect()
    }
}
