use crate::common::{DVec, Mat};
use crate::errors::GpError;

use rand::Rng;
use rand_distr::StandardNormal;

/// An explicit multivariate normal `N(mean, cov)`.
///
/// Sampling factorizes the covariance once per call; a covariance that
/// is not positive definite fails with `GpError::Numerical` rather
/// than proceeding on a broken factor.
#[derive(Debug, Clone)]
pub struct MultivariateNormal {
    pub mean: DVec,
    pub cov: Mat,
}

impl MultivariateNormal {
    pub fn new(mean: DVec, cov: Mat) -> anyhow::Result<Self> {
        if cov.nrows() != mean.len() || cov.ncols() != mean.len() {
            return Err(GpError::InvalidArgument(format!(
                "covariance is {} x {}, mean has length {}",
                cov.nrows(),
                cov.ncols(),
                mean.len()
            ))
            .into());
        }
        Ok(Self { mean, cov })
    }

    pub fn dim(&self) -> usize {
        self.mean.len()
    }

    /// One draw: `mean + L e` with `e ~ N(0, I)`
    pub fn sample<R: Rng>(&self, rng: &mut R) -> anyhow::Result<DVec> {
        let ss = self.sample_n(rng, 1)?;
        Ok(ss.column(0).into_owned())
    }

    /// `nn` iid draws packed as columns of a `dim x nn` matrix.
    /// A single Cholesky factorization is shared across all columns.
    pub fn sample_n<R: Rng>(&self, rng: &mut R, nn: usize) -> anyhow::Result<Mat> {
        if nn == 0 {
            return Err(GpError::InvalidArgument("sample_n needs nn > 0".to_string()).into());
        }

        let chol = self.cov.clone().cholesky().ok_or_else(|| GpError::Numerical {
            matrix: format!("covariance [{} x {}]", self.cov.nrows(), self.cov.ncols()),
            operation: "cholesky",
        })?;

        let dd = self.dim();
        let ee = Mat::from_fn(dd, nn, |_, _| rng.sample(StandardNormal));

        let mut ss = chol.l() * ee;
        for mut s_j in ss.column_iter_mut() {
            s_j += &self.mean;
        }
        Ok(ss)
    }
}
