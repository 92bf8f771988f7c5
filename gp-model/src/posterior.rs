use crate::common::{DVec, Mat};
use crate::errors::GpError;
use crate::traits::PriorProcess;

/// Variational distribution over the inducing variables `u = f(z)`,
/// in one of the three standard parameterizations. The tag determines
/// which fields are populated; exactly one variant applies per
/// posterior.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum VariationalApprox {
    /// `q(u) = N(mean, cov)` stored directly
    Centered { mean: DVec, cov: Mat },

    /// `q(eps) = N(whitened_mean, whitened_cov)` over the whitened
    /// latent, with `u = L eps + mu` where `L L' = K_zz` and `mu` is
    /// the prior mean at z (both recovered from the prior process)
    NonCentered { whitened_mean: DVec, whitened_cov: Mat },

    /// Titsias/VFE fitting intermediates: `upper' upper = K_zz`,
    /// coefficient vector `coeff` and precision-like `precision`
    Vfe {
        upper: Mat,
        coeff: DVec,
        precision: Mat,
    },
}

impl VariationalApprox {
    /// Check the stored parameters against the inducing dimension
    fn check_dims(&self, mm: usize) -> Result<(), GpError> {
        let bad = |what: &str, rows: usize, cols: usize| {
            Err(GpError::InvalidArgument(format!(
                "{} is {} x {}, expected {} inducing points",
                what, rows, cols, mm
            )))
        };
        match self {
            VariationalApprox::Centered { mean, cov } => {
                if mean.len() != mm {
                    return bad("centered mean", mean.len(), 1);
                }
                if cov.nrows() != mm || cov.ncols() != mm {
                    return bad("centered covariance", cov.nrows(), cov.ncols());
                }
            }
            VariationalApprox::NonCentered {
                whitened_mean,
                whitened_cov,
            } => {
                if whitened_mean.len() != mm {
                    return bad("whitened mean", whitened_mean.len(), 1);
                }
                if whitened_cov.nrows() != mm || whitened_cov.ncols() != mm {
                    return bad("whitened covariance", whitened_cov.nrows(), whitened_cov.ncols());
                }
            }
            VariationalApprox::Vfe {
                upper,
                coeff,
                precision,
            } => {
                if upper.nrows() != mm || upper.ncols() != mm {
                    return bad("vfe upper factor", upper.nrows(), upper.ncols());
                }
                if coeff.len() != mm {
                    return bad("vfe coefficient", coeff.len(), 1);
                }
                if precision.nrows() != mm || precision.ncols() != mm {
                    return bad("vfe precision", precision.nrows(), precision.ncols());
                }
            }
        }
        Ok(())
    }
}

/// A fitted sparse-GP posterior: the prior process, the inducing
/// locations `z` (columns of a `d x M` matrix, order significant),
/// and the variational payload. Immutable after construction.
#[derive(Debug)]
pub struct SparseGpPosterior<P: PriorProcess> {
    prior: P,
    inducing: Mat,
    approx: VariationalApprox,
}

impl<P: PriorProcess> SparseGpPosterior<P> {
    /// Dimension checks run up front so that sampling never consumes
    /// randomness against an inconsistent posterior.
    pub fn new(prior: P, inducing: Mat, approx: VariationalApprox) -> anyhow::Result<Self> {
        let mm = inducing.ncols();
        if mm == 0 {
            return Err(GpError::InvalidArgument("empty inducing-point set".to_string()).into());
        }
        approx.check_dims(mm)?;
        Ok(Self {
            prior,
            inducing,
            approx,
        })
    }

    pub fn prior(&self) -> &P {
        &self.prior
    }

    /// `d x M` inducing locations
    pub fn inducing(&self) -> &Mat {
        &self.inducing
    }

    pub fn approx(&self) -> &VariationalApprox {
        &self.approx
    }

    pub fn num_inducing(&self) -> usize {
        self.inducing.ncols()
    }
}
