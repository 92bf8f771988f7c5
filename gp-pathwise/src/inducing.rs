//! Resolve the explicit distribution q(u) over inducing-point function
//! values from whichever parameterization the approximation was fit
//! in. Pure function of the posterior's stored parameters.

use gp_model::common::symmetrize;
use gp_model::errors::GpError;
use gp_model::gaussian::MultivariateNormal;
use gp_model::posterior::{SparseGpPosterior, VariationalApprox};
use gp_model::traits::PriorProcess;

/// `q(u) = N(mean, cov)` over `u = f(z)`, dimension `M = |z|`.
///
/// - Centered: stored `(mean, cov)` passed through unchanged.
/// - Non-centered: `u = L eps + mu` with `eps ~ N(m, S)` and
///   `L L' = K_zz`, so `mean = L m + mu` and `cov = L S L'`.
/// - VFE: reconstruct from the Titsias fitting intermediates,
///   `mean = U'(U alpha) = K_zz alpha` and `cov = U' Lambda U`.
///
/// The returned covariance is symmetrized. A prior covariance at z
/// that fails to factorize surfaces as `GpError::Numerical`.
pub fn resolve_inducing<P: PriorProcess>(
    posterior: &SparseGpPosterior<P>,
) -> anyhow::Result<MultivariateNormal> {
    let zz = posterior.inducing();

    match posterior.approx() {
        VariationalApprox::Centered { mean, cov } => {
            MultivariateNormal::new(mean.clone(), symmetrize(cov))
        }

        VariationalApprox::NonCentered {
            whitened_mean,
            whitened_cov,
        } => {
            let kzz = symmetrize(&posterior.prior().self_covariance(zz));
            let chol = kzz.cholesky().ok_or_else(|| GpError::Numerical {
                matrix: format!("prior covariance at z [{0} x {0}]", posterior.num_inducing()),
                operation: "cholesky",
            })?;
            let ll = chol.l();

            let mean = &ll * whitened_mean + posterior.prior().mean(zz);
            let cov = symmetrize(&(&ll * whitened_cov * ll.transpose()));
            MultivariateNormal::new(mean, cov)
        }

        VariationalApprox::Vfe {
            upper,
            coeff,
            precision,
        } => {
            let mean = upper.transpose() * (upper * coeff);
            let cov = symmetrize(&(upper.transpose() * precision * upper));
            MultivariateNormal::new(mean, cov)
        }

        // `VariationalApprox` is non-exhaustive; a variant added later
        // must fail here rather than fall into one of the known cases.
        _ => Err(GpError::UnsupportedApproximation.into()),
    }
}
