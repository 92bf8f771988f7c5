//! Pathwise posterior sampling: a posterior draw is a prior sample
//! path plus a deterministic correction that pins its distribution at
//! the inducing locations to q(u).

use crate::inducing::resolve_inducing;
use gp_model::common::{symmetrize, DVec, Mat};
use gp_model::errors::GpError;
use gp_model::posterior::SparseGpPosterior;
use gp_model::traits::{FiniteBasisPrior, PriorProcess, SamplePath};

use rand::Rng;

/// One posterior draw as an owned value object: the underlying prior
/// sample path, the correction vector `v`, and copies of the inducing
/// locations and prior process needed to evaluate
///
/// ```text
/// f(x) = path(x) + cov(x, z) v
/// ```
///
/// Stateless after construction; evaluate repeatedly at any finite
/// input set.
#[derive(Debug)]
pub struct PosteriorSample<P, S> {
    prior: P,
    inducing: Mat,
    prior_path: S,
    correction: DVec,
}

impl<P: PriorProcess, S: SamplePath> PosteriorSample<P, S> {
    /// The prior sample path this draw corrects
    pub fn prior_path(&self) -> &S {
        &self.prior_path
    }

    /// The pathwise correction vector `v`, aligned with the columns
    /// of z
    pub fn correction(&self) -> &DVec {
        &self.correction
    }
}

impl<P: PriorProcess, S: SamplePath> SamplePath for PosteriorSample<P, S> {
    fn at(&self, inputs: &Mat) -> DVec {
        self.prior_path.at(inputs) + self.prior.covariance(inputs, &self.inducing) * &self.correction
    }
}

/// Solve `K_zz v = u - path(z)` for all columns at once, sharing one
/// factorization. Non-finite values on either side abort the batch.
fn pathwise_corrections(
    kzz: Mat,
    uu: &Mat,
    path_at_z: &Mat,
) -> anyhow::Result<Mat> {
    let mm = kzz.nrows();
    if !uu.iter().all(|v| v.is_finite()) || !path_at_z.iter().all(|v| v.is_finite()) {
        return Err(GpError::Numerical {
            matrix: "pathwise residual u - f(z)".to_string(),
            operation: "finite check",
        }
        .into());
    }

    let chol = kzz.cholesky().ok_or_else(|| GpError::Numerical {
        matrix: format!("prior covariance at z [{0} x {0}]", mm),
        operation: "cholesky",
    })?;

    let vv = chol.solve(&(uu - path_at_z));
    if !vv.iter().all(|v| v.is_finite()) {
        return Err(GpError::Numerical {
            matrix: format!("prior covariance at z [{0} x {0}]", mm),
            operation: "solve",
        }
        .into());
    }
    Ok(vv)
}

/// Draw one posterior sample function.
///
/// - `rng`: random source for the path and inducing-variable draws
/// - `posterior`: fitted sparse-GP posterior
/// - `build`: weight-space approximation constructor applied to the
///   posterior's prior
pub fn draw_posterior_sample<P, B, R>(
    rng: &mut R,
    posterior: &SparseGpPosterior<P>,
    build: &impl Fn(&P) -> anyhow::Result<B>,
) -> anyhow::Result<PosteriorSample<P, B::Path>>
where
    P: PriorProcess + Clone,
    B: FiniteBasisPrior,
    R: Rng,
{
    let zz = posterior.inducing();

    let basis = build(posterior.prior())?;
    let prior_path = basis.sample_path(rng);

    let qu = resolve_inducing(posterior)?;
    let uu = qu.sample_n(rng, 1)?;

    let path_at_z = Mat::from_column_slice(posterior.num_inducing(), 1, prior_path.at(zz).as_slice());
    let kzz = symmetrize(&posterior.prior().self_covariance(zz));
    let vv = pathwise_corrections(kzz, &uu, &path_at_z)?;

    Ok(PosteriorSample {
        prior: posterior.prior().clone(),
        inducing: zz.clone(),
        prior_path,
        correction: vv.column(0).into_owned(),
    })
}

/// Draw `num_samples` independent posterior sample functions.
///
/// Batched throughout: one multi-path draw from the weight-space
/// approximation, one `M x N` draw from q(u), and a single
/// factorization of `K_zz` solving all N right-hand sides. The
/// returned samples share no mutable state.
pub fn draw_posterior_samples<P, B, R>(
    rng: &mut R,
    posterior: &SparseGpPosterior<P>,
    build: &impl Fn(&P) -> anyhow::Result<B>,
    num_samples: usize,
) -> anyhow::Result<Vec<PosteriorSample<P, B::Path>>>
where
    P: PriorProcess + Clone,
    B: FiniteBasisPrior,
    R: Rng,
{
    if num_samples == 0 {
        return Err(GpError::InvalidArgument("num_samples must be positive".to_string()).into());
    }

    let zz = posterior.inducing();
    let mm = posterior.num_inducing();

    let basis = build(posterior.prior())?;
    let prior_paths = basis.sample_paths(rng, num_samples);

    let qu = resolve_inducing(posterior)?;
    let uu = qu.sample_n(rng, num_samples)?;

    let mut path_at_z = Mat::zeros(mm, num_samples);
    for (mut f_j, path) in path_at_z.column_iter_mut().zip(prior_paths.iter()) {
        f_j.copy_from(&path.at(zz));
    }

    log::debug!(
        "pathwise batch: {} samples over {} inducing points",
        num_samples,
        mm
    );

    let kzz = symmetrize(&posterior.prior().self_covariance(zz));
    let vv = pathwise_corrections(kzz, &uu, &path_at_z)?;

    Ok(prior_paths
        .into_iter()
        .zip(vv.column_iter())
        .map(|(prior_path, v_j)| PosteriorSample {
            prior: posterior.prior().clone(),
            inducing: zz.clone(),
            prior_path,
            correction: v_j.into_owned(),
        })
        .collect())
}

/// `draw_posterior_sample` on the process-wide generator
/// (`rand::rng()`). Pass a seeded `StdRng` to the explicit-rng
/// function when reproducibility matters.
pub fn draw_posterior_sample_default<P, B>(
    posterior: &SparseGpPosterior<P>,
    build: &impl Fn(&P) -> anyhow::Result<B>,
) -> anyhow::Result<PosteriorSample<P, B::Path>>
where
    P: PriorProcess + Clone,
    B: FiniteBasisPrior,
{
    let mut rng = rand::rng();
    draw_posterior_sample(&mut rng, posterior, build)
}

/// `draw_posterior_samples` on the process-wide generator
pub fn draw_posterior_samples_default<P, B>(
    posterior: &SparseGpPosterior<P>,
    build: &impl Fn(&P) -> anyhow::Result<B>,
    num_samples: usize,
) -> anyhow::Result<Vec<PosteriorSample<P, B::Path>>>
where
    P: PriorProcess + Clone,
    B: FiniteBasisPrior,
{
    let mut rng = rand::rng();
    draw_posterior_samples(&mut rng, posterior, build, num_samples)
}
