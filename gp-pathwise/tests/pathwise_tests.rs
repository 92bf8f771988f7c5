use approx::assert_abs_diff_eq;
use gp_model::common::{DVec, Mat};
use gp_model::errors::GpError;
use gp_model::posterior::{SparseGpPosterior, VariationalApprox};
use gp_model::simulate::{FourierBasisPrior, SquaredExpPrior};
use gp_model::traits::{PriorProcess, SamplePath};
use gp_pathwise::pathwise::{draw_posterior_sample, draw_posterior_samples};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn test_prior() -> SquaredExpPrior {
    SquaredExpPrior {
        mean_value: 0.0,
        variance: 1.0,
        length_scale: 0.5,
    }
}

fn build_basis(seed: u64) -> impl Fn(&SquaredExpPrior) -> anyhow::Result<FourierBasisPrior> {
    move |prior: &SquaredExpPrior| {
        let mut rng = StdRng::seed_from_u64(seed);
        FourierBasisPrior::build(prior, 1, 256, &mut rng)
    }
}

fn centered_posterior(
    qu_mean: &[f32],
    qu_var: f32,
) -> anyhow::Result<SparseGpPosterior<SquaredExpPrior>> {
    let mm = qu_mean.len();
    let zz = Mat::from_fn(1, mm, |_, jj| jj as f32);
    SparseGpPosterior::new(
        test_prior(),
        zz,
        VariationalApprox::Centered {
            mean: DVec::from_column_slice(qu_mean),
            cov: Mat::identity(mm, mm) * qu_var,
        },
    )
}

/// With a near-degenerate q(u) the drawn u collapses onto its mean, so
/// the corrected sample must pass through that mean at the inducing
/// locations: the pathwise correction pins f(z) to u.
#[test]
fn sample_is_consistent_at_inducing_points() -> anyhow::Result<()> {
    let qu_mean = [0.8, -0.4, 0.6];
    let posterior = centered_posterior(&qu_mean, 1e-8)?;

    let mut rng = StdRng::seed_from_u64(17);
    let sample = draw_posterior_sample(&mut rng, &posterior, &build_basis(1))?;

    let at_z = sample.at(posterior.inducing());
    for (value, expected) in at_z.iter().zip(qu_mean.iter()) {
        assert_abs_diff_eq!(*value, *expected, epsilon = 1e-2);
    }
    Ok(())
}

/// The correction vector solves `K_zz v = u - path(z)` exactly, so
/// re-multiplying must recover the residual the sampler computed.
#[test]
fn correction_solves_the_defining_system() -> anyhow::Result<()> {
    let posterior = centered_posterior(&[0.3, -0.2, 0.5, 0.1], 0.05)?;
    let zz = posterior.inducing();

    let mut rng = StdRng::seed_from_u64(23);
    let sample = draw_posterior_sample(&mut rng, &posterior, &build_basis(2))?;

    let kzz = posterior.prior().self_covariance(zz);
    let residual = &kzz * sample.correction();
    let observed = sample.at(zz) - sample.prior_path().at(zz);

    assert_abs_diff_eq!((residual - observed).norm(), 0.0, epsilon = 1e-4);
    Ok(())
}

#[test]
fn batch_of_one_matches_single_draw() -> anyhow::Result<()> {
    let posterior = centered_posterior(&[0.2, 0.0, -0.3], 0.04)?;
    let build = build_basis(7);

    let mut rng_single = StdRng::seed_from_u64(99);
    let single = draw_posterior_sample(&mut rng_single, &posterior, &build)?;

    let mut rng_batch = StdRng::seed_from_u64(99);
    let batch = draw_posterior_samples(&mut rng_batch, &posterior, &build, 1)?;

    let xx = Mat::from_row_slice(1, 5, &[-0.5, 0.0, 0.8, 1.5, 2.5]);
    let from_single = single.at(&xx);
    let from_batch = batch[0].at(&xx);
    assert_abs_diff_eq!((from_single - from_batch).norm(), 0.0, epsilon = 1e-6);
    Ok(())
}

#[test]
fn batch_samples_are_independent_closures() -> anyhow::Result<()> {
    let posterior = centered_posterior(&[0.0, 0.5, -0.5], 0.25)?;

    let mut rng = StdRng::seed_from_u64(31);
    let samples = draw_posterior_samples(&mut rng, &posterior, &build_basis(3), 4)?;
    assert_eq!(samples.len(), 4);

    let xx = Mat::from_row_slice(1, 3, &[0.25, 1.25, 2.25]);
    let first_before = samples[0].at(&xx);
    // evaluating the others must not perturb the first
    for sample in &samples[1..] {
        let _ = sample.at(&xx);
    }
    assert_eq!(samples[0].at(&xx), first_before);

    // draws differ across the batch
    assert!((samples[0].at(&xx) - samples[1].at(&xx)).norm() > 1e-6);
    Ok(())
}

#[test]
fn zero_samples_is_invalid() -> anyhow::Result<()> {
    let posterior = centered_posterior(&[0.0, 0.0], 0.01)?;
    let mut rng = StdRng::seed_from_u64(1);
    let err = draw_posterior_samples(&mut rng, &posterior, &build_basis(1), 0).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<GpError>(),
        Some(GpError::InvalidArgument(_))
    ));
    Ok(())
}

#[test]
fn non_psd_inducing_covariance_fails_numerically() -> anyhow::Result<()> {
    let zz = Mat::from_row_slice(1, 2, &[0.0, 1.0]);
    let posterior = SparseGpPosterior::new(
        test_prior(),
        zz,
        VariationalApprox::Centered {
            mean: DVec::zeros(2),
            cov: Mat::from_row_slice(2, 2, &[1.0, 3.0, 3.0, 1.0]),
        },
    )?;

    let mut rng = StdRng::seed_from_u64(1);
    let err = draw_posterior_sample(&mut rng, &posterior, &build_basis(1)).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<GpError>(),
        Some(GpError::Numerical { .. })
    ));
    Ok(())
}

/// End-to-end: values at z follow q(u). With q(u) = N(0, 0.01 I) the
/// per-point draws should stay within 3 marginal standard deviations
/// in aggregate over 1000 repetitions.
#[test]
fn end_to_end_marginals_follow_the_approximation() -> anyhow::Result<()> {
    let posterior = centered_posterior(&[0.0, 0.0, 0.0], 0.01)?;
    let zz = posterior.inducing();
    let marginal_sd = 0.1_f32;

    let mut rng = StdRng::seed_from_u64(2024);
    let nn = 1000;
    let samples = draw_posterior_samples(&mut rng, &posterior, &build_basis(9), nn)?;

    let mut values = Mat::zeros(3, nn);
    for (mut col, sample) in values.column_iter_mut().zip(samples.iter()) {
        col.copy_from(&sample.at(zz));
    }

    for ii in 0..3 {
        let row = values.row(ii);
        let emp_mean = row.sum() / nn as f32;
        let emp_var =
            row.iter().map(|v| (*v - emp_mean) * (*v - emp_mean)).sum::<f32>() / (nn - 1) as f32;

        // mean of N(0, sd^2) over nn draws has sd / sqrt(nn) spread
        assert!(emp_mean.abs() < 0.02);
        assert!(emp_var.sqrt() > 0.5 * marginal_sd && emp_var.sqrt() < 2.0 * marginal_sd);

        let outliers = row.iter().filter(|v| v.abs() > 3.0 * marginal_sd).count();
        assert!(outliers < nn / 50);
    }
    Ok(())
}
