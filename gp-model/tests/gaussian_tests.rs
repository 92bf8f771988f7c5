use approx::assert_abs_diff_eq;
use gp_model::common::{DVec, Mat};
use gp_model::errors::GpError;
use gp_model::gaussian::MultivariateNormal;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn sample_moments_match_parameters() -> anyhow::Result<()> {
    let mean = DVec::from_column_slice(&[1.0, -1.0]);
    let cov = Mat::from_row_slice(2, 2, &[2.0, 0.5, 0.5, 1.0]);
    let mvn = MultivariateNormal::new(mean.clone(), cov.clone())?;

    let nn = 4000;
    let mut rng = StdRng::seed_from_u64(11);
    let ss = mvn.sample_n(&mut rng, nn)?;

    assert_eq!(ss.nrows(), 2);
    assert_eq!(ss.ncols(), nn);

    let mut emp_mean = DVec::zeros(2);
    for s_j in ss.column_iter() {
        emp_mean += s_j;
    }
    emp_mean /= nn as f32;
    assert_abs_diff_eq!(emp_mean[0], mean[0], epsilon = 0.1);
    assert_abs_diff_eq!(emp_mean[1], mean[1], epsilon = 0.1);

    let mut emp_cov = Mat::zeros(2, 2);
    for s_j in ss.column_iter() {
        let dd = s_j - &emp_mean;
        emp_cov += &dd * dd.transpose();
    }
    emp_cov /= (nn - 1) as f32;
    for ii in 0..2 {
        for jj in 0..2 {
            assert_abs_diff_eq!(emp_cov[(ii, jj)], cov[(ii, jj)], epsilon = 0.15);
        }
    }
    Ok(())
}

#[test]
fn single_draw_matches_batch_of_one() -> anyhow::Result<()> {
    let mean = DVec::from_column_slice(&[0.5, -0.5, 1.5]);
    let cov = Mat::identity(3, 3) * 0.25;
    let mvn = MultivariateNormal::new(mean, cov)?;

    let mut rng_a = StdRng::seed_from_u64(3);
    let mut rng_b = StdRng::seed_from_u64(3);

    let single = mvn.sample(&mut rng_a)?;
    let batch = mvn.sample_n(&mut rng_b, 1)?;
    assert_eq!(single, batch.column(0).into_owned());
    Ok(())
}

#[test]
fn zero_draws_is_invalid() -> anyhow::Result<()> {
    let mvn = MultivariateNormal::new(DVec::zeros(2), Mat::identity(2, 2))?;
    let mut rng = StdRng::seed_from_u64(0);
    let err = mvn.sample_n(&mut rng, 0).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<GpError>(),
        Some(GpError::InvalidArgument(_))
    ));
    Ok(())
}
