use gp_model::common::{DVec, Mat};
use gp_model::posterior::{SparseGpPosterior, VariationalApprox};
use gp_model::simulate::{FourierBasisPrior, SquaredExpPrior};
use gp_model::traits::SamplePath;
use gp_pathwise::pathwise::draw_posterior_samples;

use rand::rngs::StdRng;
use rand::SeedableRng;

/// End-to-end demonstration: a squared-exponential prior, a centered
/// variational posterior over three inducing points, and a batch of
/// pathwise posterior draws summarized at the inducing locations.
fn main() -> anyhow::Result<()> {
    env_logger::init();

    let prior = SquaredExpPrior {
        mean_value: 0.0,
        variance: 1.0,
        length_scale: 1.0,
    };

    let inducing = Mat::from_row_slice(1, 3, &[0.0, 1.0, 2.0]);
    let approx = VariationalApprox::Centered {
        mean: DVec::from_column_slice(&[0.5, -0.25, 0.75]),
        cov: Mat::identity(3, 3) * 0.01,
    };
    let posterior = SparseGpPosterior::new(prior, inducing, approx)?;

    let mut rng = StdRng::seed_from_u64(42);
    let build = |p: &SquaredExpPrior| FourierBasisPrior::build(p, 1, 512, &mut StdRng::seed_from_u64(1));

    let num_samples = 200;
    let samples = draw_posterior_samples(&mut rng, &posterior, &build, num_samples)?;

    let grid = Mat::from_fn(1, 21, |_, j| 0.1 * j as f32);
    let mut mean = DVec::zeros(grid.ncols());
    for sample in &samples {
        mean += sample.at(&grid);
    }
    mean /= num_samples as f32;

    log::info!("posterior mean over {} draws:", num_samples);
    for (j, value) in mean.iter().enumerate() {
        log::info!("  f({:.1}) ~ {:+.4}", 0.1 * j as f32, value);
    }

    Ok(())
}
