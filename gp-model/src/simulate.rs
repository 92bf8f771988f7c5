#![allow(dead_code)]

//! Simulation collaborators for tests and demos: a squared-exponential
//! prior process and a random Fourier feature stand-in for it. The
//! sampling core only sees these through the traits in `traits.rs`.

use crate::common::{DVec, Mat};
use crate::errors::GpError;
use crate::traits::{FiniteBasisPrior, PriorProcess, SamplePath};

use rand::Rng;
use rand_distr::StandardNormal;
use rayon::prelude::*;
use std::f32::consts::PI;
use std::sync::Arc;

/// Stationary squared-exponential prior:
///
/// ```text
/// k(x, x') = variance * exp(-|x - x'|^2 / (2 * length_scale^2))
/// ```
#[derive(Debug, Clone)]
pub struct SquaredExpPrior {
    pub mean_value: f32,
    pub variance: f32,
    pub length_scale: f32,
}

impl PriorProcess for SquaredExpPrior {
    fn mean(&self, inputs: &Mat) -> DVec {
        DVec::from_element(inputs.ncols(), self.mean_value)
    }

    fn covariance(&self, aa: &Mat, bb: &Mat) -> Mat {
        let na = aa.ncols();
        let nb = bb.ncols();
        let denom = 2.0 * self.length_scale * self.length_scale;

        // column-major fill, one entry per (i, j) pair
        let kk: Vec<f32> = (0..(na * nb))
            .into_par_iter()
            .map(|idx| {
                let ii = idx % na;
                let jj = idx / na;
                let diff = aa.column(ii) - bb.column(jj);
                self.variance * (-diff.norm_squared() / denom).exp()
            })
            .collect();

        Mat::from_vec(na, nb, kk)
    }
}

/// Shared spectral state of one Fourier basis: frequencies sampled
/// from the prior's spectral density, uniform phases, and the
/// `sqrt(2 variance / F)` feature scale.
#[derive(Debug)]
struct FourierFeatures {
    freqs: Mat,
    phases: DVec,
    scale: f32,
    mean_value: f32,
}

impl FourierFeatures {
    /// Feature matrix `phi(X)`: `F x n`
    fn phi(&self, inputs: &Mat) -> Mat {
        let mut proj = self.freqs.transpose() * inputs;
        for mut p_j in proj.column_iter_mut() {
            p_j += &self.phases;
        }
        proj.map(|v| v.cos()) * self.scale
    }
}

/// Random Fourier feature approximation of a squared-exponential
/// prior. One draw of the basis weights yields one sample path.
pub struct FourierBasisPrior {
    features: Arc<FourierFeatures>,
    num_features: usize,
}

impl FourierBasisPrior {
    /// * `prior`: the process being approximated
    /// * `input_dim`: dimensionality of the input space
    /// * `num_features`: number of Fourier features F
    pub fn build<R: Rng>(
        prior: &SquaredExpPrior,
        input_dim: usize,
        num_features: usize,
        rng: &mut R,
    ) -> anyhow::Result<Self> {
        if input_dim == 0 || num_features == 0 {
            return Err(GpError::InvalidArgument(
                "fourier basis needs input_dim > 0 and num_features > 0".to_string(),
            )
            .into());
        }

        // spectral density of the squared-exponential kernel is
        // N(0, 1/length_scale^2) per input dimension
        let omega = 1.0 / prior.length_scale;
        let freqs =
            Mat::from_fn(input_dim, num_features, |_, _| {
                let z: f32 = rng.sample(StandardNormal);
                z * omega
            });
        let phases = DVec::from_fn(num_features, |_, _| rng.random_range(0.0..(2.0 * PI)));
        let scale = (2.0 * prior.variance / num_features as f32).sqrt();

        log::debug!(
            "fourier basis: {} features over {}-dimensional inputs",
            num_features,
            input_dim
        );

        Ok(Self {
            features: Arc::new(FourierFeatures {
                freqs,
                phases,
                scale,
                mean_value: prior.mean_value,
            }),
            num_features,
        })
    }
}

impl FiniteBasisPrior for FourierBasisPrior {
    type Path = FourierPath;

    fn sample_path<R: Rng>(&self, rng: &mut R) -> FourierPath {
        let weights = DVec::from_fn(self.num_features, |_, _| rng.sample(StandardNormal));
        FourierPath {
            features: self.features.clone(),
            weights,
        }
    }

    /// Batched draw: one `F x nn` weight matrix, one path per column
    fn sample_paths<R: Rng>(&self, rng: &mut R, nn: usize) -> Vec<FourierPath> {
        let ww = Mat::from_fn(self.num_features, nn, |_, _| rng.sample(StandardNormal));
        ww.column_iter()
            .map(|w_j| FourierPath {
                features: self.features.clone(),
                weights: w_j.into_owned(),
            })
            .collect()
    }
}

/// One realized prior sample: fixed basis weights over the shared
/// spectral state.
#[derive(Debug)]
pub struct FourierPath {
    features: Arc<FourierFeatures>,
    weights: DVec,
}

impl SamplePath for FourierPath {
    fn at(&self, inputs: &Mat) -> DVec {
        let phi = self.features.phi(inputs);
        let mut out = phi.transpose() * &self.weights;
        out.add_scalar_mut(self.features.mean_value);
        out
    }
}
