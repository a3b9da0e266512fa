use rand::Rng;
use rand::distributions::{Distribution, Uniform};

use crate::{Error, Result};

/// Uniform weight/bias initialization ranges: `[-weight, weight]` and `[-bias, bias]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Init {
    pub weight: f64,
    pub bias: f64,
}

impl Init {
    /// Both half-widths must be non-negative and small enough that the full
    /// range `2 * w` stays finite.
    pub fn validate(&self) -> Result<()> {
        for (name, v) in [("weight", self.weight), ("bias", self.bias)] {
            if !(0.0..=f64::MAX / 4.0).contains(&v) {
                return Err(Error::InvalidConfig(format!(
                    "init {name} range must be finite and >= 0, got {v}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for Init {
    fn default() -> Self {
        Self {
            weight: 0.1,
            bias: 0.05,
        }
    }
}

/// `w * x` clamped to the finite range.
///
/// Two opposite overflows would otherwise sum to `inf - inf = NaN`.
#[inline]
pub(crate) fn saturating_term(w: f64, x: f64) -> f64 {
    (w * x).clamp(-f64::MAX, f64::MAX)
}

/// Fully connected layer without an activation.
///
/// Weights use the `(in_dim, out_dim)` layout: `weight(i, j)` connects input `i`
/// to unit `j`, matching `weights1[i][j]` / `weights2[j][k]` in the parameter
/// snapshots.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    in_dim: usize,
    out_dim: usize,
    /// Row-major matrix with shape (in_dim, out_dim).
    weights: Vec<f64>,
    biases: Vec<f64>,
}

impl Layer {
    pub fn new_with_rng<R: Rng + ?Sized>(
        in_dim: usize,
        out_dim: usize,
        init: Init,
        rng: &mut R,
    ) -> Result<Self> {
        if in_dim == 0 || out_dim == 0 {
            return Err(Error::InvalidConfig(format!(
                "layer dims must be > 0, got in_dim={in_dim} out_dim={out_dim}"
            )));
        }
        init.validate()?;
        let mut layer = Self {
            in_dim,
            out_dim,
            weights: vec![0.0; in_dim * out_dim],
            biases: vec![0.0; out_dim],
        };
        layer.randomize(init, rng);
        Ok(layer)
    }

    /// Build a layer from a `(in_dim, out_dim)` weight matrix and biases.
    pub fn from_matrix(weights: &[Vec<f64>], biases: &[f64]) -> Result<Self> {
        let in_dim = weights.len();
        let out_dim = biases.len();
        if in_dim == 0 || out_dim == 0 {
            return Err(Error::InvalidShape(format!(
                "layer dims must be > 0, got in_dim={in_dim} out_dim={out_dim}"
            )));
        }

        let mut flat = Vec::with_capacity(in_dim * out_dim);
        for (i, row) in weights.iter().enumerate() {
            if row.len() != out_dim {
                return Err(Error::InvalidShape(format!(
                    "weight row {i} has len {}, expected {out_dim}",
                    row.len()
                )));
            }
            flat.extend_from_slice(row);
        }

        if flat.iter().chain(biases).any(|v| !v.is_finite()) {
            return Err(Error::InvalidData(
                "layer parameters must be finite".to_owned(),
            ));
        }

        Ok(Self {
            in_dim,
            out_dim,
            weights: flat,
            biases: biases.to_vec(),
        })
    }

    /// Redraw all parameters from a validated `init`.
    ///
    /// Weights are drawn before biases, input row by input row.
    pub(crate) fn randomize<R: Rng + ?Sized>(&mut self, init: Init, rng: &mut R) {
        let w = Uniform::new_inclusive(-init.weight, init.weight);
        let b = Uniform::new_inclusive(-init.bias, init.bias);
        for v in &mut self.weights {
            *v = w.sample(rng);
        }
        for v in &mut self.biases {
            *v = b.sample(rng);
        }
    }

    #[inline]
    pub fn in_dim(&self) -> usize {
        self.in_dim
    }

    #[inline]
    pub fn out_dim(&self) -> usize {
        self.out_dim
    }

    #[inline]
    pub fn weight(&self, i: usize, j: usize) -> f64 {
        self.weights[i * self.out_dim + j]
    }

    #[inline]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    #[inline]
    pub fn biases(&self) -> &[f64] {
        &self.biases
    }

    /// Deep copy of the weights as a `(in_dim, out_dim)` nested matrix.
    pub fn weight_matrix(&self) -> Vec<Vec<f64>> {
        self.weights
            .chunks_exact(self.out_dim)
            .map(<[f64]>::to_vec)
            .collect()
    }

    /// Pre-activations for a single sample: `z[j] = b[j] + sum_i x[i] * w[i][j]`.
    ///
    /// Terms and sums saturate at `±f64::MAX`, so finite inputs always give
    /// finite pre-activations.
    ///
    /// Shape contract:
    /// - `inputs.len() == self.in_dim`
    /// - `outputs.len() == self.out_dim`
    #[inline]
    pub fn forward(&self, inputs: &[f64], outputs: &mut [f64]) {
        debug_assert_eq!(inputs.len(), self.in_dim);
        debug_assert_eq!(outputs.len(), self.out_dim);

        for (j, out) in outputs.iter_mut().enumerate() {
            let mut sum = self.biases[j];
            for (i, &x) in inputs.iter().enumerate() {
                sum += saturating_term(self.weights[i * self.out_dim + j], x);
            }
            *out = sum.clamp(-f64::MAX, f64::MAX);
        }
    }

    /// Propagate unit errors back to the inputs: `d_inputs[i] = sum_j d_outputs[j] * w[i][j]`.
    ///
    /// Reads the current weights, so call this before [`Layer::sgd_step`] when the
    /// caller needs the pre-update gradient.
    ///
    /// Shape contract:
    /// - `d_outputs.len() == self.out_dim`
    /// - `d_inputs.len() == self.in_dim`
    #[inline]
    pub fn backward(&self, d_outputs: &[f64], d_inputs: &mut [f64]) {
        debug_assert_eq!(d_outputs.len(), self.out_dim);
        debug_assert_eq!(d_inputs.len(), self.in_dim);

        for (i, d_in) in d_inputs.iter_mut().enumerate() {
            let row = i * self.out_dim;
            let mut sum = 0.0;
            for (j, &d) in d_outputs.iter().enumerate() {
                sum += d * self.weights[row + j];
            }
            *d_in = sum;
        }
    }

    /// Online gradient step for one sample:
    /// `w[i][j] -= lr * d[j] * x[i]`, `b[j] -= lr * d[j]`.
    ///
    /// Shape contract:
    /// - `inputs.len() == self.in_dim`
    /// - `deltas.len() == self.out_dim`
    #[inline]
    pub fn sgd_step(&mut self, inputs: &[f64], deltas: &[f64], lr: f64) {
        debug_assert_eq!(inputs.len(), self.in_dim);
        debug_assert_eq!(deltas.len(), self.out_dim);

        for (i, &x) in inputs.iter().enumerate() {
            let row = i * self.out_dim;
            for (j, &d) in deltas.iter().enumerate() {
                self.weights[row + j] -= lr * d * x;
            }
        }
        for (b, &d) in self.biases.iter_mut().zip(deltas) {
            *b -= lr * d;
        }
    }

    /// Euclidean norm of all weights (biases excluded).
    pub fn weight_norm(&self) -> f64 {
        self.weights.iter().map(|w| w * w).sum::<f64>().sqrt()
    }
}
