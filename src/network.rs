//! The `2 -> H (sigmoid) -> K` network shared by the MLP classifiers.
//!
//! The output layer produces raw logits. Each classifier decides how to turn
//! them into probabilities (sigmoid for `K = 1`, softmax for `K = 4`) and writes
//! the output error into [`Scratch::d_logits`] before calling
//! [`TwoLayerNet::backprop_step`].

use rand::Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::activation::{sigmoid, sigmoid_grad_from_output};
use crate::layer::{Init, Layer};
use crate::metrics::WeightMagnitudes;
use crate::{Error, INPUT_DIM, Result};

/// Deep copy of an MLP's parameters.
///
/// `weights1[i][j]` connects input `i` to hidden unit `j`; `weights2[j][k]`
/// connects hidden unit `j` to output `k`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct MlpParameters {
    pub weights1: Vec<Vec<f64>>,
    pub bias1: Vec<f64>,
    pub weights2: Vec<Vec<f64>>,
    pub bias2: Vec<f64>,
}

impl MlpParameters {
    /// Hidden width implied by `bias1`.
    #[inline]
    pub fn hidden_size(&self) -> usize {
        self.bias1.len()
    }
}

/// Reusable per-sample buffers.
#[derive(Debug, Clone)]
pub(crate) struct Scratch {
    pub(crate) hidden: Vec<f64>,
    pub(crate) logits: Vec<f64>,
    pub(crate) d_logits: Vec<f64>,
    d_hidden: Vec<f64>,
}

impl Scratch {
    pub(crate) fn new(hidden_size: usize, output_size: usize) -> Self {
        Self {
            hidden: vec![0.0; hidden_size],
            logits: vec![0.0; output_size],
            d_logits: vec![0.0; output_size],
            d_hidden: vec![0.0; hidden_size],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TwoLayerNet {
    hidden: Layer,
    output: Layer,
}

impl TwoLayerNet {
    pub(crate) fn new_with_rng<R: Rng + ?Sized>(
        hidden_size: usize,
        output_size: usize,
        rng: &mut R,
    ) -> Result<Self> {
        if hidden_size == 0 {
            return Err(Error::InvalidConfig("hidden_size must be > 0".to_owned()));
        }
        let init = Init::default();
        let hidden = Layer::new_with_rng(INPUT_DIM, hidden_size, init, rng)?;
        let output = Layer::new_with_rng(hidden_size, output_size, init, rng)?;
        Ok(Self { hidden, output })
    }

    /// Rebuild from a parameter copy, checking it against `output_size`.
    pub(crate) fn from_parameters(params: &MlpParameters, output_size: usize) -> Result<Self> {
        let h = params.hidden_size();
        if h == 0 {
            return Err(Error::InvalidShape("bias1 must not be empty".to_owned()));
        }
        if params.weights1.len() != INPUT_DIM {
            return Err(Error::InvalidShape(format!(
                "weights1 has {} rows, expected {INPUT_DIM}",
                params.weights1.len()
            )));
        }
        if params.weights2.len() != h {
            return Err(Error::InvalidShape(format!(
                "weights2 has {} rows, expected hidden size {h}",
                params.weights2.len()
            )));
        }
        if params.bias2.len() != output_size {
            return Err(Error::InvalidShape(format!(
                "bias2 has len {}, expected {output_size}",
                params.bias2.len()
            )));
        }

        let hidden = Layer::from_matrix(&params.weights1, &params.bias1)?;
        let output = Layer::from_matrix(&params.weights2, &params.bias2)?;
        Ok(Self { hidden, output })
    }

    /// Redraw every parameter: hidden layer first, then output layer.
    pub(crate) fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let init = Init::default();
        self.hidden.randomize(init, rng);
        self.output.randomize(init, rng);
    }

    #[inline]
    pub(crate) fn hidden_size(&self) -> usize {
        self.hidden.out_dim()
    }

    #[inline]
    pub(crate) fn output_size(&self) -> usize {
        self.output.out_dim()
    }

    pub(crate) fn scratch(&self) -> Scratch {
        Scratch::new(self.hidden_size(), self.output_size())
    }

    /// Hidden activations and output logits for `x`.
    ///
    /// Shape contract:
    /// - `hidden.len() == self.hidden_size()`
    /// - `logits.len() == self.output_size()`
    #[inline]
    pub(crate) fn forward(&self, x: &[f64], hidden: &mut [f64], logits: &mut [f64]) {
        self.hidden.forward(x, hidden);
        for h in hidden.iter_mut() {
            *h = sigmoid(*h);
        }
        self.output.forward(hidden, logits);
    }

    /// One online update for the sample `x`.
    ///
    /// Expects `scratch` to hold the forward pass for `x` and the output error in
    /// `scratch.d_logits`. Hidden errors are computed from the output weights
    /// before either layer changes; then the output layer is updated, then the
    /// hidden layer.
    pub(crate) fn backprop_step(&mut self, x: &[f64], scratch: &mut Scratch, lr: f64) {
        let Scratch {
            hidden,
            d_logits,
            d_hidden,
            ..
        } = scratch;

        self.output.backward(d_logits, d_hidden);
        for (d, &h) in d_hidden.iter_mut().zip(hidden.iter()) {
            *d *= sigmoid_grad_from_output(h);
        }

        self.output.sgd_step(hidden, d_logits, lr);
        self.hidden.sgd_step(x, d_hidden, lr);
    }

    pub(crate) fn parameters(&self) -> MlpParameters {
        MlpParameters {
            weights1: self.hidden.weight_matrix(),
            bias1: self.hidden.biases().to_vec(),
            weights2: self.output.weight_matrix(),
            bias2: self.output.biases().to_vec(),
        }
    }

    pub(crate) fn weight_magnitudes(&self) -> WeightMagnitudes {
        WeightMagnitudes {
            hidden: self.hidden.weight_norm(),
            output: self.output.weight_norm(),
        }
    }
}
