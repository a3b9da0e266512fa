//! Loss functions.
//!
//! Both losses work on probabilities (post-sigmoid / post-softmax outputs) and
//! add [`EPSILON`] inside the logarithm so a fully saturated wrong prediction
//! yields a large finite loss instead of `inf`.
//!
//! Typical per-sample flow inside a training step:
//!
//! - forward pass to probabilities
//! - loss value via [`binary_cross_entropy`] / [`cross_entropy`]
//! - output error via [`binary_output_error`] / [`softmax_output_error`]
//! - backprop the output error and update parameters

/// Added to probabilities before taking `ln` to avoid `ln(0)`.
pub const EPSILON: f64 = 1e-15;

/// Binary cross-entropy for a single probability `p` of class 1.
///
/// `-[y ln(p + eps) + (1 - y) ln(1 - p + eps)]`
#[inline]
pub fn binary_cross_entropy(p: f64, label: usize) -> f64 {
    let y = label as f64;
    -(y * (p + EPSILON).ln() + (1.0 - y) * (1.0 - p + EPSILON).ln())
}

/// Gradient of binary cross-entropy w.r.t. the output pre-activation of a
/// sigmoid unit: `p - y`.
#[inline]
pub fn binary_output_error(p: f64, label: usize) -> f64 {
    p - label as f64
}

/// Categorical cross-entropy: `-ln(probs[label] + eps)`.
///
/// Shape contract: `label < probs.len()`.
#[inline]
pub fn cross_entropy(probs: &[f64], label: usize) -> f64 {
    -(probs[label] + EPSILON).ln()
}

/// Combined softmax + cross-entropy gradient w.r.t. the logits.
///
/// Writes `d_logits[k] = probs[k] - 1{k == label}` and returns the loss.
///
/// Shape contract:
/// - `probs.len() == d_logits.len()`
/// - `label < probs.len()`
#[inline]
pub fn softmax_output_error(probs: &[f64], label: usize, d_logits: &mut [f64]) -> f64 {
    debug_assert_eq!(probs.len(), d_logits.len());
    d_logits.copy_from_slice(probs);
    d_logits[label] -= 1.0;
    cross_entropy(probs, label)
}
