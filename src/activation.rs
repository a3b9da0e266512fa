//! Activation functions.
//!
//! Hidden units (and the binary output unit) use the logistic sigmoid. The
//! 4-class head uses softmax over its logits. As in backprop for any sigmoid
//! layer, the derivative is expressed through the cached *output* `y`, so the
//! pre-activation never has to be stored.

/// Pre-activations are clamped to this magnitude before exponentiating.
pub const Z_CLAMP: f64 = 500.0;

/// Logistic sigmoid `1 / (1 + e^-z)` with `z` clamped to `[-500, 500]`.
///
/// Very confident inputs saturate instead of overflowing `exp`.
#[inline]
pub fn sigmoid(z: f64) -> f64 {
    let z = z.clamp(-Z_CLAMP, Z_CLAMP);
    1.0 / (1.0 + (-z).exp())
}

/// Derivative of the sigmoid in terms of its output: `y * (1 - y)`.
#[inline]
pub fn sigmoid_grad_from_output(y: f64) -> f64 {
    y * (1.0 - y)
}

/// Softmax of `logits` written into `out`.
///
/// The maximum logit is subtracted before exponentiating.
///
/// Shape contract: `logits.len() == out.len()` and non-empty.
#[inline]
pub fn softmax_into(logits: &[f64], out: &mut [f64]) {
    debug_assert_eq!(logits.len(), out.len());
    debug_assert!(!logits.is_empty());

    let max_logit = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mut sum_exp = 0.0;
    for (o, &l) in out.iter_mut().zip(logits) {
        *o = (l - max_logit).exp();
        sum_exp += *o;
    }
    for o in out.iter_mut() {
        *o /= sum_exp;
    }
}

/// Class of a binary probability: 1 when `p >= 0.5`, so exactly 0.5 maps to 1.
#[inline]
pub fn threshold(p: f64) -> usize {
    usize::from(p >= 0.5)
}

/// Index of the largest value. The first index wins ties.
///
/// Returns 0 for an empty slice.
#[inline]
pub fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > values[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sigmoid_basic_values() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!(sigmoid(10.0) > 0.9999);
        assert!(sigmoid(-10.0) < 0.0001);
    }

    #[test]
    fn sigmoid_saturates_instead_of_overflowing() {
        let hi = sigmoid(1e6);
        let lo = sigmoid(-1e6);
        assert!(hi.is_finite() && lo.is_finite());
        assert_eq!(hi, sigmoid(Z_CLAMP));
        assert_eq!(lo, sigmoid(-Z_CLAMP));
        assert!(lo > 0.0);
        assert!(hi <= 1.0);
    }

    #[test]
    fn sigmoid_gradient_peaks_at_half() {
        assert_eq!(sigmoid_grad_from_output(0.5), 0.25);
        assert_eq!(sigmoid_grad_from_output(1.0), 0.0);
    }

    #[test]
    fn softmax_sums_to_one_and_handles_large_logits() {
        let logits = [1000.0, 1001.0, 999.0, -50.0];
        let mut out = [0.0; 4];
        softmax_into(&logits, &mut out);
        let sum: f64 = out.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
        assert!(out.iter().all(|p| (0.0..=1.0).contains(p)));
        assert_eq!(argmax(&out), 1);
    }

    #[test]
    fn threshold_resolves_one_half_to_class_one() {
        assert_eq!(threshold(0.5), 1);
        assert_eq!(threshold(0.4999), 0);
        assert_eq!(threshold(sigmoid(0.0)), 1);
    }

    #[test]
    fn argmax_prefers_lowest_index_on_ties() {
        assert_eq!(argmax(&[0.25, 0.25, 0.25, 0.25]), 0);
        assert_eq!(argmax(&[0.1, 0.4, 0.4, 0.1]), 1);
        assert_eq!(argmax(&[]), 0);
    }
}
