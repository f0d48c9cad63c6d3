//! Training loss.
//!
//! The update rule never evaluates the loss: `LogisticRegression::train` uses the
//! softmax/cross-entropy shortcut `y - t` directly. The value is only computed to
//! report progress.

/// Categorical cross-entropy of a probability vector against a one-hot label.
///
/// Returns `-ln(p_true)`, with `p_true` clamped away from zero so a confident
/// wrong prediction gives a large finite loss instead of `inf`.
///
/// Shape contract: `probs.len() == label.len()`.
#[inline]
pub fn cross_entropy(probs: &[f64], label: &[u8]) -> f64 {
    assert_eq!(
        probs.len(),
        label.len(),
        "probs len {} does not match label len {}",
        probs.len(),
        label.len()
    );

    let mut loss = 0.0_f64;
    for (&p, &t) in probs.iter().zip(label) {
        if t != 0 {
            loss -= f64::from(t) * p.max(f64::MIN_POSITIVE).ln();
        }
    }
    loss
}
