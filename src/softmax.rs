//! Softmax and one-hot helpers for the output layer.

/// Numerically stable softmax.
///
/// Writes `out[i] = exp(x[i] - max(x)) / sum_j exp(x[j] - max(x))`.
///
/// Subtracting the max bounds every exponent to `<= 0`, so large logits cannot
/// overflow; the result is unchanged because softmax is shift-invariant.
///
/// Shape contract: `logits.len() == out.len()` and `logits` is non-empty.
#[inline]
pub fn softmax_into(logits: &[f64], out: &mut [f64]) {
    assert_eq!(
        logits.len(),
        out.len(),
        "logits len {} does not match out len {}",
        logits.len(),
        out.len()
    );
    assert!(!logits.is_empty(), "softmax requires at least 1 class");

    let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let mut sum = 0.0_f64;
    for (o, &x) in out.iter_mut().zip(logits) {
        *o = (x - max).exp();
        sum += *o;
    }
    for o in out.iter_mut() {
        *o /= sum;
    }
}

/// Allocating convenience wrapper around [`softmax_into`].
pub fn softmax(logits: &[f64]) -> Vec<f64> {
    let mut out = vec![0.0; logits.len()];
    softmax_into(logits, &mut out);
    out
}

/// Index of the largest value. Ties go to the first occurrence.
///
/// Panics if `values` is empty.
#[inline]
pub fn argmax(values: &[f64]) -> usize {
    assert!(!values.is_empty(), "argmax of an empty slice");
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > values[best] {
            best = i;
        }
    }
    best
}

/// One-hot vector of length `dim` with the `index`-th entry set.
pub fn one_hot(index: usize, dim: usize) -> Vec<u8> {
    assert!(index < dim, "one-hot index {index} out of range for dim {dim}");
    let mut label = vec![0; dim];
    label[index] = 1;
    label
}

/// Position of the `1` in a one-hot label, or `None` if `label` is not one-hot.
pub fn class_index(label: &[u8]) -> Option<usize> {
    let mut found = None;
    for (i, &v) in label.iter().enumerate() {
        match v {
            0 => {}
            1 if found.is_none() => found = Some(i),
            _ => return None,
        }
    }
    found
}
