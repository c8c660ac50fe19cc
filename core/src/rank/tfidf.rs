//! Log-scaled tf, idf and L2 normalization.

/// `1 + log10(tf)`, or `0` for an absent term.
pub fn tf_weight(tf: u32) -> f32 {
    if tf == 0 {
        0.0
    } else {
        1.0 + (tf as f32).log10()
    }
}

/// `log10(n / df)`, or `0` for a term no document contains.
pub fn idf_weight(n: u32, df: u32) -> f32 {
    if df == 0 {
        0.0
    } else {
        (n as f32 / df as f32).log10()
    }
}

/// Scale to unit length. A zero vector comes back unchanged.
pub fn normalize(mut values: Vec<f32>) -> Vec<f32> {
    let norm = values.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        for v in values.iter_mut() {
            *v /= norm;
        }
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tf() {
        assert_eq!(tf_weight(0), 0.0);
        assert_eq!(tf_weight(1), 1.0);
        assert!((tf_weight(10) - 2.0).abs() < 1e-6);
    }

    #[test]
    fn idf() {
        assert_eq!(idf_weight(10, 0), 0.0);
        assert_eq!(idf_weight(10, 10), 0.0);
        assert!((idf_weight(100, 10) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn normalize_unit_length() {
        let v = normalize(vec![3.0, 4.0]);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);
        assert_eq!(normalize(vec![0.0, 0.0, 0.0]), vec![0.0, 0.0, 0.0]);
        assert!(normalize(Vec::new()).is_empty());
    }
}
