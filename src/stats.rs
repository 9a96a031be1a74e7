use std::f64;

/// Geometric mean of positive values, computed in log space so that long
/// products do not underflow. Returns NaN for an empty slice.
pub fn geometric_mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return f64::NAN;
    }
    let s: f64 = xs.iter().map(|x| x.ln()).sum();
    (s / xs.len() as f64).exp()
}

/// Fraction of `k` in `n`; zero when `n` is zero.
pub fn fraction(k: usize, n: usize) -> f64 {
    if n == 0 {
        0.0
    } else {
        k as f64 / n as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1.0e-9;

    #[test]
    fn test_geometric_mean() {
        assert!((geometric_mean(&vec![0.5]) - 0.5).abs() < EPS);
        assert!((geometric_mean(&vec![1.0, 4.0]) - 2.0).abs() < EPS);
        assert!((geometric_mean(&vec![0.1, 0.1, 0.1]) - 0.1).abs() < EPS);
        assert!(geometric_mean(&vec![0.0, 1.0]) == 0.0);
        assert!(geometric_mean(&[]).is_nan());

        // 1000 factors of 0.01 would underflow as a plain product
        let xs = vec![0.01; 1000];
        assert!((geometric_mean(&xs) - 0.01).abs() < EPS);
    }

    #[test]
    fn test_fraction() {
        assert!((fraction(1, 4) - 0.25).abs() < EPS);
        assert!(fraction(3, 0) == 0.0);
    }
}
