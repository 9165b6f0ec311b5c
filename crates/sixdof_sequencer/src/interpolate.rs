// SPDX-License-Identifier: MIT OR Apache-2.0
//! One-dimensional linear interpolation with extrapolation.

use crate::error::{AnimationError, Result};

/// Piecewise-linear function through (x, y) samples.
///
/// Queries before the first or after the last sample extend the outermost
/// segment. Samples with equal x keep the later y. A single distinct sample
/// gives a constant.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearInterpolant {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl LinearInterpolant {
    /// Build from non-decreasing `xs` and matching `ys`
    pub fn new(xs: &[f64], ys: &[f64]) -> Result<Self> {
        if xs.len() != ys.len() {
            return Err(AnimationError::invalid(format!(
                "interpolation needs matching lengths, got {} x and {} y",
                xs.len(),
                ys.len()
            )));
        }
        if xs.is_empty() {
            return Err(AnimationError::invalid("interpolation needs at least one sample"));
        }
        if xs.iter().chain(ys).any(|v| !v.is_finite()) {
            return Err(AnimationError::invalid("interpolation samples must be finite"));
        }
        if xs.windows(2).any(|w| w[1] < w[0]) {
            return Err(AnimationError::invalid("interpolation x values must not decrease"));
        }

        let mut unique_xs: Vec<f64> = Vec::with_capacity(xs.len());
        let mut unique_ys: Vec<f64> = Vec::with_capacity(ys.len());
        for (x, y) in xs.iter().zip(ys) {
            if unique_xs.last() == Some(x) {
                if let Some(last) = unique_ys.last_mut() {
                    *last = *y;
                }
            } else {
                unique_xs.push(*x);
                unique_ys.push(*y);
            }
        }

        Ok(Self {
            xs: unique_xs,
            ys: unique_ys,
        })
    }

    /// Number of distinct samples
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    /// Whether there are no samples (never true for a built interpolant)
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// Evaluate at `x`
    pub fn evaluate(&self, x: f64) -> f64 {
        let n = self.xs.len();
        if n == 1 {
            return self.ys[0];
        }

        // Segment [i - 1, i], clamped to the outermost segments
        let i = self.xs.partition_point(|v| *v < x).clamp(1, n - 1);
        let (x0, x1) = (self.xs[i - 1], self.xs[i]);
        let (y0, y1) = (self.ys[i - 1], self.ys[i]);
        if x == x1 {
            return y1;
        }
        y0 + (y1 - y0) * (x - x0) / (x1 - x0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_exact_at_nodes() {
        let xs = [1.0, 24.0, 48.0, 72.0];
        let ys = [0.3, -7.1, 12.25, 1e6];
        let f = LinearInterpolant::new(&xs, &ys).unwrap();
        for (x, y) in xs.iter().zip(&ys) {
            assert_eq!(f.evaluate(*x), *y);
        }
    }

    #[test]
    fn test_interpolates_between_nodes() {
        let f = LinearInterpolant::new(&[0.0, 10.0], &[0.0, 5.0]).unwrap();
        assert_relative_eq!(f.evaluate(4.0), 2.0);
    }

    #[test]
    fn test_extrapolates_both_ends() {
        let f = LinearInterpolant::new(&[1.0, 2.0, 3.0], &[10.0, 20.0, 40.0]).unwrap();
        assert_relative_eq!(f.evaluate(0.0), 0.0);
        assert_relative_eq!(f.evaluate(4.0), 60.0);
    }

    #[test]
    fn test_duplicate_x_keeps_later_value() {
        let f = LinearInterpolant::new(&[1.0, 1.0, 3.0], &[5.0, 7.0, 9.0]).unwrap();
        assert_eq!(f.len(), 2);
        assert_eq!(f.evaluate(1.0), 7.0);
        assert_relative_eq!(f.evaluate(2.0), 8.0);
    }

    #[test]
    fn test_single_sample_is_constant() {
        let f = LinearInterpolant::new(&[1.0, 1.0], &[2.0, 3.0]).unwrap();
        assert_eq!(f.evaluate(-100.0), 3.0);
        assert_eq!(f.evaluate(100.0), 3.0);
    }

    #[test]
    fn test_rejects_bad_samples() {
        assert!(LinearInterpolant::new(&[], &[]).is_err());
        assert!(LinearInterpolant::new(&[1.0, 2.0], &[1.0]).is_err());
        assert!(LinearInterpolant::new(&[2.0, 1.0], &[1.0, 2.0]).is_err());
        assert!(LinearInterpolant::new(&[1.0, 2.0], &[1.0, f64::NAN]).is_err());
    }
}
