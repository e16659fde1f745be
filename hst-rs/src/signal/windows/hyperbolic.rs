//! Hyperbolic Gaussian window weights.

use crate::kernel::Read1D;
use crate::signal::traits::WindowWeight;
use crate::{Error, Result};
use core::f64::consts::PI;
use serde::{Deserialize, Serialize};

/// Asymmetric Gaussian envelope with a hyperbolic time warp.
///
/// `forward_taper` and `backward_taper` set the spread on either side of the
/// window centre; `curvature` smooths the transition between them. No checks
/// happen here: degenerate tapers surface as [`Error::Numeric`] when the
/// weight is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HyperbolicWindow {
    /// Forward taper rate.
    pub forward_taper: f64,
    /// Backward taper rate.
    pub backward_taper: f64,
    /// Curvature of the hyperbolic warp.
    pub curvature: f64,
}

impl Default for HyperbolicWindow {
    fn default() -> Self {
        Self {
            forward_taper: 0.2,
            backward_taper: 0.1,
            curvature: 312.5,
        }
    }
}

impl HyperbolicWindow {
    /// Window with explicit taper rates and curvature.
    pub fn new(forward_taper: f64, backward_taper: f64, curvature: f64) -> Self {
        Self {
            forward_taper,
            backward_taper,
            curvature,
        }
    }

    /// Warp a time axis once so it can be weighted at many frequencies.
    pub fn warp(&self, time: &[f64]) -> Result<WarpedTime> {
        let (lf, lb) = (self.forward_taper, self.backward_taper);
        if lf * lb == 0.0 {
            return Err(Error::Numeric {
                reason: "forward and backward tapers must both be non-zero",
            });
        }
        if lf + lb == 0.0 {
            return Err(Error::Numeric {
                reason: "forward and backward tapers must not sum to zero",
            });
        }

        let denom = 2.0 * lf * lb;
        let x_sq = time
            .iter()
            .map(|&t| {
                let x = ((lf + lb) * t + (lf - lb) * (t * t + self.curvature).sqrt()) / denom;
                x * x
            })
            .collect();
        // Every warped sample is counted twice.
        let norm = 2.0 * 2.0 / ((lf + lb) * (2.0 * PI).sqrt());
        Ok(WarpedTime { x_sq, norm })
    }
}

/// Squared hyperbolic warp of a time axis.
///
/// When the ramp has as many entries as there are time samples, ramp index
/// `j` pairs with warped sample `j`. Otherwise every ramp index is evaluated
/// against every warped sample and the densities are accumulated.
#[derive(Debug, Clone, PartialEq)]
pub struct WarpedTime {
    x_sq: Vec<f64>,
    norm: f64,
}

impl WarpedTime {
    /// Number of warped samples.
    pub fn len(&self) -> usize {
        self.x_sq.len()
    }

    /// Whether the time axis was empty.
    pub fn is_empty(&self) -> bool {
        self.x_sq.is_empty()
    }

    /// Aggregate weight over a length-`length` ramp for `freq_index`.
    pub fn weight(&self, length: usize, freq_index: usize) -> Result<f64> {
        let total = self.weight_vector(length, freq_index)?.iter().sum::<f64>();
        finite(&[total])?;
        Ok(total)
    }

    /// Per-ramp-index densities for `freq_index`.
    pub fn weight_vector(&self, length: usize, freq_index: usize) -> Result<Vec<f64>> {
        if freq_index == 0 {
            return Err(Error::Numeric {
                reason: "frequency index must be non-zero",
            });
        }
        let mut g = vec![0.0; length];
        self.density_into(freq_index, &mut g);
        finite(&g)?;
        Ok(g)
    }

    fn density_into(&self, freq_index: usize, out: &mut [f64]) {
        let n = freq_index as f64;
        let two_n_sq = 2.0 * n * n;
        if self.x_sq.len() == out.len() {
            for (j, (g, x_sq)) in out.iter_mut().zip(&self.x_sq).enumerate() {
                let jf = j as f64;
                *g = self.norm * jf * (-jf * jf * x_sq / two_n_sq).exp();
            }
            return;
        }

        for x_sq in &self.x_sq {
            let c = x_sq / two_n_sq;
            for (j, g) in out.iter_mut().enumerate().skip(1) {
                let jf = j as f64;
                let e = (-jf * jf * c).exp();
                // Exponent only decreases with j.
                if e == 0.0 {
                    break;
                }
                *g += jf * e;
            }
        }
        for g in out.iter_mut() {
            *g *= self.norm;
        }
    }
}

fn finite(values: &[f64]) -> Result<()> {
    if values.iter().any(|g| !g.is_finite()) {
        return Err(Error::Numeric {
            reason: "window weight is not finite",
        });
    }
    Ok(())
}

impl WindowWeight for HyperbolicWindow {
    fn weight<T>(&self, length: usize, freq_index: usize, time: &T) -> Result<f64>
    where
        T: Read1D<f64> + ?Sized,
    {
        self.warp(&time.read_slice())?.weight(length, freq_index)
    }

    fn weight_vector<T>(&self, length: usize, freq_index: usize, time: &T) -> Result<Vec<f64>>
    where
        T: Read1D<f64> + ?Sized,
    {
        self.warp(&time.read_slice())?
            .weight_vector(length, freq_index)
    }
}

/// Aggregate hyperbolic Gaussian weight for frequency index `n` over a
/// length-`l` ramp.
pub fn hyperbolic_gaussian(
    window: &HyperbolicWindow,
    l: usize,
    n: usize,
    time: &[f64],
) -> Result<f64> {
    window.weight(l, n, time)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use approx::assert_abs_diff_eq;
    use ndarray::Array1;

    fn linspace(a: f64, b: f64, n: usize) -> Vec<f64> {
        Array1::linspace(a, b, n).to_vec()
    }

    fn warped(w: &HyperbolicWindow, t: f64) -> f64 {
        let (lf, lb, lam) = (w.forward_taper, w.backward_taper, w.curvature);
        (lf + lb) * t / (2.0 * lf * lb) + (lf - lb) * (t * t + lam).sqrt() / (2.0 * lf * lb)
    }

    fn density(w: &HyperbolicWindow, v: f64, x: f64, n: usize) -> f64 {
        let e = -(v * v) * x * x / (2.0 * (n * n) as f64);
        2.0 * v.abs() * e.exp() / ((w.forward_taper + w.backward_taper) * (2.0 * PI).sqrt())
    }

    /// Ramp and tiled warp paired index by index.
    fn paired(w: &HyperbolicWindow, n: usize, time: &[f64]) -> f64 {
        let mut sum = 0.0;
        for _ in 0..2 {
            for (v, &t) in time.iter().enumerate() {
                sum += density(w, v as f64, warped(w, t), n);
            }
        }
        sum
    }

    /// Every ramp index against every tiled warp sample, no early exit.
    fn broadcast(w: &HyperbolicWindow, l: usize, n: usize, time: &[f64]) -> f64 {
        let mut tiled = time.to_vec();
        tiled.extend_from_slice(time);
        let mut sum = 0.0;
        for t in tiled {
            let x = warped(w, t);
            for v in 0..l {
                sum += density(w, v as f64, x, n);
            }
        }
        sum
    }

    #[test]
    fn weight_is_finite_and_nonnegative() {
        let t = linspace(0.0, 1.0, 100);
        let g = hyperbolic_gaussian(&HyperbolicWindow::default(), 1000, 50, &t).expect("weight");
        assert!(g.is_finite());
        assert!(g >= 0.0);
    }

    #[test]
    fn equal_lengths_pair_ramp_with_time() {
        let w = HyperbolicWindow::new(2.0, 1.0, 1.0);
        let t = linspace(0.0, 2.0, 64);
        for n in [1usize, 5, 32] {
            let expected = paired(&w, n, &t);
            let got = w.weight(64, n, &t).expect("weight");
            assert_abs_diff_eq!(got, expected, epsilon = 1e-9 * expected.max(1.0));
        }
    }

    #[test]
    fn mismatched_lengths_broadcast_ramp_over_time() {
        let w = HyperbolicWindow::default();
        let t = linspace(0.0, 2.0, 64);
        for n in [1usize, 5, 32] {
            let expected = broadcast(&w, 100, n, &t);
            let got = w.weight(100, n, &t).expect("weight");
            assert_abs_diff_eq!(got, expected, epsilon = 1e-9 * expected.max(1.0));
        }

        let skewed = HyperbolicWindow::new(0.05, 0.4, 2.0);
        let t = linspace(-1.0, 1.0, 40);
        let expected = broadcast(&skewed, 80, 7, &t);
        let got = skewed.weight(80, 7, &t).expect("weight");
        assert_abs_diff_eq!(got, expected, epsilon = 1e-9 * expected.max(1.0));
    }

    #[test]
    fn warp_is_reusable_across_frequencies() {
        let w = HyperbolicWindow::default();
        let t = linspace(0.0, 1.0, 48);
        let warp = w.warp(&t).expect("warp");
        assert_eq!(warp.len(), 48);
        for n in [1usize, 9, 24] {
            assert_eq!(
                warp.weight(48, n).expect("reused"),
                w.weight(48, n, &t).expect("fresh")
            );
        }
    }

    #[test]
    fn vector_sums_to_scalar() {
        let w = HyperbolicWindow::default();
        let t = linspace(0.0, 1.0, 50);
        for length in [50usize, 70] {
            let g = w.weight_vector(length, 12, &t).expect("vector");
            assert_eq!(g.len(), length);
            assert_eq!(g[0], 0.0);
            assert!(g.iter().all(|v| *v >= 0.0));
            assert_eq!(g.iter().sum::<f64>(), w.weight(length, 12, &t).expect("scalar"));
        }
    }

    #[test]
    fn weight_grows_with_frequency_index() {
        let w = HyperbolicWindow::default();
        let t = linspace(0.0, 1.0, 32);
        let low = w.weight(32, 2, &t).expect("low");
        let high = w.weight(32, 16, &t).expect("high");
        assert!(high > low);
    }

    #[test]
    fn degenerate_tapers_are_numeric_errors() {
        let t = linspace(0.0, 1.0, 8);
        for w in [
            HyperbolicWindow::new(0.0, 0.1, 312.5),
            HyperbolicWindow::new(0.2, 0.0, 312.5),
            HyperbolicWindow::new(0.1, -0.1, 312.5),
        ] {
            let err = w.weight(8, 1, &t).expect_err("degenerate");
            assert_eq!(err.kind(), ErrorKind::Numeric);
        }
        let err = HyperbolicWindow::default()
            .weight(8, 0, &t)
            .expect_err("zero index");
        assert_eq!(err.kind(), ErrorKind::Numeric);
    }

    #[test]
    fn negative_curvature_yielding_nan_is_reported() {
        let w = HyperbolicWindow::new(0.2, 0.1, -1.0);
        let t = linspace(0.0, 0.5, 8);
        let err = w.weight(8, 3, &t).expect_err("nan warp");
        assert_eq!(
            err,
            Error::Numeric {
                reason: "window weight is not finite"
            }
        );
    }

    #[test]
    fn window_config_round_trips_through_json() {
        let w: HyperbolicWindow =
            serde_json::from_str(r#"{"forward_taper": 0.3}"#).expect("partial config");
        assert_eq!(w.forward_taper, 0.3);
        assert_eq!(w.backward_taper, 0.1);
        assert_eq!(w.curvature, 312.5);
    }
}
