//! Trait interfaces for transform capabilities.
//!
//! These traits define the trait-first API shape implemented by the window
//! and transform kernels.

use crate::kernel::Read1D;
use crate::signal::input::SignalSample;
use crate::Result;
use ndarray::ArrayViewMut2;
use rustfft::num_complex::Complex;

use super::spectral::HsTransformResult;

/// Per-frequency window weight capability.
pub trait WindowWeight {
    /// Aggregate weight over a length-`length` ramp for `freq_index`.
    fn weight<T>(&self, length: usize, freq_index: usize, time: &T) -> Result<f64>
    where
        T: Read1D<f64> + ?Sized;

    /// Per-ramp-index densities whose sum is [`WindowWeight::weight`].
    fn weight_vector<T>(&self, length: usize, freq_index: usize, time: &T) -> Result<Vec<f64>>
    where
        T: Read1D<f64> + ?Sized;
}

/// 1D time-frequency transform capability.
pub trait TimeFrequency1D {
    /// Run the transform into a caller-provided `[freq][time]` matrix.
    fn run_into<T, S, X>(
        &self,
        time: &T,
        signal: &S,
        out: &mut ArrayViewMut2<'_, Complex<f64>>,
    ) -> Result<()>
    where
        T: Read1D<f64> + ?Sized,
        S: Read1D<X> + ?Sized,
        X: SignalSample;

    /// Run the transform and allocate the output.
    fn run_alloc<T, S, X>(&self, time: &T, signal: &S) -> Result<HsTransformResult>
    where
        T: Read1D<f64> + ?Sized,
        S: Read1D<X> + ?Sized,
        X: SignalSample;
}
