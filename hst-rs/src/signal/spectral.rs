//! S-transform with a hyperbolic Gaussian window.
//!
//! The forward spectrum of the signal is doubled so that every analysed
//! frequency can take a length-N slice without wraparound. Each slice is
//! weighted by the hyperbolic window for its frequency index and brought back
//! to the time axis with an inverse FFT, giving one row of the output.

use crate::kernel::{KernelLifecycle, Read1D};
use crate::signal::input::{validate_signal, SignalInput, SignalSample};
use crate::signal::traits::TimeFrequency1D;
use crate::signal::windows::{HyperbolicWindow, WarpedTime};
use crate::{Error, Result};
use ndarray::{Array2, ArrayViewMut1, ArrayViewMut2};
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::sync::Arc;
use tracing::{debug, trace};

/// Upper cap on the analysed frequency index.
pub const MAX_FREQUENCY_INDEX: usize = 900;

/// Highest frequency index analysed for a signal of `len` samples.
pub fn max_frequency(len: usize) -> usize {
    MAX_FREQUENCY_INDEX.min(len / 2)
}

/// Contents of the DC row (row 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DcRow {
    /// Every column holds the signal mean.
    #[default]
    Uniform,
    /// The mean multiplied by the parity of the 1-based column index: the
    /// mean in even (0-based) columns and zero in odd ones.
    ParityMasked,
}

/// How the window weights the shifted spectrum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WindowMode {
    /// One aggregate weight per frequency scales the whole slice.
    #[default]
    Scalar,
    /// Each spectral sample is scaled by its own window density.
    PerBin,
}

/// Constructor config for [`HsTransformKernel`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HsTransformConfig {
    /// Window shape.
    pub window: HyperbolicWindow,
    /// Minimum analysed frequency index.
    pub minf: usize,
    /// Step between analysed frequency indices.
    pub fsamplingrate: usize,
    /// DC row policy.
    pub dc_row: DcRow,
    /// Window weighting policy.
    pub window_mode: WindowMode,
}

impl Default for HsTransformConfig {
    fn default() -> Self {
        Self {
            window: HyperbolicWindow::default(),
            minf: 0,
            fsamplingrate: 1,
            dc_row: DcRow::default(),
            window_mode: WindowMode::default(),
        }
    }
}

/// Transform output bundle.
#[derive(Debug, Clone, PartialEq)]
pub struct HsTransformResult {
    /// Frequency index analysed by each row; 0 for the DC row.
    pub frequencies: Vec<usize>,
    /// Complex matrix in frequency-major layout `[freq][time]`.
    pub s: Array2<Complex<f64>>,
}

/// Trait-first hyperbolic S-transform kernel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HsTransformKernel {
    window: HyperbolicWindow,
    minf: usize,
    step: usize,
    dc_row: DcRow,
    window_mode: WindowMode,
}

impl KernelLifecycle for HsTransformKernel {
    type Config = HsTransformConfig;

    fn try_new(config: Self::Config) -> Result<Self> {
        if config.fsamplingrate == 0 {
            return Err(Error::InvalidArg {
                arg: "fsamplingrate",
                reason: "fsamplingrate must be > 0",
            });
        }
        Ok(Self {
            window: config.window,
            minf: config.minf,
            step: config.fsamplingrate,
            dc_row: config.dc_row,
            window_mode: config.window_mode,
        })
    }
}

/// Inputs that passed validation, ready for assembly.
struct Prepared<'a> {
    time: Cow<'a, [f64]>,
    signal: Vec<Complex<f64>>,
    rows: usize,
}

impl HsTransformKernel {
    /// Configured window.
    pub fn window(&self) -> &HyperbolicWindow {
        &self.window
    }

    /// Number of output rows for a signal of `len` samples.
    ///
    /// Row 0 is the DC row; row `r >= 1` holds frequency index
    /// `minf + r * fsamplingrate`.
    pub fn rows(&self, len: usize) -> Result<usize> {
        let maxf = max_frequency(len);
        if self.minf > maxf {
            return Err(Error::InvalidArg {
                arg: "minf",
                reason: "minf exceeds the highest analysed frequency index",
            });
        }
        Ok((maxf - self.minf) / self.step + 1)
    }

    /// Frequency index analysed by each row for a signal of `len` samples.
    pub fn frequencies(&self, len: usize) -> Result<Vec<usize>> {
        let rows = self.rows(len)?;
        Ok(core::iter::once(0)
            .chain((1..rows).map(|r| self.minf + r * self.step))
            .collect())
    }

    fn prepare<'a, T, S, X>(&self, time: &'a T, signal: &S) -> Result<Prepared<'a>>
    where
        T: Read1D<f64> + ?Sized,
        S: Read1D<X> + ?Sized,
        X: SignalSample,
    {
        let signal = validate_signal(signal)?;
        let time = time.read_slice();
        if signal.is_empty() {
            return Err(Error::EmptyInput {
                arg: "input_signal",
            });
        }
        if time.len() != signal.len() {
            return Err(Error::LengthMismatch {
                arg: "time_values",
                expected: signal.len(),
                got: time.len(),
            });
        }
        let rows = self.rows(signal.len())?;
        Ok(Prepared { time, signal, rows })
    }

    fn fill_dc_row(&self, x: &[Complex<f64>], mut row: ArrayViewMut1<'_, Complex<f64>>) {
        let mean = x.iter().sum::<Complex<f64>>() / x.len() as f64;
        for (col, dst) in row.iter_mut().enumerate() {
            *dst = match self.dc_row {
                DcRow::Uniform => mean,
                DcRow::ParityMasked => mean * ((col + 1) & 1) as f64,
            };
        }
    }

    fn fill_row(
        &self,
        r: usize,
        warp: &WarpedTime,
        doubled: &[Complex<f64>],
        ifft: &Arc<dyn Fft<f64>>,
        mut row: ArrayViewMut1<'_, Complex<f64>>,
    ) -> Result<()> {
        let n = row.len();
        let freq = self.minf + r * self.step;
        let start = freq + 1;
        let mut buf = doubled[start..start + n].to_vec();

        match self.window_mode {
            WindowMode::Scalar => {
                let w = warp.weight(n, freq)?;
                trace!(row = r, freq, weight = w, "hyperbolic window weight");
                buf.iter_mut().for_each(|z| *z *= w);
            }
            WindowMode::PerBin => {
                let g = warp.weight_vector(n, freq)?;
                buf.iter_mut().zip(g).for_each(|(z, g)| *z *= g);
            }
        }

        let mut scratch = vec![Complex::new(0.0, 0.0); ifft.get_inplace_scratch_len()];
        ifft.process_with_scratch(&mut buf, &mut scratch);
        let scale = 1.0 / n as f64;
        for (dst, src) in row.iter_mut().zip(buf) {
            *dst = src * scale;
        }
        Ok(())
    }

    fn assemble(
        &self,
        prepared: &Prepared<'_>,
        out: &mut ArrayViewMut2<'_, Complex<f64>>,
    ) -> Result<()> {
        let x = &prepared.signal;
        let n = x.len();
        debug!(
            len = n,
            maxf = max_frequency(n),
            rows = prepared.rows,
            minf = self.minf,
            step = self.step,
            "running hyperbolic S-transform"
        );

        let warp = self.window.warp(&prepared.time)?;

        let mut planner = FftPlanner::<f64>::new();
        let fft = planner.plan_fft_forward(n);
        let ifft = planner.plan_fft_inverse(n);

        let mut h = x.clone();
        fft.process(&mut h);
        let doubled: Vec<Complex<f64>> = h.iter().chain(h.iter()).copied().collect();

        self.fill_dc_row(x, out.row_mut(0));

        #[cfg(feature = "rayon")]
        {
            use ndarray::parallel::prelude::*;
            use ndarray::Axis;

            out.axis_iter_mut(Axis(0))
                .into_par_iter()
                .enumerate()
                .skip(1)
                .try_for_each(|(r, row)| self.fill_row(r, &warp, &doubled, &ifft, row))?;
        }
        #[cfg(not(feature = "rayon"))]
        for (r, row) in out.outer_iter_mut().enumerate().skip(1) {
            self.fill_row(r, &warp, &doubled, &ifft, row)?;
        }

        Ok(())
    }
}

impl TimeFrequency1D for HsTransformKernel {
    /// On error the contents of `out` are unspecified.
    fn run_into<T, S, X>(
        &self,
        time: &T,
        signal: &S,
        out: &mut ArrayViewMut2<'_, Complex<f64>>,
    ) -> Result<()>
    where
        T: Read1D<f64> + ?Sized,
        S: Read1D<X> + ?Sized,
        X: SignalSample,
    {
        let prepared = self.prepare(time, signal)?;
        let (rows, cols) = out.dim();
        if rows != prepared.rows {
            return Err(Error::LengthMismatch {
                arg: "rows",
                expected: prepared.rows,
                got: rows,
            });
        }
        if cols != prepared.signal.len() {
            return Err(Error::LengthMismatch {
                arg: "columns",
                expected: prepared.signal.len(),
                got: cols,
            });
        }
        self.assemble(&prepared, out)
    }

    fn run_alloc<T, S, X>(&self, time: &T, signal: &S) -> Result<HsTransformResult>
    where
        T: Read1D<f64> + ?Sized,
        S: Read1D<X> + ?Sized,
        X: SignalSample,
    {
        let prepared = self.prepare(time, signal)?;
        let n = prepared.signal.len();
        let mut s = Array2::zeros((prepared.rows, n));
        self.assemble(&prepared, &mut s.view_mut())?;
        Ok(HsTransformResult {
            frequencies: self.frequencies(n)?,
            s,
        })
    }
}

/// Hyperbolic S-transform with a fixed window configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HsTransform {
    /// Window shape.
    pub window: HyperbolicWindow,
    /// DC row policy.
    pub dc_row: DcRow,
    /// Window weighting policy.
    pub window_mode: WindowMode,
}

impl HsTransform {
    /// Transform with explicit taper rates and curvature.
    pub fn new(forward_taper: f64, backward_taper: f64, curvature: f64) -> Self {
        Self {
            window: HyperbolicWindow::new(forward_taper, backward_taper, curvature),
            ..Self::default()
        }
    }

    /// Build the kernel for one frequency range.
    pub fn kernel(&self, minf: usize, fsamplingrate: usize) -> Result<HsTransformKernel> {
        HsTransformKernel::try_new(HsTransformConfig {
            window: self.window,
            minf,
            fsamplingrate,
            dc_row: self.dc_row,
            window_mode: self.window_mode,
        })
    }

    /// Compute the `[freq][time]` S-transform matrix of `input_signal`.
    pub fn fit_transform<T, S, X>(
        &self,
        time_values: &T,
        input_signal: &S,
        minf: usize,
        fsamplingrate: usize,
    ) -> Result<Array2<Complex<f64>>>
    where
        T: Read1D<f64> + ?Sized,
        S: Read1D<X> + ?Sized,
        X: SignalSample,
    {
        let kernel = self.kernel(minf, fsamplingrate)?;
        Ok(kernel.run_alloc(time_values, input_signal)?.s)
    }

    /// Like [`HsTransform::fit_transform`], for a signal held as JSON.
    pub fn fit_transform_json<T>(
        &self,
        time_values: &T,
        input_signal: &Value,
        minf: usize,
        fsamplingrate: usize,
    ) -> Result<Array2<Complex<f64>>>
    where
        T: Read1D<f64> + ?Sized,
    {
        let signal = SignalInput::from_json(input_signal)?.validate()?;
        self.fit_transform(time_values, &signal, minf, fsamplingrate)
    }
}

/// S-transform with the default hyperbolic window.
pub fn fit_transform<T, S, X>(
    time_values: &T,
    input_signal: &S,
    minf: usize,
    fsamplingrate: usize,
) -> Result<Array2<Complex<f64>>>
where
    T: Read1D<f64> + ?Sized,
    S: Read1D<X> + ?Sized,
    X: SignalSample,
{
    HsTransform::default().fit_transform(time_values, input_signal, minf, fsamplingrate)
}
