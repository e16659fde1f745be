//! Hyperbolic S-transform pipeline: input validation, window weights and
//! transform assembly.

pub mod input;
pub mod spectral;
pub mod traits;
pub mod windows;

pub use input::{validate_signal, LabeledSeries, RawSample, SignalInput, SignalSample};
pub use spectral::{
    fit_transform, max_frequency, DcRow, HsTransform, HsTransformConfig, HsTransformKernel,
    HsTransformResult, WindowMode, MAX_FREQUENCY_INDEX,
};
pub use windows::{hyperbolic_gaussian, HyperbolicWindow, WarpedTime};
