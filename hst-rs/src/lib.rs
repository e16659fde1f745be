//! S-transform (Stockwell transform) with an asymmetric hyperbolic Gaussian
//! window.
//!
//! ```
//! use hst_rs::signal::HsTransform;
//! use ndarray::Array1;
//!
//! let t = Array1::linspace(0.0, 2.0, 100);
//! let x = t.mapv(|ti| (2.0 * std::f64::consts::PI * 50.0 * ti).sin());
//! let s = HsTransform::default().fit_transform(&t, &x, 0, 1).unwrap();
//! assert_eq!(s.dim(), (51, 100));
//! ```

#![deny(missing_docs)]

mod error;
pub use error::*;

/// Trait-first kernel substrate.
pub mod kernel;

pub mod signal;
