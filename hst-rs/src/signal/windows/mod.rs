//! Analysis windows for the hyperbolic S-transform.

mod hyperbolic;

pub use hyperbolic::*;
