//! Shared trait-first kernel substrate.
//!
//! Constructor validation and the 1D read adapters through which every
//! transform kernel borrows its time and signal buffers.

mod io;
mod lifecycle;

pub use io::*;
pub use lifecycle::*;
