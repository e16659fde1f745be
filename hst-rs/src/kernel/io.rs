use ndarray::{Array1, ArrayView1};
use std::borrow::Cow;

/// Adapter trait for reading 1D input as a dense slice.
///
/// This is the set of containers a transform accepts: dense arrays,
/// labelled series and plain lists. Anything else is rejected at compile
/// time, or at runtime through [`crate::signal::SignalInput`].
pub trait Read1D<T: Clone> {
    /// Borrow the input as a contiguous slice, copying it in logical order
    /// when the storage is strided or reversed.
    fn read_slice(&self) -> Cow<'_, [T]>;
}

impl<T: Clone> Read1D<T> for [T] {
    fn read_slice(&self) -> Cow<'_, [T]> {
        Cow::Borrowed(self)
    }
}

impl<T: Clone, const N: usize> Read1D<T> for [T; N] {
    fn read_slice(&self) -> Cow<'_, [T]> {
        Cow::Borrowed(self)
    }
}

impl<T: Clone> Read1D<T> for Vec<T> {
    fn read_slice(&self) -> Cow<'_, [T]> {
        Cow::Borrowed(self.as_slice())
    }
}

impl<T: Clone> Read1D<T> for Array1<T> {
    fn read_slice(&self) -> Cow<'_, [T]> {
        match self.as_slice() {
            Some(slice) => Cow::Borrowed(slice),
            None => Cow::Owned(self.to_vec()),
        }
    }
}

impl<'a, T: Clone> Read1D<T> for ArrayView1<'a, T> {
    fn read_slice(&self) -> Cow<'_, [T]> {
        match self.as_slice() {
            Some(slice) => Cow::Borrowed(slice),
            None => Cow::Owned(self.to_vec()),
        }
    }
}
