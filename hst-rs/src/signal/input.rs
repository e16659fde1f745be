//! Input validation for transform signals.
//!
//! Statically typed callers pass any [`Read1D`] container of [`SignalSample`]
//! values. Callers holding loosely typed data (deserialized JSON, frames
//! exported from another tool) go through [`SignalInput`], which performs the
//! container and element checks at runtime.

use crate::kernel::Read1D;
use crate::{Error, Result};
use num_traits::Float;
use rustfft::num_complex::Complex;
use serde_json::Value;
use std::borrow::Cow;

const SIGNAL_ARG: &str = "input_signal";

/// Numeric sample type accepted by the transform.
pub trait SignalSample: Copy {
    /// Widen to the complex double precision used internally.
    fn to_complex(self) -> Complex<f64>;

    /// Whether the sample is a null (NaN) value.
    fn is_null(self) -> bool;
}

macro_rules! impl_float_sample {
    ($($t:ty),*) => {
        $(
            impl SignalSample for $t {
                fn to_complex(self) -> Complex<f64> {
                    Complex::new(self as f64, 0.0)
                }

                fn is_null(self) -> bool {
                    self.is_nan()
                }
            }
        )*
    };
}

macro_rules! impl_int_sample {
    ($($t:ty),*) => {
        $(
            impl SignalSample for $t {
                fn to_complex(self) -> Complex<f64> {
                    Complex::new(self as f64, 0.0)
                }

                fn is_null(self) -> bool {
                    false
                }
            }
        )*
    };
}

impl_float_sample!(f32, f64);
impl_int_sample!(i32, i64);

impl<F> SignalSample for Complex<F>
where
    F: Float,
{
    fn to_complex(self) -> Complex<f64> {
        Complex::new(
            self.re.to_f64().unwrap_or(f64::NAN),
            self.im.to_f64().unwrap_or(f64::NAN),
        )
    }

    fn is_null(self) -> bool {
        self.re.is_nan() || self.im.is_nan()
    }
}

/// A one-dimensional series of values with one label per sample.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledSeries<L, T> {
    index: Vec<L>,
    values: Vec<T>,
}

impl<L, T> LabeledSeries<L, T> {
    /// Pair labels with values. Both must have the same length.
    pub fn new(index: Vec<L>, values: Vec<T>) -> Result<Self> {
        if index.len() != values.len() {
            return Err(Error::LengthMismatch {
                arg: "index",
                expected: values.len(),
                got: index.len(),
            });
        }
        Ok(Self { index, values })
    }

    /// Sample labels.
    pub fn index(&self) -> &[L] {
        &self.index
    }

    /// Sample values.
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the series holds no samples.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<T> LabeledSeries<usize, T> {
    /// Series labelled `0..n`.
    pub fn from_values(values: Vec<T>) -> Self {
        Self {
            index: (0..values.len()).collect(),
            values,
        }
    }
}

impl<L, T: Clone> Read1D<T> for LabeledSeries<L, T> {
    fn read_slice(&self) -> Cow<'_, [T]> {
        Cow::Borrowed(&self.values)
    }
}

/// Check a typed signal for null samples and widen it to complex.
pub fn validate_signal<S, X>(signal: &S) -> Result<Vec<Complex<f64>>>
where
    S: Read1D<X> + ?Sized,
    X: SignalSample,
{
    let samples = signal.read_slice();
    if samples.iter().any(|x| x.is_null()) {
        return Err(Error::NullValues { arg: SIGNAL_ARG });
    }
    Ok(samples.iter().map(|x| x.to_complex()).collect())
}

/// One loosely typed sample.
#[derive(Debug, Clone, PartialEq)]
pub enum RawSample {
    /// Real number.
    Real(f64),
    /// Complex number.
    Complex(Complex<f64>),
    /// Missing value.
    Null,
    /// A value that cannot take part in arithmetic, e.g. text.
    Other(String),
}

/// Loosely typed signal container, checked at runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum SignalInput {
    /// Plain ordered list of samples.
    List(Vec<RawSample>),
    /// Labelled one-dimensional series.
    Series {
        /// Sample labels.
        index: Vec<Value>,
        /// Sample values.
        data: Vec<RawSample>,
    },
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn parse_sample(value: &Value) -> Result<RawSample> {
    match value {
        Value::Null => Ok(RawSample::Null),
        Value::Number(n) => Ok(n.as_f64().map_or(RawSample::Null, RawSample::Real)),
        Value::Bool(b) => Ok(RawSample::Other(b.to_string())),
        Value::String(s) => Ok(RawSample::Other(s.clone())),
        Value::Object(map) if map.len() == 2 => {
            match (map.get("re"), map.get("im")) {
                (Some(re), Some(im)) => match (parse_sample(re)?, parse_sample(im)?) {
                    (RawSample::Real(re), RawSample::Real(im)) => {
                        Ok(RawSample::Complex(Complex::new(re, im)))
                    }
                    (RawSample::Null, _) | (_, RawSample::Null) => Ok(RawSample::Null),
                    _ => Ok(RawSample::Other(value.to_string())),
                },
                _ => Err(Error::UnsupportedType {
                    type_name: "nested object".into(),
                }),
            }
        }
        Value::Object(_) => Err(Error::UnsupportedType {
            type_name: "nested object".into(),
        }),
        Value::Array(_) => Err(Error::UnsupportedType {
            type_name: "nested array".into(),
        }),
    }
}

fn parse_samples(values: &[Value]) -> Result<Vec<RawSample>> {
    values.iter().map(parse_sample).collect()
}

impl SignalInput {
    /// Interpret a JSON value as a signal container.
    ///
    /// Arrays are lists. Objects holding `index` and `data` arrays are
    /// labelled series. Everything else is an unsupported container, as is
    /// any element that is itself an array or a non-complex object.
    pub fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::Array(items) => Ok(SignalInput::List(parse_samples(items)?)),
            Value::Object(map) => match (map.get("index"), map.get("data")) {
                (Some(Value::Array(index)), Some(Value::Array(data))) => {
                    if index.len() != data.len() {
                        return Err(Error::LengthMismatch {
                            arg: "index",
                            expected: data.len(),
                            got: index.len(),
                        });
                    }
                    Ok(SignalInput::Series {
                        index: index.clone(),
                        data: parse_samples(data)?,
                    })
                }
                _ => Err(Error::UnsupportedType {
                    type_name: "object".into(),
                }),
            },
            other => Err(Error::UnsupportedType {
                type_name: json_type_name(other).into(),
            }),
        }
    }

    /// Samples in order, without labels.
    pub fn samples(&self) -> &[RawSample] {
        match self {
            SignalInput::List(data) | SignalInput::Series { data, .. } => data,
        }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples().len()
    }

    /// Whether the container holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples().is_empty()
    }

    /// Run the value checks and produce the dense complex signal.
    ///
    /// Null samples are reported before non-numerical ones.
    pub fn validate(&self) -> Result<Vec<Complex<f64>>> {
        let samples = self.samples();
        let is_null = |s: &RawSample| match s {
            RawSample::Null => true,
            RawSample::Real(x) => x.is_nan(),
            RawSample::Complex(z) => z.re.is_nan() || z.im.is_nan(),
            RawSample::Other(_) => false,
        };
        if samples.iter().any(is_null) {
            return Err(Error::NullValues { arg: SIGNAL_ARG });
        }
        samples
            .iter()
            .map(|s| match s {
                RawSample::Real(x) => Ok(Complex::new(*x, 0.0)),
                RawSample::Complex(z) => Ok(*z),
                RawSample::Null | RawSample::Other(_) => Err(Error::NonNumeric { arg: SIGNAL_ARG }),
            })
            .collect()
    }
}

impl TryFrom<&Value> for SignalInput {
    type Error = Error;

    fn try_from(value: &Value) -> Result<Self> {
        SignalInput::from_json(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use ndarray::Array1;
    use serde_json::json;

    #[test]
    fn typed_containers_validate_to_complex() {
        let list = vec![1.0f64, -2.0, 3.5];
        let dense = Array1::from(list.clone());
        let series = LabeledSeries::from_values(list.clone());

        let a = validate_signal(&list).expect("list");
        let b = validate_signal(&dense).expect("array");
        let c = validate_signal(&series).expect("series");
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert_eq!(a[1], Complex::new(-2.0, 0.0));
    }

    #[test]
    fn integer_and_complex_samples_are_accepted() {
        let ints = [1i32, 2, 3];
        assert_eq!(validate_signal(&ints).expect("ints")[2], Complex::new(3.0, 0.0));

        let z = vec![Complex::new(1.0f32, -1.0)];
        assert_eq!(validate_signal(&z).expect("complex")[0], Complex::new(1.0, -1.0));
    }

    #[test]
    fn nan_samples_are_null_values() {
        let x = vec![0.0, f64::NAN, 1.0];
        let err = validate_signal(&x).expect_err("nan");
        assert_eq!(err, Error::NullValues { arg: "input_signal" });

        let z = [Complex::new(0.0f64, f64::NAN)];
        assert_eq!(validate_signal(&z).expect_err("nan").kind(), ErrorKind::Value);
    }

    #[test]
    fn series_rejects_mismatched_labels() {
        let err = LabeledSeries::new(vec!["a", "b"], vec![1.0f64]).expect_err("mismatch");
        assert!(matches!(err, Error::LengthMismatch { .. }));
    }

    #[test]
    fn json_list_and_series_are_accepted() {
        let list = SignalInput::from_json(&json!([1, 2.5, {"re": 0.0, "im": 1.0}])).expect("list");
        assert_eq!(
            list.validate().expect("numeric"),
            vec![
                Complex::new(1.0, 0.0),
                Complex::new(2.5, 0.0),
                Complex::new(0.0, 1.0)
            ]
        );

        let series =
            SignalInput::from_json(&json!({"index": ["a", "b"], "data": [3, 4]})).expect("series");
        assert_eq!(series.len(), 2);
        assert!(matches!(series, SignalInput::Series { .. }));
    }

    #[test]
    fn json_containers_of_wrong_type_are_rejected() {
        for value in [
            json!({"a": 1}),
            json!("1, 2, 3"),
            json!(3.0),
            json!([[1.0, 2.0], [3.0, 4.0]]),
            json!([{"x": 1}]),
        ] {
            let err = SignalInput::from_json(&value).expect_err("unsupported");
            assert_eq!(err.kind(), ErrorKind::Type, "{value}");
        }
    }

    #[test]
    fn json_null_and_text_raise_distinct_value_errors() {
        let null = SignalInput::from_json(&json!([1.0, null])).expect("list");
        let text = SignalInput::from_json(&json!([1.0, "two"])).expect("list");
        let both = SignalInput::from_json(&json!(["two", null])).expect("list");

        let null_err = null.validate().expect_err("null");
        let text_err = text.validate().expect_err("text");
        assert_eq!(null_err.kind(), ErrorKind::Value);
        assert_eq!(text_err.kind(), ErrorKind::Value);
        assert_ne!(null_err.to_string(), text_err.to_string());
        assert_eq!(both.validate().expect_err("both"), null_err);
    }
}
