use core::{error, fmt};

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The input container is not a supported one-dimensional signal.
    Type,
    /// The input contains null or non-numerical samples.
    Value,
    /// The window configuration or frequency index makes the weight undefined.
    Numeric,
    /// Lengths, shapes or per-call arguments are inconsistent.
    Shape,
}

/// Errors raised whilst running hst-rs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The signal container type is not accepted.
    UnsupportedType {
        /// Name of the offending type.
        type_name: String,
    },
    /// The signal contains null (NaN) values.
    NullValues {
        /// Name of the argument.
        arg: &'static str,
    },
    /// The signal contains values that cannot take part in arithmetic.
    NonNumeric {
        /// Name of the argument.
        arg: &'static str,
    },
    /// Division by zero or overflow in the window weight.
    Numeric {
        /// Human readable reason.
        reason: &'static str,
    },
    /// A required input is empty.
    EmptyInput {
        /// Name of the argument that is empty.
        arg: &'static str,
    },
    /// Input/output lengths did not match the required shape.
    LengthMismatch {
        /// Name of the argument.
        arg: &'static str,
        /// Required length.
        expected: usize,
        /// Received length.
        got: usize,
    },
    /// An argument value is invalid.
    InvalidArg {
        /// Name of the argument.
        arg: &'static str,
        /// Human readable reason.
        reason: &'static str,
    },
}

impl Error {
    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::UnsupportedType { .. } => ErrorKind::Type,
            Error::NullValues { .. } | Error::NonNumeric { .. } => ErrorKind::Value,
            Error::Numeric { .. } => ErrorKind::Numeric,
            Error::EmptyInput { .. }
            | Error::LengthMismatch { .. }
            | Error::InvalidArg { .. } => ErrorKind::Shape,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnsupportedType { type_name } => write!(
                f,
                "input_signal must be a dense array, a labelled series or a list, not {type_name}."
            ),
            Error::NullValues { arg } => write!(f, "{arg} contains null values."),
            Error::NonNumeric { arg } => {
                write!(f, "{arg} should only contain numerical values.")
            }
            Error::Numeric { reason } => write!(f, "Numeric failure: {reason}"),
            Error::EmptyInput { arg } => write!(f, "Input `{arg}` was empty."),
            Error::LengthMismatch { arg, expected, got } => {
                write!(
                    f,
                    "Length mismatch on `{arg}`. Expected {expected}, got {got}."
                )
            }
            Error::InvalidArg { arg, reason } => {
                write!(f, "Invalid argument `{arg}`: {reason}")
            }
        }
    }
}

impl error::Error for Error {}

/// Crate result alias.
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::{Error, ErrorKind};

    #[test]
    fn value_errors_share_a_kind_but_not_a_message() {
        let null = Error::NullValues {
            arg: "input_signal",
        };
        let text = Error::NonNumeric {
            arg: "input_signal",
        };
        assert_eq!(null.kind(), ErrorKind::Value);
        assert_eq!(text.kind(), ErrorKind::Value);
        assert_eq!(null.to_string(), "input_signal contains null values.");
        assert_eq!(
            text.to_string(),
            "input_signal should only contain numerical values."
        );
    }

    #[test]
    fn unsupported_type_names_the_offender() {
        let err = Error::UnsupportedType {
            type_name: "string".into(),
        };
        assert_eq!(err.kind(), ErrorKind::Type);
        assert!(err.to_string().ends_with("not string."));
    }
}
