//! Status codes returned by index operations.

use std::fmt;

use crate::common::Error;

/// Outcome of an index operation, reported instead of a raised fault.
///
/// The integer values are part of the contract with the surrounding engine:
/// `Ok = 0`, `Exception = 1`, `Error = -1`.
///
/// # Example
/// ```
/// use ixtree::StatusCode;
///
/// assert!(StatusCode::Ok.is_ok());
/// assert_eq!(StatusCode::Error.to_int(), -1);
/// assert_eq!(StatusCode::Exception.to_string(), "1");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i32)]
pub enum StatusCode {
    #[default]
    Ok = 0,
    /// An internal invariant was breached.
    Exception = 1,
    /// The request was refused (bad parameters, policy violation).
    Error = -1,
}

impl StatusCode {
    #[inline]
    pub fn to_int(self) -> i32 {
        self as i32
    }

    #[inline]
    pub fn is_ok(self) -> bool {
        self == StatusCode::Ok
    }

    /// Fold an operation result into its status code.
    pub fn from_result<T>(result: &crate::Result<T>) -> Self {
        match result {
            Ok(_) => StatusCode::Ok,
            Err(e) => StatusCode::from(e),
        }
    }
}

impl From<&Error> for StatusCode {
    fn from(err: &Error) -> Self {
        match err {
            Error::InvalidOrder(_)
            | Error::EntryExists
            | Error::MissingKey
            | Error::NotAnInternalNode(_)
            | Error::NodeFull(_) => StatusCode::Error,
            Error::EmptyInternalNode(_)
            | Error::NodeNotFound(_)
            | Error::InvariantViolation(_) => StatusCode::Exception,
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_int())
    }
}
