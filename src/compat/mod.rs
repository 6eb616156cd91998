//! Conversions between [`Error`] and other error handling libraries.
//!
//! [`IntoErrtrail`] is the common entry point. It is implemented here for
//! boxed trait objects and, with the `compat-anyhow1` feature, for `anyhow`
//! types in `compat::anyhow1`.
//!
//! ```
//! use errtrail::{BoxError, Error, compat::IntoErrtrail};
//!
//! fn legacy() -> Result<u8, BoxError> {
//!     Err("socket closed".into())
//! }
//!
//! fn current() -> Result<u8, Error> {
//!     let value = legacy().into_errtrail()?;
//!     Ok(value)
//! }
//!
//! assert_eq!(current().unwrap_err().to_string(), "socket closed");
//! ```

use crate::{BoxError, Error};

/// Converts an error from elsewhere into an [`Error`].
///
/// Implemented for error values and for `Result`s carrying them. A value
/// that already holds an [`Error`] is unwrapped instead of absorbed, so
/// converting back and forth does not nest chains.
pub trait IntoErrtrail {
    /// [`Error`] for error values, `Result<T, Error>` for results.
    type Output;

    /// Performs the conversion.
    #[track_caller]
    fn into_errtrail(self) -> Self::Output;
}

impl IntoErrtrail for BoxError {
    type Output = Error;

    #[inline]
    fn into_errtrail(self) -> Self::Output {
        Error::just_boxed(self)
    }
}

impl<T> IntoErrtrail for Result<T, BoxError> {
    type Output = Result<T, Error>;

    #[inline]
    fn into_errtrail(self) -> Self::Output {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(e.into_errtrail()),
        }
    }
}

#[cfg(feature = "compat-anyhow1")]
#[cfg_attr(docsrs, doc(cfg(feature = "compat-anyhow1")))]
pub mod anyhow1;
