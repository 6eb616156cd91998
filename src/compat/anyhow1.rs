//! Interoperability with `anyhow` 1.x.
//!
//! [`Error`] is an ordinary `Error + Send + Sync + 'static` type, so `?`
//! already converts it into an [`anyhow::Error`]. [`IntoAnyhow`] spells that
//! conversion out for results, and [`IntoErrtrail`] goes the other way:
//!
//! ```
//! use errtrail::{
//!     Error, is,
//!     compat::{IntoErrtrail, anyhow1::IntoAnyhow},
//! };
//!
//! fn inner() -> Result<(), Error> {
//!     Err(Error::new("quota exceeded").u32("limit", 10))
//! }
//!
//! fn middle() -> anyhow::Result<()> {
//!     inner().into_anyhow()
//! }
//!
//! let err = middle().into_errtrail().unwrap_err();
//! assert_eq!(err.to_string(), "quota exceeded");
//! assert_eq!(err.flat().to_string(), "limit=10");
//! ```

use super::IntoErrtrail;
use crate::Error;

impl IntoErrtrail for anyhow::Error {
    type Output = Error;

    #[inline]
    fn into_errtrail(self) -> Self::Output {
        match self.downcast::<Error>() {
            Ok(native) => native,
            Err(foreign) => Error::just_boxed(foreign.into()),
        }
    }
}

impl<T> IntoErrtrail for anyhow::Result<T> {
    type Output = Result<T, Error>;

    #[inline]
    fn into_errtrail(self) -> Self::Output {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(e.into_errtrail()),
        }
    }
}

/// Converts an [`Error`] into an [`anyhow::Error`].
pub trait IntoAnyhow {
    /// [`anyhow::Error`] for errors, `anyhow::Result<T>` for results.
    type Output;

    /// Performs the conversion.
    fn into_anyhow(self) -> Self::Output;
}

impl IntoAnyhow for Error {
    type Output = anyhow::Error;

    #[inline]
    fn into_anyhow(self) -> Self::Output {
        anyhow::Error::new(self)
    }
}

impl<T> IntoAnyhow for Result<T, Error> {
    type Output = anyhow::Result<T>;

    #[inline]
    fn into_anyhow(self) -> Self::Output {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(e.into_anyhow()),
        }
    }
}
