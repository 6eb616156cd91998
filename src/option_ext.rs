//! Extension methods for `Option`.
//!
//! [`OptionExt::ok_or_new`] turns a missing value into a fresh [`Error`].
//! [`OptionExt::wrap`] and [`OptionExt::just`] annotate an optional error and
//! treat a missing one as a bug:
//!
//! ```should_panic
//! use errtrail::option_ext::OptionExt;
//!
//! let cause: Option<std::io::Error> = None;
//! let _ = cause.wrap("flush buffer"); // panics: cannot wrap an absent error
//! ```

use alloc::borrow::Cow;
use core::error::Error as StdError;

use crate::Error;

/// Message of the panic raised when an absent error is wrapped.
const ABSENT_CAUSE: &str = "cannot wrap an absent error";

/// Extension methods for `Option`.
pub trait OptionExt<T> {
    /// Returns the value, or a new [`Error`] with `message` if there is none.
    ///
    /// ```
    /// use errtrail::option_ext::OptionExt;
    ///
    /// let port = std::env::var("SURELY_UNSET_PORT").ok();
    /// let err = port.ok_or_new("port not configured").unwrap_err();
    /// assert_eq!(err.to_string(), "port not configured");
    /// ```
    #[track_caller]
    fn ok_or_new(self, message: impl Into<Cow<'static, str>>) -> Result<T, Error>;

    /// Applies [`Error::wrap`] to the contained error.
    ///
    /// # Panics
    ///
    /// Panics if there is no error.
    #[track_caller]
    fn wrap(self, message: impl Into<Cow<'static, str>>) -> Error
    where
        T: StdError + Send + Sync + 'static;

    /// Applies [`Error::just`] to the contained error.
    ///
    /// # Panics
    ///
    /// Panics if there is no error.
    #[track_caller]
    fn just(self) -> Error
    where
        T: StdError + Send + Sync + 'static;
}

impl<T> OptionExt<T> for Option<T> {
    #[inline]
    fn ok_or_new(self, message: impl Into<Cow<'static, str>>) -> Result<T, Error> {
        match self {
            Some(v) => Ok(v),
            None => Err(Error::new(message)),
        }
    }

    fn wrap(self, message: impl Into<Cow<'static, str>>) -> Error
    where
        T: StdError + Send + Sync + 'static,
    {
        match self {
            Some(cause) => Error::wrap(cause, message),
            None => panic!("{ABSENT_CAUSE}"),
        }
    }

    fn just(self) -> Error
    where
        T: StdError + Send + Sync + 'static,
    {
        match self {
            Some(cause) => Error::just(cause),
            None => panic!("{ABSENT_CAUSE}"),
        }
    }
}
