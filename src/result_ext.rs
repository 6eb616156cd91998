use alloc::borrow::Cow;
use core::error::Error as StdError;

use crate::Error;

mod sealed {
    pub trait Sealed {}
    impl<V, E> Sealed for Result<V, E> {}
}

/// Annotation shorthands for the error side of a `Result`.
///
/// Each method leaves `Ok` untouched and turns `Err(e)` into an [`Error`]
/// exactly like the constructor of the same name. The location recorded, if
/// capture is on, is the location of the method call.
///
/// ```
/// use errtrail::prelude::*;
///
/// fn parse_port(raw: &str) -> Result<u16, Error> {
///     let port = raw.parse::<u16>().wrap("parse port")?;
///     Ok(port)
/// }
///
/// let err = parse_port("http").unwrap_err();
/// assert_eq!(err.to_string(), "parse port: invalid digit found in string");
/// ```
pub trait ResultExt<V, E>: sealed::Sealed {
    /// Applies [`Error::wrap`] to the error.
    #[track_caller]
    fn wrap(self, message: impl Into<Cow<'static, str>>) -> Result<V, Error>;

    /// Applies [`Error::wrap`] to the error with a lazily built message.
    #[track_caller]
    fn wrap_with<M, F>(self, message: F) -> Result<V, Error>
    where
        M: Into<Cow<'static, str>>,
        F: FnOnce() -> M;

    /// Applies [`Error::just`] to the error.
    #[track_caller]
    fn just(self) -> Result<V, Error>;
}

impl<V, E> ResultExt<V, E> for Result<V, E>
where
    E: StdError + Send + Sync + 'static,
{
    #[inline]
    fn wrap(self, message: impl Into<Cow<'static, str>>) -> Result<V, Error> {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(Error::wrap(e, message)),
        }
    }

    #[inline]
    fn wrap_with<M, F>(self, message: F) -> Result<V, Error>
    where
        M: Into<Cow<'static, str>>,
        F: FnOnce() -> M,
    {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(Error::wrap(e, message())),
        }
    }

    #[inline]
    fn just(self) -> Result<V, Error> {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(Error::just(e)),
        }
    }
}
