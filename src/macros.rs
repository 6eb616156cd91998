/// Creates a new [`Error`](crate::Error) with a formatted message.
///
/// Accepts the same arguments as [`format!`](alloc::format). A message
/// without interpolation is stored without allocating.
///
/// # Examples
///
/// ```
/// use errtrail::newf;
///
/// let attempts = 3;
/// let err = newf!("gave up after {attempts} attempts").u32("attempts", attempts);
/// assert_eq!(err.to_string(), "gave up after 3 attempts");
/// ```
#[macro_export]
macro_rules! newf {
    ($($arg:tt)*) => {
        $crate::Error::new($crate::__private::format_message(
            $crate::__private::format_args!($($arg)*)
        ))
    };
}

/// Wraps a cause with a formatted message.
///
/// The first argument is the cause, the rest are [`format!`](alloc::format)
/// arguments.
///
/// # Examples
///
/// ```
/// use errtrail::{Error, wrapf};
///
/// let path = "/etc/app.toml";
/// let err = wrapf!(Error::new("permission denied"), "read {path}");
/// assert_eq!(err.to_string(), "read /etc/app.toml: permission denied");
/// ```
#[macro_export]
macro_rules! wrapf {
    ($cause:expr, $($arg:tt)*) => {
        $crate::Error::wrap($cause, $crate::__private::format_message(
            $crate::__private::format_args!($($arg)*)
        ))
    };
}

/// Returns early with a new [`Error`](crate::Error).
///
/// Shorthand for `return Err(newf!(...).into())`.
///
/// # Examples
///
/// ```
/// use errtrail::{Error, bail};
///
/// fn parse_port(input: &str) -> Result<u16, Error> {
///     match input.parse() {
///         Ok(port) => Ok(port),
///         Err(_) => bail!("invalid port {input:?}"),
///     }
/// }
///
/// assert_eq!(parse_port("80").unwrap(), 80);
/// assert_eq!(parse_port("x").unwrap_err().to_string(), r#"invalid port "x""#);
/// ```
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return $crate::__private::Err($crate::newf!($($arg)*).into())
    };
}
