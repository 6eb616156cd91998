use alloc::{string::String, sync::Arc};
use core::{
    error::Error as StdError,
    fmt,
    hash::{Hash, Hasher},
};

/// A sentinel error made from a static string.
///
/// Two `Const` values are equal when their texts are, so a `const` item can
/// be used as a target for [`is`](crate::is) anywhere in a chain.
///
/// ```
/// use errtrail::{Const, Error, is};
///
/// pub const EXHAUSTED: Const = Const("pool exhausted");
///
/// let err = Error::wrap(EXHAUSTED, "acquire connection").u32("waiters", 12);
/// assert!(is(&err, &EXHAUSTED));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Const(pub &'static str);

impl Const {
    /// Returns the text of the sentinel.
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for Const {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl StdError for Const {}

/// A sentinel error that is only ever equal to itself and its clones.
///
/// Unlike [`Const`], two sentinels made separately stay distinct even when
/// their texts are the same.
///
/// ```
/// use errtrail::{Error, Sentinel, is};
///
/// let closed = Sentinel::new("closed");
/// let also_closed = Sentinel::new("closed");
///
/// let err = Error::wrap(closed.clone(), "send frame");
/// assert!(is(&err, &closed));
/// assert!(!is(&err, &also_closed));
/// ```
#[derive(Clone)]
pub struct Sentinel(Arc<str>);

impl Sentinel {
    /// Creates a new sentinel.
    pub fn new(message: impl Into<String>) -> Self {
        Self(Arc::from(message.into()))
    }

    /// Creates a new sentinel with a formatted message.
    pub fn newf(args: fmt::Arguments<'_>) -> Self {
        Self::new(alloc::fmt::format(args))
    }

    /// Returns the text of the sentinel.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for Sentinel {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Sentinel {}

impl Hash for Sentinel {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.0).cast::<u8>().hash(state);
    }
}

impl fmt::Debug for Sentinel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Sentinel").field(&&*self.0).finish()
    }
}

impl fmt::Display for Sentinel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl StdError for Sentinel {}
