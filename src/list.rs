//! Ordered aggregates of errors.
//!
//! A [`List`] holds any number of boxed errors and is walked member by member
//! by [`is`](crate::is) and [`find`](crate::find). [`and`] combines two
//! optional errors, growing an existing list in place.
//!
//! ```
//! use errtrail::{BoxError, Const, and, is};
//!
//! let mut acc: Option<BoxError> = None;
//! for name in ["a", "b", "c"] {
//!     acc = and(acc, Some(Box::new(Const(name))));
//! }
//! let acc = acc.unwrap();
//! assert_eq!(acc.to_string(), "a; b; c");
//! assert!(is(&*acc, &Const("b")));
//! ```

use alloc::{boxed::Box, vec, vec::Vec};
use core::{error::Error as StdError, fmt};

/// A boxed, thread-safe error.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// An ordered aggregate of errors.
///
/// The text of a list is the text of its members joined with `; `. A list
/// has no [`source`](StdError::source) of its own: matching branches into the
/// members instead.
#[derive(Debug, Default)]
pub struct List {
    errors: Vec<BoxError>,
}

impl List {
    /// Creates an empty list.
    pub const fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Appends `error`.
    pub fn push(&mut self, error: impl Into<BoxError>) {
        self.errors.push(error.into());
    }

    /// Returns the number of members.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns `true` if the list has no members.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Iterates over the members in order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &(dyn StdError + Send + Sync + 'static)> {
        self.errors.iter().map(|error| &**error)
    }
}

impl fmt::Display for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, error) in self.errors.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            fmt::Display::fmt(error, f)?;
        }
        Ok(())
    }
}

impl StdError for List {}

impl FromIterator<BoxError> for List {
    fn from_iter<I: IntoIterator<Item = BoxError>>(iter: I) -> Self {
        Self {
            errors: iter.into_iter().collect(),
        }
    }
}

impl Extend<BoxError> for List {
    fn extend<I: IntoIterator<Item = BoxError>>(&mut self, iter: I) {
        self.errors.extend(iter);
    }
}

impl IntoIterator for List {
    type Item = BoxError;
    type IntoIter = vec::IntoIter<BoxError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a List {
    type Item = &'a BoxError;
    type IntoIter = core::slice::Iter<'a, BoxError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

/// Combines two optional errors.
///
/// An absent side returns the other side unchanged. If `left` is a [`List`],
/// `right` is appended to it in place; otherwise a two-member list is made.
///
/// The in-place append means `and` must not be used on a list that is
/// reachable from somewhere else, which ownership of the box already rules
/// out.
pub fn and(left: Option<BoxError>, right: Option<BoxError>) -> Option<BoxError> {
    match (left, right) {
        (None, right) => right,
        (left, None) => left,
        (Some(left), Some(right)) => match left.downcast::<List>() {
            Ok(mut list) => {
                list.errors.push(right);
                Some(list as BoxError)
            }
            Err(left) => {
                let list: BoxError = Box::new(List {
                    errors: vec![left, right],
                });
                Some(list)
            }
        },
    }
}
