//! Identity and type checks over error chains.
//!
//! A chain is walked through [`source`](core::error::Error::source), starting
//! at the error itself. A [`List`] link branches: each member is walked in
//! order and the first success wins.
//!
//! - [`is`] answers "is this one of my sentinel errors", using [`Matches`]
//! - [`find`] answers "is there a `T` in here" and returns it
//! - [`find_into`] is the same with an out-slot
//! - [`deliverer`] finds the first [`Error`] to deliver context from
//!
//! A link can also speak for itself: an [`Identity`] error put in a chain
//! through [`Identified`] is asked whether it counts as the target of [`is`],
//! and can hand [`find`] a value of another type.
//!
//! ```
//! use errtrail::{Error, find, is};
//!
//! #[derive(Debug, PartialEq, thiserror::Error)]
//! enum StoreError {
//!     #[error("key {0} missing")]
//!     Missing(u32),
//! }
//!
//! let err = Error::wrap(StoreError::Missing(3), "load settings").u32("key", 3);
//! assert!(is(&err, &StoreError::Missing(3)));
//! assert!(!is(&err, &StoreError::Missing(4)));
//! assert_eq!(find::<StoreError>(&err), Some(&StoreError::Missing(3)));
//! ```

use alloc::boxed::Box;
use core::{
    any::TypeId,
    error::Error as StdError,
    fmt,
};

use crate::{Error, List};

/// Equality used by [`is`] to compare a link of a chain with a target.
///
/// Every `PartialEq` error type gets this from a blanket implementation.
/// [`Error`] implements it itself: a link matches a target [`Error`] when
/// unwrapping zero or more of the link's newest layers leaves the same
/// messages over an equal foreign cause.
pub trait Matches: StdError + 'static {
    /// Returns `true` if `self` counts as `target`.
    fn matches(&self, target: &Self) -> bool;
}

impl<T: StdError + PartialEq + 'static> Matches for T {
    #[inline]
    fn matches(&self, target: &Self) -> bool {
        self == target
    }
}

impl Matches for Error {
    fn matches(&self, target: &Self) -> bool {
        (1..=self.layer_count())
            .rev()
            .any(|depth| self.prefix_matches(depth, target))
    }
}

/// Link-side hooks for [`is`] and [`find`].
///
/// Both default to "no opinion", so the walk falls back to comparing and
/// downcasting the link itself. Put the error in a chain as an [`Identified`]
/// for the hooks to be consulted.
///
/// ```
/// use errtrail::{Const, Error, find, is, matching::{Identified, Identity}};
///
/// const RETRYABLE: Const = Const("retryable");
///
/// #[derive(Debug, thiserror::Error)]
/// #[error("rate limited, retry in {after_ms}ms")]
/// struct RateLimited {
///     after_ms: u64,
/// }
///
/// impl Identity for RateLimited {
///     fn counts_as(&self, target: &(dyn std::error::Error + 'static)) -> bool {
///         target.downcast_ref::<Const>() == Some(&RETRYABLE)
///     }
/// }
///
/// let err = Error::wrap(Identified::new(RateLimited { after_ms: 250 }), "call billing");
/// assert!(is(&err, &RETRYABLE));
/// assert_eq!(find::<RateLimited>(&err).map(|e| e.after_ms), Some(250));
/// ```
pub trait Identity: StdError + Send + Sync + 'static {
    /// Returns `true` if `self` counts as `target`.
    fn counts_as(&self, target: &(dyn StdError + 'static)) -> bool {
        let _ = target;
        false
    }

    /// Returns a value of the type identified by `target` that stands for
    /// `self`, consulted before `self` is downcast.
    fn extract(&self, target: TypeId) -> Option<&(dyn StdError + 'static)> {
        let _ = target;
        None
    }
}

/// Object-safe view of an [`Identity`] error.
trait Hooks: Send + Sync + 'static {
    fn as_error(&self) -> &(dyn StdError + 'static);
    fn counts_as(&self, target: &(dyn StdError + 'static)) -> bool;
    fn extract(&self, target: TypeId) -> Option<&(dyn StdError + 'static)>;
}

impl<E: Identity> Hooks for E {
    fn as_error(&self) -> &(dyn StdError + 'static) {
        self
    }

    fn counts_as(&self, target: &(dyn StdError + 'static)) -> bool {
        Identity::counts_as(self, target)
    }

    fn extract(&self, target: TypeId) -> Option<&(dyn StdError + 'static)> {
        Identity::extract(self, target)
    }
}

/// A chain link whose [`Identity`] hooks are consulted while walking.
///
/// Displays as the inner error, which is also its
/// [`source`](StdError::source), so the inner error stays reachable by its
/// own type.
pub struct Identified {
    inner: Box<dyn Hooks>,
    type_id: TypeId,
}

impl Identified {
    /// Puts `error` behind its hooks.
    pub fn new<E: Identity>(error: E) -> Self {
        Self {
            inner: Box::new(error),
            type_id: TypeId::of::<E>(),
        }
    }

    /// Returns the inner error.
    pub fn get_ref(&self) -> &(dyn StdError + 'static) {
        self.inner.as_error()
    }

    /// Returns the [`TypeId`] of the inner error.
    pub fn inner_type_id(&self) -> TypeId {
        self.type_id
    }
}

impl fmt::Debug for Identified {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.get_ref(), f)
    }
}

impl fmt::Display for Identified {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.get_ref(), f)
    }
}

impl StdError for Identified {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(self.get_ref())
    }
}

/// Borrows an error as a `dyn Error` trait object.
///
/// Implemented for every sized error type and for the common trait objects,
/// so the functions of this module accept both.
pub trait AsDynError {
    /// Returns `self` as a trait object.
    fn as_dyn_error(&self) -> &(dyn StdError + 'static);
}

impl<E: StdError + 'static> AsDynError for E {
    #[inline]
    fn as_dyn_error(&self) -> &(dyn StdError + 'static) {
        self
    }
}

impl AsDynError for dyn StdError + 'static {
    #[inline]
    fn as_dyn_error(&self) -> &(dyn StdError + 'static) {
        self
    }
}

impl AsDynError for dyn StdError + Send + 'static {
    #[inline]
    fn as_dyn_error(&self) -> &(dyn StdError + 'static) {
        self
    }
}

impl AsDynError for dyn StdError + Send + Sync + 'static {
    #[inline]
    fn as_dyn_error(&self) -> &(dyn StdError + 'static) {
        self
    }
}

/// Walks `err` depth first, branching into lists, until `visit` returns a
/// value.
fn search<'a, R>(
    err: &'a (dyn StdError + 'static),
    visit: &mut impl FnMut(&'a (dyn StdError + 'static)) -> Option<R>,
) -> Option<R> {
    let mut current = Some(err);
    while let Some(link) = current {
        if let Some(found) = visit(link) {
            return Some(found);
        }
        if let Some(list) = link.downcast_ref::<List>() {
            for member in list.iter() {
                if let Some(found) = search(member, visit) {
                    return Some(found);
                }
            }
            return None;
        }
        current = link.source();
    }
    None
}

/// Returns `true` if `err` or anything in its chain matches `target`.
///
/// An [`Identified`] link answers through [`Identity::counts_as`] instead.
///
/// ```
/// use errtrail::{Const, Error, is};
///
/// const TIMEOUT: Const = Const("timeout");
///
/// let err = Error::wrap(Error::wrap(TIMEOUT, "call backend"), "handle request");
/// assert!(is(&err, &TIMEOUT));
/// assert!(!is(&err, &Const("refused")));
/// ```
pub fn is<E, T>(err: &E, target: &T) -> bool
where
    E: AsDynError + ?Sized,
    T: Matches,
{
    search(err.as_dyn_error(), &mut |link| {
        let hit = match link.downcast_ref::<Identified>() {
            Some(identified) => identified.inner.counts_as(target),
            None => link.downcast_ref::<T>().is_some_and(|link| link.matches(target)),
        };
        hit.then_some(())
    })
    .is_some()
}

/// [`is`] over optional errors: an absent target matches only an absent
/// error.
pub fn is_opt<E, T>(err: Option<&E>, target: Option<&T>) -> bool
where
    E: AsDynError + ?Sized,
    T: Matches,
{
    match (err, target) {
        (None, None) => true,
        (Some(err), Some(target)) => is(err, target),
        _ => false,
    }
}

/// Returns the first `T` in the chain of `err`.
///
/// An [`Identified`] link is asked through [`Identity::extract`] first.
pub fn find<T>(err: &(impl AsDynError + ?Sized)) -> Option<&T>
where
    T: StdError + 'static,
{
    search(err.as_dyn_error(), &mut |link| {
        link.downcast_ref::<Identified>()
            .and_then(|identified| identified.inner.extract(TypeId::of::<T>()))
            .and_then(|value| value.downcast_ref::<T>())
            .or_else(|| link.downcast_ref::<T>())
    })
}

/// Writes the first `T` in the chain of `err` into `slot` and returns `true`,
/// or leaves `slot` untouched and returns `false`.
///
/// ```
/// use errtrail::{Error, find_into};
///
/// let err = Error::wrap(std::io::Error::other("eof"), "read header");
/// let mut io = None;
/// assert!(find_into::<std::io::Error>(&err, &mut io));
/// assert_eq!(io.unwrap().to_string(), "eof");
/// ```
pub fn find_into<'a, T>(err: &'a (impl AsDynError + ?Sized), slot: &mut Option<&'a T>) -> bool
where
    T: StdError + 'static,
{
    match find::<T>(err) {
        Some(found) => {
            *slot = Some(found);
            true
        }
        None => false,
    }
}

/// Returns the first [`Error`] in the chain of `err`, the one
/// [`Error::deliver`] would start from.
pub fn deliverer<E>(err: &E) -> Option<&Error>
where
    E: AsDynError + ?Sized,
{
    find::<Error>(err)
}

/// Iterates over `err` and its sources, without branching into lists.
pub fn chain<E>(err: &E) -> Chain<'_>
where
    E: AsDynError + ?Sized,
{
    Chain {
        next: Some(err.as_dyn_error()),
    }
}

/// Iterator returned by [`chain`].
#[derive(Clone, Debug)]
pub struct Chain<'a> {
    next: Option<&'a (dyn StdError + 'static)>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a (dyn StdError + 'static);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.source();
        Some(current)
    }
}

impl core::iter::FusedIterator for Chain<'_> {}
