//! Layer markers, captured locations and absorbed foreign errors.

use alloc::{borrow::Cow, boxed::Box};
use core::{any::TypeId, error::Error, fmt};

use triomphe::Arc;
use unsize::CoerceUnsize;

/// A source location captured when a layer was opened.
///
/// Displays as `file:line`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Location {
    /// The file where the layer was opened.
    pub file: &'static str,
    /// The line where the layer was opened.
    pub line: u32,
    /// The column where the layer was opened.
    pub column: u32,
}

impl Location {
    /// Captures the location of the caller.
    ///
    /// Propagates through every enclosing `#[track_caller]` function.
    #[track_caller]
    #[must_use]
    pub fn caller() -> Self {
        let location = core::panic::Location::caller();
        Location {
            file: location.file(),
            line: location.line(),
            column: location.column(),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// Object-safe view of an absorbed foreign error.
trait ForeignError: Send + Sync + 'static {
    /// Returns the error as a plain error trait object.
    fn as_error(&self) -> &(dyn Error + 'static);
}

impl<E: Error + Send + Sync + 'static> ForeignError for E {
    fn as_error(&self) -> &(dyn Error + 'static) {
        self
    }
}

/// Holder for an already boxed error, which does not itself implement
/// [`Error`].
struct Boxed(Box<dyn Error + Send + Sync + 'static>);

impl ForeignError for Boxed {
    fn as_error(&self) -> &(dyn Error + 'static) {
        &*self.0
    }
}

/// A foreign error absorbed into a chain.
///
/// Cloning shares the underlying error.
#[derive(Clone)]
pub struct Foreign {
    /// The absorbed error.
    error: Arc<dyn ForeignError>,
    /// [`TypeId`] of the absorbed error, captured before erasure. `None` when
    /// the error arrived already boxed.
    type_id: Option<TypeId>,
    /// Type name of the absorbed error, captured before erasure.
    type_name: &'static str,
}

impl Foreign {
    /// Absorbs a foreign error.
    pub fn new<E: Error + Send + Sync + 'static>(error: E) -> Self {
        Self {
            error: Arc::new(error).unsize(unsize::Coercion!(to dyn ForeignError)),
            type_id: Some(TypeId::of::<E>()),
            type_name: core::any::type_name::<E>(),
        }
    }

    /// Absorbs an already boxed foreign error.
    ///
    /// The concrete type is no longer known: no [`TypeId`] is recorded and the
    /// type name is the one of the box.
    pub fn from_boxed(error: Box<dyn Error + Send + Sync + 'static>) -> Self {
        Self {
            error: Arc::new(Boxed(error)).unsize(unsize::Coercion!(to dyn ForeignError)),
            type_id: None,
            type_name: core::any::type_name::<Box<dyn Error + Send + Sync + 'static>>(),
        }
    }

    /// Returns the absorbed error.
    #[inline]
    pub fn as_error(&self) -> &(dyn Error + 'static) {
        self.error.as_error()
    }

    /// Returns the [`TypeId`] of the absorbed error, if it was known when the
    /// error was absorbed.
    #[inline]
    pub fn type_id(&self) -> Option<TypeId> {
        self.type_id
    }

    /// Returns the type name of the absorbed error.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns `true` if both handles share the same absorbed error.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.error, &other.error)
    }
}

impl fmt::Display for Foreign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_error(), f)
    }
}

impl fmt::Debug for Foreign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Foreign")
            .field("type_name", &self.type_name)
            .field("error", &self.as_error())
            .finish()
    }
}

/// What opened a layer.
#[derive(Clone, Debug)]
pub enum Marker {
    /// A fresh chain with a message.
    New(Cow<'static, str>),
    /// A message wrapped around the previous layers.
    Wrap(Cow<'static, str>),
    /// A context-only layer, no text.
    Just,
    /// A message wrapped around an absorbed foreign error.
    ///
    /// Only ever the first layer of a chain.
    OuterWrap(Cow<'static, str>, Foreign),
    /// A context-only layer over an absorbed foreign error.
    ///
    /// Only ever the first layer of a chain.
    OuterJust(Foreign),
}

impl Marker {
    /// Returns the text this layer contributes, if any.
    #[inline]
    pub fn text(&self) -> Option<&str> {
        match self {
            Marker::New(text) | Marker::Wrap(text) | Marker::OuterWrap(text, _) => Some(text),
            Marker::Just | Marker::OuterJust(_) => None,
        }
    }

    /// Returns the foreign error absorbed by this layer, if any.
    #[inline]
    pub fn foreign(&self) -> Option<&Foreign> {
        match self {
            Marker::OuterWrap(_, foreign) | Marker::OuterJust(foreign) => Some(foreign),
            Marker::New(_) | Marker::Wrap(_) | Marker::Just => None,
        }
    }

    /// Returns `true` for the variants that may only open a chain.
    #[inline]
    pub fn is_outer(&self) -> bool {
        matches!(self, Marker::OuterWrap(..) | Marker::OuterJust(_))
    }
}
