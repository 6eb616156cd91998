use alloc::{borrow::Cow, boxed::Box, string::String};
use core::{
    any::{Any, TypeId},
    error::Error as StdError,
    fmt,
};

use errtrail_internals::{Attr, Foreign, Location, Marker, RawChain, Value};

use crate::{
    annotate,
    config::Config,
    consumer::{Consumer, Layer},
    context::Context,
    matching::{Identified, deliverer},
    render::{Flat, Joined, Tree},
};

/// An annotated error: a chain of message layers with typed attributes.
///
/// Every [`Error`] starts from [`new`](Self::new), or from a foreign error via
/// [`wrap`](Self::wrap) or [`just`](Self::just). Wrapping an [`Error`] again
/// adds a layer to the same value instead of nesting. Attributes always go to
/// the most recently opened layer.
///
/// The annotation methods consume the error and return it, so they chain:
///
/// ```
/// use errtrail::Error;
///
/// let err = Error::new("query failed")
///     .str("table", "users")
///     .u32("rows", 0)
///     .bytes("raw", b"SELECT 1");
/// assert_eq!(err.to_string(), "query failed");
/// ```
///
/// Cloning is cheap for absorbed foreign errors and opaque values, which are
/// shared. The clone is otherwise independent.
#[derive(Clone)]
pub struct Error {
    raw: RawChain,
    prefix: String,
    /// Separator configured when the prefix was last extended.
    separator: &'static str,
}

/// Moves `value` into a `U` if `T` and `U` are the same type.
fn try_cast<T: 'static, U: 'static>(value: T) -> Result<U, T> {
    let mut slot = Some(value);
    if let Some(target) = (&mut slot as &mut dyn Any).downcast_mut::<Option<U>>() {
        if let Some(value) = target.take() {
            return Ok(value);
        }
    }
    match slot {
        Some(value) => Err(value),
        None => unreachable!("slot is only emptied by a successful cast"),
    }
}

#[track_caller]
fn capture_location() -> Option<Location> {
    if Config::current().locations_enabled() {
        Some(Location::caller())
    } else {
        None
    }
}

impl Error {
    fn from_marker(marker: Marker, location: Option<Location>) -> Self {
        Self {
            raw: RawChain::new(marker, location),
            prefix: String::new(),
            separator: "",
        }
    }

    /// Starts a new chain with `message`.
    ///
    /// An empty message is allowed and contributes no text.
    #[track_caller]
    #[must_use]
    pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
        Self::from_marker(Marker::New(message.into()), capture_location())
    }

    /// Starts a new chain with a formatted message. See also [`newf!`](crate::newf).
    #[track_caller]
    #[must_use]
    pub fn newf(args: fmt::Arguments<'_>) -> Self {
        Self::new(crate::__private::format_message(args))
    }

    /// Wraps `cause` with `message`.
    ///
    /// If `cause` is an [`Error`] the message opens a new layer on it.
    /// Otherwise `cause` is absorbed into a new chain and stays reachable
    /// through [`source`](StdError::source).
    ///
    /// ```
    /// use errtrail::Error;
    ///
    /// let io = std::io::Error::other("disk full");
    /// let err = Error::wrap(Error::wrap(io, "write block"), "save document");
    /// assert_eq!(err.to_string(), "save document: write block: disk full");
    /// ```
    #[track_caller]
    #[must_use]
    pub fn wrap<E>(cause: E, message: impl Into<Cow<'static, str>>) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        let message = message.into();
        match try_cast::<E, Error>(cause) {
            Ok(native) => native.open_layer(Marker::Wrap(message)),
            Err(foreign) => Self::from_marker(
                Marker::OuterWrap(message, Foreign::new(foreign)),
                capture_location(),
            ),
        }
    }

    /// Wraps `cause` with a formatted message. See also [`wrapf!`](crate::wrapf).
    #[track_caller]
    #[must_use]
    pub fn wrapf<E>(cause: E, args: fmt::Arguments<'_>) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::wrap(cause, crate::__private::format_message(args))
    }

    /// Opens a context-only layer over `cause`.
    ///
    /// The text of the result is the text of `cause`. Use it to attach
    /// attributes without rewording the error.
    #[track_caller]
    #[must_use]
    pub fn just<E>(cause: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        match try_cast::<E, Error>(cause) {
            Ok(native) => native.open_layer(Marker::Just),
            Err(foreign) => {
                Self::from_marker(Marker::OuterJust(Foreign::new(foreign)), capture_location())
            }
        }
    }

    /// Like [`wrap`](Self::wrap), for a cause that is already boxed.
    #[track_caller]
    #[must_use]
    pub fn wrap_boxed(
        cause: Box<dyn StdError + Send + Sync + 'static>,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        let message = message.into();
        match cause.downcast::<Error>() {
            Ok(native) => native.open_layer(Marker::Wrap(message)),
            Err(foreign) => Self::from_marker(
                Marker::OuterWrap(message, Foreign::from_boxed(foreign)),
                capture_location(),
            ),
        }
    }

    /// Like [`just`](Self::just), for a cause that is already boxed.
    #[track_caller]
    #[must_use]
    pub fn just_boxed(cause: Box<dyn StdError + Send + Sync + 'static>) -> Self {
        match cause.downcast::<Error>() {
            Ok(native) => native.open_layer(Marker::Just),
            Err(foreign) => Self::from_marker(
                Marker::OuterJust(Foreign::from_boxed(foreign)),
                capture_location(),
            ),
        }
    }

    #[track_caller]
    fn open_layer(mut self, marker: Marker) -> Self {
        self.raw.open_layer(marker, capture_location());
        self.prefix.clear();
        self
    }

    /// Adds an attribute of any supported kind to the current layer.
    ///
    /// The per-kind methods below are shorthands for this one.
    #[must_use]
    pub fn attr(mut self, name: impl Into<Cow<'static, str>>, value: impl Into<Value>) -> Self {
        let name = annotate::prefixed_name(&self.prefix, name.into(), self.separator);
        self.raw.push_attr(Attr::new(name, value));
        self
    }

    annotation_methods!();

    /// Prefixes the names of attributes added after this call.
    ///
    /// Prefixes nest and are cleared when the next layer is opened.
    ///
    /// ```
    /// use errtrail::Error;
    ///
    /// let err = Error::new("boom").prefix("db").prefix("pool").u32("size", 4);
    /// assert_eq!(err.flat().to_string(), "db-pool-size=4");
    /// ```
    #[must_use]
    pub fn prefix(mut self, segment: &str) -> Self {
        if !segment.is_empty() {
            self.separator = Config::current().separator();
            annotate::push_prefix(&mut self.prefix, segment, self.separator);
        }
        self
    }

    /// Merges the attributes of `context` into the current layer, applying
    /// the current prefix.
    ///
    /// `context` is only read, so one bundle can be merged into any number of
    /// errors.
    #[must_use]
    pub fn with_ctx(mut self, context: &Context) -> Self {
        let (prefix, separator) = (&self.prefix, self.separator);
        self.raw
            .extend_attrs(context.attrs().iter().map(|attr| attr.prefixed(prefix, separator)));
        self
    }

    /// Replays the layers and attributes of this error, oldest first.
    ///
    /// When the chain was started from a foreign error that itself contains an
    /// [`Error`], that inner error is delivered first, so the consumer sees
    /// every layer in the order it was added.
    pub fn deliver<'a, C: Consumer<'a> + ?Sized>(&'a self, consumer: &mut C) {
        for layer in self.raw.layers() {
            let marker = layer.marker();
            if let Some(inner) = marker.foreign().and_then(|f| deliverer(f.as_error())) {
                inner.deliver(consumer);
            }

            let descriptor = match marker {
                Marker::New(text) => Layer::New(text),
                Marker::Wrap(text) | Marker::OuterWrap(text, _) => Layer::Wrap(text),
                Marker::Just | Marker::OuterJust(_) => Layer::Context,
            };
            consumer.begin_layer();
            consumer.describe_layer(layer.location(), descriptor);
            for attr in layer.attrs() {
                crate::consumer::record(consumer, attr);
            }
        }
    }

    /// Renders the attributes grouped by layer.
    pub fn tree(&self) -> Tree<'_> {
        let mut tree = Tree::new();
        self.deliver(&mut tree);
        tree
    }

    /// Renders the attributes as one flat sequence.
    pub fn flat(&self) -> Flat<'_> {
        let mut flat = Flat::new();
        self.deliver(&mut flat);
        flat
    }

    /// Renders the attributes with same-named values collected together.
    pub fn joined(&self) -> Joined<'_> {
        let mut joined = Joined::new();
        self.deliver(&mut joined);
        joined
    }

    /// Returns the foreign error this chain was started from, if any.
    pub fn foreign_cause(&self) -> Option<&(dyn StdError + 'static)> {
        self.raw.foreign().map(Foreign::as_error)
    }

    /// Returns the number of layers.
    pub fn layer_count(&self) -> usize {
        self.raw.layer_count()
    }

    /// Iterates over the layer texts, newest first. Context-only layers and
    /// empty messages are skipped.
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.raw
            .layers()
            .rev()
            .filter_map(|layer| layer.marker().text())
            .filter(|text| !text.is_empty())
    }

    /// Returns `true` if the first `depth` layers of `self` carry the same
    /// texts as all layers of `other`, over equal foreign errors.
    pub(crate) fn prefix_matches(&self, depth: usize, other: &Error) -> bool {
        let ours = self
            .raw
            .layers()
            .take(depth)
            .filter_map(|layer| layer.marker().text());
        let theirs = other.raw.layers().filter_map(|layer| layer.marker().text());
        if !ours.eq(theirs) {
            return false;
        }
        match (self.raw.foreign(), other.raw.foreign()) {
            (None, None) => true,
            (Some(a), Some(b)) => {
                a.ptr_eq(b)
                    || (cause_type(a).is_some_and(|id| cause_type(b) == Some(id))
                        && alloc::string::ToString::to_string(a)
                            == alloc::string::ToString::to_string(b))
            }
            _ => false,
        }
    }
}

/// Concrete type of an absorbed error, seen through [`Identified`]. Boxed
/// errors have none and only ever equal themselves.
fn cause_type(foreign: &Foreign) -> Option<TypeId> {
    match foreign.as_error().downcast_ref::<Identified>() {
        Some(identified) => Some(identified.inner_type_id()),
        None => foreign.type_id(),
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut separate = false;
        for text in self.messages() {
            if separate {
                f.write_str(": ")?;
            }
            f.write_str(text)?;
            separate = true;
        }
        if let Some(foreign) = self.raw.foreign() {
            if separate {
                f.write_str(": ")?;
            }
            fmt::Display::fmt(foreign, f)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)?;
        let tree = self.tree();
        if tree.has_details() {
            write!(f, "\n{tree:#}")?;
        }
        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.foreign_cause()
    }
}
