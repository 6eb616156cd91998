//! Reusable bundles of attributes.
//!
//! A [`Context`] is built once, independent of any error, and merged into
//! errors with [`Error::with_ctx`]. Merging only reads the bundle, so a shared
//! bundle can be merged from any number of threads.
//!
//! ```
//! use errtrail::{Context, Error};
//!
//! let request = Context::new().str("method", "GET").str("path", "/users/7");
//!
//! let err = Error::new("not found").prefix("http").with_ctx(&request).u16("status", 404);
//! assert_eq!(
//!     err.flat().to_string(),
//!     r#"http-method="GET" http-path="/users/7" http-status=404"#,
//! );
//! ```
//!
//! [`Error::with_ctx`]: crate::Error::with_ctx

use alloc::{borrow::Cow, string::String, vec::Vec};

use errtrail_internals::{Attr, Value};

use crate::{annotate, config::Config};

/// An immutable-once-shared bundle of attributes.
///
/// Building takes the bundle by value, like annotating an
/// [`Error`](crate::Error). The same per-kind methods and
/// [`prefix`](Self::prefix) are available.
#[derive(Clone, Debug, Default)]
pub struct Context {
    attrs: Vec<Attr>,
    prefix: String,
    /// Separator configured when the prefix was last extended.
    separator: &'static str,
}

impl Context {
    /// Creates an empty bundle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a bundle holding a copy of the attributes of `other`.
    ///
    /// The prefix of `other` is not carried over.
    #[must_use]
    pub fn from_ctx(other: &Context) -> Self {
        Self {
            attrs: other.attrs.clone(),
            prefix: String::new(),
            separator: "",
        }
    }

    /// Adds an attribute of any supported kind.
    #[must_use]
    pub fn attr(mut self, name: impl Into<Cow<'static, str>>, value: impl Into<Value>) -> Self {
        let name = annotate::prefixed_name(&self.prefix, name.into(), self.separator);
        self.attrs.push(Attr::new(name, value));
        self
    }

    annotation_methods!();

    /// Prefixes the names of attributes added after this call.
    #[must_use]
    pub fn prefix(mut self, segment: &str) -> Self {
        if !segment.is_empty() {
            self.separator = Config::current().separator();
            annotate::push_prefix(&mut self.prefix, segment, self.separator);
        }
        self
    }

    /// Merges the attributes of `other`, applying the current prefix.
    #[must_use]
    pub fn with_ctx(mut self, other: &Context) -> Self {
        let (prefix, separator) = (&self.prefix, self.separator);
        self.attrs
            .extend(other.attrs.iter().map(|attr| attr.prefixed(prefix, separator)));
        self
    }

    /// Returns the attributes in insertion order.
    pub fn attrs(&self) -> &[Attr] {
        &self.attrs
    }

    /// Returns the number of attributes.
    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    /// Returns `true` if the bundle holds no attributes.
    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;
    use crate::Error;

    static_assertions::assert_impl_all!(Context: Send, Sync, Clone);

    #[test]
    fn test_merge_is_read_only() {
        let ctx = Context::new().i32("a", 1).str("b", "two");
        let first = Error::new("first").with_ctx(&ctx);
        let second = Error::new("second").prefix("p").with_ctx(&ctx);
        assert_eq!(ctx.len(), 2);
        assert_eq!(ctx.attrs()[0].name(), "a");
        assert_eq!(first.flat().to_string(), r#"a=1 b="two""#);
        assert_eq!(second.flat().to_string(), r#"p-a=1 p-b="two""#);
    }

    #[test]
    fn test_nested_prefixes() {
        let inner = Context::new().i32("b", 2);
        let outer = Context::new()
            .prefix("")
            .prefix("context")
            .with_ctx(&inner)
            .prefix("more")
            .i32("c", 3);
        let names: Vec<_> = outer.attrs().iter().map(Attr::name).collect();
        assert_eq!(names, ["context-b", "context-more-c"]);
    }

    #[test]
    fn test_from_ctx_copies() {
        let base = Context::new().prefix("x").bool("flag", true);
        let copy = Context::from_ctx(&base).u8("n", 1);
        assert_eq!(base.len(), 1);
        assert_eq!(copy.len(), 2);
        assert_eq!(copy.attrs()[1].name(), "n");
        assert!(Context::new().is_empty());
    }
}
