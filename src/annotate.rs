//! Typed annotation methods shared by [`Error`](crate::Error) and
//! [`Context`](crate::Context).

use alloc::{borrow::Cow, string::String, vec::Vec};

use errtrail_internals::Value;
use unicode_general_category::{GeneralCategory, get_general_category};

/// Generates the per-kind annotation methods.
///
/// The implementing type must provide an inherent
/// `fn attr(self, name: impl Into<Cow<'static, str>>, value: impl Into<Value>) -> Self`.
macro_rules! annotation_methods {
    () => {
        /// Adds a boolean attribute.
        #[must_use]
        pub fn bool(self, name: impl Into<Cow<'static, str>>, value: bool) -> Self {
            self.attr(name, value)
        }

        /// Adds a pointer-sized signed integer attribute.
        #[must_use]
        pub fn int(self, name: impl Into<Cow<'static, str>>, value: isize) -> Self {
            self.attr(name, value)
        }

        /// Adds an 8-bit signed integer attribute.
        #[must_use]
        pub fn i8(self, name: impl Into<Cow<'static, str>>, value: i8) -> Self {
            self.attr(name, value)
        }

        /// Adds a 16-bit signed integer attribute.
        #[must_use]
        pub fn i16(self, name: impl Into<Cow<'static, str>>, value: i16) -> Self {
            self.attr(name, value)
        }

        /// Adds a 32-bit signed integer attribute.
        #[must_use]
        pub fn i32(self, name: impl Into<Cow<'static, str>>, value: i32) -> Self {
            self.attr(name, value)
        }

        /// Adds a 64-bit signed integer attribute.
        #[must_use]
        pub fn i64(self, name: impl Into<Cow<'static, str>>, value: i64) -> Self {
            self.attr(name, value)
        }

        /// Adds a pointer-sized unsigned integer attribute.
        #[must_use]
        pub fn uint(self, name: impl Into<Cow<'static, str>>, value: usize) -> Self {
            self.attr(name, value)
        }

        /// Adds an 8-bit unsigned integer attribute.
        #[must_use]
        pub fn u8(self, name: impl Into<Cow<'static, str>>, value: u8) -> Self {
            self.attr(name, value)
        }

        /// Adds a 16-bit unsigned integer attribute.
        #[must_use]
        pub fn u16(self, name: impl Into<Cow<'static, str>>, value: u16) -> Self {
            self.attr(name, value)
        }

        /// Adds a 32-bit unsigned integer attribute.
        #[must_use]
        pub fn u32(self, name: impl Into<Cow<'static, str>>, value: u32) -> Self {
            self.attr(name, value)
        }

        /// Adds a 64-bit unsigned integer attribute.
        #[must_use]
        pub fn u64(self, name: impl Into<Cow<'static, str>>, value: u64) -> Self {
            self.attr(name, value)
        }

        /// Adds a 32-bit float attribute.
        #[must_use]
        pub fn f32(self, name: impl Into<Cow<'static, str>>, value: f32) -> Self {
            self.attr(name, value)
        }

        /// Adds a 64-bit float attribute.
        #[must_use]
        pub fn f64(self, name: impl Into<Cow<'static, str>>, value: f64) -> Self {
            self.attr(name, value)
        }

        /// Adds a string attribute.
        ///
        /// `'static` strings are stored without copying.
        #[must_use]
        pub fn str(
            self,
            name: impl Into<Cow<'static, str>>,
            value: impl Into<Cow<'static, str>>,
        ) -> Self {
            let value: Cow<'static, str> = value.into();
            self.attr(name, value)
        }

        /// Adds a string attribute rendered from a [`Display`](core::fmt::Display)
        /// value.
        #[must_use]
        pub fn display(
            self,
            name: impl Into<Cow<'static, str>>,
            value: &(impl core::fmt::Display + ?Sized),
        ) -> Self {
            self.attr(name, alloc::string::ToString::to_string(value))
        }

        /// Adds a list of strings as an opaque `Vec<String>` attribute.
        #[must_use]
        pub fn strs<S: Into<alloc::string::String>>(
            self,
            name: impl Into<Cow<'static, str>>,
            values: impl IntoIterator<Item = S>,
        ) -> Self {
            let values: alloc::vec::Vec<alloc::string::String> =
                values.into_iter().map(Into::into).collect();
            self.attr(name, Value::any(values))
        }

        /// Adds a byte payload.
        ///
        /// Payloads that are valid UTF-8 made only of printable characters and
        /// whitespace are stored as strings. Anything else is stored as an
        /// opaque `Vec<u8>`. The check scans the whole payload, so keep it off
        /// hot paths.
        #[must_use]
        pub fn bytes(self, name: impl Into<Cow<'static, str>>, value: &[u8]) -> Self {
            self.attr(name, crate::annotate::classify_bytes(value))
        }

        /// Adds the type name of `value` as a string attribute.
        #[must_use]
        pub fn type_name<T: ?Sized>(self, name: impl Into<Cow<'static, str>>, value: &T) -> Self {
            let _ = value;
            self.attr(name, core::any::type_name::<T>())
        }

        /// Adds an arbitrary value as an opaque attribute.
        ///
        /// Consumers receive it through
        /// [`Consumer::record_any`](crate::Consumer::record_any) and can
        /// downcast it with [`AnyValue::downcast_ref`](crate::AnyValue).
        #[must_use]
        pub fn any<T>(self, name: impl Into<Cow<'static, str>>, value: T) -> Self
        where
            T: core::fmt::Debug + Send + Sync + 'static,
        {
            self.attr(name, Value::any(value))
        }
    };
}

/// Graphic characters and whitespace. Control, format, private-use and
/// unassigned code points are not, nor is the replacement character.
fn is_printable_or_space(c: char) -> bool {
    if c == char::REPLACEMENT_CHARACTER {
        return false;
    }
    c.is_whitespace()
        || !matches!(
            get_general_category(c),
            GeneralCategory::Control
                | GeneralCategory::Format
                | GeneralCategory::PrivateUse
                | GeneralCategory::Surrogate
                | GeneralCategory::Unassigned
        )
}

/// Stores printable UTF-8 as a string and everything else as opaque bytes.
pub(crate) fn classify_bytes(bytes: &[u8]) -> Value {
    match core::str::from_utf8(bytes) {
        Ok(text) if text.chars().all(is_printable_or_space) => {
            Value::Str(Cow::Owned(String::from(text)))
        }
        _ => Value::any(Vec::from(bytes)),
    }
}

/// Appends `segment` to an existing prefix.
///
/// Empty segments leave the prefix unchanged.
pub(crate) fn push_prefix(prefix: &mut String, segment: &str, separator: &str) {
    if segment.is_empty() {
        return;
    }
    if !prefix.is_empty() {
        prefix.push_str(separator);
    }
    prefix.push_str(segment);
}

/// Applies `prefix` to an attribute name.
pub(crate) fn prefixed_name(
    prefix: &str,
    name: Cow<'static, str>,
    separator: &str,
) -> Cow<'static, str> {
    if prefix.is_empty() {
        return name;
    }
    let mut full = String::with_capacity(prefix.len() + separator.len() + name.len());
    full.push_str(prefix);
    full.push_str(separator);
    full.push_str(&name);
    Cow::Owned(full)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_printable() {
        assert_eq!(classify_bytes(b"abc").as_str(), Some("abc"));
        assert_eq!(classify_bytes(b"line\n\ttab").as_str(), Some("line\n\ttab"));
        assert_eq!(classify_bytes("привет".as_bytes()).as_str(), Some("привет"));
        let spaced = "a\u{a0}b\u{3000}c\u{85}";
        assert_eq!(classify_bytes(spaced.as_bytes()).as_str(), Some(spaced));
        assert_eq!(classify_bytes("✓ ok".as_bytes()).as_str(), Some("✓ ok"));
    }

    #[test]
    fn test_classify_opaque() {
        let value = classify_bytes(&[1, 2, 3]);
        assert!(value.as_str().is_none());
        let any = value.as_any().unwrap();
        assert_eq!(any.downcast_ref::<Vec<u8>>(), Some(&alloc::vec![1u8, 2, 3]));

        assert!(classify_bytes(&[0xff, 0xfe]).as_any().is_some());

        for text in ["\u{200B}", "a\u{AD}b", "\u{E000}", "\u{FFFD}", "\u{FEFF}x", "\u{378}"] {
            let value = classify_bytes(text.as_bytes());
            assert!(value.as_str().is_none(), "{text:?} stored as a string");
            assert_eq!(
                value.as_any().and_then(|any| any.downcast_ref::<Vec<u8>>()),
                Some(&Vec::from(text.as_bytes()))
            );
        }
    }

    #[test]
    fn test_push_prefix() {
        let mut prefix = String::new();
        push_prefix(&mut prefix, "", "-");
        assert_eq!(prefix, "");
        push_prefix(&mut prefix, "context", "-");
        assert_eq!(prefix, "context");
        push_prefix(&mut prefix, "inner", "-");
        assert_eq!(prefix, "context-inner");
    }

    #[test]
    fn test_prefixed_name() {
        assert_eq!(prefixed_name("", Cow::Borrowed("b"), "-"), "b");
        assert_eq!(prefixed_name("context", Cow::Borrowed("b"), "-"), "context-b");
        assert_eq!(prefixed_name("a", Cow::Borrowed("b"), "."), "a.b");
    }
}
