//! Tagged attribute values.
//!
//! A [`Value`] is the kind tag and the payload of one attribute. Numeric and
//! boolean kinds are stored inline so that annotating an error with a number
//! never allocates. Strings borrow when they are `'static` and own otherwise.
//! Anything else is kept behind a [`triomphe::Arc`] so that cloning a bundle
//! of attributes only bumps reference counts.

use alloc::{borrow::Cow, string::String};
use core::{any::Any, fmt};

use triomphe::Arc;
use unsize::CoerceUnsize;

/// Object-safe bound for opaque attribute values.
///
/// Implemented for every `Debug + Send + Sync + 'static` type. Consumers that
/// know what to expect can get the concrete value back with
/// [`downcast_ref`](Self::downcast_ref).
pub trait AnyValue: Any + fmt::Debug + Send + Sync {}

impl<T: Any + fmt::Debug + Send + Sync> AnyValue for T {}

impl dyn AnyValue {
    /// Returns `true` if the stored value is of type `T`.
    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        (self as &dyn Any).is::<T>()
    }

    /// Returns a reference to the stored value if it is of type `T`.
    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        (self as &dyn Any).downcast_ref::<T>()
    }
}

/// The payload of an attribute, tagged by kind.
#[derive(Clone, Debug)]
pub enum Value {
    /// A boolean.
    Bool(bool),
    /// A pointer-sized signed integer.
    Isize(isize),
    /// An 8-bit signed integer.
    I8(i8),
    /// A 16-bit signed integer.
    I16(i16),
    /// A 32-bit signed integer.
    I32(i32),
    /// A 64-bit signed integer.
    I64(i64),
    /// A pointer-sized unsigned integer.
    Usize(usize),
    /// An 8-bit unsigned integer.
    U8(u8),
    /// A 16-bit unsigned integer.
    U16(u16),
    /// A 32-bit unsigned integer.
    U32(u32),
    /// A 64-bit unsigned integer.
    U64(u64),
    /// A 32-bit float.
    F32(f32),
    /// A 64-bit float.
    F64(f64),
    /// A string.
    Str(Cow<'static, str>),
    /// Any other value.
    Any(Arc<dyn AnyValue>),
}

impl Value {
    /// Wraps an arbitrary value as an opaque attribute value.
    pub fn any<T: AnyValue>(value: T) -> Self {
        Value::Any(Arc::new(value).unsize(unsize::Coercion!(to dyn AnyValue)))
    }

    /// Returns the string payload if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the opaque payload if this is an opaque value.
    pub fn as_any(&self) -> Option<&dyn AnyValue> {
        match self {
            Value::Any(v) => Some(&**v),
            _ => None,
        }
    }
}

/// Implements `From<$ty> for Value` for inline scalar kinds.
macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                #[inline]
                fn from(value: $ty) -> Self {
                    Value::$variant(value)
                }
            }
        )*
    };
}

value_from! {
    bool => Bool,
    isize => Isize,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    usize => Usize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
}

impl From<&'static str> for Value {
    #[inline]
    fn from(value: &'static str) -> Self {
        Value::Str(Cow::Borrowed(value))
    }
}

impl From<String> for Value {
    #[inline]
    fn from(value: String) -> Self {
        Value::Str(Cow::Owned(value))
    }
}

impl From<Cow<'static, str>> for Value {
    #[inline]
    fn from(value: Cow<'static, str>) -> Self {
        Value::Str(value)
    }
}

/// A named attribute value.
#[derive(Clone, Debug)]
pub struct Attr {
    /// Attribute name, including any prefix applied when it was added.
    name: Cow<'static, str>,
    /// Attribute payload.
    value: Value,
}

impl Attr {
    /// Creates a new attribute.
    #[inline]
    pub fn new(name: impl Into<Cow<'static, str>>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Returns the attribute name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the attribute value.
    #[inline]
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Returns a copy of this attribute with its name prefixed by `prefix`
    /// and `separator`. An empty prefix leaves the name untouched.
    pub fn prefixed(&self, prefix: &str, separator: &str) -> Self {
        if prefix.is_empty() {
            return self.clone();
        }

        let mut name = String::with_capacity(prefix.len() + separator.len() + self.name.len());
        name.push_str(prefix);
        name.push_str(separator);
        name.push_str(&self.name);
        Self {
            name: Cow::Owned(name),
            value: self.value.clone(),
        }
    }
}
