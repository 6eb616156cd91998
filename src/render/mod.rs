//! Standard renderings of delivered context.
//!
//! All three are [`Consumer`](crate::Consumer)s that keep borrowed fields, so they are cheap to
//! build and live as long as the error they were delivered from.
//!
//! - [`Tree`]: one [`Group`] per layer, the debugging view
//! - [`Flat`]: every field in one sequence plus a trailing location list, the
//!   production view
//! - [`Joined`]: same-named fields collected into lists

use core::fmt;

use errtrail_internals::AnyValue;

pub use self::{
    flat::Flat,
    joined::Joined,
    tree::{Group, Tree},
};

/// A delivered value, widened to the largest kind of its family.
#[derive(Copy, Clone, Debug)]
pub enum FieldValue<'a> {
    /// A boolean.
    Bool(bool),
    /// A signed integer of any width.
    Int(i64),
    /// An unsigned integer of any width.
    Uint(u64),
    /// A float of any width.
    Float(f64),
    /// A string.
    Str(&'a str),
    /// An opaque value.
    Any(&'a dyn AnyValue),
}

impl<'a> FieldValue<'a> {
    /// Returns the string if this is a string value.
    pub fn as_str(&self) -> Option<&'a str> {
        match *self {
            FieldValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the opaque value if this is one.
    pub fn as_any(&self) -> Option<&'a dyn AnyValue> {
        match *self {
            FieldValue::Any(v) => Some(v),
            _ => None,
        }
    }
}

/// Strings are quoted and opaque values use their `Debug` form.
impl fmt::Display for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Bool(v) => fmt::Display::fmt(v, f),
            FieldValue::Int(v) => fmt::Display::fmt(v, f),
            FieldValue::Uint(v) => fmt::Display::fmt(v, f),
            FieldValue::Float(v) => fmt::Display::fmt(v, f),
            FieldValue::Str(v) => fmt::Debug::fmt(v, f),
            FieldValue::Any(v) => fmt::Debug::fmt(v, f),
        }
    }
}

/// A named delivered value. Displays as `name=value`.
#[derive(Copy, Clone, Debug)]
pub struct Field<'a> {
    /// The attribute name, including any prefix.
    pub name: &'a str,
    /// The attribute value.
    pub value: FieldValue<'a>,
}

impl fmt::Display for Field<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

/// Implements the `record_*` half of [`Consumer`](crate::Consumer) on top of an inherent
/// `push_field(&mut self, Field<'a>)`.
macro_rules! record_as_fields {
    () => {
        fn record_bool(&mut self, name: &'a str, value: bool) {
            self.push_field(Field { name, value: FieldValue::Bool(value) });
        }

        fn record_i64(&mut self, name: &'a str, value: i64) {
            self.push_field(Field { name, value: FieldValue::Int(value) });
        }

        fn record_u64(&mut self, name: &'a str, value: u64) {
            self.push_field(Field { name, value: FieldValue::Uint(value) });
        }

        fn record_f64(&mut self, name: &'a str, value: f64) {
            self.push_field(Field { name, value: FieldValue::Float(value) });
        }

        fn record_str(&mut self, name: &'a str, value: &'a str) {
            self.push_field(Field { name, value: FieldValue::Str(value) });
        }

        fn record_any(&mut self, name: &'a str, value: &'a dyn AnyValue) {
            self.push_field(Field { name, value: FieldValue::Any(value) });
        }
    };
}
pub(crate) use record_as_fields;

mod flat;
mod joined;
mod tree;

/// Writes `fields` separated by single spaces.
fn write_fields(f: &mut fmt::Formatter<'_>, fields: &[Field<'_>]) -> fmt::Result {
    let mut separate = false;
    for field in fields {
        if separate {
            f.write_str(" ")?;
        }
        write!(f, "{field}")?;
        separate = true;
    }
    Ok(())
}
