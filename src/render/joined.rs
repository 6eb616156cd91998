use alloc::vec::Vec;
use core::fmt;

use errtrail_internals::AnyValue;
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use super::{Field, FieldValue, record_as_fields};
use crate::Consumer;

/// Rendering that collects same-named fields into one entry.
///
/// Names keep the order in which they were first seen, and the values of each
/// name keep delivery order. A name seen once displays as a scalar, a repeated
/// name as a list.
///
/// ```
/// use errtrail::Error;
///
/// let err = Error::wrap(Error::new("m").str("k", "a").i32("n", 1), "w").str("k", "b");
/// let joined = err.joined();
/// assert_eq!(joined.get("k").map(|values| values.len()), Some(2));
/// assert_eq!(joined.to_string(), r#"k=["a", "b"] n=1"#);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Joined<'a> {
    fields: IndexMap<&'a str, Vec<FieldValue<'a>>, FxBuildHasher>,
}

impl<'a> Joined<'a> {
    /// Creates an empty joined rendering, ready to be delivered to.
    pub fn new() -> Self {
        Self {
            fields: IndexMap::with_hasher(FxBuildHasher),
        }
    }

    /// Returns every value delivered under `name`.
    pub fn get(&self, name: &str) -> Option<&[FieldValue<'a>]> {
        self.fields.get(name).map(Vec::as_slice)
    }

    /// Iterates over the names and their values, in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &[FieldValue<'a>])> {
        self.fields
            .iter()
            .map(|(name, values)| (*name, values.as_slice()))
    }

    /// Returns the number of distinct names.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if nothing was delivered.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn push_field(&mut self, field: Field<'a>) {
        self.fields.entry(field.name).or_default().push(field.value);
    }
}

impl<'a> Consumer<'a> for Joined<'a> {
    record_as_fields!();
}

impl fmt::Display for Joined<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, (name, values)) in self.fields.iter().enumerate() {
            if index > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{name}=")?;
            match values.as_slice() {
                [single] => write!(f, "{single}")?,
                values => {
                    f.write_str("[")?;
                    for (index, value) in values.iter().enumerate() {
                        if index > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{value}")?;
                    }
                    f.write_str("]")?;
                }
            }
        }
        Ok(())
    }
}
