use alloc::vec::Vec;
use core::fmt;

use errtrail_internals::{AnyValue, Location};

use super::{Field, FieldValue, record_as_fields, write_fields};
use crate::{Consumer, Layer};

/// Flat rendering: every field of every layer in one sequence.
///
/// Same-named fields from different layers are all kept, in delivery order.
/// Captured locations are collected separately and keyed by the layer that
/// opened them.
///
/// ```
/// use errtrail::Error;
///
/// let err = Error::wrap(Error::new("m").i32("x", 1), "w").i32("x", 2);
/// assert_eq!(err.flat().to_string(), "x=1 x=2");
/// ```
#[derive(Clone, Debug, Default)]
pub struct Flat<'a> {
    fields: Vec<Field<'a>>,
    locations: Vec<(Layer<'a>, &'a Location)>,
}

impl<'a> Flat<'a> {
    /// Creates an empty flat rendering, ready to be delivered to.
    pub fn new() -> Self {
        Self {
            fields: Vec::new(),
            locations: Vec::new(),
        }
    }

    /// Returns all fields, oldest layer first.
    pub fn fields(&self) -> &[Field<'a>] {
        &self.fields
    }

    /// Returns the captured locations with the layer that each belongs to.
    pub fn locations(&self) -> &[(Layer<'a>, &'a Location)] {
        &self.locations
    }

    fn push_field(&mut self, field: Field<'a>) {
        self.fields.push(field);
    }
}

impl<'a> Consumer<'a> for Flat<'a> {
    fn describe_layer(&mut self, location: Option<&'a Location>, layer: Layer<'a>) {
        if let Some(location) = location {
            self.locations.push((layer, location));
        }
    }

    record_as_fields!();
}

/// `name=value` pairs, then `@locations{LAYER=file:line ...}` if any
/// location was captured.
impl fmt::Display for Flat<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_fields(f, &self.fields)?;
        if self.locations.is_empty() {
            return Ok(());
        }

        if !self.fields.is_empty() {
            f.write_str(" ")?;
        }
        f.write_str("@locations{")?;
        for (index, (layer, location)) in self.locations.iter().enumerate() {
            if index > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{layer}={location}")?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;
    use crate::Error;

    #[test]
    fn test_keeps_duplicates() {
        let err = Error::wrap(Error::new("m").str("k", "a"), "w").str("k", "b");
        let flat = err.flat();
        assert_eq!(flat.fields().len(), 2);
        assert_eq!(flat.fields()[0].value.as_str(), Some("a"));
        assert_eq!(flat.fields()[1].value.as_str(), Some("b"));
        assert!(flat.locations().is_empty());
        assert_eq!(flat.to_string(), r#"k="a" k="b""#);
    }

    #[test]
    fn test_location_list() {
        let here = Location {
            file: "src/app.rs",
            line: 12,
            column: 1,
        };
        let mut flat = Flat::new();
        flat.describe_layer(Some(&here), Layer::New("m"));
        flat.record_i64("x", 1);
        flat.describe_layer(None, Layer::Context);
        assert_eq!(flat.to_string(), "x=1 @locations{NEW: m=src/app.rs:12}");
    }
}
