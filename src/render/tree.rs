use alloc::vec::Vec;
use core::fmt;

use errtrail_internals::{AnyValue, Location};

use super::{Field, FieldValue, record_as_fields, write_fields};
use crate::{Consumer, Layer};

/// The fields one layer contributed.
#[derive(Clone, Debug)]
pub struct Group<'a> {
    layer: Layer<'a>,
    location: Option<&'a Location>,
    fields: Vec<Field<'a>>,
}

impl<'a> Group<'a> {
    /// Returns the layer descriptor.
    pub fn layer(&self) -> Layer<'a> {
        self.layer
    }

    /// Returns where the layer was opened, if captured.
    pub fn location(&self) -> Option<&'a Location> {
        self.location
    }

    /// Returns the fields of the layer, in insertion order.
    pub fn fields(&self) -> &[Field<'a>] {
        &self.fields
    }
}

/// Grouped rendering: one [`Group`] per layer, oldest first.
///
/// The plain `Display` form fits on one line:
///
/// ```
/// use errtrail::Error;
///
/// let err = Error::wrap(Error::new("m").i32("x", 1), "w").str("y", "z");
/// assert_eq!(err.tree().to_string(), r#"[NEW: m] x=1 [WRAP: w] y="z""#);
/// ```
///
/// The alternate form (`{:#}`) puts each group and each field on its own
/// line. Captured locations appear as an `@location` entry at the top of their
/// group.
#[derive(Clone, Debug, Default)]
pub struct Tree<'a> {
    groups: Vec<Group<'a>>,
}

impl<'a> Tree<'a> {
    /// Creates an empty tree, ready to be delivered to.
    pub fn new() -> Self {
        Self { groups: Vec::new() }
    }

    /// Returns the groups, oldest layer first.
    pub fn groups(&self) -> &[Group<'a>] {
        &self.groups
    }

    /// Returns `true` if any group has fields or a location.
    pub fn has_details(&self) -> bool {
        self.groups
            .iter()
            .any(|group| group.location.is_some() || !group.fields.is_empty())
    }

    fn push_field(&mut self, field: Field<'a>) {
        if let Some(group) = self.groups.last_mut() {
            group.fields.push(field);
        }
    }
}

impl<'a> Consumer<'a> for Tree<'a> {
    fn describe_layer(&mut self, location: Option<&'a Location>, layer: Layer<'a>) {
        self.groups.push(Group {
            layer,
            location,
            fields: Vec::new(),
        });
    }

    record_as_fields!();
}

impl fmt::Display for Tree<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            for (index, group) in self.groups.iter().enumerate() {
                if index > 0 {
                    writeln!(f)?;
                }
                write!(f, "{}", group.layer)?;
                if let Some(location) = group.location {
                    write!(f, "\n    @location: {location}")?;
                }
                for field in &group.fields {
                    write!(f, "\n    {}: {}", field.name, field.value)?;
                }
            }
            return Ok(());
        }

        for (index, group) in self.groups.iter().enumerate() {
            if index > 0 {
                f.write_str(" ")?;
            }
            write!(f, "[{}]", group.layer)?;
            if let Some(location) = group.location {
                write!(f, " @location={location}")?;
            }
            if !group.fields.is_empty() {
                f.write_str(" ")?;
                write_fields(f, &group.fields)?;
            }
        }
        Ok(())
    }
}
