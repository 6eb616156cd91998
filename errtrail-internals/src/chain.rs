//! The raw layer and attribute buffer behind every chain node.
//!
//! A [`RawChain`] keeps two vectors: one record per layer and one flat vector
//! of attributes. A layer record stores the index of its first attribute, so
//! the attributes of layer `i` are `attrs[start_i..start_{i+1}]`. Appending an
//! attribute always targets the most recently opened layer.
//!
//! Keeping markers out of the attribute vector means rendering the text of a
//! chain touches only the layer records.

use alloc::vec::Vec;

use crate::{
    layer::{Foreign, Location, Marker},
    value::Attr,
};

/// Record of one layer.
#[derive(Clone, Debug)]
struct LayerRecord {
    /// What opened the layer.
    marker: Marker,
    /// Where the layer was opened, if captured.
    location: Option<Location>,
    /// Index of the first attribute of this layer.
    start: usize,
}

/// Layer records plus the flat attribute buffer they partition.
///
/// A chain always has at least one layer.
#[derive(Clone, Debug)]
pub struct RawChain {
    /// Layers in the order they were opened, oldest first.
    layers: Vec<LayerRecord>,
    /// Attributes of all layers, in insertion order.
    attrs: Vec<Attr>,
}

impl RawChain {
    /// Creates a chain with a single layer.
    pub fn new(marker: Marker, location: Option<Location>) -> Self {
        let mut layers = Vec::with_capacity(2);
        layers.push(LayerRecord {
            marker,
            location,
            start: 0,
        });
        Self {
            layers,
            attrs: Vec::new(),
        }
    }

    /// Opens a new layer on top of the existing ones.
    ///
    /// Outer markers may only open a chain. Passing one here is a bug in the
    /// caller.
    pub fn open_layer(&mut self, marker: Marker, location: Option<Location>) {
        debug_assert!(
            !marker.is_outer(),
            "outer markers may only open a chain"
        );
        self.layers.push(LayerRecord {
            marker,
            location,
            start: self.attrs.len(),
        });
    }

    /// Appends an attribute to the current layer.
    #[inline]
    pub fn push_attr(&mut self, attr: Attr) {
        self.attrs.push(attr);
    }

    /// Appends several attributes to the current layer.
    pub fn extend_attrs(&mut self, attrs: impl IntoIterator<Item = Attr>) {
        self.attrs.extend(attrs);
    }

    /// Returns the number of layers.
    #[inline]
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Returns the total number of attributes over all layers.
    #[inline]
    pub fn attr_count(&self) -> usize {
        self.attrs.len()
    }

    /// Returns the layer at `index`, oldest first.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn layer(&self, index: usize) -> LayerRef<'_> {
        let record = &self.layers[index];
        let end = self
            .layers
            .get(index + 1)
            .map_or(self.attrs.len(), |next| next.start);
        LayerRef {
            marker: &record.marker,
            location: record.location.as_ref(),
            attrs: &self.attrs[record.start..end],
        }
    }

    /// Iterates over the layers, oldest first.
    pub fn layers(&self) -> impl DoubleEndedIterator<Item = LayerRef<'_>> + ExactSizeIterator {
        (0..self.layers.len()).map(move |index| self.layer(index))
    }

    /// Returns the foreign error this chain was started from, if any.
    #[inline]
    pub fn foreign(&self) -> Option<&Foreign> {
        self.layers.first().and_then(|record| record.marker.foreign())
    }
}

/// Borrowed view of one layer of a [`RawChain`].
#[derive(Copy, Clone, Debug)]
pub struct LayerRef<'a> {
    /// What opened the layer.
    marker: &'a Marker,
    /// Where the layer was opened, if captured.
    location: Option<&'a Location>,
    /// Attributes of the layer.
    attrs: &'a [Attr],
}

impl<'a> LayerRef<'a> {
    /// Returns what opened the layer.
    #[inline]
    pub fn marker(self) -> &'a Marker {
        self.marker
    }

    /// Returns where the layer was opened, if captured.
    #[inline]
    pub fn location(self) -> Option<&'a Location> {
        self.location
    }

    /// Returns the attributes of the layer, in insertion order.
    #[inline]
    pub fn attrs(self) -> &'a [Attr] {
        self.attrs
    }
}
