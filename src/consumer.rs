//! The delivery protocol: how accumulated context leaves an [`Error`].
//!
//! [`Error::deliver`] walks the layers of a chain from the oldest to the
//! newest. For every layer it calls [`Consumer::begin_layer`], then
//! [`Consumer::describe_layer`], then one `record_*` method per attribute in
//! insertion order. Delivery only reads the chain. It can be repeated and run
//! from several threads at once.
//!
//! Only the widest sink of each numeric family is required. The narrower ones
//! forward to it by default, the same way [`tracing`'s `Visit`] forwards to
//! `record_debug`.
//!
//! # Examples
//!
//! A consumer that counts attributes per layer:
//!
//! ```
//! use errtrail::{AnyValue, Consumer, Error, Layer, Location};
//!
//! #[derive(Default)]
//! struct Counter(Vec<(String, usize)>);
//!
//! impl Counter {
//!     fn bump(&mut self) {
//!         if let Some((_, count)) = self.0.last_mut() {
//!             *count += 1;
//!         }
//!     }
//! }
//!
//! impl<'a> Consumer<'a> for Counter {
//!     fn describe_layer(&mut self, _: Option<&'a Location>, layer: Layer<'a>) {
//!         self.0.push((layer.to_string(), 0));
//!     }
//!     fn record_bool(&mut self, _: &'a str, _: bool) { self.bump() }
//!     fn record_i64(&mut self, _: &'a str, _: i64) { self.bump() }
//!     fn record_u64(&mut self, _: &'a str, _: u64) { self.bump() }
//!     fn record_f64(&mut self, _: &'a str, _: f64) { self.bump() }
//!     fn record_str(&mut self, _: &'a str, _: &'a str) { self.bump() }
//!     fn record_any(&mut self, _: &'a str, _: &'a dyn AnyValue) { self.bump() }
//! }
//!
//! let err = Error::wrap(Error::new("m").i8("x", 1), "w").str("y", "z").u16("z", 2);
//! let mut counter = Counter::default();
//! err.deliver(&mut counter);
//! assert_eq!(counter.0, [("NEW: m".to_string(), 1), ("WRAP: w".to_string(), 2)]);
//! ```
//!
//! [`Error`]: crate::Error
//! [`Error::deliver`]: crate::Error::deliver
//! [`tracing`'s `Visit`]: https://docs.rs/tracing/latest/tracing/field/trait.Visit.html

use core::fmt;

use errtrail_internals::{AnyValue, Attr, Location, Value};

/// Describes what opened a layer, as seen by a [`Consumer`].
///
/// Displays as `NEW: text`, `WRAP: text` or `CTX`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Layer<'a> {
    /// The layer that started the chain.
    New(&'a str),
    /// A layer that added a message on top of a cause.
    Wrap(&'a str),
    /// A context-only layer.
    Context,
}

impl<'a> Layer<'a> {
    /// Returns the message of the layer, if it has one.
    pub fn text(self) -> Option<&'a str> {
        match self {
            Layer::New(text) | Layer::Wrap(text) => Some(text),
            Layer::Context => None,
        }
    }
}

impl fmt::Display for Layer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layer::New(text) => write!(f, "NEW: {text}"),
            Layer::Wrap(text) => write!(f, "WRAP: {text}"),
            Layer::Context => f.write_str("CTX"),
        }
    }
}

/// Receiver of delivered context.
///
/// Borrowed names and values live as long as the delivered error, so a
/// consumer may keep them without copying.
pub trait Consumer<'a> {
    /// Called before each layer is described.
    fn begin_layer(&mut self) {}

    /// Describes the layer whose attributes follow.
    fn describe_layer(&mut self, location: Option<&'a Location>, layer: Layer<'a>) {
        let _ = (location, layer);
    }

    /// Receives a boolean attribute.
    fn record_bool(&mut self, name: &'a str, value: bool);

    /// Receives a 64-bit signed integer attribute.
    fn record_i64(&mut self, name: &'a str, value: i64);

    /// Receives a 64-bit unsigned integer attribute.
    fn record_u64(&mut self, name: &'a str, value: u64);

    /// Receives a 64-bit float attribute.
    fn record_f64(&mut self, name: &'a str, value: f64);

    /// Receives a string attribute.
    fn record_str(&mut self, name: &'a str, value: &'a str);

    /// Receives an opaque attribute.
    fn record_any(&mut self, name: &'a str, value: &'a dyn AnyValue);

    /// Receives a pointer-sized signed integer attribute.
    fn record_isize(&mut self, name: &'a str, value: isize) {
        self.record_i64(name, value as i64);
    }

    /// Receives an 8-bit signed integer attribute.
    fn record_i8(&mut self, name: &'a str, value: i8) {
        self.record_i64(name, value.into());
    }

    /// Receives a 16-bit signed integer attribute.
    fn record_i16(&mut self, name: &'a str, value: i16) {
        self.record_i64(name, value.into());
    }

    /// Receives a 32-bit signed integer attribute.
    fn record_i32(&mut self, name: &'a str, value: i32) {
        self.record_i64(name, value.into());
    }

    /// Receives a pointer-sized unsigned integer attribute.
    fn record_usize(&mut self, name: &'a str, value: usize) {
        self.record_u64(name, value as u64);
    }

    /// Receives an 8-bit unsigned integer attribute.
    fn record_u8(&mut self, name: &'a str, value: u8) {
        self.record_u64(name, value.into());
    }

    /// Receives a 16-bit unsigned integer attribute.
    fn record_u16(&mut self, name: &'a str, value: u16) {
        self.record_u64(name, value.into());
    }

    /// Receives a 32-bit unsigned integer attribute.
    fn record_u32(&mut self, name: &'a str, value: u32) {
        self.record_u64(name, value.into());
    }

    /// Receives a 32-bit float attribute.
    fn record_f32(&mut self, name: &'a str, value: f32) {
        self.record_f64(name, value.into());
    }
}

pub(crate) fn record<'a, C: Consumer<'a> + ?Sized>(consumer: &mut C, attr: &'a Attr) {
    let name = attr.name();
    match attr.value() {
        Value::Bool(v) => consumer.record_bool(name, *v),
        Value::Isize(v) => consumer.record_isize(name, *v),
        Value::I8(v) => consumer.record_i8(name, *v),
        Value::I16(v) => consumer.record_i16(name, *v),
        Value::I32(v) => consumer.record_i32(name, *v),
        Value::I64(v) => consumer.record_i64(name, *v),
        Value::Usize(v) => consumer.record_usize(name, *v),
        Value::U8(v) => consumer.record_u8(name, *v),
        Value::U16(v) => consumer.record_u16(name, *v),
        Value::U32(v) => consumer.record_u32(name, *v),
        Value::U64(v) => consumer.record_u64(name, *v),
        Value::F32(v) => consumer.record_f32(name, *v),
        Value::F64(v) => consumer.record_f64(name, *v),
        Value::Str(v) => consumer.record_str(name, v),
        Value::Any(v) => consumer.record_any(name, &**v),
    }
}
