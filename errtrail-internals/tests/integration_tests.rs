//! Integration tests for the errtrail-internals storage layer.
//!
//! - `test_value_*`: tagged values, opaque downcasts, sharing on clone
//! - `test_attr_*`: attribute naming and prefixing
//! - `test_foreign_*`: absorbing typed and boxed foreign errors
//! - `test_chain_*`: layer partitioning of the attribute buffer

use std::{borrow::Cow, error::Error, fmt, io};

use errtrail_internals::{AnyValue, Attr, Foreign, Location, Marker, RawChain, Value};

static_assertions::assert_impl_all!(Value: Send, Sync, Clone);
static_assertions::assert_impl_all!(Attr: Send, Sync, Clone);
static_assertions::assert_impl_all!(Foreign: Send, Sync, Clone);
static_assertions::assert_impl_all!(RawChain: Send, Sync, Clone);
static_assertions::assert_impl_all!(Location: Copy, Send, Sync);

#[derive(Debug, PartialEq)]
struct Payload {
    id: u32,
}

#[derive(Debug)]
struct Broken;

impl fmt::Display for Broken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "broken")
    }
}

impl Error for Broken {}

#[test]
fn test_value_any_downcast() {
    let value = Value::any(Payload { id: 7 });
    let any: &dyn AnyValue = value.as_any().unwrap();
    assert!(any.is::<Payload>());
    assert_eq!(any.downcast_ref::<Payload>(), Some(&Payload { id: 7 }));
    assert!(any.downcast_ref::<u32>().is_none());
    assert!(value.as_str().is_none());
}

#[test]
fn test_value_any_clone_shares() {
    let value = Value::any(vec![1u8, 2, 3]);
    let copy = value.clone();
    match (&value, &copy) {
        (Value::Any(a), Value::Any(b)) => assert!(triomphe::Arc::ptr_eq(a, b)),
        _ => panic!("expected opaque values"),
    }
}

#[test]
fn test_value_scalars_inline() {
    assert!(matches!(Value::from(1i8), Value::I8(1)));
    assert!(matches!(Value::from(2u64), Value::U64(2)));
    assert!(matches!(Value::from(true), Value::Bool(true)));
    assert!(matches!(Value::from(1.5f32), Value::F32(v) if v == 1.5));
    match Value::from("static") {
        Value::Str(Cow::Borrowed(s)) => assert_eq!(s, "static"),
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(Value::from(String::from("owned")).as_str(), Some("owned"));
}

#[test]
fn test_attr_prefixed() {
    let attr = Attr::new("b", 1i32);
    assert_eq!(attr.prefixed("context", "-").name(), "context-b");
    assert_eq!(attr.prefixed("", "-").name(), "b");
    assert!(matches!(attr.prefixed("a", ".").value(), Value::I32(1)));
    assert_eq!(attr.name(), "b");
}

#[test]
fn test_foreign_typed() {
    let foreign = Foreign::new(io::Error::other("disk on fire"));
    assert_eq!(foreign.to_string(), "disk on fire");
    assert_eq!(foreign.type_id(), Some(std::any::TypeId::of::<io::Error>()));
    assert!(foreign.type_name().ends_with("Error"));
    assert!(foreign.as_error().downcast_ref::<io::Error>().is_some());

    let copy = foreign.clone();
    assert!(copy.ptr_eq(&foreign));
    assert!(!Foreign::new(Broken).ptr_eq(&foreign));
}

#[test]
fn test_foreign_boxed_is_transparent() {
    let boxed: Box<dyn Error + Send + Sync> = Box::new(Broken);
    let foreign = Foreign::from_boxed(boxed);
    assert_eq!(foreign.to_string(), "broken");
    assert!(foreign.as_error().downcast_ref::<Broken>().is_some());
    assert!(foreign.type_id().is_none());
}

#[test]
fn test_chain_layers_partition_attrs() {
    let mut chain = RawChain::new(Marker::New("m".into()), None);
    chain.push_attr(Attr::new("x", 1i64));
    chain.open_layer(Marker::Just, None);
    chain.open_layer(
        Marker::Wrap("w".into()),
        Some(Location {
            file: "src/lib.rs",
            line: 10,
            column: 5,
        }),
    );
    chain.extend_attrs([Attr::new("y", "z"), Attr::new("y", "again")]);

    assert_eq!(chain.layer_count(), 3);
    assert_eq!(chain.attr_count(), 3);

    let layers: Vec<_> = chain.layers().collect();
    assert_eq!(layers[0].marker().text(), Some("m"));
    assert_eq!(layers[0].attrs().len(), 1);
    assert_eq!(layers[0].attrs()[0].name(), "x");
    assert!(layers[1].attrs().is_empty());
    assert!(layers[1].marker().text().is_none());
    assert_eq!(layers[2].attrs().len(), 2);
    assert_eq!(layers[2].location().unwrap().to_string(), "src/lib.rs:10");

    let texts: Vec<_> = chain.layers().rev().filter_map(|l| l.marker().text()).collect();
    assert_eq!(texts, ["w", "m"]);
    assert!(chain.foreign().is_none());
}

#[test]
fn test_chain_outer_first_layer() {
    let chain = RawChain::new(Marker::OuterJust(Foreign::new(Broken)), None);
    assert_eq!(chain.foreign().map(|f| f.to_string()).as_deref(), Some("broken"));
    assert!(chain.layer(0).marker().is_outer());
}

#[test]
fn test_location_caller() {
    let location = Location::caller();
    assert!(location.file.ends_with("integration_tests.rs"));
    assert!(location.line > 0);
}
