use std::{sync::Arc, thread};

use errtrail::{AnyValue, Consumer, Context, Error, Layer, Location};
use serde_json::{Map, Value, json};

/// Builds one JSON object per layer.
#[derive(Default)]
struct JsonConsumer {
    layers: Vec<(String, Map<String, Value>)>,
}

impl JsonConsumer {
    fn put(&mut self, name: &str, value: Value) {
        if let Some((_, fields)) = self.layers.last_mut() {
            fields.insert(name.to_owned(), value);
        }
    }

    fn into_json(self) -> Value {
        Value::Array(
            self.layers
                .into_iter()
                .map(|(layer, fields)| json!({ "layer": layer, "fields": fields }))
                .collect(),
        )
    }
}

impl<'a> Consumer<'a> for JsonConsumer {
    fn describe_layer(&mut self, _: Option<&'a Location>, layer: Layer<'a>) {
        self.layers.push((layer.to_string(), Map::new()));
    }

    fn record_bool(&mut self, name: &'a str, value: bool) {
        self.put(name, json!(value));
    }

    fn record_i64(&mut self, name: &'a str, value: i64) {
        self.put(name, json!(value));
    }

    fn record_u64(&mut self, name: &'a str, value: u64) {
        self.put(name, json!(value));
    }

    fn record_f64(&mut self, name: &'a str, value: f64) {
        self.put(name, json!(value));
    }

    fn record_str(&mut self, name: &'a str, value: &'a str) {
        self.put(name, json!(value));
    }

    fn record_any(&mut self, name: &'a str, value: &'a dyn AnyValue) {
        let value = match value.downcast_ref::<Vec<u8>>() {
            Some(bytes) => json!({ "bytes": bytes }),
            None => json!(format!("{value:?}")),
        };
        self.put(name, value);
    }
}

fn to_json(err: &Error) -> Value {
    let mut consumer = JsonConsumer::default();
    err.deliver(&mut consumer);
    consumer.into_json()
}

/// Records the sequence of consumer calls.
#[derive(Default, Debug, PartialEq)]
struct Calls(Vec<String>);

impl<'a> Consumer<'a> for Calls {
    fn begin_layer(&mut self) {
        self.0.push("begin".into());
    }

    fn describe_layer(&mut self, location: Option<&'a Location>, layer: Layer<'a>) {
        self.0.push(format!("{layer} @{location:?}"));
    }

    fn record_bool(&mut self, name: &'a str, value: bool) {
        self.0.push(format!("bool {name}={value}"));
    }

    fn record_i64(&mut self, name: &'a str, value: i64) {
        self.0.push(format!("i64 {name}={value}"));
    }

    fn record_u64(&mut self, name: &'a str, value: u64) {
        self.0.push(format!("u64 {name}={value}"));
    }

    fn record_f64(&mut self, name: &'a str, value: f64) {
        self.0.push(format!("f64 {name}={value}"));
    }

    fn record_str(&mut self, name: &'a str, value: &'a str) {
        self.0.push(format!("str {name}={value:?}"));
    }

    fn record_any(&mut self, name: &'a str, value: &'a dyn AnyValue) {
        self.0.push(format!("any {name}={value:?}"));
    }
}

fn calls(err: &Error) -> Calls {
    let mut calls = Calls::default();
    err.deliver(&mut calls);
    calls
}

#[derive(Debug, thiserror::Error)]
#[error("request failed")]
struct RequestFailed {
    #[source]
    inner: Error,
}

fn sample() -> Error {
    let err = Error::new("m").i32("x", 1);
    Error::wrap(err, "w").str("y", "z")
}

#[test]
fn test_grouped_layers() {
    assert_eq!(
        to_json(&sample()),
        json!([
            { "layer": "NEW: m", "fields": { "x": 1 } },
            { "layer": "WRAP: w", "fields": { "y": "z" } },
        ])
    );
}

#[test]
fn test_bytes_classification() {
    let err = Error::new("m").bytes("text", b"abc").bytes("raw", &[1, 2, 3]);
    assert_eq!(
        to_json(&err),
        json!([{ "layer": "NEW: m", "fields": { "text": "abc", "raw": { "bytes": [1, 2, 3] } } }])
    );
    assert_eq!(
        calls(&err).0[2..],
        ["str text=\"abc\"", "any raw=[1, 2, 3]"]
    );
}

#[test]
fn test_narrow_kinds_widen() {
    let err = Error::new("m")
        .i8("a", -1)
        .u16("b", 2)
        .int("c", -3)
        .uint("d", 4)
        .f32("e", 0.5)
        .type_name("t", &0u8)
        .strs("s", ["x", "y"]);
    assert_eq!(
        calls(&err).0[2..],
        [
            "i64 a=-1",
            "u64 b=2",
            "i64 c=-3",
            "u64 d=4",
            "f64 e=0.5",
            "str t=\"u8\"",
            "any s=[\"x\", \"y\"]",
        ]
    );
}

#[test]
fn test_delivery_is_idempotent() {
    let err = sample().any("opaque", Arc::new(5u8));
    let first = calls(&err);
    let second = calls(&err);
    assert_eq!(first, second);
    assert_eq!(
        first.0,
        [
            "begin",
            "NEW: m @None",
            "i64 x=1",
            "begin",
            "WRAP: w @None",
            "str y=\"z\"",
            "any opaque=5",
        ]
    );
}

#[test]
fn test_foreign_hop_delivered_first() {
    let inner = Error::new("inner").u8("depth", 0);
    let err = Error::wrap(RequestFailed { inner }, "handle").u8("depth", 1);
    assert_eq!(err.to_string(), "handle: request failed");
    assert_eq!(
        err.tree().to_string(),
        "[NEW: inner] depth=0 [WRAP: handle] depth=1"
    );
    assert_eq!(err.joined().to_string(), "depth=[0, 1]");
}

#[test]
fn test_concurrent_reads() {
    let err = Error::wrap(sample(), "top").u64("n", 3);
    let expected = (calls(&err), err.flat().to_string());
    thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| (calls(&err), err.flat().to_string())))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

#[test]
fn test_shared_context_merged_concurrently() {
    let ctx = Context::new().str("service", "billing").u16("port", 8080);
    let built: Vec<String> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let ctx = &ctx;
                scope.spawn(move || {
                    Error::new("down")
                        .prefix("srv")
                        .with_ctx(ctx)
                        .int("worker", i)
                        .flat()
                        .to_string()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    for (i, text) in built.iter().enumerate() {
        assert_eq!(
            *text,
            format!(r#"srv-service="billing" srv-port=8080 srv-worker={i}"#)
        );
    }
    assert_eq!(ctx.len(), 2);
}
