use std::{
    io,
    sync::{Arc, Mutex},
};

use errtrail::Error;
use errtrail_tracing::{ErrtrailLayer, LogStyle, ResultLogExt, SpanExt, log_error_with};
use tracing_subscriber::{Registry, layer::SubscriberExt};

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn with_capture(f: impl FnOnce()) -> String {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = Registry::default().with(ErrtrailLayer).with(
        tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .without_time()
            .with_writer(move || writer.clone()),
    );
    tracing::subscriber::with_default(subscriber, f);
    captured.text()
}

#[derive(Debug, thiserror::Error)]
#[error("connection reset")]
struct Reset;

#[test]
fn test_log_error_tree() {
    let err = Error::wrap(Reset, "send batch").u32("size", 64);
    let out = with_capture(|| log_error_with(&err, LogStyle::Tree));
    assert!(out.contains("ERROR"), "{out}");
    assert!(out.contains("error=send batch: connection reset"), "{out}");
    assert!(out.contains("context=[WRAP: send batch] size=64"), "{out}");
}

#[test]
fn test_log_error_flat() {
    let err = Error::wrap(Error::new("a").i32("x", 1), "b").i32("y", 2);
    let out = with_capture(|| log_error_with(&err, LogStyle::Flat));
    assert!(out.contains("error=b: a context=x=1 y=2"), "{out}");
}

#[test]
fn test_attach_span_scope() {
    let mut err = None;
    with_capture(|| {
        let outer = tracing::info_span!("request", id = 7);
        let _outer = outer.enter();
        let inner = tracing::info_span!("query", table = "users");
        let _inner = inner.enter();
        err = Some(Error::new("timeout").attach_span());
    });
    let err = err.unwrap();
    assert_eq!(
        err.flat().to_string(),
        r#"span="request{id=7} > query{table=\"users\"}""#
    );
}

#[test]
fn test_recorded_fields_are_captured() {
    let mut err = None;
    with_capture(|| {
        let span = tracing::info_span!("job", attempt = tracing::field::Empty);
        span.record("attempt", 2);
        let _guard = span.enter();
        err = Some(Error::new("failed").attach_span());
    });
    assert_eq!(err.unwrap().flat().to_string(), r#"span="job{attempt=2}""#);
}

#[tracing::instrument]
fn lookup(id: u64) -> Result<(), Error> {
    Err(Error::new("not found").u64("id", id)).attach_span()
}

#[test]
fn test_log_err_passes_result_through() {
    let mut result = None;
    let out = with_capture(|| result = Some(lookup(5).log_err()));
    let err = result.unwrap().unwrap_err();
    assert_eq!(err.to_string(), "not found");
    assert!(out.contains("error=not found"), "{out}");
    assert!(out.contains(r#"span="lookup{id=5}""#), "{out}");
}
