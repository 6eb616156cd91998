use errtrail::{BoxError, Const, Error, List, and, is, is_opt, prelude::*};

#[derive(Debug, PartialEq, thiserror::Error)]
#[error("checksum mismatch at {offset}")]
struct Checksum {
    offset: u64,
}

fn boxed(err: impl std::error::Error + Send + Sync + 'static) -> Option<BoxError> {
    Some(Box::new(err))
}

#[test]
fn test_text_is_newest_first() {
    let err = Error::new("a");
    let err = Error::wrap(err, "b");
    let err = Error::just(err).bool("flag", true);
    let err = Error::wrap(err, "c");
    assert_eq!(err.to_string(), "c: b: a");
    assert_eq!(err.layer_count(), 4);
}

#[test]
fn test_foreign_text_appended() {
    let err = Error::wrap(Checksum { offset: 12 }, "read block");
    let err = Error::wrap(err, "open volume");
    assert_eq!(err.to_string(), "open volume: read block: checksum mismatch at 12");
}

#[test]
fn test_context_only_over_foreign() {
    let err = Error::just(Error::just(Checksum { offset: 1 }).u8("a", 1)).u8("b", 2);
    assert_eq!(err.to_string(), "checksum mismatch at 1");
    assert_eq!(err.tree().to_string(), "[CTX] a=1 [CTX] b=2");
}

#[test]
fn test_and_identities() {
    assert!(and(None, None).is_none());
    assert_eq!(and(None, boxed(Const("e"))).unwrap().to_string(), "e");
    assert_eq!(and(boxed(Const("e")), None).unwrap().to_string(), "e");

    let both = and(boxed(Const("a")), boxed(Error::new("b"))).unwrap();
    assert_eq!(both.to_string(), "a; b");
    assert_eq!(both.downcast_ref::<List>().map(List::len), Some(2));
}

#[test]
fn test_is_wrapped_foreign_and_native() {
    let foreign = Checksum { offset: 9 };
    let err = Error::wrap(Checksum { offset: 9 }, "m");
    assert!(is(&err, &foreign));
    assert!(!is(&err, &Checksum { offset: 10 }));

    let native = Error::wrap(Const("c"), "inner").str("k", "v");
    let err = Error::wrap(native.clone(), "m");
    assert!(is(&err, &native));
    assert!(!is(&native, &err));
}

#[test]
fn test_is_opt_absent() {
    let err = Error::new("m");
    assert!(is_opt::<Error, Error>(None, None));
    assert!(!is_opt(Some(&err), None::<&Error>));
    assert!(!is_opt(None::<&Error>, Some(&err)));
    assert!(is_opt(Some(&err), Some(&err)));
}

#[test]
fn test_macros() {
    let id = 7;
    let err = newf!("user {id} missing");
    assert_eq!(err.to_string(), "user 7 missing");
    let err = wrapf!(err, "load #{}", 1);
    assert_eq!(err.to_string(), "load #1: user 7 missing");

    fn fails() -> Result<(), Error> {
        bail!("stop at {}", 3)
    }
    assert_eq!(fails().unwrap_err().to_string(), "stop at 3");
}

#[test]
fn test_result_ext_tracks_layers() {
    let result: Result<(), Checksum> = Err(Checksum { offset: 0 });
    let err = result.wrap("verify").unwrap_err().u64("len", 512);
    assert_eq!(err.to_string(), "verify: checksum mismatch at 0");
    assert_eq!(err.flat().to_string(), "len=512");
}

#[test]
#[should_panic(expected = "cannot wrap an absent error")]
fn test_wrap_absent_panics() {
    let absent: Option<Checksum> = None;
    let _ = absent.wrap("m");
}
