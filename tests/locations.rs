//! Process-wide configuration. Kept in its own test binary, and in one test,
//! since every step changes global state.

use errtrail::{Config, Context, Error, config, prelude::*};

#[derive(Debug, thiserror::Error)]
#[error("leaf")]
struct Leaf;

#[test]
fn test_configuration_lifecycle() {
    // Defaults
    assert_eq!(Config::current(), Config::new());
    let err = Error::new("m");
    assert!(err.tree().groups()[0].location().is_none());
    assert_eq!(err.flat().to_string(), "");
    let pending = Error::new("m").prefix("db");
    let pending_ctx = Context::new().prefix("req");

    // Install once
    let installed = Config::new().prefix_separator(".");
    assert!(installed.install().is_ok());
    let rejected = Config::new().locations(true).install().unwrap_err();
    assert!(rejected.0.locations_enabled());
    assert_eq!(Config::current(), installed);
    let err = Error::new("m").prefix("db").prefix("pool").u8("size", 2);
    assert_eq!(err.flat().to_string(), "db.pool.size=2");
    // Separator is taken when the prefix is set
    let err = pending.u8("x", 1).with_ctx(&pending_ctx.u8("id", 2));
    assert_eq!(err.flat().to_string(), "db-x=1 db-req-id=2");

    // Toggle capture on
    config::insert_locations();
    assert!(Config::current().locations_enabled());
    assert_eq!(Config::current().separator(), ".");

    let line = line!() + 1;
    let err = Error::new("m").i32("x", 1);
    let location = err.tree().groups()[0].location().copied().unwrap();
    assert_eq!(location.file, file!());
    assert_eq!(location.line, line);
    assert_eq!(
        err.flat().to_string(),
        format!("x=1 @locations{{NEW: m={}:{line}}}", file!())
    );

    let result: Result<(), Leaf> = Err(Leaf);
    let line = line!() + 1;
    let err = result.wrap("outer").unwrap_err();
    let tree = err.tree();
    assert_eq!(tree.groups()[0].location().map(|l| l.line), Some(line));
    assert_eq!(
        tree.to_string(),
        format!("[WRAP: outer] @location={}:{line}", file!())
    );

    let new_line = line!() + 1;
    let err = Error::new("m").i32("x", 1);
    let wrap_line = line!() + 1;
    let err = Error::wrap(err, "w");
    let just_line = line!() + 1;
    let err = Error::just(err).u8("y", 2);
    let lines: Vec<_> = err
        .tree()
        .groups()
        .iter()
        .map(|group| group.location().map(|l| l.line))
        .collect();
    assert_eq!(lines, [Some(new_line), Some(wrap_line), Some(just_line)]);
    assert_eq!(
        err.flat().to_string(),
        format!(
            "x=1 y=2 @locations{{NEW: m={file}:{new_line} WRAP: w={file}:{wrap_line} CTX={file}:{just_line}}}",
            file = file!()
        )
    );

    let cause = Some(Leaf);
    let line = line!() + 1;
    let err = cause.just();
    assert_eq!(err.tree().groups()[0].location().map(|l| l.line), Some(line));
    let result: Result<(), Error> = Err(err);
    let line = line!() + 1;
    let err = result.just().unwrap_err();
    assert_eq!(err.tree().groups()[1].location().map(|l| l.line), Some(line));

    // Toggle capture off, then replace
    config::do_not_insert_locations();
    assert!(Error::new("m").tree().groups()[0].location().is_none());
    let previous = Config::new().replace();
    assert_eq!(previous, Some(installed));
    assert_eq!(Config::current(), Config::new());
}
