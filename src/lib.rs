#![cfg_attr(not(doc), no_std)]
#![deny(
    missing_docs,
    unsafe_code,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
// Make docs.rs generate better docs
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Error annotation with typed, layer-grouped structured context.
//!
//! ## Overview
//!
//! This crate lets a call site attach a message and typed key/value context
//! to an error as it travels up the stack, and lets a logger, a test or any
//! other sink pull that context back out later without parsing strings.
//!
//! An [`Error`] is a chain of **layers**. Every layer is opened by one of
//! three operations and collects the attributes added after it:
//!
//! - [`Error::new`] starts a chain with a message,
//! - [`Error::wrap`] adds a message on top of a cause,
//! - [`Error::just`] adds a context-only layer that leaves the text untouched.
//!
//! ```
//! use errtrail::Error;
//!
//! let err = Error::new("connection refused").str("host", "db-1").u16("port", 5432);
//! let err = Error::wrap(err, "load user").u64("user_id", 42);
//! let err = Error::just(err).bool("retried", true);
//!
//! assert_eq!(err.to_string(), "load user: connection refused");
//! assert_eq!(
//!     err.tree().to_string(),
//!     r#"[NEW: connection refused] host="db-1" port=5432 [WRAP: load user] user_id=42 [CTX] retried=true"#,
//! );
//! ```
//!
//! ## Foreign errors
//!
//! Any `Error + Send + Sync + 'static` value can be wrapped. When the cause is
//! already an [`Error`] the new layer is appended to it in place, otherwise the
//! foreign value is absorbed as the bottom of a new chain. The foreign value
//! stays reachable through [`source`](core::error::Error::source), so
//! [`is`] and [`find`] see through it:
//!
//! ```
//! use errtrail::{Const, Error, is};
//!
//! const NOT_FOUND: Const = Const("not found");
//!
//! let err = Error::wrap(NOT_FOUND, "fetch profile").str("id", "u-1");
//! assert!(is(&err, &NOT_FOUND));
//! assert_eq!(err.to_string(), "fetch profile: not found");
//! ```
//!
//! ## Delivery
//!
//! Context reaches the outside world through the [`Consumer`] trait. The
//! crate ships three renderings built on it:
//!
//! - [`Tree`]: one group per layer, named `NEW: text`, `WRAP: text` or `CTX`
//! - [`Flat`]: every field in one sequence, plus the captured locations
//! - [`Joined`]: same-named fields collected into lists
//!
//! ## Locations
//!
//! Location capture is off by default. Turn it on at startup with
//! [`config::insert_locations`] or by installing a [`Config`]. Each layer then
//! records the file and line of the call that opened it.
//!
//! ## Thread safety
//!
//! Annotation methods take the error by value, so one partially built chain
//! can never be extended from two places. A finished [`Error`] is `Send` and
//! `Sync` and can be matched and delivered from many threads at once.
//!
//! ## Features
//!
//! - `std`: use [`std::sync::RwLock`] for the global configuration instead of
//!   a spin lock
//! - `compat-anyhow1`: conversions to and from [`anyhow`](https://docs.rs/anyhow)

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

#[macro_use]
mod macros;
#[macro_use]
mod annotate;

pub mod compat;
pub mod config;
pub mod consumer;
pub mod context;
pub mod list;
pub mod matching;
pub mod option_ext;
pub mod prelude;
pub mod render;

mod const_error;
mod error;
mod iterator_ext;
mod result_ext;

pub use errtrail_internals::{AnyValue, Location, Value};

pub use self::{
    config::Config,
    const_error::{Const, Sentinel},
    consumer::{Consumer, Layer},
    context::Context,
    error::Error,
    iterator_ext::IteratorExt,
    list::{BoxError, List, and},
    matching::{chain, deliverer, find, find_into, is, is_opt},
    render::{Flat, Joined, Tree},
    result_ext::ResultExt,
};

/// A `Result` whose error side is an [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

// Not public API. Referenced by macro-generated code.
#[doc(hidden)]
pub mod __private {
    use alloc::{borrow::Cow, fmt};
    #[doc(hidden)]
    pub use core::{format_args, result::Result::Err};

    #[doc(hidden)]
    #[inline]
    #[must_use]
    pub fn format_message(args: fmt::Arguments<'_>) -> Cow<'static, str> {
        if let Some(message) = args.as_str() {
            Cow::Borrowed(message)
        } else {
            Cow::Owned(fmt::format(args))
        }
    }
}
