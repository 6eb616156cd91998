#![no_std]
#![forbid(
    missing_docs,
    unsafe_code,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    clippy::missing_docs_in_private_items,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
#![allow(rustdoc::private_intra_doc_links)]
//! Internal implementation crate for [`errtrail`].
//!
//! # Overview
//!
//! This crate contains the storage layer behind the [`errtrail`] error
//! annotation library: the tagged attribute values, the layer markers and the
//! flat buffer that records which attributes belong to which layer.
//!
//! **This crate is an implementation detail.** No semantic versioning guarantees
//! are provided. Users should depend on the [`errtrail`] crate, not this one.
//!
//! # Architecture
//!
//! - **[`value`]**: Tagged attribute values
//!   - [`Value`]: Closed sum type over every supported attribute kind. Scalars
//!     are stored inline, opaque values behind a shared [`Arc`]
//!   - [`AnyValue`]: Object-safe bound for opaque values
//!   - [`Attr`]: A named [`Value`]
//!
//! - **[`layer`]**: What opened a layer and where
//!   - [`Marker`]: New, wrap, context-only, and the two outer variants that
//!     carry an absorbed foreign error
//!   - [`Foreign`]: A type-erased, shareable foreign error
//!   - [`Location`]: A captured call site
//!
//! - **[`chain`]**: The buffer itself
//!   - [`RawChain`]: Layer records plus one flat attribute vector. Each layer
//!     remembers the offset where its attributes start, so the attributes of a
//!     layer are always a contiguous slice
//!   - [`LayerRef`]: Borrowed view of one layer
//!
//! Everything in this crate is plain safe Rust. Type erasure of foreign errors
//! and opaque values goes through [`unsize`] coercions into [`triomphe`] arcs
//! rather than hand-written vtables.
//!
//! [`errtrail`]: https://docs.rs/errtrail/latest/errtrail/
//! [`Arc`]: triomphe::Arc

extern crate alloc;

pub mod chain;
pub mod layer;
pub mod value;

pub use chain::{LayerRef, RawChain};
pub use layer::{Foreign, Location, Marker};
pub use value::{AnyValue, Attr, Value};
