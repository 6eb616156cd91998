//! Commonly used items.
//!
//! ```
//! use errtrail::prelude::*;
//!
//! fn check(limit: u32) -> Result<u32, Error> {
//!     if limit == 0 {
//!         bail!("limit must be positive");
//!     }
//!     Ok(limit)
//! }
//!
//! let err = check(0).unwrap_err();
//! assert_eq!(err.to_string(), "limit must be positive");
//! ```

pub use crate::{
    Consumer, Context, Error, bail, iterator_ext::IteratorExt, newf, option_ext::OptionExt,
    result_ext::ResultExt, wrapf,
};
