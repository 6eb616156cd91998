#![deny(
    missing_docs,
    unsafe_code,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]

//! `tracing` integration for errtrail errors.
//!
//! Two directions are covered:
//!
//! - into the error: [`SpanExt::attach_span`] records the current span scope
//!   as a `span` attribute, using the field values captured by
//!   [`ErrtrailLayer`]
//! - out of the error: [`log_error`] and [`ResultLogExt::log_err`] emit one
//!   `ERROR` event carrying the error text and its delivered context
//!
//! # Quick Start
//!
//! ```
//! use errtrail::Error;
//! use errtrail_tracing::{ErrtrailLayer, ResultLogExt, SpanExt};
//! use tracing_subscriber::{Registry, layer::SubscriberExt};
//!
//! let subscriber = Registry::default()
//!     .with(ErrtrailLayer)
//!     .with(tracing_subscriber::fmt::layer());
//! tracing::subscriber::set_global_default(subscriber).expect("failed to set subscriber");
//!
//! #[tracing::instrument(fields(user_id = 42))]
//! fn load() -> Result<(), Error> {
//!     Err(Error::new("row missing").str("table", "users")).attach_span()
//! }
//!
//! let _ = load().log_err();
//! ```
//!
//! The event looks like:
//!
//! ```text
//! ERROR errtrail_tracing: error=row missing context=[NEW: row missing] table="users" span="load{user_id=42}"
//! ```
//!
//! # Environment Variables
//!
//! - `ERRTRAIL_TRACING` - Comma-separated options:
//!   - `flat` - log the flat rendering instead of the grouped one
//!   - `tree` - log the grouped rendering (default)

use std::{fmt, sync::OnceLock};

use errtrail::Error;
use tracing::{
    Span,
    field::{Field, Visit},
};
use tracing_subscriber::registry::LookupSpan;

/// Separator between the spans of a scope in the `span` attribute.
const SCOPE_SEPARATOR: &str = " > ";

/// Field values of a span, captured on creation.
#[derive(Clone, Debug, Default)]
struct CapturedFields(String);

struct FieldVisitor<'a> {
    output: &'a mut String,
}

impl Visit for FieldVisitor<'_> {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        use std::fmt::Write;
        if !self.output.is_empty() {
            self.output.push(' ');
        }
        let _ = write!(self.output, "{}={:?}", field.name(), value);
    }
}

/// A tracing layer that captures span field values for [`SpanExt`].
///
/// Add it to the subscriber next to the other layers. Without it
/// [`attach_span`](SpanExt::attach_span) still records span names, but no
/// field values.
///
/// ```
/// use errtrail_tracing::ErrtrailLayer;
/// use tracing_subscriber::{Registry, layer::SubscriberExt};
///
/// let subscriber = Registry::default().with(ErrtrailLayer);
/// tracing::subscriber::with_default(subscriber, || {
///     tracing::info_span!("job", id = 3).in_scope(|| {});
/// });
/// ```
#[derive(Copy, Clone, Debug, Default)]
pub struct ErrtrailLayer;

impl<S> tracing_subscriber::Layer<S> for ErrtrailLayer
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        id: &tracing::span::Id,
        ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        let mut fields = CapturedFields::default();
        attrs.record(&mut FieldVisitor {
            output: &mut fields.0,
        });
        span.extensions_mut().insert(fields);
    }

    fn on_record(
        &self,
        id: &tracing::span::Id,
        values: &tracing::span::Record<'_>,
        ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        let mut extensions = span.extensions_mut();
        if let Some(fields) = extensions.get_mut::<CapturedFields>() {
            values.record(&mut FieldVisitor {
                output: &mut fields.0,
            });
        }
    }
}

/// Renders the scope of `span`, root first, as `outer{a=1} > inner`.
///
/// Returns `None` if the span is disabled or the subscriber is not built on a
/// [`Registry`](tracing_subscriber::Registry).
fn render_scope(span: &Span) -> Option<String> {
    span.with_subscriber(|(id, dispatch)| {
        let registry = dispatch.downcast_ref::<tracing_subscriber::Registry>()?;
        let span_ref = registry.span(id)?;

        let mut out = String::new();
        for ancestor in span_ref.scope().from_root() {
            if !out.is_empty() {
                out.push_str(SCOPE_SEPARATOR);
            }
            out.push_str(ancestor.name());
            let extensions = ancestor.extensions();
            if let Some(fields) = extensions.get::<CapturedFields>() {
                if !fields.0.is_empty() {
                    out.push('{');
                    out.push_str(&fields.0);
                    out.push('}');
                }
            }
        }
        Some(out)
    })
    .flatten()
}

/// Records the current tracing span scope on an error.
///
/// The scope is stored as a string attribute named `span` in the current
/// layer. Nothing is recorded outside of any span.
///
/// ```
/// use errtrail::Error;
/// use errtrail_tracing::SpanExt;
///
/// #[tracing::instrument]
/// fn might_fail() -> Result<(), Error> {
///     Err(Error::new("operation failed"))
/// }
///
/// let result = might_fail().attach_span();
/// ```
pub trait SpanExt: Sized {
    /// Records the current span scope.
    fn attach_span(self) -> Self;
}

impl SpanExt for Error {
    fn attach_span(self) -> Self {
        match render_scope(&Span::current()) {
            Some(scope) => self.str("span", scope),
            None => self,
        }
    }
}

impl<V> SpanExt for Result<V, Error> {
    fn attach_span(self) -> Self {
        match self {
            Ok(v) => Ok(v),
            Err(err) => Err(err.attach_span()),
        }
    }
}

/// Which rendering [`log_error`] puts in the `context` field.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum LogStyle {
    /// [`Error::tree`]: fields grouped by layer.
    #[default]
    Tree,
    /// [`Error::flat`]: all fields in one sequence.
    Flat,
}

impl LogStyle {
    /// Returns the style selected by the `ERRTRAIL_TRACING` environment
    /// variable, read once per process.
    pub fn from_env() -> Self {
        static ERRTRAIL_TRACING_STYLE: OnceLock<LogStyle> = OnceLock::new();

        *ERRTRAIL_TRACING_STYLE.get_or_init(|| {
            std::env::var_os("ERRTRAIL_TRACING")
                .map(|var| Self::parse(&var.to_string_lossy()))
                .unwrap_or_default()
        })
    }

    /// Parses a comma-separated option list. The last recognized option wins.
    fn parse(options: &str) -> Self {
        let mut style = Self::default();
        for option in options.split(',').map(str::trim) {
            if option.eq_ignore_ascii_case("flat") {
                style = Self::Flat;
            } else if option.eq_ignore_ascii_case("tree") {
                style = Self::Tree;
            }
        }
        style
    }
}

/// Emits an `ERROR` event for `err` in the style of [`LogStyle::from_env`].
pub fn log_error(err: &Error) {
    log_error_with(err, LogStyle::from_env());
}

/// Emits an `ERROR` event for `err` with `error` set to its text and
/// `context` set to the chosen rendering.
pub fn log_error_with(err: &Error, style: LogStyle) {
    match style {
        LogStyle::Tree => tracing::error!(error = %err, context = %err.tree()),
        LogStyle::Flat => tracing::error!(error = %err, context = %err.flat()),
    }
}

/// Logs the error side of a `Result` and passes the `Result` on.
pub trait ResultLogExt: Sized {
    /// Calls [`log_error`] on the error, if any.
    fn log_err(self) -> Self;
}

impl<V> ResultLogExt for Result<V, Error> {
    fn log_err(self) -> Self {
        if let Err(err) = &self {
            log_error(err);
        }
        self
    }
}
