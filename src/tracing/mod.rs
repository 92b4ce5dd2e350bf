//! Observability and tracing utilities.
//!
//! Span helpers live in [`spans`] so instrumented operations stay free of
//! `#[instrument]` attributes.

pub(crate) mod spans;
