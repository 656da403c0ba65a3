#![forbid(unsafe_code)]

//! Core: canonical key events, one-time listener registration, and logging.

pub mod event;
pub mod listener;
pub mod logging;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
