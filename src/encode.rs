//! Output sinks.
//!
//! Sinks consume composited frames in timeline order and are driven by [`crate::Controller::run`].

/// Frame sink trait and built-in sinks.
pub mod sink;
