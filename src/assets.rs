//! Asset-backed image sources.

pub(crate) mod decode;
pub(crate) mod sources;
pub(crate) mod template;
