pub(crate) mod buffer;
pub(crate) mod keeper;
pub(crate) mod ops;
pub(crate) mod source;
