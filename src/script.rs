//! JSON content scripts and the director that turns them into runs.

pub(crate) mod director;
pub(crate) mod model;
