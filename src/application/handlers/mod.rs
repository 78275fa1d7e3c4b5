//! Application handlers.

pub mod coach;
