//! Aggregate source files.

pub mod css;
pub mod js;
