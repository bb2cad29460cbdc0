//! Utility functions and structures.

pub mod bundle;
pub mod hash;
pub mod minify;
pub mod url;
