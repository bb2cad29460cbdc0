//! Minify source code.

pub mod css;
