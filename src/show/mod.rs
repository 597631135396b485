//! The show data model consumed by the compiler.

pub mod builder;
pub mod model;
