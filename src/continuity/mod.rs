//! Parsed continuity programs.

/// Value expressions and procedures.
pub mod ast;
/// Shorthand constructors mirroring the continuity keywords.
pub mod dsl;
