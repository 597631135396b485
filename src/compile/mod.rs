//! Continuity compilation: procedures in, commands and diagnostics out.

pub mod compiler;
pub mod errors;
