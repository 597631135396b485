//! Whole-show assembly, random-access queries and incremental scrubbing.

pub mod animation;
pub mod collision;
pub mod scrub;
