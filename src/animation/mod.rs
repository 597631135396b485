//! Beat-stepping motion commands and the continuity variable store.

pub mod command;
pub mod vars;
