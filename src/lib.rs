//! drillanim compiles marching-band continuities into beat-accurate animations.
//!
//! A show is a list of sheets (formations). Each sheet carries a beat budget, a position
//! per marcher, and continuity programs keyed by dot symbol. The engine turns those
//! programs into per-marcher motion commands and lets callers query where every marcher
//! is on any beat of the show.
//!
//! # Pipeline overview
//!
//! 1. **Model**: build a [`Show`] with [`ShowBuilder`]/[`SheetBuilder`] or load it from JSON
//! 2. **Compile**: `Show + sheet + point -> CompiledSequence + AnimationErrors` ([`compile`])
//! 3. **Assemble**: `Show -> Animation` ([`Animation::build`]), one compile per marcher per sheet
//! 4. **Play**: random-access queries on [`Animation`] or beat-by-beat stepping with [`Scrubber`]
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Keep going**: continuity mistakes never abort a compile. They come back as
//!   [`ErrorMarker`]s next to a playable best-effort animation; only corrupt input is a
//!   [`DrillError`].
//! - **Deterministic**: parallel and sequential builds produce identical animations.
#![forbid(unsafe_code)]

mod animation;
mod compile;
mod continuity;
mod foundation;
mod playback;
mod show;

pub use animation::command::{Command, CommandKind};
pub use animation::vars::VariableEnv;
pub use compile::compiler::{CompiledSequence, compile};
pub use compile::errors::{AnimateError, AnimationErrors, ErrorMarker};
pub use continuity::ast::{
    ContPoint, ContValue, DefinedValue, ProcKind, Procedure, SourceLoc, VarSlot,
};
pub use continuity::dsl;
pub use foundation::core::{
    AnimateDir, COORD_DECIMAL, Coord, march_vector, steps_to_units, units_to_steps,
    vector_from_direction,
};
pub use foundation::error::{DrillError, DrillResult};
pub use foundation::math::{bound_direction, bound_direction_signed, is_diagonal_direction};
pub use playback::animation::{Animation, AnimationSheet, BuildOptions};
pub use playback::collision::{CollisionKind, PointPair, detect_collision, find_collisions};
pub use playback::scrub::{MarcherInfo, Scrubber};
pub use show::builder::{SheetBuilder, ShowBuilder};
pub use show::model::{NUM_REF_POINTS, Sheet, SheetPoint, Show, SymbolClass};
