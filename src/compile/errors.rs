use std::collections::{BTreeMap, BTreeSet};

use crate::continuity::ast::SourceLoc;
use crate::show::model::SymbolClass;

/// Continuity authoring mistakes. These never abort a compile; they are collected as
/// [`ErrorMarker`]s alongside a best-effort animation.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    thiserror::Error,
    serde::Serialize,
    serde::Deserialize,
)]
pub enum AnimateError {
    /// A command needed more beats than remained.
    #[error("Ran out of time")]
    OutOfTime,
    /// Beats were left over after every procedure ran.
    #[error("Not enough to do")]
    ExtraTime,
    /// The marcher did not end on its next-sheet position.
    #[error("Didn't make it to position")]
    WrongPlace,
    #[error("Invalid countermarch")]
    InvalidCountermarch,
    #[error("Invalid fountain")]
    InvalidFountain,
    #[error("Division by zero")]
    DivisionByZero,
    /// A variable was read before it was written.
    #[error("Undefined value")]
    UndefinedVariable,
    /// A direction toward a coincident point was requested.
    #[error("Undefined direction")]
    UndefinedDirection,
    /// The next animated sheet was referenced on the last one.
    #[error("No next sheet")]
    NoNextSheet,
    /// A reference point number beyond the ones a marcher carries.
    #[error("Undefined point")]
    UndefinedPoint,
    #[error("Non-integer value")]
    NonInteger,
    #[error("Negative value")]
    NegativeInteger,
}

/// Every point that hit one error kind, with the last known source location.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct ErrorMarker {
    pub points: BTreeSet<usize>,
    pub symbol: SymbolClass,
    pub loc: Option<SourceLoc>,
}

/// Error markers for one sheet, keyed by kind.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct AnimationErrors {
    markers: BTreeMap<AnimateError, ErrorMarker>,
}

impl AnimationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        kind: AnimateError,
        loc: Option<SourceLoc>,
        point: usize,
        symbol: SymbolClass,
    ) {
        let marker = self.markers.entry(kind).or_default();
        marker.symbol = symbol;
        if loc.is_some() {
            marker.loc = loc;
        }
        marker.points.insert(point);
    }

    /// Fold `other` in as if its registrations happened after ours.
    pub fn merge(&mut self, other: AnimationErrors) {
        for (kind, theirs) in other.markers {
            let marker = self.markers.entry(kind).or_default();
            marker.symbol = theirs.symbol;
            if theirs.loc.is_some() {
                marker.loc = theirs.loc;
            }
            marker.points.extend(theirs.points);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn contains(&self, kind: AnimateError) -> bool {
        self.markers.contains_key(&kind)
    }

    pub fn get(&self, kind: AnimateError) -> Option<&ErrorMarker> {
        self.markers.get(&kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = (AnimateError, &ErrorMarker)> {
        self.markers.iter().map(|(k, m)| (*k, m))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/errors.rs"]
mod tests;
