use std::collections::{BTreeMap, BTreeSet};

use crate::{
    continuity::ast::Procedure,
    foundation::core::Coord,
    foundation::error::{DrillError, DrillResult},
};

/// Number of numbered reference positions each marcher carries per sheet.
pub const NUM_REF_POINTS: usize = 3;

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// A complete show: an ordered list of sheets sharing one marcher roster.
///
/// A show is a pure data model that can be:
/// - built programmatically (see [`crate::ShowBuilder`])
/// - serialized/deserialized via Serde (JSON)
///
/// Animating a show is performed by [`crate::Animation::build`].
pub struct Show {
    /// Sheets in performance order.
    pub sheets: Vec<Sheet>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// One formation: marcher positions plus the continuities that move them to the next one.
pub struct Sheet {
    /// Sheet name for authoring/debugging.
    pub name: String,
    /// Beat budget for the continuities on this sheet.
    pub beats: u32,
    /// Sheets excluded from animation are skipped by the assembler and by next-sheet lookups.
    #[serde(default = "default_in_animation")]
    pub in_animation: bool,
    /// One entry per marcher; index is the marcher's identity.
    pub points: Vec<SheetPoint>,
    /// Parsed continuity per symbol class.
    #[serde(default)]
    pub continuities: BTreeMap<SymbolClass, Vec<Procedure>>,
}

fn default_in_animation() -> bool {
    true
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// A marcher's placement on one sheet.
pub struct SheetPoint {
    /// Main position.
    pub position: Coord,
    /// Reference points 1..=3; unset entries fall back to `position`.
    #[serde(default)]
    pub refs: [Option<Coord>; NUM_REF_POINTS],
    /// Dot symbol, selecting which continuity applies.
    #[serde(default)]
    pub symbol: SymbolClass,
}

impl SheetPoint {
    pub fn at(position: Coord) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Position for reference `refnum`; 0 is the main position.
    pub fn reference(&self, refnum: u8) -> Coord {
        match refnum {
            0 => self.position,
            n => self
                .refs
                .get(usize::from(n) - 1)
                .copied()
                .flatten()
                .unwrap_or(self.position),
        }
    }
}

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
/// Dot symbols; each may carry its own continuity per sheet.
pub enum SymbolClass {
    #[default]
    Plain,
    Sol,
    Bksl,
    Sl,
    X,
    SolBksl,
    SolSl,
    SolX,
}

impl SymbolClass {
    pub const ALL: [SymbolClass; 8] = [
        SymbolClass::Plain,
        SymbolClass::Sol,
        SymbolClass::Bksl,
        SymbolClass::Sl,
        SymbolClass::X,
        SymbolClass::SolBksl,
        SymbolClass::SolSl,
        SymbolClass::SolX,
    ];
}

impl Show {
    /// Parse and validate a show from JSON.
    pub fn from_json_str(s: &str) -> DrillResult<Self> {
        let show: Show = serde_json::from_str(s).map_err(|e| DrillError::serde(e.to_string()))?;
        show.validate()?;
        Ok(show)
    }

    pub fn to_json_string_pretty(&self) -> DrillResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| DrillError::serde(e.to_string()))
    }

    /// Marcher count shared by every sheet.
    pub fn num_points(&self) -> usize {
        self.sheets.first().map_or(0, |s| s.points.len())
    }

    pub fn sheet(&self, index: usize) -> DrillResult<&Sheet> {
        self.sheets.get(index).ok_or_else(|| {
            DrillError::validation(format!(
                "sheet index {index} out of range (show has {} sheets)",
                self.sheets.len()
            ))
        })
    }

    /// Show indices of sheets that take part in animation, in order.
    pub fn animated_sheet_indices(&self) -> Vec<usize> {
        self.sheets
            .iter()
            .enumerate()
            .filter(|(_, s)| s.in_animation)
            .map(|(i, _)| i)
            .collect()
    }

    /// The first animated sheet strictly after `index`.
    pub fn next_animated_sheet(&self, index: usize) -> Option<&Sheet> {
        self.sheets
            .iter()
            .skip(index + 1)
            .find(|s| s.in_animation)
    }

    pub fn validate(&self) -> DrillResult<()> {
        let n = self.num_points();
        for (i, sheet) in self.sheets.iter().enumerate() {
            if sheet.points.len() != n {
                return Err(DrillError::validation(format!(
                    "sheet {i} ('{}') has {} points, expected {n}",
                    sheet.name,
                    sheet.points.len()
                )));
            }
            for (p, point) in sheet.points.iter().enumerate() {
                let out = std::iter::once(point.position)
                    .chain(point.refs.iter().flatten().copied())
                    .find(|c| !c.in_range());
                if let Some(c) = out {
                    return Err(DrillError::validation(format!(
                        "sheet {i} ('{}') point {p} at ({}, {}) is outside +/-{} units",
                        sheet.name,
                        c.x,
                        c.y,
                        Coord::LIMIT
                    )));
                }
            }
        }
        Ok(())
    }
}

impl Sheet {
    pub fn point(&self, index: usize) -> DrillResult<&SheetPoint> {
        self.points.get(index).ok_or_else(|| {
            DrillError::validation(format!(
                "point index {index} out of range (sheet '{}' has {} points)",
                self.name,
                self.points.len()
            ))
        })
    }

    /// Continuity for `symbol`, if one is attached.
    pub fn continuity(&self, symbol: SymbolClass) -> Option<&[Procedure]> {
        self.continuities.get(&symbol).map(Vec::as_slice)
    }

    /// Symbol classes used by at least one marcher on this sheet.
    pub fn symbols_in_use(&self) -> BTreeSet<SymbolClass> {
        self.points.iter().map(|p| p.symbol).collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/show/model.rs"]
mod tests;
