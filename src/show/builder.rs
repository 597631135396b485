use std::collections::BTreeMap;

use crate::{
    continuity::ast::Procedure,
    foundation::core::Coord,
    foundation::error::{DrillError, DrillResult},
    show::model::{NUM_REF_POINTS, Sheet, SheetPoint, Show, SymbolClass},
};

pub struct ShowBuilder {
    sheets: Vec<Sheet>,
}

impl ShowBuilder {
    pub fn new() -> Self {
        Self { sheets: Vec::new() }
    }

    pub fn sheet(mut self, sheet: Sheet) -> Self {
        self.sheets.push(sheet);
        self
    }

    pub fn build(self) -> DrillResult<Show> {
        let show = Show {
            sheets: self.sheets,
        };
        show.validate()?;
        Ok(show)
    }
}

impl Default for ShowBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub struct SheetBuilder {
    name: String,
    beats: u32,
    in_animation: bool,
    points: Vec<SheetPoint>,
    continuities: BTreeMap<SymbolClass, Vec<Procedure>>,
}

impl SheetBuilder {
    pub fn new(name: impl Into<String>, beats: u32) -> Self {
        Self {
            name: name.into(),
            beats,
            in_animation: true,
            points: Vec::new(),
            continuities: BTreeMap::new(),
        }
    }

    pub fn in_animation(mut self, on: bool) -> Self {
        self.in_animation = on;
        self
    }

    pub fn point(self, position: Coord) -> Self {
        self.point_with_symbol(position, SymbolClass::Plain)
    }

    pub fn point_with_symbol(mut self, position: Coord, symbol: SymbolClass) -> Self {
        self.points.push(SheetPoint {
            symbol,
            ..SheetPoint::at(position)
        });
        self
    }

    /// Set reference point `refnum` (1-based) of the marcher at `point`.
    pub fn reference(mut self, point: usize, refnum: u8, position: Coord) -> DrillResult<Self> {
        if refnum == 0 || usize::from(refnum) > NUM_REF_POINTS {
            return Err(DrillError::validation(format!(
                "reference point {refnum} out of range 1..={NUM_REF_POINTS}"
            )));
        }
        let count = self.points.len();
        let p = self.points.get_mut(point).ok_or_else(|| {
            DrillError::validation(format!(
                "reference for point {point}, but sheet has {count} points"
            ))
        })?;
        p.refs[usize::from(refnum) - 1] = Some(position);
        Ok(self)
    }

    pub fn continuity(
        mut self,
        symbol: SymbolClass,
        procs: impl IntoIterator<Item = Procedure>,
    ) -> DrillResult<Self> {
        if self.continuities.contains_key(&symbol) {
            return Err(DrillError::validation(format!(
                "duplicate continuity for symbol {symbol:?}"
            )));
        }
        self.continuities.insert(symbol, procs.into_iter().collect());
        Ok(self)
    }

    pub fn build(self) -> DrillResult<Sheet> {
        if self.name.trim().is_empty() {
            return Err(DrillError::validation("sheet name must be non-empty"));
        }
        Ok(Sheet {
            name: self.name,
            beats: self.beats,
            in_animation: self.in_animation,
            points: self.points,
            continuities: self.continuities,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/show/builder.rs"]
mod tests;
