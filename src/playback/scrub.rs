use std::collections::BTreeMap;

use crate::{
    animation::command::Command,
    foundation::core::{AnimateDir, Coord},
    foundation::error::{DrillError, DrillResult},
    playback::animation::Animation,
    playback::collision::{CollisionKind, PointPair, find_collisions, worst_for},
};

/// What a renderer needs to draw one marcher at the current beat.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct MarcherInfo {
    pub position: Coord,
    pub facing: AnimateDir,
    /// Body direction in degrees.
    pub direction: f64,
    pub collision: Option<CollisionKind>,
}

/// Beat-by-beat playback over a built [`Animation`].
///
/// Holds its own copies of the current sheet's commands and steps them one beat at a time.
/// Jumps (`goto_beat`, `goto_sheet`, crossing a sheet boundary) reload the sheet and seek
/// each command directly instead of replaying every beat.
pub struct Scrubber<'a> {
    anim: &'a Animation,
    sheet: usize,
    beat: u32,
    marchers: Vec<Marcher>,
}

impl<'a> Scrubber<'a> {
    /// Start at the first beat of the show.
    pub fn new(anim: &'a Animation) -> Self {
        let mut scrub = Self {
            anim,
            sheet: 0,
            beat: 0,
            marchers: Vec::new(),
        };
        if let Ok((sheet, local)) = anim.locate(0) {
            scrub.load(sheet, local);
        }
        scrub
    }

    /// Current animated sheet.
    pub fn sheet(&self) -> usize {
        self.sheet
    }

    /// Beat within the current sheet.
    pub fn beat(&self) -> u32 {
        self.beat
    }

    pub fn global_beat(&self) -> u32 {
        self.anim.sheet_start(self.sheet).unwrap_or(0) + self.beat
    }

    /// Advance one beat; `false` at the end of the show.
    pub fn next_beat(&mut self) -> bool {
        let g = self.global_beat();
        if g >= self.anim.total_beats() {
            return false;
        }
        let Ok((sheet, local)) = self.anim.locate(g + 1) else {
            return false;
        };
        if sheet == self.sheet {
            for m in &mut self.marchers {
                m.next_beat();
            }
            self.beat = local;
        } else {
            self.load(sheet, local);
        }
        true
    }

    /// Back up one beat; `false` at the start of the show.
    pub fn prev_beat(&mut self) -> bool {
        let g = self.global_beat();
        if g == 0 {
            return false;
        }
        let Ok((sheet, local)) = self.anim.locate(g - 1) else {
            return false;
        };
        if sheet == self.sheet {
            for m in &mut self.marchers {
                m.prev_beat();
            }
            self.beat = local;
        } else {
            self.load(sheet, local);
        }
        true
    }

    pub fn goto_beat(&mut self, beat: u32) -> DrillResult<()> {
        let (sheet, local) = self.anim.locate(beat)?;
        self.load(sheet, local);
        Ok(())
    }

    /// Jump to the first beat of animated sheet `sheet`.
    pub fn goto_sheet(&mut self, sheet: usize) -> DrillResult<()> {
        self.anim.sheet(sheet)?;
        self.load(sheet, 0);
        Ok(())
    }

    /// Start of the following sheet, or the end of the show when on the last one.
    pub fn next_sheet(&mut self) -> bool {
        if self.sheet + 1 < self.anim.sheets().len() {
            self.load(self.sheet + 1, 0);
            return true;
        }
        let end = self.anim.sheets().get(self.sheet).map_or(0, |s| s.beats);
        if self.beat == end {
            return false;
        }
        self.load(self.sheet, end);
        true
    }

    /// Start of the current sheet, or of the previous one when already at a sheet start.
    pub fn prev_sheet(&mut self) -> bool {
        if self.beat > 0 {
            self.load(self.sheet, 0);
            return true;
        }
        if self.sheet == 0 {
            return false;
        }
        self.load(self.sheet - 1, 0);
        true
    }

    pub fn position(&self, point: usize) -> DrillResult<Coord> {
        self.marcher(point).map(|m| m.pos)
    }

    pub fn positions(&self) -> Vec<Coord> {
        self.marchers.iter().map(|m| m.pos).collect()
    }

    pub fn collisions(&self) -> BTreeMap<PointPair, CollisionKind> {
        find_collisions(&self.positions(), self.anim.collision_threshold())
    }

    pub fn info(&self, point: usize) -> DrillResult<MarcherInfo> {
        let m = self.marcher(point)?;
        let direction = m.commands.get(m.current).map_or(0.0, Command::real_direction);
        Ok(MarcherInfo {
            position: m.pos,
            facing: AnimateDir::from_angle(direction),
            direction,
            collision: worst_for(&self.collisions(), point),
        })
    }

    fn marcher(&self, point: usize) -> DrillResult<&Marcher> {
        self.marchers.get(point).ok_or_else(|| {
            DrillError::playback(format!(
                "point {point} out of range (animation has {} points)",
                self.marchers.len()
            ))
        })
    }

    fn load(&mut self, sheet: usize, local: u32) {
        let Some(s) = self.anim.sheets().get(sheet) else {
            return;
        };
        self.marchers = s
            .starts
            .iter()
            .zip(&s.sequences)
            .map(|(start, seq)| Marcher::seek(*start, seq.commands.clone(), local))
            .collect();
        self.sheet = sheet;
        self.beat = local.min(s.beats);
    }
}

struct Marcher {
    pos: Coord,
    commands: Vec<Command>,
    current: usize,
}

impl Marcher {
    /// Fresh commands from `start`, jumped straight to `local`.
    fn seek(start: Coord, mut commands: Vec<Command>, local: u32) -> Self {
        let mut pos = start;
        let mut current = 0;
        let mut remaining = local;
        for (i, cmd) in commands.iter_mut().enumerate() {
            current = i;
            if cmd.beats() > remaining {
                cmd.seek(&mut pos, remaining);
                break;
            }
            cmd.apply_forward(&mut pos);
            remaining -= cmd.beats();
        }
        Self {
            pos,
            commands,
            current,
        }
    }

    fn next_beat(&mut self) {
        let Some(cmd) = self.commands.get_mut(self.current) else {
            return;
        };
        if cmd.next_beat(&mut self.pos) {
            return;
        }
        // exhausted: zero-beat commands take effect as they are entered
        while self.current + 1 < self.commands.len() {
            self.current += 1;
            if self.commands[self.current].begin(&mut self.pos) {
                return;
            }
        }
    }

    fn prev_beat(&mut self) {
        while let Some(cmd) = self.commands.get_mut(self.current) {
            if cmd.beats() == 0 {
                cmd.apply_backward(&mut self.pos);
            } else if cmd.prev_beat(&mut self.pos) {
                return;
            }
            if self.current == 0 {
                return;
            }
            self.current -= 1;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/scrub.rs"]
mod tests;
