use crate::foundation::core::{AnimateDir, Coord, round_to_units};
use crate::foundation::math::{bound_direction, deg_to_rad};

/// A motion primitive with a beat cursor.
///
/// Parameters are fixed at construction; only the cursor moves, and [`Command::clip_beats`]
/// may narrow the duration. Move and Rotate keep their natural duration separately so the
/// per-beat rate is unchanged by clipping: a clipped command stops short of its full extent.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Command {
    beats: u32,
    #[serde(skip)]
    cursor: u32,
    kind: CommandKind,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CommandKind {
    /// No displacement, only a facing.
    MarkTime { facing: f64 },
    /// Straight-line displacement spread evenly over `natural_beats`.
    Move {
        vector: Coord,
        natural_beats: u32,
        facing: f64,
    },
    /// Arc about `center`; angles in degrees, radius in coordinate units.
    Rotate {
        center: Coord,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        natural_beats: u32,
        backwards: bool,
    },
}

impl Command {
    pub fn mark_time(beats: u32, facing: f64) -> Self {
        Self::with_kind(beats, CommandKind::MarkTime { facing })
    }

    /// Move by `vector`, facing the way it travels.
    pub fn movement(beats: u32, vector: Coord) -> Self {
        Self::movement_facing(beats, vector, bound_direction(vector.direction()))
    }

    /// Move by `vector` while facing `facing` (backwards or sideways marching).
    pub fn movement_facing(beats: u32, vector: Coord, facing: f64) -> Self {
        Self::with_kind(
            beats,
            CommandKind::Move {
                vector,
                natural_beats: beats,
                facing,
            },
        )
    }

    pub fn rotate(
        beats: u32,
        center: Coord,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        backwards: bool,
    ) -> Self {
        Self::with_kind(
            beats,
            CommandKind::Rotate {
                center,
                radius,
                start_angle,
                end_angle,
                natural_beats: beats,
                backwards,
            },
        )
    }

    fn with_kind(beats: u32, kind: CommandKind) -> Self {
        Self {
            beats,
            cursor: 0,
            kind,
        }
    }

    pub fn beats(&self) -> u32 {
        self.beats
    }

    pub fn cursor(&self) -> u32 {
        self.cursor
    }

    pub fn kind(&self) -> &CommandKind {
        &self.kind
    }

    /// Reset to the first beat. Zero-length commands take effect at once and report `false`.
    pub fn begin(&mut self, pt: &mut Coord) -> bool {
        self.cursor = 0;
        if self.beats == 0 {
            self.apply_forward(pt);
            return false;
        }
        true
    }

    /// Reset to the last beat. Zero-length commands are undone at once and report `false`.
    pub fn end(&mut self, pt: &mut Coord) -> bool {
        self.cursor = self.beats;
        if self.beats == 0 {
            self.apply_backward(pt);
            return false;
        }
        true
    }

    /// Step one beat forward; `false` once the command is exhausted.
    pub fn next_beat(&mut self, pt: &mut Coord) -> bool {
        if self.cursor >= self.beats {
            return false;
        }
        self.seek(pt, self.cursor + 1);
        self.cursor < self.beats
    }

    /// Step one beat back; `false` if already at the start.
    pub fn prev_beat(&mut self, pt: &mut Coord) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.seek(pt, self.cursor - 1);
        true
    }

    /// Jump to the end, moving `pt` by whatever remains.
    pub fn apply_forward(&mut self, pt: &mut Coord) {
        if self.beats > 0 {
            self.seek(pt, self.beats);
            return;
        }
        self.cursor = 0;
        match &self.kind {
            CommandKind::MarkTime { .. } => {}
            CommandKind::Move { .. } => *pt += self.instant_vector(),
            CommandKind::Rotate {
                start_angle,
                end_angle,
                natural_beats,
                ..
            } => {
                let a = if *natural_beats == 0 {
                    *end_angle
                } else {
                    *start_angle
                };
                *pt = self.arc_position(a);
            }
        }
    }

    /// Jump to the start, undoing whatever has been travelled.
    pub fn apply_backward(&mut self, pt: &mut Coord) {
        if self.beats > 0 {
            self.seek(pt, 0);
            return;
        }
        match &self.kind {
            CommandKind::MarkTime { .. } => {}
            CommandKind::Move { .. } => *pt -= self.instant_vector(),
            CommandKind::Rotate { start_angle, .. } => *pt = self.arc_position(*start_angle),
        }
    }

    /// Move the cursor to `beat` (clamped to the duration) in one step.
    pub fn seek(&mut self, pt: &mut Coord, beat: u32) {
        let beat = beat.min(self.beats);
        match &self.kind {
            CommandKind::MarkTime { .. } => {}
            CommandKind::Move { .. } => {
                *pt += self.move_offset(beat) - self.move_offset(self.cursor);
            }
            CommandKind::Rotate { .. } => *pt = self.arc_position(self.angle_at(beat)),
        }
        self.cursor = beat;
    }

    /// Put the cursor back at the start without touching any position.
    pub(crate) fn rewind(&mut self) {
        self.cursor = 0;
    }

    /// Narrow the duration to at most `beats`.
    pub fn clip_beats(&mut self, beats: u32) {
        self.beats = self.beats.min(beats);
        self.cursor = self.cursor.min(self.beats);
    }

    /// Direction of travel; feeds the direction-of-facing variable.
    pub fn motion_direction(&self) -> f64 {
        match &self.kind {
            CommandKind::Move { vector, .. } => bound_direction(vector.direction()),
            _ => self.real_direction(),
        }
    }

    /// Direction the marcher's body points; feeds the direction-of-heading variable.
    pub fn real_direction(&self) -> f64 {
        match &self.kind {
            CommandKind::MarkTime { facing } | CommandKind::Move { facing, .. } => {
                bound_direction(*facing)
            }
            CommandKind::Rotate {
                start_angle,
                end_angle,
                backwards,
                ..
            } => {
                let face = if *backwards { -90.0 } else { 90.0 };
                let curr = self.angle_at(self.cursor);
                if end_angle > start_angle {
                    bound_direction(curr + face)
                } else {
                    bound_direction(curr - face)
                }
            }
        }
    }

    pub fn facing(&self) -> AnimateDir {
        AnimateDir::from_angle(self.real_direction())
    }

    /// Where a marcher starting this command at `start` ends up.
    pub fn destination(&self, start: Coord) -> Coord {
        let mut cmd = self.clone();
        cmd.cursor = 0;
        let mut pt = start;
        cmd.apply_forward(&mut pt);
        pt
    }

    fn instant_vector(&self) -> Coord {
        match &self.kind {
            CommandKind::Move {
                vector,
                natural_beats: 0,
                ..
            } => *vector,
            _ => Coord::ZERO,
        }
    }

    // floor(v * k / n) per axis, so per-beat deltas never drift from the total
    fn move_offset(&self, k: u32) -> Coord {
        match &self.kind {
            CommandKind::Move {
                vector,
                natural_beats,
                ..
            } if *natural_beats > 0 => {
                let n = i64::from(*natural_beats);
                let k = i64::from(k);
                let axis = |v: i32| (i64::from(v) * k).div_euclid(n) as i32;
                Coord::new(axis(vector.x), axis(vector.y))
            }
            _ => Coord::ZERO,
        }
    }

    fn angle_at(&self, k: u32) -> f64 {
        match &self.kind {
            CommandKind::Rotate {
                start_angle,
                end_angle,
                natural_beats,
                ..
            } if *natural_beats > 0 => {
                start_angle + (end_angle - start_angle) * f64::from(k) / f64::from(*natural_beats)
            }
            CommandKind::Rotate { start_angle, .. } => *start_angle,
            _ => 0.0,
        }
    }

    fn arc_position(&self, angle: f64) -> Coord {
        let CommandKind::Rotate { center, radius, .. } = &self.kind else {
            return Coord::ZERO;
        };
        let rad = deg_to_rad(angle);
        Coord::new(
            round_to_units(f64::from(center.x) + rad.cos() * radius),
            round_to_units(f64::from(center.y) - rad.sin() * radius),
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/command.rs"]
mod tests;
