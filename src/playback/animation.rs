use std::collections::BTreeMap;

use rayon::prelude::*;

use crate::{
    animation::command::Command,
    animation::vars::VariableEnv,
    compile::compiler::{CompiledSequence, compile_point},
    compile::errors::AnimationErrors,
    foundation::core::{COORD_DECIMAL, Coord},
    foundation::error::{DrillError, DrillResult},
    playback::collision::{CollisionKind, PointPair, find_collisions},
    playback::scrub::Scrubber,
    show::model::Show,
};

/// Options for [`Animation::build_with`].
#[derive(Clone, Debug)]
pub struct BuildOptions {
    /// Compile marchers on a rayon pool instead of the calling thread.
    pub parallel: bool,
    /// Worker count for the parallel build; `None` uses rayon's default.
    pub threads: Option<usize>,
    /// Minimum separation between marchers, in coordinate units.
    pub collision_threshold: i32,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            parallel: false,
            threads: None,
            collision_threshold: COORD_DECIMAL,
        }
    }
}

/// One animated sheet: starting positions plus a compiled sequence per marcher.
#[derive(Clone, Debug, serde::Serialize)]
pub struct AnimationSheet {
    pub name: String,
    /// Index of the sheet in the source show.
    pub show_index: usize,
    pub beats: u32,
    pub starts: Vec<Coord>,
    pub sequences: Vec<CompiledSequence>,
    pub errors: AnimationErrors,
}

/// A fully compiled show, queryable by global beat.
///
/// Built once and then read-only; every query works on scratch copies of the commands.
#[derive(Clone, Debug)]
pub struct Animation {
    sheets: Vec<AnimationSheet>,
    sheet_starts: Vec<u32>,
    total_beats: u32,
    num_points: usize,
    collision_threshold: i32,
}

impl Animation {
    pub fn build(show: &Show) -> DrillResult<Self> {
        Self::build_with(show, &BuildOptions::default())
    }

    #[tracing::instrument(skip(show))]
    /// Compile every marcher on every animated sheet.
    ///
    /// Each marcher keeps one variable environment for the whole show, so direction variables
    /// carry over between sheets. Parallel and sequential builds produce identical results.
    pub fn build_with(show: &Show, opts: &BuildOptions) -> DrillResult<Self> {
        if opts.collision_threshold < 0 {
            return Err(DrillError::validation(
                "collision threshold must be >= 0",
            ));
        }
        show.validate()?;

        let animated = show.animated_sheet_indices();
        let num_points = show.num_points();

        let per_point: Vec<Vec<(CompiledSequence, AnimationErrors)>> = if opts.parallel {
            let pool = build_thread_pool(opts.threads)?;
            pool.install(|| {
                (0..num_points)
                    .into_par_iter()
                    .map(|p| compile_marcher(show, &animated, p))
                    .collect::<DrillResult<Vec<_>>>()
            })?
        } else {
            (0..num_points)
                .map(|p| compile_marcher(show, &animated, p))
                .collect::<DrillResult<Vec<_>>>()?
        };

        let mut sheets: Vec<AnimationSheet> = animated
            .iter()
            .map(|&i| {
                let s = &show.sheets[i];
                AnimationSheet {
                    name: s.name.clone(),
                    show_index: i,
                    beats: s.beats,
                    starts: s.points.iter().map(|p| p.position).collect(),
                    sequences: Vec::with_capacity(num_points),
                    errors: AnimationErrors::new(),
                }
            })
            .collect();

        // point order keeps marker merging deterministic
        for compiled in per_point {
            for (sheet, (seq, errors)) in sheets.iter_mut().zip(compiled) {
                sheet.sequences.push(seq);
                sheet.errors.merge(errors);
            }
        }

        let mut sheet_starts = Vec::with_capacity(sheets.len());
        let mut total_beats: u32 = 0;
        for sheet in &sheets {
            tracing::debug!(
                sheet = %sheet.name,
                beats = sheet.beats,
                markers = sheet.errors.len(),
                "compiled sheet"
            );
            sheet_starts.push(total_beats);
            total_beats = total_beats
                .checked_add(sheet.beats)
                .ok_or_else(|| DrillError::validation("show beat count overflows u32"))?;
        }

        Ok(Self {
            sheets,
            sheet_starts,
            total_beats,
            num_points,
            collision_threshold: opts.collision_threshold,
        })
    }

    pub fn total_beats(&self) -> u32 {
        self.total_beats
    }

    pub fn num_points(&self) -> usize {
        self.num_points
    }

    pub fn collision_threshold(&self) -> i32 {
        self.collision_threshold
    }

    pub fn sheets(&self) -> &[AnimationSheet] {
        &self.sheets
    }

    pub fn sheet(&self, index: usize) -> DrillResult<&AnimationSheet> {
        self.sheets.get(index).ok_or_else(|| {
            DrillError::playback(format!(
                "animated sheet {index} out of range (animation has {} sheets)",
                self.sheets.len()
            ))
        })
    }

    /// Global beat at which animated sheet `index` begins.
    pub fn sheet_start(&self, index: usize) -> Option<u32> {
        self.sheet_starts.get(index).copied()
    }

    /// Animated sheet index for a sheet of the source show, if it takes part in animation.
    pub fn sheet_for_show_index(&self, show_index: usize) -> Option<usize> {
        self.sheets.iter().position(|s| s.show_index == show_index)
    }

    /// Error markers for a sheet of the source show.
    pub fn errors_for_sheet(&self, show_index: usize) -> Option<&AnimationErrors> {
        self.sheet_for_show_index(show_index)
            .map(|i| &self.sheets[i].errors)
    }

    pub fn has_errors(&self) -> bool {
        self.sheets.iter().any(|s| !s.errors.is_empty())
    }

    /// Map a global beat to `(animated sheet, local beat)`.
    ///
    /// A beat on a sheet boundary belongs to the later sheet; `total_beats` is the end of the last.
    pub fn locate(&self, beat: u32) -> DrillResult<(usize, u32)> {
        if self.sheets.is_empty() {
            return Err(DrillError::playback("animation has no sheets"));
        }
        if beat > self.total_beats {
            return Err(DrillError::playback(format!(
                "beat {beat} out of range (animation has {} beats)",
                self.total_beats
            )));
        }
        let sheet = self
            .sheet_starts
            .partition_point(|&start| start <= beat)
            .saturating_sub(1);
        tracing::trace!(beat, sheet, "located beat");
        Ok((sheet, beat - self.sheet_starts[sheet]))
    }

    pub fn position_at(&self, point: usize, beat: u32) -> DrillResult<Coord> {
        self.check_point(point)?;
        let (sheet, local) = self.locate(beat)?;
        let sheet = &self.sheets[sheet];
        let mut pos = sheet.starts[point];
        let mut remaining = local;
        for cmd in &sheet.sequences[point].commands {
            if cmd.beats() > remaining {
                let mut scratch = cmd.clone();
                scratch.seek(&mut pos, remaining);
                break;
            }
            pos = cmd.destination(pos);
            remaining -= cmd.beats();
        }
        Ok(pos)
    }

    pub fn positions_at(&self, beat: u32) -> DrillResult<Vec<Coord>> {
        (0..self.num_points)
            .map(|p| self.position_at(p, beat))
            .collect()
    }

    pub fn collisions_at(&self, beat: u32) -> DrillResult<BTreeMap<PointPair, CollisionKind>> {
        let positions = self.positions_at(beat)?;
        Ok(find_collisions(&positions, self.collision_threshold))
    }

    /// Every beat with at least one collision, found by stepping through the show once.
    pub fn all_collisions(&self) -> BTreeMap<u32, BTreeMap<PointPair, CollisionKind>> {
        let mut out = BTreeMap::new();
        let mut scrub = Scrubber::new(self);
        loop {
            let found = scrub.collisions();
            if !found.is_empty() {
                out.insert(scrub.global_beat(), found);
            }
            if !scrub.next_beat() {
                break;
            }
        }
        out
    }

    /// `(start, command)` pairs tracing `point` across animated sheet `sheet`.
    pub fn path_for(&self, point: usize, sheet: usize) -> DrillResult<Vec<(Coord, Command)>> {
        self.check_point(point)?;
        let sheet = self.sheet(sheet)?;
        let mut pos = sheet.starts[point];
        Ok(sheet.sequences[point]
            .commands
            .iter()
            .map(|cmd| {
                let start = pos;
                pos = cmd.destination(pos);
                (start, cmd.clone())
            })
            .collect())
    }

    fn check_point(&self, point: usize) -> DrillResult<()> {
        if point >= self.num_points {
            return Err(DrillError::playback(format!(
                "point {point} out of range (animation has {} points)",
                self.num_points
            )));
        }
        Ok(())
    }
}

fn compile_marcher(
    show: &Show,
    animated: &[usize],
    point: usize,
) -> DrillResult<Vec<(CompiledSequence, AnimationErrors)>> {
    let mut vars = VariableEnv::new();
    animated
        .iter()
        .map(|&sheet| {
            let symbol = show.sheet(sheet)?.point(point)?.symbol;
            let mut errors = AnimationErrors::new();
            let seq = compile_point(show, sheet, point, symbol, &mut vars, &mut errors)?;
            Ok((seq, errors))
        })
        .collect()
}

fn build_thread_pool(threads: Option<usize>) -> DrillResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(DrillError::validation(
            "build option 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| DrillError::compile(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/playback/animation.rs"]
mod tests;
