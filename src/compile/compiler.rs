use crate::{
    animation::command::Command,
    animation::vars::VariableEnv,
    compile::errors::{AnimateError, AnimationErrors},
    continuity::ast::{
        ContPoint, ContValue, DefinedValue, ProcKind, Procedure, SourceLoc, VarSlot,
    },
    foundation::core::{
        Coord, march_vector, steps_to_units, units_to_steps, units_to_whole_steps,
        vector_from_direction,
    },
    foundation::error::DrillResult,
    foundation::math::{
        SQRT2, bound_direction, bound_direction_signed, deg_to_rad, is_diagonal_direction, is_zero,
    },
    show::model::{NUM_REF_POINTS, Sheet, Show, SymbolClass},
};

/// How far a value may stray from the nearest integer before it is reported as non-integer.
const NONINT_TOLERANCE: f64 = 1e-3;

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// Commands for one marcher on one sheet.
pub struct CompiledSequence {
    /// Commands in playback order, cursors at their start.
    pub commands: Vec<Command>,
    /// Sum of command durations.
    pub beats_used: u32,
    /// `true` when the continuity fit the sheet's beat budget without overflow or shortfall.
    pub exact: bool,
}

#[tracing::instrument(skip(show))]
/// Compile the continuity attached to `symbol` on sheet `sheet_index` for marcher `point`.
///
/// Uses a fresh variable environment. Authoring mistakes come back as markers; a show that
/// fails [`Show::validate`] or an out-of-range sheet or point is an error.
pub fn compile(
    show: &Show,
    sheet_index: usize,
    point: usize,
    symbol: SymbolClass,
) -> DrillResult<(CompiledSequence, AnimationErrors)> {
    show.validate()?;
    let mut vars = VariableEnv::new();
    let mut errors = AnimationErrors::new();
    let seq = compile_point(show, sheet_index, point, symbol, &mut vars, &mut errors)?;
    Ok((seq, errors))
}

pub(crate) fn compile_point(
    show: &Show,
    sheet_index: usize,
    point: usize,
    symbol: SymbolClass,
    vars: &mut VariableEnv,
    errors: &mut AnimationErrors,
) -> DrillResult<CompiledSequence> {
    let sheet = show.sheet(sheet_index)?;
    let start = sheet.point(point)?.position;
    let next = show
        .next_animated_sheet(sheet_index)
        .and_then(|s| s.points.get(point))
        .map(|p| p.position);

    let mut st = CompileState {
        sheet,
        point,
        symbol,
        next,
        pos: start,
        beats_rem: sheet.beats,
        loc: None,
        halted: false,
        overflowed: false,
        vars,
        errors,
        commands: Vec::new(),
    };

    match sheet.continuity(symbol).filter(|procs| !procs.is_empty()) {
        Some(procs) => {
            for proc in procs {
                if st.halted {
                    break;
                }
                st.run(proc);
            }
        }
        None => {
            let default = match next {
                Some(_) => Procedure::new(ProcKind::Even {
                    steps: ContValue::Float(f64::from(st.beats_rem)),
                    point: ContPoint::Next,
                }),
                None => Procedure::new(ProcKind::MarkTimeRemaining {
                    dir: ContValue::Defined(DefinedValue::E),
                }),
            };
            st.run(&default);
        }
    }

    st.loc = None;
    if let Some(target) = next
        && st.pos != target
    {
        st.register(AnimateError::WrongPlace);
        let beats = st.beats_rem;
        st.append(Command::movement(beats, target - st.pos));
    }

    let short = st.beats_rem > 0;
    if short {
        st.register(AnimateError::ExtraTime);
        let beats = st.beats_rem;
        st.append(Command::mark_time(beats, DefinedValue::E.value()));
    }

    let beats_used = st.commands.iter().map(Command::beats).sum();
    Ok(CompiledSequence {
        exact: !st.overflowed && !short,
        beats_used,
        commands: st.commands,
    })
}

struct CompileState<'a> {
    sheet: &'a Sheet,
    point: usize,
    symbol: SymbolClass,
    next: Option<Coord>,
    pos: Coord,
    beats_rem: u32,
    loc: Option<SourceLoc>,
    halted: bool,
    overflowed: bool,
    vars: &'a mut VariableEnv,
    errors: &'a mut AnimationErrors,
    commands: Vec<Command>,
}

impl CompileState<'_> {
    fn register(&mut self, kind: AnimateError) {
        self.errors
            .register(kind, self.loc, self.point, self.symbol);
    }

    /// Budget, apply and record one command. `false` means the sheet had no beats left.
    fn append(&mut self, mut cmd: Command) -> bool {
        if self.beats_rem < cmd.beats() {
            self.register(AnimateError::OutOfTime);
            self.overflowed = true;
            if self.beats_rem == 0 {
                self.halted = true;
                return false;
            }
            cmd.clip_beats(self.beats_rem);
        }
        self.beats_rem -= cmd.beats();

        cmd.apply_forward(&mut self.pos);
        self.vars
            .set(VarSlot::Dof, self.point, cmd.motion_direction());
        self.vars
            .set(VarSlot::Doh, self.point, cmd.real_direction());
        cmd.rewind();
        self.commands.push(cmd);
        true
    }

    fn to_int(&mut self, v: f64) -> i32 {
        let r = (v + 0.5).floor();
        if (v - r).abs() > NONINT_TOLERANCE {
            self.register(AnimateError::NonInteger);
        }
        r as i32
    }

    fn to_unsigned(&mut self, v: f64) -> u32 {
        let i = self.to_int(v);
        if i < 0 {
            self.register(AnimateError::NegativeInteger);
            return 0;
        }
        i as u32
    }

    fn var(&mut self, slot: VarSlot) -> f64 {
        match self.vars.get(slot, self.point) {
            Some(v) => v,
            None => {
                self.register(AnimateError::UndefinedVariable);
                0.0
            }
        }
    }

    fn point_pos(&mut self, p: ContPoint) -> Coord {
        match p {
            ContPoint::Current => self.pos,
            ContPoint::Start => self.sheet.points[self.point].position,
            ContPoint::Next => match self.next {
                Some(c) => c,
                None => {
                    self.register(AnimateError::NoNextSheet);
                    self.pos
                }
            },
            ContPoint::Ref(n) if usize::from(n) > NUM_REF_POINTS => {
                self.register(AnimateError::UndefinedPoint);
                self.pos
            }
            ContPoint::Ref(n) => self.sheet.points[self.point].reference(n),
        }
    }

    fn eval(&mut self, v: &ContValue) -> f64 {
        match v {
            ContValue::Float(f) => *f,
            ContValue::Defined(d) => d.value(),
            ContValue::Rem => f64::from(self.beats_rem),
            ContValue::Var(slot) => self.var(*slot),
            ContValue::Neg(a) => -self.eval(a),
            ContValue::Add(a, b) => self.eval(a) + self.eval(b),
            ContValue::Sub(a, b) => self.eval(a) - self.eval(b),
            ContValue::Mul(a, b) => self.eval(a) * self.eval(b),
            ContValue::Div(a, b) => {
                let d = self.eval(b);
                if is_zero(d) {
                    self.register(AnimateError::DivisionByZero);
                    return 0.0;
                }
                self.eval(a) / d
            }
            ContValue::Dir(p) => {
                let c = self.point_pos(*p);
                if c == self.pos {
                    self.register(AnimateError::UndefinedDirection);
                }
                bound_direction(self.pos.direction_to(c))
            }
            ContValue::DirFrom(a, b) => {
                let from = self.point_pos(*a);
                let to = self.point_pos(*b);
                if from == to {
                    self.register(AnimateError::UndefinedDirection);
                }
                bound_direction(from.direction_to(to))
            }
            ContValue::Dist(p) => (self.point_pos(*p) - self.pos).dm_magnitude(),
            ContValue::DistFrom(a, b) => {
                let from = self.point_pos(*a);
                (self.point_pos(*b) - from).magnitude()
            }
            ContValue::Either { dir1, dir2, point } => {
                let c = self.point_pos(*point);
                let d1 = self.eval(dir1);
                if c == self.pos {
                    self.register(AnimateError::UndefinedDirection);
                    return d1;
                }
                let d2 = self.eval(dir2);
                let toward = self.pos.direction_to(c);
                if bound_direction_signed(d1 - toward).abs()
                    > bound_direction_signed(d2 - toward).abs()
                {
                    d2
                } else {
                    d1
                }
            }
            ContValue::Opp(d) => self.eval(d) + 180.0,
            ContValue::Step {
                beats,
                block,
                point,
            } => {
                let dist = (self.point_pos(*point) - self.pos).dm_magnitude();
                let beats = self.eval(beats);
                let block = self.eval(block);
                if is_zero(block) {
                    self.register(AnimateError::DivisionByZero);
                    return 0.0;
                }
                dist * beats / block
            }
        }
    }

    fn run(&mut self, proc: &Procedure) {
        self.loc = proc.loc;
        match &proc.kind {
            ProcKind::Set { var, value } => {
                let v = self.eval(value);
                self.vars.set(*var, self.point, v);
            }
            ProcKind::Blam => {
                let c = self.point_pos(ContPoint::Next) - self.pos;
                let beats = self.beats_rem;
                self.append(Command::movement(beats, c));
            }
            ProcKind::CounterMarch {
                start,
                through,
                steps,
                dir1,
                dir2,
                beats,
            } => {
                let d1 = self.eval(dir1);
                let d2 = self.eval(dir2);
                let ref1 = self.point_pos(*start);
                let ref2 = self.point_pos(*through);
                let steps = self.eval(steps);
                let beats = self.eval(beats);
                self.counter_march(ref1, ref2, steps, d1, d2, beats);
            }
            ProcKind::DmCounterMarch {
                start,
                through,
                beats,
            } => {
                let r1 = self.point_pos(*start);
                let r2 = self.point_pos(*through);
                let beats = self.eval(beats);
                let two = i64::from(steps_to_units(2.0));
                let dx = i64::from(r1.x) - i64::from(r2.x);
                let c = i64::from(r1.y) - i64::from(r2.y);
                let dirs = if c == -dx + two && c >= 0 {
                    Some((DefinedValue::SW, DefinedValue::W))
                } else if c == dx - two && c >= 0 {
                    Some((DefinedValue::SE, DefinedValue::W))
                } else if c == dx + two && c <= 0 {
                    Some((DefinedValue::NW, DefinedValue::E))
                } else if c == -dx - two && c <= 0 {
                    Some((DefinedValue::NE, DefinedValue::E))
                } else {
                    None
                };
                match dirs {
                    Some((d1, d2)) => {
                        self.counter_march(r1, r2, 1.0, d1.value(), d2.value(), beats)
                    }
                    None => self.register(AnimateError::InvalidCountermarch),
                }
            }
            ProcKind::HsCounterMarch {
                start,
                through,
                beats,
            } => {
                let r1 = self.point_pos(*start);
                let r2 = self.point_pos(*through);
                let beats = self.eval(beats);
                let two = i64::from(steps_to_units(2.0));
                let dx = i64::from(r1.x) - i64::from(r2.x);
                let dirs = if dx == two && r2.y <= r1.y {
                    Some((DefinedValue::S, DefinedValue::W))
                } else if dx == -two && r1.y <= r2.y {
                    Some((DefinedValue::N, DefinedValue::E))
                } else {
                    None
                };
                match dirs {
                    Some((d1, d2)) => {
                        self.counter_march(r1, r2, 1.0, d1.value(), d2.value(), beats)
                    }
                    None => self.register(AnimateError::InvalidCountermarch),
                }
            }
            ProcKind::DmHs { point } => {
                let c = self.point_pos(*point) - self.pos;
                let (hs, dm) = split_high_step_diagonal(c);
                if self.append_leg(dm) {
                    self.append_leg(hs);
                }
            }
            ProcKind::HsDm { point } => {
                let c = self.point_pos(*point) - self.pos;
                let (hs, dm) = split_high_step_diagonal(c);
                if self.append_leg(hs) {
                    self.append_leg(dm);
                }
            }
            ProcKind::EwNs { point } => {
                let c = self.point_pos(*point) - self.pos;
                if self.append_leg(Coord::new(c.x, 0)) {
                    self.append_leg(Coord::new(0, c.y));
                }
            }
            ProcKind::NsEw { point } => {
                let c = self.point_pos(*point) - self.pos;
                if self.append_leg(Coord::new(0, c.y)) {
                    self.append_leg(Coord::new(c.x, 0));
                }
            }
            ProcKind::Even { steps, point } => {
                let c = self.point_pos(*point) - self.pos;
                let steps = self.eval(steps);
                let steps = self.to_int(steps);
                if steps < 0 {
                    self.append(Command::movement_facing(steps.unsigned_abs(), c, opposite(c)));
                } else {
                    self.append(Command::movement(steps.unsigned_abs(), c));
                }
            }
            ProcKind::Fountain {
                dir1,
                dir2,
                step1,
                step2,
                point,
            } => self.fountain(dir1, dir2, step1.as_ref(), step2.as_ref(), *point),
            ProcKind::ForwardMarch { steps, dir } => {
                let steps = self.eval(steps);
                let b = self.to_int(steps);
                if b != 0 {
                    let dir = self.eval(dir);
                    let c = march_vector(dir, steps);
                    if !c.is_zero() {
                        self.append_directed(b, c, None);
                    }
                }
            }
            ProcKind::FmTo { point } => {
                let c = self.point_pos(*point) - self.pos;
                if !c.is_zero() {
                    self.append(Command::movement(c.dm_magnitude() as u32, c));
                }
            }
            ProcKind::Grid { size } => {
                let grid = steps_to_units(self.eval(size));
                let target = Coord::new(
                    round_to_grid(self.pos.x, grid),
                    round_to_grid(self.pos.y, grid),
                );
                let c = target - self.pos;
                if !c.is_zero() {
                    self.append(Command::movement(0, c));
                }
            }
            ProcKind::Magic { point } => {
                let c = self.point_pos(*point) - self.pos;
                self.append(Command::movement(0, c));
            }
            ProcKind::March {
                step_size,
                steps,
                dir,
                facing,
            } => {
                let steps = self.eval(steps);
                let b = self.to_int(steps);
                if b != 0 {
                    let dir = self.eval(dir);
                    let mag = self.eval(step_size) * steps;
                    let c = vector_from_direction(dir, mag);
                    if !c.is_zero() {
                        let face = facing.as_ref().map(|f| self.eval(f));
                        self.append_directed(b, c, face);
                    }
                }
            }
            ProcKind::MarkTime { beats, dir } => {
                let beats = self.eval(beats);
                let b = self.to_int(beats);
                if b != 0 {
                    let dir = self.eval(dir);
                    self.append(Command::mark_time(b.unsigned_abs(), dir));
                }
            }
            ProcKind::MarkTimeRemaining { dir } => {
                let dir = self.eval(dir);
                let beats = self.beats_rem;
                self.append(Command::mark_time(beats, dir));
            }
            ProcKind::Rotate {
                angle,
                steps,
                center,
                backwards,
            } => {
                let c = self.point_pos(*center);
                let start_angle = if c == self.pos {
                    self.var(VarSlot::Doh)
                } else {
                    bound_direction(c.direction_to(self.pos))
                };
                let steps = self.eval(steps);
                let b = self.to_int(steps);
                let angle = self.eval(angle);
                let rad = self.pos - c;
                let radius = f64::from(rad.x).hypot(f64::from(rad.y));
                self.append(Command::rotate(
                    b.unsigned_abs(),
                    c,
                    radius,
                    start_angle,
                    start_angle + angle,
                    *backwards || b < 0,
                ));
            }
        }
    }

    /// Axis-or-diagonal leg taking one beat per whole step; zero legs are skipped.
    fn append_leg(&mut self, v: Coord) -> bool {
        if v.is_zero() {
            return true;
        }
        let steps = if v.x != 0 { v.x } else { v.y };
        self.append(Command::movement(
            units_to_whole_steps(steps).unsigned_abs(),
            v,
        ))
    }

    /// Move over `|b|` beats; negative counts march backwards unless a facing is given.
    fn append_directed(&mut self, b: i32, c: Coord, facing: Option<f64>) -> bool {
        let beats = b.unsigned_abs();
        match facing {
            Some(face) => self.append(Command::movement_facing(beats, c, face)),
            None if b < 0 => self.append(Command::movement_facing(beats, c, opposite(c))),
            None => self.append(Command::movement(beats, c)),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn counter_march(
        &mut self,
        ref1: Coord,
        ref2: Coord,
        steps1: f64,
        d1: f64,
        d2: f64,
        mut beats: f64,
    ) {
        let sin_between = deg_to_rad(d1 - d2).sin();
        if is_zero(sin_between) {
            self.register(AnimateError::InvalidCountermarch);
            return;
        }

        // corners of the loop: p0 -> p1 heads d1, p1 -> p2 heads d2, then back
        let v1 = march_vector(d1, steps1);
        let p1 = ref1 + v1;
        let mut steps2 = (ref2 - p1).magnitude() * deg_to_rad(ref2.direction_to(p1) - d1).sin()
            / sin_between;
        if is_diagonal_direction(d2) {
            steps2 /= SQRT2;
        }
        let v2 = march_vector(d2, steps2);
        let p2 = p1 + v2;
        let p3 = ref2 - v1;
        let p0 = p3 - v2;
        let corners = [p0, p1, p2, p3];
        let headings = [d2 + 180.0, d1, d2, d1 + 180.0];

        let pos = self.pos;
        let on_leg = |leg: usize| {
            let v = corners[leg] - pos;
            !v.is_zero() && is_zero(bound_direction_signed(v.direction() - headings[leg]))
        };
        let Some(mut leg) = [1, 2, 3, 0].into_iter().find(|&leg| on_leg(leg)) else {
            self.register(AnimateError::InvalidCountermarch);
            return;
        };

        // stop after a full lap of legs that take no beats
        let mut idle_legs = 0;
        while beats > 0.0 {
            if self.beats_rem == 0 {
                if beats >= 0.5 {
                    self.register(AnimateError::OutOfTime);
                    self.overflowed = true;
                    self.halted = true;
                }
                return;
            }
            let v = corners[leg] - self.pos;
            let dist = v.dm_magnitude();
            if dist <= beats {
                beats -= dist;
                let b = if v.is_zero() {
                    0
                } else {
                    let b = self.to_unsigned(dist);
                    if !self.append(Command::movement(b, v)) {
                        return;
                    }
                    b
                };
                if b == 0 {
                    idle_legs += 1;
                    if idle_legs >= corners.len() {
                        self.register(AnimateError::InvalidCountermarch);
                        return;
                    }
                } else {
                    idle_legs = 0;
                }
            } else {
                let v = march_vector(headings[leg], beats);
                let b = self.to_unsigned(beats);
                self.append(Command::movement(b, v));
                return;
            }
            leg = (leg + 1) % corners.len();
        }
    }

    fn fountain(
        &mut self,
        dir1: &ContValue,
        dir2: &ContValue,
        step1: Option<&ContValue>,
        step2: Option<&ContValue>,
        point: ContPoint,
    ) {
        let f1 = self.eval(dir1);
        let s1 = step1.map_or(1.0, |s| self.eval(s));
        let (a, c) = (s1 * deg_to_rad(f1).cos(), -s1 * deg_to_rad(f1).sin());
        let f2 = self.eval(dir2);
        let s2 = step2.map_or(1.0, |s| self.eval(s));
        let (b, d) = (s2 * deg_to_rad(f2).cos(), -s2 * deg_to_rad(f2).sin());

        let v = self.point_pos(point) - self.pos;
        let (e, f) = (units_to_steps(v.x), units_to_steps(v.y));

        let det = a * d - b * c;
        if is_zero(det) {
            if is_zero(a - b) && is_zero(c - d) && is_zero(e * c - a * f) {
                // both legs run the same way; one straight move covers it
                let n = if is_zero(c) { e / a } else { f / c };
                let beats = self.to_unsigned(n);
                self.append(Command::movement(beats, v));
            } else {
                self.register(AnimateError::InvalidFountain);
            }
            return;
        }

        let first = (d * e - b * f) / det;
        if !is_zero(first) {
            let leg = Coord::new(steps_to_units(first * a), steps_to_units(first * c));
            let beats = self.to_unsigned(first);
            if !self.append(Command::movement(beats, leg)) {
                return;
            }
        }
        let second = (a * f - c * e) / det;
        if !is_zero(second) {
            let leg = Coord::new(steps_to_units(second * b), steps_to_units(second * d));
            let beats = self.to_unsigned(second);
            self.append(Command::movement(beats, leg));
        }
    }
}

fn opposite(c: Coord) -> f64 {
    bound_direction(c.direction() + 180.0)
}

/// Split a displacement into a high-step (axis) leg and a diagonal leg.
fn split_high_step_diagonal(c: Coord) -> (Coord, Coord) {
    let signs_differ = (c.x < 0) != (c.y < 0);
    if c.x.unsigned_abs() > c.y.unsigned_abs() {
        let diag_x = if signs_differ { c.y.saturating_neg() } else { c.y };
        (Coord::new(c.x.saturating_sub(diag_x), 0), Coord::new(diag_x, c.y))
    } else {
        let diag_y = if signs_differ { c.x.saturating_neg() } else { c.x };
        (Coord::new(0, c.y.saturating_sub(diag_y)), Coord::new(c.x, diag_y))
    }
}

/// Round to the nearest multiple of `grid`, halves away from zero.
fn round_to_grid(a: i32, grid: i32) -> i32 {
    let m = i64::from(grid).abs();
    if m == 0 {
        return a;
    }
    let a = i64::from(a);
    let r = if a < 0 {
        ((a - m / 2) / m) * m
    } else {
        ((a + m / 2) / m) * m
    };
    r.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

#[cfg(test)]
#[path = "../../tests/unit/compile/compiler.rs"]
mod tests;
