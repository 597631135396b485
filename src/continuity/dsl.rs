//! Shorthand constructors for continuity programs.
//!
//! These mirror the continuity keywords so tests and tools can write
//! `vec![fm(4, E), mt(4, E)]` instead of spelling out the enum tree.

use crate::continuity::ast::{ContPoint, ContValue, DefinedValue, ProcKind, Procedure, VarSlot};

pub use crate::continuity::ast::DefinedValue::{
    DM, E, GV, HS, JS, M, MM, N, NE, NW, S, SE, SH, SW, W,
};

pub const P: ContPoint = ContPoint::Current;
pub const SP: ContPoint = ContPoint::Start;
pub const NP: ContPoint = ContPoint::Next;

pub fn r(n: u8) -> ContPoint {
    ContPoint::Ref(n)
}

pub fn rem() -> ContValue {
    ContValue::Rem
}

pub fn var(slot: VarSlot) -> ContValue {
    ContValue::Var(slot)
}

pub fn neg(v: impl Into<ContValue>) -> ContValue {
    ContValue::Neg(Box::new(v.into()))
}

pub fn add(a: impl Into<ContValue>, b: impl Into<ContValue>) -> ContValue {
    ContValue::Add(Box::new(a.into()), Box::new(b.into()))
}

pub fn sub(a: impl Into<ContValue>, b: impl Into<ContValue>) -> ContValue {
    ContValue::Sub(Box::new(a.into()), Box::new(b.into()))
}

pub fn mul(a: impl Into<ContValue>, b: impl Into<ContValue>) -> ContValue {
    ContValue::Mul(Box::new(a.into()), Box::new(b.into()))
}

pub fn div(a: impl Into<ContValue>, b: impl Into<ContValue>) -> ContValue {
    ContValue::Div(Box::new(a.into()), Box::new(b.into()))
}

pub fn dir(p: ContPoint) -> ContValue {
    ContValue::Dir(p)
}

pub fn dir_from(from: ContPoint, to: ContPoint) -> ContValue {
    ContValue::DirFrom(from, to)
}

pub fn dist(p: ContPoint) -> ContValue {
    ContValue::Dist(p)
}

pub fn dist_from(from: ContPoint, to: ContPoint) -> ContValue {
    ContValue::DistFrom(from, to)
}

pub fn either(
    dir1: impl Into<ContValue>,
    dir2: impl Into<ContValue>,
    point: ContPoint,
) -> ContValue {
    ContValue::Either {
        dir1: Box::new(dir1.into()),
        dir2: Box::new(dir2.into()),
        point,
    }
}

pub fn opp(d: impl Into<ContValue>) -> ContValue {
    ContValue::Opp(Box::new(d.into()))
}

pub fn step(
    beats: impl Into<ContValue>,
    block: impl Into<ContValue>,
    point: ContPoint,
) -> ContValue {
    ContValue::Step {
        beats: Box::new(beats.into()),
        block: Box::new(block.into()),
        point,
    }
}

pub fn set(slot: VarSlot, value: impl Into<ContValue>) -> Procedure {
    ProcKind::Set {
        var: slot,
        value: value.into(),
    }
    .into()
}

pub fn blam() -> Procedure {
    ProcKind::Blam.into()
}

pub fn cm(
    start: ContPoint,
    through: ContPoint,
    steps: impl Into<ContValue>,
    dir1: impl Into<ContValue>,
    dir2: impl Into<ContValue>,
    beats: impl Into<ContValue>,
) -> Procedure {
    ProcKind::CounterMarch {
        start,
        through,
        steps: steps.into(),
        dir1: dir1.into(),
        dir2: dir2.into(),
        beats: beats.into(),
    }
    .into()
}

pub fn dmcm(start: ContPoint, through: ContPoint, beats: impl Into<ContValue>) -> Procedure {
    ProcKind::DmCounterMarch {
        start,
        through,
        beats: beats.into(),
    }
    .into()
}

pub fn dmhs(point: ContPoint) -> Procedure {
    ProcKind::DmHs { point }.into()
}

pub fn even(steps: impl Into<ContValue>, point: ContPoint) -> Procedure {
    ProcKind::Even {
        steps: steps.into(),
        point,
    }
    .into()
}

pub fn ewns(point: ContPoint) -> Procedure {
    ProcKind::EwNs { point }.into()
}

pub fn fountain(
    dir1: impl Into<ContValue>,
    dir2: impl Into<ContValue>,
    point: ContPoint,
) -> Procedure {
    ProcKind::Fountain {
        dir1: dir1.into(),
        dir2: dir2.into(),
        step1: None,
        step2: None,
        point,
    }
    .into()
}

pub fn fountain_steps(
    dir1: impl Into<ContValue>,
    dir2: impl Into<ContValue>,
    step1: impl Into<ContValue>,
    step2: impl Into<ContValue>,
    point: ContPoint,
) -> Procedure {
    ProcKind::Fountain {
        dir1: dir1.into(),
        dir2: dir2.into(),
        step1: Some(step1.into()),
        step2: Some(step2.into()),
        point,
    }
    .into()
}

pub fn fm(steps: impl Into<ContValue>, dir: impl Into<ContValue>) -> Procedure {
    ProcKind::ForwardMarch {
        steps: steps.into(),
        dir: dir.into(),
    }
    .into()
}

pub fn fmto(point: ContPoint) -> Procedure {
    ProcKind::FmTo { point }.into()
}

pub fn grid(size: impl Into<ContValue>) -> Procedure {
    ProcKind::Grid { size: size.into() }.into()
}

pub fn hscm(start: ContPoint, through: ContPoint, beats: impl Into<ContValue>) -> Procedure {
    ProcKind::HsCounterMarch {
        start,
        through,
        beats: beats.into(),
    }
    .into()
}

pub fn hsdm(point: ContPoint) -> Procedure {
    ProcKind::HsDm { point }.into()
}

pub fn magic(point: ContPoint) -> Procedure {
    ProcKind::Magic { point }.into()
}

pub fn march(
    step_size: impl Into<ContValue>,
    steps: impl Into<ContValue>,
    dir: impl Into<ContValue>,
) -> Procedure {
    ProcKind::March {
        step_size: step_size.into(),
        steps: steps.into(),
        dir: dir.into(),
        facing: None,
    }
    .into()
}

pub fn march_facing(
    step_size: impl Into<ContValue>,
    steps: impl Into<ContValue>,
    dir: impl Into<ContValue>,
    facing: impl Into<ContValue>,
) -> Procedure {
    ProcKind::March {
        step_size: step_size.into(),
        steps: steps.into(),
        dir: dir.into(),
        facing: Some(facing.into()),
    }
    .into()
}

pub fn mt(beats: impl Into<ContValue>, dir: impl Into<ContValue>) -> Procedure {
    ProcKind::MarkTime {
        beats: beats.into(),
        dir: dir.into(),
    }
    .into()
}

pub fn mtrm(dir: impl Into<ContValue>) -> Procedure {
    ProcKind::MarkTimeRemaining { dir: dir.into() }.into()
}

pub fn nsew(point: ContPoint) -> Procedure {
    ProcKind::NsEw { point }.into()
}

pub fn rotate(
    angle: impl Into<ContValue>,
    steps: impl Into<ContValue>,
    center: ContPoint,
) -> Procedure {
    ProcKind::Rotate {
        angle: angle.into(),
        steps: steps.into(),
        center,
        backwards: false,
    }
    .into()
}

pub fn rotate_back(
    angle: impl Into<ContValue>,
    steps: impl Into<ContValue>,
    center: ContPoint,
) -> Procedure {
    ProcKind::Rotate {
        angle: angle.into(),
        steps: steps.into(),
        center,
        backwards: true,
    }
    .into()
}

/// Helper so `DefinedValue` constants read naturally where a direction is expected.
pub fn defined(v: DefinedValue) -> ContValue {
    ContValue::Defined(v)
}

#[cfg(test)]
#[path = "../../tests/unit/continuity/dsl.rs"]
mod tests;
