//! Parsed continuity programs.
//!
//! A continuity is an ordered list of [`Procedure`]s. Each procedure owns its value and point
//! expressions; the tree is finite and acyclic by construction. Nodes are produced by an
//! upstream parser (or by the helpers in [`crate::dsl`]) and are only read by the compiler.

use std::fmt;

/// Line/column of the token a procedure was parsed from.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct SourceLoc {
    pub line: u32,
    pub col: u32,
}

/// Continuity variable slots.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum VarSlot {
    A,
    B,
    C,
    D,
    X,
    Y,
    Z,
    /// Direction of facing, written after every appended command.
    Dof,
    /// Direction of heading, written after every appended command.
    Doh,
}

impl VarSlot {
    pub const COUNT: usize = 9;

    pub const ALL: [VarSlot; Self::COUNT] = [
        VarSlot::A,
        VarSlot::B,
        VarSlot::C,
        VarSlot::D,
        VarSlot::X,
        VarSlot::Y,
        VarSlot::Z,
        VarSlot::Dof,
        VarSlot::Doh,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::X => "X",
            Self::Y => "Y",
            Self::Z => "Z",
            Self::Dof => "DOF",
            Self::Doh => "DOH",
        }
    }
}

/// Named constants: compass directions (degrees) and step sizes (steps per beat).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum DefinedValue {
    N,
    NW,
    W,
    SW,
    S,
    SE,
    E,
    NE,
    /// High step.
    HS,
    /// Mini military.
    MM,
    /// Show high.
    SH,
    /// Jerky step.
    JS,
    /// Grapevine.
    GV,
    /// Military.
    M,
    /// Diagonal military.
    DM,
}

impl DefinedValue {
    pub fn value(self) -> f64 {
        match self {
            Self::E => 0.0,
            Self::NE => 45.0,
            Self::N => 90.0,
            Self::NW => 135.0,
            Self::W => 180.0,
            Self::SW => 225.0,
            Self::S => 270.0,
            Self::SE => 315.0,
            Self::HS | Self::MM | Self::GV => 1.0,
            Self::SH | Self::JS => 0.5,
            Self::M => 4.0 / 3.0,
            Self::DM => std::f64::consts::SQRT_2,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Self::N => "N",
            Self::NW => "NW",
            Self::W => "W",
            Self::SW => "SW",
            Self::S => "S",
            Self::SE => "SE",
            Self::E => "E",
            Self::NE => "NE",
            Self::HS => "HS",
            Self::MM => "MM",
            Self::SH => "SH",
            Self::JS => "JS",
            Self::GV => "GV",
            Self::M => "M",
            Self::DM => "DM",
        }
    }
}

/// A position a continuity can refer to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContPoint {
    /// Where the marcher is right now in the compile.
    Current,
    /// Where the marcher starts on this sheet.
    Start,
    /// Where the marcher stands on the next animated sheet.
    Next,
    /// Numbered reference point (1..=3) on this sheet.
    Ref(u8),
}

/// Numeric expressions.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContValue {
    Float(f64),
    Defined(DefinedValue),
    /// Beats remaining on the sheet.
    Rem,
    Var(VarSlot),
    Neg(Box<ContValue>),
    Add(Box<ContValue>, Box<ContValue>),
    Sub(Box<ContValue>, Box<ContValue>),
    Mul(Box<ContValue>, Box<ContValue>),
    Div(Box<ContValue>, Box<ContValue>),
    /// Direction from the current position to a point.
    Dir(ContPoint),
    /// Direction from one point to another.
    DirFrom(ContPoint, ContPoint),
    /// Diagonal-military distance from the current position to a point.
    Dist(ContPoint),
    /// Distance from one point to another.
    DistFrom(ContPoint, ContPoint),
    /// Whichever of two directions is the smaller turn toward a point.
    Either {
        dir1: Box<ContValue>,
        dir2: Box<ContValue>,
        point: ContPoint,
    },
    /// The opposite direction.
    Opp(Box<ContValue>),
    /// Step-drill beat count for a block.
    Step {
        beats: Box<ContValue>,
        block: Box<ContValue>,
        point: ContPoint,
    },
}

impl From<f64> for ContValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<i32> for ContValue {
    fn from(v: i32) -> Self {
        Self::Float(f64::from(v))
    }
}

impl From<DefinedValue> for ContValue {
    fn from(v: DefinedValue) -> Self {
        Self::Defined(v)
    }
}

impl From<VarSlot> for ContValue {
    fn from(v: VarSlot) -> Self {
        Self::Var(v)
    }
}

/// One statement of a continuity.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Procedure {
    pub kind: ProcKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLoc>,
}

impl Procedure {
    pub fn new(kind: ProcKind) -> Self {
        Self { kind, loc: None }
    }

    /// Attach the source position this procedure was parsed from.
    pub fn at(mut self, line: u32, col: u32) -> Self {
        self.loc = Some(SourceLoc { line, col });
        self
    }
}

impl From<ProcKind> for Procedure {
    fn from(kind: ProcKind) -> Self {
        Self::new(kind)
    }
}

/// Statement variants understood by the compiler.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcKind {
    /// Assign a variable.
    Set { var: VarSlot, value: ContValue },
    /// Move straight to the next point using all remaining beats.
    Blam,
    CounterMarch {
        start: ContPoint,
        through: ContPoint,
        steps: ContValue,
        dir1: ContValue,
        dir2: ContValue,
        beats: ContValue,
    },
    /// Diagonal-military countermarch.
    DmCounterMarch {
        start: ContPoint,
        through: ContPoint,
        beats: ContValue,
    },
    /// Diagonal leg first, then high-step leg.
    DmHs { point: ContPoint },
    /// Move evenly to a point over `steps` beats; negative steps face backwards.
    Even { steps: ContValue, point: ContPoint },
    /// East/west leg after the north/south leg.
    EwNs { point: ContPoint },
    Fountain {
        dir1: ContValue,
        dir2: ContValue,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        step1: Option<ContValue>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        step2: Option<ContValue>,
        point: ContPoint,
    },
    /// Forward march a number of steps in a direction.
    ForwardMarch { steps: ContValue, dir: ContValue },
    /// Forward march to a point.
    FmTo { point: ContPoint },
    /// Snap to a grid of the given size in steps.
    Grid { size: ContValue },
    /// High-step countermarch.
    HsCounterMarch {
        start: ContPoint,
        through: ContPoint,
        beats: ContValue,
    },
    /// High-step leg first, then diagonal leg.
    HsDm { point: ContPoint },
    /// Jump to a point in zero beats.
    Magic { point: ContPoint },
    March {
        step_size: ContValue,
        steps: ContValue,
        dir: ContValue,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        facing: Option<ContValue>,
    },
    MarkTime { beats: ContValue, dir: ContValue },
    /// Mark time for all remaining beats.
    MarkTimeRemaining { dir: ContValue },
    /// North/south leg after the east/west leg.
    NsEw { point: ContPoint },
    /// Arc about a centre point; `backwards` flips the facing offset.
    Rotate {
        angle: ContValue,
        steps: ContValue,
        center: ContPoint,
        #[serde(default)]
        backwards: bool,
    },
}

impl fmt::Display for VarSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for DefinedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl fmt::Display for ContPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Current => f.write_str("P"),
            Self::Start => f.write_str("SP"),
            Self::Next => f.write_str("NP"),
            Self::Ref(n) => write!(f, "R{n}"),
        }
    }
}

impl fmt::Display for ContValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Float(v) => write!(f, "{v}"),
            Self::Defined(d) => write!(f, "{d}"),
            Self::Rem => f.write_str("REM"),
            Self::Var(v) => write!(f, "{v}"),
            Self::Neg(v) => write!(f, "-{v}"),
            Self::Add(a, b) => write!(f, "({a} + {b})"),
            Self::Sub(a, b) => write!(f, "({a} - {b})"),
            Self::Mul(a, b) => write!(f, "({a} * {b})"),
            Self::Div(a, b) => write!(f, "({a} / {b})"),
            Self::Dir(p) => write!(f, "DIR({p})"),
            Self::DirFrom(a, b) => write!(f, "DIRFROM({a} {b})"),
            Self::Dist(p) => write!(f, "DIST({p})"),
            Self::DistFrom(a, b) => write!(f, "DISTFROM({a} {b})"),
            Self::Either { dir1, dir2, point } => write!(f, "EITHER({dir1} {dir2} {point})"),
            Self::Opp(d) => write!(f, "OPP({d})"),
            Self::Step {
                beats,
                block,
                point,
            } => write!(f, "STEP({beats} {block} {point})"),
        }
    }
}

impl fmt::Display for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ProcKind::Set { var, value } => write!(f, "{var} = {value}"),
            ProcKind::Blam => f.write_str("BLAM"),
            ProcKind::CounterMarch {
                start,
                through,
                steps,
                dir1,
                dir2,
                beats,
            } => write!(f, "CM {start} {through} {steps} {dir1} {dir2} {beats}"),
            ProcKind::DmCounterMarch {
                start,
                through,
                beats,
            } => write!(f, "DMCM {start} {through} {beats}"),
            ProcKind::DmHs { point } => write!(f, "DMHS {point}"),
            ProcKind::Even { steps, point } => write!(f, "EVEN {steps} {point}"),
            ProcKind::EwNs { point } => write!(f, "EWNS {point}"),
            ProcKind::Fountain {
                dir1,
                dir2,
                step1,
                step2,
                point,
            } => {
                write!(f, "FOUNTAIN {dir1} {dir2}")?;
                if let (Some(s1), Some(s2)) = (step1, step2) {
                    write!(f, " {s1} {s2}")?;
                }
                write!(f, " {point}")
            }
            ProcKind::ForwardMarch { steps, dir } => write!(f, "FM {steps} {dir}"),
            ProcKind::FmTo { point } => write!(f, "FMTO {point}"),
            ProcKind::Grid { size } => write!(f, "GRID {size}"),
            ProcKind::HsCounterMarch {
                start,
                through,
                beats,
            } => write!(f, "HSCM {start} {through} {beats}"),
            ProcKind::HsDm { point } => write!(f, "HSDM {point}"),
            ProcKind::Magic { point } => write!(f, "MAGIC {point}"),
            ProcKind::March {
                step_size,
                steps,
                dir,
                facing,
            } => {
                write!(f, "MARCH {step_size} {steps} {dir}")?;
                if let Some(face) = facing {
                    write!(f, " {face}")?;
                }
                Ok(())
            }
            ProcKind::MarkTime { beats, dir } => write!(f, "MT {beats} {dir}"),
            ProcKind::MarkTimeRemaining { dir } => write!(f, "MTRM {dir}"),
            ProcKind::NsEw { point } => write!(f, "NSEW {point}"),
            ProcKind::Rotate {
                angle,
                steps,
                center,
                backwards,
            } => {
                let kw = if *backwards { "ROTATE BACK" } else { "ROTATE" };
                write!(f, "{kw} {angle} {steps} {center}")
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/continuity/ast.rs"]
mod tests;
