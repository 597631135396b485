use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use crate::foundation::math::{SQRT2, bound_direction, deg_to_rad, is_diagonal_direction};

pub use kurbo::Vec2;

/// Fixed-point units per marching step.
pub const COORD_DECIMAL: i32 = 16;

/// A field position or displacement in fixed-point show units.
///
/// `x` grows toward the east, `y` grows toward the south (screen convention), and one
/// marching step is [`COORD_DECIMAL`] units.
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
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Largest magnitude a show position may have on either axis. Differences of in-range
    /// positions always fit in `i32`.
    pub const LIMIT: i32 = 1 << 24;

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Build a coordinate from whole steps.
    pub const fn steps(x: i32, y: i32) -> Self {
        Self {
            x: x * COORD_DECIMAL,
            y: y * COORD_DECIMAL,
        }
    }

    pub fn is_zero(self) -> bool {
        self == Self::ZERO
    }

    /// Both axes within [`Coord::LIMIT`].
    pub fn in_range(self) -> bool {
        self.x.unsigned_abs() <= Self::LIMIT.unsigned_abs()
            && self.y.unsigned_abs() <= Self::LIMIT.unsigned_abs()
    }

    /// The vector in (fractional) steps.
    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(units_to_steps(self.x), units_to_steps(self.y))
    }

    /// Euclidean length in steps.
    pub fn magnitude(self) -> f64 {
        self.to_vec2().hypot()
    }

    /// Length in steps, except exact diagonals count one step per unit of travel along an
    /// axis (diagonal military stride).
    pub fn dm_magnitude(self) -> f64 {
        if self.x == self.y || self.x == -self.y {
            units_to_steps(self.x).abs()
        } else {
            self.magnitude()
        }
    }

    /// Direction of this vector in degrees; east is 0 and angles grow counter-clockwise.
    /// The zero vector has direction 0.
    pub fn direction(self) -> f64 {
        if self.is_zero() {
            return 0.0;
        }
        // flip y so north is +90; `0.0 - y` keeps due west at +180 rather than -180
        Vec2::new(f64::from(self.x), 0.0 - f64::from(self.y))
            .atan2()
            .to_degrees()
    }

    /// Direction from `self` toward `other`.
    pub fn direction_to(self, other: Coord) -> f64 {
        (other - self).direction()
    }

    pub(crate) fn distance_squared(self, other: Coord) -> i64 {
        let dx = i64::from(self.x) - i64::from(other.x);
        let dy = i64::from(self.y) - i64::from(other.y);
        dx * dx + dy * dy
    }
}

impl Add for Coord {
    type Output = Coord;

    fn add(self, rhs: Coord) -> Coord {
        Coord::new(self.x.saturating_add(rhs.x), self.y.saturating_add(rhs.y))
    }
}

impl Sub for Coord {
    type Output = Coord;

    fn sub(self, rhs: Coord) -> Coord {
        Coord::new(self.x.saturating_sub(rhs.x), self.y.saturating_sub(rhs.y))
    }
}

impl AddAssign for Coord {
    fn add_assign(&mut self, rhs: Coord) {
        *self = *self + rhs;
    }
}

impl SubAssign for Coord {
    fn sub_assign(&mut self, rhs: Coord) {
        *self = *self - rhs;
    }
}

impl Neg for Coord {
    type Output = Coord;

    fn neg(self) -> Coord {
        Coord::new(self.x.saturating_neg(), self.y.saturating_neg())
    }
}

/// Round a value that is already in coordinate units (half away from zero).
pub fn round_to_units(v: f64) -> i32 {
    v.round() as i32
}

/// Convert fractional steps to coordinate units.
pub fn steps_to_units(steps: f64) -> i32 {
    round_to_units(steps * f64::from(COORD_DECIMAL))
}

/// Convert coordinate units to fractional steps.
pub fn units_to_steps(units: i32) -> f64 {
    f64::from(units) / f64::from(COORD_DECIMAL)
}

/// Convert coordinate units to whole steps, truncating toward zero.
pub fn units_to_whole_steps(units: i32) -> i32 {
    units / COORD_DECIMAL
}

/// A displacement of `steps` steps heading `dir_deg` degrees.
pub fn vector_from_direction(dir_deg: f64, steps: f64) -> Coord {
    let rad = deg_to_rad(dir_deg);
    Coord::new(
        steps_to_units(rad.cos() * steps),
        steps_to_units(-rad.sin() * steps),
    )
}

/// Like [`vector_from_direction`], but diagonal strides cover one step on each axis.
pub fn march_vector(dir_deg: f64, steps: f64) -> Coord {
    if is_diagonal_direction(dir_deg) {
        vector_from_direction(dir_deg, steps * SQRT2)
    } else {
        vector_from_direction(dir_deg, steps)
    }
}

/// Eight-way facing used when drawing a marcher.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum AnimateDir {
    E,
    NE,
    N,
    NW,
    W,
    SW,
    S,
    SE,
}

impl AnimateDir {
    const ORDER: [AnimateDir; 8] = [
        AnimateDir::E,
        AnimateDir::NE,
        AnimateDir::N,
        AnimateDir::NW,
        AnimateDir::W,
        AnimateDir::SW,
        AnimateDir::S,
        AnimateDir::SE,
    ];

    /// Snap an angle in degrees to the nearest octant.
    pub fn from_angle(deg: f64) -> Self {
        let octant = ((bound_direction(deg) + 22.5) / 45.0) as usize;
        Self::ORDER[octant % 8]
    }
}
