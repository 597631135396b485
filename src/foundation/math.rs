/// Tolerance used for float comparisons in continuity arithmetic.
pub const EPSILON: f64 = 0.00001;

pub(crate) const SQRT2: f64 = std::f64::consts::SQRT_2;

pub(crate) fn is_zero(v: f64) -> bool {
    v.abs() < EPSILON
}

/// Normalize an angle in degrees into `[0, 360)`.
pub fn bound_direction(deg: f64) -> f64 {
    let a = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if a >= 360.0 { 0.0 } else { a }
}

/// Normalize an angle in degrees into `[-180, 180)`.
pub fn bound_direction_signed(deg: f64) -> f64 {
    bound_direction(deg + 180.0) - 180.0
}

/// True when `deg` points along one of the four diagonals.
pub fn is_diagonal_direction(deg: f64) -> bool {
    let a = bound_direction(deg);
    [45.0, 135.0, 225.0, 315.0]
        .iter()
        .any(|d| is_zero(a - d))
}

pub(crate) fn deg_to_rad(deg: f64) -> f64 {
    deg.to_radians()
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
