use std::collections::BTreeMap;

use crate::foundation::core::Coord;

/// Two marchers, stored lowest index first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct PointPair {
    pub first: usize,
    pub second: usize,
}

impl PointPair {
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            first: a.min(b),
            second: a.max(b),
        }
    }

    pub fn contains(self, point: usize) -> bool {
        self.first == point || self.second == point
    }
}

/// Ordered by severity, so `max` picks the worst.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionKind {
    /// Exactly at the minimum separation.
    Warning,
    /// Closer than the minimum separation.
    Intersect,
}

/// Compare two positions against a minimum separation of `threshold` units.
pub fn detect_collision(a: Coord, b: Coord, threshold: i32) -> Option<CollisionKind> {
    let dx = i64::from(a.x) - i64::from(b.x);
    let dy = i64::from(a.y) - i64::from(b.y);
    let t = i64::from(threshold);
    if dx.abs() > t || dy.abs() > t {
        return None;
    }
    let dist_sq = a.distance_squared(b);
    let limit = t * t;
    if dist_sq < limit {
        Some(CollisionKind::Intersect)
    } else if dist_sq == limit {
        Some(CollisionKind::Warning)
    } else {
        None
    }
}

/// Pairwise check over every marcher.
pub fn find_collisions(positions: &[Coord], threshold: i32) -> BTreeMap<PointPair, CollisionKind> {
    let mut out = BTreeMap::new();
    for (i, a) in positions.iter().enumerate() {
        for (j, b) in positions.iter().enumerate().skip(i + 1) {
            if let Some(kind) = detect_collision(*a, *b, threshold) {
                out.insert(PointPair::new(i, j), kind);
            }
        }
    }
    out
}

/// The most severe collision `point` takes part in.
pub fn worst_for(
    collisions: &BTreeMap<PointPair, CollisionKind>,
    point: usize,
) -> Option<CollisionKind> {
    collisions
        .iter()
        .filter(|(pair, _)| pair.contains(point))
        .map(|(_, kind)| *kind)
        .max()
}

#[cfg(test)]
#[path = "../../tests/unit/playback/collision.rs"]
mod tests;
