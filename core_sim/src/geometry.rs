//! Integer predicates over circles and grid bounds.

use std::ops::RangeInclusive;

use sim_schema::{Bounds, Circle, Coord};

/// The eight neighbour offsets, diagonals included.
pub const NEIGHBOUR_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Every cell covered by the circle is a grid cell.
pub fn circle_in_bounds(circle: &Circle, bounds: Bounds) -> bool {
    let r = circle.radius as i64;
    let (x, y) = (circle.x as i64, circle.y as i64);
    x - r >= 0 && y - r >= 0 && x + r < bounds.width as i64 && y + r < bounds.height as i64
}

/// Centers closer than the sum of the radii.
pub fn circles_overlap(a: &Circle, b: &Circle) -> bool {
    let reach = a.radius as i64 + b.radius as i64;
    a.center().distance_squared(b.center()) < reach * reach
}

/// In bounds and clear of every placed circle.
pub fn can_place(candidate: &Circle, placed: &[Circle], bounds: Bounds) -> bool {
    circle_in_bounds(candidate, bounds) && placed.iter().all(|c| !circles_overlap(candidate, c))
}

/// Valid center coordinates along one axis for a circle of `radius`.
/// `None` when the circle cannot fit at all.
pub fn center_range(radius: u32, extent: u32) -> Option<RangeInclusive<i32>> {
    let low = radius as i64;
    let high = extent as i64 - 1 - radius as i64;
    if high < low {
        return None;
    }
    Some(low as i32..=high as i32)
}

/// In-bounds neighbours of `coord` in [`NEIGHBOUR_OFFSETS`] order.
pub fn neighbours(coord: Coord, bounds: Bounds) -> Vec<Coord> {
    NEIGHBOUR_OFFSETS
        .iter()
        .map(|&(dx, dy)| coord.offset(dx, dy))
        .filter(|n| bounds.contains(*n))
        .collect()
}
