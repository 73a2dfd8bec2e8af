use sim_schema::{Bounds, Circle, Coord, ZoneType};

/// Zone of a single coordinate.
///
/// A coordinate equal to any circle's center is `Center`, even when it also
/// lies inside an earlier circle; otherwise it is `Interior` if it is within
/// some radius, else `Exterior`.
pub fn classify(coord: Coord, circles: &[Circle]) -> ZoneType {
    if circles.iter().any(|c| c.center() == coord) {
        return ZoneType::Center;
    }
    let inside = circles.iter().any(|c| {
        let r = c.radius as i64;
        coord.distance_squared(c.center()) <= r * r
    });
    if inside {
        ZoneType::Interior
    } else {
        ZoneType::Exterior
    }
}

/// Row-major raster of [`classify`] over every in-bounds cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneGrid {
    bounds: Bounds,
    zones: Vec<ZoneType>,
}

impl ZoneGrid {
    pub fn build(bounds: Bounds, circles: &[Circle]) -> Self {
        let zones = bounds.coords().map(|c| classify(c, circles)).collect();
        Self { bounds, zones }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn zone_at(&self, coord: Coord) -> Option<ZoneType> {
        self.bounds.index_of(coord).map(|i| self.zones[i])
    }

    #[inline]
    pub fn zone_at_index(&self, index: usize) -> ZoneType {
        self.zones[index]
    }

    /// Zero outside the bounds.
    pub fn capacity_at(&self, coord: Coord) -> usize {
        self.zone_at(coord).map_or(0, ZoneType::capacity)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Coord, ZoneType)> + '_ {
        self.zones
            .iter()
            .enumerate()
            .map(|(i, zone)| (self.bounds.coord_at(i), *zone))
    }

    pub fn count(&self, zone: ZoneType) -> usize {
        self.zones.iter().filter(|z| **z == zone).count()
    }

    /// Sum of per-cell capacities.
    pub fn total_capacity(&self) -> usize {
        self.zones.iter().map(|z| z.capacity()).sum()
    }
}
