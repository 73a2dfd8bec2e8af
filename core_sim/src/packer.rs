//! Clustered rejection-sampling placement of spawn and bedroom circles.

use std::f64::consts::TAU;
use std::ops::RangeInclusive;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use sim_schema::{Bounds, Circle, CircleKind, CircleSet, MapConfig};
use thiserror::Error;

use crate::geometry::{can_place, center_range};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PackingConfig {
    /// Candidates tried per circle before the whole pack fails.
    pub attempt_budget: u32,
    /// Anchored proposals tried per candidate before falling back to a uniform one.
    pub nearby_attempts: u32,
}

impl Default for PackingConfig {
    fn default() -> Self {
        Self {
            attempt_budget: 3000,
            nearby_attempts: 30,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PackingError {
    /// `ordinal` counts from 1 within the circle's kind.
    #[error("failed to place {kind} {ordinal} after {attempts} attempts")]
    Exhausted {
        kind: CircleKind,
        ordinal: u32,
        attempts: u32,
    },
    #[error("{kind} radius must be at least 1")]
    ZeroRadius { kind: CircleKind },
    #[error("{kind} radius {radius} cannot fit inside {width}x{height} bounds")]
    DoesNotFit {
        kind: CircleKind,
        radius: u32,
        width: u32,
        height: u32,
    },
}

/// Places every spawn circle, then every bedroom circle.
///
/// Each candidate is first proposed next to a randomly chosen placed circle,
/// at a random angle and a distance in `[r_anchor + r, r_anchor + r + max_gap]`.
/// If none of `nearby_attempts` anchored proposals has an in-bounds center,
/// that candidate is drawn uniformly over the valid center range instead.
/// Either way it must clear every placed circle; a circle that exhausts
/// `attempt_budget` candidates fails the whole pack.
#[derive(Debug, Clone, Copy, Default)]
pub struct CirclePacker {
    config: PackingConfig,
}

struct CenterRanges {
    x: RangeInclusive<i32>,
    y: RangeInclusive<i32>,
}

impl CirclePacker {
    pub fn new(config: PackingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PackingConfig {
        &self.config
    }

    pub fn pack<R: Rng + ?Sized>(
        &self,
        map: &MapConfig,
        rng: &mut R,
    ) -> Result<CircleSet, PackingError> {
        let bounds = map.bounds();
        let requests = [
            (CircleKind::Spawn, map.spawn_count, map.spawn_radius),
            (CircleKind::Bedroom, map.bedroom_count, map.bedroom_radius),
        ];
        let mut placed: CircleSet =
            Vec::with_capacity((map.spawn_count + map.bedroom_count) as usize);

        for (kind, count, radius) in requests {
            if count == 0 {
                continue;
            }
            let ranges = Self::center_ranges(kind, radius, bounds)?;
            for ordinal in 1..=count {
                let circle = self.place_one(kind, ordinal, radius, map, &ranges, &placed, rng)?;
                tracing::trace!(
                    target: "circle_map::packer",
                    kind = %kind,
                    ordinal,
                    x = circle.x,
                    y = circle.y,
                    "circle.placed"
                );
                placed.push(circle);
            }
        }
        Ok(placed)
    }

    fn center_ranges(
        kind: CircleKind,
        radius: u32,
        bounds: Bounds,
    ) -> Result<CenterRanges, PackingError> {
        if radius == 0 {
            return Err(PackingError::ZeroRadius { kind });
        }
        let does_not_fit = || PackingError::DoesNotFit {
            kind,
            radius,
            width: bounds.width,
            height: bounds.height,
        };
        Ok(CenterRanges {
            x: center_range(radius, bounds.width).ok_or_else(does_not_fit)?,
            y: center_range(radius, bounds.height).ok_or_else(does_not_fit)?,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn place_one<R: Rng + ?Sized>(
        &self,
        kind: CircleKind,
        ordinal: u32,
        radius: u32,
        map: &MapConfig,
        ranges: &CenterRanges,
        placed: &[Circle],
        rng: &mut R,
    ) -> Result<Circle, PackingError> {
        let bounds = map.bounds();
        if placed.is_empty() && kind == CircleKind::Spawn {
            let center = bounds.center();
            let candidate = Circle::new(center.x, center.y, radius, kind);
            if can_place(&candidate, placed, bounds) {
                return Ok(candidate);
            }
        }

        for _ in 0..self.config.attempt_budget {
            let (x, y) = self.propose(radius, map.max_gap, ranges, placed, rng);
            let candidate = Circle::new(x, y, radius, kind);
            if can_place(&candidate, placed, bounds) {
                return Ok(candidate);
            }
        }

        Err(PackingError::Exhausted {
            kind,
            ordinal,
            attempts: self.config.attempt_budget,
        })
    }

    fn propose<R: Rng + ?Sized>(
        &self,
        radius: u32,
        max_gap: u32,
        ranges: &CenterRanges,
        placed: &[Circle],
        rng: &mut R,
    ) -> (i32, i32) {
        if !placed.is_empty() {
            for _ in 0..self.config.nearby_attempts {
                let Some(anchor) = placed.choose(rng) else {
                    break;
                };
                let min_gap = (anchor.radius + radius) as f64;
                let distance = rng.gen_range(min_gap..=min_gap + max_gap as f64);
                let angle = rng.gen_range(0.0..TAU);
                let x = anchor.x + (distance * angle.cos()).round() as i32;
                let y = anchor.y + (distance * angle.sin()).round() as i32;
                if ranges.x.contains(&x) && ranges.y.contains(&y) {
                    return (x, y);
                }
            }
        }
        (
            rng.gen_range(ranges.x.clone()),
            rng.gen_range(ranges.y.clone()),
        )
    }
}
