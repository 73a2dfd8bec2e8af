//! Client-input validation run before any packing, seeding or migration.

use thiserror::Error;

use crate::{CircleKind, MapConfig};

/// Upper limits on map size and per-request work, taken from the simulation
/// config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationLimits {
    pub max_width: u32,
    pub max_height: u32,
    pub max_cells: u64,
    /// Most migrations one `epoch` request may run.
    pub max_epoch_steps: u32,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            max_width: 100,
            max_height: 100,
            max_cells: 10_000,
            max_epoch_steps: 1_000,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("map dimensions must be positive, got {width}x{height}")]
    NonPositiveDimension { width: u32, height: u32 },
    #[error("map dimensions {width}x{height} exceed the maximum {max_width}x{max_height}")]
    DimensionTooLarge {
        width: u32,
        height: u32,
        max_width: u32,
        max_height: u32,
    },
    #[error("map has {cells} cells, maximum is {max_cells}")]
    TooManyCells { cells: u64, max_cells: u64 },
    #[error("{kind} radius must be at least 1")]
    ZeroRadius { kind: CircleKind },
    #[error("{kind} radius {radius} does not fit inside a {width}x{height} map")]
    RadiusTooLarge {
        kind: CircleKind,
        radius: u32,
        width: u32,
        height: u32,
    },
    #[error("probability [{index}] must be a finite non-negative weight, got {value}")]
    InvalidProbability { index: usize, value: f64 },
    #[error("probability list must not be empty")]
    EmptyProbabilities,
    #[error("speed list must not be empty")]
    EmptySpeeds,
    #[error("speed [{index}] must be between 0 and 100, got {value}")]
    SpeedOutOfRange { index: usize, value: f64 },
    #[error("epoch steps must be between 1 and {max}, got {steps}")]
    StepsOutOfRange { steps: u32, max: u32 },
}

pub fn validate_map_config(
    config: &MapConfig,
    limits: &ValidationLimits,
) -> Result<(), ValidationError> {
    let MapConfig { width, height, .. } = *config;
    if width == 0 || height == 0 {
        return Err(ValidationError::NonPositiveDimension { width, height });
    }
    if width > limits.max_width || height > limits.max_height {
        return Err(ValidationError::DimensionTooLarge {
            width,
            height,
            max_width: limits.max_width,
            max_height: limits.max_height,
        });
    }
    let cells = width as u64 * height as u64;
    if cells > limits.max_cells {
        return Err(ValidationError::TooManyCells {
            cells,
            max_cells: limits.max_cells,
        });
    }

    let requests = [
        (CircleKind::Spawn, config.spawn_count, config.spawn_radius),
        (CircleKind::Bedroom, config.bedroom_count, config.bedroom_radius),
    ];
    for (kind, count, radius) in requests {
        if count == 0 {
            continue;
        }
        if radius == 0 {
            return Err(ValidationError::ZeroRadius { kind });
        }
        // A contained circle spans 2r+1 cells on each axis.
        let span = radius as u64 * 2 + 1;
        if span > width as u64 || span > height as u64 {
            return Err(ValidationError::RadiusTooLarge {
                kind,
                radius,
                width,
                height,
            });
        }
    }
    Ok(())
}

/// Weights need not sum to one; an all-zero vector is allowed and seeds an
/// empty population.
pub fn validate_probabilities(probabilities: &[f64]) -> Result<(), ValidationError> {
    if probabilities.is_empty() {
        return Err(ValidationError::EmptyProbabilities);
    }
    for (index, &value) in probabilities.iter().enumerate() {
        if !value.is_finite() || value < 0.0 {
            return Err(ValidationError::InvalidProbability { index, value });
        }
    }
    Ok(())
}

pub fn validate_speeds(speeds: &[f64]) -> Result<(), ValidationError> {
    if speeds.is_empty() {
        return Err(ValidationError::EmptySpeeds);
    }
    for (index, &value) in speeds.iter().enumerate() {
        if !(0.0..=100.0).contains(&value) {
            return Err(ValidationError::SpeedOutOfRange { index, value });
        }
    }
    Ok(())
}

pub fn validate_epoch_steps(steps: u32, limits: &ValidationLimits) -> Result<(), ValidationError> {
    if steps == 0 || steps > limits.max_epoch_steps {
        return Err(ValidationError::StepsOutOfRange {
            steps,
            max: limits.max_epoch_steps,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(width: u32, height: u32) -> MapConfig {
        MapConfig {
            width,
            height,
            spawn_count: 1,
            bedroom_count: 0,
            spawn_radius: 2,
            bedroom_radius: 1,
            max_gap: 2,
        }
    }

    #[test]
    fn accepts_reasonable_config() {
        assert_eq!(
            validate_map_config(&config(10, 10), &ValidationLimits::default()),
            Ok(())
        );
    }

    #[test]
    fn rejects_zero_and_oversized_dimensions() {
        let limits = ValidationLimits::default();
        assert!(matches!(
            validate_map_config(&config(0, 10), &limits),
            Err(ValidationError::NonPositiveDimension { .. })
        ));
        assert!(matches!(
            validate_map_config(&config(101, 10), &limits),
            Err(ValidationError::DimensionTooLarge { .. })
        ));
        let tight = ValidationLimits {
            max_cells: 50,
            ..limits
        };
        assert_eq!(
            validate_map_config(&config(10, 10), &tight),
            Err(ValidationError::TooManyCells {
                cells: 100,
                max_cells: 50
            })
        );
    }

    #[test]
    fn radius_must_fit_and_be_positive_when_requested() {
        let limits = ValidationLimits::default();
        assert!(matches!(
            validate_map_config(&config(4, 10), &limits),
            Err(ValidationError::RadiusTooLarge {
                kind: CircleKind::Spawn,
                radius: 2,
                ..
            })
        ));
        let mut zero = config(10, 10);
        zero.spawn_radius = 0;
        assert_eq!(
            validate_map_config(&zero, &limits),
            Err(ValidationError::ZeroRadius {
                kind: CircleKind::Spawn
            })
        );
        // Unused radii are not checked.
        zero.spawn_count = 0;
        assert_eq!(validate_map_config(&zero, &limits), Ok(()));
    }

    #[test]
    fn probabilities_must_be_finite_weights() {
        assert_eq!(
            validate_probabilities(&[]),
            Err(ValidationError::EmptyProbabilities)
        );
        assert_eq!(validate_probabilities(&[0.0, 3.5]), Ok(()));
        assert!(validate_probabilities(&[0.5, -0.1]).is_err());
        assert!(validate_probabilities(&[f64::NAN]).is_err());
        assert!(validate_probabilities(&[f64::INFINITY]).is_err());
    }

    #[test]
    fn speeds_are_percentages() {
        assert_eq!(validate_speeds(&[0.0, 100.0, 42.5]), Ok(()));
        assert_eq!(validate_speeds(&[]), Err(ValidationError::EmptySpeeds));
        assert!(matches!(
            validate_speeds(&[10.0, 100.5]),
            Err(ValidationError::SpeedOutOfRange { index: 1, .. })
        ));
        assert!(validate_speeds(&[f64::NAN]).is_err());
    }

    #[test]
    fn epoch_steps_are_bounded() {
        let limits = ValidationLimits {
            max_epoch_steps: 50,
            ..ValidationLimits::default()
        };
        assert_eq!(validate_epoch_steps(1, &limits), Ok(()));
        assert_eq!(validate_epoch_steps(50, &limits), Ok(()));
        assert_eq!(
            validate_epoch_steps(51, &limits),
            Err(ValidationError::StepsOutOfRange { steps: 51, max: 50 })
        );
        assert!(validate_epoch_steps(0, &limits).is_err());
        assert!(validate_epoch_steps(u32::MAX, &ValidationLimits::default()).is_err());
    }
}
