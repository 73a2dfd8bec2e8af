use std::collections::BTreeMap;

use serde::Serialize;
use sim_schema::TokenKind;

use crate::registry::MapRecord;
use crate::zones::ZoneGrid;

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct SimulationMetrics {
    pub epoch: u64,
    pub total_tokens: usize,
    pub occupied_cells: usize,
    /// Sum of zone capacities over the whole grid.
    pub capacity: usize,
    pub utilisation: f64,
    /// Cells holding exactly their capacity.
    pub saturated_cells: usize,
    pub type_counts: BTreeMap<TokenKind, usize>,
}

pub fn collect_metrics(record: &MapRecord) -> SimulationMetrics {
    let bounds = record.config.bounds();
    let grid = ZoneGrid::build(bounds, &record.circles);
    let mut metrics = SimulationMetrics {
        epoch: record.epoch,
        capacity: grid.total_capacity(),
        ..SimulationMetrics::default()
    };

    let Some(population) = record.population.as_ref() else {
        return metrics;
    };

    metrics.total_tokens = population.total_tokens();
    metrics.occupied_cells = population.occupied_cells();
    metrics.saturated_cells = population
        .iter()
        .filter(|(coord, tokens)| tokens.len() >= grid.capacity_at(*coord))
        .count();
    metrics.utilisation = if metrics.capacity > 0 {
        metrics.total_tokens as f64 / metrics.capacity as f64
    } else {
        0.0
    };
    metrics.type_counts = population.histogram();
    metrics
}

#[cfg(test)]
mod tests {
    use super::*;
    use sim_schema::{Circle, CircleKind, Coord, MapConfig, MapId, Population, SpeedTable};

    fn record(population: Option<Population>) -> MapRecord {
        MapRecord {
            id: MapId(1),
            name: "m".into(),
            config: MapConfig {
                width: 3,
                height: 3,
                spawn_count: 1,
                bedroom_count: 0,
                spawn_radius: 1,
                bedroom_radius: 1,
                max_gap: 0,
            },
            circles: vec![Circle::new(1, 1, 1, CircleKind::Spawn)],
            speeds: SpeedTable::default(),
            epoch: 4,
            population,
            seed: 0,
            created_at_ms: 0,
        }
    }

    #[test]
    fn unseeded_map_reports_capacity_only() {
        let metrics = collect_metrics(&record(None));
        assert_eq!(metrics.epoch, 4);
        // 4 interior + 4 exterior corners.
        assert_eq!(metrics.capacity, 4 + 8);
        assert_eq!(metrics.total_tokens, 0);
    }

    #[test]
    fn counts_saturation_and_types() {
        let mut population = Population::new();
        population.insert(Coord::new(0, 0), vec![0, 1]);
        population.push(Coord::new(2, 2), 1);
        population.push(Coord::new(1, 0), 1);
        let metrics = collect_metrics(&record(Some(population)));
        assert_eq!(metrics.total_tokens, 4);
        assert_eq!(metrics.occupied_cells, 3);
        assert_eq!(metrics.saturated_cells, 2);
        assert_eq!(metrics.type_counts.get(&1), Some(&3));
        assert!((metrics.utilisation - 4.0 / 12.0).abs() < 1e-9);
    }
}
