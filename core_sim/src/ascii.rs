//! Plain-text renders of a map for logs and the `show` command.
//!
//! Zones: `.` exterior, `o` interior, `@` center. Population renders put the
//! token count in occupied cells instead.

use sim_schema::{Bounds, Circle, Population, ZoneType};

use crate::zones::ZoneGrid;

fn zone_glyph(zone: ZoneType) -> char {
    match zone {
        ZoneType::Exterior => '.',
        ZoneType::Interior => 'o',
        ZoneType::Center => '@',
    }
}

pub fn zone_rows(bounds: Bounds, circles: &[Circle]) -> Vec<String> {
    rows(&ZoneGrid::build(bounds, circles), |_, zone| zone_glyph(zone))
}

pub fn population_rows(bounds: Bounds, circles: &[Circle], population: &Population) -> Vec<String> {
    rows(&ZoneGrid::build(bounds, circles), |coord, zone| {
        match population.get(coord).len() {
            0 => zone_glyph(zone),
            n @ 1..=9 => char::from_digit(n as u32, 10).unwrap_or('+'),
            _ => '+',
        }
    })
}

pub fn render_zones(bounds: Bounds, circles: &[Circle]) -> String {
    zone_rows(bounds, circles).join("\n")
}

pub fn render_population(bounds: Bounds, circles: &[Circle], population: &Population) -> String {
    population_rows(bounds, circles, population).join("\n")
}

fn rows(grid: &ZoneGrid, glyph: impl Fn(sim_schema::Coord, ZoneType) -> char) -> Vec<String> {
    let width = grid.bounds().width as usize;
    let mut rows = Vec::with_capacity(grid.bounds().height as usize);
    let mut row = String::with_capacity(width);
    for (coord, zone) in grid.iter() {
        row.push(glyph(coord, zone));
        if row.len() == width {
            rows.push(std::mem::take(&mut row));
        }
    }
    rows
}
