//! Data contracts shared by the circle-map crates.
//!
//! Everything here is plain data: coordinates, bounds, circles, zone types
//! and the sparse token population. The algorithms that produce and advance
//! these values live in `core_sim`; the wire protocol lives in `sim_runtime`.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{BuildHasher, Hasher};

use ahash::RandomState;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Index of a token type. Indexes into the speed table and the weighted selector.
pub type TokenKind = u32;

/// Grid coordinate. Signed so that neighbour offsets at the edge stay representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    pub fn distance_squared(self, other: Coord) -> i64 {
        let dx = (self.x - other.x) as i64;
        let dy = (self.y - other.y) as i64;
        dx * dx + dy * dy
    }
}

// Row-major: y first, then x.
impl Ord for Coord {
    fn cmp(&self, other: &Self) -> Ordering {
        self.y.cmp(&other.y).then(self.x.cmp(&other.x))
    }
}

impl PartialOrd for Coord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Grid dimensions in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bounds {
    pub width: u32,
    pub height: u32,
}

impl Bounds {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn cell_count(&self) -> usize {
        (self.width as usize).saturating_mul(self.height as usize)
    }

    pub fn contains(&self, coord: Coord) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && (coord.x as i64) < self.width as i64
            && (coord.y as i64) < self.height as i64
    }

    /// Row-major index of an in-bounds coordinate.
    #[inline]
    pub fn index_of(&self, coord: Coord) -> Option<usize> {
        if !self.contains(coord) {
            return None;
        }
        Some(coord.y as usize * self.width as usize + coord.x as usize)
    }

    #[inline]
    pub fn coord_at(&self, index: usize) -> Coord {
        let width = self.width.max(1) as usize;
        Coord::new((index % width) as i32, (index / width) as i32)
    }

    pub fn center(&self) -> Coord {
        Coord::new((self.width / 2) as i32, (self.height / 2) as i32)
    }

    /// Every in-bounds coordinate in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = Coord> {
        let width = self.width as i32;
        let height = self.height as i32;
        (0..height).flat_map(move |y| (0..width).map(move |x| Coord::new(x, y)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CircleKind {
    Spawn,
    Bedroom,
}

impl CircleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CircleKind::Spawn => "spawn",
            CircleKind::Bedroom => "bedroom",
        }
    }
}

impl fmt::Display for CircleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A placed circular zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Circle {
    pub x: i32,
    pub y: i32,
    pub radius: u32,
    #[serde(rename = "type")]
    pub kind: CircleKind,
}

impl Circle {
    pub const fn new(x: i32, y: i32, radius: u32, kind: CircleKind) -> Self {
        Self { x, y, radius, kind }
    }

    pub fn center(&self) -> Coord {
        Coord::new(self.x, self.y)
    }
}

/// Ordered circles of one map. Produced once by the packer, read-only afterwards.
pub type CircleSet = Vec<Circle>;

/// Zone classification of a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneType {
    Exterior,
    Interior,
    Center,
}

impl ZoneType {
    /// Maximum number of tokens a cell of this zone may hold.
    pub const fn capacity(self) -> usize {
        match self {
            ZoneType::Exterior => 2,
            ZoneType::Interior => 1,
            ZoneType::Center => 0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ZoneType::Exterior => "exterior",
            ZoneType::Interior => "interior",
            ZoneType::Center => "center",
        }
    }
}

/// Per-type movement probabilities in percent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpeedTable(Vec<f64>);

impl SpeedTable {
    pub fn new(speeds: Vec<f64>) -> Self {
        Self(speeds)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Movement probability for a token type; types past the end use entry 0.
    pub fn speed_for(&self, kind: TokenKind) -> f64 {
        self.0
            .get(kind as usize)
            .or_else(|| self.0.first())
            .copied()
            .unwrap_or(0.0)
    }
}

/// One occupied cell in the wire form of a [`Population`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellTokens {
    pub x: i32,
    pub y: i32,
    pub indices: Vec<TokenKind>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PopulationDecodeError {
    #[error("cell {0} listed more than once")]
    DuplicateCell(Coord),
    #[error("cell {0} has an empty token list")]
    EmptyCell(Coord),
}

/// Sparse token population: occupied coordinate → ordered token types.
///
/// Empty lists are never stored. Iteration is row-major.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<CellTokens>", try_from = "Vec<CellTokens>")]
pub struct Population {
    cells: BTreeMap<Coord, Vec<TokenKind>>,
}

impl Population {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the tokens at `coord`. An empty list clears the cell.
    pub fn insert(&mut self, coord: Coord, tokens: Vec<TokenKind>) {
        if tokens.is_empty() {
            self.cells.remove(&coord);
        } else {
            self.cells.insert(coord, tokens);
        }
    }

    pub fn push(&mut self, coord: Coord, token: TokenKind) {
        self.cells.entry(coord).or_default().push(token);
    }

    pub fn get(&self, coord: Coord) -> &[TokenKind] {
        self.cells.get(&coord).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (Coord, &[TokenKind])> {
        self.cells
            .iter()
            .map(|(coord, tokens)| (*coord, tokens.as_slice()))
    }

    /// Number of occupied cells.
    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }

    pub fn total_tokens(&self) -> usize {
        self.cells.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Token count per type index.
    pub fn histogram(&self) -> BTreeMap<TokenKind, usize> {
        let mut counts = BTreeMap::new();
        for token in self.cells.values().flatten() {
            *counts.entry(*token).or_insert(0) += 1;
        }
        counts
    }

    /// Stable 64-bit hash of the population contents.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = RandomState::with_seeds(0, 0, 0, 0).build_hasher();
        for (coord, tokens) in &self.cells {
            hasher.write_i32(coord.x);
            hasher.write_i32(coord.y);
            hasher.write_usize(tokens.len());
            for token in tokens {
                hasher.write_u32(*token);
            }
        }
        hasher.finish()
    }
}

impl From<Population> for Vec<CellTokens> {
    fn from(population: Population) -> Self {
        population
            .cells
            .into_iter()
            .map(|(coord, indices)| CellTokens {
                x: coord.x,
                y: coord.y,
                indices,
            })
            .collect()
    }
}

impl TryFrom<Vec<CellTokens>> for Population {
    type Error = PopulationDecodeError;

    fn try_from(cells: Vec<CellTokens>) -> Result<Self, Self::Error> {
        let mut population = Population::new();
        for cell in cells {
            let coord = Coord::new(cell.x, cell.y);
            if cell.indices.is_empty() {
                return Err(PopulationDecodeError::EmptyCell(coord));
            }
            if population.cells.insert(coord, cell.indices).is_some() {
                return Err(PopulationDecodeError::DuplicateCell(coord));
            }
        }
        Ok(population)
    }
}

/// Per-advance counters for the tokens visited by one migration step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationStats {
    /// Tokens whose movement draw succeeded.
    pub attempted: u64,
    pub moved: u64,
    /// Tokens that tried to move but found no neighbour with headroom.
    pub blocked: u64,
    /// Tokens left at their origin, blocked ones included.
    pub stayed: u64,
}

impl MigrationStats {
    pub fn accumulate(&mut self, other: &MigrationStats) {
        self.attempted += other.attempted;
        self.moved += other.moved;
        self.blocked += other.blocked;
        self.stayed += other.stayed;
    }
}

/// Packing request for a new map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapConfig {
    pub width: u32,
    pub height: u32,
    pub spawn_count: u32,
    pub bedroom_count: u32,
    pub spawn_radius: u32,
    pub bedroom_radius: u32,
    pub max_gap: u32,
}

impl MapConfig {
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.width, self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MapId(pub u64);

impl fmt::Display for MapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub map_id: MapId,
    pub name: String,
    pub x: i32,
    pub y: i32,
}

impl Player {
    pub fn position(&self) -> Coord {
        Coord::new(self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
