//! World: scrolling terrain, obstacle generation and collision.
//!
//! # Terrain
//!
//! The terrain is a row-major grid of atomic bytes, wider than the viewport
//! by a lookahead margin so new obstacles scroll in from off-screen:
//!
//! ```text
//!  col 0                         viewport_width          buffer_width
//!  ├──────────── visible ──────────────┼──── lookahead ────┤
//!  │ ###                      ###      │            ###    │ ◀ new column
//!  │                                   │                   │
//!  │ ###                      ###      │            ###    │
//! ```
//!
//! Only the world worker writes the grid. The renderer reads it with relaxed
//! loads and may see a half-shifted row, which shows as one torn frame.
//!
//! # Obstacle cadence
//!
//! Every `obstacle_width` ticks the solid flag clears. Every
//! `obstacle_period` ticks a new band starts: a fresh gap offset is drawn and
//! solid columns are emitted until the next width boundary.

use std::ops::Range;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::actor::Actor;
use super::sprite::Hitbox;
use crate::state::{GameState, SharedState};

/// Contents of one terrain cell.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tile {
    /// Open space.
    #[default]
    Empty = 0,
    /// Solid obstacle.
    Obstacle = 1,
}

impl Tile {
    #[inline]
    const fn from_u8(value: u8) -> Self {
        if value == Self::Obstacle as u8 {
            Self::Obstacle
        } else {
            Self::Empty
        }
    }

    /// Character drawn for this tile.
    #[inline]
    pub const fn glyph(self) -> char {
        match self {
            Self::Empty => ' ',
            Self::Obstacle => '#',
        }
    }
}

/// Lock-free terrain grid.
#[derive(Debug)]
pub struct Terrain {
    cells: Box<[AtomicU8]>,
    width: usize,
    height: usize,
}

impl Terrain {
    /// Create an all-empty grid.
    ///
    /// # Panics
    /// Panics if width or height is 0.
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "Terrain dimensions must be non-zero");
        let cells = (0..width * height)
            .map(|_| AtomicU8::new(Tile::Empty as u8))
            .collect();
        Self { cells, width, height }
    }

    /// Columns including the lookahead margin.
    #[inline]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Rows.
    #[inline]
    pub const fn height(&self) -> usize {
        self.height
    }

    #[inline]
    const fn index_of(&self, row: usize, col: usize) -> Option<usize> {
        if row < self.height && col < self.width {
            Some(row * self.width + col)
        } else {
            None
        }
    }

    /// Tile at `(row, col)`, or `None` outside the grid.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<Tile> {
        self.index_of(row, col)
            .map(|i| Tile::from_u8(self.cells[i].load(Ordering::Relaxed)))
    }

    /// Overwrite one tile. Returns `false` outside the grid.
    pub fn set(&self, row: usize, col: usize, tile: Tile) -> bool {
        if let Some(i) = self.index_of(row, col) {
            self.cells[i].store(tile as u8, Ordering::Relaxed);
            true
        } else {
            false
        }
    }

    /// Fill every cell with `Empty`.
    pub fn clear(&self) {
        for cell in &*self.cells {
            cell.store(Tile::Empty as u8, Ordering::Relaxed);
        }
    }

    /// Whether every cell is `Empty`.
    pub fn is_clear(&self) -> bool {
        self.cells
            .iter()
            .all(|c| c.load(Ordering::Relaxed) == Tile::Empty as u8)
    }

    /// Shift every row one column left and append `column(row)` on the right.
    pub fn shift_left(&self, mut column: impl FnMut(usize) -> Tile) {
        for (row, cells) in self.cells.chunks(self.width).enumerate() {
            for pair in cells.windows(2) {
                pair[0].store(pair[1].load(Ordering::Relaxed), Ordering::Relaxed);
            }
            if let Some(last) = cells.last() {
                last.store(column(row) as u8, Ordering::Relaxed);
            }
        }
    }

    /// Glyphs for `cols` of `row`, clipped to the grid.
    pub fn row_text(&self, row: usize, cols: Range<usize>) -> String {
        let end = cols.end.min(self.width);
        (cols.start.min(end)..end)
            .map(|col| self.get(row, col).unwrap_or_default().glyph())
            .collect()
    }

    /// Tiles of one column, top to bottom.
    pub fn column(&self, col: usize) -> Vec<Tile> {
        (0..self.height)
            .map(|row| self.get(row, col).unwrap_or_default())
            .collect()
    }
}

/// World parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorldConfig {
    /// Field height in rows.
    pub height: u16,
    /// Visible columns.
    pub viewport_width: u16,
    /// Off-screen columns to the right of the viewport.
    pub lookahead: u16,
    /// Rows in each obstacle's opening.
    pub gap: u16,
    /// Column the actor occupies.
    pub entity_column: u16,
    /// Columns per solid obstacle.
    pub obstacle_width: u64,
    /// Ticks between obstacle starts.
    pub obstacle_period: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            height: 50,
            viewport_width: 80,
            lookahead: 20,
            gap: 6,
            entity_column: 40,
            obstacle_width: 10,
            obstacle_period: 50,
        }
    }
}

impl WorldConfig {
    /// Total terrain columns.
    #[inline]
    pub const fn buffer_width(&self) -> usize {
        self.viewport_width as usize + self.lookahead as usize
    }

    /// Inclusive range a gap offset is drawn from, clamped to a non-empty range.
    pub fn gap_range(&self) -> (u16, u16) {
        let hi = self.height.saturating_sub(self.gap).saturating_sub(1).max(1);
        (1, hi)
    }
}

/// Obstacle generation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObstacleCursor {
    /// Active ticks since the last reset.
    pub evolution: u64,
    /// Whether the emitted column is solid outside the gap.
    pub solid: bool,
    /// First row of the current opening.
    pub gap: u16,
}

impl ObstacleCursor {
    fn new(gap: u16) -> Self {
        Self {
            evolution: 0,
            solid: false,
            gap,
        }
    }

    /// Apply the width/period boundaries for the current evolution.
    ///
    /// Returns `true` when a new band (and gap offset) started.
    fn advance(&mut self, config: &WorldConfig, rng: &mut Pcg32) -> bool {
        if self.evolution % config.obstacle_width.max(1) == 0 {
            self.solid = false;
        }
        if self.evolution % config.obstacle_period.max(1) == 0 {
            if self.solid {
                self.solid = false;
            } else {
                self.gap = draw_gap(config, rng);
                self.solid = true;
                return true;
            }
        }
        false
    }

    /// Tile emitted at `row` for the current column.
    #[inline]
    pub fn tile_at(&self, row: usize, gap_size: u16) -> Tile {
        let gap = usize::from(self.gap);
        let opening = gap..gap + usize::from(gap_size);
        if self.solid && !opening.contains(&row) {
            Tile::Obstacle
        } else {
            Tile::Empty
        }
    }
}

fn draw_gap(config: &WorldConfig, rng: &mut Pcg32) -> u16 {
    let (lo, hi) = config.gap_range();
    rng.random_range(lo..=hi)
}

/// What a world step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Not running; nothing changed.
    Idle,
    /// Terrain scrolled, no collision.
    Scrolled,
    /// Terrain scrolled and this step moved the game to `Dead`.
    Collided,
}

/// Terrain owner: scrolls, generates and tests collisions.
#[derive(Debug)]
pub struct World {
    config: WorldConfig,
    terrain: Arc<Terrain>,
    cursor: ObstacleCursor,
    hitbox: Hitbox,
    rng: Pcg32,
    round: u64,
}

impl World {
    /// Create an empty world with a seeded generator.
    pub fn new(config: WorldConfig, hitbox: Hitbox, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let gap = draw_gap(&config, &mut rng);
        Self {
            terrain: Arc::new(Terrain::new(
                config.buffer_width(),
                usize::from(config.height),
            )),
            cursor: ObstacleCursor::new(gap),
            config,
            hitbox,
            rng,
            round: 0,
        }
    }

    /// Shared handle to the terrain for readers.
    #[inline]
    pub const fn terrain(&self) -> &Arc<Terrain> {
        &self.terrain
    }

    /// Generation state.
    #[inline]
    pub const fn cursor(&self) -> &ObstacleCursor {
        &self.cursor
    }

    /// World parameters.
    #[inline]
    pub const fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Clear the terrain and restart generation with a fresh gap.
    pub fn reset(&mut self) {
        self.terrain.clear();
        self.cursor = ObstacleCursor::new(draw_gap(&self.config, &mut self.rng));
        log::debug!("world reset, gap at row {}", self.cursor.gap);
    }

    /// Reset if the game restarted since the last call.
    pub fn sync_round(&mut self, state: &SharedState) -> bool {
        let round = state.round();
        if round == self.round {
            return false;
        }
        self.round = round;
        self.reset();
        true
    }

    /// Whether an actor anchored at `row` touches an obstacle, the floor or the ceiling.
    pub fn collides(&self, row: u16) -> bool {
        if row == 0 || row >= self.config.height.saturating_sub(1) {
            return true;
        }
        self.hitbox
            .sites(row, self.config.entity_column)
            .any(|(r, c)| self.terrain.get(r, c) == Some(Tile::Obstacle))
    }

    /// One world tick.
    pub fn step(&mut self, state: &SharedState, actor: &Actor) -> StepOutcome {
        self.sync_round(state);
        if state.get() != GameState::Running {
            return StepOutcome::Idle;
        }

        self.scroll();

        if self.collides(actor.position()) && state.die() {
            log::info!(
                "collision at row {} after {} ticks",
                actor.position(),
                self.cursor.evolution
            );
            StepOutcome::Collided
        } else {
            StepOutcome::Scrolled
        }
    }

    /// Advance generation by one column and shift it into the terrain.
    pub fn scroll(&mut self) {
        if self.cursor.advance(&self.config, &mut self.rng) {
            log::trace!("new obstacle, gap at row {}", self.cursor.gap);
        }
        let cursor = self.cursor;
        let gap_size = self.config.gap;
        self.terrain.shift_left(|row| cursor.tile_at(row, gap_size));
        self.cursor.evolution += 1;
    }
}
