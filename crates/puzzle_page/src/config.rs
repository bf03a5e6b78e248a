use core::time::Duration;

use bevy::prelude::*;
use page_helpers::WINDOW_WIDTH;

use crate::tile::{COLS, Cell, ROWS, Tile};

/// Everything tunable about the puzzle page.
#[derive(Resource, Debug, Clone)]
pub struct PuzzleConfig {
    // Assets
    /// Picture split into the tiles, relative to the asset root
    pub image_path: &'static str,

    // Timing
    /// Idle time before the hint glow shows up
    pub hint_delay: Duration,
    /// How long a tile shakes after a wrong drop
    pub rejection_duration: Duration,
    /// Time the grid takes to fade out once the last tile is placed
    pub grid_disappear_duration: Duration,
    /// How long the full picture is shown before the overlay
    pub full_image_duration: Duration,

    // Layout
    /// Size of the region tiles are scattered over, in world units
    pub play_area_size: Vec2,
    /// Center of that region, in world units
    pub play_area_center: Vec2,
    /// Edge of a grid cell and of a tile
    pub cell_size: f32,
    /// Fixed layout for reproducible sessions. `None` draws a new one every session.
    pub layout_seed: Option<u64>,

    // Overlay
    pub confetti_count: usize,
    pub confetti_glyphs: [&'static str; 4],
    /// Show the placed tile counter and hint text under the puzzle
    pub show_progress: bool,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            image_path: "photos/puzzle.jpg",

            hint_delay: Duration::from_secs(20),
            rejection_duration: Duration::from_millis(500),
            grid_disappear_duration: Duration::from_millis(1500),
            full_image_duration: Duration::from_millis(3000),

            play_area_size: Vec2::new(WINDOW_WIDTH, 540.0),
            play_area_center: Vec2::new(0.0, -40.0),
            cell_size: 48.0,
            layout_seed: None,

            confetti_count: 50,
            confetti_glyphs: ["💕", "🌸", "✨", "💖"],
            show_progress: false,
        }
    }
}

impl PuzzleConfig {
    pub fn grid_size(&self) -> Vec2 {
        Vec2::new(COLS as f32, ROWS as f32) * self.cell_size
    }

    /// World position of a point given in percent of the play area, from its top left corner.
    pub fn percent_to_world(&self, percent: Vec2) -> Vec2 {
        let from_top_left = percent / 100.0 * self.play_area_size;
        let top_left = self.play_area_center + Vec2::new(-0.5, 0.5) * self.play_area_size;
        top_left + Vec2::new(from_top_left.x, -from_top_left.y)
    }

    /// Where a scattered tile is drawn.
    pub fn tile_position(&self, tile: &Tile) -> Vec2 {
        self.percent_to_world(Vec2::new(tile.current_x(), tile.current_y()))
    }

    pub fn cell_center(&self, cell: Cell) -> Vec2 {
        let top_left = self.play_area_center + Vec2::new(-0.5, 0.5) * self.grid_size();
        top_left
            + Vec2::new(
                (cell.col as f32 + 0.5) * self.cell_size,
                -(cell.row as f32 + 0.5) * self.cell_size,
            )
    }

    /// Grid cell under a world position, if any.
    pub fn cell_at(&self, position: Vec2) -> Option<Cell> {
        if !self.grid_rect().contains(position) {
            return None;
        }

        let top_left = self.play_area_center + Vec2::new(-0.5, 0.5) * self.grid_size();
        let offset = Vec2::new(position.x - top_left.x, top_left.y - position.y) / self.cell_size;

        Some(Cell::new(offset.y as usize, offset.x as usize)).filter(|cell| cell.is_on_grid())
    }

    /// Rectangle of the whole grid, in world units.
    pub fn grid_rect(&self) -> Rect {
        Rect::from_center_size(self.play_area_center, self.grid_size())
    }
}
