use core::time::Duration;
use std::collections::{BTreeMap, BTreeSet};

use bevy::prelude::*;
use thiserror::Error;

use crate::tile::{Cell, TOTAL_TILES, Tile, TileId};

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    #[error("Tile {0} is not waiting to be placed")]
    TileNotAvailable(TileId),

    #[error("Cell ({}, {}) is not on the grid", .0.row, .0.col)]
    CellOutOfBounds(Cell),
}

/// What a hovered cell allows. Every cell accepts every tile, the check happens on drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropEffect {
    Move,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// Nothing was being dragged.
    Ignored,
    /// The tile locked into its cell. `completed` is set by the drop that placed the last tile.
    Placed { tile: TileId, completed: bool },
    /// Wrong cell, the tile goes back to where it was scattered.
    Rejected { tile: TileId },
}

/// Tiles of one puzzle session and where they are.
///
/// A tile id is either still scattered (`unplaced`) or locked in the grid
/// (`placed`), never both. Placed tiles never leave the grid.
#[derive(Resource, Debug)]
pub struct PuzzleBoard {
    unplaced: Vec<Tile>,
    placed: BTreeSet<TileId>,
    dragged: Option<TileId>,
    /// Tiles shaking after a wrong drop, until their timer runs out
    rejected: BTreeMap<TileId, Timer>,
    rejection_duration: Duration,
}

impl PuzzleBoard {
    pub const fn new(tiles: Vec<Tile>, rejection_duration: Duration) -> Self {
        Self {
            unplaced: tiles,
            placed: BTreeSet::new(),
            dragged: None,
            rejected: BTreeMap::new(),
            rejection_duration,
        }
    }

    /// Scattered tiles, in layout order.
    pub fn unplaced(&self) -> &[Tile] {
        &self.unplaced
    }

    pub fn unplaced_tile(&self, tile: TileId) -> Option<&Tile> {
        self.unplaced.iter().find(|candidate| candidate.id() == tile)
    }

    pub fn is_placed(&self, tile: TileId) -> bool {
        self.placed.contains(&tile)
    }

    pub fn placed_count(&self) -> usize {
        self.placed.len()
    }

    pub fn is_complete(&self) -> bool {
        self.placed.len() == TOTAL_TILES
    }

    pub const fn dragged(&self) -> Option<TileId> {
        self.dragged
    }

    /// How far the rejection of `tile` has played out, from 0 to 1. `None` once it is over.
    pub fn rejection_progress(&self, tile: TileId) -> Option<f32> {
        self.rejected.get(&tile).map(Timer::fraction)
    }

    /// Picks up a scattered tile. Picking up another one replaces it.
    pub fn begin_drag(&mut self, tile: TileId) -> Result<(), BoardError> {
        if self.unplaced_tile(tile).is_none() {
            return Err(BoardError::TileNotAvailable(tile));
        }

        self.dragged = Some(tile);
        Ok(())
    }

    /// Whether the dragged tile may be dropped on `cell`.
    pub const fn drag_over(&self, cell: Cell) -> Result<DropEffect, BoardError> {
        if !cell.is_on_grid() {
            return Err(BoardError::CellOutOfBounds(cell));
        }
        Ok(DropEffect::Move)
    }

    /// Drops the dragged tile on `cell`, placing it only if the cell is its destination.
    pub fn drop_on(&mut self, cell: Cell) -> Result<DropOutcome, BoardError> {
        if !cell.is_on_grid() {
            return Err(BoardError::CellOutOfBounds(cell));
        }

        let Some(tile) = self.dragged.take() else {
            return Ok(DropOutcome::Ignored);
        };

        let Some(position) = self
            .unplaced
            .iter()
            .position(|candidate| candidate.id() == tile && candidate.belongs_in(cell))
        else {
            self.rejected.insert(
                tile,
                Timer::new(self.rejection_duration, TimerMode::Once),
            );
            return Ok(DropOutcome::Rejected { tile });
        };

        self.unplaced.remove(position);
        self.rejected.remove(&tile);
        let was_complete = self.is_complete();
        self.placed.insert(tile);

        Ok(DropOutcome::Placed {
            tile,
            completed: !was_complete && self.is_complete(),
        })
    }

    /// The drag stopped outside the grid. The tile stays where it was.
    pub const fn end_drag(&mut self) -> Option<TileId> {
        self.dragged.take()
    }

    pub fn tick_rejections(&mut self, delta: Duration) {
        self.rejected.retain(|_, timer| !timer.tick(delta).finished());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::scatter_tiles;
    use crate::tile::{COLS, ROWS};

    const SHAKE: Duration = Duration::from_millis(500);

    fn board() -> PuzzleBoard {
        PuzzleBoard::new(scatter_tiles(&mut fastrand::Rng::with_seed(3)), SHAKE)
    }

    fn assert_ids_partitioned(board: &PuzzleBoard) {
        for id in 0..TOTAL_TILES {
            let scattered = board.unplaced_tile(id).is_some();
            assert!(
                scattered != board.is_placed(id),
                "tile {id} must be either scattered or placed"
            );
        }
    }

    #[test]
    fn dropping_on_the_destination_places_the_tile() {
        let mut board = board();
        board.begin_drag(5).expect("tile 5 is scattered");

        let outcome = board.drop_on(Cell::new(1, 1)).expect("cell on grid");

        assert_eq!(
            outcome,
            DropOutcome::Placed {
                tile: 5,
                completed: false
            },
            "tile 5 belongs in (1, 1)"
        );
        assert!(board.is_placed(5), "tile 5 is locked");
        assert!(board.unplaced_tile(5).is_none(), "tile 5 left the scatter");
        assert_eq!(board.dragged(), None, "drop clears the drag");
        assert_ids_partitioned(&board);
    }

    #[test]
    fn dropping_elsewhere_rejects_without_changing_placement() {
        let mut board = board();
        board.begin_drag(5).expect("tile 5 is scattered");

        let outcome = board.drop_on(Cell::new(0, 0)).expect("cell on grid");

        assert_eq!(outcome, DropOutcome::Rejected { tile: 5 }, "wrong cell");
        assert_eq!(board.placed_count(), 0, "nothing placed");
        assert!(board.unplaced_tile(5).is_some(), "tile 5 stays scattered");
        assert_eq!(board.dragged(), None, "drop clears the drag");
        assert!(board.rejection_progress(5).is_some(), "tile 5 shakes");
        assert!(board.rejection_progress(4).is_none(), "only the dropped tile shakes");
        assert_ids_partitioned(&board);
    }

    #[test]
    fn rejection_wears_off_after_its_duration() {
        let mut board = board();
        board.begin_drag(2).expect("tile 2 is scattered");
        board.drop_on(Cell::new(3, 3)).expect("cell on grid");

        board.tick_rejections(Duration::from_millis(499));
        assert!(board.rejection_progress(2).is_some(), "still shaking at 499ms");

        board.tick_rejections(Duration::from_millis(1));
        assert!(board.rejection_progress(2).is_none(), "done at 500ms");
    }

    #[test]
    fn a_rejected_tile_can_still_be_placed() {
        let mut board = board();
        board.begin_drag(9).expect("tile 9 is scattered");
        board.drop_on(Cell::new(0, 0)).expect("cell on grid");

        board.begin_drag(9).expect("tile 9 is still scattered");
        let outcome = board.drop_on(Cell::new(2, 1)).expect("cell on grid");

        assert!(
            matches!(outcome, DropOutcome::Placed { tile: 9, .. }),
            "second try lands"
        );
        assert!(board.rejection_progress(9).is_none(), "placing clears the shake");
    }

    #[test]
    fn drop_without_drag_is_ignored() {
        let mut board = board();
        let outcome = board.drop_on(Cell::new(0, 0)).expect("cell on grid");
        assert_eq!(outcome, DropOutcome::Ignored, "nothing dragged");
        assert_eq!(board.placed_count(), 0, "nothing placed");
    }

    #[test]
    fn only_scattered_tiles_can_be_dragged() {
        let mut board = board();
        board.begin_drag(0).expect("tile 0 is scattered");
        board.drop_on(Cell::new(0, 0)).expect("cell on grid");

        assert_eq!(
            board.begin_drag(0),
            Err(BoardError::TileNotAvailable(0)),
            "placed tiles stay put"
        );
        assert_eq!(
            board.begin_drag(TOTAL_TILES),
            Err(BoardError::TileNotAvailable(TOTAL_TILES)),
            "unknown tile"
        );
    }

    #[test]
    fn redundant_drag_start_overwrites_the_dragged_tile() {
        let mut board = board();
        board.begin_drag(1).expect("tile 1 is scattered");
        board.begin_drag(6).expect("tile 6 is scattered");

        assert_eq!(board.dragged(), Some(6), "latest drag wins");
        let outcome = board.drop_on(Cell::new(0, 1)).expect("cell on grid");
        assert_eq!(outcome, DropOutcome::Rejected { tile: 6 }, "tile 6 was dropped");
    }

    #[test]
    fn every_cell_accepts_a_drag_over() {
        let board = board();
        for cell in Cell::all() {
            assert_eq!(board.drag_over(cell), Ok(DropEffect::Move), "{cell:?}");
        }
        assert_eq!(
            board.drag_over(Cell::new(ROWS, 0)),
            Err(BoardError::CellOutOfBounds(Cell::new(ROWS, 0))),
            "off-grid cell"
        );
    }

    #[test]
    fn off_grid_drop_keeps_the_drag() {
        let mut board = board();
        board.begin_drag(3).expect("tile 3 is scattered");

        assert_eq!(
            board.drop_on(Cell::new(0, COLS)),
            Err(BoardError::CellOutOfBounds(Cell::new(0, COLS))),
            "off-grid cell"
        );
        assert_eq!(board.dragged(), Some(3), "still holding tile 3");
    }

    #[test]
    fn ending_a_drag_leaves_the_tile_scattered() {
        let mut board = board();
        board.begin_drag(7).expect("tile 7 is scattered");

        assert_eq!(board.end_drag(), Some(7), "tile 7 was held");
        assert_eq!(board.dragged(), None, "drag cleared");
        assert!(board.rejection_progress(7).is_none(), "leaving the grid is not a rejection");
        assert!(board.unplaced_tile(7).is_some(), "tile 7 stays scattered");
    }

    #[test]
    fn only_the_last_placement_completes_the_puzzle() {
        let mut board = board();
        // Reverse order, with a wrong drop in between every placement.
        for id in (0..TOTAL_TILES).rev() {
            board.begin_drag(id).expect("tile is scattered");
            board
                .drop_on(Cell::from_index((id + 1) % TOTAL_TILES))
                .expect("cell on grid");

            let placed_before = board.placed_count();
            board.begin_drag(id).expect("tile is scattered");
            let outcome = board.drop_on(Cell::from_index(id)).expect("cell on grid");

            assert!(board.placed_count() > placed_before, "placement set grows");
            assert_eq!(
                outcome,
                DropOutcome::Placed {
                    tile: id,
                    completed: id == 0
                },
                "tile {id}"
            );
            assert_ids_partitioned(&board);
        }

        assert!(board.is_complete(), "all tiles placed");
        assert!(board.unplaced().is_empty(), "nothing left to drag");
        assert_eq!(
            board.drop_on(Cell::new(0, 0)),
            Ok(DropOutcome::Ignored),
            "no further completion"
        );
    }

    #[test]
    fn identical_drag_sequences_give_identical_boards() {
        let moves = [(5, 5), (5, 0), (3, 3), (12, 12), (4, 9), (15, 15)];
        let play = || {
            let mut board = board();
            for (tile, cell) in moves {
                if board.begin_drag(tile).is_ok() {
                    board.drop_on(Cell::from_index(cell)).expect("cell on grid");
                }
            }
            (0..TOTAL_TILES)
                .filter(|&id| board.is_placed(id))
                .collect::<Vec<_>>()
        };

        assert_eq!(play(), play(), "placement is deterministic");
        assert_eq!(play(), vec![3, 5, 12, 15], "only matching drops placed");
    }
}
