use bevy::math::{Rect, URect, UVec2, Vec2};

pub const ROWS: usize = 4;
pub const COLS: usize = 4;
pub const TOTAL_TILES: usize = ROWS * COLS;

/// Identifies a tile, and equals the row-major index of the cell it belongs in.
pub type TileId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub const fn from_index(index: usize) -> Self {
        Self {
            row: index / COLS,
            col: index % COLS,
        }
    }

    pub const fn index(self) -> usize {
        self.row * COLS + self.col
    }

    pub const fn is_on_grid(self) -> bool {
        self.row < ROWS && self.col < COLS
    }

    /// Every cell of the grid, row by row.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..TOTAL_TILES).map(Self::from_index)
    }
}

/// One puzzle piece.
///
/// The destination cell is derived from the id and the scatter position is
/// fixed at creation, so neither can change for the tile's lifetime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tile {
    id: TileId,
    correct: Cell,
    current: Vec2,
}

impl Tile {
    /// `current_x` and `current_y` are percentages of the play area, from its top left corner.
    pub const fn new(id: TileId, current_x: f32, current_y: f32) -> Self {
        Self {
            id,
            correct: Cell::from_index(id),
            current: Vec2::new(current_x, current_y),
        }
    }

    pub const fn id(&self) -> TileId {
        self.id
    }

    pub const fn correct_cell(&self) -> Cell {
        self.correct
    }

    pub const fn current_x(&self) -> f32 {
        self.current.x
    }

    pub const fn current_y(&self) -> f32 {
        self.current.y
    }

    pub fn belongs_in(&self, cell: Cell) -> bool {
        self.correct == cell
    }
}

/// Region of the puzzle image shown by `cell`, in normalized image
/// coordinates (origin top left, y down).
pub fn crop_region(cell: Cell) -> Rect {
    let size = Vec2::new(1.0 / COLS as f32, 1.0 / ROWS as f32);
    let min = Vec2::new(cell.col as f32, cell.row as f32) * size;
    Rect::from_corners(min, min + size)
}

/// Pixel rectangle of `cell` in an image of `image_size`.
///
/// Neighbouring cells share their edges, so the rectangles cover the image
/// exactly even when its size is not a multiple of the grid.
pub fn pixel_region(cell: Cell, image_size: UVec2) -> URect {
    let region = crop_region(cell);
    let size = image_size.as_vec2();

    URect::from_corners(
        (region.min * size).round().as_uvec2(),
        (region.max * size).round().as_uvec2(),
    )
}
