use core::ops::Range;

use strum::{EnumCount, EnumIter};

use crate::tile::{TOTAL_TILES, Tile};

/// Screen region around the grid where tiles are scattered at start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumCount, EnumIter)]
pub enum Zone {
    Top,
    Bottom,
    Left,
    Right,
}

impl Zone {
    pub const fn tiles_per_zone() -> usize {
        TOTAL_TILES.div_ceil(Self::COUNT)
    }

    /// Zone of the tile created at `index`. Anything past the last zone lands on the right.
    pub const fn for_index(index: usize) -> Self {
        match index / Self::tiles_per_zone() {
            0 => Self::Top,
            1 => Self::Bottom,
            2 => Self::Left,
            _ => Self::Right,
        }
    }

    /// Horizontal and vertical percentage ranges of the zone.
    pub const fn bounds(self) -> (Range<f32>, Range<f32>) {
        match self {
            Self::Top => (10.0..90.0, 5.0..20.0),
            Self::Bottom => (10.0..90.0, 80.0..95.0),
            Self::Left => (5.0..20.0, 25.0..75.0),
            Self::Right => (80.0..95.0, 25.0..75.0),
        }
    }

    fn random_position(self, rng: &mut fastrand::Rng) -> (f32, f32) {
        let (xs, ys) = self.bounds();
        (
            rng.f32().mul_add(xs.end - xs.start, xs.start),
            rng.f32().mul_add(ys.end - ys.start, ys.start),
        )
    }
}

/// Creates every tile of the puzzle scattered around the grid, in random order.
pub fn scatter_tiles(rng: &mut fastrand::Rng) -> Vec<Tile> {
    let mut tiles = (0..TOTAL_TILES)
        .map(|index| {
            let (x, y) = Zone::for_index(index).random_position(rng);
            Tile::new(index, x, y)
        })
        .collect::<Vec<_>>();

    rng.shuffle(&mut tiles);
    tiles
}
