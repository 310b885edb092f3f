use core::ops::Range;

/// A contiguous range of the input processed by a single cube.
#[derive(new, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    /// Position of the tile, equal to the position of the cube processing it.
    pub id: u32,
    /// First element of the tile.
    pub start: usize,
    /// One past the last element of the tile.
    pub end: usize,
}

impl Tile {
    /// Number of elements in the tile.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the tile has no element.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Element range of the tile.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Splits `len` elements into tiles of `tile_size`, the last one possibly shorter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileAssigner {
    len: usize,
    tile_size: usize,
}

impl TileAssigner {
    /// Create a new assigner.
    ///
    /// # Panics
    /// Panics if `tile_size` is zero.
    pub fn new(len: usize, tile_size: usize) -> Self {
        assert!(tile_size > 0, "Tile size must be positive.");
        Self { len, tile_size }
    }

    /// Number of elements being split.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether there is nothing to split.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of elements of every full tile.
    pub fn tile_size(&self) -> usize {
        self.tile_size
    }

    /// Number of tiles, zero when there is no element.
    pub fn num_tiles(&self) -> usize {
        self.len.div_ceil(self.tile_size)
    }

    /// The tile with the given id.
    ///
    /// # Panics
    /// Panics if `id` isn't smaller than [num_tiles](Self::num_tiles).
    pub fn tile(&self, id: u32) -> Tile {
        let start = id as usize * self.tile_size;
        assert!(start < self.len, "Tile {id} is out of bounds.");

        Tile::new(id, start, usize::min(start + self.tile_size, self.len))
    }

    /// Every tile, in order.
    pub fn tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        (0..self.num_tiles() as u32).map(|id| self.tile(id))
    }
}
