//! Hand out disjoint pieces of an output buffer to the cubes of a dispatch.

/// An output buffer split into fixed-size tiles, each of which can be taken exactly once.
///
/// Cubes of a dispatch run concurrently and each one writes only its own tile, so every tile
/// sits behind its own lock and is moved out on first use.
#[derive(Debug)]
pub struct TileSlices<'a, T> {
    tiles: Vec<spin::Mutex<Option<&'a mut [T]>>>,
    tile_size: usize,
}

impl<'a, T: Send> TileSlices<'a, T> {
    /// Split `data` into tiles of `tile_size` elements. The last tile may be shorter.
    ///
    /// # Panics
    /// Panics if `tile_size` is zero.
    pub fn new(data: &'a mut [T], tile_size: usize) -> Self {
        assert!(tile_size > 0, "Tile size must be positive.");

        let tiles = data
            .chunks_mut(tile_size)
            .map(|chunk| spin::Mutex::new(Some(chunk)))
            .collect();

        Self { tiles, tile_size }
    }

    /// Take ownership of the given tile, returning none if it doesn't exist or was already taken.
    pub fn take(&self, tile: usize) -> Option<&'a mut [T]> {
        self.tiles.get(tile)?.lock().take()
    }

    /// Number of tiles.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether the buffer had no element at all.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Number of elements in every tile but the last.
    pub fn tile_size(&self) -> usize {
        self.tile_size
    }
}
