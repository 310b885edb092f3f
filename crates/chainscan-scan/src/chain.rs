use core::cell::UnsafeCell;
use core::mem::MaybeUninit;
use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// Publication state of a tile, ordered by progress.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TileStatus {
    /// Nothing is known about the tile yet.
    Invalid = 0,
    /// The reduction of the tile alone is posted.
    LocalReady = 1,
    /// The reduction of every element up to the end of the tile is posted.
    GlobalReady = 2,
}

impl TileStatus {
    fn from_raw(raw: u32) -> Self {
        match raw {
            0 => Self::Invalid,
            1 => Self::LocalReady,
            _ => Self::GlobalReady,
        }
    }
}

/// What a reader observed in a chain slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainRead<V> {
    /// Nothing posted yet.
    Invalid,
    /// The tile's own reduction.
    LocalReady(V),
    /// The inclusive reduction up to the end of the tile.
    GlobalReady(V),
}

impl<V> ChainRead<V> {
    /// The status matching this read.
    pub fn status(&self) -> TileStatus {
        match self {
            ChainRead::Invalid => TileStatus::Invalid,
            ChainRead::LocalReady(_) => TileStatus::LocalReady,
            ChainRead::GlobalReady(_) => TileStatus::GlobalReady,
        }
    }
}

// A value written at most once, then only read.
struct WriteOnce<V> {
    claimed: AtomicBool,
    value: UnsafeCell<MaybeUninit<V>>,
}

// SAFETY: the value is written by the single thread that claims the cell, before the status
// store with `Release` ordering. Readers only access it after observing that status with
// `Acquire` ordering, so there is no concurrent access to the cell content.
unsafe impl<V: Send + Sync> Sync for WriteOnce<V> {}

impl<V: Copy> WriteOnce<V> {
    fn new() -> Self {
        Self {
            claimed: AtomicBool::new(false),
            value: UnsafeCell::new(MaybeUninit::uninit()),
        }
    }

    fn write(&self, value: V, slot: usize) {
        if self.claimed.swap(true, Ordering::Relaxed) {
            panic!("Chain slot {slot} was published twice at the same status.");
        }

        // SAFETY: the claim above makes this thread the only writer, and no reader accesses
        // the value before the status is published.
        unsafe { (*self.value.get()).write(value) };
    }

    // SAFETY: the caller observed, with `Acquire` ordering, the status published after the write.
    unsafe fn read(&self) -> V {
        unsafe { (*self.value.get()).assume_init() }
    }
}

/// One slot of the [CarryChain].
pub struct ChainEntry<V> {
    status: AtomicU32,
    local: WriteOnce<V>,
    global: WriteOnce<V>,
}

impl<V: Copy> ChainEntry<V> {
    fn new() -> Self {
        Self {
            status: AtomicU32::new(TileStatus::Invalid as u32),
            local: WriteOnce::new(),
            global: WriteOnce::new(),
        }
    }

    /// The current status, read with `Acquire` ordering.
    pub fn status(&self) -> TileStatus {
        TileStatus::from_raw(self.status.load(Ordering::Acquire))
    }
}

impl<V> core::fmt::Debug for ChainEntry<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ChainEntry")
            .field("status", &self.status.load(Ordering::Relaxed))
            .finish()
    }
}

/// The carry chain of a dispatch: one slot per tile, all starting [Invalid](TileStatus::Invalid).
///
/// Slots only move forward, `Invalid -> LocalReady -> GlobalReady`, and each value is written
/// once. A value is written before its status is raised with `Release` ordering, and read after
/// the status is observed with `Acquire` ordering. Readers never wait on a slot.
#[derive(Debug)]
pub struct CarryChain<V> {
    entries: Box<[ChainEntry<V>]>,
}

impl<V: Copy + Send + Sync> CarryChain<V> {
    /// Allocate a chain of `len` invalid slots.
    pub fn new(len: usize) -> Self {
        Self {
            entries: (0..len).map(|_| ChainEntry::new()).collect(),
        }
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the chain has no slot.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The status of a slot.
    pub fn status(&self, tile: u32) -> TileStatus {
        self.entries[tile as usize].status()
    }

    /// Post the reduction of the tile alone.
    ///
    /// # Panics
    /// Panics if the local value of this slot was already posted.
    pub fn publish_local(&self, tile: u32, value: V) {
        let entry = &self.entries[tile as usize];
        entry.local.write(value, tile as usize);
        entry
            .status
            .fetch_max(TileStatus::LocalReady as u32, Ordering::Release);
    }

    /// Post the inclusive reduction up to the end of the tile.
    ///
    /// # Panics
    /// Panics if the global value of this slot was already posted.
    pub fn publish_global(&self, tile: u32, value: V) {
        let entry = &self.entries[tile as usize];
        entry.global.write(value, tile as usize);
        entry
            .status
            .fetch_max(TileStatus::GlobalReady as u32, Ordering::Release);
    }

    /// Read a slot without waiting.
    pub fn read(&self, tile: u32) -> ChainRead<V> {
        let entry = &self.entries[tile as usize];

        match entry.status() {
            TileStatus::Invalid => ChainRead::Invalid,
            // SAFETY: the status was observed with `Acquire` after the value was written.
            TileStatus::LocalReady => ChainRead::LocalReady(unsafe { entry.local.read() }),
            // SAFETY: the status was observed with `Acquire` after the value was written.
            TileStatus::GlobalReady => ChainRead::GlobalReady(unsafe { entry.global.read() }),
        }
    }

    /// The inclusive value of a slot, if posted.
    pub fn global_value(&self, tile: u32) -> Option<V> {
        match self.read(tile) {
            ChainRead::GlobalReady(value) => Some(value),
            _ => None,
        }
    }
}
