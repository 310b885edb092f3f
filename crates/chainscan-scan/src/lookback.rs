use core::sync::atomic::{AtomicU64, Ordering};

use crate::{
    Monoid,
    chain::{CarryChain, ChainRead},
};

/// Counters shared by every cube of a dispatch.
#[derive(Debug, Default)]
pub struct LookbackStats {
    steps: AtomicU64,
    fallbacks: AtomicU64,
    spins: AtomicU64,
}

/// A snapshot of [LookbackStats].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LookbackCounts {
    /// Slots visited by all lookbacks.
    pub steps: u64,
    /// Tiles recomputed because their slot was still invalid.
    pub fallbacks: u64,
    /// Re-reads of invalid slots before falling back.
    pub spins: u64,
}

impl LookbackStats {
    /// Read every counter.
    pub fn snapshot(&self) -> LookbackCounts {
        LookbackCounts {
            steps: self.steps.load(Ordering::Relaxed),
            fallbacks: self.fallbacks.load(Ordering::Relaxed),
            spins: self.spins.load(Ordering::Relaxed),
        }
    }

    fn record(&self, steps: u64, fallbacks: u64, spins: u64) {
        self.steps.fetch_add(steps, Ordering::Relaxed);
        self.fallbacks.fetch_add(fallbacks, Ordering::Relaxed);
        self.spins.fetch_add(spins, Ordering::Relaxed);
    }
}

impl core::ops::Add for LookbackCounts {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            steps: self.steps + rhs.steps,
            fallbacks: self.fallbacks + rhs.fallbacks,
            spins: self.spins + rhs.spins,
        }
    }
}

/// Walks the chain backward from `tile - 1` and returns the combination of every element before
/// `tile`, prefixed by `seed` when given.
///
/// A [GlobalReady](ChainRead::GlobalReady) slot ends the walk. A
/// [LocalReady](ChainRead::LocalReady) slot is absorbed and the walk continues. An invalid slot
/// is re-read at most `spin_budget` times, then replaced by `fallback(j)`, which must return the
/// reduction of tile `j` alone. Nothing is ever published on behalf of another tile, so the walk
/// takes at most `tile` steps whatever the other cubes are doing.
pub fn lookback<M, F>(
    monoid: &M,
    chain: &CarryChain<M::Value>,
    tile: u32,
    seed: Option<M::Value>,
    spin_budget: u32,
    stats: &LookbackStats,
    mut fallback: F,
) -> M::Value
where
    M: Monoid,
    F: FnMut(u32) -> M::Value,
{
    let mut accumulated = monoid.identity();
    let mut cursor = tile;
    let (mut steps, mut fallbacks, mut spins) = (0, 0, 0);
    let mut reached_global = false;

    while cursor > 0 {
        let predecessor = cursor - 1;
        steps += 1;

        let mut read = chain.read(predecessor);
        let mut spun = 0;
        while matches!(read, ChainRead::Invalid) && spun < spin_budget {
            core::hint::spin_loop();
            spun += 1;
            read = chain.read(predecessor);
        }
        spins += spun as u64;

        match read {
            ChainRead::GlobalReady(value) => {
                accumulated = monoid.combine(value, accumulated);
                reached_global = true;
                break;
            }
            ChainRead::LocalReady(value) => {
                accumulated = monoid.combine(value, accumulated);
            }
            ChainRead::Invalid => {
                log::trace!("Tile {tile} falls back on tile {predecessor}");
                fallbacks += 1;
                accumulated = monoid.combine(fallback(predecessor), accumulated);
            }
        }

        cursor = predecessor;
    }

    stats.record(steps, fallbacks, spins);

    match (reached_global, seed) {
        (false, Some(seed)) => monoid.combine(seed, accumulated),
        _ => accumulated,
    }
}
