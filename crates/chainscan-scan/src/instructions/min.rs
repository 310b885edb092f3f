use core::marker::PhantomData;

use crate::{
    AtomicMonoid, Monoid,
    numeric::{ScanAtomic, ScanNumeric},
};

/// Smallest element.
///
/// Floats ignore `NaN` operands, like [f32::min].
#[derive(Debug, Clone, Copy)]
pub struct Min<N> {
    _numeric: PhantomData<N>,
}

impl<N> Min<N> {
    /// Create the instruction.
    pub const fn new() -> Self {
        Self {
            _numeric: PhantomData,
        }
    }
}

impl<N> Default for Min<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: ScanNumeric> Monoid for Min<N> {
    type Value = N;

    fn identity(&self) -> N {
        N::HIGHEST
    }

    fn combine(&self, lhs: N, rhs: N) -> N {
        lhs.minimum(rhs)
    }
}

impl<N: ScanNumeric> AtomicMonoid for Min<N> {
    type Atomic = N::Atomic;

    fn atomic_new(&self, value: N) -> N::Atomic {
        N::Atomic::new(value)
    }

    fn atomic_combine(&self, atomic: &N::Atomic, value: N) {
        atomic.fetch_min(value);
    }

    fn atomic_load(&self, atomic: &N::Atomic) -> N {
        atomic.load()
    }
}
