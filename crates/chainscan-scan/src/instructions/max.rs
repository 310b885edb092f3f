use core::marker::PhantomData;

use crate::{
    AtomicMonoid, Monoid,
    numeric::{ScanAtomic, ScanNumeric},
};

/// Largest element.
///
/// The identity of floats is negative infinity.
#[derive(Debug, Clone, Copy)]
pub struct Max<N> {
    _numeric: PhantomData<N>,
}

impl<N> Max<N> {
    /// Create the instruction.
    pub const fn new() -> Self {
        Self {
            _numeric: PhantomData,
        }
    }
}

impl<N> Default for Max<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: ScanNumeric> Monoid for Max<N> {
    type Value = N;

    fn identity(&self) -> N {
        N::LOWEST
    }

    fn combine(&self, lhs: N, rhs: N) -> N {
        lhs.maximum(rhs)
    }
}

impl<N: ScanNumeric> AtomicMonoid for Max<N> {
    type Atomic = N::Atomic;

    fn atomic_new(&self, value: N) -> N::Atomic {
        N::Atomic::new(value)
    }

    fn atomic_combine(&self, atomic: &N::Atomic, value: N) {
        atomic.fetch_max(value);
    }

    fn atomic_load(&self, atomic: &N::Atomic) -> N {
        atomic.load()
    }
}
