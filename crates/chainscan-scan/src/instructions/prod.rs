use core::marker::PhantomData;

use crate::{
    AtomicMonoid, Monoid,
    numeric::{ScanAtomic, ScanNumeric},
};

/// Product of all elements, wrapping for integers.
#[derive(Debug, Clone, Copy)]
pub struct Prod<N> {
    _numeric: PhantomData<N>,
}

impl<N> Prod<N> {
    /// Create the instruction.
    pub const fn new() -> Self {
        Self {
            _numeric: PhantomData,
        }
    }
}

impl<N> Default for Prod<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: ScanNumeric> Monoid for Prod<N> {
    type Value = N;

    fn identity(&self) -> N {
        N::ONE
    }

    fn combine(&self, lhs: N, rhs: N) -> N {
        lhs.mul_wrapping(rhs)
    }
}

impl<N: ScanNumeric> AtomicMonoid for Prod<N> {
    type Atomic = N::Atomic;

    fn atomic_new(&self, value: N) -> N::Atomic {
        N::Atomic::new(value)
    }

    fn atomic_combine(&self, atomic: &N::Atomic, value: N) {
        atomic.fetch_update_with(|current| current.mul_wrapping(value));
    }

    fn atomic_load(&self, atomic: &N::Atomic) -> N {
        atomic.load()
    }
}
