use core::marker::PhantomData;

use crate::{
    AtomicMonoid, Monoid,
    numeric::{ScanAtomic, ScanNumeric},
};

/// Sum of all elements, wrapping for integers.
#[derive(Debug, Clone, Copy)]
pub struct Sum<N> {
    _numeric: PhantomData<N>,
}

impl<N> Sum<N> {
    /// Create the instruction.
    pub const fn new() -> Self {
        Self {
            _numeric: PhantomData,
        }
    }
}

impl<N> Default for Sum<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: ScanNumeric> Monoid for Sum<N> {
    type Value = N;

    fn identity(&self) -> N {
        N::ZERO
    }

    fn combine(&self, lhs: N, rhs: N) -> N {
        lhs.add_wrapping(rhs)
    }
}

impl<N: ScanNumeric> AtomicMonoid for Sum<N> {
    type Atomic = N::Atomic;

    fn atomic_new(&self, value: N) -> N::Atomic {
        N::Atomic::new(value)
    }

    fn atomic_combine(&self, atomic: &N::Atomic, value: N) {
        atomic.fetch_add(value);
    }

    fn atomic_load(&self, atomic: &N::Atomic) -> N {
        atomic.load()
    }
}
