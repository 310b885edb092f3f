use core::marker::PhantomData;
use num_traits::PrimInt;

use crate::{
    AtomicMonoid, Monoid,
    numeric::{ScanAtomic, ScanNumeric},
};

/// Bitwise or of all elements.
#[derive(Debug, Clone, Copy, Default)]
pub struct BitOr<N> {
    _numeric: PhantomData<N>,
}

/// Bitwise xor of all elements.
#[derive(Debug, Clone, Copy, Default)]
pub struct BitXor<N> {
    _numeric: PhantomData<N>,
}

impl<N> BitOr<N> {
    /// Create the instruction.
    pub const fn new() -> Self {
        Self {
            _numeric: PhantomData,
        }
    }
}

impl<N> BitXor<N> {
    /// Create the instruction.
    pub const fn new() -> Self {
        Self {
            _numeric: PhantomData,
        }
    }
}

impl<N: ScanNumeric + PrimInt> Monoid for BitOr<N> {
    type Value = N;

    fn identity(&self) -> N {
        N::ZERO
    }

    fn combine(&self, lhs: N, rhs: N) -> N {
        lhs | rhs
    }
}

impl<N: ScanNumeric + PrimInt> Monoid for BitXor<N> {
    type Value = N;

    fn identity(&self) -> N {
        N::ZERO
    }

    fn combine(&self, lhs: N, rhs: N) -> N {
        lhs ^ rhs
    }
}

impl<N: ScanNumeric + PrimInt> AtomicMonoid for BitOr<N> {
    type Atomic = N::Atomic;

    fn atomic_new(&self, value: N) -> N::Atomic {
        N::Atomic::new(value)
    }

    fn atomic_combine(&self, atomic: &N::Atomic, value: N) {
        atomic.fetch_update_with(|current| current | value);
    }

    fn atomic_load(&self, atomic: &N::Atomic) -> N {
        atomic.load()
    }
}

impl<N: ScanNumeric + PrimInt> AtomicMonoid for BitXor<N> {
    type Atomic = N::Atomic;

    fn atomic_new(&self, value: N) -> N::Atomic {
        N::Atomic::new(value)
    }

    fn atomic_combine(&self, atomic: &N::Atomic, value: N) {
        atomic.fetch_update_with(|current| current ^ value);
    }

    fn atomic_load(&self, atomic: &N::Atomic) -> N {
        atomic.load()
    }
}
