use core::fmt::Debug;
use core::sync::atomic::{AtomicI32, AtomicI64, AtomicU32, AtomicU64, Ordering};
use num_traits::AsPrimitive;

/// Element types supported by the built-in [instructions](crate::instructions).
///
/// Integer arithmetic wraps, so sums and products stay associative on overflow.
pub trait ScanNumeric:
    Copy + Send + Sync + Debug + PartialEq + PartialOrd + Default + 'static
{
    /// Atomic cell holding one value, used by [atomic_reduce](crate::atomic_reduce).
    type Atomic: ScanAtomic<Self>;

    /// Additive identity.
    const ZERO: Self;
    /// Multiplicative identity.
    const ONE: Self;
    /// Identity of `max`.
    const LOWEST: Self;
    /// Identity of `min`.
    const HIGHEST: Self;

    /// Addition, wrapping for integers.
    fn add_wrapping(self, rhs: Self) -> Self;
    /// Multiplication, wrapping for integers.
    fn mul_wrapping(self, rhs: Self) -> Self;
    /// The smallest of both values.
    fn minimum(self, rhs: Self) -> Self;
    /// The largest of both values.
    fn maximum(self, rhs: Self) -> Self;
    /// Convert from an integer, like `as`.
    fn from_int(value: i64) -> Self;
}

/// An atomic cell for a [ScanNumeric] value.
pub trait ScanAtomic<N>: Send + Sync + Debug {
    /// Create a cell holding `value`.
    fn new(value: N) -> Self;
    /// Read the current value.
    fn load(&self) -> N;
    /// Add `value` to the cell.
    fn fetch_add(&self, value: N);
    /// Keep the smallest of the cell and `value`.
    fn fetch_min(&self, value: N);
    /// Keep the largest of the cell and `value`.
    fn fetch_max(&self, value: N);
    /// Replace the cell content by `func(current)` atomically.
    fn fetch_update_with<F: Fn(N) -> N>(&self, func: F);
}

macro_rules! impl_scan_int {
    ($($ty:ty => $atomic:ty),*) => {
        $(
            impl ScanNumeric for $ty {
                type Atomic = $atomic;

                const ZERO: Self = 0;
                const ONE: Self = 1;
                const LOWEST: Self = <$ty>::MIN;
                const HIGHEST: Self = <$ty>::MAX;

                fn add_wrapping(self, rhs: Self) -> Self {
                    self.wrapping_add(rhs)
                }

                fn mul_wrapping(self, rhs: Self) -> Self {
                    self.wrapping_mul(rhs)
                }

                fn minimum(self, rhs: Self) -> Self {
                    Ord::min(self, rhs)
                }

                fn maximum(self, rhs: Self) -> Self {
                    Ord::max(self, rhs)
                }

                fn from_int(value: i64) -> Self {
                    value.as_()
                }
            }

            impl ScanAtomic<$ty> for $atomic {
                fn new(value: $ty) -> Self {
                    <$atomic>::new(value)
                }

                fn load(&self) -> $ty {
                    <$atomic>::load(self, Ordering::Acquire)
                }

                fn fetch_add(&self, value: $ty) {
                    <$atomic>::fetch_add(self, value, Ordering::AcqRel);
                }

                fn fetch_min(&self, value: $ty) {
                    <$atomic>::fetch_min(self, value, Ordering::AcqRel);
                }

                fn fetch_max(&self, value: $ty) {
                    <$atomic>::fetch_max(self, value, Ordering::AcqRel);
                }

                fn fetch_update_with<F: Fn($ty) -> $ty>(&self, func: F) {
                    let _ = <$atomic>::fetch_update(self, Ordering::AcqRel, Ordering::Acquire, |current| {
                        Some(func(current))
                    });
                }
            }
        )*
    };
}

macro_rules! impl_scan_float {
    ($($ty:ty => $atomic:ident($bits:ty)),*) => {
        $(
            /// Atomic float stored as its bit pattern.
            #[derive(Debug)]
            pub struct $atomic($bits);

            impl ScanNumeric for $ty {
                type Atomic = $atomic;

                const ZERO: Self = 0.0;
                const ONE: Self = 1.0;
                const LOWEST: Self = <$ty>::NEG_INFINITY;
                const HIGHEST: Self = <$ty>::INFINITY;

                fn add_wrapping(self, rhs: Self) -> Self {
                    self + rhs
                }

                fn mul_wrapping(self, rhs: Self) -> Self {
                    self * rhs
                }

                fn minimum(self, rhs: Self) -> Self {
                    <$ty>::min(self, rhs)
                }

                fn maximum(self, rhs: Self) -> Self {
                    <$ty>::max(self, rhs)
                }

                fn from_int(value: i64) -> Self {
                    value.as_()
                }
            }

            impl ScanAtomic<$ty> for $atomic {
                fn new(value: $ty) -> Self {
                    Self(<$bits>::new(value.to_bits()))
                }

                fn load(&self) -> $ty {
                    <$ty>::from_bits(self.0.load(Ordering::Acquire))
                }

                fn fetch_add(&self, value: $ty) {
                    self.fetch_update_with(|current| current + value);
                }

                fn fetch_min(&self, value: $ty) {
                    self.fetch_update_with(|current| <$ty>::min(current, value));
                }

                fn fetch_max(&self, value: $ty) {
                    self.fetch_update_with(|current| <$ty>::max(current, value));
                }

                fn fetch_update_with<F: Fn($ty) -> $ty>(&self, func: F) {
                    let _ = self.0.fetch_update(Ordering::AcqRel, Ordering::Acquire, |bits| {
                        Some(func(<$ty>::from_bits(bits)).to_bits())
                    });
                }
            }
        )*
    };
}

impl_scan_int!(u32 => AtomicU32, i32 => AtomicI32, u64 => AtomicU64, i64 => AtomicI64);
impl_scan_float!(f32 => AtomicF32(AtomicU32), f64 => AtomicF64(AtomicU64));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_arithmetic_wraps() {
        assert_eq!(u32::MAX.add_wrapping(2), 1);
        assert_eq!(i32::MAX.mul_wrapping(2), -2);
    }

    #[test]
    fn float_atomics_accumulate() {
        let cell = <f32 as ScanNumeric>::Atomic::new(1.5);
        cell.fetch_add(2.0);
        cell.fetch_max(3.0);

        assert_eq!(cell.load(), 3.5);
    }

    #[test]
    fn integer_atomics_accumulate() {
        let cell = <i64 as ScanNumeric>::Atomic::new(5);
        ScanAtomic::fetch_add(&cell, -7);
        ScanAtomic::fetch_min(&cell, -1);

        assert_eq!(ScanAtomic::load(&cell), -2);
    }
}
