use core::fmt::Debug;

use crate::ScanSetupError;

/// An associative operator with an identity.
///
/// `combine` must be associative, but not necessarily commutative: the engine always passes
/// values covering lower indices as `lhs`. `identity` must satisfy
/// `combine(identity, x) == x == combine(x, identity)` for every `x`.
pub trait Monoid: Send + Sync + 'static {
    /// The element type, a scalar or a small fixed-size vector.
    type Value: Copy + Send + Sync + Debug + PartialEq;

    /// The neutral element.
    fn identity(&self) -> Self::Value;

    /// Combine two values, `lhs` covering lower indices than `rhs`.
    fn combine(&self, lhs: Self::Value, rhs: Self::Value) -> Self::Value;
}

/// A commutative monoid that can also be folded into a single atomic cell.
pub trait AtomicMonoid: Monoid {
    /// The atomic cell type.
    type Atomic: Send + Sync;

    /// Create a cell holding `value`.
    fn atomic_new(&self, value: Self::Value) -> Self::Atomic;

    /// Combine `value` into the cell.
    fn atomic_combine(&self, atomic: &Self::Atomic, value: Self::Value);

    /// Read the cell.
    fn atomic_load(&self, atomic: &Self::Atomic) -> Self::Value;
}

/// Check the identity law of `monoid` on every sample.
///
/// The engine doesn't verify it on its own, since it holds by contract for every monoid.
pub fn check_identity<M: Monoid>(monoid: &M, samples: &[M::Value]) -> Result<(), ScanSetupError> {
    let identity = monoid.identity();

    for sample in samples {
        let left = monoid.combine(identity, *sample);
        let right = monoid.combine(*sample, identity);

        if left != *sample || right != *sample {
            return Err(ScanSetupError::IdentityLaw {
                sample: format!("{sample:?}"),
            });
        }
    }

    Ok(())
}

/// Check associativity of `monoid` on every consecutive triple of samples.
pub fn check_associativity<M: Monoid>(monoid: &M, samples: &[M::Value]) -> bool {
    samples.windows(3).all(|window| {
        let (a, b, c) = (window[0], window[1], window[2]);
        monoid.combine(monoid.combine(a, b), c) == monoid.combine(a, monoid.combine(b, c))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instructions::{BitOr, BitXor, Max, Min, Prod, Sum};

    struct BrokenIdentity;

    impl Monoid for BrokenIdentity {
        type Value = u32;

        fn identity(&self) -> u32 {
            1
        }

        fn combine(&self, lhs: u32, rhs: u32) -> u32 {
            lhs.wrapping_add(rhs)
        }
    }

    #[test]
    fn builtin_instructions_satisfy_identity() {
        assert!(check_identity(&Sum::<u32>::new(), &[0, 1, u32::MAX]).is_ok());
        assert!(check_identity(&Max::<i32>::new(), &[i32::MIN, -1, 7]).is_ok());
        assert!(check_associativity(&Sum::<u32>::new(), &[3, u32::MAX, 9, 12]));
    }

    #[test]
    fn every_builtin_satisfies_identity() {
        assert!(check_identity(&Sum::<i64>::new(), &[i64::MIN, -3, 0, i64::MAX]).is_ok());
        assert!(check_identity(&Sum::<f32>::new(), &[-2.5, 0.0, 1.0e20]).is_ok());
        assert!(check_identity(&Sum::<f64>::new(), &[-2.5, 0.0, 1.0e200]).is_ok());

        assert!(check_identity(&Prod::<u32>::new(), &[0, 1, 7, u32::MAX]).is_ok());
        assert!(check_identity(&Prod::<i32>::new(), &[i32::MIN, -1, 0, 5]).is_ok());
        assert!(check_identity(&Prod::<f32>::new(), &[-0.5, 3.0, 1.0e30]).is_ok());
        assert!(check_identity(&Prod::<f64>::new(), &[-0.5, 3.0, 1.0e300]).is_ok());

        assert!(check_identity(&Min::<u64>::new(), &[0, 9, u64::MAX]).is_ok());
        assert!(check_identity(&Min::<i32>::new(), &[i32::MIN, 0, i32::MAX]).is_ok());
        assert!(check_identity(&Min::<f32>::new(), &[f32::MIN, -1.0, f32::MAX]).is_ok());
        assert!(check_identity(&Min::<f64>::new(), &[f64::MIN, 2.0, f64::MAX]).is_ok());

        assert!(check_identity(&Max::<u32>::new(), &[0, 4, u32::MAX]).is_ok());
        assert!(check_identity(&Max::<i64>::new(), &[i64::MIN, 0, i64::MAX]).is_ok());
        assert!(check_identity(&Max::<f32>::new(), &[f32::MIN, 1.5, f32::MAX]).is_ok());
        assert!(check_identity(&Max::<f64>::new(), &[f64::MIN, 1.5, f64::MAX]).is_ok());

        assert!(check_identity(&BitOr::<u32>::new(), &[0, 0b1010, u32::MAX]).is_ok());
        assert!(check_identity(&BitOr::<u64>::new(), &[0, 1 << 40, u64::MAX]).is_ok());
        assert!(check_identity(&BitXor::<u32>::new(), &[0, 0b0110, u32::MAX]).is_ok());
        assert!(check_identity(&BitXor::<u64>::new(), &[0, 1 << 40, u64::MAX]).is_ok());
    }

    #[test]
    fn wrong_identity_is_rejected() {
        let result = check_identity(&BrokenIdentity, &[4]);

        assert_eq!(
            result,
            Err(ScanSetupError::IdentityLaw {
                sample: "4".to_string()
            })
        );
    }
}
