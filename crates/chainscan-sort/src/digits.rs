use chainscan_scan::Monoid;

/// Bits of a key consumed by one pass.
pub const RADIX_BITS: u32 = 8;
/// Number of buckets of a pass.
pub const RADIX: usize = 1 << RADIX_BITS;
/// Passes needed to sort 32-bit radix words.
pub const NUM_PASSES: usize = 32 / RADIX_BITS as usize;

/// The digit of `word` sorted by the given pass, least significant first.
pub fn digit(word: u32, pass: usize) -> usize {
    ((word >> (pass as u32 * RADIX_BITS)) & (RADIX as u32 - 1)) as usize
}

/// Number of keys falling in every bucket of a pass.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct DigitCounts(pub [u32; RADIX]);

impl DigitCounts {
    /// No key in any bucket.
    pub const fn zero() -> Self {
        Self([0; RADIX])
    }

    /// Add one key to the bucket of `digit`.
    pub fn increment(mut self, digit: usize) -> Self {
        self.0[digit] += 1;
        self
    }

    /// Number of keys counted over every bucket.
    pub fn total(&self) -> u64 {
        self.0.iter().map(|count| *count as u64).sum()
    }
}

impl Default for DigitCounts {
    fn default() -> Self {
        Self::zero()
    }
}

// Only non-empty buckets, as `digit: count`.
impl core::fmt::Debug for DigitCounts {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map()
            .entries(
                self.0
                    .iter()
                    .enumerate()
                    .filter(|(_, count)| **count > 0),
            )
            .finish()
    }
}

/// Bucket-wise addition of [DigitCounts], the carry of every sort pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct BucketSum;

impl Monoid for BucketSum {
    type Value = DigitCounts;

    fn identity(&self) -> DigitCounts {
        DigitCounts::zero()
    }

    fn combine(&self, lhs: DigitCounts, rhs: DigitCounts) -> DigitCounts {
        let mut out = lhs;
        for (acc, count) in out.0.iter_mut().zip(rhs.0) {
            *acc = acc.wrapping_add(count);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_from_least_significant() {
        let word = 0x12_34_56_78;

        assert_eq!(digit(word, 0), 0x78);
        assert_eq!(digit(word, 1), 0x56);
        assert_eq!(digit(word, 3), 0x12);
    }

    #[test]
    fn bucket_sum_adds_every_bucket() {
        let lhs = DigitCounts::zero().increment(3).increment(3).increment(255);
        let rhs = DigitCounts::zero().increment(3).increment(0);
        let sum = BucketSum.combine(lhs, rhs);

        assert_eq!(sum.0[0], 1);
        assert_eq!(sum.0[3], 3);
        assert_eq!(sum.0[255], 1);
        assert_eq!(sum.total(), 5);
        assert_eq!(BucketSum.combine(BucketSum.identity(), sum), sum);
    }

    #[test]
    fn debug_lists_non_empty_buckets() {
        let counts = DigitCounts::zero().increment(7).increment(7).increment(200);

        assert_eq!(format!("{counts:?}"), "{7: 2, 200: 1}");
    }
}
