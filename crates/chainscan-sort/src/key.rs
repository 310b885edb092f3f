/// A key that can be sorted by its radix word.
///
/// The mapping must be a bijection that preserves order: `a < b` implies
/// `a.to_radix() < b.to_radix()`.
pub trait RadixKey: Copy + Send + Sync + core::fmt::Debug + PartialOrd + 'static {
    /// The order-preserving radix word of the key.
    fn to_radix(self) -> u32;

    /// The key of a radix word.
    fn from_radix(word: u32) -> Self;
}

impl RadixKey for u32 {
    fn to_radix(self) -> u32 {
        self
    }

    fn from_radix(word: u32) -> Self {
        word
    }
}

const SIGN_BIT: u32 = 0x8000_0000;

impl RadixKey for i32 {
    fn to_radix(self) -> u32 {
        (self as u32) ^ SIGN_BIT
    }

    fn from_radix(word: u32) -> Self {
        (word ^ SIGN_BIT) as i32
    }
}

// Negative floats have every bit flipped so larger magnitudes sort first, positive floats only
// get their sign bit set. The resulting order is the one of `f32::total_cmp`.
impl RadixKey for f32 {
    fn to_radix(self) -> u32 {
        let bits = self.to_bits();
        if bits & SIGN_BIT != 0 {
            !bits
        } else {
            bits | SIGN_BIT
        }
    }

    fn from_radix(word: u32) -> Self {
        let bits = if word & SIGN_BIT != 0 {
            word & !SIGN_BIT
        } else {
            !word
        };
        f32::from_bits(bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_order_preserved<K: RadixKey>(sorted: &[K]) {
        for pair in sorted.windows(2) {
            assert!(
                pair[0].to_radix() < pair[1].to_radix(),
                "{:?} and {:?} are out of order",
                pair[0],
                pair[1]
            );
        }
        for key in sorted {
            assert_eq!(K::from_radix(key.to_radix()).to_radix(), key.to_radix());
        }
    }

    #[test]
    fn signed_keys_keep_their_order() {
        assert_order_preserved(&[i32::MIN, -70_000, -1, 0, 1, 255, 256, i32::MAX]);
    }

    #[test]
    fn float_keys_follow_total_order() {
        assert_order_preserved(&[
            f32::NEG_INFINITY,
            -1.0e30,
            -2.5,
            -f32::MIN_POSITIVE,
            -0.0,
            0.0,
            f32::MIN_POSITIVE,
            1.0,
            3.5e12,
            f32::INFINITY,
        ]);
    }

    #[test]
    fn float_words_roundtrip_bits() {
        for bits in [0u32, 1, 0x7f80_0000, 0x7fc0_0000, 0x8000_0000, 0xffc0_0001] {
            let key = f32::from_bits(bits);
            assert_eq!(f32::from_radix(key.to_radix()).to_bits(), bits);
        }
    }
}
