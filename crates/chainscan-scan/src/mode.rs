use serde::{Deserialize, Serialize};

/// What a dispatch writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScanMode {
    /// Element `i` receives the combination of elements `0..i`.
    Exclusive,
    /// Element `i` receives the combination of elements `0..=i`.
    Inclusive,
    /// A single element receives the combination of every element.
    Reduce,
}

impl ScanMode {
    /// Whether the dispatch writes one value per element.
    pub fn is_scan(&self) -> bool {
        !matches!(self, ScanMode::Reduce)
    }

    /// Number of output elements for an input of `len` elements.
    pub fn output_len(&self, len: usize) -> usize {
        match self {
            ScanMode::Reduce => 1,
            _ => len,
        }
    }
}

/// Base combined in front of every result of a dispatch.
///
/// Scanning `x[k..n)` seeded with the reduction of `x[0..k)` gives the same results as the
/// second half of a scan of `x[0..n)`.
#[derive(new, Debug, Clone, Copy, PartialEq)]
pub struct ScanSeed<V> {
    /// The seed value.
    pub value: V,
}
