use std::collections::BTreeMap;
use std::ops::Index;

/// Number of distinct byte values.
pub const ALPHABET_SIZE: usize = 256;

/// Occurrence count of every byte value in a stream.
///
/// ## Invariant
/// `total()` always equals the number of bytes tallied into this histogram,
/// directly or through [`merge`](Self::merge). A zero count means the symbol
/// is absent; [`iter`](Self::iter) and [`to_map`](Self::to_map) omit it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    counts: [u64; ALPHABET_SIZE],
}

impl Histogram {
    pub fn new() -> Self {
        Self {
            counts: [0; ALPHABET_SIZE],
        }
    }

    /// Single-threaded count over an in-memory buffer.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut histogram = Self::new();
        histogram.tally(bytes);
        histogram
    }

    /// Adds one occurrence for every byte in `bytes`.
    #[inline]
    pub fn tally(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.counts[b as usize] += 1;
        }
    }

    /// Adds `other` into `self` symbol by symbol.
    ///
    /// Element-wise addition, so any merge order yields the same result.
    pub fn merge(&mut self, other: &Histogram) {
        for (dst, src) in self.counts.iter_mut().zip(other.counts.iter()) {
            *dst += *src;
        }
    }

    pub fn get(&self, symbol: u8) -> u64 {
        self.counts[symbol as usize]
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Number of symbols with a non-zero count.
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    /// Present symbols in ascending byte order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, c)| **c > 0)
            .map(|(symbol, &c)| (symbol as u8, c))
    }

    /// Sparse view handed to tree construction; absent symbols are omitted.
    pub fn to_map(&self) -> BTreeMap<u8, u64> {
        self.iter().collect()
    }

    /// Shannon entropy in bits per symbol, 0.0 for an empty histogram.
    pub fn entropy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let total = total as f64;
        self.iter()
            .map(|(_, c)| {
                let p = c as f64 / total;
                -p * p.log2()
            })
            .sum()
    }

    pub fn as_array(&self) -> &[u64; ALPHABET_SIZE] {
        &self.counts
    }
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<u8> for Histogram {
    type Output = u64;

    fn index(&self, symbol: u8) -> &u64 {
        &self.counts[symbol as usize]
    }
}
