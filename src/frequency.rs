//! Symbol frequency analysis.

use std::collections::BTreeMap;

/// Occurrence count per symbol. Iteration is ascending by symbol, which is
/// the order leaves are seeded into the tree builder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    weights: BTreeMap<char, u64>,
    total: u64,
}

impl FrequencyTable {
    /// Count the code points of `text`.
    pub fn analyze(text: &str) -> Self {
        Self::from_symbols(text.chars())
    }

    pub fn from_symbols<I>(symbols: I) -> Self
    where
        I: IntoIterator<Item = char>,
    {
        let mut table = Self::default();
        for symbol in symbols {
            *table.weights.entry(symbol).or_insert(0) += 1;
            table.total += 1;
        }
        table
    }

    pub fn weight(&self, symbol: char) -> Option<u64> {
        self.weights.get(&symbol).copied()
    }

    /// Sum of all weights, i.e. the number of symbols scanned.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, u64)> + '_ {
        self.weights.iter().map(|(&symbol, &weight)| (symbol, weight))
    }

    /// Shannon entropy in bits per symbol.
    pub fn entropy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let total = self.total as f64;
        self.weights
            .values()
            .map(|&w| {
                let p = w as f64 / total;
                -p * p.log2()
            })
            .sum()
    }
}
