//! English Frequency Model
//!
//! Chi-squared goodness of fit against reference English symbol frequencies.
//! Lower scores are more English-like.

use lazy_static::lazy_static;

/// Penalty added per byte that has no entry in the frequency table.
///
/// Exceeds any plausible in-alphabet contribution so that control bytes and
/// high-bit bytes sink a candidate plaintext.
pub const OUT_OF_ALPHABET_PENALTY: f64 = 100.0;

/// Reference frequencies: letters, then space and the three common
/// punctuation marks (from https://en.wikipedia.org/wiki/English_punctuation).
const ENGLISH_FREQUENCIES: [(u8, f64); 30] = [
    (b'a', 0.08167),
    (b'b', 0.01492),
    (b'c', 0.02782),
    (b'd', 0.04253),
    (b'e', 0.12702),
    (b'f', 0.02228),
    (b'g', 0.02015),
    (b'h', 0.06094),
    (b'i', 0.06966),
    (b'j', 0.00153),
    (b'k', 0.00772),
    (b'l', 0.04025),
    (b'm', 0.02406),
    (b'n', 0.06749),
    (b'o', 0.07507),
    (b'p', 0.01929),
    (b'q', 0.00095),
    (b'r', 0.05987),
    (b's', 0.06327),
    (b't', 0.09056),
    (b'u', 0.02758),
    (b'v', 0.00978),
    (b'w', 0.02360),
    (b'x', 0.00150),
    (b'y', 0.01974),
    (b'z', 0.00074),
    (b' ', 0.19181),
    (b',', 0.06130),
    (b'.', 0.06530),
    (b'\'', 0.02430),
];

lazy_static! {
    static ref ENGLISH: FrequencyModel = FrequencyModel::from_table(&ENGLISH_FREQUENCIES);
}

/// Expected symbol probabilities plus a byte-indexed lookup for scoring.
#[derive(Debug, Clone)]
pub struct FrequencyModel {
    symbols: Vec<(u8, f64)>,
    slots: [Option<usize>; 256],
}

impl FrequencyModel {
    /// The process-wide English model, built on first use.
    pub fn english() -> &'static FrequencyModel {
        &ENGLISH
    }

    fn from_table(table: &[(u8, f64)]) -> Self {
        let mut slots = [None; 256];
        for (slot, &(symbol, _)) in table.iter().enumerate() {
            slots[symbol as usize] = Some(slot);
        }
        Self {
            symbols: table.to_vec(),
            slots,
        }
    }

    /// Expected relative frequency of a (case-folded) symbol, if tabled.
    pub fn frequency(&self, symbol: u8) -> Option<f64> {
        self.slots[symbol.to_ascii_lowercase() as usize].map(|slot| self.symbols[slot].1)
    }

    /// Observed count of every tabled symbol in `text`, in table order.
    pub fn frequency_count(&self, text: &[u8]) -> Vec<(u8, usize)> {
        let counts = self.tally(text).0;
        self.symbols
            .iter()
            .zip(counts)
            .map(|(&(symbol, _), count)| (symbol, count))
            .collect()
    }

    /// Chi-squared score of `text`. `score(b"") == 0.0`.
    ///
    /// Expected counts are scaled by the number of tabled symbols in the text;
    /// every untabled byte adds [`OUT_OF_ALPHABET_PENALTY`].
    pub fn score(&self, text: &[u8]) -> f64 {
        let (counts, untabled) = self.tally(text);
        let penalty = untabled as f64 * OUT_OF_ALPHABET_PENALTY;

        let length: usize = counts.iter().sum();
        if length == 0 {
            return penalty;
        }

        let length = length as f64;
        let chi_squared: f64 = self
            .symbols
            .iter()
            .zip(&counts)
            .map(|(&(_, freq), &observed)| {
                let expected = length * freq;
                let difference = observed as f64 - expected;
                difference * difference / expected
            })
            .sum();

        chi_squared + penalty
    }

    fn tally(&self, text: &[u8]) -> (Vec<usize>, usize) {
        let mut counts = vec![0usize; self.symbols.len()];
        let mut untabled = 0usize;
        for &byte in text {
            match self.slots[byte.to_ascii_lowercase() as usize] {
                Some(slot) => counts[slot] += 1,
                None => untabled += 1,
            }
        }
        (counts, untabled)
    }
}
