//! Search Configuration
//!
//! Breadth parameters, key alphabets and keysize heuristics for the breakers.
//! The repeating-XOR search grows as `candidates_per_column ^ keysize`, so the
//! breadth knobs are explicit and validated rather than left as constants.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

use crate::{Error, Result};

/// Upper bound on `max_candidates` accepted by [`XorSearchConfig::validate`].
pub const HARD_CANDIDATE_CEILING: usize = 1 << 24;

/// Set of key bytes a single-byte search enumerates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyAlphabet {
    /// Every byte value, 0-255
    #[default]
    Full,
    /// `'0'..='z'` (48-122), for keys known to be printable
    Printable,
    /// An explicit inclusive byte range
    Range { start: u8, end: u8 },
}

impl KeyAlphabet {
    pub fn bounds(&self) -> RangeInclusive<u8> {
        match *self {
            KeyAlphabet::Full => 0..=255,
            KeyAlphabet::Printable => b'0'..=b'z',
            KeyAlphabet::Range { start, end } => start..=end,
        }
    }

    pub fn candidates(&self) -> Vec<u8> {
        self.bounds().collect()
    }

    pub fn len(&self) -> usize {
        let bounds = self.bounds();
        if bounds.start() > bounds.end() {
            0
        } else {
            usize::from(*bounds.end() - *bounds.start()) + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(Error::InvalidConfig(format!(
                "key alphabet {:?} contains no bytes",
                self
            )));
        }
        Ok(())
    }
}

/// Block-distance heuristic used to rank keysizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeysizeHeuristic {
    /// Hamming distance of the first two blocks, normalized by keysize
    #[default]
    Hamming,
    /// Mean of two independent normalized block-pair distances
    FourBlock,
    /// Raw XOR-sum of the first two blocks, normalized by keysize
    XorSum,
}

/// Breadth of the repeating-key XOR search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct XorSearchConfig {
    /// Smallest keysize considered
    pub min_keysize: usize,
    /// Largest keysize considered
    pub max_keysize: usize,
    /// Keysizes retained from the estimator ranking
    pub top_keysizes: usize,
    /// Key-byte candidates retained per column
    pub candidates_per_column: usize,
    /// Ceiling on candidate keys scored for one keysize
    pub max_candidates: usize,
    pub key_alphabet: KeyAlphabet,
    pub heuristic: KeysizeHeuristic,
}

impl Default for XorSearchConfig {
    fn default() -> Self {
        Self {
            min_keysize: 2,
            max_keysize: 40,
            top_keysizes: 3,
            candidates_per_column: 2,
            max_candidates: 1 << 16,
            key_alphabet: KeyAlphabet::Full,
            heuristic: KeysizeHeuristic::Hamming,
        }
    }
}

impl XorSearchConfig {
    pub fn validate(&self) -> Result<()> {
        validate_keysize_range(self.min_keysize, self.max_keysize)?;
        if self.top_keysizes == 0 {
            return Err(Error::InvalidConfig("top_keysizes must be at least 1".into()));
        }
        if self.candidates_per_column == 0 {
            return Err(Error::InvalidConfig(
                "candidates_per_column must be at least 1".into(),
            ));
        }
        if self.candidates_per_column > self.key_alphabet.len() {
            return Err(Error::InvalidConfig(format!(
                "candidates_per_column {} exceeds the {} bytes of the key alphabet",
                self.candidates_per_column,
                self.key_alphabet.len()
            )));
        }
        if self.max_candidates == 0 || self.max_candidates > HARD_CANDIDATE_CEILING {
            return Err(Error::InvalidConfig(format!(
                "max_candidates must be within 1..={}, got {}",
                HARD_CANDIDATE_CEILING, self.max_candidates
            )));
        }
        self.key_alphabet.validate()
    }

    /// Per-column width actually searched at `keysize`: the largest
    /// `c <= candidates_per_column` with `c^keysize <= max_candidates`.
    pub fn beam_width(&self, keysize: usize) -> usize {
        let mut width = self.candidates_per_column.max(1);
        while width > 1 {
            match crate::product_len(width, keysize) {
                Some(total) if total <= self.max_candidates => break,
                _ => width -= 1,
            }
        }
        width
    }
}

/// Parameters of the alphabetic Vigenère break.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VigenereConfig {
    pub min_keysize: usize,
    pub max_keysize: usize,
    /// Keysizes decrypted and scored in full
    pub top_keysizes: usize,
    pub heuristic: KeysizeHeuristic,
}

impl Default for VigenereConfig {
    fn default() -> Self {
        Self {
            min_keysize: 3,
            max_keysize: 13,
            top_keysizes: 3,
            heuristic: KeysizeHeuristic::Hamming,
        }
    }
}

impl VigenereConfig {
    pub fn validate(&self) -> Result<()> {
        validate_keysize_range(self.min_keysize, self.max_keysize)?;
        if self.top_keysizes == 0 {
            return Err(Error::InvalidConfig("top_keysizes must be at least 1".into()));
        }
        Ok(())
    }
}

fn validate_keysize_range(min: usize, max: usize) -> Result<()> {
    if min == 0 {
        return Err(Error::InvalidConfig("min_keysize must be at least 1".into()));
    }
    if min > max {
        return Err(Error::InvalidConfig(format!(
            "min_keysize {} exceeds max_keysize {}",
            min, max
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(XorSearchConfig::default().validate().is_ok());
        assert!(VigenereConfig::default().validate().is_ok());
    }

    #[test]
    fn test_key_alphabet_sizes() {
        assert_eq!(KeyAlphabet::Full.len(), 256);
        assert_eq!(KeyAlphabet::Printable.len(), 75);
        assert_eq!(KeyAlphabet::Printable.candidates()[0], 48);
        assert_eq!(*KeyAlphabet::Printable.candidates().last().unwrap(), 122);
        assert_eq!(KeyAlphabet::Range { start: 10, end: 12 }.candidates(), vec![10, 11, 12]);
        assert!(KeyAlphabet::Range { start: 5, end: 4 }.is_empty());
    }

    #[test]
    fn test_rejects_bad_breadth() {
        let zero_top = XorSearchConfig { top_keysizes: 0, ..Default::default() };
        assert!(matches!(zero_top.validate(), Err(Error::InvalidConfig(_))));

        let zero_width = XorSearchConfig { candidates_per_column: 0, ..Default::default() };
        assert!(zero_width.validate().is_err());

        let over_ceiling = XorSearchConfig {
            max_candidates: HARD_CANDIDATE_CEILING + 1,
            ..Default::default()
        };
        assert!(over_ceiling.validate().is_err());

        let inverted = XorSearchConfig { min_keysize: 9, max_keysize: 4, ..Default::default() };
        assert!(inverted.validate().is_err());

        let too_wide = XorSearchConfig {
            candidates_per_column: 4,
            key_alphabet: KeyAlphabet::Range { start: 0, end: 2 },
            ..Default::default()
        };
        assert!(too_wide.validate().is_err());
    }

    #[test]
    fn test_beam_width_narrows_with_keysize() {
        let config = XorSearchConfig {
            candidates_per_column: 3,
            max_candidates: 1000,
            ..Default::default()
        };
        // 3^6 = 729 fits, 3^7 = 2187 does not; 2^9 = 512 fits, 2^10 = 1024 does not
        assert_eq!(config.beam_width(6), 3);
        assert_eq!(config.beam_width(7), 2);
        assert_eq!(config.beam_width(9), 2);
        assert_eq!(config.beam_width(10), 1);
        assert_eq!(config.beam_width(40), 1);
    }
}
