//! Keysize Estimation
//!
//! Ranks candidate repeating-key lengths by the bit distance between leading
//! ciphertext blocks. Blocks enciphered under the same key alignment keep the
//! bit structure of the plaintext, so the true keysize (and its multiples)
//! shows a lower normalized distance than misaligned lengths.

use crate::config::KeysizeHeuristic;
use crate::guess::sort_by_distance;
use crate::xor::{hamming_distance, xor_sum_distance};
use crate::{Error, KeysizeGuess, Result};

/// Keysize ranking under a chosen block-distance heuristic.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeysizeEstimator {
    heuristic: KeysizeHeuristic,
}

impl KeysizeEstimator {
    pub fn new(heuristic: KeysizeHeuristic) -> Self {
        Self { heuristic }
    }

    pub fn heuristic(&self) -> KeysizeHeuristic {
        self.heuristic
    }

    /// Every keysize in `min_size..=max_size`, ascending by distance.
    ///
    /// Fails with [`Error::OutOfBounds`] when the ciphertext is too short for
    /// the blocks the heuristic compares at `max_size`.
    pub fn estimate(
        &self,
        ciphertext: &[u8],
        min_size: usize,
        max_size: usize,
    ) -> Result<Vec<KeysizeGuess>> {
        let blocks = match self.heuristic {
            KeysizeHeuristic::Hamming | KeysizeHeuristic::XorSum => 2,
            KeysizeHeuristic::FourBlock => 4,
        };
        check_bounds(ciphertext, min_size, max_size, blocks)?;

        let mut guesses = (min_size..=max_size)
            .map(|keysize| -> Result<KeysizeGuess> {
                let distance = match self.heuristic {
                    KeysizeHeuristic::Hamming => two_block_hamming(ciphertext, keysize),
                    KeysizeHeuristic::FourBlock => four_block_hamming(ciphertext, keysize),
                    KeysizeHeuristic::XorSum => two_block_xor_sum(ciphertext, keysize),
                }?;
                Ok(KeysizeGuess::new(keysize, distance))
            })
            .collect::<Result<Vec<_>>>()?;

        sort_by_distance(&mut guesses);
        tracing::trace!(
            heuristic = ?self.heuristic,
            best = ?guesses.first().map(KeysizeGuess::keysize),
            "ranked keysizes"
        );
        Ok(guesses)
    }
}

fn check_bounds(ciphertext: &[u8], min_size: usize, max_size: usize, blocks: usize) -> Result<()> {
    if ciphertext.is_empty() {
        return Err(Error::EmptyInput);
    }
    if min_size == 0 || min_size > max_size {
        return Err(Error::InvalidConfig(format!(
            "keysize range {}..={} is empty or starts at zero",
            min_size, max_size
        )));
    }
    let needed = max_size.checked_mul(blocks).ok_or(Error::OutOfBounds {
        keysize: max_size,
        needed: usize::MAX,
        available: ciphertext.len(),
    })?;
    if needed > ciphertext.len() {
        return Err(Error::OutOfBounds {
            keysize: max_size,
            needed,
            available: ciphertext.len(),
        });
    }
    Ok(())
}

fn block(ciphertext: &[u8], keysize: usize, index: usize) -> &[u8] {
    &ciphertext[index * keysize..(index + 1) * keysize]
}

fn two_block_hamming(ciphertext: &[u8], keysize: usize) -> Result<f64> {
    let bits = hamming_distance(block(ciphertext, keysize, 0), block(ciphertext, keysize, 1))?;
    Ok(f64::from(bits) / keysize as f64)
}

fn four_block_hamming(ciphertext: &[u8], keysize: usize) -> Result<f64> {
    let first = hamming_distance(block(ciphertext, keysize, 0), block(ciphertext, keysize, 1))?;
    let second = hamming_distance(block(ciphertext, keysize, 2), block(ciphertext, keysize, 3))?;
    Ok(f64::from(first + second) / (2 * keysize) as f64)
}

fn two_block_xor_sum(ciphertext: &[u8], keysize: usize) -> Result<f64> {
    let sum = xor_sum_distance(block(ciphertext, keysize, 0), block(ciphertext, keysize, 1))?;
    Ok(sum as f64 / keysize as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repeating_xor;

    const WASTE_LAND: &[u8] = b"April is the cruelest month, breeding\nLilacs out of the dead land, mixing\nMemory and desire, stirring\n Dull roots with spring rain.\nWinter kept us warm, covering\nEarth in forgetful snow, feeding\nA little life with dried tubers.";

    #[test]
    fn test_two_block_ranks_true_keysize() {
        let ciphertext = repeating_xor(WASTE_LAND, b"TSELIOT").unwrap();
        let ranked = KeysizeEstimator::default().estimate(&ciphertext, 2, 40).unwrap();

        assert_eq!(ranked.len(), 39);
        assert_eq!(ranked[0].keysize(), 7);
        assert!(ranked.windows(2).all(|w| w[0].distance() <= w[1].distance()));
        assert!(ranked.iter().all(|g| (2..=40).contains(&g.keysize())));
    }

    #[test]
    fn test_four_block_keeps_true_keysize_near_top() {
        let ciphertext = repeating_xor(WASTE_LAND, b"TSELIOT").unwrap();
        let ranked = KeysizeEstimator::new(KeysizeHeuristic::FourBlock)
            .estimate(&ciphertext, 2, 40)
            .unwrap();
        assert!(ranked.iter().take(3).any(|g| g.keysize() == 7));
    }

    #[test]
    fn test_normalized_distance() {
        // "this is a test" / "wokka wokka!!!" differ in 37 bits over 14 bytes
        let ciphertext = b"this is a testwokka wokka!!!";
        let ranked = KeysizeEstimator::default().estimate(ciphertext, 14, 14).unwrap();
        assert_eq!(ranked, vec![KeysizeGuess::new(14, 37.0 / 14.0)]);
    }

    #[test]
    fn test_out_of_bounds() {
        let err = KeysizeEstimator::default().estimate(&[0u8; 79], 2, 40).unwrap_err();
        assert_eq!(
            err,
            Error::OutOfBounds {
                keysize: 40,
                needed: 80,
                available: 79
            }
        );
        assert!(KeysizeEstimator::default().estimate(&[0u8; 80], 2, 40).is_ok());

        let four = KeysizeEstimator::new(KeysizeHeuristic::FourBlock);
        assert!(matches!(four.estimate(&[0u8; 80], 2, 40), Err(Error::OutOfBounds { .. })));
    }

    #[test]
    fn test_empty_and_bad_range() {
        let estimator = KeysizeEstimator::default();
        assert_eq!(estimator.estimate(b"", 2, 4), Err(Error::EmptyInput));
        assert!(matches!(estimator.estimate(b"abcdefgh", 0, 4), Err(Error::InvalidConfig(_))));
        assert!(matches!(estimator.estimate(b"abcdefgh", 3, 2), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_xor_sum_heuristic() {
        let ranked = KeysizeEstimator::new(KeysizeHeuristic::XorSum)
            .estimate(b"ABAB", 1, 2)
            .unwrap();
        // keysize 2 compares "AB" with "AB": distance zero
        assert_eq!(ranked[0], KeysizeGuess::new(2, 0.0));
        assert_eq!(ranked[1], KeysizeGuess::new(1, 3.0));
    }
}
