//! Repeating-Key XOR Breaker
//!
//! Bounded beam search over a factored key space:
//!
//! 1. rank keysizes with the [`KeysizeEstimator`] and keep the top few
//! 2. transpose the ciphertext into one column per key position
//! 3. keep the best few single-byte keys of every column
//! 4. score every key of the Cartesian product of those column candidates
//!
//! The per-column width shrinks at long keysizes so that no keysize scores more
//! than `max_candidates` keys.

use rayon::prelude::*;

use crate::config::XorSearchConfig;
use crate::english::FrequencyModel;
use crate::guess::minimal_period;
use crate::keysize::KeysizeEstimator;
use crate::product::cartesian_product;
use crate::single_byte::SingleByteXor;
use crate::transpose::transpose;
use crate::xor::repeating_xor;
use crate::{Error, Guess, Result};

#[derive(Debug, Clone)]
pub struct RepeatingXorBreaker<'m> {
    config: XorSearchConfig,
    model: &'m FrequencyModel,
}

impl RepeatingXorBreaker<'static> {
    /// Breaker scoring against the English model. Fails on invalid config.
    pub fn new(config: XorSearchConfig) -> Result<Self> {
        Self::with_model(config, FrequencyModel::english())
    }
}

impl Default for RepeatingXorBreaker<'static> {
    fn default() -> Self {
        Self {
            config: XorSearchConfig::default(),
            model: FrequencyModel::english(),
        }
    }
}

impl<'m> RepeatingXorBreaker<'m> {
    pub fn with_model(config: XorSearchConfig, model: &'m FrequencyModel) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, model })
    }

    pub fn config(&self) -> &XorSearchConfig {
        &self.config
    }

    /// Best guess across the top-ranked keysizes.
    ///
    /// Keysizes are visited in estimator order and a later keysize only wins
    /// with a strictly lower score.
    pub fn break_ciphertext(&self, ciphertext: &[u8]) -> Result<Guess> {
        let ranked = KeysizeEstimator::new(self.config.heuristic).estimate(
            ciphertext,
            self.config.min_keysize,
            self.config.max_keysize,
        )?;
        let keysizes: Vec<usize> = ranked
            .iter()
            .take(self.config.top_keysizes)
            .map(|guess| guess.keysize())
            .collect();
        tracing::debug!(?keysizes, "retained keysizes");

        let mut best: Option<Guess> = None;
        for keysize in keysizes {
            let guess = self.break_with_keysize(ciphertext, keysize)?;
            if best.as_ref().map_or(true, |current| guess.score() < current.score()) {
                best = Some(guess);
            }
        }

        let best = best.ok_or(Error::EmptyInput)?;
        tracing::debug!(key = %best.key_lossy(), score = best.score(), "repeating-key XOR broken");
        Ok(best)
    }

    /// Best guess assuming the key is exactly `keysize` bytes long. The
    /// reported key is collapsed to its minimal period.
    pub fn break_with_keysize(&self, ciphertext: &[u8], keysize: usize) -> Result<Guess> {
        if ciphertext.is_empty() {
            return Err(Error::EmptyInput);
        }
        if keysize > ciphertext.len() {
            return Err(Error::OutOfBounds {
                keysize,
                needed: keysize,
                available: ciphertext.len(),
            });
        }

        let width = self.config.beam_width(keysize);
        let columns = transpose(ciphertext, keysize)?;
        let single = SingleByteXor::with_model(self.model, self.config.key_alphabet);
        let candidates = columns
            .par_iter()
            .map(|column| single.top_keys(column, width))
            .collect::<Result<Vec<_>>>()?;

        let keys = cartesian_product(&candidates);
        tracing::debug!(keysize, width, keys = keys.len(), "scoring candidate keys");

        let scores = keys
            .par_iter()
            .map(|key| -> Result<f64> {
                let plaintext = repeating_xor(ciphertext, key)?;
                Ok(self.model.score(&plaintext))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut winner: Option<(usize, f64)> = None;
        for (index, &score) in scores.iter().enumerate() {
            if winner.map_or(true, |(_, current)| score < current) {
                winner = Some((index, score));
            }
        }
        let (index, score) = winner.ok_or(Error::EmptyInput)?;

        let key = &keys[index];
        let plaintext = repeating_xor(ciphertext, key)?;
        tracing::trace!(keysize, key = ?key, score, "best key for keysize");
        Ok(Guess::new(minimal_period(key).to_vec(), score, plaintext))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KeyAlphabet;

    const WASTE_LAND: &[u8] = b"April is the cruelest month, breeding\nLilacs out of the dead land, mixing\nMemory and desire, stirring\n Dull roots with spring rain.\nWinter kept us warm, covering\nEarth in forgetful snow, feeding\nA little life with dried tubers.";

    #[test]
    fn test_recovers_key_and_plaintext() {
        let ciphertext = repeating_xor(WASTE_LAND, b"TSELIOT").unwrap();
        let guess = RepeatingXorBreaker::default().break_ciphertext(&ciphertext).unwrap();

        assert_eq!(guess.key(), b"TSELIOT");
        assert_eq!(guess.plaintext(), WASTE_LAND);
    }

    #[test]
    fn test_printable_alphabet_recovers_key() {
        let ciphertext = repeating_xor(WASTE_LAND, b"TSELIOT").unwrap();
        let config = XorSearchConfig {
            key_alphabet: KeyAlphabet::Printable,
            ..Default::default()
        };
        let guess = RepeatingXorBreaker::new(config)
            .unwrap()
            .break_with_keysize(&ciphertext, 7)
            .unwrap();
        assert_eq!(guess.key(), b"TSELIOT");
    }

    #[test]
    fn test_short_ciphertext_is_out_of_bounds() {
        let ciphertext = repeating_xor(&WASTE_LAND[..50], b"TSELIOT").unwrap();
        let err = RepeatingXorBreaker::default().break_ciphertext(&ciphertext).unwrap_err();
        assert!(matches!(err, Error::OutOfBounds { keysize: 40, needed: 80, available: 50 }));

        let err = RepeatingXorBreaker::default().break_with_keysize(b"abc", 4).unwrap_err();
        assert!(matches!(err, Error::OutOfBounds { .. }));
    }

    #[test]
    fn test_empty_ciphertext() {
        let breaker = RepeatingXorBreaker::default();
        assert_eq!(breaker.break_ciphertext(b""), Err(Error::EmptyInput));
        assert_eq!(breaker.break_with_keysize(b"", 3), Err(Error::EmptyInput));
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = XorSearchConfig {
            candidates_per_column: 0,
            ..Default::default()
        };
        assert!(matches!(RepeatingXorBreaker::new(config), Err(Error::InvalidConfig(_))));
    }
}
