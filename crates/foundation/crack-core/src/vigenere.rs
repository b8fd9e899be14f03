//! Vigenère Breaker
//!
//! The alphabetic counterpart of the repeating-key XOR breaker. Every column of
//! a retained keysize is solved as a Caesar cipher, keeping only the best shift,
//! so each keysize yields exactly one candidate key. Candidate keys are then
//! ranked by the score of the full decryption.

use rayon::prelude::*;

use crate::caesar::CaesarBreaker;
use crate::config::VigenereConfig;
use crate::english::FrequencyModel;
use crate::guess::{minimal_period, sort_by_score};
use crate::keysize::KeysizeEstimator;
use crate::tableau::VigenereTableau;
use crate::transpose::transpose;
use crate::{Error, Guess, Result};

#[derive(Debug, Clone)]
pub struct VigenereBreaker<'t, 'm> {
    config: VigenereConfig,
    tableau: &'t VigenereTableau,
    model: &'m FrequencyModel,
}

impl VigenereBreaker<'static, 'static> {
    pub fn new(config: VigenereConfig) -> Result<Self> {
        Self::with_parts(config, VigenereTableau::global(), FrequencyModel::english())
    }
}

impl Default for VigenereBreaker<'static, 'static> {
    fn default() -> Self {
        Self {
            config: VigenereConfig::default(),
            tableau: VigenereTableau::global(),
            model: FrequencyModel::english(),
        }
    }
}

impl<'t, 'm> VigenereBreaker<'t, 'm> {
    pub fn with_parts(
        config: VigenereConfig,
        tableau: &'t VigenereTableau,
        model: &'m FrequencyModel,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            tableau,
            model,
        })
    }

    pub fn config(&self) -> &VigenereConfig {
        &self.config
    }

    /// One key per retained keysize, in keysize-ranking order, each collapsed
    /// to its minimal period. Intended for manual inspection.
    pub fn candidate_keys(&self, ciphertext: &[u8]) -> Result<Vec<Vec<u8>>> {
        check_alphabet(ciphertext)?;

        let ranked = KeysizeEstimator::new(self.config.heuristic).estimate(
            ciphertext,
            self.config.min_keysize,
            self.config.max_keysize,
        )?;
        let caesar = CaesarBreaker::new(self.tableau, self.model);

        ranked
            .iter()
            .take(self.config.top_keysizes)
            .map(|guess| -> Result<Vec<u8>> {
                let columns = transpose(ciphertext, guess.keysize())?;
                let key = columns
                    .par_iter()
                    .map(|column| -> Result<u8> { Ok(caesar.best(column)?.key()[0]) })
                    .collect::<Result<Vec<u8>>>()?;
                tracing::trace!(keysize = guess.keysize(), key = %String::from_utf8_lossy(&key), "column shifts");
                Ok(minimal_period(&key).to_vec())
            })
            .collect()
    }

    /// Full decryptions under every candidate key, ascending by score.
    /// Keysizes that collapse to the same key appear once.
    pub fn rank(&self, ciphertext: &[u8]) -> Result<Vec<Guess>> {
        let mut keys = self.candidate_keys(ciphertext)?;
        let mut seen = Vec::with_capacity(keys.len());
        keys.retain(|key| {
            if seen.contains(key) {
                false
            } else {
                seen.push(key.clone());
                true
            }
        });

        let mut guesses = keys
            .into_iter()
            .map(|key| -> Result<Guess> {
                let plaintext = self.tableau.decrypt(ciphertext, &key)?;
                let score = self.model.score(&plaintext);
                Ok(Guess::new(key, score, plaintext))
            })
            .collect::<Result<Vec<_>>>()?;

        sort_by_score(&mut guesses);
        Ok(guesses)
    }

    pub fn break_ciphertext(&self, ciphertext: &[u8]) -> Result<Guess> {
        let best = self
            .rank(ciphertext)?
            .into_iter()
            .next()
            .ok_or(Error::EmptyInput)?;
        tracing::debug!(key = %best.key_lossy(), score = best.score(), "Vigenère broken");
        Ok(best)
    }
}

fn check_alphabet(ciphertext: &[u8]) -> Result<()> {
    if ciphertext.is_empty() {
        return Err(Error::EmptyInput);
    }
    match ciphertext.iter().position(|b| !b.is_ascii_uppercase()) {
        Some(position) => Err(Error::InvalidAlphabet {
            byte: ciphertext[position],
            position,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KeysizeHeuristic;

    const DICKENS: &[u8] = b"ITWASTHEBESTOFTIMESITWASTHEWORSTOFTIMESITWASTHEAGEOFWISDOMITWASTHEAGEOFFOOLISHNESSITWASTHEEPOCHOFBELIEFITWASTHEEPOCHOFINCREDULITYITWASTHESEASONOFLIGHTITWASTHESEASONOFDARKNESSITWASTHESPRINGOFHOPEITWASTHEWINTEROFDESPAIRWEHADEVERYTHINGBEFOREUSWEHADNOTHINGBEFOREUSWEWEREALLGOINGDIRECTTOHEAVENWEWEREALLGOINGDIRECTTHEOTHERWAY";

    fn encipher(key: &[u8]) -> Vec<u8> {
        VigenereTableau::global().encrypt(DICKENS, key).unwrap()
    }

    #[test]
    fn test_recovers_keys() {
        let breaker = VigenereBreaker::default();
        for key in [&b"LEMON"[..], &b"CIPHERS"[..], &b"RELATIONS"[..], &b"KEY"[..]] {
            let guess = breaker.break_ciphertext(&encipher(key)).unwrap();
            assert_eq!(guess.key(), key);
            assert_eq!(guess.plaintext(), DICKENS);
        }
    }

    #[test]
    fn test_candidate_keys_per_keysize() {
        let keys = VigenereBreaker::default().candidate_keys(&encipher(b"LEMON")).unwrap();
        assert!(!keys.is_empty() && keys.len() <= 3);
        assert!(keys.iter().any(|key| key.as_slice() == b"LEMON"));
    }

    #[test]
    fn test_rank_is_sorted_and_unique() {
        let guesses = VigenereBreaker::default().rank(&encipher(b"CIPHERS")).unwrap();
        assert!(guesses.windows(2).all(|w| w[0].score() <= w[1].score()));
        for (i, a) in guesses.iter().enumerate() {
            assert!(guesses[i + 1..].iter().all(|b| b.key() != a.key()));
        }
    }

    #[test]
    fn test_xor_sum_heuristic() {
        let config = VigenereConfig {
            heuristic: KeysizeHeuristic::XorSum,
            ..Default::default()
        };
        let guess = VigenereBreaker::new(config)
            .unwrap()
            .break_ciphertext(&encipher(b"LEMON"))
            .unwrap();
        assert_eq!(guess.key(), b"LEMON");
    }

    #[test]
    fn test_rejects_bad_input() {
        let breaker = VigenereBreaker::default();
        assert_eq!(breaker.break_ciphertext(b""), Err(Error::EmptyInput));
        assert_eq!(
            breaker.candidate_keys(b"ABCD EFGH"),
            Err(Error::InvalidAlphabet { byte: b' ', position: 4 })
        );
        assert!(matches!(breaker.rank(b"ABCDEF"), Err(Error::OutOfBounds { .. })));

        let config = VigenereConfig {
            top_keysizes: 0,
            ..Default::default()
        };
        assert!(matches!(VigenereBreaker::new(config), Err(Error::InvalidConfig(_))));
    }
}
