//! Single-byte XOR key recovery
//!
//! Every key byte of the configured alphabet is tried and the resulting
//! plaintext scored with the frequency model.

use rayon::prelude::*;

use crate::config::KeyAlphabet;
use crate::english::FrequencyModel;
use crate::guess::sort_by_score;
use crate::xor::{fixed_xor, repeated_bytes};
use crate::{Error, Guess, Result};

/// Exhaustive single-byte XOR breaker.
#[derive(Debug, Clone, Copy)]
pub struct SingleByteXor<'m> {
    model: &'m FrequencyModel,
    alphabet: KeyAlphabet,
}

impl SingleByteXor<'static> {
    /// Breaker scoring against the English model.
    pub fn new(alphabet: KeyAlphabet) -> Self {
        Self::with_model(FrequencyModel::english(), alphabet)
    }
}

impl Default for SingleByteXor<'static> {
    fn default() -> Self {
        Self::new(KeyAlphabet::Full)
    }
}

impl<'m> SingleByteXor<'m> {
    pub fn with_model(model: &'m FrequencyModel, alphabet: KeyAlphabet) -> Self {
        Self { model, alphabet }
    }

    pub fn alphabet(&self) -> KeyAlphabet {
        self.alphabet
    }

    /// One guess per key byte of the alphabet, ascending by score.
    pub fn break_ciphertext(&self, ciphertext: &[u8]) -> Result<Vec<Guess>> {
        if ciphertext.is_empty() {
            return Err(Error::EmptyInput);
        }
        self.alphabet.validate()?;

        let mut guesses = self
            .alphabet
            .candidates()
            .into_par_iter()
            .map(|key| -> Result<Guess> {
                let plaintext = fixed_xor(ciphertext, &repeated_bytes(key, ciphertext.len()))?;
                let score = self.model.score(&plaintext);
                Ok(Guess::new(vec![key], score, plaintext))
            })
            .collect::<Result<Vec<_>>>()?;

        sort_by_score(&mut guesses);
        Ok(guesses)
    }

    /// The `count` lowest-scoring key bytes, best first.
    pub fn top_keys(&self, ciphertext: &[u8], count: usize) -> Result<Vec<u8>> {
        Ok(self
            .break_ciphertext(ciphertext)?
            .iter()
            .take(count)
            .map(|guess| guess.key()[0])
            .collect())
    }

    /// The lowest-scoring guess for `ciphertext`.
    pub fn best(&self, ciphertext: &[u8]) -> Result<Guess> {
        self.break_ciphertext(ciphertext)?
            .into_iter()
            .next()
            .ok_or(Error::EmptyInput)
    }

    /// Finds which of many ciphertexts was single-byte XOR enciphered.
    ///
    /// Returns the index of the winning ciphertext and its best guess; on equal
    /// scores the earlier ciphertext wins.
    pub fn detect<'c, I>(&self, ciphertexts: I) -> Result<(usize, Guess)>
    where
        I: IntoIterator<Item = &'c [u8]>,
    {
        let mut winner: Option<(usize, Guess)> = None;
        for (index, ciphertext) in ciphertexts.into_iter().enumerate() {
            let guess = self.best(ciphertext)?;
            let better = winner
                .as_ref()
                .map_or(true, |(_, current)| guess.score() < current.score());
            if better {
                winner = Some((index, guess));
            }
        }

        let (index, guess) = winner.ok_or(Error::EmptyInput)?;
        tracing::debug!(index, key = ?guess.key(), score = guess.score(), "detected single-byte XOR");
        Ok((index, guess))
    }

    /// Known-plaintext search: the first key byte of the alphabet under which
    /// `plaintext` appears contiguously in `ciphertext`.
    pub fn find_key(&self, plaintext: &[u8], ciphertext: &[u8]) -> Result<Option<u8>> {
        if plaintext.is_empty() || ciphertext.is_empty() {
            return Err(Error::EmptyInput);
        }
        if plaintext.len() > ciphertext.len() {
            return Ok(None);
        }

        for key in self.alphabet.candidates() {
            let enciphered = fixed_xor(plaintext, &repeated_bytes(key, plaintext.len()))?;
            if ciphertext.windows(enciphered.len()).any(|window| window == enciphered) {
                return Ok(Some(key));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{RngCore, SeedableRng};

    const BACON: &[u8] = b"Cooking MC's like a pound of bacon";

    fn encipher(plaintext: &[u8], key: u8) -> Vec<u8> {
        plaintext.iter().map(|b| b ^ key).collect()
    }

    #[test]
    fn test_recovers_key_88() {
        let ciphertext = encipher(BACON, 88);
        let guesses = SingleByteXor::default().break_ciphertext(&ciphertext).unwrap();

        assert_eq!(guesses.len(), 256);
        assert_eq!(guesses[0].key(), &[88]);
        assert_eq!(guesses[0].plaintext(), BACON);
        assert!(guesses.windows(2).all(|w| w[0].score() <= w[1].score()));
    }

    #[test]
    fn test_printable_alphabet() {
        let ciphertext = encipher(BACON, 88);
        let breaker = SingleByteXor::new(KeyAlphabet::Printable);
        let guesses = breaker.break_ciphertext(&ciphertext).unwrap();

        assert_eq!(guesses.len(), 75);
        assert_eq!(guesses[0].key_lossy(), "X");
        assert_eq!(breaker.top_keys(&ciphertext, 1).unwrap(), vec![88]);
    }

    #[test]
    fn test_empty_ciphertext() {
        assert_eq!(SingleByteXor::default().break_ciphertext(b""), Err(Error::EmptyInput));
    }

    #[test]
    fn test_detect_among_noise() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut lines: Vec<Vec<u8>> = (0..40)
            .map(|_| {
                let mut line = vec![0u8; 30];
                rng.fill_bytes(&mut line);
                line
            })
            .collect();
        let plaintext = b"Now that the party is jumping\n";
        lines.insert(17, encipher(plaintext, b'5'));

        let (index, guess) = SingleByteXor::default()
            .detect(lines.iter().map(Vec::as_slice))
            .unwrap();
        assert_eq!(index, 17);
        assert_eq!(guess.key(), b"5");
        assert_eq!(guess.plaintext(), plaintext);
    }

    #[test]
    fn test_detect_nothing() {
        let none: Vec<&[u8]> = Vec::new();
        assert_eq!(SingleByteXor::default().detect(none), Err(Error::EmptyInput));
    }

    #[test]
    fn test_find_key() {
        let breaker = SingleByteXor::default();
        let mut ciphertext = vec![0xAA, 0xBB];
        ciphertext.extend(encipher(BACON, 88));
        assert_eq!(breaker.find_key(BACON, &ciphertext).unwrap(), Some(88));
        assert_eq!(breaker.find_key(BACON, &ciphertext[..10]).unwrap(), None);

        let narrow = SingleByteXor::new(KeyAlphabet::Range { start: 0, end: 80 });
        assert_eq!(narrow.find_key(BACON, &ciphertext).unwrap(), None);
    }
}
