//! Caesar rotation and exhaustive shift recovery.

use rayon::prelude::*;

use crate::english::FrequencyModel;
use crate::guess::sort_by_score;
use crate::tableau::VigenereTableau;
use crate::{Error, Guess, Result};

const LETTERS: i32 = 26;

/// Mathematical modulus: the result takes the sign of `m`, so
/// `modulus(-3, 26) == Some(23)`. `None` when `m` is zero.
pub fn modulus(a: i32, m: i32) -> Option<i32> {
    a.checked_rem_euclid(m)
}

/// Rotate every letter of `text` forward by `amount` positions (backward when
/// negative). Only uppercase A-Z is accepted.
pub fn rotate(text: &[u8], amount: i32) -> Result<Vec<u8>> {
    let shift = amount.rem_euclid(LETTERS) as u8;
    text.iter()
        .enumerate()
        .map(|(position, &letter)| {
            if letter.is_ascii_uppercase() {
                Ok(b'A' + (letter - b'A' + shift) % LETTERS as u8)
            } else {
                Err(Error::InvalidAlphabet {
                    byte: letter,
                    position,
                })
            }
        })
        .collect()
}

/// Tries all 26 shifts. A guess's key is the one-letter Vigenère key of the
/// shift (`"D"` for a rotation by 3); its plaintext is the ciphertext rotated
/// back by that shift.
#[derive(Debug, Clone, Copy)]
pub struct CaesarBreaker<'t, 'm> {
    tableau: &'t VigenereTableau,
    model: &'m FrequencyModel,
}

impl Default for CaesarBreaker<'static, 'static> {
    fn default() -> Self {
        Self::new(VigenereTableau::global(), FrequencyModel::english())
    }
}

impl<'t, 'm> CaesarBreaker<'t, 'm> {
    pub fn new(tableau: &'t VigenereTableau, model: &'m FrequencyModel) -> Self {
        Self { tableau, model }
    }

    /// One guess per shift, ascending by score.
    pub fn break_ciphertext(&self, ciphertext: &[u8]) -> Result<Vec<Guess>> {
        if ciphertext.is_empty() {
            return Err(Error::EmptyInput);
        }

        let mut guesses = (0..LETTERS as u8)
            .into_par_iter()
            .map(|shift| -> Result<Guess> {
                let key = vec![b'A' + shift];
                let plaintext = self.tableau.decrypt(ciphertext, &key)?;
                let score = self.model.score(&plaintext);
                Ok(Guess::new(key, score, plaintext))
            })
            .collect::<Result<Vec<_>>>()?;

        sort_by_score(&mut guesses);
        Ok(guesses)
    }

    pub fn best(&self, ciphertext: &[u8]) -> Result<Guess> {
        self.break_ciphertext(ciphertext)?
            .into_iter()
            .next()
            .ok_or(Error::EmptyInput)
    }
}
