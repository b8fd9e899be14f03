//! Vigenère tableau and codec over uppercase A-Z.
//!
//! Row `r`, column `c` holds the letter `(r + c) mod 26`. The square is built
//! once into a process-wide static and shared read-only, but every breaker
//! takes the tableau it uses as an explicit reference.

use lazy_static::lazy_static;
use std::fmt;

use crate::{Error, Result};

const BASE: u8 = b'A';
const LETTERS: usize = 26;

lazy_static! {
    static ref TABLEAU: VigenereTableau = VigenereTableau::new();
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VigenereTableau {
    rows: [[u8; LETTERS]; LETTERS],
}

impl Default for VigenereTableau {
    fn default() -> Self {
        Self::new()
    }
}

impl VigenereTableau {
    /// Row 0 is A-Z; each later row is the previous one rotated left by one.
    pub fn new() -> Self {
        let mut rows = [[0u8; LETTERS]; LETTERS];
        for (col, cell) in rows[0].iter_mut().enumerate() {
            *cell = BASE + col as u8;
        }
        for row in 1..LETTERS {
            let mut next = rows[row - 1];
            next.rotate_left(1);
            rows[row] = next;
        }
        Self { rows }
    }

    pub fn global() -> &'static VigenereTableau {
        &TABLEAU
    }

    /// Letter at `[row][col]`, both given as letters.
    pub fn cell(&self, row: u8, col: u8) -> Result<u8> {
        let row = index(row, 0)?;
        let col = index(col, 0)?;
        Ok(self.rows[row][col])
    }

    pub fn encrypt(&self, plaintext: &[u8], key: &[u8]) -> Result<Vec<u8>> {
        let key = key_rows(key)?;
        plaintext
            .iter()
            .enumerate()
            .map(|(position, &letter)| -> Result<u8> {
                let col = index(letter, position)?;
                Ok(self.rows[key[position % key.len()]][col])
            })
            .collect()
    }

    /// Inverts [`encrypt`](Self::encrypt) by scanning the key row for each
    /// ciphertext letter.
    pub fn decrypt(&self, ciphertext: &[u8], key: &[u8]) -> Result<Vec<u8>> {
        let key = key_rows(key)?;
        ciphertext
            .iter()
            .enumerate()
            .map(|(position, &letter)| {
                let row = &self.rows[key[position % key.len()]];
                row.iter()
                    .position(|&cell| cell == letter)
                    .map(|col| BASE + col as u8)
                    .ok_or(Error::InvalidAlphabet {
                        byte: letter,
                        position,
                    })
            })
            .collect()
    }
}

impl fmt::Display for VigenereTableau {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            for (col, &cell) in row.iter().enumerate() {
                if col > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{}", cell as char)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn index(letter: u8, position: usize) -> Result<usize> {
    if letter.is_ascii_uppercase() {
        Ok(usize::from(letter - BASE))
    } else {
        Err(Error::InvalidAlphabet {
            byte: letter,
            position,
        })
    }
}

fn key_rows(key: &[u8]) -> Result<Vec<usize>> {
    if key.is_empty() {
        return Err(Error::InvalidKey("Vigenère key is empty".into()));
    }
    key.iter()
        .map(|&letter| {
            index(letter, 0).map_err(|_| {
                Error::InvalidKey(format!("key byte {:#04x} is outside A-Z", letter))
            })
        })
        .collect()
}
