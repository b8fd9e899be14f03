//! Ranked results produced by the breakers and the keysize estimator.

use serde::Serialize;
use std::borrow::Cow;

/// A candidate decryption. Lower scores are more English-like.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Guess {
    key: Vec<u8>,
    score: f64,
    plaintext: Vec<u8>,
}

impl Guess {
    pub fn new(key: Vec<u8>, score: f64, plaintext: Vec<u8>) -> Self {
        Self {
            key,
            score,
            plaintext,
        }
    }

    pub fn key(&self) -> &[u8] {
        &self.key
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn plaintext(&self) -> &[u8] {
        &self.plaintext
    }

    pub fn key_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.key)
    }

    pub fn plaintext_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.plaintext)
    }

    pub fn into_plaintext(self) -> Vec<u8> {
        self.plaintext
    }
}

/// A candidate key length and its normalized block distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KeysizeGuess {
    keysize: usize,
    distance: f64,
}

impl KeysizeGuess {
    pub fn new(keysize: usize, distance: f64) -> Self {
        Self { keysize, distance }
    }

    pub fn keysize(&self) -> usize {
        self.keysize
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }
}

/// Stable ascending sort by score; equal scores keep their input order.
pub(crate) fn sort_by_score(guesses: &mut [Guess]) {
    guesses.sort_by(|a, b| a.score.total_cmp(&b.score));
}

/// Stable ascending sort by distance.
pub(crate) fn sort_by_distance(guesses: &mut [KeysizeGuess]) {
    guesses.sort_by(|a, b| a.distance.total_cmp(&b.distance));
}

/// Shortest prefix of `key` whose repetition reproduces `key`.
pub(crate) fn minimal_period(key: &[u8]) -> &[u8] {
    let len = key.len();
    (1..len)
        .filter(|period| len % period == 0)
        .find(|&period| key.chunks(period).all(|chunk| chunk == &key[..period]))
        .map_or(key, |period| &key[..period])
}
