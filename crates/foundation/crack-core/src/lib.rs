//! Crack Core: statistical key recovery for classical ciphers
//!
//! Recovers plaintext and key material from single-byte XOR, repeating-key XOR
//! and alphabetic Vigenère/Caesar ciphertexts by scoring candidate plaintexts
//! against English symbol frequencies.
//!
//! ```text
//!   ciphertext ──► KEYSIZE ESTIMATOR ──► top-N keysizes
//!                                            │
//!                                            ▼
//!                                  COLUMN TRANSPOSER (one bucket per key byte)
//!                                            │
//!                          ┌─────────────────┴─────────────────┐
//!                          ▼                                   ▼
//!                 SINGLE-BYTE XOR BREAKER              CAESAR BREAKER
//!                 (top-c bytes per column)             (top-1 shift per column)
//!                          │                                   │
//!                          ▼                                   ▼
//!                 CARTESIAN PRODUCT (beam)            key = concatenated shifts
//!                          │                                   │
//!                          └──────────► FREQUENCY MODEL ◄──────┘
//!                                     (lowest score wins)
//! ```
//!
//! # Modules
//! - `english` - Reference frequencies and the chi-squared score
//! - `xor` - Fixed/repeating XOR and bit distances
//! - `single_byte` - Exhaustive single-byte XOR key search
//! - `keysize` - Keysize estimation heuristics
//! - `transpose` - Column buckets by key position
//! - `product` - Bounded Cartesian product of candidate buckets
//! - `repeating` - Repeating-key XOR orchestrator
//! - `tableau` - Vigenère tableau and codec
//! - `caesar` - Rotation and Caesar breaking
//! - `vigenere` - Vigenère orchestrator
//! - `config` - Search breadth and key alphabets
//!
//! Nothing here performs I/O or text-format conversion; inputs and outputs are
//! raw byte sequences and ranked guess lists.

pub mod caesar;
pub mod config;
pub mod english;
pub mod guess;
pub mod keysize;
pub mod product;
pub mod repeating;
pub mod single_byte;
pub mod tableau;
pub mod transpose;
pub mod vigenere;
pub mod xor;

pub use caesar::{modulus, rotate, CaesarBreaker};
pub use config::{KeyAlphabet, KeysizeHeuristic, VigenereConfig, XorSearchConfig, HARD_CANDIDATE_CEILING};
pub use english::{FrequencyModel, OUT_OF_ALPHABET_PENALTY};
pub use guess::{Guess, KeysizeGuess};
pub use keysize::KeysizeEstimator;
pub use product::{cartesian_product, product_len};
pub use repeating::RepeatingXorBreaker;
pub use single_byte::SingleByteXor;
pub use tableau::VigenereTableau;
pub use transpose::transpose;
pub use vigenere::VigenereBreaker;
pub use xor::{fixed_xor, hamming_distance, repeated_bytes, repeating_xor, xor_sum_distance};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("XOR operands differ in length: {left} != {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("Keysize {keysize} needs {needed} bytes of ciphertext, only {available} available")]
    OutOfBounds {
        keysize: usize,
        needed: usize,
        available: usize,
    },

    #[error("Byte {byte:#04x} at position {position} is outside the A-Z alphabet")]
    InvalidAlphabet { byte: u8, position: usize },

    #[error("Empty input")]
    EmptyInput,

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
