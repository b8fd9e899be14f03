//! Column transposition
//!
//! Bucket `i` holds every byte whose position is `i` modulo the keysize, so
//! each bucket was enciphered with a single key byte.

use crate::{Error, Result};

/// Split `ciphertext` into `keysize` column buckets. Buckets may be ragged.
pub fn transpose(ciphertext: &[u8], keysize: usize) -> Result<Vec<Vec<u8>>> {
    if keysize == 0 {
        return Err(Error::InvalidKey("keysize must be at least 1".into()));
    }
    if ciphertext.is_empty() {
        return Err(Error::EmptyInput);
    }

    Ok((0..keysize)
        .map(|column| {
            ciphertext
                .iter()
                .skip(column)
                .step_by(keysize)
                .copied()
                .collect()
        })
        .collect())
}
