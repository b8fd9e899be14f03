//! XOR Primitives
//!
//! Fixed XOR, repeating-key XOR and bit distances between equal-length buffers.

use crate::{Error, Result};

/// Byte-wise XOR of two equal-length buffers into a new buffer.
pub fn fixed_xor(a: &[u8], b: &[u8]) -> Result<Vec<u8>> {
    check_lengths(a, b)?;
    Ok(a.iter().zip(b).map(|(x, y)| x ^ y).collect())
}

/// `len` copies of `byte`.
pub fn repeated_bytes(byte: u8, len: usize) -> Vec<u8> {
    vec![byte; len]
}

/// XOR `data` against `key` repeated to the length of `data`.
pub fn repeating_xor(data: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    if key.is_empty() {
        return Err(Error::InvalidKey("repeating XOR key must be non-empty".into()));
    }
    Ok(data
        .iter()
        .zip(key.iter().cycle())
        .map(|(d, k)| d ^ k)
        .collect())
}

/// Number of differing bits between two equal-length buffers.
pub fn hamming_distance(a: &[u8], b: &[u8]) -> Result<u32> {
    check_lengths(a, b)?;
    Ok(a.iter().zip(b).map(|(x, y)| (x ^ y).count_ones()).sum())
}

/// Sum of the XORed byte values (not their popcount).
///
/// Weaker than [`hamming_distance`]; kept for the XOR-sum keysize heuristic.
pub fn xor_sum_distance(a: &[u8], b: &[u8]) -> Result<u64> {
    check_lengths(a, b)?;
    Ok(a.iter().zip(b).map(|(x, y)| u64::from(x ^ y)).sum())
}

fn check_lengths(a: &[u8], b: &[u8]) -> Result<()> {
    if a.len() != b.len() {
        return Err(Error::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    Ok(())
}
