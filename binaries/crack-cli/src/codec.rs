//! Ciphertext input: text encodings, argument/file sources and line splitting.

use anyhow::{bail, Context, Result};
use base64::Engine;
use clap::{Args, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Encoding {
    Hex,
    Base64,
    /// Bytes used as given
    Raw,
}

impl Encoding {
    pub fn decode(self, text: &str) -> Result<Vec<u8>> {
        match self {
            Encoding::Hex => hex::decode(text.trim()).context("invalid hex input"),
            Encoding::Base64 => {
                // wrapped base64 files carry newlines between chunks
                let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
                base64::engine::general_purpose::STANDARD
                    .decode(compact)
                    .context("invalid base64 input")
            }
            Encoding::Raw => Ok(text.as_bytes().to_vec()),
        }
    }

    pub fn encode(self, bytes: &[u8]) -> String {
        match self {
            Encoding::Hex => hex::encode(bytes),
            Encoding::Base64 => base64::engine::general_purpose::STANDARD.encode(bytes),
            Encoding::Raw => String::from_utf8_lossy(bytes).into_owned(),
        }
    }
}

/// Ciphertext given inline or read from a file.
#[derive(Debug, Clone, Args)]
pub struct Input {
    /// Input text (omit when using --file)
    pub text: Option<String>,

    /// Read the input from a file instead
    #[arg(short, long, conflicts_with = "text")]
    pub file: Option<PathBuf>,

    /// Input encoding [default depends on the command]
    #[arg(short, long, value_enum)]
    pub encoding: Option<Encoding>,
}

impl Input {
    pub fn read(&self, default: Encoding) -> Result<Vec<u8>> {
        let encoding = self.encoding.unwrap_or(default);
        let text = match (&self.text, &self.file) {
            (Some(text), _) => text.clone(),
            (None, Some(path)) => std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?,
            (None, None) => bail!("no input given: pass it inline or with --file"),
        };
        let bytes = encoding.decode(&text)?;
        if bytes.is_empty() {
            bail!("input is empty");
        }
        Ok(bytes)
    }
}

/// One ciphertext per non-blank line.
pub fn parse_lines(contents: &str, encoding: Encoding) -> Result<Vec<Vec<u8>>> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(number, line)| {
            encoding
                .decode(line.trim())
                .with_context(|| format!("line {}", number + 1))
        })
        .collect()
}

/// Upper-cases `bytes` and drops everything outside A-Z.
pub fn letters(bytes: &[u8]) -> Vec<u8> {
    bytes
        .iter()
        .map(u8::to_ascii_uppercase)
        .filter(u8::is_ascii_uppercase)
        .collect()
}
