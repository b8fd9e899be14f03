//! Presentation of guesses and keysize rankings, as text tables or JSON.

use anyhow::Result;
use crack_core::{Guess, KeysizeGuess};
use serde::Serialize;

/// A guess prepared for display: key and plaintext as printable text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GuessView {
    pub rank: usize,
    pub key: String,
    pub key_hex: String,
    pub score: f64,
    pub plaintext: String,
}

impl GuessView {
    pub fn new(rank: usize, guess: &Guess) -> Self {
        Self {
            rank,
            key: printable(guess.key()),
            key_hex: hex::encode(guess.key()),
            score: guess.score(),
            plaintext: printable(guess.plaintext()),
        }
    }
}

#[derive(Debug, Serialize)]
struct Detection {
    line: usize,
    guess: GuessView,
}

#[derive(Debug, Serialize)]
struct VigenereBreak {
    candidate_keys: Vec<String>,
    best: GuessView,
}

#[derive(Debug, Serialize)]
struct Frequency {
    counts: Vec<(String, usize)>,
    score: f64,
}

/// Writes results to stdout in the chosen format.
#[derive(Debug, Clone, Copy)]
pub struct Reporter {
    json: bool,
}

impl Reporter {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    /// A single labelled value such as a hex buffer or a distance.
    pub fn value<T: Serialize + std::fmt::Display>(&self, label: &str, value: T) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(&serde_json::json!({ label: value }))?);
        } else {
            println!("{}", value);
        }
        Ok(())
    }

    pub fn guesses(&self, title: &str, guesses: &[Guess]) -> Result<()> {
        let views: Vec<GuessView> = guesses
            .iter()
            .enumerate()
            .map(|(i, guess)| GuessView::new(i + 1, guess))
            .collect();
        if self.json {
            println!("{}", serde_json::to_string_pretty(&views)?);
            return Ok(());
        }

        println!("\n  {}", title);
        println!("  {}\n", "=".repeat(title.len()));
        println!("  {:>4}  {:<16} {:>10}  PLAINTEXT", "RANK", "KEY", "SCORE");
        for view in &views {
            println!(
                "  {:>4}  {:<16} {:>10.3}  {}",
                view.rank,
                truncate(&view.key, 16),
                view.score,
                truncate(&view.plaintext, 60)
            );
        }
        Ok(())
    }

    pub fn guess(&self, title: &str, guess: &Guess) -> Result<()> {
        let view = GuessView::new(1, guess);
        if self.json {
            println!("{}", serde_json::to_string_pretty(&view)?);
            return Ok(());
        }

        println!("\n  {}", title);
        println!("  {}\n", "=".repeat(title.len()));
        println!("  Key:   {} (hex {})", view.key, view.key_hex);
        println!("  Score: {:.3}\n", view.score);
        println!("{}", String::from_utf8_lossy(guess.plaintext()));
        Ok(())
    }

    pub fn detection(&self, index: usize, guess: &Guess) -> Result<()> {
        if self.json {
            let detection = Detection {
                line: index + 1,
                guess: GuessView::new(1, guess),
            };
            println!("{}", serde_json::to_string_pretty(&detection)?);
            return Ok(());
        }
        self.guess(&format!("SINGLE-BYTE XOR DETECTED (ciphertext {})", index + 1), guess)
    }

    pub fn keysizes(&self, ranked: &[KeysizeGuess]) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(ranked)?);
            return Ok(());
        }

        println!("\n  KEYSIZE RANKING");
        println!("  ===============\n");
        println!("  {:>7}  {:>8}", "KEYSIZE", "DISTANCE");
        for guess in ranked {
            println!("  {:>7}  {:>8.4}", guess.keysize(), guess.distance());
        }
        Ok(())
    }

    pub fn vigenere(&self, candidate_keys: &[Vec<u8>], best: &Guess, show_candidates: bool) -> Result<()> {
        if self.json {
            let report = VigenereBreak {
                candidate_keys: candidate_keys.iter().map(|key| printable(key)).collect(),
                best: GuessView::new(1, best),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
            return Ok(());
        }

        if show_candidates {
            println!("\n  CANDIDATE KEYS (by keysize rank)");
            for key in candidate_keys {
                println!("  - {}", String::from_utf8_lossy(key));
            }
        }
        self.guess("VIGENERE BROKEN", best)
    }

    pub fn frequency(&self, counts: &[(u8, usize)], score: f64) -> Result<()> {
        if self.json {
            let report = Frequency {
                counts: counts
                    .iter()
                    .map(|&(symbol, count)| ((symbol as char).to_string(), count))
                    .collect(),
                score,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
            return Ok(());
        }

        println!("\n  SYMBOL FREQUENCIES");
        println!("  ==================\n");
        for &(symbol, count) in counts.iter().filter(|(_, count)| *count > 0) {
            println!("  {:?}  {:>5}", symbol as char, count);
        }
        println!("\n  Score: {:.3}", score);
        Ok(())
    }
}

/// Lossy UTF-8 with control characters escaped.
fn printable(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .chars()
        .flat_map(|c| {
            if c.is_control() {
                c.escape_default().collect::<Vec<_>>()
            } else {
                vec![c]
            }
        })
        .collect()
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(width.saturating_sub(3)).collect();
        cut.push_str("...");
        cut
    }
}
