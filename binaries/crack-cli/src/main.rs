//! crack
//!
//! Command-line driver for the classical-cipher breakers in `crack-core`.
//! Decodes hex/base64 input, loads search configuration and prints ranked
//! guesses as tables or JSON. Logs go to stderr (`RUST_LOG`, `-v`).

mod codec;
mod config;
mod report;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crack_core::{
    fixed_xor, hamming_distance, repeating_xor, rotate, CaesarBreaker, FrequencyModel, KeyAlphabet,
    KeysizeEstimator, RepeatingXorBreaker, SingleByteXor, VigenereBreaker, VigenereTableau,
};

use codec::{letters, parse_lines, Encoding, Input};
use config::{AppConfig, XorOverrides};
use report::Reporter;

#[derive(Parser)]
#[command(name = "crack")]
#[command(about = "Statistical key recovery for XOR, Caesar and Vigenère ciphertexts")]
#[command(version)]
struct Cli {
    /// Config file (YAML or JSON); defaults to <config dir>/crack/config.yaml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// XOR two equal-length hex buffers
    FixedXor {
        /// First buffer (hex)
        a: String,
        /// Second buffer (hex)
        b: String,
    },

    /// Bit-level Hamming distance of two equal-length strings
    Hamming { a: String, b: String },

    /// Encrypt with repeating-key XOR; prints hex
    RepeatingXor {
        #[arg(short, long)]
        key: String,

        #[command(flatten)]
        input: Input,
    },

    /// Rank every single-byte XOR key (input defaults to hex)
    SingleByte {
        #[command(flatten)]
        input: Input,

        /// Guesses to print
        #[arg(long, default_value = "5")]
        top: usize,

        /// Only try key bytes '0'..='z'
        #[arg(long)]
        printable: bool,
    },

    /// Find the single-byte XOR ciphertext among many, one per line
    Detect {
        file: PathBuf,

        #[arg(short, long, value_enum, default_value = "hex")]
        encoding: Encoding,
    },

    /// Rank repeating-key lengths (input defaults to base64)
    Keysize {
        #[command(flatten)]
        input: Input,

        #[command(flatten)]
        overrides: XorOverrides,
    },

    /// Break repeating-key XOR (input defaults to base64)
    BreakXor {
        #[command(flatten)]
        input: Input,

        #[command(flatten)]
        overrides: XorOverrides,
    },

    /// Caesar rotation and breaking
    Caesar {
        #[command(subcommand)]
        command: CaesarCommands,
    },

    /// Vigenère encryption, decryption and breaking
    Vigenere {
        #[command(subcommand)]
        command: VigenereCommands,
    },

    /// Print the Vigenère tableau
    Tableau,

    /// Symbol counts and English score of a text
    Frequency {
        #[command(flatten)]
        input: Input,
    },
}

#[derive(Subcommand)]
enum CaesarCommands {
    /// Rotate letters by an amount (negative rotates backward)
    Rotate {
        text: String,

        #[arg(allow_hyphen_values = true)]
        amount: i32,
    },

    /// Rank all 26 shifts
    Break {
        text: String,

        #[arg(long, default_value = "3")]
        top: usize,
    },
}

#[derive(Subcommand)]
enum VigenereCommands {
    Encrypt {
        #[arg(short, long)]
        key: String,
        text: String,
    },

    Decrypt {
        #[arg(short, long)]
        key: String,
        text: String,
    },

    /// Recover the key of a Vigenère ciphertext
    Break {
        #[command(flatten)]
        input: Input,

        /// Also print the candidate key of every retained keysize
        #[arg(long)]
        candidates: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Commands::Keysize { overrides, .. } | Commands::BreakXor { overrides, .. } = &cli.command {
        overrides.apply(&mut config.xor);
    }
    config.validate()?;

    let reporter = Reporter::new(cli.json);
    run(cli.command, &config, reporter)
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "crack_core=debug,crack=debug"
    } else {
        "crack_core=info,crack=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(command: Commands, config: &AppConfig, reporter: Reporter) -> Result<()> {
    match command {
        Commands::FixedXor { a, b } => {
            let a = Encoding::Hex.decode(&a)?;
            let b = Encoding::Hex.decode(&b)?;
            reporter.value("xor", hex::encode(fixed_xor(&a, &b)?))
        }

        Commands::Hamming { a, b } => {
            reporter.value("distance", hamming_distance(a.as_bytes(), b.as_bytes())?)
        }

        Commands::RepeatingXor { key, input } => {
            let plaintext = input.read(Encoding::Raw)?;
            reporter.value("ciphertext", hex::encode(repeating_xor(&plaintext, key.as_bytes())?))
        }

        Commands::SingleByte {
            input,
            top,
            printable,
        } => {
            let ciphertext = input.read(Encoding::Hex)?;
            let alphabet = if printable {
                KeyAlphabet::Printable
            } else {
                config.xor.key_alphabet
            };
            let guesses = SingleByteXor::new(alphabet).break_ciphertext(&ciphertext)?;
            reporter.guesses("SINGLE-BYTE XOR", &guesses[..top.min(guesses.len())])
        }

        Commands::Detect { file, encoding } => {
            let contents = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let lines = parse_lines(&contents, encoding)?;
            tracing::info!(lines = lines.len(), "scanning ciphertexts");
            let (index, guess) = SingleByteXor::new(config.xor.key_alphabet)
                .detect(lines.iter().map(Vec::as_slice))?;
            reporter.detection(index, &guess)
        }

        Commands::Keysize { input, .. } => {
            let ciphertext = input.read(Encoding::Base64)?;
            let ranked = KeysizeEstimator::new(config.xor.heuristic).estimate(
                &ciphertext,
                config.xor.min_keysize,
                config.xor.max_keysize,
            )?;
            reporter.keysizes(&ranked)
        }

        Commands::BreakXor { input, .. } => {
            let ciphertext = input.read(Encoding::Base64)?;
            tracing::info!(bytes = ciphertext.len(), "breaking repeating-key XOR");
            let guess = RepeatingXorBreaker::new(config.xor.clone())?.break_ciphertext(&ciphertext)?;
            reporter.guess("REPEATING-KEY XOR BROKEN", &guess)
        }

        Commands::Caesar { command } => match command {
            CaesarCommands::Rotate { text, amount } => {
                let rotated = rotate(&letters(text.as_bytes()), amount)?;
                reporter.value("text", String::from_utf8_lossy(&rotated))
            }
            CaesarCommands::Break { text, top } => {
                let guesses = CaesarBreaker::default().break_ciphertext(&letters(text.as_bytes()))?;
                reporter.guesses("CAESAR", &guesses[..top.min(guesses.len())])
            }
        },

        Commands::Vigenere { command } => match command {
            VigenereCommands::Encrypt { key, text } => {
                let ciphertext = VigenereTableau::global()
                    .encrypt(&letters(text.as_bytes()), &letters(key.as_bytes()))?;
                reporter.value("ciphertext", String::from_utf8_lossy(&ciphertext))
            }
            VigenereCommands::Decrypt { key, text } => {
                let plaintext = VigenereTableau::global()
                    .decrypt(&letters(text.as_bytes()), &letters(key.as_bytes()))?;
                reporter.value("plaintext", String::from_utf8_lossy(&plaintext))
            }
            VigenereCommands::Break { input, candidates } => {
                let ciphertext = letters(&input.read(Encoding::Raw)?);
                let breaker = VigenereBreaker::new(config.vigenere.clone())?;
                let keys = breaker.candidate_keys(&ciphertext)?;
                let best = breaker.break_ciphertext(&ciphertext)?;
                reporter.vigenere(&keys, &best, candidates)
            }
        },

        Commands::Tableau => {
            print!("{}", VigenereTableau::global());
            Ok(())
        }

        Commands::Frequency { input } => {
            let text = input.read(Encoding::Raw)?;
            let model = FrequencyModel::english();
            reporter.frequency(&model.frequency_count(&text), model.score(&text))
        }
    }
}
