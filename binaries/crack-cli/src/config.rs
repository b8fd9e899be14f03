//! Application configuration: file loading and command-line overrides.

use anyhow::{bail, Context, Result};
use clap::Args;
use crack_core::{VigenereConfig, XorSearchConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub xor: XorSearchConfig,
    pub vigenere: VigenereConfig,
}

impl AppConfig {
    /// `<config_dir>/crack/config.yaml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("crack").join("config.yaml"))
    }

    /// Loads `path` when given, else the default path if that file exists,
    /// else the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&contents)
                .with_context(|| format!("invalid YAML in {}", path.display()))?,
            Some("json") => serde_json::from_str(&contents)
                .with_context(|| format!("invalid JSON in {}", path.display()))?,
            _ => bail!("config {} must end in .yaml, .yml or .json", path.display()),
        };
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.xor.validate().context("invalid xor configuration")?;
        self.vigenere
            .validate()
            .context("invalid vigenere configuration")?;
        Ok(())
    }
}

/// Flags overriding the repeating-key XOR search.
#[derive(Debug, Clone, Default, Args)]
pub struct XorOverrides {
    /// Keysizes kept from the estimator ranking
    #[arg(long)]
    pub top_keysizes: Option<usize>,

    /// Key-byte candidates kept per column
    #[arg(long)]
    pub candidates: Option<usize>,

    #[arg(long)]
    pub min_keysize: Option<usize>,

    #[arg(long)]
    pub max_keysize: Option<usize>,

    /// Ceiling on candidate keys scored per keysize
    #[arg(long)]
    pub max_candidates: Option<usize>,
}

impl XorOverrides {
    pub fn apply(&self, config: &mut XorSearchConfig) {
        if let Some(top) = self.top_keysizes {
            config.top_keysizes = top;
        }
        if let Some(candidates) = self.candidates {
            config.candidates_per_column = candidates;
        }
        if let Some(min) = self.min_keysize {
            config.min_keysize = min;
        }
        if let Some(max) = self.max_keysize {
            config.max_keysize = max;
        }
        if let Some(max) = self.max_candidates {
            config.max_candidates = max;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crack_core::{KeyAlphabet, KeysizeHeuristic};
    use std::io::Write;

    fn write_config(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let file = write_config(
            ".yaml",
            "xor:\n  top_keysizes: 5\n  key_alphabet: printable\nvigenere:\n  heuristic: xor_sum\n",
        );
        let config = AppConfig::load(Some(file.path())).unwrap();

        assert_eq!(config.xor.top_keysizes, 5);
        assert_eq!(config.xor.key_alphabet, KeyAlphabet::Printable);
        assert_eq!(config.xor.candidates_per_column, 2);
        assert_eq!(config.vigenere.heuristic, KeysizeHeuristic::XorSum);
        assert_eq!(config.vigenere.max_keysize, 13);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_json_config() {
        let file = write_config(
            ".json",
            r#"{"xor": {"key_alphabet": {"range": {"start": 65, "end": 90}}, "heuristic": "four_block"}}"#,
        );
        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.xor.key_alphabet, KeyAlphabet::Range { start: 65, end: 90 });
        assert_eq!(config.xor.heuristic, KeysizeHeuristic::FourBlock);
        assert_eq!(config.vigenere, VigenereConfig::default());
    }

    #[test]
    fn test_rejects_unknown_extension_and_missing_file() {
        let file = write_config(".toml", "xor = {}");
        assert!(AppConfig::from_file(file.path()).is_err());
        assert!(AppConfig::load(Some(Path::new("/nonexistent/crack.yaml"))).is_err());
    }

    #[test]
    fn test_overrides_then_validate() {
        let mut config = AppConfig::default();
        let overrides = XorOverrides {
            top_keysizes: Some(1),
            candidates: Some(3),
            max_keysize: Some(20),
            ..Default::default()
        };
        overrides.apply(&mut config.xor);

        assert_eq!(config.xor.top_keysizes, 1);
        assert_eq!(config.xor.candidates_per_column, 3);
        assert_eq!(config.xor.max_keysize, 20);
        assert_eq!(config.xor.min_keysize, 2);
        assert!(config.validate().is_ok());

        XorOverrides {
            candidates: Some(0),
            ..Default::default()
        }
        .apply(&mut config.xor);
        assert!(config.validate().is_err());
    }
}
