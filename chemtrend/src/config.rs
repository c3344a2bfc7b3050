//! Analysis configuration, loaded from TOML.
//!
//! ```toml
//! estimator = "spearman"
//!
//! [fingerprint]
//! type = "morgan"
//! radius = 2
//! nbits = 2048
//! ```
//!
//! Every key is optional; missing keys take the defaults of
//! [`AnalysisConfig::default`].

use std::path::Path;

use chemtrend_chem::{FingerprintSource, MorganSource, PathSource};
use chemtrend_core::{Result, TrendError};
use chemtrend_stats::Estimator;
use serde::Deserialize;
use tracing::debug;

/// Fingerprint family and its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FingerprintConfig {
    /// Hashed linear paths of up to `max_length` atoms.
    Path { max_length: usize, nbits: usize },
    /// Circular environments up to `radius` bonds.
    Morgan { radius: usize, nbits: usize },
}

impl Default for FingerprintConfig {
    fn default() -> Self {
        FingerprintConfig::Path {
            max_length: PathSource::DEFAULT_MAX_LENGTH,
            nbits: PathSource::DEFAULT_NBITS,
        }
    }
}

impl FingerprintConfig {
    /// Build the fingerprint source this configuration describes.
    pub fn source(&self) -> Result<Box<dyn FingerprintSource>> {
        let source: Box<dyn FingerprintSource> = match *self {
            FingerprintConfig::Path { max_length, nbits } => {
                Box::new(PathSource::new(max_length, nbits).map_err(into_config_error)?)
            }
            FingerprintConfig::Morgan { radius, nbits } => {
                Box::new(MorganSource::new(radius, nbits).map_err(into_config_error)?)
            }
        };
        Ok(source)
    }

    pub fn nbits(&self) -> usize {
        match *self {
            FingerprintConfig::Path { nbits, .. } | FingerprintConfig::Morgan { nbits, .. } => {
                nbits
            }
        }
    }
}

/// Settings for one trend analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnalysisConfig {
    pub estimator: Estimator,
    pub fingerprint: FingerprintConfig,
}

impl AnalysisConfig {
    pub fn new(estimator: Estimator, fingerprint: FingerprintConfig) -> Self {
        Self {
            estimator,
            fingerprint,
        }
    }

    /// Parse a configuration document, filling unspecified keys with defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: FileAnalysisConfig =
            toml::from_str(content).map_err(|e| TrendError::Config(e.to_string()))?;
        let config = Self::try_from(file)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading analysis configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|e| match e {
            TrendError::Config(msg) => TrendError::Config(format!("{}: {msg}", path.display())),
            other => other,
        })
    }

    /// Check parameter ranges without building anything.
    pub fn validate(&self) -> Result<()> {
        self.fingerprint.source().map(|_| ())
    }
}

fn into_config_error(e: TrendError) -> TrendError {
    match e {
        TrendError::InvalidInput(msg) => TrendError::Config(msg),
        other => other,
    }
}

// ── File model ─────────────────────────────────────────────────────────────

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct FileAnalysisConfig {
    estimator: Option<String>,
    fingerprint: Option<FileFingerprintConfig>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
struct FilePathFingerprint {
    #[serde(rename = "max-length")]
    max_length: Option<usize>,
    nbits: Option<usize>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
struct FileMorganFingerprint {
    radius: Option<usize>,
    nbits: Option<usize>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case", tag = "type")]
enum FileFingerprintConfig {
    Path(FilePathFingerprint),
    Morgan(FileMorganFingerprint),
}

impl From<FileFingerprintConfig> for FingerprintConfig {
    fn from(f: FileFingerprintConfig) -> Self {
        match f {
            FileFingerprintConfig::Path(p) => FingerprintConfig::Path {
                max_length: p.max_length.unwrap_or(PathSource::DEFAULT_MAX_LENGTH),
                nbits: p.nbits.unwrap_or(PathSource::DEFAULT_NBITS),
            },
            FileFingerprintConfig::Morgan(m) => FingerprintConfig::Morgan {
                radius: m.radius.unwrap_or(MorganSource::DEFAULT_RADIUS),
                nbits: m.nbits.unwrap_or(MorganSource::DEFAULT_NBITS),
            },
        }
    }
}

impl TryFrom<FileAnalysisConfig> for AnalysisConfig {
    type Error = TrendError;

    fn try_from(f: FileAnalysisConfig) -> Result<Self> {
        let estimator = match f.estimator {
            Some(name) => name.parse()?,
            None => Estimator::default(),
        };
        let fingerprint = f.fingerprint.map(Into::into).unwrap_or_default();
        Ok(AnalysisConfig {
            estimator,
            fingerprint,
        })
    }
}
