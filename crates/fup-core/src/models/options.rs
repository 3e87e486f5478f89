//! Per-call upload options
//!
//! Callers fill in only what they need; [`SingleUploadOptions::resolve`] merges the
//! defaults once so validation works on a fully-populated [`ResolvedUploadOptions`].

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::UploadConfig;
use crate::mime_types::ALL_TYPES;

/// Policy selecting the final on-disk file name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameStrategy {
    /// `file-<unix millis>.<ext>`
    #[default]
    ByDate,
    /// `file-<uuid v4>.<ext>`
    ByUuid,
    /// The caller-supplied explicit name
    Explicit,
    /// The uploaded file's own name
    Original,
}

impl FromStr for NameStrategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "date" | "bydate" => Ok(NameStrategy::ByDate),
            "uuid" | "byuuid" => Ok(NameStrategy::ByUuid),
            "explicit" => Ok(NameStrategy::Explicit),
            "original" => Ok(NameStrategy::Original),
            _ => Err(anyhow::anyhow!("Invalid name strategy: {}", s)),
        }
    }
}

impl Display for NameStrategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            NameStrategy::ByDate => write!(f, "date"),
            NameStrategy::ByUuid => write!(f, "uuid"),
            NameStrategy::Explicit => write!(f, "explicit"),
            NameStrategy::Original => write!(f, "original"),
        }
    }
}

/// Settings for a single file upload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SingleUploadOptions {
    /// Name used with [`NameStrategy::Explicit`]
    pub explicit_name: Option<String>,
    /// MIME types permitted, `["*"]` when omitted
    pub allowed_types: Option<Vec<String>>,
    pub name_strategy: Option<NameStrategy>,
    /// Per-call size limit; zero or omitted falls back to the configured maximum
    pub max_file_bytes: Option<u64>,
}

/// Options after defaults have been merged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedUploadOptions {
    pub explicit_name: String,
    pub allowed_types: Vec<String>,
    pub name_strategy: NameStrategy,
    pub max_file_bytes: u64,
}

impl SingleUploadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name_strategy(mut self, strategy: NameStrategy) -> Self {
        self.name_strategy = Some(strategy);
        self
    }

    /// Use `name` verbatim; sets the strategy to [`NameStrategy::Explicit`].
    pub fn with_explicit_name(mut self, name: impl Into<String>) -> Self {
        self.explicit_name = Some(name.into());
        self.name_strategy = Some(NameStrategy::Explicit);
        self
    }

    pub fn with_allowed_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_types = Some(types.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_max_file_bytes(mut self, max: u64) -> Self {
        self.max_file_bytes = Some(max);
        self
    }

    pub fn resolve(&self, config: &UploadConfig) -> ResolvedUploadOptions {
        let max_file_bytes = match self.max_file_bytes {
            Some(max) if max > 0 => max,
            _ => config.max_total_file_bytes,
        };

        ResolvedUploadOptions {
            explicit_name: self.explicit_name.clone().unwrap_or_default(),
            allowed_types: self
                .allowed_types
                .clone()
                .unwrap_or_else(|| vec![ALL_TYPES.to_string()]),
            name_strategy: self.name_strategy.unwrap_or_default(),
            max_file_bytes,
        }
    }
}

/// Settings for a batch upload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultipleUploadOptions {
    /// Explicit names, matched to files by position
    pub names: Option<Vec<String>>,
    pub allowed_types: Option<Vec<String>>,
    pub name_strategy: Option<NameStrategy>,
    pub max_file_bytes: Option<u64>,
    /// Maximum count of files, the configured maximum when omitted
    pub max_file_count: Option<u32>,
}

impl MultipleUploadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `names` positionally.
    ///
    /// A non-empty list sets the strategy to [`NameStrategy::Explicit`]; an empty one
    /// counts as no names at all.
    pub fn with_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if !names.is_empty() {
            self.name_strategy = Some(NameStrategy::Explicit);
        }
        self.names = Some(names);
        self
    }

    pub fn with_name_strategy(mut self, strategy: NameStrategy) -> Self {
        self.name_strategy = Some(strategy);
        self
    }

    pub fn with_allowed_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_types = Some(types.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_max_file_bytes(mut self, max: u64) -> Self {
        self.max_file_bytes = Some(max);
        self
    }

    pub fn with_max_file_count(mut self, max: u32) -> Self {
        self.max_file_count = Some(max);
        self
    }

    pub fn names(&self) -> &[String] {
        self.names.as_deref().unwrap_or_default()
    }

    pub fn max_file_count(&self, config: &UploadConfig) -> u32 {
        self.max_file_count.unwrap_or(config.max_file_count)
    }

    /// Options for the file at `index`, deriving the explicit name positionally.
    pub fn for_file(&self, index: usize) -> SingleUploadOptions {
        SingleUploadOptions {
            explicit_name: self.names().get(index).cloned(),
            allowed_types: self.allowed_types.clone(),
            name_strategy: self.name_strategy,
            max_file_bytes: self.max_file_bytes,
        }
    }
}
