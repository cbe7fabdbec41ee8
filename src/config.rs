//! # Builder Configuration
//!
//! The whole configuration surface of a build is three values: the output
//! folder, the ordered list of source strings, and whether the index is
//! compressed. They can come from a YAML file:
//!
//! ```yaml
//! output: ./repo
//! compressed: false
//! sources:
//!   - https://github.com/user/repo.git#main:addons/plugin.video.example
//!   - ./addons/script.module.example
//!   - ./dist/plugin.audio.example-1.0.0.zip
//! ```
//!
//! and be overridden from the command line with [`RepoConfig::merge_cli`].

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::defaults;
use crate::error::{Error, Result};
use crate::repository::RepositoryBuilder;

/// Output folder, sources and compression flag of a build.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RepoConfig {
    /// Folder the repository is written to.
    #[serde(default = "defaults::default_output_folder")]
    pub output: PathBuf,
    /// Gzip the repository index.
    #[serde(default)]
    pub compressed: bool,
    /// Ordered list of addon sources.
    #[serde(default)]
    pub sources: Vec<String>,
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            output: defaults::default_output_folder(),
            compressed: false,
            sources: Vec::new(),
        }
    }
}

impl RepoConfig {
    /// Apply command-line overrides: non-empty `sources` replace the list,
    /// `output` replaces the folder, and `compressed` can only turn
    /// compression on.
    pub fn merge_cli(
        mut self,
        sources: Vec<String>,
        output: Option<PathBuf>,
        compressed: bool,
    ) -> Self {
        if !sources.is_empty() {
            self.sources = sources;
        }
        if let Some(output) = output {
            self.output = output;
        }
        self.compressed |= compressed;
        self
    }

    /// Check the configuration can drive a build.
    pub fn validate(&self) -> Result<()> {
        if self.sources.is_empty() {
            return Err(Error::ConfigParse {
                message: "no addon sources configured".to_string(),
                hint: Some(
                    "List sources under 'sources:' or pass them as arguments".to_string(),
                ),
            });
        }
        if let Some(blank) = self.sources.iter().position(|s| s.trim().is_empty()) {
            return Err(Error::ConfigParse {
                message: format!("source #{} is empty", blank + 1),
                hint: None,
            });
        }
        Ok(())
    }

    /// Turn the configuration into a repository builder.
    pub fn into_builder(self) -> RepositoryBuilder {
        RepositoryBuilder::new(self.output)
            .sources(self.sources)
            .compressed(self.compressed)
    }
}

/// Parse a configuration from YAML text. Empty text is the default config.
pub fn parse(yaml_content: &str) -> Result<RepoConfig> {
    if yaml_content.trim().is_empty() {
        return Ok(RepoConfig::default());
    }
    serde_yaml::from_str(yaml_content).map_err(|e| Error::ConfigParse {
        message: e.to_string(),
        hint: Some("Expected keys: output, compressed, sources".to_string()),
    })
}

/// Read and parse a configuration file.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<RepoConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}
