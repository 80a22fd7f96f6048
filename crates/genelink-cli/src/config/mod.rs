//! Configuration loading for genelink.
//! Reads genelink.toml from `--config`, the GENELINK_CONFIG env var, or the
//! current directory. Every field has a default, so the file is optional.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "genelink.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub ner: NerConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub ncbi: NcbiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_10")]
    pub article_timeout_secs: u64,
    #[serde(default = "default_10")]
    pub metadata_timeout_secs: u64,
    #[serde(default = "default_5")]
    pub validation_timeout_secs: u64,
    #[serde(default = "default_5")]
    pub ensembl_timeout_secs: u64,
    /// Hosts allowed in addition to the built-in list.
    #[serde(default)]
    pub extra_allowed_hosts: Vec<String>,
}

fn default_user_agent() -> String { concat!("genelink/", env!("CARGO_PKG_VERSION")).to_string() }
fn default_10() -> u64 { 10 }
fn default_5()  -> u64 { 5 }

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            article_timeout_secs: default_10(),
            metadata_timeout_secs: default_10(),
            validation_timeout_secs: default_5(),
            ensembl_timeout_secs: default_5(),
            extra_allowed_hosts: Vec::new(),
        }
    }
}

impl HttpConfig {
    pub fn article_timeout(&self) -> Duration { Duration::from_secs(self.article_timeout_secs) }
    pub fn metadata_timeout(&self) -> Duration { Duration::from_secs(self.metadata_timeout_secs) }
    pub fn validation_timeout(&self) -> Duration { Duration::from_secs(self.validation_timeout_secs) }
    pub fn ensembl_timeout(&self) -> Duration { Duration::from_secs(self.ensembl_timeout_secs) }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NerBackend {
    /// External NER model service
    Remote,
    /// Built-in Aho-Corasick disease dictionary, opt-in
    Dictionary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NerConfig {
    #[serde(default = "default_ner_backend")]
    pub backend: NerBackend,
    #[serde(default = "default_service_url")]
    pub service_url: String,
    #[serde(default = "default_ner_model")]
    pub model: String,
    /// MeSH descriptor XML extending the dictionary backend.
    #[serde(default)]
    pub mesh_path: Option<PathBuf>,
    /// Download the MeSH descriptor file into the cache when no path is set.
    #[serde(default)]
    pub download_mesh: bool,
}

fn default_ner_backend() -> NerBackend { NerBackend::Remote }
fn default_service_url() -> String { genelink_ner::remote::DEFAULT_SERVICE_URL.to_string() }
fn default_ner_model()   -> String { genelink_ner::remote::DEFAULT_MODEL.to_string() }

impl Default for NerConfig {
    fn default() -> Self {
        Self {
            backend: default_ner_backend(),
            service_url: default_service_url(),
            model: default_ner_model(),
            mesh_path: None,
            download_mesh: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    #[serde(default = "bool_true")]
    pub enabled: bool,
}

fn bool_true() -> bool { true }

impl Default for ValidationConfig {
    fn default() -> Self {
        Self { enabled: bool_true() }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NcbiConfig {
    pub api_key: Option<String>,
}


/// Where the configuration comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults,
}

impl Config {
    /// Load configuration. An explicit `path` must exist; otherwise
    /// GENELINK_CONFIG or ./genelink.toml is used when present, and defaults
    /// when not. Environment overrides are applied last.
    pub fn load(path: Option<&Path>) -> anyhow::Result<(Self, ConfigSource)> {
        let (mut config, source) = match path {
            Some(p) => {
                if !p.exists() {
                    anyhow::bail!("Config file not found: {}", p.display());
                }
                (Self::from_file(p)?, ConfigSource::File(p.to_path_buf()))
            }
            None => {
                let p = std::env::var("GENELINK_CONFIG")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));
                if p.exists() {
                    (Self::from_file(&p)?, ConfigSource::File(p))
                } else {
                    (Self::default(), ConfigSource::Defaults)
                }
            }
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok((config, source))
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config file {}: {}", path.display(), e))
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Apply GENELINK_NER_URL and GENELINK_NCBI_API_KEY overrides.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("GENELINK_NER_URL").filter(|v| !v.is_empty()) {
            self.ner.service_url = url;
        }
        if let Some(key) = lookup("GENELINK_NCBI_API_KEY").filter(|v| !v.is_empty()) {
            self.ncbi.api_key = Some(key);
        }
    }
}
