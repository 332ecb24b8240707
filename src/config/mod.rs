// src/config/mod.rs
//! Analyzer configuration: `config/analyzer.toml` (path overridable through
//! `ANALYZER_CONFIG_PATH`), then individual env overrides.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::comment::TextField;
use crate::tokenizer::TokenizerKind;

pub const DEFAULT_ANALYZER_CONFIG_PATH: &str = "config/analyzer.toml";
pub const DEFAULT_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_TOP_N: usize = 15;
pub const DEFAULT_HOT_TOPIC_MIN_COUNT: usize = 2;
pub const DEFAULT_KEYWORD_TOP_K: usize = 10;

pub const ENV_ANALYZER_CONFIG_PATH: &str = "ANALYZER_CONFIG_PATH";
pub const ENV_ANALYZER_ADDR: &str = "ANALYZER_ADDR";
pub const ENV_ANALYZER_STOPWORDS_FILE: &str = "ANALYZER_STOPWORDS_FILE";
pub const ENV_ANALYZER_TOP_N: &str = "ANALYZER_TOP_N";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Listen address of the HTTP server.
    pub addr: String,
    /// JSON lexicon replacing the built-in dictionaries.
    pub sentiment_dict_path: Option<PathBuf>,
    /// Extra stopwords, one per line, added to the base set.
    pub stopwords_file: Option<PathBuf>,
    /// Extra tokenizer words (`word [freq] [tag]` per line).
    pub user_dict_path: Option<PathBuf>,
    /// `word idf` per line, used for keyword weighting.
    pub idf_path: Option<PathBuf>,
    /// Segmentation backend: `jieba` (default) or `dictionary`.
    pub tokenizer: TokenizerKind,
    pub text_field: TextField,
    pub top_n: usize,
    pub hot_topic_min_count: usize,
    pub hot_topic_scan: usize,
    pub keyword_top_k: usize,
    pub dedup_comments: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            sentiment_dict_path: None,
            stopwords_file: None,
            user_dict_path: None,
            idf_path: None,
            tokenizer: TokenizerKind::Jieba,
            text_field: TextField::Content,
            top_n: DEFAULT_TOP_N,
            hot_topic_min_count: DEFAULT_HOT_TOPIC_MIN_COUNT,
            hot_topic_scan: crate::mining::HOT_TOPIC_SCAN,
            keyword_top_k: DEFAULT_KEYWORD_TOP_K,
            dedup_comments: false,
        }
    }
}

impl AnalyzerConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: AnalyzerConfig = toml::from_str(s)?;
        Ok(cfg)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading analyzer config from {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("parsing analyzer config {}", path.display()))
    }

    /// Resolve the config file, then apply env overrides:
    /// 1) $ANALYZER_CONFIG_PATH (must exist)
    /// 2) config/analyzer.toml
    /// 3) built-in defaults
    pub fn load() -> Result<Self> {
        let mut cfg = if let Ok(p) = std::env::var(ENV_ANALYZER_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!(
                    "{ENV_ANALYZER_CONFIG_PATH} points to non-existent path {}",
                    pb.display()
                ));
            }
            Self::load_from(&pb)?
        } else {
            let default = PathBuf::from(DEFAULT_ANALYZER_CONFIG_PATH);
            if default.exists() {
                Self::load_from(&default)?
            } else {
                info!(target: "config", "no analyzer config file, using defaults");
                Self::default()
            }
        };
        cfg.apply_env_overrides();
        Ok(cfg)
    }

    /// `ANALYZER_ADDR`, `ANALYZER_STOPWORDS_FILE`, `ANALYZER_TOP_N`.
    /// Unparseable values are ignored with a warning.
    pub fn apply_env_overrides(&mut self) {
        if let Some(addr) = non_empty_env(ENV_ANALYZER_ADDR) {
            self.addr = addr;
        }
        if let Some(path) = non_empty_env(ENV_ANALYZER_STOPWORDS_FILE) {
            self.stopwords_file = Some(PathBuf::from(path));
        }
        if let Some(raw) = non_empty_env(ENV_ANALYZER_TOP_N) {
            match parse_top_n(&raw) {
                Some(n) => self.top_n = n,
                None => warn!(target: "config", value = %raw, "ignoring invalid {ENV_ANALYZER_TOP_N}"),
            }
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_top_n(raw: &str) -> Option<usize> {
    raw.trim().parse::<usize>().ok().filter(|n| *n > 0)
}
