//! # Tokenizer capability
//!
//! The scorer and miner only see the [`Tokenizer`] trait: `segment` splits
//! text into an ordered token sequence, `extract_keywords` ranks tokens by a
//! TF-IDF style weight.
//!
//! Two backends ship:
//! - [`JiebaTokenizer`] (default): jieba segmentation with HMM discovery of
//!   words missing from its dictionary, and jieba's TF-IDF keyword extractor.
//! - [`DictTokenizer`]: forward maximum matching over a small fixed
//!   dictionary. Fully deterministic and independent of jieba's bundled data;
//!   it never invents words.

mod dict;
mod jieba;

pub use dict::DictTokenizer;
pub use jieba::JiebaTokenizer;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::{AnalyzerError, Result};
use crate::lexicon::Lexicon;
use crate::stopwords::StopwordSet;

/// Median of jieba's bundled IDF table; weight for words without an IDF entry.
pub const DEFAULT_MEDIAN_IDF: f64 = 11.739_204_307_083_542;

pub trait Tokenizer: Send + Sync {
    /// Split `text` into tokens, in order.
    fn segment(&self, text: &str) -> Result<Vec<String>>;

    /// Up to `top_k` `(token, weight)` pairs, highest weight first.
    fn extract_keywords(&self, text: &str, top_k: usize) -> Result<Vec<(String, f64)>>;
}

/// Which backend `build` creates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenizerKind {
    #[default]
    Jieba,
    Dictionary,
}

impl TokenizerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenizerKind::Jieba => "jieba",
            TokenizerKind::Dictionary => "dictionary",
        }
    }
}

/// Optional resource files applied on top of the seeded dictionary.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenizerFiles<'a> {
    pub user_dict: Option<&'a Path>,
    pub idf: Option<&'a Path>,
}

/// Build the chosen backend seeded with the lexicon vocabulary. Unreadable
/// resource files are logged and skipped.
pub fn build(
    kind: TokenizerKind,
    lexicon: &Lexicon,
    stopwords: Arc<StopwordSet>,
    files: TokenizerFiles<'_>,
) -> Arc<dyn Tokenizer> {
    match kind {
        TokenizerKind::Jieba => {
            let mut tok = JiebaTokenizer::for_lexicon(lexicon, stopwords);
            apply_files(&mut tok, files);
            Arc::new(tok)
        }
        TokenizerKind::Dictionary => {
            let mut tok = DictTokenizer::for_lexicon(lexicon, stopwords);
            apply_files(&mut tok, files);
            Arc::new(tok)
        }
    }
}

/// Backends that accept a user dictionary and an IDF table.
pub(crate) trait ResourceFiles {
    fn load_user_dict(&mut self, path: &Path) -> Result<usize>;
    fn load_idf(&mut self, path: &Path) -> Result<usize>;
}

fn apply_files(tok: &mut impl ResourceFiles, files: TokenizerFiles<'_>) {
    if let Some(path) = files.user_dict {
        match tok.load_user_dict(path) {
            Ok(n) => info!(target: "config", path = %path.display(), words = n, "user dictionary loaded"),
            Err(e) => warn!(target: "config", error = %e, "could not load user dictionary"),
        }
    }
    if let Some(path) = files.idf {
        match tok.load_idf(path) {
            Ok(n) => info!(target: "config", path = %path.display(), entries = n, "idf table loaded"),
            Err(e) => warn!(target: "config", error = %e, "could not load idf table, using median idf"),
        }
    }
}

/// True when every char is a decimal digit, ASCII or full-width
/// (`2024`, `６６６`). Numerals like `Ⅻ` or `½` do not count.
pub(crate) fn is_numeric_token(token: &str) -> bool {
    !token.is_empty() && token.chars().all(is_decimal_digit)
}

fn is_decimal_digit(c: char) -> bool {
    c.is_ascii_digit() || ('０'..='９').contains(&c)
}

/// `word idf` per line; blank lines skipped, anything else malformed is a
/// config error.
pub(crate) fn read_idf_table(path: &Path) -> Result<HashMap<String, f64>> {
    let content = fs::read_to_string(path).map_err(|e| AnalyzerError::config(path, e))?;
    let mut idf = HashMap::new();
    for (lineno, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut parts = line.split_whitespace();
        let (Some(word), Some(value)) = (parts.next(), parts.next()) else {
            return Err(AnalyzerError::config(
                path,
                format!("line {}: expected `word idf`", lineno + 1),
            ));
        };
        let value: f64 = value
            .parse()
            .map_err(|e| AnalyzerError::config(path, format!("line {}: {e}", lineno + 1)))?;
        idf.insert(word.to_string(), value);
    }
    Ok(idf)
}

/// User dictionary entries (jieba format: `word [freq] [tag]`).
pub(crate) fn read_user_dict(path: &Path) -> Result<Vec<(String, Option<usize>, Option<String>)>> {
    let lines = crate::stopwords::load_word_list(path)?;
    Ok(lines
        .iter()
        .filter_map(|l| {
            let mut parts = l.split_whitespace();
            let word = parts.next()?.to_string();
            let freq = parts.next().and_then(|f| f.parse::<usize>().ok());
            let tag = parts.next().map(str::to_string);
            Some((word, freq, tag))
        })
        .collect())
}
