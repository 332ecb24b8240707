// src/stopwords.rs
//! Stopword set for the text miner: a built-in base list, optionally extended
//! from a UTF-8 file with one word per line.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::error::{AnalyzerError, Result};

const BASE_STOPWORDS: &[&str] = &[
    "的", "了", "在", "是", "我", "有", "和", "就", "不", "人", "都", "一", "一个", "上", "也", "很",
    "到", "说", "要", "去", "你", "会", "着", "没有", "看", "好", "自己", "这", "这个",
];

#[derive(Debug, Clone)]
pub struct StopwordSet {
    words: HashSet<String>,
}

impl StopwordSet {
    pub fn base() -> Self {
        Self {
            words: BASE_STOPWORDS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Base set plus every non-empty trimmed line of `path`.
    pub fn with_file(path: &Path) -> Result<Self> {
        let extra = load_word_list(path)?;
        let mut set = Self::base();
        set.words.extend(extra);
        Ok(set)
    }

    /// Base set, extended from `path` when given. An unreadable file is
    /// reported and ignored.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::base();
        };
        match Self::with_file(path) {
            Ok(set) => {
                info!(target: "config", path = %path.display(), size = set.len(), "stopwords loaded");
                set
            }
            Err(e) => {
                warn!(target: "config", error = %e, "could not load stopword file, using base set");
                Self::base()
            }
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }
}

impl Default for StopwordSet {
    fn default() -> Self {
        Self::base()
    }
}

/// Read a one-word-per-line list; blank lines are skipped.
pub(crate) fn load_word_list(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path).map_err(|e| AnalyzerError::config(path, e))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_set_contains_function_words() {
        let sw = StopwordSet::base();
        assert!(sw.contains("的"));
        assert!(sw.contains("这个"));
        assert!(sw.contains("没有"));
        assert!(!sw.contains("视频"));
    }

    #[test]
    fn file_extends_base_set() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stopwords.txt");
        fs::write(&path, "视频\n\n  主播  \n").unwrap();

        let sw = StopwordSet::load(Some(&path));
        assert!(sw.contains("视频"));
        assert!(sw.contains("主播"));
        assert!(sw.contains("的"));
        assert_eq!(sw.len(), StopwordSet::base().len() + 2);
    }

    #[test]
    fn unreadable_file_falls_back_to_base() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.txt");
        assert!(StopwordSet::with_file(&missing).is_err());
        let sw = StopwordSet::load(Some(&missing));
        assert_eq!(sw.len(), StopwordSet::base().len());
    }
}
