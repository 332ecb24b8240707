//! # Sentiment Lexicon
//!
//! Immutable word lists used by the scorer:
//! - positive / negative sentiment words (disjoint),
//! - intensity modifiers with multiplicative weights (> 0, default 1.0),
//! - negation markers.
//!
//! The built-in lexicon targets short Chinese video comments. An external JSON
//! file can replace it wholesale:
//!
//! ```json
//! {
//!   "positive_words": ["好", "棒"],
//!   "negative_words": ["差"],
//!   "intensity_modifiers": {"非常": 1.5},
//!   "negation_markers": ["不"]
//! }
//! ```

use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use tracing::warn;

use crate::error::{AnalyzerError, Result};

const POSITIVE_WORDS: &[&str] = &[
    "好", "棒", "赞", "优秀", "漂亮", "美", "可爱", "喜欢", "爱", "棒棒", "厉害", "强大", "精彩",
    "完美", "超赞", "太棒了", "支持", "加油", "棒棒哒", "美美哒", "喜欢喜欢", "赞赞赞",
];

const NEGATIVE_WORDS: &[&str] = &[
    "差", "烂", "垃圾", "差劲", "恶心", "讨厌", "无聊", "难看", "失望", "无语", "不行", "不好",
    "糟糕", "差评", "差差差", "恶评", "太差了", "不好看", "没意思", "不喜欢",
];

const INTENSITY_MODIFIERS: &[(&str, f64)] = &[
    ("非常", 1.5),
    ("极其", 1.5),
    ("十分", 1.5),
    ("超级", 1.5),
    ("特别", 1.5),
    ("很", 1.3),
    ("挺", 1.2),
    ("比较", 1.1),
    ("有点", 0.8),
    ("稍微", 0.8),
    ("略微", 0.8),
];

const NEGATION_MARKERS: &[&str] = &["不", "没", "无", "非", "莫", "勿", "未"];

#[derive(Debug, Clone)]
pub struct Lexicon {
    positive_words: HashSet<String>,
    negative_words: HashSet<String>,
    intensity_modifiers: HashMap<String, f64>,
    negation_markers: HashSet<String>,
}

/// On-disk shape of a lexicon override.
#[derive(Debug, Deserialize)]
struct LexiconFile {
    positive_words: Vec<String>,
    negative_words: Vec<String>,
    #[serde(default)]
    intensity_modifiers: HashMap<String, f64>,
    #[serde(default)]
    negation_markers: Vec<String>,
}

impl Lexicon {
    /// Build a lexicon, rejecting overlapping polarity sets and non-positive weights.
    pub fn new<P, N, G>(
        positive_words: P,
        negative_words: N,
        intensity_modifiers: HashMap<String, f64>,
        negation_markers: G,
    ) -> std::result::Result<Self, String>
    where
        P: IntoIterator<Item = String>,
        N: IntoIterator<Item = String>,
        G: IntoIterator<Item = String>,
    {
        let positive_words: HashSet<String> = positive_words.into_iter().collect();
        let negative_words: HashSet<String> = negative_words.into_iter().collect();

        let mut overlap: Vec<&String> = positive_words.intersection(&negative_words).collect();
        if !overlap.is_empty() {
            overlap.sort();
            return Err(format!("words listed as both positive and negative: {overlap:?}"));
        }
        if let Some((w, v)) = intensity_modifiers
            .iter()
            .find(|(_, v)| !(v.is_finite() && **v > 0.0))
        {
            return Err(format!("intensity weight for '{w}' must be > 0, got {v}"));
        }

        Ok(Self {
            positive_words,
            negative_words,
            intensity_modifiers,
            negation_markers: negation_markers.into_iter().collect(),
        })
    }

    /// The default Chinese comment lexicon.
    pub fn builtin() -> Self {
        let owned = |xs: &[&str]| xs.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        Self {
            positive_words: owned(POSITIVE_WORDS).into_iter().collect(),
            negative_words: owned(NEGATIVE_WORDS).into_iter().collect(),
            intensity_modifiers: INTENSITY_MODIFIERS
                .iter()
                .map(|(w, v)| (w.to_string(), *v))
                .collect(),
            negation_markers: owned(NEGATION_MARKERS).into_iter().collect(),
        }
    }

    /// Load a lexicon override from JSON (no fallback).
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|e| AnalyzerError::config(path, e))?;
        let file: LexiconFile =
            serde_json::from_slice(&bytes).map_err(|e| AnalyzerError::config(path, e))?;
        Self::new(
            file.positive_words,
            file.negative_words,
            file.intensity_modifiers,
            file.negation_markers,
        )
        .map_err(|reason| AnalyzerError::config(path, reason))
    }

    /// Use the override at `path` when given and valid; otherwise the built-in
    /// lexicon (with a warning if the override was unusable).
    pub fn from_override(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::builtin();
        };
        match Self::load_from_file(path) {
            Ok(lex) => lex,
            Err(e) => {
                warn!(target: "config", error = %e, "lexicon override rejected, using built-in lexicon");
                Self::builtin()
            }
        }
    }

    pub fn is_positive(&self, token: &str) -> bool {
        self.positive_words.contains(token)
    }

    pub fn is_negative(&self, token: &str) -> bool {
        self.negative_words.contains(token)
    }

    pub fn is_negation(&self, token: &str) -> bool {
        self.negation_markers.contains(token)
    }

    /// Intensity weight of `token` itself; 1.0 when unlisted.
    pub fn intensity(&self, token: &str) -> f64 {
        self.intensity_modifiers.get(token).copied().unwrap_or(1.0)
    }

    /// Every word the lexicon knows about (used to seed tokenizer dictionaries).
    pub fn vocabulary(&self) -> impl Iterator<Item = &str> {
        self.positive_words
            .iter()
            .chain(self.negative_words.iter())
            .chain(self.intensity_modifiers.keys())
            .chain(self.negation_markers.iter())
            .map(String::as_str)
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::builtin()
    }
}
