//! # Text Miner
//! Word-frequency statistics and hot-topic discovery over a comment corpus.
//!
//! Tokens are counted per comment after filtering (≥ 2 chars, not a stopword,
//! not all-numeric). Rankings sort by count descending; equal counts keep the
//! order in which tokens were first seen in the corpus.
//!
//! Hot topics map a frequent token back to the comments whose raw text
//! contains it as a plain substring, so `related_comment_count` may be lower
//! (token repeated inside one comment) or higher (token embedded in a longer
//! word) than `occurrence_count`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use crate::comment::{Comment, TextField};
use crate::error::Result;
use crate::stopwords::StopwordSet;
use crate::tokenizer::{is_numeric_token, Tokenizer};

/// How many top tokens `find_hot_topics` considers.
pub const HOT_TOPIC_SCAN: usize = 50;
/// Ranking depth and minimum count for word-cloud data.
pub const WORDCLOUD_SCAN: usize = 100;
pub const WORDCLOUD_MIN_COUNT: usize = 2;
pub const MAX_SAMPLE_COMMENTS: usize = 3;

static RE_STRIP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\x{4e00}-\x{9fff}\s]").expect("strip regex"));
static RE_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));

/// Drop chars outside word chars / CJK ideographs / whitespace, collapse
/// whitespace runs to one space, trim.
pub fn clean_text(text: &str) -> String {
    let stripped = RE_STRIP.replace_all(text, "");
    RE_WS.replace_all(&stripped, " ").trim().to_string()
}

/// Token counts in first-seen order. Counts are always ≥ 1.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    entries: Vec<(String, usize)>,
    index: HashMap<String, usize>,
}

impl FrequencyTable {
    pub fn add(&mut self, token: String) {
        match self.index.get(&token) {
            Some(&i) => self.entries[i].1 += 1,
            None => {
                self.index.insert(token.clone(), self.entries.len());
                self.entries.push((token, 1));
            }
        }
    }

    pub fn get(&self, token: &str) -> Option<usize> {
        self.index.get(token).map(|&i| self.entries[i].1)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.index.contains_key(token)
    }

    /// Number of distinct tokens.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, n)| n).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(w, n)| (w.as_str(), *n))
    }

    /// The `n` most frequent tokens; ties keep first-seen order.
    pub fn top(&self, n: usize) -> Vec<(String, usize)> {
        let mut ranked = self.entries.clone();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(n);
        ranked
    }
}

impl Serialize for FrequencyTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (w, n) in &self.entries {
            map.serialize_entry(w, n)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MiningResult {
    pub top_n: Vec<(String, usize)>,
    pub total_words: usize,
    pub unique_words: usize,
    pub all_word_counts: FrequencyTable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotTopic {
    pub keyword: String,
    pub occurrence_count: usize,
    pub related_comment_count: usize,
    pub sample_comments: Vec<String>,
}

#[derive(Clone)]
pub struct TextMiner {
    stopwords: Arc<StopwordSet>,
    tokenizer: Arc<dyn Tokenizer>,
    hot_topic_scan: usize,
}

impl TextMiner {
    pub fn new(stopwords: Arc<StopwordSet>, tokenizer: Arc<dyn Tokenizer>) -> Self {
        Self {
            stopwords,
            tokenizer,
            hot_topic_scan: HOT_TOPIC_SCAN,
        }
    }

    pub fn with_hot_topic_scan(mut self, n: usize) -> Self {
        self.hot_topic_scan = n;
        self
    }

    pub fn stopwords(&self) -> &StopwordSet {
        &self.stopwords
    }

    /// `clean_text` over an optional field; missing text cleans to "".
    pub fn clean(&self, text: Option<&str>) -> String {
        text.map(clean_text).unwrap_or_default()
    }

    /// Segment raw text and keep the tokens worth counting, in order.
    pub fn tokenize_and_filter(&self, text: &str) -> Result<Vec<String>> {
        Ok(self
            .tokenizer
            .segment(text)?
            .into_iter()
            .filter_map(|t| {
                let t = t.trim();
                let keep = t.chars().count() >= 2
                    && !self.stopwords.contains(t)
                    && !is_numeric_token(t);
                keep.then(|| t.to_string())
            })
            .collect())
    }

    /// Corpus-wide token frequencies. `Ok(None)` when no comment has any
    /// usable text after cleaning.
    pub fn mine(
        &self,
        comments: &[Comment],
        field: TextField,
        top_n: usize,
    ) -> Result<Option<MiningResult>> {
        let texts: Vec<&str> = comments.iter().filter_map(|c| field.get(c)).collect();

        if clean_text(&texts.join(" ")).is_empty() {
            info!(target: "mining", comments = comments.len(), "no usable text to mine");
            return Ok(None);
        }

        let mut table = FrequencyTable::default();
        for text in &texts {
            for token in self.tokenize_and_filter(text)? {
                table.add(token);
            }
        }

        let top = table.top(top_n);
        info!(
            target: "mining",
            top_n,
            total_words = table.total(),
            unique_words = table.len(),
            top = ?top,
            "word frequencies"
        );

        Ok(Some(MiningResult {
            top_n: top,
            total_words: table.total(),
            unique_words: table.len(),
            all_word_counts: table,
        }))
    }

    /// Frequent tokens (count ≥ `min_count` among the top `hot_topic_scan`)
    /// linked back to the comments containing them.
    pub fn find_hot_topics(
        &self,
        comments: &[Comment],
        field: TextField,
        min_count: usize,
    ) -> Result<Vec<HotTopic>> {
        let Some(result) = self.mine(comments, field, self.hot_topic_scan)? else {
            return Ok(Vec::new());
        };

        let topics: Vec<HotTopic> = result
            .top_n
            .into_iter()
            .filter(|(_, count)| *count >= min_count)
            .map(|(keyword, count)| {
                let related: Vec<&str> = comments
                    .iter()
                    .filter_map(|c| field.get(c))
                    .filter(|text| text.contains(keyword.as_str()))
                    .collect();
                HotTopic {
                    occurrence_count: count,
                    related_comment_count: related.len(),
                    sample_comments: related
                        .iter()
                        .take(MAX_SAMPLE_COMMENTS)
                        .map(|s| s.to_string())
                        .collect(),
                    keyword,
                }
            })
            .collect();

        info!(target: "mining", min_count, topics = topics.len(), "hot topics");
        Ok(topics)
    }

    /// Weighted keywords of one text via the tokenizer's extraction.
    pub fn extract_keywords(&self, text: &str, top_n: usize) -> Result<Vec<(String, f64)>> {
        if text.is_empty() {
            return Ok(Vec::new());
        }
        self.tokenizer.extract_keywords(text, top_n)
    }

    /// Tokens seen at least twice among the top 100, for word-cloud rendering.
    pub fn wordcloud_data(
        &self,
        comments: &[Comment],
        field: TextField,
    ) -> Result<Vec<(String, usize)>> {
        Ok(self
            .mine(comments, field, WORDCLOUD_SCAN)?
            .map(|r| {
                r.all_word_counts
                    .iter()
                    .filter(|(_, n)| *n >= WORDCLOUD_MIN_COUNT)
                    .map(|(w, n)| (w.to_string(), n))
                    .collect()
            })
            .unwrap_or_default())
    }
}
