//! jieba segmentation (dictionary DAG + HMM for unseen words) and jieba's
//! TF-IDF keyword extraction.

use jieba_rs::{Jieba, KeywordExtract, TfIdf};
use std::path::Path;
use std::sync::Arc;

use super::{is_numeric_token, read_idf_table, read_user_dict, ResourceFiles, Tokenizer};
use crate::error::Result;
use crate::lexicon::Lexicon;
use crate::stopwords::StopwordSet;

pub struct JiebaTokenizer {
    jieba: Jieba,
    tfidf: TfIdf,
    stopwords: Arc<StopwordSet>,
}

impl JiebaTokenizer {
    /// jieba's bundled dictionary and IDF table.
    pub fn new(stopwords: Arc<StopwordSet>) -> Self {
        Self {
            jieba: Jieba::new(),
            tfidf: TfIdf::default(),
            stopwords,
        }
    }

    /// Sentiment words, modifiers and negation phrases are added to the
    /// dictionary so they come out as whole tokens.
    pub fn for_lexicon(lexicon: &Lexicon, stopwords: Arc<StopwordSet>) -> Self {
        let mut tok = Self::new(stopwords);
        tok.add_words(lexicon.vocabulary());
        tok
    }

    pub fn add_words<'a>(&mut self, words: impl IntoIterator<Item = &'a str>) {
        for w in words {
            if w.chars().count() >= 2 {
                self.jieba.add_word(w, None, None);
            }
        }
    }

    /// Add user dictionary entries (`word [freq] [tag]`). Returns the number
    /// of entries read.
    pub fn load_user_dict(&mut self, path: &Path) -> Result<usize> {
        let entries = read_user_dict(path)?;
        for (word, freq, tag) in &entries {
            self.jieba.add_word(word, *freq, tag.as_deref());
        }
        Ok(entries.len())
    }

    /// Replace the keyword IDF table from a `word idf` per line file.
    pub fn load_idf(&mut self, path: &Path) -> Result<usize> {
        let idf = read_idf_table(path)?;
        let normalized: String = idf.iter().map(|(w, v)| format!("{w} {v}\n")).collect();
        self.tfidf.load_dict(&mut normalized.as_bytes())?;
        Ok(idf.len())
    }

    fn is_candidate_keyword(&self, token: &str) -> bool {
        token.chars().count() >= 2 && !is_numeric_token(token) && !self.stopwords.contains(token)
    }
}

impl ResourceFiles for JiebaTokenizer {
    fn load_user_dict(&mut self, path: &Path) -> Result<usize> {
        JiebaTokenizer::load_user_dict(self, path)
    }

    fn load_idf(&mut self, path: &Path) -> Result<usize> {
        JiebaTokenizer::load_idf(self, path)
    }
}

impl Tokenizer for JiebaTokenizer {
    fn segment(&self, text: &str) -> Result<Vec<String>> {
        Ok(self
            .jieba
            .cut(text, true)
            .into_iter()
            .map(str::to_string)
            .collect())
    }

    fn extract_keywords(&self, text: &str, top_k: usize) -> Result<Vec<(String, f64)>> {
        // Over-fetch so stopwords dropped here do not shrink the result.
        let wanted = top_k.saturating_add(self.stopwords.len());
        Ok(self
            .tfidf
            .extract_keywords(&self.jieba, text, wanted, Vec::new())
            .into_iter()
            .filter(|k| self.is_candidate_keyword(&k.keyword))
            .take(top_k)
            .map(|k| (k.keyword, k.weight))
            .collect())
    }
}
