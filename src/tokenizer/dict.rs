//! Forward maximum matching over a word dictionary (lexicon + stopwords +
//! common comment vocabulary + optional user dictionary). Every input char
//! ends up in exactly one token, so concatenating the output reproduces the
//! input:
//! - whitespace runs → one token,
//! - ASCII alphanumeric / `_` runs → one token,
//! - other alphanumeric chars (CJK) → longest dictionary word of ≥ 2 chars
//!   starting here, else the single char,
//! - anything else (punctuation, emoji) → one token per char.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use super::{is_numeric_token, read_idf_table, read_user_dict, ResourceFiles, Tokenizer, DEFAULT_MEDIAN_IDF};
use crate::error::Result;
use crate::lexicon::Lexicon;
use crate::stopwords::StopwordSet;

/// Common words in short-video comments that are neither sentiment words
/// nor stopwords.
const COMMENT_VOCABULARY: &[&str] = &[
    "视频", "内容", "主播", "评论", "值得", "推荐", "关注", "分享", "朋友", "继续", "一般", "一般般",
    "浪费", "时间", "观看", "建议", "可以", "已经", "点赞", "不错", "意思", "什么", "没什么", "一看",
    "看看", "真的", "还是", "就是", "作品", "音乐", "画面", "拍得", "好看", "好听", "哈哈", "哈哈哈",
    "感觉", "确实", "大家", "我们", "他们", "因为", "所以", "但是", "然后", "今天", "怎么", "这么",
    "那么", "有趣", "搞笑", "封面", "剧情", "更新", "期待", "粉丝", "老师",
];

#[derive(Debug, Clone)]
pub struct DictTokenizer {
    words: HashSet<String>,
    max_word_len: usize,
    idf: HashMap<String, f64>,
    median_idf: f64,
    stopwords: Option<Arc<StopwordSet>>,
}

impl DictTokenizer {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut tok = Self {
            words: HashSet::new(),
            max_word_len: 1,
            idf: HashMap::new(),
            median_idf: DEFAULT_MEDIAN_IDF,
            stopwords: None,
        };
        tok.add_words(words);
        tok
    }

    /// Dictionary seeded from the lexicon, the stopwords and the built-in
    /// comment vocabulary. Stopwords are also excluded from keyword ranking.
    pub fn for_lexicon(lexicon: &Lexicon, stopwords: Arc<StopwordSet>) -> Self {
        let mut tok = Self::new(COMMENT_VOCABULARY.iter().copied());
        tok.add_words(lexicon.vocabulary());
        tok.add_words(stopwords.iter());
        tok.stopwords = Some(stopwords);
        tok
    }

    pub fn add_words<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for w in words {
            let w: String = w.into();
            let len = w.chars().count();
            if len == 0 {
                continue;
            }
            self.max_word_len = self.max_word_len.max(len);
            self.words.insert(w);
        }
    }

    /// Add the words of a user dictionary; frequencies and tags are ignored.
    /// Returns the number of entries read.
    pub fn load_user_dict(&mut self, path: &Path) -> Result<usize> {
        let entries = read_user_dict(path)?;
        let n = entries.len();
        self.add_words(entries.into_iter().map(|(w, _, _)| w));
        Ok(n)
    }

    /// Replace the IDF table from a `word idf` per line file.
    pub fn load_idf(&mut self, path: &Path) -> Result<usize> {
        let idf = read_idf_table(path)?;
        let n = idf.len();
        self.median_idf = median(idf.values().copied()).unwrap_or(DEFAULT_MEDIAN_IDF);
        self.idf = idf;
        Ok(n)
    }

    fn longest_match(&self, chars: &[char], start: usize) -> usize {
        let max = self.max_word_len.min(chars.len() - start);
        for len in (2..=max).rev() {
            let candidate: String = chars[start..start + len].iter().collect();
            if self.words.contains(&candidate) {
                return len;
            }
        }
        1
    }

    fn is_candidate_keyword(&self, token: &str) -> bool {
        token.chars().count() >= 2
            && !is_numeric_token(token)
            && token.chars().any(char::is_alphanumeric)
            && !self.stopwords.as_ref().is_some_and(|sw| sw.contains(token))
    }
}

impl ResourceFiles for DictTokenizer {
    fn load_user_dict(&mut self, path: &Path) -> Result<usize> {
        DictTokenizer::load_user_dict(self, path)
    }

    fn load_idf(&mut self, path: &Path) -> Result<usize> {
        DictTokenizer::load_idf(self, path)
    }
}

impl Tokenizer for DictTokenizer {
    fn segment(&self, text: &str) -> Result<Vec<String>> {
        let chars: Vec<char> = text.chars().collect();
        let mut tokens = Vec::new();
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];
            let len = if c.is_whitespace() {
                run_len(&chars[i..], |c| c.is_whitespace())
            } else if is_ascii_word(c) {
                run_len(&chars[i..], is_ascii_word)
            } else if c.is_alphanumeric() {
                self.longest_match(&chars, i)
            } else {
                1
            };
            tokens.push(chars[i..i + len].iter().collect());
            i += len;
        }

        Ok(tokens)
    }

    fn extract_keywords(&self, text: &str, top_k: usize) -> Result<Vec<(String, f64)>> {
        let mut order: Vec<(String, usize)> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut total = 0usize;

        for token in self.segment(text)? {
            let token = token.trim();
            if !self.is_candidate_keyword(token) {
                continue;
            }
            total += 1;
            match index.get(token) {
                Some(&i) => order[i].1 += 1,
                None => {
                    index.insert(token.to_string(), order.len());
                    order.push((token.to_string(), 1));
                }
            }
        }

        if total == 0 {
            return Ok(Vec::new());
        }

        let mut weighted: Vec<(String, f64)> = order
            .into_iter()
            .map(|(w, n)| {
                let idf = self.idf.get(&w).copied().unwrap_or(self.median_idf);
                let weight = n as f64 / total as f64 * idf;
                (w, weight)
            })
            .collect();
        // Stable sort keeps first-occurrence order among equal weights.
        weighted.sort_by(|a, b| b.1.total_cmp(&a.1));
        weighted.truncate(top_k);
        Ok(weighted)
    }
}

fn is_ascii_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn run_len(chars: &[char], pred: impl Fn(char) -> bool) -> usize {
    chars.iter().take_while(|c| pred(**c)).count()
}

fn median(values: impl Iterator<Item = f64>) -> Option<f64> {
    let mut v: Vec<f64> = values.collect();
    if v.is_empty() {
        return None;
    }
    v.sort_by(f64::total_cmp);
    Some(v[v.len() / 2])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn default_tokenizer() -> DictTokenizer {
        DictTokenizer::for_lexicon(&Lexicon::builtin(), Arc::new(StopwordSet::base()))
    }

    #[test]
    fn segments_comment_with_longest_match() {
        let tok = default_tokenizer();
        let tokens = tok.segment("这个视频太棒了，我非常喜欢！").unwrap();
        assert_eq!(
            tokens,
            vec!["这个", "视频", "太棒了", "，", "我", "非常", "喜欢", "！"]
        );
    }

    #[test]
    fn negation_marker_stays_separate_when_no_word_absorbs_it() {
        let tok = default_tokenizer();
        assert_eq!(tok.segment("视频不精彩").unwrap(), vec!["视频", "不", "精彩"]);
        // Longer dictionary entries win over the bare marker.
        assert_eq!(tok.segment("我不喜欢").unwrap(), vec!["我", "不喜欢"]);
    }

    #[test]
    fn ascii_runs_and_whitespace_are_single_tokens() {
        let tok = default_tokenizer();
        let tokens = tok.segment("2024年  vlog 666😀").unwrap();
        assert_eq!(tokens, vec!["2024", "年", "  ", "vlog", " ", "666", "😀"]);
    }

    #[test]
    fn concatenation_reproduces_input() {
        let tok = default_tokenizer();
        for text in ["", "内容不错，继续加油", "abc 主播 ！！ 好看😀\n\t", "ÉÀ naïve 喜欢喜欢"] {
            let joined: String = tok.segment(text).unwrap().concat();
            assert_eq!(joined, text);
        }
    }

    #[test]
    fn unknown_words_fall_apart_into_chars() {
        let tok = default_tokenizer();
        assert_eq!(tok.segment("直播间").unwrap(), vec!["直", "播", "间"]);
    }

    #[test]
    fn user_dict_adds_words() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("user.dict");
        fs::write(&path, "精彩纷呈 10 a\n直播间\n").unwrap();

        let mut tok = default_tokenizer();
        assert_eq!(tok.load_user_dict(&path).unwrap(), 2);
        assert_eq!(tok.segment("直播间").unwrap(), vec!["直播间"]);
        assert_eq!(tok.segment("精彩纷呈").unwrap(), vec!["精彩纷呈"]);
    }

    #[test]
    fn keywords_rank_by_frequency_with_median_idf() {
        let tok = default_tokenizer();
        let kws = tok
            .extract_keywords("视频 主播 视频 的 2024 视频 主播 可爱", 2)
            .unwrap();
        assert_eq!(kws.len(), 2);
        assert_eq!(kws[0].0, "视频");
        assert_eq!(kws[1].0, "主播");
        // 3 of 6 candidate tokens
        assert!((kws[0].1 - 0.5 * DEFAULT_MEDIAN_IDF).abs() < 1e-9);
    }

    #[test]
    fn idf_file_replaces_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("idf.txt");
        fs::write(&path, "视频 1.0\n主播 10.0\n").unwrap();
        let mut tok = default_tokenizer();
        assert_eq!(tok.load_idf(&path).unwrap(), 2);
        let kws = tok.extract_keywords("视频视频主播", 5).unwrap();
        assert_eq!(kws[0].0, "主播");
        assert_eq!(kws[1].0, "视频");
    }
}
