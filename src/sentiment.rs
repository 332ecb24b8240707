//! # Sentiment Scorer
//! Lexicon-based polarity scoring of single comments and whole corpora.
//!
//! Per comment: tokens are scanned left to right; a negation marker flips the
//! next sentiment word it reaches, sentiment words add ±1 scaled by the
//! intensity weight of the *same* token, and the sum is divided by the token
//! count and clamped to [-1, 1].

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use crate::comment::{AnnotatedComment, Comment, TextField};
use crate::debug::{anon_hash, dev_logging_enabled};
use crate::error::Result;
use crate::lexicon::Lexicon;
use crate::tokenizer::Tokenizer;

/// Scores strictly above this are positive, strictly below its negation negative.
pub const LABEL_THRESHOLD: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    pub fn from_score(score: f64) -> Self {
        if score > LABEL_THRESHOLD {
            SentimentLabel::Positive
        } else if score < -LABEL_THRESHOLD {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Neutral => "Neutral",
            SentimentLabel::Negative => "Negative",
        }
    }

    /// Label as shown in the original Chinese reports.
    pub fn zh_name(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "积极",
            SentimentLabel::Neutral => "中性",
            SentimentLabel::Negative => "消极",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub score: f64,
    pub label: SentimentLabel,
}

impl SentimentResult {
    pub fn neutral() -> Self {
        Self {
            score: 0.0,
            label: SentimentLabel::Neutral,
        }
    }

    fn from_score(score: f64) -> Self {
        Self {
            score,
            label: SentimentLabel::from_score(score),
        }
    }
}

/// Comment counts per label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelDistribution {
    #[serde(rename = "Positive")]
    pub positive: usize,
    #[serde(rename = "Neutral")]
    pub neutral: usize,
    #[serde(rename = "Negative")]
    pub negative: usize,
}

impl LabelDistribution {
    pub fn record(&mut self, label: SentimentLabel) {
        match label {
            SentimentLabel::Positive => self.positive += 1,
            SentimentLabel::Neutral => self.neutral += 1,
            SentimentLabel::Negative => self.negative += 1,
        }
    }

    pub fn get(&self, label: SentimentLabel) -> usize {
        match label {
            SentimentLabel::Positive => self.positive,
            SentimentLabel::Neutral => self.neutral,
            SentimentLabel::Negative => self.negative,
        }
    }

    pub fn total(&self) -> usize {
        self.positive + self.neutral + self.negative
    }

    /// Percentage of comments carrying `label` (0 for an empty corpus).
    pub fn share(&self, label: SentimentLabel) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.get(label) as f64 / total as f64 * 100.0
        }
    }
}

/// Aggregate view over an annotated corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentSummary {
    pub positive_count: usize,
    pub negative_count: usize,
    pub neutral_count: usize,
    pub mean_score: Option<f64>,
    /// Sample variance (n - 1 denominator); `None` below two comments.
    pub score_variance: Option<f64>,
}

#[derive(Clone)]
pub struct SentimentScorer {
    lexicon: Arc<Lexicon>,
    tokenizer: Arc<dyn Tokenizer>,
}

impl SentimentScorer {
    pub fn new(lexicon: Arc<Lexicon>, tokenizer: Arc<dyn Tokenizer>) -> Self {
        Self { lexicon, tokenizer }
    }

    /// Score an optional text field. Missing text is neutral, not an error.
    pub fn score(&self, text: Option<&str>) -> Result<SentimentResult> {
        match text {
            Some(t) => self.score_text(t),
            None => Ok(SentimentResult::neutral()),
        }
    }

    pub fn score_text(&self, text: &str) -> Result<SentimentResult> {
        let tokens = self.tokenizer.segment(text)?;

        let mut score = 0.0f64;
        let mut negation = false;

        for token in &tokens {
            let w = token.as_str();
            if self.lexicon.is_negation(w) {
                negation = true;
                continue;
            }

            // Weight of the current token, not of a neighbouring modifier.
            let intensity = self.lexicon.intensity(w);

            let mut word_score = if self.lexicon.is_positive(w) {
                1.0
            } else if self.lexicon.is_negative(w) {
                -1.0
            } else {
                continue;
            };

            if negation {
                word_score = -word_score;
                negation = false;
            }

            score += word_score * intensity;
        }

        if !tokens.is_empty() {
            score = (score / tokens.len() as f64).clamp(-1.0, 1.0);
        }

        let result = SentimentResult::from_score(score);
        if dev_logging_enabled() {
            debug!(
                target: "sentiment",
                id = %anon_hash(text),
                tokens = tokens.len(),
                score = result.score,
                label = result.label.as_str()
            );
        }
        Ok(result)
    }

    /// Score every comment's `field`, returning annotated copies (input order)
    /// and the label counts. A tokenizer failure aborts the whole call.
    pub fn score_corpus(
        &self,
        comments: &[Comment],
        field: TextField,
    ) -> Result<(Vec<AnnotatedComment>, LabelDistribution)> {
        let mut annotated = Vec::with_capacity(comments.len());
        let mut distribution = LabelDistribution::default();

        for c in comments {
            let result = self.score(field.get(c))?;
            distribution.record(result.label);
            annotated.push(AnnotatedComment::new(c.clone(), result));
        }

        for label in [
            SentimentLabel::Positive,
            SentimentLabel::Neutral,
            SentimentLabel::Negative,
        ] {
            info!(
                target: "sentiment",
                label = label.as_str(),
                count = distribution.get(label),
                share = %format!("{:.1}%", distribution.share(label)),
                "sentiment distribution"
            );
        }

        Ok((annotated, distribution))
    }

    pub fn summary(annotated: &[AnnotatedComment]) -> SentimentSummary {
        let mut dist = LabelDistribution::default();
        for a in annotated {
            dist.record(a.sentiment_label);
        }

        let n = annotated.len();
        let mean = (n > 0).then(|| annotated.iter().map(|a| a.sentiment_score).sum::<f64>() / n as f64);
        let variance = mean.filter(|_| n > 1).map(|m| {
            annotated
                .iter()
                .map(|a| (a.sentiment_score - m).powi(2))
                .sum::<f64>()
                / (n - 1) as f64
        });

        SentimentSummary {
            positive_count: dist.positive,
            negative_count: dist.negative,
            neutral_count: dist.neutral,
            mean_score: mean,
            score_variance: variance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalyzerError;
    use crate::stopwords::StopwordSet;
    use crate::tokenizer::DictTokenizer;
    use std::collections::HashMap;

    fn scorer() -> SentimentScorer {
        let lexicon = Arc::new(Lexicon::builtin());
        let tok = DictTokenizer::for_lexicon(&lexicon, Arc::new(StopwordSet::base()));
        SentimentScorer::new(lexicon, Arc::new(tok))
    }

    struct BrokenTokenizer;

    impl Tokenizer for BrokenTokenizer {
        fn segment(&self, _text: &str) -> Result<Vec<String>> {
            Err(AnalyzerError::TokenizerUnavailable("dictionary not loaded".into()))
        }
        fn extract_keywords(&self, _text: &str, _top_k: usize) -> Result<Vec<(String, f64)>> {
            Err(AnalyzerError::TokenizerUnavailable("dictionary not loaded".into()))
        }
    }

    #[test]
    fn positive_example_classifies_positive() {
        let r = scorer().score_text("这个视频太棒了，我非常喜欢！").unwrap();
        // 2 positive tokens out of 8
        assert!((r.score - 0.25).abs() < 1e-12);
        assert_eq!(r.label, SentimentLabel::Positive);
    }

    #[test]
    fn empty_and_missing_text_are_neutral() {
        let s = scorer();
        let r = s.score_text("").unwrap();
        assert_eq!(r.score, 0.0);
        assert_eq!(r.label, SentimentLabel::Neutral);
        assert_eq!(s.score(None).unwrap(), SentimentResult::neutral());
    }

    #[test]
    fn negation_flips_following_sentiment_word() {
        let s = scorer();
        let plain = s.score_text("视频精彩").unwrap();
        let negated = s.score_text("视频不精彩").unwrap();
        assert_eq!(plain.label, SentimentLabel::Positive);
        assert_eq!(negated.label, SentimentLabel::Negative);
        assert!((negated.score + 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn negation_waits_for_next_sentiment_word() {
        // 不 / 视频 / 精彩: the marker skips the neutral token.
        let r = scorer().score_text("不视频精彩").unwrap();
        assert!(r.score < 0.0);
    }

    #[test]
    fn intensity_is_looked_up_on_the_sentiment_token_itself() {
        // 非常 / 喜欢: the modifier does not scale the following word.
        let r = scorer().score_text("非常喜欢").unwrap();
        assert!((r.score - 0.5).abs() < 1e-12);

        let mut weights = HashMap::new();
        weights.insert("超赞".to_string(), 2.0);
        let lexicon = Arc::new(
            Lexicon::new(vec!["超赞".to_string()], Vec::new(), weights, Vec::new()).unwrap(),
        );
        let tok = DictTokenizer::new(["超赞"]);
        let s = SentimentScorer::new(lexicon, Arc::new(tok));
        // 2.0 / 1 token, clamped
        assert_eq!(s.score_text("超赞").unwrap().score, 1.0);
        // 2.0 / 3 tokens
        let r = s.score_text("超赞 x").unwrap();
        assert!((r.score - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn classification_boundaries() {
        assert_eq!(SentimentLabel::from_score(0.1), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_score(0.10001), SentimentLabel::Positive);
        assert_eq!(SentimentLabel::from_score(-0.1), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_score(-0.10001), SentimentLabel::Negative);
        assert_eq!(SentimentLabel::from_score(0.0), SentimentLabel::Neutral);
    }

    #[test]
    fn score_corpus_keeps_order_and_counts_labels() {
        let comments = vec![
            Comment::new("太棒了"),
            Comment::default(),
            Comment::new("垃圾"),
            Comment::new("视频"),
        ];
        let (annotated, dist) = scorer()
            .score_corpus(&comments, TextField::Content)
            .unwrap();
        assert_eq!(annotated.len(), 4);
        assert_eq!(annotated[0].sentiment_label, SentimentLabel::Positive);
        assert_eq!(annotated[1].sentiment_label, SentimentLabel::Neutral);
        assert_eq!(annotated[2].sentiment_label, SentimentLabel::Negative);
        assert_eq!(annotated[3].comment, comments[3]);
        assert_eq!(dist.total(), 4);
        assert_eq!((dist.positive, dist.neutral, dist.negative), (1, 2, 1));
    }

    #[test]
    fn tokenizer_failure_propagates() {
        let s = SentimentScorer::new(Arc::new(Lexicon::builtin()), Arc::new(BrokenTokenizer));
        assert!(matches!(
            s.score_text("好"),
            Err(AnalyzerError::TokenizerUnavailable(_))
        ));
        // Missing text never reaches the tokenizer.
        assert!(s.score(None).is_ok());
        let err = s
            .score_corpus(&[Comment::new("好")], TextField::Content)
            .unwrap_err();
        assert!(matches!(err, AnalyzerError::TokenizerUnavailable(_)));
    }

    #[test]
    fn summary_matches_sample_variance() {
        let mk = |score: f64| {
            AnnotatedComment::new(
                Comment::new("x"),
                SentimentResult::from_score(score),
            )
        };
        let annotated = vec![mk(0.5), mk(-0.5), mk(0.0)];
        let s = SentimentScorer::summary(&annotated);
        assert_eq!((s.positive_count, s.neutral_count, s.negative_count), (1, 1, 1));
        assert!(s.mean_score.unwrap().abs() < 1e-12);
        // (0.25 + 0.25 + 0) / 2
        assert!((s.score_variance.unwrap() - 0.25).abs() < 1e-12);

        let single = SentimentScorer::summary(&annotated[..1]);
        assert_eq!(single.score_variance, None);
        assert_eq!(SentimentScorer::summary(&[]).mean_score, None);
    }
}
