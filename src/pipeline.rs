//! Full corpus analysis: stats, sentiment, word frequencies, hot topics,
//! keywords and word-cloud data in one report.

use chrono::{DateTime, Utc};
use metrics::{counter, histogram};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::comment::{dedup_comments, AnnotatedComment, Comment};
use crate::config::AnalyzerConfig;
use crate::error::{AnalyzerError, Result};
use crate::lexicon::Lexicon;
use crate::metrics::{COMMENTS_TOTAL, LABELS_TOTAL, RUNS_TOTAL, RUN_DURATION_MS, RUN_ERRORS_TOTAL};
use crate::mining::{FrequencyTable, HotTopic, MiningResult, TextMiner};
use crate::sentiment::{LabelDistribution, SentimentLabel, SentimentScorer, SentimentSummary};
use crate::stopwords::StopwordSet;
use crate::tokenizer::{self, TokenizerFiles};

pub const TOP_LIKED: usize = 10;
pub const TOP_ACTIVE_USERS: usize = 10;

/// Descriptive numbers about the corpus itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorpusStats {
    pub comment_count: usize,
    pub total_likes: u64,
    /// Mean over comments that carry a like count.
    pub average_likes: Option<f64>,
    pub unique_users: usize,
    /// Users by comment count, most active first; ties in first-seen order.
    pub active_users: Vec<(String, usize)>,
    /// Timestamps compare as strings; crawler output is `YYYY-MM-DD HH:MM:SS`.
    pub earliest_timestamp: Option<String>,
    pub latest_timestamp: Option<String>,
}

impl CorpusStats {
    pub fn from_comments(comments: &[Comment]) -> Self {
        let likes: Vec<u64> = comments.iter().filter_map(|c| c.likes).collect();
        let total_likes: u64 = likes.iter().sum();
        let mut users = FrequencyTable::default();
        for user in comments.iter().filter_map(|c| c.user.as_deref()) {
            users.add(user.to_string());
        }
        let timestamps = comments.iter().filter_map(|c| c.timestamp.as_deref());

        Self {
            comment_count: comments.len(),
            total_likes,
            average_likes: (!likes.is_empty()).then(|| total_likes as f64 / likes.len() as f64),
            unique_users: users.len(),
            active_users: users.top(TOP_ACTIVE_USERS),
            earliest_timestamp: timestamps.clone().min().map(str::to_string),
            latest_timestamp: timestamps.max().map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub generated_at: DateTime<Utc>,
    pub stats: CorpusStats,
    pub comments: Vec<AnnotatedComment>,
    pub label_distribution: LabelDistribution,
    pub sentiment_summary: SentimentSummary,
    pub word_frequency: Option<MiningResult>,
    pub hot_topics: Vec<HotTopic>,
    pub keywords: Vec<(String, f64)>,
    pub wordcloud: Vec<(String, usize)>,
    pub top_liked: Vec<Comment>,
}

#[derive(Clone)]
pub struct AnalysisPipeline {
    config: AnalyzerConfig,
    scorer: SentimentScorer,
    miner: TextMiner,
}

impl AnalysisPipeline {
    pub fn new(config: AnalyzerConfig, scorer: SentimentScorer, miner: TextMiner) -> Self {
        Self {
            config,
            scorer,
            miner,
        }
    }

    /// Build the scorer and miner from config. Unreadable resource files are
    /// logged and replaced by the built-ins.
    pub fn from_config(config: &AnalyzerConfig) -> Self {
        let lexicon = Arc::new(Lexicon::from_override(config.sentiment_dict_path.as_deref()));
        let stopwords = Arc::new(StopwordSet::load(config.stopwords_file.as_deref()));
        let tokenizer = tokenizer::build(
            config.tokenizer,
            &lexicon,
            stopwords.clone(),
            TokenizerFiles {
                user_dict: config.user_dict_path.as_deref(),
                idf: config.idf_path.as_deref(),
            },
        );
        info!(target: "config", tokenizer = config.tokenizer.as_str(), "pipeline ready");

        let scorer = SentimentScorer::new(lexicon, tokenizer.clone());
        let miner = TextMiner::new(stopwords, tokenizer).with_hot_topic_scan(config.hot_topic_scan);
        Self::new(config.clone(), scorer, miner)
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn scorer(&self) -> &SentimentScorer {
        &self.scorer
    }

    pub fn miner(&self) -> &TextMiner {
        &self.miner
    }

    pub fn run(&self, comments: &[Comment]) -> Result<AnalysisReport> {
        let started = Instant::now();
        let res = self.run_inner(comments);
        histogram!(RUN_DURATION_MS).record(started.elapsed().as_secs_f64() * 1000.0);

        match &res {
            Ok(report) => {
                counter!(RUNS_TOTAL).increment(1);
                counter!(COMMENTS_TOTAL).increment(report.stats.comment_count as u64);
                for label in [
                    SentimentLabel::Positive,
                    SentimentLabel::Neutral,
                    SentimentLabel::Negative,
                ] {
                    counter!(LABELS_TOTAL, "label" => label.as_str())
                        .increment(report.label_distribution.get(label) as u64);
                }
            }
            Err(e) => {
                counter!(RUN_ERRORS_TOTAL).increment(1);
                warn!(target: "pipeline", error = %e, "analysis failed");
            }
        }
        res
    }

    fn run_inner(&self, comments: &[Comment]) -> Result<AnalysisReport> {
        if comments.is_empty() {
            return Err(AnalyzerError::EmptyCorpus);
        }

        let deduped;
        let comments = if self.config.dedup_comments {
            deduped = dedup_comments(comments);
            info!(target: "pipeline", before = comments.len(), after = deduped.len(), "deduplicated");
            if deduped.is_empty() {
                return Err(AnalyzerError::EmptyCorpus);
            }
            deduped.as_slice()
        } else {
            comments
        };

        let field = self.config.text_field;
        let stats = CorpusStats::from_comments(comments);

        let (annotated, label_distribution) = self.scorer.score_corpus(comments, field)?;
        let sentiment_summary = SentimentScorer::summary(&annotated);

        let word_frequency = self.miner.mine(comments, field, self.config.top_n)?;
        let hot_topics =
            self.miner
                .find_hot_topics(comments, field, self.config.hot_topic_min_count)?;

        let joined = comments
            .iter()
            .filter_map(|c| field.get(c))
            .collect::<Vec<_>>()
            .join(" ");
        let keywords = self.miner.extract_keywords(&joined, self.config.keyword_top_k)?;
        let wordcloud = self.miner.wordcloud_data(comments, field)?;

        info!(
            target: "pipeline",
            comments = stats.comment_count,
            hot_topics = hot_topics.len(),
            keywords = keywords.len(),
            "analysis finished"
        );

        Ok(AnalysisReport {
            generated_at: Utc::now(),
            stats,
            comments: annotated,
            label_distribution,
            sentiment_summary,
            word_frequency,
            hot_topics,
            keywords,
            wordcloud,
            top_liked: top_liked(comments, TOP_LIKED),
        })
    }
}

/// The `n` most-liked comments, ties in corpus order. Without any like
/// counts this is simply the first `n`.
pub fn top_liked(comments: &[Comment], n: usize) -> Vec<Comment> {
    let mut ranked: Vec<&Comment> = comments.iter().collect();
    if comments.iter().any(|c| c.likes.is_some()) {
        ranked.sort_by(|a, b| b.likes.unwrap_or(0).cmp(&a.likes.unwrap_or(0)));
    }
    ranked.into_iter().take(n).cloned().collect()
}
