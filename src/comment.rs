//! Comment records as collected by the crawler, plus the annotated form the
//! sentiment pass produces.
//!
//! Crawler output uses Chinese column names (`用户`, `内容`, `点赞数`, `时间`);
//! they are accepted as aliases. Fields with an unexpected JSON type load as
//! `None` instead of failing the whole file.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::sentiment::{SentimentLabel, SentimentResult};

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Comment {
    #[serde(default, alias = "用户", deserialize_with = "lenient_string")]
    pub user: Option<String>,
    #[serde(default, alias = "内容", deserialize_with = "lenient_string")]
    pub content: Option<String>,
    #[serde(default, alias = "点赞数", deserialize_with = "lenient_likes")]
    pub likes: Option<u64>,
    #[serde(default, alias = "时间", deserialize_with = "lenient_timestamp")]
    pub timestamp: Option<String>,
}

impl Comment {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn with_likes(mut self, likes: u64) -> Self {
        self.likes = Some(likes);
        self
    }

    pub fn with_timestamp(mut self, ts: impl Into<String>) -> Self {
        self.timestamp = Some(ts.into());
        self
    }

    /// Every field missing. Whitespace-only text still counts as a value.
    fn is_blank(&self) -> bool {
        self.user.is_none() && self.content.is_none() && self.likes.is_none() && self.timestamp.is_none()
    }
}

/// Which comment field the corpus operations read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextField {
    #[default]
    Content,
    User,
}

impl TextField {
    pub fn get<'a>(&self, comment: &'a Comment) -> Option<&'a str> {
        match self {
            TextField::Content => comment.content.as_deref(),
            TextField::User => comment.user.as_deref(),
        }
    }
}

/// A comment plus its sentiment annotation. The source record is copied, not
/// mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedComment {
    #[serde(flatten)]
    pub comment: Comment,
    pub sentiment_score: f64,
    pub sentiment_label: SentimentLabel,
}

impl AnnotatedComment {
    pub fn new(comment: Comment, result: SentimentResult) -> Self {
        Self {
            comment,
            sentiment_score: result.score,
            sentiment_label: result.label,
        }
    }
}

/// Accepted file shapes: the crawler's `{ "video_info": ..., "comments": [...] }`
/// or a bare array of comments.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CommentFile {
    Bare(Vec<Comment>),
    Wrapped {
        #[serde(default)]
        #[allow(dead_code)]
        video_info: Option<Value>,
        comments: Vec<Comment>,
    },
}

/// Parse comments from a JSON string in either accepted shape.
pub fn parse_comments(json: &str) -> Result<Vec<Comment>> {
    let file: CommentFile = serde_json::from_str(json)?;
    Ok(match file {
        CommentFile::Wrapped { comments, .. } => comments,
        CommentFile::Bare(comments) => comments,
    })
}

/// Same as [`parse_comments`] for an already-decoded JSON value.
pub fn comments_from_value(value: Value) -> Result<Vec<Comment>> {
    let file: CommentFile = serde_json::from_value(value)?;
    Ok(match file {
        CommentFile::Wrapped { comments, .. } => comments,
        CommentFile::Bare(comments) => comments,
    })
}

/// Load comments from a JSON file.
pub fn load_comments(path: &Path) -> Result<Vec<Comment>> {
    let raw = fs::read_to_string(path)?;
    parse_comments(&raw)
}

/// Drop records with every field missing and exact duplicates, keeping the
/// first occurrence.
pub fn dedup_comments(comments: &[Comment]) -> Vec<Comment> {
    let mut seen: HashSet<&Comment> = HashSet::new();
    comments
        .iter()
        .filter(|c| !c.is_blank() && seen.insert(*c))
        .cloned()
        .collect()
}

// --- lenient field decoding ---

fn lenient_string<'de, D>(d: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

fn lenient_likes<'de, D>(d: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::Number(n)) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| *f >= 0.0 && f.fract() == 0.0)
                .map(|f| f as u64)
        }),
        Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
        _ => None,
    })
}

fn lenient_timestamp<'de, D>(d: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
