//! Offline analysis of a crawler comment dump.
//!
//! Usage: `analyze_file <comments.json> [report.json]`
//! The report defaults to `<stem>_report.json` next to the input.

use anyhow::{bail, Context};
use std::fs;
use std::path::{Path, PathBuf};

use douyin_comment_analyzer::comment::load_comments;
use douyin_comment_analyzer::sentiment::SentimentLabel;
use douyin_comment_analyzer::{init_tracing, AnalysisPipeline, AnalyzerConfig};

fn default_report_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("comments");
    input.with_file_name(format!("{stem}_report.json"))
}

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing("warn");

    let mut args = std::env::args().skip(1);
    let Some(input) = args.next().map(PathBuf::from) else {
        bail!("usage: analyze_file <comments.json> [report.json]");
    };
    let output = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| default_report_path(&input));

    let config = AnalyzerConfig::load().context("loading analyzer config")?;
    let comments = load_comments(&input)
        .with_context(|| format!("reading comments from {}", input.display()))?;
    let report = AnalysisPipeline::from_config(&config)
        .run(&comments)
        .context("analysis failed")?;

    let json = serde_json::to_string_pretty(&report)?;
    fs::write(&output, json).with_context(|| format!("writing {}", output.display()))?;

    println!("comments:  {}", report.stats.comment_count);
    for label in [
        SentimentLabel::Positive,
        SentimentLabel::Neutral,
        SentimentLabel::Negative,
    ] {
        println!(
            "{} ({}): {} ({:.1}%)",
            label.as_str(),
            label.zh_name(),
            report.label_distribution.get(label),
            report.label_distribution.share(label)
        );
    }
    if let Some(freq) = &report.word_frequency {
        let top: Vec<String> = freq
            .top_n
            .iter()
            .take(10)
            .map(|(w, n)| format!("{w}({n})"))
            .collect();
        println!("top words: {}", top.join(" "));
    }
    for t in report.hot_topics.iter().take(5) {
        println!(
            "hot topic {}: {} occurrences, {} comments",
            t.keyword, t.occurrence_count, t.related_comment_count
        );
    }
    println!("report written to {}", output.display());
    Ok(())
}
