// tests/score_properties.rs
//
// Randomized checks over synthetic comments built from lexicon words,
// modifiers, negations, filler vocabulary and punctuation (seeded, repeatable).

use rand::{rngs::StdRng, Rng, SeedableRng};

use douyin_comment_analyzer::sentiment::LABEL_THRESHOLD;
use douyin_comment_analyzer::{AnalysisPipeline, AnalyzerConfig, Comment, SentimentLabel, TextField};

const PIECES: &[&str] = &[
    "喜欢", "太棒了", "精彩", "可爱", "加油", "无聊", "垃圾", "失望", "没意思", "不", "没", "非常",
    "很", "有点", "视频", "主播", "内容", "的", "了", "，", "！", "😀", " ", "666", "abc",
];

fn random_comment(rng: &mut StdRng) -> String {
    let len = rng.random_range(0..12);
    (0..len)
        .map(|_| PIECES[rng.random_range(0..PIECES.len())])
        .collect()
}

fn corpus(seed: u64, n: usize) -> Vec<Comment> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| Comment::new(random_comment(&mut rng))).collect()
}

#[test]
fn scores_are_bounded_labelled_and_deterministic() {
    let pipeline = AnalysisPipeline::from_config(&AnalyzerConfig::default());
    let scorer = pipeline.scorer();

    for c in corpus(7, 500) {
        let text = c.content.as_deref().unwrap_or_default();
        let a = scorer.score_text(text).expect("score");
        let b = scorer.score_text(text).expect("score");
        assert_eq!(a, b, "non-deterministic score for {text:?}");
        assert!((-1.0..=1.0).contains(&a.score), "{text:?} scored {}", a.score);

        let expected = if a.score > LABEL_THRESHOLD {
            SentimentLabel::Positive
        } else if a.score < -LABEL_THRESHOLD {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        };
        assert_eq!(a.label, expected, "{text:?}");
    }
}

#[test]
fn corpus_scoring_preserves_order_and_counts() {
    let pipeline = AnalysisPipeline::from_config(&AnalyzerConfig::default());
    let comments = corpus(11, 200);

    let (annotated, dist) = pipeline
        .scorer()
        .score_corpus(&comments, TextField::Content)
        .expect("score corpus");
    assert_eq!(annotated.len(), comments.len());
    assert_eq!(dist.total(), comments.len());
    for (a, c) in annotated.iter().zip(&comments) {
        assert_eq!(&a.comment, c);
    }
}

#[test]
fn mining_counts_are_consistent() {
    let pipeline = AnalysisPipeline::from_config(&AnalyzerConfig::default());
    let miner = pipeline.miner();

    for seed in 0..20 {
        let comments = corpus(seed, 60);
        let Some(result) = miner
            .mine(&comments, TextField::Content, 10)
            .expect("mine")
        else {
            continue;
        };

        assert_eq!(result.all_word_counts.total(), result.total_words);
        assert_eq!(result.all_word_counts.len(), result.unique_words);
        assert!(result.all_word_counts.iter().all(|(w, n)| n >= 1 && w.chars().count() >= 2));
        assert!(result.top_n.len() <= 10);
        assert!(result.top_n.windows(2).all(|w| w[0].1 >= w[1].1));

        for topic in miner
            .find_hot_topics(&comments, TextField::Content, 3)
            .expect("hot topics")
        {
            assert!(topic.occurrence_count >= 3);
            assert!(topic.sample_comments.len() <= 3);
            assert!(topic.sample_comments.len() <= topic.related_comment_count);
            assert!(topic
                .sample_comments
                .iter()
                .all(|s| s.contains(topic.keyword.as_str())));
        }
    }
}
